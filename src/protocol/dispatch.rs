//! Outbound message dispatch.
//!
//! The interface path is fire-and-forget: one datagram per message, sent from
//! a transient local socket that is released as soon as the call returns,
//! success or failure. No acknowledgement is awaited and no retry is made.
//! The server path opens a stream connection, posts the message as JSON, and
//! hands the parsed reply back to the caller.
use std::{
    io::{self, BufRead, BufReader, Read, Write},
    net::{TcpStream, UdpSocket},
};

use log::info;
use thiserror::Error;

use super::Response;
use super::codec::{self, CodecError};
use crate::{Endpoints, Message, Target};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("socket unavailable: {0}")]
    Network(#[source] io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("dispatch I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON form unavailable: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not understand reply: {0}")]
    BadReply(String),
}

/// What a successful dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The datagram left the local socket; delivery is not guaranteed.
    Sent,
    /// The server answered; its reception status is attached.
    Answered(Response),
}

/// Routes messages to the endpoint matching their target.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    endpoints: Endpoints,
}

impl Dispatcher {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// Transmit one message to the destination selected by its target.
    pub fn dispatch(&self, message: &Message) -> Result<DispatchOutcome, DispatchError> {
        match message.target {
            Target::Interface => {
                self.send_datagram(message)?;
                Ok(DispatchOutcome::Sent)
            }
            Target::Server => Ok(DispatchOutcome::Answered(self.exchange(message)?)),
        }
    }

    fn send_datagram(&self, message: &Message) -> Result<(), DispatchError> {
        let payload = codec::encode(message)?;

        // Ephemeral socket, dropped on every exit path.
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(DispatchError::Network)?;
        socket.send_to(&payload, self.endpoints.interface)?;

        info!("dispatched '{}' to interface", message.title);
        Ok(())
    }

    fn exchange(&self, message: &Message) -> Result<Response, DispatchError> {
        let body = serde_json::to_string(message)?;

        let mut stream =
            TcpStream::connect(self.endpoints.server).map_err(DispatchError::Network)?;
        write!(
            stream,
            "POST /message HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )?;
        stream.flush()?;

        info!("dispatched '{}' to server", message.title);
        read_reply(stream)
    }
}

/// Parse the server's reply envelope: status line, headers, JSON body.
fn read_reply<R: Read>(stream: R) -> Result<Response, DispatchError> {
    let mut reader = BufReader::new(stream);

    let mut status = String::new();
    reader.read_line(&mut status)?;
    if !status.starts_with("HTTP/1.1 ") {
        return Err(DispatchError::BadReply(status.trim_end().to_string()));
    }

    // Skip headers up to the blank separator.
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line.trim_end_matches(['\r', '\n']).is_empty() {
            break;
        }
    }

    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    serde_json::from_str(body.trim_end_matches(['\r', '\n']))
        .map_err(|e| DispatchError::BadReply(e.to_string()))
}
