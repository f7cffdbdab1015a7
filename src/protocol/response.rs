//! Reply construction and encoding.
use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::{ParseError, Request};

/// Reception status reported back to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    Received,
    BadRequest,
    InternalError,
}

impl ResponseCode {
    /// Status line of the HTTP-style reply envelope.
    fn status_line(self) -> &'static str {
        match self {
            ResponseCode::Received => "HTTP/1.1 200 OK",
            ResponseCode::BadRequest => "HTTP/1.1 400 Bad Request",
            ResponseCode::InternalError => "HTTP/1.1 500 Internal Server Error",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseCode::Received => "RECEIVED",
            ResponseCode::BadRequest => "BAD_REQUEST",
            ResponseCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{name}")
    }
}

/// Reply sent to the initial request sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Reception status, serialized under the wire name `name`.
    #[serde(rename = "name")]
    pub code: ResponseCode,
    /// Descriptive text, primarily for interface display and logs.
    pub body: String,
}

impl Response {
    /// Build the reply from the actual parse outcome of a connection.
    pub fn from_outcome(outcome: &Result<Request, ParseError>) -> Self {
        match outcome {
            Ok(_) => Self::received(),
            // A failed read is the connection's fault, not the request's.
            Err(ParseError::Io(e)) => Self::internal_error(&e.to_string()),
            Err(e) => Self::bad_request(e),
        }
    }

    pub fn received() -> Self {
        Self {
            code: ResponseCode::Received,
            body: "The request was successfully received.".to_string(),
        }
    }

    pub fn bad_request(error: &ParseError) -> Self {
        Self {
            code: ResponseCode::BadRequest,
            body: error.to_string(),
        }
    }

    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: ResponseCode::InternalError,
            body: format!("The request could not be handled: {detail}"),
        }
    }

    /// Write the full reply: status line, JSON content type, blank line, the
    /// JSON body, and the closing blank lines.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;

        write!(writer, "{}\r\n", self.code.status_line())?;
        write!(writer, "Content-Type: application/json\r\n\r\n")?;
        write!(writer, "{json}\r\n\r\n")?;
        writer.flush()
    }
}
