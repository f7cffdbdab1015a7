use std::{
    io::{self, BufReader, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    time::Duration,
};

use log::{info, warn};
use thiserror::Error;

use super::{Request, Response, ThreadPool};

/// Bounded pool size; connections beyond it queue on the channel.
const WORKERS: usize = 8;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("accept loop failed: {0}")]
    Io(#[from] io::Error),
}

/// Reception endpoint for inbound messages.
///
/// Binds the configured address on construction and serves each accepted
/// connection on a worker. Handling order across connections follows worker
/// scheduling, not accept order. Per-connection failures are logged and
/// answered where possible; they never stop the accept loop.
pub struct CommServer {
    listener: TcpListener,
    read_timeout: Option<Duration>,
    pool: ThreadPool,
}

impl CommServer {
    /// Bind `address` and prepare the worker pool.
    ///
    /// `read_timeout` bounds how long a stalled client may hold a worker;
    /// `None` keeps the connection open indefinitely.
    pub fn new(address: SocketAddr, read_timeout: Option<Duration>) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(address)
            .map_err(|source| ServerError::Bind { address, source })?;

        Ok(Self {
            listener,
            read_timeout,
            pool: ThreadPool::new(WORKERS),
        })
    }

    /// Actual bound address; differs from the requested one for port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, dispatching each to the pool.
    pub fn listen(self) -> Result<(), ServerError> {
        info!("listening at {}", self.local_addr()?);

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let timeout = self.read_timeout;
                    self.pool.execute(move || {
                        if let Err(e) = handle_connection(stream, timeout) {
                            warn!("connection failed: {e}");
                        }
                    });
                }
                Err(e) => warn!("broken connection: {e:?}"),
            }
        }
        Ok(())
    }
}

fn handle_connection(stream: TcpStream, timeout: Option<Duration>) -> io::Result<()> {
    stream.set_read_timeout(timeout)?;
    serve(stream)
}

/// Parse one request, answer it from the actual outcome, and flush the reply.
/// Generic over the stream so tests can drive it with in-memory buffers.
fn serve<S: Read + Write>(stream: S) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let outcome = Request::read_from(&mut reader);

    match &outcome {
        Ok(req) => info!(
            "received request: {} {} {}",
            req.method, req.target, req.http_version
        ),
        Err(e) => warn!("rejecting request: {e}"),
    }

    let response = Response::from_outcome(&outcome);
    // A failed write may have left a partial envelope on the wire; anything
    // written after it would corrupt the reply, so just close.
    response.write_to(reader.get_mut())
}
