//! Destination configuration for outbound messages.
//!
//! The reference deployment hardcoded its addresses; here both destinations
//! are supplied by the caller (CLI arguments, config file, test harness) and
//! injected into the [`Dispatcher`](crate::protocol::Dispatcher).
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

/// Raised when a `host:port` string does not resolve to a usable address.
/// Carries the resolver failure when there was one; resolution can also
/// succeed with an empty address list.
#[derive(Debug, Error)]
#[error("could not resolve endpoint '{endpoint}'")]
pub struct AddressError {
    pub endpoint: String,
    #[source]
    pub source: Option<io::Error>,
}

/// The two destinations a [`Message`](crate::Message) can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    /// Datagram endpoint of the operator interface.
    pub interface: SocketAddr,
    /// Stream endpoint of the AutoNav server.
    pub server: SocketAddr,
}

impl Endpoints {
    pub fn new(interface: SocketAddr, server: SocketAddr) -> Self {
        Self { interface, server }
    }

    /// Resolve both endpoints from `host:port` strings.
    pub fn resolve(interface: &str, server: &str) -> Result<Self, AddressError> {
        Ok(Self {
            interface: resolve_one(interface)?,
            server: resolve_one(server)?,
        })
    }
}

fn resolve_one(endpoint: &str) -> Result<SocketAddr, AddressError> {
    let mut addrs = endpoint.to_socket_addrs().map_err(|e| AddressError {
        endpoint: endpoint.to_string(),
        source: Some(e),
    })?;

    addrs.next().ok_or_else(|| AddressError {
        endpoint: endpoint.to_string(),
        source: None,
    })
}
