//! Dispatch and reception protocol for AutoNav messages.
//!
//! This module defines how a [`Message`](crate::Message) travels between the
//! control system, the operator interface, and the AutoNav server, and how an
//! inbound request is parsed, answered, and isolated from its neighbors.
//!
//! # Overview
//!
//! Outbound, the [`Dispatcher`] selects a destination by the message's target:
//! the interface is reached with a single fire-and-forget datagram carrying
//! the [`codec`] wire form, while the server is reached over a stream
//! connection speaking a small HTTP-style text exchange.
//!
//! Inbound, the [`CommServer`] accepts stream connections and hands each one
//! to a worker. The worker drives the request state machine (request line,
//! headers, optional `Content-Length`-bounded body), builds a [`Response`]
//! from the actual parse outcome, and writes the reply back. A connection's
//! failures never reach the accept loop.
//!
//! # Wire form
//!
//! Datagram payloads begin with a single version byte followed by a bincode
//! payload (fixed-size integers, big-endian, stable variant discriminants), so
//! any conforming decoder can reconstruct the message independently of this
//! implementation.
pub mod codec;
mod dispatch;
mod request;
mod response;
mod server;
mod thread;

use thread::ThreadPool;

pub use dispatch::{DispatchError, DispatchOutcome, Dispatcher};
pub use request::{ParseError, Request};
pub use response::{Response, ResponseCode};
pub use server::{CommServer, ServerError};
