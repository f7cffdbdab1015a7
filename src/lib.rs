pub mod config;
pub mod message;
pub mod protocol;

pub use config::Endpoints;
pub use message::{Level, Message, Target};
pub use protocol::{DispatchOutcome, Dispatcher, Request, Response};
