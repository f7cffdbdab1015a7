//! Messages exchanged between AutoNav subsystems.
//!
//! A [`Message`] is a single command or action unit: it names the subsystem it
//! is destined for, carries a severity level, and wraps a human-readable title
//! together with the command body. Messages are built once per action and
//! discarded after transmission; neither the sender nor the receiver retains
//! them past the send call.
//!
//! The enums derive bincode's `Encode`/`Decode` for the datagram wire form and
//! serde's `Serialize`/`Deserialize` for the JSON form used on the stream
//! path. Variant order is part of the wire format and must not change.
use bincode::{Decode, Encode};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Destination subsystem for a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Target {
    /// The operator-facing interface, reached with a single datagram.
    Interface,
    /// The AutoNav server, reached over a stream connection.
    Server,
}

/// Severity attached to a [`Message`].
///
/// Variant order matches the wire discriminants and is kept as declared by
/// the protocol; it is not a usable priority axis (`Success` sits between
/// `Info` and `Warn`), so no ordering is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Success,
    Warn,
    Fatal,
}

/// A command or action to deliver to one subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Message {
    /// Targeted subsystem of the action.
    pub target: Target,
    /// Severity of the action.
    pub level: Level,
    /// Title of the action, primarily for interface display.
    pub title: String,
    /// Command or action to execute.
    pub body: String,
}

impl Message {
    pub fn new(
        target: Target,
        level: Level,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            target,
            level,
            title: title.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_construction() {
        let msg = Message::new(Target::Interface, Level::Warn, "battery", "voltage low");

        assert_eq!(msg.target, Target::Interface);
        assert_eq!(msg.level, Level::Warn);
        assert_eq!(msg.title, "battery");
        assert_eq!(msg.body, "voltage low");
    }

    #[test]
    fn message_json_form() {
        let msg = Message::new(Target::Server, Level::Fatal, "halt", "stop all motors");
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains("\"target\":\"SERVER\""));
        assert!(json.contains("\"level\":\"FATAL\""));

        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
