//! Datagram wire form for [`Message`] values.
//!
//! A payload is one version byte followed by a bincode body encoded with
//! fixed-size integers in big-endian order. Enum variants keep their declared
//! discriminants, so the format is stable across implementations; bumping
//! [`WIRE_VERSION`] is the escape hatch for incompatible changes.
use bincode::config::{BigEndian, Configuration, Fixint};
use thiserror::Error;

use crate::Message;

/// Current wire format revision.
pub const WIRE_VERSION: u8 = 0x1;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode message: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("unsupported wire version {0:#x}")]
    UnsupportedVersion(u8),
    #[error("empty payload")]
    Empty,
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

fn config() -> Configuration<BigEndian, Fixint> {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
}

/// Encode a message into its datagram payload.
pub fn encode(message: &Message) -> Result<Vec<u8>, CodecError> {
    let mut payload = vec![WIRE_VERSION];
    payload.extend(bincode::encode_to_vec(message, config())?);
    Ok(payload)
}

/// Decode a datagram payload back into a message.
///
/// The entire payload must be consumed; unknown versions, truncation, and
/// unrecognized enum tags are all reported as [`CodecError`]s.
pub fn decode(payload: &[u8]) -> Result<Message, CodecError> {
    let (&version, body) = payload.split_first().ok_or(CodecError::Empty)?;
    if version != WIRE_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let (message, consumed) = bincode::decode_from_slice(body, config())?;
    if consumed != body.len() {
        return Err(CodecError::TrailingBytes(body.len() - consumed));
    }
    Ok(message)
}
