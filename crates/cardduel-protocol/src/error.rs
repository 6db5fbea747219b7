//! Error types for the protocol layer.
//!
//! Each crate in CardDuel defines its own error enum. A `ProtocolError`
//! means the bytes arrived but could not be turned into (or made from)
//! a message; the connection itself is still fine unless the variant is
//! [`Frame`](ProtocolError::Frame).

use cardduel_transport::TransportError;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, wrong
    /// data types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The length prefix was invalid or the payload too big to frame.
    #[error(transparent)]
    Frame(#[from] TransportError),

    /// The buffer ends before the frame its header announces.
    #[error("incomplete frame: have {have} bytes")]
    Incomplete { have: usize },

    /// The message is invalid at the protocol level.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
