//! Error types for the client.

use cardduel_protocol::{CommandCode, ProtocolError};
use cardduel_transport::TransportError;

/// Errors that can occur on the client side.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The deck file could not be read, or was empty.
    #[error("Failed to load deck from: {path}")]
    DeckLoad { path: String },

    /// The command needs priority and this client does not hold it.
    #[error("cannot send {0}: you do not have priority")]
    NoPriority(CommandCode),

    /// The connection to the server is gone.
    #[error("Not connected to server!")]
    NotConnected,

    /// A transport-level error (connect, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
