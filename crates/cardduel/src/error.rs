//! Unified error type for the CardDuel server.

use cardduel_game::GameError;
use cardduel_protocol::ProtocolError;
use cardduel_session::SessionError;
use cardduel_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CardDuelError {
    /// A transport-level error (bind, accept, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (match full, unknown seat).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A game-level error (bad deck, match not accepting players).
    #[error(transparent)]
    Game(#[from] GameError),

    /// The match task has stopped and takes no more requests.
    #[error("match is no longer running")]
    MatchClosed,
}
