//! Error types for the session layer.

use cardduel_protocol::PlayerId;

/// Errors that can occur while seating or looking up players.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Both seats are taken. A third connection has nowhere to sit.
    #[error("match is full ({capacity} players)")]
    Full { capacity: usize },

    /// No player sits in the given seat.
    #[error("no player in seat {0}")]
    NotFound(PlayerId),

    /// Every card id has been handed out.
    #[error("card ids exhausted")]
    IdsExhausted,
}
