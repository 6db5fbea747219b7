//! Error types for the game layer.

use cardduel_session::SessionError;

use crate::MatchState;

/// Why a deck upload was rejected. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    /// The line does not start with a copy count.
    #[error("line {line}: invalid copy count")]
    InvalidCount { line: usize },

    /// The line has a copy count but no card name after it.
    #[error("line {line}: missing card name")]
    MissingName { line: usize },

    /// The deck asks for more cards than a deck may hold.
    #[error("deck has more than {max} cards")]
    TooManyCards { max: u32 },

    /// The match has no card ids left to give these cards.
    #[error("no card ids left")]
    OutOfCardIds,
}

/// Errors that can occur during match operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Seating or looking up a player failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An uploaded deck did not parse.
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// The match has moved past seating players.
    #[error("match is {0}, not accepting players")]
    NotAccepting(MatchState),
}
