//! Which commands a player may send, and what the server says back.
//!
//! The legal command set is a pure function of match state and the
//! player's readiness, so it can be checked without a coordinator.

use cardduel_protocol::{CommandCode, PlayerId};
use cardduel_session::Readiness;

use crate::MatchState;

pub const YOU_HAVE_PRIORITY: &str = "You have priority";
pub const NOT_YOUR_PRIORITY: &str = "You do not have priority";
pub const MUST_UPLOAD_DECK: &str = "You must upload a deck first";
pub const DECK_ACCEPTED: &str = "Deck uploaded successfully";
pub const PRIORITY_PASSED: &str = "Your priority passed to your opponent";
pub const UNKNOWN_COMMAND: &str = "Unknown command";
pub const INVALID_FORMAT: &str = "Invalid command format";
pub const WAITING_FOR_OPPONENT: &str = "Waiting for opponent to connect";
pub const GAME_OVER: &str = "The game is over";

/// The commands to advertise to a player.
///
/// Resign and quit are always accepted but never listed.
pub fn legal_commands(state: MatchState, readiness: Readiness) -> Vec<CommandCode> {
    if !state.is_active() {
        return Vec::new();
    }
    match readiness {
        Readiness::NotReady => vec![CommandCode::UploadDeck],
        Readiness::Ready => vec![CommandCode::PlayCard, CommandCode::PassPriority],
    }
}

/// `"Player <n> has left the game"`.
pub fn left_notice(player: PlayerId) -> String {
    format!("Player {} has left the game", player.0)
}

/// `"Player <n> has resigned. Game over."`.
pub fn resigned_notice(player: PlayerId) -> String {
    format!("Player {} has resigned. Game over.", player.0)
}

/// Reply to an upload that did not parse.
pub fn deck_rejected(reason: impl std::fmt::Display) -> String {
    format!("Deck upload failed: {reason}")
}
