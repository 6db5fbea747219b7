//! Match configuration and state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MatchConfig
// ---------------------------------------------------------------------------

/// Configuration for one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Life total each player starts with.
    pub starting_life: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { starting_life: 20 }
    }
}

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// The lifecycle state of a match.
///
/// The forward path is strictly ordered. Resignation or disconnect may
/// cut straight to `Ended` from anywhere:
///
/// ```text
/// WaitingForPlayers → DeckUpload → InProgress → Ended
///         │                │                      ↑
///         └────────────────┴──(resign / leave)────┘
/// ```
///
/// - **WaitingForPlayers**: fewer than two players seated.
/// - **DeckUpload**: both seated, at least one has not uploaded a deck.
/// - **InProgress**: both players are ready.
/// - **Ended**: someone resigned, quit or disconnected. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    WaitingForPlayers,
    DeckUpload,
    InProgress,
    Ended,
}

impl MatchState {
    /// Returns `true` once both players are seated and the match has not
    /// ended.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::DeckUpload | Self::InProgress)
    }

    /// The next state on the forward path, or `None` from `Ended`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::WaitingForPlayers => Some(Self::DeckUpload),
            Self::DeckUpload => Some(Self::InProgress),
            Self::InProgress => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    /// Returns `true` if moving to `target` is allowed.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target) || (target == Self::Ended && self != Self::Ended)
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::DeckUpload => write!(f, "DeckUpload"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_state_next_follows_strict_order() {
        assert_eq!(MatchState::WaitingForPlayers.next(), Some(MatchState::DeckUpload));
        assert_eq!(MatchState::DeckUpload.next(), Some(MatchState::InProgress));
        assert_eq!(MatchState::InProgress.next(), Some(MatchState::Ended));
        assert_eq!(MatchState::Ended.next(), None);
    }

    #[test]
    fn test_match_state_can_transition_to() {
        assert!(MatchState::WaitingForPlayers.can_transition_to(MatchState::DeckUpload));
        assert!(!MatchState::WaitingForPlayers.can_transition_to(MatchState::InProgress));
        assert!(!MatchState::InProgress.can_transition_to(MatchState::DeckUpload));
    }

    #[test]
    fn test_match_state_any_live_state_can_end() {
        assert!(MatchState::WaitingForPlayers.can_transition_to(MatchState::Ended));
        assert!(MatchState::DeckUpload.can_transition_to(MatchState::Ended));
        assert!(!MatchState::Ended.can_transition_to(MatchState::Ended));
    }

    #[test]
    fn test_match_state_is_active() {
        assert!(!MatchState::WaitingForPlayers.is_active());
        assert!(MatchState::DeckUpload.is_active());
        assert!(MatchState::InProgress.is_active());
        assert!(!MatchState::Ended.is_active());
    }

    #[test]
    fn test_match_config_default_life() {
        assert_eq!(MatchConfig::default().starting_life, 20);
    }
}
