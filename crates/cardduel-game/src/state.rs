//! The shared, public half of the match state.

use cardduel_protocol::{PlayerId, PublicState};
use cardduel_session::CardIdAllocator;

use crate::MatchConfig;

/// Everything both players may see, plus the match-wide card id counter.
///
/// Owned by the [`GameCoordinator`](crate::GameCoordinator) and changed
/// only by it. Clients receive a [`PublicState`] copy after every change.
#[derive(Debug)]
pub struct PublicInfo {
    pub turn: PlayerId,
    pub priority: PlayerId,
    pub life_points: [i32; 2],
    pub card_ids: CardIdAllocator,
}

impl PublicInfo {
    /// Fresh state: seat 0 holds turn and priority, both at full life.
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            turn: PlayerId(0),
            priority: PlayerId(0),
            life_points: [config.starting_life; 2],
            card_ids: CardIdAllocator::new(),
        }
    }

    /// Hands priority to the other seat and returns the new holder.
    pub fn pass_priority(&mut self) -> PlayerId {
        self.priority = self.priority.opponent();
        self.priority
    }

    /// The wire view of this state.
    pub fn snapshot(&self) -> PublicState {
        PublicState {
            turn: self.turn,
            priority: self.priority,
            life_points: self.life_points,
        }
    }
}
