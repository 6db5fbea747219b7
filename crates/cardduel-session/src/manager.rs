//! The session manager: the two seats of a match.
//!
//! Responsible for:
//! - Seating players in arrival order (seat 0, then seat 1)
//! - Refusing anyone once both seats are taken
//! - Tracking who is still connected
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself. It is owned by the game
//! coordinator, which runs on a single task, so nothing here locks.

use cardduel_protocol::PlayerId;
use cardduel_transport::ConnectionId;

use crate::{CardIdAllocator, Player, SessionError};

/// How many players a match seats.
pub const MATCH_CAPACITY: usize = 2;

/// Owns every [`Player`] record, indexed by seat.
///
/// ```text
/// admit() ──→ [connected] ──disconnect()──→ [gone]
/// ```
///
/// A seat is never reused. Once a player disconnects the record stays
/// (so its hand can still be inspected) but it never comes back.
#[derive(Debug, Default)]
pub struct SessionManager {
    /// Seat `n` lives at index `n`.
    players: Vec<Player>,
}

impl SessionManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats the player arriving on `connection` in the next free seat and
    /// deals their starting hand from `ids`.
    ///
    /// # Errors
    /// - [`SessionError::Full`] if both seats are already taken
    /// - [`SessionError::IdsExhausted`] if the starting hand cannot be dealt
    pub fn admit(
        &mut self,
        connection: ConnectionId,
        ids: &mut CardIdAllocator,
    ) -> Result<PlayerId, SessionError> {
        if self.is_full() {
            return Err(SessionError::Full {
                capacity: MATCH_CAPACITY,
            });
        }

        // `len()` is at most 1 here, so the cast cannot truncate.
        let id = PlayerId(self.players.len() as u8);
        self.players.push(Player::new(id, connection, ids)?);

        tracing::info!(player_id = %id, conn_id = %connection, "player seated");
        Ok(id)
    }

    /// Looks up a player by seat.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Looks up a player by seat, mutably.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if nobody sits there.
    pub fn get_mut(&mut self, id: PlayerId) -> Result<&mut Player, SessionError> {
        self.players
            .get_mut(id.index())
            .ok_or(SessionError::NotFound(id))
    }

    /// Marks a player as gone.
    ///
    /// Returns `true` the first time a connected player is marked, and
    /// `false` if they were already gone or never seated. Callers use this
    /// to run departure handling exactly once.
    pub fn disconnect(&mut self, id: PlayerId) -> bool {
        match self.players.get_mut(id.index()) {
            Some(player) if player.connected => {
                player.connected = false;
                tracing::info!(player_id = %id, "player disconnected");
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if the player is seated and still connected.
    pub fn is_connected(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.connected)
    }

    /// Seats of every player still connected, in seat order.
    pub fn connected(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.connected)
            .map(|p| p.id)
            .collect()
    }

    /// Every seated player, connected or not.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns `true` once both seats have been taken.
    pub fn is_full(&self) -> bool {
        self.players.len() >= MATCH_CAPACITY
    }

    /// Returns the number of seated players (connected or not).
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if nobody has been seated.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
