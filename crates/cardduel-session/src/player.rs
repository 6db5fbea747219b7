//! Player records: who sits in a seat and what they hold.
//!
//! A `Player` is the server's record of one seat. It tracks:
//! - WHO the player is (`PlayerId`, the seat number)
//! - WHICH connection carries their messages (`ConnectionId`)
//! - WHETHER they have uploaded a deck yet (`Readiness`)
//! - WHAT cards they hold in hand, deck and sideboard

use cardduel_protocol::{Card, PlayerId, PlayerInfo};
use cardduel_transport::ConnectionId;

use crate::{CardIdAllocator, SessionError};

// ---------------------------------------------------------------------------
// Readiness
// ---------------------------------------------------------------------------

/// Whether a player has uploaded a deck that parsed.
///
/// ```text
///   NotReady ──(deck upload parses)──→ Ready
/// ```
///
/// There is no way back: a failed upload leaves a `NotReady` player
/// `NotReady`, and a `Ready` player never uploads again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    #[default]
    NotReady,
    Ready,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One seated player.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub connection: ConnectionId,
    pub connected: bool,
    pub readiness: Readiness,
    pub hand: Vec<Card>,
    pub deck: Vec<Card>,
    pub sideboard: Vec<Card>,
}

impl Player {
    /// Seats a new player with the starting hand for their seat.
    ///
    /// # Errors
    /// Returns [`SessionError::IdsExhausted`] if the hand cannot be dealt.
    pub fn new(
        id: PlayerId,
        connection: ConnectionId,
        ids: &mut CardIdAllocator,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            id,
            connection,
            connected: true,
            readiness: Readiness::NotReady,
            hand: starting_hand(id, ids)?,
            deck: Vec::new(),
            sideboard: Vec::new(),
        })
    }

    /// Returns `true` once a deck has been accepted.
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Installs a parsed deck and marks the player ready.
    pub fn accept_deck(&mut self, deck: Vec<Card>, sideboard: Vec<Card>) {
        self.deck = deck;
        self.sideboard = sideboard;
        self.readiness = Readiness::Ready;
    }

    /// The private view sent only to this player.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            player_id: self.id,
            hand_cards: self.hand.clone(),
        }
    }
}

/// Builds the fixed opening hand for a seat.
///
/// Seat 0 opens with two Forests around a Mountain; seat 1 with Llanowar
/// Elves and a Forest. Hands will come from the uploaded deck once draws
/// exist. Every card takes a fresh id from `ids`.
///
/// # Errors
/// Returns [`SessionError::IdsExhausted`] if `ids` runs out.
pub fn starting_hand(
    id: PlayerId,
    ids: &mut CardIdAllocator,
) -> Result<Vec<Card>, SessionError> {
    let hand = match id.0 {
        0 => vec![
            Card::new(ids.next_id()?, "Forest"),
            Card::new(ids.next_id()?, "Mountain"),
            Card::new(ids.next_id()?, "Forest"),
        ],
        _ => vec![
            Card::new(ids.next_id()?, "Llanowar Elves").with_effect("Tap to add 1 green"),
            Card::new(ids.next_id()?, "Forest"),
        ],
    };
    Ok(hand)
}
