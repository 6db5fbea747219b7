//! Match rules and coordination for CardDuel.
//!
//! This crate is the authority over a match:
//!
//! - **Deck parsing** ([`parse_deck`]) — uploaded text → main deck and
//!   sideboard
//! - **Match state** ([`MatchState`], [`PublicInfo`]) — lifecycle, turn,
//!   priority, life totals
//! - **Rules** ([`rules`]) — which commands a player may send and the
//!   texts sent back
//! - **Coordinator** ([`GameCoordinator`]) — turns admissions, frames and
//!   disconnects into routed [`Outbound`] effects
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)        ← owns connections, routes Deliveries to them
//!     ↕
//! Game Layer (this crate)  ← decides what happens
//!     ↕
//! Session / Protocol (below)
//! ```

mod config;
mod coordinator;
mod deck;
mod error;
pub mod rules;
mod state;

pub use config::{MatchConfig, MatchState};
pub use coordinator::{Delivery, GameCoordinator, Outbound};
pub use deck::{Deck, MAX_COPIES, MAX_DECK_CARDS, parse_deck, summarize};
pub use error::{DeckError, GameError};
pub use state::PublicInfo;
