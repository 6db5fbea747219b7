//! Player session management for CardDuel.
//!
//! This crate tracks the two seats of a match:
//!
//! 1. **Admission** — handing out seats 0 and 1 in arrival order
//!    ([`SessionManager::admit`])
//! 2. **Player records** — hand, deck, sideboard and readiness per seat
//!    ([`Player`])
//! 3. **Card ids** — the match-wide counter every card draws its id from
//!    ([`CardIdAllocator`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Game Layer (above)     ← owns a SessionManager, decides what players may do
//!     ↕
//! Session Layer (this crate)  ← who is seated, what they hold
//!     ↕
//! Protocol Layer (below) ← provides PlayerId, Card, CardId
//! ```

mod error;
mod ids;
mod manager;
mod player;

pub use error::SessionError;
pub use ids::CardIdAllocator;
pub use manager::{MATCH_CAPACITY, SessionManager};
pub use player::{Player, Readiness, starting_hand};
