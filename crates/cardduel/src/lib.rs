//! # CardDuel
//!
//! Authoritative server for a two-player networked card duel.
//!
//! The server seats two players over TCP, hands each a private view of
//! their cards, and arbitrates priority: only the player holding priority
//! may act, and either player may resign at any time. Each layer lives in
//! its own crate:
//!
//! - `cardduel-transport`: length-prefixed frames over TCP
//! - `cardduel-protocol`: commands and server messages as JSON payloads
//! - `cardduel-session`: seats, hands and card ids
//! - `cardduel-game`: deck parsing and the match coordinator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardduel::prelude::*;
//!
//! # async fn start() -> Result<(), CardDuelError> {
//! let server = DuelServer::builder().bind("0.0.0.0:5000").build().await?;
//! server.run().await
//! # }
//! ```

mod actor;
mod error;
mod handler;
mod server;

pub use error::CardDuelError;
pub use server::{DEFAULT_BIND_ADDR, DuelServer, DuelServerBuilder};

/// Everything needed to run a server and talk to it.
pub mod prelude {
    pub use crate::{CardDuelError, DEFAULT_BIND_ADDR, DuelServer, DuelServerBuilder};
    pub use cardduel_game::{MatchConfig, MatchState};
    pub use cardduel_protocol::{
        Card, CardId, Command, CommandCode, PlayerId, PlayerInfo, PublicState, ServerMessage,
        WireMessage,
    };
}
