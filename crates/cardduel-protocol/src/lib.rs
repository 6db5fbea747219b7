//! Wire protocol for CardDuel.
//!
//! This crate defines the "language" clients and the server speak:
//!
//! - **Types** ([`Command`], [`ServerMessage`], [`Card`], ...) — what
//!   travels on the wire.
//! - **Codec** ([`WireMessage`], [`encode`], [`decode`]) — how those
//!   messages become frame payloads and framed bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (Command / ServerMessage) → Game
//! ```
//!
//! The protocol layer knows nothing about connections or match state.

mod codec;
mod error;
mod types;

pub use codec::{WireMessage, decode, encode};
pub use error::ProtocolError;
pub use types::{
    Card, CardId, Command, CommandCode, PlayerId, PlayerInfo, PublicState, Recipient,
    ServerMessage,
};
