//! Console client for CardDuel.
//!
//! The client is deliberately thin: the server decides everything, and
//! the client only mirrors what it is told. It tracks whether it holds
//! priority so that commands the server would refuse are stopped before
//! they are sent.
//!
//! - [`ClientSession`]: inbound messages → local state and display lines
//! - [`parse_console`]: typed lines → [`ConsoleCommand`]
//! - [`DeckSource`]: where `upload <path>` reads deck text from
//! - [`DuelClient`]: owns the connection and runs the session

mod client;
mod deck;
mod error;
mod input;
mod session;

pub use client::{DEFAULT_SERVER_ADDR, DuelClient};
pub use deck::{DeckSource, FsDeckSource};
pub use error::ClientError;
pub use input::{ConsoleCommand, parse_console};
pub use session::{ClientSession, PRIORITY_GAINED};
