//! Transport layer for CardDuel.
//!
//! Moves length-prefixed frames over TCP. Nothing here knows what a
//! frame contains; that is the protocol crate's job.
//!
//! - [`frame`] — the 4-byte big-endian length prefix and the
//!   [`FrameReader`] header/body state machine
//! - [`TcpTransport`] / [`TcpConnection`] — listening and connecting
//! - [`FrameSender`] — serialized, fire-and-forget outbound writes

#![allow(async_fn_in_trait)]

mod error;
pub mod frame;
mod tcp;

pub use error::TransportError;
pub use frame::{FrameReader, HEADER_LEN, MAX_FRAME_LEN, ReadState};
pub use tcp::{FrameSender, TcpConnection, TcpTransport, spawn_writer};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops accepting. Later connection attempts are refused.
    async fn shutdown(&mut self) -> Result<(), Self::Error>;
}
