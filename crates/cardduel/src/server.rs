//! `DuelServer` builder and server loop.
//!
//! This is the entry point for running a CardDuel match server. It ties
//! the layers together: transport → match actor → game coordinator.

use cardduel_game::MatchConfig;
use cardduel_session::MATCH_CAPACITY;
use cardduel_transport::{TcpTransport, Transport};

use crate::CardDuelError;
use crate::actor::spawn_match;
use crate::handler::read_loop;

/// Address the server listens on unless told otherwise.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Builder for configuring and starting a CardDuel server.
///
/// # Example
///
/// ```rust,no_run
/// use cardduel::prelude::*;
///
/// # async fn start() -> Result<(), CardDuelError> {
/// let server = DuelServer::builder()
///     .bind("127.0.0.1:5000")
///     .match_config(MatchConfig { starting_life: 20 })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DuelServerBuilder {
    bind_addr: String,
    match_config: MatchConfig,
}

impl DuelServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            match_config: MatchConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the match configuration.
    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Binds the listener.
    ///
    /// # Errors
    /// Returns [`CardDuelError::Transport`] if the address cannot be bound.
    pub async fn build(self) -> Result<DuelServer, CardDuelError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;
        Ok(DuelServer {
            transport,
            match_config: self.match_config,
        })
    }
}

impl Default for DuelServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound CardDuel server, ready to host one match.
///
/// Call [`run()`](Self::run) to start accepting players.
pub struct DuelServer {
    transport: TcpTransport,
    match_config: MatchConfig,
}

impl DuelServer {
    /// Creates a new builder.
    pub fn builder() -> DuelServerBuilder {
        DuelServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Hosts one match from first connection to last disconnect.
    ///
    /// Accepts connections until both seats are filled, then stops
    /// listening so further attempts are refused. Returns once the match
    /// has ended and every player has gone, or early if the match ends
    /// before the second player arrives.
    ///
    /// # Errors
    /// Returns [`CardDuelError::Transport`] if the listener cannot be
    /// shut down.
    pub async fn run(mut self) -> Result<(), CardDuelError> {
        tracing::info!("CardDuel server running, waiting for players");

        let (handle, mut actor) = spawn_match(self.match_config.clone());
        let mut seated = 0;

        while seated < MATCH_CAPACITY {
            tokio::select! {
                accepted = self.transport.accept() => {
                    let conn = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::error!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    let conn_id = conn.id();
                    let peer = conn.peer_addr();
                    let (reader, sender) = conn.into_parts();

                    match handle.join(conn_id, sender.clone()).await {
                        Ok(player) => {
                            tracing::info!(player_id = %player, %conn_id, %peer, "player connected");
                            tokio::spawn(read_loop(player, reader, sender, handle.clone()));
                            seated += 1;
                        }
                        Err(e) => {
                            tracing::warn!(%conn_id, error = %e, "could not seat connection");
                        }
                    }
                }
                _ = &mut actor => {
                    tracing::info!("match ended before both seats were filled");
                    self.transport.shutdown().await?;
                    return Ok(());
                }
            }
        }

        self.transport.shutdown().await?;

        if let Err(e) = actor.await {
            tracing::error!(error = %e, "match task failed");
        }
        tracing::info!("match over, server stopping");
        Ok(())
    }
}
