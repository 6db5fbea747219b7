//! Match actor: the one task that owns the game coordinator.
//!
//! Reader tasks and the accept loop never touch match state. They send a
//! [`MatchCommand`] through the actor's channel, and the actor applies it
//! to its [`GameCoordinator`] and routes the resulting deliveries to each
//! player's [`FrameSender`]. All mutation happens on this task, so nothing
//! is locked.

use std::collections::BTreeMap;

use cardduel_game::{Delivery, GameCoordinator, GameError, MatchConfig, Outbound};
use cardduel_protocol::{PlayerId, WireMessage};
use cardduel_transport::{ConnectionId, FrameSender};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::CardDuelError;

/// Requests the outside world can make of the match actor.
pub(crate) enum MatchCommand {
    /// Seat the player on a new connection.
    Join {
        connection: ConnectionId,
        sender: FrameSender,
        reply: oneshot::Sender<Result<PlayerId, GameError>>,
    },

    /// A frame arrived from a seated player.
    Frame { player: PlayerId, payload: Vec<u8> },

    /// A seated player's reader stopped.
    Disconnected { player: PlayerId },
}

/// Handle to the running match actor.
///
/// Cheap to clone: it wraps an `mpsc::UnboundedSender`. The accept loop
/// holds one and every reader task holds a clone.
#[derive(Clone)]
pub(crate) struct MatchHandle {
    sender: mpsc::UnboundedSender<MatchCommand>,
}

impl MatchHandle {
    /// Asks the actor to seat the player on `connection`.
    pub(crate) async fn join(
        &self,
        connection: ConnectionId,
        sender: FrameSender,
    ) -> Result<PlayerId, CardDuelError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Join {
                connection,
                sender,
                reply,
            })
            .map_err(|_| CardDuelError::MatchClosed)?;

        let seated = rx.await.map_err(|_| CardDuelError::MatchClosed)?;
        Ok(seated?)
    }

    /// Forwards a frame. Returns `false` if the actor has stopped.
    pub(crate) fn frame(&self, player: PlayerId, payload: Vec<u8>) -> bool {
        self.sender
            .send(MatchCommand::Frame { player, payload })
            .is_ok()
    }

    /// Reports that `player`'s reader has stopped.
    pub(crate) fn disconnected(&self, player: PlayerId) {
        let _ = self.sender.send(MatchCommand::Disconnected { player });
    }
}

struct MatchActor {
    game: GameCoordinator,
    /// Open connections by seat. A seat leaves this map when its
    /// connection is closed, by either side.
    senders: BTreeMap<PlayerId, FrameSender>,
    receiver: mpsc::UnboundedReceiver<MatchCommand>,
}

impl MatchActor {
    /// Processes commands until the match is over and everyone has left.
    async fn run(mut self) {
        tracing::info!("match actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                MatchCommand::Join {
                    connection,
                    sender,
                    reply,
                } => self.handle_join(connection, sender, reply),
                MatchCommand::Frame { player, payload } => {
                    tracing::debug!(player_id = %player, len = payload.len(), "frame received");
                    let out = self.game.handle_frame(player, &payload);
                    self.dispatch(out);
                }
                MatchCommand::Disconnected { player } => {
                    if let Some(sender) = self.senders.remove(&player) {
                        sender.close();
                    }
                    let out = self.game.handle_disconnect(player);
                    self.dispatch(out);
                }
            }

            if self.game.is_finished() {
                break;
            }
        }

        tracing::info!(state = %self.game.state(), "match actor stopped");
    }

    fn handle_join(
        &mut self,
        connection: ConnectionId,
        sender: FrameSender,
        reply: oneshot::Sender<Result<PlayerId, GameError>>,
    ) {
        match self.game.admit(connection) {
            Ok((player, out)) => {
                self.senders.insert(player, sender);
                let _ = reply.send(Ok(player));
                self.dispatch(out);
            }
            Err(e) => {
                tracing::warn!(conn_id = %connection, error = %e, "connection refused a seat");
                sender.close();
                let _ = reply.send(Err(e));
            }
        }
    }

    /// Routes coordinator deliveries to the open connections they name.
    fn dispatch(&mut self, out: Vec<Delivery>) {
        for (recipient, action) in out {
            let targets: Vec<PlayerId> = self
                .senders
                .keys()
                .copied()
                .filter(|p| recipient.includes(*p))
                .collect();

            match action {
                Outbound::Message(message) => {
                    let payload = match message.to_payload() {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to encode server message");
                            continue;
                        }
                    };
                    for player in targets {
                        self.send_to(player, &payload);
                    }
                }
                Outbound::Close => {
                    for player in targets {
                        if let Some(sender) = self.senders.remove(&player) {
                            tracing::info!(player_id = %player, "closing connection");
                            sender.close();
                        }
                    }
                }
            }
        }
    }

    /// Sends one payload. Silently drops it if the writer is gone; the
    /// reader will report the disconnect.
    fn send_to(&self, player: PlayerId, payload: &[u8]) {
        let Some(sender) = self.senders.get(&player) else {
            return;
        };
        if let Err(e) = sender.send(payload) {
            tracing::debug!(player_id = %player, error = %e, "send failed");
        }
    }
}

/// Spawns the match actor and returns a handle to it plus its task.
///
/// The task completes once the match has ended and every player has
/// disconnected.
pub(crate) fn spawn_match(config: MatchConfig) -> (MatchHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let actor = MatchActor {
        game: GameCoordinator::new(config),
        senders: BTreeMap::new(),
        receiver: rx,
    };

    let task = tokio::spawn(actor.run());
    (MatchHandle { sender: tx }, task)
}
