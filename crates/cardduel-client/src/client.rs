//! The client's network task.
//!
//! [`DuelClient`] owns the server connection and the [`ClientSession`].
//! Console lines arrive on one channel and display lines leave on another,
//! so whatever drives the terminal (a stdin thread, a test) never touches
//! the socket itself.
//!
//! Frames are read by a separate task and forwarded over a channel.
//! `FrameReader::next_frame` keeps partial progress in the reader, and
//! dropping it halfway through a frame would lose bytes, so it is never
//! raced against console input directly.

use cardduel_protocol::{Command, CommandCode, WireMessage};
use cardduel_transport::{FrameSender, TcpConnection};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ClientError;
use crate::deck::DeckSource;
use crate::input::{ConsoleCommand, parse_console};
use crate::session::ClientSession;

/// Address the client connects to unless told otherwise.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:5000";

/// A connected CardDuel client.
pub struct DuelClient<D> {
    session: ClientSession,
    sender: FrameSender,
    frames: mpsc::UnboundedReceiver<Vec<u8>>,
    reader: JoinHandle<()>,
    decks: D,
}

/// What the run loop should do after handling a console line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

impl<D: DeckSource> DuelClient<D> {
    /// Connects to the server at `addr`.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] if the connection cannot be made.
    pub async fn connect(addr: &str, decks: D) -> Result<Self, ClientError> {
        let conn = TcpConnection::connect(addr).await?;
        tracing::info!(peer = %conn.peer_addr(), conn_id = %conn.id(), "connected to server");

        let (mut reader, sender) = conn.into_parts();
        let (tx, frames) = mpsc::unbounded_channel();
        let reader = tokio::spawn(async move {
            loop {
                match reader.next_frame().await {
                    Ok(frame) => {
                        if tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "read ended");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            session: ClientSession::new(),
            sender,
            frames,
            reader,
            decks,
        })
    }

    /// Runs until the user quits or the server goes away.
    ///
    /// Each entry on `lines` is one console line. Everything the player
    /// should see is sent on `display`. Closing `lines` counts as quitting.
    ///
    /// # Errors
    /// Returns [`ClientError::Protocol`] if an outgoing command cannot be
    /// encoded.
    pub async fn run(
        mut self,
        mut lines: mpsc::UnboundedReceiver<String>,
        display: mpsc::UnboundedSender<String>,
    ) -> Result<(), ClientError> {
        let result = loop {
            tokio::select! {
                frame = self.frames.recv() => match frame {
                    Some(payload) => {
                        self.session.receive(&payload);
                    }
                    None => {
                        tracing::info!("server closed the connection");
                        self.session.push_message("Disconnected from server");
                        break Ok(());
                    }
                },
                line = lines.recv() => {
                    let flow = match line {
                        Some(line) => self.handle_line(&line),
                        None => self.quit(),
                    };
                    match flow {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break Ok(()),
                        Err(e) => break Err(e),
                    }
                }
            }
            self.flush(&display);
        };

        self.flush(&display);
        self.sender.close();
        self.sender.closed().await;
        self.reader.abort();
        result
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, ClientError> {
        let input = match parse_console(line) {
            Ok(input) => input,
            Err(text) => {
                self.session.push_message(format!("Unknown command: {text}"));
                return Ok(Flow::Continue);
            }
        };
        let quitting = input == ConsoleCommand::Quit;

        match self.session.build_command(input, &self.decks) {
            Ok(command) => self.send(&command)?,
            // Already reported by the session.
            Err(ClientError::DeckLoad { .. }) => {}
            Err(e @ ClientError::NoPriority(_)) => self.session.push_message(e.to_string()),
            Err(e) => return Err(e),
        }

        Ok(if quitting { Flow::Quit } else { Flow::Continue })
    }

    fn quit(&mut self) -> Result<Flow, ClientError> {
        self.send(&Command::new(CommandCode::Quit))?;
        Ok(Flow::Quit)
    }

    /// Queues `command` for the server and echoes it to the display.
    fn send(&mut self, command: &Command) -> Result<(), ClientError> {
        let payload = command.to_payload()?;
        match self.sender.send(&payload) {
            Ok(()) => {
                tracing::debug!(%command, "command sent");
                self.session.push_message(format!("Command sent: {command}"));
            }
            Err(e) => {
                tracing::debug!(error = %e, "send failed");
                self.session.push_message(ClientError::NotConnected.to_string());
            }
        }
        Ok(())
    }

    fn flush(&mut self, display: &mpsc::UnboundedSender<String>) {
        for line in self.session.drain_messages() {
            let _ = display.send(line);
        }
    }
}
