//! Client-side view of the match.
//!
//! [`ClientSession`] is pure state: it never touches a socket. The network
//! task feeds it every inbound payload through [`receive`](ClientSession::receive)
//! and asks it to turn console input into a [`Command`] through
//! [`build_command`](ClientSession::build_command). Everything the player
//! should see is queued as a display line and drained by the caller.
//!
//! # Tracking priority
//!
//! The server never sends "you lost priority" as a flag, so the session
//! infers it from two sources:
//!
//! ```text
//! "You have priority"                       → true
//! text with a departure / relinquish marker → false
//! State message                             → priority == my player id
//! ```
//!
//! A state message always recomputes the flag, so a stale guess from text
//! lasts at most until the next broadcast.

use cardduel_protocol::{
    Card, Command, CommandCode, PlayerId, PlayerInfo, PublicState, ServerMessage, WireMessage,
};

use crate::ClientError;
use crate::deck::DeckSource;
use crate::input::ConsoleCommand;

/// Text the server sends to the priority holder.
pub const PRIORITY_GAINED: &str = "You have priority";

/// Fragments of server text that mean this client no longer holds
/// priority.
const PRIORITY_LOST_MARKERS: [&str; 3] = ["priority passed", "has left the game", "has resigned"];

/// Local mirror of what the server has told this player.
#[derive(Debug, Default)]
pub struct ClientSession {
    player_id: Option<PlayerId>,
    has_priority: bool,
    hand: Vec<Card>,
    public: Option<PublicState>,
    commands: Vec<CommandCode>,
    messages: Vec<String>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat assigned by the server, once its player info has arrived.
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn has_priority(&self) -> bool {
        self.has_priority
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// The most recent public state, if any has arrived.
    pub fn public_state(&self) -> Option<PublicState> {
        self.public
    }

    /// Commands the server last said are available.
    pub fn available_commands(&self) -> &[CommandCode] {
        &self.commands
    }

    /// Queues a line for display.
    pub fn push_message(&mut self, line: impl Into<String>) {
        self.messages.push(line.into());
    }

    /// Takes every queued display line, oldest first.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Handles one inbound payload and returns how it was classified.
    pub fn receive(&mut self, payload: &[u8]) -> ServerMessage {
        self.push_message(format!("Server: {}", String::from_utf8_lossy(payload)));

        let message = match ServerMessage::from_payload(payload) {
            Ok(message) => message,
            // Classification never fails; keep the raw text if it ever does.
            Err(_) => ServerMessage::Text(String::from_utf8_lossy(payload).into_owned()),
        };

        match &message {
            ServerMessage::Text(text) => self.on_text(text),
            ServerMessage::PlayerInfo(info) => self.on_player_info(info),
            ServerMessage::State(state) => self.on_state(*state),
            ServerMessage::Commands(codes) => {
                tracing::debug!(?codes, "available commands");
                self.commands = codes.clone();
            }
        }
        message
    }

    fn on_text(&mut self, text: &str) {
        if text == PRIORITY_GAINED {
            self.has_priority = true;
        } else if PRIORITY_LOST_MARKERS.iter().any(|m| text.contains(m)) {
            self.has_priority = false;
        }
    }

    fn on_player_info(&mut self, info: &PlayerInfo) {
        tracing::info!(player_id = %info.player_id, cards = info.hand_cards.len(), "seat assigned");
        self.player_id = Some(info.player_id);
        self.hand = info.hand_cards.clone();
        if let Some(state) = self.public {
            self.has_priority = state.priority == info.player_id;
        }
    }

    fn on_state(&mut self, state: PublicState) {
        self.public = Some(state);
        if let Some(me) = self.player_id {
            self.has_priority = state.priority == me;
        }
    }

    /// Turns a console command into a wire command.
    ///
    /// Uploading reads the deck through `decks` first and reports the
    /// outcome as a display line.
    ///
    /// # Errors
    /// - [`ClientError::DeckLoad`] if the deck cannot be loaded
    /// - [`ClientError::NoPriority`] if the command needs priority and
    ///   this client does not hold it
    pub fn build_command<D: DeckSource + ?Sized>(
        &mut self,
        input: ConsoleCommand,
        decks: &D,
    ) -> Result<Command, ClientError> {
        let command = match input {
            ConsoleCommand::Upload(path) => match decks.load(&path) {
                Ok(text) => {
                    self.push_message("Deck loaded successfully");
                    Command::new(CommandCode::UploadDeck).with_target(text)
                }
                Err(e) => {
                    self.push_message(e.to_string());
                    return Err(e);
                }
            },
            ConsoleCommand::Pass => Command::new(CommandCode::PassPriority),
            ConsoleCommand::Play(card) => Command::new(CommandCode::PlayCard).with_target(card),
            ConsoleCommand::Resign => Command::new(CommandCode::Resign),
            ConsoleCommand::Quit => Command::new(CommandCode::Quit),
        };

        self.check(&command)?;
        Ok(command)
    }

    /// Rejects commands that would be refused for lack of priority.
    /// Resign and quit are always allowed.
    pub fn check(&self, command: &Command) -> Result<(), ClientError> {
        if self.has_priority || command.code.ends_match() {
            Ok(())
        } else {
            Err(ClientError::NoPriority(command.code))
        }
    }
}
