//! The game coordinator: the authority over one match.
//!
//! The coordinator owns every piece of mutable match state (seats, public
//! info, the match state machine) and is driven by three kinds of input:
//!
//! - [`admit`](GameCoordinator::admit): a new connection wants a seat
//! - [`handle_frame`](GameCoordinator::handle_frame): a seated player
//!   sent a frame
//! - [`handle_disconnect`](GameCoordinator::handle_disconnect): a seated
//!   player's connection went away
//!
//! It never touches a socket. Each call returns the messages to deliver
//! as `(Recipient, Outbound)` pairs, and the caller routes them to
//! connections. That keeps the whole priority state machine testable
//! without a network, and keeps all mutation on whichever single task
//! owns the coordinator.
//!
//! # Command pipeline
//!
//! ```text
//! frame ──decode──→ Command
//!   │ (bad JSON → "Invalid command format")
//!   ▼
//! match ended?            → "The game is over"
//! resign / quit?          → end the match (any player, any time)
//! still waiting?          → "Waiting for opponent"
//! sender lacks priority?  → "You do not have priority"
//!   ▼
//! NotReady: upload → parse deck    anything else → "must upload"
//! Ready:    pass   → rotate        anything else → "unknown command"
//!   ▼
//! reply to sender, broadcast state, re-notify the priority holder
//! ```

use cardduel_protocol::{
    Command, CommandCode, PlayerId, PublicState, Recipient, ServerMessage, WireMessage,
};
use cardduel_session::{Readiness, SessionManager};
use cardduel_transport::ConnectionId;

use crate::deck::{parse_deck, summarize};
use crate::rules::{self, legal_commands};
use crate::{GameError, MatchConfig, MatchState, PublicInfo};

/// What to do with a recipient's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send this message.
    Message(ServerMessage),
    /// Flush what is queued, then close the connection.
    Close,
}

/// One routed effect produced by the coordinator.
pub type Delivery = (Recipient, Outbound);

fn to(player: PlayerId, message: ServerMessage) -> Delivery {
    (Recipient::Player(player), Outbound::Message(message))
}

fn text_to(player: PlayerId, text: impl Into<String>) -> Delivery {
    to(player, ServerMessage::text(text))
}

fn broadcast(message: ServerMessage) -> Delivery {
    (Recipient::All, Outbound::Message(message))
}

/// Owns and drives one two-player match.
#[derive(Debug)]
pub struct GameCoordinator {
    state: MatchState,
    info: PublicInfo,
    sessions: SessionManager,
}

impl GameCoordinator {
    /// Creates a coordinator waiting for its first player.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            state: MatchState::WaitingForPlayers,
            info: PublicInfo::new(&config),
            sessions: SessionManager::new(),
        }
    }

    /// Current match state.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Shared public info, including the card id counter.
    pub fn public_info(&self) -> &PublicInfo {
        &self.info
    }

    /// The wire view of the public info.
    pub fn public_state(&self) -> PublicState {
        self.info.snapshot()
    }

    /// The seats of this match.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Returns `true` once the match has ended and nobody is left
    /// connected. Nothing more can happen after that.
    pub fn is_finished(&self) -> bool {
        self.state == MatchState::Ended && self.sessions.connected().is_empty()
    }

    // -----------------------------------------------------------------
    // Admission
    // -----------------------------------------------------------------

    /// Seats the player arriving on `connection`.
    ///
    /// The first player is told to wait. The second completes the table:
    /// the match moves to `DeckUpload`, both players get the public state
    /// and their private info, and seat 0 is told it has priority.
    ///
    /// # Errors
    /// - [`GameError::NotAccepting`] once the match is past seating
    /// - [`GameError::Session`] if both seats are taken
    pub fn admit(
        &mut self,
        connection: ConnectionId,
    ) -> Result<(PlayerId, Vec<Delivery>), GameError> {
        if self.state != MatchState::WaitingForPlayers {
            return Err(GameError::NotAccepting(self.state));
        }

        let id = self.sessions.admit(connection, &mut self.info.card_ids)?;

        if !self.sessions.is_full() {
            return Ok((id, vec![text_to(id, rules::WAITING_FOR_OPPONENT)]));
        }

        self.transition(MatchState::DeckUpload);
        Ok((id, self.start_match()))
    }

    fn start_match(&self) -> Vec<Delivery> {
        tracing::info!("match starting");
        let mut out = vec![broadcast(ServerMessage::State(self.info.snapshot()))];
        for player in self.sessions.players() {
            out.push(to(player.id, ServerMessage::PlayerInfo(player.info())));
        }
        out.extend(self.notify_priority());
        out
    }

    /// Tells the priority holder what they may do, then that they may do it.
    fn notify_priority(&self) -> Vec<Delivery> {
        let holder = self.info.priority;
        let Some(player) = self.sessions.get(holder).filter(|p| p.connected) else {
            return Vec::new();
        };

        tracing::info!(player_id = %holder, "player has priority");
        vec![
            to(
                holder,
                ServerMessage::Commands(legal_commands(self.state, player.readiness)),
            ),
            text_to(holder, rules::YOU_HAVE_PRIORITY),
        ]
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Decodes one frame from `from` and handles the command in it.
    ///
    /// A payload that is not a valid command is answered with
    /// `"Invalid command format"` and changes nothing.
    pub fn handle_frame(&mut self, from: PlayerId, payload: &[u8]) -> Vec<Delivery> {
        if !self.sessions.is_connected(from) {
            return Vec::new();
        }

        match Command::from_payload(payload) {
            Ok(command) => self.handle_command(from, command),
            Err(e) => {
                tracing::debug!(player_id = %from, error = %e, "undecodable command");
                vec![text_to(from, rules::INVALID_FORMAT)]
            }
        }
    }

    /// Handles one decoded command from `from`.
    pub fn handle_command(&mut self, from: PlayerId, command: Command) -> Vec<Delivery> {
        if !self.sessions.is_connected(from) {
            return Vec::new();
        }
        tracing::info!(player_id = %from, %command, "received command");

        if self.state == MatchState::Ended {
            return vec![text_to(from, rules::GAME_OVER)];
        }
        if command.code.ends_match() {
            return self.end_match(from);
        }
        if self.state == MatchState::WaitingForPlayers {
            return vec![text_to(from, rules::WAITING_FOR_OPPONENT)];
        }
        if from != self.info.priority {
            tracing::debug!(player_id = %from, "command without priority rejected");
            return vec![text_to(from, rules::NOT_YOUR_PRIORITY)];
        }

        let response = self.process(from, &command);

        let mut out = vec![text_to(from, response)];
        out.push(broadcast(ServerMessage::State(self.info.snapshot())));
        out.extend(self.notify_priority());
        out
    }

    /// Applies a command from the priority holder. Returns the reply text.
    fn process(&mut self, from: PlayerId, command: &Command) -> String {
        let Some(readiness) = self.sessions.get(from).map(|p| p.readiness) else {
            return rules::UNKNOWN_COMMAND.into();
        };

        match (readiness, command.code) {
            (Readiness::NotReady, CommandCode::UploadDeck) => {
                match self.upload_deck(from, &command.target) {
                    Ok(()) => rules::DECK_ACCEPTED.into(),
                    Err(e) => {
                        tracing::debug!(player_id = %from, error = %e, "deck rejected");
                        rules::deck_rejected(e)
                    }
                }
            }
            (Readiness::NotReady, _) => rules::MUST_UPLOAD_DECK.into(),
            (Readiness::Ready, CommandCode::PassPriority) => {
                let holder = self.info.pass_priority();
                tracing::info!(from = %from, to = %holder, "priority passed");
                rules::PRIORITY_PASSED.into()
            }
            (Readiness::Ready, _) => rules::UNKNOWN_COMMAND.into(),
        }
    }

    fn upload_deck(&mut self, from: PlayerId, text: &str) -> Result<(), GameError> {
        let deck = parse_deck(text, &mut self.info.card_ids)?;
        tracing::debug!(
            player_id = %from,
            main = ?summarize(&deck.main),
            sideboard = ?summarize(&deck.sideboard),
            "deck uploaded"
        );

        self.sessions
            .get_mut(from)?
            .accept_deck(deck.main, deck.sideboard);
        tracing::info!(player_id = %from, "player ready");

        let all_ready = self.sessions.players().iter().all(|p| p.is_ready());
        if all_ready && self.state == MatchState::DeckUpload {
            self.transition(MatchState::InProgress);
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Leaving
    // -----------------------------------------------------------------

    /// Handles `player`'s connection going away.
    ///
    /// Runs once per player: a second call, or a call for a player the
    /// coordinator already closed, returns nothing. Leaving a live match
    /// counts as resigning.
    pub fn handle_disconnect(&mut self, player: PlayerId) -> Vec<Delivery> {
        if !self.sessions.disconnect(player) {
            return Vec::new();
        }
        if self.state == MatchState::Ended {
            return Vec::new();
        }

        let mut out = vec![broadcast(ServerMessage::Text(rules::left_notice(player)))];
        out.extend(self.end_match(player));
        out
    }

    /// Ends the match because of `loser`, and closes everyone else.
    fn end_match(&mut self, loser: PlayerId) -> Vec<Delivery> {
        self.transition(MatchState::Ended);
        tracing::info!(player_id = %loser, "player resigned, match over");

        for id in self.sessions.connected() {
            if id != loser {
                self.sessions.disconnect(id);
            }
        }

        vec![
            broadcast(ServerMessage::Text(rules::resigned_notice(loser))),
            (Recipient::AllExcept(loser), Outbound::Close),
        ]
    }

    fn transition(&mut self, target: MatchState) {
        if self.state.can_transition_to(target) {
            tracing::info!(from = %self.state, to = %target, "match state changed");
            self.state = target;
        } else {
            tracing::warn!(from = %self.state, to = %target, "invalid match state transition");
        }
    }
}
