//! Core protocol types for CardDuel's wire format.
//!
//! Every type here either travels on the wire as JSON or describes where
//! a wire message should go. The JSON shapes are fixed: clients written
//! against them tell messages apart by which keys are present, not by a
//! type tag, so renaming a field is a breaking change.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's seat in the match: `0` or `1`.
///
/// `#[serde(transparent)]` makes `PlayerId(1)` serialize as plain `1`,
/// which is what the `player_id`, `turn` and `priority` fields carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Returns the seat as an index into per-player arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the opposing seat in a two-player match.
    pub fn opponent(self) -> Self {
        Self((self.0 + 1) % 2)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A card identifier, unique across both players for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A single card instance.
///
/// `cmc` stays `0` until some card-data source fills it in. It is left
/// off the wire while it is zero, so the JSON matches the four-key shape
/// clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub effect: String,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cmc: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Card {
    /// Creates a card with only a title; effect and type are empty.
    pub fn new(id: CardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            effect: String::new(),
            card_type: String::new(),
            cmc: 0,
        }
    }

    /// Sets the rules text.
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = effect.into();
        self
    }
}

// ---------------------------------------------------------------------------
// CommandCode
// ---------------------------------------------------------------------------

/// What a [`Command`] asks the server to do.
///
/// On the wire a code is its display string (`"Pass Priority"`), never a
/// number. Decoding never fails: any string outside the table becomes
/// [`CommandCode::Unknown`]. A new code needs both a variant and a row in
/// [`as_str`](Self::as_str)/[`from_wire`](Self::from_wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    PlayCard,
    PassPriority,
    UploadDeck,
    Resign,
    Quit,
    Unknown,
}

impl CommandCode {
    /// Every code, in table order.
    pub const ALL: [CommandCode; 6] = [
        Self::PlayCard,
        Self::PassPriority,
        Self::UploadDeck,
        Self::Resign,
        Self::Quit,
        Self::Unknown,
    ];

    /// The wire string for this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayCard => "Play Card",
            Self::PassPriority => "Pass Priority",
            Self::UploadDeck => "Upload Deck",
            Self::Resign => "Resign",
            Self::Quit => "Quit",
            Self::Unknown => "Unknown",
        }
    }

    /// Maps a wire string to a code. Case-sensitive; unmatched strings
    /// yield [`CommandCode::Unknown`].
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Play Card" => Self::PlayCard,
            "Pass Priority" => Self::PassPriority,
            "Upload Deck" => Self::UploadDeck,
            "Resign" => Self::Resign,
            "Quit" => Self::Quit,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` for codes a player may send at any time, with or
    /// without priority.
    pub fn ends_match(self) -> bool {
        matches!(self, Self::Resign | Self::Quit)
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CommandCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CommandCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&s))
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Client → Server: one game command.
///
/// `target` carries the main argument (a card id, or the whole deck text
/// for an upload). `extra` carries auxiliary data and is usually empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub code: CommandCode,
    pub target: String,
    pub extra: String,
}

impl Command {
    /// Creates a command with empty target and extra.
    pub fn new(code: CommandCode) -> Self {
        Self {
            code,
            target: String::new(),
            extra: String::new(),
        }
    }

    /// Sets the target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the extra field.
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command({}, target: {}, extra: {})",
            self.code, self.target, self.extra
        )
    }
}

// ---------------------------------------------------------------------------
// Server → Client payloads
// ---------------------------------------------------------------------------

/// Server → one client: that player's private view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: PlayerId,
    pub hand_cards: Vec<Card>,
}

/// Server → all clients: the shared match state.
///
/// `life_points` serializes as a two-element array, `[p0, p1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    pub turn: PlayerId,
    pub priority: PlayerId,
    pub life_points: [i32; 2],
}

/// Anything the server sends to a client.
///
/// There is no tag on the wire. The receiver tells shapes apart by their
/// keys (see [`WireMessage`](crate::WireMessage) for `ServerMessage`),
/// and anything that is not JSON is plain [`Text`](Self::Text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// A human-readable status line, sent as raw UTF-8.
    Text(String),
    /// The receiving player's private info.
    PlayerInfo(PlayerInfo),
    /// The public match state.
    State(PublicState),
    /// The commands the receiving player may send right now.
    Commands(Vec<CommandCode>),
}

impl ServerMessage {
    /// Shorthand for [`ServerMessage::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connected player.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Every connected player except this one.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if `player` is covered by this recipient.
    pub fn includes(self, player: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(p) => p == player,
            Self::AllExcept(p) => p != player,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON shapes here are what clients key on, so these tests pin
    //! them down exactly.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(1)).unwrap();
        assert_eq!(json, "1");
    }

    #[test]
    fn test_player_id_opponent_wraps() {
        assert_eq!(PlayerId(0).opponent(), PlayerId(1));
        assert_eq!(PlayerId(1).opponent(), PlayerId(0));
        assert_eq!(PlayerId(1).index(), 1);
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(0).to_string(), "P-0");
        assert_eq!(CardId(12).to_string(), "#12");
    }

    // =====================================================================
    // CommandCode
    // =====================================================================

    #[test]
    fn test_command_code_string_table_is_exact() {
        let strings: Vec<&str> = CommandCode::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            strings,
            ["Play Card", "Pass Priority", "Upload Deck", "Resign", "Quit", "Unknown"]
        );
    }

    #[test]
    fn test_command_code_from_wire_inverts_as_str() {
        for code in CommandCode::ALL {
            assert_eq!(CommandCode::from_wire(code.as_str()), code);
        }
    }

    #[test]
    fn test_command_code_unrecognized_string_is_unknown() {
        let code: CommandCode = serde_json::from_str("\"Foo\"").unwrap();
        assert_eq!(code, CommandCode::Unknown);
    }

    #[test]
    fn test_command_code_is_case_sensitive() {
        assert_eq!(CommandCode::from_wire("pass priority"), CommandCode::Unknown);
        assert_eq!(CommandCode::from_wire("PassPriority"), CommandCode::Unknown);
    }

    #[test]
    fn test_command_code_serializes_as_string() {
        let json = serde_json::to_string(&CommandCode::PassPriority).unwrap();
        assert_eq!(json, "\"Pass Priority\"");
    }

    #[test]
    fn test_command_code_non_string_is_decode_error() {
        let result: Result<CommandCode, _> = serde_json::from_str("3");
        assert!(result.is_err());
    }

    #[test]
    fn test_ends_match_only_for_resign_and_quit() {
        let enders: Vec<CommandCode> = CommandCode::ALL
            .into_iter()
            .filter(|c| c.ends_match())
            .collect();
        assert_eq!(enders, vec![CommandCode::Resign, CommandCode::Quit]);
    }

    // =====================================================================
    // Command
    // =====================================================================

    #[test]
    fn test_command_json_format() {
        let cmd = Command::new(CommandCode::PlayCard).with_target("7");
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"code": "Play Card", "target": "7", "extra": ""})
        );
    }

    #[test]
    fn test_command_missing_key_returns_error() {
        let result: Result<Command, _> =
            serde_json::from_str(r#"{"code": "Resign", "target": ""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_display() {
        let cmd = Command::new(CommandCode::PassPriority).with_extra("x");
        assert_eq!(cmd.to_string(), "Command(Pass Priority, target: , extra: x)");
    }

    // =====================================================================
    // Card / PlayerInfo / PublicState
    // =====================================================================

    #[test]
    fn test_card_uses_type_key_and_omits_zero_cmc() {
        let card = Card::new(CardId(3), "Forest");
        let json: serde_json::Value = serde_json::to_value(&card).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": 3, "title": "Forest", "effect": "", "type": ""})
        );
    }

    #[test]
    fn test_card_keeps_nonzero_cmc() {
        let mut card = Card::new(CardId(1), "Llanowar Elves");
        card.cmc = 1;
        let json: serde_json::Value = serde_json::to_value(&card).unwrap();
        assert_eq!(json["cmc"], 1);

        let back: Card = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_player_info_json_format() {
        let info = PlayerInfo {
            player_id: PlayerId(1),
            hand_cards: vec![Card::new(CardId(0), "Forest")],
        };
        let json: serde_json::Value = serde_json::to_value(&info).unwrap();

        assert_eq!(json["player_id"], 1);
        assert_eq!(json["hand_cards"][0]["title"], "Forest");
    }

    #[test]
    fn test_public_state_life_points_is_array() {
        let state = PublicState {
            turn: PlayerId(0),
            priority: PlayerId(1),
            life_points: [20, 17],
        };
        let json: serde_json::Value = serde_json::to_value(state).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"turn": 0, "priority": 1, "life_points": [20, 17]})
        );
    }

    // =====================================================================
    // Recipient
    // =====================================================================

    #[test]
    fn test_recipient_includes() {
        assert!(Recipient::All.includes(PlayerId(0)));
        assert!(Recipient::Player(PlayerId(1)).includes(PlayerId(1)));
        assert!(!Recipient::Player(PlayerId(1)).includes(PlayerId(0)));
        assert!(!Recipient::AllExcept(PlayerId(0)).includes(PlayerId(0)));
        assert!(Recipient::AllExcept(PlayerId(0)).includes(PlayerId(1)));
    }
}
