//! Turning messages into frames and frames back into messages.
//!
//! Two layers stack here:
//!
//! 1. **Payload** ([`WireMessage`]): a message ↔ the UTF-8 bytes that go
//!    inside one frame. Commands are JSON objects; server messages are
//!    JSON objects, a JSON array, or plain text.
//! 2. **Frame** ([`encode`] / [`decode`]): payload ↔ length-prefixed
//!    bytes, using the transport crate's header helpers.
//!
//! Connections only ever need layer 1, because the transport's
//! `FrameReader` and `FrameSender` already handle the prefix. The framed
//! helpers exist for tests and for tools that work on captured bytes.
//!
//! # Telling server messages apart
//!
//! Nothing on the wire says which kind of message a frame holds. The
//! receiver looks at the shape instead:
//!
//! ```text
//! not JSON                                  → Text
//! object with player_id + hand_cards        → PlayerInfo
//! object with turn + priority + life_points → State
//! top-level array                           → Commands
//! any other JSON                            → Text
//! ```

use cardduel_transport::frame::{encode_frame, split_frame};
use serde_json::Value;

use crate::types::{Command, CommandCode, PlayerInfo, PublicState, ServerMessage};
use crate::ProtocolError;

/// A message that can be carried as one frame's payload.
pub trait WireMessage: Sized {
    /// Serializes the message into a frame body.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn to_payload(&self) -> Result<Vec<u8>, ProtocolError>;

    /// Parses a frame body.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the body is not a valid
    /// encoding of this message type.
    fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError>;
}

impl WireMessage for Command {
    fn to_payload(&self) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(payload).map_err(ProtocolError::Decode)
    }
}

impl WireMessage for ServerMessage {
    fn to_payload(&self) -> Result<Vec<u8>, ProtocolError> {
        match self {
            Self::Text(text) => Ok(text.as_bytes().to_vec()),
            Self::PlayerInfo(info) => serde_json::to_vec(info).map_err(ProtocolError::Encode),
            Self::State(state) => serde_json::to_vec(state).map_err(ProtocolError::Encode),
            Self::Commands(codes) => serde_json::to_vec(codes).map_err(ProtocolError::Encode),
        }
    }

    /// Classifies a server payload by shape. Never fails: anything that
    /// is not one of the structured shapes comes back as text.
    fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        Ok(classify(payload))
    }
}

fn classify(payload: &[u8]) -> ServerMessage {
    let Ok(value) = serde_json::from_slice::<Value>(payload) else {
        return ServerMessage::Text(String::from_utf8_lossy(payload).into_owned());
    };

    if let Value::Array(items) = &value {
        let codes = items
            .iter()
            .map(|item| item.as_str().map_or(CommandCode::Unknown, CommandCode::from_wire))
            .collect();
        return ServerMessage::Commands(codes);
    }

    if has_keys(&value, &["player_id", "hand_cards"]) {
        if let Ok(info) = serde_json::from_value::<PlayerInfo>(value.clone()) {
            return ServerMessage::PlayerInfo(info);
        }
    } else if has_keys(&value, &["turn", "priority", "life_points"]) {
        if let Ok(state) = serde_json::from_value::<PublicState>(value) {
            return ServerMessage::State(state);
        }
    }

    ServerMessage::Text(String::from_utf8_lossy(payload).into_owned())
}

fn has_keys(value: &Value, keys: &[&str]) -> bool {
    value
        .as_object()
        .is_some_and(|map| keys.iter().all(|key| map.contains_key(*key)))
}

// ---------------------------------------------------------------------------
// Framed helpers
// ---------------------------------------------------------------------------

/// Encodes `message` as one complete length-prefixed frame.
///
/// # Errors
/// - [`ProtocolError::Encode`] if the payload cannot be serialized
/// - [`ProtocolError::Frame`] if the payload exceeds the frame limit
pub fn encode<M: WireMessage>(message: &M) -> Result<Vec<u8>, ProtocolError> {
    let payload = message.to_payload()?;
    Ok(encode_frame(&payload)?)
}

/// Decodes exactly one length-prefixed frame.
///
/// # Errors
/// - [`ProtocolError::Incomplete`] if `bytes` ends before the frame does
/// - [`ProtocolError::InvalidMessage`] if bytes follow the frame
/// - [`ProtocolError::Frame`] if the header declares an oversized body
/// - [`ProtocolError::Decode`] if the body is not a valid `M`
pub fn decode<M: WireMessage>(bytes: &[u8]) -> Result<M, ProtocolError> {
    let (body, consumed) =
        split_frame(bytes)?.ok_or(ProtocolError::Incomplete { have: bytes.len() })?;
    if consumed != bytes.len() {
        return Err(ProtocolError::InvalidMessage(format!(
            "{} trailing bytes after frame",
            bytes.len() - consumed
        )));
    }
    M::from_payload(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Card, CardId, PlayerId};

    fn sample_info() -> PlayerInfo {
        PlayerInfo {
            player_id: PlayerId(0),
            hand_cards: vec![
                Card::new(CardId(0), "Forest"),
                Card::new(CardId(1), "Llanowar Elves").with_effect("Tap to add 1 green"),
            ],
        }
    }

    #[test]
    fn test_encode_frame_header_matches_payload_length() {
        let cmd = Command::new(CommandCode::Resign);
        let bytes = encode(&cmd).unwrap();
        let payload = cmd.to_payload().unwrap();

        assert_eq!(&bytes[..4], &(payload.len() as u32).to_be_bytes());
        assert_eq!(&bytes[4..], &payload[..]);
    }

    #[test]
    fn test_decode_command_round_trip() {
        let cmd = Command::new(CommandCode::UploadDeck).with_target("4 Forest\n");
        let back: Command = decode(&encode(&cmd).unwrap()).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_decode_server_messages_round_trip_every_shape() {
        let messages = [
            ServerMessage::text("You have priority"),
            ServerMessage::PlayerInfo(sample_info()),
            ServerMessage::State(PublicState {
                turn: PlayerId(0),
                priority: PlayerId(1),
                life_points: [20, 20],
            }),
            ServerMessage::Commands(vec![CommandCode::PlayCard, CommandCode::PassPriority]),
        ];

        for message in messages {
            let back: ServerMessage = decode(&encode(&message).unwrap()).unwrap();
            assert_eq!(back, message);
        }
    }

    #[test]
    fn test_decode_incomplete_frame_returns_error() {
        let bytes = encode(&Command::new(CommandCode::Quit)).unwrap();
        let result: Result<Command, _> = decode(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(ProtocolError::Incomplete { .. })));
    }

    #[test]
    fn test_decode_trailing_bytes_returns_error() {
        let mut bytes = encode(&Command::new(CommandCode::Quit)).unwrap();
        bytes.push(b'x');
        let result: Result<Command, _> = decode(&bytes);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_command_from_payload_malformed_json_returns_decode_error() {
        let result = Command::from_payload(b"{\"code\": \"Resign\"");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_command_from_payload_unknown_code_is_not_an_error() {
        let cmd = Command::from_payload(br#"{"code":"Foo","target":"","extra":""}"#).unwrap();
        assert_eq!(cmd.code, CommandCode::Unknown);
    }

    // =====================================================================
    // Classification
    // =====================================================================

    #[test]
    fn test_classify_non_json_is_text() {
        let msg = ServerMessage::from_payload(b"Invalid command format").unwrap();
        assert_eq!(msg, ServerMessage::text("Invalid command format"));
    }

    #[test]
    fn test_classify_array_maps_unrecognized_entries_to_unknown() {
        let msg = ServerMessage::from_payload(br#"["Upload Deck", "Dance", 7]"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Commands(vec![
                CommandCode::UploadDeck,
                CommandCode::Unknown,
                CommandCode::Unknown,
            ])
        );
    }

    #[test]
    fn test_classify_state_by_keys() {
        let msg =
            ServerMessage::from_payload(br#"{"life_points":[20,18],"priority":0,"turn":1}"#)
                .unwrap();
        assert_eq!(
            msg,
            ServerMessage::State(PublicState {
                turn: PlayerId(1),
                priority: PlayerId(0),
                life_points: [20, 18],
            })
        );
    }

    #[test]
    fn test_classify_player_info_accepts_card_without_cmc() {
        let payload = br#"{"player_id":1,"hand_cards":[{"id":4,"title":"Forest","effect":"","type":""}]}"#;
        let ServerMessage::PlayerInfo(info) = ServerMessage::from_payload(payload).unwrap() else {
            panic!("expected player info");
        };
        assert_eq!(info.player_id, PlayerId(1));
        assert_eq!(info.hand_cards[0].id, CardId(4));
        assert_eq!(info.hand_cards[0].cmc, 0);
    }

    #[test]
    fn test_classify_unknown_json_object_is_text() {
        let msg = ServerMessage::from_payload(br#"{"hello":"world"}"#).unwrap();
        assert_eq!(msg, ServerMessage::text(r#"{"hello":"world"}"#));
    }

    #[test]
    fn test_classify_partial_state_keys_is_text() {
        let msg = ServerMessage::from_payload(br#"{"turn":0,"priority":1}"#).unwrap();
        assert!(matches!(msg, ServerMessage::Text(_)));
    }
}
