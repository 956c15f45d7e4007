use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::game::{Card, CardId, Rank, Seat};
use crate::shared::ClientError;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client -> Server
    JoinRoom,
    CreateRoom,
    PlayCards,
    Pass,
    TributeGive,
    FillBots,

    // Server -> Client
    RoomState,
    GameStart,
    DealCards,
    Turn,
    PlayMade,
    HandEnd,
    Tribute,
    TributeRecv,
    GameEnd,
    Error,
    PlayerJoined,
    PlayerLeft,
}

/// The tagged unit exchanged with the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Go encodes an empty slice as `null`; treat it as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomPayload {
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayCardsPayload {
    pub card_ids: Vec<CardId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TributeGivePayload {
    pub card_id: CardId,
}

/// Empty body shared by `fill_bots` and `pass`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyPayload {}

/// Server-to-Client message payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub seat: Seat,
    pub team: usize,
    #[serde(default)]
    pub is_ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStatePayload {
    pub room_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub players: Vec<PlayerInfo>,
    pub game_active: bool,
    pub your_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealCardsPayload {
    #[serde(deserialize_with = "null_as_empty")]
    pub cards: Vec<Card>,
    pub level: Rank,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnPayload {
    pub player_id: String,
    pub seat: Seat,
    pub can_pass: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayMadePayload {
    pub player_id: String,
    pub seat: Seat,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub combo_type: String,
    pub is_pass: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandEndPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub finish_order: Vec<String>,
    #[serde(default)]
    pub winning_team: usize,
    #[serde(default)]
    pub level_advance: u8,
    pub new_levels: [Rank; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TributePayload {
    pub from_seat: Seat,
    pub to_seat: Seat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TributeRecvPayload {
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEndPayload {
    pub winning_team: usize,
    pub final_levels: [Rank; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// `player_joined` / `player_left`; only the identity fields are meaningful
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerNoticePayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Envelope {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
        }
    }

    fn with_payload<T: Serialize>(message_type: MessageType, payload: T) -> Self {
        let payload = serde_json::to_value(payload).unwrap_or_else(|e| {
            warn!(message_type = ?message_type, error = %e, "Failed to serialize payload");
            serde_json::Value::Null
        });
        Self::new(message_type, payload)
    }

    /// Parse inbound text; anything that is not an envelope is a transport fault
    pub fn decode(text: &str) -> Result<Self, ClientError> {
        serde_json::from_str(text).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    pub fn encode(&self) -> Result<String, ClientError> {
        serde_json::to_string(self).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    /// Decode the payload as the body of this message type
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| ClientError::payload(self.message_type, e))
    }

    /// Create a CREATE_ROOM message
    pub fn create_room(player_name: impl Into<String>) -> Self {
        Self::with_payload(
            MessageType::CreateRoom,
            CreateRoomPayload {
                player_name: player_name.into(),
            },
        )
    }

    /// Create a JOIN_ROOM message
    pub fn join_room(room_id: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self::with_payload(
            MessageType::JoinRoom,
            JoinRoomPayload {
                room_id: room_id.into(),
                player_name: player_name.into(),
            },
        )
    }

    /// Create a FILL_BOTS message
    pub fn fill_bots() -> Self {
        Self::with_payload(MessageType::FillBots, EmptyPayload {})
    }

    /// Create a PLAY_CARDS message
    pub fn play_cards(card_ids: Vec<CardId>) -> Self {
        Self::with_payload(MessageType::PlayCards, PlayCardsPayload { card_ids })
    }

    /// Create a PASS message
    pub fn pass() -> Self {
        Self::with_payload(MessageType::Pass, EmptyPayload {})
    }

    /// Create a TRIBUTE_GIVE message
    pub fn tribute_give(card_id: CardId) -> Self {
        Self::with_payload(MessageType::TributeGive, TributeGivePayload { card_id })
    }
}
