#![allow(dead_code)]

use serde_json::{json, Value};

// ============================================================================
// Card Creation Macro
// ============================================================================

/// `cards![Three Hearts 1, RedJoker Joker 107]`
#[macro_export]
macro_rules! cards {
    ($($rank:ident $suit:ident $id:literal),* $(,)?) => {
        vec![$(::guandan_client::Card::new(
            ::guandan_client::Rank::$rank,
            ::guandan_client::Suit::$suit,
            $id,
        )),*]
    };
}

// ============================================================================
// Room Payload Builder
// ============================================================================

/// Builds `room_state` payloads
pub struct RoomBuilder {
    room_id: String,
    players: Vec<(String, String, usize)>,
    game_active: bool,
    your_id: String,
}

impl RoomBuilder {
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            players: vec![],
            game_active: false,
            your_id: String::new(),
        }
    }

    pub fn with_player(mut self, id: &str, name: &str, seat: usize) -> Self {
        self.players
            .push((id.to_string(), name.to_string(), seat));
        self
    }

    /// Four players "p0".."p3" named alice, bob, carol, dave in seats 0..3
    pub fn with_four_players(self) -> Self {
        ["alice", "bob", "carol", "dave"]
            .into_iter()
            .enumerate()
            .fold(self, |builder, (seat, name)| {
                builder.with_player(&format!("p{}", seat), name, seat)
            })
    }

    pub fn as_player(mut self, id: &str) -> Self {
        self.your_id = id.to_string();
        self
    }

    pub fn active(mut self) -> Self {
        self.game_active = true;
        self
    }

    pub fn build(self) -> Value {
        let players: Vec<Value> = self
            .players
            .iter()
            .map(|(id, name, seat)| {
                json!({
                    "id": id,
                    "name": name,
                    "seat": seat,
                    "team": seat % 2,
                    "is_ready": false,
                })
            })
            .collect();
        json!({
            "room_id": self.room_id,
            "players": players,
            "game_active": self.game_active,
            "your_id": self.your_id,
        })
    }
}
