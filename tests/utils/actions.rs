#![allow(dead_code)]

use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use guandan_client::{websockets::MessageType, Card, Rank};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Let the connection task drain what was pushed
    pub async fn settle(&self) {
        sleep(Duration::from_millis(10)).await;
    }

    /// Push an envelope from the server and wait for processing
    pub async fn deliver(&self, message_type: MessageType, payload: Value) {
        self.server.push_envelope(message_type, payload);
        self.settle().await;
    }

    // ============================================================================
    // Convenience Server Events
    // ============================================================================

    pub async fn room_state(&self, payload: Value) {
        self.deliver(MessageType::RoomState, payload).await;
    }

    pub async fn deal(&self, cards: Vec<Card>, level: Rank) {
        self.deliver(
            MessageType::DealCards,
            json!({ "cards": cards, "level": level }),
        )
        .await;
    }

    pub async fn turn(&self, seat: usize, can_pass: bool) {
        self.deliver(
            MessageType::Turn,
            json!({ "player_id": format!("p{}", seat), "seat": seat, "can_pass": can_pass }),
        )
        .await;
    }

    pub async fn play_made(&self, seat: usize, cards: Vec<Card>, combo_type: &str) {
        self.deliver(
            MessageType::PlayMade,
            json!({
                "player_id": format!("p{}", seat),
                "seat": seat,
                "cards": cards,
                "combo_type": combo_type,
                "is_pass": false,
            }),
        )
        .await;
    }

    pub async fn pass_made(&self, seat: usize) {
        self.deliver(
            MessageType::PlayMade,
            json!({
                "player_id": format!("p{}", seat),
                "seat": seat,
                "cards": null,
                "combo_type": "",
                "is_pass": true,
            }),
        )
        .await;
    }

    pub async fn server_error(&self, message: &str) {
        self.deliver(MessageType::Error, json!({ "message": message }))
            .await;
    }
}
