//! Test assertion helpers - fluent API for verifying what the client sent
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

use guandan_client::websockets::{Envelope, MessageType};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct SentAssertion {
    sent: Vec<Envelope>,
}

impl SentAssertion {
    /// Snapshot everything the client has sent so far
    pub async fn for_setup(setup: &TestSetup) -> Self {
        setup.settle().await;
        Self {
            sent: setup.server.sent_envelopes().await,
        }
    }

    pub fn nothing(self) {
        assert!(
            self.sent.is_empty(),
            "client should not have sent anything, sent {:?}",
            self.sent
        );
    }

    /// Assert the client sent exactly these types, in order
    pub fn sequence(self, expected_types: Vec<MessageType>) -> Vec<EnvelopeAssertion> {
        let actual: Vec<MessageType> = self.sent.iter().map(|e| e.message_type).collect();
        assert_eq!(actual, expected_types, "client sent the wrong sequence");
        self.sent.into_iter().map(EnvelopeAssertion::new).collect()
    }

    /// Assert exactly one envelope was sent and return it
    pub fn single(self, expected_type: MessageType) -> EnvelopeAssertion {
        self.sequence(vec![expected_type])
            .pop()
            .expect("one envelope")
    }

    pub fn count_of(&self, message_type: MessageType) -> usize {
        self.sent
            .iter()
            .filter(|e| e.message_type == message_type)
            .count()
    }
}

// ============================================================================
// Envelope Content Assertions
// ============================================================================

pub struct EnvelopeAssertion {
    envelope: Envelope,
}

impl EnvelopeAssertion {
    pub fn new(envelope: Envelope) -> Self {
        Self { envelope }
    }

    pub fn with_payload(self, expected: Value) -> Self {
        assert_eq!(self.envelope.payload, expected);
        self
    }

    pub fn with_card_ids(self, expected: Vec<u32>) -> Self {
        let ids: Vec<u32> =
            serde_json::from_value(self.envelope.payload["card_ids"].clone()).unwrap();
        assert_eq!(ids, expected);
        self
    }

    pub fn with_field(self, field: &str, expected: Value) -> Self {
        assert_eq!(self.envelope.payload[field], expected, "field {}", field);
        self
    }
}
