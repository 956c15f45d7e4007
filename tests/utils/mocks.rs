#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use guandan_client::websockets::{Envelope, MessageType, SocketError, SocketWrapper};

// ============================================================================
// Mock Infrastructure
// ============================================================================

enum MockFrame {
    Text(String),
    Close,
    Fail(String),
}

/// Socket half handed to the transport
pub struct MockSocket {
    inbound: mpsc::UnboundedReceiver<MockFrame>,
    sent: Arc<RwLock<Vec<String>>>,
}

/// Server half kept by the test: pushes frames, inspects what the client sent
#[derive(Clone)]
pub struct MockServer {
    inbound: mpsc::UnboundedSender<MockFrame>,
    sent: Arc<RwLock<Vec<String>>>,
}

pub fn mock_socket() -> (MockSocket, MockServer) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sent = Arc::new(RwLock::new(Vec::new()));
    (
        MockSocket {
            inbound: rx,
            sent: sent.clone(),
        },
        MockServer { inbound: tx, sent },
    )
}

#[async_trait]
impl SocketWrapper for MockSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.sent.write().await.push(message);
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        match self.inbound.recv().await {
            Some(MockFrame::Text(text)) => Ok(Some(text)),
            Some(MockFrame::Fail(reason)) => Err(SocketError::ReceiveFailed(reason)),
            Some(MockFrame::Close) | None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        Ok(())
    }
}

impl MockServer {
    /// Push a raw text frame
    pub fn push(&self, text: &str) {
        let _ = self.inbound.send(MockFrame::Text(text.to_string()));
    }

    pub fn push_envelope(&self, message_type: MessageType, payload: Value) {
        let text = serde_json::json!({ "type": message_type, "payload": payload }).to_string();
        let _ = self.inbound.send(MockFrame::Text(text));
    }

    /// Close the connection cleanly
    pub fn disconnect(&self) {
        let _ = self.inbound.send(MockFrame::Close);
    }

    /// Break the connection with a receive error
    pub fn fail(&self, reason: &str) {
        let _ = self.inbound.send(MockFrame::Fail(reason.to_string()));
    }

    pub async fn sent(&self) -> Vec<String> {
        self.sent.read().await.clone()
    }

    pub async fn sent_envelopes(&self) -> Vec<Envelope> {
        self.sent
            .read()
            .await
            .iter()
            .map(|text| Envelope::decode(text).unwrap())
            .collect()
    }

    pub async fn clear_sent(&self) {
        self.sent.write().await.clear();
    }
}
