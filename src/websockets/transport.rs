use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use crate::shared::ClientError;

use super::messages::{Envelope, MessageType};
use super::registry::{EnvelopeHandler, HandlerRegistry, Subscription};
use super::socket::{Connection, MessageHandler, Outbound, SocketWrapper};

const FAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Local transport problems, kept apart from the server's `error` events
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFault {
    /// Inbound text that is not an envelope
    Malformed { raw: String, reason: String },
    /// The connection ended; `reason` is set when it ended with an error
    Disconnected { reason: Option<String> },
}

struct Signals {
    status: watch::Sender<ConnectionStatus>,
    faults: broadcast::Sender<TransportFault>,
}

/// Decodes inbound frames and hands them to the registry
struct InboundRouter {
    registry: HandlerRegistry,
    signals: Arc<Signals>,
}

#[async_trait]
impl MessageHandler for InboundRouter {
    async fn handle_message(&self, message: String) {
        match Envelope::decode(&message) {
            Ok(envelope) => {
                debug!(message_type = ?envelope.message_type, "Received envelope");
                self.registry.dispatch(envelope).await;
            }
            Err(e) => {
                warn!(error = %e, raw = %message, "Failed to decode inbound message");
                let _ = self.signals.faults.send(TransportFault::Malformed {
                    raw: message,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Wraps one server connection.
///
/// `send` is fire-and-forget and drops envelopes while disconnected. Inbound
/// envelopes go to at most one subscriber per message type, one at a time in
/// arrival order.
#[derive(Clone)]
pub struct Transport {
    outbound: mpsc::UnboundedSender<Outbound>,
    registry: HandlerRegistry,
    signals: Arc<Signals>,
}

impl Transport {
    /// Open a WebSocket connection to `url`
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        info!(url = %url, "Connecting");
        let (stream, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;
        info!(url = %url, "Connected");
        Ok(Self::from_socket(Box::new(stream)))
    }

    /// Drive an already-open socket. Spawns the connection task.
    pub fn from_socket(socket: Box<dyn SocketWrapper>) -> Self {
        let (outbound, outbound_receiver) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(ConnectionStatus::Connected);
        let (faults, _) = broadcast::channel(FAULT_CAPACITY);
        let signals = Arc::new(Signals { status, faults });
        let registry = HandlerRegistry::new();

        let router = Arc::new(InboundRouter {
            registry: registry.clone(),
            signals: signals.clone(),
        });
        let connection = Connection::new(socket, outbound_receiver, router);

        let task_signals = signals.clone();
        tokio::spawn(async move {
            let reason = match connection.run().await {
                Ok(()) => {
                    info!("Connection closed");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Connection error");
                    Some(e.to_string())
                }
            };
            task_signals
                .status
                .send_replace(ConnectionStatus::Disconnected);
            let _ = task_signals
                .faults
                .send(TransportFault::Disconnected { reason });
        });

        Self {
            outbound,
            registry,
            signals,
        }
    }

    pub fn connected(&self) -> bool {
        *self.signals.status.borrow() == ConnectionStatus::Connected
    }

    /// Watch connection status changes
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.signals.status.subscribe()
    }

    /// Stream of local transport faults
    pub fn faults(&self) -> broadcast::Receiver<TransportFault> {
        self.signals.faults.subscribe()
    }

    /// Queue an envelope for the server. Silently dropped when not connected.
    pub fn send(&self, envelope: Envelope) {
        if !self.connected() {
            debug!(message_type = ?envelope.message_type, "Not connected, dropping envelope");
            return;
        }
        match envelope.encode() {
            Ok(text) => {
                if self.outbound.send(Outbound::Text(text)).is_err() {
                    debug!(message_type = ?envelope.message_type, "Connection task gone, dropping envelope");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode envelope"),
        }
    }

    /// Route `message_type` to `handler`, replacing any current handler for it
    pub async fn subscribe(
        &self,
        message_type: MessageType,
        handler: Arc<dyn EnvelopeHandler>,
    ) -> Subscription {
        let token = self.registry.register(message_type, handler).await;
        Subscription::new(self.registry.clone(), message_type, token)
    }

    /// Ask the connection task to close the socket
    pub fn close(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}
