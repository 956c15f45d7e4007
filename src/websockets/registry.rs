use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::messages::{Envelope, MessageType};

/// Receiver of inbound envelopes of one message type
#[async_trait]
pub trait EnvelopeHandler: Send + Sync {
    async fn handle_envelope(&self, envelope: Envelope);

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str {
        "anonymous"
    }
}

/// Adapts a plain closure into an `EnvelopeHandler`
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> EnvelopeHandler for FnHandler<F>
where
    F: Fn(Envelope) + Send + Sync + 'static,
{
    async fn handle_envelope(&self, envelope: Envelope) {
        (self.0)(envelope)
    }
}

struct Slot {
    token: u64,
    handler: Arc<dyn EnvelopeHandler>,
}

/// Dispatch table keyed by message type.
///
/// Each type holds at most one handler. Registering for a type that already
/// has one replaces it; the replaced handler receives nothing further.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    slots: Arc<RwLock<HashMap<MessageType, Slot>>>,
    next_token: Arc<AtomicU64>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `message_type`, returning the token that identifies
    /// this registration.
    pub async fn register(
        &self,
        message_type: MessageType,
        handler: Arc<dyn EnvelopeHandler>,
    ) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let name = handler.handler_name();
        let previous = self
            .slots
            .write()
            .await
            .insert(message_type, Slot { token, handler });

        if let Some(previous) = previous {
            debug!(
                message_type = ?message_type,
                replaced = previous.handler.handler_name(),
                handler = name,
                "Replaced handler"
            );
        }
        token
    }

    /// Remove the registration identified by `token`. A later registration for
    /// the same type is left alone.
    pub async fn unregister(&self, message_type: MessageType, token: u64) -> bool {
        let mut slots = self.slots.write().await;
        match slots.get(&message_type) {
            Some(slot) if slot.token == token => {
                slots.remove(&message_type);
                true
            }
            _ => false,
        }
    }

    pub async fn handler_for(&self, message_type: MessageType) -> Option<Arc<dyn EnvelopeHandler>> {
        self.slots
            .read()
            .await
            .get(&message_type)
            .map(|slot| slot.handler.clone())
    }

    /// Deliver to the current handler for the envelope's type. Returns false
    /// when nobody is subscribed.
    pub async fn dispatch(&self, envelope: Envelope) -> bool {
        // Lock released before the handler runs so it may re-subscribe
        let Some(handler) = self.handler_for(envelope.message_type).await else {
            debug!(
                message_type = ?envelope.message_type,
                "Unhandled message type"
            );
            return false;
        };
        handler.handle_envelope(envelope).await;
        true
    }
}

/// Handle returned by `Transport::subscribe`
pub struct Subscription {
    registry: HandlerRegistry,
    message_type: MessageType,
    token: u64,
}

impl Subscription {
    pub(crate) fn new(registry: HandlerRegistry, message_type: MessageType, token: u64) -> Self {
        Self {
            registry,
            message_type,
            token,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Drop this registration. No effect if it was already replaced.
    pub async fn unsubscribe(self) -> bool {
        self.registry.unregister(self.message_type, self.token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recorder(log: Arc<Mutex<Vec<String>>>, tag: &'static str) -> Arc<dyn EnvelopeHandler> {
        Arc::new(FnHandler(move |envelope: Envelope| {
            log.lock()
                .unwrap()
                .push(format!("{}:{:?}", tag, envelope.message_type));
        }))
    }

    #[tokio::test]
    async fn test_dispatch_reaches_registered_handler() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry
            .register(MessageType::Turn, recorder(log.clone(), "a"))
            .await;

        assert!(
            registry
                .dispatch(Envelope::new(MessageType::Turn, json!({})))
                .await
        );
        assert!(
            !registry
                .dispatch(Envelope::new(MessageType::Error, json!({})))
                .await
        );
        assert_eq!(*log.lock().unwrap(), vec!["a:Turn".to_string()]);
    }

    #[tokio::test]
    async fn test_register_replaces_previous_handler() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry
            .register(MessageType::Turn, recorder(log.clone(), "first"))
            .await;
        registry
            .register(MessageType::Turn, recorder(log.clone(), "second"))
            .await;

        registry
            .dispatch(Envelope::new(MessageType::Turn, json!({})))
            .await;
        assert_eq!(*log.lock().unwrap(), vec!["second:Turn".to_string()]);
    }

    #[tokio::test]
    async fn test_stale_unsubscribe_keeps_replacement() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = registry
            .register(MessageType::Error, recorder(log.clone(), "first"))
            .await;
        let second = registry
            .register(MessageType::Error, recorder(log.clone(), "second"))
            .await;

        assert!(!registry.unregister(MessageType::Error, first).await);
        assert!(registry.handler_for(MessageType::Error).await.is_some());

        assert!(registry.unregister(MessageType::Error, second).await);
        assert!(registry.handler_for(MessageType::Error).await.is_none());
    }

    #[tokio::test]
    async fn test_subscription_unsubscribe() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let token = registry
            .register(MessageType::HandEnd, recorder(log.clone(), "a"))
            .await;
        let subscription = Subscription::new(registry.clone(), MessageType::HandEnd, token);

        assert_eq!(subscription.message_type(), MessageType::HandEnd);
        assert!(subscription.unsubscribe().await);
        assert!(
            !registry
                .dispatch(Envelope::new(MessageType::HandEnd, json!({})))
                .await
        );
        assert!(log.lock().unwrap().is_empty());
    }
}
