use async_trait::async_trait;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::game::CardId;
use crate::shared::ClientError;
use crate::websockets::{
    ConnectionStatus, DealCardsPayload, Envelope, EnvelopeHandler, ErrorPayload, GameEndPayload,
    HandEndPayload, MessageType, PlayMadePayload, PlayerNoticePayload, RoomStatePayload,
    Subscription, Transport, TributePayload, TributeRecvPayload, TurnPayload,
};

use super::state::{ViewSnapshot, ViewState};

pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(800);
pub const ERROR_DURATION: Duration = Duration::from_millis(3000);

/// Every server-to-client type the reconciler listens for
const INBOUND_TYPES: [MessageType; 12] = [
    MessageType::RoomState,
    MessageType::GameStart,
    MessageType::DealCards,
    MessageType::Turn,
    MessageType::PlayMade,
    MessageType::HandEnd,
    MessageType::Tribute,
    MessageType::TributeRecv,
    MessageType::GameEnd,
    MessageType::Error,
    MessageType::PlayerJoined,
    MessageType::PlayerLeft,
];

/// How long transient fields stay visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTimings {
    pub highlight: Duration,
    pub error: Duration,
}

impl Default for ViewTimings {
    fn default() -> Self {
        Self {
            highlight: HIGHLIGHT_DURATION,
            error: ERROR_DURATION,
        }
    }
}

struct Inner {
    transport: Transport,
    state: RwLock<ViewState>,
    timings: ViewTimings,
    snapshots: watch::Sender<ViewSnapshot>,
    subscriptions: Mutex<Vec<Subscription>>,
}

/// Sole owner of the game view.
///
/// Consumes server events from the transport, publishes read-only snapshots,
/// and turns user intents into outbound envelopes.
#[derive(Clone)]
pub struct ViewReconciler {
    inner: Arc<Inner>,
}

/// Subscribed for every inbound type; holds the view weakly so the transport
/// does not keep it alive
struct InboundRoute {
    view: Weak<Inner>,
}

#[async_trait]
impl EnvelopeHandler for InboundRoute {
    async fn handle_envelope(&self, envelope: Envelope) {
        let Some(inner) = self.view.upgrade() else {
            return;
        };
        let message_type = envelope.message_type;
        if let Err(e) = (ViewReconciler { inner }).apply(envelope).await {
            warn!(message_type = ?message_type, error = %e, "Dropped inbound event");
        }
    }

    fn handler_name(&self) -> &'static str {
        "ViewReconciler"
    }
}

impl ViewReconciler {
    pub async fn attach(transport: Transport) -> Self {
        Self::attach_with_timings(transport, ViewTimings::default()).await
    }

    /// Subscribe to `transport` for every inbound type, replacing whatever was
    /// subscribed before.
    pub async fn attach_with_timings(transport: Transport, timings: ViewTimings) -> Self {
        let mut status = transport.status();
        let mut state = ViewState::default();
        state.connected = *status.borrow_and_update() == ConnectionStatus::Connected;

        let (snapshots, _) = watch::channel(state.snapshot());
        let inner = Arc::new(Inner {
            transport: transport.clone(),
            state: RwLock::new(state),
            timings,
            snapshots,
            subscriptions: Mutex::new(Vec::new()),
        });

        let route: Arc<dyn EnvelopeHandler> = Arc::new(InboundRoute {
            view: Arc::downgrade(&inner),
        });
        let mut subscriptions = Vec::with_capacity(INBOUND_TYPES.len());
        for message_type in INBOUND_TYPES {
            subscriptions.push(transport.subscribe(message_type, route.clone()).await);
        }
        *inner.subscriptions.lock().await = subscriptions;

        let view = Arc::downgrade(&inner);
        tokio::spawn(async move {
            while status.changed().await.is_ok() {
                let connected = *status.borrow_and_update() == ConnectionStatus::Connected;
                let Some(inner) = view.upgrade() else {
                    break;
                };
                if !connected {
                    warn!("Disconnected from server, keeping last view");
                }
                let mut state = inner.state.write().await;
                state.connected = connected;
                inner.snapshots.send_replace(state.snapshot());
            }
        });

        info!(
            types = INBOUND_TYPES.len(),
            "View reconciler attached to transport"
        );
        Self { inner }
    }

    /// Release all subscriptions. The view keeps its last state.
    pub async fn detach(&self) {
        let subscriptions: Vec<Subscription> =
            self.inner.subscriptions.lock().await.drain(..).collect();
        for subscription in subscriptions {
            subscription.unsubscribe().await;
        }
        info!("View reconciler detached");
    }

    /// Current view
    pub fn snapshot(&self) -> ViewSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Receiver notified after every change to the view
    pub fn watch(&self) -> watch::Receiver<ViewSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn transport(&self) -> &Transport {
        &self.inner.transport
    }

    fn publish(&self, state: &ViewState) {
        self.inner.snapshots.send_replace(state.snapshot());
    }

    /// Apply one inbound envelope. On a payload error the view is unchanged.
    pub async fn apply(&self, envelope: Envelope) -> Result<(), ClientError> {
        let mut state = self.inner.state.write().await;

        match envelope.message_type {
            MessageType::RoomState => {
                let payload: RoomStatePayload = envelope.payload_as()?;
                debug!(
                    room_id = %payload.room_id,
                    players = payload.players.len(),
                    game_active = payload.game_active,
                    "Room state"
                );
                state.apply_room_state(payload);
            }
            MessageType::DealCards => {
                let payload: DealCardsPayload = envelope.payload_as()?;
                info!(
                    cards = payload.cards.len(),
                    level = %payload.level,
                    "Cards dealt"
                );
                state.apply_deal(payload);
            }
            MessageType::Turn => {
                let payload: TurnPayload = envelope.payload_as()?;
                debug!(seat = payload.seat, can_pass = payload.can_pass, "Turn");
                state.game.apply_turn(&payload);
            }
            MessageType::PlayMade => {
                let payload: PlayMadePayload = envelope.payload_as()?;
                debug!(
                    seat = payload.seat,
                    cards = payload.cards.len(),
                    combo_type = %payload.combo_type,
                    is_pass = payload.is_pass,
                    "Play made"
                );
                let generation = state.game.apply_play(payload);
                let timer = self.schedule_clear(self.inner.timings.highlight, generation, |s, g| {
                    s.game.last_play_seat.clear_if_current(g)
                });
                state.game.last_play_seat.arm(timer);
            }
            MessageType::HandEnd => {
                let payload: HandEndPayload = envelope.payload_as()?;
                info!(
                    winning_team = payload.winning_team,
                    level_advance = payload.level_advance,
                    "Hand ended"
                );
                state.game.apply_hand_end(payload);
            }
            MessageType::Tribute => {
                let payload: TributePayload = envelope.payload_as()?;
                info!(
                    from_seat = payload.from_seat,
                    to_seat = payload.to_seat,
                    "Tribute requested"
                );
                state.game.apply_tribute(&payload);
            }
            MessageType::TributeRecv => {
                let payload: TributeRecvPayload = envelope.payload_as()?;
                if !state.game.receive_card(payload.card) {
                    warn!(card_id = payload.card.id, "Tribute card already in hand");
                }
            }
            MessageType::GameEnd => {
                let payload: GameEndPayload = envelope.payload_as()?;
                info!(winning_team = payload.winning_team, "Game over");
                state.apply_game_end(payload);
            }
            MessageType::Error => {
                let payload: ErrorPayload = envelope.payload_as()?;
                info!(message = %payload.message, "Server error");
                let generation = state.game.apply_error(payload.message);
                let timer = self.schedule_clear(self.inner.timings.error, generation, |s, g| {
                    s.game.error_message.clear_if_current(g)
                });
                state.game.error_message.arm(timer);
            }
            MessageType::GameStart => {
                // The deal that follows carries everything
                debug!("Game starting");
                return Ok(());
            }
            MessageType::PlayerJoined | MessageType::PlayerLeft => {
                let payload: PlayerNoticePayload = envelope.payload_as()?;
                debug!(
                    message_type = ?envelope.message_type,
                    player_id = %payload.id,
                    name = %payload.name,
                    "Membership notice"
                );
                return Ok(());
            }
            other => {
                debug!(message_type = ?other, "Ignoring message type");
                return Ok(());
            }
        }

        self.publish(&state);
        Ok(())
    }

    /// Spawn a delayed compare-and-clear on the view
    fn schedule_clear(
        &self,
        delay: Duration,
        generation: u64,
        clear: fn(&mut ViewState, u64) -> bool,
    ) -> AbortHandle {
        let view = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = view.upgrade() else {
                return;
            };
            let mut state = inner.state.write().await;
            if clear(&mut state, generation) {
                inner.snapshots.send_replace(state.snapshot());
            }
        })
        .abort_handle()
    }

    pub fn create_room(&self, player_name: &str) {
        info!(player_name = %player_name, "Creating room");
        self.inner
            .transport
            .send(Envelope::create_room(player_name));
    }

    pub fn join_room(&self, room_id: &str, player_name: &str) {
        info!(room_id = %room_id, player_name = %player_name, "Joining room");
        self.inner
            .transport
            .send(Envelope::join_room(room_id, player_name));
    }

    pub fn fill_bots(&self) {
        info!("Requesting bots for empty seats");
        self.inner.transport.send(Envelope::fill_bots());
    }

    /// Flip selection of a held card. Returns false if the card is not in hand.
    pub async fn toggle_card(&self, id: CardId) -> bool {
        let mut state = self.inner.state.write().await;
        let toggled = state.game.toggle(id);
        if toggled {
            self.publish(&state);
        } else {
            debug!(card_id = id, "Toggle ignored, card not in hand");
        }
        toggled
    }

    /// Send the selection as a play and clear it without waiting for the
    /// server. Returns false when nothing is selected.
    pub async fn submit_play(&self) -> bool {
        let mut state = self.inner.state.write().await;
        if state.game.selected_ids().is_empty() {
            return false;
        }
        let card_ids = state.game.take_selection();
        info!(card_ids = ?card_ids, "Submitting play");
        self.inner.transport.send(Envelope::play_cards(card_ids));
        self.publish(&state);
        true
    }

    /// Always sent; the server decides whether passing is legal
    pub fn submit_pass(&self) {
        info!("Submitting pass");
        self.inner.transport.send(Envelope::pass());
    }

    /// Give a card as tribute. The card leaves the hand immediately since the
    /// server never echoes it back to the giver.
    pub async fn give_tribute(&self, id: CardId) -> bool {
        let mut state = self.inner.state.write().await;
        let Some(card) = state.game.give_away(id) else {
            warn!(card_id = id, "Tribute refused: none pending, card not held, or wildcard");
            return false;
        };
        info!(card = %card, "Giving tribute");
        self.inner.transport.send(Envelope::tribute_give(card.id));
        self.publish(&state);
        true
    }
}
