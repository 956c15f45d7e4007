use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::warn;

use crate::game::{is_wild, sort_hand, Card, CardId, Rank, Seat, SeatLayout, SEAT_COUNT};
use crate::websockets::{
    DealCardsPayload, GameEndPayload, HandEndPayload, PlayMadePayload, PlayerInfo,
    RoomStatePayload, TributePayload, TurnPayload,
};

use super::transient::TransientSlot;

/// Cards each seat starts a hand with: 108 cards over 4 seats
pub const STARTING_CARD_COUNT: usize = 27;

pub const PLAY_LOG_CAPACITY: usize = 8;

/// Latest room membership, replaced wholesale on every update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub room_id: String,
    pub players: Vec<PlayerInfo>,
    pub game_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub seat: Seat,
    pub cards: Vec<Card>,
    pub combo_type: String,
    pub is_pass: bool,
}

/// FIFO of the most recent plays and passes; the oldest entry is evicted first
#[derive(Debug, Clone, PartialEq)]
pub struct PlayLog {
    entries: VecDeque<PlayRecord>,
    capacity: usize,
}

impl Default for PlayLog {
    fn default() -> Self {
        Self::with_capacity(PLAY_LOG_CAPACITY)
    }
}

impl PlayLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: PlayRecord) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayRecord> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandResult {
    pub finish_order: Vec<String>,
    pub winning_team: usize,
    pub level_advance: u8,
    pub new_levels: [Rank; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub winning_team: usize,
    pub final_levels: [Rank; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTribute {
    pub from_seat: Seat,
    pub to_seat: Seat,
}

/// Per-hand state. Reset at every deal.
#[derive(Debug)]
pub struct GameView {
    hand: Vec<Card>,
    level: Rank,
    selected_ids: BTreeSet<CardId>,
    pub current_turn: Seat,
    pub can_pass: bool,
    pub table_cards: Vec<Card>,
    pub combo_type: String,
    pub player_card_counts: [usize; SEAT_COUNT],
    pub team_levels: [Rank; 2],
    pub play_log: PlayLog,
    pub last_play_seat: TransientSlot<Seat>,
    pub error_message: TransientSlot<String>,
    pub last_hand_result: Option<HandResult>,
    pub game_result: Option<GameResult>,
    pub pending_tribute: Option<PendingTribute>,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            hand: Vec::new(),
            level: Rank::Two,
            selected_ids: BTreeSet::new(),
            current_turn: 0,
            can_pass: false,
            table_cards: Vec::new(),
            combo_type: String::new(),
            player_card_counts: [STARTING_CARD_COUNT; SEAT_COUNT],
            team_levels: [Rank::Two, Rank::Two],
            play_log: PlayLog::default(),
            last_play_seat: TransientSlot::default(),
            error_message: TransientSlot::default(),
            last_hand_result: None,
            game_result: None,
            pending_tribute: None,
        }
    }
}

impl GameView {
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Only changes with a deal, so the hand order stays derived from it
    pub fn level(&self) -> Rank {
        self.level
    }

    pub fn selected_ids(&self) -> &BTreeSet<CardId> {
        &self.selected_ids
    }

    pub fn holds(&self, id: CardId) -> bool {
        self.hand.iter().any(|card| card.id == id)
    }

    /// Replace the hand contents and re-derive its order from scratch.
    /// Duplicate ids keep their first occurrence; selections of cards no
    /// longer held are dropped.
    pub fn set_hand(&mut self, cards: impl IntoIterator<Item = Card>) {
        let mut seen = HashSet::new();
        let unique: Vec<Card> = cards
            .into_iter()
            .filter(|card| {
                let fresh = seen.insert(card.id);
                if !fresh {
                    warn!(card_id = card.id, "Duplicate card id in hand, ignoring");
                }
                fresh
            })
            .collect();
        self.hand = sort_hand(unique, self.level);
        self.selected_ids.retain(|id| seen.contains(id));
    }

    pub fn apply_deal(&mut self, payload: DealCardsPayload) {
        self.level = payload.level;
        self.selected_ids.clear();
        self.set_hand(payload.cards);
        self.table_cards.clear();
        self.combo_type.clear();
        self.play_log.clear();
        self.player_card_counts = [STARTING_CARD_COUNT; SEAT_COUNT];
        self.pending_tribute = None;
        self.last_hand_result = None;
        self.game_result = None;
    }

    pub fn apply_turn(&mut self, payload: &TurnPayload) {
        self.current_turn = payload.seat;
        self.can_pass = payload.can_pass;
    }

    /// Apply a play or pass. Returns the highlight generation to expire later.
    pub fn apply_play(&mut self, payload: PlayMadePayload) -> u64 {
        self.play_log.push(PlayRecord {
            seat: payload.seat,
            cards: payload.cards.clone(),
            combo_type: payload.combo_type.clone(),
            is_pass: payload.is_pass,
        });
        let generation = self.last_play_seat.set(payload.seat);

        if payload.is_pass {
            return generation;
        }

        match self.player_card_counts.get_mut(payload.seat) {
            Some(count) => *count = count.saturating_sub(payload.cards.len()),
            None => warn!(seat = payload.seat, "Play from unknown seat, counts unchanged"),
        }

        // Scoped by membership, never by seat: ids not held are no-ops
        let played: HashSet<CardId> = payload.cards.iter().map(|card| card.id).collect();
        let remaining: Vec<Card> = self
            .hand
            .iter()
            .filter(|card| !played.contains(&card.id))
            .copied()
            .collect();
        if remaining.len() != self.hand.len() {
            self.set_hand(remaining);
        }

        self.table_cards = payload.cards;
        self.combo_type = payload.combo_type;
        generation
    }

    pub fn apply_hand_end(&mut self, payload: HandEndPayload) {
        self.team_levels = payload.new_levels;
        self.last_hand_result = Some(HandResult {
            finish_order: payload.finish_order,
            winning_team: payload.winning_team,
            level_advance: payload.level_advance,
            new_levels: payload.new_levels,
        });
    }

    pub fn apply_game_end(&mut self, payload: GameEndPayload) {
        self.team_levels = payload.final_levels;
        self.game_result = Some(GameResult {
            winning_team: payload.winning_team,
            final_levels: payload.final_levels,
        });
    }

    pub fn apply_tribute(&mut self, payload: &TributePayload) {
        self.pending_tribute = Some(PendingTribute {
            from_seat: payload.from_seat,
            to_seat: payload.to_seat,
        });
    }

    /// A card handed over by another seat. Returns false if already held.
    pub fn receive_card(&mut self, card: Card) -> bool {
        if self.holds(card.id) {
            return false;
        }
        let hand: Vec<Card> = self.hand.iter().copied().chain(Some(card)).collect();
        self.set_hand(hand);
        true
    }

    /// Returns the error generation to expire later
    pub fn apply_error(&mut self, message: String) -> u64 {
        self.error_message.set(message)
    }

    /// Flip selection of a held card. Cards not in hand are ignored.
    pub fn toggle(&mut self, id: CardId) -> bool {
        if !self.holds(id) {
            return false;
        }
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
        true
    }

    /// Hand out the current selection, clearing it. Ids come out ascending.
    pub fn take_selection(&mut self) -> Vec<CardId> {
        std::mem::take(&mut self.selected_ids).into_iter().collect()
    }

    /// Remove a card sent away as tribute. Refuses cards not held, wildcards,
    /// and calls made with no tribute pending.
    pub fn give_away(&mut self, id: CardId) -> Option<Card> {
        self.pending_tribute?;
        let card = *self.hand.iter().find(|card| card.id == id)?;
        if is_wild(&card, self.level) {
            return None;
        }
        let remaining: Vec<Card> = self.hand.iter().filter(|c| c.id != id).copied().collect();
        self.set_hand(remaining);
        self.pending_tribute = None;
        Some(card)
    }
}

/// Everything the reconciler owns
#[derive(Debug)]
pub struct ViewState {
    pub connected: bool,
    pub room: Option<RoomState>,
    pub my_seat: Option<Seat>,
    pub seat_names: BTreeMap<Seat, String>,
    pub game_active: bool,
    pub game: GameView,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            connected: false,
            room: None,
            my_seat: None,
            seat_names: BTreeMap::new(),
            game_active: false,
            game: GameView::default(),
        }
    }
}

impl ViewState {
    pub fn apply_room_state(&mut self, payload: RoomStatePayload) {
        self.my_seat = payload
            .players
            .iter()
            .find(|player| player.id == payload.your_id)
            .map(|player| player.seat);
        self.seat_names = payload
            .players
            .iter()
            .map(|player| (player.seat, player.name.clone()))
            .collect();
        self.game_active = payload.game_active;
        self.room = Some(RoomState {
            room_id: payload.room_id,
            players: payload.players,
            game_active: payload.game_active,
        });
    }

    pub fn apply_deal(&mut self, payload: DealCardsPayload) {
        self.set_game_active(true);
        self.game.apply_deal(payload);
    }

    pub fn apply_game_end(&mut self, payload: GameEndPayload) {
        self.set_game_active(false);
        self.game.apply_game_end(payload);
    }

    /// Keeps the room's copy of the flag in step
    fn set_game_active(&mut self, active: bool) {
        self.game_active = active;
        if let Some(room) = self.room.as_mut() {
            room.game_active = active;
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let game = &self.game;
        ViewSnapshot {
            connected: self.connected,
            room: self.room.clone(),
            my_seat: self.my_seat,
            seat_names: self.seat_names.clone(),
            game_active: self.game_active,
            hand: game.hand.clone(),
            level: game.level,
            selected_ids: game.selected_ids.clone(),
            current_turn: game.current_turn,
            can_pass: game.can_pass,
            table_cards: game.table_cards.clone(),
            combo_type: game.combo_type.clone(),
            player_card_counts: game.player_card_counts,
            team_levels: game.team_levels,
            play_log: game.play_log.iter().cloned().collect(),
            last_play_seat: game.last_play_seat.get().copied(),
            error_message: game.error_message.get().cloned(),
            last_hand_result: game.last_hand_result.clone(),
            game_result: game.game_result.clone(),
            pending_tribute: game.pending_tribute,
        }
    }
}

/// Read-only copy of the view handed to presentation
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub connected: bool,
    pub room: Option<RoomState>,
    pub my_seat: Option<Seat>,
    pub seat_names: BTreeMap<Seat, String>,
    pub game_active: bool,
    pub hand: Vec<Card>,
    pub level: Rank,
    pub selected_ids: BTreeSet<CardId>,
    pub current_turn: Seat,
    pub can_pass: bool,
    pub table_cards: Vec<Card>,
    pub combo_type: String,
    pub player_card_counts: [usize; SEAT_COUNT],
    pub team_levels: [Rank; 2],
    pub play_log: Vec<PlayRecord>,
    pub last_play_seat: Option<Seat>,
    pub error_message: Option<String>,
    pub last_hand_result: Option<HandResult>,
    pub game_result: Option<GameResult>,
    pub pending_tribute: Option<PendingTribute>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        ViewState::default().snapshot()
    }
}

impl ViewSnapshot {
    pub fn is_my_turn(&self) -> bool {
        self.my_seat == Some(self.current_turn)
    }

    /// Layout around the local seat; seat 0 until the room places us
    pub fn seat_layout(&self) -> SeatLayout {
        SeatLayout::from_seat(self.my_seat.unwrap_or(0))
    }

    pub fn seat_name(&self, seat: Seat) -> Option<&str> {
        self.seat_names.get(&seat).map(String::as_str)
    }

    pub fn is_wild(&self, card: &Card) -> bool {
        is_wild(card, self.level)
    }

    pub fn is_selected(&self, id: CardId) -> bool {
        self.selected_ids.contains(&id)
    }

    pub fn can_play(&self) -> bool {
        self.is_my_turn() && !self.selected_ids.is_empty()
    }

    pub fn can_pass_now(&self) -> bool {
        self.is_my_turn() && self.can_pass
    }
}
