use std::cmp::Ordering;

use super::basic::{Card, Rank, Suit};

const RED_JOKER_TIER: u8 = 100;
const BLACK_JOKER_TIER: u8 = 99;
const LEVEL_TIER: u8 = 98;

/// Sort key of a card under the current level: jokers on top, then level
/// cards, then everything else by natural rank.
pub fn tier(card: &Card, level: Rank) -> u8 {
    match card.rank {
        Rank::RedJoker => RED_JOKER_TIER,
        Rank::BlackJoker => BLACK_JOKER_TIER,
        rank if rank == level => LEVEL_TIER,
        rank => rank.position(),
    }
}

/// Hand order: ascending tier, ties broken by ascending suit.
pub fn compare_in_hand(a: &Card, b: &Card, level: Rank) -> Ordering {
    tier(a, level)
        .cmp(&tier(b, level))
        .then_with(|| a.suit.cmp(&b.suit))
}

/// Orders a whole hand from scratch. Stable, so equal cards keep arrival order.
pub fn sort_hand(cards: impl IntoIterator<Item = Card>, level: Rank) -> Vec<Card> {
    let mut hand: Vec<Card> = cards.into_iter().collect();
    hand.sort_by(|a, b| compare_in_hand(a, b, level));
    hand
}

/// Hearts of the level rank are wild. Jokers never are.
pub fn is_wild(card: &Card, level: Rank) -> bool {
    card.suit == Suit::Hearts && card.rank == level
}
