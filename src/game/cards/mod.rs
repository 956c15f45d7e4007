pub mod basic;
pub mod ordering;

pub use basic::{Card, CardId, Rank, Suit};
pub use ordering::{compare_in_hand, is_wild, sort_hand, tier};
