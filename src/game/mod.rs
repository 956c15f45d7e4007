// Public API
pub use cards::{compare_in_hand, is_wild, sort_hand, tier, Card, CardId, Rank, Suit};
pub use seats::{team_of, Seat, SeatLayout, SEAT_COUNT};

// Internal modules
mod cards;
mod seats;
