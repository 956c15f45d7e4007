use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Stable identity of a physical card within a hand.
pub type CardId = u32;

/// Suits in their fixed numeric order; the order is also the hand tiebreak.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
    Joker = 4,
}

impl PartialOrd for Suit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Hearts => "H",
                Suit::Diamonds => "D",
                Suit::Clubs => "C",
                Suit::Spades => "S",
                Suit::Joker => "",
            }
        )
    }
}

impl From<Suit> for u8 {
    fn from(suit: Suit) -> Self {
        suit as u8
    }
}

impl TryFrom<u8> for Suit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Suit::iter()
            .find(|suit| *suit as u8 == value)
            .ok_or_else(|| format!("unknown suit {}", value))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
    BlackJoker = 13,
    RedJoker = 14,
}

impl Rank {
    /// Natural position, Two=0 through RedJoker=14.
    pub fn position(self) -> u8 {
        self as u8
    }

    pub fn is_joker(self) -> bool {
        matches!(self, Rank::BlackJoker | Rank::RedJoker)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Rank::Two => "2",
                Rank::Three => "3",
                Rank::Four => "4",
                Rank::Five => "5",
                Rank::Six => "6",
                Rank::Seven => "7",
                Rank::Eight => "8",
                Rank::Nine => "9",
                Rank::Ten => "10",
                Rank::Jack => "J",
                Rank::Queen => "Q",
                Rank::King => "K",
                Rank::Ace => "A",
                Rank::BlackJoker => "BJ",
                Rank::RedJoker => "RJ",
            }
        )
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank as u8
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::iter()
            .find(|rank| *rank as u8 == value)
            .ok_or_else(|| format!("unknown rank {}", value))
    }
}

/// A dealt card. Field names match the server's JSON (`Suit`, `Rank`, `Id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Card {
    #[serde(rename = "Suit")]
    pub suit: Suit,
    #[serde(rename = "Rank")]
    pub rank: Rank,
    #[serde(rename = "Id")]
    pub id: CardId,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit, id: CardId) -> Self {
        Self { suit, rank, id }
    }

    /// The two-deck, 108-card pack in the server's id order.
    pub fn double_deck() -> Vec<Card> {
        let mut cards = Vec::with_capacity(108);
        let mut id = 0;
        for _ in 0..2 {
            for suit in Suit::iter().filter(|s| *s != Suit::Joker) {
                for rank in Rank::iter().filter(|r| !r.is_joker()) {
                    cards.push(Card::new(rank, suit, id));
                    id += 1;
                }
            }
            cards.push(Card::new(Rank::BlackJoker, Suit::Joker, id));
            cards.push(Card::new(Rank::RedJoker, Suit::Joker, id + 1));
            id += 2;
        }
        cards
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_wire_format() {
        let card = Card::new(Rank::Three, Suit::Hearts, 14);
        let json = serde_json::to_value(card).unwrap();
        assert_eq!(json, serde_json::json!({"Suit": 0, "Rank": 1, "Id": 14}));

        let back: Card = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_out_of_range_encoding_rejected() {
        assert!(serde_json::from_str::<Card>(r#"{"Suit":5,"Rank":1,"Id":1}"#).is_err());
        assert!(serde_json::from_str::<Card>(r#"{"Suit":0,"Rank":15,"Id":1}"#).is_err());
        assert!(Rank::try_from(15).is_err());
        assert_eq!(Rank::try_from(14), Ok(Rank::RedJoker));
    }

    #[test]
    fn test_suit_numeric_order() {
        assert!(Suit::Hearts < Suit::Diamonds);
        assert!(Suit::Diamonds < Suit::Clubs);
        assert!(Suit::Clubs < Suit::Spades);
        assert!(Suit::Spades < Suit::Joker);
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new(Rank::King, Suit::Hearts, 0).to_string(), "KH");
        assert_eq!(Card::new(Rank::Ten, Suit::Spades, 1).to_string(), "10S");
        assert_eq!(Card::new(Rank::RedJoker, Suit::Joker, 2).to_string(), "RJ");
    }

    #[test]
    fn test_double_deck_ids_unique() {
        let deck = Card::double_deck();
        assert_eq!(deck.len(), 108);
        let ids: std::collections::HashSet<_> = deck.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 108);
        assert_eq!(deck.iter().filter(|c| c.suit == Suit::Joker).count(), 4);
    }
}
