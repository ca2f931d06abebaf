use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of distinct card identities in one deck, jokers included.
pub const CARDS_PER_DECK: usize = 54;
pub const CARDS_PER_SUIT: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const SMALL_JOKER: Card = Card::new(Rank::SmallJoker, Suit::Jokers);
    pub const BIG_JOKER: Card = Card::new(Rank::BigJoker, Suit::Jokers);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Identity index: `rank + 13 * suit` for natural cards, 52 and 53 for
    /// the small and big joker.
    pub const fn index(self) -> usize {
        match self.rank {
            Rank::SmallJoker => 52,
            Rank::BigJoker => 53,
            rank => rank.value() as usize + CARDS_PER_SUIT as usize * self.suit.index(),
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            52 => Some(Card::SMALL_JOKER),
            53 => Some(Card::BIG_JOKER),
            _ if index < 52 => {
                let suit = match Suit::from_index(index / CARDS_PER_SUIT as usize) {
                    Some(suit) => suit,
                    None => return None,
                };
                match Rank::from_value((index % CARDS_PER_SUIT as usize) as u8) {
                    Some(rank) => Some(Card::new(rank, suit)),
                    None => None,
                }
            }
            _ => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        self.rank.is_joker()
    }

    pub const fn points(self) -> u32 {
        self.rank.points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{}{}", self.rank, self.suit)
        }
    }
}
