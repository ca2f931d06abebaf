use core::fmt;
use serde::{Deserialize, Serialize};

/// Card suits in identity order. `Jokers` holds the two jokers and only acts
/// as a playable suit when a deal is played without a trump suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Suit {
    Diamonds = 0,
    Clubs = 1,
    Hearts = 2,
    Spades = 3,
    Jokers = 4,
}

impl Suit {
    pub const ALL: [Suit; 5] = [
        Suit::Diamonds,
        Suit::Clubs,
        Suit::Hearts,
        Suit::Spades,
        Suit::Jokers,
    ];

    pub const NATURAL: [Suit; 4] = [Suit::Diamonds, Suit::Clubs, Suit::Hearts, Suit::Spades];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Diamonds),
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Hearts),
            3 => Some(Suit::Spades),
            4 => Some(Suit::Jokers),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_jokers(self) -> bool {
        matches!(self, Suit::Jokers)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
            Suit::Hearts => "H",
            Suit::Spades => "S",
            Suit::Jokers => "J",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Clubs.to_string(), "C");
        assert_eq!(Suit::Jokers.to_string(), "J");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Hearts));
        assert_eq!(Suit::from_index(4), Some(Suit::Jokers));
        assert_eq!(Suit::from_index(5), None);
    }

    #[test]
    fn natural_suits_exclude_jokers() {
        assert!(Suit::NATURAL.iter().all(|suit| !suit.is_jokers()));
        assert_eq!(Suit::ALL.len(), Suit::NATURAL.len() + 1);
    }
}
