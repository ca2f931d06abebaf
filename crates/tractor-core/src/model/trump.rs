use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

pub const ACE_LEVEL: u8 = 12;
/// Trump-rank card of a suit other than the trump suit.
pub const MINOR_TRUMP_LEVEL: u8 = 13;
/// Trump-rank card of the trump suit.
pub const MAJOR_TRUMP_LEVEL: u8 = 14;
pub const SMALL_JOKER_LEVEL: u8 = 15;
pub const BIG_JOKER_LEVEL: u8 = 16;

/// The per-deal trump context. `suit` is `Suit::Jokers` for a deal played
/// without a trump suit; `rank` is always a natural rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trump {
    pub suit: Suit,
    pub rank: Rank,
}

impl Trump {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// The suit a card is played as: jokers and trump-rank cards count as
    /// the trump suit.
    pub fn play_suit(&self, card: Card) -> Suit {
        if card.is_joker() || card.rank == self.rank {
            self.suit
        } else {
            card.suit
        }
    }

    /// The suit a card keeps inside a property. Only jokers are moved; a
    /// trump-rank card remembers its printed suit.
    pub fn actual_suit(&self, card: Card) -> Suit {
        if card.is_joker() { self.suit } else { card.suit }
    }

    pub fn is_trump(&self, card: Card) -> bool {
        self.play_suit(card) == self.suit
    }

    pub fn level(&self, card: Card) -> u8 {
        match card.rank {
            Rank::SmallJoker => SMALL_JOKER_LEVEL,
            Rank::BigJoker => BIG_JOKER_LEVEL,
            rank if rank == self.rank => {
                if card.suit == self.suit {
                    MAJOR_TRUMP_LEVEL
                } else {
                    MINOR_TRUMP_LEVEL
                }
            }
            rank => rank.value(),
        }
    }

    /// The next level below `level` inside a sequence. The trump rank never
    /// takes part in a natural sequence, so it is skipped.
    pub fn next_lower(&self, level: u8) -> Option<u8> {
        let lower = level.checked_sub(1)?;
        if lower == self.rank.value() {
            lower.checked_sub(1)
        } else {
            Some(lower)
        }
    }

    /// Steps `steps` times down from `level`.
    pub fn step_down(&self, level: u8, steps: u8) -> Option<u8> {
        (0..steps).try_fold(level, |current, _| self.next_lower(current))
    }

    /// The physical card at a property level. `suit` selects the printed
    /// suit for trump-rank and natural levels and is ignored for jokers.
    pub fn card_at(&self, level: u8, suit: Suit) -> Option<Card> {
        match level {
            BIG_JOKER_LEVEL => Some(Card::BIG_JOKER),
            SMALL_JOKER_LEVEL => Some(Card::SMALL_JOKER),
            MINOR_TRUMP_LEVEL | MAJOR_TRUMP_LEVEL if !suit.is_jokers() => {
                Some(Card::new(self.rank, suit))
            }
            _ if level <= ACE_LEVEL && !suit.is_jokers() => {
                Rank::from_value(level).map(|rank| Card::new(rank, suit))
            }
            _ => None,
        }
    }

    pub fn highest_level(&self, suit: Suit) -> Option<u8> {
        if suit == self.suit {
            Some(BIG_JOKER_LEVEL)
        } else if suit.is_jokers() {
            None
        } else if self.rank == Rank::Ace {
            Some(ACE_LEVEL - 1)
        } else {
            Some(ACE_LEVEL)
        }
    }

    pub fn lowest_level(&self, suit: Suit) -> Option<u8> {
        if suit.is_jokers() {
            if suit == self.suit {
                Some(MINOR_TRUMP_LEVEL)
            } else {
                None
            }
        } else if self.rank == Rank::Two {
            Some(Rank::Three.value())
        } else {
            Some(Rank::Two.value())
        }
    }

    /// Per-deal order of two cards; `Less` means `a` ranks higher.
    pub fn compare(&self, a: Card, b: Card) -> Ordering {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib {
            return Ordering::Equal;
        }
        if a.is_joker() || b.is_joker() {
            return ib.cmp(&ia);
        }
        let (a_rank, b_rank) = (a.rank == self.rank, b.rank == self.rank);
        match (a_rank, b_rank) {
            (true, true) => {
                if a.suit == self.suit {
                    Ordering::Less
                } else if b.suit == self.suit {
                    Ordering::Greater
                } else {
                    b.suit.cmp(&a.suit)
                }
            }
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => match (a.suit == self.suit, b.suit == self.suit) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => ib.cmp(&ia),
            },
        }
    }

    /// Sorts cards from highest to lowest for this deal.
    pub fn sort_descending(&self, cards: &mut [Card]) {
        cards.sort_by(|a, b| self.compare(*a, *b));
    }
}
