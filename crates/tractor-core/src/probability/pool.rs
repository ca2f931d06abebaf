use crate::model::card::{CARDS_PER_DECK, Card};
use crate::model::suit::Suit;
use crate::model::trump::{MAJOR_TRUMP_LEVEL, MINOR_TRUMP_LEVEL, Trump};
use crate::probability::approximate;
use crate::property::PropertyType;

/// Unseen copies of every card identity from one player's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingPool {
    trump: Trump,
    decks: u8,
    counts: [u8; CARDS_PER_DECK],
}

impl RemainingPool {
    pub fn new(trump: Trump, decks: u8) -> Self {
        Self {
            trump,
            decks,
            counts: [decks; CARDS_PER_DECK],
        }
    }

    pub(crate) fn from_counts(trump: Trump, decks: u8, counts: [u8; CARDS_PER_DECK]) -> Self {
        Self {
            trump,
            decks,
            counts,
        }
    }

    pub fn trump(&self) -> Trump {
        self.trump
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    pub fn counts(&self) -> &[u8; CARDS_PER_DECK] {
        &self.counts
    }

    /// Marks cards as seen. Seeing more copies than exist is clamped at zero.
    pub fn observe<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        for card in cards {
            let slot = &mut self.counts[card.index()];
            *slot = slot.saturating_sub(1);
        }
    }

    pub fn remaining(&self, card: Card) -> u8 {
        self.counts[card.index()]
    }

    /// Unseen copies of the card at `level` printed in `suit`; zero when no
    /// such card exists.
    pub fn remaining_at(&self, level: u8, suit: Suit) -> u32 {
        self.trump
            .card_at(level, suit)
            .map_or(0, |card| u32::from(self.remaining(card)))
    }

    /// Chance that no unseen property of the same shape and suit but higher
    /// leading level turns up in one of `players` hands. Each candidate
    /// leading level above `property` contributes one must-fail factor; a
    /// candidate that would use an off-suit trump-rank card contributes one
    /// factor per printed suit.
    pub fn current_property_probability(
        &self,
        property: &PropertyType,
        players: u8,
        fixed_player: bool,
    ) -> f64 {
        let suit = property.suit;
        let Some(highest) = self.trump.highest_level(suit) else {
            return 1.0;
        };
        let mut floor = property.leading;
        if suit.is_jokers() {
            floor = floor.max(MAJOR_TRUMP_LEVEL);
        }
        let identical = u32::from(property.identical);
        let sequences = u32::from(property.sequences);
        let players = u32::from(players);
        let mut survival = 1.0;
        let mut top = Some(highest);
        while let Some(level) = top.filter(|level| *level > floor) {
            top = self.trump.next_lower(level);
            let Some(segments) = self.segment_levels(level, property.sequences) else {
                continue;
            };
            let crosses_minor = level >= MINOR_TRUMP_LEVEL
                && segments.iter().any(|segment| *segment <= MINOR_TRUMP_LEVEL);
            if !crosses_minor {
                let counts: Vec<u32> = segments
                    .iter()
                    .map(|segment| self.remaining_at(*segment, suit))
                    .collect();
                survival *= 1.0 - approximate(players, &counts, fixed_player, identical, sequences);
            } else {
                // TODO: the per-suit factors are not independent for tractors
                // longer than two; compare against `exact` before relying on them.
                for minor_suit in Suit::NATURAL.iter().copied().filter(|s| *s != suit) {
                    let counts: Vec<u32> = segments
                        .iter()
                        .map(|segment| {
                            let printed = if *segment == MINOR_TRUMP_LEVEL {
                                minor_suit
                            } else {
                                suit
                            };
                            self.remaining_at(*segment, printed)
                        })
                        .collect();
                    survival *=
                        1.0 - approximate(players, &counts, fixed_player, identical, sequences);
                    if survival == 0.0 {
                        return 0.0;
                    }
                }
            }
            if survival == 0.0 {
                return 0.0;
            }
        }
        debug_assert!((0.0..=1.0).contains(&survival));
        survival
    }

    /// Complement of [`Self::current_property_probability`]: the chance
    /// that some hand holds a bigger property of the same shape.
    pub fn beat_probability(&self, property: &PropertyType, players: u8, fixed_player: bool) -> f64 {
        1.0 - self.current_property_probability(property, players, fixed_player)
    }

    /// Points still unseen in `suit` strictly above `floor`.
    pub fn total_points_above(&self, suit: Suit, floor: u8) -> u32 {
        let Some(highest) = self.trump.highest_level(suit) else {
            return 0;
        };
        let minor_has_points = self.trump.rank.points() > 0;
        let mut total = 0;
        let mut level = Some(highest);
        while let Some(current) = level.filter(|l| *l > floor) {
            if current == MINOR_TRUMP_LEVEL {
                if minor_has_points {
                    total += Suit::NATURAL
                        .iter()
                        .filter(|s| **s != self.trump.suit)
                        .map(|s| self.minor_points(*s))
                        .sum::<u32>();
                }
            } else if let Some(card) = self.trump.card_at(current, suit) {
                total += u32::from(self.remaining(card)) * card.points();
            }
            level = self.trump.next_lower(current);
        }
        total
    }

    /// Copies of a play suit in a full shoe.
    pub fn total_cards_in_suit(&self, suit: Suit) -> u32 {
        let decks = u32::from(self.decks);
        let per_suit = u32::from(crate::model::card::CARDS_PER_SUIT);
        let no_trump = self.trump.suit.is_jokers();
        match (suit == self.trump.suit, no_trump) {
            (false, _) if suit.is_jokers() => 0,
            (false, false) => (per_suit - 1) * decks,
            (false, true) => per_suit * decks,
            (true, false) => (per_suit + 5) * decks,
            (true, true) => 6 * decks,
        }
    }

    /// Unseen copies of a play suit, off-suit trump-rank cards included for
    /// the trump suit.
    pub fn remaining_cards_in_suit(&self, suit: Suit) -> u32 {
        let (Some(highest), Some(lowest)) =
            (self.trump.highest_level(suit), self.trump.lowest_level(suit))
        else {
            return 0;
        };
        let mut total = 0;
        let mut level = Some(highest);
        while let Some(current) = level.filter(|l| *l >= lowest) {
            if current == MINOR_TRUMP_LEVEL {
                total += Suit::NATURAL
                    .iter()
                    .filter(|s| **s != suit)
                    .map(|s| self.remaining_at(current, *s))
                    .sum::<u32>();
            } else {
                total += self.remaining_at(current, suit);
            }
            level = self.trump.next_lower(current);
        }
        total
    }

    fn minor_points(&self, suit: Suit) -> u32 {
        let card = Card::new(self.trump.rank, suit);
        u32::from(self.remaining(card)) * card.points()
    }

    fn segment_levels(&self, leading: u8, sequences: u8) -> Option<Vec<u8>> {
        let mut levels = Vec::with_capacity(sequences as usize);
        let mut level = leading;
        for index in 0..sequences {
            if index > 0 {
                level = self.trump.next_lower(level)?;
            }
            levels.push(level);
        }
        Some(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::RemainingPool;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::Trump;
    use crate::property::PropertyType;

    const TRUMP: Trump = Trump::new(Suit::Hearts, Rank::Two);

    fn pair(rank: Rank, suit: Suit) -> PropertyType {
        PropertyType::from_card(Card::new(rank, suit), TRUMP).with_shape(2, 1)
    }

    #[test]
    fn top_pair_always_survives() {
        let pool = RemainingPool::new(TRUMP, 2);
        let aces = pair(Rank::Ace, Suit::Clubs);
        assert_eq!(pool.current_property_probability(&aces, 3, false), 1.0);
        assert_eq!(pool.beat_probability(&aces, 3, false), 0.0);
    }

    #[test]
    fn survival_shrinks_as_leading_drops() {
        let pool = RemainingPool::new(TRUMP, 2);
        let mut previous = 1.0;
        for rank in [Rank::Ace, Rank::King, Rank::Queen, Rank::Nine, Rank::Five, Rank::Three] {
            let survival = pool.current_property_probability(&pair(rank, Suit::Clubs), 3, false);
            assert!(survival <= previous, "{rank} went up");
            previous = survival;
        }
        assert!(previous < 1.0);
    }

    #[test]
    fn seen_cards_stop_counting() {
        let mut pool = RemainingPool::new(TRUMP, 2);
        let ace = Card::new(Rank::Ace, Suit::Clubs);
        pool.observe([ace]);
        let kings = pair(Rank::King, Suit::Clubs);
        assert_eq!(pool.current_property_probability(&kings, 3, false), 1.0);
        pool.observe([ace, ace]);
        assert_eq!(pool.remaining(ace), 0);
    }

    #[test]
    fn suit_totals() {
        let mut pool = RemainingPool::new(TRUMP, 2);
        assert_eq!(pool.total_cards_in_suit(Suit::Clubs), 24);
        assert_eq!(pool.total_cards_in_suit(Suit::Hearts), 36);
        assert_eq!(pool.remaining_cards_in_suit(Suit::Clubs), 24);
        assert_eq!(pool.remaining_cards_in_suit(Suit::Hearts), 36);
        pool.observe([Card::new(Rank::Two, Suit::Clubs), Card::BIG_JOKER]);
        assert_eq!(pool.remaining_cards_in_suit(Suit::Hearts), 34);
        assert_eq!(pool.remaining_cards_in_suit(Suit::Clubs), 24);
    }

    #[test]
    fn points_above_floor() {
        let pool = RemainingPool::new(TRUMP, 2);
        // K and 10 above the Nine: 2 * (10 + 10)
        assert_eq!(pool.total_points_above(Suit::Spades, Rank::Nine.value()), 40);
        assert_eq!(pool.total_points_above(Suit::Spades, Rank::Three.value()), 50);
        let ten_trump = RemainingPool::new(Trump::new(Suit::Hearts, Rank::Ten), 1);
        // all four tens count for the trump suit, plus 5H and KH
        assert_eq!(ten_trump.total_points_above(Suit::Hearts, 0), 55);
    }
}
