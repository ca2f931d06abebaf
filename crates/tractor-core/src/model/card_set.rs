use crate::model::card::{CARDS_PER_DECK, Card};
use crate::model::suit::Suit;
use crate::model::trump::Trump;
use core::fmt;

/// A multiset of cards stored as one counter per card identity. Removing
/// cards produces a new value, so callers never observe each other's edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardSet {
    counts: [u8; CARDS_PER_DECK],
}

impl Default for CardSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSet {
    pub const fn new() -> Self {
        Self {
            counts: [0; CARDS_PER_DECK],
        }
    }

    pub fn from_cards<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut set = Self::new();
        set.extend(cards.into_iter().copied());
        set
    }

    pub fn insert(&mut self, card: Card) {
        let slot = &mut self.counts[card.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        for card in cards {
            self.insert(card);
        }
    }

    /// Removes one copy of `card`; returns false when none was present.
    pub fn remove(&mut self, card: Card) -> bool {
        let slot = &mut self.counts[card.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn count(&self, card: Card) -> u8 {
        self.counts[card.index()]
    }

    pub fn len(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn contains_all(&self, other: &CardSet) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .all(|(mine, theirs)| mine >= theirs)
    }

    /// Cards of `self` left after taking away `other`, one copy per copy.
    pub fn difference(&self, other: &CardSet) -> CardSet {
        let mut counts = self.counts;
        for (slot, taken) in counts.iter_mut().zip(other.counts.iter()) {
            *slot = slot.saturating_sub(*taken);
        }
        CardSet { counts }
    }

    /// Every card copy in identity order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.counts.iter().enumerate().flat_map(|(index, &count)| {
            Card::from_index(index)
                .into_iter()
                .flat_map(move |card| core::iter::repeat(card).take(count as usize))
        })
    }

    /// Card copies sorted from highest to lowest for the deal.
    pub fn sorted(&self, trump: &Trump) -> Vec<Card> {
        let mut cards: Vec<Card> = self.iter().collect();
        trump.sort_descending(&mut cards);
        cards
    }

    pub fn of_play_suit(&self, trump: &Trump, suit: Suit) -> CardSet {
        let mut set = CardSet::new();
        set.extend(self.iter().filter(|card| trump.play_suit(*card) == suit));
        set
    }

    /// Distinct play suits present, in suit order.
    pub fn play_suits(&self, trump: &Trump) -> Vec<Suit> {
        let mut suits: Vec<Suit> = self.iter().map(|card| trump.play_suit(card)).collect();
        suits.sort();
        suits.dedup();
        suits
    }

    pub fn total_points(&self) -> u32 {
        self.iter().map(Card::points).sum()
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::new();
        set.extend(iter);
        set
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CardSet;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::Trump;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn multiset_counts_duplicates() {
        let king = card(Rank::King, Suit::Clubs);
        let mut set = CardSet::from_cards(&[king, king, card(Rank::Ace, Suit::Clubs)]);
        assert_eq!(set.count(king), 2);
        assert_eq!(set.len(), 3);
        assert!(set.remove(king));
        assert!(set.remove(king));
        assert!(!set.remove(king));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn difference_leaves_original_untouched() {
        let nine = card(Rank::Nine, Suit::Spades);
        let hand = CardSet::from_cards(&[nine, nine, Card::BIG_JOKER]);
        let played = CardSet::from_cards(&[nine, Card::SMALL_JOKER]);
        let rest = hand.difference(&played);
        assert_eq!(rest.len(), 2);
        assert_eq!(hand.len(), 3);
        assert!(hand.contains_all(&rest));
        assert!(!rest.contains_all(&hand));
    }

    #[test]
    fn play_suit_views_follow_trump() {
        let trump = Trump::new(Suit::Hearts, Rank::Two);
        let hand = CardSet::from_cards(&[
            card(Rank::Two, Suit::Clubs),
            card(Rank::King, Suit::Clubs),
            card(Rank::Five, Suit::Diamonds),
        ]);
        assert_eq!(hand.play_suits(&trump), vec![Suit::Diamonds, Suit::Clubs, Suit::Hearts]);
        assert_eq!(hand.of_play_suit(&trump, Suit::Clubs).len(), 1);
        assert_eq!(hand.total_points(), 15);
        assert_eq!(hand.sorted(&trump)[0], card(Rank::Two, Suit::Clubs));
    }
}
