use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trump::{ACE_LEVEL, Trump};
use crate::probability;
use core::fmt;

/// Longest possible sequence: four joker/trump-rank levels plus the twelve
/// natural ranks left once the trump rank is removed.
pub const MAX_SEQUENCES: usize = 16;

/// One group of groups: `sequences` consecutive levels holding `identical`
/// copies each. A single card is 1x1, a pair 2x1, a two-pair tractor 2x2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyType {
    pub trump: Trump,
    /// Play suit shared by every card in the property.
    pub suit: Suit,
    /// Level of the highest segment.
    pub leading: u8,
    pub identical: u8,
    pub sequences: u8,
    segment_suits: [Suit; MAX_SEQUENCES],
    /// Set when the same cards also admit a different reading, e.g. the
    /// pair in AA-KKK.
    pub has_other_combo: bool,
    /// Shape `(identical, sequences)` before the last conversion.
    pub converted_from: Option<(u8, u8)>,
}

impl PropertyType {
    pub fn from_card(card: Card, trump: Trump) -> Self {
        let mut segment_suits = [Suit::Jokers; MAX_SEQUENCES];
        segment_suits[0] = trump.actual_suit(card);
        Self {
            trump,
            suit: trump.play_suit(card),
            leading: trump.level(card),
            identical: 1,
            sequences: 1,
            segment_suits,
            has_other_combo: false,
            converted_from: None,
        }
    }

    /// A placeholder of the given shape for type-only reasoning. Its suit and
    /// leading level carry no meaning.
    pub fn of_shape(identical: u8, sequences: u8) -> Self {
        let sequences = sequences.clamp(1, MAX_SEQUENCES as u8);
        let mut segment_suits = [Suit::Jokers; MAX_SEQUENCES];
        segment_suits[..sequences as usize].fill(Suit::Spades);
        Self {
            trump: Trump::new(Suit::Jokers, Rank::Two),
            suit: Suit::Spades,
            leading: ACE_LEVEL,
            identical,
            sequences,
            segment_suits,
            has_other_combo: false,
            converted_from: None,
        }
    }

    /// Reshapes without recording a conversion. New segments copy the suit
    /// of the last existing one.
    pub(crate) fn with_shape(mut self, identical: u8, sequences: u8) -> Self {
        self.resize_segments(sequences);
        self.identical = identical;
        self
    }

    pub(crate) fn set_last_segment_suit(&mut self, suit: Suit) {
        if let Some(last) = (self.sequences as usize).checked_sub(1) {
            self.segment_suits[last] = suit;
        }
    }

    pub fn with_leading(mut self, leading: u8) -> Self {
        self.leading = leading;
        self
    }

    pub fn num_cards(&self) -> usize {
        self.identical as usize * self.sequences as usize
    }

    pub fn segment_suits(&self) -> &[Suit] {
        &self.segment_suits[..self.sequences as usize]
    }

    pub fn is_trump(&self) -> bool {
        self.suit == self.trump.suit
    }

    /// Same shape and same leading level; the suit is implied by callers.
    pub fn same_property(&self, other: &PropertyType) -> bool {
        self.exact_type(other) && self.leading == other.leading
    }

    pub fn exact_type(&self, other: &PropertyType) -> bool {
        self.identical == other.identical && self.sequences == other.sequences
    }

    /// True when `self` dominates `other` structurally.
    pub fn is_bigger_type_than(&self, other: &PropertyType) -> bool {
        self.identical >= other.identical && self.sequences >= other.sequences
    }

    pub fn is_smaller_type_than(&self, other: &PropertyType) -> bool {
        self.identical <= other.identical && self.sequences <= other.sequences
    }

    /// Whether `self` holds cards that stop `target` from being thrown:
    /// same suit, higher leading level, at least as wide and as long.
    pub fn is_breakable(&self, target: &PropertyType) -> bool {
        self.suit == target.suit
            && self.leading > target.leading
            && self.is_bigger_type_than(target)
    }

    /// Whether `self` can trump `target`, or over-trump it when `target` is
    /// trump already.
    pub fn is_trumpable(&self, target: &PropertyType) -> bool {
        self.suit == self.trump.suit
            && self.is_bigger_type_than(target)
            && (target.suit != self.trump.suit || self.leading > target.leading)
    }

    /// Keeps the leading segments and shrinks to `identical` x `sequences`.
    pub fn convert_to_type(mut self, identical: u8, sequences: u8) -> Self {
        debug_assert!(sequences <= self.sequences && identical <= self.identical);
        self.converted_from = Some((self.identical, self.sequences));
        self.with_shape(identical, sequences)
    }

    /// Shrinks to `identical` x `sequences`, choosing the window of segments
    /// whose cards carry the most points (`want_points`) or the fewest. Ties
    /// go to the lower window.
    pub fn convert_to_type_for_points(
        self,
        identical: u8,
        sequences: u8,
        want_points: bool,
    ) -> Self {
        let original = (self.identical, self.sequences);
        let levels = self.segment_levels();
        let points: Vec<u32> = levels
            .iter()
            .zip(self.segment_suits())
            .map(|(level, suit)| {
                self.trump
                    .card_at(*level, *suit)
                    .map_or(0, Card::points)
            })
            .collect();
        let width = (sequences as usize).min(points.len());
        let mut running: u32 = points[..width].iter().sum();
        let mut best = running;
        let mut start = 0;
        for window in 1..=points.len().saturating_sub(width) {
            running = running + points[window + width - 1] - points[window - 1];
            let better = if want_points {
                running >= best
            } else {
                running <= best
            };
            if better {
                best = running;
                start = window;
            }
        }
        let mut property = self.drop_leading_segments(start);
        if let Some(level) = levels.get(start) {
            property.leading = *level;
        }
        let mut converted = property.convert_to_type(identical, sequences);
        converted.converted_from = Some(original);
        converted
    }

    /// Every window of `target`'s shape inside `self`, highest first.
    pub fn convert_to_type_all_leading_numbers(&self, target: &PropertyType) -> Vec<Self> {
        if target.sequences > self.sequences || target.identical > self.identical {
            return Vec::new();
        }
        (0..=self.sequences - target.sequences)
            .filter_map(|skip| {
                let leading = self.trump.step_down(self.leading, skip)?;
                let mut window = self.drop_leading_segments(skip as usize);
                window.leading = leading;
                let mut converted = window.convert_to_type(target.identical, target.sequences);
                converted.converted_from = Some((self.identical, self.sequences));
                Some(converted)
            })
            .collect()
    }

    /// Level of every segment, highest first.
    pub fn segment_levels(&self) -> Vec<u8> {
        let mut levels = Vec::with_capacity(self.sequences as usize);
        let mut level = Some(self.leading);
        for _ in 0..self.sequences {
            let Some(current) = level else { break };
            levels.push(current);
            level = self.trump.next_lower(current);
        }
        levels
    }

    /// The physical cards, `identical` copies per segment, highest first.
    pub fn to_cards(&self) -> Vec<Card> {
        let cards: Vec<Card> = self
            .segment_levels()
            .into_iter()
            .zip(self.segment_suits())
            .filter_map(|(level, suit)| self.trump.card_at(level, *suit))
            .flat_map(|card| core::iter::repeat(card).take(self.identical as usize))
            .collect();
        debug_assert_eq!(cards.len(), self.num_cards(), "property {self:?} lost cards");
        cards
    }

    pub fn to_card_set(&self) -> CardSet {
        self.to_cards().into_iter().collect()
    }

    pub fn total_points(&self) -> u32 {
        self.to_cards().into_iter().map(Card::points).sum()
    }

    /// The lowest card carrying the most points.
    pub fn max_point_card(&self) -> Option<Card> {
        let mut best: Option<Card> = None;
        for card in self.to_cards().into_iter().rev() {
            if best.is_none_or(|b| card.points() > b.points()) {
                best = Some(card);
            }
        }
        best
    }

    /// The two shapes one step larger: one more segment (only for groups of
    /// two or more) and one more identical copy.
    pub fn parent_types(&self) -> Vec<Self> {
        let mut parents = Vec::with_capacity(2);
        if self.identical > 1 && (self.sequences as usize) < MAX_SEQUENCES {
            parents.push(self.with_shape(self.identical, self.sequences + 1));
        }
        parents.push(self.with_shape(self.identical + 1, self.sequences));
        parents
    }

    pub fn describe(&self) -> String {
        let group = match self.identical {
            1 => "A single".to_string(),
            2 => "A pair".to_string(),
            3 => "A triple".to_string(),
            k => format!("{k} of a kind"),
        };
        if self.sequences <= 1 {
            return group;
        }
        let plural = match self.identical {
            2 => "pairs".to_string(),
            3 => "triples".to_string(),
            _ => group,
        };
        format!("Consecutive {} sequences of {plural}", self.sequences)
    }

    /// Chance that one of `players` holds this shape when every level is
    /// dealt `decks` times.
    pub fn probability(&self, players: u8, decks: u8) -> f64 {
        probability::type_probability(players, decks, self.identical, self.sequences)
    }

    fn drop_leading_segments(mut self, count: usize) -> Self {
        let count = count.min(self.sequences as usize);
        self.segment_suits.copy_within(count..MAX_SEQUENCES, 0);
        self.segment_suits[MAX_SEQUENCES - count..].fill(Suit::Jokers);
        self.sequences -= count as u8;
        self
    }

    fn resize_segments(&mut self, sequences: u8) {
        let sequences = sequences.min(MAX_SEQUENCES as u8);
        let current = self.sequences as usize;
        let target = sequences as usize;
        if target > current {
            let last = if current == 0 {
                self.suit
            } else {
                self.segment_suits[current - 1]
            };
            self.segment_suits[current..target].fill(last);
        } else {
            self.segment_suits[target..].fill(Suit::Jokers);
        }
        self.sequences = sequences;
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}x{}:", self.identical, self.sequences)?;
        for card in self.to_cards() {
            write!(f, " {card}")?;
        }
        f.write_str("}")
    }
}
