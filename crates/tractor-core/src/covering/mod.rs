//! Covering search: which cards of a pool match or beat a set of target
//! properties, and the rules built on it (forced properties, follow and
//! throw legality, trick winners, point-targeted discards).

pub mod forced;
pub mod legality;
pub mod select;

pub use forced::{Forced, eliminate_property};
pub use legality::FollowVerdict;
pub use select::PointTarget;

use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::deal::DealParams;
use crate::model::trump::Trump;
use crate::probability::TypeOdds;
use crate::property::{Decomposition, PropertyComparator, PropertyOrder, PropertyType};

/// How a covering is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoveringMode {
    /// Match the target's shape with the least important properties.
    Follow,
    /// Beat the target; the highest leading level wins.
    Lead,
    MaxLeadPoint,
    MaxLeadNoPoint,
    /// Beat the target with the smallest sufficient window, shedding points.
    MinLeadPoint,
    MinLeadNoPoint,
    FollowPoint,
    FollowNoPoint,
    NoPointMaxLead,
}

impl CoveringMode {
    fn is_follow(self) -> bool {
        matches!(
            self,
            CoveringMode::Follow | CoveringMode::FollowPoint | CoveringMode::FollowNoPoint
        )
    }

    fn wants_points(self) -> bool {
        matches!(
            self,
            CoveringMode::MaxLeadPoint | CoveringMode::MinLeadPoint | CoveringMode::FollowPoint
        )
    }

    /// Modes that keep a candidate's own leading level when reshaping it.
    fn keeps_leading(self) -> bool {
        matches!(
            self,
            CoveringMode::Lead
                | CoveringMode::MaxLeadPoint
                | CoveringMode::MaxLeadNoPoint
                | CoveringMode::Follow
        )
    }

    /// Order in which candidates are tried.
    fn candidate_order(self) -> PropertyOrder {
        match self {
            CoveringMode::Lead | CoveringMode::MaxLeadPoint | CoveringMode::MaxLeadNoPoint => {
                PropertyOrder::DecreasingLeading
            }
            CoveringMode::Follow => PropertyOrder::InTypeInLeading,
            CoveringMode::MinLeadPoint | CoveringMode::FollowPoint => PropertyOrder::DePointsInImp,
            CoveringMode::MinLeadNoPoint | CoveringMode::FollowNoPoint => {
                PropertyOrder::InPointsInImp
            }
            CoveringMode::NoPointMaxLead => PropertyOrder::InPointsDeLeading,
        }
    }
}

/// A successful covering: the property that covers the target and every
/// card used, the target's cards first.
#[derive(Debug, Clone, PartialEq)]
pub struct Covering {
    pub property: PropertyType,
    pub cards: Vec<Card>,
}

/// Search and rule engine for one deal.
#[derive(Debug, Clone)]
pub struct CoveringEngine {
    params: DealParams,
    odds: TypeOdds,
}

impl CoveringEngine {
    pub fn new(params: DealParams) -> Self {
        Self {
            odds: TypeOdds::new(params.players, params.decks),
            params,
        }
    }

    pub fn params(&self) -> &DealParams {
        &self.params
    }

    pub fn trump(&self) -> Trump {
        self.params.trump
    }

    pub fn odds(&self) -> &TypeOdds {
        &self.odds
    }

    pub fn comparator(&self, order: PropertyOrder) -> PropertyComparator<'_> {
        PropertyComparator::new(order, self.params.trump.suit, &self.odds)
    }

    pub fn sort(&self, properties: &mut [PropertyType], order: PropertyOrder) {
        self.comparator(order).sort(properties);
    }

    pub fn decompose(&self, cards: &CardSet) -> Decomposition {
        Decomposition::new(cards, self.params.trump)
    }

    /// Candidates able to cover `target`. In plain follow mode an exact,
    /// unambiguous match ends the search, and once such a match is listed
    /// other properties of the same shape add nothing.
    fn cover_all_ways(
        &self,
        target: &PropertyType,
        properties: &[PropertyType],
        mode: CoveringMode,
    ) -> Vec<PropertyType> {
        let mut sorted = properties.to_vec();
        self.sort(&mut sorted, PropertyOrder::InTypeInLeading);
        let mut covering: Vec<PropertyType> = Vec::new();
        for property in sorted {
            let usable = target.is_smaller_type_than(&property)
                && (mode.is_follow()
                    || property.is_breakable(target)
                    || property.is_trumpable(target));
            if !usable {
                continue;
            }
            if mode == CoveringMode::Follow {
                if property.exact_type(target) && !property.has_other_combo {
                    return vec![property];
                }
                let redundant = covering
                    .iter()
                    .any(|kept| kept.exact_type(&property) && !kept.has_other_combo);
                if redundant {
                    continue;
                }
            }
            covering.push(property);
        }
        covering
    }

    /// Finds cards in `pool` that cover `target` and then every property in
    /// `rest`. In lead modes the target must be beaten, not just matched.
    /// Candidates are tried in the mode's order and the first one whose
    /// remainder still covers `rest` wins.
    pub fn find_best_covering(
        &self,
        target: &PropertyType,
        rest: &[PropertyType],
        pool: &CardSet,
        mode: CoveringMode,
    ) -> Option<Covering> {
        let decomposition = self.decompose(pool);
        let mut candidates = self.cover_all_ways(target, &decomposition.properties, mode);
        candidates.extend(self.cover_all_ways(target, &decomposition.secondary, mode));
        let order = mode.candidate_order();
        self.sort(&mut candidates, order);
        let want_points = mode.wants_points();

        for candidate in candidates {
            let windows = if mode.keeps_leading() {
                vec![candidate.convert_to_type(target.identical, target.sequences)]
            } else {
                let mut windows = candidate.convert_to_type_all_leading_numbers(target);
                if matches!(
                    mode,
                    CoveringMode::MinLeadPoint
                        | CoveringMode::MinLeadNoPoint
                        | CoveringMode::NoPointMaxLead
                ) {
                    windows.retain(|w| w.is_breakable(target) || w.is_trumpable(target));
                }
                self.sort(&mut windows, order);
                windows
            };
            for window in windows {
                let window_cards = window.to_cards();
                let remaining = pool.difference(&CardSet::from_cards(&window_cards));
                if let Some(rest_cards) = self.cover_properties(rest, &remaining, want_points) {
                    let mut cards = window_cards;
                    cards.extend(rest_cards);
                    return Some(Covering {
                        property: window,
                        cards,
                    });
                }
            }
        }
        None
    }

    /// Cards from `pool` matching every property in `properties`, or `None`
    /// when the pool cannot. Singles are filled from whatever remains,
    /// picking point cards first when `want_points`.
    pub fn cover_properties(
        &self,
        properties: &[PropertyType],
        pool: &CardSet,
        want_points: bool,
    ) -> Option<Vec<Card>> {
        if properties.is_empty() {
            return Some(Vec::new());
        }
        let mut sorted = properties.to_vec();
        self.sort(&mut sorted, PropertyOrder::DeTypeDeLeading);
        let total: usize = sorted.iter().map(PropertyType::num_cards).sum();
        if total > pool.len() {
            return None;
        }
        let first = sorted.remove(0);
        if first.num_cards() == 1 {
            let target = if want_points {
                PointTarget::Maximize
            } else {
                PointTarget::Limit(0)
            };
            let cards = self.select_cards_targeting_points(pool, total, target, false);
            debug_assert_eq!(cards.len(), total, "filled covering left slots empty");
            return Some(cards);
        }
        let mode = if want_points {
            CoveringMode::FollowPoint
        } else {
            CoveringMode::FollowNoPoint
        };
        self.find_best_covering(&first, &sorted, pool, mode)
            .map(|covering| covering.cards)
    }

    /// The property a play is judged by: its most important one.
    pub fn winning_property(&self, cards: &CardSet) -> Option<PropertyType> {
        let mut properties = self.decompose(cards).properties;
        self.sort(&mut properties, PropertyOrder::DeTypeDeLeading);
        properties.into_iter().next()
    }

    /// Whether `follow` beats `current`, the best property shown so far for
    /// the trick led by `lead`. Returns the property `follow` wins with.
    pub fn is_winning_play(
        &self,
        lead: &CardSet,
        follow: &CardSet,
        current: &PropertyType,
    ) -> Option<PropertyType> {
        let led = self.decompose(lead);
        let followed = self.decompose(follow);
        if followed.mixed {
            return None;
        }
        if followed.suit != led.suit && !followed.is_trump_suit() {
            return None;
        }
        // a legal throw cannot be beaten inside its own suit
        if followed.suit == led.suit && led.properties.len() > 1 {
            return None;
        }
        let mut rest = led.properties;
        self.sort(&mut rest, PropertyOrder::DeTypeDeLeading);
        if !rest.is_empty() {
            rest.remove(0);
        }
        self.find_best_covering(current, &rest, follow, CoveringMode::Lead)
            .map(|covering| covering.property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn engine() -> CoveringEngine {
        let params = DealParams::new(Trump::new(Suit::Hearts, Rank::Two), 2, 4).expect("params");
        CoveringEngine::new(params)
    }

    fn cards(list: &[(Rank, Suit)]) -> CardSet {
        list.iter().map(|(r, s)| Card::new(*r, *s)).collect()
    }

    #[test]
    fn follow_prefers_exact_plain_pair() {
        let engine = engine();
        let pool = cards(&[
            (Rank::Ace, Suit::Clubs),
            (Rank::Ace, Suit::Clubs),
            (Rank::King, Suit::Clubs),
            (Rank::King, Suit::Clubs),
            (Rank::Queen, Suit::Clubs),
            (Rank::Queen, Suit::Clubs),
            (Rank::Nine, Suit::Clubs),
            (Rank::Nine, Suit::Clubs),
        ]);
        let target = engine
            .winning_property(&cards(&[(Rank::Five, Suit::Clubs), (Rank::Five, Suit::Clubs)]))
            .expect("pair");
        let covering = engine
            .find_best_covering(&target, &[], &pool, CoveringMode::Follow)
            .expect("covered");
        assert_eq!(covering.property.leading, Rank::Nine.value());
        assert_eq!(covering.cards.len(), 2);
    }

    #[test]
    fn lead_mode_requires_beating() {
        let engine = engine();
        let target = engine
            .winning_property(&cards(&[(Rank::King, Suit::Clubs), (Rank::King, Suit::Clubs)]))
            .expect("pair");
        let low = cards(&[(Rank::Nine, Suit::Clubs), (Rank::Nine, Suit::Clubs)]);
        assert!(
            engine
                .find_best_covering(&target, &[], &low, CoveringMode::Lead)
                .is_none()
        );
        let trumps = cards(&[(Rank::Three, Suit::Hearts), (Rank::Three, Suit::Hearts)]);
        let covering = engine
            .find_best_covering(&target, &[], &trumps, CoveringMode::Lead)
            .expect("trumped");
        assert!(covering.property.is_trump());
    }

    #[test]
    fn cover_properties_fills_singles_from_rest() {
        let engine = engine();
        let pool = cards(&[
            (Rank::Ten, Suit::Spades),
            (Rank::Ten, Suit::Spades),
            (Rank::King, Suit::Spades),
            (Rank::Four, Suit::Spades),
        ]);
        let pair = engine
            .winning_property(&cards(&[(Rank::Six, Suit::Spades), (Rank::Six, Suit::Spades)]))
            .expect("pair");
        let single = PropertyType::from_card(Card::new(Rank::Three, Suit::Spades), engine.trump());
        let avoid = engine
            .cover_properties(&[single, pair], &pool, false)
            .expect("covered");
        assert_eq!(avoid.len(), 3);
        assert_eq!(avoid[2], Card::new(Rank::Four, Suit::Spades));
        let take = engine
            .cover_properties(&[single, pair], &pool, true)
            .expect("covered");
        assert_eq!(take[2], Card::new(Rank::King, Suit::Spades));
        assert!(engine.cover_properties(&[pair, pair, pair], &pool, false).is_none());
    }

    #[test]
    fn trump_pair_wins_over_led_pair() {
        let engine = engine();
        let lead = cards(&[(Rank::Ace, Suit::Clubs), (Rank::Ace, Suit::Clubs)]);
        let current = engine.winning_property(&lead).expect("lead");
        let follow = cards(&[(Rank::Four, Suit::Hearts), (Rank::Four, Suit::Hearts)]);
        let winner = engine.is_winning_play(&lead, &follow, &current).expect("wins");
        assert_eq!(winner.leading, Rank::Four.value());
        let split = cards(&[(Rank::Four, Suit::Hearts), (Rank::Five, Suit::Hearts)]);
        assert!(engine.is_winning_play(&lead, &split, &current).is_none());
        let offsuit = cards(&[(Rank::Ace, Suit::Spades), (Rank::Ace, Suit::Spades)]);
        assert!(engine.is_winning_play(&lead, &offsuit, &current).is_none());
    }
}
