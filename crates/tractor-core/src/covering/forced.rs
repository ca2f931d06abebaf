use crate::covering::CoveringEngine;
use crate::model::card_set::CardSet;
use crate::property::{PropertyOrder, PropertyType};
use core::cmp::Ordering;

/// What a follower must surrender against a lead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forced {
    /// Properties the follower's same-suit cards are forced to match.
    pub properties: Vec<PropertyType>,
    /// Shapes the follower has shown not to hold while matching, kept minimal:
    /// no entry is bigger than another.
    pub missing: Vec<PropertyType>,
}

/// Drops every entry at least as big as `property`, then records `property`.
pub fn eliminate_property(list: &mut Vec<PropertyType>, property: PropertyType) {
    list.retain(|entry| !property.is_smaller_type_than(entry));
    list.push(property);
}

impl CoveringEngine {
    /// Properties that `cards`, a follower's cards in the led suit, must
    /// yield against the lead properties `lead`. When a lead property can be
    /// matched in several ways the combination with the lowest joint prior
    /// odds is kept, ties going to more identical cards.
    pub fn find_all_forced_properties(&self, lead: &[PropertyType], cards: &CardSet) -> Forced {
        let mut forced = Forced::default();
        self.collect_forced(lead.to_vec(), *cards, &mut forced);
        forced
    }

    fn collect_forced(&self, mut lead: Vec<PropertyType>, mut remaining: CardSet, forced: &mut Forced) {
        while !lead.is_empty() {
            self.sort(&mut lead, PropertyOrder::DeTypeDeIdentical);
            let target = lead[0];
            if target.num_cards() == 1 {
                return;
            }
            let matched = self.match_property(&target, &remaining);
            if matched.is_empty() {
                lead.remove(0);
                eliminate_property(&mut forced.missing, PropertyType::of_shape(2, 1));
                continue;
            }
            if let [only] = matched.as_slice() {
                if only.exact_type(&target) {
                    forced.properties.push(*only);
                    remaining = remaining.difference(&only.to_card_set());
                    lead.remove(0);
                    continue;
                }
            }
            for missed in find_missing(&target, &matched) {
                eliminate_property(&mut forced.missing, missed);
            }
            let branches: Vec<Vec<PropertyType>> = matched
                .iter()
                .map(|taken| {
                    let mut branch = Forced::default();
                    self.collect_forced(
                        delete_property(&target, taken),
                        remaining.difference(&taken.to_card_set()),
                        &mut branch,
                    );
                    for missed in branch.missing {
                        eliminate_property(&mut forced.missing, missed);
                    }
                    let mut properties = vec![*taken];
                    properties.extend(branch.properties);
                    properties
                })
                .collect();
            if let Some(best) = self.best_branch(branches) {
                for property in &best {
                    remaining = remaining.difference(&property.to_card_set());
                }
                forced.properties.extend(best);
            }
            lead.remove(0);
        }
    }

    /// Same-suit properties of `cards` that `target` forces out, pairwise
    /// incomparable. An exact match short-circuits.
    fn match_property(&self, target: &PropertyType, cards: &CardSet) -> Vec<PropertyType> {
        let mut properties = self.decompose(cards).properties;
        self.sort(&mut properties, PropertyOrder::DeTypeInLeading);
        let mut matched = Vec::new();
        for property in properties {
            if property.num_cards() == 1 {
                break;
            }
            if target.exact_type(&property) {
                return vec![property];
            }
            if target.is_bigger_type_than(&property) {
                self.consume_property(&mut matched, property);
            } else {
                // only the part of a bigger property that fits the target is forced
                let head = property.convert_to_type(
                    property.identical.min(target.identical),
                    property.sequences.min(target.sequences),
                );
                self.consume_property(&mut matched, head);
            }
        }
        matched
    }

    /// Adds `property` unless an entry already covers it; a smaller entry
    /// is replaced. Between equal shapes an unconverted property is kept,
    /// then the one converted from the less important shape.
    fn consume_property(&self, list: &mut Vec<PropertyType>, property: PropertyType) {
        if property.num_cards() == 1 {
            return;
        }
        for entry in list.iter_mut() {
            if property.exact_type(entry) {
                let replace = match (property.converted_from, entry.converted_from) {
                    (None, Some(_)) => true,
                    (Some(_), None) | (None, None) => false,
                    (Some(ours), Some(theirs)) if ours == theirs => false,
                    (Some(ours), Some(theirs)) => {
                        let comparator = self.comparator(PropertyOrder::InTypeInLeading);
                        comparator
                            .compare(
                                &PropertyType::of_shape(ours.0, ours.1),
                                &PropertyType::of_shape(theirs.0, theirs.1),
                            )
                            .then(property.leading.cmp(&entry.leading))
                            == Ordering::Less
                    }
                };
                if replace {
                    *entry = property;
                }
                return;
            }
            if property.is_bigger_type_than(entry) {
                *entry = property;
                return;
            }
            if entry.is_bigger_type_than(&property) {
                return;
            }
        }
        list.push(property);
    }

    /// The branch whose properties are jointly least likely, compared after
    /// sorting so equal odds resolve deterministically.
    fn best_branch(&self, mut branches: Vec<Vec<PropertyType>>) -> Option<Vec<PropertyType>> {
        if branches.len() <= 1 {
            return branches.pop();
        }
        let comparator = self.comparator(PropertyOrder::DeTypeDeIdentical);
        for branch in branches.iter_mut() {
            comparator.sort(branch);
        }
        branches.sort_by(|a, b| {
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| comparator.compare(x, y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        let mut best: Option<(f64, usize)> = None;
        for (index, branch) in branches.iter().enumerate() {
            let odds: f64 = branch.iter().map(|p| self.odds().of(p)).product();
            if best.is_none_or(|(lowest, _)| odds < lowest) {
                best = Some((odds, index));
            }
        }
        let (_, index) = best?;
        Some(branches.swap_remove(index))
    }
}

/// What is left of `lead` once `taken`, a property it dominates, is matched:
/// the unmatched segments, and the unmatched copies of the matched ones.
fn delete_property(lead: &PropertyType, taken: &PropertyType) -> Vec<PropertyType> {
    let mut left = Vec::with_capacity(2);
    if lead.sequences > taken.sequences {
        left.push(lead.with_shape(lead.identical, lead.sequences - taken.sequences));
    }
    let width = lead.identical.saturating_sub(taken.identical);
    if width > 1 {
        left.push(lead.with_shape(width, taken.sequences));
    }
    left
}

/// Next-larger shapes of the matched properties that `lead` would have
/// forced had the follower held them.
fn find_missing(lead: &PropertyType, matched: &[PropertyType]) -> Vec<PropertyType> {
    matched
        .iter()
        .flat_map(PropertyType::parent_types)
        .filter(|parent| {
            lead.is_bigger_type_than(parent)
                && !matched.iter().any(|m| m.is_bigger_type_than(parent))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::Card;
    use crate::model::deal::DealParams;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::Trump;

    fn engine() -> CoveringEngine {
        let params = DealParams::new(Trump::new(Suit::Hearts, Rank::Two), 2, 4).expect("params");
        CoveringEngine::new(params)
    }

    fn clubs(ranks: &[Rank]) -> CardSet {
        ranks.iter().map(|r| Card::new(*r, Suit::Clubs)).collect()
    }

    fn shapes(list: &[PropertyType]) -> Vec<(u8, u8)> {
        list.iter().map(|p| (p.identical, p.sequences)).collect()
    }

    #[test]
    fn exact_match_is_forced() {
        use Rank::*;
        let engine = engine();
        let lead = engine.decompose(&clubs(&[Ace, Ace])).properties;
        let forced = engine.find_all_forced_properties(&lead, &clubs(&[Nine, Nine, Five, Three]));
        assert_eq!(shapes(&forced.properties), vec![(2, 1)]);
        assert_eq!(forced.properties[0].leading, Nine.value());
        assert!(forced.missing.is_empty());
    }

    #[test]
    fn no_pair_marks_pairs_missing() {
        use Rank::*;
        let engine = engine();
        let lead = engine.decompose(&clubs(&[Ace, Ace])).properties;
        let forced = engine.find_all_forced_properties(&lead, &clubs(&[Nine, Five, Three]));
        assert!(forced.properties.is_empty());
        assert_eq!(shapes(&forced.missing), vec![(2, 1)]);
    }

    #[test]
    fn tractor_lead_forces_two_pairs() {
        use Rank::*;
        let engine = engine();
        let lead = engine.decompose(&clubs(&[Ace, Ace, King, King])).properties;
        let forced = engine.find_all_forced_properties(&lead, &clubs(&[Nine, Nine, Six, Six, Four]));
        assert_eq!(shapes(&forced.properties), vec![(2, 1), (2, 1)]);
        // holding two separate pairs proves no tractor
        assert_eq!(shapes(&forced.missing), vec![(2, 2)]);
    }

    #[test]
    fn triple_is_forced_down_to_a_pair_plus_card() {
        use Rank::*;
        let engine = engine();
        let lead = engine.decompose(&clubs(&[Ace, Ace, King, King])).properties;
        let forced = engine.find_all_forced_properties(&lead, &clubs(&[Nine, Nine, Nine, Four]));
        assert_eq!(shapes(&forced.properties), vec![(2, 1)]);
    }

    #[test]
    fn eliminate_keeps_smallest_shapes() {
        let mut list = vec![PropertyType::of_shape(2, 2), PropertyType::of_shape(3, 1)];
        eliminate_property(&mut list, PropertyType::of_shape(2, 1));
        assert_eq!(shapes(&list), vec![(2, 1)]);
        eliminate_property(&mut list, PropertyType::of_shape(3, 1));
        assert_eq!(shapes(&list), vec![(2, 1), (3, 1)]);
    }
}
