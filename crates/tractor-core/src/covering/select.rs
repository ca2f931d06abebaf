use crate::covering::CoveringEngine;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::trump::MINOR_TRUMP_LEVEL;
use crate::property::{PropertyOrder, PropertyType};

/// Point policy for picking filler cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTarget {
    /// Put as many points in as possible.
    Maximize,
    /// Spend at most this many points.
    Limit(u32),
}

impl CoveringEngine {
    /// Picks `count` cards out of `pool`, whole properties first, steering
    /// the point total by `target`. Off-suit cards go before trumps, and
    /// when points are limited the highest trumps are held back. With
    /// `respect_limit` unset, a limit that cannot be met is exceeded rather
    /// than returning too few cards.
    pub fn select_cards_targeting_points(
        &self,
        pool: &CardSet,
        count: usize,
        target: PointTarget,
        respect_limit: bool,
    ) -> Vec<Card> {
        let trump = self.trump();
        let trumps = pool.of_play_suit(&trump, trump.suit);
        let plain = pool.difference(&trumps);
        let order = match target {
            PointTarget::Maximize => PropertyOrder::DePointsInImp,
            PointTarget::Limit(_) => PropertyOrder::InImpInPoints,
        };
        let mut candidates = self.decompose(&plain).properties;
        self.sort(&mut candidates, order);
        if plain.len() < count {
            let usable = match target {
                PointTarget::Maximize => trumps,
                PointTarget::Limit(_) => self.conserve_high_trumps(&trumps, count - plain.len()),
            };
            let mut trump_properties = self.decompose(&usable).properties;
            self.sort(&mut trump_properties, order);
            candidates.extend(trump_properties);
        }

        let mut allowed = match target {
            PointTarget::Maximize => u32::MAX,
            PointTarget::Limit(points) => points,
        };
        let mut picked: Vec<Card> = Vec::with_capacity(count);
        let mut index = 0;
        while index < candidates.len() {
            let property = candidates[index];
            let mut cards = lowest_first(&property);
            if picked.len() + cards.len() <= count {
                let points = property.total_points();
                if points <= allowed {
                    picked.extend(cards);
                    if let PointTarget::Limit(_) = target {
                        allowed -= points;
                    }
                    candidates.remove(index);
                } else {
                    index += 1;
                }
                continue;
            }
            match target {
                PointTarget::Maximize => {
                    if property.sequences > 1 {
                        cards.sort_by(|a, b| b.points().cmp(&a.points()).then(trump.compare(*b, *a)));
                    }
                    picked.extend(cards);
                    picked.truncate(count);
                    return picked;
                }
                PointTarget::Limit(_) => {
                    if property.sequences > 1 {
                        cards.sort_by(|a, b| a.points().cmp(&b.points()).then(trump.compare(*b, *a)));
                    }
                    cards.truncate(count - picked.len());
                    if cards.iter().map(|c| c.points()).sum::<u32>() <= allowed {
                        picked.extend(cards);
                        return picked;
                    }
                    index += 1;
                }
            }
        }

        if picked.len() < count && !respect_limit {
            self.sort(&mut candidates, PropertyOrder::InPointsInImp);
            for property in candidates {
                let mut cards = lowest_first(&property);
                if picked.len() + cards.len() > count {
                    cards.sort_by(|a, b| a.points().cmp(&b.points()).then(trump.compare(*b, *a)));
                }
                picked.extend(cards);
                if picked.len() >= count {
                    picked.truncate(count);
                    return picked;
                }
            }
        }
        picked
    }

    /// Trump cards that may be spent when `needed` of them must go, holding
    /// back up to one deck's worth of the highest (jokers and trump ranks).
    fn conserve_high_trumps(&self, trumps: &CardSet, needed: usize) -> CardSet {
        if trumps.len() <= needed {
            return *trumps;
        }
        let trump = self.trump();
        let sorted = trumps.sorted(&trump);
        let split = sorted
            .iter()
            .position(|card| trump.level(*card) < MINOR_TRUMP_LEVEL)
            .unwrap_or(sorted.len());
        let (high, low) = sorted.split_at(split);
        let to_save = usize::from(self.params().decks).min(trumps.len() - needed);
        if to_save >= high.len() {
            return CardSet::from_cards(low);
        }

        let mut high_properties = self.decompose(&CardSet::from_cards(high)).properties;
        self.sort(&mut high_properties, PropertyOrder::IncreasingLeading);
        high_properties.reverse();

        let mut spendable = CardSet::from_cards(low);
        let mut saved = 0;
        let mut rest = high_properties.into_iter();
        for property in rest.by_ref() {
            let quota = to_save - saved;
            if property.num_cards() > quota {
                spendable.extend(property.to_cards().into_iter().skip(quota));
                break;
            }
            saved += property.num_cards();
            if saved >= to_save {
                break;
            }
        }
        for property in rest {
            spendable.extend(property.to_cards());
        }
        debug_assert_eq!(spendable.len(), trumps.len() - to_save);
        spendable
    }
}

/// A property's cards from its lowest segment up.
fn lowest_first(property: &PropertyType) -> Vec<Card> {
    let mut cards = property.to_cards();
    cards.reverse();
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deal::DealParams;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trump::Trump;

    fn engine() -> CoveringEngine {
        let params = DealParams::new(Trump::new(Suit::Hearts, Rank::Two), 2, 4).expect("params");
        CoveringEngine::new(params)
    }

    fn cards(list: &[(Rank, Suit)]) -> CardSet {
        list.iter().map(|(r, s)| Card::new(*r, *s)).collect()
    }

    #[test]
    fn limit_avoids_points_and_trumps() {
        let engine = engine();
        let pool = cards(&[
            (Rank::King, Suit::Clubs),
            (Rank::Four, Suit::Clubs),
            (Rank::Six, Suit::Spades),
            (Rank::Three, Suit::Hearts),
        ]);
        let picked = engine.select_cards_targeting_points(&pool, 2, PointTarget::Limit(0), true);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|c| c.points() == 0 && c.suit != Suit::Hearts));
    }

    #[test]
    fn maximize_collects_points() {
        let engine = engine();
        let pool = cards(&[
            (Rank::King, Suit::Clubs),
            (Rank::Four, Suit::Clubs),
            (Rank::Ten, Suit::Spades),
            (Rank::Six, Suit::Spades),
        ]);
        let picked = engine.select_cards_targeting_points(&pool, 2, PointTarget::Maximize, true);
        let points: u32 = picked.iter().map(|c| c.points()).sum();
        assert_eq!(points, 20);
    }

    #[test]
    fn unmet_limit_still_fills_unless_respected() {
        let engine = engine();
        let pool = cards(&[(Rank::King, Suit::Clubs), (Rank::Ten, Suit::Clubs)]);
        let strict = engine.select_cards_targeting_points(&pool, 1, PointTarget::Limit(0), true);
        assert!(strict.is_empty());
        let loose = engine.select_cards_targeting_points(&pool, 1, PointTarget::Limit(0), false);
        assert_eq!(loose.len(), 1);
    }

    #[test]
    fn high_trumps_are_held_back() {
        let engine = engine();
        let pool = cards(&[
            (Rank::BigJoker, Suit::Jokers),
            (Rank::Two, Suit::Spades),
            (Rank::Four, Suit::Hearts),
            (Rank::Six, Suit::Hearts),
        ]);
        let picked = engine.select_cards_targeting_points(&pool, 2, PointTarget::Limit(0), true);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|c| c.rank == Rank::Four || c.rank == Rank::Six));
    }
}
