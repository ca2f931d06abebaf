use crate::covering::CoveringEngine;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::suit::Suit;
use crate::property::{Decomposition, PropertyOrder, PropertyType};

/// Outcome of checking a follow against the lead.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowVerdict {
    Legal,
    /// The follow left cards of the led suit in hand while playing others.
    MustFollowSuit(Suit),
    /// The follow skipped properties the hand was forced to yield.
    MissingProperties(Vec<PropertyType>),
}

impl FollowVerdict {
    pub fn is_legal(&self) -> bool {
        matches!(self, FollowVerdict::Legal)
    }
}

impl CoveringEngine {
    /// Checks `follow`, played out of `hand`, against `lead`.
    pub fn is_follow_legal(&self, lead: &CardSet, follow: &CardSet, hand: &CardSet) -> FollowVerdict {
        let trump = self.trump();
        let Some(first) = lead.iter().next() else {
            return FollowVerdict::Legal;
        };
        let suit = trump.play_suit(first);
        let same_suit = hand.of_play_suit(&trump, suit);
        if same_suit.len() <= lead.len() {
            if follow.contains_all(&same_suit) {
                return FollowVerdict::Legal;
            }
            return FollowVerdict::MustFollowSuit(suit);
        }
        if follow.iter().any(|card| trump.play_suit(card) != suit) {
            return FollowVerdict::MustFollowSuit(suit);
        }
        let led = self.decompose(lead);
        let forced = self.find_all_forced_properties(&led.properties, &same_suit);
        match self.cover_properties(&forced.properties, follow, false) {
            Some(_) => FollowVerdict::Legal,
            None => FollowVerdict::MissingProperties(forced.properties),
        }
    }

    /// The part of a throw that survives every opposing hand in `hands`.
    /// The whole throw when nobody can break it; otherwise the cards of the
    /// most important broken property. `None` for a mixed-suit throw.
    pub fn find_legal_leading_cards(&self, lead: &CardSet, hands: &[CardSet]) -> Option<Vec<Card>> {
        let trump = self.trump();
        let led = self.decompose(lead);
        if led.mixed {
            return None;
        }
        if led.properties.len() == 1 {
            return Some(lead.sorted(&trump));
        }
        let comparator = self.comparator(PropertyOrder::DeTypeDeLeading);
        let mut ordered = led.properties.clone();
        comparator.sort(&mut ordered);
        let worst = hands
            .iter()
            .filter_map(|hand| find_violation(&ordered, &self.decompose(hand)))
            .min_by(|a, b| comparator.compare(a, b));
        match worst {
            Some(property) => Some(property.to_cards()),
            None => Some(lead.sorted(&trump)),
        }
    }
}

/// First property of the throw, most important first, that the verifier's
/// hand can break.
fn find_violation(ordered: &[PropertyType], verifier: &Decomposition) -> Option<PropertyType> {
    ordered
        .iter()
        .find(|attempt| verifier.all_properties().any(|v| v.is_breakable(attempt)))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deal::DealParams;
    use crate::model::rank::Rank;
    use crate::model::trump::Trump;

    fn engine() -> CoveringEngine {
        let params = DealParams::new(Trump::new(Suit::Hearts, Rank::Two), 2, 4).expect("params");
        CoveringEngine::new(params)
    }

    fn cards(list: &[(Rank, Suit)]) -> CardSet {
        list.iter().map(|(r, s)| Card::new(*r, *s)).collect()
    }

    #[test]
    fn short_suit_must_play_all_of_it() {
        let engine = engine();
        let lead = cards(&[(Rank::Ace, Suit::Clubs), (Rank::Ace, Suit::Clubs)]);
        let hand = cards(&[(Rank::Nine, Suit::Clubs), (Rank::Four, Suit::Spades), (Rank::Six, Suit::Spades)]);
        let good = cards(&[(Rank::Nine, Suit::Clubs), (Rank::Four, Suit::Spades)]);
        let bad = cards(&[(Rank::Six, Suit::Spades), (Rank::Four, Suit::Spades)]);
        assert!(engine.is_follow_legal(&lead, &good, &hand).is_legal());
        assert_eq!(
            engine.is_follow_legal(&lead, &bad, &hand),
            FollowVerdict::MustFollowSuit(Suit::Clubs)
        );
    }

    #[test]
    fn pair_must_be_answered_with_pair() {
        let engine = engine();
        let lead = cards(&[(Rank::Ace, Suit::Clubs), (Rank::Ace, Suit::Clubs)]);
        let hand = cards(&[
            (Rank::Nine, Suit::Clubs),
            (Rank::Nine, Suit::Clubs),
            (Rank::Five, Suit::Clubs),
            (Rank::Three, Suit::Clubs),
        ]);
        let pair = cards(&[(Rank::Nine, Suit::Clubs), (Rank::Nine, Suit::Clubs)]);
        let split = cards(&[(Rank::Nine, Suit::Clubs), (Rank::Five, Suit::Clubs)]);
        assert!(engine.is_follow_legal(&lead, &pair, &hand).is_legal());
        match engine.is_follow_legal(&lead, &split, &hand) {
            FollowVerdict::MissingProperties(missing) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].identical, 2);
            }
            other => panic!("unexpected verdict {other:?}"),
        }
    }

    #[test]
    fn broken_throw_shrinks_to_offending_property() {
        let engine = engine();
        let throw = cards(&[
            (Rank::Ace, Suit::Clubs),
            (Rank::Queen, Suit::Clubs),
            (Rank::Queen, Suit::Clubs),
        ]);
        let holds_kings = cards(&[(Rank::King, Suit::Clubs), (Rank::King, Suit::Clubs)]);
        let harmless = cards(&[(Rank::Jack, Suit::Clubs), (Rank::Jack, Suit::Clubs)]);
        assert_eq!(
            engine.find_legal_leading_cards(&throw, &[harmless]),
            Some(throw.sorted(&engine.trump()))
        );
        let legal = engine
            .find_legal_leading_cards(&throw, &[harmless, holds_kings])
            .expect("same suit");
        assert_eq!(legal, vec![Card::new(Rank::Queen, Suit::Clubs); 2]);
        let mixed = cards(&[(Rank::Ace, Suit::Clubs), (Rank::Ace, Suit::Spades)]);
        assert_eq!(engine.find_legal_leading_cards(&mixed, &[holds_kings]), None);
    }
}
