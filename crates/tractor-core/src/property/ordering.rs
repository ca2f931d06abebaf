use crate::model::suit::Suit;
use crate::probability::TypeOdds;
use crate::property::property_type::PropertyType;
use core::cmp::Ordering;

/// Selection policies over properties. Every order is total and falls back
/// to the leading level, so sorting is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyOrder {
    /// Highest leading level first; smaller type first on ties.
    DecreasingLeading,
    IncreasingLeading,
    /// Most important type first, then highest leading level.
    DeTypeDeLeading,
    DeTypeInLeading,
    InTypeInLeading,
    DeTypeDeIdentical,
    /// Groups equal shapes next to each other.
    SameTypeTogether,
    /// Most points per card first, then least important.
    DePointsInImp,
    InPointsInImp,
    /// Least important first (off-suit before trump), then fewest points.
    InImpInPoints,
    InPointsDeLeading,
}

/// A [`PropertyOrder`] bound to the table it is judged against.
#[derive(Debug, Clone, Copy)]
pub struct PropertyComparator<'a> {
    pub order: PropertyOrder,
    pub trump_suit: Suit,
    odds: &'a TypeOdds,
}

impl<'a> PropertyComparator<'a> {
    pub fn new(order: PropertyOrder, trump_suit: Suit, odds: &'a TypeOdds) -> Self {
        Self {
            order,
            trump_suit,
            odds,
        }
    }

    /// `Less` when `a` is the more important type. Structural dominance
    /// decides first; otherwise the rarer shape wins.
    pub fn compare_type(&self, a: &PropertyType, b: &PropertyType) -> Ordering {
        if a.exact_type(b) {
            return Ordering::Equal;
        }
        if a.is_bigger_type_than(b) {
            return Ordering::Less;
        }
        if a.is_smaller_type_than(b) {
            return Ordering::Greater;
        }
        self.odds
            .of(a)
            .partial_cmp(&self.odds.of(b))
            .unwrap_or(Ordering::Equal)
    }

    pub fn compare(&self, a: &PropertyType, b: &PropertyType) -> Ordering {
        use PropertyOrder::*;
        let high_first = b.leading.cmp(&a.leading);
        let low_first = a.leading.cmp(&b.leading);
        match self.order {
            SameTypeTogether => same_type_together(a, b),
            DecreasingLeading => high_first.then_with(|| self.compare_type(a, b).reverse()),
            IncreasingLeading => low_first.then_with(|| self.compare_type(a, b).reverse()),
            DeTypeDeLeading => self.compare_type(a, b).then(high_first),
            DeTypeInLeading => self.compare_type(a, b).then(low_first),
            InTypeInLeading => self.compare_type(a, b).reverse().then(low_first),
            DeTypeDeIdentical => self
                .compare_type(a, b)
                .then_with(|| b.identical.cmp(&a.identical))
                .then(high_first),
            DePointsInImp => average_points(a, b)
                .reverse()
                .then_with(|| self.compare_suit(a, b))
                .then_with(|| self.compare_type(a, b).reverse())
                .then(low_first),
            InPointsInImp => average_points(a, b)
                .then_with(|| self.compare_suit(a, b))
                .then_with(|| self.compare_type(a, b).reverse())
                .then(low_first),
            InImpInPoints => self
                .compare_suit(a, b)
                .then_with(|| self.compare_type(a, b).reverse())
                .then_with(|| average_points(a, b))
                .then(low_first),
            InPointsDeLeading => average_points(a, b).then(high_first),
        }
    }

    /// Stable sort under this order.
    pub fn sort(&self, properties: &mut [PropertyType]) {
        properties.sort_by(|a, b| self.compare(a, b));
    }

    /// Off-suit properties sort before trump ones.
    fn compare_suit(&self, a: &PropertyType, b: &PropertyType) -> Ordering {
        match (a.suit == self.trump_suit, b.suit == self.trump_suit) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

/// Sequences, then identical count, then leading level, then suit, all
/// ascending.
pub fn same_type_together(a: &PropertyType, b: &PropertyType) -> Ordering {
    a.sequences
        .cmp(&b.sequences)
        .then(a.identical.cmp(&b.identical))
        .then(a.leading.cmp(&b.leading))
        .then(a.suit.cmp(&b.suit))
}

/// Points per card, compared without division.
fn average_points(a: &PropertyType, b: &PropertyType) -> Ordering {
    let left = a.total_points() as usize * b.num_cards();
    let right = b.total_points() as usize * a.num_cards();
    left.cmp(&right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::trump::Trump;

    const TRUMP: Trump = Trump::new(Suit::Hearts, Rank::Two);

    fn shape(rank: Rank, suit: Suit, identical: u8, sequences: u8) -> PropertyType {
        PropertyType::from_card(Card::new(rank, suit), TRUMP).with_shape(identical, sequences)
    }

    fn leads(list: &[PropertyType]) -> Vec<(u8, u8, u8)> {
        list.iter()
            .map(|p| (p.identical, p.sequences, p.leading))
            .collect()
    }

    #[test]
    fn rarer_shape_wins_when_neither_dominates() {
        let odds = TypeOdds::new(4, 2);
        let comparator = PropertyComparator::new(PropertyOrder::DeTypeDeLeading, Suit::Hearts, &odds);
        let tractor = PropertyType::of_shape(2, 2);
        let single = PropertyType::of_shape(1, 1);
        assert_eq!(comparator.compare_type(&tractor, &single), Ordering::Less);
        let odds_three = TypeOdds::new(4, 3);
        let comparator = PropertyComparator::new(PropertyOrder::DeTypeDeLeading, Suit::Hearts, &odds_three);
        let triple = PropertyType::of_shape(3, 1);
        // 3x1 against 2x2: neither dominates, rarity decides
        let expected = odds_three
            .get(3, 1)
            .partial_cmp(&odds_three.get(2, 2))
            .unwrap_or(Ordering::Equal);
        assert_eq!(comparator.compare_type(&triple, &tractor), expected);
    }

    #[test]
    fn type_then_leading_orders() {
        let odds = TypeOdds::new(4, 2);
        let mut list = vec![
            shape(Rank::Nine, Suit::Clubs, 1, 1),
            shape(Rank::King, Suit::Clubs, 2, 1),
            shape(Rank::Ace, Suit::Clubs, 1, 1),
            shape(Rank::Seven, Suit::Clubs, 2, 2),
        ];
        PropertyComparator::new(PropertyOrder::DeTypeDeLeading, Suit::Hearts, &odds).sort(&mut list);
        assert_eq!(
            leads(&list),
            vec![(2, 2, 5), (2, 1, 11), (1, 1, 12), (1, 1, 7)]
        );
        PropertyComparator::new(PropertyOrder::InTypeInLeading, Suit::Hearts, &odds).sort(&mut list);
        assert_eq!(
            leads(&list),
            vec![(1, 1, 7), (1, 1, 12), (2, 1, 11), (2, 2, 5)]
        );
        PropertyComparator::new(PropertyOrder::DecreasingLeading, Suit::Hearts, &odds).sort(&mut list);
        assert_eq!(list[0].leading, 12);
    }

    #[test]
    fn point_orders_keep_trumps_last() {
        let odds = TypeOdds::new(4, 2);
        let mut list = vec![
            shape(Rank::King, Suit::Hearts, 1, 1),
            shape(Rank::King, Suit::Clubs, 1, 1),
            shape(Rank::Four, Suit::Clubs, 1, 1),
        ];
        PropertyComparator::new(PropertyOrder::DePointsInImp, Suit::Hearts, &odds).sort(&mut list);
        assert_eq!(list[0].suit, Suit::Clubs);
        assert_eq!(list[1].suit, Suit::Hearts);
        PropertyComparator::new(PropertyOrder::InImpInPoints, Suit::Hearts, &odds).sort(&mut list);
        assert_eq!(leads(&list)[0], (1, 1, Rank::Four.value()));
        assert_eq!(list[2].suit, Suit::Hearts);
    }

    #[test]
    fn same_type_together_groups_shapes() {
        let mut list = vec![
            shape(Rank::Ace, Suit::Clubs, 2, 2),
            shape(Rank::Nine, Suit::Clubs, 2, 1),
            shape(Rank::Five, Suit::Clubs, 2, 2),
        ];
        list.sort_by(same_type_together);
        assert_eq!(leads(&list), vec![(2, 1, 7), (2, 2, 3), (2, 2, 12)]);

        let clubs = shape(Rank::Nine, Suit::Clubs, 2, 1);
        let spades = shape(Rank::Nine, Suit::Spades, 2, 1);
        assert_ne!(same_type_together(&clubs, &spades), Ordering::Equal);
        assert_eq!(
            same_type_together(&clubs, &spades),
            same_type_together(&spades, &clubs).reverse()
        );
    }

    #[test]
    fn every_order_separates_equal_shapes_by_leading() {
        let odds = TypeOdds::new(4, 2);
        let aces = shape(Rank::Ace, Suit::Clubs, 2, 1);
        let fives = shape(Rank::Five, Suit::Clubs, 2, 1);
        let nines = shape(Rank::Nine, Suit::Clubs, 2, 1);
        for order in [
            PropertyOrder::DecreasingLeading,
            PropertyOrder::IncreasingLeading,
            PropertyOrder::DeTypeDeLeading,
            PropertyOrder::DeTypeInLeading,
            PropertyOrder::InTypeInLeading,
            PropertyOrder::DeTypeDeIdentical,
            PropertyOrder::SameTypeTogether,
            PropertyOrder::DePointsInImp,
            PropertyOrder::InPointsInImp,
            PropertyOrder::InImpInPoints,
            PropertyOrder::InPointsDeLeading,
        ] {
            let comparator = PropertyComparator::new(order, Suit::Hearts, &odds);
            for (a, b) in [(&aces, &fives), (&aces, &nines), (&nines, &fives)] {
                assert_ne!(comparator.compare(a, b), Ordering::Equal, "{order:?}");
                assert_eq!(comparator.compare(a, b), comparator.compare(b, a).reverse(), "{order:?}");
            }
        }
        let comparator = PropertyComparator::new(PropertyOrder::DeTypeDeIdentical, Suit::Hearts, &odds);
        assert_eq!(comparator.compare(&aces, &fives), Ordering::Less);
    }
}
