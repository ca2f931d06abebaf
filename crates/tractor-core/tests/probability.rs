use tractor_core::model::card::Card;
use tractor_core::model::card_set::CardSet;
use tractor_core::model::rank::Rank;
use tractor_core::model::suit::Suit;
use tractor_core::model::trump::Trump;
use tractor_core::probability::{RemainingPool, TypeOdds, approximate, exact};
use tractor_core::property::{Decomposition, PropertyType};

const TRUMP: Trump = Trump::new(Suit::Hearts, Rank::Two);

fn club_pair(rank: Rank) -> PropertyType {
    let card = Card::new(rank, Suit::Clubs);
    let cards: CardSet = [card, card].into_iter().collect();
    Decomposition::new(&cards, TRUMP).properties[0]
}

#[test]
fn survival_never_rises_as_the_pair_gets_lower() {
    use Rank::*;
    let mut pool = RemainingPool::new(TRUMP, 2);
    pool.observe([Card::new(Nine, Suit::Clubs)]);
    let ladder = [Ace, King, Queen, Jack, Ten, Nine, Eight, Seven, Six, Five, Four, Three];
    let mut previous = 1.0;
    for rank in ladder {
        let survival = pool.current_property_probability(&club_pair(rank), 3, false);
        assert!((0.0..=1.0).contains(&survival));
        assert!(survival <= previous + 1e-12, "{rank:?}: {survival} > {previous}");
        previous = survival;
    }
    assert_eq!(pool.current_property_probability(&club_pair(Ace), 3, false), 1.0);
}

#[test]
fn nothing_above_means_nothing_can_beat() {
    use Rank::*;
    let mut pool = RemainingPool::new(TRUMP, 2);
    let seen = [
        Card::new(Ace, Suit::Clubs),
        Card::new(Ace, Suit::Clubs),
        Card::new(King, Suit::Clubs),
    ];
    pool.observe(seen);
    let queens = club_pair(Queen);
    assert_eq!(pool.beat_probability(&queens, 3, false), 0.0);
    assert_eq!(pool.current_property_probability(&queens, 3, false), 1.0);
    // a single king left still beats a single queen
    let single = PropertyType::from_card(Card::new(Queen, Suit::Clubs), TRUMP);
    assert!(pool.beat_probability(&single, 3, false) > 0.0);
}

#[test]
fn approximation_agrees_with_inclusion_exclusion_for_two_copies() {
    for players in 2..=5u32 {
        let estimate = approximate(players, &[2], false, 2, 1);
        let truth = exact(players, &[2], 2, 1);
        assert!((estimate - truth).abs() < 1e-9, "{players} players");
        for copies in 3..=4u32 {
            assert!((0.0..=1.0).contains(&approximate(players, &[copies], false, 2, 1)));
            assert!((0.0..=1.0).contains(&exact(players, &[copies], 2, 1)));
        }
    }
}

#[test]
fn odds_cache_matches_direct_computation() {
    let odds = TypeOdds::new(4, 2);
    for identical in 1..=2u8 {
        for sequences in 1..=4u8 {
            assert_eq!(
                odds.get(identical, sequences),
                TypeOdds::for_params(4, 2, identical, sequences)
            );
        }
    }
    // three identical cards cannot come out of two decks
    assert_eq!(odds.get(3, 1), 0.0);
}
