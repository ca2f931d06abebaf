use tractor_bot::{AnalyzerParams, DealAnalyzer, SuitKnowledge};
use tractor_core::model::card::Card;
use tractor_core::model::deal::DealParams;
use tractor_core::model::rank::Rank;
use tractor_core::model::suit::Suit;
use tractor_core::model::trump::Trump;

const ME: usize = 1;

fn clubs(ranks: &[Rank]) -> Vec<Card> {
    ranks.iter().map(|r| Card::new(*r, Suit::Clubs)).collect()
}

fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort_by_key(|c| c.index());
    cards
}

fn analyzer() -> DealAnalyzer {
    use Rank::*;
    let params = DealParams::new(Trump::new(Suit::Hearts, Two), 2, 4).expect("params");
    let mut analyzer = DealAnalyzer::new(params, ME, AnalyzerParams::default()).expect("seat");
    analyzer.add_cards_to_hand(&clubs(&[Ace, King, King, Jack, Nine, Nine, Eight]));
    analyzer
}

#[test]
fn top_cards_lead_safely_before_any_play() {
    use Rank::*;
    let analyzer = analyzer();
    assert_eq!(
        sorted(analyzer.sure_lead_cards(Suit::Clubs)),
        sorted(clubs(&[Ace, King, King]))
    );
    let lead = analyzer.suggest_sure_lead().expect("clubs lead");
    assert_eq!(lead.suit, Suit::Clubs);
    assert!(lead.probability > 0.9 && lead.probability <= 1.0);
}

#[test]
fn followers_without_pairs_make_small_pairs_safe() {
    use Rank::*;
    let mut analyzer = analyzer();
    let lead = clubs(&[King, King]);
    analyzer.record_play(&lead, ME, &lead);
    analyzer.record_play(&clubs(&[Three, Four]), 2, &lead);
    analyzer.record_play(&clubs(&[Three, Four]), 3, &lead);
    analyzer.record_play(&clubs(&[Five, Six]), 0, &lead);

    assert_eq!(analyzer.cards_left(), 5);
    for player in [0, 2, 3] {
        let tracker = analyzer.tracker(player).expect("tracker");
        assert_eq!(tracker.knowledge(Suit::Clubs), SuitKnowledge::Exists);
    }
    assert_eq!(
        sorted(analyzer.sure_lead_cards(Suit::Clubs)),
        sorted(clubs(&[Ace, Nine, Nine]))
    );
}

#[test]
fn empty_suit_has_no_sure_lead() {
    let analyzer = analyzer();
    assert!(analyzer.sure_lead_cards(Suit::Spades).is_empty());
    assert!(analyzer.sure_lead_cards(Suit::Hearts).is_empty());
}
