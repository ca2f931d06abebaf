//! One seat's running view of a deal: its own hand, what every other seat
//! has shown, and the unseen-card pool behind the probability queries.

mod params;
mod tracker;

pub use params::AnalyzerParams;
pub use tracker::{PlayerTracker, PropertyTypeInfo, SuitKnowledge};

use tracing::{Level, event};
use tractor_core::covering::{CoveringEngine, eliminate_property};
use tractor_core::model::card::Card;
use tractor_core::model::card_set::CardSet;
use tractor_core::model::deal::DealParams;
use tractor_core::model::suit::Suit;
use tractor_core::probability::{RemainingPool, binomial};
use tractor_core::property::PropertyType;

/// Cards that win their suit whatever the others hold, with the chance
/// that nobody trumps them.
#[derive(Debug, Clone, PartialEq)]
pub struct SureLead {
    pub suit: Suit,
    pub cards: Vec<Card>,
    pub probability: f64,
}

#[derive(Debug, Clone)]
pub struct DealAnalyzer {
    engine: CoveringEngine,
    pool: RemainingPool,
    trackers: Vec<PlayerTracker>,
    seat: usize,
    cards_left: usize,
    settings: AnalyzerParams,
}

impl DealAnalyzer {
    /// Analyzer for `seat`; `None` when the seat is not at the table.
    pub fn new(params: DealParams, seat: usize, settings: AnalyzerParams) -> Option<Self> {
        if seat >= usize::from(params.players) {
            return None;
        }
        Some(Self {
            engine: CoveringEngine::new(params),
            pool: RemainingPool::new(params.trump, params.decks),
            trackers: (0..params.players)
                .map(|_| PlayerTracker::new(params.trump, params.decks))
                .collect(),
            seat,
            cards_left: 0,
            settings,
        })
    }

    pub fn engine(&self) -> &CoveringEngine {
        &self.engine
    }

    pub fn pool(&self) -> &RemainingPool {
        &self.pool
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn settings(&self) -> AnalyzerParams {
        self.settings
    }

    /// Cards still in the observing seat's hand.
    pub fn cards_left(&self) -> usize {
        self.cards_left
    }

    pub fn tracker(&self, player: usize) -> Option<&PlayerTracker> {
        self.trackers.get(player)
    }

    pub fn my_cards(&self) -> CardSet {
        self.trackers[self.seat].all_cards()
    }

    /// Deals cards into the observing seat's hand, the kitty included.
    pub fn add_cards_to_hand(&mut self, cards: &[Card]) {
        let seat = self.seat;
        self.trackers[seat].add_cards(cards, None, &self.engine);
        self.pool.observe(cards.iter().copied());
        self.cards_left += cards.len();
    }

    /// Removes buried kitty cards from the hand. They stay seen.
    pub fn delete_cards_from_hand(&mut self, cards: &[Card]) {
        let seat = self.seat;
        self.trackers[seat].delete_cards(cards);
        self.cards_left = self.cards_left.saturating_sub(cards.len());
    }

    /// Records `cards` played by `player` in a trick led with `lead`. An
    /// empty play or an unknown player is ignored.
    pub fn record_play(&mut self, cards: &[Card], player: usize, lead: &[Card]) {
        if cards.is_empty() || player >= self.trackers.len() {
            return;
        }
        if player == self.seat {
            self.delete_cards_from_hand(cards);
            return;
        }
        let revealed = self.trackers[player].add_cards(cards, Some(lead), &self.engine);
        self.pool.observe(cards.iter().copied());
        if let Some(suit) = revealed {
            self.log_void(player, suit);
        }
    }

    /// Every seat but the observing one.
    pub fn others(&self) -> Vec<usize> {
        (0..self.trackers.len()).filter(|p| *p != self.seat).collect()
    }

    /// The players among `candidates` not known to be void in `suit`.
    pub fn players_with_suit(&self, suit: Suit, candidates: &[usize]) -> Vec<usize> {
        candidates
            .iter()
            .copied()
            .filter(|p| {
                self.trackers
                    .get(*p)
                    .is_some_and(|t| t.knowledge(suit) != SuitKnowledge::Void)
            })
            .collect()
    }

    /// Chance that `player` still holds at least `count` cards of `suit`,
    /// spreading the unseen cards evenly over the players who may hold it.
    pub fn player_has_cards_in_suit_probability(&self, suit: Suit, count: usize, player: usize) -> f64 {
        let Some(tracker) = self.trackers.get(player) else {
            return 0.0;
        };
        if tracker.knowledge(suit) == SuitKnowledge::Void {
            return 0.0;
        }
        let holders = self.players_with_suit(suit, &self.others()).len();
        if holders == 0 {
            return 0.0;
        }
        let total = self.pool.remaining_cards_in_suit(suit);
        let count = count as u32;
        if total < count {
            return 0.0;
        }
        let share = 1.0 / holders as f64;
        let fewer: f64 = (0..count)
            .map(|held| {
                binomial(total, held)
                    * share.powi(held as i32)
                    * (1.0 - share).powi((total - held) as i32)
            })
            .sum();
        (1.0 - fewer).clamp(0.0, 1.0)
    }

    /// Whether every seat but `player` is out of `suit`.
    pub fn lone_holder(&self, player: usize, suit: Suit) -> bool {
        self.trackers.iter().enumerate().all(|(seat, tracker)| {
            let has_suit = if seat == self.seat {
                tracker.cards_in_suit(suit) > 0
            } else {
                tracker.knowledge(suit) != SuitKnowledge::Void
            };
            has_suit == (seat == player)
        })
    }

    /// Chance that one of `foes` holds something bigger of the same shape.
    pub fn others_beat_property(&self, property: &PropertyType, foes: &[usize]) -> f64 {
        let suit = property.suit;
        let mut holders = self.players_with_suit(suit, &self.others()).len();
        if property.num_cards() == 1 && holders > 0 {
            holders = self.players_with_suit(suit, foes).len();
        }
        let mut nobody = 1.0;
        for &foe in foes {
            let Some(tracker) = self.trackers.get(foe) else {
                continue;
            };
            let mut beat = self.player_has_cards_in_suit_probability(suit, property.num_cards(), foe);
            if beat > 0.0 {
                let mut shapes = Vec::new();
                for shape in tracker.is_property_available_in_suit(property, suit) {
                    eliminate_property(&mut shapes, shape);
                }
                if shapes.is_empty() {
                    beat = 0.0;
                } else {
                    beat *= self.pool.beat_probability(property, holders as u8, true);
                }
            }
            nobody *= 1.0 - beat;
        }
        1.0 - nobody
    }

    /// Walks down from `property`, which nobody can beat, to the first
    /// leading level that one of `foes` might beat.
    pub fn min_to_beat_property(&self, property: &PropertyType, foes: &[usize]) -> PropertyType {
        let trump = self.engine.trump();
        let lowest = trump.lowest_level(property.suit).unwrap_or(0);
        let mut probe = *property;
        while self.others_beat_property(&probe, foes) <= 0.0 {
            let Some(lower) = trump.next_lower(probe.leading) else {
                break;
            };
            probe = probe.with_leading(lower);
            let fits = trump
                .step_down(lower, probe.sequences.saturating_sub(1))
                .is_some_and(|end| end >= lowest);
            if !fits {
                break;
            }
        }
        probe
    }

    /// The observing seat's cards in `suit` that nobody can beat in suit.
    pub fn sure_lead_cards(&self, suit: Suit) -> Vec<Card> {
        let mine = self.trackers[self.seat].suit_cards(suit);
        if mine.is_empty() {
            return Vec::new();
        }
        if self.lone_holder(self.seat, suit) {
            return mine.to_vec();
        }
        let others = self.others();
        let holders = self.players_with_suit(suit, &others).len() as u8;
        let decomposition = self.engine.decompose(&CardSet::from_cards(mine));
        let mut sure = Vec::new();
        for property in &decomposition.properties {
            let survival = self.pool.current_property_probability(property, holders, false);
            let unbeatable = survival >= self.settings.sure_lead_threshold
                || (property.num_cards() > 1 && self.others_beat_property(property, &others) == 0.0);
            if unbeatable {
                sure.extend(property.to_cards());
            }
        }
        sure
    }

    /// Chance that one of `foes`, out of `suit`, trumps a lead in it.
    pub fn trump_risk(&self, suit: Suit, foes: &[usize]) -> f64 {
        let trump_suit = self.engine.trump().suit;
        if suit == trump_suit {
            return 0.0;
        }
        let nobody: f64 = foes
            .iter()
            .map(|foe| {
                1.0 - self.void_probability(suit, *foe)
                    * self.player_has_cards_in_suit_probability(trump_suit, 1, *foe)
            })
            .product();
        1.0 - nobody
    }

    /// The best sure lead across suits. Off-suit leads are preferred on
    /// ties; a trump-suit lead is offered only when it empties the hand.
    pub fn suggest_sure_lead(&self) -> Option<SureLead> {
        let trump_suit = self.engine.trump().suit;
        let others = self.others();
        let suits = Suit::ALL
            .iter()
            .copied()
            .filter(|s| *s != trump_suit)
            .chain(std::iter::once(trump_suit));
        let mut best: Option<SureLead> = None;
        for suit in suits {
            let cards = self.sure_lead_cards(suit);
            if cards.is_empty() {
                continue;
            }
            let probability = if cards.len() == self.cards_left {
                1.0
            } else if suit == trump_suit {
                0.0
            } else {
                1.0 - self.trump_risk(suit, &others)
            };
            if probability <= 0.0 {
                continue;
            }
            if best.as_ref().is_none_or(|b| probability > b.probability) {
                best = Some(SureLead {
                    suit,
                    cards,
                    probability,
                });
            }
        }
        if let Some(lead) = &best {
            self.log_lead(lead);
        }
        best
    }

    fn void_probability(&self, suit: Suit, player: usize) -> f64 {
        let Some(tracker) = self.trackers.get(player) else {
            return 1.0;
        };
        if player == self.seat {
            return if tracker.cards_in_suit(suit) == 0 { 1.0 } else { 0.0 };
        }
        if tracker.knowledge(suit) == SuitKnowledge::Void {
            return 1.0;
        }
        let holders = self.players_with_suit(suit, &self.others()).len();
        if holders == 0 {
            return 1.0;
        }
        let total = self.pool.remaining_cards_in_suit(suit);
        (1.0 - 1.0 / holders as f64).powi(total as i32)
    }

    fn log_lead(&self, lead: &SureLead) {
        if !self.settings.log_decisions || !tracing::enabled!(target: "tractor_bot::lead", Level::INFO) {
            return;
        }
        let cards = lead
            .cards
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(",");
        event!(
            target: "tractor_bot::lead",
            Level::INFO,
            seat = self.seat,
            suit = %lead.suit,
            cards = %cards,
            probability = lead.probability,
            cards_left = self.cards_left,
        );
    }

    fn log_void(&self, player: usize, suit: Suit) {
        if !self.settings.log_decisions || !tracing::enabled!(target: "tractor_bot::observe", Level::INFO) {
            return;
        }
        event!(
            target: "tractor_bot::observe",
            Level::INFO,
            seat = self.seat,
            player,
            void_suit = %suit,
            remaining_in_suit = self.pool.remaining_cards_in_suit(suit),
        );
    }
}
