use crate::model::card::{CARDS_PER_DECK, Card};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A shoe of one or more full decks, jokers included.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(decks: u8) -> Self {
        let mut cards = Vec::with_capacity(CARDS_PER_DECK * decks as usize);
        for _ in 0..decks {
            cards.extend((0..CARDS_PER_DECK).filter_map(Card::from_index));
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(decks: u8, rng: &mut R) -> Self {
        let mut deck = Self::new(decks);
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(decks: u8, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(decks, &mut rng)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
