//! Serializable view of a [`RemainingPool`], for replaying analyses.

use crate::model::card::CARDS_PER_DECK;
use crate::model::deal::MAX_DECKS;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::trump::Trump;
use crate::probability::RemainingPool;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub trump_suit: Suit,
    pub trump_rank: Rank,
    pub decks: u8,
    /// Unseen copies per card identity index.
    pub counts: Vec<u8>,
}

impl PoolSnapshot {
    pub fn capture(pool: &RemainingPool) -> Self {
        let trump = pool.trump();
        Self {
            trump_suit: trump.suit,
            trump_rank: trump.rank,
            decks: pool.decks(),
            counts: pool.counts().to_vec(),
        }
    }

    /// Rebuilds the pool. `None` when the snapshot does not describe one:
    /// wrong number of identities, a deck count out of range, or more
    /// unseen copies than the shoe holds.
    pub fn restore(&self) -> Option<RemainingPool> {
        if self.decks == 0 || self.decks > MAX_DECKS || self.trump_rank.is_joker() {
            return None;
        }
        let counts: [u8; CARDS_PER_DECK] = self.counts.as_slice().try_into().ok()?;
        if counts.iter().any(|count| *count > self.decks) {
            return None;
        }
        let trump = Trump::new(self.trump_suit, self.trump_rank);
        Some(RemainingPool::from_counts(trump, self.decks, counts))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
