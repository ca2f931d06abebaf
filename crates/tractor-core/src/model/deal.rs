use crate::model::card::CARDS_PER_DECK;
use crate::model::card_set::CardSet;
use crate::model::deck::Deck;
use crate::model::trump::Trump;
use thiserror::Error;

pub const MIN_PLAYERS: u8 = 4;
pub const MAX_PLAYERS: u8 = 6;
pub const MAX_DECKS: u8 = 6;
pub const MIN_KITTY: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealError {
    #[error("player count {0} outside 4..=6")]
    Players(u8),
    #[error("deck count {0} outside 1..=6")]
    Decks(u8),
    #[error("trump rank must be a natural rank, got {0}")]
    TrumpRank(crate::model::rank::Rank),
    #[error("{decks} deck(s) cannot seat {players} players")]
    NotEnoughCards { decks: u8, players: u8 },
}

/// Fixed parameters of one deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealParams {
    pub trump: Trump,
    pub decks: u8,
    pub players: u8,
}

impl DealParams {
    pub fn new(trump: Trump, decks: u8, players: u8) -> Result<Self, DealError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(DealError::Players(players));
        }
        if decks == 0 || decks > MAX_DECKS {
            return Err(DealError::Decks(decks));
        }
        if trump.rank.is_joker() {
            return Err(DealError::TrumpRank(trump.rank));
        }
        let params = Self {
            trump,
            decks,
            players,
        };
        if params.kitty_size() >= params.total_cards() {
            return Err(DealError::NotEnoughCards { decks, players });
        }
        Ok(params)
    }

    pub fn total_cards(&self) -> usize {
        CARDS_PER_DECK * self.decks as usize
    }

    /// Cards left face down: the remainder of an even split, raised by one
    /// card per player until at least six remain.
    pub fn kitty_size(&self) -> usize {
        let players = self.players as usize;
        let mut kitty = self.total_cards() % players;
        while kitty < MIN_KITTY {
            kitty += players;
        }
        kitty
    }

    pub fn hand_size(&self) -> usize {
        (self.total_cards() - self.kitty_size()) / self.players as usize
    }

    /// Deals round robin from the top of the deck; the last cards form the
    /// kitty.
    pub fn deal(&self, deck: &Deck) -> Deal {
        let mut hands = vec![CardSet::new(); self.players as usize];
        let dealt = deck.len().saturating_sub(self.kitty_size());
        for (position, card) in deck.cards()[..dealt].iter().enumerate() {
            hands[position % self.players as usize].insert(*card);
        }
        let kitty = CardSet::from_cards(&deck.cards()[dealt..]);
        Deal { hands, kitty }
    }
}

#[derive(Debug, Clone)]
pub struct Deal {
    pub hands: Vec<CardSet>,
    pub kitty: CardSet,
}
