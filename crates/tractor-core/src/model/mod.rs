pub mod card;
pub mod card_set;
pub mod deal;
pub mod deck;
pub mod rank;
pub mod suit;
pub mod trump;
