//! Cards, the deck and the hand arithmetic shared by every blackjack table.

pub mod card;
pub mod deck;
pub mod error;
pub mod hand;

pub use card::{Card, Rank, Suit};
pub use deck::{Deck, DECK_SIZE, SHUFFLE_OFFSETS};
pub use error::BlackjackGameError;
pub use hand::{
    adjust_for_aces, bust_probability, is_natural_21, raw_sum, total, AceRule, Hand, BLACKJACK,
};
