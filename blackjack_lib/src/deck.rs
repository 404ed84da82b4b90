use crate::card::{Card, Rank, Suit};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of cards in a freshly built deck.
pub const DECK_SIZE: usize = 52;

/// Offsets folded into the swap index while shuffling. One of them is picked
/// per shuffle.
pub const SHUFFLE_OFFSETS: [usize; 9] = [2, 3, 7, 11, 13, 17, 23, 29, 31];

/// A single deck of cards. Cards leave from the front and never come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    dealt: usize,
}

impl Deck {
    /// Builds and shuffles a fresh deck using the thread local generator.
    pub fn new() -> Deck {
        Deck::build(&mut rand::thread_rng())
    }

    /// Builds all 52 cards exactly once and shuffles them with `rng`.
    pub fn build<R: Rng + ?Sized>(rng: &mut R) -> Deck {
        let mut deck = Deck::unshuffled();
        deck.shuffle(rng);
        deck
    }

    /// The 52 cards in build order: suit by suit, 2 through ace.
    pub fn unshuffled() -> Deck {
        let cards = Suit::ALL
            .iter()
            .flat_map(|suit| Rank::ALL.iter().map(move |rank| Card::new(*rank, *suit)))
            .collect();
        Deck { cards, dealt: 0 }
    }

    /// A stacked deck, the first card in `cards` is the first one drawn.
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards, dealt: 0 }
    }

    /// Fisher-Yates with an offset: a single offset is picked from a random
    /// permutation of `SHUFFLE_OFFSETS`, then the deck goes through
    /// `shuffle_with_offset`. The result is not a uniform permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut offsets = SHUFFLE_OFFSETS;
        offsets.shuffle(rng);
        self.shuffle_with_offset(offsets[0], rng);
    }

    /// For `i` from the back down to 1, swaps position `i` with
    /// `floor(random * (i + 1 + offset)) mod len`.
    pub fn shuffle_with_offset<R: Rng + ?Sized>(&mut self, offset: usize, rng: &mut R) {
        let len = self.cards.len();
        for i in (1..len).rev() {
            let span = (i + 1 + offset) as f64;
            let j = (rng.gen::<f64>() * span).floor() as usize % len;
            self.cards.swap(i, j);
        }
        debug!("shuffled {} cards with offset {}", len, offset);
    }

    /// True when at most one card is left. The last card is never dealt.
    pub fn is_last_card(&self) -> bool {
        self.cards.len() <= 1
    }

    pub fn has_cards_remaining(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn cards_remaining(&self) -> usize {
        self.cards.len()
    }

    /// Number of cards drawn since the deck was built.
    pub fn cards_dealt(&self) -> usize {
        self.dealt
    }

    /// The cards still in the deck, front first.
    pub fn remaining(&self) -> &[Card] {
        &self.cards
    }

    /// Removes and returns the front card, or `None` once one card or less is left.
    pub fn draw(&mut self) -> Option<Card> {
        if self.is_last_card() {
            return None;
        }
        self.dealt += 1;
        Some(self.cards.remove(0))
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}
