use crate::card::Card;
use serde::{Deserialize, Serialize};

pub const BLACKJACK: u8 = 21;

/// How aces are softened when a hand goes over 21.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AceRule {
    /// Every ace may drop from 11 to 1.
    Standard,
    /// The house never drops its last unconverted ace, so a house hand can
    /// sit above 21 with an ace still counted as 11.
    House,
}

/// Sum of card values with every ace counted as 11.
pub fn raw_sum(cards: &[Card]) -> u8 {
    cards
        .iter()
        .fold(0u8, |acc, card| acc.saturating_add(card.value()))
}

/// Converts aces from 11 to 1 while `sum` is over 21. Under `AceRule::House`
/// the conversion stops once a single ace is left.
pub fn adjust_for_aces(mut sum: u8, cards: &[Card], rule: AceRule) -> u8 {
    let mut aces = cards.iter().filter(|card| card.is_ace()).count();
    while aces > 0 && sum > BLACKJACK {
        if rule == AceRule::House && aces == 1 {
            break;
        }
        sum -= 10;
        aces -= 1;
    }
    sum
}

pub fn total(cards: &[Card], rule: AceRule) -> u8 {
    adjust_for_aces(raw_sum(cards), cards, rule)
}

pub fn is_natural_21(cards: &[Card], rule: AceRule) -> bool {
    cards.len() == 2 && total(cards, rule) == BLACKJACK
}

/// Fraction of `remaining` cards that would push `current_total` over 21.
/// An empty deck gives 1.0, nothing can be drawn from it.
pub fn bust_probability(current_total: u8, remaining: &[Card]) -> f64 {
    if remaining.is_empty() {
        return 1.0;
    }
    let bust_count = remaining
        .iter()
        .filter(|card| current_total.saturating_add(card.value()) > BLACKJACK)
        .count();
    bust_count as f64 / remaining.len() as f64
}

/// The cards held by a seat for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    rule: AceRule,
}

impl Hand {
    pub fn new(rule: AceRule) -> Hand {
        Hand {
            cards: Vec::new(),
            rule,
        }
    }

    pub fn with_cards(cards: Vec<Card>, rule: AceRule) -> Hand {
        Hand { cards, rule }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn rule(&self) -> AceRule {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn total(&self) -> u8 {
        total(&self.cards, self.rule)
    }

    pub fn is_natural_21(&self) -> bool {
        is_natural_21(&self.cards, self.rule)
    }

    pub fn is_busted(&self) -> bool {
        self.total() > BLACKJACK
    }

    pub fn bust_probability(&self, remaining: &[Card]) -> f64 {
        bust_probability(self.total(), remaining)
    }
}
