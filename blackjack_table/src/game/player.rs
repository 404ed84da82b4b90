use crate::game::strategy::{Decision, DecisionPolicy, DecisionState};
use blackjack_lib::{AceRule, Card, Hand, BLACKJACK};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Name of the dealer's seat.
pub const HOUSE_NAME: &str = "House";

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatRole {
    /// The automated dealer. Its hand follows `AceRule::House`.
    House,
    /// An automated opponent.
    Automated,
    /// Driven by intents from the presentation layer.
    Human,
}

/// Where a seat is in the current round. `Stood`, `Busted` and `Natural21` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    Waiting,
    Active,
    Stood,
    Busted,
    Natural21,
}

impl SeatStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SeatStatus::Stood | SeatStatus::Busted | SeatStatus::Natural21
        )
    }

    /// The status a seat moves to once a card has landed in `hand`. A two card 21 is a natural,
    /// any other 21 stands, anything above busts. Otherwise the status is unchanged.
    pub fn after_card(self, hand: &Hand) -> SeatStatus {
        let total = hand.total();
        if hand.is_natural_21() {
            SeatStatus::Natural21
        } else if total == BLACKJACK {
            SeatStatus::Stood
        } else if total > BLACKJACK {
            SeatStatus::Busted
        } else {
            self
        }
    }
}

impl Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SeatStatus::Waiting => "waiting",
            SeatStatus::Active => "active",
            SeatStatus::Stood => "stood",
            SeatStatus::Busted => "busted",
            SeatStatus::Natural21 => "blackjack",
        };
        write!(f, "{}", s)
    }
}

/// The result of a single action taken by a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatTransition {
    pub seat: String,
    /// The card drawn, `None` for a stand.
    pub card: Option<Card>,
    pub total: u8,
    pub status: SeatStatus,
}

impl SeatTransition {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A seat at the table. Seats live for the whole session, their hand and status are reset
/// every round. Only the table mutates a seat.
#[derive(Debug)]
pub struct Seat {
    name: String,
    role: SeatRole,
    hand: Hand,
    status: SeatStatus,
    policy: Option<Box<dyn DecisionPolicy>>,
}

impl Seat {
    /// The dealer's seat, always named `HOUSE_NAME`.
    pub fn house(policy: Box<dyn DecisionPolicy>) -> Seat {
        Seat::new(HOUSE_NAME.to_string(), SeatRole::House, Some(policy))
    }

    pub fn automated<S: Into<String>>(name: S, policy: Box<dyn DecisionPolicy>) -> Seat {
        Seat::new(name.into(), SeatRole::Automated, Some(policy))
    }

    pub fn human<S: Into<String>>(name: S) -> Seat {
        Seat::new(name.into(), SeatRole::Human, None)
    }

    fn new(name: String, role: SeatRole, policy: Option<Box<dyn DecisionPolicy>>) -> Seat {
        let rule = match role {
            SeatRole::House => AceRule::House,
            _ => AceRule::Standard,
        };
        Seat {
            name,
            role,
            hand: Hand::new(rule),
            status: SeatStatus::Waiting,
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> SeatRole {
        self.role
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn cards(&self) -> &[Card] {
        self.hand.cards()
    }

    pub fn total(&self) -> u8 {
        self.hand.total()
    }

    pub fn status(&self) -> SeatStatus {
        self.status
    }

    pub fn is_automated(&self) -> bool {
        self.policy.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.status == SeatStatus::Active
    }

    /// True for a stand, whether chosen or forced by reaching 21.
    pub fn has_stood(&self) -> bool {
        matches!(self.status, SeatStatus::Stood | SeatStatus::Natural21)
    }

    pub fn has_busted(&self) -> bool {
        self.status == SeatStatus::Busted
    }

    pub fn has_natural_21(&self) -> bool {
        self.status == SeatStatus::Natural21
    }

    /// Still in contention for the round.
    pub fn is_eligible(&self) -> bool {
        !self.has_busted()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Label of the seat's policy, `None` for the human seat.
    pub fn policy_label(&self) -> Option<String> {
        self.policy.as_ref().map(|policy| policy.label())
    }

    /// Chance that the next card from `remaining` busts this seat.
    pub fn bust_probability(&self, remaining: &[Card]) -> f64 {
        self.hand.bust_probability(remaining)
    }

    /// Asks the seat's policy what to do. Human seats have no policy and return `None`.
    pub fn decide(&self, remaining: &[Card]) -> Option<Decision> {
        let policy = self.policy.as_ref()?;
        Some(policy.decide(&DecisionState::new(&self.hand, remaining)))
    }

    pub(crate) fn receive_card(&mut self, card: Card) -> SeatTransition {
        self.hand.add_card(card);
        self.status = self.status.after_card(&self.hand);
        self.transition(Some(card))
    }

    pub(crate) fn stand(&mut self) -> SeatTransition {
        self.status = SeatStatus::Stood;
        self.transition(None)
    }

    pub(crate) fn activate(&mut self) {
        debug_assert!(!self.is_finished(), "finished seat {} activated", self.name);
        self.status = SeatStatus::Active;
    }

    /// Returns an active seat to waiting. Finished seats keep their status.
    pub(crate) fn deactivate(&mut self) {
        if self.status == SeatStatus::Active {
            self.status = SeatStatus::Waiting;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.hand.clear();
        self.status = SeatStatus::Waiting;
    }

    fn transition(&self, card: Option<Card>) -> SeatTransition {
        SeatTransition {
            seat: self.name.clone(),
            card,
            total: self.total(),
            status: self.status,
        }
    }

    #[cfg(test)]
    pub(crate) fn seated(mut self, cards: &[Card], status: SeatStatus) -> Seat {
        for card in cards {
            self.hand.add_card(*card);
        }
        self.status = status;
        self
    }
}

impl Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .cards()
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(
            f,
            "{:<8}{:>3}  {:<10}{}",
            self.name,
            self.total(),
            self.status,
            cards
        )
    }
}

/// Index of the seat to activate next: walks the seats in reverse seating order starting at
/// `start` itself and wrapping around, skipping every finished seat.
pub fn next_active_index(seats: &[Seat], start: usize) -> Option<usize> {
    let len = seats.len();
    if len == 0 {
        return None;
    }
    (0..len)
        .map(|step| (start % len + len - step) % len)
        .find(|&idx| !seats[idx].is_finished())
}
