use blackjack_lib::{Card, Hand, BLACKJACK};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

/// Bust probability below which automated seats keep hitting.
pub const DEFAULT_BUST_THRESHOLD: f64 = 0.5;

/// Total at which the house stops drawing whatever the deck looks like.
pub const HOUSE_STAND_FLOOR: u8 = 17;

/// What an automated seat does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Hit,
    Stand,
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Hit => write!(f, "hit"),
            Decision::Stand => write!(f, "stand"),
        }
    }
}

/// Everything a policy is allowed to look at: its own hand and the cards left in the deck.
/// Cards in the other seats' hands are not visible.
pub struct DecisionState<'a> {
    pub hand: &'a Hand,
    pub total: u8,
    pub remaining: &'a [Card],
}

impl<'a> DecisionState<'a> {
    pub fn new(hand: &'a Hand, remaining: &'a [Card]) -> DecisionState<'a> {
        DecisionState {
            hand,
            total: hand.total(),
            remaining,
        }
    }

    /// Share of the remaining deck that would bust the hand, recomputed on every call.
    pub fn bust_probability(&self) -> f64 {
        blackjack_lib::bust_probability(self.total, self.remaining)
    }
}

/// Trait for the decision making of an automated seat. Policies are pure: the same state always
/// yields the same decision, so they can be composed freely.
pub trait DecisionPolicy: Debug + Send {
    fn decide(&self, state: &DecisionState<'_>) -> Decision;
    /// Short description of the policy, used for logging.
    fn label(&self) -> String;
}

/// Hits while the hand is under 21 and the chance of busting on the next card is below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BustProbabilityPolicy {
    threshold: f64,
}

impl BustProbabilityPolicy {
    pub fn new(threshold: f64) -> BustProbabilityPolicy {
        BustProbabilityPolicy { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for BustProbabilityPolicy {
    fn default() -> Self {
        BustProbabilityPolicy::new(DEFAULT_BUST_THRESHOLD)
    }
}

impl DecisionPolicy for BustProbabilityPolicy {
    fn decide(&self, state: &DecisionState<'_>) -> Decision {
        if state.total < BLACKJACK && state.bust_probability() < self.threshold {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }

    fn label(&self) -> String {
        format!("bust probability < {:.2}", self.threshold)
    }
}

/// Wraps another policy with the house floor: at `floor` or above the house always stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseFloorPolicy<P: DecisionPolicy> {
    floor: u8,
    inner: P,
}

impl<P: DecisionPolicy> HouseFloorPolicy<P> {
    pub fn new(floor: u8, inner: P) -> HouseFloorPolicy<P> {
        HouseFloorPolicy { floor, inner }
    }
}

impl<P: DecisionPolicy> DecisionPolicy for HouseFloorPolicy<P> {
    fn decide(&self, state: &DecisionState<'_>) -> Decision {
        if state.total >= self.floor {
            return Decision::Stand;
        }
        self.inner.decide(state)
    }

    fn label(&self) -> String {
        format!("stand on {}, otherwise {}", self.floor, self.inner.label())
    }
}
