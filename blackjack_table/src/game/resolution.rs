use crate::game::player::{Seat, SeatStatus};
use blackjack_lib::{Card, BLACKJACK};
use serde::Serialize;
use std::fmt::Display;

/// Why a round ended without a winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PushReason {
    AllBusted,
    NaturalTie { seats: Vec<String> },
    TotalTie { seats: Vec<String>, total: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RoundOutcome {
    Winner {
        seat: String,
        total: u8,
        natural: bool,
    },
    Push {
        reason: PushReason,
    },
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<&str> {
        match self {
            RoundOutcome::Winner { seat, .. } => Some(seat),
            RoundOutcome::Push { .. } => None,
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, RoundOutcome::Push { .. })
    }
}

impl Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundOutcome::Winner {
                seat,
                natural: true,
                ..
            } => write!(f, "{} wins with blackjack", seat),
            RoundOutcome::Winner { seat, total, .. } => write!(f, "{} wins with {}", seat, total),
            RoundOutcome::Push {
                reason: PushReason::AllBusted,
            } => write!(f, "push, everyone busted"),
            RoundOutcome::Push {
                reason: PushReason::NaturalTie { seats },
            } => write!(f, "push, blackjack for {}", seats.join(" and ")),
            RoundOutcome::Push {
                reason: PushReason::TotalTie { seats, total },
            } => write!(f, "push, {} tie on {}", seats.join(" and "), total),
        }
    }
}

/// Decides a finished round. In order of precedence: everyone busted is a push, a single
/// natural 21 wins outright, several naturals push, otherwise the unique highest total of 21
/// or less among the seats still standing wins and a tie pushes.
pub fn resolve_round(seats: &[Seat]) -> RoundOutcome {
    if seats.iter().all(|seat| seat.has_busted()) {
        return RoundOutcome::Push {
            reason: PushReason::AllBusted,
        };
    }

    let naturals: Vec<&Seat> = seats.iter().filter(|seat| seat.has_natural_21()).collect();
    match naturals.as_slice() {
        [seat] => {
            return RoundOutcome::Winner {
                seat: seat.name().to_string(),
                total: seat.total(),
                natural: true,
            }
        }
        [_, _, ..] => {
            return RoundOutcome::Push {
                reason: PushReason::NaturalTie {
                    seats: naturals.iter().map(|seat| seat.name().to_string()).collect(),
                },
            }
        }
        [] => {}
    }

    let contenders: Vec<&Seat> = seats
        .iter()
        .filter(|seat| seat.is_eligible() && seat.total() <= BLACKJACK)
        .collect();
    let best = match contenders.iter().map(|seat| seat.total()).max() {
        Some(best) => best,
        None => {
            return RoundOutcome::Push {
                reason: PushReason::AllBusted,
            }
        }
    };
    let leaders: Vec<&&Seat> = contenders
        .iter()
        .filter(|seat| seat.total() == best)
        .collect();
    match leaders.as_slice() {
        [seat] => RoundOutcome::Winner {
            seat: seat.name().to_string(),
            total: best,
            natural: false,
        },
        _ => RoundOutcome::Push {
            reason: PushReason::TotalTie {
                seats: leaders.iter().map(|seat| seat.name().to_string()).collect(),
                total: best,
            },
        },
    }
}

/// Final state of one seat when its round resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatResult {
    pub name: String,
    pub cards: Vec<Card>,
    pub total: u8,
    pub status: SeatStatus,
}

impl From<&Seat> for SeatResult {
    fn from(seat: &Seat) -> Self {
        SeatResult {
            name: seat.name().to_string(),
            cards: seat.cards().to_vec(),
            total: seat.total(),
            status: seat.status(),
        }
    }
}

/// Record of a resolved round, kept by the table after hands are cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round: u64,
    pub outcome: RoundOutcome,
    pub seats: Vec<SeatResult>,
    /// True when the deck ran out and unfinished seats were stood.
    pub deck_exhausted: bool,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::strategy::BustProbabilityPolicy;
    use blackjack_lib::{Rank, Suit};

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks.iter().map(|r| Card::new(*r, Suit::Hearts)).collect()
    }

    fn house(ranks: &[Rank], status: SeatStatus) -> Seat {
        Seat::house(Box::new(BustProbabilityPolicy::default())).seated(&cards(ranks), status)
    }

    fn adam(ranks: &[Rank], status: SeatStatus) -> Seat {
        Seat::automated("Adam", Box::new(BustProbabilityPolicy::default()))
            .seated(&cards(ranks), status)
    }

    fn me(ranks: &[Rank], status: SeatStatus) -> Seat {
        Seat::human("Me").seated(&cards(ranks), status)
    }

    #[test]
    fn test_dealer_busts_highest_total_wins() {
        let seats = vec![
            house(&[Rank::Ten, Rank::Six, Rank::King], SeatStatus::Busted),
            adam(&[Rank::Ten, Rank::Nine], SeatStatus::Stood),
            me(&[Rank::Ten, Rank::Eight], SeatStatus::Stood),
        ];
        assert_eq!(
            resolve_round(&seats),
            RoundOutcome::Winner {
                seat: "Adam".to_string(),
                total: 19,
                natural: false
            }
        );
    }

    #[test]
    fn test_tie_at_20_is_a_push() {
        let seats = vec![
            house(&[Rank::Ten, Rank::Six, Rank::Nine], SeatStatus::Busted),
            adam(&[Rank::Ten, Rank::Queen], SeatStatus::Stood),
            me(&[Rank::King, Rank::Jack], SeatStatus::Stood),
        ];
        let outcome = resolve_round(&seats);
        assert!(outcome.is_push());
        assert_eq!(
            outcome,
            RoundOutcome::Push {
                reason: PushReason::TotalTie {
                    seats: vec!["Adam".to_string(), "Me".to_string()],
                    total: 20
                }
            }
        );
    }

    #[test]
    fn test_single_natural_wins_over_everything() {
        let seats = vec![
            house(&[Rank::Ten, Rank::Four, Rank::Seven], SeatStatus::Stood),
            adam(&[Rank::Seven, Rank::Seven, Rank::Seven], SeatStatus::Stood),
            me(&[Rank::Ace, Rank::King], SeatStatus::Natural21),
        ];
        let outcome = resolve_round(&seats);
        assert_eq!(outcome.winner(), Some("Me"));
        assert_eq!(outcome.to_string(), "Me wins with blackjack");
    }

    #[test]
    fn test_two_naturals_push() {
        let seats = vec![
            house(&[Rank::Ace, Rank::Queen], SeatStatus::Natural21),
            adam(&[Rank::Ten, Rank::Nine], SeatStatus::Stood),
            me(&[Rank::Ace, Rank::King], SeatStatus::Natural21),
        ];
        assert_eq!(
            resolve_round(&seats),
            RoundOutcome::Push {
                reason: PushReason::NaturalTie {
                    seats: vec!["House".to_string(), "Me".to_string()]
                }
            }
        );
    }

    #[test]
    fn test_everyone_busted() {
        let seats = vec![
            house(&[Rank::Ten, Rank::Six, Rank::King], SeatStatus::Busted),
            adam(&[Rank::Ten, Rank::Nine, Rank::Five], SeatStatus::Busted),
            me(&[Rank::Ten, Rank::Eight, Rank::Four], SeatStatus::Busted),
        ];
        let outcome = resolve_round(&seats);
        assert_eq!(
            outcome,
            RoundOutcome::Push {
                reason: PushReason::AllBusted
            }
        );
        assert_eq!(outcome.winner(), None);
    }

    #[test]
    fn test_lone_survivor_wins() {
        let seats = vec![
            house(&[Rank::Ten, Rank::Six, Rank::King], SeatStatus::Busted),
            adam(&[Rank::Two, Rank::Three], SeatStatus::Stood),
            me(&[Rank::Ten, Rank::Eight, Rank::Four], SeatStatus::Busted),
        ];
        assert_eq!(resolve_round(&seats).winner(), Some("Adam"));
    }

    #[test]
    fn test_empty_table_pushes() {
        assert!(resolve_round(&[]).is_push());
    }

    #[test]
    fn test_summary_from_seat() {
        let seat = me(&[Rank::Ten, Rank::Eight], SeatStatus::Stood);
        let result = SeatResult::from(&seat);
        assert_eq!(result.total, 18);
        assert_eq!(result.cards.len(), 2);
        assert_eq!(result.status, SeatStatus::Stood);
    }
}
