//! Module that runs games of blackjack at a single table. The table itself lives in `table`,
//! this module ties it to a presentation layer: human intents come in through `HumanInput`,
//! table events go out through an `EventSink`.

pub mod event;
pub mod player;
pub mod resolution;
pub mod scheduler;
pub mod strategy;
pub mod table;
pub mod prelude {
    pub use super::{BlackjackGame, HumanInput, Intent, Pacing, ScriptedInput};
    pub use crate::game::event::{EventLog, EventSink, TableEvent};
    pub use crate::game::player::{Seat, SeatRole, SeatStatus, SeatTransition, HOUSE_NAME};
    pub use crate::game::resolution::{
        resolve_round, PushReason, RoundOutcome, RoundSummary, SeatResult,
    };
    pub use crate::game::scheduler::{Scheduler, TaskHandle};
    pub use crate::game::strategy::{
        BustProbabilityPolicy, Decision, DecisionPolicy, DecisionState, HouseFloorPolicy,
        DEFAULT_BUST_THRESHOLD, HOUSE_STAND_FLOOR,
    };
    pub use crate::game::table::{
        BlackjackTable, RoundPhase, SeatSnapshot, TableSnapshot,
    };
    pub use blackjack_lib::{BlackjackGameError, Card, Deck, Hand, Rank, Suit};
}

use crate::stats::SessionStats;
use crate::TableConfig;
use log::{info, warn};
use prelude::*;
use std::collections::VecDeque;
use std::thread;

/// What the human seat wants to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Hit,
    Stand,
    /// Leave the table, the round in progress is abandoned.
    Quit,
}

/// Source of intents for the human seat, e.g. a terminal prompt.
pub trait HumanInput {
    /// Called whenever the human seat is active. `table` is only borrowed for display.
    fn next_intent(&mut self, table: &BlackjackTable, seat: &Seat) -> Intent;
}

/// Plays back a fixed list of intents, standing once the list runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    intents: VecDeque<Intent>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = Intent>>(intents: I) -> ScriptedInput {
        ScriptedInput {
            intents: intents.into_iter().collect(),
        }
    }
}

impl HumanInput for ScriptedInput {
    fn next_intent(&mut self, _table: &BlackjackTable, _seat: &Seat) -> Intent {
        self.intents.pop_front().unwrap_or(Intent::Stand)
    }
}

/// How the thinking delay of automated seats is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Skip the wait, the virtual clock jumps straight to the next decision.
    Instant,
    /// Sleep through the delay, for play at a terminal.
    RealTime,
}

/// Struct that drives a `BlackjackTable` round after round, forwarding events to `sink` and
/// collecting the session stats.
pub struct BlackjackGame<I: HumanInput, E: EventSink> {
    table: BlackjackTable,
    input: I,
    sink: E,
    pacing: Pacing,
    stats: SessionStats,
    quit: bool,
}

impl<I: HumanInput, E: EventSink> BlackjackGame<I, E> {
    pub fn new(
        config: TableConfig,
        input: I,
        sink: E,
        pacing: Pacing,
    ) -> Result<BlackjackGame<I, E>, BlackjackGameError> {
        Ok(BlackjackGame::with_table(
            BlackjackTable::new(config)?,
            input,
            sink,
            pacing,
        ))
    }

    pub fn with_table(table: BlackjackTable, input: I, sink: E, pacing: Pacing) -> Self {
        BlackjackGame {
            table,
            input,
            sink,
            pacing,
            stats: SessionStats::new(),
            quit: false,
        }
    }

    pub fn table(&self) -> &BlackjackTable {
        &self.table
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// True once the human seat asked to leave.
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Method that plays up to `rounds` rounds, stopping early if the human quits.
    pub fn run(&mut self, rounds: u32) -> &SessionStats {
        for _ in 0..rounds {
            if self.quit || self.run_round().is_none() {
                break;
            }
        }
        info!(
            "session over after {} round(s), {} push(es)",
            self.stats.rounds_played, self.stats.pushes
        );
        &self.stats
    }

    /// Plays a single round with a fresh deck. Returns `None` if the round was abandoned.
    pub fn run_round(&mut self) -> Option<RoundSummary> {
        self.table.start_round();
        self.play_out()
    }

    /// Plays a single round with the given deck.
    pub fn run_round_with_deck(&mut self, deck: Deck) -> Option<RoundSummary> {
        self.table.start_round_with_deck(deck);
        self.play_out()
    }

    fn play_out(&mut self) -> Option<RoundSummary> {
        loop {
            self.flush_events();
            if !self.table.is_round_in_progress() {
                break;
            }

            let human = self
                .table
                .active_seat()
                .filter(|seat| !seat.is_automated())
                .map(|seat| (seat.name().to_string(), self.input.next_intent(&self.table, seat)));

            match human {
                Some((name, Intent::Hit)) => {
                    if let Err(e) = self.table.request_hit(&name) {
                        warn!("{}", e);
                    }
                }
                Some((name, Intent::Stand)) => {
                    if let Err(e) = self.table.request_stand(&name) {
                        warn!("{}", e);
                    }
                }
                Some((_, Intent::Quit)) => {
                    self.quit = true;
                    self.table.abort_round();
                    self.flush_events();
                    return None;
                }
                None => match self.table.time_until_next_decision() {
                    Some(wait) => {
                        if self.pacing == Pacing::RealTime {
                            thread::sleep(wait);
                        }
                        self.table.advance(wait);
                    }
                    None => {
                        warn!("round {} stalled, abandoning it", self.table.round());
                        self.table.abort_round();
                        self.flush_events();
                        return None;
                    }
                },
            }
        }

        let summary = self.table.last_summary()?.clone();
        self.stats.record(&summary);
        Some(summary)
    }

    fn flush_events(&mut self) {
        for event in self.table.drain_events() {
            self.sink.notify(&event);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn deck(ranks: &[Rank]) -> Deck {
        Deck::from_cards(ranks.iter().map(|r| Card::new(*r, Suit::Hearts)).collect())
    }

    fn game(intents: Vec<Intent>) -> BlackjackGame<ScriptedInput, EventLog> {
        BlackjackGame::new(
            TableConfig::new().seed(3).build(),
            ScriptedInput::new(intents),
            EventLog::default(),
            Pacing::Instant,
        )
        .unwrap()
    }

    #[test]
    fn test_round_with_stacked_deck() {
        let mut game = game(vec![Intent::Hit, Intent::Stand]);
        // Me 10 5, Adam 10 9, House 10 7. Me hits a 4 and stands on 19 with Adam.
        let summary = game
            .run_round_with_deck(deck(&[
                Rank::Ten,
                Rank::Ten,
                Rank::Ten,
                Rank::Five,
                Rank::Nine,
                Rank::Seven,
                Rank::Four,
                Rank::King,
                Rank::Queen,
            ]))
            .unwrap();
        assert_eq!(
            summary.outcome,
            RoundOutcome::Push {
                reason: PushReason::TotalTie {
                    seats: vec!["Adam".to_string(), "Me".to_string()],
                    total: 19
                }
            }
        );
        assert_eq!(game.stats().rounds_played, 1);
        assert_eq!(game.stats().pushes, 1);

        let events = &game.sink().events;
        assert_eq!(events.first(), Some(&TableEvent::RoundStarted { round: 1 }));
        assert!(matches!(
            events.last(),
            Some(TableEvent::RoundResolved { round: 1, .. })
        ));
    }

    #[test]
    fn test_session_counts_every_round() {
        let mut game = game(Vec::new());
        let stats = game.run(5);
        assert_eq!(stats.rounds_played, 5);
        let wins: u32 = stats.seats.values().map(|tally| tally.wins).sum();
        assert_eq!(wins + stats.pushes, 5);
        assert_eq!(game.table().round(), 5);
    }

    #[test]
    fn test_quit_abandons_round() {
        let mut game = game(vec![Intent::Quit]);
        let summary = game.run_round_with_deck(deck(&[
            Rank::Ten,
            Rank::Ten,
            Rank::Ten,
            Rank::Five,
            Rank::Nine,
            Rank::Seven,
            Rank::Four,
        ]));
        assert_eq!(summary, None);
        assert!(game.has_quit());
        assert_eq!(game.table().phase(), RoundPhase::Idle);
        assert_eq!(game.run(3).rounds_played, 0);
    }
}
