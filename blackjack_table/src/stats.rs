use crate::game::player::SeatStatus;
use crate::game::resolution::{RoundOutcome, RoundSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Per seat counts over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeatTally {
    pub wins: u32,
    pub naturals: u32,
    pub busts: u32,
}

/// Struct for keeping track of how a session of rounds went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub rounds_played: u32,
    pub pushes: u32,
    /// Rounds that ended because the deck ran out.
    pub exhausted_rounds: u32,
    pub seats: BTreeMap<String, SeatTally>,
}

impl SessionStats {
    pub fn new() -> SessionStats {
        SessionStats::default()
    }

    /// Folds a resolved round into the stats.
    pub fn record(&mut self, summary: &RoundSummary) {
        self.rounds_played += 1;
        if summary.deck_exhausted {
            self.exhausted_rounds += 1;
        }
        for seat in summary.seats.iter() {
            let tally = self.seats.entry(seat.name.clone()).or_default();
            match seat.status {
                SeatStatus::Busted => tally.busts += 1,
                SeatStatus::Natural21 => tally.naturals += 1,
                _ => {}
            }
        }
        match &summary.outcome {
            RoundOutcome::Winner { seat, .. } => {
                self.seats.entry(seat.clone()).or_default().wins += 1;
            }
            RoundOutcome::Push { .. } => self.pushes += 1,
        }
    }

    pub fn wins(&self, seat: &str) -> u32 {
        self.seats.get(seat).map_or(0, |tally| tally.wins)
    }
}

impl Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 60;
        const TEXT_WIDTH: usize = "rounds ended by an empty deck".len() + 4;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;

        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
            "rounds played",
            self.rounds_played,
            "pushes",
            self.pushes,
            "rounds ended by an empty deck",
            self.exhausted_rounds,
        )?;
        for (name, tally) in self.seats.iter() {
            writeln!(f, "{:-^WIDTH$}", name)?;
            writeln!(
                f,
                "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
                {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
                {:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
                "wins",
                tally.wins,
                "blackjacks",
                tally.naturals,
                "busts",
                tally.busts,
            )?;
        }
        Ok(())
    }
}
