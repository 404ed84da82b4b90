pub mod game;
pub mod stats;
pub mod write;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use game::prelude::*;
pub use stats::{SeatTally, SessionStats};

pub mod prelude {
    pub use super::{game::prelude::*, SessionStats, TableConfig, TableConfigBuilder};
}

/// Struct for configuring a `BlackjackTable`. Meant to be built with `TableConfig::new()`, or
/// deserialized from JSON where every missing field takes its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// How long an automated seat "thinks" before each decision, in milliseconds.
    pub thinking_delay_ms: u64,
    pub bust_threshold: f64,
    pub house_floor: u8,
    pub opponent_name: String,
    pub human_name: String,
    /// Seed for shuffling, `None` draws one from the operating system.
    pub seed: Option<u64>,
}

impl TableConfig {
    /// Associated method for returning a new `TableConfigBuilder`, allows the caller to pick
    /// the parameters of the table such as the thinking delay, the bust threshold of the
    /// automated seats and the names of the seats.
    pub fn new() -> TableConfigBuilder {
        TableConfigBuilder {
            thinking_delay_ms: None,
            bust_threshold: None,
            house_floor: None,
            opponent_name: None,
            human_name: None,
            seed: None,
        }
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }
}

impl Default for TableConfig {
    /// House, Adam and Me with one second of thinking.
    fn default() -> Self {
        TableConfig::new().build()
    }
}

/// Builder for `TableConfig`.
#[derive(Debug, Clone)]
pub struct TableConfigBuilder {
    thinking_delay_ms: Option<u64>,
    bust_threshold: Option<f64>,
    house_floor: Option<u8>,
    opponent_name: Option<String>,
    human_name: Option<String>,
    seed: Option<u64>,
}

impl TableConfigBuilder {
    pub fn thinking_delay(&mut self, delay: Duration) -> &mut Self {
        self.thinking_delay_ms = Some(delay.as_millis() as u64);
        self
    }

    /// Method for setting the bust probability below which automated seats hit.
    pub fn bust_threshold(&mut self, threshold: f64) -> &mut Self {
        self.bust_threshold = Some(threshold);
        self
    }

    /// Method for setting the total at which the house always stands.
    pub fn house_floor(&mut self, floor: u8) -> &mut Self {
        self.house_floor = Some(floor);
        self
    }

    pub fn opponent_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.opponent_name = Some(name.into());
        self
    }

    pub fn human_name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.human_name = Some(name.into());
        self
    }

    /// Method for fixing the shuffle seed so rounds can be replayed.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for building a `TableConfig` from the builder, unset fields take their defaults.
    pub fn build(&mut self) -> TableConfig {
        TableConfig {
            thinking_delay_ms: self.thinking_delay_ms.unwrap_or(1000),
            bust_threshold: self.bust_threshold.unwrap_or(DEFAULT_BUST_THRESHOLD),
            house_floor: self.house_floor.unwrap_or(HOUSE_STAND_FLOOR),
            opponent_name: self
                .opponent_name
                .take()
                .unwrap_or_else(|| "Adam".to_string()),
            human_name: self.human_name.take().unwrap_or_else(|| "Me".to_string()),
            seed: self.seed,
        }
    }
}
