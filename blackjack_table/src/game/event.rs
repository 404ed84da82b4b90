use crate::game::resolution::RoundOutcome;
use blackjack_lib::Card;
use serde::Serialize;

/// Notifications for the presentation layer. The table queues these in the order things
/// happen, adapters drain and render them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TableEvent {
    RoundStarted { round: u64 },
    CardDealt { seat: String, card: Card },
    TotalChanged { seat: String, total: u8 },
    SeatActivated { seat: String },
    SeatDeactivated { seat: String },
    SeatStood { seat: String, total: u8 },
    SeatBusted { seat: String, total: u8 },
    Natural21 { seat: String },
    DeckExhausted { remaining: usize },
    RoundResolved { round: u64, outcome: RoundOutcome },
}

/// Something that renders table events, e.g. a terminal or a socket.
pub trait EventSink {
    fn notify(&mut self, event: &TableEvent);
}

/// Keeps every event it sees, handy for tests and for batching over http.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<TableEvent>,
}

impl EventSink for EventLog {
    fn notify(&mut self, event: &TableEvent) {
        self.events.push(event.clone());
    }
}
