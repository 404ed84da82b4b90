use thiserror::Error;

/// Errors produced by the blackjack engine. Everything here is recoverable. Rejected intents
/// leave the table untouched, `NoCardAvailable` is reported after the round has been closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackjackGameError {
    #[error("unrecognized rank `{0}`")]
    UnknownRank(String),
    #[error("unrecognized suit `{0}`")]
    UnknownSuit(String),
    #[error("`{0}` is not a card, expected a rank followed by a suit")]
    MalformedCard(String),
    #[error("no card available, {remaining} card(s) left in the deck")]
    NoCardAvailable { remaining: usize },
    #[error("no seat named `{0}` at the table")]
    UnknownSeat(String),
    #[error("`{0}` is not the active seat")]
    SeatNotActive(String),
    #[error("`{0}` has already finished this round")]
    SeatFinished(String),
    #[error("no round in progress")]
    NoRoundInProgress,
    #[error("more than one seat named `{0}`")]
    DuplicateSeat(String),
}
