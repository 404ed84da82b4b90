use crate::game::event::TableEvent;
use crate::game::player::{next_active_index, Seat, SeatRole, SeatStatus, SeatTransition};
use crate::game::resolution::{resolve_round, RoundSummary, SeatResult};
use crate::game::scheduler::{Scheduler, TaskHandle};
use crate::game::strategy::{BustProbabilityPolicy, Decision, HouseFloorPolicy};
use crate::TableConfig;
use blackjack_lib::{BlackjackGameError, Card, Deck};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round has been started, or the last one was aborted.
    Idle,
    InProgress,
    Resolved,
}

/// An automated decision waiting out its thinking delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDecision {
    pub seat: usize,
    pub round: u64,
}

/// Struct for a blackjack table: owns the deck and the seats, drives turn order and resolves
/// rounds. The table is the only thing that mutates seats; every change is reported through
/// the event queue.
#[derive(Debug)]
pub struct BlackjackTable {
    config: TableConfig,
    seats: Vec<Seat>,
    deck: Deck,
    rng: StdRng,
    round: u64,
    phase: RoundPhase,
    scheduler: Scheduler<PendingDecision>,
    pending: Option<TaskHandle>,
    events: Vec<TableEvent>,
    last_summary: Option<RoundSummary>,
    deck_exhausted: bool,
}

impl BlackjackTable {
    /// Seats the house, the automated opponent and the human, in that order. Fails if two of
    /// them share a name.
    pub fn new(config: TableConfig) -> Result<BlackjackTable, BlackjackGameError> {
        let seats = vec![
            Seat::house(Box::new(HouseFloorPolicy::new(
                config.house_floor,
                BustProbabilityPolicy::new(config.bust_threshold),
            ))),
            Seat::automated(
                config.opponent_name.clone(),
                Box::new(BustProbabilityPolicy::new(config.bust_threshold)),
            ),
            Seat::human(config.human_name.clone()),
        ];
        BlackjackTable::with_seats(config, seats)
    }

    /// A table with a custom seating, first seat first. Seats are addressed by name, so names
    /// must be unique.
    pub fn with_seats(
        config: TableConfig,
        seats: Vec<Seat>,
    ) -> Result<BlackjackTable, BlackjackGameError> {
        if let Some(seat) = seats
            .iter()
            .enumerate()
            .find(|(i, seat)| seats[..*i].iter().any(|other| other.name() == seat.name()))
            .map(|(_, seat)| seat)
        {
            return Err(BlackjackGameError::DuplicateSeat(seat.name().to_string()));
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let deck = Deck::build(&mut rng);
        Ok(BlackjackTable {
            config,
            seats,
            deck,
            rng,
            round: 0,
            phase: RoundPhase::Idle,
            scheduler: Scheduler::new(),
            pending: None,
            events: Vec::new(),
            last_summary: None,
            deck_exhausted: false,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, name: &str) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.name() == name)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Number of the current round, or of the last one played. Zero before the first round.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_round_in_progress(&self) -> bool {
        self.phase == RoundPhase::InProgress
    }

    pub fn active_seat(&self) -> Option<&Seat> {
        self.active_index().map(|idx| &self.seats[idx])
    }

    /// Summary of the most recently resolved round.
    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    /// Chance that the next card busts `name`, estimated from the cards left in the deck.
    pub fn bust_probability(&self, name: &str) -> Option<f64> {
        self.seat(name)
            .map(|seat| seat.bust_probability(self.deck.remaining()))
    }

    /// Whether an automated decision is waiting to fire.
    pub fn has_pending_decision(&self) -> bool {
        self.pending
            .map_or(false, |handle| self.scheduler.is_pending(handle))
    }

    /// How long until the next automated decision fires.
    pub fn time_until_next_decision(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    /// Removes and returns every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a new round with a freshly built and shuffled deck. Returns the round number.
    pub fn start_round(&mut self) -> u64 {
        let deck = Deck::build(&mut self.rng);
        self.start_round_with_deck(deck)
    }

    /// Starts a new round with the given deck, e.g. a stacked deck to replay a round.
    /// The deal goes two cards per seat in reverse seating order, then the last seat acts first.
    pub fn start_round_with_deck(&mut self, deck: Deck) -> u64 {
        if self.is_round_in_progress() {
            self.abort_round();
        }
        self.cancel_pending();
        self.scheduler.cancel_all();
        self.seats.iter_mut().for_each(Seat::reset);
        self.deck = deck;
        self.deck_exhausted = false;
        self.round += 1;
        self.phase = RoundPhase::InProgress;
        info!("round {} started", self.round);
        self.events.push(TableEvent::RoundStarted { round: self.round });

        'deal: for _ in 0..2 {
            for idx in (0..self.seats.len()).rev() {
                if !self.deal_to(idx) {
                    break 'deal;
                }
            }
        }

        if self.deck_exhausted {
            self.finish_exhausted();
        } else if let Some(last) = self.seats.len().checked_sub(1) {
            self.activate_from(last);
        } else {
            self.resolve();
        }
        self.round
    }

    /// Abandons the round in progress: pending decisions are cancelled, hands cleared and
    /// no outcome is recorded.
    pub fn abort_round(&mut self) {
        if !self.is_round_in_progress() {
            return;
        }
        warn!("round {} aborted", self.round);
        self.cancel_pending();
        self.scheduler.cancel_all();
        if let Some(idx) = self.active_index() {
            self.seats[idx].deactivate();
            let seat = self.seats[idx].name().to_string();
            self.events.push(TableEvent::SeatDeactivated { seat });
        }
        self.seats.iter_mut().for_each(Seat::reset);
        self.phase = RoundPhase::Idle;
    }

    /// Intent from the presentation layer to draw a card for `name`. Only the active seat may
    /// act, anything else is rejected without touching the table.
    pub fn request_hit(&mut self, name: &str) -> Result<SeatTransition, BlackjackGameError> {
        let idx = self.check_intent(name)?;
        debug!("{} has HIT", name);
        self.apply_hit(idx)
    }

    /// Intent from the presentation layer to stand `name`.
    pub fn request_stand(&mut self, name: &str) -> Result<SeatTransition, BlackjackGameError> {
        let idx = self.check_intent(name)?;
        debug!("{} has chosen to STAND", name);
        Ok(self.apply_stand(idx))
    }

    /// Moves the table clock forward by `elapsed`, running every automated decision that comes
    /// due in between, in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some((handle, decision)) = self.scheduler.next_due(until) {
            if self.pending == Some(handle) {
                self.pending = None;
            }
            self.run_decision(decision);
        }
        self.scheduler.settle(until);
    }

    fn active_index(&self) -> Option<usize> {
        let mut active = self
            .seats
            .iter()
            .enumerate()
            .filter(|(_, seat)| seat.is_active())
            .map(|(idx, _)| idx);
        let first = active.next();
        debug_assert!(active.next().is_none(), "more than one active seat");
        first
    }

    fn check_intent(&self, name: &str) -> Result<usize, BlackjackGameError> {
        if !self.is_round_in_progress() {
            return Err(BlackjackGameError::NoRoundInProgress);
        }
        let idx = self
            .seats
            .iter()
            .position(|seat| seat.name() == name)
            .ok_or_else(|| BlackjackGameError::UnknownSeat(name.to_string()))?;
        let seat = &self.seats[idx];
        if seat.is_finished() {
            debug!("ignoring intent for {}, already {}", name, seat.status());
            return Err(BlackjackGameError::SeatFinished(name.to_string()));
        }
        if !seat.is_active() {
            debug!("ignoring intent for {}, not their turn", name);
            return Err(BlackjackGameError::SeatNotActive(name.to_string()));
        }
        Ok(idx)
    }

    /// Deals one card to the seat at `idx`. Returns false if the deck could not supply one.
    fn deal_to(&mut self, idx: usize) -> bool {
        match self.deck.draw() {
            Some(card) => {
                let transition = self.seats[idx].receive_card(card);
                self.emit_transition(&transition);
                true
            }
            None => {
                self.exhaust();
                false
            }
        }
    }

    fn apply_hit(&mut self, idx: usize) -> Result<SeatTransition, BlackjackGameError> {
        self.cancel_pending();
        let card = match self.deck.draw() {
            Some(card) => card,
            None => {
                let remaining = self.deck.cards_remaining();
                self.exhaust();
                self.finish_exhausted();
                return Err(BlackjackGameError::NoCardAvailable { remaining });
            }
        };
        let transition = self.seats[idx].receive_card(card);
        self.emit_transition(&transition);
        if transition.is_terminal() {
            self.finish_turn(idx);
        } else if self.seats[idx].is_automated() {
            self.schedule_decision(idx);
        }
        Ok(transition)
    }

    fn apply_stand(&mut self, idx: usize) -> SeatTransition {
        self.cancel_pending();
        let transition = self.seats[idx].stand();
        self.emit_transition(&transition);
        self.finish_turn(idx);
        transition
    }

    fn run_decision(&mut self, pending: PendingDecision) {
        let PendingDecision { seat: idx, round } = pending;
        if round != self.round || !self.is_round_in_progress() || !self.seats[idx].is_active() {
            debug!("dropping stale decision for seat {} of round {}", idx, round);
            return;
        }
        let seat = &self.seats[idx];
        let remaining = self.deck.remaining();
        debug!(
            "{} [{}] total: {}, bust %: {:.1}",
            seat.name(),
            seat.policy_label().unwrap_or_default(),
            seat.total(),
            seat.bust_probability(remaining) * 100.0
        );
        match seat.decide(remaining) {
            Some(Decision::Hit) => {
                // Exhaustion resolves the round and is already reported as an event.
                let _ = self.apply_hit(idx);
            }
            Some(Decision::Stand) => {
                self.apply_stand(idx);
            }
            None => {}
        }
    }

    fn schedule_decision(&mut self, idx: usize) {
        let pending = PendingDecision {
            seat: idx,
            round: self.round,
        };
        self.pending = Some(self.scheduler.schedule(self.config.thinking_delay(), pending));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if self.scheduler.cancel(handle) {
                debug!("cancelled pending decision");
            }
        }
    }

    /// Activates the first unfinished seat walking back from `start`, or resolves the round.
    fn activate_from(&mut self, start: usize) {
        match next_active_index(&self.seats, start) {
            Some(idx) => {
                self.seats[idx].activate();
                let seat = &self.seats[idx];
                debug!("{} is up with {}", seat.name(), seat.total());
                self.events.push(TableEvent::SeatActivated {
                    seat: seat.name().to_string(),
                });
                if seat.is_automated() {
                    self.schedule_decision(idx);
                }
            }
            None => self.resolve(),
        }
    }

    fn finish_turn(&mut self, idx: usize) {
        self.events.push(TableEvent::SeatDeactivated {
            seat: self.seats[idx].name().to_string(),
        });
        self.activate_from(idx);
    }

    fn exhaust(&mut self) {
        let remaining = self.deck.cards_remaining();
        warn!(
            "deck exhausted in round {} with {} card(s) left",
            self.round, remaining
        );
        self.deck_exhausted = true;
        self.events.push(TableEvent::DeckExhausted { remaining });
    }

    /// The round cannot go on without cards: every unfinished seat stands on what it holds.
    fn finish_exhausted(&mut self) {
        self.cancel_pending();
        self.scheduler.cancel_all();
        for idx in 0..self.seats.len() {
            if self.seats[idx].is_finished() {
                continue;
            }
            let was_active = self.seats[idx].is_active();
            let transition = self.seats[idx].stand();
            self.emit_transition(&transition);
            if was_active {
                self.events.push(TableEvent::SeatDeactivated {
                    seat: transition.seat,
                });
            }
        }
        self.resolve();
    }

    fn resolve(&mut self) {
        self.cancel_pending();
        self.scheduler.cancel_all();
        info!("determining the winner of round {}", self.round);
        let outcome = resolve_round(&self.seats);
        info!("round {}: {}", self.round, outcome);
        let summary = RoundSummary {
            round: self.round,
            outcome: outcome.clone(),
            seats: self.seats.iter().map(SeatResult::from).collect(),
            deck_exhausted: self.deck_exhausted,
        };
        self.events.push(TableEvent::RoundResolved {
            round: self.round,
            outcome,
        });
        self.seats.iter_mut().for_each(Seat::reset);
        self.phase = RoundPhase::Resolved;
        self.last_summary = Some(summary);
    }

    fn emit_transition(&mut self, transition: &SeatTransition) {
        let seat = transition.seat.clone();
        if let Some(card) = transition.card {
            debug!("{} drew {}, total {}", seat, card, transition.total);
            self.events.push(TableEvent::CardDealt {
                seat: seat.clone(),
                card,
            });
            self.events.push(TableEvent::TotalChanged {
                seat: seat.clone(),
                total: transition.total,
            });
        }
        match transition.status {
            SeatStatus::Natural21 => {
                debug!("{} has blackjack", seat);
                self.events.push(TableEvent::Natural21 { seat });
            }
            SeatStatus::Stood => {
                debug!("{} STOOD on {}", seat, transition.total);
                self.events.push(TableEvent::SeatStood {
                    seat,
                    total: transition.total,
                });
            }
            SeatStatus::Busted => {
                debug!("{} BUSTED with {}", seat, transition.total);
                self.events.push(TableEvent::SeatBusted {
                    seat,
                    total: transition.total,
                });
            }
            SeatStatus::Waiting | SeatStatus::Active => {}
        }
    }

    /// A serializable picture of the table for adapters.
    pub fn snapshot(&self) -> TableSnapshot {
        let remaining = self.deck.remaining();
        TableSnapshot {
            round: self.round,
            phase: self.phase,
            active_seat: self.active_seat().map(|seat| seat.name().to_string()),
            cards_remaining: self.deck.cards_remaining(),
            seats: self
                .seats
                .iter()
                .map(|seat| SeatSnapshot {
                    name: seat.name().to_string(),
                    role: seat.role(),
                    cards: seat.cards().to_vec(),
                    total: seat.total(),
                    status: seat.status(),
                    bust_probability: seat
                        .is_automated()
                        .then(|| seat.bust_probability(remaining)),
                })
                .collect(),
            last_round: self.last_summary.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatSnapshot {
    pub name: String,
    pub role: SeatRole,
    pub cards: Vec<Card>,
    pub total: u8,
    pub status: SeatStatus,
    /// Only reported for automated seats.
    pub bust_probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub round: u64,
    pub phase: RoundPhase,
    pub active_seat: Option<String>,
    pub cards_remaining: usize,
    pub seats: Vec<SeatSnapshot>,
    pub last_round: Option<RoundSummary>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::player::HOUSE_NAME;
    use crate::game::resolution::RoundOutcome;
    use blackjack_lib::{Rank, Suit};

    const SECOND: Duration = Duration::from_secs(1);

    fn stacked(ranks: &[Rank]) -> Deck {
        Deck::from_cards(ranks.iter().map(|r| Card::new(*r, Suit::Clubs)).collect())
    }

    // Dealt back to front: Me 10 8, Adam 10 9, House 10 6, then K 2 3 left over.
    fn standard_deck() -> Deck {
        stacked(&[
            Rank::Ten,
            Rank::Ten,
            Rank::Ten,
            Rank::Eight,
            Rank::Nine,
            Rank::Six,
            Rank::King,
            Rank::Two,
            Rank::Three,
        ])
    }

    fn table() -> BlackjackTable {
        BlackjackTable::new(TableConfig::new().seed(7).build()).unwrap()
    }

    fn cards_dealt(events: &[TableEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TableEvent::CardDealt { .. }))
            .count()
    }

    #[test]
    fn test_deal_and_first_turn() {
        let mut table = table();
        assert_eq!(table.start_round_with_deck(standard_deck()), 1);
        assert_eq!(table.phase(), RoundPhase::InProgress);
        assert_eq!(table.seat("Me").map(Seat::total), Some(18));
        assert_eq!(table.seat("Adam").map(Seat::total), Some(19));
        assert_eq!(table.seat("House").map(Seat::total), Some(16));
        assert_eq!(table.active_seat().map(Seat::name), Some("Me"));
        assert_eq!(table.deck().cards_remaining(), 3);
        assert!(!table.has_pending_decision());

        let events = table.drain_events();
        assert_eq!(events[0], TableEvent::RoundStarted { round: 1 });
        assert_eq!(cards_dealt(&events), 6);
        assert_eq!(
            events.last(),
            Some(&TableEvent::SeatActivated {
                seat: "Me".to_string()
            })
        );
        assert!(table.drain_events().is_empty());
    }

    #[test]
    fn test_full_round_dealer_busts() {
        let mut table = table();
        table.start_round_with_deck(standard_deck());
        table.request_stand("Me").unwrap();
        assert_eq!(table.active_seat().map(Seat::name), Some("Adam"));
        assert_eq!(table.time_until_next_decision(), Some(SECOND));

        table.advance(SECOND - Duration::from_millis(1));
        assert_eq!(table.active_seat().map(Seat::name), Some("Adam"));

        // Adam holds 19 with two of three cards busting, the house hits 16 and draws the king.
        table.advance(2 * SECOND);
        assert_eq!(table.phase(), RoundPhase::Resolved);
        let summary = table.last_summary().unwrap();
        assert_eq!(
            summary.outcome,
            RoundOutcome::Winner {
                seat: "Adam".to_string(),
                total: 19,
                natural: false
            }
        );
        assert!(!summary.deck_exhausted);
        let house = summary.seats.iter().find(|s| s.name == "House").unwrap();
        assert_eq!((house.total, house.status), (26, SeatStatus::Busted));

        assert!(table.seats().iter().all(|s| s.hand().is_empty()));
        assert!(table
            .seats()
            .iter()
            .all(|s| s.status() == SeatStatus::Waiting));
        assert!(table.drain_events().contains(&TableEvent::SeatBusted {
            seat: "House".to_string(),
            total: 26
        }));
    }

    #[test]
    fn test_rejected_intents() {
        let mut table = table();
        assert_eq!(
            table.request_hit("Me"),
            Err(BlackjackGameError::NoRoundInProgress)
        );
        table.start_round_with_deck(standard_deck());
        assert_eq!(
            table.request_hit("House"),
            Err(BlackjackGameError::SeatNotActive("House".to_string()))
        );
        assert_eq!(
            table.request_stand("Nobody"),
            Err(BlackjackGameError::UnknownSeat("Nobody".to_string()))
        );
        table.request_stand("Me").unwrap();
        assert_eq!(
            table.request_hit("Me"),
            Err(BlackjackGameError::SeatFinished("Me".to_string()))
        );
        assert_eq!(table.seat("Me").map(Seat::total), Some(18));
    }

    #[test]
    fn test_intent_cancels_pending_decision() {
        let mut table = table();
        table.start_round_with_deck(standard_deck());
        table.request_stand("Me").unwrap();
        assert!(table.has_pending_decision());
        table.drain_events();

        table.request_stand("Adam").unwrap();
        assert_eq!(table.active_seat().map(Seat::name), Some("House"));
        table.advance(5 * SECOND);

        let events = table.drain_events();
        assert_eq!(cards_dealt(&events), 1);
        assert_eq!(
            table.last_summary().and_then(|s| s.outcome.winner()),
            Some("Adam")
        );
    }

    #[test]
    fn test_human_hit_keeps_turn() {
        let mut table = table();
        table.start_round_with_deck(stacked(&[
            Rank::Five,
            Rank::Ten,
            Rank::Ten,
            Rank::Four,
            Rank::Nine,
            Rank::Six,
            Rank::Two,
            Rank::Three,
            Rank::Four,
        ]));
        let t = table.request_hit("Me").unwrap();
        assert_eq!(t.card, Some(Card::new(Rank::Two, Suit::Clubs)));
        assert_eq!((t.total, t.status), (11, SeatStatus::Active));
        assert_eq!(table.active_seat().map(Seat::name), Some("Me"));
        assert!(!table.has_pending_decision());
    }

    #[test]
    fn test_natural_skips_turn_and_house_is_consulted_again() {
        let mut table = table();
        table.start_round_with_deck(stacked(&[
            Rank::Ace,
            Rank::Ten,
            Rank::Ten,
            Rank::King,
            Rank::Nine,
            Rank::Six,
            Rank::Two,
            Rank::Three,
            Rank::Four,
        ]));
        assert_eq!(
            table.seat("Me").map(Seat::status),
            Some(SeatStatus::Natural21)
        );
        assert_eq!(table.active_seat().map(Seat::name), Some("Adam"));

        table.advance(2 * SECOND);
        // The house hit 16 into 18 and still owns the turn.
        assert_eq!(table.active_seat().map(Seat::name), Some("House"));
        assert_eq!(table.seat("House").map(Seat::total), Some(18));
        assert_eq!(table.time_until_next_decision(), Some(SECOND));

        table.advance(SECOND);
        let summary = table.last_summary().unwrap();
        assert_eq!(summary.outcome.winner(), Some("Me"));
        assert_eq!(summary.outcome.to_string(), "Me wins with blackjack");
    }

    #[test]
    fn test_deck_exhaustion_stands_everyone() {
        let mut table = table();
        table.start_round_with_deck(stacked(&[
            Rank::Ten,
            Rank::Ten,
            Rank::Ten,
            Rank::Eight,
            Rank::Nine,
            Rank::Six,
            Rank::Five,
        ]));
        assert_eq!(
            table.request_hit("Me"),
            Err(BlackjackGameError::NoCardAvailable { remaining: 1 })
        );
        assert_eq!(table.phase(), RoundPhase::Resolved);
        assert_eq!(table.time_until_next_decision(), None);
        let summary = table.last_summary().unwrap();
        assert!(summary.deck_exhausted);
        assert_eq!(summary.outcome.winner(), Some("Adam"));
        assert!(summary
            .seats
            .iter()
            .all(|s| s.status == SeatStatus::Stood));
        assert!(table
            .drain_events()
            .contains(&TableEvent::DeckExhausted { remaining: 1 }));
    }

    #[test]
    fn test_short_deck_during_deal() {
        let mut table = table();
        table.start_round_with_deck(stacked(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five]));
        assert_eq!(table.phase(), RoundPhase::Resolved);
        let summary = table.last_summary().unwrap();
        assert!(summary.deck_exhausted);
        // One card each before the deck ran dry: Me 2, Adam 3, House 4.
        assert_eq!(summary.outcome.winner(), Some("House"));
        assert_eq!(table.round(), 1);
    }

    #[test]
    fn test_abort_round() {
        let mut table = table();
        table.start_round_with_deck(standard_deck());
        table.request_stand("Me").unwrap();
        table.abort_round();
        assert_eq!(table.phase(), RoundPhase::Idle);
        assert_eq!(table.time_until_next_decision(), None);
        assert!(table.active_seat().is_none());
        assert!(table.seats().iter().all(|s| s.hand().is_empty()));
        assert!(table.last_summary().is_none());

        table.advance(5 * SECOND);
        assert_eq!(table.phase(), RoundPhase::Idle);
        assert_eq!(table.start_round_with_deck(standard_deck()), 2);
    }

    #[test]
    fn test_seeded_tables_match() {
        let mut first = table();
        let mut second = table();
        first.start_round();
        second.start_round();
        assert_eq!(first.snapshot(), second.snapshot());
        assert_eq!(first.deck().cards_remaining(), 46);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut table = table();
        table.start_round_with_deck(standard_deck());
        let snapshot = table.snapshot();
        assert_eq!(snapshot.active_seat.as_deref(), Some("Me"));
        assert_eq!(snapshot.seats[2].bust_probability, None);
        let adam = snapshot.seats[1].bust_probability.unwrap();
        assert!((adam - 2.0 / 3.0).abs() < 1e-9);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "in_progress");
        assert_eq!(json["cards_remaining"], 3);
        assert_eq!(table.bust_probability("Nobody"), None);
    }

    #[test]
    fn test_duplicate_seat_names_rejected() {
        let config = TableConfig::new().human_name("Adam").build();
        assert_eq!(
            BlackjackTable::new(config).err(),
            Some(BlackjackGameError::DuplicateSeat("Adam".to_string()))
        );
        let config = TableConfig::new().opponent_name(HOUSE_NAME).build();
        assert_eq!(
            BlackjackTable::new(config).err(),
            Some(BlackjackGameError::DuplicateSeat("House".to_string()))
        );
        let seats = vec![Seat::human("Me"), Seat::human("Eve"), Seat::human("Me")];
        assert!(BlackjackTable::with_seats(TableConfig::default(), seats).is_err());
    }

    #[test]
    fn test_seats_carry_configured_policies() {
        let table = BlackjackTable::new(TableConfig::new().bust_threshold(0.25).build()).unwrap();
        assert_eq!(
            table.seat("House").and_then(Seat::policy_label).as_deref(),
            Some("stand on 17, otherwise bust probability < 0.25")
        );
        assert_eq!(
            table.seat("Adam").and_then(Seat::policy_label).as_deref(),
            Some("bust probability < 0.25")
        );
        assert_eq!(table.seat("Me").and_then(Seat::policy_label), None);
    }
}
