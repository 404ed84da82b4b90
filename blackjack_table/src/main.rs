use blackjack_table::prelude::*;
use blackjack_table::write::{write_summary, write_summary_json};
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, StdinLock, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Play blackjack at the terminal against the house and an automated opponent.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of rounds to play
    #[arg(short, long, default_value_t = 1)]
    rounds: u32,

    /// Seed for shuffling, rounds replay exactly with the same seed
    #[arg(long)]
    seed: Option<u64>,

    /// How long the automated seats think before each decision
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Automated seats hit while the chance of busting is below this
    #[arg(long, default_value_t = DEFAULT_BUST_THRESHOLD)]
    bust_threshold: f64,

    /// Name of the automated opponent
    #[arg(long, default_value = "Adam")]
    opponent: String,

    /// Your name at the table
    #[arg(short, long, default_value = "Me")]
    name: String,

    /// Stacked deck for the first round, front first, e.g. "10H,8S,AD"
    #[arg(long, value_delimiter = ',')]
    deck: Vec<Card>,

    /// Write the session summary to this file, as JSON if it ends in `.json`
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// Reads intents from stdin, one per line.
struct StdinInput {
    lines: io::Lines<StdinLock<'static>>,
}

impl StdinInput {
    fn new() -> StdinInput {
        StdinInput {
            lines: io::stdin().lock().lines(),
        }
    }
}

impl HumanInput for StdinInput {
    fn next_intent(&mut self, table: &BlackjackTable, seat: &Seat) -> Intent {
        for other in table.seats() {
            println!("  {}", other);
        }
        let bust = table.bust_probability(seat.name()).unwrap_or(0.0);
        loop {
            print!(
                "{}, you have {} ({:.0}% to bust). [h]it, [s]tand or [q]uit? ",
                seat.name(),
                seat.total(),
                bust * 100.0
            );
            let _ = io::stdout().flush();
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    eprintln!("error: {e}");
                    return Intent::Quit;
                }
                None => return Intent::Quit,
            };
            match line.trim().to_lowercase().as_str() {
                "h" | "hit" => return Intent::Hit,
                "s" | "stand" => return Intent::Stand,
                "q" | "quit" => return Intent::Quit,
                other => println!("`{}` is not an option", other),
            }
        }
    }
}

/// Prints table events as they happen.
struct TerminalSink;

impl EventSink for TerminalSink {
    fn notify(&mut self, event: &TableEvent) {
        match event {
            TableEvent::RoundStarted { round } => {
                println!("{:-^60}", format!(" round {} ", round))
            }
            TableEvent::CardDealt { seat, card } => println!("{} draws {}", seat, card),
            TableEvent::TotalChanged { seat, total } => println!("{} total: {}", seat, total),
            TableEvent::SeatActivated { seat } => println!("{} to play", seat),
            TableEvent::SeatDeactivated { .. } => {}
            TableEvent::SeatStood { seat, total } => println!("{} STOOD on {}", seat, total),
            TableEvent::SeatBusted { seat, total } => println!("{} BUSTED with {}", seat, total),
            TableEvent::Natural21 { seat } => println!("{} has blackjack!", seat),
            TableEvent::DeckExhausted { remaining } => {
                println!("the deck ran out with {} card(s) left", remaining)
            }
            TableEvent::RoundResolved { outcome, .. } => println!("{}", outcome),
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut builder = TableConfig::new();
    builder
        .thinking_delay(Duration::from_millis(args.delay_ms))
        .bust_threshold(args.bust_threshold)
        .opponent_name(args.opponent)
        .human_name(args.name);
    if let Some(seed) = args.seed {
        builder.seed(seed);
    }
    let config = builder.build();

    let mut game = BlackjackGame::new(config, StdinInput::new(), TerminalSink, Pacing::RealTime)?;
    let mut rounds = args.rounds;
    if !args.deck.is_empty() && rounds > 0 {
        rounds -= 1;
        game.run_round_with_deck(Deck::from_cards(args.deck));
    }
    let stats = game.run(rounds);

    write_summary(stats, io::stdout().lock())?;
    if let Some(path) = args.summary {
        let writer = BufWriter::new(File::create(&path)?);
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => write_summary_json(stats, writer)?,
            _ => write_summary(stats, writer)?,
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
