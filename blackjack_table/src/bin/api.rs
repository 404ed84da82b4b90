use actix_web::{
    body::BoxBody,
    error, get,
    http::{header::ContentType, StatusCode},
    post, web, App, HttpResponse, HttpServer,
};
use blackjack_table::prelude::*;
use clap::Parser;
use log::{info, warn};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

/// Serve a blackjack table over HTTP.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    address: String,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Seed for shuffling, used until a round is started with its own config
    #[arg(long)]
    seed: Option<u64>,
}

/// An enum that will handle user facing errors
#[derive(Debug)]
enum UserError {
    InternalError,
    BadInput(String),
    Game(BlackjackGameError),
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserError::InternalError => write!(f, "an internal error occured"),
            UserError::BadInput(s) => write!(f, "{}", s),
            UserError::Game(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UserError {}

impl From<BlackjackGameError> for UserError {
    fn from(value: BlackjackGameError) -> Self {
        UserError::Game(value)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .json(ErrorBody {
                error: self.to_string(),
            })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            UserError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::BadInput(_) => StatusCode::BAD_REQUEST,
            UserError::Game(BlackjackGameError::UnknownSeat(_)) => StatusCode::NOT_FOUND,
            UserError::Game(
                BlackjackGameError::SeatNotActive(_)
                | BlackjackGameError::SeatFinished(_)
                | BlackjackGameError::NoRoundInProgress
                | BlackjackGameError::NoCardAvailable { .. },
            ) => StatusCode::CONFLICT,
            UserError::Game(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Events kept for `/events` before the oldest are dropped.
const MAX_BUFFERED_EVENTS: usize = 1024;

/// The table plus the wall clock it is kept in step with. Events are buffered until a client
/// collects them from `/events`.
struct Session {
    table: BlackjackTable,
    last_seen: Instant,
    events: VecDeque<TableEvent>,
}

impl Session {
    fn new(config: TableConfig) -> Result<Session, BlackjackGameError> {
        Ok(Session {
            table: BlackjackTable::new(config)?,
            last_seen: Instant::now(),
            events: VecDeque::new(),
        })
    }

    /// Runs every automated decision that came due since the last request.
    fn catch_up(&mut self) {
        let now = Instant::now();
        self.table.advance(now.duration_since(self.last_seen));
        self.last_seen = now;
        self.collect_events();
    }

    fn collect_events(&mut self) {
        let drained = self.table.drain_events();
        self.buffer(drained);
    }

    fn buffer<T: IntoIterator<Item = TableEvent>>(&mut self, new_events: T) {
        self.events.extend(new_events);
        let overflow = self.events.len().saturating_sub(MAX_BUFFERED_EVENTS);
        if overflow > 0 {
            warn!("dropping {} unread event(s)", overflow);
            self.events.drain(..overflow);
        }
    }
}

/// An empty body keeps the current seating, anything else must be a `TableConfig`.
fn parse_config(body: &[u8]) -> Result<Option<TableConfig>, UserError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| UserError::BadInput(format!("invalid table config: {}", e)))
}

type AppSession = web::Data<Mutex<Session>>;

#[derive(Serialize)]
struct IntentResponse {
    transition: SeatTransition,
    table: TableSnapshot,
}

/// A handler that starts a new round. The body may carry a `TableConfig` to reseat the table.
#[post("/round")]
async fn start_round(
    body: web::Bytes,
    app_session: AppSession,
) -> Result<HttpResponse, UserError> {
    let config = parse_config(&body)?;
    let mut session = app_session.lock().map_err(|_| UserError::InternalError)?;
    session.catch_up();
    if let Some(config) = config {
        info!("reseating the table");
        session.table = BlackjackTable::new(config)?;
    }
    let round = session.table.start_round();
    session.collect_events();
    info!("started round {}", round);
    Ok(HttpResponse::Ok().json(session.table.snapshot()))
}

#[post("/seats/{name}/hit")]
async fn hit(
    name: web::Path<String>,
    app_session: AppSession,
) -> Result<HttpResponse, UserError> {
    let mut session = app_session.lock().map_err(|_| UserError::InternalError)?;
    session.catch_up();
    let result = session.table.request_hit(&name);
    // Running out of cards still closes the round, keep its events either way.
    session.collect_events();
    let transition = result?;
    Ok(HttpResponse::Ok().json(IntentResponse {
        transition,
        table: session.table.snapshot(),
    }))
}

#[post("/seats/{name}/stand")]
async fn stand(
    name: web::Path<String>,
    app_session: AppSession,
) -> Result<HttpResponse, UserError> {
    let mut session = app_session.lock().map_err(|_| UserError::InternalError)?;
    session.catch_up();
    let transition = session.table.request_stand(&name)?;
    session.collect_events();
    Ok(HttpResponse::Ok().json(IntentResponse {
        transition,
        table: session.table.snapshot(),
    }))
}

#[get("/state")]
async fn state(app_session: AppSession) -> Result<HttpResponse, UserError> {
    let mut session = app_session.lock().map_err(|_| UserError::InternalError)?;
    session.catch_up();
    Ok(HttpResponse::Ok().json(session.table.snapshot()))
}

/// A handler that hands out every event buffered since the last call.
#[get("/events")]
async fn events(app_session: AppSession) -> Result<HttpResponse, UserError> {
    let mut session = app_session.lock().map_err(|_| UserError::InternalError)?;
    session.catch_up();
    let pending: Vec<TableEvent> = session.events.drain(..).collect();
    Ok(HttpResponse::Ok().json(pending))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = TableConfig::default();
    config.seed = args.seed;

    info!("listening at {}:{}...", args.address, args.port);
    let session = Session::new(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app_session: AppSession = web::Data::new(Mutex::new(session));

    HttpServer::new(move || {
        App::new()
            .app_data(app_session.clone())
            .service(start_round)
            .service(hit)
            .service(stand)
            .service(state)
            .service(events)
    })
    .bind((args.address, args.port))?
    .run()
    .await
}
