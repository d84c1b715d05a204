use std::sync::Arc;
use std::time::Duration;
use clap::{Parser, ValueEnum};
use log::{info, error, LevelFilter};
use simple_logger::SimpleLogger;
use tokio::net::{TcpListener, TcpStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::protocol::Message;
use isolation_engine::isolation::{Board, Player};
use isolation_engine::{
    time_left_from, AlphaBetaEngine, Error, GameState, Heuristic, MinimaxEngine, Move, Result,
    SearchConfig, SearchEngine,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EngineKind {
    Minimax,
    Alphabeta,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "localhost")]
    host: String,
    #[arg(long, default_value_t = 999)]
    port: u16,
    #[arg(long, value_enum, default_value_t = EngineKind::Alphabeta)]
    engine: EngineKind,
    #[arg(long, value_enum, default_value_t = Heuristic::LookAhead)]
    heuristic: Heuristic,
    /// Plies searched by the minimax engine.
    #[arg(long, default_value_t = 3)]
    depth: u32,
    /// Stop searching once fewer than this many ms remain.
    #[arg(long, default_value_t = 10.0)]
    timeout_ms: f64,
    /// Time budget per engine move.
    #[arg(long, default_value_t = 1000)]
    move_time_ms: u64,
    #[arg(long, default_value_t = 7)]
    width: usize,
    #[arg(long, default_value_t = 7)]
    height: usize,
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

type SharedEngine = Arc<dyn SearchEngine<Board> + Send + Sync>;

/// Everything a connection needs to set up and play its own game.
#[derive(Clone)]
struct Settings {
    engine: SharedEngine,
    move_time: Duration,
    width: usize,
    height: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new().with_level(args.log_level).init()?;

    let config = SearchConfig::new(args.depth, args.heuristic, args.timeout_ms)?;
    let engine: SharedEngine = match args.engine {
        EngineKind::Minimax => Arc::new(MinimaxEngine::new(config)),
        EngineKind::Alphabeta => Arc::new(AlphaBetaEngine::new(config)),
    };
    // fail on bad dimensions before accepting anyone
    Board::new(args.width, args.height)?;
    let settings = Settings {
        engine,
        move_time: Duration::from_millis(args.move_time_ms),
        width: args.width,
        height: args.height,
    };

    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Listening on: {} ({:?} engine, {:?} heuristic)", address, args.engine, args.heuristic);

    while let Ok((stream, _)) = listener.accept().await {
        let settings = settings.clone();
        tokio::spawn(async move {
            if let Err(e) = accept_connection(stream, settings).await {
                error!("Connection failed: {}", e);
            }
        });
    }

    Ok(())
}

struct Game {
    started: bool,
    client: Player,
    board: Board,
}

impl Game {
    fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            started: false,
            client: Player::One,
            board: Board::new(settings.width, settings.height)?,
        })
    }
}

async fn accept_connection(stream: TcpStream, settings: Settings) -> Result<()> {
    let addr = stream.peer_addr()?;
    info!("Peer address: {}", addr);

    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection: {}", addr);

    let (mut write, mut read) = ws_stream.split();
    let mut game = Game::new(&settings)?;

    while let Some(raw_message) = read.next().await {
        let text_message = match raw_message {
            Ok(message) => message,
            Err(e) => {
                error!("Error reading websocket message: {}", e);
                continue;
            }
        };
        if !text_message.is_text() && !text_message.is_binary() { continue; }

        let response = match serde_json::from_slice::<Value>(&text_message.into_data()) {
            Ok(data) => {
                info!("Received: {}", data);
                match handle_message(&mut game, &settings, data).await {
                    Ok(resp) => resp,
                    Err(e) => {
                        error!("Error handling message: {}", e);
                        json!({ "error": e.to_string() })
                    }
                }
            }
            Err(e) => {
                error!("Error parsing JSON: {}", e);
                json!({ "error": e.to_string() })
            }
        };
        let response_str = response.to_string();
        write.send(Message::text(response_str.clone())).await?;
        info!("Sent: {}", response_str);
    }

    info!("Connection closed: {}", addr);
    Ok(())
}

async fn handle_message(game: &mut Game, settings: &Settings, data: Value) -> Result<Value> {
    let map = data.as_object()
        .ok_or_else(|| Error::Protocol("expected a JSON object".to_string()))?;

    // client message protocol: "start", "move"
    // server message protocol: "move", "legal_moves", "error", "end"
    if map.contains_key("start") {
        let client_first = data["start"].as_bool()
            .ok_or_else(|| Error::Protocol("expected boolean field: start".to_string()))?;
        handle_start(game, settings, client_first).await
    } else if map.contains_key("move") {
        if !game.started {
            return Err(Error::NotStarted);
        }
        let maybe_move: Option<Move> = serde_json::from_value(data["move"].clone())?;
        handle_move(game, settings, maybe_move).await
    } else {
        Err(Error::Protocol(data.to_string()))
    }
}

async fn handle_start(game: &mut Game, settings: &Settings, client_first: bool) -> Result<Value> {
    *game = Game::new(settings)?;
    game.started = true;
    if client_first {
        game.client = Player::One;
        Ok(json!({ "legal_moves": game.board.legal_moves() }))
    } else {
        game.client = Player::Two;
        make_engine_move(game, settings).await
    }
}

async fn handle_move(game: &mut Game, settings: &Settings, maybe_move: Option<Move>) -> Result<Value> {
    if game.board.active_player() != game.client {
        return Err(Error::Protocol("not your turn".to_string()));
    }
    let Some(mv) = maybe_move else {
        info!("Client forfeits");
        game.started = false;
        return Ok(json!({ "end": false }));
    };
    game.board = game.board.make_move(mv)?;
    match check_game_over(game) {
        Some(game_over) => Ok(game_over),
        None => make_engine_move(game, settings).await,
    }
}

async fn make_engine_move(game: &mut Game, settings: &Settings) -> Result<Value> {
    let engine = Arc::clone(&settings.engine);
    let board = game.board.clone();
    let budget = settings.move_time;
    let selected_move = tokio::task::spawn_blocking(move || {
        let time_left = time_left_from(budget);
        engine.get_move(&board, &time_left)
    }).await?;

    if selected_move.is_none() {
        info!("Engine found no move and forfeits");
        game.started = false;
        return Ok(json!({ "end": true }));
    }
    game.board = game.board.make_move(selected_move)?;
    match check_game_over(game) {
        Some(game_over) => Ok(game_over),
        None => Ok(json!({ "move": selected_move, "legal_moves": game.board.legal_moves() })),
    }
}

fn check_game_over(game: &mut Game) -> Option<Value> {
    let client_won = if game.board.is_winner(game.client) {
        true
    } else if game.board.is_loser(game.client) {
        false
    } else {
        return None;
    };
    game.started = false;
    info!("Game over after {} moves:\n{}", game.board.move_count(), game.board);
    Some(json!({ "end": client_won }))
}
