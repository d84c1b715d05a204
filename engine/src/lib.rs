//! Time-bounded adversarial search for Isolation-style games.
//!
//! The engines only see a game through the [`GameState`] trait; the
//! [`isolation`] module provides the knight-move board they are usually run
//! against.

pub mod config;
pub mod error;
pub mod game;
pub mod heuristics;
pub mod isolation;
pub mod search;

pub use config::SearchConfig;
pub use error::{Error, Result, SearchCancelled};
pub use game::{GameState, Move, Score};
pub use heuristics::{Evaluate, Heuristic, ScoreFn};
pub use search::{time_left_from, AlphaBetaEngine, MinimaxEngine, SearchEngine, SearchOutcome};
