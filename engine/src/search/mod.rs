//! Time-bounded move selection.
//!
//! Both engines run a plain recursive search over `GameState::forecast` and
//! poll the caller's time-remaining query at the top of every recursive call.
//! Once fewer than `timeout_ms` milliseconds remain the poll fails with
//! `SearchCancelled`, the whole call stack unwinds through `?`, and the
//! engine's `get_move` falls back to whatever it had before the search.

mod alphabeta;
mod minimax;

use std::time::{Duration, Instant};
use crate::error::SearchCancelled;
use crate::game::{GameState, Move, Score};
use crate::heuristics::Evaluate;

pub use alphabeta::AlphaBetaEngine;
pub use minimax::MinimaxEngine;

/// Picks a move for the active player of `state` before the budget runs out.
///
/// `time_left` returns the milliseconds remaining for this decision. Engines
/// never return an error: on cancellation they answer with a fallback move,
/// `Move::NONE` when they have nothing better.
pub trait SearchEngine<G: GameState> {
    fn get_move(&self, state: &G, time_left: &dyn Fn() -> f64) -> Move;
}

/// Result of one completed depth-limited search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchOutcome {
    pub best_move: Move,
    /// Backed-up root value from the searching player's point of view.
    pub score: Score,
    pub depth: u32,
    pub nodes: u64,
    /// No node was cut off by the depth limit, so the value is exact.
    pub exhausted: bool,
}

/// Time-remaining query counting down from `budget` starting now.
pub fn time_left_from(budget: Duration) -> impl Fn() -> f64 {
    let start = Instant::now();
    move || budget.as_secs_f64() * 1000.0 - start.elapsed().as_secs_f64() * 1000.0
}

/// What entering a node produced.
enum Expansion {
    /// Depth spent or game over; the node's value.
    Settled(Score),
    /// Legal moves of the active player, in enumeration order.
    Children(Vec<Move>),
}

/// Per-call search state: which player is searching, the deadline and
/// counters. Dropped when the root search returns.
struct SearchContext<'a, G: GameState, E> {
    evaluator: &'a E,
    time_left: &'a dyn Fn() -> f64,
    threshold_ms: f64,
    player: G::Player,
    nodes: u64,
    hit_depth_limit: bool,
}

impl<'a, G: GameState, E: Evaluate<G>> SearchContext<'a, G, E> {
    fn new(state: &G, evaluator: &'a E, threshold_ms: f64, time_left: &'a dyn Fn() -> f64) -> Self {
        Self {
            evaluator,
            time_left,
            threshold_ms,
            player: state.active_player(),
            nodes: 0,
            hit_depth_limit: false,
        }
    }

    fn check_time(&self) -> Result<(), SearchCancelled> {
        let remaining_ms = (self.time_left)();
        if remaining_ms < self.threshold_ms {
            return Err(SearchCancelled { remaining_ms, threshold_ms: self.threshold_ms });
        }
        Ok(())
    }

    /// Entry work shared by every node: poll the clock, then settle the node
    /// if the depth is spent or the active player cannot move.
    fn enter(&mut self, state: &G, depth: u32) -> Result<Expansion, SearchCancelled> {
        self.check_time()?;
        self.nodes += 1;

        if depth == 0 {
            self.hit_depth_limit = true;
            return Ok(Expansion::Settled(self.evaluator.evaluate(state, self.player)));
        }

        let legal_moves = state.legal_moves();
        if legal_moves.is_empty() {
            return Ok(Expansion::Settled(state.utility(self.player)));
        }
        Ok(Expansion::Children(legal_moves))
    }

    fn outcome(&self, (score, best_move): (Score, Move), depth: u32) -> SearchOutcome {
        SearchOutcome {
            best_move,
            score,
            depth,
            nodes: self.nodes,
            exhausted: !self.hit_depth_limit,
        }
    }
}
