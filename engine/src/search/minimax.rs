use std::cmp::Ordering;
use log::debug;
use super::{Expansion, SearchContext, SearchEngine, SearchOutcome};
use crate::config::SearchConfig;
use crate::error::SearchCancelled;
use crate::game::{GameState, Move, Score};
use crate::heuristics::{Evaluate, Heuristic};

/// Fixed-depth minimax.
///
/// There is no intermediate checkpoint: if the clock runs out before the
/// configured depth completes, all work is dropped and `get_move` answers
/// `Move::NONE`.
#[derive(Clone, Debug)]
pub struct MinimaxEngine<E = Heuristic> {
    config: SearchConfig<E>,
}

impl<E> MinimaxEngine<E> {
    pub fn new(config: SearchConfig<E>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig<E> {
        &self.config
    }

    /// Searches `depth` plies below `state` for its active player.
    pub fn minimax<G>(&self, state: &G, depth: u32, time_left: &dyn Fn() -> f64) -> Result<SearchOutcome, SearchCancelled>
    where
        G: GameState,
        E: Evaluate<G>,
    {
        let mut ctx = SearchContext::new(state, &self.config.evaluator, self.config.timeout_ms, time_left);
        ctx.check_time()?;
        let best = ctx.minimax(state, depth, true)?;
        Ok(ctx.outcome(best, depth))
    }
}

impl<G: GameState, E: Evaluate<G>> SearchEngine<G> for MinimaxEngine<E> {
    fn get_move(&self, state: &G, time_left: &dyn Fn() -> f64) -> Move {
        match self.minimax(state, self.config.search_depth, time_left) {
            Ok(outcome) => {
                debug!(
                    "minimax depth {} chose {} (score {}, {} nodes)",
                    outcome.depth, outcome.best_move, outcome.score, outcome.nodes
                );
                outcome.best_move
            }
            Err(cancelled) => {
                debug!("minimax abandoned: {}", cancelled);
                Move::NONE
            }
        }
    }
}

// (score, move) pairs order by score, then by move
fn compare(a: &(Score, Move), b: &(Score, Move)) -> Ordering {
    a.0.partial_cmp(&b.0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.cmp(&b.1))
}

impl<G: GameState, E: Evaluate<G>> SearchContext<'_, G, E> {
    fn minimax(&mut self, state: &G, depth: u32, maximizing: bool) -> Result<(Score, Move), SearchCancelled> {
        let legal_moves = match self.enter(state, depth)? {
            Expansion::Settled(score) => return Ok((score, Move::NONE)),
            Expansion::Children(moves) => moves,
        };

        let (seed, wanted) = if maximizing {
            (f64::NEG_INFINITY, Ordering::Greater)
        } else {
            (f64::INFINITY, Ordering::Less)
        };
        let mut best = (seed, Move::NONE);
        for mv in legal_moves {
            let (score, _) = self.minimax(&state.forecast(mv), depth - 1, !maximizing)?;
            if compare(&(score, mv), &best) == wanted {
                best = (score, mv);
            }
        }
        Ok(best)
    }
}
