use log::debug;
use super::{Expansion, SearchContext, SearchEngine, SearchOutcome};
use crate::config::SearchConfig;
use crate::error::SearchCancelled;
use crate::game::{GameState, Move, Score};
use crate::heuristics::{Evaluate, Heuristic};

/// Iterative-deepening alpha-beta.
///
/// Runs depth 1, 2, 3, ... until the clock runs out and answers with the move
/// of the deepest search that completed. An unfinished depth never replaces
/// that move. Deepening also stops once a completed depth reached no
/// depth-limited leaf, or at `max_depth` when one is configured.
#[derive(Clone, Debug)]
pub struct AlphaBetaEngine<E = Heuristic> {
    config: SearchConfig<E>,
}

impl<E> AlphaBetaEngine<E> {
    pub fn new(config: SearchConfig<E>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig<E> {
        &self.config
    }

    /// One alpha-beta search, `depth` plies deep, over the full window.
    pub fn alphabeta<G>(&self, state: &G, depth: u32, time_left: &dyn Fn() -> f64) -> Result<SearchOutcome, SearchCancelled>
    where
        G: GameState,
        E: Evaluate<G>,
    {
        let mut ctx = SearchContext::new(state, &self.config.evaluator, self.config.timeout_ms, time_left);
        ctx.check_time()?;
        let best = ctx.alphabeta(state, depth, f64::NEG_INFINITY, f64::INFINITY, true)?;
        Ok(ctx.outcome(best, depth))
    }

    /// Deepens until cancelled and returns the last completed search, if any.
    pub fn iterative_deepening<G>(&self, state: &G, time_left: &dyn Fn() -> f64) -> Option<SearchOutcome>
    where
        G: GameState,
        E: Evaluate<G>,
    {
        let mut completed = None;
        let mut nodes = 0;
        let mut depth = 1;
        while self.config.max_depth.map_or(true, |max| depth <= max) {
            match self.alphabeta(state, depth, time_left) {
                Ok(outcome) => {
                    nodes += outcome.nodes;
                    debug!(
                        "depth {} complete: {} (score {}, {} nodes)",
                        depth, outcome.best_move, outcome.score, outcome.nodes
                    );
                    completed = Some(outcome);
                    if outcome.exhausted {
                        debug!("game tree exhausted at depth {}", depth);
                        break;
                    }
                    depth += 1;
                }
                Err(cancelled) => {
                    debug!("depth {} abandoned: {}", depth, cancelled);
                    break;
                }
            }
        }
        debug!("iterative deepening visited {} nodes", nodes);
        completed
    }
}

impl<G: GameState, E: Evaluate<G>> SearchEngine<G> for AlphaBetaEngine<E> {
    fn get_move(&self, state: &G, time_left: &dyn Fn() -> f64) -> Move {
        let legal_moves = state.legal_moves();
        let Some(&first) = legal_moves.first() else {
            return Move::NONE;
        };

        let best_move = self
            .iterative_deepening(state, time_left)
            .map_or(first, |outcome| outcome.best_move);
        if best_move.is_none() {
            // no child beat the initial bound; never forfeit with moves left
            debug!("search settled on no move, falling back to {}", first);
            return first;
        }
        best_move
    }
}

impl<G: GameState, E: Evaluate<G>> SearchContext<'_, G, E> {
    fn alphabeta(&mut self, state: &G, depth: u32, alpha: Score, beta: Score, maximizing: bool) -> Result<(Score, Move), SearchCancelled> {
        let legal_moves = match self.enter(state, depth)? {
            Expansion::Settled(score) => return Ok((score, Move::NONE)),
            Expansion::Children(moves) => moves,
        };

        if maximizing {
            self.max_value(state, legal_moves, depth, alpha, beta)
        } else {
            self.min_value(state, legal_moves, depth, alpha, beta)
        }
    }

    fn max_value(&mut self, state: &G, legal_moves: Vec<Move>, depth: u32, mut alpha: Score, beta: Score) -> Result<(Score, Move), SearchCancelled> {
        self.check_time()?;

        let mut best = (f64::NEG_INFINITY, Move::NONE);
        for mv in legal_moves {
            let (score, _) = self.alphabeta(&state.forecast(mv), depth - 1, alpha, beta, false)?;
            if score > alpha {
                alpha = score;
                best = (score, mv);
            }
            if alpha >= beta {
                break;
            }
        }
        Ok(best)
    }

    fn min_value(&mut self, state: &G, legal_moves: Vec<Move>, depth: u32, alpha: Score, mut beta: Score) -> Result<(Score, Move), SearchCancelled> {
        self.check_time()?;

        let mut best = (f64::INFINITY, Move::NONE);
        for mv in legal_moves {
            let (score, _) = self.alphabeta(&state.forecast(mv), depth - 1, alpha, beta, true)?;
            if score < beta {
                beta = score;
                best = (score, mv);
            }
            if beta <= alpha {
                break;
            }
        }
        Ok(best)
    }
}
