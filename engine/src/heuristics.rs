//! Heuristic evaluation of non-terminal states.
//!
//! Every built-in heuristic resolves terminal states first: a confirmed loser
//! scores `-inf`, a confirmed winner `+inf`. Only then are board features
//! looked at.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use crate::game::{GameState, Move, Score};

/// Scores `state` from the point of view of `player`.
pub trait Evaluate<G: GameState> {
    fn evaluate(&self, state: &G, player: G::Player) -> Score;
}

/// The built-in heuristics, selectable by configuration.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Mobility difference including one ply of look-ahead.
    #[default]
    LookAhead,
    /// Mobility difference plus distance from the opponent.
    Flee,
    /// Closeness to the opponent.
    Chase,
}

impl<G: GameState> Evaluate<G> for Heuristic {
    fn evaluate(&self, state: &G, player: G::Player) -> Score {
        match self {
            Heuristic::LookAhead => look_ahead_score(state, player),
            Heuristic::Flee => flee_score(state, player),
            Heuristic::Chase => chase_score(state, player),
        }
    }
}

/// Adapts a plain scoring function to `Evaluate`.
#[derive(Copy, Clone, Debug)]
pub struct ScoreFn<F>(pub F);

impl<G, F> Evaluate<G> for ScoreFn<F>
where
    G: GameState,
    F: Fn(&G, G::Player) -> Score,
{
    fn evaluate(&self, state: &G, player: G::Player) -> Score {
        (self.0)(state, player)
    }
}

fn terminal_score<G: GameState>(state: &G, player: G::Player) -> Option<Score> {
    if state.is_loser(player) {
        Some(f64::NEG_INFINITY)
    } else if state.is_winner(player) {
        Some(f64::INFINITY)
    } else {
        None
    }
}

/// Straight-line distance between two cells.
pub fn distance(a: Move, b: Move) -> f64 {
    let dr = f64::from(a.row()) - f64::from(b.row());
    let dc = f64::from(a.col()) - f64::from(b.col());
    (dr * dr + dc * dc).sqrt()
}

/// Own mobility minus opponent mobility, where each side's mobility also
/// counts the moves it would have after each of its candidate moves.
pub fn look_ahead_score<G: GameState>(state: &G, player: G::Player) -> Score {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }

    let own_moves = state.legal_moves_of(player);
    let mut own = own_moves.len();
    for mv in own_moves {
        let next = state.forecast(mv);
        // after our move the opponent is active, so we are its opponent
        own += next.legal_moves_of(next.opponent_of(next.active_player())).len();
    }

    let opp_moves = state.legal_moves_of(state.opponent_of(player));
    let mut opp = opp_moves.len();
    for mv in opp_moves {
        opp += state.forecast(mv).legal_moves().len();
    }

    own as f64 - opp as f64
}

/// Mobility difference plus the distance between both players.
pub fn flee_score<G: GameState>(state: &G, player: G::Player) -> Score {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }

    let opponent = state.opponent_of(player);
    let own_moves = state.legal_moves_of(player).len() as f64;
    let opp_moves = state.legal_moves_of(opponent).len() as f64;
    let separation = match (state.location_of(player), state.location_of(opponent)) {
        (Some(own), Some(opp)) => distance(own, opp),
        _ => 0.0,
    };
    own_moves + separation - opp_moves
}

/// Negated gap between the coordinate sums of both players. Zero until both
/// players are on the board.
pub fn chase_score<G: GameState>(state: &G, player: G::Player) -> Score {
    if let Some(score) = terminal_score(state, player) {
        return score;
    }

    let (Some(own), Some(opp)) = (state.location_of(player), state.location_of(state.opponent_of(player))) else {
        return 0.0;
    };
    let sum = |mv: Move| f64::from(mv.row()) + f64::from(mv.col());
    -(sum(opp) - sum(own)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isolation::{Board, Player};

    /// Two-sided move lists with a fixed reply count after any forecast.
    #[derive(Clone, Debug)]
    struct Mock {
        active: Player,
        own: Vec<Move>,
        opp: Vec<Move>,
        reply: usize,
        at: [Option<Move>; 2],
    }

    impl Mock {
        fn new(own: usize, opp: usize, reply: usize) -> Self {
            Self {
                active: Player::One,
                own: (0..own as i32).map(|c| Move(0, c)).collect(),
                opp: (0..opp as i32).map(|c| Move(1, c)).collect(),
                reply,
                at: [None; 2],
            }
        }
    }

    impl GameState for Mock {
        type Player = Player;

        fn active_player(&self) -> Player {
            self.active
        }

        fn opponent_of(&self, player: Player) -> Player {
            player.other()
        }

        fn legal_moves_of(&self, player: Player) -> Vec<Move> {
            match player {
                Player::One => self.own.clone(),
                Player::Two => self.opp.clone(),
            }
        }

        fn forecast(&self, _mv: Move) -> Self {
            let moves: Vec<Move> = (0..self.reply as i32).map(|c| Move(2, c)).collect();
            Self { active: self.active.other(), own: moves.clone(), opp: moves, reply: 0, at: self.at }
        }

        fn is_loser(&self, player: Player) -> bool {
            player == self.active && self.legal_moves().is_empty()
        }

        fn is_winner(&self, player: Player) -> bool {
            player != self.active && self.legal_moves().is_empty()
        }

        fn utility(&self, _player: Player) -> Score {
            0.0
        }

        fn location_of(&self, player: Player) -> Option<Move> {
            match player {
                Player::One => self.at[0],
                Player::Two => self.at[1],
            }
        }
    }

    fn play(board: Board, moves: &[Move]) -> Board {
        moves.iter().fold(board, |b, &mv| b.make_move(mv).unwrap())
    }

    #[test]
    fn distance_between_cells() {
        assert_eq!(distance(Move(0, 0), Move(3, 4)), 5.0);
        assert_eq!(distance(Move(2, 6), Move(2, 6)), 0.0);
        assert_eq!(distance(Move(3, 4), Move(0, 0)), 5.0);
        assert_eq!(distance(Move(i32::MIN, 0), Move(i32::MAX, 0)), 4_294_967_295.0);
    }

    #[test]
    fn far_apart_players_do_not_overflow() {
        let mut state = Mock::new(1, 1, 0);
        state.at = [Some(Move(i32::MIN, i32::MIN)), Some(Move(i32::MAX, i32::MAX))];
        assert_eq!(chase_score(&state, Player::One), -8_589_934_590.0);
        let separation = distance(Move(i32::MIN, i32::MIN), Move(i32::MAX, i32::MAX));
        assert!((flee_score(&state, Player::One) - separation).abs() < 1e-3);
    }

    #[test]
    fn terminal_states_dominate_every_heuristic() {
        // on a 3x3 board the centre has no knight jumps
        let board = play(Board::new(3, 3).unwrap(), &[Move(1, 1), Move(0, 0)]);
        assert!(board.is_loser(Player::One));
        for heuristic in [Heuristic::LookAhead, Heuristic::Flee, Heuristic::Chase] {
            assert_eq!(heuristic.evaluate(&board, Player::One), f64::NEG_INFINITY, "{:?}", heuristic);
            assert_eq!(heuristic.evaluate(&board, Player::Two), f64::INFINITY, "{:?}", heuristic);
        }
    }

    #[test]
    fn chase_is_zero_before_placement() {
        let board = Board::default();
        assert_eq!(chase_score(&board, Player::One), 0.0);
        let board = play(board, &[Move(3, 3)]);
        assert_eq!(chase_score(&board, Player::Two), 0.0);
    }

    #[test]
    fn chase_hand_computed() {
        let board = play(Board::default(), &[Move(1, 1), Move(4, 5)]);
        assert_eq!(chase_score(&board, Player::One), -7.0);
        assert_eq!(chase_score(&board, Player::Two), -7.0);
    }

    #[test]
    fn flee_hand_computed() {
        // One at (1,1) has 4 jumps, Two at (4,5) has 6, distance 5
        let board = play(Board::default(), &[Move(1, 1), Move(4, 5)]);
        assert_eq!(flee_score(&board, Player::One), 3.0);
        assert_eq!(flee_score(&board, Player::Two), 7.0);
    }

    #[test]
    fn look_ahead_counts_one_extra_ply() {
        // own: 2 + 2*3, opp: 1 + 1*3
        let mock = Mock::new(2, 1, 3);
        assert_eq!(look_ahead_score(&mock, Player::One), 4.0);
        assert_eq!(look_ahead_score(&mock, Player::Two), -4.0);
    }

    #[test]
    fn look_ahead_without_replies_is_mobility_difference() {
        let mock = Mock::new(5, 2, 0);
        assert_eq!(look_ahead_score(&mock, Player::One), 3.0);
    }

    #[test]
    fn look_ahead_is_monotone_in_own_moves() {
        for reply in 0..4 {
            for opp in 1..4 {
                for own in 1..6 {
                    let before = look_ahead_score(&Mock::new(own, opp, reply), Player::One);
                    let after = look_ahead_score(&Mock::new(own + 1, opp, reply), Player::One);
                    assert!(after >= before, "own={} opp={} reply={}", own, opp, reply);
                }
            }
        }
    }

    #[test]
    fn score_fn_wraps_closures() {
        let board = Board::default();
        let constant = ScoreFn(|_: &Board, _: Player| 42.0);
        assert_eq!(constant.evaluate(&board, Player::One), 42.0);
    }

    #[test]
    fn heuristic_names_deserialize() {
        let h: Heuristic = serde_json::from_str("\"look-ahead\"").unwrap();
        assert_eq!(h, Heuristic::LookAhead);
        let h: Heuristic = serde_json::from_str("\"chase\"").unwrap();
        assert_eq!(h, Heuristic::Chase);
    }
}
