use std::fmt;
use std::fmt::Debug;
use serde::{Deserialize, Serialize};

/// Desirability of a state for one player. `f64::INFINITY` is a certain win,
/// `f64::NEG_INFINITY` a certain loss.
pub type Score = f64;

/// A board cell as `(row, col)`. Serializes as `[row, col]`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Move(pub i32, pub i32);

impl Move {
    /// Returned when no legal move is available.
    pub const NONE: Move = Move(-1, -1);

    pub fn row(self) -> i32 {
        self.0
    }

    pub fn col(self) -> i32 {
        self.1
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl From<(i32, i32)> for Move {
    fn from((row, col): (i32, i32)) -> Self {
        Move(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Board state consumed by the search engines.
///
/// Implementations are immutable from the engine's point of view: `forecast`
/// returns a fresh successor and never touches the receiver. Legal moves must
/// be enumerated in a deterministic order, since that order decides both
/// pruning and tie-breaks.
pub trait GameState: Sized {
    type Player: Copy + Eq + Debug;

    fn active_player(&self) -> Self::Player;

    fn opponent_of(&self, player: Self::Player) -> Self::Player;

    fn legal_moves_of(&self, player: Self::Player) -> Vec<Move>;

    fn legal_moves(&self) -> Vec<Move> {
        self.legal_moves_of(self.active_player())
    }

    /// Successor after the active player makes `mv`. The move is expected to
    /// come from `legal_moves`.
    fn forecast(&self, mv: Move) -> Self;

    fn is_loser(&self, player: Self::Player) -> bool;

    fn is_winner(&self, player: Self::Player) -> bool;

    /// Terminal value of the state for `player`; zero for non-terminal states.
    fn utility(&self, player: Self::Player) -> Score;

    /// Current cell of `player`, `None` before the player has been placed.
    fn location_of(&self, player: Self::Player) -> Option<Move>;
}
