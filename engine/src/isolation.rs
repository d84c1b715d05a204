use std::fmt;
use bitvec::prelude::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::game::{GameState, Move, Score};

const DEFAULT_WIDTH: usize = 7;
const DEFAULT_HEIGHT: usize = 7;

lazy_static! {
    // knight jumps, ordered by row offset then column offset
    static ref JUMPS: Vec<(i32, i32)> = {
        let mut jumps = Vec::new();
        for dr in -2i32..=2 {
            for dc in -2i32..=2 {
                if (dr * dc).abs() == 2 {
                    jumps.push((dr, dc));
                }
            }
        }
        jumps
    };
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Isolation board: each player occupies one cell and moves like a knight,
/// every visited cell stays blocked, and a player who cannot move loses.
// cells are stored column by column, so blank cells enumerate in that order
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    blocked: BitVec<u8, Lsb0>,
    locations: [Option<Move>; 2],
    active: Player,
    move_count: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            blocked: bitvec![u8, Lsb0; 0; DEFAULT_WIDTH * DEFAULT_HEIGHT],
            locations: [None, None],
            active: Player::One,
            move_count: 0,
        }
    }
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            blocked: bitvec![u8, Lsb0; 0; width * height],
            ..Self::default()
        })
    }

    /// Board with the given cells blocked before the first move.
    pub fn with_blocked(width: usize, height: usize, cells: &[Move]) -> Result<Self> {
        let mut board = Self::new(width, height)?;
        for &cell in cells {
            let idx = board.index(cell).ok_or(Error::OutOfBounds(cell))?;
            board.blocked.set(idx, true);
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    fn index(&self, cell: Move) -> Option<usize> {
        let (row, col) = (usize::try_from(cell.row()).ok()?, usize::try_from(cell.col()).ok()?);
        if row < self.height && col < self.width {
            Some(col * self.height + row)
        } else {
            None
        }
    }

    fn cell(&self, idx: usize) -> Move {
        Move((idx % self.height) as i32, (idx / self.height) as i32)
    }

    pub fn is_blank(&self, cell: Move) -> bool {
        match self.index(cell) {
            Some(idx) => !self.blocked[idx],
            None => false,
        }
    }

    pub fn blank_cells(&self) -> Vec<Move> {
        self.blocked.iter_zeros().map(|idx| self.cell(idx)).collect()
    }

    fn moves_from(&self, location: Option<Move>) -> Vec<Move> {
        match location {
            None => self.blank_cells(),
            Some(from) => JUMPS
                .iter()
                .map(|&(dr, dc)| Move(from.row() + dr, from.col() + dc))
                .filter(|&cell| self.is_blank(cell))
                .collect(),
        }
    }

    fn apply(&mut self, mv: Move) {
        if let Some(idx) = self.index(mv) {
            self.blocked.set(idx, true);
        }
        self.locations[self.active.index()] = Some(mv);
        self.active = self.active.other();
        self.move_count += 1;
    }

    /// Applies `mv` for the active player after checking that it is legal.
    pub fn make_move(&self, mv: Move) -> Result<Self> {
        if !self.legal_moves().contains(&mv) {
            return Err(Error::IllegalMove(mv));
        }
        let mut board = self.clone();
        board.apply(mv);
        Ok(board)
    }

    pub fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty()
    }
}

impl GameState for Board {
    type Player = Player;

    fn active_player(&self) -> Player {
        self.active
    }

    fn opponent_of(&self, player: Player) -> Player {
        player.other()
    }

    fn legal_moves_of(&self, player: Player) -> Vec<Move> {
        self.moves_from(self.locations[player.index()])
    }

    fn forecast(&self, mv: Move) -> Self {
        let mut board = self.clone();
        board.apply(mv);
        board
    }

    fn is_loser(&self, player: Player) -> bool {
        player == self.active && self.is_game_over()
    }

    fn is_winner(&self, player: Player) -> bool {
        player != self.active && self.is_game_over()
    }

    fn utility(&self, player: Player) -> Score {
        if !self.is_game_over() {
            0.0
        } else if player == self.active {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        }
    }

    fn location_of(&self, player: Player) -> Option<Move> {
        self.locations[player.index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height as i32 {
            let cells: Vec<&str> = (0..self.width as i32)
                .map(|col| {
                    let cell = Some(Move(row, col));
                    if cell == self.locations[0] {
                        "1"
                    } else if cell == self.locations[1] {
                        "2"
                    } else if self.is_blank(Move(row, col)) {
                        " "
                    } else {
                        "-"
                    }
                })
                .collect();
            writeln!(f, "| {} |", cells.join(" | "))?;
        }
        Ok(())
    }
}
