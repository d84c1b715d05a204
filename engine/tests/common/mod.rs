//! A synthetic game tree for exercising the engines without a real board.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use rand::rngs::StdRng;
use rand::Rng;
use isolation_engine::{GameState, Move, Score};

#[derive(Debug)]
pub enum Node {
    Leaf(Score),
    Branch(Vec<Node>),
}

pub fn leaf(value: Score) -> Node {
    Node::Leaf(value)
}

pub fn branch(children: Vec<Node>) -> Node {
    Node::Branch(children)
}

/// Branch of leaves.
pub fn leaves(values: &[Score]) -> Node {
    branch(values.iter().map(|&v| leaf(v)).collect())
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Side {
    Max,
    Min,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }
}

/// Position in a fixed tree. Move `(0, i)` descends into child `i`. Leaf
/// values are from `Side::Max`'s point of view. Every forecast is recorded,
/// shared between all states descended from the same root.
#[derive(Clone, Debug)]
pub struct TreeGame {
    root: Rc<Node>,
    path: Vec<usize>,
    to_move: Side,
    forecasts: Rc<Cell<usize>>,
    visited: Rc<RefCell<BTreeSet<Vec<usize>>>>,
}

impl TreeGame {
    pub fn new(root: Node) -> Self {
        Self {
            root: Rc::new(root),
            path: Vec::new(),
            to_move: Side::Max,
            forecasts: Rc::new(Cell::new(0)),
            visited: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    fn node(&self) -> &Node {
        let mut node = self.root.as_ref();
        for &i in &self.path {
            node = match node {
                Node::Branch(children) => &children[i],
                Node::Leaf(_) => panic!("path {:?} runs past a leaf", self.path),
            };
        }
        node
    }

    /// Same tree and position with its own forecast counters.
    pub fn fresh(&self) -> Self {
        Self {
            root: Rc::clone(&self.root),
            path: self.path.clone(),
            to_move: self.to_move,
            forecasts: Rc::new(Cell::new(0)),
            visited: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    pub fn forecasts(&self) -> usize {
        self.forecasts.get()
    }

    pub fn visited(&self) -> BTreeSet<Vec<usize>> {
        self.visited.borrow().clone()
    }

    fn value_for(&self, player: Side) -> Score {
        let value = match self.node() {
            Node::Leaf(value) => *value,
            Node::Branch(_) => 0.0,
        };
        match player {
            Side::Max => value,
            Side::Min => -value,
        }
    }
}

impl GameState for TreeGame {
    type Player = Side;

    fn active_player(&self) -> Side {
        self.to_move
    }

    fn opponent_of(&self, player: Side) -> Side {
        player.other()
    }

    fn legal_moves_of(&self, _player: Side) -> Vec<Move> {
        match self.node() {
            Node::Branch(children) => (0..children.len() as i32).map(|i| Move(0, i)).collect(),
            Node::Leaf(_) => Vec::new(),
        }
    }

    fn forecast(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.path.push(mv.col() as usize);
        next.to_move = self.to_move.other();
        self.forecasts.set(self.forecasts.get() + 1);
        self.visited.borrow_mut().insert(next.path.clone());
        next
    }

    fn is_loser(&self, player: Side) -> bool {
        player == self.to_move && self.legal_moves().is_empty()
    }

    fn is_winner(&self, player: Side) -> bool {
        player != self.to_move && self.legal_moves().is_empty()
    }

    fn utility(&self, player: Side) -> Score {
        self.value_for(player)
    }

    fn location_of(&self, _player: Side) -> Option<Move> {
        None
    }
}

/// Evaluator reading the leaf value, zero for unexpanded branches.
pub fn leaf_value(state: &TreeGame, player: Side) -> Score {
    state.value_for(player)
}

/// Pseudo-random tree with small integer leaves, so that ties are common.
pub fn random_tree(rng: &mut StdRng, depth: u32, max_branching: usize) -> Node {
    if depth == 0 {
        return leaf(f64::from(rng.gen_range(-5i32..=5)));
    }
    let width = rng.gen_range(1..=max_branching);
    branch((0..width).map(|_| random_tree(rng, depth - 1, max_branching)).collect())
}
