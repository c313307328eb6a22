// Core types shared by every maze-distance crate.
//
// Defines node identifiers (`NodeId`), the topology key (`TopologyId`), and
// the five-valued `Move` enum (four cardinal moves plus `Neutral`, meaning
// "no move constraint"). All types derive `Serialize` and `Deserialize` so a
// built path cache can be persisted per topology.
//
// **Critical constraint: determinism.** `Move::ALL` fixes the canonical move
// order (Up, Right, Down, Left, Neutral). Every table built from a maze
// iterates moves in this order, so two builds of the same topology are
// identical, including how ties between equal-length paths are broken.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Compact identifier for a maze node. Node ids are dense: `0..node_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The node's slot in dense per-node tables.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Key under which a maze topology (and any cache built from it) is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopologyId(pub u32);

impl fmt::Display for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maze#{}", self.0)
    }
}

/// An ordered sequence of nodes. A path never contains its origin; it ends
/// at its destination. The empty path means "already there".
pub type Path = Vec<NodeId>;

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// A single-step movement direction.
///
/// `Neutral` is not a real step: it stands for "no previous move" when used
/// as a last move, and for "any direction" when used as a table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
    Neutral,
}

impl Move {
    /// All moves in canonical order.
    pub const ALL: [Move; 5] = [Move::Up, Move::Right, Move::Down, Move::Left, Move::Neutral];

    /// The four real steps, in canonical order.
    pub const CARDINAL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    /// Number of distinct moves (size of a per-move slot array).
    pub const COUNT: usize = 5;

    /// The move that exactly undoes this one. `Neutral` is its own opposite.
    pub const fn opposite(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Right => Move::Left,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Neutral => Move::Neutral,
        }
    }

    /// Dense slot in `0..Move::COUNT`, matching `Move::ALL`.
    pub const fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Right => 1,
            Move::Down => 2,
            Move::Left => 3,
            Move::Neutral => 4,
        }
    }

    /// Whether stepping with `self` is allowed right after `last_move`.
    /// Only the exact reversal is forbidden; `Neutral` forbids nothing.
    pub fn is_allowed_after(self, last_move: Move) -> bool {
        last_move == Move::Neutral || self != last_move.opposite()
    }

    /// Grid offset `(dx, dy)` of one step; y grows downward.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Right => (1, 0),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
            Move::Neutral => (0, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "UP",
            Move::Right => "RIGHT",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Neutral => "NEUTRAL",
        };
        f.write_str(name)
    }
}
