// Read-only view of a maze graph.
//
// `GraphView` is the only thing the distance engine knows about a maze: how
// many nodes it has, and which node lies one step away in each direction.
// Everything else (possible moves, junction classification, the sorted
// junction list) is derived from `neighbour()` by provided methods, so an
// implementor only has to supply adjacency.
//
// See also: `maze.rs` for `MazeGraph`, the grid-backed implementation, and
// `maze_paths_engine` which consumes this trait at cache-build time.

use crate::types::{Move, NodeId, TopologyId};
use smallvec::SmallVec;

/// Moves available from one node. At most four.
pub type MoveList = SmallVec<[Move; 4]>;

/// Read-only adjacency over a fixed maze topology.
///
/// Implementations must be immutable for the lifetime of the topology: the
/// engine builds its tables once and never re-reads the graph afterwards.
pub trait GraphView {
    /// Identifier of the topology this view describes.
    fn topology_id(&self) -> TopologyId;

    /// Number of nodes. Node ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// The node one step from `node` in direction `mv`, if any.
    /// `Move::Neutral` always yields `None`.
    fn neighbour(&self, node: NodeId, mv: Move) -> Option<NodeId>;

    /// Whether `node` is a valid id for this topology.
    fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Cardinal moves with a neighbour, in canonical order, excluding the
    /// reversal of `last_move`. `Move::Neutral` excludes nothing.
    fn possible_moves(&self, node: NodeId, last_move: Move) -> MoveList {
        Move::CARDINAL
            .into_iter()
            .filter(|&mv| mv.is_allowed_after(last_move))
            .filter(|&mv| self.neighbour(node, mv).is_some())
            .collect()
    }

    /// A junction offers more than two movement choices, ignoring reversal.
    fn is_junction(&self, node: NodeId) -> bool {
        self.possible_moves(node, Move::Neutral).len() > 2
    }

    /// All junction nodes in ascending id order.
    fn junction_nodes(&self) -> Vec<NodeId> {
        (0..self.node_count() as u32)
            .map(NodeId)
            .filter(|&n| self.is_junction(n))
            .collect()
    }

    /// The move that takes `from` directly to its neighbour `to`.
    fn move_to_neighbour(&self, from: NodeId, to: NodeId) -> Option<Move> {
        Move::CARDINAL
            .into_iter()
            .find(|&mv| self.neighbour(from, mv) == Some(to))
    }
}
