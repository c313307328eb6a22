// maze_paths_topology: read-only maze graphs for the distance engine.
//
// This crate describes *what a maze is*: node ids, moves, the `GraphView`
// trait the engine consumes, and a grid-backed `MazeGraph` built from ASCII
// layouts. It knows nothing about distance caching; see `maze_paths_engine`
// for that.
//
// Module overview:
// - `types.rs`:  NodeId, TopologyId, Move (canonical order + `opposite()`), Path.
// - `view.rs`:   GraphView trait, adjacency plus derived junction queries.
// - `layout.rs`: MazeLayout text/JSON format and LayoutError.
// - `maze.rs`:   MazeGraph, row-major node numbering, optional tunnels.
//
// **Critical constraint: immutability.** A topology never changes shape
// after construction. Pills are recorded but never affect connectivity.

pub mod layout;
pub mod maze;
pub mod types;
pub mod view;

pub use layout::{Cell, LayoutError, MazeLayout};
pub use maze::{MazeGraph, MazeNode};
pub use types::{Move, NodeId, Path, TopologyId};
pub use view::{GraphView, MoveList};
