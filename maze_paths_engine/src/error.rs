// Error types for building, querying, and persisting path caches.
//
// Construction errors (`BuildError`) are configuration errors: the maze
// topology itself is unusable, so no partial cache is ever produced. Query
// errors (`QueryError`) are caller mistakes and are raised instead of
// returning a sentinel distance. Every variant names the topology or node
// involved.

use maze_paths_topology::{Move, NodeId, TopologyId};
use thiserror::Error;

/// The maze cannot be turned into a path cache.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("{topology} has no junctions")]
    NoJunctions { topology: TopologyId },

    #[error("{topology}: {node} is not a junction and has no exits")]
    IsolatedNode { topology: TopologyId, node: NodeId },

    #[error("{topology}: walk from {node} leaving {first_move} found no junction within {limit} steps")]
    UnterminatedWalk {
        topology: TopologyId,
        node: NodeId,
        first_move: Move,
        limit: usize,
    },

    #[error("{topology}: junction {from} cannot reach junction {to} when leaving {exit}")]
    UnreachableJunction {
        topology: TopologyId,
        from: NodeId,
        to: NodeId,
        exit: Move,
    },
}

/// A distance or path query was malformed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid node id {node}: topology has {node_count} nodes")]
    InvalidNode { node: NodeId, node_count: usize },

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },
}

/// A persisted cache could not be loaded.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt cache for {topology}: {reason}")]
    Corrupt { topology: TopologyId, reason: String },
}

/// Engine configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("walk_limit must be at least 1")]
    ZeroWalkLimit,
}
