// The path cache: one immutable value per maze topology.
//
// `PathCache::build()` scans a `GraphView` once, builds the nearest-junction
// table (`approach.rs`) and the junction-to-junction table (`junction.rs`),
// and returns a value that answers distance and path queries without ever
// touching the graph again. The cache holds no interior mutability, so it is
// `Send + Sync` and may be shared behind an `Arc` across any number of
// threads (see `registry.rs`).
//
// Every query validates both node ids against the topology's node count and
// returns `QueryError::InvalidNode` rather than a sentinel distance.
// `distance*()` is always the length of the path `path*()` returns for the
// same arguments.
//
// A built cache is plain serde data. `to_json()`/`from_json()` persist it
// per topology so later runs can skip construction; `from_json()` checks
// the tables are consistent before handing the cache out.

use crate::approach::{JunctionApproach, NodeApproaches, build_approach_table};
use crate::config::EngineConfig;
use crate::error::{BuildError, CacheError, QueryError};
use crate::junction::JunctionTable;
use crate::search::{PathOracle, UniformCostOracle};
use crate::stitch::Stitcher;
use maze_paths_topology::{GraphView, Move, NodeId, Path, TopologyId};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Precomputed distances for one maze topology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCache {
    topology: TopologyId,
    node_count: usize,
    nodes: Vec<NodeApproaches>,
    junctions: JunctionTable,
}

impl PathCache {
    /// Build with the stock oracle and default config.
    pub fn new<G: GraphView + Sync + ?Sized>(graph: &G) -> Result<Self, BuildError> {
        Self::build(graph, &UniformCostOracle, &EngineConfig::default())
    }

    /// Build both tables for `graph`. Fails without producing a partial
    /// cache if the maze has no junctions or a node cannot reach one.
    pub fn build<G, O>(graph: &G, oracle: &O, config: &EngineConfig) -> Result<Self, BuildError>
    where
        G: GraphView + Sync + ?Sized,
        O: PathOracle,
    {
        let topology = graph.topology_id();
        let node_count = graph.node_count();
        let _span = tracing::info_span!("path_cache_build", %topology).entered();
        let started = Instant::now();

        let junction_nodes = graph.junction_nodes();
        if junction_nodes.is_empty() {
            return Err(BuildError::NoJunctions { topology });
        }
        tracing::info!(
            %topology,
            node_count,
            junction_count = junction_nodes.len(),
            parallel = config.parallel_build,
            "building path cache"
        );

        let nodes = build_approach_table(graph, config.walk_limit_for(node_count))?;
        let junctions = JunctionTable::build(graph, oracle, &junction_nodes, config.parallel_build)?;

        tracing::info!(
            %topology,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "path cache built"
        );
        Ok(Self {
            topology,
            node_count,
            nodes,
            junctions,
        })
    }

    fn check(&self, node: NodeId) -> Result<(), QueryError> {
        if node.index() < self.node_count {
            Ok(())
        } else {
            Err(QueryError::InvalidNode {
                node,
                node_count: self.node_count,
            })
        }
    }

    fn stitcher(&self) -> Stitcher<'_> {
        Stitcher {
            nodes: &self.nodes,
            table: &self.junctions,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Shortest path from `a` to `b`, free to start in any direction.
    /// Excludes `a`, ends at `b`; empty iff `a == b`.
    pub fn path(&self, a: NodeId, b: NodeId) -> Result<Path, QueryError> {
        self.check(a)?;
        self.check(b)?;
        self.stitcher()
            .undirected(a, b)
            .ok_or(QueryError::NoRoute { from: a, to: b })
    }

    pub fn distance(&self, a: NodeId, b: NodeId) -> Result<usize, QueryError> {
        self.path(a, b).map(|path| path.len())
    }

    /// Shortest path from `a` to `b` for a mover that reached `a` via
    /// `last_move` and may not reverse. `Move::Neutral` means no constraint
    /// on the first step.
    pub fn path_directed(&self, a: NodeId, b: NodeId, last_move: Move) -> Result<Path, QueryError> {
        self.check(a)?;
        self.check(b)?;
        self.stitcher()
            .directed(a, b, last_move)
            .ok_or(QueryError::NoRoute { from: a, to: b })
    }

    pub fn distance_directed(&self, a: NodeId, b: NodeId, last_move: Move) -> Result<usize, QueryError> {
        self.path_directed(a, b, last_move).map(|path| path.len())
    }

    // -----------------------------------------------------------------------
    // Table access
    // -----------------------------------------------------------------------

    /// The approach a mover at `node` must take after `last_move`.
    pub fn nearest_junction(&self, node: NodeId, last_move: Move) -> Result<&JunctionApproach, QueryError> {
        self.check(node)?;
        self.nodes[node.index()]
            .nearest_junction(last_move)
            .ok_or(QueryError::NoRoute { from: node, to: node })
    }

    /// All approach records of `node`, one per exit move.
    pub fn approaches(&self, node: NodeId) -> Result<&[JunctionApproach], QueryError> {
        self.check(node)?;
        Ok(&self.nodes[node.index()].approaches)
    }

    /// The stored path between two junctions leaving `from` by `exit`
    /// (`Neutral`: the shortest over all exits). `None` if either node is
    /// not a junction or `from` has no such exit.
    pub fn junction_path(&self, from: NodeId, to: NodeId, exit: Move) -> Option<&Path> {
        let index = &self.junctions.index;
        self.junctions.path(index.index_of(from)?, index.index_of(to)?, exit)
    }

    pub fn is_junction(&self, node: NodeId) -> bool {
        self.junctions.index.index_of(node).is_some()
    }

    /// Junction node ids, ascending.
    pub fn junction_nodes(&self) -> &[NodeId] {
        self.junctions.index.nodes()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn junction_table(&self) -> &JunctionTable {
        &self.junctions
    }

    pub fn topology_id(&self) -> TopologyId {
        self.topology
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load a persisted cache and check its tables agree with each other.
    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        let cache: PathCache = serde_json::from_str(json)?;
        cache.validate()?;
        Ok(cache)
    }

    /// Structural consistency of a deserialized cache, down to every stored
    /// node id. A cache produced by `build()` always passes. `from_json()`
    /// runs this itself; call it after loading through any other format.
    pub fn validate(&self) -> Result<(), CacheError> {
        let corrupt = |reason: String| CacheError::Corrupt {
            topology: self.topology,
            reason,
        };
        let index = &self.junctions.index;

        if self.nodes.len() != self.node_count {
            return Err(corrupt(format!(
                "{} node records for {} nodes",
                self.nodes.len(),
                self.node_count
            )));
        }
        if index.node_capacity() != self.node_count {
            return Err(corrupt(format!(
                "junction map covers {} nodes, expected {}",
                index.node_capacity(),
                self.node_count
            )));
        }
        if index.is_empty() || self.junctions.len() != index.len() {
            return Err(corrupt(format!(
                "{} junction rows for {} junctions",
                self.junctions.len(),
                index.len()
            )));
        }

        for (i, row) in self.junctions.junctions.iter().enumerate() {
            if row.index.index() != i || index.node_of(row.index) != Some(row.node) {
                return Err(corrupt(format!("junction row {i} is out of place")));
            }
            if row.paths.len() != index.len() {
                return Err(corrupt(format!("junction row {i} has {} targets", row.paths.len())));
            }
            for exits in &row.paths {
                for mv in Move::ALL {
                    if let Some(bad) = exits.get(mv).and_then(|path| self.stray_node(path)) {
                        return Err(corrupt(format!("junction row {i} steps onto missing {bad}")));
                    }
                }
            }
        }

        for (i, record) in self.nodes.iter().enumerate() {
            let node = record.node;
            if node.index() != i {
                return Err(corrupt(format!("node record {i} belongs to {node}")));
            }
            if record.is_junction != index.index_of(node).is_some() {
                return Err(corrupt(format!("{node} junction flag disagrees with the junction map")));
            }
            if record.approaches.is_empty() {
                return Err(corrupt(format!("{node} has no approach records")));
            }
            for approach in &record.approaches {
                if approach.origin != node || index.index_of(approach.junction).is_none() {
                    return Err(corrupt(format!("{node} has an approach that does not end at a junction")));
                }
                let stray = self.stray_node(&approach.path).or_else(|| self.stray_node(&approach.reverse_path));
                if let Some(bad) = stray {
                    return Err(corrupt(format!("{node} has an approach through missing {bad}")));
                }
            }
        }
        Ok(())
    }

    /// First node id on `path` that is outside this topology.
    fn stray_node(&self, path: &[NodeId]) -> Option<NodeId> {
        path.iter().copied().find(|n| n.index() >= self.node_count)
    }
}
