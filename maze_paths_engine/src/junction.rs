// Junction-to-junction shortest paths.
//
// Junction node ids are sparse, so they are re-indexed densely once
// (`JunctionIndexMap`, a two-way mapping built at construction and never
// recomputed). Each `Junction` then holds, for every other junction and every
// move it can be left by, the shortest path to that junction, plus a
// `Neutral` entry holding the shortest of those, for callers that may leave
// in any direction.
//
// This is the expensive phase: one oracle search per (junction, exit move),
// each answering every target junction at once. Rows are independent, so
// they may be built in parallel with rayon; the result does not depend on
// the thread count.
//
// See also: `search.rs` for the oracle, `stitch.rs` for how the table is read
// at query time.

use crate::error::BuildError;
use crate::search::PathOracle;
use maze_paths_topology::{GraphView, Move, NodeId, Path};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense index of a junction: `0..junction_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JunctionIndex(pub u32);

impl JunctionIndex {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for JunctionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "junction#{}", self.0)
    }
}

/// Two-way mapping between sparse junction node ids and dense indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionIndexMap {
    by_node: Vec<Option<JunctionIndex>>,
    nodes: Vec<NodeId>,
}

impl JunctionIndexMap {
    /// `junction_nodes` must be valid ids below `node_count`.
    pub fn new(node_count: usize, junction_nodes: &[NodeId]) -> Self {
        let mut by_node = vec![None; node_count];
        for (i, &node) in junction_nodes.iter().enumerate() {
            by_node[node.index()] = Some(JunctionIndex(i as u32));
        }
        Self {
            by_node,
            nodes: junction_nodes.to_vec(),
        }
    }

    pub fn index_of(&self, node: NodeId) -> Option<JunctionIndex> {
        self.by_node.get(node.index()).copied().flatten()
    }

    pub fn node_of(&self, index: JunctionIndex) -> Option<NodeId> {
        self.nodes.get(index.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub(crate) fn node_capacity(&self) -> usize {
        self.by_node.len()
    }
}

/// Paths from one junction to one other junction, keyed by exit move.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitPaths {
    by_move: [Option<Path>; Move::COUNT],
}

impl ExitPaths {
    pub fn get(&self, mv: Move) -> Option<&Path> {
        self.by_move[mv.index()].as_ref()
    }

    pub fn set(&mut self, mv: Move, path: Path) {
        self.by_move[mv.index()] = Some(path);
    }

    /// Real exit moves with their paths, in canonical order. Skips `Neutral`.
    pub fn exits(&self) -> impl Iterator<Item = (Move, &Path)> + '_ {
        Move::CARDINAL
            .into_iter()
            .filter_map(|mv| self.get(mv).map(|path| (mv, path)))
    }

    /// Store the shortest exit path under `Neutral`. The first minimum in
    /// canonical order wins.
    fn settle_neutral(&mut self) {
        let best = self
            .exits()
            .min_by_key(|(_, path)| path.len())
            .map(|(_, path)| path.clone());
        if let Some(best) = best {
            self.set(Move::Neutral, best);
        }
    }
}

/// One junction's row of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    pub index: JunctionIndex,
    pub node: NodeId,
    /// Indexed by the target junction's index.
    pub paths: Vec<ExitPaths>,
}

impl Junction {
    /// Fill every `Neutral` entry; the entry for this junction itself is empty.
    fn compute_shortest_paths(&mut self) {
        let own = self.index.index();
        for (i, exits) in self.paths.iter_mut().enumerate() {
            if i == own {
                exits.set(Move::Neutral, Vec::new());
            } else {
                exits.settle_neutral();
            }
        }
    }
}

/// The complete junction-to-junction table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionTable {
    pub index: JunctionIndexMap,
    pub junctions: Vec<Junction>,
}

impl JunctionTable {
    /// Build every row. `junction_nodes` must be non-empty and ascending.
    pub fn build<G, O>(
        graph: &G,
        oracle: &O,
        junction_nodes: &[NodeId],
        parallel: bool,
    ) -> Result<Self, BuildError>
    where
        G: GraphView + Sync + ?Sized,
        O: PathOracle,
    {
        let index = JunctionIndexMap::new(graph.node_count(), junction_nodes);
        let rows = 0..junction_nodes.len() as u32;
        let junctions = if parallel {
            rows.into_par_iter()
                .map(|q| build_row(graph, oracle, &index, JunctionIndex(q)))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            rows.map(|q| build_row(graph, oracle, &index, JunctionIndex(q)))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Self { index, junctions })
    }

    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    /// All stored paths from `from` to `to`.
    pub fn exits(&self, from: JunctionIndex, to: JunctionIndex) -> Option<&ExitPaths> {
        self.junctions.get(from.index())?.paths.get(to.index())
    }

    /// The path from `from` to `to` leaving by `exit` (`Neutral`: shortest).
    pub fn path(&self, from: JunctionIndex, to: JunctionIndex, exit: Move) -> Option<&Path> {
        self.exits(from, to)?.get(exit)
    }
}

fn build_row<G, O>(
    graph: &G,
    oracle: &O,
    index: &JunctionIndexMap,
    q: JunctionIndex,
) -> Result<Junction, BuildError>
where
    G: GraphView + ?Sized,
    O: PathOracle,
{
    let topology = graph.topology_id();
    let targets = index.nodes();
    let node = targets[q.index()];
    let mut junction = Junction {
        index: q,
        node,
        paths: vec![ExitPaths::default(); targets.len()],
    };

    for exit in graph.possible_moves(node, Move::Neutral) {
        let Some(first) = graph.neighbour(node, exit) else {
            continue;
        };
        let found = oracle.shortest_paths(graph, first, exit, targets);
        for (z, (&target, tail)) in targets.iter().zip(found).enumerate() {
            let Some(tail) = tail else {
                return Err(BuildError::UnreachableJunction {
                    topology,
                    from: node,
                    to: target,
                    exit,
                });
            };
            let mut path = Vec::with_capacity(tail.len() + 1);
            path.push(first);
            path.extend(tail);
            junction.paths[z].set(exit, path);
        }
    }

    junction.compute_shortest_paths();
    tracing::debug!(%topology, junction = %q, %node, "junction row built");
    Ok(junction)
}
