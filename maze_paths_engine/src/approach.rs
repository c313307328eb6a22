// Nearest-junction table: how every node reaches the junctions around it.
//
// For each ordinary node and each direction it can be left in, the node owns
// a `JunctionApproach`: the corridor walk from that node to the first
// junction met, plus the same walk reversed (junction back to the node). The
// reversed walk is what the stitcher appends when the node is a query's
// destination. Junction nodes own a single record pointing at themselves
// with an empty path.
//
// The corridor walk takes the unique non-reversing continuation at each
// ordinary node. At a dead end it turns back, the same movement rule the
// search oracle uses, so a node inside a dead-end arm still reaches the
// arm's junction in both directions.
//
// See also: `junction.rs` for the junction-to-junction table, `stitch.rs`
// which composes both tables into query answers.

use crate::error::BuildError;
use crate::search::legal_moves;
use maze_paths_topology::{GraphView, Move, NodeId, Path};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The walk from one node to its nearest junction in one exit direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionApproach {
    /// The junction the walk ends at.
    pub junction: NodeId,
    /// The move that left `origin`. `Neutral` for a junction's self record.
    pub first_move: Move,
    /// The node the walk started from.
    pub origin: NodeId,
    /// Nodes after `origin`, ending at `junction`.
    pub path: Path,
    /// The move that arrived at `junction`. `Neutral` for an empty path.
    pub last_move: Move,
    /// `path` walked backward: starts next to `junction`, ends at `origin`.
    pub reverse_path: Path,
}

impl JunctionApproach {
    pub fn new(junction: NodeId, first_move: Move, origin: NodeId, path: Path, last_move: Move) -> Self {
        let reverse_path = reverse_of(&path, origin);
        Self {
            junction,
            first_move,
            origin,
            path,
            last_move,
            reverse_path,
        }
    }

    /// The record a junction owns: itself, reached in zero steps.
    pub fn at_junction(node: NodeId) -> Self {
        Self::new(node, Move::Neutral, node, Vec::new(), Move::Neutral)
    }

    /// Steps from `origin` to `junction`.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Index of the first visit to `node` along the walk.
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.path.iter().position(|&n| n == node)
    }
}

/// Reverse a walk ending at a junction into a walk from the junction back to
/// `origin`. Same length; the junction itself is dropped and `origin` ends it.
fn reverse_of(path: &[NodeId], origin: NodeId) -> Path {
    match path.split_last() {
        None => Vec::new(),
        Some((_, before_junction)) => {
            let mut reversed: Path = before_junction.iter().rev().copied().collect();
            reversed.push(origin);
            reversed
        }
    }
}

/// All approach records of one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeApproaches {
    pub node: NodeId,
    pub is_junction: bool,
    /// One record per exit move in canonical order (a junction has exactly one).
    pub approaches: SmallVec<[JunctionApproach; 4]>,
}

impl NodeApproaches {
    /// The single approach a mover must take after `last_move`.
    ///
    /// A junction returns its self record. An ordinary node returns the first
    /// record whose first move does not reverse `last_move`; a node entered
    /// head-on at a dead end has no such record and must reverse, so its only
    /// record is returned.
    pub fn nearest_junction(&self, last_move: Move) -> Option<&JunctionApproach> {
        self.leads_after(last_move).into_iter().next()
    }

    /// Every record a mover may start along after `last_move`, in canonical
    /// order. More than one only when `last_move` leaves the choice open
    /// (`Neutral`, or a move that does not match the node's corridor).
    pub fn leads_after(&self, last_move: Move) -> SmallVec<[&JunctionApproach; 4]> {
        if self.is_junction {
            return self.approaches.iter().take(1).collect();
        }
        let allowed: SmallVec<[&JunctionApproach; 4]> = self
            .approaches
            .iter()
            .filter(|a| a.first_move.is_allowed_after(last_move))
            .collect();
        if allowed.is_empty() {
            self.approaches.iter().take(1).collect()
        } else {
            allowed
        }
    }
}

/// Build the approach records of every node.
///
/// Fails if an ordinary node has no exits, or if a walk runs longer than
/// `walk_limit` steps (a corridor system with no junction at all).
pub fn build_approach_table<G: GraphView + ?Sized>(
    graph: &G,
    walk_limit: usize,
) -> Result<Vec<NodeApproaches>, BuildError> {
    let topology = graph.topology_id();
    let count = graph.node_count();
    let is_junction: Vec<bool> = (0..count as u32).map(|i| graph.is_junction(NodeId(i))).collect();

    let mut table = Vec::with_capacity(count);
    for i in 0..count as u32 {
        let node = NodeId(i);
        if is_junction[node.index()] {
            let mut approaches = SmallVec::new();
            approaches.push(JunctionApproach::at_junction(node));
            table.push(NodeApproaches {
                node,
                is_junction: true,
                approaches,
            });
            continue;
        }

        let exits = graph.possible_moves(node, Move::Neutral);
        if exits.is_empty() {
            return Err(BuildError::IsolatedNode { topology, node });
        }

        let mut approaches = SmallVec::new();
        for first_move in exits {
            let (path, last_move) = walk_to_junction(graph, &is_junction, node, first_move, walk_limit)?;
            let Some(&junction) = path.last() else {
                return Err(BuildError::UnterminatedWalk {
                    topology,
                    node,
                    first_move,
                    limit: walk_limit,
                });
            };
            approaches.push(JunctionApproach::new(junction, first_move, node, path, last_move));
        }
        table.push(NodeApproaches {
            node,
            is_junction: false,
            approaches,
        });
    }
    Ok(table)
}

/// Follow the corridor from `origin` leaving via `first_move` until a
/// junction. Returns the walk and the move that arrived at the junction.
fn walk_to_junction<G: GraphView + ?Sized>(
    graph: &G,
    is_junction: &[bool],
    origin: NodeId,
    first_move: Move,
    walk_limit: usize,
) -> Result<(Path, Move), BuildError> {
    let unterminated = || BuildError::UnterminatedWalk {
        topology: graph.topology_id(),
        node: origin,
        first_move,
        limit: walk_limit,
    };

    let mut last_move = first_move;
    let mut current = graph.neighbour(origin, first_move).ok_or_else(unterminated)?;
    let mut path = vec![current];

    while !is_junction[current.index()] {
        if path.len() >= walk_limit {
            return Err(unterminated());
        }
        let next_move = legal_moves(graph, current, last_move)
            .first()
            .copied()
            .ok_or_else(unterminated)?;
        current = graph.neighbour(current, next_move).ok_or_else(unterminated)?;
        last_move = next_move;
        path.push(current);
    }
    Ok((path, last_move))
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_paths_topology::{MazeGraph, MazeLayout, TopologyId};

    fn graph(rows: &[&str]) -> MazeGraph {
        MazeGraph::from_layout(&MazeLayout::new(TopologyId(7), "test", rows)).unwrap()
    }

    fn ring_with_spur() -> MazeGraph {
        graph(&[
            "#######",
            "#.....#",
            "#.###.#",
            "#.....#",
            "###.###",
            "###.###",
            "#######",
        ])
    }

    #[test]
    fn reverse_path_ends_at_origin() {
        let a = JunctionApproach::new(NodeId(9), Move::Left, NodeId(0), vec![NodeId(1), NodeId(2), NodeId(9)], Move::Left);
        assert_eq!(a.reverse_path, vec![NodeId(2), NodeId(1), NodeId(0)]);
        assert_eq!(a.reverse_path.len(), a.path.len());
    }

    #[test]
    fn junction_record_is_empty() {
        let a = JunctionApproach::at_junction(NodeId(4));
        assert!(a.is_empty());
        assert!(a.reverse_path.is_empty());
        assert_eq!(a.junction, NodeId(4));
    }

    #[test]
    fn ordinary_node_has_one_record_per_exit() {
        let g = ring_with_spur();
        let table = build_approach_table(&g, 64).unwrap();
        let corner = g.node_at(1, 1).unwrap();
        let junction = g.node_at(3, 3).unwrap();
        let rec = &table[corner.index()];
        assert!(!rec.is_junction);
        assert_eq!(rec.approaches.len(), 2);
        for a in &rec.approaches {
            assert_eq!(a.junction, junction);
            assert_eq!(a.origin, corner);
            assert_eq!(a.reverse_path.last(), Some(&corner));
        }
        // Down the left side: (1,2), (1,3), (2,3), (3,3).
        let down = rec.approaches.iter().find(|a| a.first_move == Move::Down).unwrap();
        assert_eq!(down.len(), 4);
        assert_eq!(down.last_move, Move::Right);
    }

    #[test]
    fn junction_owns_self_record() {
        let g = ring_with_spur();
        let table = build_approach_table(&g, 64).unwrap();
        let junction = g.node_at(3, 3).unwrap();
        let rec = &table[junction.index()];
        assert!(rec.is_junction);
        assert_eq!(rec.approaches.len(), 1);
        assert_eq!(rec.nearest_junction(Move::Up).unwrap().junction, junction);
    }

    #[test]
    fn walk_into_dead_end_turns_back() {
        let g = ring_with_spur();
        let table = build_approach_table(&g, 64).unwrap();
        let mid = g.node_at(3, 4).unwrap();
        let rec = &table[mid.index()];
        let outward = rec.approaches.iter().find(|a| a.first_move == Move::Down).unwrap();
        // (3,5) tip, back through (3,4), then (3,3).
        assert_eq!(outward.len(), 3);
        assert_eq!(outward.last_move, Move::Up);
        assert_eq!(outward.position_of(mid), Some(1));
    }

    #[test]
    fn nearest_junction_respects_last_move() {
        let g = ring_with_spur();
        let table = build_approach_table(&g, 64).unwrap();
        let top = g.node_at(3, 1).unwrap();
        let rec = &table[top.index()];
        assert_eq!(rec.nearest_junction(Move::Right).unwrap().first_move, Move::Right);
        assert_eq!(rec.nearest_junction(Move::Left).unwrap().first_move, Move::Left);
        // No constraint: first record in canonical order (RIGHT before LEFT).
        assert_eq!(rec.nearest_junction(Move::Neutral).unwrap().first_move, Move::Right);
    }

    #[test]
    fn neutral_leaves_every_lead_open() {
        let g = ring_with_spur();
        let table = build_approach_table(&g, 64).unwrap();
        let top = g.node_at(3, 1).unwrap();
        assert_eq!(table[top.index()].leads_after(Move::Neutral).len(), 2);
        assert_eq!(table[top.index()].leads_after(Move::Left).len(), 1);
        let junction = g.node_at(3, 3).unwrap();
        assert_eq!(table[junction.index()].leads_after(Move::Neutral).len(), 1);
    }

    #[test]
    fn dead_end_entered_head_on_must_reverse() {
        let g = ring_with_spur();
        let table = build_approach_table(&g, 64).unwrap();
        let tip = g.node_at(3, 5).unwrap();
        let forced = table[tip.index()].nearest_junction(Move::Down).unwrap();
        assert_eq!(forced.first_move, Move::Up);
    }

    #[test]
    fn junctionless_loop_is_unterminated() {
        let g = graph(&["...", ". .", "..."]);
        let err = build_approach_table(&g, 2 * g.node_count() + 1).unwrap_err();
        assert!(matches!(err, BuildError::UnterminatedWalk { .. }));
    }

    #[test]
    fn isolated_node_is_rejected() {
        let g = graph(&["#####", "#.#.#", "#...#", "#.###", "#####", "##.##"]);
        let err = build_approach_table(&g, 64).unwrap_err();
        assert!(matches!(err, BuildError::IsolatedNode { .. }));
    }
}
