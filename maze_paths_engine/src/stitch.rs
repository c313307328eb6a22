// Query-time path stitching.
//
// A query never searches. It composes at most three stored segments: the
// origin's approach to a junction, a junction-to-junction path, and the
// destination's approach walked backward. When the destination sits on the
// origin's own approach walk, the answer is a prefix of that walk and no
// junction hop is needed.
//
// Undirected queries may leave the origin in any direction, so every
// approach record of the origin is tried, and the junction hop uses the
// `Neutral` (any exit) entry. Directed queries take only the approach
// records the mover can start along without reversing, and the junction hop
// may not leave by the reversal of the move that reached the junction. A
// destination whose corridor opens straight off the reached junction is the
// "on the way" case: walk into the corridor directly if that first step is
// allowed, otherwise go round a loop (`paths[J][J][exit]`) and come back.
//
// Candidate costs are compared before any path is built, so a query
// allocates exactly one `Path`. Ties keep the first candidate in canonical
// move order.
//
// See also: `approach.rs` and `junction.rs` for the tables read here,
// `cache.rs` for the public query API that validates node ids first.

use crate::approach::{JunctionApproach, NodeApproaches};
use crate::junction::{JunctionIndex, JunctionTable};
use maze_paths_topology::{Move, NodeId, Path};

/// The last leg of a directed answer, chosen before anything is copied.
enum Leg<'a> {
    /// Straight from the reached junction into the destination's corridor.
    OnTheWay(&'a [NodeId]),
    /// A junction-to-junction hop followed by a reversed approach.
    ViaTable { hop: &'a [NodeId], approach: &'a [NodeId] },
}

/// Borrowed view over the two tables; node ids must already be validated.
pub(crate) struct Stitcher<'a> {
    pub nodes: &'a [NodeApproaches],
    pub table: &'a JunctionTable,
}

impl<'a> Stitcher<'a> {
    fn junction_index(&self, node: NodeId) -> Option<JunctionIndex> {
        self.table.index.index_of(node)
    }

    /// Shortest path from `a` to `b` when the mover may start in any
    /// direction. `None` only if the tables hold no route at all.
    pub fn undirected(&self, a: NodeId, b: NodeId) -> Option<Path> {
        if a == b {
            return Some(Vec::new());
        }
        let from = self.nodes.get(a.index())?;
        let to = self.nodes.get(b.index())?;

        // b on one of a's own approach walks: cheapest such prefix.
        let shortcut = from
            .approaches
            .iter()
            .filter_map(|fa| fa.position_of(b).map(|i| (i + 1, fa)))
            .min_by_key(|&(len, _)| len);

        let mut best: Option<(usize, &JunctionApproach, &Path, &JunctionApproach)> = None;
        for fa in &from.approaches {
            let Some(fj) = self.junction_index(fa.junction) else {
                continue;
            };
            for ta in &to.approaches {
                let Some(tj) = self.junction_index(ta.junction) else {
                    continue;
                };
                let Some(hop) = self.table.path(fj, tj, Move::Neutral) else {
                    continue;
                };
                let cost = fa.len() + hop.len() + ta.reverse_path.len();
                if best.is_none_or(|(c, ..)| cost < c) {
                    best = Some((cost, fa, hop, ta));
                }
            }
        }

        match (shortcut, best) {
            (Some((len, fa)), best) if best.is_none_or(|(cost, ..)| len <= cost) => {
                Some(fa.path[..len].to_vec())
            }
            (_, Some((_, fa, hop, ta))) => Some(concat(&[fa.path.as_slice(), hop.as_slice(), ta.reverse_path.as_slice()])),
            (_, None) => None,
        }
    }

    /// Shortest path from `a` to `b` for a mover that arrived at `a` via
    /// `last_move` and may never undo its previous step (except by
    /// turning back at a dead end).
    pub fn directed(&self, a: NodeId, b: NodeId, last_move: Move) -> Option<Path> {
        if a == b {
            return Some(Vec::new());
        }
        let from = self.nodes.get(a.index())?;
        let to = self.nodes.get(b.index())?;

        from.leads_after(last_move)
            .into_iter()
            .filter_map(|lead| self.directed_from(lead, to, last_move))
            .min_by_key(Vec::len)
    }

    /// Best directed answer once the first leg is fixed to `lead`.
    fn directed_from(&self, lead: &JunctionApproach, to: &'a NodeApproaches, last_move: Move) -> Option<Path> {
        let b = to.node;
        if let Some(i) = lead.position_of(b) {
            return Some(lead.path[..=i].to_vec());
        }

        let fj = self.junction_index(lead.junction)?;
        // The move that reached the junction; its reversal is forbidden next.
        let entered = if lead.is_empty() { last_move } else { lead.last_move };

        let mut best: Option<(usize, Leg<'a>)> = None;
        let mut offer = |cost: usize, leg: Leg<'a>| {
            if best.as_ref().is_none_or(|(c, _)| cost < *c) {
                best = Some((cost, leg));
            }
        };

        for ta in &to.approaches {
            let Some(tj) = self.junction_index(ta.junction) else {
                continue;
            };
            // Leaving the junction into ta's reversed walk takes the
            // opposite of the move that walk arrived with.
            if tj == fj && ta.last_move.opposite().is_allowed_after(entered) {
                let end = ta
                    .reverse_path
                    .iter()
                    .position(|&n| n == b)
                    .map_or(ta.reverse_path.len(), |i| i + 1);
                offer(end, Leg::OnTheWay(&ta.reverse_path[..end]));
                continue;
            }
            let Some(exits) = self.table.exits(fj, tj) else {
                continue;
            };
            for (exit, hop) in exits.exits() {
                if exit.is_allowed_after(entered) {
                    offer(
                        hop.len() + ta.len(),
                        Leg::ViaTable {
                            hop,
                            approach: &ta.reverse_path,
                        },
                    );
                }
            }
        }

        let (_, leg) = best?;
        Some(match leg {
            Leg::OnTheWay(rest) => concat(&[lead.path.as_slice(), rest]),
            Leg::ViaTable { hop, approach } => concat(&[lead.path.as_slice(), hop, approach]),
        })
    }
}

fn concat(parts: &[&[NodeId]]) -> Path {
    let mut path = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        path.extend_from_slice(part);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approach::build_approach_table;
    use crate::search::{PathOracle, UniformCostOracle};
    use maze_paths_topology::{GraphView, MazeGraph, MazeLayout, TopologyId};

    // One junction at (3,3): the ring's bottom-middle cell, with a two-cell
    // dead-end spur hanging below it.
    fn ring_with_spur() -> MazeGraph {
        let layout = MazeLayout::new(
            TopologyId(11),
            "ring",
            &[
                "#######",
                "#.....#",
                "#.###.#",
                "#.....#",
                "###.###",
                "###.###",
                "#######",
            ],
        );
        MazeGraph::from_layout(&layout).unwrap()
    }

    struct Fixture {
        graph: MazeGraph,
        nodes: Vec<NodeApproaches>,
        table: JunctionTable,
    }

    impl Fixture {
        fn new(graph: MazeGraph) -> Self {
            let nodes = build_approach_table(&graph, 64).unwrap();
            let table = JunctionTable::build(&graph, &UniformCostOracle, &graph.junction_nodes(), false).unwrap();
            Self { graph, nodes, table }
        }

        fn stitcher(&self) -> Stitcher<'_> {
            Stitcher {
                nodes: &self.nodes,
                table: &self.table,
            }
        }

        fn at(&self, x: u32, y: u32) -> NodeId {
            self.graph.node_at(x, y).unwrap()
        }
    }

    #[test]
    fn same_node_is_empty() {
        let f = Fixture::new(ring_with_spur());
        let a = f.at(1, 1);
        assert_eq!(f.stitcher().undirected(a, a), Some(Vec::new()));
        assert_eq!(f.stitcher().directed(a, a, Move::Up), Some(Vec::new()));
    }

    #[test]
    fn undirected_target_on_the_way() {
        let f = Fixture::new(ring_with_spur());
        let path = f.stitcher().undirected(f.at(1, 1), f.at(3, 1)).unwrap();
        assert_eq!(path, vec![f.at(2, 1), f.at(3, 1)]);
    }

    #[test]
    fn undirected_goes_through_junction() {
        let f = Fixture::new(ring_with_spur());
        let path = f.stitcher().undirected(f.at(3, 5), f.at(1, 1)).unwrap();
        assert_eq!(path.len(), 6);
        assert!(path.contains(&f.at(3, 3)));
        assert_eq!(path.last(), Some(&f.at(1, 1)));
    }

    #[test]
    fn directed_detours_instead_of_reversing() {
        let f = Fixture::new(ring_with_spur());
        let (a, b) = (f.at(2, 1), f.at(1, 1));
        let path = f.stitcher().directed(a, b, Move::Right).unwrap();
        assert_eq!(path.len(), 11);
        assert_eq!(path.first(), Some(&f.at(3, 1)));
        assert_eq!(path.last(), Some(&b));
        // Same length as a direct search.
        let oracle = UniformCostOracle.shortest_path(&f.graph, a, Move::Right, b).unwrap();
        assert_eq!(path.len(), oracle.len());
    }

    #[test]
    fn directed_from_junction_uses_loop_when_corridor_is_behind() {
        let f = Fixture::new(ring_with_spur());
        // Just came up out of the spur; the spur tip is now behind us.
        let path = f.stitcher().directed(f.at(3, 3), f.at(3, 5), Move::Up).unwrap();
        assert_eq!(path.len(), 14);
        assert_eq!(path.first(), Some(&f.at(4, 3)));
        assert_eq!(&path[path.len() - 2..], &[f.at(3, 4), f.at(3, 5)]);
    }

    #[test]
    fn directed_neutral_tries_every_lead() {
        let f = Fixture::new(ring_with_spur());
        let path = f.stitcher().directed(f.at(3, 1), f.at(1, 1), Move::Neutral).unwrap();
        assert_eq!(path, vec![f.at(2, 1), f.at(1, 1)]);
    }

    #[test]
    fn directed_target_on_lead_is_prefix() {
        let f = Fixture::new(ring_with_spur());
        let path = f.stitcher().directed(f.at(1, 2), f.at(3, 1), Move::Up).unwrap();
        assert_eq!(path, vec![f.at(1, 1), f.at(2, 1), f.at(3, 1)]);
    }

    #[test]
    fn directed_dead_end_turns_back() {
        let f = Fixture::new(ring_with_spur());
        let path = f.stitcher().directed(f.at(3, 5), f.at(3, 4), Move::Down).unwrap();
        assert_eq!(path, vec![f.at(3, 4)]);
        // Heading into the spur: to the tip and back out.
        let path = f.stitcher().directed(f.at(3, 4), f.at(3, 3), Move::Down).unwrap();
        assert_eq!(path, vec![f.at(3, 5), f.at(3, 4), f.at(3, 3)]);
    }

    #[test]
    fn directed_matches_oracle_everywhere() {
        let f = Fixture::new(ring_with_spur());
        let n = f.graph.node_count() as u32;
        for a in (0..n).map(NodeId) {
            for last in Move::ALL {
                // Only arrival moves the node could actually have been entered by.
                if last != Move::Neutral && f.graph.neighbour(a, last.opposite()).is_none() {
                    continue;
                }
                for b in (0..n).map(NodeId) {
                    let stitched = f.stitcher().directed(a, b, last).unwrap();
                    let searched = UniformCostOracle.shortest_path(&f.graph, a, last, b).unwrap();
                    assert_eq!(stitched.len(), searched.len(), "{a} -> {b} after {last}");
                }
            }
        }
    }
}
