// Directional shortest-path search over a maze graph.
//
// The engine never searches at query time. It calls a `PathOracle` while
// building the junction-to-junction table, once per (junction, exit move),
// and stores the answers. `UniformCostOracle` is the stock oracle: a
// uniform-cost search with a `BinaryHeap` (min-heap via reversed ordering)
// over `(node, arrival move)` states. Scores and came-from links live in
// `Vec`s indexed by state for O(1) access and deterministic behavior.
//
// Movement rule: a step may not exactly undo the step before it. The start
// state carries the caller's last move, so the very first step is
// constrained too. At a dead end the reversal is the only legal step and is
// taken; without that, a search that enters a dead-end arm could never leave.
//
// See also: `junction.rs`, the only caller; `approach.rs`, whose corridor
// walk follows the same movement rule.

use maze_paths_topology::{GraphView, Move, MoveList, NodeId, Path};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Shortest path under the no-reversal movement rule.
pub trait PathOracle: Sync {
    /// Nodes strictly after `start` up to and including `goal`, moving so
    /// that the first step is not `last_move.opposite()` and no step undoes
    /// its predecessor. Empty iff `start == goal`; `None` if unreachable.
    fn shortest_path<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        start: NodeId,
        last_move: Move,
        goal: NodeId,
    ) -> Option<Path>;

    /// Answer several goals from the same start. Entry `i` answers `goals[i]`.
    fn shortest_paths<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        start: NodeId,
        last_move: Move,
        goals: &[NodeId],
    ) -> Vec<Option<Path>> {
        goals
            .iter()
            .map(|&goal| self.shortest_path(graph, start, last_move, goal))
            .collect()
    }
}

/// Moves legal after arriving at `node` via `arrived`: everything but the
/// reversal, or only the reversal when nothing else exists.
pub fn legal_moves<G: GraphView + ?Sized>(graph: &G, node: NodeId, arrived: Move) -> MoveList {
    let moves = graph.possible_moves(node, arrived);
    if moves.is_empty() {
        graph.possible_moves(node, Move::Neutral)
    } else {
        moves
    }
}

/// Uniform-cost search over `(node, arrival move)` states. Every step costs 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformCostOracle;

/// Entry in the open set (min-heap via reversed ordering).
struct OpenEntry {
    cost: u32,
    node: NodeId,
    arrived: Move,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: lowest cost is "greatest".
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.arrived.cmp(&self.arrived))
    }
}

fn state_index(node: NodeId, arrived: Move) -> usize {
    node.index() * Move::COUNT + arrived.index()
}

fn state_node(state: usize) -> NodeId {
    NodeId((state / Move::COUNT) as u32)
}

impl UniformCostOracle {
    /// One search from `start`, stopping once every goal is settled.
    fn search<G: GraphView + ?Sized>(
        graph: &G,
        start: NodeId,
        last_move: Move,
        goals: &[NodeId],
    ) -> Vec<Option<Path>> {
        let n = graph.node_count();
        if !graph.contains(start) {
            return vec![None; goals.len()];
        }

        let mut is_goal = vec![false; n];
        let mut remaining = 0usize;
        for &goal in goals {
            if goal != start && graph.contains(goal) && !is_goal[goal.index()] {
                is_goal[goal.index()] = true;
                remaining += 1;
            }
        }

        let states = n * Move::COUNT;
        // g_score[state] = steps of the cheapest known route to that state.
        let mut g_score = vec![u32::MAX; states];
        let mut came_from: Vec<Option<usize>> = vec![None; states];
        let mut closed = vec![false; states];
        // First settled state per node: the cheapest arrival at that node.
        let mut reached: Vec<Option<usize>> = vec![None; n];

        g_score[state_index(start, last_move)] = 0;
        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            cost: 0,
            node: start,
            arrived: last_move,
        });

        while remaining > 0 {
            let Some(current) = open.pop() else {
                break;
            };
            let si = state_index(current.node, current.arrived);
            if closed[si] {
                continue;
            }
            closed[si] = true;

            let ni = current.node.index();
            if reached[ni].is_none() {
                reached[ni] = Some(si);
                if is_goal[ni] {
                    remaining -= 1;
                }
            }

            for mv in legal_moves(graph, current.node, current.arrived) {
                let Some(next) = graph.neighbour(current.node, mv) else {
                    continue;
                };
                let ns = state_index(next, mv);
                if closed[ns] {
                    continue;
                }
                let tentative = current.cost + 1;
                if tentative < g_score[ns] {
                    g_score[ns] = tentative;
                    came_from[ns] = Some(si);
                    open.push(OpenEntry {
                        cost: tentative,
                        node: next,
                        arrived: mv,
                    });
                }
            }
        }

        goals
            .iter()
            .map(|&goal| {
                if goal == start {
                    return Some(Vec::new());
                }
                if !graph.contains(goal) {
                    return None;
                }
                reached[goal.index()].map(|state| reconstruct_path(&came_from, state))
            })
            .collect()
    }
}

/// Walk came-from links back to the start state; the start node is excluded.
fn reconstruct_path(came_from: &[Option<usize>], goal_state: usize) -> Path {
    let mut nodes = Vec::new();
    let mut current = goal_state;
    while let Some(prev) = came_from[current] {
        nodes.push(state_node(current));
        current = prev;
    }
    nodes.reverse();
    nodes
}

impl PathOracle for UniformCostOracle {
    fn shortest_path<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        start: NodeId,
        last_move: Move,
        goal: NodeId,
    ) -> Option<Path> {
        Self::search(graph, start, last_move, &[goal]).pop().flatten()
    }

    fn shortest_paths<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        start: NodeId,
        last_move: Move,
        goals: &[NodeId],
    ) -> Vec<Option<Path>> {
        Self::search(graph, start, last_move, goals)
    }
}
