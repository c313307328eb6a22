// Test-only fixtures for the maze distance engine.
//
// Provides the fixture mazes used by the integration tests, a brute-force
// breadth-first reference distance that shares no code with the engine's
// tables, and a once-only tracing subscriber so `RUST_LOG=debug cargo test`
// shows cache construction.
//
// The engine is exercised through its public API only (`PathCache`,
// `CacheRegistry`), the same surface a game controller uses.
//
// See also: `tests/properties.rs` for invariants checked on every node pair,
// `tests/scenarios.rs` for hand-built mazes with known answers,
// `tests/persistence.rs` for serialization and the registry.

use std::collections::VecDeque;
use std::sync::Once;

use maze_paths_topology::{GraphView, MazeGraph, MazeLayout, Move, NodeId, TopologyId};

static TRACING: Once = Once::new();

/// Install a fmt subscriber honouring `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn graph(layout: &MazeLayout) -> MazeGraph {
    match MazeGraph::from_layout(layout) {
        Ok(graph) => graph,
        Err(e) => panic!("fixture layout {} is invalid: {e}", layout.id),
    }
}

/// One junction at (5,2) with arms of 2 (up), 3 (right), 4 (down) and
/// 5 (left) nodes. Tips: up = node 0, left = node 2, right = node 10,
/// down = node 14. The centre is node 7.
pub fn plus_layout() -> MazeLayout {
    MazeLayout::new(
        TopologyId(1),
        "plus",
        &[
            "#####.###",
            "#####.###",
            ".........",
            "#####.###",
            "#####.###",
            "#####.###",
            "#####.###",
        ],
    )
}

/// Two junctions stacked in the middle column, (3,1) and (3,4), joined by
/// a short corridor and by two side loops, with a dead-end spur below the
/// lower junction.
pub fn loops_layout() -> MazeLayout {
    MazeLayout::new(
        TopologyId(2),
        "loops",
        &[
            "#######",
            "#.....#",
            "#.#.#.#",
            "#.#.#.#",
            "#.....#",
            "###.###",
            "###.###",
            "#######",
        ],
    )
}

/// A small arcade-style maze: 24 junctions, power pills in the corners and
/// a wrap-around tunnel on row 7.
pub fn arcade_layout() -> MazeLayout {
    MazeLayout::new(
        TopologyId(3),
        "arcade",
        &[
            "#####################",
            "#o........#........o#",
            "#.###.###.#.###.###.#",
            "#...................#",
            "#.###.#.#####.#.###.#",
            "#.....#...#...#.....#",
            "#####.###_#_###.#####",
            "_____._________._____",
            "#####.#.#####.#.#####",
            "#.........#.........#",
            "#.###.###.#.###.###.#",
            "#o..#...........#..o#",
            "#####################",
        ],
    )
    .with_wrap()
}

pub fn plus() -> MazeGraph {
    graph(&plus_layout())
}

pub fn loops() -> MazeGraph {
    graph(&loops_layout())
}

pub fn arcade() -> MazeGraph {
    graph(&arcade_layout())
}

/// Every fixture maze, for tests that check an invariant on all of them.
pub fn all_mazes() -> Vec<MazeGraph> {
    vec![plus(), loops(), arcade()]
}

/// Plain BFS distances from `start`, ignoring the no-reversal rule.
/// `None` for unreachable nodes.
pub fn bfs_distances(graph: &MazeGraph, start: NodeId) -> Vec<Option<usize>> {
    let mut dist = vec![None; graph.node_count()];
    dist[start.index()] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let d = dist[node.index()].unwrap_or(0);
        for mv in Move::CARDINAL {
            if let Some(next) = graph.neighbour(node, mv) {
                if dist[next.index()].is_none() {
                    dist[next.index()] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
    }
    dist
}

/// Whether `path` is a walk from `start`: each node one step from the last.
pub fn is_walk(graph: &MazeGraph, start: NodeId, path: &[NodeId]) -> bool {
    let mut prev = start;
    for &node in path {
        if graph.move_to_neighbour(prev, node).is_none() {
            return false;
        }
        prev = node;
    }
    true
}

/// The moves a walk makes, in order.
pub fn moves_of(graph: &MazeGraph, start: NodeId, path: &[NodeId]) -> Vec<Move> {
    let mut prev = start;
    path.iter()
        .filter_map(|&node| {
            let mv = graph.move_to_neighbour(prev, node);
            prev = node;
            mv
        })
        .collect()
}

/// Arrival moves that are physically possible at `node`: `Neutral`, plus any
/// move whose reverse leads to a neighbour.
pub fn arrival_moves(graph: &MazeGraph, node: NodeId) -> Vec<Move> {
    Move::ALL
        .into_iter()
        .filter(|&mv| mv == Move::Neutral || graph.neighbour(node, mv.opposite()).is_some())
        .collect()
}

pub fn node_ids(graph: &MazeGraph) -> impl Iterator<Item = NodeId> {
    (0..graph.node_count() as u32).map(NodeId)
}
