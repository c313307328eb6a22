// Hand-built mazes with answers worked out on paper.

use maze_paths_engine::{BuildError, PathCache, QueryError};
use maze_paths_tests::{arcade, init_tracing, loops, plus};
use maze_paths_topology::{GraphView, MazeGraph, MazeLayout, Move, NodeId, TopologyId};

#[test]
fn plus_tips_meet_at_the_centre() {
    init_tracing();
    let g = plus();
    let cache = PathCache::new(&g).unwrap();
    let centre = g.node_at(5, 2).unwrap();
    let (left_tip, down_tip) = (g.node_at(0, 2).unwrap(), g.node_at(5, 6).unwrap());
    assert_eq!(centre, NodeId(7));
    assert_eq!(cache.junction_count(), 1);

    // Left arm has 5 nodes, down arm 4.
    assert_eq!(cache.distance(left_tip, down_tip).unwrap(), 9);
    let path = cache.path(left_tip, down_tip).unwrap();
    assert_eq!(path.iter().filter(|&&n| n == centre).count(), 1);
    assert_eq!(path.last(), Some(&down_tip));

    let (up_tip, right_tip) = (g.node_at(5, 0).unwrap(), g.node_at(8, 2).unwrap());
    assert_eq!(cache.distance(up_tip, right_tip).unwrap(), 5);
    assert_eq!(cache.distance(up_tip, left_tip).unwrap(), 7);
}

#[test]
fn target_on_the_way_skips_the_junction() {
    let g = plus();
    let cache = PathCache::new(&g).unwrap();
    let tip = g.node_at(0, 2).unwrap();
    let target = g.node_at(3, 2).unwrap();
    let path = cache.path(tip, target).unwrap();
    assert_eq!(path, vec![g.node_at(1, 2).unwrap(), g.node_at(2, 2).unwrap(), target]);
    assert!(!path.contains(&g.node_at(5, 2).unwrap()));
}

#[test]
fn directed_mover_goes_round_instead_of_reversing() {
    init_tracing();
    let g = loops();
    let cache = PathCache::new(&g).unwrap();
    // One step above the lower junction, having just moved UP out of it.
    let mover = g.node_at(3, 3).unwrap();
    let lower_junction = g.node_at(3, 4).unwrap();
    let spur_tip = g.node_at(3, 6).unwrap();

    assert_eq!(cache.distance(mover, spur_tip).unwrap(), 3);
    let path = cache.path_directed(mover, spur_tip, Move::Up).unwrap();
    assert_eq!(path.len(), 11);
    assert_eq!(path.first(), Some(&g.node_at(3, 2).unwrap()));
    assert_eq!(path.last(), Some(&spur_tip));
    // The detour comes back through the lower junction from the side.
    let back = path.iter().position(|&n| n == lower_junction).unwrap();
    assert!(back > 1);
}

#[test]
fn directed_neutral_is_undirected_distance() {
    let g = loops();
    let cache = PathCache::new(&g).unwrap();
    let mover = g.node_at(3, 3).unwrap();
    let spur_tip = g.node_at(3, 6).unwrap();
    assert_eq!(cache.distance_directed(mover, spur_tip, Move::Neutral).unwrap(), 3);
}

#[test]
fn mover_heading_into_dead_end_turns_at_the_tip() {
    let g = plus();
    let cache = PathCache::new(&g).unwrap();
    // Two steps into the down arm, still heading DOWN.
    let mover = g.node_at(5, 4).unwrap();
    let centre = g.node_at(5, 2).unwrap();
    // 2 down to the tip, 4 back up to the centre.
    assert_eq!(cache.distance_directed(mover, centre, Move::Down).unwrap(), 6);
    assert_eq!(cache.distance_directed(mover, centre, Move::Up).unwrap(), 2);
    let forced = cache.nearest_junction(mover, Move::Down).unwrap();
    assert_eq!(forced.first_move, Move::Down);
    assert_eq!(forced.junction, centre);
}

#[test]
fn tunnel_shortens_the_route() {
    let g = arcade();
    let cache = PathCache::new(&g).unwrap();
    let left_mouth = g.node_at(0, 7).unwrap();
    let right_mouth = g.node_at(20, 7).unwrap();
    assert_eq!(g.neighbour(left_mouth, Move::Left), Some(right_mouth));
    assert_eq!(cache.distance(left_mouth, right_mouth).unwrap(), 1);
    assert_eq!(cache.path(left_mouth, right_mouth).unwrap(), vec![right_mouth]);
}

#[test]
fn power_pills_do_not_change_distances() {
    let g = arcade();
    assert_eq!(g.power_pill_nodes().len(), 4);
    let cache = PathCache::new(&g).unwrap();
    let corners = g.power_pill_nodes();
    assert_eq!(
        cache.distance(corners[0], corners[1]).unwrap(),
        cache.distance(corners[1], corners[0]).unwrap()
    );
}

#[test]
fn out_of_range_node_fails_loudly() {
    let g = plus();
    let cache = PathCache::new(&g).unwrap();
    let bogus = NodeId(500);
    assert_eq!(
        cache.distance(bogus, NodeId(0)),
        Err(QueryError::InvalidNode {
            node: bogus,
            node_count: g.node_count()
        })
    );
    assert!(cache.distance_directed(NodeId(0), bogus, Move::Left).is_err());
}

#[test]
fn maze_without_junctions_cannot_be_cached() {
    let layout = MazeLayout::new(TopologyId(40), "corridor", &["#####", "#...#", "#####"]);
    let g = MazeGraph::from_layout(&layout).unwrap();
    let err = PathCache::new(&g).unwrap_err();
    assert_eq!(err, BuildError::NoJunctions { topology: TopologyId(40) });
    assert_eq!(err.to_string(), "maze#40 has no junctions");
}

#[test]
fn disconnected_maze_is_a_configuration_error() {
    // Two crosses joined along the middle row.
    let layout = MazeLayout::new(TopologyId(41), "joined", &["#.###.#", ".......", "#.###.#"]);
    let g = MazeGraph::from_layout(&layout).unwrap();
    assert!(PathCache::new(&g).is_ok());

    // The same crosses with the middle row cut.
    let layout = MazeLayout::new(TopologyId(42), "islands", &["#.###.#", "...#...", "#.###.#"]);
    let g = MazeGraph::from_layout(&layout).unwrap();
    assert!(matches!(
        PathCache::new(&g),
        Err(BuildError::UnreachableJunction { .. })
    ));
}
