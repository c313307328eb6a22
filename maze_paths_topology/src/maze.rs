// Grid-backed maze graph.
//
// `MazeGraph` is a set of `MazeNode`s (walkable cells) linked to their four
// grid neighbours. It is built from a `MazeLayout` by `from_layout()` and
// implements `GraphView`, which is all the distance engine needs.
//
// Node ids are assigned in row-major order of walkable cells, so the same
// layout always yields the same ids. All storage is `Vec`-indexed for O(1)
// lookup and deterministic iteration order. No `HashMap`.
//
// See also: `layout.rs` for the text format, `view.rs` for the trait the
// engine consumes.

use crate::layout::{Cell, LayoutError, MazeLayout};
use crate::types::{Move, NodeId, TopologyId};
use crate::view::GraphView;
use serde::{Deserialize, Serialize};

/// A walkable cell of the maze.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MazeNode {
    pub id: NodeId,
    pub x: u32,
    pub y: u32,
    pub cell: Cell,
    /// Neighbour per cardinal move, indexed by `Move::index()`.
    neighbours: [Option<NodeId>; 4],
}

impl MazeNode {
    /// The neighbour in direction `mv`.
    pub fn neighbour(&self, mv: Move) -> Option<NodeId> {
        match mv {
            Move::Neutral => None,
            _ => self.neighbours[mv.index()],
        }
    }
}

/// A maze topology: walkable cells and their adjacency.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MazeGraph {
    pub id: TopologyId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<MazeNode>,
    /// Row-major cell -> node lookup; `None` for walls.
    grid: Vec<Option<NodeId>>,
}

impl MazeGraph {
    /// Build a graph from a layout.
    ///
    /// Every walkable cell becomes a node, linked to each walkable orthogonal
    /// neighbour. With `wrap_horizontal`, walkable cells at both ends of the
    /// same row are linked through the edge.
    pub fn from_layout(layout: &MazeLayout) -> Result<Self, LayoutError> {
        let cells = layout.cells()?;
        let width = layout.width();
        let height = layout.height();

        let mut nodes: Vec<MazeNode> = Vec::new();
        let mut grid = vec![None; width * height];
        for (y, row) in cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(cell) = *cell {
                    let id = NodeId(nodes.len() as u32);
                    nodes.push(MazeNode {
                        id,
                        x: x as u32,
                        y: y as u32,
                        cell,
                        neighbours: [None; 4],
                    });
                    grid[y * width + x] = Some(id);
                }
            }
        }
        if nodes.is_empty() {
            return Err(LayoutError::NoWalkableCells { topology: layout.id });
        }

        let wrap = layout.wrap_horizontal && width > 2;
        let lookup = |x: i64, y: i64| -> Option<NodeId> {
            if y < 0 || y >= height as i64 {
                return None;
            }
            let x = if wrap {
                x.rem_euclid(width as i64)
            } else if x < 0 || x >= width as i64 {
                return None;
            } else {
                x
            };
            grid[y as usize * width + x as usize]
        };

        for node in &mut nodes {
            for mv in Move::CARDINAL {
                let (dx, dy) = mv.offset();
                node.neighbours[mv.index()] =
                    lookup(node.x as i64 + dx as i64, node.y as i64 + dy as i64);
            }
        }

        Ok(Self {
            id: layout.id,
            name: layout.name.clone(),
            width: width as u32,
            height: height as u32,
            nodes,
            grid,
        })
    }

    /// Get a node by id. `None` if the id is out of range.
    pub fn node(&self, id: NodeId) -> Option<&MazeNode> {
        self.nodes.get(id.index())
    }

    /// The node at cell `(x, y)`, if that cell is walkable.
    pub fn node_at(&self, x: u32, y: u32) -> Option<NodeId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.grid[(y * self.width + x) as usize]
    }

    /// Cell coordinates of a node.
    pub fn position(&self, id: NodeId) -> Option<(u32, u32)> {
        self.node(id).map(|node| (node.x, node.y))
    }

    /// Nodes holding a pill, ascending.
    pub fn pill_nodes(&self) -> Vec<NodeId> {
        self.nodes_with(Cell::Pill)
    }

    /// Nodes holding a power pill, ascending.
    pub fn power_pill_nodes(&self) -> Vec<NodeId> {
        self.nodes_with(Cell::PowerPill)
    }

    fn nodes_with(&self, cell: Cell) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.cell == cell)
            .map(|n| n.id)
            .collect()
    }
}

impl GraphView for MazeGraph {
    fn topology_id(&self) -> TopologyId {
        self.id
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn neighbour(&self, node: NodeId, mv: Move) -> Option<NodeId> {
        self.nodes.get(node.index())?.neighbour(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tee() -> MazeGraph {
        let layout = MazeLayout::new(
            TopologyId(1),
            "tee",
            &[
                "#####",
                "#...#",
                "##o##",
                "#####",
            ],
        );
        MazeGraph::from_layout(&layout).unwrap()
    }

    #[test]
    fn nodes_are_numbered_row_major() {
        let g = tee();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.node_at(1, 1), Some(NodeId(0)));
        assert_eq!(g.node_at(3, 1), Some(NodeId(2)));
        assert_eq!(g.node_at(2, 2), Some(NodeId(3)));
        assert_eq!(g.node_at(0, 0), None);
        assert_eq!(g.node_at(99, 0), None);
        assert_eq!(g.position(NodeId(3)), Some((2, 2)));
    }

    #[test]
    fn out_of_range_id_has_no_node() {
        let g = tee();
        assert!(g.node(NodeId(4)).is_none());
        assert_eq!(g.position(NodeId(99)), None);
        assert_eq!(g.node(NodeId(0)).map(|n| n.id), Some(NodeId(0)));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = tee();
        for node in &g.nodes {
            for mv in Move::CARDINAL {
                if let Some(other) = g.neighbour(node.id, mv) {
                    assert_eq!(g.neighbour(other, mv.opposite()), Some(node.id));
                }
            }
        }
    }

    #[test]
    fn tee_has_one_junction() {
        let g = tee();
        assert_eq!(g.junction_nodes(), vec![NodeId(1)]);
        assert_eq!(g.neighbour(NodeId(1), Move::Down), Some(NodeId(3)));
        assert_eq!(g.neighbour(NodeId(1), Move::Neutral), None);
    }

    #[test]
    fn pills_are_recorded() {
        let g = tee();
        assert_eq!(g.pill_nodes(), vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(g.power_pill_nodes(), vec![NodeId(3)]);
    }

    #[test]
    fn wrap_links_row_edges() {
        let layout = MazeLayout::new(TopologyId(2), "tunnel", &["._#_."]).with_wrap();
        let g = MazeGraph::from_layout(&layout).unwrap();
        let left = g.node_at(0, 0).unwrap();
        let right = g.node_at(4, 0).unwrap();
        assert_eq!(g.neighbour(left, Move::Left), Some(right));
        assert_eq!(g.neighbour(right, Move::Right), Some(left));
    }

    #[test]
    fn edges_do_not_wrap_by_default() {
        let layout = MazeLayout::new(TopologyId(2), "no tunnel", &["._#_."]);
        let g = MazeGraph::from_layout(&layout).unwrap();
        let left = g.node_at(0, 0).unwrap();
        assert_eq!(g.neighbour(left, Move::Left), None);
    }

    #[test]
    fn all_wall_layout_is_rejected() {
        let layout = MazeLayout::new(TopologyId(5), "solid", &["###", "# #"]);
        assert!(matches!(
            MazeGraph::from_layout(&layout),
            Err(LayoutError::NoWalkableCells { .. })
        ));
    }
}
