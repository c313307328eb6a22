// ASCII maze layouts.
//
// A `MazeLayout` is the data form of a maze: an id, a display name, a list of
// text rows, and whether the left and right edges wrap around (tunnels).
// Layouts are plain serde structs so maze sets can live in JSON files next to
// the engine config.
//
// Cell legend:
//   `#` or space  wall
//   `.`           corridor with a pill
//   `o`           corridor with a power pill
//   `_`           empty corridor
//
// Rows may have different lengths; missing cells past the end of a short row
// are walls. `MazeGraph::from_layout` (see `maze.rs`) turns a layout into a
// graph.

use crate::types::TopologyId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What occupies a walkable cell. Pills never change connectivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Pill,
    PowerPill,
    Empty,
}

impl Cell {
    /// Parse one layout character. `Ok(None)` is a wall.
    pub fn parse(ch: char) -> Result<Option<Cell>, char> {
        match ch {
            '#' | ' ' => Ok(None),
            '.' => Ok(Some(Cell::Pill)),
            'o' => Ok(Some(Cell::PowerPill)),
            '_' => Ok(Some(Cell::Empty)),
            other => Err(other),
        }
    }
}

/// Errors raised while turning a layout into a graph.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout for {topology} has no rows")]
    Empty { topology: TopologyId },

    #[error("layout for {topology} has unknown cell {ch:?} at row {row}, column {column}")]
    UnknownCell {
        topology: TopologyId,
        row: usize,
        column: usize,
        ch: char,
    },

    #[error("layout for {topology} has no walkable cells")]
    NoWalkableCells { topology: TopologyId },

    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text form of a maze.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub id: TopologyId,
    #[serde(default)]
    pub name: String,
    pub rows: Vec<String>,
    /// Link walkable cells on the left and right edge of the same row.
    #[serde(default)]
    pub wrap_horizontal: bool,
}

impl MazeLayout {
    /// Build a layout from string rows, without wrap-around.
    pub fn new(id: TopologyId, name: &str, rows: &[&str]) -> Self {
        Self {
            id,
            name: name.to_string(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            wrap_horizontal: false,
        }
    }

    /// Enable left/right tunnels.
    pub fn with_wrap(mut self) -> Self {
        self.wrap_horizontal = true;
        self
    }

    /// Grid width: the length of the longest row, in characters.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    /// Grid height: the number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Parse a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the layout to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode every cell, row-major. Short rows are padded with walls.
    pub fn cells(&self) -> Result<Vec<Vec<Option<Cell>>>, LayoutError> {
        if self.rows.is_empty() {
            return Err(LayoutError::Empty { topology: self.id });
        }
        let width = self.width();
        let mut grid = Vec::with_capacity(self.rows.len());
        for (row, text) in self.rows.iter().enumerate() {
            let mut line = Vec::with_capacity(width);
            for (column, ch) in text.chars().enumerate() {
                let cell = Cell::parse(ch).map_err(|ch| LayoutError::UnknownCell {
                    topology: self.id,
                    row,
                    column,
                    ch,
                })?;
                line.push(cell);
            }
            line.resize(width, None);
            grid.push(line);
        }
        Ok(grid)
    }
}
