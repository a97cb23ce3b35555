use serde::{Deserialize, Serialize};

use super::board::CellPos;

/// Screen-space point, in whatever units the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

/// Where the board is drawn. The authority uses this to project winning-line
/// endpoints once so every peer draws the same line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        BoardGeometry {
            origin_x: 0.0,
            origin_y: 0.0,
            cell_size: 1.0,
        }
    }
}

impl BoardGeometry {
    /// Centre of a cell. y grows downwards, matching row order.
    pub fn project(&self, pos: CellPos) -> DisplayPoint {
        DisplayPoint {
            x: self.origin_x + (pos.col as f32 + 0.5) * self.cell_size,
            y: self.origin_y + (pos.row as f32 + 0.5) * self.cell_size,
        }
    }
}
