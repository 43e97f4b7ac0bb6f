//! Character map of a network for the terminal

use anyhow::Result;

use super::{Artifact, NetworkRenderer};
use crate::generation::{NetworkModel, Position};

/// Default map width in characters
pub const DEFAULT_MAP_WIDTH: usize = 61;

/// Draws nodes and roads onto a character grid. North is up.
/// `+` marks a junction of three or more roads, `o` any other node, `.` a road.
#[derive(Debug, Clone)]
pub struct AsciiRenderer {
    pub width: usize,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
        }
    }
}

impl AsciiRenderer {
    pub fn draw(&self, model: &NetworkModel) -> String {
        let Some((min, max)) = model.bounds() else {
            return String::from("(empty network)\n");
        };

        let span = (max.x - min.x).max(max.y - min.y);
        let columns_per_meter = if span > 0.0 {
            (self.width.max(2) - 1) as f64 / span
        } else {
            0.0
        };
        // Terminal cells are about twice as tall as they are wide
        let rows_per_meter = columns_per_meter / 2.0;

        let width = ((max.x - min.x) * columns_per_meter).round() as usize + 1;
        let height = ((max.y - min.y) * rows_per_meter).round() as usize + 1;
        let mut grid = vec![vec![' '; width]; height];

        // Flip y so larger coordinates end up on top
        let to_grid = |pos: Position| -> (i64, i64) {
            let col = ((pos.x - min.x) * columns_per_meter).round() as i64;
            let row = ((max.y - pos.y) * rows_per_meter).round() as i64;
            (row.min(height as i64 - 1), col.min(width as i64 - 1))
        };

        for edge in model.edges() {
            let (Some(from), Some(to)) = (model.node(edge.from), model.node(edge.to)) else {
                continue;
            };
            let (start_row, start_col) = to_grid(from.position);
            let (end_row, end_col) = to_grid(to.position);

            // Bresenham
            let dx = (end_col - start_col).abs();
            let dy = (end_row - start_row).abs();
            let sx = if start_col < end_col { 1 } else { -1 };
            let sy = if start_row < end_row { 1 } else { -1 };

            let mut err = dx - dy;
            let mut x = start_col;
            let mut y = start_row;

            loop {
                if x >= 0 && x < width as i64 && y >= 0 && y < height as i64 {
                    grid[y as usize][x as usize] = '.';
                }
                if x == end_col && y == end_row {
                    break;
                }
                let e2 = 2 * err;
                if e2 > -dy {
                    err -= dy;
                    x += sx;
                }
                if e2 < dx {
                    err += dx;
                    y += sy;
                }
            }
        }

        for node in model.nodes() {
            let (row, col) = to_grid(node.position);
            grid[row as usize][col as usize] = if model.degree(node.id) >= 3 { '+' } else { 'o' };
        }

        let mut map = String::from("Legend: +=Junction, o=Node, .=Road\n\n");
        for row in &grid {
            let line: String = row.iter().collect();
            map.push_str(line.trim_end());
            map.push('\n');
        }
        map
    }
}

impl NetworkRenderer for AsciiRenderer {
    fn render(&self, model: &NetworkModel) -> Result<Vec<Artifact>> {
        Ok(vec![Artifact::new("map.txt", self.draw(model))])
    }
}
