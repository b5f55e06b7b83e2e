use crate::{v2, V2};
use serde::{Deserialize, Serialize};

/// Row-major addressing of a `columns` x `rows` grid of cells, each `cell_size` wide.
#[derive(Debug, PartialEq, Clone, Copy, Deserialize, Serialize)]
pub struct Index2D {
    columns: usize,
    rows: usize,
    cell_size: f32,
}

#[derive(Debug, PartialEq)]
pub struct PositionOutOfBounds {
    position: V2<usize>,
    index_2d: Index2D,
}

#[derive(Debug, PartialEq)]
pub struct IndexOutOfBounds {
    index: usize,
    index_2d: Index2D,
}

impl Index2D {
    pub fn new(columns: usize, rows: usize, cell_size: f32) -> Index2D {
        Index2D {
            columns,
            rows,
            cell_size,
        }
    }

    /// Square grid covering `[0, extent]` with `columns` cells per axis.
    pub fn covering(extent: f32, columns: usize) -> Index2D {
        let columns = columns.max(1);
        Index2D::new(columns, columns, extent / columns as f32)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn get_index(&self, position: &V2<usize>) -> Result<usize, PositionOutOfBounds> {
        if position.x >= self.columns || position.y >= self.rows {
            Err(PositionOutOfBounds {
                position: *position,
                index_2d: *self,
            })
        } else {
            Ok(position.y * self.columns + position.x)
        }
    }

    pub fn get_position(&self, index: usize) -> Result<V2<usize>, IndexOutOfBounds> {
        if index >= self.indices() {
            Err(IndexOutOfBounds {
                index,
                index_2d: *self,
            })
        } else {
            Ok(v2(index % self.columns, index / self.columns))
        }
    }

    pub fn indices(&self) -> usize {
        self.columns * self.rows
    }

    /// Cell containing `point`, clamped onto the grid.
    pub fn cell_of(&self, point: &V2<f32>) -> V2<usize> {
        let clamp = |value: f32, cells: usize| {
            let cell = (value / self.cell_size).floor();
            if cell.is_nan() || cell < 0.0 {
                0
            } else {
                (cell as usize).min(cells - 1)
            }
        };
        v2(clamp(point.x, self.columns), clamp(point.y, self.rows))
    }

    pub fn cell_centre(&self, cell: &V2<usize>) -> V2<f32> {
        v2(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Indices of cells at Chebyshev distance exactly `ring` from `cell`, clipped to the grid.
    /// Ring 0 is the cell itself.
    pub fn ring(&self, cell: &V2<usize>, ring: usize) -> Vec<usize> {
        let ring = ring as i64;
        let mut out = vec![];
        for dy in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs() != ring && dy.abs() != ring {
                    continue;
                }
                let x = cell.x as i64 + dx;
                let y = cell.y as i64 + dy;
                if x < 0 || y < 0 {
                    continue;
                }
                if let Ok(index) = self.get_index(&v2(x as usize, y as usize)) {
                    out.push(index);
                }
            }
        }
        out
    }

    /// Indices of the 3x3 block of cells centred on `cell`, clipped to the grid.
    pub fn neighbourhood(&self, cell: &V2<usize>) -> Vec<usize> {
        let mut out = self.ring(cell, 0);
        out.append(&mut self.ring(cell, 1));
        out
    }
}
