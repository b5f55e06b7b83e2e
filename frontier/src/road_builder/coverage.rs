use super::pathfinder::RoadContext;
use commons::index2d::Index2D;
use commons::V2;
use pioneer::points::MAP_SIZE;
use pioneer::Mesh;

/// Passable regions bucketed into a square grid over the map.
pub struct CoverageGrid {
    index: Index2D,
    cells: Vec<Vec<usize>>,
}

impl CoverageGrid {
    pub fn new(context: &RoadContext, size: usize) -> CoverageGrid {
        let index = Index2D::covering(MAP_SIZE, size);
        let mut cells = vec![vec![]; index.indices()];
        for r in 0..context.mesh.num_solid_regions() {
            if !context.is_passable(r) {
                continue;
            }
            let position = context.mesh.position_r(r);
            if !in_map(position) {
                continue;
            }
            let cell = index.cell_of(position);
            cells[cell.y * index.columns() + cell.x].push(r);
        }
        CoverageGrid { index, cells }
    }

    /// Closest passable region to `position` among the 3x3 cells around it.
    pub fn nearest_passable(&self, mesh: &Mesh, position: &V2<f32>) -> Option<usize> {
        let cell = self.index.cell_of(position);
        let mut best: Option<(usize, f32)> = None;
        for index in self.index.neighbourhood(&cell) {
            for r in self.cells[index].iter().copied() {
                let distance = (mesh.position_r(r) - position).norm_squared();
                if best.map_or(true, |(_, closest)| distance < closest) {
                    best = Some((r, distance));
                }
            }
        }
        best.map(|(r, _)| r)
    }

    /// Nearest passable region to the centre of every cell, row by row, without repeats.
    pub fn waypoints(&self, mesh: &Mesh) -> Vec<usize> {
        let mut out = vec![];
        for y in 0..self.index.rows() {
            for x in 0..self.index.columns() {
                let centre = self.index.cell_centre(&V2::new(x, y));
                if let Some(r) = self.nearest_passable(mesh, &centre) {
                    if !out.contains(&r) {
                        out.push(r);
                    }
                }
            }
        }
        out
    }
}

fn in_map(position: &V2<f32>) -> bool {
    position.x >= 0.0 && position.y >= 0.0 && position.x < MAP_SIZE && position.y < MAP_SIZE
}
