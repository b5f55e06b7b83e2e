use crate::mesh::Mesh;
use crate::points::MAP_SIZE;
use commons::index2d::Index2D;
use commons::V2;

/// Uniform grid of solid regions for point lookups.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionIndex {
    index: Index2D,
    cells: Vec<Vec<usize>>,
}

impl RegionIndex {
    pub fn new(mesh: &Mesh, spacing: f32) -> RegionIndex {
        let cell_size = (2.0 * spacing).max(1.0);
        let columns = (MAP_SIZE / cell_size).ceil().max(1.0) as usize;
        let index = Index2D::covering(MAP_SIZE, columns);
        let mut cells = vec![vec![]; index.indices()];
        for r in 0..mesh.num_solid_regions() {
            let cell = index.cell_of(mesh.position_r(r));
            cells[cell.y * index.columns() + cell.x].push(r);
        }
        RegionIndex { index, cells }
    }

    /// Nearest solid region to `position`. Searches outwards ring by ring, stopping once no
    /// unsearched cell can hold anything closer.
    pub fn region_containing(&self, mesh: &Mesh, position: &V2<f32>) -> Option<usize> {
        let cell = self.index.cell_of(position);
        let max_ring = self.index.columns().max(self.index.rows());
        let mut best: Option<(usize, f32)> = None;
        for ring in 0..=max_ring {
            if let Some((_, closest)) = best {
                let reach = ring.saturating_sub(1) as f32 * self.index.cell_size();
                if reach * reach > closest {
                    break;
                }
            }
            for index in self.index.ring(&cell, ring) {
                for r in self.cells[index].iter().copied() {
                    let distance = (mesh.position_r(r) - position).norm_squared();
                    if best.map_or(true, |(_, closest)| distance < closest) {
                        best = Some((r, distance));
                    }
                }
            }
        }
        best.map(|(r, _)| r)
    }
}
