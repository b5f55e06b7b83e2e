use crate::error::MeshError;
use commons::index2d::Index2D;
use commons::rand::Rng;
use commons::random::seeded_rng;
use commons::{v2, V2};
use std::f32::consts::{SQRT_2, TAU};

pub const MAP_SIZE: f32 = 1000.0;

const CURVATURE: f32 = 1.0;
const EPSILON: f32 = 1e-4;
const ATTEMPTS: usize = 30;

/// Points to triangulate, ordered exterior boundary, interior boundary, mountain peaks, then
/// interior fill.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    pub points: Vec<V2<f32>>,
    pub exterior_boundary: usize,
    pub interior_boundary: usize,
    pub mountains: usize,
}

impl PointSet {
    pub fn boundary(&self) -> usize {
        self.exterior_boundary + self.interior_boundary
    }

    pub fn peak_regions(&self) -> std::ops::Range<usize> {
        self.boundary()..self.boundary() + self.mountains
    }
}

pub fn choose_points(seed: u32, spacing: f32, mountain_spacing: f32) -> Result<PointSet, MeshError> {
    check_spacing(spacing)?;
    check_spacing(mountain_spacing)?;

    let mut rng = seeded_rng(seed);
    let exterior = exterior_boundary_points(spacing, MAP_SIZE);
    let interior = interior_boundary_points(spacing, MAP_SIZE);

    let mut mountain_sampler = PoissonSampler::new(mountain_spacing);
    interior.iter().for_each(|point| mountain_sampler.add(*point));
    let mountains = mountain_sampler.fill(&mut rng);

    let mut sampler = PoissonSampler::new(spacing);
    interior
        .iter()
        .chain(mountains.iter())
        .for_each(|point| sampler.add(*point));
    let fill = sampler.fill(&mut rng);

    let out = PointSet {
        exterior_boundary: exterior.len(),
        interior_boundary: interior.len(),
        mountains: mountains.len(),
        points: exterior
            .into_iter()
            .chain(interior)
            .chain(mountains)
            .chain(fill)
            .collect(),
    };
    Ok(out)
}

fn check_spacing(spacing: f32) -> Result<(), MeshError> {
    if spacing.is_finite() && spacing > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidSpacing { spacing })
    }
}

fn edge_subdivisions(spacing: f32, size: f32) -> usize {
    ((size - 2.0 * CURVATURE) / spacing).ceil().max(1.0) as usize
}

/// Ring one spacing outside the map so that hull triangles fall outside the playable area.
fn exterior_boundary_points(spacing: f32, size: f32) -> Vec<V2<f32>> {
    let diagonal = spacing / SQRT_2;
    let subdivisions = edge_subdivisions(spacing, size);
    let mut out = vec![];
    for q in 0..subdivisions {
        let t = q as f32 / subdivisions as f32;
        let dx = (size - 2.0 * CURVATURE) * t + spacing / 2.0;
        out.push(v2(dx, -spacing));
        out.push(v2(size - dx, size + spacing));
    }
    for r in 0..subdivisions {
        let t = r as f32 / subdivisions as f32;
        let dy = (size - 2.0 * CURVATURE) * t + spacing / 2.0;
        out.push(v2(-spacing, size - dy));
        out.push(v2(size + spacing, dy));
    }
    out.push(v2(-diagonal, -diagonal));
    out.push(v2(size + diagonal, -diagonal));
    out.push(v2(-diagonal, size + diagonal));
    out.push(v2(size + diagonal, size + diagonal));
    out
}

/// Points along the map edge, bowed slightly inwards so the edge is strictly convex.
fn interior_boundary_points(spacing: f32, size: f32) -> Vec<V2<f32>> {
    let subdivisions = edge_subdivisions(spacing, size);
    let bow = |t: f32| EPSILON + CURVATURE * 4.0 * (t - 0.5).powi(2);
    let mut out = vec![];
    for q in 0..subdivisions {
        let t = q as f32 / subdivisions as f32;
        let dx = (size - 2.0 * CURVATURE) * t;
        let dy = bow(t);
        out.push(v2(CURVATURE + dx, dy));
        out.push(v2(size - CURVATURE - dx, size - dy));
    }
    for r in 0..subdivisions {
        let t = r as f32 / subdivisions as f32;
        let dy = (size - 2.0 * CURVATURE) * t;
        let dx = bow(t);
        out.push(v2(dx, size - CURVATURE - dy));
        out.push(v2(size - dx, CURVATURE + dy));
    }
    out
}

/// Bridson's Poisson-disk sampling over the map square. Points added before `fill` seed the
/// active list and constrain the new samples.
struct PoissonSampler {
    spacing: f32,
    index: Index2D,
    cells: Vec<Vec<usize>>,
    points: Vec<V2<f32>>,
}

impl PoissonSampler {
    fn new(spacing: f32) -> PoissonSampler {
        let columns = (MAP_SIZE / (spacing / SQRT_2)).ceil() as usize;
        let index = Index2D::covering(MAP_SIZE, columns);
        PoissonSampler {
            spacing,
            cells: vec![vec![]; index.indices()],
            index,
            points: vec![],
        }
    }

    fn add(&mut self, point: V2<f32>) {
        let cell = self.index.cell_of(&point);
        let cell = cell.y * self.index.columns() + cell.x;
        self.cells[cell].push(self.points.len());
        self.points.push(point);
    }

    fn in_domain(point: &V2<f32>) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= MAP_SIZE && point.y <= MAP_SIZE
    }

    fn far_enough(&self, candidate: &V2<f32>) -> bool {
        let cell = self.index.cell_of(candidate);
        let columns = self.index.columns() as i64;
        let rows = self.index.rows() as i64;
        for dy in -2..=2 {
            for dx in -2..=2 {
                let x = cell.x as i64 + dx;
                let y = cell.y as i64 + dy;
                if x < 0 || y < 0 || x >= columns || y >= rows {
                    continue;
                }
                for point in &self.cells[(y * columns + x) as usize] {
                    if (self.points[*point] - candidate).norm() < self.spacing {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn fill<R: Rng>(&mut self, rng: &mut R) -> Vec<V2<f32>> {
        let first = self.points.len();
        if self.points.is_empty() {
            self.add(v2(rng.gen::<f32>() * MAP_SIZE, rng.gen::<f32>() * MAP_SIZE));
        }
        let mut active: Vec<usize> = (0..self.points.len()).collect();

        while !active.is_empty() {
            let slot = rng.gen_range(0..active.len());
            let centre = self.points[active[slot]];
            let mut found = false;
            for _ in 0..ATTEMPTS {
                let angle = rng.gen::<f32>() * TAU;
                let radius = self.spacing * (1.0 + rng.gen::<f32>());
                let candidate = centre + v2(angle.cos(), angle.sin()) * radius;
                if Self::in_domain(&candidate) && self.far_enough(&candidate) {
                    active.push(self.points.len());
                    self.add(candidate);
                    found = true;
                    break;
                }
            }
            if !found {
                active.swap_remove(slot);
            }
        }

        self.points[first..].to_vec()
    }
}
