use crate::error::MeshError;
use crate::points::{PointSet, MAP_SIZE};
use commons::{v2, V2};
use delaunator::{triangulate, Point, EMPTY};
use std::ops::Range;

/// Marks a side with no opposite and a region with no incoming side.
pub const UNPAIRED: usize = EMPTY;

const GHOST_OFFSET: f32 = 10.0;

pub fn t_from_s(s: usize) -> usize {
    s / 3
}

pub fn s_next_s(s: usize) -> usize {
    if s % 3 == 2 {
        s - 2
    } else {
        s + 1
    }
}

pub fn s_prev_s(s: usize) -> usize {
    if s % 3 == 0 {
        s + 2
    } else {
        s - 1
    }
}

/// Delaunay triangulation and its Voronoi dual stored as flat arrays. Regions are the input
/// points, triangles the dual vertices and sides the half-edges. One ghost region, placed last,
/// is connected to every hull edge through ghost triangles, so every side has an opposite and
/// every region's ring of triangles is closed.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertex_r: Vec<V2<f32>>,
    vertex_t: Vec<V2<f32>>,
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    s_of_r: Vec<usize>,
    length_s: Vec<f32>,
    is_boundary_t: Vec<bool>,
    num_solid_sides: usize,
    num_boundary_regions: usize,
}

impl Mesh {
    pub fn from_points(point_set: &PointSet) -> Result<Mesh, MeshError> {
        let points = &point_set.points;
        if points.len() < 3 {
            return Err(MeshError::TooFewPoints {
                count: points.len(),
            });
        }

        let delaunay_points: Vec<Point> = points
            .iter()
            .map(|point| Point {
                x: f64::from(point.x),
                y: f64::from(point.y),
            })
            .collect();
        let triangulation = triangulate(&delaunay_points);
        if triangulation.triangles.is_empty() {
            return Err(MeshError::DegenerateTriangulation {
                count: points.len(),
            });
        }

        let num_solid_sides = triangulation.triangles.len();
        let (triangles, halfedges) = add_ghost_structure(
            points.len(),
            triangulation.triangles,
            triangulation.halfedges,
        );

        let mut vertex_r = points.clone();
        vertex_r.push(v2(MAP_SIZE / 2.0, MAP_SIZE / 2.0));

        Mesh::from_parts(
            vertex_r,
            triangles,
            halfedges,
            num_solid_sides,
            point_set.boundary(),
        )
    }

    /// Rebuilds a mesh from its flat arrays. `vertex_r` must already include the ghost region.
    pub fn from_parts(
        vertex_r: Vec<V2<f32>>,
        triangles: Vec<usize>,
        halfedges: Vec<usize>,
        num_solid_sides: usize,
        num_boundary_regions: usize,
    ) -> Result<Mesh, MeshError> {
        check_length("halfedges", halfedges.len(), triangles.len())?;
        check_length("triangles", triangles.len(), triangles.len() / 3 * 3)?;
        if num_solid_sides > triangles.len() {
            return Err(MeshError::InconsistentArrays {
                name: "num_solid_sides",
                actual: num_solid_sides,
                expected: triangles.len(),
            });
        }
        if let Some(r) = triangles.iter().find(|r| **r >= vertex_r.len()) {
            return Err(MeshError::InconsistentArrays {
                name: "vertex_r",
                actual: vertex_r.len(),
                expected: r + 1,
            });
        }
        if let Some(s) = halfedges.iter().find(|s| **s >= triangles.len()) {
            return Err(MeshError::InconsistentArrays {
                name: "halfedges",
                actual: *s,
                expected: triangles.len(),
            });
        }

        let mut out = Mesh {
            vertex_r,
            vertex_t: vec![],
            triangles,
            halfedges,
            s_of_r: vec![],
            length_s: vec![],
            is_boundary_t: vec![],
            num_solid_sides,
            num_boundary_regions,
        };
        out.s_of_r = out.compute_s_of_r();
        out.vertex_t = out.compute_vertex_t();
        out.length_s = (0..out.num_sides())
            .map(|s| (out.position_r(out.r_end_s(s)) - out.position_r(out.r_begin_s(s))).norm())
            .collect();
        out.is_boundary_t = (0..out.num_triangles())
            .map(|t| out.regions_of_t(t).iter().any(|r| out.is_boundary_r(*r)))
            .collect();
        Ok(out)
    }

    fn compute_s_of_r(&self) -> Vec<usize> {
        let mut out = vec![UNPAIRED; self.num_regions()];
        for s in 0..self.num_sides() {
            let endpoint = self.r_end_s(s);
            if out[endpoint] == UNPAIRED || self.halfedges[s] == UNPAIRED {
                out[endpoint] = s;
            }
        }
        out
    }

    fn compute_vertex_t(&self) -> Vec<V2<f32>> {
        (0..self.num_triangles())
            .map(|t| {
                let [a, b, c] = self.regions_of_t(t);
                let a = self.vertex_r[a];
                let b = self.vertex_r[b];
                if self.is_ghost_t(t) {
                    let delta = b - a;
                    let scale = GHOST_OFFSET / delta.norm();
                    (a + b) * 0.5 + v2(delta.y, -delta.x) * scale
                } else {
                    (a + b + self.vertex_r[c]) / 3.0
                }
            })
            .collect()
    }

    pub fn num_regions(&self) -> usize {
        self.vertex_r.len()
    }

    pub fn num_solid_regions(&self) -> usize {
        self.num_regions() - 1
    }

    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    pub fn num_solid_sides(&self) -> usize {
        self.num_solid_sides
    }

    pub fn num_triangles(&self) -> usize {
        self.num_sides() / 3
    }

    pub fn num_solid_triangles(&self) -> usize {
        self.num_solid_sides / 3
    }

    pub fn num_boundary_regions(&self) -> usize {
        self.num_boundary_regions
    }

    pub fn ghost_r(&self) -> usize {
        self.num_regions() - 1
    }

    pub fn position_r(&self, r: usize) -> &V2<f32> {
        &self.vertex_r[r]
    }

    pub fn position_t(&self, t: usize) -> &V2<f32> {
        &self.vertex_t[t]
    }

    pub fn r_begin_s(&self, s: usize) -> usize {
        self.triangles[s]
    }

    pub fn r_end_s(&self, s: usize) -> usize {
        self.triangles[s_next_s(s)]
    }

    pub fn t_inner_s(&self, s: usize) -> usize {
        t_from_s(s)
    }

    pub fn t_outer_s(&self, s: usize) -> usize {
        t_from_s(self.halfedges[s])
    }

    pub fn opposite_s(&self, s: usize) -> usize {
        self.halfedges[s]
    }

    pub fn length_s(&self, s: usize) -> f32 {
        self.length_s[s]
    }

    pub fn regions_of_t(&self, t: usize) -> [usize; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }

    pub fn is_ghost_s(&self, s: usize) -> bool {
        s >= self.num_solid_sides
    }

    pub fn is_ghost_r(&self, r: usize) -> bool {
        r == self.ghost_r()
    }

    pub fn is_ghost_t(&self, t: usize) -> bool {
        self.is_ghost_s(3 * t)
    }

    pub fn is_boundary_r(&self, r: usize) -> bool {
        r < self.num_boundary_regions
    }

    pub fn is_boundary_t(&self, t: usize) -> bool {
        self.is_boundary_t[t]
    }

    /// Sides ending at `r`, walking once around its ring.
    pub fn incoming_sides(&self, r: usize) -> Ring {
        Ring {
            halfedges: &self.halfedges,
            start: self.s_of_r[r],
            incoming: self.s_of_r[r],
        }
    }

    /// Sides starting at `r`.
    pub fn sides_around(&self, r: usize) -> impl Iterator<Item = usize> + '_ {
        self.incoming_sides(r).map(move |s| self.halfedges[s])
    }

    pub fn regions_around(&self, r: usize) -> impl Iterator<Item = usize> + '_ {
        self.incoming_sides(r).map(move |s| self.r_begin_s(s))
    }

    pub fn triangles_around(&self, r: usize) -> impl Iterator<Item = usize> + '_ {
        self.incoming_sides(r).map(t_from_s)
    }

    /// Each neighbouring region with the side leading from `r` to it.
    pub fn neighbours(&self, r: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.incoming_sides(r)
            .map(move |s| (self.halfedges[s], self.r_begin_s(s)))
    }

    /// Non-ghost neighbours. A hull side between two solid regions counts in both directions,
    /// even though one of its halves belongs to a ghost triangle.
    pub fn solid_neighbours(&self, r: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbours(r)
            .filter(move |(_, next)| !self.is_ghost_r(*next))
    }

    pub fn side_between(&self, from: usize, to: usize) -> Option<usize> {
        self.neighbours(from)
            .find(|(_, r)| *r == to)
            .map(|(s, _)| s)
    }

    pub fn peak_triangles(&self, regions: Range<usize>) -> Vec<usize> {
        regions
            .filter(|r| *r < self.num_regions() && self.s_of_r[*r] != UNPAIRED)
            .map(|r| self.t_inner_s(self.s_of_r[r]))
            .collect()
    }

    pub fn vertex_r(&self) -> &[V2<f32>] {
        &self.vertex_r
    }

    pub fn vertex_t(&self) -> &[V2<f32>] {
        &self.vertex_t
    }

    pub fn triangles(&self) -> &[usize] {
        &self.triangles
    }

    pub fn halfedges(&self) -> &[usize] {
        &self.halfedges
    }

    pub fn s_of_r(&self) -> &[usize] {
        &self.s_of_r
    }

    pub fn lengths(&self) -> &[f32] {
        &self.length_s
    }

    pub fn boundary_triangles(&self) -> &[bool] {
        &self.is_boundary_t
    }
}

fn check_length(name: &'static str, actual: usize, expected: usize) -> Result<(), MeshError> {
    if actual == expected {
        Ok(())
    } else {
        Err(MeshError::InconsistentArrays {
            name,
            actual,
            expected,
        })
    }
}

/// Walks the incoming sides of a region until it returns to the first one or reaches an
/// unpaired side.
pub struct Ring<'a> {
    halfedges: &'a [usize],
    start: usize,
    incoming: usize,
}

impl<'a> Iterator for Ring<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.incoming == UNPAIRED {
            return None;
        }
        let incoming = self.incoming;
        let next = self.halfedges[s_next_s(incoming)];
        self.incoming = if next == self.start { UNPAIRED } else { next };
        Some(incoming)
    }
}

/// Pairs every hull side with a ghost triangle whose third corner is the ghost region
/// `r_ghost`, then links consecutive ghost triangles around the hull.
fn add_ghost_structure(
    r_ghost: usize,
    mut triangles: Vec<usize>,
    mut halfedges: Vec<usize>,
) -> (Vec<usize>, Vec<usize>) {
    let num_solid_sides = triangles.len();

    let mut unpaired = 0;
    let mut first_unpaired = UNPAIRED;
    let mut unpaired_starting_at = vec![UNPAIRED; r_ghost];
    for s in 0..num_solid_sides {
        if halfedges[s] == UNPAIRED {
            unpaired += 1;
            unpaired_starting_at[triangles[s]] = s;
            first_unpaired = s;
        }
    }

    triangles.resize(num_solid_sides + 3 * unpaired, 0);
    halfedges.resize(num_solid_sides + 3 * unpaired, UNPAIRED);

    let mut s = first_unpaired;
    for i in 0..unpaired {
        let s_ghost = num_solid_sides + 3 * i;
        halfedges[s] = s_ghost;
        halfedges[s_ghost] = s;
        triangles[s_ghost] = triangles[s_next_s(s)];
        triangles[s_ghost + 1] = triangles[s];
        triangles[s_ghost + 2] = r_ghost;
        let k = num_solid_sides + (3 * i + 4) % (3 * unpaired);
        halfedges[s_ghost + 2] = k;
        halfedges[k] = s_ghost + 2;
        s = unpaired_starting_at[triangles[s_next_s(s)]];
    }

    (triangles, halfedges)
}
