use crate::mesh::Mesh;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const OCEAN_ELEVATION: f32 = -0.1;

/// Where water leaves each triangle, and the order in which triangles were reached from the
/// ocean. Walking the order backwards visits every tributary before its trunk.
pub trait Downslope {
    fn downslope(&self, t: usize) -> Option<usize>;
    fn order(&self) -> &[usize];
}

#[derive(Clone, Debug, PartialEq)]
pub struct DownhillMap {
    downslope: Vec<Option<usize>>,
    order: Vec<usize>,
}

#[derive(PartialEq)]
struct Node {
    triangle: usize,
    elevation: f32,
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Node) -> Ordering {
        other
            .elevation
            .total_cmp(&self.elevation)
            .then_with(|| other.triangle.cmp(&self.triangle))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Node) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl DownhillMap {
    pub fn new(mesh: &Mesh, elevation_t: &[f32]) -> DownhillMap {
        let mut out = DownhillMap {
            downslope: vec![None; mesh.num_triangles()],
            order: Vec::with_capacity(mesh.num_triangles()),
        };
        let mut reached = vec![false; mesh.num_triangles()];
        let mut heap = BinaryHeap::new();

        for (t, elevation) in elevation_t.iter().enumerate() {
            if *elevation < OCEAN_ELEVATION {
                out.downslope[t] = lowest_outer_side(mesh, elevation_t, t);
                out.order.push(t);
                reached[t] = true;
                heap.push(Node {
                    triangle: t,
                    elevation: *elevation,
                });
            }
        }

        while let Some(Node { triangle, .. }) = heap.pop() {
            for s in 3 * triangle..3 * triangle + 3 {
                let neighbour = mesh.t_outer_s(s);
                if !reached[neighbour] {
                    reached[neighbour] = true;
                    out.downslope[neighbour] = Some(mesh.opposite_s(s));
                    out.order.push(neighbour);
                    heap.push(Node {
                        triangle: neighbour,
                        elevation: elevation_t[neighbour],
                    });
                }
            }
        }

        out
    }

    pub fn downslope_t(&self) -> &[Option<usize>] {
        &self.downslope
    }
}

fn lowest_outer_side(mesh: &Mesh, elevation_t: &[f32], t: usize) -> Option<usize> {
    let mut best = None;
    let mut lowest = elevation_t[t];
    for s in 3 * t..3 * t + 3 {
        let e = elevation_t[mesh.t_outer_s(s)];
        if e < lowest {
            lowest = e;
            best = Some(s);
        }
    }
    best
}

impl Downslope for DownhillMap {
    fn downslope(&self, t: usize) -> Option<usize> {
        self.downslope[t]
    }

    fn order(&self) -> &[usize] {
        &self.order
    }
}

#[cfg(test)]
pub struct MockDownhillMap {
    downslope: Vec<Option<usize>>,
    order: Vec<usize>,
}

#[cfg(test)]
impl MockDownhillMap {
    pub fn new(downslope: Vec<Option<usize>>, order: Vec<usize>) -> MockDownhillMap {
        MockDownhillMap { downslope, order }
    }
}

#[cfg(test)]
impl Downslope for MockDownhillMap {
    fn downslope(&self, t: usize) -> Option<usize> {
        self.downslope[t]
    }

    fn order(&self) -> &[usize] {
        &self.order
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::mesh::t_from_s;
    use crate::points::choose_points;

    fn mesh() -> Mesh {
        Mesh::from_points(&choose_points(11, 50.0, 150.0).unwrap()).unwrap()
    }

    fn bowl(mesh: &Mesh) -> Vec<f32> {
        (0..mesh.num_triangles())
            .map(|t| {
                if mesh.is_ghost_t(t) {
                    return -1.0;
                }
                let position = mesh.position_t(t);
                let dx = position.x - 500.0;
                let dy = position.y - 500.0;
                0.5 - (dx * dx + dy * dy).sqrt() / 500.0
            })
            .collect()
    }

    #[test]
    fn every_triangle_should_be_reached_once() {
        let mesh = mesh();
        let downhill = DownhillMap::new(&mesh, &bowl(&mesh));
        let mut order = downhill.order().to_vec();
        order.sort_unstable();
        order.dedup();
        assert_eq!(order.len(), mesh.num_triangles());
        assert_eq!(downhill.order().len(), mesh.num_triangles());
    }

    #[test]
    fn land_should_drain_to_earlier_triangle() {
        let mesh = mesh();
        let elevation = bowl(&mesh);
        let downhill = DownhillMap::new(&mesh, &elevation);
        let mut position = vec![0; mesh.num_triangles()];
        for (i, t) in downhill.order().iter().enumerate() {
            position[*t] = i;
        }
        for t in 0..mesh.num_triangles() {
            if let Some(s) = downhill.downslope(t) {
                assert_eq!(t_from_s(s), t);
                let trunk = mesh.t_outer_s(s);
                assert!(position[trunk] < position[t]);
            } else {
                assert!(elevation[t] < OCEAN_ELEVATION);
            }
        }
    }

    #[test]
    fn dry_map_should_have_no_order() {
        let mesh = mesh();
        let downhill = DownhillMap::new(&mesh, &vec![0.5; mesh.num_triangles()]);
        assert!(downhill.order().is_empty());
        assert!(downhill.downslope_t().iter().all(|s| s.is_none()));
    }

    #[test]
    fn ocean_should_drain_to_lowest_neighbour() {
        let mesh = mesh();
        let mut elevation = vec![-0.5; mesh.num_triangles()];
        let t = 0;
        let s = 1;
        elevation[mesh.t_outer_s(s)] = -0.9;
        let downhill = DownhillMap::new(&mesh, &elevation);
        assert_eq!(downhill.downslope(t), Some(s));
    }
}
