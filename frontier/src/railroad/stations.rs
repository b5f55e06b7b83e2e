use commons::V2;
use pioneer::Mesh;
use std::collections::{HashSet, VecDeque};

/// First region reached outside the town radius when searching outwards from the town centre,
/// or the centre itself when the whole reachable mesh lies within the radius.
pub fn station_region(mesh: &Mesh, centre: usize, radius: f32) -> usize {
    let position = *mesh.position_r(centre);
    let radius_squared = radius * radius;
    let mut visited = HashSet::new();
    visited.insert(centre);
    let mut queue = VecDeque::new();
    queue.push_back(centre);
    while let Some(r) = queue.pop_front() {
        for (_, next) in mesh.solid_neighbours(r) {
            if !visited.insert(next) {
                continue;
            }
            if (mesh.position_r(next) - position).norm_squared() > radius_squared {
                return next;
            }
            queue.push_back(next);
        }
    }
    centre
}

/// Indices of `towns` in tour order: anticlockwise around the centroid of the towns, starting
/// just after the shortest step between consecutive stations.
pub fn tour_order(mesh: &Mesh, towns: &[usize], stations: &[usize]) -> Vec<usize> {
    let n = towns.len();
    if n < 2 {
        return (0..n).collect();
    }
    let centroid = towns
        .iter()
        .fold(V2::new(0.0, 0.0), |sum, town| sum + mesh.position_r(*town))
        / n as f32;
    let angle = |town: usize| {
        let offset = mesh.position_r(town) - centroid;
        offset.y.atan2(offset.x)
    };
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| angle(towns[*a]).total_cmp(&angle(towns[*b])));

    let closing_length = |k: usize| {
        let last = stations[order[(k + n - 1) % n]];
        let first = stations[order[k]];
        (mesh.position_r(first) - mesh.position_r(last)).norm()
    };
    let start = (0..n)
        .min_by(|a, b| closing_length(*a).total_cmp(&closing_length(*b)))
        .unwrap_or(0);
    order.rotate_left(start);
    order
}
