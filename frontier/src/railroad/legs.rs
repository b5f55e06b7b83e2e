use super::{Railroad, Waypoint};
use commons::V2;
use pioneer::Mesh;

/// Leg of every path index, for a path that visits `stations` in order. Leg `i` runs from
/// station `i` to station `i + 1`; a path index at a station belongs to the leg arriving there.
pub fn leg_for_path_index(path: &[usize], stations: &[usize]) -> Vec<usize> {
    let n = stations.len();
    if n < 2 || path.is_empty() {
        return vec![];
    }
    let mut out = Vec::with_capacity(path.len());
    let mut leg = 0;
    for r in path {
        out.push(leg);
        if *r == stations[(leg + 1) % n] {
            leg = (leg + 1) % n;
        }
    }
    out
}

fn nearest_index(mesh: &Mesh, regions: &[usize], position: &V2<f32>) -> Option<usize> {
    regions
        .iter()
        .enumerate()
        .map(|(i, r)| (i, (mesh.position_r(*r) - position).norm_squared()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Leg nearest to `position`. A `region` that lies on a leg settles it directly.
pub fn nearest_leg(
    mesh: &Mesh,
    railroad: &Railroad,
    region: Option<usize>,
    position: &V2<f32>,
) -> Option<usize> {
    if let Some(region) = region {
        if let Some(leg) = railroad
            .legs
            .iter()
            .find(|leg| leg.regions.contains(&region))
        {
            return Some(leg.index);
        }
    }
    railroad
        .legs
        .iter()
        .filter_map(|leg| {
            nearest_index(mesh, &leg.regions, position).map(|i| {
                let distance = (mesh.position_r(leg.regions[i]) - position).norm_squared();
                (leg.index, distance)
            })
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(leg, _)| leg)
}

/// Where a new waypoint near `position` belongs among the existing waypoints of `leg_index`:
/// the number of them that the leg passes before its region closest to `position`.
pub fn waypoint_insertion_index(
    mesh: &Mesh,
    railroad: &Railroad,
    leg_index: usize,
    waypoints: &[Waypoint],
    position: &V2<f32>,
) -> usize {
    let leg = match railroad.legs.iter().find(|leg| leg.index == leg_index) {
        Some(leg) => leg,
        None => return 0,
    };
    let nearest = match nearest_index(mesh, &leg.regions, position) {
        Some(nearest) => nearest,
        None => return 0,
    };
    waypoints
        .iter()
        .filter(|waypoint| waypoint.leg_index == leg_index)
        .filter_map(|waypoint| leg.regions.iter().position(|r| *r == waypoint.region))
        .filter(|index| *index < nearest)
        .count()
}
