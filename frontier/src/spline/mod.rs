mod cardinal;
mod corners;
mod loops;
mod samples;
mod simplify;
mod strip;

pub use cardinal::{cardinal, fine_samples_closed, fine_samples_open};
pub use corners::round_corners;
pub use hit_test::{
    distance_point_to_segment, distance_to_spline, is_point_on_spline, MESH_TO_WORLD,
    SPLINE_HIT_THRESHOLD_WORLD,
};
pub use loops::{remove_self_intersections, segments_intersect};
pub use samples::{cap, resample_by_arc_length, smooth_closed, thin};
pub use simplify::{simplify, Simplified};
pub use strip::{build_strip_mesh, StripMesh, SUBDIVISIONS_PER_SEGMENT, TILE_MESH, TILE_WORLD_PX};

use commons::V2;
use pioneer::Mesh;
use serde::{Deserialize, Serialize};

pub const SIMPLIFY_TOLERANCE: f32 = 6.0;
pub const ARC_RADIUS: f32 = 28.0;
pub const MIN_SAMPLE_SPACING: f32 = 3.0;
pub const SMOOTHING_ITERATIONS: usize = 2;
pub const SMOOTHING_LAMBDA: f32 = 0.45;
/// Samples this close to a station position are not smoothed.
pub const STATION_PIN_DISTANCE: f32 = 0.1;
pub const MAX_SPLINE_SAMPLES: usize = 1200;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplineSample {
    pub position: V2<f32>,
    /// Heading in radians.
    pub angle: f32,
    pub cumulative_length: f32,
}

/// Runs of consecutive mesh-adjacent regions, dropping runs shorter than two regions.
pub fn split_path_into_segments(mesh: &Mesh, path: &[usize]) -> Vec<Vec<usize>> {
    let mut out = vec![];
    let mut current: Vec<usize> = vec![];
    for r in path.iter().copied() {
        if let Some(last) = current.last() {
            if mesh.side_between(*last, r).is_none() {
                if current.len() >= 2 {
                    out.push(current);
                }
                current = vec![];
            }
        }
        current.push(r);
    }
    if current.len() >= 2 {
        out.push(current);
    }
    out
}

fn is_closed(path: &[usize]) -> bool {
    path.len() >= 3 && path.first() == path.last()
}

/// Smooth curve through the region centres of `path`, passing through every station on it.
/// A path that ends where it starts gives a closed curve whose last sample repeats the first.
pub fn build_spline_samples(mesh: &Mesh, path: &[usize], stations: &[usize]) -> Vec<SplineSample> {
    if path.len() < 2 {
        return vec![];
    }
    let closed = is_closed(path);
    let regions = if closed {
        &path[..path.len() - 1]
    } else {
        path
    };
    let points: Vec<V2<f32>> = regions.iter().map(|r| *mesh.position_r(*r)).collect();
    let preserve: Vec<usize> = (0..regions.len())
        .filter(|i| stations.contains(&regions[*i]))
        .collect();

    let Simplified {
        mut points,
        mut preserved,
    } = simplify(&points, SIMPLIFY_TOLERANCE, &preserve);
    if closed {
        let (untangled, remapped) = remove_self_intersections(&points, &preserved);
        points = untangled;
        preserved = remapped;
    }
    let points = round_corners(&points, closed, ARC_RADIUS, &preserved);

    let closed_curve = closed && points.len() >= 3;
    let fine = if closed_curve {
        fine_samples_closed(&points)
    } else {
        fine_samples_open(&points)
    };
    let mut samples = thin(&fine, MIN_SAMPLE_SPACING);
    if closed_curve {
        let station_positions: Vec<&V2<f32>> =
            stations.iter().map(|r| mesh.position_r(*r)).collect();
        let pinned: Vec<usize> = (0..samples.len())
            .filter(|i| {
                let position = samples[*i].position;
                station_positions.iter().any(|station| {
                    (position.x - station.x).abs() < STATION_PIN_DISTANCE
                        && (position.y - station.y).abs() < STATION_PIN_DISTANCE
                })
            })
            .collect();
        samples = smooth_closed(&samples, SMOOTHING_ITERATIONS, SMOOTHING_LAMBDA, &pinned);
    }
    let samples = cap(&samples, MAX_SPLINE_SAMPLES);
    if samples.len() >= 2 {
        samples
    } else {
        vec![]
    }
}
