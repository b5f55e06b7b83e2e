use crate::constraints::ElevationConstraints;
use crate::mesh::Mesh;
use crate::points::MAP_SIZE;
use commons::rand::Rng;
use commons::random::seeded_rng;
use commons::simplex::SimplexNoise;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const MOUNTAIN_SLOPE: f32 = 16.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElevationParams {
    pub seed: u32,
    pub island: f32,
    pub noisy_coastlines: f32,
    pub hill_height: f32,
    pub mountain_jagged: f32,
    pub mountain_sharpness: f32,
    pub mountain_folds: f32,
    pub ocean_depth: f32,
}

impl Default for ElevationParams {
    fn default() -> ElevationParams {
        ElevationParams {
            seed: 187,
            island: 0.5,
            noisy_coastlines: 0.01,
            hill_height: 0.02,
            mountain_jagged: 0.0,
            mountain_sharpness: 9.8,
            mountain_folds: 0.05,
            ocean_depth: 1.4,
        }
    }
}

/// Noise octaves sampled once per triangle for a given seed.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleNoise {
    pub n0: Vec<f32>,
    pub n1: Vec<f32>,
    pub n2: Vec<f32>,
    pub n4: Vec<f32>,
    pub n5: Vec<f32>,
    pub n6: Vec<f32>,
}

impl TriangleNoise {
    pub fn new(mesh: &Mesh, seed: u32) -> TriangleNoise {
        let noise = SimplexNoise::new(seed);
        let half = MAP_SIZE / 2.0;
        let mut out = TriangleNoise {
            n0: Vec::with_capacity(mesh.num_triangles()),
            n1: Vec::with_capacity(mesh.num_triangles()),
            n2: Vec::with_capacity(mesh.num_triangles()),
            n4: Vec::with_capacity(mesh.num_triangles()),
            n5: Vec::with_capacity(mesh.num_triangles()),
            n6: Vec::with_capacity(mesh.num_triangles()),
        };
        for t in 0..mesh.num_triangles() {
            let position = mesh.position_t(t);
            let nx = (position.x - half) / half;
            let ny = (position.y - half) / half;
            out.n0.push(noise.get(nx, ny));
            out.n1.push(noise.get(2.0 * nx + 5.0, 2.0 * ny + 5.0));
            out.n2.push(noise.get(4.0 * nx + 7.0, 4.0 * ny + 7.0));
            out.n4.push(noise.get(16.0 * nx + 15.0, 16.0 * ny + 15.0));
            out.n5.push(noise.get(32.0 * nx + 31.0, 32.0 * ny + 31.0));
            out.n6.push(noise.get(64.0 * nx + 67.0, 64.0 * ny + 67.0));
        }
        out
    }
}

/// Distance from the nearest peak triangle, walking outwards across triangle sides. Each step
/// is `spacing`, perturbed by up to `jaggedness` in either direction. Triangles that cannot be
/// reached are infinitely far.
pub fn mountain_distance(
    mesh: &Mesh,
    peaks: &[usize],
    spacing: f32,
    jaggedness: f32,
    seed: u32,
) -> Vec<f32> {
    let mut rng = seeded_rng(seed);
    let mut out = vec![f32::INFINITY; mesh.num_triangles()];
    let mut queue = VecDeque::new();
    for peak in peaks {
        if out[*peak].is_infinite() {
            out[*peak] = 0.0;
            queue.push_back(*peak);
        }
    }
    while let Some(current) = queue.pop_front() {
        for s in 3 * current..3 * current + 3 {
            let neighbour = mesh.t_outer_s(s);
            if out[neighbour].is_infinite() {
                let increment =
                    spacing * (1.0 + jaggedness * (rng.gen::<f32>() - rng.gen::<f32>()));
                out[neighbour] = out[current] + increment;
                queue.push_back(neighbour);
            }
        }
    }
    out
}

pub fn triangle_elevation(
    mesh: &Mesh,
    params: &ElevationParams,
    constraints: &ElevationConstraints,
    noise: &TriangleNoise,
    mountain_distance: &[f32],
) -> Vec<f32> {
    let mut out = vec![0.0; mesh.num_triangles()];

    for (t, elevation) in out.iter_mut().enumerate().take(mesh.num_solid_triangles()) {
        let position = mesh.position_t(t);
        let e = constraints.at(position.x / MAP_SIZE, position.y / MAP_SIZE);
        *elevation = e
            + params.noisy_coastlines
                * (1.0 - e.powi(4))
                * (noise.n4[t] + noise.n5[t] / 2.0 + noise.n6[t] / 4.0);
    }

    let sharpness = 2f32.powf(params.mountain_sharpness);
    for (t, elevation) in out.iter_mut().enumerate() {
        let mut e = *elevation;
        if e > 0.0 {
            let noisiness = 1.0 - 0.5 * (1.0 + noise.n0[t]);
            let hills = ((1.0 + noisiness * noise.n4[t] + (1.0 - noisiness) * noise.n2[t])
                * params.hill_height)
                .max(0.01);
            let mountains = (1.0 - (MOUNTAIN_SLOPE / sharpness) * mountain_distance[t]).max(0.01);
            let weight = e * e;
            e = (1.0 - weight) * hills + weight * mountains;
        } else {
            e *= params.ocean_depth + noise.n1[t];
        }
        *elevation = e.max(-1.0).min(1.0);
    }

    out
}

/// Mean elevation of the triangles around each region. A region touching water is kept just
/// below sea level even when the mean is not.
pub fn region_elevation(mesh: &Mesh, elevation_t: &[f32]) -> Vec<f32> {
    (0..mesh.num_regions())
        .map(|r| {
            let mut count = 0;
            let mut sum = 0.0;
            let mut water = false;
            for t in mesh.triangles_around(r) {
                sum += elevation_t[t];
                water = water || elevation_t[t] < 0.0;
                count += 1;
            }
            if count == 0 {
                return 0.0;
            }
            let e = sum / count as f32;
            if water && e >= 0.0 {
                -0.001
            } else {
                e
            }
        })
        .collect()
}
