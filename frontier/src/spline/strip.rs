use super::hit_test::MESH_TO_WORLD;
use super::SplineSample;
use commons::{lerp, Almost, V2};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Track texture tile length in world pixels.
pub const TILE_WORLD_PX: f32 = 1024.0;
/// Track texture tile length in mesh units, also the strip width.
pub const TILE_MESH: f32 = TILE_WORLD_PX / MESH_TO_WORLD;
pub const SUBDIVISIONS_PER_SEGMENT: usize = 4;

/// Triangle strip in world coordinates. `positions` and `uvs` hold two values per vertex;
/// vertices alternate left and right of the curve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StripMesh {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Copy)]
struct Ring {
    left: V2<f32>,
    right: V2<f32>,
    u: f32,
}

impl Ring {
    fn new(sample: &SplineSample) -> Ring {
        let across = sample.angle + FRAC_PI_2;
        let offset = V2::new(across.cos(), across.sin()) * (TILE_MESH / 2.0);
        Ring {
            left: (sample.position - offset) * MESH_TO_WORLD,
            right: (sample.position + offset) * MESH_TO_WORLD,
            u: sample.cumulative_length / TILE_MESH,
        }
    }

    fn towards(&self, other: &Ring, t: f32) -> Ring {
        Ring {
            left: lerp(&self.left, &other.left, t),
            right: lerp(&self.right, &other.right, t),
            u: self.u + (other.u - self.u) * t,
        }
    }
}

fn subdivide(from: &Ring, to: &Ring, out: &mut Vec<Ring>) {
    let parts = SUBDIVISIONS_PER_SEGMENT.max(1);
    for k in 1..=parts {
        out.push(from.towards(to, k as f32 / (parts + 1) as f32));
    }
    out.push(*to);
}

/// Textured strip following `samples`, with texture coordinates repeating every tile along the
/// arc length. A closed curve whose samples do not already end on the first sample is joined
/// back to it.
pub fn build_strip_mesh(samples: &[SplineSample], closed: bool) -> StripMesh {
    if samples.len() < 2 {
        return StripMesh::default();
    }
    let rings: Vec<Ring> = samples.iter().map(Ring::new).collect();
    let mut expanded = vec![rings[0]];
    for pair in rings.windows(2) {
        subdivide(&pair[0], &pair[1], &mut expanded);
    }
    let first = &samples[0].position;
    let last = &samples[samples.len() - 1].position;
    if closed && rings.len() >= 3 && !last.almost(first) {
        subdivide(&rings[rings.len() - 1], &rings[0], &mut expanded);
    }

    let mut strip = StripMesh::default();
    for ring in expanded.iter() {
        strip.positions.extend_from_slice(&[ring.left.x, ring.left.y, ring.right.x, ring.right.y]);
        strip.uvs.extend_from_slice(&[ring.u, 0.0, ring.u, 1.0]);
    }
    for j in 0..expanded.len() as u32 - 1 {
        let (a, b) = (2 * j, 2 * (j + 1));
        strip.indices.extend_from_slice(&[a, a + 1, b + 1, a, b + 1, b]);
    }
    strip
}
