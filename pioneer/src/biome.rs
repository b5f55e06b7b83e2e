use crate::points::MAP_SIZE;
use commons::random::seeded_shuffle;
use commons::simplex::SimplexNoise;
use commons::V2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;

const INNER_RADIUS: f32 = 282.0;
const RADIUS_NOISE: f32 = 65.0;
const ANGLE_NOISE: f32 = 0.35;
const ELEVATION_INFLUENCE: f32 = 0.12;
const NOISE_SCALE: f32 = 3.0 / MAP_SIZE;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Biome {
    Grasslands,
    Tundra,
    Desert,
    Badlands,
}

/// Order in which towns are allotted to biomes.
pub const BIOME_ORDER: [Biome; 4] = [
    Biome::Grasslands,
    Biome::Tundra,
    Biome::Desert,
    Biome::Badlands,
];

const OUTER_BIOMES: [Biome; 3] = [Biome::Tundra, Biome::Desert, Biome::Badlands];

impl Biome {
    pub fn name(&self) -> &'static str {
        match self {
            Biome::Grasslands => "grasslands",
            Biome::Tundra => "tundra",
            Biome::Desert => "desert",
            Biome::Badlands => "badlands",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Grasslands in the middle of the map, with the outer ring split into three sectors. Both
/// boundaries wobble with noise and the inner one follows the terrain a little.
pub struct BiomeLayout {
    noise: SimplexNoise,
    sectors: Vec<Biome>,
}

impl BiomeLayout {
    pub fn new(seed: u32) -> BiomeLayout {
        BiomeLayout {
            noise: SimplexNoise::new(seed),
            sectors: seeded_shuffle(&OUTER_BIOMES, seed),
        }
    }

    pub fn sectors(&self) -> &[Biome] {
        &self.sectors
    }

    pub fn biome_at(&self, position: &V2<f32>, elevation: Option<f32>) -> Biome {
        let centre = MAP_SIZE / 2.0;
        let dx = position.x - centre;
        let dy = position.y - centre;
        let distance = (dx * dx + dy * dy).sqrt();

        let nx = position.x * NOISE_SCALE;
        let ny = position.y * NOISE_SCALE;
        let elevation_offset = elevation
            .map(|e| (e - 0.3) * ELEVATION_INFLUENCE * 80.0)
            .unwrap_or(0.0);
        let radius = INNER_RADIUS + self.noise.get(nx, ny) * RADIUS_NOISE + elevation_offset;
        if distance < radius {
            return Biome::Grasslands;
        }

        let angle = dy.atan2(dx);
        let angle = if angle >= 0.0 { angle } else { angle + TAU };
        let angle = (angle + self.noise.get(nx + 50.0, ny + 70.0) * ANGLE_NOISE).rem_euclid(TAU);
        let sector = ((angle / TAU * 3.0).floor() as usize) % 3;
        self.sectors[sector]
    }
}

pub fn biome_at(x: f32, y: f32, seed: u32, elevation: Option<f32>) -> Biome {
    BiomeLayout::new(seed).biome_at(&commons::v2(x, y), elevation)
}

#[cfg(test)]
mod tests {

    use super::*;
    use commons::v2;
    use std::collections::HashSet;

    #[test]
    fn centre_should_be_grasslands() {
        for seed in 0..10 {
            assert_eq!(biome_at(500.0, 500.0, seed, None), Biome::Grasslands);
        }
    }

    #[test]
    fn sectors_should_be_permutation_of_outer_biomes() {
        let layout = BiomeLayout::new(42);
        let sectors: HashSet<Biome> = layout.sectors().iter().copied().collect();
        assert_eq!(sectors.len(), 3);
        assert!(!sectors.contains(&Biome::Grasslands));
    }

    #[test]
    fn corners_should_be_outer_biomes() {
        let layout = BiomeLayout::new(7);
        for corner in [v2(0.0, 0.0), v2(1000.0, 0.0), v2(0.0, 1000.0), v2(1000.0, 1000.0)].iter() {
            assert_ne!(layout.biome_at(corner, None), Biome::Grasslands);
        }
    }

    #[test]
    fn outer_ring_should_use_all_sectors() {
        let layout = BiomeLayout::new(7);
        let biomes: HashSet<Biome> = (0..36)
            .map(|i| {
                let angle = i as f32 * TAU / 36.0;
                layout.biome_at(&v2(500.0 + 480.0 * angle.cos(), 500.0 + 480.0 * angle.sin()), None)
            })
            .collect();
        assert_eq!(biomes.len(), 3);
    }

    #[test]
    fn layout_should_be_deterministic() {
        let a = BiomeLayout::new(3);
        let b = BiomeLayout::new(3);
        for x in (0..1000).step_by(50) {
            for y in (0..1000).step_by(50) {
                let position = v2(x as f32, y as f32);
                assert_eq!(a.biome_at(&position, Some(0.2)), b.biome_at(&position, Some(0.2)));
            }
        }
    }

    #[test]
    fn display_should_use_name() {
        assert_eq!(Biome::Badlands.to_string(), "badlands");
    }
}
