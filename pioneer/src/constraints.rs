use commons::simplex::{octave_weights, SimplexNoise};
use commons::M;

pub const CONSTRAINT_SIZE: usize = 128;

/// Coarse elevation painting that the mesh elevation follows, in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationConstraints {
    elevation: M<f32>,
}

impl ElevationConstraints {
    pub fn new(elevation: M<f32>) -> ElevationConstraints {
        ElevationConstraints { elevation }
    }

    /// Island shape from fractal noise, with ridges raised on land.
    pub fn procedural(seed: u32, island: f32) -> ElevationConstraints {
        let noise = SimplexNoise::new(seed);
        let weights = octave_weights(5, 0.5);
        let size = CONSTRAINT_SIZE;
        let elevation = M::from_fn(size, size, |x, y| {
            let nx = 2.0 * x as f32 / size as f32 - 1.0;
            let ny = 2.0 * y as f32 / size as f32 - 1.0;
            let distance = nx.abs().max(ny.abs());
            let e = 0.5 * (noise.stacked(nx, ny, &weights) + island * (0.75 - 2.0 * distance * distance));
            let e = e.max(-1.0).min(1.0);
            if e <= 0.0 {
                return e;
            }
            let m = 0.5 * noise.get(nx + 30.0, ny + 50.0)
                + 0.5 * noise.get(2.0 * nx + 33.0, 2.0 * ny + 55.0);
            let mountain = (e * 5.0).min(1.0) * (1.0 - m.abs() / 0.5);
            if mountain > 0.0 {
                e.max((e * 3.0).min(mountain))
            } else {
                e
            }
        });
        ElevationConstraints { elevation }
    }

    pub fn size(&self) -> usize {
        self.elevation.nrows()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.elevation[(x, y)]
    }

    /// Bilinear sample at normalised coordinates, clamped to the grid.
    pub fn at(&self, x: f32, y: f32) -> f32 {
        let size = self.size();
        if size < 2 {
            return self.elevation.get((0, 0)).copied().unwrap_or(0.0);
        }
        let max = (size - 2) as f32;
        let x = (x * (size - 1) as f32).max(0.0).min(max);
        let y = (y * (size - 1) as f32).max(0.0).min(max);
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;
        let e00 = self.get(x0, y0);
        let e01 = self.get(x0 + 1, y0);
        let e10 = self.get(x0, y0 + 1);
        let e11 = self.get(x0 + 1, y0 + 1);
        (e00 * (1.0 - fx) + e01 * fx) * (1.0 - fy) + (e10 * (1.0 - fx) + e11 * fx) * fy
    }
}
