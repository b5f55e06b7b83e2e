use noise::{NoiseFn, OpenSimplex, Seedable};

/// Seeded 2D simplex noise sampled at arbitrary points.
pub struct SimplexNoise {
    noise: OpenSimplex,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> SimplexNoise {
        SimplexNoise {
            noise: OpenSimplex::new().set_seed(seed),
        }
    }

    pub fn get(&self, x: f32, y: f32) -> f32 {
        self.noise.get([f64::from(x), f64::from(y)]) as f32
    }

    /// Sum of octaves `i` sampled at frequency `2^i` and weighted by `frequency_weights[i]`,
    /// normalised by the total weight.
    pub fn stacked(&self, x: f32, y: f32, frequency_weights: &[f32]) -> f32 {
        let total: f32 = frequency_weights.iter().sum();
        if total == 0.0 {
            return 0.0;
        }
        frequency_weights
            .iter()
            .enumerate()
            .filter(|(_, weight)| **weight != 0.0)
            .map(|(i, weight)| {
                let frequency = (1 << i) as f32;
                self.get(x * frequency, y * frequency) * weight
            })
            .sum::<f32>()
            / total
    }
}

/// Weights for `octaves` octaves with each octave `persistence` times the previous.
pub fn octave_weights(octaves: usize, persistence: f32) -> Vec<f32> {
    (0..octaves).map(|i| persistence.powi(i as i32)).collect()
}
