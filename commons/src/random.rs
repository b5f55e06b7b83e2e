use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Linear congruential generator used wherever a sequence must be reproducible from a small
/// integer seed, such as town placement and road shortcuts.
#[derive(Clone, Debug, PartialEq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Lcg {
        Lcg { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform value in `[0, 1]`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }

    /// Index in `0..len`. `len` must be positive.
    pub fn pick(&mut self, len: usize) -> usize {
        let index = (self.next_f64() * len as f64).floor() as usize;
        index.min(len - 1)
    }
}

/// Fisher-Yates shuffle driven by an [`Lcg`], walking from the back of the slice.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut out = items.to_vec();
    let mut lcg = Lcg::new(seed);
    for i in (1..out.len()).rev() {
        let j = (lcg.next_f64() * (i + 1) as f64).floor() as usize;
        out.swap(i, j.min(i));
    }
    out
}

pub fn seeded_rng(seed: u32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(u64::from(seed))
}
