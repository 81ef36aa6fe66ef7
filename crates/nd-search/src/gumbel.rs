use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f32 = 1e-30;

/// Gumbel noise for stochastic beam search.
///
/// Subtracting Gumbel(0, 1) samples from losses before top-k selection turns
/// the deterministic pruning into sampling without replacement.
pub struct GumbelNoise {
    rng: StdRng,
}

impl GumbelNoise {
    /// Create a noise source with the given seed for reproducibility.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one Gumbel(0, 1) sample.
    pub fn sample(&mut self) -> f32 {
        let u: f32 = self.rng.gen_range(0.0..1.0);
        -(-(u + EPS).ln() + EPS).ln()
    }

    /// Subtract a fresh sample from every loss.
    pub fn perturb(&mut self, losses: &mut [f32]) {
        for loss in losses.iter_mut() {
            *loss -= self.sample();
        }
    }
}
