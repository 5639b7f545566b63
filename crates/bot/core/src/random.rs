//! Randomized timing.
//!
//! Every random draw in the core goes through an injected [`RngCore`] so the
//! distributions below are reproducible under a fixed seed.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Boxed random source shared by trackers.
pub type BoxedRng = Box<dyn RngCore + Send>;

/// Creates a deterministic random source from a seed.
pub fn seeded_rng(seed: u64) -> BoxedRng {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Creates a random source seeded from the operating system.
pub fn entropy_rng() -> BoxedRng {
    Box::new(StdRng::from_entropy())
}

/// Normally distributed reaction delay clamped into `[min_ms, max_ms]`.
///
/// Models a human reaction-time buffer: most draws land near the mean, and
/// the clamp bounds how early or late a reaction can ever be.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionDelay {
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl ReactionDelay {
    /// Guard early-warning defaults: mean 3.2 s, σ 0.25 s, clamped to [2.5 s, 3.5 s].
    pub const GUARD_EARLY_WARNING: Self = Self {
        mean_ms: 3_200.0,
        std_dev_ms: 250.0,
        min_ms: 2_500,
        max_ms: 3_500,
    };

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Draws one delay.
    ///
    /// A zero (or invalid) standard deviation degenerates to the clamped mean.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let raw = match Normal::new(self.mean_ms, self.std_dev_ms) {
            Ok(normal) if self.std_dev_ms > 0.0 => normal.sample(rng),
            _ => self.mean_ms,
        };
        let lo = self.min_ms.min(self.max_ms) as f64;
        let hi = self.min_ms.max(self.max_ms) as f64;
        let clamped = raw.clamp(lo, hi);
        Duration::from_millis(clamped.round() as u64)
    }
}

impl Default for ReactionDelay {
    fn default() -> Self {
        Self::GUARD_EARLY_WARNING
    }
}

/// Uniformly distributed delay in `[min_ms, max_ms]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl UniformDelay {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.min_ms.min(self.max_ms);
        let hi = self.min_ms.max(self.max_ms);
        Duration::from_millis(rng.gen_range(lo..=hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_delay_stays_within_clamp() {
        let delay = ReactionDelay::GUARD_EARLY_WARNING;
        let mut rng = seeded_rng(7);

        for _ in 0..1_000 {
            let d = delay.sample(&mut rng);
            assert!(d >= delay.min() && d <= delay.max(), "{d:?} out of range");
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let delay = ReactionDelay::GUARD_EARLY_WARNING;
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);

        let left: Vec<_> = (0..16).map(|_| delay.sample(&mut a)).collect();
        let right: Vec<_> = (0..16).map(|_| delay.sample(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn zero_std_dev_returns_clamped_mean() {
        let delay = ReactionDelay {
            mean_ms: 4_000.0,
            std_dev_ms: 0.0,
            min_ms: 2_500,
            max_ms: 3_500,
        };
        let mut rng = seeded_rng(1);
        assert_eq!(delay.sample(&mut rng), Duration::from_millis(3_500));
    }

    #[test]
    fn uniform_delay_tolerates_swapped_bounds() {
        let delay = UniformDelay::new(16_000, 10_000);
        let mut rng = seeded_rng(3);
        let d = delay.sample(&mut rng);
        assert!(d >= Duration::from_millis(10_000) && d <= Duration::from_millis(16_000));
    }
}
