//! Pluggable randomness for weather shifts, jitter, and the sky simulator.
//!
//! Every stochastic rule in the simulation draws from a [`NoiseSource`]
//! rather than an ambient generator. Production sessions wrap a seeded
//! [`rand`] generator in [`RngNoise`]; tests use [`StillNoise`] to switch
//! all randomness off, or a scripted implementation to force outcomes.

use rand::Rng;

/// A source of the few random draws the simulation needs.
pub trait NoiseSource: Send {
    /// Return `true` with the given probability.
    ///
    /// Probabilities outside `[0, 1]` are clamped; NaN never fires.
    fn chance(&mut self, probability: f64) -> bool;

    /// Pick an index uniformly from `0..len`. Returns 0 when `len` is 0.
    fn pick(&mut self, len: usize) -> usize;

    /// Draw uniformly from `[-amplitude, amplitude)`. Returns 0 when the
    /// amplitude is not positive.
    fn spread(&mut self, amplitude: f64) -> f64;

    /// Draw an integer uniformly from `low..=high`. Returns `low` when the
    /// range is empty or a single value.
    fn between(&mut self, low: u32, high: u32) -> u32;
}

/// [`NoiseSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngNoise<R> {
    rng: R,
}

impl<R: Rng> RngNoise<R> {
    /// Wrap a random number generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Return the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng + Send> NoiseSource for RngNoise<R> {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn spread(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-amplitude..amplitude)
    }

    fn between(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }
}

/// [`NoiseSource`] with every draw fixed at its neutral value.
///
/// Weather shifts never trigger, jitter is zero, and ranges yield their
/// lower edge, which makes engine behavior fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct StillNoise;

impl StillNoise {
    /// Create a still noise source.
    pub const fn new() -> Self {
        Self
    }
}

impl NoiseSource for StillNoise {
    fn chance(&mut self, _probability: f64) -> bool {
        false
    }

    fn pick(&mut self, _len: usize) -> usize {
        0
    }

    fn spread(&mut self, _amplitude: f64) -> f64 {
        0.0
    }

    fn between(&mut self, low: u32, _high: u32) -> u32 {
        low
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn still_noise_is_neutral() {
        let mut noise = StillNoise::new();
        assert!(!noise.chance(1.0));
        assert_eq!(noise.pick(3), 0);
        assert!(noise.spread(0.8).abs() < f64::EPSILON);
        assert_eq!(noise.between(3, 7), 3);
    }

    #[test]
    fn rng_noise_respects_ranges() {
        let mut noise = RngNoise::new(StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let s = noise.spread(0.3);
            assert!((-0.3..0.3).contains(&s), "spread out of range: {s}");
            assert!(noise.pick(3) < 3);
            let b = noise.between(15, 30);
            assert!((15..=30).contains(&b), "between out of range: {b}");
        }
    }

    #[test]
    fn rng_noise_handles_degenerate_inputs() {
        let mut noise = RngNoise::new(StdRng::seed_from_u64(1));
        assert_eq!(noise.pick(0), 0);
        assert!(noise.spread(0.0).abs() < f64::EPSILON);
        assert_eq!(noise.between(5, 5), 5);
        assert!(!noise.chance(-1.0));
        assert!(noise.chance(2.0));
        assert!(!noise.chance(f64::NAN));
    }

    #[test]
    fn same_seed_gives_same_draws() {
        let mut a = RngNoise::new(StdRng::seed_from_u64(42));
        let mut b = RngNoise::new(StdRng::seed_from_u64(42));
        for _ in 0..100 {
            assert_eq!(a.pick(3), b.pick(3));
            assert_eq!(a.spread(1.0).to_bits(), b.spread(1.0).to_bits());
        }
    }

    #[test]
    fn chance_tracks_probability() {
        let mut noise = RngNoise::new(StdRng::seed_from_u64(99));
        let hits = (0..10_000).filter(|_| noise.chance(0.2)).count();
        assert!((1_500..2_500).contains(&hits), "0.2 chance hit {hits}/10000");
    }
}
