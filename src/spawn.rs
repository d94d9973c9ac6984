//! Spawn context for particle initialization.
//!
//! Wraps a small RNG and the field bounds so spawning code reads as
//! "random point in the cube, random drift velocity" instead of raw ranges.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random helpers used while populating a [`ParticleStore`](crate::ParticleStore).
///
/// ```ignore
/// let mut ctx = SpawnContext::new(5.0, Some(7));
/// let position = ctx.random_in_bounds();
/// let velocity = ctx.random_velocity(0.005);
/// ```
pub struct SpawnContext {
    /// Half-width of the bounding cube.
    pub bounds: f32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context. With `seed` the sequence is reproducible, without it
    /// every run differs.
    pub fn new(bounds: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { bounds, rng }
    }

    /// Uniform value in `[-half, half)`. A non-positive `half` yields 0.
    #[inline]
    pub fn symmetric(&mut self, half: f32) -> f32 {
        if half > 0.0 {
            self.rng.gen_range(-half..half)
        } else {
            0.0
        }
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.symmetric(half_size),
            self.symmetric(half_size),
            self.symmetric(half_size),
        )
    }

    /// Random point within the field bounds.
    pub fn random_in_bounds(&mut self) -> Vec3 {
        self.random_in_cube(self.bounds)
    }

    /// Velocity with each component uniform in `[-max_component, max_component)`.
    pub fn random_velocity(&mut self, max_component: f32) -> Vec3 {
        self.random_in_cube(max_component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_in_bounds() {
        let mut ctx = SpawnContext::new(5.0, Some(1));
        for _ in 0..1000 {
            let p = ctx.random_in_bounds();
            assert!(p.abs().max_element() <= 5.0);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SpawnContext::new(1.0, Some(42));
        let mut b = SpawnContext::new(1.0, Some(42));
        for _ in 0..16 {
            assert_eq!(a.random_velocity(0.005), b.random_velocity(0.005));
        }
    }

    #[test]
    fn test_zero_range_is_zero() {
        let mut ctx = SpawnContext::new(1.0, None);
        assert_eq!(ctx.random_velocity(0.0), Vec3::ZERO);
    }
}
