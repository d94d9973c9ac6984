//! Particle data.

use std::ops::{Index, IndexMut};

use glam::Vec3;

use crate::spawn::SpawnContext;

/// A drifting point in the field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }
}

/// Fixed-length, index-addressed particle storage.
///
/// A particle's index is its identity for the lifetime of the store; there
/// is no insertion or removal. Indexing out of range panics.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Spawn `count` particles uniformly inside the context bounds, each with
    /// a velocity whose components lie in `[-max_speed, max_speed)`.
    pub fn spawn(count: usize, max_speed: f32, ctx: &mut SpawnContext) -> Self {
        let particles = (0..count)
            .map(|_| {
                let position = ctx.random_in_bounds();
                let velocity = ctx.random_velocity(max_speed);
                Particle::new(position, velocity)
            })
            .collect();
        Self { particles }
    }

    /// Build a store from explicit particles.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Overwrite `out` with the current positions in index order.
    pub fn write_positions(&self, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(self.particles.iter().map(|p| p.position));
    }
}

impl Index<usize> for ParticleStore {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

impl IndexMut<usize> for ParticleStore {
    fn index_mut(&mut self, index: usize) -> &mut Particle {
        &mut self.particles[index]
    }
}
