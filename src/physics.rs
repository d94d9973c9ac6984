//! Boundary-reflecting drift.

use crate::particle::ParticleStore;

/// Advance every particle by its velocity, then reflect the velocity on any
/// axis whose coordinate now lies outside `[-bound, bound]`.
///
/// The check uses the post-update position, so a particle may sit past the
/// bound by up to one velocity increment until the next step carries it back.
/// Particles are independent of each other.
pub fn step(store: &mut ParticleStore, bound: f32) {
    for particle in store.iter_mut() {
        particle.position += particle.velocity;

        for axis in 0..3 {
            if particle.position[axis].abs() > bound {
                particle.velocity[axis] = -particle.velocity[axis];
            }
        }
    }
}
