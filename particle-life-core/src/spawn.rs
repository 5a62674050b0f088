//! Seeded random population generation.

use glam::Vec2;
use rand::Rng;

use crate::particle::Particle;
use crate::system::Bounds;

/// Physical parameters stamped onto every spawned particle.
#[derive(Debug, Clone, Copy)]
pub struct ParticleDefaults {
    pub mass: f32,
    pub friction: f32,
    pub noise: f32,
}

impl Default for ParticleDefaults {
    fn default() -> Self {
        Self {
            mass: 1.0,
            friction: 0.02,
            noise: 0.0,
        }
    }
}

/// Create `count` particles with uniform random positions inside `bounds`,
/// velocities in [-1, 1) per axis, and types in `[0, num_types)`.
///
/// The RNG is passed in rather than created here so callers control the
/// seed and test runs stay reproducible.
pub fn random_particles<R: Rng>(
    rng: &mut R,
    count: usize,
    num_types: usize,
    bounds: &Bounds,
    defaults: ParticleDefaults,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let position = Vec2::new(
                rng.gen_range(bounds.min_x..bounds.max_x),
                rng.gen_range(bounds.min_y..bounds.max_y),
            );
            let velocity = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let kind = rng.gen_range(0..num_types);
            Particle::new(position, velocity, kind).with_physics(
                defaults.mass,
                defaults.friction,
                defaults.noise,
            )
        })
        .collect()
}
