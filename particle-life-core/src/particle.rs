use glam::Vec2;
use rand::Rng;
use rand_distr::StandardNormal;

/// A single 2D particle.
///
/// The type index selects the row/column of the interaction matrix; the
/// physical parameters control how forces translate into motion:
/// mass divides applied forces, friction bleeds velocity each step, and
/// noise adds a random kick each step.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Type index into the interaction matrix.
    pub kind: usize,
    pub mass: f32,
    /// Per-step velocity damping factor, expected in [0, 1).
    pub friction: f32,
    /// Standard deviation of the per-step random velocity kick.
    pub noise: f32,
}

/// Immutable snapshot of a particle, detached from the live population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub kind: usize,
    pub mass: f32,
    pub friction: f32,
    pub noise: f32,
}

impl Particle {
    /// Create a particle with unit mass and no friction or noise.
    pub fn new(position: Vec2, velocity: Vec2, kind: usize) -> Self {
        Self {
            position,
            velocity,
            kind,
            mass: 1.0,
            friction: 0.0,
            noise: 0.0,
        }
    }

    /// Set the physical parameters, builder style.
    pub fn with_physics(mut self, mass: f32, friction: f32, noise: f32) -> Self {
        self.mass = mass;
        self.friction = friction;
        self.noise = noise;
        self
    }

    /// Mass used when dividing forces. A configured mass of exactly 0 is
    /// treated as 1.0 so force application never divides by zero.
    #[inline]
    pub fn effective_mass(&self) -> f32 {
        if self.mass == 0.0 {
            1.0
        } else {
            self.mass
        }
    }

    /// Add a raw impulse to the velocity: `v += F / m`, with the zero-mass
    /// guard of [`effective_mass`](Self::effective_mass).
    ///
    /// Crate-private on purpose. This path folds dt in as 1 and is
    /// numerically inconsistent with the dt-scaled force application in
    /// `ParticleSystem::integrate`, which is the sanctioned entry point.
    pub(crate) fn apply_impulse(&mut self, force: Vec2) {
        self.velocity += force / self.effective_mass();
    }

    /// Advance the particle by one time step.
    ///
    /// The order is fixed and observable: friction first, then noise, then
    /// the position update. Reordering changes trajectories.
    pub fn integrate<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if self.friction != 0.0 {
            self.velocity *= 1.0 - self.friction;
        }
        if self.noise > 0.0 {
            let nx: f32 = rng.sample(StandardNormal);
            let ny: f32 = rng.sample(StandardNormal);
            self.velocity += Vec2::new(nx, ny) * self.noise;
        }
        self.position += self.velocity * dt;
    }

    /// Copying snapshot of the particle state.
    pub fn state(&self) -> ParticleState {
        ParticleState {
            position: self.position,
            velocity: self.velocity,
            kind: self.kind,
            mass: self.mass,
            friction: self.friction,
            noise: self.noise,
        }
    }
}
