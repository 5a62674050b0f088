//! Owned particle population: integration and boundary conditions.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::particle::Particle;

/// Axis-aligned simulation domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Domain spanning `[0, width] x [0, height]`.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min_x: 0.0,
            max_x: width,
            min_y: 0.0,
            max_y: height,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Policy applied to particles at the domain edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Clamp positions into the domain; velocity untouched.
    Clip,
    /// Toroidal topology; positions wrap to the opposite side.
    Wrap,
    /// Clamp to the nearest bound and negate the velocity component on
    /// each axis that left the domain.
    Reflect,
}

/// An ordered collection of particles.
///
/// Iteration order is stable within a step: force buffers computed against
/// this population line up with it index by index, and `integrate` relies
/// on that alignment (it can only check the count, not the ordering).
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Append a particle. There is no removal primitive.
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for parameter fan-out (friction broadcast). The
    /// population itself stays fixed; only per-particle fields change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Apply one force per particle and advance everything by `dt`.
    ///
    /// `forces` must have been computed against this exact population in
    /// its current order; only the count is validated. Per particle:
    /// `v += (F / m) * dt` (with the zero-mass guard), then the particle's
    /// own friction/noise/position update.
    pub fn integrate<R: Rng>(&mut self, forces: &[Vec2], dt: f32, rng: &mut R) -> Result<()> {
        if forces.len() != self.particles.len() {
            return Err(Error::ForceCountMismatch {
                expected: self.particles.len(),
                got: forces.len(),
            });
        }
        for (particle, force) in self.particles.iter_mut().zip(forces) {
            particle.velocity += *force / particle.effective_mass() * dt;
            particle.integrate(dt, rng);
        }
        Ok(())
    }

    /// Enforce the boundary policy on every particle.
    ///
    /// `Wrap` requires a domain with positive width and height; the other
    /// modes accept any ordering of the bound pairs that clamping allows.
    pub fn apply_boundary(&mut self, bounds: &Bounds, mode: BoundaryMode) -> Result<()> {
        match mode {
            BoundaryMode::Clip => {
                for p in &mut self.particles {
                    p.position.x = p.position.x.clamp(bounds.min_x, bounds.max_x);
                    p.position.y = p.position.y.clamp(bounds.min_y, bounds.max_y);
                }
            }
            BoundaryMode::Wrap => {
                let (width, height) = (bounds.width(), bounds.height());
                if width <= 0.0 || height <= 0.0 {
                    return Err(Error::DegenerateBounds(format!(
                        "wrap needs positive extents, got {width} x {height}"
                    )));
                }
                for p in &mut self.particles {
                    p.position.x = bounds.min_x + (p.position.x - bounds.min_x).rem_euclid(width);
                    p.position.y = bounds.min_y + (p.position.y - bounds.min_y).rem_euclid(height);
                }
            }
            BoundaryMode::Reflect => {
                for p in &mut self.particles {
                    if p.position.x < bounds.min_x || p.position.x > bounds.max_x {
                        p.velocity.x = -p.velocity.x;
                        p.position.x = p.position.x.clamp(bounds.min_x, bounds.max_x);
                    }
                    if p.position.y < bounds.min_y || p.position.y > bounds.max_y {
                        p.velocity.y = -p.velocity.y;
                        p.position.y = p.position.y.clamp(bounds.min_y, bounds.max_y);
                    }
                }
            }
        }
        Ok(())
    }

    /// Positions in population order, copied out for rendering.
    pub fn positions(&self) -> Vec<Vec2> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Type indices in population order.
    pub fn types(&self) -> Vec<usize> {
        self.particles.iter().map(|p| p.kind).collect()
    }
}
