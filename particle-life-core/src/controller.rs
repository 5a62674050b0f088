//! High-level step orchestration: forces -> integration -> boundary.

use log::info;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::rules::InteractionRules;
use crate::system::{BoundaryMode, Bounds, ParticleSystem};

/// Multiplier applied per strength-up/-down event.
const STRENGTH_STEP_UP: f32 = 1.1;
const STRENGTH_STEP_DOWN: f32 = 0.9;
/// Additive friction step per event, floored at zero.
const FRICTION_STEP: f32 = 0.005;
/// Friction broadcast to every particle at construction.
const DEFAULT_FRICTION: f32 = 0.02;

/// Discrete parameter-adjustment events from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    TogglePause,
    IncreaseStrength,
    DecreaseStrength,
    IncreaseFriction,
    DecreaseFriction,
}

/// Drives one simulation step per frame tick and owns the runtime tunables.
///
/// Holds no physics state of its own beyond the pause flag and the
/// global-friction value it fans out to every particle.
pub struct SimulationController {
    system: ParticleSystem,
    rules: InteractionRules,
    bounds: Bounds,
    boundary_mode: BoundaryMode,
    paused: bool,
    global_friction: f32,
    rng: StdRng,
}

impl SimulationController {
    /// The RNG is injected so noisy runs stay reproducible under a fixed
    /// seed. The default global friction is broadcast immediately.
    pub fn new(
        system: ParticleSystem,
        rules: InteractionRules,
        bounds: Bounds,
        boundary_mode: BoundaryMode,
        rng: StdRng,
    ) -> Self {
        let mut controller = Self {
            system,
            rules,
            bounds,
            boundary_mode,
            paused: false,
            global_friction: DEFAULT_FRICTION,
            rng,
        };
        controller.set_friction(DEFAULT_FRICTION);
        controller
    }

    /// Perform one simulation step, unless paused.
    ///
    /// Order per step: compute forces against the current population, then
    /// dt-scaled integration, then the boundary policy. Any error aborts
    /// the step and should be treated as fatal by the driving loop.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if self.paused {
            return Ok(());
        }
        let forces = self.rules.compute_forces(&self.system)?;
        self.system.integrate(&forces, dt, &mut self.rng)?;
        self.system.apply_boundary(&self.bounds, self.boundary_mode)?;
        Ok(())
    }

    /// Apply a discrete control event from the input collaborator.
    pub fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::TogglePause => {
                self.paused = !self.paused;
                info!("paused -> {}", self.paused);
            }
            ControlEvent::IncreaseStrength => {
                let value = self.rules.global_strength() * STRENGTH_STEP_UP;
                self.rules.set_global_strength(value);
                info!("global_strength -> {value:.3}");
            }
            ControlEvent::DecreaseStrength => {
                let value = self.rules.global_strength() * STRENGTH_STEP_DOWN;
                self.rules.set_global_strength(value);
                info!("global_strength -> {value:.3}");
            }
            ControlEvent::IncreaseFriction => {
                self.set_friction(self.global_friction + FRICTION_STEP);
                info!("friction -> {:.3}", self.global_friction);
            }
            ControlEvent::DecreaseFriction => {
                self.set_friction((self.global_friction - FRICTION_STEP).max(0.0));
                info!("friction -> {:.3}", self.global_friction);
            }
        }
    }

    /// Set the same friction value on every particle, explicit fan-out.
    pub fn set_friction(&mut self, value: f32) {
        self.global_friction = value;
        for p in self.system.particles_mut() {
            p.friction = value;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn global_friction(&self) -> f32 {
        self.global_friction
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn rules(&self) -> &InteractionRules {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use crate::rules::InteractionRules;
    use glam::Vec2;
    use rand::SeedableRng;

    fn controller_with_one_particle() -> SimulationController {
        let mut system = ParticleSystem::new();
        system.add_particle(
            Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 0).with_physics(1.0, 0.0, 0.0),
        );
        let rules = InteractionRules::new(vec![vec![0.0]], 5.0, 50.0).unwrap();
        let mut controller = SimulationController::new(
            system,
            rules,
            Bounds::from_size(100.0, 100.0),
            BoundaryMode::Clip,
            StdRng::seed_from_u64(0),
        );
        // Undo the default broadcast so the motion check is exact.
        controller.set_friction(0.0);
        controller
    }

    #[test]
    fn step_moves_particle_when_running() {
        let mut controller = controller_with_one_particle();
        controller.step(0.1).unwrap();
        assert!(controller.system().particles()[0].position.x > 0.0);
    }

    #[test]
    fn step_is_a_noop_while_paused() {
        let mut controller = controller_with_one_particle();
        controller.handle_event(ControlEvent::TogglePause);
        assert!(controller.is_paused());
        controller.step(0.1).unwrap();
        assert_eq!(controller.system().particles()[0].position, Vec2::ZERO);
        controller.handle_event(ControlEvent::TogglePause);
        assert!(!controller.is_paused());
    }

    #[test]
    fn strength_events_scale_multiplicatively() {
        let mut controller = controller_with_one_particle();
        controller.handle_event(ControlEvent::IncreaseStrength);
        assert!((controller.rules().global_strength() - 1.1).abs() < 1e-6);
        controller.handle_event(ControlEvent::DecreaseStrength);
        assert!((controller.rules().global_strength() - 0.99).abs() < 1e-6);
    }

    #[test]
    fn friction_events_broadcast_and_clamp_at_zero() {
        let mut controller = controller_with_one_particle();
        controller.handle_event(ControlEvent::IncreaseFriction);
        assert!((controller.global_friction() - 0.005).abs() < 1e-6);
        for p in controller.system().particles() {
            assert!((p.friction - 0.005).abs() < 1e-6);
        }
        controller.handle_event(ControlEvent::DecreaseFriction);
        controller.handle_event(ControlEvent::DecreaseFriction);
        assert_eq!(controller.global_friction(), 0.0);
    }

    #[test]
    fn construction_broadcasts_default_friction() {
        let mut system = ParticleSystem::new();
        system.add_particle(Particle::new(Vec2::ZERO, Vec2::ZERO, 0));
        let rules = InteractionRules::new(vec![vec![0.0]], 5.0, 50.0).unwrap();
        let controller = SimulationController::new(
            system,
            rules,
            Bounds::from_size(10.0, 10.0),
            BoundaryMode::Wrap,
            StdRng::seed_from_u64(0),
        );
        assert!((controller.system().particles()[0].friction - 0.02).abs() < 1e-6);
    }
}
