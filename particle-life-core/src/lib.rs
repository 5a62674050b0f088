//! Core engine for an emergent "particle life" simulation.
//!
//! Many 2D particles of a handful of discrete types interact through an
//! asymmetric pairwise force rule, producing clustering and chasing
//! patterns. The crate covers the force computation
//! ([`InteractionRules`]), the owned population with integration and
//! boundary handling ([`ParticleSystem`]), and the per-frame orchestration
//! ([`SimulationController`]). Rendering and input are external
//! collaborators: they supply a frame `dt` and control events, and consume
//! the position/type snapshots.

pub mod controller;
pub mod error;
pub mod particle;
pub mod rules;
pub mod spawn;
pub mod system;

pub use controller::{ControlEvent, SimulationController};
pub use error::{Error, Result};
pub use glam::Vec2;
pub use particle::{Particle, ParticleState};
pub use rules::{default_rules, InteractionRules};
pub use system::{BoundaryMode, Bounds, ParticleSystem};
