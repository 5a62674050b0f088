//! Construction-time configuration for the particle life simulation.
//!
//! Loads a JSON file, fills in defaults, and validates everything the core
//! constructors would otherwise reject at a less convenient moment.

use particle_life_core::BoundaryMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

// --- Error Type ---

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

// --- Configuration Sections ---

#[derive(Deserialize, Debug, Clone)]
pub struct WorldSettings {
    pub width: f32,
    pub height: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParticleSettings {
    pub count: u32,
    #[serde(default = "default_num_types")]
    pub num_types: usize,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default)]
    pub noise: f32,
}

fn default_num_types() -> usize {
    4
}
fn default_mass() -> f32 {
    1.0
}
fn default_friction() -> f32 {
    0.02
}

#[derive(Deserialize, Debug, Clone)]
pub struct RuleSettings {
    /// Row-major type x type coefficients. When absent, the core's default
    /// matrix for `num_types` is used.
    pub matrix: Option<Vec<Vec<f32>>>,
    #[serde(default = "default_min_range")]
    pub min_range: f32,
    #[serde(default = "default_max_range")]
    pub max_range: f32,
    #[serde(default = "default_global_strength")]
    pub global_strength: f32,
}

fn default_min_range() -> f32 {
    5.0
}
fn default_max_range() -> f32 {
    120.0
}
fn default_global_strength() -> f32 {
    1.0
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            matrix: None,
            min_range: default_min_range(),
            max_range: default_max_range(),
            global_strength: default_global_strength(),
        }
    }
}

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub framerate: u32,
    pub world_settings: WorldSettings,
    pub particles: ParticleSettings,
    #[serde(default)]
    pub rules: RuleSettings,
    #[serde(default = "default_boundary")]
    pub boundary: BoundaryMode,
    /// RNG seed for spawning and noise; omit for a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_boundary() -> BoundaryMode {
    BoundaryMode::Wrap
}

// --- Loading Function ---

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.framerate == 0 {
        return Err(ConfigError::Validation("framerate cannot be zero".into()));
    }
    if config.world_settings.width <= 0.0 || config.world_settings.height <= 0.0 {
        return Err(ConfigError::Validation(
            "world dimensions must be positive".into(),
        ));
    }
    if config.particles.count == 0 {
        return Err(ConfigError::Validation(
            "particle count cannot be zero".into(),
        ));
    }
    if config.particles.num_types == 0 {
        return Err(ConfigError::Validation(
            "at least one particle type is required".into(),
        ));
    }
    if !(0.0..1.0).contains(&config.particles.friction) {
        return Err(ConfigError::Validation(
            "friction must lie in [0, 1)".into(),
        ));
    }
    if config.particles.noise < 0.0 {
        return Err(ConfigError::Validation(
            "noise amplitude cannot be negative".into(),
        ));
    }
    if config.rules.min_range < 0.0 || config.rules.max_range <= config.rules.min_range {
        return Err(ConfigError::Validation(
            "interaction ranges must satisfy 0 <= min_range < max_range".into(),
        ));
    }
    if let Some(matrix) = &config.rules.matrix {
        let n = config.particles.num_types;
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(ConfigError::Validation(format!(
                "interaction matrix must be {n} x {n} to match num_types"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_from_str(content: &str) -> Result<Config, ConfigError> {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        load_config(file.path())
    }

    #[test]
    fn load_valid_config() {
        let config = load_from_str(
            r#"{
              "framerate": 60,
              "world_settings": { "width": 800.0, "height": 600.0 },
              "particles": { "count": 500, "num_types": 4 },
              "boundary": "wrap",
              "seed": 42
            }"#,
        )
        .unwrap();

        assert_eq!(config.framerate, 60);
        assert_eq!(config.world_settings.width, 800.0);
        assert_eq!(config.particles.count, 500);
        assert_eq!(config.boundary, BoundaryMode::Wrap);
        assert_eq!(config.seed, Some(42));
        // Defaulted sections.
        assert_eq!(config.rules.min_range, 5.0);
        assert_eq!(config.rules.max_range, 120.0);
        assert_eq!(config.particles.friction, 0.02);
        assert!(config.rules.matrix.is_none());
    }

    #[test]
    fn load_explicit_matrix() {
        let config = load_from_str(
            r#"{
              "framerate": 30,
              "world_settings": { "width": 100.0, "height": 100.0 },
              "particles": { "count": 10, "num_types": 2 },
              "rules": { "matrix": [[0.5, -0.5], [0.5, 0.5]], "min_range": 2.0, "max_range": 20.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.rules.matrix.as_ref().unwrap().len(), 2);
        assert_eq!(config.rules.min_range, 2.0);
    }

    #[test]
    fn zero_framerate_is_rejected() {
        let result = load_from_str(
            r#"{
              "framerate": 0,
              "world_settings": { "width": 100.0, "height": 100.0 },
              "particles": { "count": 10 }
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn matrix_size_must_match_num_types() {
        let result = load_from_str(
            r#"{
              "framerate": 60,
              "world_settings": { "width": 100.0, "height": 100.0 },
              "particles": { "count": 10, "num_types": 3 },
              "rules": { "matrix": [[0.0, 0.0], [0.0, 0.0]] }
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bad_ranges_are_rejected() {
        let result = load_from_str(
            r#"{
              "framerate": 60,
              "world_settings": { "width": 100.0, "height": 100.0 },
              "particles": { "count": 10 },
              "rules": { "min_range": 50.0, "max_range": 10.0 }
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_boundary_tag_fails_at_parse_time() {
        let result = load_from_str(
            r#"{
              "framerate": 60,
              "world_settings": { "width": 100.0, "height": 100.0 },
              "particles": { "count": 10 },
              "boundary": "bounce"
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
