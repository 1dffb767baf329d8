//! Scenario files.
//!
//! A scenario is a TOML document with run settings and exactly three bodies:
//!
//! ```toml
//! [simulation]
//! gravity = 9.81            # positive magnitude; negative values repel
//! dt = 0.05                 # fixed step
//! frames = 600
//! frame_interval_ms = 50    # only used by renderers
//! record_trajectory = false
//!
//! [[bodies]]
//! position = [1.0, 0.0, 10.0]
//! velocity = [0.0, 0.0, 0.0]
//! mass = 1.0
//! # id = 7                  # optional, defaults to the body's index
//! ```

use crate::forces::{Gravity, GravityParams, DEFAULT_GRAVITY};
use crate::models::three_body::{classic_configs, DEMO_FRAMES, DEMO_FRAME_INTERVAL_MS};
use crate::sim::{BodyConfig, Simulator};
use crate::DEFAULT_STEP;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub bodies: Vec<BodyConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: f64,
    pub dt: f64,
    pub frames: usize,
    pub frame_interval_ms: u64,
    pub record_trajectory: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            dt: DEFAULT_STEP,
            frames: DEMO_FRAMES,
            frame_interval_ms: DEMO_FRAME_INTERVAL_MS,
            record_trajectory: false,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            bodies: classic_configs().to_vec(),
        }
    }
}

impl ScenarioConfig {
    pub fn new(bodies: [BodyConfig; 3], simulation: SimulationConfig) -> Self {
        Self { simulation, bodies: bodies.to_vec() }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("loading scenario from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_str = self.to_toml_string()?;
        std::fs::write(path.as_ref(), toml_str)?;
        Ok(())
    }

    /// Reject settings the simulator cannot run. Suspicious but runnable values
    /// (negative gravity, non-positive mass) only produce a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if self.bodies.len() != 3 {
            return Err(ConfigError::Validation(format!(
                "expected exactly 3 bodies, got {}",
                self.bodies.len()
            )));
        }
        if !sim.dt.is_finite() || sim.dt <= 0.0 {
            return Err(ConfigError::Validation(format!("dt must be positive, got {}", sim.dt)));
        }
        if !sim.gravity.is_finite() {
            return Err(ConfigError::Validation("gravity must be finite".to_string()));
        }
        if sim.frames == 0 {
            return Err(ConfigError::Validation("frames must be at least 1".to_string()));
        }

        for (i, body) in self.bodies.iter().enumerate() {
            let finite = body
                .position
                .iter()
                .chain(body.velocity.iter())
                .chain(std::iter::once(&body.mass))
                .all(|v| v.is_finite());
            if !finite {
                return Err(ConfigError::Validation(format!("body {} has non-finite values", i)));
            }
            if body.mass <= 0.0 {
                warn!("body {} has non-positive mass {}; attraction will be degenerate", i, body.mass);
            }
        }

        for (i, body) in self.bodies.iter().enumerate() {
            let id = body.effective_id(i);
            if let Some(j) = (0..i).find(|&j| self.bodies[j].effective_id(j) == id) {
                return Err(ConfigError::Validation(format!(
                    "bodies {} and {} share id {}",
                    j, i, id
                )));
            }
        }

        if sim.gravity < 0.0 {
            warn!(
                "gravity {} is negative: bodies will repel (pass the magnitude for attraction)",
                sim.gravity
            );
        }
        Ok(())
    }

    /// Body configs as a fixed trio. Fails if the config was built without `validate`.
    pub fn body_trio(&self) -> Result<[BodyConfig; 3], ConfigError> {
        <[BodyConfig; 3]>::try_from(self.bodies.clone()).map_err(|v: Vec<BodyConfig>| {
            ConfigError::Validation(format!("expected exactly 3 bodies, got {}", v.len()))
        })
    }

    pub fn gravity(&self) -> Gravity {
        Gravity::new(GravityParams { g: self.simulation.gravity })
    }

    /// Build a simulator ready to step.
    pub fn build_simulator(&self) -> Result<Simulator<Gravity>, ConfigError> {
        let bodies = self.body_trio()?;
        let mut sim = Simulator::with_field(&bodies, self.simulation.dt, self.gravity());
        if self.simulation.record_trajectory {
            sim.record_trajectories(true);
        }
        Ok(sim)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
