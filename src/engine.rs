use crate::config::{ScenarioConfig, SimulationConfig};
use crate::error::SimError;
use crate::forces::{Gravity, GravityParams};
use crate::models::three_body::{
    classic_configs, configs_from_states, marker_size, symmetric_line_configs, triangle_configs,
    BODY_COLORS,
};
use crate::sim::{BodyConfig, Simulator};
use log::debug;

pub const SCENARIO_CLASSIC: &str = "classic";
pub const SCENARIO_SYMMETRIC_LINE: &str = "symmetric-line";
pub const SCENARIO_TRIANGLE: &str = "triangle";

pub struct ScenarioInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn scenario_catalog() -> &'static [ScenarioInfo] {
    &[
        ScenarioInfo {
            id: SCENARIO_CLASSIC,
            name: "Classic trio",
            description: "Masses 1, 2 and 1.3 released from rest far apart on all axes.",
        },
        ScenarioInfo {
            id: SCENARIO_SYMMETRIC_LINE,
            name: "Symmetric line",
            description: "Equal masses at +-4 on x around a heavier body at the origin.",
        },
        ScenarioInfo {
            id: SCENARIO_TRIANGLE,
            name: "Collapsing triangle",
            description: "Equal masses at rest on an equilateral triangle of radius 8.",
        },
    ]
}

/// Initial bodies for a built-in scenario.
pub fn builtin_configs(scenario_id: &str) -> Result<[BodyConfig; 3], SimError> {
    match scenario_id {
        SCENARIO_CLASSIC => Ok(classic_configs()),
        SCENARIO_SYMMETRIC_LINE => Ok(symmetric_line_configs(4.0)),
        SCENARIO_TRIANGLE => Ok(triangle_configs(8.0)),
        _ => Err(SimError::UnknownScenario(scenario_id.to_string())),
    }
}

/// Frame-driven facade for renderers: one `tick` per displayed frame, then read positions back.
#[derive(Debug)]
pub struct Engine {
    scenario_id: String,
    sim: Simulator<Gravity>,
    frames: usize,
    frame_interval_ms: u64,
}

impl Engine {
    pub fn new_builtin(scenario_id: &str) -> Result<Self, SimError> {
        let configs = builtin_configs(scenario_id)?;
        debug!("engine: built-in scenario '{}'", scenario_id);
        Ok(Self::new_custom(scenario_id, configs, SimulationConfig::default()))
    }

    pub fn new_custom(scenario_id: &str, configs: [BodyConfig; 3], settings: SimulationConfig) -> Self {
        let gravity = Gravity::new(GravityParams { g: settings.gravity });
        let mut sim = Simulator::with_field(&configs, settings.dt, gravity);
        if settings.record_trajectory {
            sim.record_trajectories(true);
        }
        Self {
            scenario_id: scenario_id.to_string(),
            sim,
            frames: settings.frames,
            frame_interval_ms: settings.frame_interval_ms,
        }
    }

    pub fn from_config(scenario_id: &str, config: &ScenarioConfig) -> Result<Self, SimError> {
        config.validate()?;
        let configs = config.body_trio()?;
        Ok(Self::new_custom(scenario_id, configs, config.simulation.clone()))
    }

    /// Packed [x, y, z, vx, vy, vz, m] x 3 with default settings.
    pub fn new_from_states(states: &[f64], dt: f64) -> Result<Self, SimError> {
        let configs = configs_from_states(states)?;
        let settings = SimulationConfig { dt, ..SimulationConfig::default() };
        Self::from_config("from-states", &ScenarioConfig::new(configs, settings))
    }

    pub fn scenario_id(&self) -> &str { &self.scenario_id }
    pub fn frames(&self) -> usize { self.frames }
    pub fn frame_interval_ms(&self) -> u64 { self.frame_interval_ms }
    pub fn frame(&self) -> u64 { self.sim.frame() }
    pub fn dt(&self) -> f64 { self.sim.dt() }

    /// Advance one displayed frame.
    pub fn tick(&mut self) {
        self.sim.step();
    }

    /// True once the configured frame count has been played.
    pub fn finished(&self) -> bool {
        self.sim.frame() >= self.frames as u64
    }

    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(9);
        for p in self.sim.positions() {
            out.push(p.x as f32);
            out.push(p.y as f32);
            out.push(p.z as f32);
        }
        out
    }

    pub fn state_matrix_flat(&self) -> Vec<f32> {
        self.sim
            .state_matrix()
            .iter()
            .flat_map(|row| row.iter().map(|v| *v as f32))
            .collect()
    }

    /// Recorded rows [x, y, z, vx, vy, vz, t] of body i; None unless recording is on.
    pub fn trajectory(&self, i: usize) -> Option<&[[f64; 7]]> {
        self.sim.trajectory_of(i)
    }

    /// Trail of body i as flat x, y, z triples for line rendering.
    pub fn trail_flat(&self, i: usize) -> Vec<f32> {
        self.trajectory(i)
            .map(|rows| {
                rows.iter()
                    .flat_map(|r| [r[0] as f32, r[1] as f32, r[2] as f32])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.sim.bodies().iter().map(|b| b.mass()).collect()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.sim.bodies().iter().map(|b| b.id().0).collect()
    }

    pub fn marker_sizes(&self) -> Vec<f64> {
        self.sim.bodies().iter().map(|b| marker_size(b.mass())).collect()
    }

    pub fn colors(&self) -> [&'static str; 3] {
        BODY_COLORS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_entry_builds() {
        for info in scenario_catalog() {
            let engine = Engine::new_builtin(info.id).unwrap();
            assert_eq!(engine.scenario_id(), info.id);
            assert_eq!(engine.positions_flat().len(), 9);
        }
    }

    #[test]
    fn unknown_scenario_is_an_error() {
        let err = Engine::new_builtin("figure-eight").unwrap_err();
        assert!(matches!(err, SimError::UnknownScenario(ref id) if id == "figure-eight"));
    }

    #[test]
    fn tick_advances_until_finished() {
        let settings = SimulationConfig { frames: 3, ..SimulationConfig::default() };
        let mut engine = Engine::new_custom("classic", classic_configs(), settings);
        let before = engine.positions_flat();
        while !engine.finished() {
            engine.tick();
        }
        assert_eq!(engine.frame(), 3);
        assert_ne!(engine.positions_flat(), before);
    }

    #[test]
    fn renderer_data_follows_masses() {
        let engine = Engine::new_builtin(SCENARIO_CLASSIC).unwrap();
        assert_eq!(engine.masses(), vec![1.0, 2.0, 1.3]);
        assert_eq!(engine.ids(), vec![0, 1, 2]);
        assert_eq!(engine.marker_sizes()[1], 20.0);
        assert_eq!(engine.colors()[0], "darkorange");
        assert_eq!(engine.frames(), 600);
        assert_eq!(engine.frame_interval_ms(), 50);
        assert_eq!(engine.state_matrix_flat().len(), 18);
    }

    #[test]
    fn from_states_uses_given_dt() {
        let mut states = Vec::new();
        for cfg in classic_configs() {
            states.extend_from_slice(&cfg.position);
            states.extend_from_slice(&cfg.velocity);
            states.push(cfg.mass);
        }
        let engine = Engine::new_from_states(&states, 0.01).unwrap();
        assert_eq!(engine.dt(), 0.01);
        assert_eq!(engine.masses(), vec![1.0, 2.0, 1.3]);

        assert!(Engine::new_from_states(&states[..20], 0.01).is_err());
    }

    #[test]
    fn from_states_rejects_bad_step() {
        let mut states = Vec::new();
        for cfg in classic_configs() {
            states.extend_from_slice(&cfg.position);
            states.extend_from_slice(&cfg.velocity);
            states.push(cfg.mass);
        }
        assert!(matches!(Engine::new_from_states(&states, f64::NAN), Err(SimError::Config(_))));
        assert!(Engine::new_from_states(&states, 0.0).is_err());
        assert!(Engine::new_from_states(&states, -0.05).is_err());
    }

    #[test]
    fn recorded_trail_reaches_the_renderer() {
        let mut cfg = ScenarioConfig::default();
        cfg.simulation.record_trajectory = true;
        cfg.simulation.frames = 5;
        let mut engine = Engine::from_config("classic", &cfg).unwrap();
        while !engine.finished() {
            engine.tick();
        }

        let rows = engine.trajectory(1).expect("recording enabled");
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][..3], [10.0, -1.0, 0.0]);
        let last = engine.positions_flat();
        let trail = engine.trail_flat(1);
        assert_eq!(trail.len(), 18);
        assert_eq!(trail[15..], last[3..6]);
        assert!(engine.trajectory(3).is_none());
    }

    #[test]
    fn trail_is_empty_without_recording() {
        let mut engine = Engine::new_builtin(SCENARIO_CLASSIC).unwrap();
        engine.tick();
        assert!(engine.trajectory(0).is_none());
        assert!(engine.trail_flat(0).is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = ScenarioConfig::default();
        cfg.simulation.dt = -1.0;
        assert!(matches!(Engine::from_config("bad", &cfg), Err(SimError::Config(_))));
    }
}
