#![cfg(target_arch = "wasm32")]

use crate::config::SimulationConfig;
use crate::engine::{scenario_catalog, Engine, ScenarioInfo, SCENARIO_CLASSIC};
use crate::sim::BodyConfig;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn available_scenarios() -> js_sys::Array {
    let out = js_sys::Array::new();
    for info in scenario_catalog() {
        out.push(&scenario_info_to_js(info));
    }
    out
}

#[wasm_bindgen]
pub fn simulation_defaults() -> JsValue {
    let defaults = CustomConfig::default();
    serde_wasm_bindgen::to_value(&defaults.settings()).unwrap_or(JsValue::NULL)
}

fn scenario_info_to_js(info: &ScenarioInfo) -> JsValue {
    let obj = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("id"), &JsValue::from_str(info.id));
    let _ = js_sys::Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(info.name));
    let _ = js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("description"),
        &JsValue::from_str(info.description),
    );
    JsValue::from(obj)
}

#[wasm_bindgen]
pub struct WasmSim {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmSim {
    #[wasm_bindgen(constructor)]
    pub fn new(states: Vec<f64>, dt: f64) -> Result<WasmSim, JsValue> {
        let engine = Engine::new_from_states(&states, dt).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmSim { engine })
    }

    #[wasm_bindgen(js_name = "newWithScenario")]
    pub fn new_with_scenario(scenario_id: &str) -> Result<WasmSim, JsValue> {
        let engine = Engine::new_builtin(scenario_id).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmSim { engine })
    }

    pub fn new_demo() -> Result<WasmSim, JsValue> {
        Self::new_with_scenario(SCENARIO_CLASSIC)
    }

    /// Build simulation from a config object:
    /// {
    ///   gravity?: number, dt?: number, frames?: number, frameIntervalMs?: number,
    ///   recordTrajectory?: bool,
    ///   bodies: [{ position: [f64;3], velocity?: [f64;3], mass?: f64, id?: u32 }] (exactly 3)
    /// }
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmSim, JsValue> {
        let cfg: CustomConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
        let settings = cfg.settings();
        let bodies = build_bodies(cfg.bodies)?;
        let scenario = crate::config::ScenarioConfig::new(bodies, settings);
        let engine = Engine::from_config("custom", &scenario).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmSim { engine })
    }

    pub fn step(&mut self) { self.engine.tick(); }

    pub fn finished(&self) -> bool { self.engine.finished() }

    pub fn positions(&self) -> Vec<f32> { self.engine.positions_flat() }

    pub fn states(&self) -> Vec<f32> { self.engine.state_matrix_flat() }

    /// Recorded x, y, z triples of body `index` (empty unless `recordTrajectory` was set).
    pub fn trail(&self, index: usize) -> Vec<f32> { self.engine.trail_flat(index) }

    pub fn masses(&self) -> Vec<f64> { self.engine.masses() }

    pub fn ids(&self) -> Vec<u32> { self.engine.ids() }

    pub fn sizes(&self) -> Vec<f64> { self.engine.marker_sizes() }

    pub fn frame(&self) -> u64 { self.engine.frame() }

    pub fn frames(&self) -> usize { self.engine.frames() }

    #[wasm_bindgen(js_name = "frameIntervalMs")]
    pub fn frame_interval_ms(&self) -> u64 { self.engine.frame_interval_ms() }

    pub fn dt(&self) -> f64 { self.engine.dt() }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomConfig {
    #[serde(default)]
    gravity: Option<f64>,
    #[serde(default)]
    dt: Option<f64>,
    #[serde(default)]
    frames: Option<usize>,
    #[serde(default)]
    frame_interval_ms: Option<u64>,
    #[serde(default)]
    record_trajectory: Option<bool>,
    #[serde(default)]
    bodies: Vec<CustomBody>,
}

impl CustomConfig {
    fn settings(&self) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        SimulationConfig {
            gravity: self.gravity.unwrap_or(defaults.gravity),
            dt: self.dt.unwrap_or(defaults.dt),
            frames: self.frames.unwrap_or(defaults.frames),
            frame_interval_ms: self.frame_interval_ms.unwrap_or(defaults.frame_interval_ms),
            record_trajectory: self.record_trajectory.unwrap_or(defaults.record_trajectory),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CustomBody {
    position: [f64; 3],
    #[serde(default)]
    velocity: Option<[f64; 3]>,
    #[serde(default)]
    mass: Option<f64>,
    #[serde(default)]
    id: Option<u32>,
}

fn build_bodies(bodies: Vec<CustomBody>) -> Result<[BodyConfig; 3], JsValue> {
    if bodies.len() != 3 {
        return Err(JsValue::from_str(&format!("expected exactly 3 bodies, got {}", bodies.len())));
    }
    let mut out = bodies.into_iter().map(|b| BodyConfig {
        position: b.position,
        velocity: b.velocity.unwrap_or([0.0, 0.0, 0.0]),
        mass: b.mass.unwrap_or(1.0),
        id: b.id,
    });
    match (out.next(), out.next(), out.next()) {
        (Some(a), Some(b), Some(c)) => Ok([a, b, c]),
        _ => Err(JsValue::from_str("expected exactly 3 bodies")),
    }
}
