use nalgebra::Vector3;

pub mod config;
pub mod engine;
pub mod error;
pub mod forces;
pub mod models;
pub mod sim;

pub use config::{ConfigError, ScenarioConfig};
pub use engine::Engine;
pub use error::SimError;
pub use forces::{accelerate, ForceField, Gravity, GravityParams, DEFAULT_GRAVITY};
pub use sim::{BodyConfig, BodySnapshot, Simulator};

#[cfg(target_arch = "wasm32")]
pub mod wasm;

/// Шаг интегрирования по умолчанию (единицы модельного времени).
pub const DEFAULT_STEP: f64 = 0.05;

/// Идентификатор тела. Назначается при создании и больше не меняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Материальная точка: положение, скорость, масса.
#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    mass: f64,
}

impl Body {
    /// Создание тела.
    /// Масса не проверяется: при mass <= 0 притяжение вырождается, но остаётся конечным.
    pub fn new(id: BodyId, position: Vector3<f64>, velocity: Vector3<f64>, mass: f64) -> Self {
        Self { id, position, velocity, mass }
    }

    pub fn id(&self) -> BodyId { self.id }
    pub fn position(&self) -> Vector3<f64> { self.position }
    pub fn velocity(&self) -> Vector3<f64> { self.velocity }
    pub fn mass(&self) -> f64 { self.mass }

    /// Один шаг с шагом по умолчанию DEFAULT_STEP.
    pub fn update(&mut self, accel: Vector3<f64>) {
        self.update_with_step(accel, DEFAULT_STEP);
    }

    /// Полунеявный Эйлер: сначала скорость, затем положение по уже новой скорости.
    pub fn update_with_step(&mut self, accel: Vector3<f64>, h: f64) {
        self.velocity += h * accel;
        self.position += h * self.velocity;
    }

    /// Импульс m·v.
    pub fn momentum(&self) -> Vector3<f64> {
        self.mass * self.velocity
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    /// false, если в положении или скорости появились NaN/Inf.
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }

    /// Снимок состояния в виде массива [x, y, z, vx, vy, vz].
    pub fn state_array(&self) -> [f64; 6] {
        [
            self.position.x, self.position.y, self.position.z,
            self.velocity.x, self.velocity.y, self.velocity.z,
        ]
    }
}
