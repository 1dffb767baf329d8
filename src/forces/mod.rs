//! Acceleration providers for the three-body system.

use crate::Body;
use nalgebra::Vector3;

pub mod gravity;

pub use gravity::{accelerate, potential_energy, Gravity, GravityParams};


/// Magnitude of the gravitational constant used by the built-in scenarios.
///
/// Always positive: the force law carries its own leading minus sign, so
/// passing a negative value here turns attraction into repulsion.
pub const DEFAULT_GRAVITY: f64 = 9.81;

/// Acceleration field over the three bodies. Must not mutate anything.
pub trait ForceField: Sync {
    fn accelerations(&self, bodies: &[Body; 3]) -> [Vector3<f64>; 3];
}

// Closures of the form Fn(&[Body; 3]) -> [Vector3; 3] work as fields too.
impl<F> ForceField for F
where
    F: Fn(&[Body; 3]) -> [Vector3<f64>; 3] + Sync,
{
    fn accelerations(&self, bodies: &[Body; 3]) -> [Vector3<f64>; 3] {
        (self)(bodies)
    }
}
