use crate::forces::{ForceField, DEFAULT_GRAVITY};
use crate::Body;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityParams {
    /// Gravitational constant magnitude. Positive means attraction.
    pub g: f64,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self { g: DEFAULT_GRAVITY }
    }
}

/// Pairwise attraction between the three bodies.
#[derive(Debug, Clone, Default)]
pub struct Gravity {
    pub params: GravityParams,
}

impl Gravity {
    pub fn new(params: GravityParams) -> Self {
        Self { params }
    }

    pub fn with_g(g: f64) -> Self {
        Self::new(GravityParams { g })
    }
}

impl ForceField for Gravity {
    fn accelerations(&self, bodies: &[Body; 3]) -> [Vector3<f64>; 3] {
        let (a, b, c) = accelerate(&bodies[0], &bodies[1], &bodies[2], self.params.g);
        [a, b, c]
    }
}

/// Acceleration of each body towards the other two.
///
/// For body X with attractors P: `a(X) = -g * sum(m(P) * d / |d|)`, `d = x(X) - x(P)`.
/// The displacement is divided by its own norm exactly once, and the pair terms
/// are summed in a fixed order (A over B, C; B over C, A; C over A, B) so results
/// are reproducible bit for bit.
///
/// Two bodies at the same position give a zero norm and a non-finite result.
/// That case is not detected here.
pub fn accelerate(a: &Body, b: &Body, c: &Body, g: f64) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let acc_a = -g * (pull(a, b) + pull(a, c));
    let acc_b = -g * (pull(b, c) + pull(b, a));
    let acc_c = -g * (pull(c, a) + pull(c, b));
    (acc_a, acc_b, acc_c)
}

#[inline]
fn pull(x: &Body, p: &Body) -> Vector3<f64> {
    let diff = x.position() - p.position();
    p.mass() * (diff / diff.norm())
}

/// Potential whose negative gradient is the force law of [`accelerate`]:
/// `U = sum over pairs of g * m_i * m_j * |r_i - r_j|`.
pub fn potential_energy(bodies: &[Body; 3], g: f64) -> f64 {
    let mut u = 0.0;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let r = (bodies[i].position() - bodies[j].position()).norm();
            u += g * bodies[i].mass() * bodies[j].mass() * r;
        }
    }
    u
}
