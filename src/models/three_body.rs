use crate::error::SimError;
use crate::BodyConfig;
use std::f64::consts::PI;

pub const DEMO_FRAMES: usize = 600;
pub const DEMO_FRAME_INTERVAL_MS: u64 = 50;

/// Values per body in a packed state array: [x, y, z, vx, vy, vz, m].
pub const PACKED_STRIDE: usize = 7;

/// Marker colors a renderer uses for bodies 0, 1, 2.
pub const BODY_COLORS: [&str; 3] = ["darkorange", "skyblue", "darkseagreen"];

/// Marker size for a body of the given mass.
pub fn marker_size(mass: f64) -> f64 {
    mass * 10.0
}

/// Three unequal masses released from rest, far apart on all three axes.
pub fn classic_configs() -> [BodyConfig; 3] {
    [
        BodyConfig::new([1.0, 0.0, 10.0], [0.0, 0.0, 0.0], 1.0),
        BodyConfig::new([10.0, -1.0, 0.0], [0.0, 0.0, 0.0], 2.0),
        BodyConfig::new([1.0, 10.0, -10.0], [0.0, 0.0, 0.0], 1.3),
    ]
}

/// Two equal masses at +-x around a heavier body at the origin.
///
/// The middle body feels no net pull and stays put; the outer pair oscillates
/// through it along the x axis.
pub fn symmetric_line_configs(half_width: f64) -> [BodyConfig; 3] {
    [
        BodyConfig::new([half_width, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0),
        BodyConfig::new([-half_width, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0),
        BodyConfig::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 3.0),
    ]
}

/// Equal masses at rest on the corners of an equilateral triangle in the XY plane.
pub fn triangle_configs(radius: f64) -> [BodyConfig; 3] {
    let corner = |k: usize| {
        let angle = PI / 2.0 + k as f64 * 2.0 * PI / 3.0;
        [radius * angle.cos(), radius * angle.sin(), 0.0]
    };
    [
        BodyConfig::new(corner(0), [0.0, 0.0, 0.0], 1.0),
        BodyConfig::new(corner(1), [0.0, 0.0, 0.0], 1.0),
        BodyConfig::new(corner(2), [0.0, 0.0, 0.0], 1.0),
    ]
}

/// Convert packed states [x, y, z, vx, vy, vz, m] x 3 into body configs.
pub fn configs_from_states(states: &[f64]) -> Result<[BodyConfig; 3], SimError> {
    let expected = 3 * PACKED_STRIDE;
    if states.len() != expected {
        return Err(SimError::InvalidStateLength { expected, got: states.len() });
    }

    let body = |i: usize| {
        let s = &states[i * PACKED_STRIDE..(i + 1) * PACKED_STRIDE];
        BodyConfig::new([s[0], s[1], s[2]], [s[3], s[4], s[5]], s[6])
    };
    Ok([body(0), body(1), body(2)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::accelerate;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn packed_states_split_into_configs() {
        let states = [
            1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 5.0, //
            4.0, 5.0, 6.0, 0.0, 0.0, 0.0, 1.0, //
            7.0, 8.0, 9.0, -1.0, 0.0, 1.0, 2.0,
        ];
        let cfg = configs_from_states(&states).unwrap();
        assert_eq!(cfg[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(cfg[0].velocity, [0.1, 0.2, 0.3]);
        assert_eq!(cfg[0].mass, 5.0);
        assert_eq!(cfg[2].velocity, [-1.0, 0.0, 1.0]);
        assert_eq!(cfg[2].id, None);
    }

    #[test]
    fn wrong_packed_length_is_rejected() {
        let err = configs_from_states(&[0.0; 18]).unwrap_err();
        match err {
            SimError::InvalidStateLength { expected, got } => {
                assert_eq!(expected, 21);
                assert_eq!(got, 18);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn symmetric_line_centre_feels_nothing() {
        let cfg = symmetric_line_configs(4.0);
        let bodies = [cfg[0].to_body(0), cfg[1].to_body(1), cfg[2].to_body(2)];
        let (_, _, centre) = accelerate(&bodies[0], &bodies[1], &bodies[2], 9.81);
        assert_relative_eq!(centre, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn triangle_corners_are_equidistant() {
        let cfg = triangle_configs(2.0);
        let d = |i: usize, j: usize| {
            (Vector3::from(cfg[i].position) - Vector3::from(cfg[j].position)).norm()
        };
        assert_relative_eq!(d(0, 1), d(1, 2), epsilon = 1e-12);
        assert_relative_eq!(d(1, 2), d(2, 0), epsilon = 1e-12);
        assert_relative_eq!(d(0, 1), 2.0 * 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn marker_size_scales_with_mass() {
        let sizes: Vec<f64> = classic_configs().iter().map(|c| marker_size(c.mass)).collect();
        assert_relative_eq!(sizes[0], 10.0);
        assert_relative_eq!(sizes[1], 20.0);
        assert_relative_eq!(sizes[2], 13.0);
    }
}
