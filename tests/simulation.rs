use approx::assert_relative_eq;
use nalgebra::Vector3;
use std::path::PathBuf;
use threebody::engine::{builtin_configs, SCENARIO_CLASSIC, SCENARIO_SYMMETRIC_LINE};
use threebody::models::three_body::classic_configs;
use threebody::{accelerate, Body, BodyId, ScenarioConfig, Simulator, DEFAULT_GRAVITY, DEFAULT_STEP};

/// Classic trio as free bodies, ids 0..3.
pub fn classic_bodies() -> [Body; 3] {
    let cfg = classic_configs();
    [cfg[0].to_body(0), cfg[1].to_body(1), cfg[2].to_body(2)]
}

// ==================================================================================
// Force law + update
// ==================================================================================

#[test]
fn worked_example_single_frame() {
    let [mut a, mut b, mut c] = classic_bodies();
    let initial = [a.position(), b.position(), c.position()];

    let (acc_a, acc_b, acc_c) = accelerate(&a, &b, &c, 9.81);

    // A is pulled by B (m = 2) along (B - A) and by C (m = 1.3) along (C - A).
    let ab = Vector3::new(9.0, -1.0, -10.0);
    let ac = Vector3::new(0.0, 10.0, -20.0);
    let expected_a = 9.81 * (2.0 * ab / ab.norm() + 1.3 * ac / ac.norm());
    assert_relative_eq!(acc_a, expected_a, epsilon = 1e-12);

    a.update(acc_a);
    b.update(acc_b);
    c.update(acc_c);

    let h = DEFAULT_STEP;
    for ((body, acc), x0) in [a, b, c].iter().zip([acc_a, acc_b, acc_c]).zip(initial) {
        assert_relative_eq!(body.velocity(), h * acc, epsilon = 1e-12);
        assert_relative_eq!(body.position(), x0 + h * body.velocity(), epsilon = 1e-12);
    }
}

#[test]
fn singular_positions_give_non_finite_acceleration() {
    let a = Body::new(BodyId(0), Vector3::new(1.0, 1.0, 1.0), Vector3::zeros(), 1.0);
    let b = Body::new(BodyId(1), Vector3::new(1.0, 1.0, 1.0), Vector3::zeros(), 2.0);
    let c = Body::new(BodyId(2), Vector3::new(0.0, 0.0, 0.0), Vector3::zeros(), 1.0);

    let (acc_a, _, _) = accelerate(&a, &b, &c, DEFAULT_GRAVITY);
    assert!(acc_a.iter().any(|v| v.is_nan() || v.is_infinite()));
}

// ==================================================================================
// Multi-frame properties
// ==================================================================================

#[test]
fn ten_frames_are_bit_identical_across_runs() {
    let run = || {
        let mut sim = Simulator::new(&classic_configs(), DEFAULT_STEP);
        sim.run(10);
        sim.state_matrix()
    };
    assert_eq!(run(), run());
}

#[test]
fn simulator_matches_hand_driven_loop() {
    let mut bodies = classic_bodies();
    for _ in 0..10 {
        let (a, b, c) = accelerate(&bodies[0], &bodies[1], &bodies[2], 9.81);
        bodies[0].update(a);
        bodies[1].update(b);
        bodies[2].update(c);
    }

    let mut sim = Simulator::new(&classic_configs(), DEFAULT_STEP);
    sim.run(10);

    for (got, want) in sim.bodies().iter().zip(bodies.iter()) {
        assert_eq!(got.position(), want.position());
        assert_eq!(got.velocity(), want.velocity());
    }
}

#[test]
fn momentum_drift_stays_small_over_100_frames() {
    let mut sim = Simulator::new(&classic_configs(), DEFAULT_STEP);
    let p0 = sim.total_momentum();

    for _ in 0..100 {
        sim.step();
    }

    assert_eq!(sim.first_non_finite(), None);
    let scale: f64 = sim.bodies().iter().map(|b| b.momentum().norm()).sum();
    let drift = (sim.total_momentum() - p0).norm();
    assert!(
        drift <= 1e-10 * scale.max(1.0),
        "momentum drift {drift} too large for scale {scale}"
    );
}

#[test]
fn symmetric_line_keeps_centre_fixed() {
    let cfg = builtin_configs(SCENARIO_SYMMETRIC_LINE).unwrap();
    let mut sim = Simulator::new(&cfg, DEFAULT_STEP);

    // The outer bodies reach the centre after ~8 frames; stay well before that.
    for _ in 0..5 {
        sim.step();
        let p = sim.positions();
        assert_eq!(p[2], Vector3::zeros());
        assert_eq!(p[0], -p[1]);
    }
    assert!(sim.positions()[0].x < 4.0);
}

// ==================================================================================
// Scenario files
// ==================================================================================

#[test]
fn shipped_scenario_file_matches_builtin() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join("classic.toml");
    let cfg = ScenarioConfig::from_file(&path).unwrap();

    assert_eq!(cfg.bodies, builtin_configs(SCENARIO_CLASSIC).unwrap().to_vec());
    assert_eq!(cfg.simulation.frames, 600);

    let mut from_file = cfg.build_simulator().unwrap();
    let mut builtin = Simulator::new(&classic_configs(), DEFAULT_STEP);
    from_file.run(20);
    builtin.run(20);
    assert_eq!(from_file.state_matrix(), builtin.state_matrix());
}

#[test]
fn missing_scenario_file_is_io_error() {
    let err = ScenarioConfig::from_file("scenarios/does-not-exist.toml").unwrap_err();
    assert!(matches!(err, threebody::ConfigError::Io(_)));
}
