#![cfg(feature = "parallel")]

use boidbox_core::{FlockState, ModelKind, SimulationConfig, SteeringEngine, Vector3D};

const EPS: f32 = 1e-5;
const DELTA: f32 = 1.0 / 60.0;

fn volumetric(population: usize) -> SimulationConfig {
    SimulationConfig {
        population,
        planar: false,
        ..Default::default()
    }
}

fn populated(config: &SimulationConfig, seed: u64) -> (SteeringEngine, FlockState) {
    let mut engine = SteeringEngine::seeded(seed);
    let flock = FlockState::populated(config, &[ModelKind(0), ModelKind(1)], engine.rng_mut());
    (engine, flock)
}

#[test]
fn test_parallel_step_keeps_clamp_and_stays_finite() {
    // odd size so the last rayon chunk is short
    let config = volumetric(257);
    let (mut engine, mut flock) = populated(&config, 21);

    for _ in 0..300 {
        let report = engine.step_parallel(&mut flock, &config, DELTA);
        assert_eq!(report.agents, 257);

        for agent in flock.iter() {
            assert!(agent.velocity.magnitude() <= config.max_speed * DELTA + EPS);
            assert!(agent.is_finite(), "{agent:?}");
        }
    }
    assert_eq!(engine.ticks(), 300);
}

#[test]
fn test_parallel_zero_delta_keeps_motion() {
    let config = volumetric(64);
    let (mut engine, mut flock) = populated(&config, 8);
    for _ in 0..20 {
        engine.step_parallel(&mut flock, &config, DELTA);
    }

    let before: Vec<(Vector3D, Vector3D)> =
        flock.iter().map(|a| (a.position, a.velocity)).collect();
    engine.step_parallel(&mut flock, &config, 0.0);

    for (agent, (position, velocity)) in flock.iter().zip(before) {
        assert_eq!(agent.position, position);
        assert_eq!(agent.velocity, velocity);
    }
}

#[test]
fn test_parallel_seeded_runs_agree() {
    let config = volumetric(100);
    let (mut engine_a, mut a) = populated(&config, 99);
    let (mut engine_b, mut b) = populated(&config, 99);

    for _ in 0..120 {
        let report_a = engine_a.step_parallel(&mut a, &config, DELTA);
        let report_b = engine_b.step_parallel(&mut b, &config, DELTA);
        assert_eq!(report_a, report_b);
    }

    assert_eq!(a.agents(), b.agents());
}

#[test]
fn test_parallel_empty_flock() {
    let config = volumetric(0);
    let (mut engine, mut flock) = populated(&config, 1);

    let report = engine.step_parallel(&mut flock, &config, DELTA);

    assert_eq!(report.agents, 0);
    assert_eq!(report.contained, 0);
}
