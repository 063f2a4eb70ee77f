//! Per-tick wander and containment steering.
//!
//! Each agent is advanced independently of every other agent: wander
//! jitter, wall containment, clamped steering, clamped velocity and an
//! explicit Euler position step, in that order.

use core::f32::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::config::{JitterMode, SimulationConfig};
use crate::math;
use crate::vector::Vector3D;

/// Largest random change applied to a wander angle in one tick, in radians.
pub const WANDER_JITTER: f32 = 0.05;

/// Magnitude of the containment force once any wall is near.
pub const CONTAINMENT_STRENGTH: f32 = 50.0;

/// Distance inside the wall at which containment starts pulling back.
pub const CONTAINMENT_MARGIN: f32 = 1.0;

/// Everything one tick reads from the configuration, captured once so a
/// host mutating its settings mid-step cannot tear a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickParams {
    pub half_extents: Vector3D,
    pub wander_radius: f32,
    pub wander_strength: f32,
    /// `max_steering * delta`
    pub steering_limit: f32,
    /// `max_speed * delta`
    pub speed_limit: f32,
    pub jitter_span: f32,
    /// Velocity and position are left alone when `delta` is zero.
    pub integrate: bool,
}

impl TickParams {
    pub fn new(config: &SimulationConfig, delta: f32) -> Self {
        debug_assert!(delta >= 0.0, "negative tick delta {delta}");

        let jitter_span = match config.jitter {
            JitterMode::PerTick => WANDER_JITTER,
            JitterMode::ScaledByDelta { reference_rate } => WANDER_JITTER * delta * reference_rate,
        };

        Self {
            half_extents: config.boundaries.half_extents(),
            wander_radius: config.wander_radius,
            wander_strength: config.wander_strength,
            steering_limit: config.max_steering * delta,
            speed_limit: config.max_speed * delta,
            jitter_span,
            integrate: delta > 0.0,
        }
    }

    /// Draws this tick's wander perturbation for one agent.
    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.jitter_span > 0.0 {
            rng.gen_range(-self.jitter_span..=self.jitter_span)
        } else {
            0.0
        }
    }
}

/// Point on the wander circle at `angle`, flattened to the XY plane and
/// rescaled to `strength`.
pub fn wander_force(angle: f32, radius: f32, strength: f32) -> Vector3D {
    let (sin, cos) = math::sin_cos(angle);
    Vector3D::new(cos * radius, sin * radius, 0.0).normalize() * strength
}

/// Result of testing one agent against the walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub force: Vector3D,
    /// Number of axes on which the agent is within the margin of a wall.
    pub walls_hit: u8,
}

/// Restoring force towards the origin on every axis where the agent is
/// closer than [`CONTAINMENT_MARGIN`] to the wall or past it.
///
/// Inside all bounds the force is exactly zero.
pub fn containment_force(position: &Vector3D, half_extents: &Vector3D) -> Containment {
    let mut force = Vector3D::zero();
    let mut walls_hit = 0;

    for axis in 0..3 {
        if math::abs(position[axis]) + CONTAINMENT_MARGIN > half_extents[axis] {
            force[axis] = -position[axis];
            walls_hit += 1;
        }
    }

    Containment {
        force: force.normalize() * CONTAINMENT_STRENGTH,
        walls_hit,
    }
}

/// Advances one agent by a tick with an already drawn wander `jitter`.
/// Returns whether containment fired.
pub fn advance_agent(agent: &mut Agent, params: &TickParams, jitter: f32) -> bool {
    agent.wander_angle += jitter;
    let wander = wander_force(
        agent.wander_angle,
        params.wander_radius,
        params.wander_strength,
    );

    let containment = containment_force(&agent.position, &params.half_extents);
    // turn the wander bias around for every wall that was hit
    agent.wander_angle += PI * f32::from(containment.walls_hit);

    if params.integrate {
        let steering = (containment.force + wander).limit(params.steering_limit);
        agent.velocity = (agent.velocity + steering).limit(params.speed_limit);
        agent.position += agent.velocity;
    }

    debug_assert!(agent.is_finite(), "agent went non-finite: {agent:?}");
    containment.walls_hit > 0
}

/// Summary of one call to [`SteeringEngine::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub agents: usize,
    /// Agents whose containment force fired this tick.
    pub contained: usize,
}

/// Drives a flock forward one tick at a time
#[derive(Debug, Clone)]
pub struct SteeringEngine<R = SmallRng> {
    rng: R,
    ticks: u64,
}

impl SteeringEngine<SmallRng> {
    /// Engine with a reproducible jitter sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }
}

impl<R: Rng> SteeringEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, ticks: 0 }
    }

    /// Number of ticks stepped so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The engine's random source, shared with flock rebuilds so a seeded
    /// run stays reproducible end to end.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Advances every agent in `flock` by one tick of length `delta`.
    ///
    /// `delta` must use the same time unit as `max_speed` and
    /// `max_steering`. A zero `delta` still moves wander angles but leaves
    /// velocity and position untouched.
    pub fn step<F>(&mut self, flock: &mut F, config: &SimulationConfig, delta: f32) -> StepReport
    where
        F: AsMut<[Agent]> + ?Sized,
    {
        let params = TickParams::new(config, delta);
        let agents = flock.as_mut();

        let mut contained = 0;
        for agent in agents.iter_mut() {
            let jitter = params.jitter(&mut self.rng);
            if advance_agent(agent, &params, jitter) {
                contained += 1;
            }
        }

        self.finish_tick(agents.len(), contained)
    }

    /// Same as [`step`](Self::step) but spreads the agents over the rayon
    /// thread pool. Each agent draws its jitter from its own generator
    /// seeded by the engine, so seeded runs stay deterministic.
    #[cfg(feature = "parallel")]
    pub fn step_parallel<F>(
        &mut self,
        flock: &mut F,
        config: &SimulationConfig,
        delta: f32,
    ) -> StepReport
    where
        F: AsMut<[Agent]> + ?Sized,
    {
        use rayon::prelude::*;

        let params = TickParams::new(config, delta);
        let agents = flock.as_mut();
        let seeds: Vec<u64> = (0..agents.len()).map(|_| self.rng.gen()).collect();
        let chunk_size = core::cmp::max(agents.len() / rayon::current_num_threads(), 1);

        let contained = agents
            .par_chunks_mut(chunk_size)
            .zip(seeds.par_chunks(chunk_size))
            .map(|(chunk, seeds)| {
                chunk
                    .iter_mut()
                    .zip(seeds)
                    .map(|(agent, &seed)| {
                        let mut rng = SmallRng::seed_from_u64(seed);
                        let jitter = params.jitter(&mut rng);
                        advance_agent(agent, &params, jitter)
                    })
                    .filter(|hit| *hit)
                    .count()
            })
            .sum();

        self.finish_tick(agents.len(), contained)
    }

    fn finish_tick(&mut self, agents: usize, contained: usize) -> StepReport {
        self.ticks += 1;
        log::trace!(
            "tick {}: stepped {} agents, {} contained",
            self.ticks,
            agents,
            contained
        );
        StepReport { agents, contained }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ModelKind;
    use crate::config::Boundaries;

    const EPS: f32 = 1e-5;

    fn agent_at(x: f32, y: f32, z: f32) -> Agent {
        Agent::new(Vector3D::new(x, y, z), 0.0, 1.0, ModelKind::DEFAULT)
    }

    #[test]
    fn test_wander_force_magnitude() {
        for i in 0..16 {
            let force = wander_force(i as f32 * 0.4, 5.0, 2.0);
            assert!((force.magnitude() - 2.0).abs() < EPS);
            assert_eq!(force.z, 0.0);
        }
    }

    #[test]
    fn test_wander_force_direction() {
        let force = wander_force(0.0, 5.0, 2.0);
        assert!((force.x - 2.0).abs() < EPS);
        assert!(force.y.abs() < EPS);
    }

    #[test]
    fn test_containment_inside_is_zero() {
        let half = Vector3D::new(6.0, 4.0, 10.0);
        let containment = containment_force(&Vector3D::zero(), &half);
        assert_eq!(containment.force, Vector3D::zero());
        assert_eq!(containment.walls_hit, 0);
    }

    #[test]
    fn test_containment_triggers_inside_margin() {
        let half = Vector3D::new(6.0, 4.0, 10.0);
        // 5.1 + 1 > 6 fires before the wall itself is reached
        let containment = containment_force(&Vector3D::new(5.1, 0.0, 0.0), &half);
        assert_eq!(containment.walls_hit, 1);
        assert!((containment.force.x + CONTAINMENT_STRENGTH).abs() < EPS);
        assert_eq!(containment.force.y, 0.0);
    }

    #[test]
    fn test_containment_corner() {
        let half = Vector3D::new(6.0, 4.0, 10.0);
        let containment = containment_force(&Vector3D::new(-5.5, 3.5, 0.0), &half);
        assert_eq!(containment.walls_hit, 2);
        assert!(containment.force.x > 0.0);
        assert!(containment.force.y < 0.0);
        assert!((containment.force.magnitude() - CONTAINMENT_STRENGTH).abs() < 1e-3);
    }

    #[test]
    fn test_containment_zero_extent_at_origin() {
        // zero-sized axis fires but the restoring component is -0
        let containment = containment_force(&Vector3D::zero(), &Vector3D::zero());
        assert_eq!(containment.walls_hit, 3);
        assert_eq!(containment.force, Vector3D::zero());
    }

    #[test]
    fn test_advance_agent_clamps() {
        let config = SimulationConfig::default();
        let delta = 1.0 / 60.0;
        let params = TickParams::new(&config, delta);
        let mut agent = agent_at(5.9, 0.0, 0.0);
        agent.velocity = Vector3D::new(10.0, 10.0, 0.0);

        advance_agent(&mut agent, &params, 0.0);

        assert!(agent.velocity.magnitude() <= config.max_speed * delta + EPS);
    }

    #[test]
    fn test_steering_applied_is_clamped() {
        let config = SimulationConfig::default();
        let delta = 1.0 / 30.0;
        let params = TickParams::new(&config, delta);
        let mut agent = agent_at(0.0, 0.0, 0.0);

        advance_agent(&mut agent, &params, 0.0);

        // from rest the velocity equals the applied steering
        assert!(agent.velocity.magnitude() <= config.max_steering * delta + EPS);
        assert!(agent.velocity.magnitude() > 0.0);
    }

    #[test]
    fn test_zero_delta_keeps_motion() {
        let config = SimulationConfig::default();
        let params = TickParams::new(&config, 0.0);
        let mut agent = agent_at(1.0, 2.0, 0.0);
        agent.velocity = Vector3D::new(0.01, 0.0, 0.0);

        advance_agent(&mut agent, &params, 0.03);

        assert_eq!(agent.position, Vector3D::new(1.0, 2.0, 0.0));
        assert_eq!(agent.velocity, Vector3D::new(0.01, 0.0, 0.0));
        assert!((agent.wander_angle - 0.03).abs() < EPS);
    }

    #[test]
    fn test_wall_hit_reverses_wander() {
        let config = SimulationConfig::default();
        let params = TickParams::new(&config, 1.0 / 60.0);
        let mut agent = agent_at(5.9, 3.9, 0.0);

        let contained = advance_agent(&mut agent, &params, 0.0);

        assert!(contained);
        assert!((agent.wander_angle - 2.0 * PI).abs() < EPS);
    }

    #[test]
    fn test_jitter_span_per_tick() {
        let config = SimulationConfig::default();
        assert_eq!(TickParams::new(&config, 1.0 / 60.0).jitter_span, WANDER_JITTER);
        assert_eq!(TickParams::new(&config, 0.0).jitter_span, WANDER_JITTER);
    }

    #[test]
    fn test_jitter_span_scaled_by_delta() {
        let config = SimulationConfig {
            jitter: JitterMode::ScaledByDelta {
                reference_rate: 60.0,
            },
            ..Default::default()
        };
        let params = TickParams::new(&config, 1.0 / 120.0);
        assert!((params.jitter_span - WANDER_JITTER / 2.0).abs() < EPS);

        let mut engine = SteeringEngine::seeded(1);
        assert_eq!(TickParams::new(&config, 0.0).jitter(engine.rng_mut()), 0.0);
    }

    #[test]
    fn test_jitter_within_span() {
        let params = TickParams::new(&SimulationConfig::default(), 1.0 / 60.0);
        let mut engine = SteeringEngine::seeded(3);
        for _ in 0..1000 {
            let jitter = params.jitter(engine.rng_mut());
            assert!(jitter.abs() <= WANDER_JITTER);
        }
    }

    #[test]
    fn test_engine_step_counts() {
        let config = SimulationConfig {
            boundaries: Boundaries::new(12.0, 8.0, 20.0),
            ..Default::default()
        };
        let mut agents = [agent_at(0.0, 0.0, 0.0), agent_at(5.5, 0.0, 0.0)];
        let mut engine = SteeringEngine::seeded(42);

        let report = engine.step(&mut agents[..], &config, 1.0 / 60.0);

        assert_eq!(report, StepReport { agents: 2, contained: 1 });
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let config = SimulationConfig::default();
        let mut a = [agent_at(1.0, 1.0, 0.0)];
        let mut b = a.clone();
        let mut engine_a = SteeringEngine::seeded(9);
        let mut engine_b = SteeringEngine::seeded(9);

        for _ in 0..100 {
            engine_a.step(&mut a[..], &config, 1.0 / 60.0);
            engine_b.step(&mut b[..], &config, 1.0 / 60.0);
        }

        assert_eq!(a, b);
    }
}
