use rand::seq::SliceRandom;
use rand::Rng;

use crate::agent::{Agent, ModelKind};
use crate::config::SimulationConfig;
use crate::error::FlockError;
use crate::vector::Vector3D;

/// Uniform sample in `[lo, hi]` that collapses to `lo` for an empty or
/// degenerate range instead of panicking.
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// Creates one agent at rest somewhere inside the configured box.
pub fn spawn_agent<R: Rng + ?Sized>(
    config: &SimulationConfig,
    models: &[ModelKind],
    rng: &mut R,
) -> Agent {
    let half = config.boundaries.half_extents();
    let x = sample(rng, -half.x, half.x);
    let y = sample(rng, -half.y, half.y);
    let z = if config.planar {
        0.0
    } else {
        sample(rng, -half.z, half.z)
    };

    let wander_angle = rng.gen_range(0.0..core::f32::consts::TAU);
    let scale = sample(rng, config.min_scale, config.max_scale);
    let model_kind = models.choose(rng).copied().unwrap_or(ModelKind::DEFAULT);

    Agent::new(Vector3D::new(x, y, z), wander_angle, scale, model_kind)
}

/// A fixed-capacity flock for embedded (no_std) hosts
pub struct FixedFlock<const N: usize> {
    agents: heapless::Vec<Agent, N>,
}

impl<const N: usize> FixedFlock<N> {
    pub const fn new() -> Self {
        Self {
            agents: heapless::Vec::new(),
        }
    }

    /// Discards every agent and spawns `config.population` fresh ones.
    ///
    /// A population larger than `N` is rejected and leaves the flock empty.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        models: &[ModelKind],
        rng: &mut R,
    ) -> Result<(), FlockError> {
        self.agents.clear();
        if config.population > N {
            return Err(FlockError::CapacityExceeded {
                requested: config.population,
                capacity: N,
            });
        }

        for _ in 0..config.population {
            let _ = self.agents.push(spawn_agent(config, models, rng));
        }
        log::debug!("rebuilt fixed flock with {} agents", self.agents.len());
        Ok(())
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl<const N: usize> Default for FixedFlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AsRef<[Agent]> for FixedFlock<N> {
    fn as_ref(&self) -> &[Agent] {
        &self.agents
    }
}

impl<const N: usize> AsMut<[Agent]> for FixedFlock<N> {
    fn as_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }
}

/// The flock owned by the simulation, ordered by creation index
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct FlockState {
    agents: Vec<Agent>,
}

#[cfg(feature = "std")]
impl FlockState {
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Builds a flock directly from the given configuration.
    pub fn populated<R: Rng + ?Sized>(
        config: &SimulationConfig,
        models: &[ModelKind],
        rng: &mut R,
    ) -> Self {
        let mut flock = Self::new();
        flock.rebuild(config, models, rng);
        flock
    }

    /// Wraps agents a host placed by hand.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    /// Discards every agent, history included, and spawns
    /// `config.population` fresh ones at rest.
    ///
    /// Hosts call this whenever the population, boundaries, scale range,
    /// model set or planar flag change.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        models: &[ModelKind],
        rng: &mut R,
    ) {
        self.agents = (0..config.population)
            .map(|_| spawn_agent(config, models, rng))
            .collect();

        log::debug!(
            "rebuilt flock with {} agents (planar: {}, boundaries: {:?}, models: {})",
            self.agents.len(),
            config.planar,
            config.boundaries,
            models.len()
        );
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(feature = "std")]
impl AsRef<[Agent]> for FlockState {
    fn as_ref(&self) -> &[Agent] {
        &self.agents
    }
}

#[cfg(feature = "std")]
impl AsMut<[Agent]> for FlockState {
    fn as_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }
}
