use boidbox_core::{Boundaries, SimulationConfig};

/// Parameters that decide what a freshly built flock looks like. A change
/// to any of them means the flock has to be rebuilt from scratch.
#[derive(Debug, Clone, PartialEq)]
struct FlockShape {
    population: usize,
    min_scale: f32,
    max_scale: f32,
    boundaries: Boundaries,
    planar: bool,
    theme: String,
}

impl FlockShape {
    fn of(config: &SimulationConfig, theme: &str) -> Self {
        Self {
            population: config.population,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            boundaries: config.boundaries,
            planar: config.planar,
            theme: theme.to_string(),
        }
    }
}

/// What changed since the previous observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsChange {
    /// The flock must be rebuilt before the next step.
    pub rebuild: bool,
    /// Only per-tick tuning changed; the next step picks it up as is.
    pub retune: bool,
}

impl SettingsChange {
    pub fn any(&self) -> bool {
        self.rebuild || self.retune
    }
}

/// Host-side change detection over successive configurations
#[derive(Debug, Clone, Default)]
pub struct SettingsTracker {
    shape: Option<FlockShape>,
    last: Option<SimulationConfig>,
}

impl SettingsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `config` as current and reports how it differs from the
    /// previous one. The first observation always asks for a rebuild.
    pub fn observe(&mut self, config: &SimulationConfig, theme: &str) -> SettingsChange {
        let shape = FlockShape::of(config, theme);
        let rebuild = self.shape.as_ref() != Some(&shape);
        let retune = !rebuild && self.last.as_ref() != Some(config);

        if rebuild {
            log::debug!("flock shape changed: {shape:?}");
        } else if retune {
            log::debug!("tuning changed without rebuild");
        }

        self.shape = Some(shape);
        self.last = Some(*config);
        SettingsChange { rebuild, retune }
    }

    /// Forgets everything so the next observation triggers a rebuild.
    pub fn reset(&mut self) {
        self.shape = None;
        self.last = None;
    }
}
