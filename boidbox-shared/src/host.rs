use boidbox_core::{FlockState, SimulationConfig, SteeringEngine, StepReport};

use crate::error::SettingsError;
use crate::settings::{SettingsFile, SimulationSettings, Theme};
use crate::snapshot::FrameSnapshot;
use crate::tracker::{SettingsChange, SettingsTracker};
use crate::viewport::ResponsiveViewport;

/// Owns a flock and drives it the way a render loop would: settings go in,
/// change detection decides on rebuilds, ticks go out as snapshots.
pub struct FlockHost {
    settings: SettingsFile,
    viewport: Option<ResponsiveViewport>,
    config: SimulationConfig,
    flock: FlockState,
    engine: SteeringEngine,
    tracker: SettingsTracker,
}

impl FlockHost {
    /// Builds the host and its first flock. A `seed` makes the whole run,
    /// flock placement included, reproducible.
    pub fn new(
        settings: SettingsFile,
        viewport: Option<ResponsiveViewport>,
        seed: Option<u64>,
    ) -> Result<Self, SettingsError> {
        let engine = match seed {
            Some(seed) => SteeringEngine::seeded(seed),
            None => SteeringEngine::from_entropy(),
        };
        settings.themes.validate()?;
        let simulation = settings.simulation.clone();

        let mut host = Self {
            settings,
            viewport,
            config: SimulationConfig::default(),
            flock: FlockState::new(),
            engine,
            tracker: SettingsTracker::new(),
        };
        host.apply_settings(simulation)?;
        Ok(host)
    }

    /// Swaps in new user settings. The flock is rebuilt only when a
    /// parameter that shapes it changed; tuning changes take effect on the
    /// next tick. Rejected settings leave the host untouched.
    pub fn apply_settings(
        &mut self,
        simulation: SimulationSettings,
    ) -> Result<SettingsChange, SettingsError> {
        let config = simulation.validated_config(self.viewport.as_ref())?;
        self.settings.themes.get(&simulation.theme)?.model_kinds()?;

        self.settings.simulation = simulation;
        self.install(config)
    }

    /// Refits the boundaries to a new viewport size.
    pub fn resize(&mut self, viewport: ResponsiveViewport) -> Result<SettingsChange, SettingsError> {
        let config = self.settings.simulation.validated_config(Some(&viewport))?;
        self.viewport = Some(viewport);
        log::info!(
            "Viewport {}x{} -> boundaries {:?}",
            viewport.width,
            viewport.height,
            config.boundaries
        );
        self.install(config)
    }

    /// Throws the current flock away and spawns a new one even if nothing
    /// changed.
    pub fn rebuild(&mut self) -> Result<(), SettingsError> {
        self.tracker.reset();
        self.install(self.config).map(|_| ())
    }

    fn install(&mut self, config: SimulationConfig) -> Result<SettingsChange, SettingsError> {
        let change = self.tracker.observe(&config, &self.settings.simulation.theme);
        self.config = config;

        if change.rebuild {
            let models = self.theme()?.model_kinds()?;
            self.flock.rebuild(&self.config, &models, self.engine.rng_mut());
            log::info!(
                "Flock rebuilt: {} agents, theme '{}', {}",
                self.flock.len(),
                self.settings.simulation.theme,
                if self.config.planar { "planar" } else { "volumetric" }
            );
        }

        Ok(change)
    }

    pub fn theme(&self) -> Result<&Theme, SettingsError> {
        self.settings.active_theme()
    }

    /// Steps the flock once with the current configuration.
    pub fn tick(&mut self, delta: f32) -> StepReport {
        self.engine.step(&mut self.flock, &self.config, delta)
    }

    #[cfg(feature = "parallel")]
    pub fn tick_parallel(&mut self, delta: f32) -> StepReport {
        self.engine.step_parallel(&mut self.flock, &self.config, delta)
    }

    pub fn ticks(&self) -> u64 {
        self.engine.ticks()
    }

    pub fn frame(&self) -> Result<FrameSnapshot, SettingsError> {
        let wander_radius = self
            .settings
            .simulation
            .wander_circle
            .then_some(self.config.wander_radius);
        Ok(FrameSnapshot::capture(
            self.engine.ticks(),
            self.flock.agents(),
            self.theme()?,
            wander_radius,
        ))
    }

    pub fn flock(&self) -> &FlockState {
        &self.flock
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings.simulation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ThemeCatalog;
    use boidbox_core::ConfigError;

    fn host() -> FlockHost {
        FlockHost::new(SettingsFile::default(), None, Some(1)).unwrap()
    }

    #[test]
    fn test_initial_flock() {
        let host = host();
        assert_eq!(host.flock().len(), SimulationSettings::default().population);
    }

    #[test]
    fn test_retune_keeps_flock() {
        let mut host = host();
        for _ in 0..10 {
            host.tick(1.0 / 60.0);
        }
        let before = host.flock().agents().to_vec();

        let change = host
            .apply_settings(SimulationSettings {
                max_speed: 9.0,
                ..host.settings().clone()
            })
            .unwrap();

        assert!(change.retune && !change.rebuild);
        assert_eq!(host.flock().agents(), &before[..]);
        assert_eq!(host.config().max_speed, 9.0);
    }

    #[test]
    fn test_population_change_rebuilds() {
        let mut host = host();
        let change = host
            .apply_settings(SimulationSettings {
                population: 5,
                ..host.settings().clone()
            })
            .unwrap();

        assert!(change.rebuild);
        assert_eq!(host.flock().len(), 5);
    }

    #[test]
    fn test_forced_rebuild_resets_velocity() {
        let mut host = host();
        for _ in 0..10 {
            host.tick(1.0 / 60.0);
        }
        host.rebuild().unwrap();
        assert!(host
            .flock()
            .iter()
            .all(|a| a.velocity == boidbox_core::Vector3D::zero()));
    }

    #[test]
    fn test_resize_rebuilds_with_wider_box() {
        let mut host = host();
        let change = host.resize(ResponsiveViewport::new(3840.0, 1080.0)).unwrap();

        assert!(change.rebuild);
        assert_eq!(host.config().boundaries.x, 24.0);
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        let mut host = host();
        let result = host.apply_settings(SimulationSettings {
            theme: "space".to_string(),
            ..host.settings().clone()
        });
        assert!(matches!(result, Err(SettingsError::UnknownTheme(_))));
        assert_eq!(host.settings().theme, "default");
    }

    #[test]
    fn test_invalid_initial_settings() {
        let settings = SettingsFile {
            simulation: SimulationSettings {
                max_steering: -1.0,
                ..Default::default()
            },
            themes: ThemeCatalog::default(),
        };
        assert!(matches!(
            FlockHost::new(settings, None, Some(1)),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_frame_includes_wander_circle_when_enabled() {
        let settings = SettingsFile {
            simulation: SimulationSettings {
                wander_circle: true,
                population: 2,
                ..Default::default()
            },
            themes: ThemeCatalog::default(),
        };
        let host = FlockHost::new(settings, None, Some(2)).unwrap();
        let frame = host.frame().unwrap();

        assert_eq!(frame.agents.len(), 2);
        assert!(frame.agents.iter().all(|a| a.wander_circle.is_some()));
        assert!(frame.agents.iter().all(|a| a.model.as_deref() == Some("boid")));
    }

    #[test]
    fn test_absurd_population_rejected() {
        let mut host = host();
        let result = host.apply_settings(SimulationSettings {
            population: usize::MAX,
            ..host.settings().clone()
        });

        assert!(matches!(
            result,
            Err(SettingsError::Invalid(ConfigError::PopulationTooLarge { .. }))
        ));
        assert_eq!(host.flock().len(), SimulationSettings::default().population);
        assert_eq!(host.settings().population, SimulationSettings::default().population);
    }

    #[test]
    fn test_oversized_theme_rejected() {
        let settings = SettingsFile {
            simulation: SimulationSettings::default(),
            themes: ThemeCatalog::new(vec![Theme::new(
                Theme::DEFAULT_NAME,
                (0..70_000).map(|i| format!("m{i}")),
            )]),
        };
        assert!(matches!(
            FlockHost::new(settings, None, Some(4)),
            Err(SettingsError::TooManyModels { count: 70_000, .. })
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_tick_parallel_respects_speed_cap() {
        let mut host = host();
        let delta = 1.0 / 60.0;
        for _ in 0..50 {
            let report = host.tick_parallel(delta);
            assert_eq!(report.agents, host.flock().len());
        }

        let cap = host.config().max_speed * delta;
        assert_eq!(host.ticks(), 50);
        assert!(host
            .flock()
            .iter()
            .all(|a| a.is_finite() && a.velocity.magnitude() <= cap + 1e-5));
    }
}
