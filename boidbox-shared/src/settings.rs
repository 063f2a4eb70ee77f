use boidbox_core::{Boundaries, JitterMode, ModelKind, SimulationConfig};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::viewport::ResponsiveViewport;

/// The knobs a host exposes to its user, with the reference defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub population: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_steering: f32,
    pub wander_radius: f32,
    pub wander_strength: f32,
    /// Draw the wander circle around each agent.
    pub wander_circle: bool,
    pub boundaries: Boundaries,
    /// Spread the flock over the z axis instead of the z = 0 plane.
    pub three_d: bool,
    pub theme: String,
    pub jitter: JitterMode,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let config = SimulationConfig::default();
        Self {
            population: config.population,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            max_steering: config.max_steering,
            wander_radius: config.wander_radius,
            wander_strength: config.wander_strength,
            wander_circle: false,
            boundaries: config.boundaries,
            three_d: !config.planar,
            theme: Theme::DEFAULT_NAME.to_string(),
            jitter: config.jitter,
        }
    }
}

impl SimulationSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Core configuration for these settings, with boundaries fitted to
    /// `viewport` when one is given.
    pub fn to_config(&self, viewport: Option<&ResponsiveViewport>) -> SimulationConfig {
        let boundaries = match viewport {
            Some(viewport) => viewport.fit(self.boundaries),
            None => self.boundaries,
        };

        SimulationConfig {
            population: self.population,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            max_steering: self.max_steering,
            wander_radius: self.wander_radius,
            wander_strength: self.wander_strength,
            boundaries,
            planar: !self.three_d,
            jitter: self.jitter,
        }
    }

    /// Like [`to_config`](Self::to_config) but rejects values the core
    /// would misbehave on.
    pub fn validated_config(
        &self,
        viewport: Option<&ResponsiveViewport>,
    ) -> Result<SimulationConfig, SettingsError> {
        let config = self.to_config(viewport);
        config.validate()?;
        Ok(config)
    }
}

/// A named set of model assets agents are drawn with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub models: Vec<String>,
}

impl Theme {
    pub const DEFAULT_NAME: &'static str = "default";

    pub fn new(name: impl Into<String>, models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// Identifiers handed to the core when the flock is rebuilt.
    pub fn model_kinds(&self) -> Result<Vec<ModelKind>, SettingsError> {
        (0..self.models.len())
            .map(|index| u16::try_from(index).map(ModelKind))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SettingsError::TooManyModels {
                theme: self.name.clone(),
                count: self.models.len(),
            })
    }

    pub fn model_name(&self, kind: ModelKind) -> Option<&str> {
        self.models.get(kind.0 as usize).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self { themes }
    }

    pub fn get(&self, name: &str) -> Result<&Theme, SettingsError> {
        self.themes
            .iter()
            .find(|theme| theme.name == name)
            .ok_or_else(|| SettingsError::UnknownTheme(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|theme| theme.name.as_str())
    }

    /// Rejects any theme whose models cannot all be given a model kind.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.themes.iter().try_for_each(|theme| theme.model_kinds().map(|_| ()))
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::new(vec![Theme::new(Theme::DEFAULT_NAME, ["boid"])])
    }
}

/// Everything a host reads from a settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsFile {
    pub simulation: SimulationSettings,
    pub themes: ThemeCatalog,
}

impl SettingsFile {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let file: Self = serde_json::from_str(json)?;
        file.themes.validate()?;
        Ok(file)
    }

    pub fn active_theme(&self) -> Result<&Theme, SettingsError> {
        self.themes.get(&self.simulation.theme)
    }
}
