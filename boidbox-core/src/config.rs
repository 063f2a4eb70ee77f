use crate::error::ConfigError;
use crate::vector::Vector3D;

/// Largest population `validate` accepts.
pub const MAX_POPULATION: usize = 10_000;

/// Full size of the box the flock lives in. Agents are contained within
/// half of each extent on either side of the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundaries {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Boundaries {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn half_extents(&self) -> Vector3D {
        Vector3D::new(self.x / 2.0, self.y / 2.0, self.z / 2.0)
    }

    /// Whether `position` lies inside the box, walls included.
    pub fn contains(&self, position: &Vector3D) -> bool {
        let half = self.half_extents();
        (0..3).all(|axis| crate::math::abs(position[axis]) <= half[axis])
    }
}

impl Default for Boundaries {
    fn default() -> Self {
        Self::new(12.0, 8.0, 20.0)
    }
}

/// How the per-tick wander perturbation reacts to frame time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum JitterMode {
    /// The same ±0.05 rad jitter every tick, regardless of `delta`.
    /// Wander turns faster at higher frame rates.
    #[default]
    PerTick,
    /// Jitter multiplied by `delta * reference_rate`, so a run at
    /// `reference_rate` ticks per second matches `PerTick`.
    ScaledByDelta { reference_rate: f32 },
}

/// Tunable parameters for one tick of the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    pub population: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Accepted for hosts that expose it. The velocity clamp is one-sided
    /// and never reads it.
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_steering: f32,
    pub wander_radius: f32,
    pub wander_strength: f32,
    pub boundaries: Boundaries,
    /// Keep every agent on the z = 0 plane.
    pub planar: bool,
    pub jitter: JitterMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 60,
            min_scale: 0.7,
            max_scale: 1.3,
            min_speed: 0.9,
            max_speed: 3.6,
            max_steering: 0.1,
            wander_radius: 5.0,
            wander_strength: 2.0,
            boundaries: Boundaries::default(),
            planar: true,
            jitter: JitterMode::PerTick,
        }
    }
}

impl SimulationConfig {
    /// Checks the values a host loaded from an external source. Stepping
    /// never calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population > MAX_POPULATION {
            return Err(ConfigError::PopulationTooLarge {
                requested: self.population,
                max: MAX_POPULATION,
            });
        }
        if !(self.min_scale > 0.0) {
            return Err(ConfigError::NonPositiveScale(self.min_scale));
        }
        if self.min_scale > self.max_scale || !self.max_scale.is_finite() {
            return Err(ConfigError::InvertedScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }

        let non_negative = [
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("max_steering", self.max_steering),
            ("wander_radius", self.wander_radius),
            ("wander_strength", self.wander_strength),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if let JitterMode::ScaledByDelta { reference_rate } = self.jitter {
            if !(reference_rate >= 0.0) || !reference_rate.is_finite() {
                return Err(ConfigError::Negative {
                    name: "reference_rate",
                    value: reference_rate,
                });
            }
        }

        let b = self.boundaries;
        for (axis, value) in [('x', b.x), ('y', b.y), ('z', b.z)] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidBoundary { axis, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_half_extents() {
        let half = Boundaries::new(12.0, 8.0, 20.0).half_extents();
        assert_eq!(half, Vector3D::new(6.0, 4.0, 10.0));
    }

    #[test]
    fn test_contains() {
        let bounds = Boundaries::new(12.0, 8.0, 20.0);
        assert!(bounds.contains(&Vector3D::new(6.0, -4.0, 0.0)));
        assert!(!bounds.contains(&Vector3D::new(6.1, 0.0, 0.0)));
    }

    #[test]
    fn test_population_cap() {
        let at_cap = SimulationConfig {
            population: MAX_POPULATION,
            ..Default::default()
        };
        assert_eq!(at_cap.validate(), Ok(()));

        let huge = SimulationConfig {
            population: usize::MAX,
            ..Default::default()
        };
        assert_eq!(
            huge.validate(),
            Err(ConfigError::PopulationTooLarge {
                requested: usize::MAX,
                max: MAX_POPULATION
            })
        );
    }

    #[test]
    fn test_rejects_zero_scale() {
        let config = SimulationConfig {
            min_scale: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveScale(0.0)));
    }

    #[test]
    fn test_rejects_inverted_scale_range() {
        let config = SimulationConfig {
            min_scale: 1.5,
            max_scale: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedScaleRange { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_steering() {
        let config = SimulationConfig {
            max_steering: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                name: "max_steering",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_boundary() {
        let config = SimulationConfig {
            boundaries: Boundaries::new(12.0, f32::NAN, 20.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBoundary { axis: 'y', .. })
        ));
    }

    #[test]
    fn test_min_speed_above_max_is_accepted() {
        // min_speed is carried but never enforced
        let config = SimulationConfig {
            min_speed: 8.0,
            max_speed: 1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }
}
