use thiserror::Error;

/// Reasons a [`SimulationConfig`](crate::SimulationConfig) is rejected by
/// [`validate`](crate::SimulationConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("minimum scale must be positive, got {0}")]
    NonPositiveScale(f32),
    #[error("scale range is inverted: min {min} > max {max}")]
    InvertedScaleRange { min: f32, max: f32 },
    #[error("{name} must be a finite non-negative number, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("boundary extent on axis {axis} must be finite and non-negative, got {value}")]
    InvalidBoundary { axis: char, value: f32 },
    #[error("population of {requested} exceeds the limit of {max}")]
    PopulationTooLarge { requested: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlockError {
    #[error("population of {requested} exceeds flock capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}
