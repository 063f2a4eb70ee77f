use boidbox_core::Boundaries;
use serde::{Deserialize, Serialize};

/// Viewport the configured boundaries were designed for.
pub const REFERENCE_WIDTH: f32 = 1920.0;
pub const REFERENCE_HEIGHT: f32 = 1080.0;

/// Smallest factor the boundaries are shrunk by on a small screen.
pub const MIN_VIEWPORT_SCALE: f32 = 0.5;

/// Stretches the x and y extents of the box with the host's viewport so
/// the flock fills the screen. Depth is never scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveViewport {
    pub width: f32,
    pub height: f32,
}

impl ResponsiveViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scale_x(&self) -> f32 {
        (self.width / REFERENCE_WIDTH).max(MIN_VIEWPORT_SCALE)
    }

    pub fn scale_y(&self) -> f32 {
        (self.height / REFERENCE_HEIGHT).max(MIN_VIEWPORT_SCALE)
    }

    pub fn fit(&self, boundaries: Boundaries) -> Boundaries {
        Boundaries::new(
            boundaries.x * self.scale_x(),
            boundaries.y * self.scale_y(),
            boundaries.z,
        )
    }
}

impl std::str::FromStr for ResponsiveViewport {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width: f32 = width
            .trim()
            .parse()
            .map_err(|e| format!("bad viewport width '{width}': {e}"))?;
        let height: f32 = height
            .trim()
            .parse()
            .map_err(|e| format!("bad viewport height '{height}': {e}"))?;
        Ok(Self::new(width, height))
    }
}
