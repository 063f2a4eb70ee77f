//! Host-side pieces shared by the boidbox front ends.
//!
//! [`FlockHost`] ties user-facing settings, change tracking and viewport
//! fitting to the simulation core. Renderers read [`FrameSnapshot`]s and
//! turn agents with the [`heading`] helpers.

pub mod error;
pub mod heading;
pub mod host;
pub mod settings;
pub mod snapshot;
pub mod tracker;
pub mod viewport;

pub use error::SettingsError;
pub use heading::{look_rotation, smooth_heading, Quat, HEADING_BLEND};
pub use host::FlockHost;
pub use settings::{SettingsFile, SimulationSettings, Theme, ThemeCatalog};
pub use snapshot::{AgentSnapshot, FrameSnapshot};
pub use tracker::{SettingsChange, SettingsTracker};
pub use viewport::ResponsiveViewport;
