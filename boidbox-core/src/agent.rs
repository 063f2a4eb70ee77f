use crate::vector::Vector3D;

/// Opaque identifier of the visual asset an agent is drawn with.
///
/// The core only stores it. Hosts resolve it against their theme catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModelKind(pub u16);

impl ModelKind {
    /// Used when a flock is built without any registered models.
    pub const DEFAULT: ModelKind = ModelKind(0);
}

/// A single wandering boid
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub position: Vector3D,
    /// Displacement applied per tick, not a per-second rate.
    pub velocity: Vector3D,
    /// Phase of the wander circle in radians. Never normalized.
    pub wander_angle: f32,
    pub scale: f32,
    pub model_kind: ModelKind,
}

impl Agent {
    pub fn new(position: Vector3D, wander_angle: f32, scale: f32, model_kind: ModelKind) -> Self {
        Self {
            position,
            velocity: Vector3D::zero(),
            wander_angle,
            scale,
            model_kind,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.wander_angle.is_finite()
            && self.scale.is_finite()
    }

    /// Point a renderer should face this agent towards.
    pub fn look_target(&self) -> Vector3D {
        self.position + self.velocity
    }
}
