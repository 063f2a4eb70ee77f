//! Facing helpers for renderers.
//!
//! These only read an agent's exported position and velocity. Nothing here
//! is written back into the simulation.

use boidbox_core::Vector3D;

/// Fraction of the way an agent turns towards its heading each frame.
pub const HEADING_BLEND: f32 = 0.1;

const WORLD_UP: Vector3D = Vector3D::new(0.0, 1.0, 0.0);

fn cross(a: Vector3D, b: Vector3D) -> Vector3D {
    Vector3D::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// Unit quaternion rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    fn axis(&self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z)
    }

    pub fn dot(&self, other: &Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    fn normalized(self) -> Self {
        let len = libm::sqrtf(self.dot(&self));
        if len == 0.0 {
            return Self::IDENTITY;
        }
        Self {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
            w: self.w / len,
        }
    }

    /// Rotates `v` by this quaternion.
    pub fn rotate(&self, v: Vector3D) -> Vector3D {
        let t = cross(self.axis(), v) * 2.0;
        v + t * self.w + cross(self.axis(), t)
    }

    /// Spherical interpolation from `self` towards `other` by `t` in `[0, 1]`.
    pub fn slerp(self, other: Quat, t: f32) -> Quat {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }

        // take the short way round
        let mut cos_half = self.dot(&other);
        let other = if cos_half < 0.0 {
            cos_half = -cos_half;
            Quat {
                x: -other.x,
                y: -other.y,
                z: -other.z,
                w: -other.w,
            }
        } else {
            other
        };

        if cos_half >= 1.0 {
            return self;
        }

        let sqr_sin_half = 1.0 - cos_half * cos_half;
        if sqr_sin_half <= f32::EPSILON {
            let s = 1.0 - t;
            return Quat {
                x: s * self.x + t * other.x,
                y: s * self.y + t * other.y,
                z: s * self.z + t * other.z,
                w: s * self.w + t * other.w,
            }
            .normalized();
        }

        let sin_half = libm::sqrtf(sqr_sin_half);
        let half = libm::atan2f(sin_half, cos_half);
        let ratio_a = libm::sinf((1.0 - t) * half) / sin_half;
        let ratio_b = libm::sinf(t * half) / sin_half;

        Quat {
            x: self.x * ratio_a + other.x * ratio_b,
            y: self.y * ratio_a + other.y * ratio_b,
            z: self.z * ratio_a + other.z * ratio_b,
            w: self.w * ratio_a + other.w * ratio_b,
        }
    }

    /// Quaternion of the rotation matrix with the given basis columns.
    fn from_basis(x: Vector3D, y: Vector3D, z: Vector3D) -> Quat {
        let (m11, m12, m13) = (x.x, y.x, z.x);
        let (m21, m22, m23) = (x.y, y.y, z.y);
        let (m31, m32, m33) = (x.z, y.z, z.z);
        let trace = m11 + m22 + m33;

        if trace > 0.0 {
            let s = 0.5 / libm::sqrtf(trace + 1.0);
            Quat {
                w: 0.25 / s,
                x: (m32 - m23) * s,
                y: (m13 - m31) * s,
                z: (m21 - m12) * s,
            }
        } else if m11 > m22 && m11 > m33 {
            let s = 2.0 * libm::sqrtf(1.0 + m11 - m22 - m33);
            Quat {
                w: (m32 - m23) / s,
                x: 0.25 * s,
                y: (m12 + m21) / s,
                z: (m13 + m31) / s,
            }
        } else if m22 > m33 {
            let s = 2.0 * libm::sqrtf(1.0 + m22 - m11 - m33);
            Quat {
                w: (m13 - m31) / s,
                x: (m12 + m21) / s,
                y: 0.25 * s,
                z: (m23 + m32) / s,
            }
        } else {
            let s = 2.0 * libm::sqrtf(1.0 + m33 - m11 - m22);
            Quat {
                w: (m21 - m12) / s,
                x: (m13 + m31) / s,
                y: (m23 + m32) / s,
                z: 0.25 * s,
            }
        }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation turning the local +Z axis towards `direction`, keeping +Y up.
///
/// A zero direction faces +Z.
pub fn look_rotation(direction: Vector3D) -> Quat {
    let mut z = direction;
    if z.magnitude_squared() == 0.0 {
        z.z = 1.0;
    }
    let mut z = z.normalize();

    let mut x = cross(WORLD_UP, z);
    if x.magnitude_squared() == 0.0 {
        // straight up or down
        z.z += 0.0001;
        z = z.normalize();
        x = cross(WORLD_UP, z);
    }
    let x = x.normalize();
    let y = cross(z, x);

    Quat::from_basis(x, y, z)
}

/// Next frame's orientation for an agent heading along `velocity`.
pub fn smooth_heading(current: Quat, velocity: Vector3D, blend: f32) -> Quat {
    current.slerp(look_rotation(velocity), blend)
}

/// Radius of the debug wander circle drawn inside an agent's scaled model.
pub fn debug_circle_radius(wander_radius: f32, scale: f32) -> f32 {
    wander_radius / scale
}
