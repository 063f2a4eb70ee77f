//! Float helpers that work with and without `std`.

#[cfg(feature = "std")]
pub fn sqrt(x: f32) -> f32 {
    x.sqrt()
}

#[cfg(not(feature = "std"))]
pub fn sqrt(x: f32) -> f32 {
    libm::sqrtf(x)
}

#[cfg(feature = "std")]
pub fn sin_cos(angle: f32) -> (f32, f32) {
    angle.sin_cos()
}

#[cfg(not(feature = "std"))]
pub fn sin_cos(angle: f32) -> (f32, f32) {
    (libm::sinf(angle), libm::cosf(angle))
}

pub fn abs(x: f32) -> f32 {
    libm::fabsf(x)
}
