//! # scene_math
//!
//! Math types for the scene graph. Re-exports [`glam`] for linear algebra and
//! defines the [`Transform`] TRS triple together with the parent/child
//! composition rules the hierarchy is built on.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use transform::{BOUNDS_RADIUS_FACTOR, SAFE_DIV_EPSILON, Transform, safe_div};
