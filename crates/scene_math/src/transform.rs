//! Local TRS transform and hierarchy composition.
//!
//! [`Transform`] holds position, rotation, and non-uniform scale relative to
//! a parent. World poses are obtained by folding [`Transform::compose`] down
//! the ancestor chain:
//!
//! ```text
//! world.scale    = parent.scale ⊙ local.scale
//! world.rotation = normalize(parent.rotation ∘ local.rotation)
//! world.position = parent.position + parent.rotation · (local.position ⊙ parent.scale)
//! ```
//!
//! The local position is scaled by the *parent's* scale before rotation, so a
//! non-uniformly scaled parent stretches its children's offsets along its own
//! axes. [`Transform::relative_to`] is the exact inverse, with every division
//! by a near-zero parent scale component yielding `0` instead of `NaN`/`Inf`.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Parent scale components with magnitude below this are treated as zero.
pub const SAFE_DIV_EPSILON: f32 = 1e-8;

/// Half the diagonal of a unit cube (`√3 / 2`).
pub const BOUNDS_RADIUS_FACTOR: f32 = 0.866_025_4;

/// Component-wise `a / b`, producing `0` on any axis where `|b| < 1e-8`.
#[must_use]
pub fn safe_div(a: Vec3, b: Vec3) -> Vec3 {
    let div = |n: f32, d: f32| if d.abs() < SAFE_DIV_EPSILON { 0.0 } else { n / d };
    Vec3::new(div(a.x, b.x), div(a.y, b.y), div(a.z, b.z))
}

/// Position, rotation, and non-uniform scale relative to a parent frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Parent-relative position.
    pub position: Vec3,
    /// Parent-relative rotation as a unit quaternion.
    pub rotation: Quat,
    /// Parent-relative scale, per axis.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform from all three parts.
    #[must_use]
    pub const fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a new transform with the given position and default rotation/scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform with position and rotation.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Compose a parent's world transform with a child's local transform.
    #[must_use]
    pub fn compose(parent: &Transform, local: &Transform) -> Transform {
        Transform {
            position: parent.position + parent.rotation * (local.position * parent.scale),
            rotation: (parent.rotation * local.rotation).normalize(),
            scale: parent.scale * local.scale,
        }
    }

    /// Express a world transform in the frame of `parent` (a world transform).
    ///
    /// Inverse of [`compose`](Self::compose). Axes where the parent's scale is
    /// (near) zero come out as `0`.
    #[must_use]
    pub fn relative_to(parent: &Transform, world: &Transform) -> Transform {
        let inv_rotation = parent.rotation.inverse();
        Transform {
            position: safe_div(inv_rotation * (world.position - parent.position), parent.scale),
            rotation: (inv_rotation * world.rotation).normalize(),
            scale: safe_div(world.scale, parent.scale),
        }
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Conservative bounding-sphere radius of a unit cube under this scale.
    ///
    /// Uses the largest absolute axis scale, so it over-estimates for
    /// strongly non-uniform scales and for meshes smaller than the cube.
    #[must_use]
    pub fn bounds_radius(&self) -> f32 {
        self.scale.abs().max_element() * BOUNDS_RADIUS_FACTOR
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Approximate equality on all three parts.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            // q and -q are the same rotation.
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    /// Rotate the transform by the given quaternion.
    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }

    /// Apply a scale factor per axis.
    #[must_use]
    pub fn scaled(mut self, factor: Vec3) -> Self {
        self.scale *= factor;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
