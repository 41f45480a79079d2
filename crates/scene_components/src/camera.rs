//! Cameras.

use scene_component::{Component, SerializeAttr, impl_reflect, impl_reflect_enum};
use scene_math::{Mat4, Transform};

/// How a [`Camera`] projects the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl_reflect_enum!(Projection { Perspective, Orthographic });

/// A camera looking down its entity's local `-Z` axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Half the vertical extent of an orthographic view.
    pub ortho_size: f32,
    /// The camera the scene renders from when several exist.
    pub primary: bool,
}

impl_reflect!(Camera as "Camera" {
    projection: Projection => SerializeAttr::new(),
    fov: f32 => SerializeAttr::new().key("fieldOfView"),
    near: f32 => SerializeAttr::new().key("nearClip"),
    far: f32 => SerializeAttr::new().key("farClip"),
    ortho_size: f32 => SerializeAttr::new().key("orthoSize"),
    primary: bool => SerializeAttr::new(),
});

impl Component for Camera {}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            ortho_size: 5.0,
            primary: false,
        }
    }
}

impl Camera {
    /// Right-handed projection matrix with a `[0, 1]` depth range.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
            }
            Projection::Orthographic => {
                let h = self.ortho_size;
                let w = h * aspect;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        }
    }

    /// View matrix for a camera placed at `world`.
    ///
    /// Scale is ignored so a scaled parent does not distort the view.
    #[must_use]
    pub fn view_matrix(world: &Transform) -> Mat4 {
        Mat4::from_rotation_translation(world.rotation, world.position).inverse()
    }
}

#[cfg(test)]
mod tests {
    use scene_math::{Quat, Vec3, Vec4};

    use super::*;

    #[test]
    fn test_view_matrix_moves_camera_to_origin() {
        let world = Transform::from_trs(Vec3::new(0.0, 2.0, 5.0), Quat::IDENTITY, Vec3::splat(3.0));
        let view = Camera::view_matrix(&world);
        let eye = view * Vec4::new(0.0, 2.0, 5.0, 1.0);
        assert!(eye.truncate().abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_projection_kinds_differ() {
        let mut camera = Camera::default();
        let perspective = camera.projection_matrix(16.0 / 9.0);
        camera.projection = Projection::Orthographic;
        assert_ne!(perspective, camera.projection_matrix(16.0 / 9.0));
    }
}
