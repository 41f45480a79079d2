//! Punctual and directional lights.

use scene_component::{Component, SerializeAttr, impl_reflect, impl_reflect_enum};
use scene_math::Vec3;

/// How a [`Light`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightType {
    Directional,
    #[default]
    Point,
    Spot,
}

impl_reflect_enum!(LightType { Directional, Point, Spot });

/// A light source.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Linear RGB color.
    pub color: Vec3,
    pub intensity: f32,
    pub light_type: LightType,
    /// Falloff distance for point and spot lights.
    pub range: f32,
    /// Full cone angle in degrees for spot lights.
    pub spot_angle: f32,
    pub cast_shadows: bool,
}

impl_reflect!(Light as "Light" {
    color: Vec3 => SerializeAttr::new(),
    intensity: f32 => SerializeAttr::new(),
    light_type: LightType => SerializeAttr::new().key("type"),
    range: f32 => SerializeAttr::new(),
    spot_angle: f32 => SerializeAttr::new().key("spotAngle").since(2),
    cast_shadows: bool => SerializeAttr::new().key("castShadows"),
});

impl Component for Light {}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            light_type: LightType::Point,
            range: 10.0,
            spot_angle: 45.0,
            cast_shadows: false,
        }
    }
}

impl Light {
    /// A point light with the default range.
    #[must_use]
    pub fn point(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            ..Self::default()
        }
    }

    /// A directional light. Range does not apply.
    #[must_use]
    pub fn directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            light_type: LightType::Directional,
            ..Self::default()
        }
    }

    /// Color premultiplied by intensity, as a renderer would upload it.
    #[must_use]
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }

    /// Returns `true` if the light reaches a point `distance` away.
    #[must_use]
    pub fn reaches(&self, distance: f32) -> bool {
        match self.light_type {
            LightType::Directional => true,
            LightType::Point | LightType::Spot => distance <= self.range,
        }
    }
}
