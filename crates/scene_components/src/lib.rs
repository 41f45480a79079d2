//! # scene_components
//!
//! Concrete components that consume the scene graph through lifecycle
//! hooks, world-transform queries, and the serialized payload format.
//!
//! Call [`registry`] and [`serializer`] to get a loader/clone setup that
//! knows every type in this crate.

pub mod camera;
pub mod light;
pub mod mesh;
pub mod post_process;
pub mod script;
pub mod tracking;

pub use camera::{Camera, Projection};
pub use light::{Light, LightType};
pub use mesh::MeshRenderer;
pub use post_process::{
    Bloom, Effect, PostProcessSerializer, PostProcessStack, Tonemap, TonemapMode, Vignette,
};
pub use script::Script;
pub use tracking::{Follow, LookAt};

use scene_component::ComponentRegistry;
use scene_serde::Serializer;

/// Register every component type in this crate.
pub fn register_all(registry: &mut ComponentRegistry) {
    registry.register::<Light>();
    registry.register::<Camera>();
    registry.register::<MeshRenderer>();
    registry.register::<Follow>();
    registry.register::<LookAt>();
    registry.register::<Script>();
    registry.register::<PostProcessStack>();
}

/// A registry containing every component type in this crate.
#[must_use]
pub fn registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    register_all(&mut registry);
    registry
}

/// A serializer with the custom formats this crate needs.
#[must_use]
pub fn serializer() -> Serializer {
    Serializer::new().with(PostProcessSerializer)
}
