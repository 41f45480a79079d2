//! # scene_graph
//!
//! The runtime scene graph: a [`Scene`] owns an arena of [`Entity`] values
//! keyed by [`EntityId`](scene_component::EntityId). Each entity owns its
//! local [`Transform`](scene_math::Transform) and a set of components (at
//! most one per concrete type).
//!
//! This crate provides:
//!
//! - [`scene`]: entity allocation, GUID lookup, parenting with cycle checks,
//!   local/world transform conversion, transform change tracking.
//! - [`entity`]: component attachment, lifecycle fan-out, activation.
//! - [`clone`]: whole-scene duplication with reference remapping.
//! - [`config`]: scene configuration.
//! - [`error`]: the [`SceneError`] type.

pub mod clone;
pub mod config;
pub mod entity;
pub mod error;
pub mod scene;

pub use clone::{ComponentHost, SceneCloner, copy_members};
pub use config::SceneConfig;
pub use entity::{ComponentSlot, Entity};
pub use error::SceneError;
pub use scene::Scene;
