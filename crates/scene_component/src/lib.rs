//! # scene_component
//!
//! The component half of the scene graph: what a component is, how entities are
//! identified, and how a component's members are described at runtime.
//!
//! This crate provides:
//!
//! - [`Component`] trait: lifecycle hooks every attached component receives.
//! - [`EntityId`] / [`EntityIdAllocator`]: dense ids drawn from a bounded range.
//! - [`Reflect`]: per-type descriptor table used by serialization and cloning.
//! - [`EntityRef`] / [`ComponentRef`]: cross-entity reference handles.
//! - [`ComponentRegistry`]: type-name lookup and default construction.

pub mod component;
pub mod entity;
pub mod error;
pub mod handle;
pub mod reflect;
pub mod registry;

pub use component::{Component, ComponentTypeId};
pub use entity::{
    EntityId, EntityIdAllocator, GIZMO_ID_START, MAX_ENTITY_ID, MAX_SUPPORTED_ENTITIES,
    MIN_ENTITY_ID, NO_PICK_ID, PickTarget, classify_pick_id,
};
pub use error::{IdError, ReflectError};
pub use handle::{ComponentRef, EntityRef};
pub use reflect::{FieldInfo, FieldKind, FieldType, Reflect, SerializeAttr, TypeInfo, Value};
pub use registry::{ComponentRegistration, ComponentRegistry, short_type_name};

pub use glam;
pub use uuid::Uuid;
