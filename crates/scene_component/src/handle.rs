//! Cross-entity reference handles.
//!
//! Components never hold pointers to other graph nodes. A reference is a
//! handle carrying both the live binding (the [`EntityId`] inside the current
//! scene) and the target's GUID, which is what gets persisted. Handles are
//! bound by the loader's reference pass or remapped by the clone engine; a
//! handle whose target cannot be found is replaced by `None`.

use uuid::Uuid;

use crate::component::{Component, ComponentTypeId};
use crate::entity::EntityId;

/// A reference to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    /// Live binding inside the owning scene.
    pub id: EntityId,
    /// Persistent identity of the target.
    pub guid: Uuid,
}

impl EntityRef {
    /// Bind `guid` to its live `id`.
    #[must_use]
    pub const fn new(id: EntityId, guid: Uuid) -> Self {
        Self { id, guid }
    }
}

/// A reference to a component of a given type on another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    /// The entity carrying the component.
    pub entity: EntityRef,
    /// Type of the referenced component.
    pub type_id: ComponentTypeId,
    /// Registered name of the referenced component type.
    pub type_name: &'static str,
}

impl ComponentRef {
    /// Build a reference to the `T` component on `entity`.
    #[must_use]
    pub fn of<T: Component>(entity: EntityRef) -> Self {
        Self {
            entity,
            type_id: T::component_type_id(),
            type_name: T::type_name(),
        }
    }

    /// Build a reference from a registered type name.
    #[must_use]
    pub fn from_name(entity: EntityRef, type_name: &'static str) -> Self {
        Self {
            entity,
            type_id: ComponentTypeId::from_name(type_name),
            type_name,
        }
    }
}
