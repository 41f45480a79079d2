//! Scene-level error types.

use scene_component::{EntityId, IdError, ReflectError};
use uuid::Uuid;

/// Errors that can occur while mutating or cloning a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// No entity with this id lives in the scene.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// The scene's entity id range is used up.
    #[error(transparent)]
    IdExhausted(#[from] IdError),

    /// An entity with this GUID already exists.
    #[error("entity guid {0} already exists in the scene")]
    DuplicateGuid(Uuid),

    /// The entity already carries a component of this concrete type.
    #[error("component '{component}' is already attached to {entity}")]
    DuplicateComponent {
        /// The owning entity.
        entity: EntityId,
        /// The rejected component's type name.
        component: &'static str,
    },

    /// The entity carries no component of the requested type.
    #[error("component '{component}' not found on {entity}")]
    ComponentNotFound {
        /// The entity that was searched.
        entity: EntityId,
        /// Requested type name (or id when no name is known).
        component: String,
    },

    /// An entity was asked to become its own parent.
    #[error("{0} cannot be its own parent")]
    SelfParent(EntityId),

    /// The requested parent is a descendant of the child.
    #[error("parenting {child} under {parent} would create a cycle")]
    ParentCycle {
        /// The entity being reparented.
        child: EntityId,
        /// The rejected parent.
        parent: EntityId,
    },

    /// No registered component type matches this name.
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    /// A reflected member could not be read or written.
    #[error("reflection error: {0}")]
    Reflect(#[from] ReflectError),

    /// A [`ComponentHost`](crate::ComponentHost) refused or failed to create a component.
    #[error("component host error: {0}")]
    Host(String),
}
