//! Core [`Component`] trait and component type identity.
//!
//! A component is a typed data/behaviour bundle attached to exactly one
//! entity, with at most one instance of each concrete type per entity. The
//! owning entity drives the lifecycle hooks:
//!
//! ```text
//! add      on_attached → on_enable (if entity active and component enabled)
//! toggle   on_enable / on_disable
//! remove   on_disable (if it was live) → on_detached → on_destroy
//! ```
//!
//! ## Type identity
//!
//! [`ComponentTypeId`] is derived from the component's reflected type name
//! with FNV-1a 64-bit, so the same name always maps to the same id.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::reflect::Reflect;

/// A unique identifier for a component type, derived from its type name
/// using the FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentTypeId`] from a component type name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`ComponentTypeId`] for a Rust component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// The core component trait.
///
/// Implementors describe their members with [`impl_reflect!`](crate::impl_reflect)
/// and then opt into whichever lifecycle hooks they need. All hooks default
/// to no-ops and receive the id of the owning entity.
///
/// # Examples
///
/// ```rust
/// use scene_component::{impl_reflect, Component, SerializeAttr};
///
/// #[derive(Debug, Default)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl_reflect!(Health as "Health" {
///     current: f32 => SerializeAttr::new(),
///     max: f32 => SerializeAttr::new(),
/// });
///
/// impl Component for Health {}
///
/// assert_eq!(Health::type_name(), "Health");
/// ```
pub trait Component: Reflect + Send + Sync {
    /// The reflected type name of this component.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        Self::reflect_info().name
    }

    /// Returns the [`ComponentTypeId`] for this component type.
    fn component_type_id() -> ComponentTypeId
    where
        Self: Sized,
    {
        ComponentTypeId::from_name(Self::type_name())
    }

    /// Called once when the component is added to an entity.
    fn on_attached(&mut self, _owner: EntityId) {}

    /// Called when the component becomes live (entity active and component enabled).
    fn on_enable(&mut self, _owner: EntityId) {}

    /// Called when the component stops being live.
    fn on_disable(&mut self, _owner: EntityId) {}

    /// Called when the component is removed from its entity.
    fn on_detached(&mut self, _owner: EntityId) {}

    /// Called right before the component is dropped.
    fn on_destroy(&mut self, _owner: EntityId) {}

    /// Copy state the descriptor table cannot describe (collections, for
    /// example) from another instance of the same type.
    ///
    /// The clone engine calls this after copying every reflected member.
    fn copy_unreflected(&mut self, _source: &dyn Component) {}
}

impl<'a> dyn Component + 'a {
    /// The [`ComponentTypeId`] of the concrete type behind this trait object.
    #[must_use]
    pub fn component_type(&self) -> ComponentTypeId {
        ComponentTypeId::from_name(self.type_info().name)
    }

    /// The reflected type name of the concrete type behind this trait object.
    #[must_use]
    pub fn component_name(&self) -> &'static str {
        self.type_info().name
    }

    /// Downcast to a concrete component type.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        let any: &dyn Any = self.as_any();
        any.downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete component type.
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self.as_any_mut();
        any.downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_reflect;
    use crate::reflect::SerializeAttr;

    #[derive(Debug, Default, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl_reflect!(Health as "Health" {
        current: f32 => SerializeAttr::new(),
        max: f32 => SerializeAttr::new(),
    });

    impl Component for Health {}

    #[derive(Debug, Default)]
    struct Velocity {
        x: f32,
    }

    impl_reflect!(Velocity as "Velocity" {
        x: f32,
    });

    impl Component for Velocity {}

    #[test]
    fn test_component_type_id_is_stable() {
        assert_eq!(Health::component_type_id(), Health::component_type_id());
    }

    #[test]
    fn test_component_type_id_matches_from_name() {
        assert_eq!(
            Health::component_type_id(),
            ComponentTypeId::from_name("Health")
        );
        assert_eq!(ComponentTypeId::of::<Health>(), Health::component_type_id());
    }

    #[test]
    fn test_component_type_id_differs_between_types() {
        assert_ne!(Health::component_type_id(), Velocity::component_type_id());
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a 64-bit of empty string is the offset basis itself.
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }

    #[test]
    fn test_dyn_component_identity_and_downcast() {
        let mut boxed: Box<dyn Component> = Box::new(Health {
            current: 10.0,
            max: 20.0,
        });
        assert_eq!(boxed.component_name(), "Health");
        assert_eq!(boxed.component_type(), Health::component_type_id());
        assert!(boxed.downcast_ref::<Velocity>().is_none());

        boxed.downcast_mut::<Health>().unwrap().current = 15.0;
        assert_eq!(boxed.downcast_ref::<Health>().unwrap().current, 15.0);
    }
}
