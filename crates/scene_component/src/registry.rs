//! Component type registry.
//!
//! Maps component type names to factories so that payloads naming a type
//! (`"componentType": "Light"`) can be turned back into instances. Lookups
//! accept either the registered name or a qualified form such as
//! `"Engine.Components.Light"` / `"engine::components::Light"`, which resolve
//! through the short name.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::component::{Component, ComponentTypeId};

/// Factory producing a default-constructed component.
pub type ComponentFactory = fn() -> Box<dyn Component>;

fn create_default<T: Component + Default>() -> Box<dyn Component> {
    Box::new(T::default())
}

/// Returns the segment after the last `.` or `::` separator.
#[must_use]
pub fn short_type_name(name: &str) -> &str {
    name.rsplit(['.', ':']).next().unwrap_or(name)
}

/// A registered component type.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRegistration {
    /// The registered type name.
    pub name: &'static str,
    /// The type's identifier.
    pub type_id: ComponentTypeId,
    factory: ComponentFactory,
}

impl ComponentRegistration {
    /// Create a default instance of this component type.
    #[must_use]
    pub fn create(&self) -> Box<dyn Component> {
        (self.factory)()
    }
}

/// Registry of every component type known to the loader and clone engine.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    by_id: HashMap<ComponentTypeId, ComponentRegistration>,
    by_short_name: HashMap<&'static str, ComponentTypeId>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register component type `T`.
    ///
    /// Returns `false` if a type with the same name was already registered,
    /// in which case the previous registration is replaced.
    ///
    /// A short name stays bound to the first type registered under it; a
    /// later type sharing that short name is only reachable by its full name.
    pub fn register<T: Component + Default>(&mut self) -> bool {
        let registration = ComponentRegistration {
            name: T::type_name(),
            type_id: T::component_type_id(),
            factory: create_default::<T>,
        };
        debug!(component = registration.name, "registered component type");
        let short = short_type_name(registration.name);
        match self.by_short_name.get(short) {
            None => {
                self.by_short_name.insert(short, registration.type_id);
            }
            Some(existing) if *existing != registration.type_id => {
                warn!(
                    component = registration.name,
                    short_name = short,
                    existing = self.by_id.get(existing).map_or("?", |r| r.name),
                    "short type name already taken, lookup needs the full name"
                );
            }
            Some(_) => {}
        }
        self.by_id
            .insert(registration.type_id, registration)
            .is_none()
    }

    /// Chainable form of [`register`](Self::register).
    #[must_use]
    pub fn with<T: Component + Default>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Look up a registration by type id.
    #[must_use]
    pub fn get(&self, type_id: ComponentTypeId) -> Option<&ComponentRegistration> {
        self.by_id.get(&type_id)
    }

    /// Look up a registration by full or short type name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ComponentRegistration> {
        self.by_id
            .get(&ComponentTypeId::from_name(name))
            .or_else(|| {
                self.by_short_name
                    .get(short_type_name(name))
                    .and_then(|id| self.by_id.get(id))
            })
    }

    /// Create a default instance of the named type.
    #[must_use]
    pub fn create(&self, name: &str) -> Option<Box<dyn Component>> {
        self.lookup(name).map(ComponentRegistration::create)
    }

    /// Returns `true` if the type is registered.
    #[must_use]
    pub fn contains(&self, type_id: ComponentTypeId) -> bool {
        self.by_id.contains_key(&type_id)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate over all registrations.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentRegistration> {
        self.by_id.values()
    }
}
