//! Entities: identity, local transform, and attached components.
//!
//! An [`Entity`] lives inside a [`Scene`](crate::Scene) arena. Parent and
//! child links are stored as ids and are only mutated through
//! [`Scene::set_parent`](crate::Scene::set_parent), which keeps both sides in
//! sync. Everything that only concerns one entity (its components, its
//! activation, its local transform) is handled here.
//!
//! A component is *live* when both its entity is active and the component
//! itself is enabled; `on_enable`/`on_disable` fire on every transition of
//! that state.

use scene_component::{Component, ComponentTypeId, EntityId, EntityRef};
use scene_math::{Quat, Transform, Vec3};
use tracing::debug;
use uuid::Uuid;

use crate::error::SceneError;

/// A component attached to an entity, with its enabled flag.
pub struct ComponentSlot {
    component: Box<dyn Component>,
    type_id: ComponentTypeId,
    enabled: bool,
}

impl ComponentSlot {
    /// The attached component.
    #[must_use]
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }

    /// Mutable access to the attached component.
    pub fn component_mut(&mut self) -> &mut (dyn Component + 'static) {
        self.component.as_mut()
    }

    #[must_use]
    pub fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    /// The component's registered type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.component.component_name()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("type", &self.type_name())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A node in the scene graph.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    guid: Uuid,
    name: String,
    material: Option<Uuid>,
    active: bool,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    transform: Transform,
    transform_revision: u64,
    pub(crate) transform_dirty: bool,
    components: Vec<ComponentSlot>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, guid: Uuid, name: String) -> Self {
        Self {
            id,
            guid,
            name,
            material: None,
            active: true,
            parent: None,
            children: Vec::new(),
            transform: Transform::IDENTITY,
            transform_revision: 0,
            transform_dirty: true,
            components: Vec::new(),
        }
    }

    // -- Identity --

    /// Scene-scoped id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Persistent identity, stable across save/load.
    #[must_use]
    pub fn guid(&self) -> Uuid {
        self.guid
    }

    /// A reference handle to this entity.
    #[must_use]
    pub fn handle(&self) -> EntityRef {
        EntityRef::new(self.id, self.guid)
    }

    /// Display name. Not required to be unique.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Asset GUID of the material used to render this entity.
    #[must_use]
    pub fn material(&self) -> Option<Uuid> {
        self.material
    }

    /// Set or clear the material asset GUID.
    pub fn set_material(&mut self, material: Option<Uuid>) {
        self.material = material;
    }

    // -- Hierarchy (read-only; mutate through `Scene::set_parent`) --

    /// The parent entity, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    // -- Activation --

    /// Whether the entity itself is active.
    ///
    /// Inactive entities keep their components attached but not live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate the entity, fanning `on_enable`/`on_disable`
    /// out to every enabled component.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        let owner = self.id;
        if active {
            self.active = true;
            for slot in self.components.iter_mut().filter(|s| s.enabled) {
                slot.component.on_enable(owner);
            }
        } else {
            for slot in self.components.iter_mut().filter(|s| s.enabled) {
                slot.component.on_disable(owner);
            }
            self.active = false;
        }
        debug!(entity = %owner, active, "entity activation changed");
    }

    // -- Local transform --

    /// The parent-relative transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[must_use]
    pub fn local_position(&self) -> Vec3 {
        self.transform.position
    }

    #[must_use]
    pub fn local_rotation(&self) -> Quat {
        self.transform.rotation
    }

    #[must_use]
    pub fn local_scale(&self) -> Vec3 {
        self.transform.scale
    }

    pub fn set_local_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.notify_transform_changed();
    }

    pub fn set_local_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
        self.notify_transform_changed();
    }

    pub fn set_local_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.notify_transform_changed();
    }

    /// Set all three local parts with a single change notification.
    pub fn set_local_trs(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.set_local_transform(Transform::from_trs(position, rotation, scale));
    }

    /// Replace the local transform with a single change notification.
    pub fn set_local_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.notify_transform_changed();
    }

    /// Record that this entity's pose changed.
    ///
    /// Bumps [`transform_revision`](Self::transform_revision) and queues the
    /// entity for [`Scene::take_transform_changes`](crate::Scene::take_transform_changes).
    pub fn notify_transform_changed(&mut self) {
        self.transform_revision += 1;
        self.transform_dirty = true;
    }

    /// Number of transform change notifications this entity has received.
    #[must_use]
    pub fn transform_revision(&self) -> u64 {
        self.transform_revision
    }

    // -- Components --

    /// Attach a component in the enabled state.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateComponent`] if a component of the same
    /// type is already attached; the existing one is left untouched.
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<(), SceneError> {
        self.insert_component(Box::new(component), true)
    }

    /// Attach a boxed component in the enabled state.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateComponent`] if a component of the same
    /// type is already attached.
    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) -> Result<(), SceneError> {
        self.insert_component(component, true)
    }

    /// Attach a boxed component with an explicit enabled flag.
    ///
    /// Fires `on_attached`, then `on_enable` if the component is live.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateComponent`] if a component of the same
    /// type is already attached.
    pub fn insert_component(
        &mut self,
        mut component: Box<dyn Component>,
        enabled: bool,
    ) -> Result<(), SceneError> {
        let type_id = component.component_type();
        if self.has_component_type(type_id) {
            return Err(SceneError::DuplicateComponent {
                entity: self.id,
                component: component.component_name(),
            });
        }

        component.on_attached(self.id);
        if self.active && enabled {
            component.on_enable(self.id);
        }
        debug!(
            entity = %self.id,
            component = component.component_name(),
            "component attached"
        );
        self.components.push(ComponentSlot {
            component,
            type_id,
            enabled,
        });
        Ok(())
    }

    /// Detach and destroy the `T` component.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ComponentNotFound`] if no `T` is attached.
    pub fn remove_component<T: Component>(&mut self) -> Result<(), SceneError> {
        self.remove_component_by_type(T::component_type_id())
    }

    /// Detach and destroy the component of the given type.
    ///
    /// Fires `on_disable` (if live), `on_detached`, then `on_destroy`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ComponentNotFound`] if no such component is attached.
    pub fn remove_component_by_type(&mut self, type_id: ComponentTypeId) -> Result<(), SceneError> {
        let index = self
            .components
            .iter()
            .position(|s| s.type_id == type_id)
            .ok_or_else(|| SceneError::ComponentNotFound {
                entity: self.id,
                component: format!("{type_id:?}"),
            })?;
        let slot = self.components.remove(index);
        self.teardown(slot);
        Ok(())
    }

    /// Tear down every component, as happens when the entity is destroyed.
    pub(crate) fn destroy_components(&mut self) {
        for slot in std::mem::take(&mut self.components) {
            self.teardown(slot);
        }
    }

    fn teardown(&self, mut slot: ComponentSlot) {
        let owner = self.id;
        if self.active && slot.enabled {
            slot.component.on_disable(owner);
        }
        slot.component.on_detached(owner);
        slot.component.on_destroy(owner);
        debug!(entity = %owner, component = slot.type_name(), "component destroyed");
    }

    /// Returns `true` if a `T` component is attached.
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.has_component_type(T::component_type_id())
    }

    #[must_use]
    pub fn has_component_type(&self, type_id: ComponentTypeId) -> bool {
        self.components.iter().any(|s| s.type_id == type_id)
    }

    /// The attached `T` component.
    #[must_use]
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.component_by_type(T::component_type_id())
            .and_then(|c| c.downcast_ref::<T>())
    }

    /// Mutable access to the attached `T` component.
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.component_by_type_mut(T::component_type_id())
            .and_then(|c| c.downcast_mut::<T>())
    }

    /// The attached component of the given type.
    #[must_use]
    pub fn component_by_type(&self, type_id: ComponentTypeId) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|s| s.type_id == type_id)
            .map(ComponentSlot::component)
    }

    /// Mutable access to the attached component of the given type.
    pub fn component_by_type_mut(
        &mut self,
        type_id: ComponentTypeId,
    ) -> Option<&mut (dyn Component + 'static)> {
        self.components
            .iter_mut()
            .find(|s| s.type_id == type_id)
            .map(ComponentSlot::component_mut)
    }

    /// All attached components, in attachment order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentSlot> {
        self.components.iter()
    }

    /// Mutable iteration over attached components.
    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut ComponentSlot> {
        self.components.iter_mut()
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the component of the given type is enabled.
    #[must_use]
    pub fn is_component_enabled(&self, type_id: ComponentTypeId) -> Option<bool> {
        self.components
            .iter()
            .find(|s| s.type_id == type_id)
            .map(|s| s.enabled)
    }

    /// Enable or disable a component, firing `on_enable`/`on_disable` when
    /// the entity is active.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ComponentNotFound`] if no such component is attached.
    pub fn set_component_enabled(
        &mut self,
        type_id: ComponentTypeId,
        enabled: bool,
    ) -> Result<(), SceneError> {
        let owner = self.id;
        let active = self.active;
        let slot = self
            .components
            .iter_mut()
            .find(|s| s.type_id == type_id)
            .ok_or_else(|| SceneError::ComponentNotFound {
                entity: owner,
                component: format!("{type_id:?}"),
            })?;
        if slot.enabled == enabled {
            return Ok(());
        }
        slot.enabled = enabled;
        if active {
            if enabled {
                slot.component.on_enable(owner);
            } else {
                slot.component.on_disable(owner);
            }
        }
        Ok(())
    }
}
