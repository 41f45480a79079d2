//! The scene: entity arena, id allocation, and hierarchy algebra.
//!
//! The [`Scene`] is the single owner of its entities. Entities are stored in
//! a `HashMap` keyed by [`EntityId`] with a parallel `Vec` preserving
//! creation order, plus a GUID index for resolving persisted references.
//!
//! ## Hierarchy
//!
//! Parent/child links are ids on both sides and are only ever changed by
//! [`Scene::set_parent`], which refuses self-parenting and cycles. World
//! poses are computed on demand by composing local transforms from the root
//! down (see [`scene_math::Transform::compose`]).

use std::collections::{HashMap, HashSet};

use scene_component::{Component, EntityId, EntityIdAllocator, EntityRef};
use scene_math::{Mat4, Quat, Transform, Vec3};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SceneConfig;
use crate::entity::Entity;
use crate::error::SceneError;

/// A scene graph.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    allocator: EntityIdAllocator,
    entities: HashMap<EntityId, Entity>,
    /// Entity ids in creation order.
    order: Vec<EntityId>,
    guid_index: HashMap<Uuid, EntityId>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            allocator: EntityIdAllocator::with_range(config.entity_ids.clone()),
            config,
            entities: HashMap::new(),
            order: Vec::new(),
            guid_index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    // -- Entity lifecycle --

    /// Create a root entity with a freshly minted GUID.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::IdExhausted`] once the id range is used up.
    pub fn create_entity(&mut self, name: impl Into<String>) -> Result<EntityId, SceneError> {
        self.create_entity_with_guid(name, Uuid::new_v4())
    }

    /// Create a root entity with a known GUID (used when loading).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateGuid`] if the GUID is taken, or
    /// [`SceneError::IdExhausted`] once the id range is used up.
    pub fn create_entity_with_guid(
        &mut self,
        name: impl Into<String>,
        guid: Uuid,
    ) -> Result<EntityId, SceneError> {
        if self.guid_index.contains_key(&guid) {
            return Err(SceneError::DuplicateGuid(guid));
        }
        let id = self.allocator.allocate()?;
        let entity = Entity::new(id, guid, name.into());
        debug!(entity = %id, %guid, name = entity.name(), "entity created");
        self.entities.insert(id, entity);
        self.order.push(id);
        self.guid_index.insert(guid, id);
        Ok(id)
    }

    /// Destroy an entity and its whole subtree.
    ///
    /// Descendants go first. Every component receives its teardown hooks
    /// before its entity is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), SceneError> {
        let parent = self.try_get(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.entities.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut doomed = vec![id];
        doomed.extend(self.descendants(id));
        for victim in doomed.into_iter().rev() {
            if let Some(mut entity) = self.entities.remove(&victim) {
                entity.destroy_components();
                self.guid_index.remove(&entity.guid());
                debug!(entity = %victim, "entity destroyed");
            }
        }
        self.order.retain(|e| self.entities.contains_key(e));
        Ok(())
    }

    // -- Lookup --

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    fn try_get(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(&id).ok_or(SceneError::EntityNotFound(id))
    }

    fn try_get_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        self.entities
            .get_mut(&id)
            .ok_or(SceneError::EntityNotFound(id))
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Find an entity by its persistent GUID.
    #[must_use]
    pub fn find_by_guid(&self, guid: &Uuid) -> Option<EntityId> {
        self.guid_index.get(guid).copied()
    }

    /// First entity (in creation order) with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.iter().find(|e| e.name() == name).map(Entity::id)
    }

    /// A reference handle to the entity, if it exists.
    #[must_use]
    pub fn entity_ref(&self, id: EntityId) -> Option<EntityRef> {
        self.entities.get(&id).map(Entity::handle)
    }

    /// Entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Entity ids in creation order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Entities without a parent, in creation order.
    #[must_use]
    pub fn roots(&self) -> Vec<EntityId> {
        self.iter()
            .filter(|e| e.parent().is_none())
            .map(Entity::id)
            .collect()
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// How many more entities can be allocated.
    #[must_use]
    pub fn remaining_capacity(&self) -> u32 {
        self.allocator.remaining()
    }

    // -- Components --

    /// Attach a component to an entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] or [`SceneError::DuplicateComponent`].
    pub fn add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<(), SceneError> {
        self.try_get_mut(id)?.add_component(component)
    }

    /// Activate or deactivate an entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> Result<(), SceneError> {
        self.try_get_mut(id)?.set_active(active);
        Ok(())
    }

    // -- Hierarchy --

    /// All descendants of `id` in depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = match self.entities.get(&id) {
            Some(e) => e.children().iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(e) = self.entities.get(&next) {
                stack.extend(e.children().iter().rev().copied());
            }
        }
        out
    }

    /// Returns `true` if `candidate` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_descendant_of(&self, id: EntityId, candidate: EntityId) -> bool {
        let mut cursor = self.entities.get(&id).and_then(Entity::parent);
        while let Some(ancestor) = cursor {
            if ancestor == candidate {
                return true;
            }
            cursor = self.entities.get(&ancestor).and_then(Entity::parent);
        }
        false
    }

    /// Reparent `child` under `parent` (or make it a root with `None`).
    ///
    /// With `keep_world`, the child's world pose is captured before relinking
    /// and restored afterwards, so it does not visibly move. Without it the
    /// local transform is kept verbatim.
    ///
    /// # Errors
    ///
    /// - [`SceneError::EntityNotFound`] if either entity is missing.
    /// - [`SceneError::SelfParent`] if `parent == child`.
    /// - [`SceneError::ParentCycle`] if `parent` is a descendant of `child`.
    ///
    /// The hierarchy is left untouched on error.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
        keep_world: bool,
    ) -> Result<(), SceneError> {
        let current = self.try_get(child)?.parent;
        if let Some(parent) = parent {
            self.try_get(parent)?;
            if parent == child {
                warn!(entity = %child, "refusing to parent entity to itself");
                return Err(SceneError::SelfParent(child));
            }
            if self.is_descendant_of(parent, child) {
                warn!(entity = %child, %parent, "refusing to create a hierarchy cycle");
                return Err(SceneError::ParentCycle { child, parent });
            }
        }
        if current == parent {
            return Ok(());
        }

        let world = if keep_world {
            Some(self.world_transform(child)?)
        } else {
            None
        };

        if let Some(old) = current.and_then(|p| self.entities.get_mut(&p)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(new) = parent.and_then(|p| self.entities.get_mut(&p)) {
            new.children.push(child);
        }
        self.try_get_mut(child)?.parent = parent;

        match world {
            Some(world) => self.set_world_transform(child, world)?,
            None => self.try_get_mut(child)?.notify_transform_changed(),
        }
        Ok(())
    }

    // -- Transforms --

    /// World-space pose of an entity.
    ///
    /// A root returns its local transform unchanged; otherwise the ancestor
    /// chain is composed from the root down.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn world_transform(&self, id: EntityId) -> Result<Transform, SceneError> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let entity = self.try_get(current)?;
            chain.push(*entity.transform());
            cursor = entity.parent();
        }

        let mut locals = chain.into_iter().rev();
        let mut world = locals.next().ok_or(SceneError::EntityNotFound(id))?;
        for local in locals {
            world = Transform::compose(&world, &local);
        }
        Ok(world)
    }

    /// World-space position, rotation, and scale of an entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn world_trs(&self, id: EntityId) -> Result<(Vec3, Quat, Vec3), SceneError> {
        let world = self.world_transform(id)?;
        Ok((world.position, world.rotation, world.scale))
    }

    /// Place an entity at a world-space pose.
    ///
    /// For parented entities the local transform is derived by inverting the
    /// parent's world transform (zero parent scale axes yield `0`). Fires a
    /// single change notification.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn set_world_transform(&mut self, id: EntityId, world: Transform) -> Result<(), SceneError> {
        let local = match self.try_get(id)?.parent() {
            Some(parent) => Transform::relative_to(&self.world_transform(parent)?, &world),
            None => world,
        };
        self.try_get_mut(id)?.set_local_transform(local);
        Ok(())
    }

    /// [`set_world_transform`](Self::set_world_transform) from separate parts.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn set_world_trs(
        &mut self,
        id: EntityId,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Result<(), SceneError> {
        self.set_world_transform(id, Transform::from_trs(position, rotation, scale))
    }

    /// Set an entity's local pose with a single change notification.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn set_local_trs(
        &mut self,
        id: EntityId,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Result<(), SceneError> {
        self.try_get_mut(id)?
            .set_local_trs(position, rotation, scale);
        Ok(())
    }

    /// World model matrix of an entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn world_matrix(&self, id: EntityId) -> Result<Mat4, SceneError> {
        Ok(self.world_transform(id)?.to_matrix())
    }

    /// Conservative bounding-sphere radius from the world scale.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EntityNotFound`] if the entity does not exist.
    pub fn bounds_radius(&self, id: EntityId) -> Result<f32, SceneError> {
        Ok(self.world_transform(id)?.bounds_radius())
    }

    /// Drain the set of entities whose world pose changed since the last call.
    ///
    /// An entity is reported when its own transform was written or it was
    /// reparented, and so is every descendant of such an entity. Ids are
    /// returned in creation order of the changed roots, each at most once.
    pub fn take_transform_changes(&mut self) -> Vec<EntityId> {
        let dirty: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.entities.get(id).is_some_and(|e| e.transform_dirty))
            .collect();

        let mut seen = HashSet::new();
        let mut changed = Vec::new();
        for id in dirty {
            if seen.insert(id) {
                changed.push(id);
            }
            for descendant in self.descendants(id) {
                if seen.insert(descendant) {
                    changed.push(descendant);
                }
            }
        }

        for entity in self.entities.values_mut() {
            entity.transform_dirty = false;
        }
        changed
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::sync::{Arc, Mutex};

    use scene_component::{IdError, impl_reflect};

    use super::*;

    const EPS: f32 = 1e-4;

    #[derive(Debug, Default)]
    struct Tracker {
        destroyed: Arc<Mutex<Vec<EntityId>>>,
    }

    impl_reflect!(Tracker as "Tracker" {});

    impl Component for Tracker {
        fn on_destroy(&mut self, owner: EntityId) {
            self.destroyed.lock().unwrap().push(owner);
        }
    }

    fn posed(scene: &mut Scene, name: &str, t: Transform) -> EntityId {
        let id = scene.create_entity(name).unwrap();
        scene.entity_mut(id).unwrap().set_local_transform(t);
        id
    }

    fn skewed_parent() -> Transform {
        Transform::from_trs(
            Vec3::new(3.0, -1.0, 2.0),
            Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(0.4),
            Vec3::new(2.0, 0.5, 3.0),
        )
    }

    fn child_pose() -> Transform {
        Transform::from_trs(
            Vec3::new(1.0, 2.0, -4.0),
            Quat::from_rotation_z(0.7),
            Vec3::new(1.5, 1.0, 0.25),
        )
    }

    #[test]
    fn test_root_world_transform_is_local() {
        let mut scene = Scene::default();
        let e = posed(&mut scene, "Root", child_pose());
        assert_eq!(scene.world_transform(e).unwrap(), child_pose());
    }

    #[test]
    fn test_reparent_keep_world_preserves_pose() {
        let mut scene = Scene::default();
        let parent = posed(&mut scene, "Parent", skewed_parent());
        let grandparent = posed(
            &mut scene,
            "Grandparent",
            Transform::from_trs(Vec3::X, Quat::from_rotation_x(1.1), Vec3::splat(0.5)),
        );
        let child = posed(&mut scene, "Child", child_pose());
        scene.set_parent(parent, Some(grandparent), true).unwrap();

        let before = scene.world_transform(child).unwrap();
        scene.set_parent(child, Some(parent), true).unwrap();
        assert!(scene.world_transform(child).unwrap().abs_diff_eq(&before, EPS));

        scene.set_parent(child, None, true).unwrap();
        assert!(scene.world_transform(child).unwrap().abs_diff_eq(&before, EPS));
        assert!(scene.entity(child).unwrap().transform().abs_diff_eq(&before, EPS));
    }

    #[test]
    fn test_reparent_without_keep_world_keeps_local() {
        let mut scene = Scene::default();
        let parent = posed(&mut scene, "Parent", skewed_parent());
        let child = posed(&mut scene, "Child", child_pose());
        scene.set_parent(child, Some(parent), false).unwrap();
        assert_eq!(*scene.entity(child).unwrap().transform(), child_pose());
        let expected = Transform::compose(&skewed_parent(), &child_pose());
        assert!(scene.world_transform(child).unwrap().abs_diff_eq(&expected, EPS));
    }

    #[test]
    fn test_set_world_transform_is_a_fixed_point() {
        let mut scene = Scene::default();
        let parent = posed(&mut scene, "Parent", skewed_parent());
        let child = posed(&mut scene, "Child", child_pose());
        scene.set_parent(child, Some(parent), false).unwrap();

        let local_before = *scene.entity(child).unwrap().transform();
        let (p, r, s) = scene.world_trs(child).unwrap();
        scene.set_world_trs(child, p, r, s).unwrap();
        assert!(scene.entity(child).unwrap().transform().abs_diff_eq(&local_before, EPS));
    }

    #[test]
    fn test_set_world_transform_notifies_once() {
        let mut scene = Scene::default();
        let parent = posed(&mut scene, "Parent", skewed_parent());
        let child = posed(&mut scene, "Child", Transform::IDENTITY);
        scene.set_parent(child, Some(parent), false).unwrap();
        let before = scene.entity(child).unwrap().transform_revision();
        scene
            .set_world_trs(child, Vec3::ONE, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        assert_eq!(scene.entity(child).unwrap().transform_revision(), before + 1);
    }

    #[test]
    fn test_zero_parent_scale_never_produces_nan() {
        let mut scene = Scene::default();
        let parent = posed(
            &mut scene,
            "Flat",
            Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::new(1.0, 0.0, 2.0)),
        );
        let child = posed(&mut scene, "Child", child_pose());
        scene.set_parent(child, Some(parent), true).unwrap();

        let local = *scene.entity(child).unwrap().transform();
        assert!(local.is_finite());
        assert_eq!(local.scale.y, 0.0);
        assert_eq!(local.position.y, 0.0);
    }

    #[test]
    fn test_cycle_guard_leaves_hierarchy_unchanged() {
        let mut scene = Scene::default();
        let a = scene.create_entity("A").unwrap();
        let b = scene.create_entity("B").unwrap();

        scene.set_parent(a, Some(b), true).unwrap();
        let err = scene.set_parent(b, Some(a), true).unwrap_err();
        assert!(matches!(err, SceneError::ParentCycle { child, parent } if child == b && parent == a));
        assert_eq!(scene.entity(a).unwrap().parent(), Some(b));
        assert_eq!(scene.entity(b).unwrap().parent(), None);
        assert_eq!(scene.entity(b).unwrap().children(), &[a]);
        assert!(scene.entity(a).unwrap().children().is_empty());

        let err = scene.set_parent(a, Some(a), true).unwrap_err();
        assert!(matches!(err, SceneError::SelfParent(id) if id == a));
        assert_eq!(scene.entity(a).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_deep_cycle_is_detected() {
        let mut scene = Scene::default();
        let a = scene.create_entity("A").unwrap();
        let b = scene.create_entity("B").unwrap();
        let c = scene.create_entity("C").unwrap();
        scene.set_parent(b, Some(a), false).unwrap();
        scene.set_parent(c, Some(b), false).unwrap();
        assert!(scene.is_descendant_of(c, a));
        assert!(!scene.is_descendant_of(a, c));
        assert!(!scene.is_descendant_of(a, a));
        assert!(scene.set_parent(a, Some(c), false).is_err());
    }

    #[test]
    fn test_reparent_keeps_links_bidirectional() {
        let mut scene = Scene::default();
        let p1 = scene.create_entity("P1").unwrap();
        let p2 = scene.create_entity("P2").unwrap();
        let c = scene.create_entity("C").unwrap();
        scene.set_parent(c, Some(p1), true).unwrap();
        scene.set_parent(c, Some(p2), true).unwrap();
        assert!(scene.entity(p1).unwrap().children().is_empty());
        assert_eq!(scene.entity(p2).unwrap().children(), &[c]);
        assert_eq!(scene.entity(c).unwrap().parent(), Some(p2));
        assert_eq!(scene.roots(), vec![p1, p2]);
    }

    #[test]
    fn test_id_exhaustion() {
        let config = SceneConfig::new("Tiny").with_entity_ids(1000..1003);
        let mut scene = Scene::new(config);
        for i in 0..3 {
            scene.create_entity(format!("E{i}")).unwrap();
        }
        let err = scene.create_entity("Overflow").unwrap_err();
        assert!(matches!(
            err,
            SceneError::IdExhausted(IdError::Exhausted { min: 1000, max: 1003 })
        ));
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn test_default_range_allows_max_supported_entities() {
        let mut scene = Scene::default();
        for _ in 0..scene_component::MAX_SUPPORTED_ENTITIES {
            scene.create_entity("E").unwrap();
        }
        assert!(matches!(
            scene.create_entity("One too many"),
            Err(SceneError::IdExhausted(_))
        ));
    }

    #[test]
    fn test_duplicate_guid_rejected() {
        let mut scene = Scene::default();
        let guid = Uuid::new_v4();
        let id = scene.create_entity_with_guid("A", guid).unwrap();
        assert_eq!(scene.find_by_guid(&guid), Some(id));
        assert!(matches!(
            scene.create_entity_with_guid("B", guid),
            Err(SceneError::DuplicateGuid(g)) if g == guid
        ));
    }

    #[test]
    fn test_destroy_removes_subtree_children_first() {
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let mut scene = Scene::default();
        let root = scene.create_entity("Root").unwrap();
        let a = scene.create_entity("A").unwrap();
        let b = scene.create_entity("B").unwrap();
        let keep = scene.create_entity("Keep").unwrap();
        scene.set_parent(a, Some(root), false).unwrap();
        scene.set_parent(b, Some(a), false).unwrap();
        for id in [root, a, b, keep] {
            scene
                .add_component(id, Tracker { destroyed: destroyed.clone() })
                .unwrap();
        }
        let b_guid = scene.entity(b).unwrap().guid();

        scene.destroy_entity(root).unwrap();
        assert_eq!(*destroyed.lock().unwrap(), vec![b, a, root]);
        assert_eq!(scene.ids(), &[keep]);
        assert_eq!(scene.find_by_guid(&b_guid), None);
        assert!(matches!(
            scene.destroy_entity(root),
            Err(SceneError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_destroy_child_unlinks_from_parent() {
        let mut scene = Scene::default();
        let root = scene.create_entity("Root").unwrap();
        let child = scene.create_entity("Child").unwrap();
        scene.set_parent(child, Some(root), false).unwrap();
        scene.destroy_entity(child).unwrap();
        assert!(scene.entity(root).unwrap().children().is_empty());
    }

    #[test]
    fn test_transform_changes_include_descendants() {
        let mut scene = Scene::default();
        let root = scene.create_entity("Root").unwrap();
        let child = scene.create_entity("Child").unwrap();
        let other = scene.create_entity("Other").unwrap();
        scene.set_parent(child, Some(root), false).unwrap();
        scene.take_transform_changes();

        scene
            .set_local_trs(root, Vec3::Y, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        assert_eq!(scene.take_transform_changes(), vec![root, child]);
        assert!(scene.take_transform_changes().is_empty());

        scene.entity_mut(other).unwrap().set_local_scale(Vec3::splat(2.0));
        assert_eq!(scene.take_transform_changes(), vec![other]);
    }

    #[test]
    fn test_bounds_radius_uses_world_scale() {
        let mut scene = Scene::default();
        let parent = posed(
            &mut scene,
            "Parent",
            Transform::IDENTITY.scaled(Vec3::new(2.0, 1.0, 1.0)),
        );
        let child = posed(
            &mut scene,
            "Child",
            Transform::IDENTITY.scaled(Vec3::new(1.0, 3.0, 1.0)),
        );
        scene.set_parent(child, Some(parent), false).unwrap();
        let expected = 3.0 * scene_math::BOUNDS_RADIUS_FACTOR;
        assert!((scene.bounds_radius(child).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_find_by_name_and_missing_entities() {
        let mut scene = Scene::default();
        let id = scene.create_entity("Camera").unwrap();
        assert_eq!(scene.find_by_name("Camera"), Some(id));
        assert_eq!(scene.find_by_name("Nope"), None);
        assert!(matches!(
            scene.world_transform(EntityId(42)),
            Err(SceneError::EntityNotFound(_))
        ));
        assert!(scene.set_parent(id, Some(EntityId(42)), true).is_err());
    }
}
