//! Whole-scene duplication.
//!
//! [`SceneCloner`] produces an independent copy of a [`Scene`] in three
//! strictly ordered passes:
//!
//! 1. **Construct** every entity with a fresh GUID, copying its name,
//!    material, active flag, local transform and components.
//! 2. **Re-hierarchy** by relinking each cloned pair with `keep_world = false`.
//! 3. **Fix up references** so every entity/component handle inside a cloned
//!    component points into the clone, or becomes `None` if its target was
//!    not cloned.
//!
//! A component that fails to clone is logged and skipped; the rest of the
//! scene is still produced.

use std::collections::{HashMap, HashSet};

use scene_component::{
    Component, ComponentRef, ComponentRegistry, ComponentTypeId, EntityId, EntityRef,
    Reflect, ReflectError, Value,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entity::{ComponentSlot, Entity};
use crate::error::SceneError;
use crate::scene::Scene;

/// External collaborator able to create components the registry cannot
/// construct on its own (script instances owned by a scripting runtime, for
/// example).
pub trait ComponentHost {
    /// Create a component named `type_name` and attach it to `entity`.
    ///
    /// Returns `Ok(false)` when the host does not handle this type, in which
    /// case the registry is used instead.
    ///
    /// # Errors
    ///
    /// A failed attempt is logged and the registry is used as a fallback.
    fn attach(&mut self, entity: &mut Entity, type_name: &str) -> Result<bool, SceneError>;
}

/// Copy every reflected member of `src` into `dst`.
///
/// Members missing from `dst` are ignored, so copying between two instances
/// of the same type never fails on shape.
///
/// # Errors
///
/// Returns the first [`ReflectError`] raised by `dst` while accepting a value.
pub fn copy_members<S, D>(src: &S, dst: &mut D) -> Result<(), ReflectError>
where
    S: Reflect + ?Sized,
    D: Reflect + ?Sized,
{
    let target = dst.type_info();
    for field in src.type_info().fields {
        if target.field(field.name).is_none() {
            continue;
        }
        if let Some(value) = src.field(field.name) {
            dst.set_field(field.name, value)?;
        }
    }
    Ok(())
}

/// Duplicates scenes.
pub struct SceneCloner<'a> {
    registry: &'a ComponentRegistry,
    host: Option<&'a mut dyn ComponentHost>,
    skipped: Vec<String>,
}

impl<'a> SceneCloner<'a> {
    /// A cloner constructing components through `registry` only.
    #[must_use]
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            registry,
            host: None,
            skipped: Vec::new(),
        }
    }

    /// Route component creation through `host` before the registry.
    #[must_use]
    pub fn with_host(mut self, host: &'a mut dyn ComponentHost) -> Self {
        self.host = Some(host);
        self
    }

    /// Descriptions of components skipped by the last clone.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Produce an independent copy of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] only for structural failures (id exhaustion).
    /// Per-component failures are logged and recorded in
    /// [`skipped`](Self::skipped).
    pub fn clone_scene(&mut self, source: &Scene) -> Result<Scene, SceneError> {
        self.skipped.clear();
        let mut target = Scene::new(source.config().clone());

        // -- Pass 1: construct --
        // Hierarchy links are ids; reference handles are matched by GUID since
        // ids from another scene overlap this one's.
        let mut id_map: HashMap<EntityId, EntityRef> = HashMap::new();
        let mut guid_map: HashMap<Uuid, EntityRef> = HashMap::new();
        for entity in source.iter() {
            let new_id = target.create_entity(entity.name())?;
            let cloned = target
                .entity_mut(new_id)
                .ok_or(SceneError::EntityNotFound(new_id))?;
            cloned.set_material(entity.material());
            cloned.set_active(entity.is_active());
            cloned.set_local_transform(*entity.transform());
            for slot in entity.components() {
                if let Err(e) = self.clone_component(cloned, slot) {
                    warn!(
                        entity = %entity.id(),
                        component = slot.type_name(),
                        error = %e,
                        "skipping component during clone"
                    );
                    self.skipped
                        .push(format!("{}/{}", entity.name(), slot.type_name()));
                }
            }
            id_map.insert(entity.id(), cloned.handle());
            guid_map.insert(entity.guid(), cloned.handle());
        }

        // -- Pass 2: re-hierarchy --
        for entity in source.iter() {
            let Some(parent) = id_map.get(&entity.id()) else {
                continue;
            };
            for child in entity.children() {
                if let Some(child) = id_map.get(child) {
                    target.set_parent(child.id, Some(parent.id), false)?;
                }
            }
        }
        let ids: Vec<EntityId> = target.ids().to_vec();
        for id in &ids {
            if let Some(entity) = target.entity_mut(*id) {
                entity.notify_transform_changed();
            }
        }

        // -- Pass 3: reference fix-up --
        let available: HashSet<(EntityId, ComponentTypeId)> = target
            .iter()
            .flat_map(|e| e.components().map(move |s| (e.id(), s.type_id())))
            .collect();
        let mut remapped = 0usize;
        for id in &ids {
            let Some(entity) = target.entity_mut(*id) else {
                continue;
            };
            for slot in entity.components_mut() {
                remapped += remap_references(slot.component_mut(), &guid_map, &available);
            }
        }

        info!(
            scene = source.name(),
            entities = target.entity_count(),
            references = remapped,
            skipped = self.skipped.len(),
            "scene cloned"
        );
        Ok(target)
    }

    fn clone_component(
        &mut self,
        target: &mut Entity,
        slot: &ComponentSlot,
    ) -> Result<(), SceneError> {
        let source = slot.component();
        let type_id = slot.type_id();

        let hosted = match self.host.as_deref_mut() {
            Some(host) => host.attach(target, slot.type_name()).unwrap_or_else(|e| {
                warn!(
                    component = slot.type_name(),
                    error = %e,
                    "component host failed, falling back to registry"
                );
                false
            }),
            None => false,
        };

        if hosted {
            let attached = target
                .component_by_type_mut(type_id)
                .ok_or_else(|| SceneError::Host(format!(
                    "host did not attach a '{}' component",
                    slot.type_name()
                )))?;
            copy_members(source, &mut *attached)?;
            attached.copy_unreflected(source);
            target.set_component_enabled(type_id, slot.is_enabled())?;
            return Ok(());
        }

        let registration = self
            .registry
            .get(type_id)
            .or_else(|| self.registry.lookup(slot.type_name()))
            .ok_or_else(|| SceneError::UnknownComponentType(slot.type_name().to_string()))?;
        let mut component = registration.create();
        copy_members(source, &mut *component)?;
        component.copy_unreflected(source);
        target.insert_component(component, slot.is_enabled())
    }
}

/// Rewrite every entity/component handle held by `component`.
///
/// Handles are looked up by the source entity's GUID. Returns the number of
/// members that were rewritten.
fn remap_references(
    component: &mut dyn Component,
    guid_map: &HashMap<Uuid, EntityRef>,
    available: &HashSet<(EntityId, ComponentTypeId)>,
) -> usize {
    let info = component.type_info();
    let mut count = 0;
    for field in info.fields {
        let remapped = match component.field(field.name) {
            Some(Value::Entity(Some(old))) => {
                Value::Entity(guid_map.get(&old.guid).copied())
            }
            Some(Value::Component(Some(old))) => Value::Component(
                guid_map
                    .get(&old.entity.guid)
                    .filter(|e| available.contains(&(e.id, old.type_id)))
                    .map(|e| ComponentRef {
                        entity: *e,
                        ..old
                    }),
            ),
            _ => continue,
        };
        if let Err(e) = component.set_field(field.name, remapped) {
            warn!(
                component = info.name,
                field = field.name,
                error = %e,
                "failed to remap reference"
            );
            continue;
        }
        count += 1;
    }
    debug!(component = info.name, remapped = count, "references remapped");
    count
}

impl Scene {
    /// Clone this scene using `registry` to construct components.
    ///
    /// # Errors
    ///
    /// See [`SceneCloner::clone_scene`].
    pub fn duplicate(&self, registry: &ComponentRegistry) -> Result<Scene, SceneError> {
        SceneCloner::new(registry).clone_scene(self)
    }
}

#[cfg(test)]
mod tests {
    use scene_component::{SerializeAttr, impl_reflect};
    use scene_math::{Quat, Transform, Vec3};

    use super::*;

    #[derive(Debug, Default)]
    struct Health {
        current: f32,
        label: String,
    }

    impl_reflect!(Health as "Health" {
        current: f32 => SerializeAttr::new(),
        label: String,
    });

    impl Component for Health {}

    #[derive(Debug, Default)]
    struct Follow {
        target: Option<EntityRef>,
        watch: Option<ComponentRef>,
    }

    impl_reflect!(Follow as "Follow" {
        target: Option<EntityRef>,
        watch: Option<ComponentRef>,
    });

    impl Component for Follow {}

    #[derive(Debug, Default)]
    struct Script {
        source: String,
        hosted: bool,
    }

    impl_reflect!(Script as "Script" {
        source: String,
    });

    impl Component for Script {}

    struct ScriptHost {
        calls: usize,
    }

    impl ComponentHost for ScriptHost {
        fn attach(&mut self, entity: &mut Entity, type_name: &str) -> Result<bool, SceneError> {
            if type_name != "Script" {
                return Ok(false);
            }
            self.calls += 1;
            entity.add_component(Script {
                hosted: true,
                ..Script::default()
            })?;
            Ok(true)
        }
    }

    struct FailingHost;

    impl ComponentHost for FailingHost {
        fn attach(&mut self, _entity: &mut Entity, type_name: &str) -> Result<bool, SceneError> {
            Err(SceneError::Host(format!("no runtime for {type_name}")))
        }
    }

    fn registry() -> ComponentRegistry {
        ComponentRegistry::new()
            .with::<Health>()
            .with::<Follow>()
            .with::<Script>()
    }

    fn sample() -> (Scene, EntityId, EntityId, EntityId) {
        let mut scene = Scene::default();
        let root = scene.create_entity("Root").unwrap();
        let child = scene.create_entity("Child").unwrap();
        let other = scene.create_entity("Other").unwrap();
        scene.set_parent(child, Some(root), false).unwrap();
        scene
            .set_local_trs(child, Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.5), Vec3::splat(2.0))
            .unwrap();
        scene
            .add_component(
                root,
                Health {
                    current: 75.0,
                    label: "boss".into(),
                },
            )
            .unwrap();
        let other_ref = scene.entity_ref(other).unwrap();
        scene.add_component(other, Health::default()).unwrap();
        scene
            .add_component(
                child,
                Follow {
                    target: Some(other_ref),
                    watch: Some(ComponentRef::of::<Health>(other_ref)),
                },
            )
            .unwrap();
        (scene, root, child, other)
    }

    #[test]
    fn test_copy_members_copies_unserialized_fields() {
        let src = Health {
            current: 10.0,
            label: "x".into(),
        };
        let mut dst = Health::default();
        copy_members(&src, &mut dst).unwrap();
        assert_eq!(dst.current, 10.0);
        assert_eq!(dst.label, "x");
    }

    #[test]
    fn test_clone_preserves_structure_with_fresh_guids() {
        let (source, _, child, _) = sample();
        let clone = source.duplicate(&registry()).unwrap();

        assert_eq!(clone.entity_count(), source.entity_count());
        for (a, b) in source.iter().zip(clone.iter()) {
            assert_eq!(a.name(), b.name());
            assert_ne!(a.guid(), b.guid());
            assert_eq!(a.transform(), b.transform());
            assert_eq!(a.component_count(), b.component_count());
        }

        let c_root = clone.find_by_name("Root").unwrap();
        let c_child = clone.find_by_name("Child").unwrap();
        assert_eq!(clone.entity(c_child).unwrap().parent(), Some(c_root));
        assert_eq!(clone.entity(c_root).unwrap().children(), &[c_child]);
        assert!(
            clone
                .world_transform(c_child)
                .unwrap()
                .abs_diff_eq(&source.world_transform(child).unwrap(), 1e-5)
        );
        assert_eq!(
            clone.entity(c_root).unwrap().component::<Health>().unwrap().label,
            "boss"
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let (mut source, root, _, _) = sample();
        let mut clone = source.duplicate(&registry()).unwrap();
        let c_root = clone.find_by_name("Root").unwrap();

        clone
            .entity_mut(c_root)
            .unwrap()
            .component_mut::<Health>()
            .unwrap()
            .current = 1.0;
        assert_eq!(
            source.entity(root).unwrap().component::<Health>().unwrap().current,
            75.0
        );

        source
            .entity_mut(root)
            .unwrap()
            .component_mut::<Health>()
            .unwrap()
            .current = 99.0;
        assert_eq!(
            clone.entity(c_root).unwrap().component::<Health>().unwrap().current,
            1.0
        );
    }

    #[test]
    fn test_clone_remaps_references_into_clone() {
        let (source, _, _, _) = sample();
        let clone = source.duplicate(&registry()).unwrap();
        let c_child = clone.find_by_name("Child").unwrap();
        let c_other = clone.entity_ref(clone.find_by_name("Other").unwrap()).unwrap();

        let follow = clone.entity(c_child).unwrap().component::<Follow>().unwrap();
        assert_eq!(follow.target, Some(c_other));
        let watch = follow.watch.unwrap();
        assert_eq!(watch.entity, c_other);
        assert_eq!(watch.type_id, Health::component_type_id());
    }

    #[test]
    fn test_dangling_references_become_none() {
        let (mut source, _, child, other) = sample();
        source.destroy_entity(other).unwrap();
        let clone = source.duplicate(&registry()).unwrap();
        let c_child = clone.find_by_name("Child").unwrap();
        let follow = clone.entity(c_child).unwrap().component::<Follow>().unwrap();
        assert_eq!(follow.target, None);
        assert_eq!(follow.watch, None);
        assert!(source.entity(child).unwrap().component::<Follow>().unwrap().target.is_some());
    }

    #[test]
    fn test_foreign_handles_with_reused_ids_become_none() {
        let (mut source, _, child, other) = sample();
        // Same id as a live source entity, but a GUID from some other scene.
        let foreign = EntityRef::new(other, Uuid::new_v4());
        *source
            .entity_mut(child)
            .unwrap()
            .component_mut::<Follow>()
            .unwrap() = Follow {
            target: Some(foreign),
            watch: Some(ComponentRef::of::<Health>(foreign)),
        };

        let clone = source.duplicate(&registry()).unwrap();
        let c_child = clone.find_by_name("Child").unwrap();
        let follow = clone.entity(c_child).unwrap().component::<Follow>().unwrap();
        assert_eq!(follow.target, None);
        assert_eq!(follow.watch, None);
    }

    #[test]
    fn test_clone_notifies_every_entity_once_after_relinking() {
        let (source, _, _, _) = sample();
        let mut clone = source.duplicate(&registry()).unwrap();
        let c_root = clone.find_by_name("Root").unwrap();
        let c_child = clone.find_by_name("Child").unwrap();
        let c_other = clone.find_by_name("Other").unwrap();

        let mut changed = clone.take_transform_changes();
        changed.sort();
        let mut expected = clone.ids().to_vec();
        expected.sort();
        assert_eq!(changed, expected);
        assert!(clone.take_transform_changes().is_empty());

        // Roots: the batched local copy plus the final notification.
        assert_eq!(clone.entity(c_root).unwrap().transform_revision(), 2);
        assert_eq!(clone.entity(c_other).unwrap().transform_revision(), 2);
        // The child is also notified once by its relink.
        assert_eq!(clone.entity(c_child).unwrap().transform_revision(), 3);
    }

    #[test]
    fn test_missing_component_type_becomes_none() {
        let (mut source, _, _, other) = sample();
        source
            .entity_mut(other)
            .unwrap()
            .remove_component::<Health>()
            .unwrap();
        let clone = source.duplicate(&registry()).unwrap();
        let c_child = clone.find_by_name("Child").unwrap();
        let follow = clone.entity(c_child).unwrap().component::<Follow>().unwrap();
        assert!(follow.target.is_some());
        assert_eq!(follow.watch, None);
    }

    #[test]
    fn test_unregistered_component_is_skipped() {
        let (source, _, _, _) = sample();
        let partial = ComponentRegistry::new().with::<Follow>();
        let mut cloner = SceneCloner::new(&partial);
        let clone = cloner.clone_scene(&source).unwrap();
        assert_eq!(cloner.skipped().len(), 2);
        assert_eq!(clone.entity_count(), 3);
        let c_root = clone.find_by_name("Root").unwrap();
        assert_eq!(clone.entity(c_root).unwrap().component_count(), 0);
    }

    #[test]
    fn test_host_creates_script_components() {
        let mut source = Scene::default();
        let e = source.create_entity("Scripted").unwrap();
        source
            .add_component(
                e,
                Script {
                    source: "spin.lua".into(),
                    hosted: false,
                },
            )
            .unwrap();
        source
            .entity_mut(e)
            .unwrap()
            .set_component_enabled(Script::component_type_id(), false)
            .unwrap();

        let registry = registry();
        let mut host = ScriptHost { calls: 0 };
        let clone = SceneCloner::new(&registry)
            .with_host(&mut host)
            .clone_scene(&source)
            .unwrap();
        let cloned = clone.entity(clone.find_by_name("Scripted").unwrap()).unwrap();
        let script = cloned.component::<Script>().unwrap();
        assert!(script.hosted);
        assert_eq!(script.source, "spin.lua");
        assert_eq!(cloned.is_component_enabled(Script::component_type_id()), Some(false));
        assert_eq!(host.calls, 1);
    }

    #[test]
    fn test_failing_host_falls_back_to_registry() {
        let (source, _, _, _) = sample();
        let registry = registry();
        let mut host = FailingHost;
        let mut cloner = SceneCloner::new(&registry).with_host(&mut host);
        let clone = cloner.clone_scene(&source).unwrap();
        assert!(cloner.skipped().is_empty());
        let c_root = clone.find_by_name("Root").unwrap();
        assert!(clone.entity(c_root).unwrap().has_component::<Health>());
    }

    #[test]
    fn test_clone_keeps_inactive_entities_inactive() {
        let mut source = Scene::default();
        let e = source.create_entity("Hidden").unwrap();
        source.set_active(e, false).unwrap();
        source
            .entity_mut(e)
            .unwrap()
            .set_local_transform(Transform::from_position(Vec3::X));
        let clone = source.duplicate(&registry()).unwrap();
        let hidden = clone.entity(clone.find_by_name("Hidden").unwrap()).unwrap();
        assert!(!hidden.is_active());
        assert_eq!(hidden.local_position(), Vec3::X);
    }
}
