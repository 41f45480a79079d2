//! The scene document: a whole scene as entity records keyed by GUID.
//!
//! ```json
//! {
//!   "version": 1,
//!   "name": "Main",
//!   "entities": [
//!     {
//!       "guid": "…", "name": "Lamp", "active": true, "parent": "…",
//!       "material": null,
//!       "transform": { "position": [0,0,0], "rotation": [0,0,0,1], "scale": [1,1,1] },
//!       "components": [ { "type": "Light", "enabled": true, "data": { … } } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Parents may be listed after their children and references may point
//! forward; [`SceneDocument::instantiate`] builds every entity and component
//! before linking anything.

use scene_component::{ComponentRegistry, ComponentTypeId, EntityId};
use scene_graph::{Scene, SceneConfig};
use scene_math::Transform;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::codec::Payload;
use crate::error::{SerdeError, SkippedMember};
use crate::serializer::{SceneIndex, Serializer};

/// Newest document version this build writes and reads.
pub const FORMAT_VERSION: u32 = 1;

fn enabled_by_default() -> bool {
    true
}

/// A serialized scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version the document was written with.
    pub version: u32,
    /// Scene name.
    pub name: String,
    /// Entities in scene order. A parent may be listed after its children.
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

/// One entity in a [`SceneDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Persistent identity; preserved on load.
    pub guid: Uuid,
    pub name: String,
    /// Defaults to `true` when absent.
    #[serde(default = "enabled_by_default")]
    pub active: bool,
    /// GUID of the parent entity, if any.
    #[serde(default)]
    pub parent: Option<Uuid>,
    /// Material asset GUID.
    #[serde(default)]
    pub material: Option<Uuid>,
    /// Parent-relative transform.
    #[serde(default)]
    pub transform: Transform,
    /// Components in attachment order.
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

/// One component in an [`EntityRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Registered (or qualified) component type name.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Member payload, in the component's own key convention.
    #[serde(default)]
    pub data: Payload,
}

/// A scene rebuilt from a document, with everything that had to be skipped.
#[derive(Debug)]
pub struct LoadedScene {
    /// The rebuilt scene.
    pub scene: Scene,
    /// Members, components and parent links that could not be restored.
    pub skipped: Vec<SkippedMember>,
}

impl SceneDocument {
    /// Capture `scene` in creation order.
    #[must_use]
    pub fn capture(scene: &Scene, serializer: &Serializer) -> Self {
        let entities = scene
            .iter()
            .map(|entity| EntityRecord {
                guid: entity.guid(),
                name: entity.name().to_string(),
                active: entity.is_active(),
                parent: entity
                    .parent()
                    .and_then(|p| scene.entity(p))
                    .map(|p| p.guid()),
                material: entity.material(),
                transform: *entity.transform(),
                components: entity
                    .components()
                    .map(|slot| ComponentRecord {
                        type_name: slot.type_name().to_string(),
                        enabled: slot.is_enabled(),
                        data: serializer.serialize(slot.component()),
                    })
                    .collect(),
            })
            .collect();
        debug!(scene = scene.name(), "scene captured");
        Self {
            version: FORMAT_VERSION,
            name: scene.name().to_string(),
            entities,
        }
    }

    /// Rebuild a live scene.
    ///
    /// Runs in four steps: create every entity with its recorded GUID,
    /// deserialize every component, link parents (local transforms are kept
    /// verbatim), then bind references from the retained payloads.
    ///
    /// # Errors
    ///
    /// - [`SerdeError::UnsupportedVersion`] for documents newer than
    ///   [`FORMAT_VERSION`].
    /// - [`SerdeError::Scene`] for structural failures: duplicate GUIDs or an
    ///   exhausted id range.
    ///
    /// Unknown component types, bad members, unresolved references and broken
    /// parent links are skipped and reported in [`LoadedScene::skipped`].
    pub fn instantiate(
        &self,
        registry: &ComponentRegistry,
        serializer: &Serializer,
    ) -> Result<LoadedScene, SerdeError> {
        if self.version > FORMAT_VERSION {
            return Err(SerdeError::UnsupportedVersion {
                found: self.version,
                supported: FORMAT_VERSION,
            });
        }

        let mut scene = Scene::new(SceneConfig::new(self.name.clone()));
        let mut skipped = Vec::new();
        let mut pending: Vec<(EntityId, ComponentTypeId, &Payload)> = Vec::new();

        // Construct entities and fill plain members.
        for record in &self.entities {
            let id = scene.create_entity_with_guid(record.name.clone(), record.guid)?;
            let entity = scene
                .entity_mut(id)
                .ok_or(scene_graph::SceneError::EntityNotFound(id))?;
            entity.set_active(record.active);
            entity.set_material(record.material);
            entity.set_local_transform(record.transform);

            for component in &record.components {
                let Some(registration) = registry.lookup(&component.type_name) else {
                    warn!(
                        entity = %id,
                        component = %component.type_name,
                        "unknown component type, skipping"
                    );
                    skipped.push(SkippedMember::new(
                        record.name.clone(),
                        component.type_name.clone(),
                        SerdeError::UnknownComponentType(component.type_name.clone()),
                    ));
                    continue;
                };
                let mut instance = registration.create();
                skipped.extend(serializer.deserialize(&mut *instance, &component.data));
                if let Err(e) = entity.insert_component(instance, component.enabled) {
                    warn!(entity = %id, error = %e, "component rejected");
                    skipped.push(SkippedMember::new(record.name.clone(), component.type_name.clone(), e));
                    continue;
                }
                pending.push((id, registration.type_id, &component.data));
            }
        }

        // Link parents.
        for record in &self.entities {
            let Some(parent_guid) = record.parent else { continue };
            let (Some(child), Some(parent)) = (
                scene.find_by_guid(&record.guid),
                scene.find_by_guid(&parent_guid),
            ) else {
                warn!(entity = %record.guid, parent = %parent_guid, "parent not found, leaving at root");
                skipped.push(SkippedMember::new(
                    record.name.clone(),
                    "parent",
                    SerdeError::Unresolved(parent_guid.to_string()),
                ));
                continue;
            };
            if let Err(e) = scene.set_parent(child, Some(parent), false) {
                skipped.push(SkippedMember::new(record.name.clone(), "parent", e));
            }
        }

        // Bind references.
        let index = SceneIndex::build(&scene);
        for (id, type_id, payload) in pending {
            let Some(component) = scene
                .entity_mut(id)
                .and_then(|e| e.component_by_type_mut(type_id))
            else {
                continue;
            };
            skipped.extend(serializer.resolve_references(component, payload, &index, registry));
        }

        info!(
            scene = %self.name,
            entities = scene.entity_count(),
            skipped = skipped.len(),
            "scene loaded"
        );
        Ok(LoadedScene { scene, skipped })
    }

    // -- Encodings --

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SerdeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns [`SerdeError::Json`] if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, SerdeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compact MessagePack snapshot (struct fields encoded by name).
    ///
    /// # Errors
    ///
    /// Returns [`SerdeError::Encode`] if encoding fails.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, SerdeError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// # Errors
    ///
    /// Returns [`SerdeError::Decode`] if the bytes are not a valid snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, SerdeError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use scene_component::{Component, EntityRef, SerializeAttr, impl_reflect};
    use scene_math::{Quat, Vec3};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default)]
    struct Marker {
        weight: f32,
        buddy: Option<EntityRef>,
    }

    impl_reflect!(Marker as "Marker" {
        weight: f32 => SerializeAttr::new(),
        buddy: Option<EntityRef> => SerializeAttr::new(),
    });

    impl Component for Marker {}

    fn registry() -> ComponentRegistry {
        ComponentRegistry::new().with::<Marker>()
    }

    fn sample() -> Scene {
        let mut scene = Scene::new(SceneConfig::new("Sample"));
        let root = scene.create_entity("Root").unwrap();
        let child = scene.create_entity("Child").unwrap();
        scene.set_parent(child, Some(root), false).unwrap();
        scene
            .set_local_trs(child, Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_z(0.3), Vec3::ONE)
            .unwrap();
        let buddy = scene.entity_ref(child);
        scene
            .add_component(root, Marker { weight: 3.0, buddy })
            .unwrap();
        scene.set_active(child, false).unwrap();
        scene
    }

    #[test]
    fn test_capture_writes_records_in_order() {
        let scene = sample();
        let doc = SceneDocument::capture(&scene, &Serializer::new());
        assert_eq!(doc.version, FORMAT_VERSION);
        assert_eq!(doc.name, "Sample");
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[1].parent, Some(doc.entities[0].guid));
        assert!(!doc.entities[1].active);
        let marker = &doc.entities[0].components[0];
        assert_eq!(marker.type_name, "Marker");
        assert_eq!(marker.data["weight"], json!(3.0));
        assert_eq!(
            marker.data["buddy"],
            json!({ "entityGuid": doc.entities[1].guid.to_string() })
        );
    }

    #[test]
    fn test_instantiate_restores_scene() {
        let scene = sample();
        let serializer = Serializer::new();
        let doc = SceneDocument::capture(&scene, &serializer);
        let loaded = doc.instantiate(&registry(), &serializer).unwrap();
        assert!(loaded.skipped.is_empty());

        let restored = loaded.scene;
        for (a, b) in scene.iter().zip(restored.iter()) {
            assert_eq!(a.guid(), b.guid());
            assert_eq!(a.name(), b.name());
            assert_eq!(a.transform(), b.transform());
            assert_eq!(a.is_active(), b.is_active());
        }
        let root = restored.find_by_name("Root").unwrap();
        let child = restored.find_by_name("Child").unwrap();
        assert_eq!(restored.entity(child).unwrap().parent(), Some(root));
        let marker = restored.entity(root).unwrap().component::<Marker>().unwrap();
        assert_eq!(marker.weight, 3.0);
        assert_eq!(marker.buddy, restored.entity_ref(child));
    }

    #[test]
    fn test_children_may_precede_parents() {
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        let doc = SceneDocument::from_json(
            &json!({
                "version": 1,
                "name": "Forward",
                "entities": [
                    {
                        "guid": child.to_string(),
                        "name": "Child",
                        "parent": parent.to_string(),
                        "components": [
                            { "type": "Game.Marker", "data": { "buddy": { "entityGuid": parent.to_string() } } }
                        ]
                    },
                    { "guid": parent.to_string(), "name": "Parent" }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let loaded = doc.instantiate(&registry(), &Serializer::new()).unwrap();
        let scene = loaded.scene;
        let c = scene.find_by_guid(&child).unwrap();
        let p = scene.find_by_guid(&parent).unwrap();
        assert_eq!(scene.entity(c).unwrap().parent(), Some(p));
        assert!(scene.entity(c).unwrap().is_active());
        assert_eq!(
            scene.entity(c).unwrap().component::<Marker>().unwrap().buddy,
            scene.entity_ref(p)
        );
    }

    #[test]
    fn test_unknown_types_and_parents_are_skipped() {
        let doc = SceneDocument::from_json(
            &json!({
                "version": 1,
                "name": "Broken",
                "entities": [
                    {
                        "guid": Uuid::new_v4().to_string(),
                        "name": "Orphan",
                        "parent": Uuid::new_v4().to_string(),
                        "components": [ { "type": "Rigidbody", "data": {} } ]
                    }
                ]
            })
            .to_string(),
        )
        .unwrap();
        let loaded = doc.instantiate(&registry(), &Serializer::new()).unwrap();
        assert_eq!(loaded.scene.entity_count(), 1);
        assert_eq!(loaded.skipped.len(), 2);
        assert_eq!(loaded.scene.roots().len(), 1);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let doc = SceneDocument {
            version: FORMAT_VERSION + 1,
            name: "Future".into(),
            entities: Vec::new(),
        };
        assert!(matches!(
            doc.instantiate(&registry(), &Serializer::new()),
            Err(SerdeError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_duplicate_guid_fails_the_load() {
        let guid = Uuid::new_v4();
        let record = EntityRecord {
            guid,
            name: "Twin".into(),
            active: true,
            parent: None,
            material: None,
            transform: Transform::IDENTITY,
            components: Vec::new(),
        };
        let doc = SceneDocument {
            version: FORMAT_VERSION,
            name: "Twins".into(),
            entities: vec![record.clone(), record],
        };
        assert!(matches!(
            doc.instantiate(&registry(), &Serializer::new()),
            Err(SerdeError::Scene(_))
        ));
    }

    #[test]
    fn test_json_and_snapshot_encodings_agree() {
        let doc = SceneDocument::capture(&sample(), &Serializer::new());
        let from_json = SceneDocument::from_json(&doc.to_json().unwrap()).unwrap();
        let from_snapshot = SceneDocument::from_snapshot(&doc.to_snapshot().unwrap()).unwrap();
        assert_eq!(from_json, doc);
        assert_eq!(from_snapshot, doc);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(SceneDocument::from_snapshot(&[0xFF, 0x00]).is_err());
    }
}
