//! The attribute-driven component serializer.
//!
//! A component's payload is built from the members its descriptor table marks
//! with a [`SerializeAttr`](scene_component::SerializeAttr). Loading happens in
//! two phases:
//!
//! 1. [`Serializer::deserialize`] fills every plain member and skips entity
//!    and component references, whose targets may not exist yet.
//! 2. [`Serializer::resolve_references`] re-reads the same payload once the
//!    whole scene is built and binds the references through a [`SceneIndex`].
//!
//! Both phases are best-effort: a member that fails is logged, left at its
//! current value, and reported as a [`SkippedMember`].
//!
//! Types that need full control over their wire format (for example a list of
//! heterogeneous effects) register a [`ComponentSerializer`] instead.

use std::collections::HashMap;

use scene_component::{
    Component, ComponentRef, ComponentRegistry, ComponentTypeId, EntityRef, FieldKind, Reflect,
    Value, short_type_name,
};
use scene_graph::Scene;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::codec::{Payload, ReferencePayload, decode_reference, decode_value, encode_value};
use crate::error::{SerdeError, SkippedMember};

// -- Generic member helpers --

/// Encode every serialized member of `target`.
pub fn serialize_members<R: Reflect + ?Sized>(target: &R) -> Payload {
    let info = target.type_info();
    let mut payload = Payload::new();
    for field in info.serialized_fields() {
        let (Some(key), Some(value)) = (field.key(), target.field(field.name)) else {
            continue;
        };
        payload.insert(key, encode_value(&value));
    }
    payload
}

/// Populate the plain (non-reference) serialized members of `target`.
///
/// Missing optional keys leave the member untouched. Failures are pushed to
/// `skipped` and never stop the remaining members from loading.
pub fn deserialize_members<R: Reflect + ?Sized>(
    target: &mut R,
    payload: &Payload,
    skipped: &mut Vec<SkippedMember>,
) {
    let info = target.type_info();
    for field in info.serialized_fields() {
        if field.kind.is_reference() {
            continue;
        }
        let Some(key) = field.key() else { continue };
        let required = field.serialize.is_some_and(|a| a.required);
        let Some(json) = payload.get(&key) else {
            if required {
                warn!(owner = info.name, key = %key, "required member missing from payload");
                skipped.push(SkippedMember::new(
                    info.name,
                    key.clone(),
                    SerdeError::MissingRequired(key),
                ));
            }
            continue;
        };

        let result = decode_value(field.kind, json)
            .and_then(|value| target.set_field(field.name, value).map_err(SerdeError::from));
        if let Err(e) = result {
            warn!(owner = info.name, key = %key, error = %e, "failed to deserialize member");
            skipped.push(SkippedMember::new(info.name, key, e));
        }
    }
}

// -- Reference index --

#[derive(Debug)]
struct IndexedEntity {
    handle: EntityRef,
    components: Vec<(ComponentTypeId, &'static str)>,
}

/// GUID-keyed snapshot of a scene used to bind references.
///
/// Built once after every entity and component exists, so binding can write
/// into components without borrowing the scene they live in.
#[derive(Debug, Default)]
pub struct SceneIndex {
    entities: HashMap<Uuid, IndexedEntity>,
}

impl SceneIndex {
    #[must_use]
    pub fn build(scene: &Scene) -> Self {
        let entities = scene
            .iter()
            .map(|e| {
                let indexed = IndexedEntity {
                    handle: e.handle(),
                    components: e
                        .components()
                        .map(|s| (s.type_id(), s.type_name()))
                        .collect(),
                };
                (e.guid(), indexed)
            })
            .collect();
        Self { entities }
    }

    /// Handle of the entity with this GUID.
    #[must_use]
    pub fn entity(&self, guid: &Uuid) -> Option<EntityRef> {
        self.entities.get(guid).map(|e| e.handle)
    }

    /// Handle of the component named `type_name` on the entity with this GUID.
    ///
    /// The name is matched against the registry first (accepting qualified
    /// names), then against the short names of the components actually
    /// attached to the entity.
    #[must_use]
    pub fn component(
        &self,
        guid: &Uuid,
        type_name: &str,
        registry: &ComponentRegistry,
    ) -> Option<ComponentRef> {
        let entity = self.entities.get(guid)?;
        let registered = registry.lookup(type_name).map(|r| r.type_id);
        let short = short_type_name(type_name);
        entity
            .components
            .iter()
            .find(|(id, name)| Some(*id) == registered || short_type_name(name) == short)
            .map(|&(type_id, type_name)| ComponentRef {
                entity: entity.handle,
                type_id,
                type_name,
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl From<&Scene> for SceneIndex {
    fn from(scene: &Scene) -> Self {
        Self::build(scene)
    }
}

/// Bind the reference members of `target` from `payload`.
///
/// A `null` payload value clears the member. A reference whose target cannot
/// be found also clears the member and is reported.
pub fn resolve_members<R: Reflect + ?Sized>(
    target: &mut R,
    payload: &Payload,
    index: &SceneIndex,
    registry: &ComponentRegistry,
    skipped: &mut Vec<SkippedMember>,
) {
    let info = target.type_info();
    for field in info.serialized_fields() {
        if !field.kind.is_reference() {
            continue;
        }
        let Some(key) = field.key() else { continue };
        let Some(json) = payload.get(&key) else { continue };

        let reference = match decode_reference(field.kind, json) {
            Ok(reference) => reference,
            Err(e) => {
                warn!(owner = info.name, key = %key, error = %e, "malformed reference");
                skipped.push(SkippedMember::new(info.name, key, e));
                continue;
            }
        };

        let (value, unresolved) = match (field.kind, reference) {
            (FieldKind::Entity, ReferencePayload::Null) => (Value::Entity(None), None),
            (FieldKind::Component, ReferencePayload::Null) => (Value::Component(None), None),
            (_, ReferencePayload::Entity(guid)) => {
                let handle = index.entity(&guid);
                (Value::Entity(handle), handle.is_none().then(|| guid.to_string()))
            }
            (_, ReferencePayload::Component { entity, type_name }) => {
                let handle = index.component(&entity, &type_name, registry);
                (
                    Value::Component(handle),
                    handle.is_none().then(|| format!("{type_name} on {entity}")),
                )
            }
            (_, ReferencePayload::Null) => continue,
        };

        if let Some(target_desc) = unresolved {
            debug!(owner = info.name, key = %key, target = %target_desc, "reference unresolved");
            skipped.push(SkippedMember::new(
                info.name,
                key.clone(),
                SerdeError::Unresolved(target_desc),
            ));
        }
        if let Err(e) = target.set_field(field.name, value) {
            warn!(owner = info.name, key = %key, error = %e, "failed to bind reference");
            skipped.push(SkippedMember::new(info.name, key, e));
        }
    }
}

// -- Custom serializers --

/// A dedicated wire format for one component type, bypassing reflection.
pub trait ComponentSerializer: Send + Sync + 'static {
    /// The component type this serializer owns.
    type Target: Component;

    fn serialize(&self, component: &Self::Target) -> Payload;

    /// Populate `component` from `payload`, pushing any skipped members.
    fn deserialize(
        &self,
        component: &mut Self::Target,
        payload: &Payload,
        skipped: &mut Vec<SkippedMember>,
    );

    /// Bind references once the scene exists. Most custom formats carry none.
    fn resolve_references(
        &self,
        _component: &mut Self::Target,
        _payload: &Payload,
        _index: &SceneIndex,
        _registry: &ComponentRegistry,
        _skipped: &mut Vec<SkippedMember>,
    ) {
    }
}

trait ErasedSerializer: Send + Sync {
    fn serialize_dyn(&self, component: &dyn Component) -> Option<Payload>;

    fn deserialize_dyn(
        &self,
        component: &mut dyn Component,
        payload: &Payload,
        skipped: &mut Vec<SkippedMember>,
    ) -> bool;

    fn resolve_dyn(
        &self,
        component: &mut dyn Component,
        payload: &Payload,
        index: &SceneIndex,
        registry: &ComponentRegistry,
        skipped: &mut Vec<SkippedMember>,
    ) -> bool;
}

impl<S: ComponentSerializer> ErasedSerializer for S {
    fn serialize_dyn(&self, component: &dyn Component) -> Option<Payload> {
        component
            .downcast_ref::<S::Target>()
            .map(|c| self.serialize(c))
    }

    fn deserialize_dyn(
        &self,
        component: &mut dyn Component,
        payload: &Payload,
        skipped: &mut Vec<SkippedMember>,
    ) -> bool {
        match component.downcast_mut::<S::Target>() {
            Some(c) => {
                self.deserialize(c, payload, skipped);
                true
            }
            None => false,
        }
    }

    fn resolve_dyn(
        &self,
        component: &mut dyn Component,
        payload: &Payload,
        index: &SceneIndex,
        registry: &ComponentRegistry,
        skipped: &mut Vec<SkippedMember>,
    ) -> bool {
        match component.downcast_mut::<S::Target>() {
            Some(c) => {
                self.resolve_references(c, payload, index, registry, skipped);
                true
            }
            None => false,
        }
    }
}

/// Serializes components, dispatching to custom serializers where registered.
#[derive(Default)]
pub struct Serializer {
    custom: HashMap<ComponentTypeId, Box<dyn ErasedSerializer>>,
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `S::Target` a dedicated wire format. Replaces any earlier one.
    pub fn register<S: ComponentSerializer>(&mut self, serializer: S) {
        let type_id = <S::Target as Component>::component_type_id();
        debug!(
            component = <S::Target as Component>::type_name(),
            "custom serializer registered"
        );
        self.custom.insert(type_id, Box::new(serializer));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<S: ComponentSerializer>(mut self, serializer: S) -> Self {
        self.register(serializer);
        self
    }

    /// Returns `true` if the type has a custom serializer.
    #[must_use]
    pub fn has_custom(&self, type_id: ComponentTypeId) -> bool {
        self.custom.contains_key(&type_id)
    }

    /// Produce the payload for a component.
    #[must_use]
    pub fn serialize(&self, component: &dyn Component) -> Payload {
        self.custom
            .get(&component.component_type())
            .and_then(|s| s.serialize_dyn(component))
            .unwrap_or_else(|| serialize_members(component))
    }

    /// First pass: fill every plain member from `payload`.
    ///
    /// Returns the members that could not be loaded.
    pub fn deserialize(&self, component: &mut dyn Component, payload: &Payload) -> Vec<SkippedMember> {
        let mut skipped = Vec::new();
        let handled = self
            .custom
            .get(&component.component_type())
            .is_some_and(|s| s.deserialize_dyn(component, payload, &mut skipped));
        if !handled {
            deserialize_members(component, payload, &mut skipped);
        }
        skipped
    }

    /// Second pass: bind entity and component references from the same
    /// `payload` the first pass consumed.
    ///
    /// Returns the members that could not be bound.
    pub fn resolve_references(
        &self,
        component: &mut dyn Component,
        payload: &Payload,
        index: &SceneIndex,
        registry: &ComponentRegistry,
    ) -> Vec<SkippedMember> {
        let mut skipped = Vec::new();
        let handled = self
            .custom
            .get(&component.component_type())
            .is_some_and(|s| s.resolve_dyn(component, payload, index, registry, &mut skipped));
        if !handled {
            resolve_members(component, payload, index, registry, &mut skipped);
        }
        skipped
    }
}
