//! Post-processing stack.
//!
//! [`PostProcessStack`] holds an ordered list of heterogeneous [`Effect`]s,
//! which the reflection table cannot describe. It is persisted by
//! [`PostProcessSerializer`] as a tagged list:
//!
//! ```json
//! { "weight": 1.0, "effects": [ { "type": "Bloom", "threshold": 1.0, ... } ] }
//! ```
//!
//! Each element's own members still go through the reflection helpers.

use scene_component::{Component, Reflect, SerializeAttr, impl_reflect, impl_reflect_enum};
use scene_math::Vec3;
use scene_serde::{
    ComponentSerializer, Payload, SkippedMember, deserialize_members, serialize_members,
};
use serde_json::Value as Json;
use tracing::warn;

/// Discriminator key on each serialized effect.
pub const EFFECT_TYPE_KEY: &str = "type";
const EFFECTS_KEY: &str = "effects";

// -- Effects --

/// Glow around bright pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bloom {
    /// Luminance above which pixels bloom.
    pub threshold: f32,
    pub intensity: f32,
    pub radius: f32,
}

impl_reflect!(Bloom as "Bloom" {
    threshold: f32 => SerializeAttr::new(),
    intensity: f32 => SerializeAttr::new(),
    radius: f32 => SerializeAttr::new(),
});

impl Default for Bloom {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            intensity: 0.8,
            radius: 4.0,
        }
    }
}

/// Darkening toward the screen edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Vignette {
    pub intensity: f32,
    pub smoothness: f32,
    pub color: Vec3,
}

impl_reflect!(Vignette as "Vignette" {
    intensity: f32 => SerializeAttr::new(),
    smoothness: f32 => SerializeAttr::new(),
    color: Vec3 => SerializeAttr::new(),
});

impl Default for Vignette {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            smoothness: 0.5,
            color: Vec3::ZERO,
        }
    }
}

/// Tone curve used to map HDR to display range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TonemapMode {
    #[default]
    Aces,
    Reinhard,
    Filmic,
}

impl_reflect_enum!(TonemapMode { Aces, Reinhard, Filmic });

/// HDR to display-range mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Tonemap {
    pub mode: TonemapMode,
    /// Exposure compensation in stops.
    pub exposure: f32,
}

impl_reflect!(Tonemap as "Tonemap" {
    mode: TonemapMode => SerializeAttr::new(),
    exposure: f32 => SerializeAttr::new(),
});

impl Default for Tonemap {
    fn default() -> Self {
        Self {
            mode: TonemapMode::Aces,
            exposure: 0.0,
        }
    }
}

/// One post-processing pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Bloom(Bloom),
    Vignette(Vignette),
    Tonemap(Tonemap),
}

impl Effect {
    /// The discriminator written to the payload.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.members().type_info().name
    }

    /// A default-configured effect of the named kind.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Bloom" => Some(Self::Bloom(Bloom::default())),
            "Vignette" => Some(Self::Vignette(Vignette::default())),
            "Tonemap" => Some(Self::Tonemap(Tonemap::default())),
            _ => None,
        }
    }

    fn members(&self) -> &dyn Reflect {
        match self {
            Self::Bloom(e) => e,
            Self::Vignette(e) => e,
            Self::Tonemap(e) => e,
        }
    }

    fn members_mut(&mut self) -> &mut dyn Reflect {
        match self {
            Self::Bloom(e) => e,
            Self::Vignette(e) => e,
            Self::Tonemap(e) => e,
        }
    }
}

// -- Component --

/// Ordered list of effects applied to the camera output.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessStack {
    /// Blend weight of the whole stack.
    pub weight: f32,
    pub effects: Vec<Effect>,
}

impl_reflect!(PostProcessStack as "PostProcessStack" {
    weight: f32 => SerializeAttr::new(),
});

impl Component for PostProcessStack {
    fn copy_unreflected(&mut self, source: &dyn Component) {
        if let Some(source) = source.downcast_ref::<Self>() {
            self.effects = source.effects.clone();
        }
    }
}

impl Default for PostProcessStack {
    fn default() -> Self {
        Self {
            weight: 1.0,
            effects: Vec::new(),
        }
    }
}

impl PostProcessStack {
    #[must_use]
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The first effect of the given kind.
    #[must_use]
    pub fn find(&self, type_name: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.type_name() == type_name)
    }
}

// -- Serializer --

/// Tagged-list wire format for [`PostProcessStack`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessSerializer;

impl ComponentSerializer for PostProcessSerializer {
    type Target = PostProcessStack;

    fn serialize(&self, component: &PostProcessStack) -> Payload {
        let mut payload = serialize_members(component);
        let effects = component
            .effects
            .iter()
            .map(|effect| {
                let mut entry = serialize_members(effect.members());
                entry.insert(EFFECT_TYPE_KEY.into(), Json::from(effect.type_name()));
                Json::Object(entry)
            })
            .collect();
        payload.insert(EFFECTS_KEY.into(), Json::Array(effects));
        payload
    }

    fn deserialize(
        &self,
        component: &mut PostProcessStack,
        payload: &Payload,
        skipped: &mut Vec<SkippedMember>,
    ) {
        deserialize_members(component, payload, skipped);

        let Some(entries) = payload.get(EFFECTS_KEY) else { return };
        let Some(entries) = entries.as_array() else {
            warn!("post-process effects are not a list");
            skipped.push(SkippedMember::new("PostProcessStack", EFFECTS_KEY, "expected a list"));
            return;
        };

        component.effects.clear();
        for (i, entry) in entries.iter().enumerate() {
            let key = format!("{EFFECTS_KEY}[{i}]");
            let Some(object) = entry.as_object() else {
                skipped.push(SkippedMember::new("PostProcessStack", key, "expected an object"));
                continue;
            };
            let type_name = object.get(EFFECT_TYPE_KEY).and_then(Json::as_str).unwrap_or("");
            let Some(mut effect) = Effect::from_type_name(type_name) else {
                warn!(effect = type_name, "unknown post-process effect, skipping");
                skipped.push(SkippedMember::new(
                    "PostProcessStack",
                    key,
                    format!("unknown effect type '{type_name}'"),
                ));
                continue;
            };
            deserialize_members(effect.members_mut(), object, skipped);
            component.effects.push(effect);
        }
    }
}
