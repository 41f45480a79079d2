//! JSON encoding of reflected member values.
//!
//! | kind | encoding |
//! |---|---|
//! | bool / int / float / string | native JSON |
//! | vec2 / vec3 / vec4 | `[x, y, ...]` |
//! | quat | `[x, y, z, w]` |
//! | mat4 | 16 numbers, row-major |
//! | enum | variant name |
//! | guid | hyphenated string; anything unparsable reads back as nil |
//! | optional guid | string or `null`; anything unparsable reads back as `null` |
//! | entity | `{ "entityGuid": "..." }` or `null` |
//! | component | `{ "entityGuid": "...", "componentType": "..." }` or `null` |
//!
//! Reference kinds are never decoded into a [`Value`] directly: their GUIDs
//! only mean something once the whole scene exists, so they are read back
//! with [`decode_reference`] during the resolve pass.

use scene_component::glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use scene_component::{FieldKind, Value};
use serde_json::{Map, Value as Json, json};
use uuid::Uuid;

use crate::error::SerdeError;

/// Flat key→value payload of a single component.
pub type Payload = Map<String, Json>;

/// Key carrying the target entity's GUID in a reference object.
pub const ENTITY_GUID_KEY: &str = "entityGuid";
/// Key carrying the component type name in a component reference object.
pub const COMPONENT_TYPE_KEY: &str = "componentType";

/// Encode a member value.
#[must_use]
pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => Json::from(*f),
        Value::String(s) | Value::Enum(s) => Json::String(s.clone()),
        Value::Vec2(v) => floats(&v.to_array()),
        Value::Vec3(v) => floats(&v.to_array()),
        Value::Vec4(v) => floats(&v.to_array()),
        Value::Quat(q) => floats(&q.to_array()),
        Value::Mat4(m) => floats(&m.transpose().to_cols_array()),
        Value::Guid(g) => Json::String(g.to_string()),
        Value::OptionalGuid(g) => g.map_or(Json::Null, |g| Json::String(g.to_string())),
        Value::Entity(r) => r.map_or(Json::Null, |r| {
            json!({ ENTITY_GUID_KEY: r.guid.to_string() })
        }),
        Value::Component(r) => r.map_or(Json::Null, |r| {
            json!({
                ENTITY_GUID_KEY: r.entity.guid.to_string(),
                COMPONENT_TYPE_KEY: r.type_name,
            })
        }),
    }
}

fn floats(values: &[f32]) -> Json {
    Json::Array(values.iter().map(|v| Json::from(f64::from(*v))).collect())
}

/// Decode a member value of the given (non-reference) kind.
///
/// # Errors
///
/// Returns [`SerdeError::InvalidValue`] if `json` has the wrong shape, including
/// when `kind` is a reference kind.
pub fn decode_value(kind: FieldKind, json: &Json) -> Result<Value, SerdeError> {
    let invalid = |expected| SerdeError::InvalidValue { kind, expected };
    Ok(match kind {
        FieldKind::Bool => Value::Bool(json.as_bool().ok_or_else(|| invalid("a boolean"))?),
        FieldKind::Int => Value::Int(
            json.as_i64()
                .or_else(|| json.as_f64().and_then(integral_f64))
                .ok_or_else(|| invalid("an integer within i64 range"))?,
        ),
        FieldKind::Float => Value::Float(json.as_f64().ok_or_else(|| invalid("a number"))?),
        FieldKind::String => Value::String(
            json.as_str()
                .ok_or_else(|| invalid("a string"))?
                .to_string(),
        ),
        FieldKind::Enum => Value::Enum(
            json.as_str()
                .ok_or_else(|| invalid("a variant name"))?
                .to_string(),
        ),
        FieldKind::Vec2 => {
            let [x, y] = float_array(json).ok_or_else(|| invalid("an array of 2 numbers"))?;
            Value::Vec2(Vec2::new(x, y))
        }
        FieldKind::Vec3 => {
            let [x, y, z] = float_array(json).ok_or_else(|| invalid("an array of 3 numbers"))?;
            Value::Vec3(Vec3::new(x, y, z))
        }
        FieldKind::Vec4 => {
            let a: [f32; 4] = float_array(json).ok_or_else(|| invalid("an array of 4 numbers"))?;
            Value::Vec4(Vec4::from_array(a))
        }
        FieldKind::Quat => {
            let a: [f32; 4] = float_array(json).ok_or_else(|| invalid("an array of 4 numbers"))?;
            Value::Quat(Quat::from_array(a))
        }
        FieldKind::Mat4 => {
            let rows: [f32; 16] =
                float_array(json).ok_or_else(|| invalid("an array of 16 numbers"))?;
            Value::Mat4(Mat4::from_cols_array(&rows).transpose())
        }
        FieldKind::Guid => Value::Guid(parse_guid(json).unwrap_or_else(Uuid::nil)),
        FieldKind::OptionalGuid => Value::OptionalGuid(parse_guid(json)),
        FieldKind::Entity | FieldKind::Component => {
            return Err(invalid("a resolved reference"));
        }
    })
}

/// `f` as an `i64`, if it is integral and representable without clamping.
fn integral_f64(f: f64) -> Option<i64> {
    // i64::MIN is exactly -2^63; its negation is the first value out of range.
    const BOUND: f64 = -(i64::MIN as f64);
    (f.fract() == 0.0 && (-BOUND..BOUND).contains(&f)).then_some(f as i64)
}

fn float_array<const N: usize>(json: &Json) -> Option<[f32; N]> {
    let items = json.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64()? as f32;
    }
    Some(out)
}

fn parse_guid(json: &Json) -> Option<Uuid> {
    json.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// The persisted form of an entity or component reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferencePayload {
    /// Explicitly `null`.
    Null,
    Entity(Uuid),
    Component {
        entity: Uuid,
        type_name: String,
    },
}

/// Read a persisted reference of the given kind.
///
/// # Errors
///
/// Returns [`SerdeError::InvalidValue`] if the value is neither `null` nor a
/// well-formed reference object.
pub fn decode_reference(kind: FieldKind, json: &Json) -> Result<ReferencePayload, SerdeError> {
    if json.is_null() {
        return Ok(ReferencePayload::Null);
    }
    let invalid = |expected| SerdeError::InvalidValue { kind, expected };
    let object = json.as_object().ok_or_else(|| invalid("a reference object"))?;
    let guid = object
        .get(ENTITY_GUID_KEY)
        .and_then(parse_guid)
        .ok_or_else(|| invalid("an \"entityGuid\" string"))?;
    match kind {
        FieldKind::Entity => Ok(ReferencePayload::Entity(guid)),
        FieldKind::Component => {
            let type_name = object
                .get(COMPONENT_TYPE_KEY)
                .and_then(Json::as_str)
                .ok_or_else(|| invalid("a \"componentType\" string"))?;
            Ok(ReferencePayload::Component {
                entity: guid,
                type_name: type_name.to_string(),
            })
        }
        _ => Err(invalid("a reference kind")),
    }
}
