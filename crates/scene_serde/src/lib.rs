//! # scene_serde
//!
//! Persistence for the scene graph.
//!
//! - [`codec`]: JSON encoding of every reflected member kind.
//! - [`serializer`]: the attribute-driven [`Serializer`], custom per-type
//!   serializers, and two-phase reference resolution.
//! - [`document`]: the [`SceneDocument`] file format, as JSON or as a
//!   MessagePack snapshot.

pub mod codec;
pub mod document;
pub mod error;
pub mod serializer;

pub use codec::{Payload, ReferencePayload, decode_reference, decode_value, encode_value};
pub use document::{ComponentRecord, EntityRecord, FORMAT_VERSION, LoadedScene, SceneDocument};
pub use error::{SerdeError, SkippedMember};
pub use serializer::{
    ComponentSerializer, SceneIndex, Serializer, deserialize_members, resolve_members,
    serialize_members,
};
