//! Serialization error types.

use std::fmt;

use scene_component::{FieldKind, ReflectError};
use scene_graph::SceneError;

/// Errors that can occur while encoding or decoding scene data.
#[derive(Debug, thiserror::Error)]
pub enum SerdeError {
    /// Failed to parse or produce JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode a MessagePack snapshot.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a MessagePack snapshot.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A JSON value has the wrong shape for the member's kind.
    #[error("expected {expected} for a {kind:?} member")]
    InvalidValue {
        /// The member's declared kind.
        kind: FieldKind,
        /// What the codec was looking for.
        expected: &'static str,
    },

    /// A required member is absent from a payload.
    #[error("required member '{0}' is missing")]
    MissingRequired(String),

    /// A reference could not be bound to anything in the scene.
    #[error("unresolved reference to {0}")]
    Unresolved(String),

    /// A component type named in a document is not registered.
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    /// The document was written by a newer format version.
    #[error("unsupported document version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Newest version this build reads.
        supported: u32,
    },

    #[error(transparent)]
    Reflect(#[from] ReflectError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// A member that was skipped during a best-effort pass.
///
/// Skips never abort the surrounding operation; they are logged and collected
/// so callers can surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    /// Owning type name (component or effect).
    pub owner: String,
    /// Payload key of the member.
    pub key: String,
    /// Human-readable reason.
    pub reason: String,
}

impl SkippedMember {
    #[must_use]
    pub fn new(owner: impl Into<String>, key: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            owner: owner.into(),
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for SkippedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.key, self.reason)
    }
}
