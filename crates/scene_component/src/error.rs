//! Error types for id allocation and reflection.

use crate::reflect::FieldKind;

/// Errors raised by [`EntityIdAllocator`](crate::EntityIdAllocator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Every id in the configured range has been handed out.
    #[error("entity id space [{min}, {max}) exhausted")]
    Exhausted {
        /// Inclusive lower bound of the range.
        min: u32,
        /// Exclusive upper bound of the range.
        max: u32,
    },
}

/// Errors raised while reading or writing a reflected member.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// The type does not describe a member with this name.
    #[error("type '{ty}' has no reflected member '{field}'")]
    UnknownField {
        /// The reflected type name.
        ty: &'static str,
        /// The requested member name.
        field: String,
    },

    /// The value's kind does not match the member's declared kind.
    #[error("expected {expected:?} value, found {found:?}")]
    TypeMismatch {
        /// Kind the member accepts.
        expected: FieldKind,
        /// Kind that was supplied.
        found: FieldKind,
    },

    /// An integer did not fit into the member's storage type.
    #[error("value {value} out of range for {target}")]
    OutOfRange {
        /// The offending value.
        value: i64,
        /// The storage type name (e.g. `"u32"`).
        target: &'static str,
    },

    /// A symbolic enum name did not match any variant.
    #[error("enum '{ty}' has no variant '{variant}'")]
    UnknownVariant {
        /// The enum type name.
        ty: &'static str,
        /// The unmatched symbolic name.
        variant: String,
    },
}
