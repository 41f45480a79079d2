//! Per-type reflection descriptors.
//!
//! Rust has no ambient reflection, so every reflected type carries an
//! explicit descriptor table built once, at compile time, by
//! [`impl_reflect!`](crate::impl_reflect). The table lists each member's name,
//! its [`FieldKind`], and an optional [`SerializeAttr`] opting the member into
//! persistence.
//!
//! Members are read and written through the dynamic [`Value`] type:
//!
//! ```text
//! Reflect::field(name)         -> Option<Value>
//! Reflect::set_field(name, v)  -> Result<(), ReflectError>
//! ```
//!
//! Serialization only visits members with a [`SerializeAttr`]; cloning visits
//! every member in the table.

use std::any::Any;

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use uuid::Uuid;

use crate::error::ReflectError;
use crate::handle::{ComponentRef, EntityRef};

/// The value category of a reflected member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    /// Any integer member, widened to `i64`.
    Int,
    /// `f32` or `f64`.
    Float,
    String,
    Vec2,
    Vec3,
    Vec4,
    /// A unit quaternion, stored `[x, y, z, w]`.
    Quat,
    Mat4,
    /// A fieldless enum reflected with [`impl_reflect_enum!`](crate::impl_reflect_enum).
    Enum,
    /// A GUID that is always present; the nil GUID stands for "unset".
    Guid,
    /// A GUID that may be absent.
    OptionalGuid,
    /// A reference to another entity ([`EntityRef`]).
    Entity,
    /// A reference to a component on another entity ([`ComponentRef`]).
    Component,
}

impl FieldKind {
    /// Returns `true` for members that point at other graph nodes and
    /// therefore cannot be bound until the whole graph exists.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, FieldKind::Entity | FieldKind::Component)
    }
}

/// A dynamically typed member value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Quat(Quat),
    Mat4(Mat4),
    /// Symbolic variant name of an enum.
    Enum(String),
    Guid(Uuid),
    OptionalGuid(Option<Uuid>),
    /// An entity handle, `None` when unset or unresolved.
    Entity(Option<EntityRef>),
    /// A component handle, `None` when unset or unresolved.
    Component(Option<ComponentRef>),
}

impl Value {
    /// The [`FieldKind`] this value belongs to.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Bool(_) => FieldKind::Bool,
            Value::Int(_) => FieldKind::Int,
            Value::Float(_) => FieldKind::Float,
            Value::String(_) => FieldKind::String,
            Value::Vec2(_) => FieldKind::Vec2,
            Value::Vec3(_) => FieldKind::Vec3,
            Value::Vec4(_) => FieldKind::Vec4,
            Value::Quat(_) => FieldKind::Quat,
            Value::Mat4(_) => FieldKind::Mat4,
            Value::Enum(_) => FieldKind::Enum,
            Value::Guid(_) => FieldKind::Guid,
            Value::OptionalGuid(_) => FieldKind::OptionalGuid,
            Value::Entity(_) => FieldKind::Entity,
            Value::Component(_) => FieldKind::Component,
        }
    }

    fn mismatch(self, expected: FieldKind) -> ReflectError {
        ReflectError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

/// Opt-in persistence marker for a reflected member.
///
/// Built with `const` builder calls so it can live in a static descriptor
/// table:
///
/// ```rust
/// use scene_component::SerializeAttr;
///
/// const ATTR: SerializeAttr = SerializeAttr::new().key("radius").required().since(2);
/// assert_eq!(ATTR.key, Some("radius"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeAttr {
    /// Explicit payload key. Defaults to the lower-cased member name.
    pub key: Option<&'static str>,
    /// Whether the member must be present in a payload.
    pub required: bool,
    /// Minimum format version that carries this member. Consumed by
    /// migration tooling, not by the serializer.
    pub since_version: u32,
}

impl SerializeAttr {
    /// A marker with no explicit key, not required, present since version 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            key: None,
            required: false,
            since_version: 0,
        }
    }

    /// Use an explicit payload key.
    #[must_use]
    pub const fn key(self, key: &'static str) -> Self {
        Self {
            key: Some(key),
            ..self
        }
    }

    /// Mark the member as required.
    #[must_use]
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Set the minimum supported format version.
    #[must_use]
    pub const fn since(self, version: u32) -> Self {
        Self {
            since_version: version,
            ..self
        }
    }
}

impl Default for SerializeAttr {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor for a single reflected member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// The Rust member name.
    pub name: &'static str,
    /// The member's value category.
    pub kind: FieldKind,
    /// Present when the member takes part in serialization.
    pub serialize: Option<SerializeAttr>,
}

impl FieldInfo {
    /// The payload key for this member, or `None` if it is not serialized.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        let attr = self.serialize?;
        Some(match attr.key {
            Some(key) => key.to_string(),
            None => self.name.to_lowercase(),
        })
    }
}

/// Descriptor table for a reflected type.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeInfo {
    /// The type's registered name.
    pub name: &'static str,
    /// Every reflected member, in declaration order.
    pub fields: &'static [FieldInfo],
}

impl TypeInfo {
    /// Look up a member descriptor by Rust name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Members that opted into serialization.
    pub fn serialized_fields(&self) -> impl Iterator<Item = &'static FieldInfo> {
        self.fields.iter().filter(|f| f.serialize.is_some())
    }
}

/// Runtime access to a type's members through its descriptor table.
///
/// Implement with [`impl_reflect!`](crate::impl_reflect) rather than by hand.
pub trait Reflect: Any {
    /// The descriptor table for this type.
    fn reflect_info() -> &'static TypeInfo
    where
        Self: Sized;

    /// The descriptor table of the concrete type behind `self`.
    fn type_info(&self) -> &'static TypeInfo;

    /// Read a member by Rust name.
    fn field(&self, name: &str) -> Option<Value>;

    /// Write a member by Rust name.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectError`] if the member does not exist or the value
    /// cannot be converted to the member's type.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), ReflectError>;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable form of [`as_any`](Self::as_any).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Conversion between a Rust member type and [`Value`].
pub trait FieldType: Sized {
    /// The kind recorded in the descriptor table.
    const KIND: FieldKind;

    /// Wrap the member's current value.
    fn to_value(&self) -> Value;

    /// # Errors
    ///
    /// Returns [`ReflectError`] when `value` has the wrong kind or range.
    fn from_value(value: Value) -> Result<Self, ReflectError>;
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

macro_rules! int_field_type {
    ($($int:ty),*) => {$(
        impl FieldType for $int {
            const KIND: FieldKind = FieldKind::Int;

            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }

            fn from_value(value: Value) -> Result<Self, ReflectError> {
                match value {
                    Value::Int(i) => <$int>::try_from(i).map_err(|_| ReflectError::OutOfRange {
                        value: i,
                        target: stringify!($int),
                    }),
                    other => Err(other.mismatch(Self::KIND)),
                }
            }
        }
    )*};
}

int_field_type!(i32, u32, i64);

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Float(f) => Ok(f as f32),
            Value::Int(i) => Ok(i as f32),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

macro_rules! copy_field_type {
    ($($ty:ident),*) => {$(
        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::$ty;

            fn to_value(&self) -> Value {
                Value::$ty(*self)
            }

            fn from_value(value: Value) -> Result<Self, ReflectError> {
                match value {
                    Value::$ty(v) => Ok(v),
                    other => Err(other.mismatch(Self::KIND)),
                }
            }
        }
    )*};
}

copy_field_type!(Vec2, Vec3, Vec4, Quat, Mat4);

impl FieldType for Uuid {
    const KIND: FieldKind = FieldKind::Guid;

    fn to_value(&self) -> Value {
        Value::Guid(*self)
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Guid(g) => Ok(g),
            Value::OptionalGuid(g) => Ok(g.unwrap_or_else(Uuid::nil)),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldType for Option<Uuid> {
    const KIND: FieldKind = FieldKind::OptionalGuid;

    fn to_value(&self) -> Value {
        Value::OptionalGuid(*self)
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::OptionalGuid(g) => Ok(g),
            Value::Guid(g) if g.is_nil() => Ok(None),
            Value::Guid(g) => Ok(Some(g)),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldType for Option<EntityRef> {
    const KIND: FieldKind = FieldKind::Entity;

    fn to_value(&self) -> Value {
        Value::Entity(*self)
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Entity(r) => Ok(r),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldType for Option<ComponentRef> {
    const KIND: FieldKind = FieldKind::Component;

    fn to_value(&self) -> Value {
        Value::Component(*self)
    }

    fn from_value(value: Value) -> Result<Self, ReflectError> {
        match value {
            Value::Component(r) => Ok(r),
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

/// Implement [`Reflect`] for a struct from a member list.
///
/// Each member is `name: Type`, optionally followed by `=> attr` where `attr`
/// is a const [`SerializeAttr`] expression. Members without an attribute are
/// still visible to cloning but skipped by serialization.
///
/// ```rust
/// use scene_component::{impl_reflect, Reflect, SerializeAttr, Value};
///
/// #[derive(Default)]
/// struct Spin {
///     speed: f32,
///     cached_angle: f32,
/// }
///
/// impl_reflect!(Spin as "Spin" {
///     speed: f32 => SerializeAttr::new().key("degreesPerSecond"),
///     cached_angle: f32,
/// });
///
/// let mut spin = Spin::default();
/// spin.set_field("speed", Value::Float(90.0)).unwrap();
/// assert_eq!(spin.speed, 90.0);
/// assert_eq!(Spin::reflect_info().fields.len(), 2);
/// ```
#[macro_export]
macro_rules! impl_reflect {
    (
        $ty:ty as $name:literal {
            $( $field:ident : $fty:ty $( => $attr:expr )? ),* $(,)?
        }
    ) => {
        impl $crate::reflect::Reflect for $ty {
            fn reflect_info() -> &'static $crate::reflect::TypeInfo {
                static INFO: $crate::reflect::TypeInfo = $crate::reflect::TypeInfo {
                    name: $name,
                    fields: &[
                        $(
                            $crate::reflect::FieldInfo {
                                name: stringify!($field),
                                kind: <$fty as $crate::reflect::FieldType>::KIND,
                                serialize: $crate::__serialize_attr!($($attr)?),
                            },
                        )*
                    ],
                };
                &INFO
            }

            fn type_info(&self) -> &'static $crate::reflect::TypeInfo {
                <Self as $crate::reflect::Reflect>::reflect_info()
            }

            fn field(&self, name: &str) -> Option<$crate::reflect::Value> {
                $(
                    if name == stringify!($field) {
                        return Some($crate::reflect::FieldType::to_value(&self.$field));
                    }
                )*
                let _ = name;
                None
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::reflect::Value,
            ) -> Result<(), $crate::error::ReflectError> {
                $(
                    if name == stringify!($field) {
                        self.$field = <$fty as $crate::reflect::FieldType>::from_value(value)?;
                        return Ok(());
                    }
                )*
                let _ = value;
                Err($crate::error::ReflectError::UnknownField {
                    ty: $name,
                    field: name.to_string(),
                })
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __serialize_attr {
    () => {
        None
    };
    ($attr:expr) => {
        Some($attr)
    };
}

/// Implement [`FieldType`] for a fieldless enum, encoded by variant name.
///
/// ```rust
/// use scene_component::{impl_reflect_enum, FieldType, Value};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Shadows { #[default] Off, Hard, Soft }
///
/// impl_reflect_enum!(Shadows { Off, Hard, Soft });
///
/// assert_eq!(Shadows::Soft.to_value(), Value::Enum("Soft".into()));
/// assert_eq!(Shadows::from_value(Value::Enum("Hard".into())).unwrap(), Shadows::Hard);
/// ```
#[macro_export]
macro_rules! impl_reflect_enum {
    ($ty:ident { $( $variant:ident ),* $(,)? }) => {
        impl $crate::reflect::FieldType for $ty {
            const KIND: $crate::reflect::FieldKind = $crate::reflect::FieldKind::Enum;

            fn to_value(&self) -> $crate::reflect::Value {
                match self {
                    $( $ty::$variant => $crate::reflect::Value::Enum(stringify!($variant).to_string()), )*
                }
            }

            fn from_value(
                value: $crate::reflect::Value,
            ) -> Result<Self, $crate::error::ReflectError> {
                let name = match value {
                    $crate::reflect::Value::Enum(s) | $crate::reflect::Value::String(s) => s,
                    other => {
                        return Err($crate::error::ReflectError::TypeMismatch {
                            expected: $crate::reflect::FieldKind::Enum,
                            found: other.kind(),
                        })
                    }
                };
                $(
                    if name == stringify!($variant) {
                        return Ok($ty::$variant);
                    }
                )*
                Err($crate::error::ReflectError::UnknownVariant {
                    ty: stringify!($ty),
                    variant: name,
                })
            }
        }
    };
}
