//! Components, field values and entity item lists.
//!
//! A component is a value stored on an entity under a unique identifier.
//! Components may expose named fields; the entity merges the fields of all
//! its components into one surface, and two components may never claim the
//! same name.
//!
//! Most components come from `#[derive(Component)]`, which makes the type
//! itself the component factory: the identifier is static metadata on the
//! type ([`ComponentKind::ID`]) and any value of the type is an instance.
//!
//! ```ignore
//! #[derive(Component)]
//! #[component(id = "door")]
//! struct Door { locked: bool }
//!
//! let id = world.add_entity(items!["actor", Door { locked: true }])?;
//! ```

use std::{any::Any, fmt};

use crate::error::{DisposeError, EcsError, Result};

/// Field value exposed on an entity's merged surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// An empty `Option` field.
    Null,
}

impl Value {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Null => "null",
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value; integers widen.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
        }
    }
}

/// A value did not have the shape a field expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ValueError {
    /// Attach the field name, producing the public error.
    #[must_use]
    pub fn for_field(self, field: &str) -> EcsError {
        EcsError::FieldType {
            field: field.to_owned(),
            expected: self.expected,
            found: self.found,
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

value_from!(Bool: bool);
value_from!(Int: i8, i16, i32, i64, u8, u16, u32);
value_from!(Float: f32, f64);
value_from!(Text: String, &str);

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Text(c.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Self::from)
    }
}

macro_rules! int_try_from {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ValueError;

                fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
                    let err = ValueError { expected: stringify!($ty), found: value.kind() };
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| err),
                        _ => Err(err),
                    }
                }
            }
        )*
    };
}

int_try_from!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueError {
                expected: "bool",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        value.as_float().ok_or(ValueError {
            expected: "f64",
            found: value.kind(),
        })
    }
}

impl TryFrom<Value> for f32 {
    type Error = ValueError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        f64::try_from(value)
            .map(|f| f as f32)
            .map_err(|e| ValueError {
                expected: "f32",
                ..e
            })
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ValueError {
                expected: "text",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Value> for char {
    type Error = ValueError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        let err = ValueError {
            expected: "char",
            found: value.kind(),
        };
        let Value::Text(s) = value else {
            return Err(err);
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(err),
        }
    }
}

/// A struct field that can sit on an entity's merged surface.
///
/// `#[derive(Component)]` reads and writes every exposed field through this
/// trait. Integers wider than `i64` read as `None` once they leave its range.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be exposed as a component field",
    label = "unsupported field type",
    note = "mark the field `#[component(opaque)]` or `#[component(skip)]`"
)]
pub trait FieldValue: Sized {
    fn to_value(&self) -> Option<Value>;
    fn from_value(value: Value) -> std::result::Result<Self, ValueError>;
}

macro_rules! field_value {
    (lossless: $($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Option<Value> {
                    Some(Value::from(*self))
                }

                fn from_value(value: Value) -> std::result::Result<Self, ValueError> {
                    Self::try_from(value)
                }
            }
        )*
    };
    (checked: $($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Option<Value> {
                    i64::try_from(*self).ok().map(Value::Int)
                }

                fn from_value(value: Value) -> std::result::Result<Self, ValueError> {
                    Self::try_from(value)
                }
            }
        )*
    };
}

field_value!(lossless: bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, char);
field_value!(checked: i128, isize, u64, u128, usize);

impl FieldValue for String {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Text(self.clone()))
    }

    fn from_value(value: Value) -> std::result::Result<Self, ValueError> {
        Self::try_from(value)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Option<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Some(Value::Null),
        }
    }

    fn from_value(value: Value) -> std::result::Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Downcasting support for component trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value that can be attached to an entity.
///
/// Implemented by `#[derive(Component)]`; hand-written impls are fine for
/// components whose identifier is only known at runtime.
pub trait Component: AsAny + Send + Sync + 'static {
    /// Identifier this instance is stored under.
    fn id(&self) -> &str;

    /// Field names this component claims on the entity's merged surface.
    ///
    /// `id` and `dispose` are reserved and ignored if listed.
    fn fields(&self) -> &[&str] {
        &[]
    }

    /// Read a field. `None` for unknown or opaque fields.
    fn field(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Write a field.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        let _ = value;
        Err(EcsError::UnknownField {
            field: name.to_owned(),
        })
    }

    /// Release resources held by this component.
    ///
    /// Called once, after the owning entity's `remove` event.
    fn dispose(&mut self) -> std::result::Result<(), DisposeError> {
        Ok(())
    }
}

/// A component type whose identifier is known statically.
pub trait ComponentKind: Component + Sized {
    const ID: &'static str;
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id())
            .field("fields", &self.fields())
            .finish()
    }
}

/// Bare tag: an identifier with no payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    id: String,
}

impl Tag {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Component for Tag {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One element of the list handed to `World::add_entity`.
///
/// Bare tags and component instances are interchangeable here, as they are
/// in queries.
#[derive(Debug)]
pub enum Item {
    Tag(String),
    Component(Box<dyn Component>),
}

impl Item {
    /// Wrap an already boxed component.
    #[must_use]
    pub fn boxed(component: Box<dyn Component>) -> Self {
        Self::Component(component)
    }

    /// Identifier this item attaches under.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Tag(tag) => tag,
            Self::Component(c) => c.id(),
        }
    }

    pub(crate) fn into_component(self) -> Box<dyn Component> {
        match self {
            Self::Tag(tag) => Box::new(Tag::new(tag)),
            Self::Component(c) => c,
        }
    }
}

impl From<&str> for Item {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_owned())
    }
}

impl From<String> for Item {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl<C: ComponentKind> From<C> for Item {
    fn from(component: C) -> Self {
        Self::Component(Box::new(component))
    }
}

/// Build a `Vec<Item>` from tags and component values.
///
/// ```ignore
/// let items = items!["actor", "enemy", Health { hp: 10 }];
/// ```
#[macro_export]
macro_rules! items {
    () => {
        ::std::vec::Vec::<$crate::Item>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::Item::from($item)),+]
    };
}

/// Downcast a component trait object.
pub(crate) fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

pub(crate) fn downcast_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}
