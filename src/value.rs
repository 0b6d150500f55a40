//! Uniform value representation for intercepted calls.
//!
//! Intercepted members exchange arguments and return values through the
//! [`Value`] tagged union rather than through generics, so a single pipeline
//! can carry calls to members of any signature. The set of kinds is closed and
//! described by [`ValueKind`]; application objects that do not fit a primitive
//! kind travel as shared [`Value::Reference`] payloads.
//!
//! Typed callers recover concrete Rust types through the [`FromValue`] trait,
//! which the pipeline's typed execution path uses to coerce return values.

use std::{
    any::Any,
    fmt,
    sync::Arc,
};

use strum::{Display, EnumIter};

use crate::{Error, Result};

/// The closed set of value kinds a call slot can be declared as.
///
/// Kinds describe argument and return slots of intercepted members. They stand
/// in for the full richness of an application type system: the interception
/// core never needs a member's real signature, only the kind of each
/// directional slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum ValueKind {
    /// No value; the kind of `void` members and of [`Value::Unit`]
    Unit,
    /// Boolean
    Bool,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 32-bit integer
    UInt32,
    /// Unsigned 64-bit integer
    UInt64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
    /// Owned UTF-8 string
    Str,
    /// Shared application object (or its absent form, [`Value::Null`])
    Reference,
}

/// A single argument or return value travelling through the pipeline.
///
/// `Value` is a tagged union over the kinds in [`ValueKind`]. Primitive
/// variants hold their payload directly; [`Value::Reference`] holds a shared,
/// type-erased application object and [`Value::Null`] is the absent reference.
///
/// # Equality
///
/// Primitives and strings compare structurally. References compare by pointer
/// identity ([`Arc::ptr_eq`]), which is what argument matching needs: two
/// distinct boxes of equal objects are different arguments. `Null` equals only
/// `Null`.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{Value, ValueKind};
///
/// let v = Value::from(42i32);
/// assert_eq!(v.kind(), ValueKind::Int32);
/// assert_eq!(Value::default_of(ValueKind::Int32), Value::Int32(0));
/// assert_eq!(Value::default_of(ValueKind::Reference), Value::Null);
/// ```
#[derive(Clone)]
pub enum Value {
    /// No value; what void members produce
    Unit,
    /// Boolean payload
    Bool(bool),
    /// Signed 32-bit payload
    Int32(i32),
    /// Signed 64-bit payload
    Int64(i64),
    /// Unsigned 32-bit payload
    UInt32(u32),
    /// Unsigned 64-bit payload
    UInt64(u64),
    /// 32-bit floating point payload
    Float32(f32),
    /// 64-bit floating point payload
    Float64(f64),
    /// Owned string payload
    Str(String),
    /// The absent reference; default of the [`ValueKind::Reference`] kind
    Null,
    /// Shared, type-erased application object
    Reference(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Returns the kind this value belongs to.
    ///
    /// [`Value::Null`] reports [`ValueKind::Reference`], since it is the
    /// absent form of a reference slot.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unit => ValueKind::Unit,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::UInt32(_) => ValueKind::UInt32,
            Value::UInt64(_) => ValueKind::UInt64,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Str(_) => ValueKind::Str,
            Value::Null | Value::Reference(_) => ValueKind::Reference,
        }
    }

    /// Synthesizes the type-appropriate default for a kind.
    ///
    /// Zero for numeric kinds, `false`, the empty string, [`Value::Unit`] for
    /// void and [`Value::Null`] for references. This is what the
    /// default-value behavior returns for unconfigured calls and writes into
    /// unset output slots.
    #[must_use]
    pub fn default_of(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Unit => Value::Unit,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int32 => Value::Int32(0),
            ValueKind::Int64 => Value::Int64(0),
            ValueKind::UInt32 => Value::UInt32(0),
            ValueKind::UInt64 => Value::UInt64(0),
            ValueKind::Float32 => Value::Float32(0.0),
            ValueKind::Float64 => Value::Float64(0.0),
            ValueKind::Str => Value::Str(String::new()),
            ValueKind::Reference => Value::Null,
        }
    }

    /// Boxes an application object into a reference value.
    #[must_use]
    pub fn reference<T: Any + Send + Sync>(object: T) -> Value {
        Value::Reference(Arc::new(object))
    }

    /// Borrows the boxed object if this is a reference of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Value::Reference(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Returns true for the absent reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Checks whether this value can occupy a slot declared with `kind`.
    ///
    /// Exact kind match, with one allowance: `Null` fits any `Reference` slot.
    #[must_use]
    pub fn fits(&self, kind: ValueKind) -> bool {
        self.kind() == kind
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Int32(v) => write!(f, "Int32({v})"),
            Value::Int64(v) => write!(f, "Int64({v})"),
            Value::UInt32(v) => write!(f, "UInt32({v})"),
            Value::UInt64(v) => write!(f, "UInt64({v})"),
            Value::Float32(v) => write!(f, "Float32({v})"),
            Value::Float64(v) => write!(f, "Float64({v})"),
            Value::Str(v) => write!(f, "Str({v:?})"),
            Value::Null => write!(f, "Null"),
            Value::Reference(_) => write!(f, "Reference(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Null => write!(f, "null"),
            Value::Reference(_) => write!(f, "<object>"),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Typed extraction of a [`Value`] into a concrete Rust type.
///
/// This is the coercion half of typed execution: after the pipeline has
/// produced a return record, [`execute_typed`](crate::pipeline::BehaviorPipeline::execute_typed)
/// hands the success value to `from_value` to recover the caller's expected
/// type. Extraction never panics; a wrong kind surfaces as
/// [`Error::KindMismatch`].
pub trait FromValue: Sized {
    /// Converts `value` into `Self`, or fails with [`Error::KindMismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] when the value's kind does not match
    /// the implementing type.
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(Error::KindMismatch {
                        expected: ValueKind::$kind,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, Bool);
impl_from_value!(i32, Int32, Int32);
impl_from_value!(i64, Int64, Int64);
impl_from_value!(u32, UInt32, UInt32);
impl_from_value!(u64, UInt64, UInt64);
impl_from_value!(f32, Float32, Float32);
impl_from_value!(f64, Float64, Float64);
impl_from_value!(String, Str, Str);

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Unit => Ok(()),
            other => Err(Error::KindMismatch {
                expected: ValueKind::Unit,
                found: other.kind(),
            }),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
