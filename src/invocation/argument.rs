use strum::{Display, EnumIter};

use crate::value::{Value, ValueKind};

/// Data-flow direction of one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Direction {
    /// Caller-supplied input; fixed for the lifetime of the record
    In,
    /// Produced by the call; starts unset and is written by behaviors
    Out,
    /// Caller-supplied and writable; the final value flows back to the caller
    Ref,
}

/// Immutable description of one argument slot: name, declared kind, direction.
///
/// Descriptors are fixed when the invocation record is constructed; only the
/// slot *values* change afterwards, and only for [`Direction::Out`] and
/// [`Direction::Ref`] slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    name: String,
    kind: ValueKind,
    direction: Direction,
}

impl ArgumentDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ValueKind, direction: Direction) -> Self {
        ArgumentDescriptor {
            name: name.into(),
            kind,
            direction,
        }
    }

    /// Returns the declared parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared value kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the data-flow direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns true if behaviors may write this slot.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.direction != Direction::In
    }
}

/// One argument as supplied by the stand-in at invocation-record construction:
/// a descriptor plus the initial slot value.
///
/// `In` and `Ref` arguments carry their caller-supplied value; `Out`
/// arguments start unset. The declared kind of `In`/`Ref` slots is taken from
/// the supplied value, which keeps descriptor and value consistent by
/// construction.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{Argument, ValueKind};
///
/// let args = vec![
///     Argument::input("format", "{0}"),
///     Argument::output("result", ValueKind::Int32),
///     Argument::by_ref("total", 10i64),
/// ];
/// assert_eq!(args.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Argument {
    descriptor: ArgumentDescriptor,
    initial: Option<Value>,
}

impl Argument {
    /// Creates a caller-supplied input argument.
    #[must_use]
    pub fn input(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Argument {
            descriptor: ArgumentDescriptor::new(name, value.kind(), Direction::In),
            initial: Some(value),
        }
    }

    /// Creates an output argument of the declared kind, initially unset.
    #[must_use]
    pub fn output(name: impl Into<String>, kind: ValueKind) -> Self {
        Argument {
            descriptor: ArgumentDescriptor::new(name, kind, Direction::Out),
            initial: None,
        }
    }

    /// Creates a by-reference argument carrying the caller's current value.
    #[must_use]
    pub fn by_ref(name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Argument {
            descriptor: ArgumentDescriptor::new(name, value.kind(), Direction::Ref),
            initial: Some(value),
        }
    }

    /// Returns the slot descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ArgumentDescriptor {
        &self.descriptor
    }

    /// Returns the initial slot value, if any.
    #[must_use]
    pub fn initial(&self) -> Option<&Value> {
        self.initial.as_ref()
    }

    pub(crate) fn into_parts(self) -> (ArgumentDescriptor, Option<Value>) {
        (self.descriptor, self.initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_infers_kind_from_value() {
        let arg = Argument::input("count", 3i32);
        assert_eq!(arg.descriptor().kind(), ValueKind::Int32);
        assert_eq!(arg.descriptor().direction(), Direction::In);
        assert_eq!(arg.initial(), Some(&Value::Int32(3)));
        assert!(!arg.descriptor().is_writable());
    }

    #[test]
    fn test_output_starts_unset() {
        let arg = Argument::output("result", ValueKind::Str);
        assert_eq!(arg.descriptor().direction(), Direction::Out);
        assert!(arg.initial().is_none());
        assert!(arg.descriptor().is_writable());
    }

    #[test]
    fn test_by_ref_carries_value_and_is_writable() {
        let arg = Argument::by_ref("total", 10u64);
        assert_eq!(arg.descriptor().direction(), Direction::Ref);
        assert_eq!(arg.initial(), Some(&Value::UInt64(10)));
        assert!(arg.descriptor().is_writable());
    }

    #[test]
    fn test_null_input_is_a_reference_slot() {
        let arg = Argument::input("target", Value::Null);
        assert_eq!(arg.descriptor().kind(), ValueKind::Reference);
    }
}
