use std::fmt;

use crate::value::Value;

/// Category of a configured call failure.
///
/// The variants mirror the failure categories mocking consumers configure
/// most often; anything else travels as [`ExceptionKind::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// An argument value was rejected
    Argument,
    /// A required argument was absent
    ArgumentNull,
    /// The call is invalid in the object's current state
    InvalidOperation,
    /// The member is not implemented
    NotImplemented,
    /// The operation is not supported
    NotSupported,
    /// Application-defined failure category
    Custom(String),
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::Argument => write!(f, "Argument"),
            ExceptionKind::ArgumentNull => write!(f, "ArgumentNull"),
            ExceptionKind::InvalidOperation => write!(f, "InvalidOperation"),
            ExceptionKind::NotImplemented => write!(f, "NotImplemented"),
            ExceptionKind::NotSupported => write!(f, "NotSupported"),
            ExceptionKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A deliberately configured call failure payload.
///
/// An `Exception` is *data*, not a fault: behaviors place it in a failure
/// return record to report the intercepted call as failed, and typed
/// execution re-surfaces it to the caller exactly as configured. It is kept
/// distinct from genuine behavior faults (plain [`Error`](crate::Error)
/// values) so the "configured failure" and "broken behavior" cases never
/// blur.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{Exception, ExceptionKind};
///
/// let e = Exception::argument("index must be positive");
/// assert_eq!(e.kind(), &ExceptionKind::Argument);
/// assert_eq!(e.to_string(), "Argument: index must be positive");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exception {
    kind: ExceptionKind,
    message: String,
}

impl Exception {
    /// Creates an exception payload.
    #[must_use]
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Exception {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for an [`ExceptionKind::Argument`] payload.
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Exception::new(ExceptionKind::Argument, message)
    }

    /// Shorthand for an [`ExceptionKind::InvalidOperation`] payload.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Exception::new(ExceptionKind::InvalidOperation, message)
    }

    /// Shorthand for an [`ExceptionKind::NotImplemented`] payload.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Exception::new(ExceptionKind::NotImplemented, message)
    }

    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> &ExceptionKind {
        &self.kind
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// One `Out`/`Ref` slot value to write back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentUpdate {
    index: usize,
    value: Value,
}

impl ArgumentUpdate {
    /// Creates an update for the slot at `index`.
    #[must_use]
    pub fn new(index: usize, value: impl Into<Value>) -> Self {
        ArgumentUpdate {
            index,
            value: value.into(),
        }
    }

    /// Returns the zero-based slot position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the value to write.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Value(Value),
    Raised(Exception),
}

/// The outcome of running the chain for one invocation.
///
/// A return record is either a success carrying a [`Value`] (with
/// [`Value::Unit`] covering void members) or a failure carrying an
/// [`Exception`] payload; the two are mutually exclusive by construction.
/// Either form may additionally carry [`ArgumentUpdate`]s for `Out`/`Ref`
/// slots, which the executor writes back into the invocation record before
/// returning.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{Exception, MethodReturn};
///
/// let ok = MethodReturn::value(5i32);
/// assert!(!ok.is_exception());
///
/// let failed = MethodReturn::raise(Exception::argument("no"));
/// assert!(failed.is_exception());
/// assert!(failed.return_value().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReturn {
    outcome: Outcome,
    updates: Vec<ArgumentUpdate>,
}

impl MethodReturn {
    /// Creates a success record carrying `value`.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        MethodReturn {
            outcome: Outcome::Value(value.into()),
            updates: Vec::new(),
        }
    }

    /// Creates a void success record.
    #[must_use]
    pub fn void() -> Self {
        MethodReturn::value(Value::Unit)
    }

    /// Creates a success record carrying `value` plus `Out`/`Ref` write-backs.
    #[must_use]
    pub fn value_with_updates(
        value: impl Into<Value>,
        updates: impl IntoIterator<Item = ArgumentUpdate>,
    ) -> Self {
        MethodReturn {
            outcome: Outcome::Value(value.into()),
            updates: updates.into_iter().collect(),
        }
    }

    /// Creates a void success record with `Out`/`Ref` write-backs.
    #[must_use]
    pub fn void_with_updates(updates: impl IntoIterator<Item = ArgumentUpdate>) -> Self {
        MethodReturn::value_with_updates(Value::Unit, updates)
    }

    /// Creates a failure record reporting the call as having raised `exception`.
    #[must_use]
    pub fn raise(exception: Exception) -> Self {
        MethodReturn {
            outcome: Outcome::Raised(exception),
            updates: Vec::new(),
        }
    }

    /// Returns true if this record reports the call as failed.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        matches!(self.outcome, Outcome::Raised(_))
    }

    /// Returns the success value, or `None` for failure records.
    #[must_use]
    pub fn return_value(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Value(value) => Some(value),
            Outcome::Raised(_) => None,
        }
    }

    /// Returns the configured exception, or `None` for success records.
    #[must_use]
    pub fn exception(&self) -> Option<&Exception> {
        match &self.outcome {
            Outcome::Value(_) => None,
            Outcome::Raised(exception) => Some(exception),
        }
    }

    /// Returns the `Out`/`Ref` write-backs carried by this record.
    #[must_use]
    pub fn updated_arguments(&self) -> &[ArgumentUpdate] {
        &self.updates
    }

    /// Splits the record into its success value or exception payload.
    pub fn into_outcome(self) -> std::result::Result<Value, Exception> {
        match self.outcome {
            Outcome::Value(value) => Ok(value),
            Outcome::Raised(exception) => Err(exception),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_exception_are_exclusive() {
        let ok = MethodReturn::value("done");
        assert!(ok.return_value().is_some());
        assert!(ok.exception().is_none());

        let failed = MethodReturn::raise(Exception::invalid_operation("closed"));
        assert!(failed.return_value().is_none());
        assert!(failed.exception().is_some());
    }

    #[test]
    fn test_void_success_carries_unit() {
        let ret = MethodReturn::void();
        assert_eq!(ret.return_value(), Some(&Value::Unit));
        assert!(!ret.is_exception());
    }

    #[test]
    fn test_updates_ride_on_either_form() {
        let ret = MethodReturn::void_with_updates([ArgumentUpdate::new(1, 5i32)]);
        assert_eq!(ret.updated_arguments().len(), 1);
        assert_eq!(ret.updated_arguments()[0].index(), 1);
        assert_eq!(ret.updated_arguments()[0].value(), &Value::Int32(5));
    }

    #[test]
    fn test_into_outcome() {
        assert_eq!(
            MethodReturn::value(3i32).into_outcome().unwrap(),
            Value::Int32(3)
        );

        let e = Exception::argument("bad");
        assert_eq!(
            MethodReturn::raise(e.clone()).into_outcome().unwrap_err(),
            e
        );
    }

    #[test]
    fn test_exception_display_and_identity() {
        let e = Exception::new(ExceptionKind::Custom("Timeout".into()), "too slow");
        assert_eq!(e.to_string(), "Timeout: too slow");
        assert_eq!(e, e.clone());
    }
}
