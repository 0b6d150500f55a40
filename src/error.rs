use thiserror::Error;

use crate::{
    invocation::{Direction, Exception, MemberId, ProxyId},
    value::ValueKind,
};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers every failure mode of the interception core: chain exhaustion,
/// deliberately configured call failures, argument-slot misuse and synchronization
/// faults. Each variant provides specific context about the failure mode to enable
/// appropriate error handling.
///
/// # Error Categories
///
/// ## Dispatch Errors
/// - [`Error::UnhandledInvocation`] - No behavior produced a result before the chain ran out
/// - [`Error::Raised`] - A behavior deliberately reported the call as failed
///
/// ## Argument Errors
/// - [`Error::ArgumentNotWritable`] - Attempted to write an input-only argument slot
/// - [`Error::ArgumentOutOfRange`] - Argument index past the end of the declared list
/// - [`Error::KindMismatch`] - A value of the wrong kind for the declared slot or return type
///
/// ## Infrastructure Errors
/// - [`Error::LockError`] - Thread synchronization failure
/// - [`Error::Error`] - Generic wrapper for miscellaneous behavior faults
///
/// # Examples
///
/// ```rust
/// use mockpipe::{BehaviorPipeline, Error, MethodInvocation, MemberId, ProxyId};
///
/// let pipeline = BehaviorPipeline::new();
/// let invocation = MethodInvocation::new(ProxyId::next(), MemberId::method("Ping"), Vec::new());
///
/// match pipeline.execute(&invocation) {
///     Err(Error::UnhandledInvocation { member, .. }) => {
///         eprintln!("nothing configured for {member}");
///     }
///     Err(e) => eprintln!("other error: {e}"),
///     Ok(_) => unreachable!("empty pipelines never produce a result"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// No behavior in the pipeline produced a result for this call.
    ///
    /// The chain was executed to exhaustion without any behavior short-circuiting
    /// or otherwise supplying a return record. This is a distinct, catchable
    /// condition rather than a silent default: whether unconfigured members fail
    /// loudly or return defaults is decided solely by whether a
    /// [`DefaultValueBehavior`](crate::behaviors::DefaultValueBehavior) sits at
    /// the end of the pipeline.
    #[error("No behavior handled invocation of {member} on {target}")]
    UnhandledInvocation {
        /// Identity of the stand-in instance that received the call
        target: ProxyId,
        /// Identity of the member that was invoked
        member: MemberId,
    },

    /// A behavior deliberately reported this call as failed.
    ///
    /// Produced by [`BehaviorPipeline::execute_typed`](crate::pipeline::BehaviorPipeline::execute_typed)
    /// when the return record carries an exception payload. The payload is
    /// re-surfaced exactly as configured, so the caller observes it as if the
    /// intercepted member had raised it directly. This is the *configured failure*
    /// case; genuine behavior faults propagate as their own error values instead.
    #[error("{0}")]
    Raised(Exception),

    /// A behavior attempted to write an argument slot that is not writable.
    ///
    /// Only `Out` and `Ref` slots accept new values; input arguments are fixed
    /// for the lifetime of the invocation record.
    #[error("Argument {index} of {member} is not writable ({direction} direction)")]
    ArgumentNotWritable {
        /// Identity of the member whose argument was targeted
        member: MemberId,
        /// Zero-based position of the argument
        index: usize,
        /// Declared direction of the argument
        direction: Direction,
    },

    /// An argument index was past the end of the member's declared parameter list.
    #[error("Argument index {index} out of range for {member}")]
    ArgumentOutOfRange {
        /// Identity of the member whose argument was targeted
        member: MemberId,
        /// Zero-based position that was requested
        index: usize,
    },

    /// A value of the wrong kind was supplied for a declared slot or return type.
    ///
    /// Raised by typed execution when the return value cannot be represented as
    /// the requested type, and by argument-slot writes whose value kind does not
    /// match the declared kind.
    #[error("Value kind mismatch - expected {expected}, found {found}")]
    KindMismatch {
        /// The kind declared for the slot or requested by the caller
        expected: ValueKind,
        /// The kind that was actually supplied
        found: ValueKind,
    },

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically when a
    /// mutex or rwlock was poisoned by a panicking behavior on another thread.
    #[error("Failed to lock target - {0}")]
    LockError(String),

    /// Generic error for miscellaneous failures.
    ///
    /// Used by behavior authors for faults that don't fit other categories.
    /// Faults propagate unmodified through the pipeline; they are never
    /// converted into return records by the core.
    #[error("{0}")]
    Error(String),
}
