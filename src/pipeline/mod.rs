//! The behavior pipeline: ordered interceptor chain plus its executor.
//!
//! A [`BehaviorPipeline`] owns the ordered, mutable sequence of
//! [`Behavior`]s attached to one stand-in instance and turns that sequence
//! plus a [`MethodInvocation`] into a
//! [`MethodReturn`](crate::invocation::MethodReturn) via continuation
//! chaining.
//!
//! # Execution Model
//!
//! ```text
//! execute(invocation)
//!     │
//!     ▼
//! snapshot = published behavior sequence          (copy-on-write read)
//!     │
//!     ▼
//! NextHandler { snapshot, 0 }.invoke(invocation)
//!     │
//!     ├── behavior 0 ──► short-circuit: MethodReturn   (rest never runs)
//!     │        │
//!     │        └── next.invoke ──► behavior 1 ──► ...
//!     │                                 │
//!     │                                 └── exhausted ──► UnhandledInvocation
//!     ▼
//! write Out/Ref updates back into the invocation record
//! ```
//!
//! Each call executes against the snapshot taken at its start: appending or
//! removing behaviors while a call is in flight never changes that call's
//! chain, only chains of calls started afterwards. Mutation publishes a whole
//! new immutable sequence, so torn reads are impossible.
//!
//! Execution is purely synchronous on the calling thread. Behaviors may
//! perform arbitrary synchronous work, including invoking other stand-ins
//! recursively, but the executor itself provides no concurrency, suspension
//! or cancellation.

mod behavior;

pub use behavior::{Behavior, BehaviorRc, BehaviorSnapshot, NextHandler};

use std::sync::RwLock;

use crate::{
    invocation::{MethodInvocation, MethodReturn},
    value::FromValue,
    Error, Result,
};

/// The ordered, mutable behavior sequence of one stand-in instance, plus the
/// executor that runs it.
///
/// Insertion order is call order and duplicates are allowed. The sequence is
/// stored copy-on-write: every mutation publishes a new immutable snapshot,
/// and [`execute`](Self::execute) reads whichever snapshot is current when
/// the call starts. Configuration code may therefore add and remove
/// behaviors freely while calls are in flight on other threads.
///
/// One pipeline is created per stand-in instance and lives for the
/// instance's lifetime; it is shared between the instance's own intercepted
/// members and external configuration code (see
/// [`Proxy`](crate::mock::Proxy)).
///
/// # Examples
///
/// ```rust
/// use mockpipe::{
///     behaviors::DefaultValueBehavior, BehaviorPipeline, MemberId, MethodInvocation, ProxyId,
///     ValueKind,
/// };
/// use std::sync::Arc;
///
/// let pipeline = BehaviorPipeline::new();
/// pipeline.add(Arc::new(DefaultValueBehavior))?;
///
/// let invocation = MethodInvocation::new(
///     ProxyId::next(),
///     MemberId::method("Count").returning(ValueKind::Int32),
///     Vec::new(),
/// );
/// let count: i32 = pipeline.execute_typed(&invocation)?;
/// assert_eq!(count, 0);
/// # Ok::<(), mockpipe::Error>(())
/// ```
pub struct BehaviorPipeline {
    behaviors: RwLock<BehaviorSnapshot>,
}

impl BehaviorPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        BehaviorPipeline {
            behaviors: RwLock::new(Vec::new().into()),
        }
    }

    /// Creates a pipeline pre-populated in the given order.
    #[must_use]
    pub fn with_behaviors(behaviors: impl IntoIterator<Item = BehaviorRc>) -> Self {
        BehaviorPipeline {
            behaviors: RwLock::new(behaviors.into_iter().collect::<Vec<_>>().into()),
        }
    }

    /// Appends a behavior at the end of the sequence.
    ///
    /// Visible to calls that start after this returns; in-flight calls keep
    /// their snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] if the sequence lock was poisoned.
    pub fn add(&self, behavior: BehaviorRc) -> Result<()> {
        let mut guard = self.write_guard()?;
        let mut behaviors: Vec<BehaviorRc> = guard.to_vec();
        behaviors.push(behavior);
        *guard = behaviors.into();
        Ok(())
    }

    /// Inserts a behavior at `index`, shifting later behaviors back.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] on a poisoned lock, [`Error::Error`] if `index`
    /// is past the end of the sequence.
    pub fn insert(&self, index: usize, behavior: BehaviorRc) -> Result<()> {
        let mut guard = self.write_guard()?;
        if index > guard.len() {
            return Err(Error::Error(format!(
                "insert index {index} out of range for pipeline of length {}",
                guard.len()
            )));
        }
        let mut behaviors: Vec<BehaviorRc> = guard.to_vec();
        behaviors.insert(index, behavior);
        *guard = behaviors.into();
        Ok(())
    }

    /// Removes and returns the behavior at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] on a poisoned lock, [`Error::Error`] if `index`
    /// does not name a behavior.
    pub fn remove(&self, index: usize) -> Result<BehaviorRc> {
        let mut guard = self.write_guard()?;
        if index >= guard.len() {
            return Err(Error::Error(format!(
                "remove index {index} out of range for pipeline of length {}",
                guard.len()
            )));
        }
        let mut behaviors: Vec<BehaviorRc> = guard.to_vec();
        let removed = behaviors.remove(index);
        *guard = behaviors.into();
        Ok(removed)
    }

    /// Removes all behaviors.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] if the sequence lock was poisoned.
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.write_guard()?;
        *guard = Vec::new().into();
        Ok(())
    }

    /// Number of behaviors currently published.
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.read().map_or(0, |s| s.len())
    }

    /// Returns true if no behaviors are currently published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the currently published snapshot.
    ///
    /// The returned sequence is immutable; later pipeline mutations publish
    /// new snapshots and never disturb this one.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] if the sequence lock was poisoned.
    pub fn snapshot(&self) -> Result<BehaviorSnapshot> {
        Ok(self
            .behaviors
            .read()
            .map_err(|e| Error::LockError(format!("behavior sequence read lock: {e}")))?
            .clone())
    }

    /// Runs the chain for one invocation and returns its return record.
    ///
    /// Takes the current snapshot, executes behaviors strictly in snapshot
    /// order with explicit continuations, and on success writes the record's
    /// `Out`/`Ref` updates back into the invocation's slots so the stand-in
    /// can copy them out to its caller.
    ///
    /// # Errors
    ///
    /// [`Error::UnhandledInvocation`] if the chain runs out without any
    /// behavior producing a record; behavior faults propagate unmodified.
    /// A failure record (configured exception) is *not* an error here; use
    /// [`execute_typed`](Self::execute_typed) to have it re-raised.
    pub fn execute(&self, invocation: &MethodInvocation) -> Result<MethodReturn> {
        let snapshot = self.snapshot()?;
        let ret = NextHandler::new(snapshot, 0).invoke(invocation)?;
        invocation.apply_updates(ret.updated_arguments())?;
        Ok(ret)
    }

    /// Runs the chain and unwraps the outcome for a typed caller.
    ///
    /// A success value is extracted as `T` ([`Value::Unit`](crate::Value::Unit)
    /// extracts as `()` for void members); a failure record re-raises its
    /// exception payload exactly as configured, wrapped in
    /// [`Error::Raised`].
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) can fail with, plus
    /// [`Error::Raised`] for configured failures and
    /// [`Error::KindMismatch`] when the value does not extract as `T`.
    pub fn execute_typed<T: FromValue>(&self, invocation: &MethodInvocation) -> Result<T> {
        match self.execute(invocation)?.into_outcome() {
            Ok(value) => T::from_value(value),
            Err(exception) => Err(Error::Raised(exception)),
        }
    }

    fn write_guard(&self) -> Result<std::sync::RwLockWriteGuard<'_, BehaviorSnapshot>> {
        self.behaviors
            .write()
            .map_err(|e| Error::LockError(format!("behavior sequence write lock: {e}")))
    }
}

impl Default for BehaviorPipeline {
    fn default() -> Self {
        BehaviorPipeline::new()
    }
}
