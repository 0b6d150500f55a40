use std::sync::Arc;

use crate::{
    invocation::{MethodInvocation, MethodReturn},
    mock::{CallRecord, Mock, Mocked},
    pipeline::{Behavior, NextHandler},
    Result,
};

/// Appends every call to the instance's association log, then passes the
/// call through unmodified.
///
/// The record is captured *before* the rest of the chain runs, so a call is
/// observed even when a later behavior short-circuits or faults, and the
/// logged argument values are the entry-time values. Place this behavior
/// first in the pipeline; behaviors in front of it can short-circuit past it
/// and leave calls unobserved.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{
///     behaviors::{DefaultValueBehavior, RecordingBehavior},
///     BehaviorPipeline, MemberId, MethodInvocation, Mock, ProxyId,
/// };
/// use std::sync::Arc;
///
/// let id = ProxyId::next();
/// let mock = Arc::new(Mock::new(id));
///
/// let pipeline = BehaviorPipeline::new();
/// pipeline.add(Arc::new(RecordingBehavior::new(mock.clone())))?;
/// pipeline.add(Arc::new(DefaultValueBehavior))?;
///
/// pipeline.execute(&MethodInvocation::new(id, MemberId::method("Ping"), Vec::new()))?;
/// assert_eq!(mock.call_count(), 1);
/// # Ok::<(), mockpipe::Error>(())
/// ```
pub struct RecordingBehavior {
    mock: Arc<Mock>,
}

impl RecordingBehavior {
    /// Creates a recording behavior writing into `mock`.
    #[must_use]
    pub fn new(mock: Arc<Mock>) -> Self {
        RecordingBehavior { mock }
    }

    /// Creates a recording behavior for a stand-in instance's own
    /// association.
    #[must_use]
    pub fn for_instance(instance: &dyn Mocked) -> Self {
        RecordingBehavior::new(Arc::clone(instance.mock()))
    }

    /// Returns the association this behavior records into.
    #[must_use]
    pub fn mock(&self) -> &Arc<Mock> {
        &self.mock
    }
}

impl Behavior for RecordingBehavior {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn invoke(&self, invocation: &MethodInvocation, next: NextHandler) -> Result<MethodReturn> {
        self.mock.record(CallRecord::from_invocation(invocation)?);
        next.invoke(invocation)
    }
}
