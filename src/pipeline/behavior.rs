use std::sync::Arc;

use crate::{
    invocation::{MethodInvocation, MethodReturn},
    Error, Result,
};

/// Reference-counted handle to a behavior in a pipeline.
pub type BehaviorRc = Arc<dyn Behavior>;

/// An immutable slice of the behavior sequence as published at some instant,
/// shared by all continuations of one call.
pub type BehaviorSnapshot = Arc<[BehaviorRc]>;

/// A single interceptor participating in the call chain.
///
/// Given an invocation and a handle to the remainder of the chain, a behavior
/// produces a return record. It can do so in two ways:
///
/// - **short-circuit**: produce the record itself without touching `next`;
///   the remaining behaviors in this call's snapshot never run, or
/// - **continue**: call [`NextHandler::invoke`] to run the rest of the chain,
///   then pass the result through (optionally post-processing it first).
///
/// Returning `Err` is neither of these: it is a *fault*, aborts the chain for
/// this call and propagates unmodified to the pipeline's caller. To report
/// the intercepted call as having thrown, return a failure record via
/// [`MethodReturn::raise`] instead.
///
/// Behaviors must not assume a position in the chain; the only guarantee is
/// that `next` runs the rest of the chain as configured at this call's start.
/// All behaviors are `Send + Sync` so pipelines can be shared across threads.
///
/// # Closures as behaviors
///
/// Any `Fn(&MethodInvocation, NextHandler) -> Result<MethodReturn>` closure
/// is a behavior, which keeps one-off interceptors lightweight:
///
/// ```rust
/// use mockpipe::{BehaviorPipeline, MethodInvocation, MethodReturn, NextHandler, Result};
/// use std::sync::Arc;
///
/// let pipeline = BehaviorPipeline::new();
/// pipeline.add(Arc::new(
///     |_inv: &MethodInvocation, _next: NextHandler| -> Result<MethodReturn> {
///         Ok(MethodReturn::value(42i32))
///     },
/// ))?;
/// # Ok::<(), mockpipe::Error>(())
/// ```
pub trait Behavior: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str {
        "anonymous"
    }

    /// Runs this behavior against `invocation`.
    ///
    /// # Errors
    ///
    /// An `Err` is a behavior fault and aborts the chain for this call; the
    /// core performs no recovery. Configured call failures travel inside the
    /// `Ok` record instead.
    fn invoke(&self, invocation: &MethodInvocation, next: NextHandler) -> Result<MethodReturn>;
}

impl<F> Behavior for F
where
    F: Fn(&MethodInvocation, NextHandler) -> Result<MethodReturn> + Send + Sync,
{
    fn invoke(&self, invocation: &MethodInvocation, next: NextHandler) -> Result<MethodReturn> {
        self(invocation, next)
    }
}

/// Handle to the remainder of the chain for one call.
///
/// A `NextHandler` is a small value object binding the call's immutable
/// behavior snapshot to a position in it, rather than a closure over mutable
/// state: snapshot isolation is explicit in the type. Invoking it runs the
/// behavior at the bound position with a handler for the position after it;
/// invoking an exhausted handler yields the
/// [`UnhandledInvocation`](Error::UnhandledInvocation) error.
///
/// Handlers are cheap to clone and may be invoked more than once (a retrying
/// behavior re-runs the rest of the chain against the same snapshot).
#[derive(Clone)]
pub struct NextHandler {
    snapshot: BehaviorSnapshot,
    index: usize,
}

impl NextHandler {
    pub(crate) fn new(snapshot: BehaviorSnapshot, index: usize) -> Self {
        NextHandler { snapshot, index }
    }

    /// Runs the rest of the chain against `invocation`.
    ///
    /// # Errors
    ///
    /// [`Error::UnhandledInvocation`] if no behavior remains; otherwise
    /// whatever the remaining behaviors produce.
    pub fn invoke(&self, invocation: &MethodInvocation) -> Result<MethodReturn> {
        match self.snapshot.get(self.index) {
            Some(behavior) => behavior.invoke(
                invocation,
                NextHandler::new(self.snapshot.clone(), self.index + 1),
            ),
            None => Err(Error::UnhandledInvocation {
                target: invocation.target(),
                member: invocation.member().clone(),
            }),
        }
    }

    /// Number of behaviors left in this call's snapshot, including the one
    /// this handler is bound to.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.snapshot.len().saturating_sub(self.index)
    }

    /// Returns true if invoking this handler cannot run any behavior.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.snapshot.len()
    }
}
