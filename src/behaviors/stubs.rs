use std::sync::Arc;

use dashmap::DashMap;
use strum::Display;

use crate::{
    invocation::{Exception, MemberId, MethodInvocation, MethodReturn},
    pipeline::{Behavior, NextHandler},
    value::Value,
    Result,
};

/// Decides whether one argument slot satisfies a stub.
///
/// Matchers receive the slot's entry-time value, or `None` for an `Out` slot
/// nothing has written. Implementations must be `Send + Sync`; matching may
/// run concurrently from several calling threads.
pub trait ArgumentMatcher: Send + Sync {
    /// Returns true if `value` satisfies this matcher.
    fn matches(&self, value: Option<&Value>) -> bool;
}

/// Matches any value, including unset `Out` slots.
pub struct AnyValue;

impl ArgumentMatcher for AnyValue {
    fn matches(&self, _value: Option<&Value>) -> bool {
        true
    }
}

/// Matches a slot whose value equals the expected value.
///
/// Equality follows [`Value`] semantics: structural for primitives and
/// strings, pointer identity for references. Unset slots never match.
pub struct ExactValue(Value);

impl ExactValue {
    /// Creates a matcher expecting `value`.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        ExactValue(value.into())
    }
}

impl ArgumentMatcher for ExactValue {
    fn matches(&self, value: Option<&Value>) -> bool {
        value == Some(&self.0)
    }
}

/// Matches a slot the supplied predicate accepts.
pub struct Predicate {
    test: Box<dyn Fn(Option<&Value>) -> bool + Send + Sync>,
}

impl Predicate {
    /// Creates a matcher from a predicate over the slot value.
    #[must_use]
    pub fn new(test: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static) -> Self {
        Predicate {
            test: Box::new(test),
        }
    }
}

impl ArgumentMatcher for Predicate {
    fn matches(&self, value: Option<&Value>) -> bool {
        (self.test)(value)
    }
}

enum StubOutcome {
    Returns(Value),
    Raises(Exception),
    Computes(Box<dyn Fn(&MethodInvocation) -> Result<MethodReturn> + Send + Sync>),
}

/// One configured expectation: a member identity, optional per-argument
/// matchers and the outcome to produce on match.
///
/// A stub with no matchers matches every call to its member. With matchers,
/// their count must equal the call's argument count and every matcher must
/// accept its slot; otherwise the stub does not match and the call keeps
/// moving down the candidate list.
///
/// Until an outcome is configured, a matching stub returns the
/// type-appropriate default for the member's declared return kind.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{
///     behaviors::{AnyValue, ExactValue, Stub},
///     Exception, MemberId, ValueKind,
/// };
///
/// let add = MemberId::method("Add")
///     .with_parameters([ValueKind::Int32, ValueKind::Int32])
///     .returning(ValueKind::Int32);
///
/// // Add(2, <any>) returns 5; Add(0, <any>) raises.
/// let happy = Stub::on(add.clone())
///     .matching(ExactValue::new(2i32))
///     .matching(AnyValue)
///     .returns(5i32);
/// let sad = Stub::on(add)
///     .matching(ExactValue::new(0i32))
///     .matching(AnyValue)
///     .raises(Exception::argument("lhs must be non-zero"));
/// # let _ = (happy, sad);
/// ```
pub struct Stub {
    member: MemberId,
    matchers: Vec<Box<dyn ArgumentMatcher>>,
    outcome: StubOutcome,
}

impl Stub {
    /// Starts a stub for calls to `member`.
    #[must_use]
    pub fn on(member: MemberId) -> Self {
        let default = Value::default_of(member.returns());
        Stub {
            member,
            matchers: Vec::new(),
            outcome: StubOutcome::Returns(default),
        }
    }

    /// Appends a matcher for the next argument position.
    #[must_use]
    pub fn matching(mut self, matcher: impl ArgumentMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// Configures the stub to return `value`.
    #[must_use]
    pub fn returns(mut self, value: impl Into<Value>) -> Self {
        self.outcome = StubOutcome::Returns(value.into());
        self
    }

    /// Configures the stub to report the call as having raised `exception`.
    #[must_use]
    pub fn raises(mut self, exception: Exception) -> Self {
        self.outcome = StubOutcome::Raises(exception);
        self
    }

    /// Configures the stub to compute its outcome from the invocation.
    ///
    /// The callback may produce any return record, including failure records
    /// and records carrying `Out`/`Ref` write-backs; returning `Err` is a
    /// behavior fault and aborts the call.
    #[must_use]
    pub fn computes(
        mut self,
        callback: impl Fn(&MethodInvocation) -> Result<MethodReturn> + Send + Sync + 'static,
    ) -> Self {
        self.outcome = StubOutcome::Computes(Box::new(callback));
        self
    }

    /// Returns the member identity this stub is configured for.
    #[must_use]
    pub fn member(&self) -> &MemberId {
        &self.member
    }

    /// Checks whether this stub matches `invocation`.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`](crate::Error::LockError) if the invocation's slot
    /// lock was poisoned.
    pub fn matches(&self, invocation: &MethodInvocation) -> Result<bool> {
        if &self.member != invocation.member() {
            return Ok(false);
        }
        if self.matchers.is_empty() {
            return Ok(true);
        }
        if self.matchers.len() != invocation.argument_count() {
            return Ok(false);
        }
        let values = invocation.argument_values()?;
        Ok(self
            .matchers
            .iter()
            .zip(&values)
            .all(|(matcher, value)| matcher.matches(value.as_ref())))
    }

    /// Produces this stub's configured outcome for `invocation`.
    ///
    /// # Errors
    ///
    /// Whatever a [`computes`](Self::computes) callback fails with; the fixed
    /// outcomes are infallible.
    pub fn apply(&self, invocation: &MethodInvocation) -> Result<MethodReturn> {
        match &self.outcome {
            StubOutcome::Returns(value) => Ok(MethodReturn::value(value.clone())),
            StubOutcome::Raises(exception) => Ok(MethodReturn::raise(exception.clone())),
            StubOutcome::Computes(callback) => callback(invocation),
        }
    }
}

/// Which stub wins when several match the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Default)]
pub enum MatchOrder {
    /// The earliest-registered matching stub wins
    FirstAdded,
    /// The most recently registered matching stub wins, so a later setup
    /// overrides an earlier one
    #[default]
    LastAdded,
}

/// Matches invocations against externally configured [`Stub`]s.
///
/// Expectations are keyed by member identity; on a call, the candidates for
/// that member are tried in the order given by [`MatchOrder`] and the first
/// match produces its outcome without running the rest of the chain. Calls
/// with no matching stub fall through to the continuation untouched.
///
/// Configuration is safe while calls are in flight: stubs live in a
/// concurrent map, and a call evaluates the candidate list it found when it
/// reached this behavior.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{
///     behaviors::{DefaultValueBehavior, Stub, StubBehavior},
///     BehaviorPipeline, MemberId, MethodInvocation, ProxyId, ValueKind,
/// };
/// use std::sync::Arc;
///
/// let name = MemberId::property_get("Name", ValueKind::Str);
///
/// let stubs = Arc::new(StubBehavior::new());
/// stubs.add(Stub::on(name.clone()).returns("mocked"));
///
/// let pipeline = BehaviorPipeline::new();
/// pipeline.add(stubs.clone())?;
/// pipeline.add(Arc::new(DefaultValueBehavior))?;
///
/// let id = ProxyId::next();
/// let value: String =
///     pipeline.execute_typed(&MethodInvocation::new(id, name, Vec::new()))?;
/// assert_eq!(value, "mocked");
/// # Ok::<(), mockpipe::Error>(())
/// ```
pub struct StubBehavior {
    stubs: DashMap<MemberId, Vec<Arc<Stub>>>,
    order: MatchOrder,
}

impl StubBehavior {
    /// Creates an empty stub table with the default
    /// [`MatchOrder::LastAdded`] precedence.
    #[must_use]
    pub fn new() -> Self {
        StubBehavior::with_order(MatchOrder::default())
    }

    /// Creates an empty stub table with an explicit precedence policy.
    #[must_use]
    pub fn with_order(order: MatchOrder) -> Self {
        StubBehavior {
            stubs: DashMap::new(),
            order,
        }
    }

    /// Registers a stub.
    ///
    /// Visible to calls that reach this behavior after registration.
    pub fn add(&self, stub: Stub) {
        self.stubs
            .entry(stub.member().clone())
            .or_default()
            .push(Arc::new(stub));
    }

    /// Total number of registered stubs across all members.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.stubs.iter().map(|entry| entry.value().len()).sum()
    }

    /// Returns the precedence policy.
    #[must_use]
    pub fn order(&self) -> MatchOrder {
        self.order
    }

    // Candidate list in decision order, cloned out so no map guard is held
    // while user-supplied matchers and callbacks run.
    fn candidates(&self, member: &MemberId) -> Vec<Arc<Stub>> {
        match self.stubs.get(member) {
            Some(stubs) => match self.order {
                MatchOrder::FirstAdded => stubs.iter().cloned().collect(),
                MatchOrder::LastAdded => stubs.iter().rev().cloned().collect(),
            },
            None => Vec::new(),
        }
    }
}

impl Default for StubBehavior {
    fn default() -> Self {
        StubBehavior::new()
    }
}

impl Behavior for StubBehavior {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn invoke(&self, invocation: &MethodInvocation, next: NextHandler) -> Result<MethodReturn> {
        for stub in self.candidates(invocation.member()) {
            if stub.matches(invocation)? {
                return stub.apply(invocation);
            }
        }
        next.invoke(invocation)
    }
}
