//! Canonical behavior implementations.
//!
//! These are the stock interceptors a mocking layer composes into a
//! pipeline; they illustrate the [`Behavior`](crate::pipeline::Behavior)
//! contract without exhausting it: anything implementing the trait (or any
//! suitable closure) participates on equal footing.
//!
//! The conventional arrangement, first to last:
//!
//! | Position | Behavior | Role |
//! |----------|----------|------|
//! | first | [`RecordingBehavior`] | observe every call, even short-circuited ones |
//! | middle | [`StubBehavior`] | produce configured outcomes for matching calls |
//! | last | [`DefaultValueBehavior`] | quiet defaults for everything unconfigured |
//!
//! Argument matching for stubs is pluggable through [`ArgumentMatcher`];
//! [`AnyValue`], [`ExactValue`] and [`Predicate`] cover the common cases.

mod defaults;
mod recording;
mod stubs;

pub use defaults::DefaultValueBehavior;
pub use recording::RecordingBehavior;
pub use stubs::{AnyValue, ArgumentMatcher, ExactValue, MatchOrder, Predicate, Stub, StubBehavior};
