// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # mockpipe
//!
//! A behavior-pipeline interception core for building mocking libraries and
//! generated test doubles. `mockpipe` lets a stand-in object intercept every
//! member call made against it and route the call through a configurable,
//! ordered chain of independent behaviors (recording, stub lookup,
//! default-value synthesis, exception injection) before producing a final
//! result.
//!
//! The crate is the *runtime* half of a mocking stack: the toolchain that
//! generates concrete stand-in types from interface declarations is an
//! external collaborator. Generated types plug into this core through a
//! two-trait contract ([`Proxy`] + [`Mocked`]); everything else (call
//! capture, chain execution, outcome reconciliation, call history) happens
//! here.
//!
//! ## Features
//!
//! - **Uniform call capture** - any member call becomes a [`MethodInvocation`]: target
//!   identity, overload-distinguishing member identity, direction-tagged arguments
//! - **Composable interception** - behaviors chain through explicit continuations with
//!   short-circuit semantics; any closure can be a behavior
//! - **Snapshot isolation** - reconfiguring a pipeline never disturbs calls already
//!   in flight; behaviors execute against the sequence published at call start
//! - **Faithful outcomes** - success values, configured exceptions and `Out`/`Ref`
//!   write-backs are reconciled exactly; configured failures re-raise verbatim
//! - **Concurrent bookkeeping** - lock-free append-only call logs with an ordered
//!   per-member index, safe to record and verify from different threads
//!
//! ## Quick Start
//!
//! Add `mockpipe` to your `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! mockpipe = "0.2"
//! ```
//!
//! Configure a pipeline the way a mocking layer would (record first, stubs
//! in the middle, defaults last) and execute a call against it:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mockpipe::{
//!     behaviors::{DefaultValueBehavior, RecordingBehavior, Stub, StubBehavior},
//!     Argument, BehaviorPipeline, MemberId, MethodInvocation, Mock, ProxyId, ValueKind,
//! };
//!
//! // One identity, association and pipeline per stand-in instance.
//! let id = ProxyId::next();
//! let mock = Arc::new(Mock::new(id));
//! let pipeline = BehaviorPipeline::new();
//!
//! let greet = MemberId::method("Greet")
//!     .with_parameters([ValueKind::Str])
//!     .returning(ValueKind::Str);
//!
//! let stubs = Arc::new(StubBehavior::new());
//! stubs.add(Stub::on(greet.clone()).returns("hello"));
//!
//! pipeline.add(Arc::new(RecordingBehavior::new(mock.clone())))?;
//! pipeline.add(stubs)?;
//! pipeline.add(Arc::new(DefaultValueBehavior))?;
//!
//! // What a generated stand-in member does on every call:
//! let invocation =
//!     MethodInvocation::new(id, greet, vec![Argument::input("name", "world")]);
//! let reply: String = pipeline.execute_typed(&invocation)?;
//!
//! assert_eq!(reply, "hello");
//! assert_eq!(mock.call_count(), 1);
//! # Ok::<(), mockpipe::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `mockpipe` is organized into four layers, leaves first:
//!
//! - [`value`] - the [`Value`]/[`ValueKind`] tagged union every call slot carries
//! - [`invocation`] - invocation records, member/target identity, return records
//! - [`pipeline`] - the [`Behavior`] trait, continuation handles and the executor
//! - [`mock`] - per-instance association (call log, identity) and the stand-in contract
//! - [`behaviors`] - canonical interceptors composed from the layers above
//!
//! Control flow for one intercepted call:
//!
//! ```text
//! stand-in member()          configuration code
//!       │                          │
//!       ▼                          ▼
//! MethodInvocation     ┌── add / remove behaviors ──┐
//!       │              │                            │
//!       ▼              ▼                            │
//! BehaviorPipeline::execute ── snapshot ── b0 → b1 → ... → bn-1
//!       │                                   (short-circuit or continue)
//!       ▼
//! MethodReturn ── value / raised exception / Out-Ref write-backs
//!       │
//!       ▼
//! caller sees plain value, exception, or filled out-params
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) and the core never
//! swallows a failure: callers observe a normal return value, a configured
//! exception re-raised exactly ([`Error::Raised`]), or the distinct
//! [`Error::UnhandledInvocation`] when no behavior produced a result.
//! Behavior faults propagate unmodified.
//!
//! ```rust
//! use mockpipe::{BehaviorPipeline, Error, MemberId, MethodInvocation, ProxyId};
//!
//! let pipeline = BehaviorPipeline::new();
//! let invocation = MethodInvocation::new(ProxyId::next(), MemberId::method("Ping"), Vec::new());
//!
//! match pipeline.execute(&invocation) {
//!     Err(Error::UnhandledInvocation { member, .. }) => {
//!         println!("{member} reached the end of the chain");
//!     }
//!     Err(e) => println!("fault: {e}"),
//!     Ok(ret) => println!("handled: {ret:?}"),
//! }
//! ```
//!
//! ## Threading
//!
//! Execution is purely synchronous: a call runs to completion on the calling
//! thread. The shared structures around it (the behavior sequence, stub
//! tables, call logs, the lazy association slot) are all safe for
//! concurrent use, so configuration and verification may happen while calls
//! are in flight elsewhere.

pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use mockpipe::prelude::*;
///
/// let pipeline = BehaviorPipeline::new();
/// assert!(pipeline.is_empty());
/// ```
pub mod prelude;

/// Canonical behavior implementations: recording, stub matching and
/// default-value synthesis, plus the pluggable argument matchers stubs use.
pub mod behaviors;

/// Call capture: invocation records, member/target identity, direction-tagged
/// arguments and return records.
pub mod invocation;

/// Per-instance bookkeeping (call log, identity), the lazy association slot
/// and the stand-in contract traits.
pub mod mock;

/// The ordered behavior chain and its executor, including the continuation
/// protocol between behaviors.
pub mod pipeline;

/// The tagged value union argument and return slots are expressed in.
pub mod value;

/// `mockpipe` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is
/// always [`Error`]. Used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `mockpipe` Error type
///
/// The main error type for all operations in this crate. See the variant
/// documentation for the full dispatch/argument/infrastructure taxonomy.
pub use error::Error;

pub use behaviors::{DefaultValueBehavior, RecordingBehavior, Stub, StubBehavior};
pub use invocation::{
    Argument, ArgumentDescriptor, ArgumentUpdate, Direction, Exception, ExceptionKind, MemberId,
    MemberKind, MethodInvocation, MethodReturn, ProxyId,
};
pub use mock::{CallRecord, Mock, MockCell, Mocked, Proxy, RecordedArgument};
pub use pipeline::{Behavior, BehaviorPipeline, BehaviorRc, NextHandler};
pub use value::{FromValue, Value, ValueKind};
