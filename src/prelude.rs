//! Convenient re-exports of the most commonly used types and traits.
//!
//! This module provides a curated selection of the most frequently used
//! types from across the library, allowing for convenient glob imports in
//! generated stand-in code and in tests.
//!
//! # Example
//!
//! ```rust
//! use mockpipe::prelude::*;
//! use std::sync::Arc;
//!
//! let pipeline = BehaviorPipeline::new();
//! pipeline.add(Arc::new(DefaultValueBehavior))?;
//!
//! let invocation = MethodInvocation::new(
//!     ProxyId::next(),
//!     MemberId::method("Count").returning(ValueKind::Int32),
//!     Vec::new(),
//! );
//! let count: i32 = pipeline.execute_typed(&invocation)?;
//! assert_eq!(count, 0);
//! # Ok::<(), mockpipe::Error>(())
//! ```

pub use crate::{
    behaviors::{
        AnyValue, ArgumentMatcher, DefaultValueBehavior, ExactValue, MatchOrder, Predicate,
        RecordingBehavior, Stub, StubBehavior,
    },
    error::Error,
    invocation::{
        Argument, ArgumentDescriptor, ArgumentUpdate, Direction, Exception, ExceptionKind,
        MemberId, MemberKind, MethodInvocation, MethodReturn, ProxyId,
    },
    mock::{CallRecord, Mock, MockCell, Mocked, Proxy, RecordedArgument},
    pipeline::{Behavior, BehaviorPipeline, BehaviorRc, NextHandler},
    value::{FromValue, Value, ValueKind},
    Result,
};
