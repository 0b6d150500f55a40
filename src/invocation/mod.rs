//! Call capture: invocation records, member/target identity and return records.
//!
//! This module defines the uniform representation of one intercepted call and
//! its outcome. A stand-in builds a [`MethodInvocation`] for every member
//! call it receives; the pipeline's behaviors consume it and produce a
//! [`MethodReturn`]; the stand-in unwraps that record back into a plain
//! value, a raised [`Exception`] or written-back `Out`/`Ref` slots for its
//! caller.
//!
//! # Key Types
//!
//! - [`MethodInvocation`] - immutable-except-for-writable-slots snapshot of one call
//! - [`MemberId`] / [`MemberKind`] - overload-distinguishing member identity
//! - [`ProxyId`] - process-unique stand-in instance identity
//! - [`Argument`] / [`ArgumentDescriptor`] / [`Direction`] - direction-tagged argument slots
//! - [`MethodReturn`] / [`ArgumentUpdate`] - success-or-exception outcome plus write-backs
//! - [`Exception`] / [`ExceptionKind`] - configured failure payloads
//!
//! # Lifecycle
//!
//! Invocation and return records are created per call and discarded once the
//! caller has consumed the outcome. Identities ([`ProxyId`], [`MemberId`])
//! outlive individual calls: they key call logs and stub tables.

mod argument;
mod identity;
mod record;
mod returns;

pub use argument::{Argument, ArgumentDescriptor, Direction};
pub use identity::{MemberId, MemberKind, ProxyId};
pub use record::MethodInvocation;
pub use returns::{ArgumentUpdate, Exception, ExceptionKind, MethodReturn};
