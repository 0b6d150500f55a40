//! Per-instance bookkeeping: call logs, lazy association and the stand-in
//! contract.
//!
//! Every stand-in instance owns exactly one [`Mock`], its association, that
//! accumulates what happened to the instance: an append-only call log plus an
//! ordered per-member index over it. The association is created lazily, at
//! most once, on first access through a [`MockCell`]; configuration and
//! verification code reaches it through the [`Mocked`] trait and the
//! instance's behavior collection through the [`Proxy`] trait.
//!
//! The pipeline and executor never look inside the association; it is owned
//! by the stand-in instance that created it and consumed by external
//! setup/verification code (typically via the
//! [`RecordingBehavior`](crate::behaviors::RecordingBehavior)).

use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;

use crate::{
    invocation::{Direction, MemberId, MethodInvocation, ProxyId},
    pipeline::BehaviorPipeline,
    value::Value,
    Result,
};

/// One argument as it appeared when a call entered the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedArgument {
    name: String,
    direction: Direction,
    value: Option<Value>,
}

impl RecordedArgument {
    /// Returns the declared parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the value at entry; `None` for `Out` slots nothing had
    /// written yet.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

/// Log projection of one invocation: the member identity plus each argument's
/// entry-time value.
///
/// Records are captured when the call enters the pipeline, so `Out`/`Ref`
/// write-backs performed later in the chain do not retroactively appear in
/// the log.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    member: MemberId,
    arguments: Vec<RecordedArgument>,
}

impl CallRecord {
    /// Projects an invocation record into its log form.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`](crate::Error::LockError) if the invocation's slot
    /// lock was poisoned.
    pub fn from_invocation(invocation: &MethodInvocation) -> Result<Self> {
        let values = invocation.argument_values()?;
        let arguments = invocation
            .descriptors()
            .iter()
            .zip(values)
            .map(|(descriptor, value)| RecordedArgument {
                name: descriptor.name().to_string(),
                direction: descriptor.direction(),
                value,
            })
            .collect();
        Ok(CallRecord {
            member: invocation.member().clone(),
            arguments,
        })
    }

    /// Returns the identity of the invoked member.
    #[must_use]
    pub fn member(&self) -> &MemberId {
        &self.member
    }

    /// Returns the recorded arguments in declared order.
    #[must_use]
    pub fn arguments(&self) -> &[RecordedArgument] {
        &self.arguments
    }
}

/// The per-instance association: identity plus call history.
///
/// All of `Mock` is safe for concurrent use: the call log is an append-only
/// concurrent vector and the per-member index a concurrent ordered map, so
/// recording from one thread while verification code iterates on another
/// needs no external locking. Entries are never removed; the log reflects
/// the full history of the instance.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{CallRecord, MemberId, MethodInvocation, Mock, ProxyId};
///
/// let id = ProxyId::next();
/// let mock = Mock::new(id);
///
/// let invocation = MethodInvocation::new(id, MemberId::method("Ping"), Vec::new());
/// mock.record(CallRecord::from_invocation(&invocation)?);
///
/// assert_eq!(mock.call_count(), 1);
/// assert_eq!(mock.count_of(&MemberId::method("Ping")), 1);
/// # Ok::<(), mockpipe::Error>(())
/// ```
pub struct Mock {
    target: ProxyId,
    calls: boxcar::Vec<CallRecord>,
    by_member: SkipMap<MemberId, boxcar::Vec<usize>>,
}

impl Mock {
    /// Creates the association for the instance identified by `target`.
    #[must_use]
    pub fn new(target: ProxyId) -> Self {
        Mock {
            target,
            calls: boxcar::Vec::new(),
            by_member: SkipMap::new(),
        }
    }

    /// Returns the identity of the associated stand-in instance.
    #[must_use]
    pub fn target(&self) -> ProxyId {
        self.target
    }

    /// Appends a call record to the log and indexes it by member.
    ///
    /// Returns the record's position in the log.
    pub fn record(&self, record: CallRecord) -> usize {
        let member = record.member().clone();
        let index = self.calls.push(record);
        self.by_member
            .get_or_insert_with(member, boxcar::Vec::new)
            .value()
            .push(index);
        index
    }

    /// Total number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.count()
    }

    /// Iterates all recorded calls in log order.
    pub fn calls(&self) -> impl Iterator<Item = &CallRecord> {
        self.calls.iter().map(|(_, record)| record)
    }

    /// Returns the recorded calls to `member`, in log order.
    #[must_use]
    pub fn calls_of(&self, member: &MemberId) -> Vec<&CallRecord> {
        match self.by_member.get(member) {
            Some(entry) => {
                let indices: Vec<usize> = entry.value().iter().map(|(_, &i)| i).collect();
                indices.into_iter().filter_map(|i| self.calls.get(i)).collect()
            }
            None => Vec::new(),
        }
    }

    /// Number of recorded calls to `member`.
    #[must_use]
    pub fn count_of(&self, member: &MemberId) -> usize {
        self.by_member.get(member).map_or(0, |e| e.value().count())
    }

    /// Returns the distinct members called so far, in identity order.
    #[must_use]
    pub fn members_called(&self) -> Vec<MemberId> {
        self.by_member.iter().map(|e| e.key().clone()).collect()
    }
}

/// Lazy, create-once slot for a stand-in's [`Mock`] association.
///
/// The first caller of [`get_or_create`](Self::get_or_create) constructs the
/// association and publishes it; every later caller, including callers
/// racing on other threads, observes the identical `Arc`. No two
/// associations are ever created for one slot.
///
/// Stand-ins embed a `MockCell` as a field and implement [`Mocked`] on top
/// of it:
///
/// ```rust
/// use mockpipe::{Mock, MockCell, Mocked, ProxyId};
/// use std::sync::Arc;
///
/// struct Double {
///     id: ProxyId,
///     mock: MockCell,
/// }
///
/// impl Mocked for Double {
///     fn mock(&self) -> &Arc<Mock> {
///         self.mock.get_or_create(self.id)
///     }
/// }
///
/// let double = Double { id: ProxyId::next(), mock: MockCell::new() };
/// assert!(Arc::ptr_eq(double.mock(), double.mock()));
/// ```
pub struct MockCell {
    slot: OnceLock<Arc<Mock>>,
}

impl MockCell {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        MockCell {
            slot: OnceLock::new(),
        }
    }

    /// Returns the association, constructing it on first access.
    pub fn get_or_create(&self, target: ProxyId) -> &Arc<Mock> {
        self.slot.get_or_init(|| Arc::new(Mock::new(target)))
    }

    /// Returns the association if it has been created.
    #[must_use]
    pub fn get(&self) -> Option<&Arc<Mock>> {
        self.slot.get()
    }
}

impl Default for MockCell {
    fn default() -> Self {
        MockCell::new()
    }
}

/// The behavior-collection half of the stand-in contract.
///
/// A generated stand-in exposes its pipeline so external configuration code
/// can append and remove behaviors on the same collection the instance's own
/// intercepted members execute against.
pub trait Proxy {
    /// The instance's behavior pipeline, shared with configuration code.
    fn behaviors(&self) -> &BehaviorPipeline;
}

/// The association half of the stand-in contract.
///
/// Implementations create the association lazily (via [`MockCell`]); the
/// returned `Arc` is identical across calls for the lifetime of the
/// instance.
pub trait Mocked {
    /// The instance's association, created on first access.
    fn mock(&self) -> &Arc<Mock>;
}
