use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use strum::{Display, EnumIter};

use crate::value::ValueKind;

static NEXT_PROXY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique identity of a stand-in instance.
///
/// Every stand-in allocates one id at construction and stamps it on each
/// invocation record it builds, so call logs and error messages can name the
/// receiving instance without holding a reference to it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProxyId(u64);

impl ProxyId {
    /// Allocates the next unused identity.
    ///
    /// Ids are handed out from a process-wide atomic counter and are never
    /// reused within a process.
    #[must_use]
    pub fn next() -> Self {
        ProxyId(NEXT_PROXY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identity.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyId({})", self.0)
    }
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proxy-{}", self.0)
    }
}

/// The category of an intercepted member.
///
/// Property accessors and event accessors are surfaced to the pipeline as
/// plain calls; the kind keeps their identities distinct from methods with
/// the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// Ordinary method
    Method,
    /// Property read accessor
    PropertyGet,
    /// Property write accessor
    PropertySet,
    /// Event subscription accessor
    EventAdd,
    /// Event unsubscription accessor
    EventRemove,
}

/// Stable identity of an invoked member, sufficient to distinguish overloads.
///
/// A member identity is its name, its [`MemberKind`] and its signature (the
/// ordered parameter kinds plus the return kind). Two overloads of the same
/// name therefore compare unequal, and the identity orders totally so it can
/// key ordered maps such as the per-member call index.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{MemberId, ValueKind};
///
/// let format = MemberId::method("Format")
///     .with_parameters([ValueKind::Str, ValueKind::Reference])
///     .returning(ValueKind::Str);
///
/// assert_ne!(format, MemberId::method("Format"));
/// assert_eq!(format.to_string(), "Format(Str, Reference) -> Str");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId {
    name: String,
    kind: MemberKind,
    parameters: Vec<ValueKind>,
    returns: ValueKind,
}

impl MemberId {
    /// Creates a method identity with no parameters and a void return.
    ///
    /// Refine with [`with_parameters`](Self::with_parameters) and
    /// [`returning`](Self::returning).
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        MemberId {
            name: name.into(),
            kind: MemberKind::Method,
            parameters: Vec::new(),
            returns: ValueKind::Unit,
        }
    }

    /// Creates a property read accessor identity producing `returns`.
    #[must_use]
    pub fn property_get(name: impl Into<String>, returns: ValueKind) -> Self {
        MemberId {
            name: name.into(),
            kind: MemberKind::PropertyGet,
            parameters: Vec::new(),
            returns,
        }
    }

    /// Creates a property write accessor identity accepting `value`.
    #[must_use]
    pub fn property_set(name: impl Into<String>, value: ValueKind) -> Self {
        MemberId {
            name: name.into(),
            kind: MemberKind::PropertySet,
            parameters: vec![value],
            returns: ValueKind::Unit,
        }
    }

    /// Creates an event subscription accessor identity.
    #[must_use]
    pub fn event_add(name: impl Into<String>) -> Self {
        MemberId {
            name: name.into(),
            kind: MemberKind::EventAdd,
            parameters: vec![ValueKind::Reference],
            returns: ValueKind::Unit,
        }
    }

    /// Creates an event unsubscription accessor identity.
    #[must_use]
    pub fn event_remove(name: impl Into<String>) -> Self {
        MemberId {
            name: name.into(),
            kind: MemberKind::EventRemove,
            parameters: vec![ValueKind::Reference],
            returns: ValueKind::Unit,
        }
    }

    /// Replaces the ordered parameter kinds.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = ValueKind>) -> Self {
        self.parameters = parameters.into_iter().collect();
        self
    }

    /// Replaces the return kind.
    #[must_use]
    pub fn returning(mut self, returns: ValueKind) -> Self {
        self.returns = returns;
        self
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member category.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Returns the ordered parameter kinds.
    #[must_use]
    pub fn parameters(&self) -> &[ValueKind] {
        &self.parameters
    }

    /// Returns the declared return kind.
    #[must_use]
    pub fn returns(&self) -> ValueKind {
        self.returns
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => write!(f, "{}", self.name)?,
            kind => write!(f, "{kind}:{}", self.name)?,
        }
        write!(f, "(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_proxy_ids_are_unique() {
        let ids: BTreeSet<u64> = (0..64).map(|_| ProxyId::next().value()).collect();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_proxy_id_display() {
        let id = ProxyId(7);
        assert_eq!(id.to_string(), "proxy-7");
        assert_eq!(format!("{id:?}"), "ProxyId(7)");
    }

    #[test]
    fn test_overloads_are_distinct() {
        let unary = MemberId::method("Add")
            .with_parameters([ValueKind::Int32])
            .returning(ValueKind::Int32);
        let binary = MemberId::method("Add")
            .with_parameters([ValueKind::Int32, ValueKind::Int32])
            .returning(ValueKind::Int32);

        assert_ne!(unary, binary);
        assert_eq!(unary.name(), binary.name());
    }

    #[test]
    fn test_kind_distinguishes_accessors_from_methods() {
        let getter = MemberId::property_get("Name", ValueKind::Str);
        let method = MemberId::method("Name").returning(ValueKind::Str);

        assert_ne!(getter, method);
        assert_eq!(getter.kind(), MemberKind::PropertyGet);
    }

    #[test]
    fn test_member_id_orders_totally() {
        let a = MemberId::method("A");
        let b = MemberId::method("B");
        assert!(a < b);

        let set: BTreeSet<MemberId> = [b.clone(), a.clone(), b.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_forms() {
        let method = MemberId::method("Add")
            .with_parameters([ValueKind::Int32, ValueKind::Int32])
            .returning(ValueKind::Int32);
        assert_eq!(method.to_string(), "Add(Int32, Int32) -> Int32");

        let setter = MemberId::property_set("Name", ValueKind::Str);
        assert_eq!(setter.to_string(), "PropertySet:Name(Str) -> Unit");
    }
}
