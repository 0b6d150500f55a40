use std::{fmt, sync::RwLock};

use crate::{
    invocation::{
        argument::{Argument, ArgumentDescriptor, Direction},
        identity::{MemberId, ProxyId},
        returns::ArgumentUpdate,
    },
    value::Value,
    Error, Result,
};

/// Snapshot of one intercepted call: target identity, member identity and
/// direction-tagged arguments.
///
/// The record is constructed by the stand-in before any behavior runs and is
/// immutable except for its argument value slots: behaviors may write
/// [`Direction::Out`] and [`Direction::Ref`] slots, never `In` slots, and
/// never the descriptors themselves. Slot access is internally synchronized,
/// so a record can be shared freely across the chain (and across threads, for
/// behaviors that fan work out) without exposing torn values.
///
/// Records live for one call: the stand-in builds one, hands it to the
/// pipeline, copies the final `Out`/`Ref` slot values back to its caller and
/// drops it.
///
/// # Examples
///
/// ```rust
/// use mockpipe::{Argument, MemberId, MethodInvocation, ProxyId, Value, ValueKind};
///
/// let invocation = MethodInvocation::new(
///     ProxyId::next(),
///     MemberId::method("Divide")
///         .with_parameters([ValueKind::Int32, ValueKind::Int32, ValueKind::Int32])
///         .returning(ValueKind::Bool),
///     vec![
///         Argument::input("dividend", 10i32),
///         Argument::input("divisor", 3i32),
///         Argument::output("remainder", ValueKind::Int32),
///     ],
/// );
///
/// assert_eq!(invocation.argument_value(0)?, Some(Value::Int32(10)));
/// assert_eq!(invocation.argument_value(2)?, None);
/// # Ok::<(), mockpipe::Error>(())
/// ```
pub struct MethodInvocation {
    target: ProxyId,
    member: MemberId,
    descriptors: Vec<ArgumentDescriptor>,
    slots: RwLock<Vec<Option<Value>>>,
}

impl MethodInvocation {
    /// Creates the record for one call.
    ///
    /// The argument order must match the member's declared parameter order;
    /// the stand-in constructing the record is trusted to get this right, and
    /// no validation happens beyond a debug-build count check.
    #[must_use]
    pub fn new(target: ProxyId, member: MemberId, arguments: Vec<Argument>) -> Self {
        debug_assert_eq!(
            arguments.len(),
            member.parameters().len(),
            "argument count must match the declared parameter count of {member}"
        );

        let mut descriptors = Vec::with_capacity(arguments.len());
        let mut slots = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let (descriptor, initial) = argument.into_parts();
            descriptors.push(descriptor);
            slots.push(initial);
        }

        MethodInvocation {
            target,
            member,
            descriptors,
            slots: RwLock::new(slots),
        }
    }

    /// Returns the identity of the receiving stand-in instance.
    #[must_use]
    pub fn target(&self) -> ProxyId {
        self.target
    }

    /// Returns the identity of the invoked member.
    #[must_use]
    pub fn member(&self) -> &MemberId {
        &self.member
    }

    /// Returns the fixed argument descriptors, in declared order.
    #[must_use]
    pub fn descriptors(&self) -> &[ArgumentDescriptor] {
        &self.descriptors
    }

    /// Returns the number of argument slots.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Reads the current value of the slot at `index`.
    ///
    /// `None` means the slot is unset (an `Out` slot nothing has written yet).
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentOutOfRange`] for a bad index, [`Error::LockError`] if
    /// the slot lock was poisoned.
    pub fn argument_value(&self, index: usize) -> Result<Option<Value>> {
        if index >= self.descriptors.len() {
            return Err(Error::ArgumentOutOfRange {
                member: self.member.clone(),
                index,
            });
        }
        let slots = self
            .slots
            .read()
            .map_err(|e| Error::LockError(format!("argument slot read lock: {e}")))?;
        Ok(slots[index].clone())
    }

    /// Reads all current slot values at once, in declared order.
    ///
    /// # Errors
    ///
    /// [`Error::LockError`] if the slot lock was poisoned.
    pub fn argument_values(&self) -> Result<Vec<Option<Value>>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| Error::LockError(format!("argument slot read lock: {e}")))?;
        Ok(slots.clone())
    }

    /// Writes the slot at `index`, which must be an `Out` or `Ref` slot.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentOutOfRange`] for a bad index,
    /// [`Error::ArgumentNotWritable`] for an `In` slot,
    /// [`Error::KindMismatch`] when the value does not fit the declared kind,
    /// [`Error::LockError`] if the slot lock was poisoned.
    pub fn set_argument_value(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let descriptor = self
            .descriptors
            .get(index)
            .ok_or_else(|| Error::ArgumentOutOfRange {
                member: self.member.clone(),
                index,
            })?;
        if !descriptor.is_writable() {
            return Err(Error::ArgumentNotWritable {
                member: self.member.clone(),
                index,
                direction: descriptor.direction(),
            });
        }
        if !value.fits(descriptor.kind()) {
            return Err(Error::KindMismatch {
                expected: descriptor.kind(),
                found: value.kind(),
            });
        }

        let mut slots = self
            .slots
            .write()
            .map_err(|e| Error::LockError(format!("argument slot write lock: {e}")))?;
        slots[index] = Some(value);
        Ok(())
    }

    /// Applies a return record's write-backs to this record's slots.
    ///
    /// Called by the executor after the chain completes, so the stand-in can
    /// read final `Out`/`Ref` values from the record it still holds. Each
    /// update is bounds-, direction- and kind-checked like
    /// [`set_argument_value`](Self::set_argument_value).
    ///
    /// # Errors
    ///
    /// Fails on the first invalid update; earlier updates in the list remain
    /// applied.
    pub fn apply_updates(&self, updates: &[ArgumentUpdate]) -> Result<()> {
        for update in updates {
            self.set_argument_value(update.index(), update.value().clone())?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.member.name())?;
        let slots = self.slots.read().ok();
        for (i, descriptor) in self.descriptors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slots.as_ref().and_then(|s| s[i].as_ref()) {
                Some(value) => write!(f, "{} = {value}", descriptor.name())?,
                None => write!(f, "{} = <unset>", descriptor.name())?,
            }
        }
        write!(f, ") on {}", self.target)
    }
}

impl fmt::Debug for MethodInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodInvocation({self})")
    }
}
