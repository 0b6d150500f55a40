use crate::{
    invocation::{ArgumentUpdate, Direction, MethodInvocation, MethodReturn},
    pipeline::{Behavior, NextHandler},
    value::Value,
    Result,
};

/// Terminal behavior supplying type-appropriate defaults for calls nothing
/// earlier handled.
///
/// Returns [`Value::default_of`] the member's declared return kind and
/// zero-fills any `Out` slot that is still unset (a value an earlier
/// pass-through behavior already wrote is left alone). It never invokes the
/// continuation, so placing it last turns "chain exhausted" into "quiet
/// defaults": with it, calls on unconfigured members succeed with defaults;
/// without it, they fail with
/// [`UnhandledInvocation`](crate::Error::UnhandledInvocation).
pub struct DefaultValueBehavior;

impl Behavior for DefaultValueBehavior {
    fn name(&self) -> &'static str {
        "default-value"
    }

    fn invoke(&self, invocation: &MethodInvocation, _next: NextHandler) -> Result<MethodReturn> {
        let values = invocation.argument_values()?;
        let updates: Vec<ArgumentUpdate> = invocation
            .descriptors()
            .iter()
            .enumerate()
            .filter(|(i, descriptor)| {
                descriptor.direction() == Direction::Out && values[*i].is_none()
            })
            .map(|(i, descriptor)| ArgumentUpdate::new(i, Value::default_of(descriptor.kind())))
            .collect();

        Ok(MethodReturn::value_with_updates(
            Value::default_of(invocation.member().returns()),
            updates,
        ))
    }
}
