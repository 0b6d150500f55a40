//! Shared functionality which is used in unit-tests.

pub mod factories {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        invocation::{Argument, MemberId, MethodInvocation, MethodReturn, ProxyId},
        pipeline::{BehaviorRc, NextHandler},
        value::{Value, ValueKind},
        Result,
    };

    /// A void `Ping()` call with no arguments.
    pub fn ping_invocation() -> MethodInvocation {
        MethodInvocation::new(ProxyId::next(), MemberId::method("Ping"), Vec::new())
    }

    /// A `Count() -> Int32` call with no arguments.
    pub fn count_invocation() -> MethodInvocation {
        MethodInvocation::new(
            ProxyId::next(),
            MemberId::method("Count").returning(ValueKind::Int32),
            Vec::new(),
        )
    }

    /// A `Get()` call returning the given kind.
    pub fn invocation_returning(kind: ValueKind) -> MethodInvocation {
        MethodInvocation::new(
            ProxyId::next(),
            MemberId::method("Get").returning(kind),
            Vec::new(),
        )
    }

    /// `Divide(dividend, divisor, out remainder) -> Bool` with two inputs and
    /// one unset `Int32` output slot.
    pub fn divide_invocation(dividend: i32, divisor: i32) -> MethodInvocation {
        MethodInvocation::new(
            ProxyId::next(),
            MemberId::method("Divide")
                .with_parameters([ValueKind::Int32, ValueKind::Int32, ValueKind::Int32])
                .returning(ValueKind::Bool),
            vec![
                Argument::input("dividend", dividend),
                Argument::input("divisor", divisor),
                Argument::output("remainder", ValueKind::Int32),
            ],
        )
    }

    /// A behavior that short-circuits with the given value.
    pub fn returning(value: Value) -> BehaviorRc {
        Arc::new(
            move |_invocation: &MethodInvocation, _next: NextHandler| -> Result<MethodReturn> {
                Ok(MethodReturn::value(value.clone()))
            },
        )
    }

    /// A behavior that short-circuits with the given value and counts how
    /// often it ran.
    pub fn counting(value: Value) -> (BehaviorRc, Arc<AtomicUsize>) {
        let counter = Arc::new(AtomicUsize::new(0));
        let observed = counter.clone();
        let behavior: BehaviorRc = Arc::new(
            move |_invocation: &MethodInvocation, _next: NextHandler| -> Result<MethodReturn> {
                observed.fetch_add(1, Ordering::SeqCst);
                Ok(MethodReturn::value(value.clone()))
            },
        );
        (behavior, counter)
    }
}
