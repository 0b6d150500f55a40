//! Integration tests for chain execution semantics.
//!
//! These tests drive the executor through a hand-written stand-in the way
//! generated code would: registration order, short-circuiting, snapshot
//! isolation under concurrent reconfiguration, exception re-raising,
//! out-parameter write-back and association identity.

mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Barrier, Mutex,
};

use mockpipe::{
    behaviors::{DefaultValueBehavior, RecordingBehavior, Stub, StubBehavior},
    Argument, ArgumentUpdate, BehaviorPipeline, Error, Exception, MemberId, MethodInvocation,
    MethodReturn, Mocked, NextHandler, Proxy, ProxyId, Result, Value, ValueKind,
};
use rayon::prelude::*;

use common::{Calculator, CalculatorDouble};

fn pass_through_tagging(order: Arc<Mutex<Vec<usize>>>, tag: usize) -> mockpipe::BehaviorRc {
    Arc::new(move |invocation: &MethodInvocation, next: NextHandler| {
        order.lock().unwrap().push(tag);
        next.invoke(invocation)
    })
}

#[test]
fn execution_order_equals_registration_order() -> Result<()> {
    let double = CalculatorDouble::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for tag in 0..5 {
        double
            .behaviors()
            .add(pass_through_tagging(order.clone(), tag))?;
    }
    double.behaviors().add(Arc::new(DefaultValueBehavior))?;

    double.add(1, 2)?;
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn short_circuit_stops_later_behaviors() -> Result<()> {
    let double = CalculatorDouble::new();
    let ran_after = Arc::new(AtomicUsize::new(0));

    let stubs = Arc::new(StubBehavior::new());
    stubs.add(Stub::on(CalculatorDouble::add_member()).returns(7i32));
    double.behaviors().add(stubs)?;

    let observed = ran_after.clone();
    double.behaviors().add(Arc::new(
        move |invocation: &MethodInvocation, next: NextHandler| {
            observed.fetch_add(1, Ordering::SeqCst);
            next.invoke(invocation)
        },
    ))?;
    double.behaviors().add(Arc::new(DefaultValueBehavior))?;

    assert_eq!(double.add(1, 2)?, 7);
    assert_eq!(ran_after.load(Ordering::SeqCst), 0);

    // A member without a stub flows past the stub table and through the rest.
    assert_eq!(double.name()?, "");
    assert_eq!(ran_after.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn empty_pipeline_fails_with_unhandled_invocation() {
    let double = CalculatorDouble::new();
    match double.add(1, 2) {
        Err(Error::UnhandledInvocation { target, member }) => {
            assert_eq!(target, double.id());
            assert_eq!(member, CalculatorDouble::add_member());
        }
        other => panic!("expected UnhandledInvocation, got {other:?}"),
    }
}

#[test]
fn pass_through_only_pipeline_is_still_unhandled() -> Result<()> {
    let double = CalculatorDouble::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    double
        .behaviors()
        .add(pass_through_tagging(order.clone(), 0))?;

    assert!(matches!(
        double.reset(),
        Err(Error::UnhandledInvocation { .. })
    ));
    assert_eq!(*order.lock().unwrap(), vec![0]);
    Ok(())
}

#[test]
fn configured_exception_reraises_exactly() -> Result<()> {
    let double = CalculatorDouble::new();
    let exception = Exception::argument("divisor must be non-zero");

    let stubs = Arc::new(StubBehavior::new());
    stubs.add(Stub::on(CalculatorDouble::add_member()).raises(exception.clone()));
    double.behaviors().add(stubs)?;
    double.behaviors().add(Arc::new(DefaultValueBehavior))?;

    match double.add(1, 0) {
        Err(Error::Raised(raised)) => {
            assert_eq!(raised, exception);
            assert_eq!(raised.message(), "divisor must be non-zero");
        }
        other => panic!("expected Raised, got {other:?}"),
    }
    Ok(())
}

#[test]
fn raising_behavior_hides_call_from_later_behaviors() -> Result<()> {
    let double = CalculatorDouble::new();
    let later = Arc::new(AtomicUsize::new(0));

    let stubs = Arc::new(StubBehavior::new());
    stubs.add(
        Stub::on(CalculatorDouble::reset_member())
            .raises(Exception::invalid_operation("already closed")),
    );
    double.behaviors().add(stubs)?;

    let observed = later.clone();
    double.behaviors().add(Arc::new(
        move |invocation: &MethodInvocation, next: NextHandler| {
            observed.fetch_add(1, Ordering::SeqCst);
            next.invoke(invocation)
        },
    ))?;

    assert!(matches!(double.reset(), Err(Error::Raised(_))));
    assert_eq!(later.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn out_parameter_reaches_the_caller() -> Result<()> {
    let double = CalculatorDouble::new();

    let stubs = Arc::new(StubBehavior::new());
    stubs.add(Stub::on(CalculatorDouble::try_divide_member()).computes(|invocation| {
        let dividend = match invocation.argument_value(0)? {
            Some(Value::Int32(v)) => v,
            _ => 0,
        };
        let divisor = match invocation.argument_value(1)? {
            Some(Value::Int32(v)) => v,
            _ => 0,
        };
        if divisor == 0 {
            return Ok(MethodReturn::raise(Exception::argument("divide by zero")));
        }
        Ok(MethodReturn::value_with_updates(
            true,
            [mockpipe::ArgumentUpdate::new(2, dividend % divisor)],
        ))
    }));
    double.behaviors().add(stubs)?;

    let mut remainder = -1;
    assert!(double.try_divide(10, 3, &mut remainder)?);
    assert_eq!(remainder, 1);

    let mut untouched = -1;
    assert!(matches!(
        double.try_divide(10, 0, &mut untouched),
        Err(Error::Raised(_))
    ));
    assert_eq!(untouched, -1);
    Ok(())
}

#[test]
fn ref_parameter_updates_are_observed() -> Result<()> {
    let pipeline = BehaviorPipeline::new();
    pipeline.add(Arc::new(
        |invocation: &MethodInvocation, _next: NextHandler| -> Result<MethodReturn> {
            let current = match invocation.argument_value(0)? {
                Some(Value::Int64(v)) => v,
                _ => 0,
            };
            Ok(MethodReturn::void_with_updates([ArgumentUpdate::new(
                0,
                current + 5,
            )]))
        },
    ))?;

    let invocation = MethodInvocation::new(
        ProxyId::next(),
        MemberId::method("Accumulate").with_parameters([ValueKind::Int64]),
        vec![Argument::by_ref("total", 10i64)],
    );
    pipeline.execute(&invocation)?;

    // The caller reads the final value out of the slot it supplied.
    assert_eq!(invocation.argument_value(0)?, Some(Value::Int64(15)));
    Ok(())
}

#[test]
fn default_value_behavior_zero_fills_out_parameters() -> Result<()> {
    let double = CalculatorDouble::new();
    double.behaviors().add(Arc::new(DefaultValueBehavior))?;

    let mut remainder = -1;
    assert!(!double.try_divide(10, 3, &mut remainder)?);
    assert_eq!(remainder, 0);
    Ok(())
}

#[test]
fn in_flight_call_keeps_its_snapshot_under_concurrent_mutation() -> Result<()> {
    let double = Arc::new(CalculatorDouble::new());
    let barrier = Arc::new(Barrier::new(2));

    // First behavior parks until the main thread has mutated the pipeline.
    let gate = barrier.clone();
    double.behaviors().add(Arc::new(
        move |invocation: &MethodInvocation, next: NextHandler| {
            gate.wait();
            gate.wait();
            next.invoke(invocation)
        },
    ))?;
    let stubs = Arc::new(StubBehavior::new());
    stubs.add(Stub::on(CalculatorDouble::name_member()).returns("before"));
    double.behaviors().add(stubs)?;

    let worker = {
        let double = double.clone();
        std::thread::spawn(move || double.name())
    };

    // The call is now in flight; prepend a stub that would win for new calls.
    barrier.wait();
    let override_stubs = Arc::new(StubBehavior::new());
    override_stubs.add(Stub::on(CalculatorDouble::name_member()).returns("after"));
    double.behaviors().insert(0, override_stubs)?;
    barrier.wait();

    // The in-flight call saw the sequence as of its start.
    assert_eq!(worker.join().unwrap()?, "before");

    // Calls started after the mutation see the new sequence.
    assert_eq!(double.name()?, "after");
    Ok(())
}

#[test]
fn association_is_created_once_and_shared() {
    let double = CalculatorDouble::new();
    let first = Arc::clone(double.mock());
    let second = Arc::clone(double.mock());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.target(), double.id());
}

#[test]
fn association_race_yields_one_instance() {
    let double = Arc::new(CalculatorDouble::new());

    let mocks: Vec<_> = (0..16)
        .into_par_iter()
        .map(|_| Arc::clone(double.mock()))
        .collect();

    for mock in &mocks[1..] {
        assert!(Arc::ptr_eq(&mocks[0], mock));
    }
}

#[test]
fn concurrent_calls_are_all_observed() -> Result<()> {
    let double = Arc::new(CalculatorDouble::new());
    double
        .behaviors()
        .add(Arc::new(RecordingBehavior::for_instance(double.as_ref())))?;
    let stubs = Arc::new(StubBehavior::new());
    stubs.add(Stub::on(CalculatorDouble::add_member()).computes(|invocation| {
        let lhs = match invocation.argument_value(0)? {
            Some(Value::Int32(v)) => v,
            _ => 0,
        };
        Ok(MethodReturn::value(lhs * 2))
    }));
    double.behaviors().add(stubs)?;
    double.behaviors().add(Arc::new(DefaultValueBehavior))?;

    let results: Vec<i32> = (0..200)
        .into_par_iter()
        .map(|i| double.add(i, 0).unwrap())
        .collect();

    for (i, result) in results.iter().enumerate() {
        assert_eq!(*result, i as i32 * 2);
    }
    let mock = double.mock();
    assert_eq!(mock.call_count(), 200);
    assert_eq!(mock.count_of(&CalculatorDouble::add_member()), 200);
    Ok(())
}

#[test]
fn canonical_arrangement_scenario() -> Result<()> {
    // Pipeline = [recording, stub returns "X" for Name, default-value].
    let double = CalculatorDouble::new();
    double
        .behaviors()
        .add(Arc::new(RecordingBehavior::for_instance(&double)))?;
    let stubs = Arc::new(StubBehavior::new());
    stubs.add(Stub::on(CalculatorDouble::name_member()).returns("X"));
    double.behaviors().add(stubs)?;
    double.behaviors().add(Arc::new(DefaultValueBehavior))?;

    // The stubbed member returns the configured value...
    assert_eq!(double.name()?, "X");
    // ...and the log holds exactly one zero-argument entry for it.
    let mock = double.mock();
    let calls = mock.calls_of(&CalculatorDouble::name_member());
    assert_eq!(calls.len(), 1);
    assert!(calls[0].arguments().is_empty());

    // An unstubbed member falls through to the default with no error.
    assert_eq!(double.add(3, 4)?, 0);
    assert_eq!(mock.call_count(), 2);
    Ok(())
}
