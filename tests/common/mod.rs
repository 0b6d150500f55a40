//! A hand-written stand-in fixture.
//!
//! `CalculatorDouble` is shaped exactly like the output of a stand-in code
//! generator: a pipeline field, a lazy association slot, the two contract
//! traits, and one intercepted method per member that builds an invocation
//! record, runs the typed executor and writes `Out` slots back to the
//! caller. The tests use it to exercise the core the way generated code
//! does.

use std::sync::Arc;

use mockpipe::{
    Argument, BehaviorPipeline, MemberId, MethodInvocation, Mock, MockCell, Mocked, Proxy,
    ProxyId, Result, Value, ValueKind,
};

/// The interface the stand-in doubles.
pub trait Calculator {
    /// Adds two numbers.
    fn add(&self, lhs: i32, rhs: i32) -> Result<i32>;
    /// Divides, reporting the remainder through an out parameter.
    fn try_divide(&self, dividend: i32, divisor: i32, remainder: &mut i32) -> Result<bool>;
    /// The display name property.
    fn name(&self) -> Result<String>;
    /// Clears accumulated state; void.
    fn reset(&self) -> Result<()>;
}

pub struct CalculatorDouble {
    id: ProxyId,
    pipeline: BehaviorPipeline,
    mock: MockCell,
}

impl CalculatorDouble {
    pub fn new() -> Self {
        CalculatorDouble {
            id: ProxyId::next(),
            pipeline: BehaviorPipeline::new(),
            mock: MockCell::new(),
        }
    }

    pub fn id(&self) -> ProxyId {
        self.id
    }

    pub fn add_member() -> MemberId {
        MemberId::method("Add")
            .with_parameters([ValueKind::Int32, ValueKind::Int32])
            .returning(ValueKind::Int32)
    }

    pub fn try_divide_member() -> MemberId {
        MemberId::method("TryDivide")
            .with_parameters([ValueKind::Int32, ValueKind::Int32, ValueKind::Int32])
            .returning(ValueKind::Bool)
    }

    pub fn name_member() -> MemberId {
        MemberId::property_get("Name", ValueKind::Str)
    }

    pub fn reset_member() -> MemberId {
        MemberId::method("Reset")
    }
}

impl Default for CalculatorDouble {
    fn default() -> Self {
        CalculatorDouble::new()
    }
}

impl Proxy for CalculatorDouble {
    fn behaviors(&self) -> &BehaviorPipeline {
        &self.pipeline
    }
}

impl Mocked for CalculatorDouble {
    fn mock(&self) -> &Arc<Mock> {
        self.mock.get_or_create(self.id)
    }
}

impl Calculator for CalculatorDouble {
    fn add(&self, lhs: i32, rhs: i32) -> Result<i32> {
        let invocation = MethodInvocation::new(
            self.id,
            Self::add_member(),
            vec![Argument::input("lhs", lhs), Argument::input("rhs", rhs)],
        );
        self.pipeline.execute_typed(&invocation)
    }

    fn try_divide(&self, dividend: i32, divisor: i32, remainder: &mut i32) -> Result<bool> {
        let invocation = MethodInvocation::new(
            self.id,
            Self::try_divide_member(),
            vec![
                Argument::input("dividend", dividend),
                Argument::input("divisor", divisor),
                Argument::output("remainder", ValueKind::Int32),
            ],
        );
        let ok: bool = self.pipeline.execute_typed(&invocation)?;
        if let Some(Value::Int32(value)) = invocation.argument_value(2)? {
            *remainder = value;
        }
        Ok(ok)
    }

    fn name(&self) -> Result<String> {
        let invocation = MethodInvocation::new(self.id, Self::name_member(), Vec::new());
        self.pipeline.execute_typed(&invocation)
    }

    fn reset(&self) -> Result<()> {
        let invocation = MethodInvocation::new(self.id, Self::reset_member(), Vec::new());
        self.pipeline.execute_typed(&invocation)
    }
}
