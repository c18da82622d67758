//! Bridges run-style plugins to the `CalcFunction` contract

use crate::{CalcFunction, FunctionMeta, Operation, RunPlugin};
use modulo_core::{Arity, CalcError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Name of the operation every run-style plugin must expose
pub const RUN: &str = "run";

/// Wraps a [`RunPlugin`], exposing its `run` operation as a [`CalcFunction`].
///
/// The advertised arity is the number of parameters `run` declares, and
/// `invoke` refuses any other argument count.
#[derive(Debug)]
pub struct FunctionAdapter {
    meta: FunctionMeta,
    run: Operation,
}

impl FunctionAdapter {
    pub fn new(plugin: &dyn RunPlugin) -> Result<Self, CalcError> {
        let meta = plugin.meta();
        let run = plugin
            .operations()
            .into_iter()
            .find(|op| op.name == RUN)
            .ok_or_else(|| {
                CalcError::configuration(
                    meta.name,
                    "plugins carrying function metadata must define a run(...) operation",
                )
            })?;
        Ok(Self { meta, run })
    }

    pub fn meta(&self) -> &FunctionMeta {
        &self.meta
    }
}

impl CalcFunction for FunctionAdapter {
    fn name(&self) -> &str {
        self.meta.name
    }

    fn insert_text(&self) -> String {
        self.meta.insert.to_string()
    }

    fn description(&self) -> &str {
        self.meta.description
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(self.run.params.len())
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(CalcError::arity_mismatch(self.meta.name, arity, args.len()));
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run.call(args)))
            .map_err(|payload| {
                CalcError::invocation(self.meta.name, format!("panicked: {}", panic_message(&*payload)))
            })?;

        outcome
            .and_then(|value| value.to_f64())
            .map_err(|reason| CalcError::invocation(self.meta.name, reason))
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
