//! Call guard for registered functions
//!
//! Every function that enters a [`FunctionSet`](crate::FunctionSet) is wrapped
//! here, so `invoke` on anything handed out by the registry checks the
//! argument count and turns a panicking body into `InvocationFailure`.

use crate::adapter::panic_message;
use crate::{CalcFunction, FunctionDescriptor};
use modulo_core::{Arity, CalcError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub(crate) struct CheckedFunction {
    inner: FunctionDescriptor,
}

impl CheckedFunction {
    pub(crate) fn wrap(inner: FunctionDescriptor) -> FunctionDescriptor {
        Arc::new(Self { inner })
    }
}

impl CalcFunction for CheckedFunction {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn insert_text(&self) -> String {
        self.inner.insert_text()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn arity(&self) -> Arity {
        self.inner.arity()
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        let arity = self.inner.arity();
        if !arity.accepts(args.len()) {
            return Err(CalcError::arity_mismatch(self.name(), arity, args.len()));
        }

        panic::catch_unwind(AssertUnwindSafe(|| self.inner.invoke(args))).unwrap_or_else(|payload| {
            tracing::warn!(function = self.name(), "function panicked");
            Err(CalcError::invocation(
                self.name(),
                format!("panicked: {}", panic_message(&*payload)),
            ))
        })
    }
}
