//! Modulo - calculator engine
//!
//! Evaluates free-form arithmetic with `+ - * /`, parentheses, scientific
//! literals and calls to registered functions. The function set comes from a
//! [`FunctionRegistry`] that can be reloaded while the process runs.

mod eval;
mod render;

pub use eval::{Evaluator, MAX_EXPRESSION_LEN};
pub use render::{Mode, Readout, EMPTY_READOUT, ERROR_READOUT, PENDING_READOUT};

pub use modulo_core::{format_number, parse_number, Arity, CalcError, ErrorKind};
pub use modulo_plugin::{
    CalcFunction, DiscoveryReport, FunctionDescriptor, FunctionRegistry, RegistryConfig,
};

use std::sync::Arc;

/// Main calculator engine
pub struct Calculator {
    registry: Arc<FunctionRegistry>,
    evaluator: Evaluator,
}

impl Calculator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            evaluator: Evaluator::new(),
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(Arc::new(modulo_std::standard_registry()))
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::new(Arc::new(modulo_std::standard_registry_with(config)))
    }

    /// Evaluate against the function set published when the call starts.
    /// A concurrent reload does not affect a call already in flight.
    pub fn evaluate(&self, text: &str) -> Result<f64, CalcError> {
        let functions = self.registry.snapshot();
        self.evaluator.evaluate(&functions, text)
    }

    pub fn format(&self, value: f64) -> String {
        format_number(value)
    }

    /// Evaluate and build what a front end shows for `mode`
    pub fn readout(&self, text: &str, mode: Mode) -> Readout {
        if text.trim().is_empty() {
            return Readout::empty();
        }
        Readout::from_result(self.evaluate(text), mode)
    }

    /// Registered functions, in registration order. Fetch again after `reload`.
    pub fn functions(&self) -> Vec<FunctionDescriptor> {
        self.registry.list()
    }

    pub fn reload(&self) -> DiscoveryReport {
        self.registry.reload()
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::with_standard_library()
    }
}
