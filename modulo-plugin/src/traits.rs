//! Plugin traits

use modulo_core::{Arity, CalcError, Value};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A numeric function callable as `name(arg[,arg...])`
pub trait CalcFunction: Send + Sync {
    /// Call token and button label. Matched exactly against `name(`.
    fn name(&self) -> &str;

    /// Text a caller splices into an expression to start a call
    fn insert_text(&self) -> String {
        format!("{}(", self.name())
    }

    fn description(&self) -> &str {
        ""
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(1)
    }

    /// Must be pure: no state observable across calls.
    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError>;
}

/// Shared handle to a registered function
pub type FunctionDescriptor = Arc<dyn CalcFunction>;

/// Declarative metadata carried by a run-style plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub insert: &'static str,
    pub description: &'static str,
}

impl FunctionMeta {
    pub const fn new(name: &'static str, insert: &'static str) -> Self {
        Self { name, insert, description: "" }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

type OperationBody = Box<dyn Fn(&[f64]) -> Result<Value, String> + Send + Sync>;

/// A named operation exposed by a run-style plugin, with its declared parameters
pub struct Operation {
    pub name: &'static str,
    pub params: &'static [&'static str],
    body: OperationBody,
}

impl Operation {
    pub fn new<F>(name: &'static str, params: &'static [&'static str], body: F) -> Self
    where
        F: Fn(&[f64]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self { name, params, body: Box::new(body) }
    }

    pub fn call(&self, args: &[f64]) -> Result<Value, String> {
        (self.body)(args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Plugin that does not implement [`CalcFunction`] itself: metadata plus an
/// operation table whose `run` entry holds the numeric logic.
/// Bridged through [`crate::FunctionAdapter`].
pub trait RunPlugin: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn operations(&self) -> Vec<Operation>;
}
