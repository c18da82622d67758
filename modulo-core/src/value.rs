//! Values returned by run-style plugins
//!
//! A plugin's generic `run` operation may hand back anything. Only numeric
//! values make it into an evaluation; the rest are reported as failures.

use std::fmt;

/// Raw return value of a plugin operation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    Null,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Integer(_) => "Integer",
            Value::Bool(_) => "Bool",
            Value::Text(_) => "Text",
            Value::Null => "Null",
        }
    }

    /// Coerce to f64. The error names the type that was found instead.
    pub fn to_f64(&self) -> Result<f64, String> {
        self.as_number()
            .ok_or_else(|| format!("expected a number, got {}", self.type_name()))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", crate::format_number(*n)),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}
