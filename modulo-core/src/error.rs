//! Structured calculator errors
//!
//! Errors are values. An evaluation error aborts only the current
//! `evaluate()` call; a discovery error is confined to one plugin candidate.

use crate::Arity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_NUMBER: &str = "INVALID_NUMBER";
    pub const ARITY_MISMATCH: &str = "ARITY_MISMATCH";
    pub const INVOCATION_FAILURE: &str = "INVOCATION_FAILURE";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const DUPLICATE_NAME: &str = "DUPLICATE_NAME";
    pub const EXPRESSION_TOO_LONG: &str = "EXPRESSION_TOO_LONG";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation continued, something was skipped
    Warning,
    /// Operation failed
    Error,
}

/// Error kind without payload, for callers that branch on the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidNumber,
    ArityMismatch,
    InvocationFailure,
    ConfigurationError,
    DuplicateName,
    ExpressionTooLong,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidNumber => codes::INVALID_NUMBER,
            ErrorKind::ArityMismatch => codes::ARITY_MISMATCH,
            ErrorKind::InvocationFailure => codes::INVOCATION_FAILURE,
            ErrorKind::ConfigurationError => codes::CONFIGURATION_ERROR,
            ErrorKind::DuplicateName => codes::DUPLICATE_NAME,
            ErrorKind::ExpressionTooLong => codes::EXPRESSION_TOO_LONG,
        }
    }
}

/// Error raised while discovering, registering or evaluating functions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid number: '{text}'")]
    InvalidNumber { text: String },

    #[error("{function}() expects {expected} arguments, got {got}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        got: usize,
    },

    #[error("Error running function {function}: {reason}")]
    InvocationFailure { function: String, reason: String },

    #[error("Plugin '{candidate}' is misconfigured: {reason}")]
    Configuration { candidate: String, reason: String },

    #[error("Function '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("Expression is {length} characters long, the limit is {limit}")]
    ExpressionTooLong { length: usize, limit: usize },
}

impl CalcError {
    // ========== Constructors ==========

    pub fn invalid_number(text: impl Into<String>) -> Self {
        Self::InvalidNumber { text: text.into() }
    }

    pub fn arity_mismatch(function: impl Into<String>, expected: Arity, got: usize) -> Self {
        Self::ArityMismatch {
            function: function.into(),
            expected,
            got,
        }
    }

    pub fn invocation(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvocationFailure {
            function: function.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(candidate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            candidate: candidate.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn too_long(length: usize, limit: usize) -> Self {
        Self::ExpressionTooLong { length, limit }
    }

    // ========== Classification ==========

    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            CalcError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            CalcError::InvocationFailure { .. } => ErrorKind::InvocationFailure,
            CalcError::Configuration { .. } => ErrorKind::ConfigurationError,
            CalcError::DuplicateName { .. } => ErrorKind::DuplicateName,
            CalcError::ExpressionTooLong { .. } => ErrorKind::ExpressionTooLong,
        }
    }

    /// Machine-readable code, e.g. `INVALID_NUMBER`
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn severity(&self) -> Severity {
        match self {
            CalcError::DuplicateName { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// True when the failing text looks like an expression still being typed
    /// (empty operand, dangling operator or comma, unclosed paren, a numeric
    /// literal waiting for its exponent).
    pub fn is_incomplete(&self) -> bool {
        let CalcError::InvalidNumber { text } = self else {
            return false;
        };
        if text.is_empty() {
            return true;
        }
        if text.ends_with(['(', ',', '+', '-', '*', '/', '.']) {
            return true;
        }
        // `1e` is half a literal, `pie` is an unknown name
        let literal = text
            .trim_start_matches(['+', '-'])
            .starts_with(|c: char| c.is_ascii_digit() || c == '.');
        if literal && text.ends_with(['e', 'E']) {
            return true;
        }
        let opens = text.chars().filter(|&c| c == '(').count();
        let closes = text.chars().filter(|&c| c == ')').count();
        opens > closes
    }
}
