//! Expression evaluator
//!
//! Recursive descent over the raw text, lowest precedence first:
//!
//! 1. add/sub: rightmost top-level `+`/`-`, left side recursing here, right side into mul/div
//! 2. mul/div: rightmost top-level `*`/`/`, left side recursing here, right side into unary
//! 3. unary: leading `+`/`-`
//! 4. function call: `name(arg, ...)` for the first registered name whose prefix matches
//! 5. primary: `( ... )` or a float literal
//!
//! Each stage works on a strictly shorter slice, so evaluation always terminates.
//! Recursion depth grows with the input, so input longer than
//! [`MAX_EXPRESSION_LEN`] is rejected up front.
//! Operators are ASCII, so byte offsets found by the scans are char boundaries.

use modulo_core::{parse_number, CalcError};
use modulo_plugin::{CalcFunction, FunctionSet};

/// Longest accepted expression, in characters, after whitespace is removed
pub const MAX_EXPRESSION_LEN: usize = 1024;

/// Stateless evaluator; the function set is passed per call
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `text` against `functions`. Whitespace anywhere is ignored.
    pub fn evaluate(&self, functions: &FunctionSet, text: &str) -> Result<f64, CalcError> {
        let expr: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let length = expr.chars().count();
        if length > MAX_EXPRESSION_LEN {
            tracing::debug!(length, limit = MAX_EXPRESSION_LEN, "expression rejected");
            return Err(CalcError::too_long(length, MAX_EXPRESSION_LEN));
        }
        let result = self.add_sub(functions, &expr);
        tracing::trace!(expression = %expr, ?result, "evaluated");
        result
    }

    fn add_sub(&self, functions: &FunctionSet, expr: &str) -> Result<f64, CalcError> {
        let bytes = expr.as_bytes();
        let mut depth = 0i32;

        for i in (0..bytes.len()).rev() {
            match bytes[i] {
                b')' => depth += 1,
                b'(' => depth -= 1,
                b'+' | b'-' if depth == 0 && i > 0 => {
                    // exponent sign of a literal like 1.2E-3
                    if matches!(bytes[i - 1], b'e' | b'E') {
                        continue;
                    }
                    let left = self.add_sub(functions, &expr[..i])?;
                    let right = self.mul_div(functions, &expr[i + 1..])?;
                    return Ok(if bytes[i] == b'+' { left + right } else { left - right });
                }
                _ => {}
            }
        }

        self.mul_div(functions, expr)
    }

    fn mul_div(&self, functions: &FunctionSet, expr: &str) -> Result<f64, CalcError> {
        let bytes = expr.as_bytes();
        let mut depth = 0i32;

        for i in (0..bytes.len()).rev() {
            match bytes[i] {
                b')' => depth += 1,
                b'(' => depth -= 1,
                b'*' | b'/' if depth == 0 && i > 0 => {
                    let left = self.mul_div(functions, &expr[..i])?;
                    let right = self.unary(functions, &expr[i + 1..])?;
                    // division by zero yields IEEE infinity/NaN, not an error
                    return Ok(if bytes[i] == b'*' { left * right } else { left / right });
                }
                _ => {}
            }
        }

        self.unary(functions, expr)
    }

    fn unary(&self, functions: &FunctionSet, expr: &str) -> Result<f64, CalcError> {
        if let Some(rest) = expr.strip_prefix('+') {
            return self.unary(functions, rest);
        }
        if let Some(rest) = expr.strip_prefix('-') {
            return Ok(-self.unary(functions, rest)?);
        }
        self.call(functions, expr)
    }

    fn call(&self, functions: &FunctionSet, expr: &str) -> Result<f64, CalcError> {
        if !expr.ends_with(')') {
            return self.primary(functions, expr);
        }

        for function in functions.iter() {
            let name = function.name();
            let Some(rest) = expr.strip_prefix(name).and_then(|r| r.strip_prefix('(')) else {
                continue;
            };
            let inner = &rest[..rest.len() - 1];

            let args = split_args(inner)
                .into_iter()
                .map(|arg| self.add_sub(functions, arg))
                .collect::<Result<Vec<f64>, CalcError>>()?;

            let arity = function.arity();
            if !arity.accepts(args.len()) {
                return Err(CalcError::arity_mismatch(name, arity, args.len()));
            }
            return function.invoke(&args);
        }

        self.primary(functions, expr)
    }

    fn primary(&self, functions: &FunctionSet, expr: &str) -> Result<f64, CalcError> {
        if expr.len() >= 2 && expr.starts_with('(') && expr.ends_with(')') {
            return self.add_sub(functions, &expr[1..expr.len() - 1]);
        }
        parse_number(expr)
    }
}

/// Split a call's inner text on commas at paren depth 0.
/// An empty inner text means no arguments.
fn split_args(inner: &str) -> Vec<&str> {
    if inner.is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, b) in inner.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                args.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&inner[start..]);
    args
}
