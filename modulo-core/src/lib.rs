//! Modulo Core - Fundamental types
//!
//! This crate provides the core types used throughout Modulo:
//! - `CalcError`: structured errors for discovery and evaluation
//! - `Arity`: how many arguments a function accepts
//! - `Value`: raw results of run-style plugins
//! - `parse_number` / `format_number`: the float literal and display rules

mod arity;
mod error;
mod number;
mod value;

pub use arity::Arity;
pub use error::{codes, CalcError, ErrorKind, Severity};
pub use number::{format_number, parse_number};
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{format_number, parse_number, Arity, CalcError, ErrorKind, Severity, Value};
}
