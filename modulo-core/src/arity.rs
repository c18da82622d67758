//! Argument counts accepted by a function

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many arguments a function takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    /// Exactly `n` arguments
    Fixed(usize),
    /// `min` or more arguments
    Variadic { min: usize },
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Fixed(n) => count == n,
            Arity::Variadic { min } => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variadic { min } => write!(f, "at least {}", min),
        }
    }
}
