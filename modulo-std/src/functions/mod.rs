//! Standard functions

mod aggregate;
mod math;
mod primes;
mod trig;

pub use aggregate::{Avg, Max, Min, Sum};
pub use math::{Abs, Cube, Ln, Log, Pow, Sqrt};
pub use primes::{NPrime, NthPrime};
pub use trig::{Cos, Sin, Tan};
