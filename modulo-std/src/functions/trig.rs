//! Trigonometric functions (arguments in degrees)

use modulo_plugin::prelude::*;

pub struct Sin;
pub struct Cos;
pub struct Tan;

impl CalcFunction for Sin {
    fn name(&self) -> &str {
        "sin"
    }

    fn description(&self) -> &str {
        "Sine of an angle in degrees"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].to_radians().sin())
    }
}

impl CalcFunction for Cos {
    fn name(&self) -> &str {
        "cos"
    }

    fn description(&self) -> &str {
        "Cosine of an angle in degrees"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].to_radians().cos())
    }
}

impl CalcFunction for Tan {
    fn name(&self) -> &str {
        "tan"
    }

    fn description(&self) -> &str {
        "Tangent of an angle in degrees"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].to_radians().tan())
    }
}
