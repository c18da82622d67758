//! Core math functions

use modulo_plugin::prelude::*;

pub struct Sqrt;
pub struct Log;
pub struct Ln;
pub struct Cube;
pub struct Abs;
pub struct Pow;

impl CalcFunction for Sqrt {
    fn name(&self) -> &str {
        "sqrt"
    }

    fn description(&self) -> &str {
        "Square root (NaN for negative input)"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].sqrt())
    }
}

impl CalcFunction for Log {
    fn name(&self) -> &str {
        "log"
    }

    fn description(&self) -> &str {
        "Base-10 logarithm"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].log10())
    }
}

impl CalcFunction for Ln {
    fn name(&self) -> &str {
        "ln"
    }

    fn description(&self) -> &str {
        "Natural logarithm"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].ln())
    }
}

impl CalcFunction for Cube {
    fn name(&self) -> &str {
        "cube"
    }

    fn description(&self) -> &str {
        "Third power"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].powi(3))
    }
}

impl CalcFunction for Abs {
    fn name(&self) -> &str {
        "abs"
    }

    fn description(&self) -> &str {
        "Absolute value"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args[0].abs())
    }
}

static POW_PARAMS: [&str; 2] = ["base", "exponent"];

impl RunPlugin for Pow {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta::new("pow", "pow(").with_description("Raise base to a real exponent")
    }

    fn operations(&self) -> Vec<Operation> {
        vec![Operation::new(RUN, &POW_PARAMS, |args| Ok(Value::from(args[0].powf(args[1]))))]
    }
}
