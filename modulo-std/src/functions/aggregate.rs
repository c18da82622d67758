//! Multi-argument functions

use modulo_plugin::prelude::*;

pub struct Max;
pub struct Min;
pub struct Avg;
pub struct Sum;

static PAIR_PARAMS: [&str; 2] = ["a", "b"];

impl RunPlugin for Max {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta::new("max", "max(").with_description("Larger of two values")
    }

    fn operations(&self) -> Vec<Operation> {
        vec![Operation::new(RUN, &PAIR_PARAMS, |args| Ok(Value::from(args[0].max(args[1]))))]
    }
}

impl RunPlugin for Min {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta::new("min", "min(").with_description("Smaller of two values")
    }

    fn operations(&self) -> Vec<Operation> {
        vec![Operation::new(RUN, &PAIR_PARAMS, |args| Ok(Value::from(args[0].min(args[1]))))]
    }
}

impl RunPlugin for Avg {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta::new("avg", "avg(").with_description("Arithmetic mean of two values")
    }

    fn operations(&self) -> Vec<Operation> {
        vec![Operation::new(RUN, &PAIR_PARAMS, |args| Ok(Value::from((args[0] + args[1]) / 2.0)))]
    }
}

impl CalcFunction for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn description(&self) -> &str {
        "Sum of one or more values"
    }

    fn arity(&self) -> Arity {
        Arity::Variadic { min: 1 }
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        Ok(args.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_min() {
        let max = FunctionAdapter::new(&Max).unwrap();
        let min = FunctionAdapter::new(&Min).unwrap();
        assert_eq!(max.invoke(&[3.0, 7.0]).unwrap(), 7.0);
        assert_eq!(min.invoke(&[3.0, 7.0]).unwrap(), 3.0);
        assert_eq!(max.insert_text(), "max(");
    }

    #[test]
    fn test_max_rejects_three_arguments() {
        let max = FunctionAdapter::new(&Max).unwrap();
        let err = max.invoke(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_avg() {
        let avg = FunctionAdapter::new(&Avg).unwrap();
        assert_eq!(avg.invoke(&[2.0, 5.0]).unwrap(), 3.5);
    }

    #[test]
    fn test_sum_is_variadic() {
        assert_eq!(Sum.arity(), Arity::Variadic { min: 1 });
        assert_eq!(Sum.invoke(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 10.0);
        assert_eq!(Sum.invoke(&[5.0]).unwrap(), 5.0);
    }
}
