//! Prime number functions

use modulo_plugin::prelude::*;

/// Largest input `NPrime` accepts
const NEXT_PRIME_LIMIT: f64 = i32::MAX as f64;

/// Largest index `nthprime` accepts
const NTH_PRIME_LIMIT: u64 = 100_000;

/// Smallest prime strictly greater than `floor(x)`
pub struct NPrime;

/// The n-th prime, `2` for `n <= 0`
pub struct NthPrime;

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

impl CalcFunction for NPrime {
    fn name(&self) -> &str {
        "NPrime"
    }

    fn description(&self) -> &str {
        "Next prime after the integer part of x"
    }

    fn invoke(&self, args: &[f64]) -> Result<f64, CalcError> {
        let x = args[0];
        if x.is_nan() || x >= NEXT_PRIME_LIMIT {
            return Err(CalcError::invocation(
                self.name(),
                format!("argument must be below {}", NEXT_PRIME_LIMIT),
            ));
        }
        let mut n = (x.trunc() + 1.0).max(2.0) as u64;
        while !is_prime(n) {
            n += 1;
        }
        Ok(n as f64)
    }
}

static NTH_PRIME_PARAMS: [&str; 1] = ["n"];

impl RunPlugin for NthPrime {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta::new("nthprime", "nthprime(").with_description("The n-th prime number")
    }

    fn operations(&self) -> Vec<Operation> {
        vec![Operation::new(RUN, &NTH_PRIME_PARAMS, |args| {
            let x = args[0];
            if x.is_nan() || x > NTH_PRIME_LIMIT as f64 {
                return Err(format!("n must be at most {}", NTH_PRIME_LIMIT));
            }
            if x < 1.0 {
                return Ok(Value::Integer(2));
            }

            let target = x.trunc() as u64;
            let mut count = 0;
            let mut candidate = 1;
            while count < target {
                candidate += 1;
                if is_prime(candidate) {
                    count += 1;
                }
            }
            Ok(Value::Integer(candidate as i64))
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(NPrime.invoke(&[10.0]).unwrap(), 11.0);
        assert_eq!(NPrime.invoke(&[11.0]).unwrap(), 13.0);
        assert_eq!(NPrime.invoke(&[13.9]).unwrap(), 17.0);
        assert_eq!(NPrime.invoke(&[-5.0]).unwrap(), 2.0);
        assert_eq!(NPrime.invoke(&[f64::NEG_INFINITY]).unwrap(), 2.0);
    }

    #[test]
    fn test_next_prime_out_of_range() {
        let err = NPrime.invoke(&[1e12]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvocationFailure);
        assert!(NPrime.invoke(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_nth_prime() {
        let nth = FunctionAdapter::new(&NthPrime).unwrap();
        assert_eq!(nth.invoke(&[1.0]).unwrap(), 2.0);
        assert_eq!(nth.invoke(&[5.0]).unwrap(), 11.0);
        assert_eq!(nth.invoke(&[100.0]).unwrap(), 541.0);
        assert_eq!(nth.invoke(&[0.0]).unwrap(), 2.0);
        assert_eq!(nth.invoke(&[-3.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_nth_prime_limit() {
        let nth = FunctionAdapter::new(&NthPrime).unwrap();
        let err = nth.invoke(&[1e9]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvocationFailure);
        assert!(err.to_string().contains("nthprime"));
    }
}
