//! Float literals and canonical number formatting
//!
//! Formatting is pinned to Rust's shortest round-trip decimal (`Display` for
//! `f64`), which never uses an exponent and is locale independent. Trailing
//! zeros and a trailing bare `.` are stripped as a post-processing pass.

use crate::CalcError;

const INFINITY: &str = "Infinity";
const NAN: &str = "NaN";

/// Parse a float literal: `42`, `3.14`, `.5`, `5.`, `1.2E-3`, `1e+5`,
/// plus the `Infinity` / `-Infinity` / `NaN` forms that [`format_number`] emits.
pub fn parse_number(text: &str) -> Result<f64, CalcError> {
    let unsigned = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);

    if unsigned == INFINITY {
        return Ok(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    if unsigned == NAN {
        return Ok(f64::NAN);
    }

    // Rust's parser also takes "inf"/"nan" spellings; only the canonical forms above are literals
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(CalcError::invalid_number(text));
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return Err(CalcError::invalid_number(text));
    }

    text.parse::<f64>()
        .map_err(|_| CalcError::invalid_number(text))
}

/// Format a result for display.
///
/// - `NaN`, `Infinity`, `-Infinity` for non-finite values
/// - integral values without a decimal point (`-0.0` renders `0`)
/// - everything else as the shortest round-trip decimal, trailing zeros stripped
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return NAN.to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            INFINITY.to_string()
        } else {
            format!("-{}", INFINITY)
        };
    }
    if value == value.trunc() {
        if value == 0.0 {
            return "0".to_string();
        }
        return format!("{}", value);
    }
    strip_trailing_zeros(format!("{}", value))
}

fn strip_trailing_zeros(mut s: String) -> String {
    if s.contains('.') {
        let keep = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(keep);
    }
    s
}
