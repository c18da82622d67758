//! Result readouts for interactive front ends
//!
//! While the user is typing, a failed evaluation is usually just an
//! unfinished expression, so it shows a neutral placeholder. On submit the
//! same failure is shown as an error.

use modulo_core::{format_number, CalcError};
use serde::{Deserialize, Serialize};

/// Shown for empty input
pub const EMPTY_READOUT: &str = "0";
/// Shown for a failed evaluation while typing
pub const PENDING_READOUT: &str = "…";
/// Shown for a failed evaluation on submit
pub const ERROR_READOUT: &str = "Error";

/// When the evaluation was requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// On every keystroke
    #[default]
    Live,
    /// On submit
    Final,
}

/// What a front end should show for one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub text: String,
    pub value: Option<f64>,
    pub error: Option<CalcError>,
}

impl Readout {
    pub fn empty() -> Self {
        Self {
            text: EMPTY_READOUT.to_string(),
            value: None,
            error: None,
        }
    }

    pub fn from_result(result: Result<f64, CalcError>, mode: Mode) -> Self {
        match result {
            Ok(value) => Self {
                text: format_number(value),
                value: Some(value),
                error: None,
            },
            Err(error) => Self {
                text: match mode {
                    Mode::Live => PENDING_READOUT,
                    Mode::Final => ERROR_READOUT,
                }
                .to_string(),
                value: None,
                error: Some(error),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_formatted() {
        let r = Readout::from_result(Ok(2.5), Mode::Final);
        assert_eq!(r.text, "2.5");
        assert_eq!(r.value, Some(2.5));
        assert!(!r.is_error());
    }

    #[test]
    fn test_failure_depends_on_mode() {
        let live = Readout::from_result(Err(CalcError::invalid_number("")), Mode::Live);
        assert_eq!(live.text, "…");
        assert!(live.is_error());

        let fin = Readout::from_result(Err(CalcError::invalid_number("")), Mode::Final);
        assert_eq!(fin.text, "Error");
    }

    #[test]
    fn test_empty() {
        assert_eq!(Readout::empty().text, "0");
        assert!(!Readout::empty().is_error());
    }
}
