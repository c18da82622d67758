//! Registry configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable listing functions to leave out of discovery
pub const DISABLED_FUNCTIONS_ENV: &str = "MODULO_DISABLED_FUNCTIONS";

/// Settings applied on every discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Function names skipped during discovery (exact match)
    pub disabled: Vec<String>,
}

impl RegistryConfig {
    pub fn from_env() -> Self {
        env::var(DISABLED_FUNCTIONS_ENV)
            .map(|list| Self::with_disabled_list(&list))
            .unwrap_or_default()
    }

    /// Parse a comma separated name list, ignoring blanks
    pub fn with_disabled_list(list: &str) -> Self {
        Self {
            disabled: list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d == name)
    }
}
