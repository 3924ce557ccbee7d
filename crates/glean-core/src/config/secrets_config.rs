//! Secret leak detector configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the secret leak detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SecretsConfig {
    /// Run the detector. Default: true.
    pub enabled: Option<bool>,
    /// Path to a gitleaks-format TOML rule bundle replacing the embedded one.
    pub rules_path: Option<PathBuf>,
}

impl SecretsConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}
