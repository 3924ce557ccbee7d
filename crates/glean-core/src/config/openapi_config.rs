//! OpenAPI detector configuration.

use serde::{Deserialize, Serialize};

/// Directory names the OpenAPI detector never enters unless overridden.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["node_modules", "vendor"];

/// Configuration for the OpenAPI schema detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OpenApiConfig {
    /// Run the detector. Default: true.
    pub enabled: Option<bool>,
    /// Directory names to skip. Default: `node_modules`, `vendor`.
    pub skip_dirs: Option<Vec<String>>,
}

impl OpenApiConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_skip_dirs(&self) -> Vec<String> {
        match &self.skip_dirs {
            Some(dirs) => dirs.clone(),
            None => DEFAULT_SKIP_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}
