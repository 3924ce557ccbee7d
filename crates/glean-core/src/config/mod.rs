//! Configuration system for Glean.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod glean_config;
pub mod openapi_config;
pub mod scan_config;
pub mod secrets_config;

pub use glean_config::{CliOverrides, GleanConfig};
pub use openapi_config::OpenApiConfig;
pub use scan_config::ScanConfig;
pub use secrets_config::SecretsConfig;
