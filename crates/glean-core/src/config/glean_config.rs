//! Top-level Glean configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{OpenApiConfig, ScanConfig, SecretsConfig};
use crate::errors::ConfigError;

/// Name of the project-level config file, looked up in the scan root.
pub const PROJECT_CONFIG_FILE: &str = "glean.toml";

pub const ENV_MAX_FILE_SIZE: &str = "GLEAN_MAX_FILE_SIZE";
pub const ENV_THREADS: &str = "GLEAN_THREADS";
pub const ENV_SECRETS_ENABLED: &str = "GLEAN_SECRETS_ENABLED";
pub const ENV_OPENAPI_ENABLED: &str = "GLEAN_OPENAPI_ENABLED";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GLEAN_*`)
/// 3. Project config (`glean.toml` in the scan root)
/// 4. User config (`~/.glean/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GleanConfig {
    pub scan: ScanConfig,
    pub secrets: SecretsConfig,
    pub openapi: OpenApiConfig,
}

/// Overrides supplied by an embedding front end. Highest priority layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_file_size: Option<u64>,
    pub threads: Option<usize>,
    pub secrets_enabled: Option<bool>,
    pub openapi_enabled: Option<bool>,
    pub rules_path: Option<PathBuf>,
}

impl GleanConfig {
    /// Load configuration for a scan rooted at `root`.
    ///
    /// Missing files fall back to the next layer. A project file that exists
    /// but does not parse is an error.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.is_file() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.is_file() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &GleanConfig) -> Result<(), ConfigError> {
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(name) = &config.scan.ignore_filename {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.ignore_filename".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(dirs) = &config.openapi.skip_dirs {
            if dirs.iter().any(|d| d.is_empty() || d.contains('/')) {
                return Err(ConfigError::ValidationFailed {
                    field: "openapi.skip_dirs".to_string(),
                    message: "entries must be plain directory names".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// `~/.glean/config.toml`
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".glean").join("config.toml"))
    }

    /// Merge a TOML file into the existing config. Unknown keys are ignored.
    fn merge_toml_file(config: &mut GleanConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: GleanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Field-wise merge: values set in `other` replace those in `base`.
    pub fn merge(base: &mut GleanConfig, other: &GleanConfig) {
        let scan = &other.scan;
        if scan.max_file_size.is_some() {
            base.scan.max_file_size = scan.max_file_size;
        }
        if scan.threads.is_some() {
            base.scan.threads = scan.threads;
        }
        if !scan.include.is_empty() {
            base.scan.include = scan.include.clone();
        }
        if !scan.extra_ignore.is_empty() {
            base.scan.extra_ignore = scan.extra_ignore.clone();
        }
        if scan.follow_symlinks.is_some() {
            base.scan.follow_symlinks = scan.follow_symlinks;
        }
        if scan.ignore_filename.is_some() {
            base.scan.ignore_filename = scan.ignore_filename.clone();
        }

        if other.secrets.enabled.is_some() {
            base.secrets.enabled = other.secrets.enabled;
        }
        if other.secrets.rules_path.is_some() {
            base.secrets.rules_path = other.secrets.rules_path.clone();
        }

        if other.openapi.enabled.is_some() {
            base.openapi.enabled = other.openapi.enabled;
        }
        if other.openapi.skip_dirs.is_some() {
            base.openapi.skip_dirs = other.openapi.skip_dirs.clone();
        }
    }

    /// Apply `GLEAN_*` environment variable overrides.
    /// Values that do not parse are ignored with a warning.
    fn apply_env_overrides(config: &mut GleanConfig) {
        if let Some(v) = env_parsed::<u64>(ENV_MAX_FILE_SIZE) {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = env_parsed::<usize>(ENV_THREADS) {
            config.scan.threads = Some(v);
        }
        if let Some(v) = env_parsed::<bool>(ENV_SECRETS_ENABLED) {
            config.secrets.enabled = Some(v);
        }
        if let Some(v) = env_parsed::<bool>(ENV_OPENAPI_ENABLED) {
            config.openapi.enabled = Some(v);
        }
    }

    fn apply_cli_overrides(config: &mut GleanConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = cli.threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.secrets_enabled {
            config.secrets.enabled = Some(v);
        }
        if let Some(v) = cli.openapi_enabled {
            config.openapi.enabled = Some(v);
        }
        if let Some(ref v) = cli.rules_path {
            config.secrets.rules_path = Some(v.clone());
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
