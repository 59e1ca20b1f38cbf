//! # Runtime Configuration
//!
//! Everything comes from the environment; unset or empty variables keep the
//! defaults.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ECHO_CONTRACT_LOG_PATH` | `exects.txt` | Timestamp log location |
//! | `ECHO_CONTRACT_CONTEXT_PATH` | stdin | Read the host context from this file |
//! | `ECHO_CONTRACT_WORKDIR` | process cwd | Base for relative paths |

use std::path::{Path, PathBuf};

use echo_contract::domain::value_objects::DEFAULT_LOG_FILE;
use echo_contract::service::ContractConfig;
use tracing::warn;

/// Environment variable naming the timestamp log.
pub const ENV_LOG_PATH: &str = "ECHO_CONTRACT_LOG_PATH";
/// Environment variable naming a context file to read instead of stdin.
pub const ENV_CONTEXT_PATH: &str = "ECHO_CONTRACT_CONTEXT_PATH";
/// Environment variable naming the host working directory.
pub const ENV_WORKDIR: &str = "ECHO_CONTRACT_WORKDIR";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Timestamp log path, possibly relative to `workdir`.
    pub log_path: PathBuf,
    /// Context file; `None` reads stdin.
    pub context_path: Option<PathBuf>,
    /// Base directory for relative paths; `None` is the process cwd.
    pub workdir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            context_path: None,
            workdir: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |name: &str| {
            let value = lookup(name)?;
            if value.trim().is_empty() {
                warn!(variable = name, "ignoring empty configuration value");
                return None;
            }
            Some(PathBuf::from(value))
        };

        if let Some(path) = non_empty(ENV_LOG_PATH) {
            config.log_path = path;
        }
        config.context_path = non_empty(ENV_CONTEXT_PATH);
        config.workdir = non_empty(ENV_WORKDIR);
        config
    }

    /// Resolves `path` against the working directory, if one is set.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.workdir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Contract configuration with the log path resolved.
    #[must_use]
    pub fn contract_config(&self) -> ContractConfig {
        ContractConfig {
            log_path: self.resolve(&self.log_path),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
