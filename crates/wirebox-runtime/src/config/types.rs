//! Configuration types

use crate::constants::{DEFAULT_HISTORY_LIMIT, DEFAULT_LOG_LEVEL, DEFAULT_RECENT_FAILURES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level container configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Registration-time checks
    pub registration: RegistrationConfig,
    /// Resolution history and reports
    pub debugging: DebuggingConfig,
    /// Log output
    pub logging: LoggingConfig,
}

// ============================================================================
// Registration Configuration
// ============================================================================

/// Registration-time checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Run contract validation on every `register*` call
    pub validate_on_register: bool,
    /// Run a full validation pass before `warm_up` builds singletons
    pub validate_on_warm_up: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            validate_on_register: false,
            validate_on_warm_up: true,
        }
    }
}

// ============================================================================
// Debugging Configuration
// ============================================================================

/// Resolution history and reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggingConfig {
    /// Record every resolve call in the history
    pub record_resolutions: bool,
    /// Maximum number of history records kept
    pub history_limit: usize,
    /// Number of recent failures shown in diagnostic reports
    pub report_recent_failures: usize,
}

impl Default for DebuggingConfig {
    fn default() -> Self {
        Self {
            record_resolutions: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            report_recent_failures: DEFAULT_RECENT_FAILURES,
        }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json_format: bool,
    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}
