//! Runtime layer constants
//!
//! Domain constants live in `wirebox_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "wirebox.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "wirebox";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "WIREBOX";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable that overrides the configured log filter
pub const LOG_FILTER_ENV_VAR: &str = "WIREBOX_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File name prefix for rolling log files
pub const DEFAULT_LOG_FILE_PREFIX: &str = "wirebox";

// ============================================================================
// DEBUGGING CONSTANTS
// ============================================================================

/// Default number of resolution records kept
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Default number of failures shown in diagnostic reports
pub const DEFAULT_RECENT_FAILURES: usize = 10;

/// Number of slowest keys listed in diagnostic reports
pub const REPORT_SLOWEST_KEYS: usize = 5;

// ============================================================================
// RESOLUTION CONSTANTS
// ============================================================================

/// Name of the instance lookup strategy
pub const INSTANCE_STRATEGY: &str = "instance";

/// Name of the factory strategy
pub const FACTORY_STRATEGY: &str = "factory";

/// Name of the constructor-injection strategy
pub const CONSTRUCTOR_STRATEGY: &str = "constructor_injection";
