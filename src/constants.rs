//! Application-wide constants
//!
//! Defaults for configuration values that can be overridden from the
//! environment.

// =============================================================================
// RULE SET DEFAULTS
// =============================================================================

/// Default location of the message rule set
pub const DEFAULT_RULES_PATH: &str = "rules.json";

/// Environment variable overriding the rule set location
pub const ENV_RULES_PATH: &str = "DELPHI_RULES_PATH";

/// Environment variable holding an optional seed for message picking
pub const ENV_RANDOM_SEED: &str = "DELPHI_RANDOM_SEED";

// =============================================================================
// LOGGING DEFAULTS
// =============================================================================

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable selecting the log output format
pub const ENV_LOG_FORMAT: &str = "DELPHI_LOG_FORMAT";
