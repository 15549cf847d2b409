//! Delphi - terminal messages for an espresso shot log
//!
//! Host-side wiring around the [`delphi_rules`] engine: configuration,
//! error reporting and the memoized engine provider.
//!
//! # Architecture
//!
//! - **delphi-rules**: condition grammar, rule set loader, evaluator and
//!   template processing (no I/O)
//! - **provider**: loads the rule set once, falls back to a built-in engine
//! - **config**: environment-driven settings for the `delphi` binary
//! - **input**: context documents read by the binary

pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod provider;

// Re-export commonly used types
pub use config::Config;
pub use delphi_rules::prelude;
pub use error::{AppError, AppResult};
pub use input::parse_context;
pub use provider::{MessageEngineProvider, RuleSource};
