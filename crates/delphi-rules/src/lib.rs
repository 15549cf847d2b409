//! Rule engine that picks the terminal message shown to a home barista.
//!
//! A rule set is a prioritized list of rules, each pairing a condition
//! tree with a pool of candidate messages. Given a [`MessageContext`]
//! snapshot the engine selects the highest-priority rule whose condition
//! holds, picks one of its messages at random and fills in placeholders.
//!
//! # Example
//!
//! ```ignore
//! use delphi_rules::prelude::*;
//!
//! let engine = MessageEngine::from_slice(include_bytes!("rules.json"))?;
//! let ctx = MessageContext::new()
//!     .with_shot_count(12)
//!     .with_active_bean_display_name("Kenya AA");
//!
//! for line in engine.get_message(&ctx) {
//!     println!("{line}");
//! }
//! ```

pub mod condition;
pub mod context;
pub mod engine;
pub mod error;
pub mod operators;
pub mod picker;
pub mod schema;
pub mod specification;
pub mod template;
pub mod value;

/// Prelude module - import everything you need with `use delphi_rules::prelude::*`
pub mod prelude {
    pub use crate::condition::{Condition, ConditionType, SimpleCondition};
    pub use crate::context::{ContextValue, MessageContext};
    pub use crate::engine::{MessageEngine, DEFAULT_MESSAGE};
    pub use crate::error::{SchemaError, SchemaResult};
    pub use crate::operators::ComparisonOperator;
    pub use crate::picker::{FirstPicker, MessagePicker, SeededPicker, ThreadRngPicker};
    pub use crate::schema::{Message, Rule, RuleSchema};
    pub use crate::specification::Specification;
    pub use crate::template::{Placeholder, TemplateProcessor};
    pub use crate::value::ConditionValue;
}
