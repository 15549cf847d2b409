//! Message context input for the `delphi` binary.
//!
//! The context arrives as a camelCase JSON document. Calendar facts the
//! document leaves out are taken from the supplied clock.

use chrono::{Datelike, Timelike};
use serde_json::Value;

use delphi_rules::context::MessageContext;

use crate::error::{AppError, AppResult};

/// Parse a context document, stamping missing calendar fields from `now`.
///
/// Blank input yields the default context stamped from `now`.
pub fn parse_context<T: Datelike + Timelike>(input: &str, now: &T) -> AppResult<MessageContext> {
    let stamped = MessageContext::new().at(now);
    if input.trim().is_empty() {
        return Ok(stamped);
    }

    let raw: Value = serde_json::from_str(input).map_err(AppError::InvalidContext)?;
    let mut context: MessageContext =
        serde_json::from_value(raw.clone()).map_err(AppError::InvalidContext)?;

    if raw.get("hour").is_none() {
        context.hour = stamped.hour;
    }
    if raw.get("dayOfWeek").is_none() {
        context.day_of_week = stamped.day_of_week;
    }
    if raw.get("month").is_none() {
        context.month = stamped.month;
    }

    Ok(context)
}
