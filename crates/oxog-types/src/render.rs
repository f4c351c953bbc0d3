//! Panic-free rendering of arbitrary error payloads for unwrap messages.
//!
//! Dispatch order: native error message, big-integer digits, symbol description,
//! function placeholder, then lenient JSON (revisited references become
//! `"[Circular]"`, nested big integers become decimal strings). When JSON encoding
//! fails for any other reason, including a panicking serialization hook, the value's
//! plain string coercion is used instead.

use std::panic::{self, AssertUnwindSafe};

use oxog_value::json::{self, EncodeOptions};
use oxog_value::Value;

use crate::config::RenderConfig;

pub use oxog_value::json::CIRCULAR_PLACEHOLDER;

pub const FUNCTION_PLACEHOLDER: &str = "[Function]";

const ELLIPSIS: &str = "...";

pub fn render(value: &Value) -> String {
    render_with(value, &RenderConfig::default())
}

pub fn render_with(value: &Value, config: &RenderConfig) -> String {
    let rendered = match value {
        Value::Error(err) => err.message.clone(),
        Value::BigInt(digits) => digits.to_string(),
        Value::Symbol(sym) => sym.to_string(),
        Value::Function(_) => FUNCTION_PLACEHOLDER.to_owned(),
        other => structural(other, config),
    };
    truncate(rendered, config.max_len)
}

fn structural(value: &Value, config: &RenderConfig) -> String {
    let options = EncodeOptions::lenient().with_max_depth(config.max_depth);
    match panic::catch_unwind(AssertUnwindSafe(|| json::to_string(value, &options))) {
        Ok(Ok(Some(text))) => text,
        Ok(Ok(None)) => value.to_string(),
        Ok(Err(err)) => {
            log::debug!("structural rendering failed ({err}); using string coercion");
            value.to_string()
        }
        Err(_) => {
            log::debug!("serialization hook panicked during rendering; using string coercion");
            value.to_string()
        }
    }
}

fn truncate(text: String, max_len: Option<usize>) -> String {
    match max_len {
        Some(limit) if text.chars().count() > limit => {
            let mut cut: String = text.chars().take(limit).collect();
            cut.push_str(ELLIPSIS);
            cut
        }
        _ => text,
    }
}
