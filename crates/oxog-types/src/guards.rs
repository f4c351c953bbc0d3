//! Duck-typed predicates over dynamic values.
//!
//! Every guard inspects field presence and field types only, so any object with the
//! right shape is recognised no matter how it was built. None of them panic.

use oxog_value::{Object, Value};

use crate::Outcome;

/// Members a kernel-shaped object must expose as functions.
pub const KERNEL_MEMBERS: [&str; 7] = [
    "register",
    "unregister",
    "get_plugin",
    "list_plugins",
    "emit",
    "on",
    "context",
];

const PLUGIN_HOOKS: [&str; 3] = ["init", "destroy", "on_error"];

/// An object with a boolean `ok` tag and a `value` or `error` key (even if undefined).
pub fn is_result(value: &Value) -> bool {
    result_tag(value).is_some()
}

pub fn is_ok(value: &Value) -> bool {
    result_tag(value) == Some(true)
}

pub fn is_err(value: &Value) -> bool {
    result_tag(value) == Some(false)
}

/// Reads a result-shaped value back as an `Outcome`; a missing payload key reads as
/// `undefined`.
pub fn narrow(value: &Value) -> Option<Outcome<Value, Value>> {
    let tag = result_tag(value)?;
    let payload_key = if tag { "value" } else { "error" };
    let payload = value.get(payload_key).unwrap_or_default();
    Some(if tag { Outcome::Ok(payload) } else { Outcome::Err(payload) })
}

fn result_tag(value: &Value) -> Option<bool> {
    let obj = value.as_object()?;
    let tag = obj.get("ok")?.as_bool()?;
    (obj.contains_key("value") || obj.contains_key("error")).then_some(tag)
}

/// A native error, or an object carrying string `name` and `message` fields.
pub fn is_error(value: &Value) -> bool {
    match value {
        Value::Error(_) => true,
        Value::Object(obj) => is_text(obj, "name") && is_text(obj, "message"),
        _ => false,
    }
}

/// A plugin descriptor: string `name` and `version`, a function `install`, an optional
/// array of string `dependencies`, and optional `init`/`destroy`/`on_error` functions.
pub fn is_plugin(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if !(is_text(obj, "name") && is_text(obj, "version") && is_function(obj, "install")) {
        return false;
    }
    let dependencies_ok = match obj.get("dependencies") {
        None | Some(Value::Undefined) => true,
        Some(Value::Array(deps)) => deps.items().iter().all(|dep| matches!(dep, Value::Text(_))),
        Some(_) => false,
    };
    dependencies_ok
        && PLUGIN_HOOKS.iter().all(|hook| match obj.get(hook) {
            None | Some(Value::Undefined) | Some(Value::Function(_)) => true,
            Some(_) => false,
        })
}

/// An object exposing every member of [`KERNEL_MEMBERS`] as a function.
pub fn is_kernel(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| KERNEL_MEMBERS.iter().all(|member| is_function(obj, member)))
}

fn is_text(obj: &Object, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::Text(_)))
}

fn is_function(obj: &Object, key: &str) -> bool {
    matches!(obj.get(key), Some(Value::Function(_)))
}
