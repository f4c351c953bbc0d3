//! JSON bridge between [`Value`] and `serde_json::Value`.
//!
//! Encoding follows the familiar `JSON.stringify` rules: `undefined`, functions and
//! symbols are dropped from objects and become `null` inside arrays, non-finite
//! numbers become `null`, and an object's serialization hook replaces its fields.
//! Cycles and big integers either fail the encoding or are substituted, depending on
//! [`EncodeOptions`].
//!
//! Two exceptions: native errors encode as `{"name":..,"message":..}`
//! rather than `{}`, and numbers that are not safe integers are written by
//! `serde_json`'s shortest round-trip formatter, whose exponent form and thresholds
//! differ from the platform's (`1e21`, not `1e+21`).

use std::collections::HashSet;

use serde_json::{Map, Number, Value as Json};
use thiserror::Error;

use crate::{ErrorValue, Value};

/// Literal substituted for a reference that was already visited.
pub const CIRCULAR_PLACEHOLDER: &str = "[Circular]";

/// Largest magnitude for which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JsonError {
    #[error("converting circular structure to JSON")]
    Circular,
    #[error("do not know how to serialize a BigInt")]
    BigInt,
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
    #[error("serialization hook failed: {0}")]
    Hook(ErrorValue),
}

/// How references that were seen before are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircularPolicy {
    /// Fail with [`JsonError::Circular`] when a reference appears inside itself.
    Reject,
    /// Replace every reference visited earlier in the same call (cyclic or merely
    /// shared) with [`CIRCULAR_PLACEHOLDER`].
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub circular: CircularPolicy,
    /// Encode big integers as decimal strings instead of failing.
    pub bigint_as_string: bool,
    /// Run objects' serialization hooks.
    pub call_hooks: bool,
    pub max_depth: usize,
}

impl EncodeOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Mirrors `JSON.stringify` without a replacer.
    pub fn strict() -> Self {
        Self {
            circular: CircularPolicy::Reject,
            bigint_as_string: false,
            call_hooks: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Substitutes placeholders for revisited references and stringifies big integers.
    pub fn lenient() -> Self {
        Self {
            circular: CircularPolicy::Placeholder,
            bigint_as_string: true,
            call_hooks: true,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn without_hooks(mut self) -> Self {
        self.call_hooks = false;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::strict()
    }
}

/// Encode `value`. `Ok(None)` means the value has no JSON form at all (a bare
/// `undefined`, function or symbol).
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Option<Json>, JsonError> {
    Encoder {
        options,
        seen: HashSet::new(),
        keep_alive: Vec::new(),
    }
    .encode(value, 0, true)
}

/// Encode straight to compact JSON text.
pub fn to_string(value: &Value, options: &EncodeOptions) -> Result<Option<String>, JsonError> {
    Ok(encode(value, options)?.map(|json| json.to_string()))
}

/// Decode a JSON document into fresh, unshared values.
pub fn decode(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::array(items.iter().map(decode)),
        Json::Object(map) => Value::object(map.iter().map(|(key, value)| (key.clone(), decode(value)))),
    }
}

struct Encoder<'a> {
    options: &'a EncodeOptions,
    seen: HashSet<usize>,
    // Hook results are owned here until the call ends so their addresses, which
    // `seen` records, cannot be reused by a later allocation.
    keep_alive: Vec<Value>,
}

impl Encoder<'_> {
    fn encode(&mut self, value: &Value, depth: usize, allow_hook: bool) -> Result<Option<Json>, JsonError> {
        if depth > self.options.max_depth {
            return Err(JsonError::DepthExceeded(self.options.max_depth));
        }
        let json = match value {
            Value::Undefined | Value::Function(_) | Value::Symbol(_) => return Ok(None),
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => encode_number(*n),
            Value::BigInt(i) if self.options.bigint_as_string => Json::String(i.to_string()),
            Value::BigInt(_) => return Err(JsonError::BigInt),
            Value::Text(s) => Json::String(s.clone()),
            Value::Error(err) => {
                let mut map = Map::new();
                map.insert("name".into(), Json::String(err.name.clone()));
                map.insert("message".into(), Json::String(err.message.clone()));
                Json::Object(map)
            }
            Value::Array(arr) => {
                if let Some(placeholder) = self.enter(arr.id())? {
                    return Ok(Some(placeholder));
                }
                let mut items = Vec::with_capacity(arr.len());
                for item in arr.items() {
                    items.push(self.encode(&item, depth + 1, true)?.unwrap_or(Json::Null));
                }
                self.leave(arr.id());
                Json::Array(items)
            }
            Value::Object(obj) => {
                if allow_hook && self.options.call_hooks {
                    if let Some(hook) = obj.to_json_hook() {
                        let replaced = hook(obj).map_err(JsonError::Hook)?;
                        let encoded = self.encode(&replaced, depth, false);
                        self.keep_alive.push(replaced);
                        return encoded;
                    }
                }
                if let Some(placeholder) = self.enter(obj.id())? {
                    return Ok(Some(placeholder));
                }
                let mut map = Map::new();
                for (key, field) in obj.entries() {
                    if let Some(json) = self.encode(&field, depth + 1, true)? {
                        map.insert(key, json);
                    }
                }
                self.leave(obj.id());
                Json::Object(map)
            }
        };
        Ok(Some(json))
    }

    fn enter(&mut self, id: usize) -> Result<Option<Json>, JsonError> {
        if self.seen.insert(id) {
            return Ok(None);
        }
        match self.options.circular {
            CircularPolicy::Reject => Err(JsonError::Circular),
            CircularPolicy::Placeholder => Ok(Some(Json::String(CIRCULAR_PLACEHOLDER.into()))),
        }
    }

    // Rejecting tracks only the active path so shared, acyclic references still encode.
    fn leave(&mut self, id: usize) {
        if self.options.circular == CircularPolicy::Reject {
            self.seen.remove(&id);
        }
    }
}

fn encode_number(n: f64) -> Json {
    if !n.is_finite() {
        return Json::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Json::Null, Json::Number)
}
