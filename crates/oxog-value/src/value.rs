use std::collections::HashSet;
use std::fmt;

use crate::{Array, EncodeOptions, ErrorValue, Function, Object, Symbol};

/// Dynamically typed value. Anything a caller may want to carry as a success or
/// failure payload fits here, including cyclic object graphs.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    Text(String),
    Symbol(Symbol),
    Function(Function),
    Error(ErrorValue),
    Array(Array),
    Object(Object),
}

impl Value {
    /// Human-readable kind string used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Text(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Convenience helper to build an object from field/value pairs.
    pub fn object(fields: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        Value::Object(Object::from_fields(fields))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Array::from_items(items))
    }

    pub fn function(
        name: &str,
        body: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Value::Function(Function::new(name, body))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(ErrorValue::new(message))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Field lookup on objects; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|obj| obj.contains_key(key))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_eq(self, other, &mut HashSet::new())
    }
}

pub(crate) fn deep_eq_objects(a: &Object, b: &Object) -> bool {
    deep_eq_object_fields(a, b, &mut HashSet::new())
}

pub(crate) fn deep_eq_arrays(a: &Array, b: &Array) -> bool {
    deep_eq_array_items(a, b, &mut HashSet::new())
}

// Pairs already under comparison are assumed equal, which terminates on cycles.
fn deep_eq(a: &Value, b: &Value, seen: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x == y,
        (Value::Error(x), Value::Error(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => deep_eq_array_items(x, y, seen),
        (Value::Object(x), Value::Object(y)) => deep_eq_object_fields(x, y, seen),
        _ => false,
    }
}

fn deep_eq_array_items(a: &Array, b: &Array, seen: &mut HashSet<(usize, usize)>) -> bool {
    if a.ptr_eq(b) || !seen.insert((a.id(), b.id())) {
        return true;
    }
    let (left, right) = (a.items(), b.items());
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(x, y)| deep_eq(x, y, seen))
}

fn deep_eq_object_fields(a: &Object, b: &Object, seen: &mut HashSet<(usize, usize)>) -> bool {
    if a.ptr_eq(b) || !seen.insert((a.id(), b.id())) {
        return true;
    }
    let left = a.entries();
    if left.len() != b.len() {
        return false;
    }
    left.iter().all(|(key, x)| match b.get(key) {
        Some(y) => deep_eq(x, &y, seen),
        None => false,
    })
}

/// Platform string coercion. Never fails; cyclic arrays render their repeated
/// element as an empty string, and arrays nested deeper than
/// [`EncodeOptions::DEFAULT_MAX_DEPTH`] render as empty too.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        coerce(self, 0, &mut HashSet::new(), &mut out);
        f.write_str(&out)
    }
}

fn coerce(value: &Value, depth: usize, active: &mut HashSet<usize>, out: &mut String) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::BigInt(i) => out.push_str(&i.to_string()),
        Value::Text(s) => out.push_str(s),
        Value::Symbol(sym) => out.push_str(&sym.to_string()),
        Value::Function(func) => out.push_str(&func.to_string()),
        Value::Error(err) => out.push_str(&err.to_string()),
        Value::Object(_) => out.push_str("[object Object]"),
        Value::Array(arr) => {
            if depth >= EncodeOptions::DEFAULT_MAX_DEPTH || !active.insert(arr.id()) {
                return;
            }
            for (idx, item) in arr.items().iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                if !item.is_nullish() {
                    coerce(item, depth + 1, active, out);
                }
            }
            active.remove(&arr.id());
        }
    }
}

/// Shortest round-trip number text in the platform's style: no trailing `.0`, and
/// exponent notation (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        "0".into()
    } else if (1e-6..1e21).contains(&n.abs()) {
        n.to_string()
    } else {
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<ErrorValue> for Value {
    fn from(value: ErrorValue) -> Self {
        Value::Error(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items.into_iter().map(Into::into))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        crate::json::decode(&value)
    }
}
