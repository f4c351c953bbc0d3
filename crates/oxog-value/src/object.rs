use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::json::{self, EncodeOptions};
use crate::{ErrorValue, Value};

/// Custom serialization hook invoked by the JSON encoder in place of the object's
/// own fields. A failing hook fails the whole encoding.
pub type ToJsonHook = Arc<dyn Fn(&Object) -> Result<Value, ErrorValue> + Send + Sync>;

struct ObjectInner {
    fields: RwLock<IndexMap<String, Value>>,
    to_json: Option<ToJsonHook>,
}

/// Shared, mutable, insertion-ordered record. Cloning shares the same object, which is
/// what makes self-referential structures possible.
#[derive(Clone)]
pub struct Object(Arc<ObjectInner>);

impl Object {
    pub fn new() -> Self {
        Self::from_map(IndexMap::new(), None)
    }

    pub fn from_fields(fields: impl IntoIterator<Item = (impl Into<String>, Value)>) -> Self {
        let map = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Self::from_map(map, None)
    }

    /// Builds an object whose JSON form is produced by `hook` instead of its fields.
    pub fn with_to_json(
        fields: impl IntoIterator<Item = (impl Into<String>, Value)>,
        hook: impl Fn(&Object) -> Result<Value, ErrorValue> + Send + Sync + 'static,
    ) -> Self {
        let map = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Self::from_map(map, Some(Arc::new(hook)))
    }

    fn from_map(fields: IndexMap<String, Value>, to_json: Option<ToJsonHook>) -> Self {
        Self(Arc::new(ObjectInner {
            fields: RwLock::new(fields),
            to_json,
        }))
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Value>> {
        self.0.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Value>> {
        self.0.fields.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Snapshot of the fields in insertion order. Traversals work on snapshots so that
    /// no lock is held while visiting children or running hooks.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn to_json_hook(&self) -> Option<&ToJsonHook> {
        self.0.to_json.as_ref()
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        crate::value::deep_eq_objects(self, other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_json(&Value::Object(self.clone()), f)
    }
}

/// Shared, mutable list.
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Value>) -> Self {
        Self(Arc::new(RwLock::new(items.into_iter().collect())))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value.into());
    }

    /// Replaces the element at `index`; returns false when out of bounds.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> bool {
        let mut items = self.0.write().unwrap_or_else(PoisonError::into_inner);
        match items.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn items(&self) -> Vec<Value> {
        self.read().clone()
    }

    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        crate::value::deep_eq_arrays(self, other)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_json(&Value::Array(self.clone()), f)
    }
}

fn debug_json(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let options = EncodeOptions::lenient().without_hooks();
    match json::encode(value, &options) {
        Ok(Some(encoded)) => write!(f, "{encoded}"),
        _ => write!(f, "{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_fields() {
        let obj = Object::new();
        let alias = obj.clone();
        alias.insert("a", 1i64);
        assert_eq!(obj.get("a"), Some(Value::Number(1.0)));
        assert!(obj.ptr_eq(&alias));
        assert_eq!(obj.id(), alias.id());
    }

    #[test]
    fn preserves_insertion_order() {
        let obj = Object::from_fields([("z", Value::Null), ("a", Value::Bool(true))]);
        obj.insert("m", "x");
        assert_eq!(obj.keys(), vec!["z", "a", "m"]);
        obj.remove("a");
        assert_eq!(obj.keys(), vec!["z", "m"]);
    }

    #[test]
    fn debug_of_cyclic_object_terminates() {
        let obj = Object::from_fields([("name", Value::from("loop"))]);
        obj.insert("me", Value::Object(obj.clone()));
        let text = format!("{obj:?}");
        assert!(text.contains("[Circular]"), "{text}");
    }

    #[test]
    fn array_set_and_bounds() {
        let arr = Array::from_items([Value::from(1i64), Value::from(2i64)]);
        assert!(arr.set(1, 5i64));
        assert!(!arr.set(9, 5i64));
        assert_eq!(arr.items(), vec![Value::from(1i64), Value::from(5i64)]);
    }
}
