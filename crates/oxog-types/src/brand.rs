//! Nominal wrapper that keeps structurally identical values apart at compile time.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `T` tagged with the zero-sized marker `B`. Two brands over the same `T` are
/// distinct types; the wrapper has the same size and serialized form as `T`.
///
/// ```
/// use oxog_types::Branded;
///
/// struct PluginNameBrand;
/// type PluginName = Branded<String, PluginNameBrand>;
///
/// let name = PluginName::new("logger".to_string());
/// assert_eq!(name.as_str(), "logger");
/// ```
pub struct Branded<T, B> {
    value: T,
    _brand: PhantomData<fn() -> B>,
}

impl<T, B> Branded<T, B> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            _brand: PhantomData,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, B> Deref for Branded<T, B> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Clone, B> Clone for Branded<T, B> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: Copy, B> Copy for Branded<T, B> {}

impl<T: PartialEq, B> PartialEq for Branded<T, B> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, B> Eq for Branded<T, B> {}

impl<T: Hash, B> Hash for Branded<T, B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Debug, B> fmt::Debug for Branded<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: fmt::Display, B> fmt::Display for Branded<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: Serialize, B> Serialize for Branded<T, B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, B> Deserialize<'de> for Branded<T, B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::new)
    }
}
