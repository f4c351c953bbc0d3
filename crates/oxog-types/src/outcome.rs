use oxog_value::Value;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::config::RenderConfig;
use crate::render::render_with;

/// Tag prefixed to every unwrap failure message. Dependents match on it.
pub const UNWRAP_PREFIX: &str = "[OxogTypes]";

/// Success (`Ok`) or failure (`Err`) of an operation whose failure is expected.
///
/// Combinators consume the receiver and never touch the inactive branch: mapping an
/// `Err` moves the error through untouched and never calls the mapping function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "this `Outcome` may be an `Err` variant, which should be handled"]
pub enum Outcome<T, E> {
    Ok(T),
    Err(E),
}

pub fn ok<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Ok(value)
}

pub fn err<T, E>(error: E) -> Outcome<T, E> {
    Outcome::Err(error)
}

impl<T, E> Outcome<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    pub fn err(self) -> Option<E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(error) => Some(error),
        }
    }

    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Transforms the success value. Panics raised by `f` are not caught.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Sequences a fallible step. On `Ok` the step's outcome is returned as is; on
    /// `Err` the step is never invoked.
    pub fn flat_map<U>(self, f: impl FnOnce(T) -> Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => f(value),
            Outcome::Err(error) => Outcome::Err(error),
        }
    }

    /// Alias of [`Outcome::flat_map`].
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U, E>) -> Outcome<U, E> {
        self.flat_map(f)
    }

    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(error) => Outcome::Err(f(error)),
        }
    }

    /// Exhaustive dispatch: exactly one handler runs.
    pub fn match_with<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E) -> U) -> U {
        match self {
            Outcome::Ok(value) => on_ok(value),
            Outcome::Err(error) => on_err(error),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => default,
        }
    }

    /// `f` runs only for `Err`.
    pub fn unwrap_or_else(self, f: impl FnOnce(E) -> T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(error) => f(error),
        }
    }

    pub fn into_std(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E: Into<Value>> Outcome<T, E> {
    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics on `Err` with `"[OxogTypes] Cannot unwrap Err: <rendering>"`, where the
    /// rendering of the error payload is produced by [`crate::render`] and never fails.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.try_unwrap() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Non-panicking form of [`Outcome::unwrap`].
    pub fn try_unwrap(self) -> Result<T, UnwrapError> {
        self.try_unwrap_with(&RenderConfig::default())
    }

    pub fn try_unwrap_with(self, config: &RenderConfig) -> Result<T, UnwrapError> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(UnwrapError {
                rendered: render_with(&error.into(), config),
            }),
        }
    }
}

impl<T: Into<Value>, E: Into<Value>> Outcome<T, E> {
    /// Dynamic `{ ok, value }` / `{ ok, error }` object recognised by [`crate::guards`].
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Ok(value) => Value::object([("ok", Value::Bool(true)), ("value", value.into())]),
            Outcome::Err(error) => {
                Value::object([("ok", Value::Bool(false)), ("error", error.into())])
            }
        }
    }
}

impl Outcome<Value, Value> {
    /// Reads a dynamic result-shaped object back; `None` if `value` is not one.
    pub fn from_value(value: &Value) -> Option<Self> {
        crate::guards::narrow(value)
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(error) => Outcome::Err(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }
}

/// Collects an iterator of outcomes, stopping at the first `Err`.
impl<T, E, V: FromIterator<T>> FromIterator<Outcome<T, E>> for Outcome<V, E> {
    fn from_iter<I: IntoIterator<Item = Outcome<T, E>>>(iter: I) -> Self {
        let mut failure = None;
        let collected: V = iter
            .into_iter()
            .map_while(|item| match item {
                Outcome::Ok(value) => Some(value),
                Outcome::Err(error) => {
                    failure = Some(error);
                    None
                }
            })
            .collect();
        match failure {
            Some(error) => Outcome::Err(error),
            None => Outcome::Ok(collected),
        }
    }
}

/// Serializes as `{"ok":true,"value":..}` or `{"ok":false,"error":..}`.
impl<T: Serialize, E: Serialize> Serialize for Outcome<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Ok(value) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            Outcome::Err(error) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[OxogTypes] Cannot unwrap Err: {rendered}")]
pub struct UnwrapError {
    rendered: String,
}

impl UnwrapError {
    /// The rendering of the error payload, without the prefix.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}
