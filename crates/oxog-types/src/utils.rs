//! Adapters from panics, std results and futures into `Outcome`s, and aggregation.

use std::any::Any;
use std::convert::Infallible;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use oxog_value::{ErrorValue, Value};

use crate::Outcome;
use crate::contracts::ContractError;

/// Normalises a foreign failure into a native error.
pub trait IntoError {
    fn into_error(self) -> ErrorValue;
}

impl IntoError for ErrorValue {
    fn into_error(self) -> ErrorValue {
        self
    }
}

/// Errors are kept; any other value becomes the message of a new error.
impl IntoError for Value {
    fn into_error(self) -> ErrorValue {
        match self {
            Value::Error(err) => err,
            other => ErrorValue::new(other.to_string()),
        }
    }
}

impl IntoError for String {
    fn into_error(self) -> ErrorValue {
        ErrorValue::new(self)
    }
}

impl IntoError for &str {
    fn into_error(self) -> ErrorValue {
        ErrorValue::new(self)
    }
}

impl IntoError for serde_json::Error {
    fn into_error(self) -> ErrorValue {
        use serde_json::error::Category;
        match self.classify() {
            Category::Syntax | Category::Eof => ErrorValue::named("SyntaxError", self.to_string()),
            Category::Io | Category::Data => ErrorValue::new(self.to_string()),
        }
    }
}

impl IntoError for std::io::Error {
    fn into_error(self) -> ErrorValue {
        ErrorValue::from_std(&self)
    }
}

impl IntoError for std::num::ParseIntError {
    fn into_error(self) -> ErrorValue {
        ErrorValue::from_std(&self)
    }
}

impl IntoError for std::num::ParseFloatError {
    fn into_error(self) -> ErrorValue {
        ErrorValue::from_std(&self)
    }
}

impl IntoError for anyhow::Error {
    fn into_error(self) -> ErrorValue {
        ErrorValue::new(format!("{self:#}"))
    }
}

impl IntoError for Box<dyn std::error::Error + Send + Sync> {
    fn into_error(self) -> ErrorValue {
        ErrorValue::new(self.to_string())
    }
}

impl IntoError for ContractError {
    fn into_error(self) -> ErrorValue {
        ErrorValue::named("ContractError", self.to_string())
    }
}

impl IntoError for Infallible {
    fn into_error(self) -> ErrorValue {
        match self {}
    }
}

/// Raises an arbitrary value, the way a script would throw a non-error value.
/// [`try_catch`] and friends turn it back into an `ErrorValue`.
pub fn throw(value: impl Into<Value>) -> ! {
    panic::panic_any(value.into())
}

/// Runs `f`, turning a panic into `Err`. Never panics itself.
///
/// The process panic hook still runs before the panic is caught, so the default
/// hook prints a "thread ... panicked at" line to stderr for every converted
/// failure. Install a quiet hook with [`std::panic::set_hook`] where that matters.
pub fn try_catch<T>(f: impl FnOnce() -> T) -> Outcome<T, ErrorValue> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Outcome::Ok(value),
        Err(payload) => {
            let error = error_from_panic(payload);
            log::debug!("try_catch converted a panic into an error: {error}");
            Outcome::Err(error)
        }
    }
}

/// [`try_catch`] for closures that report failure through a std `Result`.
pub fn try_result<T, X: IntoError>(f: impl FnOnce() -> Result<T, X>) -> Outcome<T, ErrorValue> {
    try_catch(f).flat_map(|result| match result {
        Ok(value) => Outcome::Ok(value),
        Err(failure) => Outcome::Err(failure.into_error()),
    })
}

/// Awaits `future`; an `Err` output or a panic while polling resolves to `Err`.
/// There is no timeout: a future that never completes never completes this one.
/// As with [`try_catch`], the panic hook reports a panic before it is converted.
pub async fn from_future<T, X, F>(future: F) -> Outcome<T, ErrorValue>
where
    X: IntoError,
    F: Future<Output = Result<T, X>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Outcome::Ok(value),
        Ok(Err(rejection)) => Outcome::Err(rejection.into_error()),
        Err(payload) => {
            let error = error_from_panic(payload);
            log::debug!("from_future converted a panic into an error: {error}");
            Outcome::Err(error)
        }
    }
}

/// All values in input order, or the first `Err`. Elements after the first `Err`
/// are not pulled from the iterator.
pub fn all<T, E>(results: impl IntoIterator<Item = Outcome<T, E>>) -> Outcome<Vec<T>, E> {
    results.into_iter().collect()
}

fn error_from_panic(payload: Box<dyn Any + Send>) -> ErrorValue {
    let payload = match payload.downcast::<ErrorValue>() {
        Ok(err) => return *err,
        Err(other) => other,
    };
    let payload = match payload.downcast::<Value>() {
        Ok(value) => return value.into_error(),
        Err(other) => other,
    };
    if let Some(message) = payload.downcast_ref::<String>() {
        return ErrorValue::new(message.clone());
    }
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return ErrorValue::new(*message);
    }
    ErrorValue::new("unknown panic payload")
}
