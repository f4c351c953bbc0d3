//! Dynamic value model for payloads carried through `Outcome`s, plus its JSON bridge.

mod error;
mod function;
pub mod json;
mod object;
mod symbol;
mod value;

pub use error::ErrorValue;
pub use function::{Function, NativeFn};
pub use json::{EncodeOptions, JsonError};
pub use object::{Array, Object, ToJsonHook};
pub use symbol::Symbol;
pub use value::Value;
