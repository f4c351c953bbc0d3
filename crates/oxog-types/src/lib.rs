//! Shared result container, structural guards and plugin/kernel contracts for
//! micro-kernel plugin ecosystems.
//!
//! `Outcome<T, E>` is the success/failure container. Payloads that have to survive
//! arbitrary shapes (cycles, big integers, symbols, functions) travel as
//! [`Value`]s from `oxog-value`, which this crate re-exports.

pub mod brand;
pub mod config;
pub mod contracts;
pub mod guards;
mod outcome;
pub mod render;
pub mod utils;

pub use brand::Branded;
pub use config::RenderConfig;
pub use outcome::{Outcome, UNWRAP_PREFIX, UnwrapError, err, ok};
pub use oxog_value::{Array, ErrorValue, Function, Object, Symbol, Value, json};
pub use render::{render, render_with};
pub use utils::{IntoError, all, from_future, throw, try_catch, try_result};

/// Plain JSON document type used at serialization boundaries.
pub type JsonValue = serde_json::Value;
