//! Plugin, kernel and event contracts that dependents implement.
//!
//! This crate ships no runtime for them; the dynamic counterparts can be checked
//! with [`crate::guards::is_plugin`] and [`crate::guards::is_kernel`].

mod error;
mod events;
mod kernel;
mod plugin;

pub use error::ContractError;
pub use events::{DynamicEvents, EventEmitter, EventHandler, EventMap, Unsubscribe};
pub use kernel::{Kernel, PluginRef};
pub use plugin::{LifecycleOutcome, Plugin};
