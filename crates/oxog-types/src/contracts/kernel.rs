use std::sync::Arc;

use oxog_value::Value;

use super::{ContractError, EventHandler, Plugin, Unsubscribe};
use crate::Outcome;

pub type PluginRef<C> = Arc<dyn Plugin<C>>;

/// Host that owns plugins, routes events between them and exposes a shared context.
pub trait Kernel<C: Send + Sync = Value>: Send + Sync {
    fn register(&mut self, plugin: PluginRef<C>) -> Outcome<(), ContractError>;

    /// Returns whether a plugin with that name was registered.
    fn unregister(&mut self, name: &str) -> bool;

    fn get_plugin(&self, name: &str) -> Option<PluginRef<C>>;

    fn has_plugin(&self, name: &str) -> bool {
        self.get_plugin(name).is_some()
    }

    fn list_plugins(&self) -> Vec<PluginRef<C>>;

    fn emit(&self, event: &str, payload: Value);

    fn on(&self, event: &str, handler: EventHandler) -> Unsubscribe;

    fn context(&self) -> &C;
}
