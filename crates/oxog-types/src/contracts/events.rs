use std::sync::Arc;

use oxog_value::Value;

pub type EventHandler<P = Value> = Arc<dyn Fn(&P) + Send + Sync>;

/// Detaches the handler it was returned for. Calling it after the handler is gone is
/// a no-op.
pub type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Names the events of one emitter and the payload they carry.
pub trait EventMap: 'static {
    type Payload: Send + Sync + 'static;

    /// Known event names; empty means any name is accepted.
    fn names() -> &'static [&'static str];

    fn is_known(event: &str) -> bool {
        let names = Self::names();
        names.is_empty() || names.contains(&event)
    }
}

/// Open event map with dynamic payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicEvents;

impl EventMap for DynamicEvents {
    type Payload = Value;

    fn names() -> &'static [&'static str] {
        &[]
    }
}

/// Subscription surface over an [`EventMap`]. Handlers are identified by their `Arc`,
/// so `off` needs the same handle that was passed to `on`.
pub trait EventEmitter<M: EventMap = DynamicEvents>: Send + Sync {
    fn on(&self, event: &str, handler: EventHandler<M::Payload>) -> Unsubscribe;

    /// Returns whether the handler was subscribed.
    fn off(&self, event: &str, handler: &EventHandler<M::Payload>) -> bool;

    fn emit(&self, event: &str, payload: &M::Payload);

    /// Subscribes a handler that detaches itself after its first call.
    fn once(&self, event: &str, handler: EventHandler<M::Payload>) -> Unsubscribe;
}
