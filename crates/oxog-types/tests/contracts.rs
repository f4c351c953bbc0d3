//! Exercises the plugin, kernel and emitter contracts through minimal in-test
//! implementations, the way a dependent kernel would implement them.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use oxog_types::contracts::{
    ContractError, DynamicEvents, EventEmitter, EventHandler, EventMap, Kernel, LifecycleOutcome,
    Plugin, PluginRef, Unsubscribe,
};
use oxog_types::guards::is_plugin;
use oxog_types::{ErrorValue, Function, IntoError, Object, Outcome, Value};

struct AppContext {
    app: String,
}

#[derive(Default)]
struct Bus {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, EventHandler)>>,
}

struct TestKernel {
    plugins: Vec<PluginRef<AppContext>>,
    bus: Arc<Mutex<Bus>>,
    context: AppContext,
}

impl TestKernel {
    fn new(app: &str) -> Self {
        Self {
            plugins: Vec::new(),
            bus: Arc::default(),
            context: AppContext { app: app.into() },
        }
    }
}

impl Kernel<AppContext> for TestKernel {
    fn register(&mut self, plugin: PluginRef<AppContext>) -> Outcome<(), ContractError> {
        if self.has_plugin(plugin.name()) {
            return Outcome::Err(ContractError::DuplicatePlugin(plugin.name().into()));
        }
        if let Some(missing) = plugin.dependencies().iter().find(|dep| !self.has_plugin(dep)) {
            return Outcome::Err(ContractError::MissingDependency {
                plugin: plugin.name().into(),
                dependency: missing.clone(),
            });
        }
        match plugin.install(self) {
            Outcome::Ok(()) => {
                self.plugins.push(plugin);
                Outcome::Ok(())
            }
            Outcome::Err(source) => {
                plugin.on_error(&source);
                Outcome::Err(ContractError::Install {
                    plugin: plugin.name().into(),
                    source,
                })
            }
        }
    }

    fn unregister(&mut self, name: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|plugin| plugin.name() != name);
        self.plugins.len() != before
    }

    fn get_plugin(&self, name: &str) -> Option<PluginRef<AppContext>> {
        self.plugins.iter().find(|plugin| plugin.name() == name).cloned()
    }

    fn list_plugins(&self) -> Vec<PluginRef<AppContext>> {
        self.plugins.clone()
    }

    fn emit(&self, event: &str, payload: Value) {
        let handlers: Vec<EventHandler> = self
            .bus
            .lock()
            .unwrap()
            .handlers
            .get(event)
            .map(|slots| slots.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(&payload);
        }
    }

    fn on(&self, event: &str, handler: EventHandler) -> Unsubscribe {
        let id = {
            let mut bus = self.bus.lock().unwrap();
            let id = bus.next_id;
            bus.next_id += 1;
            bus.handlers.entry(event.to_string()).or_default().push((id, handler));
            id
        };
        let bus = Arc::clone(&self.bus);
        let event = event.to_string();
        Box::new(move || {
            if let Some(slots) = bus.lock().unwrap().handlers.get_mut(&event) {
                slots.retain(|(slot_id, _)| *slot_id != id);
            }
        })
    }

    fn context(&self) -> &AppContext {
        &self.context
    }
}

struct CounterPlugin {
    name: &'static str,
    dependencies: Vec<String>,
    ticks: Arc<AtomicUsize>,
    initialised: AtomicBool,
}

impl CounterPlugin {
    fn new(name: &'static str, dependencies: &[&str]) -> Self {
        Self {
            name,
            dependencies: dependencies.iter().map(|dep| dep.to_string()).collect(),
            ticks: Arc::default(),
            initialised: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Plugin<AppContext> for CounterPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn install(&self, kernel: &mut dyn Kernel<AppContext>) -> LifecycleOutcome {
        let ticks = Arc::clone(&self.ticks);
        // Stays subscribed for the kernel's lifetime.
        let _unsubscribe = kernel.on(
            "tick",
            Arc::new(move |_: &Value| {
                ticks.fetch_add(1, Ordering::SeqCst);
            }),
        );
        Outcome::Ok(())
    }

    async fn on_init(&self, context: &AppContext) -> LifecycleOutcome {
        if context.app.is_empty() {
            return Outcome::Err(ErrorValue::new("application name missing"));
        }
        self.initialised.store(true, Ordering::SeqCst);
        Outcome::Ok(())
    }
}

struct BrokenPlugin {
    errors: Arc<AtomicUsize>,
}

impl Plugin<AppContext> for BrokenPlugin {
    fn name(&self) -> &str {
        "broken"
    }

    fn version(&self) -> &str {
        "0.0.1"
    }

    fn install(&self, _kernel: &mut dyn Kernel<AppContext>) -> LifecycleOutcome {
        Outcome::Err(ErrorValue::new("missing configuration"))
    }

    fn on_error(&self, _error: &ErrorValue) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn installed_plugins_receive_events() {
    let mut kernel = TestKernel::new("demo");
    let counter = Arc::new(CounterPlugin::new("counter", &[]));
    let ticks = Arc::clone(&counter.ticks);

    assert_eq!(kernel.register(counter), Outcome::Ok(()));
    kernel.emit("tick", Value::Null);
    kernel.emit("tick", Value::from(2i64));
    kernel.emit("other", Value::Null);

    assert_eq!(ticks.load(Ordering::SeqCst), 2);
    assert!(kernel.has_plugin("counter"));
    assert_eq!(kernel.list_plugins().len(), 1);
}

#[test]
fn duplicate_and_missing_dependencies_are_rejected() {
    let mut kernel = TestKernel::new("demo");
    let dependent = Arc::new(CounterPlugin::new("metrics", &["counter"]));

    assert_eq!(
        kernel.register(dependent.clone()),
        Outcome::Err(ContractError::MissingDependency {
            plugin: "metrics".into(),
            dependency: "counter".into(),
        })
    );

    assert!(kernel.register(Arc::new(CounterPlugin::new("counter", &[]))).is_ok());
    assert!(kernel.register(dependent).is_ok());
    assert_eq!(
        kernel.register(Arc::new(CounterPlugin::new("counter", &[]))),
        Outcome::Err(ContractError::DuplicatePlugin("counter".into()))
    );

    assert!(kernel.unregister("metrics"));
    assert!(!kernel.unregister("metrics"));
    assert!(kernel.get_plugin("metrics").is_none());
}

#[test]
fn failed_install_is_reported_and_not_registered() {
    let mut kernel = TestKernel::new("demo");
    let errors = Arc::new(AtomicUsize::new(0));
    let outcome = kernel.register(Arc::new(BrokenPlugin {
        errors: Arc::clone(&errors),
    }));

    let failure = outcome.err().expect("install must fail");
    assert_eq!(
        failure.to_string(),
        "plugin 'broken' failed to install: Error: missing configuration"
    );
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert!(!kernel.has_plugin("broken"));

    let normalised = failure.into_error();
    assert_eq!(normalised.name(), "ContractError");
}

#[test]
fn unsubscribe_stops_delivery() {
    let kernel = TestKernel::new("demo");
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let unsubscribe = kernel.on(
        "ping",
        Arc::new(move |_: &Value| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    kernel.emit("ping", Value::Null);
    unsubscribe();
    kernel.emit("ping", Value::Null);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn lifecycle_hooks_run_against_context() {
    let mut kernel = TestKernel::new("demo");
    let counter = Arc::new(CounterPlugin::new("counter", &[]));
    assert!(kernel.register(counter.clone()).is_ok());

    for plugin in kernel.list_plugins() {
        assert_eq!(plugin.on_init(kernel.context()).await, Outcome::Ok(()));
        assert_eq!(plugin.on_destroy().await, Outcome::Ok(()));
    }
    assert!(counter.initialised.load(Ordering::SeqCst));

    let unnamed = TestKernel::new("");
    let failed = counter.on_init(unnamed.context()).await;
    assert_eq!(failed, Outcome::Err(ErrorValue::new("application name missing")));
}

struct Slot<P> {
    handler: EventHandler<P>,
    once: bool,
}

type Slots<P> = Arc<Mutex<HashMap<String, Vec<Slot<P>>>>>;

struct Emitter<M: EventMap> {
    slots: Slots<M::Payload>,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> Emitter<M> {
    fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            _map: PhantomData,
        }
    }

    fn subscribe(&self, event: &str, handler: EventHandler<M::Payload>, once: bool) -> Unsubscribe {
        self.slots
            .lock()
            .unwrap()
            .entry(event.to_string())
            .or_default()
            .push(Slot {
                handler: handler.clone(),
                once,
            });
        let slots = Arc::clone(&self.slots);
        let event = event.to_string();
        Box::new(move || {
            remove(&slots, &event, &handler);
        })
    }
}

fn remove<P: 'static>(slots: &Slots<P>, event: &str, handler: &EventHandler<P>) -> bool {
    let mut slots = slots.lock().unwrap();
    let Some(list) = slots.get_mut(event) else {
        return false;
    };
    let before = list.len();
    list.retain(|slot| !Arc::ptr_eq(&slot.handler, handler));
    list.len() != before
}

impl<M: EventMap> EventEmitter<M> for Emitter<M> {
    fn on(&self, event: &str, handler: EventHandler<M::Payload>) -> Unsubscribe {
        self.subscribe(event, handler, false)
    }

    fn off(&self, event: &str, handler: &EventHandler<M::Payload>) -> bool {
        remove(&self.slots, event, handler)
    }

    fn emit(&self, event: &str, payload: &M::Payload) {
        let fired: Vec<EventHandler<M::Payload>> = {
            let mut slots = self.slots.lock().unwrap();
            let Some(list) = slots.get_mut(event) else {
                return;
            };
            let fired = list.iter().map(|slot| slot.handler.clone()).collect();
            list.retain(|slot| !slot.once);
            fired
        };
        for handler in fired {
            handler(payload);
        }
    }

    fn once(&self, event: &str, handler: EventHandler<M::Payload>) -> Unsubscribe {
        self.subscribe(event, handler, true)
    }
}

struct LifecycleEvents;

impl EventMap for LifecycleEvents {
    type Payload = String;

    fn names() -> &'static [&'static str] {
        &["ready", "stopped"]
    }
}

#[test]
fn typed_event_map_and_emitter() {
    assert!(LifecycleEvents::is_known("ready"));
    assert!(!LifecycleEvents::is_known("tick"));
    assert!(DynamicEvents::is_known("anything"));

    let emitter: Emitter<LifecycleEvents> = Emitter::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let every = {
        let log = Arc::clone(&log);
        let handler: EventHandler<String> = Arc::new(move |payload: &String| {
            log.lock().unwrap().push(format!("every:{payload}"));
        });
        handler
    };
    let first = {
        let log = Arc::clone(&log);
        let handler: EventHandler<String> = Arc::new(move |payload: &String| {
            log.lock().unwrap().push(format!("once:{payload}"));
        });
        handler
    };

    let _keep = emitter.on("ready", every.clone());
    let _ignored = emitter.once("ready", first);
    emitter.emit("ready", &"a".to_string());
    emitter.emit("ready", &"b".to_string());
    assert!(emitter.off("ready", &every));
    assert!(!emitter.off("ready", &every));
    emitter.emit("ready", &"c".to_string());

    assert_eq!(*log.lock().unwrap(), vec!["every:a", "once:a", "every:b"]);
}

#[test]
fn dynamic_plugin_descriptor_is_validated_and_installed() {
    let installs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&installs);
    let descriptor = Object::from_fields([
        ("name", Value::from("script-plugin")),
        ("version", Value::from("0.3.0")),
        (
            "install",
            Value::Function(Function::new("install", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Value::Undefined
            })),
        ),
    ]);
    let value = Value::Object(descriptor.clone());
    assert!(is_plugin(&value));

    if let Some(Value::Function(install)) = descriptor.get("install") {
        install.call(&[Value::Null]);
    }
    assert_eq!(installs.load(Ordering::SeqCst), 1);
}
