use async_trait::async_trait;
use oxog_value::{ErrorValue, Value};

use super::Kernel;
use crate::Outcome;

pub type LifecycleOutcome = Outcome<(), ErrorValue>;

/// A unit of functionality installed into a kernel. `C` is the kernel's shared
/// context type.
#[async_trait]
pub trait Plugin<C: Send + Sync = Value>: Send + Sync {
    /// Unique name within a kernel.
    fn name(&self) -> &str;
    fn version(&self) -> &str;

    /// Names of plugins that must be registered first.
    fn dependencies(&self) -> &[String] {
        &[]
    }

    fn install(&self, kernel: &mut dyn Kernel<C>) -> LifecycleOutcome;

    async fn on_init(&self, _context: &C) -> LifecycleOutcome {
        Outcome::Ok(())
    }

    async fn on_destroy(&self) -> LifecycleOutcome {
        Outcome::Ok(())
    }

    fn on_error(&self, _error: &ErrorValue) {}
}
