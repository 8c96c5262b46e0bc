//! Singleton lifecycle strategy.

use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;

use super::{Instance, LifecycleStrategy, ServiceFactory};

/// Lifecycle holding at most one instance, created lazily and shared
/// identically across every derived scope.
///
/// `create_scope()` returns the strategy itself rather than a copy, which is
/// what guarantees process-wide sharing. `dispose()` is a deliberate no-op:
/// singletons outlive scopes, and tearing down one scope must never kill
/// application-wide shared state.
///
/// # Examples
///
/// ```rust
/// use keyed_di::lifecycle::{LifecycleStrategy, SingletonLifecycle, Instance};
/// use std::sync::Arc;
///
/// let strategy = SingletonLifecycle::new();
/// strategy.set_factory(Arc::new(|_| Ok(Arc::new(42usize) as Instance))).unwrap();
///
/// let a = strategy.get_instance(&[]).unwrap();
/// let b = strategy.get_instance(&[]).unwrap();
/// assert!(Arc::ptr_eq(&a, &b)); // Same instance
/// ```
#[derive(Default)]
pub struct SingletonLifecycle {
    state: Mutex<SingletonState>,
}

#[derive(Default)]
struct SingletonState {
    factory: Option<ServiceFactory>,
    instance: Option<Instance>,
}

impl SingletonLifecycle {
    /// Creates a strategy with an empty instance slot and no factory.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LifecycleStrategy for SingletonLifecycle {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }

    fn set_factory(&self, factory: ServiceFactory) -> DiResult<()> {
        self.state.lock().unwrap().factory = Some(factory);
        Ok(())
    }

    fn get_instance(&self, args: &[Instance]) -> DiResult<Instance> {
        let factory = {
            let state = self.state.lock().unwrap();
            if let Some(instance) = &state.instance {
                // Cached: args are ignored from here on.
                return Ok(instance.clone());
            }
            state.factory.clone().ok_or(DiError::NoFactory)?
        };

        // The lock is released while the factory runs so it may resolve
        // other services through the locator.
        let instance = factory(args).map_err(|e| DiError::CreationFailed(e.to_string()))?;

        let mut state = self.state.lock().unwrap();
        Ok(state.instance.get_or_insert(instance).clone())
    }

    fn create_scope(self: Arc<Self>) -> DiResult<Arc<dyn LifecycleStrategy>> {
        // Identity, not a copy: all scopes share this strategy.
        Ok(self)
    }

    fn dispose(&self) {}

    fn is_disposed(&self) -> bool {
        false
    }
}
