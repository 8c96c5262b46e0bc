//! Scoped lifecycle strategy.

use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;

use super::{Disposer, Instance, LifecycleStrategy, ServiceFactory};

/// Lifecycle holding at most one instance per scope.
///
/// `create_scope()` returns a new strategy sharing the same factory and
/// disposer but with an empty instance slot, so each scope caches its own
/// instance. `dispose()` runs the attached disposer against the cached
/// instance (failures are logged, never propagated, so one failing disposal
/// cannot block sibling disposals), then detaches factory and instance and
/// marks the strategy terminally disposed.
pub struct ScopedLifecycle {
    state: Mutex<ScopedState>,
}

struct ScopedState {
    factory: Option<ServiceFactory>,
    instance: Option<Instance>,
    disposer: Option<Disposer>,
    disposed: bool,
}

impl ScopedLifecycle {
    /// Creates a strategy with no disposal hook.
    pub fn new() -> Self {
        Self::with_disposer(None)
    }

    /// Creates a strategy whose cached instance will be passed to `disposer`
    /// when the owning scope is disposed.
    pub fn with_disposer(disposer: Option<Disposer>) -> Self {
        Self {
            state: Mutex::new(ScopedState {
                factory: None,
                instance: None,
                disposer,
                disposed: false,
            }),
        }
    }
}

impl Default for ScopedLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleStrategy for ScopedLifecycle {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Scoped
    }

    fn set_factory(&self, factory: ServiceFactory) -> DiResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.disposed {
            return Err(DiError::DisposedLifecycle);
        }
        state.factory = Some(factory);
        Ok(())
    }

    fn get_instance(&self, args: &[Instance]) -> DiResult<Instance> {
        let factory = {
            let state = self.state.lock().unwrap();
            if state.disposed {
                return Err(DiError::DisposedLifecycle);
            }
            if let Some(instance) = &state.instance {
                // Cached: args are ignored from here on.
                return Ok(instance.clone());
            }
            state.factory.clone().ok_or(DiError::NoFactory)?
        };

        // Factory runs outside the lock so it may resolve other services.
        let instance = factory(args).map_err(|e| DiError::CreationFailed(e.to_string()))?;

        let mut state = self.state.lock().unwrap();
        if state.disposed {
            return Err(DiError::DisposedLifecycle);
        }
        Ok(state.instance.get_or_insert(instance).clone())
    }

    fn create_scope(self: Arc<Self>) -> DiResult<Arc<dyn LifecycleStrategy>> {
        let state = self.state.lock().unwrap();
        if state.disposed {
            return Err(DiError::DisposedLifecycle);
        }
        let factory = state.factory.clone().ok_or(DiError::NoFactory)?;
        let disposer = state.disposer.clone();
        drop(state);

        Ok(Arc::new(ScopedLifecycle {
            state: Mutex::new(ScopedState {
                factory: Some(factory),
                instance: None,
                disposer,
                disposed: false,
            }),
        }))
    }

    fn dispose(&self) {
        let mut state = self.state.lock().unwrap();
        if state.disposed {
            return;
        }
        if let (Some(instance), Some(disposer)) = (&state.instance, &state.disposer) {
            if let Err(e) = disposer(instance) {
                log::warn!("scoped instance disposal failed: {}", e);
            }
        }
        state.instance = None;
        state.factory = None;
        state.disposer = None;
        state.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.state.lock().unwrap().disposed
    }
}
