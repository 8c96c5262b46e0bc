//! Transient lifecycle strategy.

use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;

use super::{Instance, LifecycleStrategy, ServiceFactory};

/// Lifecycle holding no cached instance: every `get_instance` call invokes
/// the factory.
///
/// `create_scope()` returns a fresh strategy with the same factory; the
/// behavior is scope-invariant. `dispose()` only drops the factory reference:
/// no instances were held, so there is no cascading disposal.
#[derive(Default)]
pub struct TransientLifecycle {
    state: Mutex<TransientState>,
}

#[derive(Default)]
struct TransientState {
    factory: Option<ServiceFactory>,
    disposed: bool,
}

impl TransientLifecycle {
    /// Creates a strategy with no factory installed.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LifecycleStrategy for TransientLifecycle {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Transient
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
            state.factory.clone().ok_or(DiError::NoFactory)?
        };
        factory(args).map_err(|e| DiError::CreationFailed(e.to_string()))
    }

    fn create_scope(self: Arc<Self>) -> DiResult<Arc<dyn LifecycleStrategy>> {
        let state = self.state.lock().unwrap();
        if state.disposed {
            return Err(DiError::DisposedLifecycle);
        }
        let factory = state.factory.clone().ok_or(DiError::NoFactory)?;
        drop(state);

        Ok(Arc::new(TransientLifecycle {
            state: Mutex::new(TransientState {
                factory: Some(factory),
                disposed: false,
            }),
        }))
    }

    fn dispose(&self) {
        let mut state = self.state.lock().unwrap();
        state.factory = None;
        state.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.state.lock().unwrap().disposed
    }
}
