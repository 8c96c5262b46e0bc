//! Service records binding a name and dependency list to a lifecycle.

use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::lifecycle::{Instance, LifecycleStrategy};
use crate::lifetime::Lifetime;
use crate::provider::ServiceProvider;

/// A single service registration: name, ordered dependency names, and the
/// lifecycle strategy that caches its instances.
///
/// A record performs exactly one level of dependency resolution: it asks the
/// locator for each declared dependency (in declaration order, matching the
/// factory's positional parameters) and hands the resolved instances to its
/// lifecycle. Records are immutable once built, except for disposal, which
/// detaches the lifecycle so later use is detected deterministically.
pub struct ServiceRecord {
    name: String,
    dependencies: Vec<String>,
    // Taken on dispose; cloned records share the strategy by Arc.
    lifecycle: Mutex<Option<Arc<dyn LifecycleStrategy>>>,
}

impl ServiceRecord {
    pub(crate) fn new(
        name: String,
        dependencies: Vec<String>,
        lifecycle: Arc<dyn LifecycleStrategy>,
    ) -> Self {
        Self {
            name,
            dependencies,
            lifecycle: Mutex::new(Some(lifecycle)),
        }
    }

    /// The service identifier this record is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependency names, in factory-argument order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// The record's lifetime, or `None` once the record is disposed.
    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifecycle
            .lock()
            .unwrap()
            .as_ref()
            .map(|l| l.lifetime())
    }

    /// Whether the record or its lifecycle has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.lifecycle
            .lock()
            .unwrap()
            .as_ref()
            .map_or(true, |l| l.is_disposed())
    }

    fn lifecycle(&self) -> DiResult<Arc<dyn LifecycleStrategy>> {
        self.lifecycle
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DiError::DisposedService(self.name.clone()))
    }

    /// Maps a strategy-level disposal error to one naming this service.
    fn name_disposal(&self, err: DiError) -> DiError {
        match err {
            DiError::DisposedLifecycle => DiError::DisposedService(self.name.clone()),
            other => other,
        }
    }

    /// Resolves this record's direct dependencies through `locator` and
    /// produces an instance from the lifecycle.
    ///
    /// With an empty dependency list the locator itself is passed as the
    /// sole factory argument, supporting factories that want direct
    /// container access.
    pub fn resolve(&self, locator: &ServiceProvider) -> DiResult<Instance> {
        let lifecycle = self.lifecycle()?;
        if lifecycle.is_disposed() {
            return Err(DiError::DisposedService(self.name.clone()));
        }

        if self.dependencies.is_empty() {
            let args: [Instance; 1] = [Arc::new(locator.clone())];
            return lifecycle
                .get_instance(&args)
                .map_err(|e| self.name_disposal(e));
        }

        let mut resolved = Vec::with_capacity(self.dependencies.len());
        for dependency in &self.dependencies {
            resolved.push(locator.get_raw(dependency)?);
        }
        lifecycle
            .get_instance(&resolved)
            .map_err(|e| self.name_disposal(e))
    }

    /// Produces the record a derived scope should hold for this service:
    /// same name and dependency list, lifecycle mapped through
    /// [`LifecycleStrategy::create_scope`].
    pub fn create_scope(&self) -> DiResult<ServiceRecord> {
        let lifecycle = self.lifecycle()?;
        let scoped = lifecycle
            .create_scope()
            .map_err(|e| self.name_disposal(e))?;
        Ok(ServiceRecord::new(
            self.name.clone(),
            self.dependencies.clone(),
            scoped,
        ))
    }

    /// Disposes the lifecycle and detaches it. Idempotent.
    pub fn dispose(&self) {
        if let Some(lifecycle) = self.lifecycle.lock().unwrap().take() {
            lifecycle.dispose();
        }
    }
}

impl Clone for ServiceRecord {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            dependencies: self.dependencies.clone(),
            lifecycle: Mutex::new(self.lifecycle.lock().unwrap().clone()),
        }
    }
}

impl std::fmt::Debug for ServiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRecord")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("lifetime", &self.lifetime())
            .finish()
    }
}
