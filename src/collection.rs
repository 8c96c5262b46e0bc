//! Service registration collection, the mutable front half of the container.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::DependencyGraph;
use crate::lifecycle::{
    FactoryError, Instance, LifecycleStrategy, ScopedLifecycle, SingletonLifecycle,
    TransientLifecycle,
};
use crate::lifetime::Lifetime;
use crate::provider::ServiceProvider;
use crate::record::ServiceRecord;
use crate::registration::Registration;

/// Mutable registry of service registrations.
///
/// A collection accepts registrations until [`build`](Self::build) is
/// called, after which every mutating method fails with
/// [`DiError::AlreadyBuilt`]. Registration order is preserved and becomes
/// the iteration order of [`descriptors`](Self::descriptors) and the
/// disposal order of the built provider.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{dep, Registration, ServiceCollection, Lifetime};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { config: Arc<Config> }
///
/// let mut services = ServiceCollection::new();
/// services
///     .add_singleton("Config", Config { url: "postgres://localhost".into() })
///     .unwrap()
///     .add_scoped_factory("Database", ["Config"], |args| {
///         Ok(Database { config: dep::<Config>(args, 0)? })
///     })
///     .unwrap();
///
/// assert!(services.validate().is_empty());
///
/// let provider = services.build().unwrap();
/// let db = provider.get::<Database>("Database").unwrap();
/// assert_eq!(db.config.url, "postgres://localhost");
/// ```
pub struct ServiceCollection {
    records: IndexMap<String, ServiceRecord>,
    built: bool,
}

impl ServiceCollection {
    /// Creates an empty, open collection.
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
            built: false,
        }
    }

    fn ensure_open(&self) -> DiResult<()> {
        if self.built {
            return Err(DiError::AlreadyBuilt);
        }
        Ok(())
    }

    /// Registers a service from an explicit [`Registration`].
    ///
    /// Registering a name that already exists replaces the previous
    /// registration and logs a warning; last registration wins. Empty or
    /// whitespace-only names are rejected with [`DiError::InvalidName`].
    pub fn register(&mut self, registration: Registration) -> DiResult<&mut Self> {
        self.ensure_open()?;

        let Registration {
            name,
            lifetime,
            dependencies,
            factory,
            disposer,
        } = registration;

        if name.trim().is_empty() {
            return Err(DiError::InvalidName(name));
        }
        if name == ServiceProvider::SELF_KEY {
            log::warn!(
                "registration '{}' shadows the provider self-registration and will be unreachable",
                name
            );
        }
        if self.records.contains_key(name.as_str()) {
            log::warn!("replacing existing registration for service '{}'", name);
        }
        if disposer.is_some() && lifetime != Lifetime::Scoped {
            log::warn!(
                "disposer on {} service '{}' will never run; disposal hooks apply to scoped services",
                lifetime,
                name
            );
        }

        let strategy: Arc<dyn LifecycleStrategy> = match lifetime {
            Lifetime::Singleton => Arc::new(SingletonLifecycle::new()),
            Lifetime::Scoped => Arc::new(ScopedLifecycle::with_disposer(disposer)),
            Lifetime::Transient => Arc::new(TransientLifecycle::new()),
        };
        strategy.set_factory(factory)?;

        let record = ServiceRecord::new(name.clone(), dependencies, strategy);
        self.records.insert(name, record);
        Ok(self)
    }

    /// Registers a pre-built singleton value under `name`.
    pub fn add_singleton<T: Send + Sync + 'static>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> DiResult<&mut Self> {
        self.register(Registration::instance(name, Lifetime::Singleton, value))
    }

    /// Registers a singleton factory with an ordered dependency list.
    pub fn add_singleton_factory<T, D, F>(
        &mut self,
        name: impl Into<String>,
        dependencies: D,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        D: IntoIterator,
        D::Item: Into<String>,
        F: Fn(&[Instance]) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register(Registration::factory(
            name,
            Lifetime::Singleton,
            dependencies,
            factory,
        ))
    }

    /// Registers a scoped factory with an ordered dependency list.
    pub fn add_scoped_factory<T, D, F>(
        &mut self,
        name: impl Into<String>,
        dependencies: D,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        D: IntoIterator,
        D::Item: Into<String>,
        F: Fn(&[Instance]) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register(Registration::factory(
            name,
            Lifetime::Scoped,
            dependencies,
            factory,
        ))
    }

    /// Registers a transient factory with an ordered dependency list.
    pub fn add_transient_factory<T, D, F>(
        &mut self,
        name: impl Into<String>,
        dependencies: D,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        D: IntoIterator,
        D::Item: Into<String>,
        F: Fn(&[Instance]) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register(Registration::factory(
            name,
            Lifetime::Transient,
            dependencies,
            factory,
        ))
    }

    /// Registers a singleton factory that resolves its own dependencies
    /// through the locator.
    pub fn add_singleton_with<T, F>(&mut self, name: impl Into<String>, factory: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register(Registration::with_resolver(name, Lifetime::Singleton, factory))
    }

    /// Registers a scoped factory that resolves its own dependencies
    /// through the locator.
    pub fn add_scoped_with<T, F>(&mut self, name: impl Into<String>, factory: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register(Registration::with_resolver(name, Lifetime::Scoped, factory))
    }

    /// Registers a transient factory that resolves its own dependencies
    /// through the locator.
    pub fn add_transient_with<T, F>(&mut self, name: impl Into<String>, factory: F) -> DiResult<&mut Self>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register(Registration::with_resolver(name, Lifetime::Transient, factory))
    }

    /// Removes and disposes the registration under `name`.
    ///
    /// Returns `true` when a registration was removed. Registration order
    /// of the remaining services is preserved.
    pub fn remove(&mut self, name: &str) -> DiResult<bool> {
        self.ensure_open()?;
        match self.records.shift_remove(name) {
            Some(record) => {
                record.dispose();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes and disposes every registration.
    pub fn clear(&mut self) -> DiResult<()> {
        self.ensure_open()?;
        for record in self.records.values() {
            record.dispose();
        }
        self.records.clear();
        Ok(())
    }

    /// Whether a registration exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no registrations.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether [`build`](Self::build) has already been called.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Snapshots every registration, in registration order.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.records
            .values()
            .map(ServiceDescriptor::from_record)
            .collect()
    }

    /// Checks the registry for structural problems without resolving
    /// anything.
    ///
    /// Reports, as human-readable strings in stable order: blank record
    /// names, disposed registrations, dependencies on unregistered names,
    /// and dependency cycles. An empty result means the graph is
    /// structurally sound.
    /// Usable both before and after [`build`](Self::build).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_di::{Registration, ServiceCollection, Lifetime};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.register(Registration::factory(
    ///     "A",
    ///     Lifetime::Singleton,
    ///     ["B"],
    ///     |_| Ok(()),
    /// )).unwrap();
    ///
    /// let issues = services.validate();
    /// assert_eq!(issues, ["Service 'A' depends on unregistered service 'B'"]);
    /// ```
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for record in self.records.values() {
            if record.name().trim().is_empty() {
                issues.push(format!(
                    "Service '{}' has an invalid name (must be non-empty)",
                    record.name()
                ));
            }
            if record.is_disposed() {
                issues.push(format!("Service '{}' has been disposed", record.name()));
            }
            for dependency in record.dependencies() {
                // The provider key is always resolvable, never registered.
                if dependency != ServiceProvider::SELF_KEY
                    && !self.records.contains_key(dependency.as_str())
                {
                    issues.push(format!(
                        "Service '{}' depends on unregistered service '{}'",
                        record.name(),
                        dependency
                    ));
                }
            }
        }

        let graph = DependencyGraph::new(
            self.records
                .values()
                .map(|r| (r.name().to_string(), r.dependencies().to_vec())),
        );
        for cycle in graph.find_cycles() {
            issues.push(format!(
                "Circular dependency detected: {}",
                cycle.join(" -> ")
            ));
        }

        issues
    }

    /// Builds the root [`ServiceProvider`] and seals the collection.
    ///
    /// Building does not validate; call [`validate`](Self::validate)
    /// first when eager diagnostics are wanted. The provider shares
    /// lifecycle state with the collection's records, so a provider built
    /// from the same collection observes the same singletons.
    pub fn build(&mut self) -> DiResult<ServiceProvider> {
        self.ensure_open()?;
        self.built = true;

        if self.records.is_empty() {
            log::warn!("building a service provider from an empty collection");
        }

        Ok(ServiceProvider::from_records(self.records.clone()))
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("services", &self.records.keys().collect::<Vec<_>>())
            .field("built", &self.built)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        let mut services = ServiceCollection::new();
        let err = services.add_singleton("   ", 1usize).unwrap_err();
        assert!(matches!(err, DiError::InvalidName(_)));
        assert!(services.is_empty());
    }

    #[test]
    fn duplicate_registration_replaces_and_keeps_position() {
        let mut services = ServiceCollection::new();
        services.add_singleton("A", 1usize).unwrap();
        services.add_singleton("B", 2usize).unwrap();
        services.add_singleton("A", 10usize).unwrap();

        assert_eq!(services.len(), 2);
        let names: Vec<String> = services.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, ["A", "B"]);

        let provider = services.build().unwrap();
        assert_eq!(*provider.get::<usize>("A").unwrap(), 10);
    }

    #[test]
    fn mutation_after_build_fails() {
        let mut services = ServiceCollection::new();
        services.add_singleton("A", 1usize).unwrap();
        let _provider = services.build().unwrap();

        assert!(matches!(
            services.add_singleton("B", 2usize),
            Err(DiError::AlreadyBuilt)
        ));
        assert!(matches!(services.remove("A"), Err(DiError::AlreadyBuilt)));
        assert!(matches!(services.clear(), Err(DiError::AlreadyBuilt)));
        assert!(matches!(services.build(), Err(DiError::AlreadyBuilt)));
    }

    #[test]
    fn remove_reports_presence() {
        let mut services = ServiceCollection::new();
        services.add_singleton("A", 1usize).unwrap();
        assert!(services.remove("A").unwrap());
        assert!(!services.remove("A").unwrap());
    }

    #[test]
    fn validate_reports_missing_dependency_and_cycle() {
        let mut services = ServiceCollection::new();
        services
            .add_singleton_factory::<usize, _, _>("A", ["B"], |_| Ok(1))
            .unwrap();
        services
            .add_singleton_factory::<usize, _, _>("B", ["A", "Ghost"], |_| Ok(2))
            .unwrap();

        let issues = services.validate();
        assert!(issues
            .iter()
            .any(|i| i == "Service 'B' depends on unregistered service 'Ghost'"));
        assert!(issues
            .iter()
            .any(|i| i == "Circular dependency detected: A -> B -> A"));
    }

    #[test]
    fn validate_flags_blank_record_names() {
        // Registration refuses blank names, so reach past it to the
        // registry to make sure validation re-checks them anyway.
        let mut services = ServiceCollection::new();
        let strategy = Arc::new(SingletonLifecycle::new());
        strategy
            .set_factory(Arc::new(|_| Ok(Arc::new(0usize) as Instance)))
            .unwrap();
        services.records.insert(
            "  ".to_string(),
            ServiceRecord::new("  ".to_string(), Vec::new(), strategy),
        );

        let issues = services.validate();
        assert_eq!(
            issues,
            ["Service '  ' has an invalid name (must be non-empty)"]
        );
    }

    #[test]
    fn provider_dependency_is_not_reported_missing() {
        let mut services = ServiceCollection::new();
        services
            .add_singleton_factory::<usize, _, _>("A", [ServiceProvider::SELF_KEY], |_| Ok(1))
            .unwrap();
        assert!(services.validate().is_empty());
    }
}
