//! Service provider, the resolving half of the container.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionGuard;
use crate::lifecycle::Instance;
use crate::record::ServiceRecord;

/// Shortens a full type path to its final segment for use as a service key.
///
/// Generic parameters are stripped, so `Vec<String>` keys as `Vec`.
///
/// # Examples
///
/// ```rust
/// use keyed_di::key_for;
///
/// struct Database;
///
/// assert_eq!(key_for::<Database>(), "Database");
/// assert_eq!(key_for::<Vec<String>>(), "Vec");
/// ```
pub fn key_for<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Resolves services from a sealed registry snapshot.
///
/// A provider is cheaply cloneable (clones share the same records) and is
/// itself resolvable under [`ServiceProvider::SELF_KEY`], so factories can
/// receive the locator and resolve further services on demand.
///
/// Each provider owns one level of the scope tree:
/// [`start_scope`](Self::start_scope) derives a child provider in which scoped services
/// get fresh per-scope slots, transients stay transient, and singletons
/// remain shared with the root. [`dispose`](Self::dispose) tears down the
/// provider's records; singleton state survives because singleton
/// disposal is a no-op.
///
/// # Examples
///
/// ```rust
/// use keyed_di::ServiceCollection;
/// use std::sync::Arc;
///
/// struct Session;
///
/// let mut services = ServiceCollection::new();
/// services
///     .add_scoped_factory::<Session, [&str; 0], _>("Session", [], |_| Ok(Session))
///     .unwrap();
/// let provider = services.build().unwrap();
///
/// let scope_a = provider.start_scope().unwrap();
/// let scope_b = provider.start_scope().unwrap();
///
/// let a = scope_a.get::<Session>("Session").unwrap();
/// let b = scope_b.get::<Session>("Session").unwrap();
/// assert!(!Arc::ptr_eq(&a, &b)); // One session per scope
///
/// scope_a.dispose();
/// assert!(scope_a.get::<Session>("Session").is_err());
/// assert!(scope_b.get::<Session>("Session").is_ok());
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    records: IndexMap<String, ServiceRecord>,
}

impl ServiceProvider {
    /// The reserved key under which every provider resolves itself.
    ///
    /// Never stored in the registry; resolving it returns a clone of the
    /// provider handling the request, so scoped factories receive the
    /// scope they live in, not the root. Each lookup allocates a fresh
    /// handle, so two resolutions of this key share all provider state
    /// but are not `Arc::ptr_eq`.
    pub const SELF_KEY: &'static str = "ServiceProvider";

    pub(crate) fn from_records(records: IndexMap<String, ServiceRecord>) -> Self {
        Self {
            inner: Arc::new(ProviderInner { records }),
        }
    }

    /// Resolves the service under `key` as a type-erased instance.
    ///
    /// Errors from inside the dependency chain are wrapped once per level
    /// into [`DiError::ResolutionFailed`], so the message reads as a trail
    /// from the requested service down to the root cause. A missing
    /// top-level key stays an unwrapped [`DiError::NotFound`].
    pub fn get_raw(&self, key: &str) -> DiResult<Instance> {
        if key == Self::SELF_KEY {
            return Ok(Arc::new(self.clone()) as Instance);
        }

        let record = self
            .inner
            .records
            .get(key)
            .ok_or_else(|| DiError::NotFound(key.to_string()))?;

        let _guard = ResolutionGuard::enter(key)?;
        record.resolve(self).map_err(|e| DiError::ResolutionFailed {
            service: key.to_string(),
            source: Box::new(e),
        })
    }

    /// Resolves the service under `key` and downcasts it to `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_di::{DiError, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton("Port", 8080u16).unwrap();
    /// let provider = services.build().unwrap();
    ///
    /// assert_eq!(*provider.get::<u16>("Port").unwrap(), 8080);
    /// assert!(matches!(
    ///     provider.get::<String>("Port"),
    ///     Err(DiError::TypeMismatch(_))
    /// ));
    /// ```
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> DiResult<Arc<T>> {
        self.get_raw(key)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves `T` registered under its own type name (see [`key_for`]).
    pub fn get_of<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.get::<T>(key_for::<T>())
    }

    /// Whether a service is registered under `key`.
    ///
    /// [`SELF_KEY`](Self::SELF_KEY) always reports `true`.
    pub fn contains(&self, key: &str) -> bool {
        key == Self::SELF_KEY || self.inner.records.contains_key(key)
    }

    /// Snapshots every registration, in registration order.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .records
            .values()
            .map(ServiceDescriptor::from_record)
            .collect()
    }

    /// Derives a child provider with fresh scoped slots.
    ///
    /// Singleton records are carried over by identity, scoped and
    /// transient records get fresh strategies sharing the registered
    /// factories. Fails if any record was already disposed.
    pub fn start_scope(&self) -> DiResult<ServiceProvider> {
        let mut records = IndexMap::with_capacity(self.inner.records.len());
        for (name, record) in &self.inner.records {
            records.insert(name.clone(), record.create_scope()?);
        }
        Ok(ServiceProvider::from_records(records))
    }

    /// Disposes every record owned by this provider, in registration
    /// order. Idempotent.
    ///
    /// Scoped records run their disposal hooks (failures are logged and
    /// swallowed); singleton records are unaffected, so sibling and
    /// parent providers keep working. Resolving through a disposed
    /// provider fails with [`DiError::DisposedService`].
    pub fn dispose(&self) {
        for record in self.inner.records.values() {
            record.dispose();
        }
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("services", &self.inner.records.keys().collect::<Vec<_>>())
            .finish()
    }
}
