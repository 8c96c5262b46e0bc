//! The registration input shape shared by every front-end.
//!
//! A [`Registration`] binds a service identifier to a factory, a lifetime,
//! an ordered dependency-name list, and an optional disposal hook. The
//! fluent helpers on [`ServiceCollection`](crate::ServiceCollection) are thin
//! adapters that all produce this same shape, so the registry and lifecycle
//! logic exist exactly once.

use std::sync::Arc;

use crate::lifecycle::{Disposer, FactoryError, Instance, ServiceFactory};
use crate::lifetime::Lifetime;
use crate::provider::ServiceProvider;

/// Optional disposal capability for service instances.
///
/// Scoped services whose instances hold releasable resources implement this
/// trait and attach it at registration time with
/// [`Registration::dispose_with`]. The hook runs when the owning scope is
/// disposed; a returned error is logged and swallowed so one failing
/// disposal never blocks sibling disposals.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{Dispose, FactoryError};
///
/// struct Connection {
///     id: u32,
/// }
///
/// impl Dispose for Connection {
///     fn dispose(&self) -> Result<(), FactoryError> {
///         println!("closing connection {}", self.id);
///         Ok(())
///     }
/// }
/// ```
pub trait Dispose: Send + Sync {
    /// Releases the resources held by this instance.
    fn dispose(&self) -> Result<(), FactoryError>;
}

/// A request to bind a service identifier to a construction recipe.
///
/// Three forms cover every front-end:
/// - [`Registration::factory`]: a constructor-like factory receiving its
///   resolved dependencies positionally,
/// - [`Registration::with_resolver`]: a factory receiving the locator,
/// - [`Registration::instance`]: a pre-built value (a zero-argument
///   factory returning that value).
///
/// # Examples
///
/// ```rust
/// use keyed_di::{dep, Registration, ServiceCollection, Lifetime};
/// use std::sync::Arc;
///
/// struct Logger;
/// struct Db { logger: Arc<Logger> }
///
/// let mut services = ServiceCollection::new();
/// services.register(Registration::instance("Logger", Lifetime::Singleton, Logger)).unwrap();
/// services.register(Registration::factory(
///     "Db",
///     Lifetime::Scoped,
///     ["Logger"],
///     |args| Ok(Db { logger: dep::<Logger>(args, 0)? }),
/// )).unwrap();
///
/// let provider = services.build().unwrap();
/// let db = provider.get::<Db>("Db").unwrap();
/// ```
pub struct Registration {
    pub(crate) name: String,
    pub(crate) lifetime: Lifetime,
    pub(crate) dependencies: Vec<String>,
    pub(crate) factory: ServiceFactory,
    pub(crate) disposer: Option<Disposer>,
}

impl Registration {
    /// Binds a constructor-like factory plus an ordered dependency-name
    /// list.
    ///
    /// The factory receives the resolved dependencies in declaration order;
    /// [`dep`] recovers each one positionally.
    pub fn factory<T, D, F>(
        name: impl Into<String>,
        lifetime: Lifetime,
        dependencies: D,
        factory: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        D: IntoIterator,
        D::Item: Into<String>,
        F: Fn(&[Instance]) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            lifetime,
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            factory: Arc::new(move |args| Ok(Arc::new(factory(args)?) as Instance)),
            disposer: None,
        }
    }

    /// Binds a factory that receives the locator and resolves its own
    /// dependencies.
    ///
    /// The dependency list is left empty, so the record passes the locator
    /// as the factory's sole argument.
    pub fn with_resolver<T, F>(name: impl Into<String>, lifetime: Lifetime, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        let ctor = move |args: &[Instance]| -> Result<Instance, FactoryError> {
            let locator = args
                .first()
                .and_then(|a| a.clone().downcast::<ServiceProvider>().ok())
                .ok_or("resolver factory expected the locator as its only argument")?;
            Ok(Arc::new(factory(&locator)?) as Instance)
        };
        Self {
            name: name.into(),
            lifetime,
            dependencies: Vec::new(),
            factory: Arc::new(ctor),
            disposer: None,
        }
    }

    /// Binds a pre-built instance, treated as a zero-argument factory
    /// returning that instance.
    pub fn instance<T: Send + Sync + 'static>(
        name: impl Into<String>,
        lifetime: Lifetime,
        value: T,
    ) -> Self {
        let shared: Instance = Arc::new(value);
        Self {
            name: name.into(),
            lifetime,
            dependencies: Vec::new(),
            factory: Arc::new(move |_| Ok(shared.clone())),
            disposer: None,
        }
    }

    /// Attaches the [`Dispose`] capability of `T` as this registration's
    /// disposal hook.
    ///
    /// Only meaningful for Scoped registrations: Singleton disposal is a
    /// no-op and Transient lifecycles hold no instances to dispose.
    pub fn dispose_with<T: Dispose + 'static>(mut self) -> Self {
        self.disposer = Some(Arc::new(|instance: &Instance| {
            match instance.downcast_ref::<T>() {
                Some(value) => value.dispose(),
                None => Ok(()),
            }
        }));
        self
    }

    /// Attaches a raw disposal hook receiving the cached instance.
    pub fn disposer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> Result<(), FactoryError> + Send + Sync + 'static,
    {
        self.disposer = Some(Arc::new(f));
        self
    }

    /// The service identifier this registration binds.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lifetime selected for this registration.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

/// Recovers the dependency at `index` from a factory's argument slice.
///
/// Fails when the slot is missing or holds a different type; both cases
/// surface as `CreationFailed` on the resolving service, naming the
/// expected type.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{dep, Instance, FactoryError};
/// use std::sync::Arc;
///
/// let args: Vec<Instance> = vec![Arc::new(42usize)];
/// let value = dep::<usize>(&args, 0).unwrap();
/// assert_eq!(*value, 42);
/// ```
pub fn dep<T: Send + Sync + 'static>(
    args: &[Instance],
    index: usize,
) -> Result<Arc<T>, FactoryError> {
    let instance = args.get(index).cloned().ok_or_else(|| {
        format!(
            "missing dependency argument {} (expected {})",
            index,
            std::any::type_name::<T>()
        )
    })?;
    instance
        .downcast::<T>()
        .map_err(|_| format!("dependency argument {} is not a {}", index, std::any::type_name::<T>()).into())
}
