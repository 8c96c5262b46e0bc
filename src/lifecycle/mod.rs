//! Lifecycle strategies controlling instance caching per service.
//!
//! Each registered service owns one strategy implementing
//! [`LifecycleStrategy`]: [`SingletonLifecycle`], [`ScopedLifecycle`], or
//! [`TransientLifecycle`]. A strategy holds the service's factory and applies
//! its caching policy when asked for an instance; deriving a scope maps every
//! strategy through [`LifecycleStrategy::create_scope`].

use std::any::Any;
use std::sync::Arc;

use crate::error::DiResult;
use crate::lifetime::Lifetime;

mod scoped;
mod singleton;
mod transient;

pub use scoped::ScopedLifecycle;
pub use singleton::SingletonLifecycle;
pub use transient::TransientLifecycle;

/// Type-erased service instance shared by reference.
///
/// Concrete instances are stored as `Arc<T>` coerced to `Arc<dyn Any>`;
/// consumers recover the concrete type with `Arc::downcast` (see
/// [`crate::dep`] and [`crate::ServiceProvider::get`]).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Error type produced by user factories and disposers.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Construction recipe for a service.
///
/// Receives the service's resolved dependencies in declaration order, or the
/// locator itself as the sole argument when the dependency list is empty.
pub type ServiceFactory =
    Arc<dyn Fn(&[Instance]) -> Result<Instance, FactoryError> + Send + Sync>;

/// Cleanup hook invoked against a cached instance on scope disposal.
pub type Disposer = Arc<dyn Fn(&Instance) -> Result<(), FactoryError> + Send + Sync>;

/// Instance caching policy for one service registration.
///
/// All strategies share the same capability set; they differ only in how
/// instances are cached and what scope derivation and disposal mean:
///
/// | | cache | `create_scope` | `dispose` |
/// |---|---|---|---|
/// | Singleton | one instance, process-wide | returns itself | no-op |
/// | Scoped | one instance per scope | fresh empty slot, same factory | clears instance, terminal |
/// | Transient | none | fresh strategy, same factory | drops factory, terminal |
pub trait LifecycleStrategy: Send + Sync {
    /// The lifetime variant this strategy implements.
    fn lifetime(&self) -> Lifetime;

    /// Installs the construction recipe.
    ///
    /// Must be called before the first [`get_instance`](Self::get_instance);
    /// fails with [`DiError::DisposedLifecycle`](crate::DiError) on a
    /// disposed strategy.
    fn set_factory(&self, factory: ServiceFactory) -> DiResult<()>;

    /// Returns a cached or freshly constructed instance.
    ///
    /// For Singleton and Scoped, `args` are used only on the first
    /// invocation and silently ignored thereafter; callers must not rely on
    /// later-call arguments. Factory failures are wrapped into
    /// [`DiError::CreationFailed`](crate::DiError) and leave the cache slot
    /// empty so a retry is possible.
    fn get_instance(&self, args: &[Instance]) -> DiResult<Instance>;

    /// Derives the strategy a new scope should use for this service.
    ///
    /// Singleton returns itself (identity, guaranteeing process-wide
    /// sharing); Scoped and Transient return a fresh strategy pre-loaded
    /// with the same factory.
    fn create_scope(self: Arc<Self>) -> DiResult<Arc<dyn LifecycleStrategy>>;

    /// Releases the strategy's state.
    ///
    /// A no-op for Singleton. Scoped runs its disposer against the cached
    /// instance, logging (never propagating) failures. Idempotent.
    fn dispose(&self);

    /// Whether the strategy has been disposed. Always `false` for Singleton.
    fn is_disposed(&self) -> bool;
}
