//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// Defines how service instances are created, cached, and shared within
/// the dependency injection container.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{ServiceCollection, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: one instance for the entire application
/// services.add_singleton("Database", Database {
///     url: "postgres://localhost".to_string(),
/// }).unwrap();
///
/// let provider = services.build().unwrap();
///
/// let db1 = provider.get::<Database>("Database").unwrap();
/// let scope = provider.start_scope().unwrap();
/// let db2 = scope.get::<Database>("Database").unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2)); // Same instance across scopes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance shared across the root provider and every derived
    /// scope, created lazily on first resolution and never disposed by
    /// scope teardown
    Singleton,
    /// Single instance per scope; each `start_scope()` call gets a fresh
    /// empty slot, and disposal clears it
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "Singleton"),
            Lifetime::Scoped => write!(f, "Scoped"),
            Lifetime::Transient => write!(f, "Transient"),
        }
    }
}
