//! # keyed-di
//!
//! A string-keyed dependency injection container with lifecycle-managed
//! scopes.
//!
//! Services are registered under string identifiers with one of three
//! lifetimes, then resolved through an immutable provider:
//!
//! - **Singleton**: one instance shared across the root provider and every
//!   derived scope
//! - **Scoped**: one instance per scope, disposed with the scope
//! - **Transient**: a fresh instance on every resolution
//!
//! ## Quick start
//!
//! ```rust
//! use keyed_di::{dep, ServiceCollection};
//! use std::sync::Arc;
//!
//! struct Config { url: String }
//! struct Database { config: Arc<Config> }
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_singleton("Config", Config { url: "postgres://localhost".into() })
//!     .unwrap()
//!     .add_scoped_factory("Database", ["Config"], |args| {
//!         Ok(Database { config: dep::<Config>(args, 0)? })
//!     })
//!     .unwrap();
//!
//! // Catch wiring mistakes before anything is constructed.
//! assert!(services.validate().is_empty());
//!
//! let provider = services.build().unwrap();
//! let scope = provider.start_scope().unwrap();
//!
//! let db = scope.get::<Database>("Database").unwrap();
//! assert_eq!(db.config.url, "postgres://localhost");
//!
//! scope.dispose();
//! ```
//!
//! ## Design
//!
//! The container splits into a mutable [`ServiceCollection`] and an
//! immutable [`ServiceProvider`]. Building seals the collection; every
//! later mutation fails with [`DiError::AlreadyBuilt`], so the set of
//! resolvable services is fixed for the provider's whole life.
//!
//! Dependencies are declared as ordered name lists and resolved one level
//! at a time, each factory receives only its own direct dependencies (or
//! the locator, when it declares none). Cycles are caught twice: eagerly
//! by [`ServiceCollection::validate`], which walks the declared graph, and
//! at resolution time by a per-thread guard that reports the exact
//! resolution path.
//!
//! Every provider also resolves itself under
//! [`ServiceProvider::SELF_KEY`], so factories can take the locator as a
//! dependency and participate in scoping naturally: a factory running
//! inside a scope receives that scope.
//!
//! ## Thread safety
//!
//! Collections are `&mut`-based single-writer; providers are `Send + Sync`
//! and cheap to clone. Factories never run while internal locks are held,
//! so factories may themselves resolve services.

#![warn(missing_docs)]

mod collection;
mod descriptors;
mod error;
mod internal;
mod lifetime;
mod provider;
mod record;
mod registration;

pub mod lifecycle;

pub use collection::ServiceCollection;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use lifecycle::{Disposer, FactoryError, Instance, ServiceFactory};
pub use lifetime::Lifetime;
pub use provider::{key_for, ServiceProvider};
pub use record::ServiceRecord;
pub use registration::{dep, Dispose, Registration};
