//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the various error conditions that can occur during service
/// registration, resolution, or container operations in keyed-di.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{DiError, ServiceCollection};
///
/// // Example of NotFound error
/// let provider = ServiceCollection::new().build().unwrap();
/// match provider.get::<String>("Config") {
///     Err(DiError::NotFound(key)) => {
///         assert_eq!(key, "Config");
///         println!("Service not found: {}", key);
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use keyed_di::DiError;
///
/// let not_found = DiError::NotFound("Database".to_string());
/// let circular = DiError::Circular(vec![
///     "A".to_string(), "B".to_string(), "A".to_string(),
/// ]);
///
/// // All errors implement Display
/// println!("Error: {}", not_found);
/// println!("Error: {}", circular);
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Service name was empty or whitespace-only at registration time
    InvalidName(String),
    /// Mutation attempted after the collection was built
    AlreadyBuilt,
    /// Lifecycle used before a factory was configured
    NoFactory,
    /// Lifecycle strategy used after it was disposed
    DisposedLifecycle,
    /// Service record used after it was disposed (includes service name)
    DisposedService(String),
    /// Factory failed; carries the original error message
    CreationFailed(String),
    /// Service not registered under the requested key
    NotFound(String),
    /// Circular dependency detected at resolution time (includes path)
    Circular(Vec<String>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Resolution of a named service failed; wraps the underlying error
    /// once per recursion level so the message accumulates a readable trail
    ResolutionFailed {
        /// The service whose resolution failed
        service: String,
        /// The underlying error
        source: Box<DiError>,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::InvalidName(name) => {
                write!(f, "Invalid service name: '{}' (must be non-empty)", name)
            }
            DiError::AlreadyBuilt => {
                write!(f, "Service collection has already been built and can no longer be modified")
            }
            DiError::NoFactory => write!(f, "No factory registered for this lifecycle"),
            DiError::DisposedLifecycle => write!(f, "Lifecycle has been disposed"),
            DiError::DisposedService(name) => {
                write!(f, "Service '{}' has been disposed", name)
            }
            DiError::CreationFailed(msg) => write!(f, "Instance creation failed: {}", msg),
            DiError::NotFound(key) => write!(f, "Service not registered: '{}'", key),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max resolution depth {} exceeded", depth),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::ResolutionFailed { service, source } => {
                write!(f, "Failed to resolve service '{}': {}", service, source)
            }
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::ResolutionFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout keyed-di.
pub type DiResult<T> = Result<T, DiError>;
