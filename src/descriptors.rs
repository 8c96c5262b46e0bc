//! Read-only snapshots of the registry for diagnostics and tooling.

use crate::lifetime::Lifetime;
use crate::record::ServiceRecord;

/// A point-in-time description of one registration.
///
/// Descriptors carry no factories or cached instances; they are safe to
/// log, compare, and hand to tooling that inspects what a collection or
/// provider knows about.
///
/// # Examples
///
/// ```rust
/// use keyed_di::{ServiceCollection, Lifetime};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton("Config", "production".to_string()).unwrap();
///
/// let descriptors = services.descriptors();
/// assert_eq!(descriptors.len(), 1);
/// assert_eq!(descriptors[0].name, "Config");
/// assert_eq!(descriptors[0].lifetime, Some(Lifetime::Singleton));
/// assert!(descriptors[0].dependencies.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The service identifier.
    pub name: String,
    /// The registered lifetime, or `None` once the record is disposed.
    pub lifetime: Option<Lifetime>,
    /// Declared dependency names, in factory-argument order.
    pub dependencies: Vec<String>,
    /// Whether the underlying record has been disposed.
    pub disposed: bool,
}

impl ServiceDescriptor {
    pub(crate) fn from_record(record: &ServiceRecord) -> Self {
        Self {
            name: record.name().to_string(),
            lifetime: record.lifetime(),
            dependencies: record.dependencies().to_vec(),
            disposed: record.is_disposed(),
        }
    }
}

impl std::fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lifetime {
            Some(lifetime) => write!(f, "{} [{}]", self.name, lifetime)?,
            None => write!(f, "{} [disposed]", self.name)?,
        }
        if !self.dependencies.is_empty() {
            write!(f, " -> {}", self.dependencies.join(", "))?;
        }
        Ok(())
    }
}
