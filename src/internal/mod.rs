//! Internal support modules.

mod circular;
mod graph;

pub(crate) use circular::ResolutionGuard;
pub(crate) use graph::DependencyGraph;
