//! Dependency graph construction and cycle scanning for validation.

use std::collections::HashSet;

use indexmap::IndexMap;

/// Directed graph of service name -> declared dependency names.
pub(crate) struct DependencyGraph {
    adjacency: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub(crate) fn new<N, D, I>(nodes: I) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = (N, Vec<D>)>,
    {
        let adjacency = nodes
            .into_iter()
            .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
            .collect();
        Self { adjacency }
    }

    /// Finds every dependency cycle via depth-first traversal.
    ///
    /// Each reported path is the suffix of the traversal path starting at
    /// the first occurrence of the repeated node, with that node appended
    /// again at the end: `A -> B -> C -> A` yields `[A, B, C, A]` and a
    /// self-dependency yields `[X, X]`. Dependency names not present in the
    /// graph are dangling registrations, reported elsewhere as missing
    /// dependencies, and are not traversed here. Each cycle is reported
    /// once per scan.
    pub(crate) fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for name in self.adjacency.keys() {
            if !visited.contains(name.as_str()) {
                self.dfs(name, &mut visited, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs(
        &self,
        current: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        if let Some(start) = path.iter().position(|n| n == current) {
            let mut cycle: Vec<String> = path[start..].to_vec();
            cycle.push(current.to_string());
            cycles.push(cycle);
            return;
        }

        if visited.contains(current) {
            return;
        }

        visited.insert(current.to_string());
        path.push(current.to_string());

        if let Some(deps) = self.adjacency.get(current) {
            for dep in deps {
                if self.adjacency.contains_key(dep.as_str()) {
                    self.dfs(dep, visited, path, cycles);
                }
            }
        }

        path.pop();
    }
}
