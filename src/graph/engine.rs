//! The dependency graph store.
//!
//! Two adjacency maps held as mirror images: `forward` (file → files it
//! imports) and `reverse` (file → files importing it). Both are rebuilt
//! together in one merge pass and never mutated independently, so the mirror
//! property holds by construction.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::resolver::normalize_path;

/// Forward/reverse import adjacency over workspace files.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    forward: HashMap<PathBuf, BTreeSet<PathBuf>>,
    reverse: HashMap<PathBuf, BTreeSet<PathBuf>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the graph contents from per-file edge sets.
    ///
    /// This is the single serial merge step: workers produce `(file, targets)`
    /// pairs purely, and both maps are built here so they cannot diverge.
    pub fn rebuild(&mut self, edges: Vec<(PathBuf, BTreeSet<PathBuf>)>) {
        self.forward.clear();
        self.reverse.clear();

        let mut edge_count = 0usize;
        for (file, targets) in edges {
            for target in &targets {
                self.reverse
                    .entry(target.clone())
                    .or_default()
                    .insert(file.clone());
            }
            edge_count += targets.len();
            self.forward.insert(file, targets);
        }

        debug!(
            files = self.forward.len(),
            edges = edge_count,
            "dependency graph rebuilt"
        );
    }

    /// Files importing `path` (reverse edges), sorted.
    pub fn get_dependents(&self, path: &Path) -> Vec<PathBuf> {
        let normalized = normalize_path(path);
        self.reverse
            .get(&normalized)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Files `path` imports (forward edges), sorted.
    pub fn get_dependencies(&self, path: &Path) -> Vec<PathBuf> {
        let normalized = normalize_path(path);
        self.forward
            .get(&normalized)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All files that took part in the build, sorted.
    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files: Vec<&PathBuf> = self.forward.keys().collect();
        files.sort();
        files
    }

    pub fn file_count(&self) -> usize {
        self.forward.len()
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Drop all edges; used at session boundaries.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Cycles over the forward map. `excluded` names path components (e.g.
    /// `node_modules`) whose files are skipped as roots and targets.
    pub fn detect_cycles(&self, excluded: &[String]) -> Vec<Vec<PathBuf>> {
        super::cycles::detect(&self.forward, excluded)
    }

    pub(crate) fn forward_map(&self) -> &HashMap<PathBuf, BTreeSet<PathBuf>> {
        &self.forward
    }

    pub(crate) fn reverse_map(&self) -> &HashMap<PathBuf, BTreeSet<PathBuf>> {
        &self.reverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, &[&str])]) -> Vec<(PathBuf, BTreeSet<PathBuf>)> {
        pairs
            .iter()
            .map(|(file, targets)| {
                (
                    PathBuf::from(file),
                    targets.iter().map(PathBuf::from).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn mirror_invariant_holds() {
        let mut graph = DependencyGraph::new();
        graph.rebuild(edges(&[
            ("a.ts", &["b.ts", "c.ts"]),
            ("b.ts", &["c.ts"]),
            ("c.ts", &[]),
        ]));

        for (file, targets) in graph.forward_map() {
            for target in targets {
                assert!(
                    graph.reverse_map()[target].contains(file),
                    "forward edge {} -> {} missing from reverse",
                    file.display(),
                    target.display()
                );
            }
        }
        for (target, sources) in graph.reverse_map() {
            for source in sources {
                assert!(
                    graph.forward_map()[source].contains(target),
                    "reverse edge {} <- {} missing from forward",
                    target.display(),
                    source.display()
                );
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let input = edges(&[("a.ts", &["b.ts"]), ("b.ts", &[])]);

        let mut first = DependencyGraph::new();
        first.rebuild(input.clone());
        let mut second = DependencyGraph::new();
        second.rebuild(input.clone());
        second.rebuild(input);

        assert_eq!(first.forward_map(), second.forward_map());
        assert_eq!(first.reverse_map(), second.reverse_map());
    }

    #[test]
    fn dependents_of_unknown_file_is_empty() {
        let graph = DependencyGraph::new();
        assert!(graph.get_dependents(Path::new("nope.ts")).is_empty());
    }

    #[test]
    fn dependents_normalize_the_query_path() {
        let mut graph = DependencyGraph::new();
        graph.rebuild(edges(&[("src/a.ts", &["src/b.ts"])]));

        let dependents = graph.get_dependents(Path::new("src/sub/../b.ts"));
        assert_eq!(dependents, vec![PathBuf::from("src/a.ts")]);
    }

    #[test]
    fn counts() {
        let mut graph = DependencyGraph::new();
        graph.rebuild(edges(&[("a.ts", &["b.ts", "c.ts"]), ("b.ts", &[])]));
        assert_eq!(graph.file_count(), 2);
        assert_eq!(graph.edge_count(), 2);

        graph.clear();
        assert!(graph.is_empty());
    }
}
