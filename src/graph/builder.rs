//! Parallel graph construction.
//!
//! Each worker extracts one file's resolved import edges purely; the merge
//! into the mirrored maps happens in a single serial step afterwards, so no
//! per-insert synchronization is needed.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use super::engine::DependencyGraph;
use crate::cache::TreeCache;
use crate::parser::imports;
use crate::resolver::PathResolver;

/// Build the graph over `files`.
///
/// `known_files` is the membership set the resolver probes against, normally
/// the same enumeration `files` came from. Files that fail to parse simply
/// contribute an empty edge set.
pub fn build(
    graph: &mut DependencyGraph,
    files: &[PathBuf],
    cache: &TreeCache,
    resolver: &PathResolver,
    known_files: &HashSet<PathBuf>,
) {
    let edges: Vec<(PathBuf, BTreeSet<PathBuf>)> = files
        .par_iter()
        .map(|file| (file.clone(), extract_edges(file, cache, resolver, known_files)))
        .collect();

    debug!(file_count = edges.len(), "merging extracted edges");
    graph.rebuild(edges);
}

/// Resolved, deduplicated forward edges of one file.
fn extract_edges(
    file: &Path,
    cache: &TreeCache,
    resolver: &PathResolver,
    known_files: &HashSet<PathBuf>,
) -> BTreeSet<PathBuf> {
    let mut targets = BTreeSet::new();

    let Some(tree) = cache.get_tree(file, false) else {
        return targets;
    };
    let Some(dir) = file.parent() else {
        return targets;
    };

    for import in imports::extract_imports(&tree) {
        if let Some(resolved) = resolver.resolve(dir, &import.specifier, known_files, Some(file)) {
            // Self-imports carry no structural information.
            if resolved != file {
                targets.insert(resolved);
            }
        }
    }

    targets
}
