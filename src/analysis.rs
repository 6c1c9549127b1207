//! Analyses built on the graph and index: affected-set propagation,
//! dead-export detection, and orphan detection. These return data, never
//! errors; a cycle or a dead symbol is a finding, not a failure.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::graph::DependencyGraph;
use crate::index::{SymbolDefinition, SymbolIndex};

/// The closure of `changed` under reverse-dependency reachability: every file
/// whose analysis results may be stale after those files changed.
///
/// Standard worklist BFS; the visited set doubles as the result and guards
/// against cyclic graphs.
pub fn affected_set(graph: &DependencyGraph, changed: &HashSet<PathBuf>) -> HashSet<PathBuf> {
    let mut affected: HashSet<PathBuf> = changed.clone();
    let mut queue: VecDeque<PathBuf> = changed.iter().cloned().collect();

    while let Some(file) = queue.pop_front() {
        for dependent in graph.get_dependents(&file) {
            if affected.insert(dependent.clone()) {
                queue.push_back(dependent);
            }
        }
    }

    affected
}

/// An exported symbol no dependent file appears to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadExport {
    pub symbol: SymbolDefinition,
    /// How many files import the defining file at all.
    pub dependent_count: usize,
}

/// Exported definitions whose bare name (the last `.`-qualified segment)
/// occurs in no file that imports the defining file.
///
/// Name-based on purpose: shadowed identifiers count as uses and unrelated
/// same-named symbols mask each other. That trade is inherited from the
/// reference index itself.
pub fn dead_exports(graph: &DependencyGraph, index: &SymbolIndex) -> Vec<DeadExport> {
    let mut dead = Vec::new();

    for def in index.exported() {
        let bare = def.name.rsplit('.').next().unwrap_or(&def.name);
        let dependents: HashSet<PathBuf> = graph.get_dependents(&def.file).into_iter().collect();

        let used = index
            .find_references(bare)
            .iter()
            .any(|r| dependents.contains(&r.file));

        if !used {
            dead.push(DeadExport {
                symbol: def.clone(),
                dependent_count: dependents.len(),
            });
        }
    }

    dead
}

/// Files nothing imports, minus designated entry points.
pub fn orphans(graph: &DependencyGraph, config: &Config) -> Vec<PathBuf> {
    graph
        .files()
        .into_iter()
        .filter(|file| graph.get_dependents(file).is_empty())
        .filter(|file| {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            !config.is_entry_point(&name)
        })
        .cloned()
        .collect()
}
