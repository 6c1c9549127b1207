//! Per-session analysis state.
//!
//! An `AnalysisSession` owns every piece of mutable state (tree cache, path
//! resolver memos, dependency graph, symbol index) so nothing leaks between
//! independent analysis runs. Drop the session (or call `clear`) and the
//! slate is clean.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{self, DeadExport};
use crate::cache::TreeCache;
use crate::config::Config;
use crate::error::Result;
use crate::graph::{builder, DependencyGraph};
use crate::index::SymbolIndex;
use crate::resolver::PathResolver;
use crate::workspace;

/// Counters describing one completed scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    pub file_count: usize,
    pub edge_count: usize,
    pub definition_count: usize,
    pub reference_count: usize,
    pub exported_count: usize,
}

/// One workspace analysis session.
pub struct AnalysisSession {
    root: PathBuf,
    config: Config,
    cache: TreeCache,
    resolver: PathResolver,
    graph: DependencyGraph,
    index: SymbolIndex,
    known_files: HashSet<PathBuf>,
    pool: rayon::ThreadPool,
}

impl AnalysisSession {
    /// Open a session over `root`, reading `seismic.toml` when present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root: PathBuf = root.into();
        let root = root.canonicalize().unwrap_or(root);
        let config = Config::load(&root)?;
        Self::with_config(root, config)
    }

    /// Open a session with an explicit configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Result<Self> {
        // One worker per core, minus one for the caller.
        let workers = thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1).max(1))
            .unwrap_or(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;

        Ok(Self {
            root: root.into(),
            config,
            cache: TreeCache::new(),
            resolver: PathResolver::new(),
            graph: DependencyGraph::new(),
            index: SymbolIndex::new(),
            known_files: HashSet::new(),
            pool,
        })
    }

    /// Enumerate the workspace and rebuild graph and index wholesale.
    pub fn scan(&mut self) -> Result<ScanSummary> {
        let files = workspace::list_files(&self.root, &self.config.include, &self.config.exclude)?;
        self.known_files = files.iter().cloned().collect();

        let Self {
            graph,
            index,
            cache,
            resolver,
            known_files,
            pool,
            ..
        } = self;

        pool.install(|| {
            builder::build(graph, &files, cache, resolver, known_files);
            index.index_all(&files, cache);
        });

        let summary = ScanSummary {
            file_count: self.graph.file_count(),
            edge_count: self.graph.edge_count(),
            definition_count: self.index.definition_count(),
            reference_count: self.index.reference_count(),
            exported_count: self.index.exported().len(),
        };
        info!(
            root = %self.root.display(),
            files = summary.file_count,
            edges = summary.edge_count,
            definitions = summary.definition_count,
            "workspace scan complete"
        );
        Ok(summary)
    }

    /// Files whose analysis is stale after `changed` changed.
    pub fn affected_set(&self, changed: &HashSet<PathBuf>) -> HashSet<PathBuf> {
        analysis::affected_set(&self.graph, changed)
    }

    /// Circular imports, skipping vendored library paths from the config.
    pub fn detect_cycles(&self) -> Vec<Vec<PathBuf>> {
        self.graph.detect_cycles(&self.config.library_paths)
    }

    /// Exported symbols no dependent file appears to use.
    pub fn dead_exports(&self) -> Vec<DeadExport> {
        analysis::dead_exports(&self.graph, &self.index)
    }

    /// Files nothing imports, minus configured entry points.
    pub fn orphans(&self) -> Vec<PathBuf> {
        analysis::orphans(&self.graph, &self.config)
    }

    /// Drop every piece of session state: cached trees, resolver memos,
    /// graph, index. Required between independent analysis runs.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.resolver.clear();
        self.graph.clear();
        self.index.clear();
        self.known_files.clear();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }
}
