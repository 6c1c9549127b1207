//! # Seismic
//!
//! Workspace dependency graph and symbol index for incremental code analysis.
//!
//! Seismic scans a JS/TS workspace once and answers the two questions
//! higher-level tooling keeps asking: *which files does this file affect
//! (and which affect it)?* and *where is this symbol defined or used?*
//!
//! ## Key Features
//!
//! - **Mirrored import graph**: forward and reverse adjacency built together,
//!   so dependents queries are O(1) lookups
//! - **Real resolution**: tsconfig/package.json aliases, extension elision,
//!   and `index` file conventions
//! - **Parallel scans**: per-file extraction fans out over a worker pool,
//!   merge stays serial and deterministic
//! - **Incremental**: feed a changed-file set, get back everything stale
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seismic::AnalysisSession;
//!
//! let mut session = AnalysisSession::open(".").unwrap();
//! let summary = session.scan().unwrap();
//! println!("{} files, {} edges", summary.file_count, summary.edge_count);
//!
//! // Who breaks if utils.ts changes?
//! let changed = [std::path::PathBuf::from("src/utils.ts")].into_iter().collect();
//! let stale = session.affected_set(&changed);
//!
//! // Structural findings.
//! let cycles = session.detect_cycles();
//! let dead = session.dead_exports();
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod parser;
pub mod resolver;
pub mod session;
pub mod workspace;

// Re-exports for convenience
pub use error::{Result, SeismicError};

pub use analysis::{affected_set, dead_exports, orphans, DeadExport};
pub use cache::TreeCache;
pub use config::Config;
pub use graph::DependencyGraph;
pub use index::{SymbolDefinition, SymbolIndex, SymbolKind, SymbolReference};
pub use parser::SupportedLanguage;
pub use resolver::PathResolver;
pub use session::{AnalysisSession, ScanSummary};
