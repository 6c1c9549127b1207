//! The workspace symbol index.
//!
//! Name-keyed definitions and raw reference occurrences across all files.
//! References are deliberately unbound: no attempt is made to resolve which
//! definition an occurrence refers to (the index trades binding precision for
//! speed; see DESIGN.md).

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::TreeCache;
use crate::parser::symbols::{self, FileSymbols};

/// What kind of declaration produced a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Function,
    Method,
    /// A function-valued variable (`const f = () => …`).
    Variable,
}

/// A qualified definition: `Foo.bar` for methods, the bare name otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDefinition {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line: usize,
}

/// One occurrence of a bare identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReference {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
}

/// Definitions, references, and exported symbols for a whole workspace.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    definitions: HashMap<String, Vec<SymbolDefinition>>,
    references: HashMap<String, Vec<SymbolReference>>,
    exported: Vec<SymbolDefinition>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index over `files`.
    ///
    /// Extraction runs per file in parallel; the merge is serial and
    /// order-insensitive (duplicate `(file, line)` pairs per name collapse).
    pub fn index_all(&mut self, files: &[PathBuf], cache: &TreeCache) {
        self.clear();

        let extracted: Vec<FileSymbols> = files
            .par_iter()
            .filter_map(|file| {
                let tree = cache.get_tree(file, false)?;
                Some(symbols::extract_symbols(&tree, file))
            })
            .collect();

        let mut seen_defs: HashSet<(String, PathBuf, usize)> = HashSet::new();
        let mut seen_refs: HashSet<(String, PathBuf, usize)> = HashSet::new();
        let mut seen_exports: HashSet<(String, PathBuf, usize)> = HashSet::new();

        for file_symbols in extracted {
            for def in file_symbols.definitions {
                if seen_defs.insert((def.name.clone(), def.file.clone(), def.line)) {
                    self.definitions.entry(def.name.clone()).or_default().push(def);
                }
            }
            for reference in file_symbols.references {
                if seen_refs.insert((
                    reference.name.clone(),
                    reference.file.clone(),
                    reference.line,
                )) {
                    self.references
                        .entry(reference.name.clone())
                        .or_default()
                        .push(reference);
                }
            }
            for def in file_symbols.exported {
                if seen_exports.insert((def.name.clone(), def.file.clone(), def.line)) {
                    self.exported.push(def);
                }
            }
        }

        self.exported.sort_by(|a, b| {
            (&a.file, a.line, &a.name).cmp(&(&b.file, b.line, &b.name))
        });

        debug!(
            definitions = self.definition_count(),
            references = self.reference_count(),
            exported = self.exported.len(),
            "symbol index rebuilt"
        );
    }

    /// First recorded definition for `name`, if any.
    pub fn get_definition(&self, name: &str) -> Option<&SymbolDefinition> {
        self.definitions.get(name).and_then(|defs| defs.first())
    }

    /// All recorded definitions for `name`.
    pub fn definitions(&self, name: &str) -> &[SymbolDefinition] {
        self.definitions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All occurrences of the bare identifier `name`.
    pub fn find_references(&self, name: &str) -> &[SymbolReference] {
        self.references.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Export-marked definitions, ordered by (file, line).
    pub fn exported(&self) -> &[SymbolDefinition] {
        &self.exported
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.values().map(Vec::len).sum()
    }

    pub fn reference_count(&self) -> usize {
        self.references.values().map(Vec::len).sum()
    }

    /// Drop all index state; used at session boundaries.
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.references.clear();
        self.exported.clear();
    }
}
