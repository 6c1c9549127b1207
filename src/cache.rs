//! Parse memoization keyed by file modification time.
//!
//! One cache instance belongs to one analysis session; there is no global
//! state. Entries are shared as `Arc<ParsedTree>` so parallel workers hold
//! trees without copying them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use tracing::trace;

use crate::parser::{self, ParsedTree, SupportedLanguage};

struct CacheEntry {
    mtime: SystemTime,
    tree: Arc<ParsedTree>,
}

/// Memoized parsed trees, one entry per absolute path.
///
/// A lookup returns the cached tree only while the file's mtime matches the
/// stored one; any mismatch evicts and re-parses. All failure modes (missing
/// file, unreadable content, empty content, unsupported extension, parse
/// failure) come back as `None`, meaning "no analysis available for this file".
#[derive(Default)]
pub struct TreeCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl TreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the parsed tree for `path`, re-parsing when the file changed on
    /// disk or `force` is set.
    pub fn get_tree(&self, path: &Path, force: bool) -> Option<Arc<ParsedTree>> {
        let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(_) => {
                self.evict(path);
                return None;
            }
        };

        if !force {
            if let Ok(entries) = self.entries.lock() {
                if let Some(entry) = entries.get(path) {
                    if entry.mtime == mtime {
                        trace!(file = %path.display(), "tree cache hit");
                        return Some(entry.tree.clone());
                    }
                }
            }
        }

        let parsed = self.parse(path)?;
        let tree = Arc::new(parsed);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                path.to_path_buf(),
                CacheEntry {
                    mtime,
                    tree: tree.clone(),
                },
            );
        }
        Some(tree)
    }

    /// Drop every cached entry. Sessions call this at their boundaries so no
    /// tree survives into an unrelated analysis run.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of live entries, for summaries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse(&self, path: &Path) -> Option<ParsedTree> {
        let language = SupportedLanguage::from_path(path)?;
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => {
                self.evict(path);
                return None;
            }
        };
        // Empty files carry no structure worth indexing.
        if source.trim().is_empty() {
            self.evict(path);
            return None;
        }
        parser::parse_source(language, source)
    }

    fn evict(&self, path: &Path) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(path);
        }
    }
}
