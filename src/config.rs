//! Session configuration.
//!
//! Loaded from an optional `seismic.toml` at the workspace root. Every field
//! has a default, so a missing file means "analyze everything the walker
//! yields, with the stock entry points".

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for an analysis session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Include globs. Empty means no restriction beyond the walker's
    /// .gitignore handling.
    pub include: Vec<String>,

    /// Exclude globs, applied on top of .gitignore.
    pub exclude: Vec<String>,

    /// File names that always count as referenced, even with zero dependents.
    pub entry_points: Vec<String>,

    /// Path components treated as vendored library code. Files under these
    /// are skipped by cycle detection.
    pub library_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/dist/**".to_string(),
                "**/build/**".to_string(),
                "**/coverage/**".to_string(),
            ],
            entry_points: vec![
                "index.ts".to_string(),
                "index.tsx".to_string(),
                "index.js".to_string(),
                "main.ts".to_string(),
                "main.tsx".to_string(),
                "main.js".to_string(),
                "app.ts".to_string(),
                "app.js".to_string(),
            ],
            library_paths: vec!["node_modules".to_string(), "vendor".to_string()],
        }
    }
}

impl Config {
    /// Load `seismic.toml` from `root`, falling back to defaults when the
    /// file is absent. A present-but-invalid file is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("seismic.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| crate::error::SeismicError::io(&path, e))?;
        Ok(toml::from_str(&content)?)
    }

    /// True if `name` is a designated entry-point file name.
    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entry_points.iter().any(|e| e == name)
    }
}
