//! Import-specifier resolution.
//!
//! Turns the string found inside an `import`/`require` into a canonical
//! workspace path: alias substitution from project configuration, JS/TS
//! extension-elision conventions, and directory-index fallback. Membership
//! tests run against the caller's precomputed file set, so resolution itself
//! touches the filesystem only for project-root and alias discovery.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

/// Files that mark a directory as a project root for alias scoping.
const PROJECT_MARKERS: &[&str] = &["tsconfig.json", "jsconfig.json", "package.json", "deno.json"];

/// Probe order: source extensions first, then data/asset extensions.
const EXTENSION_PROBES: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json", ".css", ".scss", ".svg",
];

/// One alias mapping: a specifier prefix and its replacement path prefix.
#[derive(Debug, Clone)]
pub struct AliasEntry {
    pub prefix: String,
    pub target: String,
}

type AliasTable = Arc<Vec<AliasEntry>>;

/// Resolves import specifiers against a set of known workspace files.
///
/// Project roots and alias tables are memoized per directory / per root and
/// never mutated after load within a session.
#[derive(Default)]
pub struct PathResolver {
    root_cache: Mutex<HashMap<PathBuf, Option<PathBuf>>>,
    alias_cache: Mutex<HashMap<PathBuf, AliasTable>>,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `specifier` as seen from `source_dir`.
    ///
    /// `context_file` scopes project-root discovery when the import was found
    /// in a specific file; otherwise `source_dir` anchors the search. Returns
    /// `None` when no known file matches, a resolvable-but-missing result,
    /// not an error.
    pub fn resolve(
        &self,
        source_dir: &Path,
        specifier: &str,
        known_files: &HashSet<PathBuf>,
        context_file: Option<&Path>,
    ) -> Option<PathBuf> {
        let anchor = context_file
            .and_then(|f| f.parent())
            .unwrap_or(source_dir);
        let project_root = self.project_root(anchor);

        // Alias substitution against the owning root's table.
        let mut base = specifier.to_string();
        let mut substituted = false;
        if let Some(root) = &project_root {
            for entry in self.alias_table(root).iter() {
                if let Some(rest) = match_alias(specifier, &entry.prefix) {
                    base = format!("{}{}", entry.target, rest);
                    substituted = true;
                    break;
                }
            }
        }

        // A `.js`/`.jsx` specifier may physically live under a sibling
        // extension, so the suffix is stripped before probing.
        for suffix in [".js", ".jsx"] {
            if let Some(stripped) = base.strip_suffix(suffix) {
                base = stripped.to_string();
                break;
            }
        }

        let base_path = if substituted {
            let target = Path::new(&base);
            if target.is_absolute() {
                normalize_path(target)
            } else {
                // Project root must exist for the table to have matched.
                normalize_path(&project_root.as_deref().unwrap_or(source_dir).join(&base))
            }
        } else {
            normalize_path(&source_dir.join(&base))
        };

        // Extension probes over the known-file set.
        let base_str = base_path.to_string_lossy().into_owned();
        for ext in EXTENSION_PROBES {
            let candidate = PathBuf::from(format!("{base_str}{ext}"));
            if known_files.contains(&candidate) {
                return Some(candidate);
            }
        }

        // The specifier exactly as written (covers explicit extensions).
        let original = normalize_path(&source_dir.join(specifier));
        if known_files.contains(&original) {
            return Some(original);
        }

        // Directory with an index file.
        for ext in EXTENSION_PROBES {
            let candidate = base_path.join(format!("index{ext}"));
            if known_files.contains(&candidate) {
                return Some(candidate);
            }
        }

        None
    }

    /// Nearest ancestor of `dir` containing a project marker, memoized per
    /// directory.
    pub fn project_root(&self, dir: &Path) -> Option<PathBuf> {
        if let Ok(cache) = self.root_cache.lock() {
            if let Some(cached) = cache.get(dir) {
                return cached.clone();
            }
        }

        let mut probed = Vec::new();
        let mut found = None;
        for ancestor in dir.ancestors() {
            probed.push(ancestor.to_path_buf());
            if PROJECT_MARKERS
                .iter()
                .any(|marker| ancestor.join(marker).is_file())
            {
                found = Some(ancestor.to_path_buf());
                break;
            }
        }

        if let Ok(mut cache) = self.root_cache.lock() {
            for dir in probed {
                cache.insert(dir, found.clone());
            }
        }
        found
    }

    /// The alias table for a project root, loaded once per session.
    fn alias_table(&self, root: &Path) -> AliasTable {
        if let Ok(cache) = self.alias_cache.lock() {
            if let Some(table) = cache.get(root) {
                return table.clone();
            }
        }

        let table = Arc::new(load_alias_table(root));
        debug!(
            root = %root.display(),
            aliases = table.len(),
            "loaded alias table"
        );
        if let Ok(mut cache) = self.alias_cache.lock() {
            cache.insert(root.to_path_buf(), table.clone());
        }
        table
    }

    /// Forget memoized roots and tables.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.root_cache.lock() {
            cache.clear();
        }
        if let Ok(mut cache) = self.alias_cache.lock() {
            cache.clear();
        }
    }
}

/// `specifier` matches `prefix` exactly or as `prefix/…`. Returns the
/// remainder (empty or starting with `/`).
fn match_alias<'a>(specifier: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = specifier.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Load alias mappings from tsconfig/jsconfig `compilerOptions.paths` and
/// package.json `imports`. Longest prefixes sort first so the most specific
/// alias wins.
fn load_alias_table(root: &Path) -> Vec<AliasEntry> {
    let mut entries = Vec::new();

    for name in ["tsconfig.json", "jsconfig.json"] {
        if let Some(json) = read_json(&root.join(name)) {
            if let Some(paths) = json
                .get("compilerOptions")
                .and_then(|c| c.get("paths"))
                .and_then(|p| p.as_object())
            {
                for (alias, targets) in paths {
                    let target = targets
                        .as_array()
                        .and_then(|arr| arr.first())
                        .and_then(|v| v.as_str());
                    if let Some(target) = target {
                        entries.push(make_entry(alias, target));
                    }
                }
            }
        }
    }

    if let Some(json) = read_json(&root.join("package.json")) {
        if let Some(imports) = json.get("imports").and_then(|i| i.as_object()) {
            for (alias, target) in imports {
                if let Some(target) = target.as_str() {
                    entries.push(make_entry(alias, target));
                }
            }
        }
    }

    entries.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
    entries
}

fn make_entry(alias: &str, target: &str) -> AliasEntry {
    AliasEntry {
        prefix: strip_wildcard(alias),
        target: strip_wildcard(&target.replace('\\', "/")),
    }
}

/// `@app/*` and `@app` both describe the prefix `@app`.
fn strip_wildcard(pattern: &str) -> String {
    pattern
        .trim_end_matches('*')
        .trim_end_matches('/')
        .to_string()
}

fn read_json(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Fold `.` and `..` components lexically, without filesystem access.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn known(paths: &[PathBuf]) -> HashSet<PathBuf> {
        paths.iter().cloned().collect()
    }

    fn project(marker_json: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in marker_json {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn extension_substitution() {
        let dir = project(&[("package.json", "{}")]);
        let root = dir.path();
        let target = root.join("utils/math.ts");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(root, "./utils/math.js", &known(&[target.clone()]), None);
        assert_eq!(resolved, Some(target));
    }

    #[test]
    fn alias_resolution() {
        let dir = project(&[(
            "tsconfig.json",
            r#"{"compilerOptions": {"paths": {"@app/*": ["src/*"]}}}"#,
        )]);
        let root = dir.path();
        let target = root.join("src/widgets/button.tsx");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(
            &root.join("src/pages"),
            "@app/widgets/button",
            &known(&[target.clone()]),
            Some(&root.join("src/pages/home.ts")),
        );
        assert_eq!(resolved, Some(target));
    }

    #[test]
    fn package_imports_alias() {
        let dir = project(&[(
            "package.json",
            r##"{"imports": {"#lib/*": "./lib/*"}}"##,
        )]);
        let root = dir.path();
        let target = root.join("lib/db.ts");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(root, "#lib/db", &known(&[target.clone()]), None);
        assert_eq!(resolved, Some(target));
    }

    #[test]
    fn directory_index_fallback() {
        let dir = project(&[("package.json", "{}")]);
        let root = dir.path();
        let target = root.join("src/api/index.js");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(
            &root.join("src"),
            "./api",
            &known(&[target.clone()]),
            None,
        );
        assert_eq!(resolved, Some(target));
    }

    #[test]
    fn source_extensions_probe_before_assets() {
        let dir = project(&[("package.json", "{}")]);
        let root = dir.path();
        let ts = root.join("theme.ts");
        let json = root.join("theme.json");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(root, "./theme", &known(&[json, ts.clone()]), None);
        assert_eq!(resolved, Some(ts));
    }

    #[test]
    fn explicit_extension_survives() {
        let dir = project(&[("package.json", "{}")]);
        let root = dir.path();
        let target = root.join("styles/app.css");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(root, "./styles/app.css", &known(&[target.clone()]), None);
        assert_eq!(resolved, Some(target));
    }

    #[test]
    fn parent_traversal_is_folded() {
        let dir = project(&[("package.json", "{}")]);
        let root = dir.path();
        let target = root.join("shared/util.ts");
        let resolver = PathResolver::new();

        let resolved = resolver.resolve(
            &root.join("features/auth"),
            "../../shared/util",
            &known(&[target.clone()]),
            None,
        );
        assert_eq!(resolved, Some(target));
    }

    #[test]
    fn miss_returns_none() {
        let dir = project(&[("package.json", "{}")]);
        let root = dir.path();
        let resolver = PathResolver::new();

        assert!(resolver
            .resolve(root, "./does/not/exist", &known(&[]), None)
            .is_none());
        assert!(resolver.resolve(root, "react", &known(&[]), None).is_none());
    }

    #[test]
    fn project_root_is_memoized_per_directory() {
        let dir = project(&[("tsconfig.json", "{}")]);
        let root = dir.path();
        fs::create_dir_all(root.join("src/deep")).unwrap();

        let resolver = PathResolver::new();
        let found = resolver.project_root(&root.join("src/deep"));
        assert_eq!(found.as_deref(), Some(root));
        // Second lookup hits the memo (observable only as the same answer).
        assert_eq!(resolver.project_root(&root.join("src/deep")).as_deref(), Some(root));
    }

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }
}
