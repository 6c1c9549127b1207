//! Workspace file enumeration.
//!
//! Walks the tree respecting .gitignore, then layers the session's
//! include/exclude globs on top. Returns every regular file the globs admit;
//! files without a supported grammar still participate as resolution targets
//! (a `.json` or `.css` import is a real edge).

use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use tracing::debug;

use crate::error::Result;

/// Enumerate workspace files under `root`.
///
/// `include` empty means no restriction; `exclude` entries are applied as
/// negations. The result is sorted for deterministic downstream behavior.
pub fn list_files(root: &Path, include: &[String], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut overrides = OverrideBuilder::new(root);
    for glob in include {
        overrides.add(glob)?;
    }
    for glob in exclude {
        overrides.add(&format!("!{glob}"))?;
    }
    let overrides = overrides.build()?;

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .overrides(overrides)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!(root = %root.display(), count = files.len(), "enumerated workspace");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn walks_everything_by_default() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/a.ts"));
        touch(&dir.path().join("src/style.css"));
        touch(&dir.path().join("README.md"));

        let files = list_files(dir.path(), &[], &[]).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn include_restricts_and_exclude_negates() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/a.ts"));
        touch(&dir.path().join("src/a.test.ts"));
        touch(&dir.path().join("docs/guide.md"));

        let files = list_files(
            dir.path(),
            &["src/**".to_string()],
            &["**/*.test.ts".to_string()],
        )
        .unwrap();
        assert_eq!(files, vec![dir.path().join("src/a.ts")]);
    }

    #[test]
    fn bad_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path(), &["[".to_string()], &[]).is_err());
    }
}
