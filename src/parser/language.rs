//! Language detection and tree-sitter grammar loading.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tree_sitter::Language;

/// Supported source languages.
///
/// The engine models the JS/TS ecosystem: import specifiers there carry the
/// extension-elision and alias conventions the path resolver implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SupportedLanguage {
    /// Detect language from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "mjs" | "cjs" => Some(SupportedLanguage::JavaScript),
            "ts" | "mts" | "cts" => Some(SupportedLanguage::TypeScript),
            "tsx" | "jsx" => Some(SupportedLanguage::Tsx),
            _ => None,
        }
    }

    /// Get the tree-sitter Language for this language.
    pub fn grammar(&self) -> Language {
        match self {
            SupportedLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SupportedLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SupportedLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::JavaScript => "JavaScript",
            SupportedLanguage::TypeScript => "TypeScript",
            SupportedLanguage::Tsx => "TSX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_js_family() {
        assert_eq!(
            SupportedLanguage::from_path(&PathBuf::from("a.ts")),
            Some(SupportedLanguage::TypeScript)
        );
        assert_eq!(
            SupportedLanguage::from_path(&PathBuf::from("a.jsx")),
            Some(SupportedLanguage::Tsx)
        );
        assert_eq!(
            SupportedLanguage::from_path(&PathBuf::from("a.cjs")),
            Some(SupportedLanguage::JavaScript)
        );
        assert_eq!(SupportedLanguage::from_path(&PathBuf::from("a.rs")), None);
        assert_eq!(SupportedLanguage::from_path(&PathBuf::from("Makefile")), None);
    }
}
