//! The AST-provider boundary.
//!
//! Wraps tree-sitter parsing plus the two extraction passes the engine needs:
//! import specifiers (query-driven, `imports`) and symbol definitions /
//! references (cursor walk, `symbols`).

pub mod imports;
pub mod language;
pub mod symbols;

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::error::{Result, SeismicError};
pub use language::SupportedLanguage;

/// An immutable parsed file: language tag, source text, and the tree.
///
/// The source is kept alongside the tree because node text extraction slices
/// into it. Shared across workers behind `Arc` by the cache.
pub struct ParsedTree {
    pub language: SupportedLanguage,
    pub source: String,
    tree: Tree,
}

impl ParsedTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text of a node, empty string when the range is not valid UTF-8.
    pub fn text(&self, node: &Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Parse `source` as the language implied by `path`'s extension.
///
/// Returns `Err(UnsupportedLanguage)` for unknown extensions. Malformed
/// source still yields `Ok`: tree-sitter produces a tree with error nodes
/// and extraction simply finds less in it.
pub fn parse_file(path: &Path, source: String) -> Result<ParsedTree> {
    let language = SupportedLanguage::from_path(path)
        .ok_or_else(|| SeismicError::UnsupportedLanguage(path.to_path_buf()))?;
    parse_source(language, source)
        .ok_or_else(|| SeismicError::UnsupportedLanguage(path.to_path_buf()))
}

/// Parse `source` with a known language. `None` only when tree-sitter itself
/// gives up, which callers treat as "no analysis available".
pub fn parse_source(language: SupportedLanguage, source: String) -> Option<ParsedTree> {
    let mut parser = Parser::new();
    parser.set_language(&language.grammar()).ok()?;
    let tree = parser.parse(&source, None)?;
    Some(ParsedTree {
        language,
        source,
        tree,
    })
}
