//! Import-specifier extraction.
//!
//! A fixed set of query rules covers the four ways a JS/TS file names another
//! module: static `import … from`, re-exports (`export … from`), dynamic
//! `import(…)`, and CommonJS `require(…)`.

use once_cell::sync::Lazy;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor};

use super::{ParsedTree, SupportedLanguage};

/// One import occurrence: the raw specifier string and its 1-indexed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub specifier: String,
    pub line: usize,
}

// The `require` rule captures the callee and the comparison happens below in
// Rust: the Rust tree-sitter binding does not evaluate `#eq?` predicates.
const IMPORT_RULES: &str = r#"
(import_statement source: (string) @source)
(export_statement source: (string) @source)
(call_expression function: (import) arguments: (arguments (string) @source))
(call_expression function: (identifier) @callee arguments: (arguments (string) @source))
"#;

static JS_QUERY: Lazy<Query> = Lazy::new(|| {
    Query::new(&tree_sitter_javascript::LANGUAGE.into(), IMPORT_RULES)
        .expect("import rules must compile against the JavaScript grammar")
});
static TS_QUERY: Lazy<Query> = Lazy::new(|| {
    Query::new(
        &tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        IMPORT_RULES,
    )
    .expect("import rules must compile against the TypeScript grammar")
});
static TSX_QUERY: Lazy<Query> = Lazy::new(|| {
    Query::new(&tree_sitter_typescript::LANGUAGE_TSX.into(), IMPORT_RULES)
        .expect("import rules must compile against the TSX grammar")
});

fn query_for(language: SupportedLanguage) -> &'static Query {
    match language {
        SupportedLanguage::JavaScript => &JS_QUERY,
        SupportedLanguage::TypeScript => &TS_QUERY,
        SupportedLanguage::Tsx => &TSX_QUERY,
    }
}

/// Run the import rules over a parsed file.
///
/// Occurrences come back in tree order, duplicates included; callers that
/// build edge sets deduplicate downstream.
pub fn extract_imports(parsed: &ParsedTree) -> Vec<ImportSpec> {
    let query = query_for(parsed.language);
    let mut cursor = QueryCursor::new();
    let mut out = Vec::new();

    let mut matches = cursor.matches(query, parsed.root(), parsed.source.as_bytes());
    while let Some(m) = matches.next() {
        let mut specifier = None;
        let mut callee_is_require = true;

        for capture in m.captures {
            let name = query.capture_names()[capture.index as usize];
            match name {
                "callee" => {
                    callee_is_require = parsed.text(&capture.node) == "require";
                }
                "source" => {
                    let text = strip_quotes(parsed.text(&capture.node));
                    if !text.is_empty() {
                        specifier = Some(ImportSpec {
                            specifier: text,
                            line: capture.node.start_position().row + 1,
                        });
                    }
                }
                _ => {}
            }
        }

        if callee_is_require {
            if let Some(spec) = specifier {
                out.push(spec);
            }
        }
    }

    out
}

/// Strip the surrounding quote pair from a string-literal node's text.
fn strip_quotes(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() < 2 {
        return trimmed.to_string();
    }
    let first = trimmed.chars().next();
    let last = trimmed.chars().last();
    match (first, last) {
        (Some('"'), Some('"')) | (Some('\''), Some('\'')) | (Some('`'), Some('`')) => {
            trimmed[1..trimmed.len() - 1].to_string()
        }
        _ => trimmed.to_string(),
    }
}
