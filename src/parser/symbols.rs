//! Symbol and reference extraction.
//!
//! One top-down walk per file records declarations and every bare identifier
//! occurrence. Method names are qualified as `Class.method` using an explicit
//! enclosing-class stack maintained by the walk itself, so arbitrarily nested
//! classes cost nothing extra.

use std::path::Path;

use tree_sitter::Node;

use super::ParsedTree;
use crate::index::{SymbolDefinition, SymbolKind, SymbolReference};

/// Traversal guard against pathological (e.g. minified) input.
const MAX_TREE_DEPTH: usize = 512;

/// Everything extracted from one file.
#[derive(Debug, Default)]
pub struct FileSymbols {
    pub definitions: Vec<SymbolDefinition>,
    pub references: Vec<SymbolReference>,
    /// Definitions marked exported, inline or via an `export { … }` clause.
    pub exported: Vec<SymbolDefinition>,
}

struct Walker<'a> {
    parsed: &'a ParsedTree,
    file: &'a Path,
    class_stack: Vec<String>,
    definitions: Vec<(SymbolDefinition, bool)>,
    references: Vec<SymbolReference>,
    /// Names exported through `export { a, b }` clauses.
    clause_names: Vec<String>,
}

/// Extract definitions, references, and export markings from a parsed file.
pub fn extract_symbols(parsed: &ParsedTree, file: &Path) -> FileSymbols {
    let mut walker = Walker {
        parsed,
        file,
        class_stack: Vec::new(),
        definitions: Vec::new(),
        references: Vec::new(),
        clause_names: Vec::new(),
    };
    walker.walk(&parsed.root(), false, 0);

    let Walker {
        definitions,
        references,
        clause_names,
        ..
    } = walker;

    let mut out = FileSymbols::default();
    for (def, inline_export) in definitions {
        let bare = def.name.rsplit('.').next().unwrap_or(&def.name);
        let exported = inline_export || clause_names.iter().any(|n| n == bare);
        if exported {
            out.exported.push(def.clone());
        }
        out.definitions.push(def);
    }
    out.references = references;
    out
}

impl Walker<'_> {
    fn walk(&mut self, node: &Node<'_>, in_export: bool, depth: usize) {
        if depth > MAX_TREE_DEPTH {
            return;
        }

        let mut entered_class = false;
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" => {
                if let Some(name) = self.field_text(node, "name") {
                    self.record(name.clone(), SymbolKind::Class, node, in_export);
                    self.class_stack.push(name);
                    entered_class = true;
                }
            }
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = self.field_text(node, "name") {
                    self.record(name, SymbolKind::Function, node, in_export);
                }
            }
            "method_definition" => {
                if let Some(name) = self.field_text(node, "name") {
                    let qualified = match self.class_stack.last() {
                        Some(class) => format!("{class}.{name}"),
                        None => name,
                    };
                    self.record(qualified, SymbolKind::Method, node, in_export);
                }
            }
            "variable_declarator" => {
                if self.is_function_valued(node) {
                    if let Some(name) = self.field_text(node, "name") {
                        self.record(name, SymbolKind::Variable, node, in_export);
                    }
                }
            }
            "export_specifier" => {
                if let Some(name) = self.field_text(node, "name") {
                    self.clause_names.push(name);
                }
            }
            "identifier" | "type_identifier" | "property_identifier"
            | "shorthand_property_identifier" => {
                let text = self.parsed.text(node);
                if !text.is_empty() {
                    self.references.push(SymbolReference {
                        name: text.to_string(),
                        file: self.file.to_path_buf(),
                        line: node.start_position().row + 1,
                    });
                }
            }
            _ => {}
        }

        let child_export = in_export || node.kind() == "export_statement";
        let count = node.child_count();
        for i in 0..count {
            if let Some(child) = node.child(i) {
                self.walk(&child, child_export, depth + 1);
            }
        }

        if entered_class {
            self.class_stack.pop();
        }
    }

    fn field_text(&self, node: &Node<'_>, field: &str) -> Option<String> {
        let child = node.child_by_field_name(field)?;
        let text = self.parsed.text(&child);
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// `const f = () => …` and friends count as function definitions.
    fn is_function_valued(&self, node: &Node<'_>) -> bool {
        node.child_by_field_name("value").is_some_and(|value| {
            matches!(
                value.kind(),
                "arrow_function" | "function_expression" | "function" | "generator_function"
            )
        })
    }

    fn record(&mut self, name: String, kind: SymbolKind, node: &Node<'_>, exported: bool) {
        self.definitions.push((
            SymbolDefinition {
                name,
                kind,
                file: self.file.to_path_buf(),
                line: node.start_position().row + 1,
            },
            exported,
        ));
    }
}
