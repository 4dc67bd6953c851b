//! Go parser using native tree-sitter.
//!
//! Validates syntax and extracts the top-level declarations of a file
//! together with the call targets and qualified references inside them.

use smallvec::SmallVec;
use tree_sitter::{Node, Parser, Tree};

use gobundle_core::errors::LoadError;

use super::error_tolerant::{count_errors, first_error};
use crate::imports::Usage;
use crate::model::{
    Body, Declaration, FunctionDecl, ImportSpec, Receiver, Site, SiteKind, TypeDecl,
};

/// First syntax error of a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset of the offending node.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    pub message: String,
}

/// Go parser wrapping one tree-sitter parser instance.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, LoadError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| LoadError::Grammar {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse `source`, rejecting any tree that contains ERROR or MISSING nodes.
    pub fn parse(&mut self, source: &str) -> Result<Tree, SyntaxError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| SyntaxError {
            offset: 0,
            line: 1,
            column: 1,
            message: "parser produced no tree".to_string(),
        })?;

        let root = tree.root_node();
        if let Some(node) = first_error(root) {
            let (count, _) = count_errors(root);
            let position = node.start_position();
            let near = text(node, source).lines().next().unwrap_or("").trim();
            let mut message = if node.is_missing() {
                format!("missing {}", node.kind())
            } else if near.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected `{near}`")
            };
            if count > 1 {
                message.push_str(&format!(" ({count} syntax errors)"));
            }
            return Err(SyntaxError {
                offset: node.start_byte(),
                line: position.row + 1,
                column: position.column + 1,
                message,
            });
        }
        Ok(tree)
    }
}

/// Result of walking the top level of a `source_file`.
#[derive(Debug, Default)]
pub struct Extracted {
    pub package: Option<String>,
    pub imports: Vec<ImportSpec>,
    pub declarations: Vec<Declaration>,
}

/// Extract the package name, imports and top-level declarations.
///
/// Comments directly before a declaration become part of its text, and a
/// comment on the line where a declaration ends is appended to it.
/// Comments before the package clause, on the package or import lines, or
/// after the last declaration are not carried.
pub fn extract(root: Node, source: &str) -> Extracted {
    let mut extracted = Extracted::default();
    let mut leading_comment: Option<usize> = None;
    // (end byte, end row) of the last declaration
    let mut last_end: Option<(usize, usize)> = None;
    // end row of the package clause or the last import declaration
    let mut header_row: Option<usize> = None;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {
                let row = child.start_position().row;
                if extracted.package.is_none() || header_row == Some(row) {
                    continue;
                }
                if leading_comment.is_none() {
                    if let Some((end, last_row)) = last_end {
                        if last_row == row {
                            if let Some(previous) = extracted.declarations.last_mut() {
                                previous.body_mut().append(&source[end..child.end_byte()]);
                            }
                            last_end = Some((child.end_byte(), child.end_position().row));
                            continue;
                        }
                    }
                }
                leading_comment.get_or_insert(child.start_byte());
            }
            "package_clause" => {
                extracted.package =
                    first_named_child(child).map(|n| text(n, source).to_string());
                leading_comment = None;
                header_row = Some(child.end_position().row);
            }
            "import_declaration" => {
                import_specs(child, source, &mut extracted.imports);
                leading_comment = None;
                last_end = None;
                header_row = Some(child.end_position().row);
            }
            _ => {
                let start = leading_comment.take().unwrap_or(child.start_byte());
                extracted.declarations.push(declaration(child, source, start));
                last_end = Some((child.end_byte(), child.end_position().row));
                header_row = None;
            }
        }
    }
    extracted
}

fn declaration(node: Node, source: &str, start: usize) -> Declaration {
    let mut sites = Vec::new();
    collect_sites(node, source, start, &mut sites);
    let body_text = &source[start..node.end_byte()];

    match node.kind() {
        "function_declaration" | "method_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return Declaration::Other(Body::new(body_text, sites));
            };
            sites.push(Site {
                span: relative(name_node, start),
                kind: SiteKind::Name,
            });
            let receiver = node
                .child_by_field_name("receiver")
                .and_then(|list| parse_receiver(list, source));
            Declaration::Function(FunctionDecl {
                name: text(name_node, source).to_string(),
                receiver,
                body: Body::new(body_text, sites),
            })
        }
        "type_declaration" => {
            let mut names: SmallVec<[String; 1]> = SmallVec::new();
            let mut cursor = node.walk();
            for spec in node.named_children(&mut cursor) {
                if matches!(spec.kind(), "type_spec" | "type_alias") {
                    if let Some(name) = spec.child_by_field_name("name") {
                        names.push(text(name, source).to_string());
                    }
                }
            }
            Declaration::Type(TypeDecl {
                names,
                body: Body::new(body_text, sites),
            })
        }
        _ => Declaration::Other(Body::new(body_text, sites)),
    }
}

/// Receiver type of a method, dereferenced to its named type.
fn parse_receiver(list: Node, source: &str) -> Option<Receiver> {
    let mut cursor = list.walk();
    let param = list
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    receiver_type(param.child_by_field_name("type")?, source, false)
}

fn receiver_type(ty: Node, source: &str, pointer: bool) -> Option<Receiver> {
    match ty.kind() {
        "type_identifier" => Some(Receiver {
            type_name: text(ty, source).to_string(),
            pointer,
        }),
        "pointer_type" => receiver_type(first_named_child(ty)?, source, true),
        "parenthesized_type" => receiver_type(first_named_child(ty)?, source, pointer),
        // Stack[T] → Stack
        "generic_type" => receiver_type(ty.child_by_field_name("type")?, source, pointer),
        _ => None,
    }
}

fn import_specs(node: Node, source: &str, out: &mut Vec<ImportSpec>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                out.push(ImportSpec {
                    path: unquote(text(path, source)).to_string(),
                    alias: child
                        .child_by_field_name("name")
                        .map(|n| text(n, source).to_string()),
                });
            }
            "import_spec_list" => import_specs(child, source, out),
            _ => {}
        }
    }
}

/// Collect identifier references, local bindings and qualified references
/// below `node`. Spans are relative to `base` and never overlap.
fn collect_sites(node: Node, source: &str, base: usize, out: &mut Vec<Site>) {
    let mut handled: SmallVec<[usize; 4]> = SmallVec::new();
    match node.kind() {
        "identifier" => {
            out.push(ident_site(node, source, base, false));
            return;
        }
        "call_expression" => {
            if let Some(function) = node.child_by_field_name("function") {
                if function.kind() == "identifier" {
                    out.push(ident_site(function, source, base, true));
                    handled.push(function.id());
                } else if let Some(site) = selector_site(function, source, base, true) {
                    out.push(site);
                    handled.push(function.id());
                }
            }
        }
        "selector_expression" => {
            if let Some(site) = selector_site(node, source, base, false) {
                out.push(site);
                return;
            }
        }
        "qualified_type" => {
            if let (Some(package), Some(name)) = (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                out.push(Site {
                    span: relative(node, base),
                    kind: SiteKind::Qualified {
                        qualifier: text(package, source).to_string(),
                        symbol: text(name, source).to_string(),
                        called: false,
                    },
                });
            }
            return;
        }
        // the declared name gets its `Name` site from the caller
        "function_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                handled.push(name.id());
            }
        }
        "short_var_declaration" | "range_clause" => {
            if let Some(left) = node.child_by_field_name("left") {
                let mut cursor = left.walk();
                for target in left.named_children(&mut cursor) {
                    if target.kind() == "identifier" {
                        out.push(binding_site(target, source, base));
                    } else {
                        collect_sites(target, source, base, out);
                    }
                }
                handled.push(left.id());
            }
        }
        "var_spec"
        | "const_spec"
        | "parameter_declaration"
        | "variadic_parameter_declaration"
        | "type_parameter_declaration" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                out.push(binding_site(name, source, base));
                handled.push(name.id());
            }
        }
        // `T{field: v}`: a bare key names a field
        "keyed_element" => {
            if let Some(key) = first_named_child(node) {
                let inner = if key.kind() == "literal_element" {
                    first_named_child(key)
                } else {
                    Some(key)
                };
                if inner.is_some_and(|n| n.kind() == "identifier") {
                    handled.push(key.id());
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if !handled.contains(&child.id()) {
            collect_sites(child, source, base, out);
        }
    }
}

fn ident_site(node: Node, source: &str, base: usize, called: bool) -> Site {
    Site {
        span: relative(node, base),
        kind: SiteKind::Ident {
            name: text(node, source).to_string(),
            called,
        },
    }
}

fn binding_site(node: Node, source: &str, base: usize) -> Site {
    Site {
        span: relative(node, base),
        kind: SiteKind::Binding {
            name: text(node, source).to_string(),
        },
    }
}

/// `pkg.Symbol` where the operand is a bare identifier.
fn selector_site(node: Node, source: &str, base: usize, called: bool) -> Option<Site> {
    if node.kind() != "selector_expression" {
        return None;
    }
    let operand = node.child_by_field_name("operand")?;
    if operand.kind() != "identifier" {
        return None;
    }
    let field = node.child_by_field_name("field")?;
    Some(Site {
        span: relative(node, base),
        kind: SiteKind::Qualified {
            qualifier: text(operand, source).to_string(),
            symbol: text(field, source).to_string(),
            called,
        },
    })
}

/// Record which identifiers are used as package qualifiers and which appear
/// bare (locals, parameters, package-level names).
pub fn scan_usage(node: Node, source: &str, usage: &mut Usage) {
    match node.kind() {
        "selector_expression" => {
            if let Some(operand) = node.child_by_field_name("operand") {
                if operand.kind() == "identifier" {
                    usage.qualifiers.insert(text(operand, source).to_string());
                    return;
                }
            }
        }
        "qualified_type" => {
            if let Some(package) = node.child_by_field_name("package") {
                usage.qualifiers.insert(text(package, source).to_string());
            }
            return;
        }
        "identifier" => {
            usage.bare.insert(text(node, source).to_string());
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        scan_usage(child, source, usage);
    }
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let first = node.named_children(&mut cursor).next();
    first
}

fn relative(node: Node, base: usize) -> std::ops::Range<usize> {
    node.start_byte() - base..node.end_byte() - base
}

fn text<'s>(node: Node, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(literal)
}
