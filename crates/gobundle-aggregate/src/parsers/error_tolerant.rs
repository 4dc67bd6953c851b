//! Locate ERROR and MISSING nodes in a tree-sitter tree.

use std::ops::Range;

use tree_sitter::Node;

/// Count ERROR/MISSING nodes and collect their byte ranges in document order.
pub fn count_errors(root: Node) -> (u32, Vec<Range<usize>>) {
    let mut count = 0u32;
    let mut ranges = Vec::new();
    collect_errors(root, &mut count, &mut ranges);
    (count, ranges)
}

fn collect_errors(node: Node, count: &mut u32, ranges: &mut Vec<Range<usize>>) {
    if node.is_error() || node.is_missing() {
        *count += 1;
        ranges.push(node.byte_range());
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, count, ranges);
    }
}

/// First ERROR or MISSING node in document order, if any.
pub fn first_error(root: Node) -> Option<Node> {
    if root.is_error() || root.is_missing() {
        return Some(root);
    }
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    let children: Vec<Node> = root.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
