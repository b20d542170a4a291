//! Obscurity culling predicates.
//!
//! Coverage is always tested against a single opaque rectangle, never the
//! union of several. The approximation is conservative: a region jointly
//! covered by two opaque siblings is still treated as exposed, so at worst
//! some already-hidden pixels get painted again. Strengthening this would
//! change which delegates run and when, so the single-rectangle test is
//! load-bearing behavior, not a shortcut.

use crate::geometry::Rect;
use crate::node::{Node, NodeId};

/// True iff `rect` (in `id`'s local coordinates) is fully covered by a
/// single visible, opaque direct child of `id`.
pub(crate) fn rect_is_obscured(tree: &easy_tree::Tree<Node>, id: NodeId, rect: Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    for &child_id in tree.children(id) {
        let Some(child) = tree.get(child_id) else {
            continue;
        };
        if child.visible && child.opaque && child.bounds.contains_rect(&rect) {
            return true;
        }
    }
    false
}

/// True iff `rect` (in the parent's local coordinates) is fully covered by
/// a single sibling painted strictly more in front than `index`. Siblings
/// are given front-most first, so "more in front" means a smaller index.
pub(crate) fn rect_is_obscured_by_sibling(
    tree: &easy_tree::Tree<Node>,
    siblings: &[NodeId],
    index: usize,
    rect: Rect,
) -> bool {
    if rect.is_empty() {
        return false;
    }
    for &sibling_id in &siblings[..index] {
        let Some(sibling) = tree.get(sibling_id) else {
            continue;
        };
        if sibling.visible && sibling.opaque && sibling.bounds.contains_rect(&rect) {
            return true;
        }
    }
    false
}
