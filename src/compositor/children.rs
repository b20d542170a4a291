use crate::canvas::PaintCtx;
use crate::error::ComposeError;
use crate::geometry::Rect;
use crate::node::NodeId;

use super::{obscure, Compositor};

impl Compositor {
    /// Composites `id`'s children back-to-front into the given context.
    ///
    /// Children are walked from the highest index (back-most) toward index 0
    /// so that front siblings paint over back ones. When an immediate paint
    /// has pinned an opaque `painting_child`, everything strictly behind it
    /// is guaranteed invisible for this call, so iteration starts at that
    /// child instead of the back.
    ///
    /// Each child gets a scratch context translated to its own coordinate
    /// space and clipped to its share of the parent clip; the context lives
    /// exactly as long as that child's recursive paint. Transient flags are
    /// propagated onto the child for the duration of the recursion and
    /// restored afterward, error or not.
    pub(crate) fn paint_children(
        &mut self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
    ) -> Result<(), ComposeError> {
        let children = self.children_of(id);
        if children.is_empty() {
            return Ok(());
        }
        let (overlapping, painting_child, flags) = match self.tree.get(id) {
            Some(node) => (node.overlapping_children, node.painting_child, node.flags),
            None => return Ok(()),
        };
        let clip = ctx.clip();

        let mut start = children.len() - 1;
        if let Some(pinned) = painting_child {
            if let Some(position) = children.iter().position(|&child| child == pinned) {
                let pinned_opaque = self.tree.get(pinned).map(|n| n.opaque).unwrap_or(false);
                if pinned_opaque {
                    start = position;
                }
            }
        }

        for index in (0..=start).rev() {
            let child_id = children[index];
            let (child_bounds, child_visible, child_saved) = match self.tree.get(child_id) {
                Some(child) => (child.bounds, child.visible, child.flags),
                None => continue,
            };
            if !child_visible {
                continue;
            }
            let paint_clip = Rect::intersect(clip, child_bounds);
            if paint_clip.is_empty() {
                continue;
            }
            // With overlapping siblings, a child other than the front-most
            // may be entirely hidden behind one opaque sibling in front of
            // it; skip it outright.
            if overlapping
                && index > 0
                && obscure::rect_is_obscured_by_sibling(&self.tree, &children, index, paint_clip)
            {
                continue;
            }

            if let Some(child) = self.tree.get_mut(child_id) {
                child.flags = flags;
            }
            let result = {
                let mut child_ctx = ctx.sub(
                    child_bounds.x,
                    child_bounds.y,
                    paint_clip.translate(-child_bounds.x, -child_bounds.y),
                );
                self.paint_node(child_id, &mut child_ctx)
            };
            if let Some(child) = self.tree.get_mut(child_id) {
                child.flags = child_saved;
            }
            result?;
        }
        Ok(())
    }
}
