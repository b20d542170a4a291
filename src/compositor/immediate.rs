use smallvec::SmallVec;

use crate::canvas::PaintCtx;
use crate::error::ComposeError;
use crate::geometry::Rect;
use crate::node::NodeId;

use super::Compositor;

impl Compositor {
    /// Synchronously repaints exactly the requested node-local rectangle,
    /// bypassing any deferred scheduling.
    ///
    /// The call resolves where painting actually has to start: repainting a
    /// non-opaque node alone would leave stale pixels underneath it, so the
    /// walk climbs to the nearest opaque ancestor; an ancestor whose
    /// children may overlap invalidates even that, because a sibling
    /// anywhere under it could overlap the region, so the highest such
    /// ancestor wins. The request is clamped by every bounds on the way to
    /// the surface and aborts silently once it is empty or the surface is
    /// unrealized.
    ///
    /// When the rectangle ends up painted through an ancestor, the
    /// intermediate nodes are pinned via `painting_child` so the descent
    /// skips siblings that are provably behind the requested node, and the
    /// pins are removed again on every exit path.
    pub fn paint_immediately(&mut self, id: NodeId, rect: Rect) -> Result<(), ComposeError> {
        if rect.is_empty() || !self.is_showing(id) {
            return Ok(());
        }

        // Ancestor path, requested node first, root last.
        let mut path: SmallVec<[NodeId; 8]> = SmallVec::new();
        path.push(id);
        {
            let mut current = id;
            while let Some(parent) = self.tree.parent_index_unchecked(current) {
                path.push(parent);
                current = parent;
            }
        }

        // Nearest opaque node, or the root when the whole chain is
        // transparent.
        let mut target_index = path
            .iter()
            .position(|&node| self.tree.get(node).map(|n| n.opaque).unwrap_or(false))
            .unwrap_or(path.len() - 1);
        // The highest overlap-declaring ancestor overrides an opaque target
        // below it.
        for (depth, &ancestor) in path.iter().enumerate().skip(1) {
            if depth > target_index
                && self
                    .tree
                    .get(ancestor)
                    .map(|n| n.overlapping_children)
                    .unwrap_or(false)
            {
                target_index = depth;
            }
        }

        // Nearest buffering node at or above the target; anything below the
        // target no longer matters.
        let mut buffer_owner = None;
        if self.pool.is_enabled() {
            for &ancestor in &path[target_index..] {
                if self
                    .tree
                    .get(ancestor)
                    .map(|n| n.double_buffered)
                    .unwrap_or(false)
                {
                    buffer_owner = Some(ancestor);
                    break;
                }
            }
        }

        // Clamp the request through every level; the clip only shrinks.
        // After the loop it sits in surface coordinates.
        let mut clip = rect;
        for &ancestor in &path {
            let Some(node) = self.tree.get(ancestor) else {
                return Ok(());
            };
            clip = Rect::intersect(clip, Rect::from_size(node.bounds.width, node.bounds.height));
            if clip.is_empty() {
                return Ok(());
            }
            clip = clip.translate(node.bounds.x, node.bounds.y);
        }

        let mut target_origin = (0, 0);
        for &ancestor in &path[target_index..] {
            let Some(node) = self.tree.get(ancestor) else {
                return Ok(());
            };
            target_origin.0 += node.bounds.x;
            target_origin.1 += node.bounds.y;
        }
        let target = path[target_index];
        let target_clip = clip.translate(-target_origin.0, -target_origin.1);

        let Some(mut frame) = self.frame.take() else {
            return Ok(());
        };

        for depth in (1..=target_index).rev() {
            if let Some(node) = self.tree.get_mut(path[depth]) {
                node.painting_child = Some(path[depth - 1]);
            }
        }
        let result = {
            let mut ctx = PaintCtx::new(&mut frame);
            let mut target_ctx = ctx.sub(target_origin.0, target_origin.1, target_clip);
            self.paint_clipped(target, &mut target_ctx, target_clip, buffer_owner)
        };
        for depth in 1..=target_index {
            if let Some(node) = self.tree.get_mut(path[depth]) {
                node.painting_child = None;
            }
        }
        self.frame = Some(frame);
        result
    }
}
