use crate::canvas::PaintCtx;
use crate::color::Color;
use crate::error::ComposeError;
use crate::geometry::Rect;
use crate::node::{NodeId, PaintFlags};
use crate::pool::OffscreenBuffer;

use super::{obscure, Compositor};

impl Compositor {
    /// Paints the whole tree onto the framebuffer.
    ///
    /// This is the entry a deferred-repaint flush would drive. A silent
    /// no-op while the surface is unrealized or the tree is empty.
    pub fn paint_surface(&mut self) -> Result<(), ComposeError> {
        self.paint_surface_with(PaintFlags {
            painting_all: true,
            ..PaintFlags::default()
        })
    }

    /// Paints the whole tree for a printer-style target: buffered painting
    /// is bypassed and every node draws directly.
    pub fn print_surface(&mut self) -> Result<(), ComposeError> {
        self.paint_surface_with(PaintFlags {
            painting_all: true,
            printing: true,
            ..PaintFlags::default()
        })
    }

    fn paint_surface_with(&mut self, flags: PaintFlags) -> Result<(), ComposeError> {
        let Some(root) = self.root() else {
            return Ok(());
        };
        let Some(mut frame) = self.frame.take() else {
            log::debug!("Paint requested before surface realization");
            return Ok(());
        };
        let (saved, root_bounds) = match self.tree.get(root) {
            Some(node) => (node.flags, node.bounds),
            None => {
                self.frame = Some(frame);
                return Ok(());
            }
        };
        if let Some(node) = self.tree.get_mut(root) {
            node.flags = flags;
        }
        let result = {
            let mut ctx = PaintCtx::new(&mut frame);
            let surface_clip = ctx.clip();
            let mut root_ctx = ctx.sub(
                root_bounds.x,
                root_bounds.y,
                surface_clip.translate(-root_bounds.x, -root_bounds.y),
            );
            self.paint_node(root, &mut root_ctx)
        };
        if let Some(node) = self.tree.get_mut(root) {
            node.flags = saved;
        }
        self.frame = Some(frame);
        result
    }

    /// Paints one node into the given context: the per-node paint contract.
    ///
    /// Decides between buffered and direct painting, clamps the incoming
    /// clip to the node's own extent, and bails out silently on a node with
    /// nothing to show. The node's transient flags are exactly as the caller
    /// left them when this returns, whether painting succeeded or failed.
    pub(crate) fn paint_node(
        &mut self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
    ) -> Result<(), ComposeError> {
        let (bounds, double_buffered, flags) = match self.tree.get(id) {
            Some(node) => (node.bounds, node.double_buffered, node.flags),
            None => return Ok(()),
        };
        if bounds.width <= 0 || bounds.height <= 0 {
            return Ok(());
        }
        let clip = Rect::intersect(ctx.clip(), Rect::from_size(bounds.width, bounds.height));
        if clip.is_empty() {
            return Ok(());
        }
        let eligible = !flags.printing
            && !flags.ancestor_using_buffer
            && double_buffered
            && self.pool.is_enabled();
        self.paint_clipped(id, ctx, clip, if eligible { Some(id) } else { None })
    }

    /// Paints `id` with an already-clamped clip, through `buffer_owner`'s
    /// offscreen buffer when one is available, directly otherwise.
    pub(crate) fn paint_clipped(
        &mut self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
        clip: Rect,
        buffer_owner: Option<NodeId>,
    ) -> Result<(), ComposeError> {
        if let Some(owner) = buffer_owner {
            if let Some(mut buffer) = self.pool.acquire(owner, clip.width as u32, clip.height as u32)
            {
                let result = self.paint_tiles(id, ctx, clip, &mut buffer);
                self.pool.release(owner, buffer);
                return result;
            }
            log::trace!("No offscreen buffer for node {owner}, painting directly");
        }
        self.paint_direct(id, ctx, clip)
    }

    /// Buffered painting: covers the clip in buffer-sized tiles, painting
    /// each into the offscreen buffer and blitting it onto the destination.
    fn paint_tiles(
        &mut self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
        clip: Rect,
        buffer: &mut OffscreenBuffer,
    ) -> Result<(), ComposeError> {
        let saved = match self.tree.get(id) {
            Some(node) => node.flags,
            None => return Ok(()),
        };
        let result = self.paint_tiles_inner(id, ctx, clip, buffer);
        if let Some(node) = self.tree.get_mut(id) {
            node.flags = saved;
        }
        result
    }

    fn paint_tiles_inner(
        &mut self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
        clip: Rect,
        buffer: &mut OffscreenBuffer,
    ) -> Result<(), ComposeError> {
        let tile_width = buffer.width() as i32;
        let tile_height = buffer.height() as i32;

        let mut y = clip.y;
        while y < clip.bottom() {
            let height = tile_height.min(clip.bottom() - y);
            let mut x = clip.x;
            while x < clip.right() {
                let width = tile_width.min(clip.right() - x);
                let tile = Rect::new(x, y, width, height);
                let last = tile.bottom() >= clip.bottom() && tile.right() >= clip.right();
                if let Some(node) = self.tree.get_mut(id) {
                    node.flags.ancestor_using_buffer = true;
                    node.flags.painting_tile = !last;
                }
                buffer.canvas_mut().clear(Color::TRANSPARENT);
                {
                    // Shift the buffer origin so the tile's top-left lands
                    // on the buffer's (0,0).
                    let mut buffer_ctx = PaintCtx::new(buffer.canvas_mut());
                    let mut tile_ctx = buffer_ctx.sub(-tile.x, -tile.y, tile);
                    if !obscure::rect_is_obscured(&self.tree, id, tile) {
                        self.paint_node_own(id, &mut tile_ctx, tile)?;
                    }
                    self.paint_children(id, &mut tile_ctx)?;
                }
                ctx.blit(
                    buffer.canvas(),
                    Rect::from_size(tile.width, tile.height),
                    tile.x,
                    tile.y,
                );
                x += width;
            }
            y += height;
        }
        Ok(())
    }

    /// Direct painting: background and border unless the clip is fully
    /// obscured by an opaque child, then the children.
    fn paint_direct(
        &mut self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        let mut scoped = ctx.sub(0, 0, clip);
        if !obscure::rect_is_obscured(&self.tree, id, clip) {
            self.paint_node_own(id, &mut scoped, clip)?;
        }
        self.paint_children(id, &mut scoped)
    }

    /// Runs the node's own delegate: background first, border second.
    pub(crate) fn paint_node_own(
        &self,
        id: NodeId,
        ctx: &mut PaintCtx<'_>,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        let Some(node) = self.tree.get(id) else {
            return Ok(());
        };
        let bounds = Rect::from_size(node.bounds.width, node.bounds.height);
        if let Some(delegate) = node.delegate.as_deref() {
            delegate.paint_background(ctx, bounds, clip)?;
            delegate.paint_border(ctx, bounds, clip)?;
        }
        Ok(())
    }
}
