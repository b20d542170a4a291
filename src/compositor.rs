//! The `compositor` module owns the render tree and the software surface it
//! is composited onto, and hosts the paint pipeline: the per-node paint
//! orchestration, back-to-front child compositing with obscurity culling,
//! the synchronous immediate-paint path, and bounds-change damage tracking.

use smallvec::SmallVec;

use crate::canvas::Canvas;
use crate::geometry::Rect;
use crate::node::{Node, NodeId};
use crate::painter::NodePainter;
use crate::pool::BufferPool;
use crate::scheduler::RepaintScheduler;

mod children;
mod immediate;
mod obscure;
mod paint;
mod reshape;

/// Composites a tree of lightweight visual nodes onto a software surface.
///
/// One compositor corresponds to one top-level rendering surface: it owns
/// the node tree, the framebuffer the tree is painted into, and the
/// offscreen buffer pool shared by every double-buffered node in the tree.
/// All painting is synchronous and single-threaded; the compositor is
/// `&mut self` end to end.
pub struct Compositor {
    pub(crate) tree: easy_tree::Tree<Node>,
    pub(crate) frame: Option<Canvas>,
    pub(crate) pool: BufferPool,
    root: Option<NodeId>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// A compositor with an unrealized surface and a default buffer pool.
    /// Call [`Compositor::resize_surface`] before painting.
    pub fn new() -> Self {
        Self::with_pool(BufferPool::new())
    }

    /// A compositor using the given buffer pool. The pool is owned by this
    /// surface; nested trees never share one.
    pub fn with_pool(pool: BufferPool) -> Self {
        Self {
            tree: easy_tree::Tree::new(),
            frame: None,
            pool,
            root: None,
        }
    }

    /// Attaches a node to the tree and returns its id.
    ///
    /// With `parent` set, the node is appended behind its siblings (the
    /// front-most child has index 0, so earlier-attached children render in
    /// front). Without a parent the first node becomes the root; later
    /// parentless nodes attach under it.
    pub fn add_node(&mut self, parent: Option<NodeId>, node: Node) -> NodeId {
        match parent {
            Some(parent) => self.tree.add_child(parent, node),
            None if self.tree.is_empty() => {
                let id = self.tree.add_node(node);
                self.root = Some(id);
                id
            }
            None => self.tree.add_child_to_root(node),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Drops the whole tree. The surface stays realized.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.root = None;
        self.pool.reset_all();
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.tree.get_mut(id) {
            node.visible = visible;
        }
    }

    pub fn set_opaque(&mut self, id: NodeId, opaque: bool) {
        if let Some(node) = self.tree.get_mut(id) {
            node.opaque = opaque;
        }
    }

    pub fn set_double_buffered(&mut self, id: NodeId, double_buffered: bool) {
        if let Some(node) = self.tree.get_mut(id) {
            node.double_buffered = double_buffered;
        }
    }

    pub fn set_overlapping_children(&mut self, id: NodeId, overlapping: bool) {
        if let Some(node) = self.tree.get_mut(id) {
            node.overlapping_children = overlapping;
        }
    }

    /// Replaces the node's rendering delegate.
    pub fn set_delegate(&mut self, id: NodeId, painter: impl NodePainter + 'static) {
        if let Some(node) = self.tree.get_mut(id) {
            node.delegate = Some(Box::new(painter));
        }
    }

    /// Removes the node's rendering delegate; the node draws nothing of its
    /// own from now on.
    pub fn clear_delegate(&mut self, id: NodeId) {
        if let Some(node) = self.tree.get_mut(id) {
            node.delegate = None;
        }
    }

    /// Realizes (or resizes) the surface. The framebuffer is reallocated
    /// and every retained offscreen buffer is dropped, since buffers are
    /// scoped to the surface geometry they were created under.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        log::info!("Surface realized at {}x{}", width, height);
        self.frame = Some(Canvas::new(width, height));
        self.pool.reset_all();
    }

    /// Whether the surface has been realized. Paint calls on an unrealized
    /// surface are silent no-ops.
    pub fn is_realized(&self) -> bool {
        self.frame.is_some()
    }

    /// The composited frame, if the surface is realized.
    pub fn frame(&self) -> Option<&Canvas> {
        self.frame.as_ref()
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.frame.as_ref().map(|f| (f.width(), f.height()))
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut BufferPool {
        &mut self.pool
    }

    /// True iff the node and all of its ancestors are visible and the
    /// surface is realized.
    pub fn is_showing(&self, id: NodeId) -> bool {
        if !self.is_realized() {
            return false;
        }
        let mut current = id;
        loop {
            match self.tree.get(current) {
                Some(node) if node.visible => {}
                _ => return false,
            }
            match self.tree.parent_index_unchecked(current) {
                Some(parent) => current = parent,
                None => return true,
            }
        }
    }

    /// Requests a deferred repaint of a node-local rectangle. The request is
    /// clamped to the node's bounds and handed to the scheduler; an empty
    /// result is dropped.
    pub fn repaint(&mut self, id: NodeId, rect: Rect, scheduler: &mut dyn RepaintScheduler) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let clamped = Rect::intersect(
            rect,
            Rect::from_size(node.bounds.width, node.bounds.height),
        );
        if clamped.is_empty() {
            return;
        }
        scheduler.mark_dirty(id, clamped);
    }

    /// Requests a deferred repaint of the node's full bounds.
    pub fn repaint_all(&mut self, id: NodeId, scheduler: &mut dyn RepaintScheduler) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let bounds = Rect::from_size(node.bounds.width, node.bounds.height);
        self.repaint(id, bounds, scheduler);
    }

    /// Child ids of `id`, front-most first.
    pub(crate) fn children_of(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut children = SmallVec::new();
        for &child in self.tree.children(id) {
            children.push(child);
        }
        children
    }
}
