use ahash::{HashMap, HashMapExt};

use crate::geometry::Rect;
use crate::node::NodeId;

/// Sink for deferred repaint requests.
///
/// The compositor hands damage rectangles to a scheduler and forgets about
/// them; deciding when the accumulated damage turns into a real paint call
/// is the scheduler's business. Rectangles arrive in the coordinate space of
/// the node they are reported against.
pub trait RepaintScheduler {
    fn mark_dirty(&mut self, node: NodeId, rect: Rect);
}

/// A scheduler that just records damage, grouped per node.
///
/// This is the collaborator the tests and the demo drive: accumulate damage,
/// inspect or union it, then decide what to repaint. Rectangles are kept as
/// reported — possibly overlapping, not a minimal cover — and callers merge
/// them if they want to.
#[derive(Default)]
pub struct CollectingScheduler {
    dirty: HashMap<NodeId, Vec<Rect>>,
}

impl CollectingScheduler {
    pub fn new() -> Self {
        Self {
            dirty: HashMap::new(),
        }
    }

    /// The damage recorded against `node`, in arrival order.
    pub fn dirty_rects(&self, node: NodeId) -> &[Rect] {
        self.dirty.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The union of all damage recorded against `node`.
    pub fn union_rect(&self, node: NodeId) -> Option<Rect> {
        let rects = self.dirty.get(&node)?;
        let mut it = rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, Rect::union))
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}

impl RepaintScheduler for CollectingScheduler {
    fn mark_dirty(&mut self, node: NodeId, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.dirty.entry(node).or_default().push(rect);
    }
}
