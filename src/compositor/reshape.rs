use crate::geometry::Rect;
use crate::node::NodeId;
use crate::scheduler::RepaintScheduler;

use super::Compositor;

impl Compositor {
    /// Moves or resizes a node and reports the stale regions.
    ///
    /// Damage covers the parts of the old bounds the new bounds no longer
    /// reach, in the parent's coordinate space: up to four rectangles when
    /// old and new overlap, the whole old bounds when they are disjoint.
    /// For the root the reporting space is the surface and the damage is
    /// recorded against the root itself. Nothing is reported for a node
    /// that is not showing. The new bounds are committed in every case.
    pub fn reshape(&mut self, id: NodeId, bounds: Rect, scheduler: &mut dyn RepaintScheduler) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let old = node.bounds;
        if old == bounds {
            return;
        }
        if self.is_showing(id) {
            let report_against = self.tree.parent_index_unchecked(id).unwrap_or(id);
            if Rect::intersect(old, bounds).is_empty() {
                scheduler.mark_dirty(report_against, old);
            } else {
                for stale in Rect::difference(old, bounds) {
                    scheduler.mark_dirty(report_against, stale);
                }
            }
        }
        if let Some(node) = self.tree.get_mut(id) {
            node.bounds = bounds;
        }
        // Lightweight nodes have no native peer to notify; surface geometry
        // only changes through resize_surface.
        log::trace!("Node {id} reshaped to {bounds:?}");
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::Rect;
    use crate::node::Node;
    use crate::scheduler::CollectingScheduler;
    use crate::Compositor;

    fn showing_tree() -> (Compositor, usize, usize) {
        let mut compositor = Compositor::new();
        compositor.resize_surface(200, 200);
        let root = compositor.add_node(None, Node::new(Rect::new(0, 0, 200, 200)).opaque(true));
        let child = compositor.add_node(Some(root), Node::new(Rect::new(10, 10, 100, 100)));
        (compositor, root, child)
    }

    #[test]
    fn equal_bounds_are_a_no_op() {
        let (mut compositor, _, child) = showing_tree();
        let mut scheduler = CollectingScheduler::new();
        compositor.reshape(child, Rect::new(10, 10, 100, 100), &mut scheduler);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn shrink_reports_uncovered_bands_against_parent() {
        let (mut compositor, root, child) = showing_tree();
        let mut scheduler = CollectingScheduler::new();
        compositor.reshape(child, Rect::new(10, 10, 60, 60), &mut scheduler);

        let rects = scheduler.dirty_rects(root);
        assert_eq!(rects.len(), 2);
        assert!(rects.contains(&Rect::new(10, 70, 100, 40)));
        assert!(rects.contains(&Rect::new(70, 10, 40, 60)));
        assert_eq!(
            compositor.node(child).unwrap().bounds(),
            Rect::new(10, 10, 60, 60)
        );
    }

    #[test]
    fn disjoint_move_reports_whole_old_bounds() {
        let (mut compositor, root, child) = showing_tree();
        let mut scheduler = CollectingScheduler::new();
        compositor.reshape(child, Rect::new(150, 150, 40, 40), &mut scheduler);

        assert_eq!(scheduler.dirty_rects(root), &[Rect::new(10, 10, 100, 100)]);
    }

    #[test]
    fn hidden_node_commits_bounds_without_damage() {
        let (mut compositor, _, child) = showing_tree();
        compositor.set_visible(child, false);
        let mut scheduler = CollectingScheduler::new();
        compositor.reshape(child, Rect::new(0, 0, 30, 30), &mut scheduler);

        assert!(scheduler.is_empty());
        assert_eq!(
            compositor.node(child).unwrap().bounds(),
            Rect::new(0, 0, 30, 30)
        );
    }

    #[test]
    fn repaint_clamps_to_node_bounds() {
        let (mut compositor, _, child) = showing_tree();
        let mut scheduler = CollectingScheduler::new();
        compositor.repaint(child, Rect::new(80, 80, 100, 100), &mut scheduler);
        assert_eq!(
            scheduler.dirty_rects(child),
            &[Rect::new(80, 80, 20, 20)]
        );

        compositor.repaint(child, Rect::new(200, 200, 10, 10), &mut scheduler);
        assert_eq!(scheduler.dirty_rects(child).len(), 1);
    }

    #[test]
    fn repaint_all_reports_full_bounds() {
        let (mut compositor, _, child) = showing_tree();
        let mut scheduler = CollectingScheduler::new();
        compositor.repaint_all(child, &mut scheduler);
        assert_eq!(
            scheduler.dirty_rects(child),
            &[Rect::new(0, 0, 100, 100)]
        );
    }

    #[test]
    fn unrealized_surface_commits_bounds_without_damage() {
        let mut compositor = Compositor::new();
        let root = compositor.add_node(None, Node::new(Rect::new(0, 0, 100, 100)));
        let mut scheduler = CollectingScheduler::new();
        compositor.reshape(root, Rect::new(0, 0, 50, 50), &mut scheduler);

        assert!(scheduler.is_empty());
        assert_eq!(
            compositor.node(root).unwrap().bounds(),
            Rect::new(0, 0, 50, 50)
        );
    }
}
