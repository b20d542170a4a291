use tavolo::{Color, Compositor, Node, NodeId, Rect, SolidPainter};

use crate::expectations::PixelExpectation;

pub const CANVAS_WIDTH: u32 = 200;
pub const CANVAS_HEIGHT: u32 = 200;

pub const ROOT_FILL: Color = Color([230, 230, 230, 255]);
pub const FRONT_FILL: Color = Color([200, 40, 40, 255]);
pub const BACK_FILL: Color = Color([40, 40, 200, 255]);

/// Ids of the nodes [`build_overlap_scene`] creates.
pub struct OverlapScene {
    pub root: NodeId,
    pub front: NodeId,
    pub back: NodeId,
}

/// The canonical overlap scene: an opaque root filling the surface, an
/// opaque front child covering the top-left quarter, and a translucent
/// back child covering everything.
///
/// Shared between the integration tests (via `paint_surface` +
/// `check_pixels`) and the winit demo (via the presented frame).
pub fn build_overlap_scene(compositor: &mut Compositor) -> (OverlapScene, Vec<PixelExpectation>) {
    compositor.resize_surface(CANVAS_WIDTH, CANVAS_HEIGHT);

    let root = compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32))
            .opaque(true)
            .delegate(SolidPainter::new(ROOT_FILL)),
    );
    // Attached first, so it sits in front of the full-size back child.
    let front = compositor.add_node(
        Some(root),
        Node::new(Rect::new(0, 0, 100, 100))
            .opaque(true)
            .delegate(SolidPainter::new(FRONT_FILL)),
    );
    let back = compositor.add_node(
        Some(root),
        Node::new(Rect::new(0, 0, CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32))
            .delegate(SolidPainter::new(BACK_FILL)),
    );

    let [fr, fg, fb, _] = FRONT_FILL.to_array();
    let [br, bg, bb, _] = BACK_FILL.to_array();
    let expectations = vec![
        PixelExpectation::new(10, 10, fr, fg, fb, "front_child_on_top"),
        PixelExpectation::new(99, 99, fr, fg, fb, "front_child_bottom_right"),
        PixelExpectation::new(150, 150, br, bg, bb, "back_child_outside_front"),
        PixelExpectation::new(100, 100, br, bg, bb, "back_child_at_front_edge"),
    ];

    (OverlapScene { root, front, back }, expectations)
}
