/// Double-buffered painting: tiling, buffer reuse, mutual exclusion, and
/// transient-flag restoration.
///
/// Run with:   cargo test --test buffering
use tavolo::{BufferPool, Color, Compositor, Node, PaintFlags, Rect, SolidPainter};
use tavolo_test_scenes::probes::{paint_log, FailingPainter, RecordingPainter};

/// A 150×100 clip against a 64×64 buffer tiles into ceil(150/64) ×
/// ceil(100/64) = 6 tiles, each running the node's own painting once, and
/// the blitted tiles reconstruct the full region with no gaps.
#[test]
fn large_clip_paints_in_buffer_sized_tiles() {
    let mut compositor = Compositor::with_pool(BufferPool::with_max_size(64, 64));
    compositor.resize_surface(150, 100);
    let log = paint_log();
    compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 150, 100))
            .opaque(true)
            .double_buffered(true)
            .delegate(RecordingPainter::new("root", Color::rgb(250, 120, 0), &log)),
    );

    compositor.paint_surface().unwrap();

    let backgrounds = log
        .borrow()
        .iter()
        .filter(|entry| entry.as_str() == "root:background")
        .count();
    assert_eq!(backgrounds, 6);

    let frame = compositor.frame().unwrap();
    let fill = Color::rgb(250, 120, 0).to_pixel();
    assert!(frame.pixels().iter().all(|&p| p == fill));
}

/// Tile seams land children at their correct offsets: a child spanning
/// multiple tiles comes out contiguous.
#[test]
fn child_spanning_tiles_is_reassembled_seamlessly() {
    let mut compositor = Compositor::with_pool(BufferPool::with_max_size(64, 64));
    compositor.resize_surface(150, 100);
    let root = compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 150, 100))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::WHITE)),
    );
    compositor.add_node(
        Some(root),
        Node::new(Rect::new(40, 30, 80, 50)).delegate(SolidPainter::new(Color::rgb(0, 150, 0))),
    );

    compositor.paint_surface().unwrap();

    let frame = compositor.frame().unwrap();
    let green = Color::rgb(0, 150, 0).to_pixel();
    let white = Color::WHITE.to_pixel();
    for y in 30..80 {
        for x in 40..120 {
            assert_eq!(frame.pixel(x, y), Some(green), "seam at ({x},{y})");
        }
    }
    assert_eq!(frame.pixel(39, 30), Some(white));
    assert_eq!(frame.pixel(120, 79), Some(white));
}

/// A double-buffered descendant of a node already using the buffer falls
/// back to direct painting: only one buffer is ever acquired.
#[test]
fn nested_buffering_falls_back_to_direct() {
    let mut compositor = Compositor::with_pool(BufferPool::with_max_size(256, 256));
    compositor.resize_surface(100, 100);
    let root = compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 100, 100))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::WHITE)),
    );
    let child = compositor.add_node(
        Some(root),
        Node::new(Rect::new(10, 10, 50, 50))
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::rgb(0, 0, 150))),
    );

    compositor.paint_surface().unwrap();

    // Only the root's buffer was acquired and released.
    assert_eq!(compositor.pool().retained_count(), 1);
    let frame = compositor.frame().unwrap();
    assert_eq!(frame.pixel(20, 20), Some(Color::rgb(0, 0, 150).to_pixel()));
    assert_eq!(compositor.node(child).unwrap().flags(), PaintFlags::default());
}

/// Buffered and direct painting produce the same pixels.
#[test]
fn buffered_output_matches_direct_output() {
    let build = |compositor: &mut Compositor, buffered: bool| {
        compositor.resize_surface(120, 90);
        let root = compositor.add_node(
            None,
            Node::new(Rect::new(0, 0, 120, 90))
                .opaque(true)
                .double_buffered(buffered)
                .delegate(SolidPainter::new(Color::WHITE).frame(Color::BLACK)),
        );
        compositor.add_node(
            Some(root),
            Node::new(Rect::new(15, 20, 60, 40))
                .opaque(true)
                .delegate(SolidPainter::new(Color::rgb(180, 40, 40))),
        );
        compositor.add_node(
            Some(root),
            Node::new(Rect::new(40, 10, 60, 60)).delegate(SolidPainter::new(Color::rgb(40, 40, 180))),
        );
    };

    let mut buffered = Compositor::with_pool(BufferPool::with_max_size(32, 32));
    build(&mut buffered, true);
    buffered.paint_surface().unwrap();

    let mut direct = Compositor::new();
    build(&mut direct, false);
    direct.paint_surface().unwrap();

    assert_eq!(
        buffered.frame().unwrap().pixels(),
        direct.frame().unwrap().pixels(),
    );
}

/// Printing bypasses buffering entirely.
#[test]
fn printing_paints_directly() {
    let mut compositor = Compositor::new();
    compositor.resize_surface(80, 80);
    compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 80, 80))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::rgb(10, 20, 30))),
    );

    compositor.print_surface().unwrap();

    assert_eq!(compositor.pool().retained_count(), 0);
    let frame = compositor.frame().unwrap();
    assert!(frame
        .pixels()
        .iter()
        .all(|&p| p == Color::rgb(10, 20, 30).to_pixel()));
}

/// Disabling the pool forces direct painting without changing the output.
#[test]
fn disabled_pool_falls_back_to_direct() {
    let mut compositor = Compositor::new();
    compositor.resize_surface(80, 80);
    compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 80, 80))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::rgb(90, 90, 90))),
    );
    compositor.pool_mut().set_enabled(false);

    compositor.paint_surface().unwrap();

    assert_eq!(compositor.pool().retained_count(), 0);
    assert_eq!(
        compositor.frame().unwrap().pixel(40, 40),
        Some(Color::rgb(90, 90, 90).to_pixel()),
    );
}

/// A failing delegate aborts the paint, but every transient flag is back
/// to its pre-call value and the buffer went back to the pool.
#[test]
fn failing_delegate_restores_flags() {
    let mut compositor = Compositor::with_pool(BufferPool::with_max_size(64, 64));
    compositor.resize_surface(100, 100);
    let root = compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 100, 100))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::WHITE)),
    );
    let middle = compositor.add_node(
        Some(root),
        Node::new(Rect::new(5, 5, 80, 80))
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::rgb(0, 80, 0))),
    );
    let failing = compositor.add_node(
        Some(middle),
        Node::new(Rect::new(5, 5, 40, 40)).delegate(FailingPainter::new(Color::BLACK)),
    );

    assert!(compositor.paint_surface().is_err());

    for id in [root, middle, failing] {
        let node = compositor.node(id).unwrap();
        assert_eq!(node.flags(), PaintFlags::default(), "node {id}");
        assert_eq!(node.painting_child(), None, "node {id}");
    }
    // The buffer was released, not leaked.
    assert_eq!(compositor.pool().retained_count(), 1);

    // The tree is paintable again once the delegate behaves.
    compositor.set_delegate(failing, SolidPainter::new(Color::BLACK));
    compositor.paint_surface().unwrap();
}

/// The same flags hold after a failing immediate paint.
#[test]
fn failing_delegate_restores_flags_on_immediate_path() {
    let mut compositor = Compositor::new();
    compositor.resize_surface(100, 100);
    let root = compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 100, 100))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::WHITE)),
    );
    let failing = compositor.add_node(
        Some(root),
        Node::new(Rect::new(10, 10, 40, 40)).delegate(FailingPainter::new(Color::BLACK)),
    );

    assert!(compositor
        .paint_immediately(failing, Rect::new(0, 0, 40, 40))
        .is_err());

    for id in [root, failing] {
        let node = compositor.node(id).unwrap();
        assert_eq!(node.flags(), PaintFlags::default(), "node {id}");
        assert_eq!(node.painting_child(), None, "node {id}");
    }
}

/// The surface resize drops retained buffers: they are scoped to the
/// geometry they were created under.
#[test]
fn resize_resets_retained_buffers() {
    let mut compositor = Compositor::new();
    compositor.resize_surface(100, 100);
    compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, 100, 100))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::WHITE)),
    );
    compositor.paint_surface().unwrap();
    assert_eq!(compositor.pool().retained_count(), 1);

    compositor.resize_surface(200, 200);
    assert_eq!(compositor.pool().retained_count(), 0);
}
