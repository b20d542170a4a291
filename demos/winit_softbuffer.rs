use std::num::NonZeroU32;
use std::sync::Arc;
use tavolo::{Color, Compositor, Node, NodeId, Rect, SolidPainter};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    compositor: Option<Compositor>,
    moving_node: Option<NodeId>,
    softbuffer_context: Option<softbuffer::Context<Arc<Window>>>,
    softbuffer_surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    frame_count: u64,
}

fn build_scene(compositor: &mut Compositor, width: u32, height: u32) -> NodeId {
    let root = compositor.add_node(
        None,
        Node::new(Rect::new(0, 0, width as i32, height as i32))
            .opaque(true)
            .double_buffered(true)
            .delegate(SolidPainter::new(Color::rgb(255, 255, 200))),
    );
    compositor.add_node(
        Some(root),
        Node::new(Rect::new(220, 0, 200, 200))
            .opaque(true)
            .delegate(SolidPainter::new(Color::rgb(0, 0, 255)).frame(Color::BLACK)),
    );
    // The red square is attached behind the blue one and slides under it.
    compositor.add_node(
        Some(root),
        Node::new(Rect::new(0, 0, 200, 200))
            .opaque(true)
            .delegate(SolidPainter::new(Color::rgb(255, 0, 0)).frame(Color::BLACK)),
    )
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes().with_title("Tavolo + Softbuffer"),
                )
                .unwrap(),
        );

        let window_size = window.inner_size();
        let mut compositor = Compositor::new();
        compositor.resize_surface(window_size.width, window_size.height);
        self.moving_node = Some(build_scene(
            &mut compositor,
            window_size.width,
            window_size.height,
        ));

        let softbuffer_context = softbuffer::Context::new(window.clone()).unwrap();
        let mut softbuffer_surface =
            softbuffer::Surface::new(&softbuffer_context, window.clone()).unwrap();
        if window_size.width > 0 && window_size.height > 0 {
            softbuffer_surface
                .resize(
                    NonZeroU32::new(window_size.width).unwrap(),
                    NonZeroU32::new(window_size.height).unwrap(),
                )
                .unwrap();
        }

        self.window = Some(window);
        self.compositor = Some(compositor);
        self.softbuffer_context = Some(softbuffer_context);
        self.softbuffer_surface = Some(softbuffer_surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        let Some(compositor) = &mut self.compositor else {
            return;
        };
        let Some(softbuffer_surface) = &mut self.softbuffer_surface else {
            return;
        };

        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                if physical_size.width > 0 && physical_size.height > 0 {
                    softbuffer_surface
                        .resize(
                            NonZeroU32::new(physical_size.width).unwrap(),
                            NonZeroU32::new(physical_size.height).unwrap(),
                        )
                        .unwrap();
                    compositor.resize_surface(physical_size.width, physical_size.height);
                    compositor.clear();
                    self.moving_node = Some(build_scene(
                        compositor,
                        physical_size.width,
                        physical_size.height,
                    ));
                }
                window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                self.frame_count += 1;

                // Slide the red square with a deferred-style reshape, then
                // composite the whole frame.
                if let Some(moving) = self.moving_node {
                    let mut damage = tavolo::CollectingScheduler::new();
                    let offset = ((self.frame_count * 2) % 300) as i32;
                    compositor.reshape(
                        moving,
                        Rect::new(offset, offset / 2, 200, 200),
                        &mut damage,
                    );
                }
                compositor.paint_surface().unwrap();

                let Some(frame) = compositor.frame() else {
                    return;
                };
                let mut buffer = softbuffer_surface.buffer_mut().unwrap();
                let count = buffer.len().min(frame.pixels().len());
                buffer[..count].copy_from_slice(&frame.pixels()[..count]);
                buffer.present().unwrap();

                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    let event_loop = EventLoop::new().expect("to start an event loop");
    let mut app = App::default();
    event_loop.run_app(&mut app).unwrap();
}
