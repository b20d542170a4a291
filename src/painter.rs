use crate::canvas::PaintCtx;
use crate::color::Color;
use crate::error::ComposeError;
use crate::geometry::Rect;

/// Rendering delegate for a node's own pixels.
///
/// The compositor invokes the delegate with a context already translated to
/// the node's coordinate space, the node's local bounds, and the clip it is
/// allowed to touch. The contract is: paint exactly within the given clip,
/// do not exceed the node bounds. Both hooks default to drawing nothing, so
/// a delegate implements only the layers it has pixels for.
///
/// Errors are not swallowed: a failing delegate aborts the surrounding
/// paint call, which restores its transient state and propagates the error
/// to the original caller.
pub trait NodePainter {
    fn paint_background(
        &self,
        ctx: &mut PaintCtx<'_>,
        bounds: Rect,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        let _ = (ctx, bounds, clip);
        Ok(())
    }

    fn paint_border(
        &self,
        ctx: &mut PaintCtx<'_>,
        bounds: Rect,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        let _ = (ctx, bounds, clip);
        Ok(())
    }
}

/// Fills the node with one color, with an optional one-pixel frame.
///
/// # Examples
///
/// ```
/// use tavolo::{Color, SolidPainter};
///
/// let plain = SolidPainter::new(Color::rgb(200, 50, 50));
/// let framed = SolidPainter::new(Color::WHITE).frame(Color::BLACK);
/// # let _ = (plain, framed);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolidPainter {
    fill: Color,
    frame: Option<Color>,
}

impl SolidPainter {
    pub fn new(fill: Color) -> Self {
        Self { fill, frame: None }
    }

    /// Adds a one-pixel frame along the node's edges, drawn by the border
    /// hook.
    pub fn frame(mut self, color: Color) -> Self {
        self.frame = Some(color);
        self
    }
}

impl NodePainter for SolidPainter {
    fn paint_background(
        &self,
        ctx: &mut PaintCtx<'_>,
        bounds: Rect,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        ctx.fill_rect(Rect::intersect(bounds, clip), self.fill);
        Ok(())
    }

    fn paint_border(
        &self,
        ctx: &mut PaintCtx<'_>,
        bounds: Rect,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        let Some(frame) = self.frame else {
            return Ok(());
        };
        let edges = [
            Rect::new(bounds.x, bounds.y, bounds.width, 1),
            Rect::new(bounds.x, bounds.bottom() - 1, bounds.width, 1),
            Rect::new(bounds.x, bounds.y, 1, bounds.height),
            Rect::new(bounds.right() - 1, bounds.y, 1, bounds.height),
        ];
        for edge in edges {
            ctx.fill_rect(Rect::intersect(edge, clip), frame);
        }
        Ok(())
    }
}
