//! Instrumented rendering delegates for exercising the paint pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use tavolo::{Color, ComposeError, NodePainter, PaintCtx, Rect};

/// Shared invocation log filled in paint order by [`RecordingPainter`]s.
pub type PaintLog = Rc<RefCell<Vec<String>>>;

pub fn paint_log() -> PaintLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Fills like a solid painter and records every background/border
/// invocation into a shared log, so tests can assert which delegates ran
/// and in what order.
pub struct RecordingPainter {
    label: &'static str,
    fill: Color,
    log: PaintLog,
}

impl RecordingPainter {
    pub fn new(label: &'static str, fill: Color, log: &PaintLog) -> Self {
        Self {
            label,
            fill,
            log: Rc::clone(log),
        }
    }
}

impl NodePainter for RecordingPainter {
    fn paint_background(
        &self,
        ctx: &mut PaintCtx<'_>,
        bounds: Rect,
        clip: Rect,
    ) -> Result<(), ComposeError> {
        self.log.borrow_mut().push(format!("{}:background", self.label));
        ctx.fill_rect(Rect::intersect(bounds, clip), self.fill);
        Ok(())
    }

    fn paint_border(
        &self,
        _ctx: &mut PaintCtx<'_>,
        _bounds: Rect,
        _clip: Rect,
    ) -> Result<(), ComposeError> {
        self.log.borrow_mut().push(format!("{}:border", self.label));
        Ok(())
    }
}

/// Paints its background, then fails from the border hook — for verifying
/// that transient paint state is restored when a delegate errors mid-call.
pub struct FailingPainter {
    fill: Color,
}

impl FailingPainter {
    pub fn new(fill: Color) -> Self {
        Self { fill }
    }
}

impl NodePainter for FailingPainter {
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
        _ctx: &mut PaintCtx<'_>,
        _bounds: Rect,
        _clip: Rect,
    ) -> Result<(), ComposeError> {
        Err(ComposeError::DelegateFailed(
            "probe painter fails on purpose".into(),
        ))
    }
}
