pub mod expectations;
pub mod probes;
pub mod scene;

pub use expectations::{check_pixels, PixelExpectation};
pub use probes::{FailingPainter, RecordingPainter};
pub use scene::{build_overlap_scene, CANVAS_HEIGHT, CANVAS_WIDTH};
