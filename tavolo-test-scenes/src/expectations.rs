/// A single pixel-color expectation to validate after compositing.
pub struct PixelExpectation {
    pub x: u32,
    pub y: u32,
    pub expected_r: u8,
    pub expected_g: u8,
    pub expected_b: u8,
    /// Per-channel tolerance for comparison (default 0: software
    /// compositing is exact).
    pub tolerance: u8,
    /// Human-readable label for failure messages.
    pub label: &'static str,
}

impl PixelExpectation {
    pub fn new(x: u32, y: u32, r: u8, g: u8, b: u8, label: &'static str) -> Self {
        Self {
            x,
            y,
            expected_r: r,
            expected_g: g,
            expected_b: b,
            tolerance: 0,
            label,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Convenience: expect an untouched (zero) pixel.
    pub fn untouched(x: u32, y: u32, label: &'static str) -> Self {
        Self::new(x, y, 0, 0, 0, label)
    }
}

/// Validates pixel expectations against packed `0x00RRGGBB` frame pixels.
///
/// Returns a list of human-readable failure descriptions. An empty list
/// means all expectations passed.
pub fn check_pixels(
    pixels: &[u32],
    width: u32,
    height: u32,
    expectations: &[PixelExpectation],
) -> Vec<String> {
    let mut failures = Vec::new();

    for expectation in expectations {
        if expectation.x >= width || expectation.y >= height {
            failures.push(format!(
                "[{}] pixel ({},{}) is outside canvas {}×{}",
                expectation.label, expectation.x, expectation.y, width, height,
            ));
            continue;
        }

        let offset = (expectation.y as usize) * (width as usize) + (expectation.x as usize);
        let pixel = pixels[offset];
        let actual_r = ((pixel >> 16) & 0xFF) as u8;
        let actual_g = ((pixel >> 8) & 0xFF) as u8;
        let actual_b = (pixel & 0xFF) as u8;

        let tolerance = expectation.tolerance;
        let off = |actual: u8, expected: u8| actual.abs_diff(expected) > tolerance;
        if off(actual_r, expectation.expected_r)
            || off(actual_g, expectation.expected_g)
            || off(actual_b, expectation.expected_b)
        {
            failures.push(format!(
                "[{}] pixel ({},{}): expected rgb({},{},{}), got rgb({},{},{})",
                expectation.label,
                expectation.x,
                expectation.y,
                expectation.expected_r,
                expectation.expected_g,
                expectation.expected_b,
                actual_r,
                actual_g,
                actual_b,
            ));
        }
    }

    failures
}
