//! Reusable offscreen pixel buffers for double-buffered painting.
//!
//! One pool serves one top-level rendering surface. The pool clamps every
//! request to its maximum tile size, which is what drives tiled painting
//! when a clip is larger than the buffer. Mutual exclusion between nested
//! buffering attempts is the paint pipeline's job (via its transient flags),
//! not the pool's: the pool will happily hand out a buffer to anyone who
//! asks while buffering is enabled.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::canvas::Canvas;
use crate::node::NodeId;

/// Default maximum tile extent, per side.
const DEFAULT_MAX_TILE: u32 = 256;
/// How many per-owner buffers the pool retains between paints.
const RETAINED_BUFFERS: usize = 4;

/// A reusable pixel surface lent out by the [`BufferPool`].
///
/// Borrowed for one paint call and released (not destroyed) afterward; it
/// may be smaller than the clip it was requested for, in which case the
/// caller paints in buffer-sized tiles.
pub struct OffscreenBuffer {
    canvas: Canvas,
}

impl OffscreenBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

/// Offscreen buffer pool for one top-level rendering surface.
///
/// Retained buffers are kept per owning node in a bounded LRU map, so
/// owners that stop painting age out instead of pinning pixel memory. A
/// retained buffer is reused as-is when it is at least as large as the
/// (clamped) request and reallocated when the request grew.
pub struct BufferPool {
    max_width: u32,
    max_height: u32,
    enabled: bool,
    retained: LruCache<NodeId, OffscreenBuffer>,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferPool {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_TILE, DEFAULT_MAX_TILE)
    }

    /// A pool whose buffers never exceed the given extent per side. A zero
    /// extent is not usable; it is clamped to the default with a warning.
    pub fn with_max_size(max_width: u32, max_height: u32) -> Self {
        let (max_width, max_height) = if max_width == 0 || max_height == 0 {
            log::warn!(
                "Buffer pool maximum {}x{} is unusable, clamping to {}x{}",
                max_width,
                max_height,
                DEFAULT_MAX_TILE,
                DEFAULT_MAX_TILE
            );
            (DEFAULT_MAX_TILE, DEFAULT_MAX_TILE)
        } else {
            (max_width, max_height)
        };
        Self {
            max_width,
            max_height,
            enabled: true,
            retained: LruCache::new(
                NonZeroUsize::new(RETAINED_BUFFERS).expect("Retained buffer count to be non-zero"),
            ),
        }
    }

    /// Whether buffered painting is globally enabled for this surface.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Globally enables or disables buffered painting. Disabling also drops
    /// every retained buffer.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.retained.clear();
        }
    }

    /// Lends out a buffer for `owner`, sized up to the requested extent but
    /// never beyond the pool maximum. Returns `None` while buffering is
    /// disabled or for a non-positive request.
    pub fn acquire(&mut self, owner: NodeId, width: u32, height: u32) -> Option<OffscreenBuffer> {
        if !self.enabled || width == 0 || height == 0 {
            return None;
        }
        let width = width.min(self.max_width);
        let height = height.min(self.max_height);
        if let Some(retained) = self.retained.pop(&owner) {
            if retained.width() >= width && retained.height() >= height {
                return Some(retained);
            }
        }
        Some(OffscreenBuffer::new(width, height))
    }

    /// Returns a borrowed buffer to the pool for later reuse by `owner`.
    pub fn release(&mut self, owner: NodeId, buffer: OffscreenBuffer) {
        self.retained.put(owner, buffer);
    }

    /// Drops the buffer retained for `owner`, if any.
    pub fn reset(&mut self, owner: NodeId) {
        self.retained.pop(&owner);
    }

    /// Drops every retained buffer. Called when the owning surface's
    /// geometry changes.
    pub fn reset_all(&mut self) {
        self.retained.clear();
    }

    /// How many buffers the pool currently retains.
    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }
}
