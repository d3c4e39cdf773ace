//! Headless renderer.
//!
//! Receives the world's composited blits and records them instead of
//! drawing. Per-frame totals are logged at `trace`.

use hunter_common::Vec2;
use hunter_gameplay::content::Frame;
use hunter_gameplay::render::RenderSink;
use tracing::trace;

/// Render sink that counts blits and remembers the last frame's draw list.
#[derive(Debug, Default)]
pub struct LogRenderer {
    /// Blits issued this frame
    frame: Vec<(String, Vec2)>,
    /// Blits issued since creation
    total_blits: u64,
    /// Frames presented since creation
    frame_count: u64,
}

impl LogRenderer {
    /// Create an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame, dropping the previous draw list.
    pub fn begin_frame(&mut self) {
        self.frame.clear();
    }

    /// Finish the frame.
    pub fn present(&mut self) {
        self.frame_count += 1;
        trace!(frame = self.frame_count, blits = self.frame.len(), "frame presented");
    }

    /// Draw list of the current frame: image id and screen position.
    #[must_use]
    pub fn draw_list(&self) -> &[(String, Vec2)] {
        &self.frame
    }

    /// Blits issued since creation.
    #[must_use]
    pub fn total_blits(&self) -> u64 {
        self.total_blits
    }

    /// Frames presented since creation.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl RenderSink for LogRenderer {
    fn blit(&mut self, image: &Frame, screen_pos: Vec2) {
        self.frame.push((image.id.clone(), screen_pos));
        self.total_blits += 1;
    }
}
