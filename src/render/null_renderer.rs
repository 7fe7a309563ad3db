use crate::error::GraphResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless graph usage.
///
/// It still validates the frame so tests catch non-finite geometry before
/// any real backend sees it.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_node_count: usize,
    pub render_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> GraphResult<()> {
        frame.validate()?;
        self.last_node_count = frame.scene.descendants(frame.canvas).len();
        self.render_count += 1;
        Ok(())
    }
}
