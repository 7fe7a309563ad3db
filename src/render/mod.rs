mod frame;
mod glyph;
mod layer_stack;
mod null_renderer;
mod primitives;
mod scene;
mod svg_renderer;

pub use frame::RenderFrame;
pub use glyph::{GLYPH_SIZE, LABEL_GLYPH_SIZE, append_glyph, glyph_path};
pub use layer_stack::{GraphLayer, GraphLayerStack};
pub use null_renderer::NullRenderer;
pub use primitives::{
    AXIS_COLOR, Color, DATELINE_COLOR, DEFAULT_PALETTE, GRID_COLOR, GRID_MINOR_COLOR,
    REGION_COLOR, resolve_color,
};
pub use scene::{NodeId, SceneGraph, SceneNode, fmt_px, translate};
pub use svg_renderer::{SvgRenderer, serialize_node};

use crate::error::GraphResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the retained scene after every lifecycle step has run,
/// so output code stays isolated from scale and lifecycle logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> GraphResult<()>;
}
