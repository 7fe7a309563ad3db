//! graph-rs: declarative Cartesian graph engine.
//!
//! A [`Graph`] owns a retained SVG scene graph, shared x and y axes, a
//! legend and the loaded chart contents. Contents (line, bar, paired) are
//! validated on construction, bound to the graph on load and keep their
//! marks positioned across resizes.

pub mod api;
pub mod content;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{Graph, GraphConfig};
pub use content::Content;
pub use error::{ErrorKind, GraphError, GraphResult};
