mod dateline;
mod label_shape;
mod listener;
mod region;

pub use dateline::DatelineLayer;
pub use label_shape::LabelShapes;
pub use listener::{GraphEvent, GraphListener, ListenerContext};
pub use region::{RegionInput, RegionOwner, RegionSet, RegionSpec, RegionState, validate_regions};
