pub mod domain;
pub mod primitives;
pub mod scale;
pub mod shape;
pub mod types;

pub use domain::{
    ContentRange, DomainPadding, DomainRules, compute_domain, is_range_modified, ordinal_domain,
    pad_domain,
};
pub use scale::{AxisScale, BandScale, LinearScale, ScaleSet};
pub use shape::Shape;
pub use types::{AxisId, AxisType, DataPoint, Domain, Padding, Visibility, XCoord};
