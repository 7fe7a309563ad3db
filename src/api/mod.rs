mod axis_builder;
mod axis_info_row;
mod axis_label_format;
mod axis_ticks;
mod canvas_layout;
mod content;
mod graph;
mod graph_config;
mod graph_interaction;
mod graph_lifecycle;
mod graph_snapshot;
mod json_contract;
mod legend;
mod listener_registry;
mod scale_coordinator;
mod shown_targets;
mod validation;

pub use axis_builder::{AxesLayer, ResolvedTick};
pub use axis_info_row::AxisInfoRow;
pub use axis_label_format::{TickFormat, format_tick};
pub use axis_ticks::{Tick, TickBucket, TickMode, TickSet, TickWeight};
pub use canvas_layout::{CanvasLayout, PlotArea, TRACK_HEIGHT};
pub use content::{ContentContext, ContentId, ContentKind, ContentState, GraphContent};
pub(crate) use content::{ensure_loadable, ensure_loaded};
pub use graph::Graph;
pub use graph_config::{
    AxesConfig, AxisConfig, AxisDomainConfig, DEFAULT_CANVAS_HEIGHT, DEFAULT_THROTTLE_MS,
    DatelineConfig, DatelineLabel, DimensionConfig, GraphConfig, TicksConfig,
};
pub use graph_snapshot::{ContentSnapshot, GraphSnapshot};
pub use json_contract::{GRAPH_SNAPSHOT_JSON_SCHEMA_V1, GraphSnapshotJsonContractV1};
pub use legend::{Legend, LegendItem};
pub use scale_coordinator::{AxisDomains, BarLayout};
pub use shown_targets::ShownTargets;
pub use validation::{GraphSettings, ResolvedAxis, ResolvedDateline};
