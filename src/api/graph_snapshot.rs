use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{AxisId, DataPoint};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::RegionState;
use crate::render::Renderer;

use super::axis_builder::ResolvedTick;
use super::canvas_layout::CanvasLayout;
use super::content::{ContentId, ContentKind, ContentState, GraphContent};
use super::graph::Graph;
use super::legend::LegendItem;
use super::scale_coordinator::AxisDomains;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub id: ContentId,
    pub key: String,
    pub kind: ContentKind,
    pub state: ContentState,
    pub y_axis: AxisId,
    pub points: Vec<DataPoint>,
}

/// Serializable graph state used by regression tests and host diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub layout: CanvasLayout,
    pub domains: AxisDomains,
    pub contents: Vec<ContentSnapshot>,
    pub shown_targets: Vec<String>,
    pub legend: IndexMap<String, LegendItem>,
    pub regions: Vec<RegionState>,
    pub ticks: IndexMap<AxisId, Vec<ResolvedTick>>,
    pub dateline_count: usize,
    pub node_count: usize,
    pub mutation_count: u64,
}

impl<R: Renderer> Graph<R> {
    pub fn snapshot(&self) -> GraphResult<GraphSnapshot> {
        let session = self.session.as_ref().ok_or_else(|| {
            GraphError::usage(ErrorKind::GraphNotGenerated, "call `generate` first")
        })?;
        let state = &session.state;
        let contents = session
            .contents
            .iter()
            .map(|content| ContentSnapshot {
                id: content.id(),
                key: content.key().to_owned(),
                kind: content.kind(),
                state: content.state(),
                y_axis: content.y_axis(),
                points: content.data_target().to_vec(),
            })
            .collect();
        let legend = state
            .legend
            .targets()
            .filter_map(|target| {
                state
                    .legend
                    .item(target)
                    .map(|item| (target.to_owned(), item.clone()))
            })
            .collect();
        let ticks = [AxisId::X, AxisId::Y, AxisId::Y2]
            .into_iter()
            .filter(|axis| state.settings.axis(*axis).is_some())
            .map(|axis| (axis, state.axes.ticks(axis).to_vec()))
            .collect();

        Ok(GraphSnapshot {
            layout: state.layout,
            domains: state.domains,
            contents,
            shown_targets: state.shown.iter().map(str::to_owned).collect(),
            legend,
            regions: state.regions.states(),
            ticks,
            dateline_count: state.datelines.len(),
            node_count: state.scene.live_node_count(),
            mutation_count: state.scene.mutation_count(),
        })
    }
}
