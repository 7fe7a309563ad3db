use serde::{Deserialize, Serialize};

/// Top-level groups of the graph SVG, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphLayer {
    Regions,
    Grid,
    Content,
    Axes,
    AxisInfoRow,
    AxisLabels,
    ReferenceLine,
    Datelines,
}

impl GraphLayer {
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Regions => "graph-region-group",
            Self::Grid => "graph-grid",
            Self::Content => "graph-content-container",
            Self::Axes => "graph-axes",
            Self::AxisInfoRow => "graph-axis-info-row",
            Self::AxisLabels => "graph-axis-labels",
            Self::ReferenceLine => "graph-axis-reference-line",
            Self::Datelines => "graph-dateline-group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLayerStack {
    pub layers: Vec<GraphLayer>,
}

impl GraphLayerStack {
    /// Regions sit under the grid, axes exist before anything anchored to
    /// them, and datelines paint above every content mark.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            layers: vec![
                GraphLayer::Regions,
                GraphLayer::Grid,
                GraphLayer::Content,
                GraphLayer::Axes,
                GraphLayer::AxisInfoRow,
                GraphLayer::AxisLabels,
                GraphLayer::ReferenceLine,
                GraphLayer::Datelines,
            ],
        }
    }

    #[must_use]
    pub fn position(&self, layer: GraphLayer) -> Option<usize> {
        self.layers.iter().position(|candidate| *candidate == layer)
    }
}

#[cfg(test)]
mod tests {
    use super::{GraphLayer, GraphLayerStack};

    #[test]
    fn regions_paint_below_grid_and_datelines_on_top() {
        let stack = GraphLayerStack::canonical();
        assert!(stack.position(GraphLayer::Regions) < stack.position(GraphLayer::Grid));
        assert!(stack.position(GraphLayer::Grid) < stack.position(GraphLayer::Content));
        assert_eq!(
            stack.position(GraphLayer::Datelines),
            Some(stack.layers.len() - 1)
        );
    }
}
