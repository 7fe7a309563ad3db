//! Graph-level vertical date markers.
//!
//! The dateline group is always the last child of the canvas. After every
//! content load it is torn down and recreated so no content mark can paint
//! above it.

use tracing::{trace, warn};

use crate::api::{CanvasLayout, ResolvedDateline};
use crate::core::{ScaleSet, Visibility};
use crate::render::{GLYPH_SIZE, GraphLayer, NodeId, SceneGraph, append_glyph, fmt_px, translate};

const INDICATOR_SIZE: f64 = 1.5 * GLYPH_SIZE;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DatelineNodes {
    root: NodeId,
    line: NodeId,
    indicator: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct DatelineLayer {
    group: Option<NodeId>,
    items: Vec<DatelineNodes>,
}

impl DatelineLayer {
    #[must_use]
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Root node of the dateline at `index`, in configuration order.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).map(|item| item.root)
    }

    pub(crate) fn draw(
        &mut self,
        scene: &mut SceneGraph,
        canvas: NodeId,
        datelines: &[ResolvedDateline],
        scales: &ScaleSet,
        layout: &CanvasLayout,
    ) {
        let group = scene.append(canvas, "g");
        scene.set_attr(group, "class", GraphLayer::Datelines.class_name());
        self.group = Some(group);
        self.items = datelines
            .iter()
            .map(|dateline| {
                let root = scene.append(group, "g");
                scene.with_attrs(
                    root,
                    &[
                        ("class", "dateline-group".to_owned()),
                        ("aria-describedby", format!("dateline_{}", dateline.index)),
                        ("aria-disabled", (!dateline.clickable).to_string()),
                    ],
                );
                if let Some(label) = &dateline.label {
                    scene.set_attr(root, "aria-label", label.clone());
                }
                let line = scene.append(root, "line");
                scene.with_attrs(
                    line,
                    &[
                        ("class", "dateline".to_owned()),
                        ("stroke", dateline.color.to_hex()),
                    ],
                );
                let indicator = dateline.show_indicator.then(|| {
                    let node =
                        append_glyph(scene, root, dateline.shape, INDICATOR_SIZE, dateline.color);
                    scene.set_attr(node, "class", "dateline-indicator");
                    node
                });
                DatelineNodes {
                    root,
                    line,
                    indicator,
                }
            })
            .collect();
        self.translate(scene, datelines, scales, layout);
        trace!(count = self.items.len(), "drew datelines");
    }

    /// Recreates the group as the topmost canvas child.
    pub(crate) fn redraw(
        &mut self,
        scene: &mut SceneGraph,
        canvas: NodeId,
        datelines: &[ResolvedDateline],
        scales: &ScaleSet,
        layout: &CanvasLayout,
    ) {
        self.remove(scene);
        self.draw(scene, canvas, datelines, scales, layout);
    }

    pub(crate) fn translate(
        &self,
        scene: &mut SceneGraph,
        datelines: &[ResolvedDateline],
        scales: &ScaleSet,
        layout: &CanvasLayout,
    ) {
        let Some(x_scale) = scales.x.as_linear() else {
            return;
        };
        let domain = x_scale.domain();
        let plot = layout.plot;
        for (nodes, dateline) in self.items.iter().zip(datelines) {
            let visibility = Visibility::from_hidden(!domain.contains(dateline.value));
            if visibility.is_hidden() {
                warn!(
                    index = dateline.index,
                    value = dateline.value,
                    "dateline lies outside the x domain"
                );
            }
            let x = x_scale.map(dateline.value).clamp(plot.left, plot.right);
            scene.set_attr(nodes.root, "aria-hidden", visibility.aria_hidden());
            scene.set_attr(nodes.line, "x1", fmt_px(x));
            scene.set_attr(nodes.line, "x2", fmt_px(x));
            scene.set_attr(nodes.line, "y1", fmt_px(plot.top));
            scene.set_attr(nodes.line, "y2", fmt_px(plot.bottom));
            if let Some(indicator) = nodes.indicator {
                scene.set_attr(indicator, "transform", translate(x, plot.top));
            }
        }
    }

    pub(crate) fn remove(&mut self, scene: &mut SceneGraph) {
        if let Some(group) = self.group.take() {
            scene.remove(group);
        }
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::DatelineLayer;
    use crate::api::{CanvasLayout, PlotArea, ResolvedDateline};
    use crate::core::{AxisScale, Domain, LinearScale, ScaleSet, Shape};
    use crate::render::{DATELINE_COLOR, SceneGraph};

    fn fixture() -> (ScaleSet, CanvasLayout, Vec<ResolvedDateline>) {
        let layout = CanvasLayout {
            width: 200.0,
            height: 100.0,
            plot: PlotArea {
                left: 0.0,
                top: 0.0,
                right: 100.0,
                bottom: 100.0,
            },
            info_row_top: None,
        };
        let scales = ScaleSet {
            x: AxisScale::Linear(LinearScale::new(Domain::new(0.0, 1000.0), (0.0, 100.0)).unwrap()),
            y: LinearScale::new(Domain::new(0.0, 1.0), (100.0, 0.0)).unwrap(),
            y2: None,
        };
        let datelines = vec![ResolvedDateline {
            index: 0,
            value: 500.0,
            color: DATELINE_COLOR,
            shape: Shape::Diamond,
            show_indicator: true,
            label: Some("Release".into()),
            clickable: false,
        }];
        (scales, layout, datelines)
    }

    #[test]
    fn redraw_moves_group_to_top_of_canvas() {
        let (scales, layout, datelines) = fixture();
        let mut scene = SceneGraph::new();
        let canvas = scene.create_root("svg");
        let mut layer = DatelineLayer::default();
        layer.draw(&mut scene, canvas, &datelines, &scales, &layout);
        let line = scene.children(layer.node(0).unwrap())[0];
        assert_eq!(scene.attr(line, "x1"), Some("50"));

        let content = scene.append(canvas, "g");
        assert_eq!(scene.children(canvas).last(), Some(&content));
        layer.redraw(&mut scene, canvas, &datelines, &scales, &layout);
        assert_eq!(scene.children(canvas).last(), layer.group().as_ref());
        assert_eq!(scene.children(canvas).len(), 2);
    }
}
