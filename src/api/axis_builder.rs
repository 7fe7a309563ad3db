//! Axes, grid, axis labels and the zero reference line.
//!
//! Tick nodes are keyed by tick value. A redraw moves the nodes whose value
//! survives, removes the rest and only creates nodes for new values, so
//! node identity is stable across resizes.

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{AxisId, AxisScale, LinearScale, ScaleSet, Visibility};
use crate::error::GraphResult;
use crate::extensions::LabelShapes;
use crate::render::{
    AXIS_COLOR, GRID_COLOR, GRID_MINOR_COLOR, GraphLayer, LABEL_GLYPH_SIZE, NodeId, SceneGraph,
    fmt_px, translate,
};

use super::axis_label_format::format_tick;
use super::axis_ticks::{
    AXIS_X_TARGET_SPACING_PX, AXIS_Y_TARGET_SPACING_PX, TickWeight, resolve_ticks,
};
use super::canvas_layout::{
    AXIS_LABEL_SIZE, CanvasLayout, INFO_ROW_HEIGHT, X_AXIS_HEIGHT, Y_AXIS_WIDTH,
};
use super::validation::{GraphSettings, ResolvedAxis};

const TICK_SIZE: f64 = 6.0;
const TICK_LABEL_GAP: f64 = 3.0;

type TickNodes = IndexMap<OrderedFloat<f64>, NodeId>;

/// One tick after scale projection and formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTick {
    pub value: f64,
    pub weight: TickWeight,
    pub label: String,
    pub px: f64,
}

/// Ticks of `axis` under the current scales. Ordinal axes tick every
/// category, keyed by its position.
pub(crate) fn axis_ticks(
    axis: &ResolvedAxis,
    scales: &ScaleSet,
    layout: &CanvasLayout,
) -> GraphResult<Vec<ResolvedTick>> {
    match axis.id {
        AxisId::X => match &scales.x {
            AxisScale::Linear(scale) => Ok(continuous_ticks(
                axis,
                *scale,
                layout.plot.width(),
                AXIS_X_TARGET_SPACING_PX,
            )),
            AxisScale::Band(band) => Ok(band
                .keys()
                .iter()
                .enumerate()
                .filter_map(|(index, key)| {
                    band.center(key).map(|px| ResolvedTick {
                        value: index as f64,
                        weight: TickWeight::Major,
                        label: key.clone(),
                        px,
                    })
                })
                .collect()),
        },
        vertical => Ok(continuous_ticks(
            axis,
            scales.vertical(vertical)?,
            layout.plot.height(),
            AXIS_Y_TARGET_SPACING_PX,
        )),
    }
}

fn continuous_ticks(
    axis: &ResolvedAxis,
    scale: LinearScale,
    extent_px: f64,
    spacing_px: f64,
) -> Vec<ResolvedTick> {
    let domain = scale.domain();
    resolve_ticks(&axis.ticks, domain, axis.is_time(), extent_px, spacing_px)
        .ticks
        .iter()
        .map(|tick| ResolvedTick {
            value: tick.value,
            weight: tick.weight,
            label: format_tick(tick.value, axis.axis_type, &axis.format, domain.span()),
            px: scale.map(tick.value),
        })
        .collect()
}

/// Reconciles `nodes` with `values`: stale values lose their node, new
/// values get one from `build`. Returns the nodes in `values` order.
fn sync_nodes(
    scene: &mut SceneGraph,
    parent: NodeId,
    nodes: &mut TickNodes,
    values: impl IntoIterator<Item = f64>,
    mut build: impl FnMut(&mut SceneGraph, NodeId) -> NodeId,
) -> Vec<NodeId> {
    let wanted: IndexSet<OrderedFloat<f64>> = values.into_iter().map(OrderedFloat).collect();
    nodes.retain(|value, node| {
        let keep = wanted.contains(value);
        if !keep {
            scene.remove(*node);
        }
        keep
    });
    wanted
        .iter()
        .map(|value| *nodes.entry(*value).or_insert_with(|| build(scene, parent)))
        .collect()
}

#[derive(Debug, Clone)]
struct GridNodes {
    vertical_group: NodeId,
    horizontal_group: NodeId,
    vertical: TickNodes,
    horizontal: TickNodes,
}

#[derive(Debug, Clone)]
struct AxisNodes {
    id: AxisId,
    group: NodeId,
    domain_line: NodeId,
    ticks: TickNodes,
}

#[derive(Debug, Clone, Default)]
pub struct AxesLayer {
    grid: Option<GridNodes>,
    axes: Vec<AxisNodes>,
    labels: Vec<(AxisId, NodeId)>,
    shape_containers: Vec<(AxisId, NodeId)>,
    reference_line: Option<NodeId>,
    resolved: IndexMap<AxisId, Vec<ResolvedTick>>,
}

impl AxesLayer {
    pub(crate) fn create_grid(&mut self, scene: &mut SceneGraph, canvas: NodeId) -> NodeId {
        let group = scene.append(canvas, "g");
        scene.set_attr(group, "class", GraphLayer::Grid.class_name());
        let vertical_group = scene.append(group, "g");
        scene.set_attr(vertical_group, "class", "grid-x");
        let horizontal_group = scene.append(group, "g");
        scene.set_attr(horizontal_group, "class", "grid-y");
        self.grid = Some(GridNodes {
            vertical_group,
            horizontal_group,
            vertical: TickNodes::new(),
            horizontal: TickNodes::new(),
        });
        group
    }

    pub(crate) fn create_axes(
        &mut self,
        scene: &mut SceneGraph,
        canvas: NodeId,
        settings: &GraphSettings,
    ) -> NodeId {
        let group = scene.append(canvas, "g");
        scene.set_attr(group, "class", GraphLayer::Axes.class_name());
        for axis in [Some(&settings.x), Some(&settings.y), settings.y2.as_ref()]
            .into_iter()
            .flatten()
            .filter(|axis| axis.show)
        {
            let node = scene.append(group, "g");
            scene.with_attrs(
                node,
                &[
                    ("class", format!("axis axis-{}", axis.id.as_str())),
                    ("aria-describedby", format!("axis_{}", axis.id.as_str())),
                ],
            );
            let domain_line = scene.append(node, "path");
            scene.with_attrs(
                domain_line,
                &[
                    ("class", "domain".to_owned()),
                    ("stroke", AXIS_COLOR.to_hex()),
                    ("fill", "none".to_owned()),
                ],
            );
            self.axes.push(AxisNodes {
                id: axis.id,
                group: node,
                domain_line,
                ticks: TickNodes::new(),
            });
        }
        group
    }

    pub(crate) fn create_labels(
        &mut self,
        scene: &mut SceneGraph,
        canvas: NodeId,
        settings: &GraphSettings,
        label_shapes: &mut LabelShapes,
    ) -> NodeId {
        let group = scene.append(canvas, "g");
        scene.set_attr(group, "class", GraphLayer::AxisLabels.class_name());
        for axis in [Some(&settings.x), Some(&settings.y), settings.y2.as_ref()]
            .into_iter()
            .flatten()
            .filter(|axis| !axis.label.is_empty())
        {
            let node = scene.append(group, "text");
            scene.with_attrs(
                node,
                &[
                    ("class", format!("axis-label axis-label-{}", axis.id.as_str())),
                    ("text-anchor", "middle".to_owned()),
                ],
            );
            scene.set_text(node, axis.label.clone());
            self.labels.push((axis.id, node));

            if axis.id.is_vertical() && settings.show_shapes {
                let container = scene.append(group, "g");
                scene.with_attrs(
                    container,
                    &[
                        ("class", "label-shape-container".to_owned()),
                        ("aria-describedby", format!("label_shape_{}", axis.id.as_str())),
                    ],
                );
                label_shapes.attach(axis.id, container);
                self.shape_containers.push((axis.id, container));
            }
        }
        group
    }

    pub(crate) fn create_reference_line(&mut self, scene: &mut SceneGraph, canvas: NodeId) -> NodeId {
        let line = scene.append(canvas, "line");
        scene.with_attrs(
            line,
            &[
                ("class", GraphLayer::ReferenceLine.class_name().to_owned()),
                ("stroke", AXIS_COLOR.to_hex()),
            ],
        );
        self.reference_line = Some(line);
        line
    }

    /// Re-projects every axis, grid line, label and the reference line.
    pub(crate) fn translate(
        &mut self,
        scene: &mut SceneGraph,
        settings: &GraphSettings,
        scales: &ScaleSet,
        layout: &CanvasLayout,
    ) -> GraphResult<()> {
        let mut resolved = IndexMap::new();
        for axis in [Some(&settings.x), Some(&settings.y), settings.y2.as_ref()]
            .into_iter()
            .flatten()
        {
            resolved.insert(axis.id, axis_ticks(axis, scales, layout)?);
        }
        self.resolved = resolved;

        self.translate_grid(scene, layout);
        for index in 0..self.axes.len() {
            self.translate_axis(scene, index, layout);
        }
        self.translate_labels(scene, settings, layout);
        self.translate_reference_line(scene, scales, layout);
        trace!(axes = self.axes.len(), "translated axes");
        Ok(())
    }

    fn translate_grid(&mut self, scene: &mut SceneGraph, layout: &CanvasLayout) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        let plot = layout.plot;
        let empty = Vec::new();
        let x_ticks = self.resolved.get(&AxisId::X).unwrap_or(&empty);
        let y_ticks = self.resolved.get(&AxisId::Y).unwrap_or(&empty);

        let vertical = sync_nodes(
            scene,
            grid.vertical_group,
            &mut grid.vertical,
            x_ticks.iter().map(|tick| tick.value),
            |scene, parent| scene.append(parent, "line"),
        );
        for (node, tick) in vertical.into_iter().zip(x_ticks) {
            set_grid_style(scene, node, tick.weight);
            scene.set_attr(node, "x1", fmt_px(tick.px));
            scene.set_attr(node, "x2", fmt_px(tick.px));
            scene.set_attr(node, "y1", fmt_px(plot.top));
            scene.set_attr(node, "y2", fmt_px(plot.bottom));
        }

        let horizontal = sync_nodes(
            scene,
            grid.horizontal_group,
            &mut grid.horizontal,
            y_ticks.iter().map(|tick| tick.value),
            |scene, parent| scene.append(parent, "line"),
        );
        for (node, tick) in horizontal.into_iter().zip(y_ticks) {
            set_grid_style(scene, node, tick.weight);
            scene.set_attr(node, "x1", fmt_px(plot.left));
            scene.set_attr(node, "x2", fmt_px(plot.right));
            scene.set_attr(node, "y1", fmt_px(tick.px));
            scene.set_attr(node, "y2", fmt_px(tick.px));
        }
    }

    fn translate_axis(&mut self, scene: &mut SceneGraph, index: usize, layout: &CanvasLayout) {
        let plot = layout.plot;
        let axis = &mut self.axes[index];
        let id = axis.id;
        let (origin, domain_path) = match id {
            AxisId::X => (
                (0.0, plot.bottom),
                format!("M{},0H{}", fmt_px(plot.left), fmt_px(plot.right)),
            ),
            AxisId::Y => (
                (plot.left, 0.0),
                format!("M0,{}V{}", fmt_px(plot.top), fmt_px(plot.bottom)),
            ),
            AxisId::Y2 => (
                (plot.right, 0.0),
                format!("M0,{}V{}", fmt_px(plot.top), fmt_px(plot.bottom)),
            ),
        };
        scene.set_attr(axis.group, "transform", translate(origin.0, origin.1));
        scene.set_attr(axis.domain_line, "d", domain_path);

        // Midpoint ticks of a bucketed axis only reach the grid.
        let labelled: Vec<&ResolvedTick> = self
            .resolved
            .get(&id)
            .map(|ticks| {
                ticks
                    .iter()
                    .filter(|tick| tick.weight == TickWeight::Major)
                    .collect()
            })
            .unwrap_or_default();
        let nodes = sync_nodes(
            scene,
            axis.group,
            &mut axis.ticks,
            labelled.iter().map(|tick| tick.value),
            |scene, parent| build_tick(scene, parent, id),
        );
        for (node, tick) in nodes.into_iter().zip(labelled) {
            let transform = if id == AxisId::X {
                translate(tick.px, 0.0)
            } else {
                translate(0.0, tick.px)
            };
            scene.set_attr(node, "transform", transform);
            if let Some(text) = scene.children(node).get(1).copied() {
                scene.set_text(text, tick.label.clone());
            }
        }
    }

    fn translate_labels(&self, scene: &mut SceneGraph, settings: &GraphSettings, layout: &CanvasLayout) {
        let plot = layout.plot;
        let middle_y = (plot.top + plot.bottom) / 2.0;
        let y_gutter = if settings.y.show { Y_AXIS_WIDTH } else { 0.0 };
        let y2_gutter = if settings.y2.as_ref().is_some_and(|axis| axis.show) {
            Y_AXIS_WIDTH
        } else {
            0.0
        };
        let y_label_x = plot.left - y_gutter - AXIS_LABEL_SIZE * 0.25;
        let y2_label_x = plot.right + y2_gutter + AXIS_LABEL_SIZE * 0.75;

        for (id, node) in &self.labels {
            match id {
                AxisId::X => {
                    let x_gutter = if settings.x.show { X_AXIS_HEIGHT } else { 0.0 };
                    let baseline = layout
                        .info_row_top
                        .map_or(plot.bottom + x_gutter, |top| top + INFO_ROW_HEIGHT);
                    let y = baseline + AXIS_LABEL_SIZE * 0.75;
                    scene.set_attr(*node, "x", fmt_px((plot.left + plot.right) / 2.0));
                    scene.set_attr(*node, "y", fmt_px(y));
                }
                AxisId::Y => {
                    let transform = format!("{} rotate(-90)", translate(y_label_x, middle_y));
                    scene.set_attr(*node, "transform", transform);
                }
                AxisId::Y2 => {
                    let transform = format!("{} rotate(90)", translate(y2_label_x, middle_y));
                    scene.set_attr(*node, "transform", transform);
                }
            }
        }
        for (id, container) in &self.shape_containers {
            let x = if *id == AxisId::Y2 {
                y2_label_x
            } else {
                y_label_x - LABEL_GLYPH_SIZE / 2.0
            };
            scene.set_attr(*container, "transform", translate(x, plot.top));
        }
    }

    fn translate_reference_line(&self, scene: &mut SceneGraph, scales: &ScaleSet, layout: &CanvasLayout) {
        let Some(line) = self.reference_line else {
            return;
        };
        let plot = layout.plot;
        let crosses = scales.y.domain().crosses_zero();
        let y = if crosses {
            scales.y.map(0.0)
        } else {
            plot.bottom
        };
        scene.set_attr(line, "aria-hidden", Visibility::from_hidden(!crosses).aria_hidden());
        scene.set_attr(line, "x1", fmt_px(plot.left));
        scene.set_attr(line, "x2", fmt_px(plot.right));
        scene.set_attr(line, "y1", fmt_px(y));
        scene.set_attr(line, "y2", fmt_px(y));
    }

    /// Ticks of `axis` from the last translate, including grid-only ones.
    #[must_use]
    pub fn ticks(&self, axis: AxisId) -> &[ResolvedTick] {
        self.resolved.get(&axis).map_or(&[], Vec::as_slice)
    }

    /// Axis tick node currently bound to `value`.
    #[must_use]
    pub fn tick_node(&self, axis: AxisId, value: f64) -> Option<NodeId> {
        self.axes
            .iter()
            .find(|nodes| nodes.id == axis)
            .and_then(|nodes| nodes.ticks.get(&OrderedFloat(value)).copied())
    }

    #[must_use]
    pub fn reference_line(&self) -> Option<NodeId> {
        self.reference_line
    }
}

fn build_tick(scene: &mut SceneGraph, parent: NodeId, axis: AxisId) -> NodeId {
    let node = scene.append(parent, "g");
    scene.set_attr(node, "class", "tick");
    let mark = scene.append(node, "line");
    scene.set_attr(mark, "stroke", AXIS_COLOR.to_hex());
    let text = scene.append(node, "text");
    let label_offset = TICK_SIZE + TICK_LABEL_GAP;
    match axis {
        AxisId::X => {
            scene.set_attr(mark, "y2", fmt_px(TICK_SIZE));
            scene.set_attr(text, "y", fmt_px(label_offset + 9.0));
            scene.set_attr(text, "text-anchor", "middle");
        }
        AxisId::Y => {
            scene.set_attr(mark, "x2", fmt_px(-TICK_SIZE));
            scene.set_attr(text, "x", fmt_px(-label_offset));
            scene.set_attr(text, "dy", "0.32em");
            scene.set_attr(text, "text-anchor", "end");
        }
        AxisId::Y2 => {
            scene.set_attr(mark, "x2", fmt_px(TICK_SIZE));
            scene.set_attr(text, "x", fmt_px(label_offset));
            scene.set_attr(text, "dy", "0.32em");
            scene.set_attr(text, "text-anchor", "start");
        }
    }
    node
}

fn set_grid_style(scene: &mut SceneGraph, node: NodeId, weight: TickWeight) {
    let (class, color) = match weight {
        TickWeight::Major => ("grid-line", GRID_COLOR),
        TickWeight::Minor => ("grid-line grid-line-minor", GRID_MINOR_COLOR),
    };
    scene.set_attr(node, "class", class);
    scene.set_attr(node, "stroke", color.to_hex());
}

#[cfg(test)]
mod tests {
    use super::sync_nodes;
    use indexmap::IndexMap;
    use crate::render::SceneGraph;

    #[test]
    fn surviving_values_keep_their_nodes() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("g");
        let mut nodes = IndexMap::new();
        let first = sync_nodes(&mut scene, root, &mut nodes, [0.0, 10.0, 20.0], |scene, parent| {
            scene.append(parent, "g")
        });
        let second = sync_nodes(&mut scene, root, &mut nodes, [10.0, 20.0, 30.0], |scene, parent| {
            scene.append(parent, "g")
        });
        assert_eq!(second[0], first[1]);
        assert_eq!(second[1], first[2]);
        assert!(!scene.is_alive(first[0]));
        assert_eq!(scene.children(root).len(), 3);
    }
}
