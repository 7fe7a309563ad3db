use tracing::debug;

use crate::content::Content;
use crate::core::{AxisId, ScaleSet};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::{
    DatelineLayer, GraphEvent, GraphListener, LabelShapes, ListenerContext, RegionSet,
};
use crate::interaction::FrameScheduler;
use crate::render::{
    GraphLayer, GraphLayerStack, NodeId, RenderFrame, Renderer, SceneGraph, fmt_px,
};

use super::axis_builder::AxesLayer;
use super::axis_info_row::AxisInfoRow;
use super::canvas_layout::CanvasLayout;
use super::content::{ContentContext, ContentId, GraphContent};
use super::graph_config::GraphConfig;
use super::legend::Legend;
use super::scale_coordinator::{AxisDomains, BarLayout, build_scales, resolve_domains};
use super::shown_targets::ShownTargets;
use super::validation::{GraphSettings, validate_graph_config};

/// Top-level orchestrator consumed by host applications.
///
/// `Graph` owns the scene, the single `ScaleSet` and every loaded content,
/// and drives all lifecycle calls in a fixed order.
pub struct Graph<R: Renderer> {
    pub(super) renderer: R,
    pub(super) session: Option<GraphSession>,
    pub(super) listeners: Vec<Box<dyn GraphListener>>,
}

/// Everything that exists between `generate` and `destroy`.
pub(super) struct GraphSession {
    pub(super) state: SessionState,
    pub(super) contents: Vec<Content>,
}

pub(super) struct SessionState {
    pub(super) settings: GraphSettings,
    pub(super) container_width: f64,
    pub(super) layout: CanvasLayout,
    pub(super) domains: AxisDomains,
    pub(super) bars: BarLayout,
    pub(super) scales: ScaleSet,
    pub(super) scene: SceneGraph,
    pub(super) canvas: NodeId,
    pub(super) clip_rect: NodeId,
    pub(super) content_container: NodeId,
    pub(super) axes: AxesLayer,
    pub(super) info_row: AxisInfoRow,
    pub(super) label_shapes: LabelShapes,
    pub(super) regions: RegionSet,
    pub(super) datelines: DatelineLayer,
    pub(super) legend: Legend,
    pub(super) shown: ShownTargets,
    pub(super) hovered: Option<String>,
    pub(super) scheduler: FrameScheduler,
}

impl SessionState {
    pub(super) fn context(&mut self) -> ContentContext<'_> {
        ContentContext {
            settings: &self.settings,
            scales: &self.scales,
            layout: &self.layout,
            bars: &self.bars,
            container: self.content_container,
            scene: &mut self.scene,
            shown: &mut self.shown,
            legend: &mut self.legend,
            label_shapes: &mut self.label_shapes,
            regions: &mut self.regions,
            info_row: &mut self.info_row,
        }
    }

    /// Writes canvas size and the content clip rect.
    pub(super) fn apply_geometry(&mut self) {
        let layout = self.layout;
        let plot = layout.plot;
        self.scene.set_attr(self.canvas, "width", fmt_px(layout.width));
        self.scene.set_attr(self.canvas, "height", fmt_px(layout.height));
        self.scene.set_attr(self.clip_rect, "x", fmt_px(plot.left));
        self.scene.set_attr(self.clip_rect, "y", fmt_px(plot.top));
        self.scene.set_attr(self.clip_rect, "width", fmt_px(plot.width()));
        self.scene.set_attr(self.clip_rect, "height", fmt_px(plot.height()));
    }

    /// Re-applies the current scale to every graph-level layer.
    pub(super) fn translate_layers(&mut self) -> GraphResult<()> {
        self.axes
            .translate(&mut self.scene, &self.settings, &self.scales, &self.layout)?;
        self.info_row
            .translate(&mut self.scene, &self.scales, &self.layout)?;
        self.regions
            .translate(&mut self.scene, &self.scales, &self.layout)?;
        self.datelines.translate(
            &mut self.scene,
            &self.settings.datelines,
            &self.scales,
            &self.layout,
        );
        Ok(())
    }

    pub(super) fn listener_context(&self, content_count: usize) -> ListenerContext {
        ListenerContext {
            width: self.layout.width,
            height: self.layout.height,
            y_domain: self.domains.y,
            content_count,
            shown_count: self.shown.len(),
            mutation_count: self.scene.mutation_count(),
        }
    }
}

fn not_generated() -> GraphError {
    GraphError::usage(ErrorKind::GraphNotGenerated, "call `generate` first")
}

impl<R: Renderer> Graph<R> {
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            session: None,
            listeners: Vec::new(),
        }
    }

    /// Validates `config` and builds the canvas for a container `host_width`
    /// pixels wide. Returns the root SVG node.
    ///
    /// Layers are created bottom to top in [`GraphLayerStack::canonical`]
    /// order. Nothing is created when validation fails.
    pub fn generate(&mut self, config: &GraphConfig, host_width: f64) -> GraphResult<NodeId> {
        if self.session.is_some() {
            return Err(GraphError::usage(
                ErrorKind::GraphAlreadyGenerated,
                "destroy the graph before generating it again",
            ));
        }
        let settings = validate_graph_config(config, host_width)?;
        let layout = CanvasLayout::compute(&settings, host_width)?;
        let bars = BarLayout::default();
        let domains = resolve_domains(&settings, &[], &bars, &layout)?;
        let scales = build_scales(&settings, &domains, &layout)?;

        let mut scene = SceneGraph::new();
        let canvas = scene.create_root("svg");
        scene.with_attrs(
            canvas,
            &[
                ("class", "graph-canvas".to_owned()),
                ("role", "img".to_owned()),
                ("aria-describedby", settings.bind_to.clone()),
            ],
        );
        let defs = scene.append(canvas, "defs");
        let clip = scene.append(defs, "clipPath");
        let clip_id = format!("{}-clip", settings.bind_to.trim_start_matches('#'));
        scene.set_attr(clip, "id", clip_id.clone());
        let clip_rect = scene.append(clip, "rect");

        let mut state = SessionState {
            scheduler: FrameScheduler::new(settings.throttle),
            settings,
            container_width: host_width,
            layout,
            domains,
            bars,
            scales,
            scene,
            canvas,
            clip_rect,
            content_container: canvas,
            axes: AxesLayer::default(),
            info_row: AxisInfoRow::default(),
            label_shapes: LabelShapes::default(),
            regions: RegionSet::default(),
            datelines: DatelineLayer::default(),
            legend: Legend::default(),
            shown: ShownTargets::default(),
            hovered: None,
        };

        for layer in GraphLayerStack::canonical().layers {
            let scene = &mut state.scene;
            match layer {
                GraphLayer::Regions => {
                    let group = scene.append(canvas, "g");
                    scene.set_attr(group, "class", layer.class_name());
                    state.regions.attach(group);
                }
                GraphLayer::Grid => {
                    state.axes.create_grid(scene, canvas);
                }
                GraphLayer::Content => {
                    let group = scene.append(canvas, "g");
                    scene.with_attrs(
                        group,
                        &[
                            ("class", layer.class_name().to_owned()),
                            ("clip-path", format!("url(#{clip_id})")),
                        ],
                    );
                    state.content_container = group;
                }
                GraphLayer::Axes => {
                    state.axes.create_axes(scene, canvas, &state.settings);
                }
                GraphLayer::AxisInfoRow => {
                    if state.settings.x.info_row {
                        let group = scene.append(canvas, "g");
                        scene.set_attr(group, "class", layer.class_name());
                        state.info_row.attach(group);
                    }
                }
                GraphLayer::AxisLabels => {
                    if state.settings.show_label {
                        state.axes.create_labels(
                            scene,
                            canvas,
                            &state.settings,
                            &mut state.label_shapes,
                        );
                    }
                }
                GraphLayer::ReferenceLine => {
                    state.axes.create_reference_line(scene, canvas);
                }
                GraphLayer::Datelines => {
                    if state.settings.x.is_time() && !state.settings.datelines.is_empty() {
                        state.datelines.draw(
                            scene,
                            canvas,
                            &state.settings.datelines,
                            &state.scales,
                            &state.layout,
                        );
                    }
                }
            }
        }

        if state.settings.show_legend {
            let root = state.scene.create_root("ul");
            let bound = state
                .settings
                .bind_legend_to
                .clone()
                .unwrap_or_else(|| state.settings.bind_to.clone());
            state.scene.with_attrs(
                root,
                &[
                    ("class", "graph-legend".to_owned()),
                    ("role", "listbox".to_owned()),
                    ("aria-describedby", bound),
                ],
            );
            state.legend.attach(root);
        }

        state.apply_geometry();
        state.translate_layers()?;

        debug!(
            bind_to = %state.settings.bind_to,
            width = state.layout.width,
            height = state.layout.height,
            "generated graph"
        );
        self.session = Some(GraphSession {
            state,
            contents: Vec::new(),
        });
        self.emit(GraphEvent::Generated);
        Ok(canvas)
    }

    /// Cancels pending frame work, notifies and detaches listeners and drops
    /// the scene. The graph can be generated again afterwards.
    pub fn destroy(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.state.scheduler.cancel_all();
        let context = session.state.listener_context(session.contents.len());
        for listener in &mut self.listeners {
            listener.on_event(&GraphEvent::Destroyed, context);
        }
        self.listeners.clear();
        debug!(contents = session.contents.len(), "destroyed graph");
        true
    }

    pub fn render(&mut self) -> GraphResult<()> {
        let session = self.session.as_ref().ok_or_else(not_generated)?;
        let state = &session.state;
        let frame = RenderFrame::new(&state.scene, state.canvas, state.legend.root());
        frame.validate()?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> Option<&GraphSettings> {
        self.session.as_ref().map(|session| &session.state.settings)
    }

    #[must_use]
    pub fn layout(&self) -> Option<CanvasLayout> {
        self.session.as_ref().map(|session| session.state.layout)
    }

    #[must_use]
    pub fn domains(&self) -> Option<AxisDomains> {
        self.session.as_ref().map(|session| session.state.domains)
    }

    #[must_use]
    pub fn domain(&self, axis: AxisId) -> Option<crate::core::Domain> {
        self.domains().and_then(|domains| domains.get(axis))
    }

    #[must_use]
    pub fn scales(&self) -> Option<&ScaleSet> {
        self.session.as_ref().map(|session| &session.state.scales)
    }

    #[must_use]
    pub fn scene(&self) -> Option<&SceneGraph> {
        self.session.as_ref().map(|session| &session.state.scene)
    }

    #[must_use]
    pub fn canvas(&self) -> Option<NodeId> {
        self.session.as_ref().map(|session| session.state.canvas)
    }

    #[must_use]
    pub fn content_container(&self) -> Option<NodeId> {
        self.session
            .as_ref()
            .map(|session| session.state.content_container)
    }

    #[must_use]
    pub fn axes(&self) -> Option<&AxesLayer> {
        self.session.as_ref().map(|session| &session.state.axes)
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.session.as_ref().map(|session| &session.state.legend)
    }

    #[must_use]
    pub fn shown_targets(&self) -> Option<&ShownTargets> {
        self.session.as_ref().map(|session| &session.state.shown)
    }

    #[must_use]
    pub fn regions(&self) -> Option<&RegionSet> {
        self.session.as_ref().map(|session| &session.state.regions)
    }

    #[must_use]
    pub fn datelines(&self) -> Option<&DatelineLayer> {
        self.session.as_ref().map(|session| &session.state.datelines)
    }

    #[must_use]
    pub fn label_shapes(&self) -> Option<&LabelShapes> {
        self.session
            .as_ref()
            .map(|session| &session.state.label_shapes)
    }

    #[must_use]
    pub fn info_row(&self) -> Option<&AxisInfoRow> {
        self.session.as_ref().map(|session| &session.state.info_row)
    }

    #[must_use]
    pub fn scheduler(&self) -> Option<&FrameScheduler> {
        self.session.as_ref().map(|session| &session.state.scheduler)
    }

    #[must_use]
    pub fn content(&self, id: ContentId) -> Option<&Content> {
        self.session
            .as_ref()
            .and_then(|session| session.contents.iter().find(|content| content.id() == id))
    }

    /// Loaded contents in load order.
    pub fn contents(&self) -> impl Iterator<Item = &Content> {
        self.session
            .iter()
            .flat_map(|session| session.contents.iter())
    }

    #[must_use]
    pub fn content_count(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.contents.len())
    }

    pub(super) fn session_mut(&mut self) -> GraphResult<&mut GraphSession> {
        self.session.as_mut().ok_or_else(not_generated)
    }

    pub(super) fn emit(&mut self, event: GraphEvent) {
        let Some(session) = &self.session else {
            return;
        };
        if self.listeners.is_empty() {
            return;
        }
        let context = session.state.listener_context(session.contents.len());
        for listener in &mut self.listeners {
            listener.on_event(&event, context);
        }
    }
}
