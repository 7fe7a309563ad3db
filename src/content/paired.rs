//! Paired result content: up to three related readings (high, mid, low)
//! per x value, each subtype with its own legend target and regions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{
    ContentContext, ContentId, ContentKind, ContentState, GraphContent, GraphSettings,
    ensure_loadable, ensure_loaded,
};
use crate::core::primitives::parse_x_value;
use crate::core::{AxisId, ContentRange, DataPoint, Shape, Visibility, XCoord};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::{RegionInput, RegionOwner, RegionSpec, validate_regions};
use crate::render::{NodeId, fmt_px};

use super::base::{ContentBase, ContentCore, ValueInput, ensure_finite_values};
use super::marks::{
    append_content_group, append_point, append_subgroup, apply_visibility, place,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairedSubtype {
    High,
    Mid,
    Low,
}

impl PairedSubtype {
    pub const ALL: [Self; 3] = [Self::High, Self::Mid, Self::Low];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }

    #[must_use]
    pub const fn display(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Mid => "Mid",
            Self::Low => "Low",
        }
    }

    #[must_use]
    pub const fn default_shape(self) -> Shape {
        match self {
            Self::High => Shape::Triangle,
            Self::Mid => Shape::Circle,
            Self::Low => Shape::Diamond,
        }
    }

    /// Legend and visibility target of this subtype on content `key`.
    #[must_use]
    pub fn target(self, key: &str) -> String {
        format!("{key}_{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairedValueInput {
    #[serde(default)]
    pub high: Option<ValueInput>,
    #[serde(default)]
    pub mid: Option<ValueInput>,
    #[serde(default)]
    pub low: Option<ValueInput>,
}

impl PairedValueInput {
    #[must_use]
    pub fn get(&self, subtype: PairedSubtype) -> Option<&ValueInput> {
        match subtype {
            PairedSubtype::High => self.high.as_ref(),
            PairedSubtype::Mid => self.mid.as_ref(),
            PairedSubtype::Low => self.low.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairedRegions {
    #[serde(default)]
    pub high: Vec<RegionInput>,
    #[serde(default)]
    pub mid: Vec<RegionInput>,
    #[serde(default)]
    pub low: Vec<RegionInput>,
}

impl PairedRegions {
    fn get(&self, subtype: PairedSubtype) -> &[RegionInput] {
        match subtype {
            PairedSubtype::High => &self.high,
            PairedSubtype::Mid => &self.mid,
            PairedSubtype::Low => &self.low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedInput {
    #[serde(flatten)]
    pub base: ContentBase,
    #[serde(default)]
    pub values: Vec<PairedValueInput>,
    #[serde(default)]
    pub regions: PairedRegions,
}

impl PairedInput {
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    #[must_use]
    pub fn new(base: ContentBase, values: Vec<PairedValueInput>) -> Self {
        Self {
            base,
            values,
            regions: PairedRegions::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct SubtypeTarget {
    subtype: PairedSubtype,
    target: String,
    shape: Shape,
    regions: Vec<RegionSpec>,
    points: Vec<DataPoint>,
}

/// High and low reading of one entry, joined by a connector.
#[derive(Debug, Clone, PartialEq)]
struct PairSpan {
    x: XCoord,
    high: f64,
    low: f64,
    high_target: String,
    low_target: String,
}

#[derive(Debug, Clone)]
struct PairedNodes {
    group: NodeId,
    connectors: Vec<NodeId>,
    subgroups: Vec<(NodeId, Vec<NodeId>)>,
}

#[derive(Debug, Clone)]
pub struct PairedContent {
    core: ContentCore,
    values: Vec<PairedValueInput>,
    targets: Vec<SubtypeTarget>,
    spans: Vec<PairSpan>,
    nodes: Option<PairedNodes>,
}

impl PairedContent {
    pub fn new(input: PairedInput) -> GraphResult<Self> {
        let base = input.base.validate()?;
        for (index, value) in input.values.iter().enumerate() {
            if PairedSubtype::ALL.iter().all(|subtype| value.get(*subtype).is_none()) {
                return Err(GraphError::config(
                    ErrorKind::NoDataPoints,
                    format!("entry {index} of `{}` has no high, mid or low value", base.key),
                ));
            }
            ensure_finite_values(
                &base.key,
                PairedSubtype::ALL.iter().filter_map(|subtype| value.get(*subtype)),
            )?;
        }
        let targets = PairedSubtype::ALL
            .into_iter()
            .map(|subtype| {
                Ok(SubtypeTarget {
                    subtype,
                    target: subtype.target(&base.key),
                    shape: base.shape.unwrap_or(subtype.default_shape()),
                    regions: validate_regions(input.regions.get(subtype), base.y_axis)?,
                    points: Vec::new(),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(Self {
            core: ContentCore::new(base),
            values: input.values,
            targets,
            spans: Vec::new(),
            nodes: None,
        })
    }

    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Self::new(PairedInput::from_json_str(input)?)
    }

    /// Legend target of each subtype, in draw order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|target| target.target.as_str())
    }

    fn draw(&mut self, ctx: &mut ContentContext<'_>) {
        let key = self.core.key();
        let group = append_content_group(ctx.scene, ctx.container, key, "paired-content");
        let connector_group = ctx.scene.append(group, "g");
        ctx.scene.set_attr(connector_group, "class", "pair-lines");
        let connectors = self
            .spans
            .iter()
            .map(|_| {
                let line = ctx.scene.append(connector_group, "line");
                ctx.scene.with_attrs(
                    line,
                    &[
                        ("class", "pair-line".to_owned()),
                        ("aria-describedby", key.to_owned()),
                        ("stroke", self.core.color.to_hex()),
                    ],
                )
            })
            .collect();
        let subgroups = self
            .targets
            .iter()
            .map(|target| {
                let subgroup = append_subgroup(ctx.scene, group, &target.target);
                let points = target
                    .points
                    .iter()
                    .map(|point| {
                        append_point(
                            ctx.scene,
                            subgroup,
                            point,
                            self.core.color,
                            self.core.base.clickable,
                        )
                    })
                    .collect();
                (subgroup, points)
            })
            .collect();
        self.nodes = Some(PairedNodes {
            group,
            connectors,
            subgroups,
        });
    }

    fn position(&self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        let Some(nodes) = &self.nodes else {
            return Ok(());
        };
        let axis = self.core.base.y_axis;
        let mut any_shown = false;
        for (target, (subgroup, points)) in self.targets.iter().zip(&nodes.subgroups) {
            for (point, node) in target.points.iter().zip(points) {
                let x = ctx.x_px(&point.x)?;
                let y = ctx.y_px(axis, point.y)?;
                place(ctx.scene, *node, x, y);
            }
            let visibility = ctx.visibility(&target.target);
            any_shown |= !visibility.is_hidden();
            apply_visibility(ctx.scene, *subgroup, visibility);
        }
        for (span, line) in self.spans.iter().zip(&nodes.connectors) {
            let x = ctx.x_px(&span.x)?;
            let hidden = !ctx.shown.contains(&span.high_target) || !ctx.shown.contains(&span.low_target);
            ctx.scene.set_attr(*line, "x1", fmt_px(x));
            ctx.scene.set_attr(*line, "x2", fmt_px(x));
            ctx.scene.set_attr(*line, "y1", fmt_px(ctx.y_px(axis, span.high)?));
            ctx.scene.set_attr(*line, "y2", fmt_px(ctx.y_px(axis, span.low)?));
            apply_visibility(ctx.scene, *line, Visibility::from_hidden(hidden));
        }
        apply_visibility(ctx.scene, nodes.group, Visibility::from_hidden(!any_shown));
        Ok(())
    }
}

impl GraphContent for PairedContent {
    fn id(&self) -> ContentId {
        self.core.id
    }

    fn key(&self) -> &str {
        self.core.key()
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Paired
    }

    fn state(&self) -> ContentState {
        self.core.state
    }

    fn y_axis(&self) -> AxisId {
        self.core.base.y_axis
    }

    fn clickable(&self) -> bool {
        self.core.base.clickable
    }

    fn prepare(&mut self, settings: &GraphSettings, load_index: usize) -> GraphResult<()> {
        ensure_loadable(self.core.state, self.core.key())?;
        self.core.prepare(settings, load_index)?;
        let mut resolved = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let subtype = target.subtype;
            // Keep the entry index so points of one pair share a position.
            let mut points = Vec::new();
            for (index, value) in self.values.iter().enumerate() {
                let Some(value) = value.get(subtype) else {
                    continue;
                };
                let resolved = self.core.resolve_points(
                    settings,
                    &target.target,
                    self.core.color,
                    target.shape,
                    std::iter::once(value),
                )?;
                for mut point in resolved {
                    point.index = index;
                    points.push(point);
                }
            }
            if settings.x.configured.is_some() {
                points.sort_by(|left, right| {
                    let left = left.x.as_continuous().unwrap_or_default();
                    let right = right.x.as_continuous().unwrap_or_default();
                    left.total_cmp(&right)
                });
            }
            resolved.push(points);
        }
        for (target, points) in self.targets.iter_mut().zip(resolved) {
            target.points = points;
        }

        let key = self.core.key().to_owned();
        self.spans = self
            .values
            .iter()
            .filter_map(|value| Some((value.high.as_ref()?, value.low.as_ref()?)))
            .map(|(high, low)| {
                Ok(PairSpan {
                    x: parse_x_value(&high.x, settings.x.axis_type)?,
                    high: high.y,
                    low: low.y,
                    high_target: PairedSubtype::High.target(&key),
                    low_target: PairedSubtype::Low.target(&key),
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        self.core.data_target = self
            .targets
            .iter()
            .flat_map(|target| target.points.iter().cloned())
            .collect();
        Ok(())
    }

    fn ranges(&self) -> Vec<ContentRange> {
        let points = &self.core.data_target;
        ContentRange::from_values(self.core.base.y_axis, points.iter().map(|point| point.y))
            .into_iter()
            .collect()
    }

    fn data_target(&self) -> &[DataPoint] {
        &self.core.data_target
    }

    fn load(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        ensure_loadable(self.core.state, self.core.key())?;
        self.draw(ctx);

        let key = self.core.key().to_owned();
        for target in &self.targets {
            let empty = target.points.is_empty();
            let label = format!("{} {}", self.core.base.display, target.subtype.display());
            let item = self
                .core
                .legend_item(label, self.core.color, target.shape, empty);
            ctx.legend.add_item(ctx.scene, &target.target, item);
            if !empty {
                ctx.shown.show(&target.target, &key);
            }
            if ctx.settings.show_shapes {
                ctx.label_shapes.add(
                    ctx.scene,
                    self.core.base.y_axis,
                    &target.target,
                    &key,
                    target.shape,
                    self.core.color,
                );
            }
            if !target.regions.is_empty() {
                ctx.regions.create(
                    ctx.scene,
                    ctx.scales,
                    ctx.layout,
                    RegionOwner {
                        owner: &key,
                        target: &target.target,
                        subtype: Some(target.subtype.name()),
                    },
                    &target.regions,
                )?;
            }
        }
        self.position(ctx)?;
        ctx.regions.refresh_owner(ctx.scene, ctx.shown, &key);
        self.core.state = ContentState::Loaded;
        debug!(key = %key, points = self.core.data_target.len(), "loaded paired content");
        Ok(())
    }

    fn unload(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        ensure_loaded(self.core.state, self.core.key())?;
        self.nodes = None;
        self.spans.clear();
        for target in &mut self.targets {
            target.points.clear();
        }
        self.core.release(ctx);
        debug!(key = %self.core.key(), "unloaded paired content");
        Ok(())
    }

    fn resize(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        ensure_loaded(self.core.state, self.core.key())?;
        self.position(ctx)?;
        ctx.regions.refresh_owner(ctx.scene, ctx.shown, self.core.key());
        Ok(())
    }

    fn redraw(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        ensure_loaded(self.core.state, self.core.key())?;
        if let Some(nodes) = self.nodes.take() {
            ctx.scene.remove(nodes.group);
        }
        self.draw(ctx);
        self.position(ctx)?;
        ctx.regions.refresh_owner(ctx.scene, ctx.shown, self.core.key());
        Ok(())
    }
}
