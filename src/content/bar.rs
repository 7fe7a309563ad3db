//! Bar chart content. Bars grow from zero and share horizontal slots with
//! every other loaded bar content.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::{
    ContentContext, ContentId, ContentKind, ContentState, GraphContent, GraphSettings,
    ensure_loadable, ensure_loaded,
};
use crate::core::{AxisId, ContentRange, DataPoint};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::{RegionInput, RegionOwner, RegionSpec, validate_regions};
use crate::render::{NodeId, fmt_px};

use super::base::{ContentBase, ContentCore, ValueInput, ensure_finite_values};
use super::marks::{append_content_group, apply_visibility};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarValueInput {
    pub x: Value,
    pub y: f64,
    /// Text shown in the x axis info row under this bar.
    #[serde(default, alias = "axis_info_row")]
    pub axis_info_row: Option<String>,
}

impl BarValueInput {
    #[must_use]
    pub fn new(x: impl Into<Value>, y: f64) -> Self {
        Self {
            x: x.into(),
            y,
            axis_info_row: None,
        }
    }

    #[must_use]
    pub fn with_info(mut self, text: impl Into<String>) -> Self {
        self.axis_info_row = Some(text.into());
        self
    }

    fn as_value(&self) -> ValueInput {
        ValueInput {
            x: self.x.clone(),
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarInput {
    #[serde(flatten)]
    pub base: ContentBase,
    #[serde(default)]
    pub values: Vec<BarValueInput>,
    #[serde(default)]
    pub regions: Vec<RegionInput>,
}

impl BarInput {
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    #[must_use]
    pub fn new(base: ContentBase, values: Vec<BarValueInput>) -> Self {
        Self {
            base,
            values,
            regions: Vec::new(),
        }
    }
}

/// Rect of one bar in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Projects one bar between the zero baseline and its value.
///
/// The baseline is clamped to the pixel range so a pinned domain that
/// excludes zero still yields a bar ending at the plot edge.
#[must_use]
pub fn project_bar(
    center_x: f64,
    slot_offset: f64,
    width: f64,
    value_px: f64,
    zero_px: f64,
    y_range: (f64, f64),
) -> BarRect {
    let (low, high) = if y_range.0 <= y_range.1 {
        y_range
    } else {
        (y_range.1, y_range.0)
    };
    let zero = zero_px.clamp(low, high);
    let value = value_px.clamp(low, high);
    BarRect {
        x: center_x + slot_offset,
        y: value.min(zero),
        width,
        height: (value - zero).abs(),
    }
}

#[derive(Debug, Clone)]
struct BarNodes {
    group: NodeId,
    rects: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct BarContent {
    core: ContentCore,
    values: Vec<BarValueInput>,
    regions: Vec<RegionSpec>,
    nodes: Option<BarNodes>,
}

impl BarContent {
    pub fn new(input: BarInput) -> GraphResult<Self> {
        let base = input.base.validate()?;
        let plain: Vec<ValueInput> = input.values.iter().map(BarValueInput::as_value).collect();
        ensure_finite_values(&base.key, &plain)?;
        let regions = validate_regions(&input.regions, base.y_axis)?;
        Ok(Self {
            core: ContentCore::new(base),
            values: input.values,
            regions,
            nodes: None,
        })
    }

    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Self::new(BarInput::from_json_str(input)?)
    }

    fn draw(&mut self, ctx: &mut ContentContext<'_>) {
        let key = self.core.key();
        let group = append_content_group(ctx.scene, ctx.container, key, "bar-content");
        let rects = self
            .core
            .data_target
            .iter()
            .map(|point| {
                let rect = ctx.scene.append(group, "rect");
                ctx.scene.with_attrs(
                    rect,
                    &[
                        ("class", "bar".to_owned()),
                        ("aria-describedby", key.to_owned()),
                        ("aria-disabled", (!self.core.base.clickable).to_string()),
                        ("data-position", point.index.to_string()),
                        ("fill", self.core.color.to_hex()),
                    ],
                )
            })
            .collect();
        self.nodes = Some(BarNodes { group, rects });
    }

    fn position(&self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        let Some(nodes) = &self.nodes else {
            return Ok(());
        };
        let scale = ctx.scales.vertical(self.core.base.y_axis)?;
        let width = ctx.bars.bar_width();
        let offset = ctx
            .bars
            .slot_offset(self.core.key())
            .unwrap_or(-width / 2.0);
        let zero = scale.map(0.0);
        for (point, node) in self.core.data_target.iter().zip(&nodes.rects) {
            let rect = project_bar(
                ctx.x_px(&point.x)?,
                offset,
                width,
                scale.map(point.y),
                zero,
                scale.range(),
            );
            ctx.scene.set_attr(*node, "x", fmt_px(rect.x));
            ctx.scene.set_attr(*node, "y", fmt_px(rect.y));
            ctx.scene.set_attr(*node, "width", fmt_px(rect.width));
            ctx.scene.set_attr(*node, "height", fmt_px(rect.height));
        }
        let visibility = ctx.visibility(self.core.key());
        apply_visibility(ctx.scene, nodes.group, visibility);
        Ok(())
    }
}

impl GraphContent for BarContent {
    fn id(&self) -> ContentId {
        self.core.id
    }

    fn key(&self) -> &str {
        self.core.key()
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Bar
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
        if !settings.x.info_row && self.values.iter().any(|value| value.axis_info_row.is_some()) {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                format!(
                    "content `{}` sets `axisInfoRow` but the x axis info row is disabled",
                    self.core.key()
                ),
            ));
        }
        self.core.prepare(settings, load_index)?;
        let key = self.core.key().to_owned();
        let plain: Vec<ValueInput> = self.values.iter().map(BarValueInput::as_value).collect();
        self.core.data_target =
            self.core
                .resolve_points(settings, &key, self.core.color, self.core.shape, &plain)?;
        Ok(())
    }

    fn ranges(&self) -> Vec<ContentRange> {
        let points = &self.core.data_target;
        ContentRange::from_values(self.core.base.y_axis, points.iter().map(|point| point.y))
            .map(|range| range.with_zero_baseline(true))
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
        let empty = self.core.data_target.is_empty();
        let item = self.core.legend_item(
            self.core.base.display.clone(),
            self.core.color,
            self.core.shape,
            empty,
        );
        ctx.legend.add_item(ctx.scene, &key, item);
        if !empty {
            ctx.shown.show(&key, &key);
        }
        if ctx.settings.show_shapes {
            ctx.label_shapes.add(
                ctx.scene,
                self.core.base.y_axis,
                &key,
                &key,
                self.core.shape,
                self.core.color,
            );
        }
        for point in &self.core.data_target {
            if let Some(text) = self
                .values
                .get(point.index)
                .and_then(|value| value.axis_info_row.as_deref())
            {
                ctx.info_row.add(ctx.scene, &key, point.x.clone(), text);
            }
        }
        if !self.regions.is_empty() {
            ctx.regions.create(
                ctx.scene,
                ctx.scales,
                ctx.layout,
                RegionOwner {
                    owner: &key,
                    target: &key,
                    subtype: None,
                },
                &self.regions,
            )?;
        }
        self.position(ctx)?;
        ctx.info_row.translate(ctx.scene, ctx.scales, ctx.layout)?;
        ctx.regions.refresh_owner(ctx.scene, ctx.shown, &key);
        self.core.state = ContentState::Loaded;
        debug!(key = %key, bars = self.core.data_target.len(), "loaded bar content");
        Ok(())
    }

    fn unload(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        ensure_loaded(self.core.state, self.core.key())?;
        self.nodes = None;
        self.core.release(ctx);
        debug!(key = %self.core.key(), "unloaded bar content");
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

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{BarInput, project_bar};

    #[test]
    fn negative_bars_hang_below_the_baseline() {
        // y range is inverted: bottom 200, top 0; zero sits at 100.
        let up = project_bar(50.0, -5.0, 10.0, 40.0, 100.0, (200.0, 0.0));
        assert_relative_eq!(up.y, 40.0);
        assert_relative_eq!(up.height, 60.0);
        assert_relative_eq!(up.x, 45.0);

        let down = project_bar(50.0, -5.0, 10.0, 150.0, 100.0, (200.0, 0.0));
        assert_relative_eq!(down.y, 100.0);
        assert_relative_eq!(down.height, 50.0);
    }

    #[test]
    fn baseline_outside_the_domain_is_clamped() {
        let rect = project_bar(0.0, 0.0, 4.0, 20.0, 260.0, (200.0, 0.0));
        assert_relative_eq!(rect.y, 20.0);
        assert_relative_eq!(rect.height, 180.0);
    }

    #[test]
    fn info_row_text_accepts_both_spellings() {
        let camel = BarInput::from_json_str(
            r#"{"key":"b","label":{"display":"B"},"values":[{"x":1,"y":2,"axisInfoRow":"a"}]}"#,
        )
        .unwrap();
        let snake = BarInput::from_json_str(
            r#"{"key":"b","label":{"display":"B"},"values":[{"x":1,"y":2,"axis_info_row":"a"}]}"#,
        )
        .unwrap();
        assert_eq!(camel.values[0].axis_info_row.as_deref(), Some("a"));
        assert_eq!(snake, camel);
    }
}
