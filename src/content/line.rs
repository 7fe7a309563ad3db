//! Line chart content: one path plus one glyph per data point.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{
    ContentContext, ContentId, ContentKind, ContentState, GraphContent, GraphSettings,
    ensure_loadable, ensure_loaded,
};
use crate::core::{AxisId, ContentRange, DataPoint};
use crate::error::GraphResult;
use crate::extensions::{RegionInput, RegionOwner, RegionSpec, validate_regions};
use crate::render::NodeId;

use super::base::{ContentBase, ContentCore, ValueInput, ensure_finite_values};
use super::marks::{append_content_group, append_point, apply_visibility, line_path, place};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineInput {
    #[serde(flatten)]
    pub base: ContentBase,
    #[serde(default)]
    pub values: Vec<ValueInput>,
    #[serde(default)]
    pub regions: Vec<RegionInput>,
}

impl LineInput {
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    #[must_use]
    pub fn new(base: ContentBase, values: Vec<ValueInput>) -> Self {
        Self {
            base,
            values,
            regions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_regions(mut self, regions: Vec<RegionInput>) -> Self {
        self.regions = regions;
        self
    }
}

#[derive(Debug, Clone)]
struct LineNodes {
    group: NodeId,
    path: NodeId,
    points: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct LineContent {
    core: ContentCore,
    values: Vec<ValueInput>,
    regions: Vec<RegionSpec>,
    nodes: Option<LineNodes>,
}

impl LineContent {
    /// Validates the input. Nothing touches a graph until `load`.
    pub fn new(input: LineInput) -> GraphResult<Self> {
        let base = input.base.validate()?;
        ensure_finite_values(&base.key, &input.values)?;
        let regions = validate_regions(&input.regions, base.y_axis)?;
        Ok(Self {
            core: ContentCore::new(base),
            values: input.values,
            regions,
            nodes: None,
        })
    }

    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Self::new(LineInput::from_json_str(input)?)
    }

    fn draw(&mut self, ctx: &mut ContentContext<'_>) {
        let key = self.core.key();
        let group = append_content_group(ctx.scene, ctx.container, key, "line-content");
        let path = ctx.scene.append(group, "path");
        ctx.scene.with_attrs(
            path,
            &[
                ("class", "line".to_owned()),
                ("aria-describedby", key.to_owned()),
                ("fill", "none".to_owned()),
                ("stroke", self.core.color.to_hex()),
            ],
        );
        let points = self
            .core
            .data_target
            .iter()
            .map(|point| {
                append_point(ctx.scene, group, point, self.core.color, self.core.base.clickable)
            })
            .collect();
        self.nodes = Some(LineNodes {
            group,
            path,
            points,
        });
    }

    fn position(&self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        let Some(nodes) = &self.nodes else {
            return Ok(());
        };
        let axis = self.core.base.y_axis;
        let mut pixels = Vec::with_capacity(self.core.data_target.len());
        for (point, node) in self.core.data_target.iter().zip(&nodes.points) {
            let x = ctx.x_px(&point.x)?;
            let y = ctx.y_px(axis, point.y)?;
            place(ctx.scene, *node, x, y);
            pixels.push((x, y));
        }
        ctx.scene.set_attr(nodes.path, "d", line_path(&pixels));
        let visibility = ctx.visibility(self.core.key());
        apply_visibility(ctx.scene, nodes.group, visibility);
        Ok(())
    }
}

impl GraphContent for LineContent {
    fn id(&self) -> ContentId {
        self.core.id
    }

    fn key(&self) -> &str {
        self.core.key()
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Line
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
        let key = self.core.key().to_owned();
        self.core.data_target = self.core.resolve_points(
            settings,
            &key,
            self.core.color,
            self.core.shape,
            &self.values,
        )?;
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
        ctx.regions.refresh_owner(ctx.scene, ctx.shown, &key);
        self.core.state = ContentState::Loaded;
        debug!(key = %key, points = self.core.data_target.len(), "loaded line content");
        Ok(())
    }

    fn unload(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        ensure_loaded(self.core.state, self.core.key())?;
        self.nodes = None;
        self.core.release(ctx);
        debug!(key = %self.core.key(), "unloaded line content");
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
    use super::{LineContent, LineInput};
    use crate::error::ErrorKind;

    #[test]
    fn rejects_inverted_region_before_anything_is_drawn() {
        let err = LineContent::from_json_str(
            r#"{"key":"a","label":{"display":"A"},"values":[],"regions":[{"start":10,"end":5}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegionStartMoreThanEnd);
    }

    #[test]
    fn parses_camel_case_input() {
        let input = LineInput::from_json_str(
            r#"{"key":"a","label":{"display":"A"},"onClick":true,"values":[{"x":1,"y":2}]}"#,
        )
        .unwrap();
        assert!(input.base.on_click);
        assert_eq!(input.values.len(), 1);
    }
}
