use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ContentContext, ContentId, ContentState, GraphSettings, LegendItem};
use crate::core::primitives::parse_x_value;
use crate::core::{AxisId, DataPoint, Shape, XCoord};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::render::{Color, DEFAULT_PALETTE, resolve_color};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInput {
    #[serde(default)]
    pub display: String,
}

/// Fields every content input carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBase {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub label: Option<LabelInput>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default = "default_y_axis", alias = "y_axis")]
    pub y_axis: AxisId,
    #[serde(default, alias = "on_click")]
    pub on_click: bool,
}

const fn default_y_axis() -> AxisId {
    AxisId::Y
}

impl ContentBase {
    #[must_use]
    pub fn new(key: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: Some(LabelInput {
                display: display.into(),
            }),
            color: None,
            shape: None,
            y_axis: AxisId::Y,
            on_click: false,
        }
    }

    #[must_use]
    pub fn on_axis(mut self, axis: AxisId) -> Self {
        self.y_axis = axis;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    #[must_use]
    pub fn clickable(mut self, on_click: bool) -> Self {
        self.on_click = on_click;
        self
    }

    pub(crate) fn validate(&self) -> GraphResult<ResolvedBase> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(GraphError::config(
                ErrorKind::UniqueKeyNotProvided,
                "content requires a non-empty `key`",
            ));
        }
        let display = self
            .label
            .as_ref()
            .map(|label| label.display.trim())
            .filter(|display| !display.is_empty())
            .ok_or_else(|| {
                GraphError::config(
                    ErrorKind::UniqueLabelNotProvided,
                    format!("content `{key}` requires `label.display`"),
                )
            })?;
        if !self.y_axis.is_vertical() {
            return Err(GraphError::config(
                ErrorKind::InvalidAxisReference,
                format!("content `{key}` must bind to `y` or `y2`"),
            ));
        }
        let color = self.color.as_deref().map(Color::parse_hex).transpose()?;
        Ok(ResolvedBase {
            key: key.to_owned(),
            display: display.to_owned(),
            color,
            shape: self.shape,
            y_axis: self.y_axis,
            clickable: self.on_click,
        })
    }
}

/// One raw `{x, y}` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueInput {
    pub x: Value,
    pub y: f64,
}

impl ValueInput {
    #[must_use]
    pub fn new(x: impl Into<Value>, y: f64) -> Self {
        Self { x: x.into(), y }
    }
}

pub(crate) fn ensure_finite_values<'a>(
    key: &str,
    values: impl IntoIterator<Item = &'a ValueInput>,
) -> GraphResult<()> {
    for value in values {
        if !value.y.is_finite() {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                format!("content `{key}` has a non-finite y value"),
            ));
        }
    }
    Ok(())
}

/// Validated common fields. `color` and `shape` stay unset until the content
/// learns its load index.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedBase {
    pub key: String,
    pub display: String,
    pub color: Option<Color>,
    pub shape: Option<Shape>,
    pub y_axis: AxisId,
    pub clickable: bool,
}

/// Lifecycle state shared by every chart type.
#[derive(Debug, Clone)]
pub(crate) struct ContentCore {
    pub id: ContentId,
    pub state: ContentState,
    pub base: ResolvedBase,
    pub color: Color,
    pub shape: Shape,
    pub data_target: Vec<DataPoint>,
}

impl ContentCore {
    pub(crate) fn new(base: ResolvedBase) -> Self {
        let color = base.color.unwrap_or(DEFAULT_PALETTE[0]);
        let shape = base.shape.unwrap_or_default();
        Self {
            id: ContentId::next(),
            state: ContentState::Constructed,
            base,
            color,
            shape,
            data_target: Vec::new(),
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.base.key
    }

    /// Resolves palette defaults and checks the axis binding against the graph.
    pub(crate) fn prepare(&mut self, settings: &GraphSettings, load_index: usize) -> GraphResult<()> {
        if self.base.y_axis == AxisId::Y2 && settings.y2.is_none() {
            return Err(GraphError::config(
                ErrorKind::InvalidAxisReference,
                format!("content `{}` binds to y2 but the graph has no y2 axis", self.base.key),
            ));
        }
        self.color = match self.base.color {
            Some(color) => color,
            None => resolve_color(None, load_index)?,
        };
        self.shape = self.base.shape.unwrap_or_else(|| Shape::nth_default(load_index));
        Ok(())
    }

    /// Resolves raw values into render-ready points, sorted by x on
    /// continuous axes.
    pub(crate) fn resolve_points<'a>(
        &self,
        settings: &GraphSettings,
        target: &str,
        color: Color,
        shape: Shape,
        values: impl IntoIterator<Item = &'a ValueInput>,
    ) -> GraphResult<Vec<DataPoint>> {
        let mut points = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let x = parse_x_value(&value.x, settings.x.axis_type)?;
                if let XCoord::Category(category) = &x {
                    if !settings.x.categories.contains(category) {
                        return Err(GraphError::config(
                            ErrorKind::InvalidInput,
                            format!("category `{category}` is not on the x axis"),
                        ));
                    }
                }
                Ok(DataPoint {
                    key: target.to_owned(),
                    index,
                    x,
                    y: value.y,
                    color: color.to_hex(),
                    shape,
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        if settings.x.configured.is_some() {
            points.sort_by(|left, right| {
                let left = left.x.as_continuous().unwrap_or_default();
                let right = right.x.as_continuous().unwrap_or_default();
                left.total_cmp(&right)
            });
        }
        Ok(points)
    }

    pub(crate) fn legend_item(&self, label: String, color: Color, shape: Shape, empty: bool) -> LegendItem {
        LegendItem::new(self.key(), label, color, shape).disabled(empty)
    }

    /// Drops every overlay entry owned by this content and disposes it.
    pub(crate) fn release(&mut self, ctx: &mut ContentContext<'_>) {
        let key = self.base.key.as_str();
        if let Some(group) = ctx.scene.child_by_key(ctx.container, key) {
            ctx.scene.remove(group);
        }
        ctx.legend.remove_owner(ctx.scene, key);
        ctx.shown.remove_owner(key);
        ctx.label_shapes.remove_owner(ctx.scene, key);
        ctx.regions.remove_owner(ctx.scene, key);
        ctx.info_row.remove_owner(ctx.scene, key);
        self.data_target.clear();
        self.state = ContentState::Disposed;
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentBase, LabelInput};
    use crate::core::AxisId;
    use crate::error::ErrorKind;

    #[test]
    fn key_and_label_are_required() {
        let mut base = ContentBase::new(" ", "Label");
        assert_eq!(
            base.validate().unwrap_err().kind(),
            ErrorKind::UniqueKeyNotProvided
        );
        base.key = "a".to_owned();
        base.label = Some(LabelInput {
            display: String::new(),
        });
        assert_eq!(
            base.validate().unwrap_err().kind(),
            ErrorKind::UniqueLabelNotProvided
        );
    }

    #[test]
    fn content_cannot_bind_to_x() {
        let base = ContentBase::new("a", "A").on_axis(AxisId::X);
        assert_eq!(
            base.validate().unwrap_err().kind(),
            ErrorKind::InvalidAxisReference
        );
    }

    #[test]
    fn accepts_snake_and_camel_axis_names() {
        let camel: ContentBase =
            serde_json::from_str(r#"{"key":"a","label":{"display":"A"},"yAxis":"y2"}"#).unwrap();
        let snake: ContentBase =
            serde_json::from_str(r#"{"key":"a","label":{"display":"A"},"y_axis":"y2"}"#).unwrap();
        assert_eq!(camel.y_axis, AxisId::Y2);
        assert_eq!(snake.y_axis, AxisId::Y2);
    }
}
