//! Shaded bands and goal lines anchored to a content's vertical axis.
//!
//! Regions live in the region group, below the grid. Their visibility is
//! derived from [`ShownTargets`] every time it is refreshed and is never
//! read back from the scene.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::{CanvasLayout, ShownTargets};
use crate::core::{AxisId, ScaleSet, Visibility};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::render::{Color, NodeId, REGION_COLOR, SceneGraph, fmt_px};

const GOAL_LINE_STROKE_WIDTH: f64 = 2.0;

/// Region as declared in content input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionInput {
    #[serde(default = "default_region_axis")]
    pub axis: AxisId,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RegionInput {
    #[must_use]
    pub fn between(start: f64, end: f64) -> Self {
        Self {
            axis: AxisId::Y,
            start: Some(start),
            end: Some(end),
            color: None,
        }
    }

    #[must_use]
    pub fn on_axis(mut self, axis: AxisId) -> Self {
        self.axis = axis;
        self
    }
}

const fn default_region_axis() -> AxisId {
    AxisId::Y
}

/// Validated region. A missing bound extends to the domain edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub axis: AxisId,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub color: Color,
}

impl RegionSpec {
    #[must_use]
    pub fn is_goal_line(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start == end)
    }
}

/// Validates declared regions against the axis the content is bound to.
pub fn validate_regions(inputs: &[RegionInput], content_axis: AxisId) -> GraphResult<Vec<RegionSpec>> {
    inputs
        .iter()
        .map(|input| {
            if input.axis != content_axis {
                return Err(GraphError::config(
                    ErrorKind::RegionInvalidAxisProvided,
                    format!(
                        "region axis `{}` does not match content axis `{}`",
                        input.axis.as_str(),
                        content_axis.as_str()
                    ),
                ));
            }
            if input.start.is_none() && input.end.is_none() {
                return Err(GraphError::config(
                    ErrorKind::RegionEmpty,
                    "region requires a start, an end, or both",
                ));
            }
            if input
                .start
                .into_iter()
                .chain(input.end)
                .any(|bound| !bound.is_finite())
            {
                return Err(GraphError::config(
                    ErrorKind::InvalidInput,
                    "region bounds must be finite",
                ));
            }
            if let (Some(start), Some(end)) = (input.start, input.end) {
                if start > end {
                    return Err(GraphError::config(
                        ErrorKind::RegionStartMoreThanEnd,
                        format!("region start {start} is greater than end {end}"),
                    ));
                }
            }
            let color = match input.color.as_deref() {
                Some(color) => Color::parse_hex(color)?,
                None => REGION_COLOR,
            };
            Ok(RegionSpec {
                axis: input.axis,
                start: input.start,
                end: input.end,
                color,
            })
        })
        .collect()
}

/// Content and legend target a group of regions belongs to.
///
/// `subtype` selects the `region_<key>_<subtype>` naming used by composite
/// contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOwner<'a> {
    pub owner: &'a str,
    pub target: &'a str,
    pub subtype: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
struct RegionEntry {
    owner: String,
    target: String,
    aria_key: String,
    spec: RegionSpec,
    node: NodeId,
    visibility: Visibility,
}

/// Region state of one region as exposed in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionState {
    pub aria_key: String,
    pub target: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    group: Option<NodeId>,
    entries: Vec<RegionEntry>,
    hovered: Option<String>,
}

impl RegionSet {
    pub(crate) fn attach(&mut self, group: NodeId) {
        self.group = Some(group);
    }

    #[must_use]
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creates the region rects of one legend target.
    pub fn create(
        &mut self,
        scene: &mut SceneGraph,
        scales: &ScaleSet,
        layout: &CanvasLayout,
        owner: RegionOwner<'_>,
        specs: &[RegionSpec],
    ) -> GraphResult<()> {
        let RegionOwner {
            owner,
            target,
            subtype,
        } = owner;
        let Some(group) = self.group else {
            return Err(GraphError::usage(
                ErrorKind::GraphNotGenerated,
                "region group does not exist",
            ));
        };
        let aria_key = match subtype {
            Some(subtype) => format!("region_{owner}_{subtype}"),
            None => format!("region_{owner}"),
        };
        for spec in specs {
            let node = scene.append(group, "rect");
            let class = if spec.is_goal_line() {
                "region region-goal-line"
            } else {
                "region"
            };
            scene.with_attrs(
                node,
                &[
                    ("class", class.to_owned()),
                    ("aria-describedby", aria_key.clone()),
                    ("aria-hidden", Visibility::Hidden.aria_hidden().to_owned()),
                    ("fill", spec.color.to_hex()),
                ],
            );
            if spec.is_goal_line() {
                scene.set_attr(node, "stroke", spec.color.to_hex());
                scene.set_attr(node, "stroke-width", fmt_px(GOAL_LINE_STROKE_WIDTH));
            }
            let entry = RegionEntry {
                owner: owner.to_owned(),
                target: target.to_owned(),
                aria_key: aria_key.clone(),
                spec: spec.clone(),
                node,
                visibility: Visibility::Hidden,
            };
            translate_entry(scene, scales, layout, &entry)?;
            self.entries.push(entry);
        }
        trace!(owner, target, count = specs.len(), "created regions");
        Ok(())
    }

    /// Removes every region owned by `owner`.
    pub fn remove_owner(&mut self, scene: &mut SceneGraph, owner: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            if entry.owner == owner {
                scene.remove(entry.node);
                false
            } else {
                true
            }
        });
        if self.hovered.as_deref().is_some_and(|hovered| {
            !self.entries.iter().any(|entry| entry.target == hovered)
        }) {
            self.hovered = None;
        }
        before - self.entries.len()
    }

    /// Re-applies the shared scale to every region rect.
    pub fn translate(
        &self,
        scene: &mut SceneGraph,
        scales: &ScaleSet,
        layout: &CanvasLayout,
    ) -> GraphResult<()> {
        for entry in &self.entries {
            translate_entry(scene, scales, layout, entry)?;
        }
        Ok(())
    }

    /// Temporarily reveals the regions of `target` while its legend item is
    /// hovered. `None` clears the override.
    pub fn set_hovered(&mut self, target: Option<&str>) {
        self.hovered = target.map(str::to_owned);
    }

    /// Recomputes the visibility of every region owned by `owner`.
    ///
    /// All regions hide as soon as more than one content is shown. A hovered
    /// target shows its regions regardless.
    pub fn refresh_owner(&mut self, scene: &mut SceneGraph, shown: &ShownTargets, owner: &str) {
        let hide_all = shown.owner_count() > 1;
        for entry in self.entries.iter_mut().filter(|entry| entry.owner == owner) {
            let hovered = self.hovered.as_deref() == Some(entry.target.as_str());
            let visible = hovered || (!hide_all && shown.contains(&entry.target));
            entry.visibility = Visibility::from_hidden(!visible);
            scene.set_attr(entry.node, "aria-hidden", entry.visibility.aria_hidden());
        }
    }

    pub fn refresh_all(&mut self, scene: &mut SceneGraph, shown: &ShownTargets) {
        let mut owners: Vec<String> = self.entries.iter().map(|entry| entry.owner.clone()).collect();
        owners.dedup();
        for owner in owners {
            self.refresh_owner(scene, shown, &owner);
        }
    }

    #[must_use]
    pub fn states(&self) -> Vec<RegionState> {
        self.entries
            .iter()
            .map(|entry| RegionState {
                aria_key: entry.aria_key.clone(),
                target: entry.target.clone(),
                visibility: entry.visibility,
            })
            .collect()
    }
}

fn translate_entry(
    scene: &mut SceneGraph,
    scales: &ScaleSet,
    layout: &CanvasLayout,
    entry: &RegionEntry,
) -> GraphResult<()> {
    let scale = scales.vertical(entry.spec.axis)?;
    let domain = scale.domain();
    let lower = entry.spec.start.unwrap_or(domain.lower_limit);
    let upper = entry.spec.end.unwrap_or(domain.upper_limit);
    let plot = layout.plot;
    let top = scale.map(upper).clamp(plot.top, plot.bottom);
    let bottom = scale.map(lower).clamp(plot.top, plot.bottom);
    scene.set_attr(entry.node, "x", fmt_px(plot.left));
    scene.set_attr(entry.node, "width", fmt_px(plot.width()));
    scene.set_attr(entry.node, "y", fmt_px(top));
    scene.set_attr(entry.node, "height", fmt_px(bottom - top));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RegionInput, validate_regions};
    use crate::core::AxisId;
    use crate::error::ErrorKind;

    #[test]
    fn start_after_end_is_rejected() {
        let err = validate_regions(&[RegionInput::between(10.0, 5.0)], AxisId::Y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegionStartMoreThanEnd);
    }

    #[test]
    fn region_must_use_content_axis() {
        let input = RegionInput::between(1.0, 2.0).on_axis(AxisId::Y2);
        let err = validate_regions(&[input.clone()], AxisId::Y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegionInvalidAxisProvided);
        assert!(validate_regions(&[input], AxisId::Y2).is_ok());
    }

    #[test]
    fn region_needs_at_least_one_bound() {
        let input = RegionInput {
            axis: AxisId::Y,
            start: None,
            end: None,
            color: None,
        };
        let err = validate_regions(&[input], AxisId::Y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegionEmpty);
    }

    #[test]
    fn equal_bounds_make_a_goal_line() {
        let specs = validate_regions(&[RegionInput::between(4.0, 4.0)], AxisId::Y).unwrap();
        assert!(specs[0].is_goal_line());
    }
}
