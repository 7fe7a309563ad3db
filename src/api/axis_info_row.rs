use crate::core::{ScaleSet, XCoord};
use crate::error::GraphResult;
use crate::render::{NodeId, SceneGraph, fmt_px};

use super::canvas_layout::{CanvasLayout, INFO_ROW_HEIGHT};

#[derive(Debug, Clone, PartialEq)]
struct InfoRowEntry {
    owner: String,
    x: XCoord,
    node: NodeId,
}

/// Annotation row under the x axis, filled by bar contents.
#[derive(Debug, Clone, Default)]
pub struct AxisInfoRow {
    group: Option<NodeId>,
    entries: Vec<InfoRowEntry>,
}

impl AxisInfoRow {
    pub(crate) fn attach(&mut self, group: NodeId) {
        self.group = Some(group);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.group.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(
        &mut self,
        scene: &mut SceneGraph,
        owner: &str,
        x: XCoord,
        text: &str,
    ) -> Option<NodeId> {
        let group = self.group?;
        let node = scene.append(group, "text");
        scene.with_attrs(
            node,
            &[
                ("class", "axis-info-row-item".to_owned()),
                ("aria-describedby", owner.to_owned()),
                ("text-anchor", "middle".to_owned()),
            ],
        );
        scene.set_text(node, text);
        self.entries.push(InfoRowEntry {
            owner: owner.to_owned(),
            x,
            node,
        });
        Some(node)
    }

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
        before - self.entries.len()
    }

    pub(crate) fn translate(
        &self,
        scene: &mut SceneGraph,
        scales: &ScaleSet,
        layout: &CanvasLayout,
    ) -> GraphResult<()> {
        let Some(top) = layout.info_row_top else {
            return Ok(());
        };
        let y = top + INFO_ROW_HEIGHT * 0.75;
        for entry in &self.entries {
            let x = scales.x.map(&entry.x)?;
            scene.set_attr(entry.node, "x", fmt_px(x));
            scene.set_attr(entry.node, "y", fmt_px(y));
        }
        Ok(())
    }
}
