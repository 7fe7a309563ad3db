//! Series shapes listed next to the y and y2 axis labels.

use indexmap::IndexMap;

use crate::core::{AxisId, Shape};
use crate::render::{Color, LABEL_GLYPH_SIZE, NodeId, SceneGraph, append_glyph, translate};

const LABEL_SHAPE_GAP: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
struct LabelShapeEntry {
    owner: String,
    axis: AxisId,
    node: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct LabelShapes {
    containers: IndexMap<AxisId, NodeId>,
    entries: IndexMap<String, LabelShapeEntry>,
}

impl LabelShapes {
    pub(crate) fn attach(&mut self, axis: AxisId, container: NodeId) {
        self.containers.insert(axis, container);
    }

    #[must_use]
    pub fn container(&self, axis: AxisId) -> Option<NodeId> {
        self.containers.get(&axis).copied()
    }

    /// Adds the shape of `target` next to the label of `axis`.
    ///
    /// Returns `false` when the axis carries no label container.
    pub fn add(
        &mut self,
        scene: &mut SceneGraph,
        axis: AxisId,
        target: &str,
        owner: &str,
        shape: Shape,
        color: Color,
    ) -> bool {
        let Some(container) = self.container(axis) else {
            return false;
        };
        let node = scene.append(container, "g");
        scene.with_attrs(
            node,
            &[
                ("class", "label-shape".to_owned()),
                ("aria-describedby", target.to_owned()),
            ],
        );
        append_glyph(scene, node, shape, LABEL_GLYPH_SIZE, color);
        self.entries.insert(
            target.to_owned(),
            LabelShapeEntry {
                owner: owner.to_owned(),
                axis,
                node,
            },
        );
        self.stack(scene);
        true
    }

    pub fn remove_owner(&mut self, scene: &mut SceneGraph, owner: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            if entry.owner == owner {
                scene.remove(entry.node);
                false
            } else {
                true
            }
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            self.stack(scene);
        }
        removed
    }

    #[must_use]
    pub fn count(&self, axis: AxisId) -> usize {
        self.entries.values().filter(|entry| entry.axis == axis).count()
    }

    pub fn targets(&self, axis: AxisId) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.axis == axis)
            .map(|(target, _)| target.as_str())
    }

    /// Stacks the shapes of each axis top to bottom in insertion order.
    fn stack(&self, scene: &mut SceneGraph) {
        for axis in self.containers.keys() {
            let step = LABEL_GLYPH_SIZE + LABEL_SHAPE_GAP;
            for (slot, entry) in self
                .entries
                .values()
                .filter(|entry| entry.axis == *axis)
                .enumerate()
            {
                scene.set_attr(entry.node, "transform", translate(0.0, slot as f64 * step));
            }
        }
    }
}
