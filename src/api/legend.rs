use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Shape;
use crate::render::{Color, LABEL_GLYPH_SIZE, NodeId, SceneGraph, append_glyph};

/// One legend entry. Composite contents register one item per subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub owner: String,
    pub label: String,
    pub color: Color,
    pub shape: Shape,
    /// Items of contents without data points cannot be toggled.
    pub disabled: bool,
    #[serde(skip)]
    node: Option<NodeId>,
}

/// Legend entries keyed by target. Nodes exist only when the legend is
/// shown; the entries themselves always exist so toggling works headless.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    root: Option<NodeId>,
    items: IndexMap<String, LegendItem>,
}

impl Legend {
    pub(crate) fn attach(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[must_use]
    pub fn item(&self, target: &str) -> Option<&LegendItem> {
        self.items.get(target)
    }

    #[must_use]
    pub fn node(&self, target: &str) -> Option<NodeId> {
        self.items.get(target).and_then(|item| item.node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub(crate) fn add_item(
        &mut self,
        scene: &mut SceneGraph,
        target: &str,
        mut item: LegendItem,
    ) {
        item.node = self.root.map(|root| {
            let node = scene.append(root, "li");
            scene.with_attrs(
                node,
                &[
                    ("class", "graph-legend-item".to_owned()),
                    ("role", "option".to_owned()),
                    ("aria-describedby", target.to_owned()),
                    ("aria-selected", "true".to_owned()),
                    ("aria-disabled", item.disabled.to_string()),
                ],
            );
            let swatch = scene.append(node, "svg");
            scene.set_attr(swatch, "class", "legend-item-btn");
            append_glyph(scene, swatch, item.shape, LABEL_GLYPH_SIZE, item.color);
            let text = scene.append(node, "span");
            scene.set_attr(text, "class", "legend-item-label");
            scene.set_text(text, item.label.clone());
            node
        });
        self.items.insert(target.to_owned(), item);
    }

    pub(crate) fn remove_owner(&mut self, scene: &mut SceneGraph, owner: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| {
            if item.owner != owner {
                return true;
            }
            if let Some(node) = item.node {
                scene.remove(node);
            }
            false
        });
        before - self.items.len()
    }

    pub(crate) fn set_selected(&self, scene: &mut SceneGraph, target: &str, selected: bool) {
        if let Some(node) = self.node(target) {
            scene.set_attr(node, "aria-selected", selected.to_string());
        }
    }

    pub(crate) fn set_hovered(&self, scene: &mut SceneGraph, target: &str, hovered: bool) {
        if let Some(node) = self.node(target) {
            let class = if hovered {
                "graph-legend-item graph-legend-item-hover"
            } else {
                "graph-legend-item"
            };
            scene.set_attr(node, "class", class);
        }
    }
}

impl LegendItem {
    #[must_use]
    pub fn new(owner: &str, label: impl Into<String>, color: Color, shape: Shape) -> Self {
        Self {
            owner: owner.to_owned(),
            label: label.into(),
            color,
            shape,
            disabled: false,
            node: None,
        }
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Legend, LegendItem};
    use crate::core::Shape;
    use crate::render::{Color, SceneGraph};

    #[test]
    fn items_follow_selection_and_owner_removal() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("ul");
        let mut legend = Legend::default();
        legend.attach(root);
        let color = Color::rgb(1, 2, 3);
        legend.add_item(&mut scene, "p_high", LegendItem::new("p", "P High", color, Shape::Triangle));
        legend.add_item(&mut scene, "p_low", LegendItem::new("p", "P Low", color, Shape::Diamond));
        legend.add_item(&mut scene, "l", LegendItem::new("l", "L", color, Shape::Circle).disabled(true));

        let low = legend.node("p_low").unwrap();
        legend.set_selected(&mut scene, "p_low", false);
        assert_eq!(scene.attr(low, "aria-selected"), Some("false"));
        assert_eq!(scene.attr(legend.node("l").unwrap(), "aria-disabled"), Some("true"));

        assert_eq!(legend.remove_owner(&mut scene, "p"), 2);
        assert!(!scene.is_alive(low));
        assert_eq!(legend.targets().collect::<Vec<_>>(), vec!["l"]);
    }

    #[test]
    fn headless_legend_still_tracks_items() {
        let mut scene = SceneGraph::new();
        let mut legend = Legend::default();
        legend.add_item(
            &mut scene,
            "a",
            LegendItem::new("a", "A", Color::rgb(0, 0, 0), Shape::Circle),
        );
        assert_eq!(legend.len(), 1);
        assert!(legend.node("a").is_none());
        assert_eq!(scene.live_node_count(), 0);
    }
}
