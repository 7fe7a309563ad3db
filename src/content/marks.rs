use std::fmt::Write as _;

use crate::core::{DataPoint, Visibility};
use crate::render::{Color, GLYPH_SIZE, NodeId, SceneGraph, append_glyph, fmt_px, translate};

/// Appends the group that holds every mark of one content, keyed by the
/// content key so unload can find it without an index.
pub(crate) fn append_content_group(
    scene: &mut SceneGraph,
    container: NodeId,
    key: &str,
    class: &str,
) -> NodeId {
    let group = scene.append(container, "g");
    scene.with_attrs(
        group,
        &[
            ("class", format!("graph-content {class}")),
            ("aria-describedby", key.to_owned()),
        ],
    )
}

pub(crate) fn append_subgroup(scene: &mut SceneGraph, parent: NodeId, target: &str) -> NodeId {
    let group = scene.append(parent, "g");
    scene.with_attrs(
        group,
        &[
            ("class", "graph-content-subtype".to_owned()),
            ("aria-describedby", target.to_owned()),
        ],
    )
}

pub(crate) fn append_point(
    scene: &mut SceneGraph,
    parent: NodeId,
    point: &DataPoint,
    color: Color,
    clickable: bool,
) -> NodeId {
    let node = scene.append(parent, "g");
    scene.with_attrs(
        node,
        &[
            ("class", "point".to_owned()),
            ("aria-describedby", point.key.clone()),
            ("aria-disabled", (!clickable).to_string()),
            ("data-position", point.index.to_string()),
        ],
    );
    append_glyph(scene, node, point.shape, GLYPH_SIZE, color);
    node
}

pub(crate) fn place(scene: &mut SceneGraph, node: NodeId, x: f64, y: f64) {
    scene.set_attr(node, "transform", translate(x, y));
}

pub(crate) fn apply_visibility(scene: &mut SceneGraph, node: NodeId, visibility: Visibility) {
    scene.set_attr(node, "aria-hidden", visibility.aria_hidden());
}

/// SVG path through pixel positions, in order.
pub(crate) fn line_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (index, (x, y)) in points.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{command}{},{}", fmt_px(*x), fmt_px(*y));
    }
    d
}

#[cfg(test)]
mod tests {
    use super::line_path;

    #[test]
    fn line_path_moves_then_draws() {
        assert_eq!(line_path(&[]), "");
        assert_eq!(line_path(&[(0.0, 1.5), (10.0, 2.0)]), "M0,1.5L10,2");
    }
}
