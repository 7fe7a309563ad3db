use std::fmt::Write as _;

use crate::core::Shape;
use crate::render::{Color, NodeId, SceneGraph, fmt_px};

/// Default glyph size for data points, in pixels.
pub const GLYPH_SIZE: f64 = 8.0;
/// Glyph size used in the legend and next to axis labels.
pub const LABEL_GLYPH_SIZE: f64 = 12.0;

/// SVG path for a polygon glyph centred on the origin.
#[must_use]
pub fn glyph_path(shape: Shape, size: f64) -> String {
    let mut d = String::new();
    for (index, (x, y)) in shape.outline(size).into_iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{command}{},{}", fmt_px(x), fmt_px(y));
    }
    if !d.is_empty() {
        d.push('Z');
    }
    d
}

/// Appends a glyph node under `parent`: an SVG circle for `Circle`, a path
/// for every other shape.
pub fn append_glyph(
    scene: &mut SceneGraph,
    parent: NodeId,
    shape: Shape,
    size: f64,
    color: Color,
) -> NodeId {
    let fill = color.to_hex();
    if shape == Shape::Circle {
        let node = scene.append(parent, "circle");
        scene.with_attrs(
            node,
            &[
                ("class", format!("glyph glyph-{}", shape.name())),
                ("r", fmt_px(size / 2.0)),
                ("fill", fill),
            ],
        )
    } else {
        let node = scene.append(parent, "path");
        scene.with_attrs(
            node,
            &[
                ("class", format!("glyph glyph-{}", shape.name())),
                ("d", glyph_path(shape, size)),
                ("fill", fill),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{append_glyph, glyph_path};
    use crate::core::Shape;
    use crate::render::{Color, SceneGraph};

    #[test]
    fn square_path_is_closed() {
        assert_eq!(glyph_path(Shape::Square, 4.0), "M-2,-2L2,-2L2,2L-2,2Z");
        assert!(glyph_path(Shape::Circle, 4.0).is_empty());
    }

    #[test]
    fn circle_glyph_uses_radius() {
        let mut scene = SceneGraph::new();
        let root = scene.create_root("g");
        let node = append_glyph(&mut scene, root, Shape::Circle, 8.0, Color::rgb(0, 0, 0));
        assert_eq!(scene.node(node).unwrap().tag, "circle");
        assert_eq!(scene.attr(node, "r"), Some("4"));
    }
}
