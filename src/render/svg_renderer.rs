use std::fmt::Write as _;

use crate::error::GraphResult;
use crate::render::{NodeId, RenderFrame, Renderer, SceneGraph};

/// Serializes the scene into SVG (and the legend into HTML) markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    pub last_svg: String,
    pub last_legend: Option<String>,
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> GraphResult<()> {
        frame.validate()?;
        self.last_svg = serialize_node(frame.scene, frame.canvas);
        self.last_legend = frame
            .legend
            .map(|legend| serialize_node(frame.scene, legend));
        Ok(())
    }
}

/// Serializes `root` and its subtree.
#[must_use]
pub fn serialize_node(scene: &SceneGraph, root: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, scene, root);
    out
}

fn write_node(out: &mut String, scene: &SceneGraph, id: NodeId) {
    let Some(node) = scene.node(id) else {
        return;
    };
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attrs {
        let _ = write!(out, r#" {name}="{}""#, escape_attr(value));
    }
    let text = node.text.as_deref().unwrap_or("");
    if node.children.is_empty() && text.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    out.push_str(&escape_text(text));
    for child in &node.children {
        write_node(out, scene, *child);
    }
    let _ = write!(out, "</{}>", node.tag);
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::serialize_node;
    use crate::render::SceneGraph;

    #[test]
    fn serializes_nested_nodes_with_escaping() {
        let mut scene = SceneGraph::new();
        let svg = scene.create_root("svg");
        scene.set_attr(svg, "width", "10");
        let text = scene.append(svg, "text");
        scene.set_text(text, "a < b & \"c\"");
        scene.set_attr(text, "aria-describedby", "k\"1");

        assert_eq!(
            serialize_node(&scene, svg),
            r#"<svg width="10"><text aria-describedby="k&quot;1">a &lt; b &amp; "c"</text></svg>"#
        );
    }
}
