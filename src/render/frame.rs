use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::render::{NodeId, SceneGraph};

const GEOMETRY_ATTRS: [&str; 12] = [
    "x", "y", "x1", "y1", "x2", "y2", "cx", "cy", "r", "width", "height", "d",
];

/// Backend-agnostic view of one graph draw pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub scene: &'a SceneGraph,
    pub canvas: NodeId,
    pub legend: Option<NodeId>,
}

impl<'a> RenderFrame<'a> {
    #[must_use]
    pub fn new(scene: &'a SceneGraph, canvas: NodeId, legend: Option<NodeId>) -> Self {
        Self {
            scene,
            canvas,
            legend,
        }
    }

    /// Rejects frames carrying non-finite geometry.
    pub fn validate(&self) -> GraphResult<()> {
        if !self.scene.is_alive(self.canvas) {
            return Err(GraphError::usage(
                ErrorKind::GraphNotGenerated,
                "render frame canvas node is not alive",
            ));
        }
        for id in self.scene.descendants(self.canvas) {
            let Some(node) = self.scene.node(id) else {
                continue;
            };
            for name in GEOMETRY_ATTRS {
                if node.attr(name).is_some_and(|value| value.contains("NaN")) {
                    return Err(GraphError::config(
                        ErrorKind::InvalidInput,
                        format!("`{}` attribute `{name}` is not finite", node.tag),
                    ));
                }
            }
            if node
                .attr("transform")
                .is_some_and(|value| value.contains("NaN"))
            {
                return Err(GraphError::config(
                    ErrorKind::InvalidInput,
                    format!("`{}` transform is not finite", node.tag),
                ));
            }
        }
        Ok(())
    }
}
