use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::GraphListener;
use crate::render::Renderer;

use super::graph::Graph;

impl<R: Renderer> Graph<R> {
    /// Registers a listener with a unique identifier.
    pub fn register_listener(&mut self, listener: Box<dyn GraphListener>) -> GraphResult<()> {
        let listener_id = listener.id().to_owned();
        if listener_id.is_empty() {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                "listener id must not be empty",
            ));
        }
        if self.has_listener(&listener_id) {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                format!("listener with id `{listener_id}` is already registered"),
            ));
        }
        self.listeners.push(listener);
        Ok(())
    }

    /// Unregisters a listener by id. Returns `true` when removed.
    pub fn unregister_listener(&mut self, listener_id: &str) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id() != listener_id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn has_listener(&self, listener_id: &str) -> bool {
        self.listeners
            .iter()
            .any(|listener| listener.id() == listener_id)
    }
}
