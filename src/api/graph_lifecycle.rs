use tracing::{debug, trace};

use crate::content::Content;
use crate::core::{AxisId, ContentRange};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::GraphEvent;
use crate::render::Renderer;

use super::canvas_layout::CanvasLayout;
use super::content::{ContentId, ContentKind, GraphContent};
use super::graph::{Graph, GraphSession, SessionState};
use super::scale_coordinator::{BarLayout, build_scales, ordinal_band_width, resolve_domains};

impl SessionState {
    /// Rebuilds layout, bar slots, domains and the `ScaleSet` for `contents`.
    ///
    /// Everything fallible runs before any field is replaced, so an error
    /// leaves the previous geometry in place. Returns the axes whose domain
    /// changed.
    pub(super) fn rebuild_scales(&mut self, contents: &[Content]) -> GraphResult<Vec<AxisId>> {
        let layout = CanvasLayout::compute(&self.settings, self.container_width)?;
        let bar_contents = || contents.iter().filter(|content| content.kind() == ContentKind::Bar);
        let bars = BarLayout::compute(
            bar_contents().map(|content| content.key().to_owned()).collect(),
            bar_contents()
                .map(|content| content.data_target().len())
                .max()
                .unwrap_or(0),
            layout.plot.width(),
            ordinal_band_width(&self.settings, &layout),
        );
        let ranges: Vec<ContentRange> = contents.iter().flat_map(|content| content.ranges()).collect();
        let domains = resolve_domains(&self.settings, &ranges, &bars, &layout)?;
        let scales = build_scales(&self.settings, &domains, &layout)?;

        let modified = self.domains.modified_axes(&domains);
        self.layout = layout;
        self.bars = bars;
        self.domains = domains;
        self.scales = scales;
        Ok(modified)
    }

    pub(super) fn redraw_datelines(&mut self) {
        if self.datelines.group().is_none() {
            return;
        }
        self.datelines.redraw(
            &mut self.scene,
            self.canvas,
            &self.settings.datelines,
            &self.scales,
            &self.layout,
        );
    }
}

impl GraphSession {
    /// Rebuilds the scale and re-applies it to every layer and every content
    /// in load order. Node identity is preserved throughout.
    pub(super) fn resize(&mut self) -> GraphResult<()> {
        let state = &mut self.state;
        state.rebuild_scales(&self.contents)?;
        state.apply_geometry();
        state.translate_layers()?;
        for content in &mut self.contents {
            let mut ctx = state.context();
            content.resize(&mut ctx)?;
        }
        state.regions.refresh_all(&mut state.scene, &state.shown);
        trace!(
            width = state.layout.width,
            mutations = state.scene.mutation_count(),
            "resized graph"
        );
        Ok(())
    }

    /// Tears down and rebuilds the marks of every content, keeping config and
    /// data targets.
    pub(super) fn redraw_contents(&mut self) -> GraphResult<()> {
        let state = &mut self.state;
        for content in &mut self.contents {
            let mut ctx = state.context();
            content.redraw(&mut ctx)?;
        }
        state.regions.refresh_all(&mut state.scene, &state.shown);
        Ok(())
    }
}

impl<R: Renderer> Graph<R> {
    /// Registers and draws `content`, then resizes the whole graph against
    /// the new shared domain.
    ///
    /// Content validation, axis binding and domain computation all run before
    /// the scene is touched.
    pub fn load_content(&mut self, content: impl Into<Content>) -> GraphResult<ContentId> {
        let mut content = content.into();
        let session = self.session_mut()?;
        if session
            .contents
            .iter()
            .any(|loaded| loaded.key() == content.key())
        {
            return Err(GraphError::config(
                ErrorKind::UniqueKeyNotProvided,
                format!("a content keyed `{}` is already loaded", content.key()),
            ));
        }
        content.prepare(&session.state.settings, session.contents.len())?;
        let id = content.id();
        let key = content.key().to_owned();

        session.contents.push(content);
        let modified = match session.state.rebuild_scales(&session.contents) {
            Ok(modified) => modified,
            Err(err) => {
                session.contents.pop();
                return Err(err);
            }
        };
        if !modified.is_empty() {
            debug!(key = %key, axes = ?modified, "content changed the shared domain");
            session.state.translate_layers()?;
        }

        let state = &mut session.state;
        if let Some(content) = session.contents.last_mut() {
            let mut ctx = state.context();
            content.load(&mut ctx)?;
        }
        state.redraw_datelines();
        session.resize()?;

        debug!(key = %key, id = id.get(), contents = session.contents.len(), "loaded content");
        self.emit(GraphEvent::ContentLoaded { id, key });
        Ok(id)
    }

    /// Unloads the content registered under `id` and returns it disposed.
    ///
    /// An id that is not loaded on this graph is rejected before anything is
    /// removed.
    pub fn unload_content(&mut self, id: ContentId) -> GraphResult<Content> {
        let session = self.session_mut()?;
        let Some(position) = session
            .contents
            .iter()
            .position(|content| content.id() == id)
        else {
            return Err(GraphError::usage(
                ErrorKind::InvalidObjectProvided,
                format!("content {} is not loaded on this graph", id.get()),
            ));
        };
        let mut content = session.contents.remove(position);
        {
            let mut ctx = session.state.context();
            content.unload(&mut ctx)?;
        }
        session.resize()?;

        let key = content.key().to_owned();
        debug!(key = %key, id = id.get(), contents = session.contents.len(), "unloaded content");
        self.emit(GraphEvent::ContentUnloaded { id, key });
        Ok(content)
    }

    /// Recomputes geometry for the current container width. Height is fixed
    /// after `generate`.
    pub fn resize(&mut self) -> GraphResult<()> {
        let session = self.session_mut()?;
        session.resize()?;
        let width = session.state.layout.width;
        self.emit(GraphEvent::Resized { width });
        Ok(())
    }

    /// Applies a new container width immediately.
    pub fn resize_to(&mut self, container_width: f64) -> GraphResult<()> {
        let session = self.session_mut()?;
        let previous = session.state.container_width;
        session.state.container_width = container_width;
        if let Err(err) = session.resize() {
            session.state.container_width = previous;
            return Err(err);
        }
        let width = session.state.layout.width;
        self.emit(GraphEvent::Resized { width });
        Ok(())
    }
}
