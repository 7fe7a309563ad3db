use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::GraphEvent;
use crate::interaction::FrameWork;
use crate::render::Renderer;

use super::content::{ContentId, GraphContent};
use super::graph::Graph;

impl<R: Renderer> Graph<R> {
    /// Toggles a legend target. Returns whether the target is now shown.
    ///
    /// `ShownTargets` changes immediately; marks and regions follow on the
    /// next [`Graph::tick`]. Disabled items are left untouched.
    pub fn legend_click(&mut self, target: &str) -> GraphResult<bool> {
        let session = self.session_mut()?;
        let state = &mut session.state;
        let Some(item) = state.legend.item(target) else {
            return Err(GraphError::usage(
                ErrorKind::InvalidObjectProvided,
                format!("no legend item for `{target}`"),
            ));
        };
        if item.disabled {
            return Ok(false);
        }
        let owner = item.owner.clone();
        let shown = if state.shown.contains(target) {
            state.shown.hide(target);
            false
        } else {
            state.shown.show(target, &owner);
            true
        };
        state.legend.set_selected(&mut state.scene, target, shown);
        state.scheduler.request_redraw();
        debug!(target, shown, "legend toggled");
        self.emit(GraphEvent::LegendToggled {
            target: target.to_owned(),
            shown,
        });
        Ok(shown)
    }

    /// Highlights a legend target and temporarily reveals its regions.
    /// `None` ends the hover.
    pub fn legend_hover(&mut self, target: Option<&str>) -> GraphResult<()> {
        let session = self.session_mut()?;
        let state = &mut session.state;
        if let Some(target) = target {
            if state.legend.item(target).is_none() {
                return Err(GraphError::usage(
                    ErrorKind::InvalidObjectProvided,
                    format!("no legend item for `{target}`"),
                ));
            }
        }
        if let Some(previous) = state.hovered.take() {
            state.legend.set_hovered(&mut state.scene, &previous, false);
        }
        if let Some(target) = target {
            state.legend.set_hovered(&mut state.scene, target, true);
            state.hovered = Some(target.to_owned());
        }
        state.regions.set_hovered(target);
        state.scheduler.request_redraw();
        Ok(())
    }

    /// Records a host window resize at `now`. Bursts inside the throttle
    /// window collapse into one resize fired by [`Graph::tick`].
    pub fn on_window_resize(&mut self, container_width: f64, now: Duration) -> GraphResult<()> {
        let session = self.session_mut()?;
        session.state.scheduler.schedule_resize(container_width, now);
        trace!(container_width, "window resize scheduled");
        Ok(())
    }

    /// Runs the frame work due at `now`.
    pub fn tick(&mut self, now: Duration) -> GraphResult<FrameWork> {
        let session = self.session_mut()?;
        let work = session.state.scheduler.take_due(now);
        if work.is_empty() {
            return Ok(work);
        }
        let previous = session.state.container_width;
        if let Some(width) = work.resize {
            session.state.container_width = width;
        }
        let flushed = if work.redraw {
            session.redraw_contents()
        } else {
            Ok(())
        };
        if let Err(err) = flushed.and_then(|()| session.resize()) {
            session.state.container_width = previous;
            return Err(err);
        }
        let width = session.state.layout.width;
        if work.resize.is_some() {
            self.emit(GraphEvent::Resized { width });
        }
        self.emit(GraphEvent::FrameFlushed {
            resized: work.resize.is_some(),
            redrawn: work.redraw,
        });
        Ok(work)
    }

    /// Dispatches a click on the mark of `target` at input `position`, the
    /// pair a mark carries as `aria-describedby` and `data-position`. Paired
    /// contents share one position across their high, mid and low targets.
    /// Returns `false` for contents without a click handler unless the graph
    /// passes clicks through.
    pub fn click_point(
        &mut self,
        id: ContentId,
        target: &str,
        position: usize,
    ) -> GraphResult<bool> {
        let session = self.session_mut()?;
        let pass_through = session.state.settings.click_pass_through;
        let Some(content) = session.contents.iter().find(|content| content.id() == id) else {
            return Err(GraphError::usage(
                ErrorKind::InvalidObjectProvided,
                format!("content {} is not loaded on this graph", id.get()),
            ));
        };
        if !content.clickable() && !pass_through {
            return Ok(false);
        }
        let Some(point) = content
            .data_target()
            .iter()
            .find(|point| point.key == target && point.index == position)
        else {
            return Err(GraphError::usage(
                ErrorKind::InvalidObjectProvided,
                format!(
                    "content `{}` has no `{target}` point at {position}",
                    content.key()
                ),
            ));
        };
        let event = GraphEvent::PointClicked {
            id,
            key: point.key.clone(),
            position,
            x: point.x.clone(),
            y: point.y,
        };
        self.emit(event);
        Ok(true)
    }

    /// Dispatches a click on the dateline at `index`.
    pub fn click_dateline(&mut self, index: usize) -> GraphResult<bool> {
        let session = self.session_mut()?;
        let Some(dateline) = session.state.settings.datelines.get(index) else {
            return Err(GraphError::usage(
                ErrorKind::InvalidObjectProvided,
                format!("no dateline at index {index}"),
            ));
        };
        if !dateline.clickable {
            return Ok(false);
        }
        let value = dateline.value;
        self.emit(GraphEvent::DatelineClicked { index, value });
        Ok(true)
    }
}
