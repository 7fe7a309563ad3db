//! Lifecycle contract shared by every chart type.
//!
//! A content moves `Constructed → Loaded → Disposed`. `resize` and `redraw`
//! are only legal while loaded, and a disposed content can never be loaded
//! again.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::{AxisId, ContentRange, DataPoint, ScaleSet, Visibility, XCoord};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::extensions::{LabelShapes, RegionSet};
use crate::render::{NodeId, SceneGraph};

use super::axis_info_row::AxisInfoRow;
use super::canvas_layout::CanvasLayout;
use super::legend::Legend;
use super::scale_coordinator::BarLayout;
use super::shown_targets::ShownTargets;
use super::validation::GraphSettings;

static NEXT_CONTENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one content instance, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(u64);

impl ContentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentState {
    Constructed,
    Loaded,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Line,
    Bar,
    Paired,
}

/// What a content may see and touch during a lifecycle call.
///
/// Scales, layout and settings are read-only. The mutable handles are the
/// only graph state a content is allowed to change.
pub struct ContentContext<'a> {
    pub settings: &'a GraphSettings,
    pub scales: &'a ScaleSet,
    pub layout: &'a CanvasLayout,
    pub bars: &'a BarLayout,
    /// Clipped content layer all content groups are appended to.
    pub container: NodeId,
    pub scene: &'a mut SceneGraph,
    pub shown: &'a mut ShownTargets,
    pub legend: &'a mut Legend,
    pub label_shapes: &'a mut LabelShapes,
    pub regions: &'a mut RegionSet,
    pub info_row: &'a mut AxisInfoRow,
}

impl ContentContext<'_> {
    pub fn x_px(&self, x: &XCoord) -> GraphResult<f64> {
        self.scales.x.map(x)
    }

    pub fn y_px(&self, axis: AxisId, y: f64) -> GraphResult<f64> {
        Ok(self.scales.vertical(axis)?.map(y))
    }

    #[must_use]
    pub fn visibility(&self, target: &str) -> Visibility {
        Visibility::from_hidden(!self.shown.contains(target))
    }
}

/// Interface every chart type implements.
pub trait GraphContent {
    fn id(&self) -> ContentId;
    fn key(&self) -> &str;
    fn kind(&self) -> ContentKind;
    fn state(&self) -> ContentState;
    fn y_axis(&self) -> AxisId;
    fn clickable(&self) -> bool;

    /// Resolves `data_target` against the graph's axes. Runs before any scene
    /// mutation, so a failure leaves the graph untouched.
    fn prepare(&mut self, settings: &GraphSettings, load_index: usize) -> GraphResult<()>;

    /// Value extents on the vertical axis the content is bound to. The x
    /// domain is shared and configured, so contents never widen it.
    fn ranges(&self) -> Vec<ContentRange>;

    fn data_target(&self) -> &[DataPoint];

    fn load(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()>;
    fn unload(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()>;
    fn resize(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()>;
    fn redraw(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()>;
}

pub(crate) fn ensure_loadable(state: ContentState, key: &str) -> GraphResult<()> {
    match state {
        ContentState::Constructed => Ok(()),
        ContentState::Loaded => Err(GraphError::usage(
            ErrorKind::ContentAlreadyLoaded,
            format!("content `{key}` is already loaded"),
        )),
        ContentState::Disposed => Err(GraphError::usage(
            ErrorKind::ContentDisposed,
            format!("content `{key}` was unloaded and cannot be reused"),
        )),
    }
}

pub(crate) fn ensure_loaded(state: ContentState, key: &str) -> GraphResult<()> {
    match state {
        ContentState::Loaded => Ok(()),
        ContentState::Constructed => Err(GraphError::usage(
            ErrorKind::InvalidObjectProvided,
            format!("content `{key}` is not loaded"),
        )),
        ContentState::Disposed => Err(GraphError::usage(
            ErrorKind::ContentDisposed,
            format!("content `{key}` was unloaded and cannot be reused"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentId, ContentState, ensure_loadable, ensure_loaded};
    use crate::error::ErrorKind;

    #[test]
    fn ids_are_never_reused() {
        let first = ContentId::next();
        let second = ContentId::next();
        assert!(second.get() > first.get());
    }

    #[test]
    fn lifecycle_guards_report_stable_kinds() {
        assert!(ensure_loadable(ContentState::Constructed, "a").is_ok());
        assert_eq!(
            ensure_loadable(ContentState::Loaded, "a").unwrap_err().kind(),
            ErrorKind::ContentAlreadyLoaded
        );
        assert_eq!(
            ensure_loadable(ContentState::Disposed, "a").unwrap_err().kind(),
            ErrorKind::ContentDisposed
        );
        assert_eq!(
            ensure_loaded(ContentState::Constructed, "a").unwrap_err().kind(),
            ErrorKind::InvalidObjectProvided
        );
    }
}
