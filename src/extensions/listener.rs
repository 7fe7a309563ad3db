use serde::{Deserialize, Serialize};

use crate::api::ContentId;
use crate::core::{Domain, XCoord};

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListenerContext {
    pub width: f64,
    pub height: f64,
    pub y_domain: Domain,
    pub content_count: usize,
    pub shown_count: usize,
    pub mutation_count: u64,
}

/// Event stream exposed to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    Generated,
    ContentLoaded { id: ContentId, key: String },
    ContentUnloaded { id: ContentId, key: String },
    Resized { width: f64 },
    LegendToggled { target: String, shown: bool },
    PointClicked {
        id: ContentId,
        key: String,
        position: usize,
        x: XCoord,
        y: f64,
    },
    DatelineClicked { index: usize, value: f64 },
    FrameFlushed { resized: bool, redrawn: bool },
    Destroyed,
}

/// Observer interface for host integrations.
///
/// Listeners see events and a context snapshot but cannot reach into the
/// scene or the content list.
pub trait GraphListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &GraphEvent, context: ListenerContext);
}
