//! Reference chart types and the tagged union the graph stores them in.

mod bar;
mod base;
mod line;
mod marks;
mod paired;

pub use bar::{BarContent, BarInput, BarRect, BarValueInput, project_bar};
pub use base::{ContentBase, LabelInput, ValueInput};
pub use line::{LineContent, LineInput};
pub use paired::{PairedContent, PairedInput, PairedRegions, PairedSubtype, PairedValueInput};

use crate::api::{ContentContext, ContentId, ContentKind, ContentState, GraphContent, GraphSettings};
use crate::core::{AxisId, ContentRange, DataPoint};
use crate::error::GraphResult;

/// Any chart type the graph can hold.
#[derive(Debug, Clone)]
pub enum Content {
    Line(LineContent),
    Bar(BarContent),
    Paired(PairedContent),
}

impl Content {
    fn inner(&self) -> &dyn GraphContent {
        match self {
            Self::Line(content) => content,
            Self::Bar(content) => content,
            Self::Paired(content) => content,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GraphContent {
        match self {
            Self::Line(content) => content,
            Self::Bar(content) => content,
            Self::Paired(content) => content,
        }
    }
}

impl GraphContent for Content {
    fn id(&self) -> ContentId {
        self.inner().id()
    }

    fn key(&self) -> &str {
        self.inner().key()
    }

    fn kind(&self) -> ContentKind {
        self.inner().kind()
    }

    fn state(&self) -> ContentState {
        self.inner().state()
    }

    fn y_axis(&self) -> AxisId {
        self.inner().y_axis()
    }

    fn clickable(&self) -> bool {
        self.inner().clickable()
    }

    fn prepare(&mut self, settings: &GraphSettings, load_index: usize) -> GraphResult<()> {
        self.inner_mut().prepare(settings, load_index)
    }

    fn ranges(&self) -> Vec<ContentRange> {
        self.inner().ranges()
    }

    fn data_target(&self) -> &[DataPoint] {
        self.inner().data_target()
    }

    fn load(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        self.inner_mut().load(ctx)
    }

    fn unload(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        self.inner_mut().unload(ctx)
    }

    fn resize(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        self.inner_mut().resize(ctx)
    }

    fn redraw(&mut self, ctx: &mut ContentContext<'_>) -> GraphResult<()> {
        self.inner_mut().redraw(ctx)
    }
}

impl From<LineContent> for Content {
    fn from(content: LineContent) -> Self {
        Self::Line(content)
    }
}

impl From<BarContent> for Content {
    fn from(content: BarContent) -> Self {
        Self::Bar(content)
    }
}

impl From<PairedContent> for Content {
    fn from(content: PairedContent) -> Self {
        Self::Paired(content)
    }
}
