use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

use crate::core::Padding;

use super::validation::{GraphSettings, ResolvedAxis};

/// Width reserved for the y and y2 tick labels.
pub(crate) const Y_AXIS_WIDTH: f64 = 40.0;
/// Height reserved under the plot for x tick labels.
pub(crate) const X_AXIS_HEIGHT: f64 = 30.0;
pub(crate) const AXIS_LABEL_SIZE: f64 = 20.0;
pub(crate) const INFO_ROW_HEIGHT: f64 = 20.0;
/// Plot height given to each category of an ordinal x axis when the canvas
/// height is not configured.
pub const TRACK_HEIGHT: f64 = 40.0;

/// Canvas height that leaves exactly `tracks * TRACK_HEIGHT` for the plot.
pub(crate) fn track_canvas_height(
    tracks: usize,
    padding: Padding,
    x: &ResolvedAxis,
    show_label: bool,
) -> f64 {
    let x_gutter = if x.show { X_AXIS_HEIGHT } else { 0.0 };
    let info_row = if x.info_row { INFO_ROW_HEIGHT } else { 0.0 };
    let label = if show_label && !x.label.is_empty() {
        AXIS_LABEL_SIZE
    } else {
        0.0
    };
    padding.top + padding.bottom + x_gutter + info_row + label + tracks as f64 * TRACK_HEIGHT
}

/// Plot rectangle inside the SVG, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }
}

/// Canvas geometry derived from settings and the container width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasLayout {
    pub width: f64,
    pub height: f64,
    pub plot: PlotArea,
    /// Top edge of the axis info row when the x axis reserves one.
    pub info_row_top: Option<f64>,
}

impl CanvasLayout {
    /// Height stays fixed after `generate`; only the width follows the host.
    pub(crate) fn compute(settings: &GraphSettings, container_width: f64) -> GraphResult<Self> {
        let width = settings.fixed_width.unwrap_or(container_width);
        let height = settings.height;
        if !width.is_finite() || width <= 0.0 {
            return Err(GraphError::InvalidCanvas { width, height });
        }

        let padding = settings.padding;
        let label_gutter = |label: &str| {
            if settings.show_label && !label.is_empty() {
                AXIS_LABEL_SIZE
            } else {
                0.0
            }
        };
        let y_gutter = if settings.y.show { Y_AXIS_WIDTH } else { 0.0 };
        let y2_gutter = settings
            .y2
            .as_ref()
            .filter(|axis| axis.show)
            .map_or(0.0, |axis| Y_AXIS_WIDTH + label_gutter(&axis.label));
        let x_gutter = if settings.x.show { X_AXIS_HEIGHT } else { 0.0 };
        let info_row = if settings.x.info_row {
            INFO_ROW_HEIGHT
        } else {
            0.0
        };

        let left = padding.left + y_gutter + label_gutter(&settings.y.label);
        let right = width - padding.right - y2_gutter;
        let top = padding.top;
        let bottom = height - padding.bottom - x_gutter - info_row - label_gutter(&settings.x.label);

        if right <= left || bottom <= top {
            return Err(GraphError::InvalidCanvas { width, height });
        }

        Ok(Self {
            width,
            height,
            plot: PlotArea {
                left,
                top,
                right,
                bottom,
            },
            info_row_top: settings.x.info_row.then_some(bottom + x_gutter),
        })
    }

    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (self.plot.left, self.plot.right)
    }

    /// Vertical pixel range, inverted so larger values paint higher.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        (self.plot.bottom, self.plot.top)
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasLayout, X_AXIS_HEIGHT, Y_AXIS_WIDTH};
    use crate::api::graph_config::GraphConfig;
    use crate::api::validation::validate_graph_config;
    use crate::error::ErrorKind;

    #[test]
    fn plot_area_subtracts_padding_and_gutters() {
        let config = GraphConfig::numeric("#g", (0.0, 1.0), (0.0, 1.0));
        let settings = validate_graph_config(&config, 500.0).unwrap();
        let layout = CanvasLayout::compute(&settings, 500.0).unwrap();
        assert_eq!(layout.plot.left, 30.0 + Y_AXIS_WIDTH);
        assert_eq!(layout.plot.right, 450.0);
        assert_eq!(layout.plot.bottom, 250.0 - 5.0 - X_AXIS_HEIGHT);
        assert_eq!(layout.y_range(), (layout.plot.bottom, 10.0));
    }

    #[test]
    fn fixed_width_overrides_host_width() {
        let config = GraphConfig::numeric("#g", (0.0, 1.0), (0.0, 1.0)).with_width(640.0);
        let settings = validate_graph_config(&config, 500.0).unwrap();
        let layout = CanvasLayout::compute(&settings, 123.0).unwrap();
        assert_eq!(layout.width, 640.0);
    }

    #[test]
    fn collapsed_plot_is_an_invalid_canvas() {
        let config = GraphConfig::numeric("#g", (0.0, 1.0), (0.0, 1.0));
        let settings = validate_graph_config(&config, 500.0).unwrap();
        let err = CanvasLayout::compute(&settings, 100.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCanvas);
    }
}
