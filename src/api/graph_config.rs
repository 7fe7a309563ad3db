use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{AxisType, Padding, Shape};
use crate::error::GraphResult;

pub const DEFAULT_CANVAS_HEIGHT: f64 = 250.0;
pub const DEFAULT_THROTTLE_MS: u64 = 16;

/// Public graph input, usually deserialized from consumer JSON.
///
/// Field names follow the JSON contract (`bindTo`, `lowerLimit`, ...).
/// Validation into the resolved form happens in `Graph::generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    #[serde(alias = "bind_to")]
    pub bind_to: String,
    #[serde(default, alias = "bind_legend_to")]
    pub bind_legend_to: Option<String>,
    #[serde(default)]
    pub dimension: DimensionConfig,
    #[serde(default)]
    pub padding: Padding,
    pub axis: AxesConfig,
    #[serde(default = "default_true", alias = "show_label")]
    pub show_label: bool,
    #[serde(default = "default_true", alias = "show_legend")]
    pub show_legend: bool,
    #[serde(default = "default_true", alias = "show_shapes")]
    pub show_shapes: bool,
    #[serde(default)]
    pub dateline: Vec<DatelineConfig>,
    /// Window-resize coalescing delay in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle: u64,
    /// Dispatch point clicks even for contents without `onClick`.
    #[serde(default, alias = "click_pass_through")]
    pub click_pass_through: bool,
}

impl GraphConfig {
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_json_value(input: Value) -> GraphResult<Self> {
        Ok(serde_json::from_value(input)?)
    }

    /// Minimal numeric graph, mostly useful for tests and demos.
    #[must_use]
    pub fn numeric(bind_to: impl Into<String>, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            bind_to: bind_to.into(),
            bind_legend_to: None,
            dimension: DimensionConfig::default(),
            padding: Padding::default(),
            axis: AxesConfig {
                x: AxisConfig::numeric(x.0, x.1),
                y: AxisConfig::numeric(y.0, y.1),
                y2: None,
            },
            show_label: true,
            show_legend: true,
            show_shapes: true,
            dateline: Vec::new(),
            throttle: DEFAULT_THROTTLE_MS,
            click_pass_through: false,
        }
    }

    #[must_use]
    pub fn with_y2(mut self, lower: f64, upper: f64) -> Self {
        self.axis.y2 = Some(AxisConfig::numeric(lower, upper));
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.dimension.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.dimension.width = Some(width);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionConfig {
    /// Fixed container width; otherwise the host width passed to `generate`.
    #[serde(default)]
    pub width: Option<f64>,
    /// Fixed canvas height; fixed for the lifetime of the graph.
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesConfig {
    pub x: AxisConfig,
    pub y: AxisConfig,
    #[serde(default)]
    pub y2: Option<AxisConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    #[serde(rename = "type", default)]
    pub axis_type: AxisType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub domain: Option<AxisDomainConfig>,
    /// Ordered keys of an ordinal axis.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub ticks: TicksConfig,
    #[serde(default = "default_true")]
    pub show: bool,
    /// When false the configured domain is kept regardless of loaded data.
    #[serde(default = "default_true", alias = "allow_calibration")]
    pub allow_calibration: bool,
    /// Reserves an annotation row under the x axis (x axis only).
    #[serde(default, alias = "info_row")]
    pub info_row: bool,
}

impl AxisConfig {
    #[must_use]
    pub fn numeric(lower: f64, upper: f64) -> Self {
        Self {
            axis_type: AxisType::Numeric,
            label: String::new(),
            domain: Some(AxisDomainConfig {
                lower_limit: Value::from(lower),
                upper_limit: Value::from(upper),
            }),
            categories: Vec::new(),
            ticks: TicksConfig::default(),
            show: true,
            allow_calibration: true,
            info_row: false,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Raw bounds; time-series axes carry RFC 3339 strings here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisDomainConfig {
    #[serde(alias = "lower_limit")]
    pub lower_limit: Value,
    #[serde(alias = "upper_limit")]
    pub upper_limit: Value,
}

/// Tick configuration. `values` and the three bucket lists are mutually
/// exclusive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicksConfig {
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default, alias = "lower_step_tick_values")]
    pub lower_step_tick_values: Option<Value>,
    #[serde(default, alias = "midpoint_tick_values")]
    pub midpoint_tick_values: Option<Value>,
    #[serde(default, alias = "upper_step_tick_values")]
    pub upper_step_tick_values: Option<Value>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatelineConfig {
    pub value: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default, alias = "show_dateline_indicator")]
    pub show_dateline_indicator: bool,
    #[serde(default)]
    pub label: Option<DatelineLabel>,
    /// Emits `GraphEvent::DatelineClicked` when clicked.
    #[serde(default, alias = "on_click")]
    pub on_click: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatelineLabel {
    pub display: String,
}

const fn default_true() -> bool {
    true
}

const fn default_throttle_ms() -> u64 {
    DEFAULT_THROTTLE_MS
}

#[cfg(test)]
mod tests {
    use super::GraphConfig;
    use crate::core::AxisType;

    #[test]
    fn parses_camel_case_contract_with_defaults() {
        let config = GraphConfig::from_json_str(
            r##"{
                "bindTo": "#graph",
                "axis": {
                    "x": {"type": "TIME_SERIES", "label": "Time",
                          "domain": {"lowerLimit": "2024-01-01T00:00:00Z",
                                     "upperLimit": "2024-01-02T00:00:00Z"}},
                    "y": {"label": "Value", "domain": {"lowerLimit": 0, "upperLimit": 20}}
                }
            }"##,
        )
        .unwrap();
        assert_eq!(config.axis.x.axis_type, AxisType::TimeSeries);
        assert_eq!(config.axis.y.axis_type, AxisType::Numeric);
        assert!(config.show_legend);
        assert_eq!(config.throttle, 16);
        assert!(config.axis.y2.is_none());
    }

    #[test]
    fn missing_bind_to_is_a_parse_error() {
        let err = GraphConfig::from_json_str(r#"{"axis": {}}"#).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }
}
