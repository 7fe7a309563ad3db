//! Input validation. Everything here runs before the scene is touched, so a
//! rejected input leaves the graph exactly as it was.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::core::primitives::{parse_timestamp, parse_x_value};
use crate::core::{AxisId, AxisType, Domain, Padding, Shape, XCoord, ordinal_domain};
use crate::error::{ErrorKind, GraphError, GraphResult};
use crate::render::{Color, DATELINE_COLOR};

use super::axis_label_format::TickFormat;
use super::axis_ticks::{TickBucket, TickMode};
use super::canvas_layout::track_canvas_height;
use super::graph_config::{
    AxisConfig, DEFAULT_CANVAS_HEIGHT, DatelineConfig, GraphConfig, TicksConfig,
};

/// Validated, immutable graph settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSettings {
    pub bind_to: String,
    pub bind_legend_to: Option<String>,
    pub fixed_width: Option<f64>,
    pub height: f64,
    pub padding: Padding,
    pub x: ResolvedAxis,
    pub y: ResolvedAxis,
    pub y2: Option<ResolvedAxis>,
    pub show_label: bool,
    pub show_legend: bool,
    pub show_shapes: bool,
    pub datelines: Vec<ResolvedDateline>,
    pub throttle: Duration,
    pub click_pass_through: bool,
}

impl GraphSettings {
    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&ResolvedAxis> {
        match id {
            AxisId::X => Some(&self.x),
            AxisId::Y => Some(&self.y),
            AxisId::Y2 => self.y2.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAxis {
    pub id: AxisId,
    pub axis_type: AxisType,
    pub label: String,
    /// Configured bounds; `None` only for ordinal axes.
    pub configured: Option<Domain>,
    pub categories: Vec<String>,
    pub ticks: TickMode,
    pub format: TickFormat,
    pub show: bool,
    pub allow_calibration: bool,
    pub info_row: bool,
}

impl ResolvedAxis {
    #[must_use]
    pub fn is_time(&self) -> bool {
        self.axis_type == AxisType::TimeSeries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDateline {
    pub index: usize,
    pub value: f64,
    pub color: Color,
    pub shape: Shape,
    pub show_indicator: bool,
    pub label: Option<String>,
    pub clickable: bool,
}

pub(crate) fn validate_graph_config(
    config: &GraphConfig,
    host_width: f64,
) -> GraphResult<GraphSettings> {
    if config.bind_to.trim().is_empty() {
        return Err(GraphError::config(
            ErrorKind::NoBindTo,
            "`bindTo` must name the container element",
        ));
    }
    let padding = config.padding.validate()?;
    let fixed_width = match config.dimension.width {
        Some(width) if !width.is_finite() || width <= 0.0 => {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                "dimension width must be finite and > 0",
            ));
        }
        other => other,
    };
    let x = validate_axis(AxisId::X, &config.axis.x)?;
    let height = match config.dimension.height {
        Some(height) => height,
        None if x.axis_type == AxisType::Ordinal => {
            track_canvas_height(x.categories.len(), padding, &x, config.show_label)
        }
        None => DEFAULT_CANVAS_HEIGHT,
    };
    if !height.is_finite() || height <= 0.0 {
        return Err(GraphError::config(
            ErrorKind::InvalidInput,
            "dimension height must be finite and > 0",
        ));
    }
    if !host_width.is_finite() || host_width <= 0.0 {
        return Err(GraphError::InvalidCanvas {
            width: host_width,
            height,
        });
    }

    let y = validate_axis(AxisId::Y, &config.axis.y)?;
    let y2 = config
        .axis
        .y2
        .as_ref()
        .map(|axis| validate_axis(AxisId::Y2, axis))
        .transpose()?;
    for vertical in std::iter::once(&y).chain(y2.as_ref()) {
        if vertical.axis_type != AxisType::Numeric {
            return Err(GraphError::config(
                ErrorKind::InvalidAxisType,
                format!("axis `{}` must be NUMERIC", vertical.id.as_str()),
            ));
        }
    }

    let datelines = config
        .dateline
        .iter()
        .enumerate()
        .map(|(index, dateline)| validate_dateline(index, dateline, &x))
        .collect::<GraphResult<Vec<_>>>()?;

    Ok(GraphSettings {
        bind_to: config.bind_to.clone(),
        bind_legend_to: config.bind_legend_to.clone(),
        fixed_width,
        height,
        padding,
        x,
        y,
        y2,
        show_label: config.show_label,
        show_legend: config.show_legend,
        show_shapes: config.show_shapes,
        datelines,
        throttle: Duration::from_millis(config.throttle),
        click_pass_through: config.click_pass_through,
    })
}

fn validate_axis(id: AxisId, config: &AxisConfig) -> GraphResult<ResolvedAxis> {
    if config.info_row && id != AxisId::X {
        return Err(GraphError::config(
            ErrorKind::InvalidInput,
            "only the x axis can reserve an info row",
        ));
    }

    let (configured, categories) = match config.axis_type {
        AxisType::Ordinal => {
            if id != AxisId::X {
                return Err(GraphError::config(
                    ErrorKind::InvalidAxisType,
                    "only the x axis can be ORDINAL",
                ));
            }
            let categories = ordinal_domain(config.categories.iter().map(String::as_str))?;
            (None, categories)
        }
        axis_type => {
            let domain = config.domain.as_ref().ok_or_else(|| {
                GraphError::config(
                    ErrorKind::InvalidInput,
                    format!("axis `{}` requires a domain", id.as_str()),
                )
            })?;
            let lower = continuous_value(&domain.lower_limit, axis_type)?;
            let upper = continuous_value(&domain.upper_limit, axis_type)?;
            (Some(Domain::new(lower, upper).validate(id)?), Vec::new())
        }
    };

    let ticks = validate_ticks(&config.ticks, config.axis_type, id)?;
    let format = TickFormat::parse(config.ticks.format.as_deref(), config.axis_type)?;

    Ok(ResolvedAxis {
        id,
        axis_type: config.axis_type,
        label: config.label.clone(),
        configured,
        categories,
        ticks,
        format,
        show: config.show,
        allow_calibration: config.allow_calibration,
        info_row: config.info_row,
    })
}

fn continuous_value(value: &Value, axis_type: AxisType) -> GraphResult<f64> {
    match parse_x_value(value, axis_type)? {
        XCoord::Continuous(number) => Ok(number),
        XCoord::Category(_) => Err(GraphError::config(
            ErrorKind::InvalidType,
            "continuous axis bound resolved to a category",
        )),
    }
}

fn validate_ticks(ticks: &TicksConfig, axis_type: AxisType, id: AxisId) -> GraphResult<TickMode> {
    let has_bucket = ticks.lower_step_tick_values.is_some()
        || ticks.midpoint_tick_values.is_some()
        || ticks.upper_step_tick_values.is_some();
    if ticks.values.is_some() && has_bucket {
        return Err(GraphError::config(
            ErrorKind::InvalidTicks,
            "`values` cannot be combined with bucketed tick values",
        ));
    }
    if (ticks.values.is_some() || has_bucket) && axis_type == AxisType::Ordinal {
        return Err(GraphError::config(
            ErrorKind::InvalidTicks,
            "ordinal axes derive ticks from their categories",
        ));
    }
    if has_bucket && id != AxisId::X {
        return Err(GraphError::config(
            ErrorKind::InvalidTicks,
            "bucketed ticks are only supported on the x axis",
        ));
    }

    if let Some(values) = &ticks.values {
        return tick_values(values, axis_type, "values").map(TickMode::Explicit);
    }
    if has_bucket {
        let tier = |value: &Option<Value>, name: &str| {
            value
                .as_ref()
                .map_or(Ok(Vec::new()), |value| tick_values(value, axis_type, name))
        };
        return Ok(TickMode::Bucket(TickBucket {
            lower_step_tick_values: tier(&ticks.lower_step_tick_values, "lowerStepTickValues")?,
            midpoint_tick_values: tier(&ticks.midpoint_tick_values, "midpointTickValues")?,
            upper_step_tick_values: tier(&ticks.upper_step_tick_values, "upperStepTickValues")?,
        }));
    }
    Ok(TickMode::Auto)
}

/// Parses a tick list and requires strictly increasing finite values.
fn tick_values(value: &Value, axis_type: AxisType, name: &str) -> GraphResult<Vec<f64>> {
    let Value::Array(items) = value else {
        return Err(GraphError::config(
            ErrorKind::InvalidTicks,
            format!("tick `{name}` must be an array"),
        ));
    };
    let values = items
        .iter()
        .map(|item| continuous_value(item, axis_type))
        .collect::<GraphResult<Vec<_>>>()
        .map_err(|err| GraphError::config(ErrorKind::InvalidTicks, err.to_string()))?;
    if values.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(GraphError::config(
            ErrorKind::InvalidTicks,
            format!("tick `{name}` must be strictly increasing"),
        ));
    }
    Ok(values)
}

fn validate_dateline(
    index: usize,
    dateline: &DatelineConfig,
    x: &ResolvedAxis,
) -> GraphResult<ResolvedDateline> {
    if !x.is_time() {
        return Err(GraphError::config(
            ErrorKind::InvalidDateline,
            "datelines require a TIME_SERIES x axis",
        ));
    }
    let value = parse_timestamp(&dateline.value)
        .map_err(|err| GraphError::config(ErrorKind::InvalidDateline, err.to_string()))?;
    let color = match dateline.color.as_deref() {
        Some(color) => Color::parse_hex(color)?,
        None => DATELINE_COLOR,
    };
    Ok(ResolvedDateline {
        index,
        value,
        color,
        shape: dateline.shape,
        show_indicator: dateline.show_dateline_indicator,
        label: dateline.label.as_ref().map(|label| label.display.clone()),
        clickable: dateline.on_click,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::validate_graph_config;
    use crate::api::axis_ticks::TickMode;
    use crate::api::graph_config::GraphConfig;
    use crate::error::ErrorKind;

    fn config(value: serde_json::Value) -> GraphConfig {
        GraphConfig::from_json_value(value).unwrap()
    }

    #[test]
    fn non_monotonic_ticks_fail_validation() {
        let input = config(json!({
            "bindTo": "#g",
            "axis": {
                "x": {"domain": {"lowerLimit": 0, "upperLimit": 10},
                      "ticks": {"values": [0, 5, 3]}},
                "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
            }
        }));
        let err = validate_graph_config(&input, 800.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTicks);
    }

    #[test]
    fn non_array_ticks_fail_validation() {
        let input = config(json!({
            "bindTo": "#g",
            "axis": {
                "x": {"domain": {"lowerLimit": 0, "upperLimit": 10}, "ticks": {"values": 5}},
                "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
            }
        }));
        let err = validate_graph_config(&input, 800.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTicks);
    }

    #[test]
    fn time_series_bucket_ticks_parse_timestamps() {
        let input = config(json!({
            "bindTo": "#g",
            "axis": {
                "x": {"type": "TIME_SERIES",
                      "domain": {"lowerLimit": "1970-01-01T00:00:00Z",
                                 "upperLimit": "1970-01-02T00:00:00Z"},
                      "ticks": {"lowerStepTickValues": ["1970-01-01T00:00:00Z"],
                                "upperStepTickValues": ["1970-01-02T00:00:00Z"]}},
                "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
            }
        }));
        let settings = validate_graph_config(&input, 800.0).unwrap();
        let TickMode::Bucket(bucket) = settings.x.ticks else {
            panic!("expected bucket ticks");
        };
        assert_eq!(bucket.upper_step_tick_values, vec![86_400_000.0]);
        assert!(bucket.midpoint_tick_values.is_empty());
    }

    #[test]
    fn datelines_require_time_series_axis() {
        let input = config(json!({
            "bindTo": "#g",
            "axis": {
                "x": {"domain": {"lowerLimit": 0, "upperLimit": 10}},
                "y": {"domain": {"lowerLimit": 0, "upperLimit": 10}}
            },
            "dateline": [{"value": "2024-01-01T00:00:00Z"}]
        }));
        let err = validate_graph_config(&input, 800.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDateline);
    }

    #[test]
    fn empty_bind_to_is_rejected() {
        let mut input = GraphConfig::numeric("", (0.0, 1.0), (0.0, 1.0));
        let err = validate_graph_config(&input, 800.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoBindTo);
        input.bind_to = "#g".into();
        input.axis.y.domain = None;
        let err = validate_graph_config(&input, 800.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
