use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{epoch_millis_to_datetime, round_to_hundredths};
use crate::core::AxisType;
use crate::error::{ErrorKind, GraphError, GraphResult};

/// Resolved tick label format of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickFormat {
    /// Two decimals with trailing zeros trimmed, or an adaptive date pattern.
    #[default]
    Default,
    /// `.Nf`
    Fixed(u8),
    /// `d`
    Integer,
    /// `.N%`, value multiplied by 100.
    Percent(u8),
    /// strftime pattern for time-series axes.
    Time(String),
}

impl TickFormat {
    /// Parses the `ticks.format` string for an axis of `axis_type`.
    pub fn parse(format: Option<&str>, axis_type: AxisType) -> GraphResult<Self> {
        let Some(format) = format else {
            return Ok(Self::Default);
        };
        let invalid = || {
            GraphError::config(
                ErrorKind::InvalidFormatType,
                format!("unsupported tick format `{format}` for {axis_type:?} axis"),
            )
        };
        match axis_type {
            AxisType::TimeSeries => {
                if format.is_empty()
                    || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
                {
                    return Err(invalid());
                }
                Ok(Self::Time(format.to_owned()))
            }
            AxisType::Numeric => {
                if format == "d" {
                    return Ok(Self::Integer);
                }
                let precision = |digits: &str| digits.parse::<u8>().ok().filter(|p| *p <= 12);
                if let Some(digits) = format.strip_prefix('.').and_then(|f| f.strip_suffix('f')) {
                    return precision(digits).map(Self::Fixed).ok_or_else(invalid);
                }
                if let Some(digits) = format.strip_prefix('.').and_then(|f| f.strip_suffix('%')) {
                    return precision(digits).map(Self::Percent).ok_or_else(invalid);
                }
                Err(invalid())
            }
            AxisType::Ordinal => Err(invalid()),
        }
    }
}

/// Formats one tick value. `span` is the visible domain span, used by the
/// adaptive date pattern.
#[must_use]
pub fn format_tick(value: f64, axis_type: AxisType, format: &TickFormat, span: f64) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    match (axis_type, format) {
        (AxisType::TimeSeries, TickFormat::Time(pattern)) => format_time(value, pattern),
        (AxisType::TimeSeries, _) => format_time(value, adaptive_time_pattern(span)),
        (_, TickFormat::Fixed(precision)) => format!("{value:.*}", usize::from(*precision)),
        (_, TickFormat::Integer) => format!("{}", value.round() as i64),
        (_, TickFormat::Percent(precision)) => {
            format!("{:.*}%", usize::from(*precision), value * 100.0)
        }
        _ => trim_number(round_to_hundredths(value)),
    }
}

fn adaptive_time_pattern(span_ms: f64) -> &'static str {
    if span_ms <= 10.0 * 60_000.0 {
        "%H:%M:%S"
    } else if span_ms <= 2.0 * 86_400_000.0 {
        "%H:%M"
    } else if span_ms <= 366.0 * 86_400_000.0 {
        "%b %d"
    } else {
        "%Y"
    }
}

fn format_time(millis: f64, pattern: &str) -> String {
    epoch_millis_to_datetime(millis)
        .map(|time| time.format(pattern).to_string())
        .unwrap_or_else(|| "nan".to_owned())
}

fn trim_number(value: f64) -> String {
    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" { "0".to_owned() } else { text }
}

#[cfg(test)]
mod tests {
    use super::{TickFormat, format_tick};
    use crate::core::AxisType;
    use crate::error::ErrorKind;

    #[test]
    fn default_numeric_labels_trim_trailing_zeros() {
        let format = TickFormat::Default;
        assert_eq!(format_tick(20.0, AxisType::Numeric, &format, 100.0), "20");
        assert_eq!(format_tick(2.5, AxisType::Numeric, &format, 100.0), "2.5");
        assert_eq!(format_tick(-0.001, AxisType::Numeric, &format, 100.0), "0");
    }

    #[test]
    fn parses_numeric_format_strings() {
        assert_eq!(
            TickFormat::parse(Some(".1f"), AxisType::Numeric).unwrap(),
            TickFormat::Fixed(1)
        );
        assert_eq!(
            TickFormat::parse(Some(".0%"), AxisType::Numeric).unwrap(),
            TickFormat::Percent(0)
        );
        let err = TickFormat::parse(Some("%H"), AxisType::Numeric).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormatType);
    }

    #[test]
    fn time_axis_uses_strftime_patterns() {
        let format = TickFormat::parse(Some("%Y-%m-%d"), AxisType::TimeSeries).unwrap();
        assert_eq!(
            format_tick(86_400_000.0, AxisType::TimeSeries, &format, 0.0),
            "1970-01-02"
        );
        assert!(TickFormat::parse(Some("%Q"), AxisType::TimeSeries).is_err());
    }

    #[test]
    fn adaptive_time_labels_follow_span() {
        let format = TickFormat::Default;
        let label = format_tick(3_600_000.0, AxisType::TimeSeries, &format, 3_600_000.0);
        assert_eq!(label, "01:00");
    }
}
