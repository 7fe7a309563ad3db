use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde_json::Value;

use crate::core::{AxisType, XCoord};
use crate::error::{ErrorKind, GraphError, GraphResult};

/// Rounds to two decimal places through `Decimal` so tick labels never show
/// binary floating-point noise such as `94.00000000001`.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp(2))
        .and_then(|decimal| decimal.to_f64())
        .unwrap_or(value)
}

#[must_use]
pub fn datetime_to_epoch_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

#[must_use]
pub fn epoch_millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)
}

/// Parses an RFC 3339 timestamp into epoch milliseconds.
pub fn parse_timestamp(input: &str) -> GraphResult<f64> {
    DateTime::parse_from_rfc3339(input)
        .map(|time| datetime_to_epoch_millis(time.with_timezone(&Utc)))
        .map_err(|err| {
            GraphError::config(
                ErrorKind::InvalidType,
                format!("`{input}` is not an RFC 3339 timestamp: {err}"),
            )
        })
}

/// Resolves a raw JSON x value against the x axis type.
///
/// Time series accept RFC 3339 strings or epoch milliseconds, numeric axes
/// accept numbers, ordinal axes accept strings.
pub fn parse_x_value(value: &Value, axis_type: AxisType) -> GraphResult<XCoord> {
    let mismatch = || {
        GraphError::config(
            ErrorKind::InvalidType,
            format!("x value `{value}` does not match axis type {axis_type:?}"),
        )
    };
    match axis_type {
        AxisType::TimeSeries => match value {
            Value::String(text) => parse_timestamp(text).map(XCoord::Continuous),
            Value::Number(number) => number
                .as_f64()
                .filter(|millis| millis.is_finite())
                .map(XCoord::Continuous)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        AxisType::Numeric => value
            .as_f64()
            .filter(|number| number.is_finite())
            .map(XCoord::Continuous)
            .ok_or_else(mismatch),
        AxisType::Ordinal => match value {
            Value::String(text) => Ok(XCoord::Category(text.clone())),
            Value::Number(number) => Ok(XCoord::Category(number.to_string())),
            _ => Err(mismatch()),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_timestamp, parse_x_value, round_to_hundredths};
    use crate::core::{AxisType, XCoord};

    #[test]
    fn rounding_removes_float_noise() {
        assert_eq!(round_to_hundredths(94.000_000_000_01), 94.0);
        assert_eq!(round_to_hundredths(-4.126), -4.13);
    }

    #[test]
    fn timestamps_resolve_to_epoch_millis() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:01Z").unwrap(), 1000.0);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn x_values_follow_axis_type() {
        assert_eq!(
            parse_x_value(&json!("1970-01-01T00:00:00.500Z"), AxisType::TimeSeries).unwrap(),
            XCoord::Continuous(500.0)
        );
        assert_eq!(
            parse_x_value(&json!(3), AxisType::Ordinal).unwrap(),
            XCoord::Category("3".into())
        );
        assert!(parse_x_value(&json!("3"), AxisType::Numeric).is_err());
    }
}
