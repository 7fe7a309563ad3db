//! Domain computation shared by every content type on a canvas.
//!
//! Contents never compute their own domains. Each one reports a
//! [`ContentRange`] per bound axis and the graph merges them here, so a
//! line and a bar series sharing `y` always agree on one interval.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::primitives::round_to_hundredths;
use crate::core::{AxisId, Domain};
use crate::error::{ErrorKind, GraphError, GraphResult};

/// Fraction of the merged range added above and below numeric domains.
pub const DEFAULT_PADDING_RATIO: f64 = 0.05;

/// Value extent contributed by one loaded content on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentRange {
    pub axis: AxisId,
    pub min: f64,
    pub max: f64,
    /// Bars grow from zero, so their axis must contain it.
    pub zero_baseline: bool,
}

impl ContentRange {
    #[must_use]
    pub fn from_values(axis: AxisId, values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        (min <= max).then_some(Self {
            axis,
            min,
            max,
            zero_baseline: false,
        })
    }

    #[must_use]
    pub fn with_zero_baseline(mut self, zero_baseline: bool) -> Self {
        self.zero_baseline = zero_baseline;
        self
    }
}

/// How a merged range is widened before it becomes an axis domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DomainPadding {
    None,
    /// Fraction of the range added on each side.
    Ratio(f64),
    /// Fixed pixel amount on each side, converted through the axis extent.
    Pixels { pixels: f64, extent_px: f64 },
}

impl DomainPadding {
    fn amount(self, span: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Ratio(ratio) => span * ratio,
            Self::Pixels { pixels, extent_px } => {
                let usable = extent_px - 2.0 * pixels;
                if usable <= 0.0 || span == 0.0 {
                    0.0
                } else {
                    span * pixels / usable
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainRules {
    pub padding: DomainPadding,
    /// Numeric axes round to hundredths, time axes stay exact.
    pub round: bool,
}

impl DomainRules {
    #[must_use]
    pub const fn numeric() -> Self {
        Self {
            padding: DomainPadding::Ratio(DEFAULT_PADDING_RATIO),
            round: true,
        }
    }

    #[must_use]
    pub const fn time() -> Self {
        Self {
            padding: DomainPadding::None,
            round: false,
        }
    }

    #[must_use]
    pub const fn with_padding(mut self, padding: DomainPadding) -> Self {
        self.padding = padding;
        self
    }
}

/// Merges every range bound to `axis` and applies the padding rules.
///
/// The result does not depend on the order of `ranges`.
pub fn compute_domain(
    ranges: &[ContentRange],
    axis: AxisId,
    rules: DomainRules,
) -> GraphResult<Domain> {
    let mut merged: Option<Domain> = None;
    let mut zero_baseline = false;
    for range in ranges.iter().filter(|range| range.axis == axis) {
        let domain = Domain::new(range.min, range.max);
        merged = Some(merged.map_or(domain, |current| current.union(domain)));
        zero_baseline |= range.zero_baseline;
    }

    let Some(mut merged) = merged else {
        return Err(GraphError::usage(
            ErrorKind::NoContentLoaded,
            format!("no loaded content contributes to axis `{}`", axis.as_str()),
        ));
    };

    if zero_baseline {
        merged = merged.union(Domain::new(0.0, 0.0));
    }

    let padded = pad_domain(merged, rules.padding, zero_baseline);
    let domain = if rules.round {
        Domain::new(
            round_to_hundredths(padded.lower_limit),
            round_to_hundredths(padded.upper_limit),
        )
    } else {
        padded
    };
    trace!(
        axis = axis.as_str(),
        lower = domain.lower_limit,
        upper = domain.upper_limit,
        "computed domain"
    );
    Ok(domain)
}

/// Widens `domain` on both sides. With `keep_zero_edge`, a bound sitting on
/// zero stays on zero so bars start at the axis baseline.
#[must_use]
pub fn pad_domain(domain: Domain, padding: DomainPadding, keep_zero_edge: bool) -> Domain {
    let amount = padding.amount(domain.span());
    let lower = if keep_zero_edge && domain.lower_limit == 0.0 {
        0.0
    } else {
        domain.lower_limit - amount
    };
    let upper = if keep_zero_edge && domain.upper_limit == 0.0 {
        0.0
    } else {
        domain.upper_limit + amount
    };
    Domain::new(lower, upper)
}

/// Whether replacing `current` with `candidate` changes the axis.
///
/// A new series whose range sits inside the existing one yields an
/// identical candidate, and the caller can skip retranslating axes.
#[must_use]
pub fn is_range_modified(current: Domain, candidate: Domain) -> bool {
    const EPSILON: f64 = 1e-9;
    (current.lower_limit - candidate.lower_limit).abs() > EPSILON
        || (current.upper_limit - candidate.upper_limit).abs() > EPSILON
}

/// Ordered, de-duplicated category list for an ordinal axis.
pub fn ordinal_domain<'a>(keys: impl IntoIterator<Item = &'a str>) -> GraphResult<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for key in keys {
        if key.is_empty() {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                "ordinal axis categories must not be empty strings",
            ));
        }
        if !out.iter().any(|existing| existing == key) {
            out.push(key.to_owned());
        }
    }
    if out.is_empty() {
        return Err(GraphError::config(
            ErrorKind::InvalidInput,
            "ordinal axis requires at least one category",
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{
        ContentRange, DomainPadding, DomainRules, compute_domain, is_range_modified,
        ordinal_domain, pad_domain,
    };
    use crate::core::{AxisId, Domain};
    use crate::error::ErrorKind;

    fn range(axis: AxisId, min: f64, max: f64) -> ContentRange {
        ContentRange {
            axis,
            min,
            max,
            zero_baseline: false,
        }
    }

    #[test]
    fn pads_five_percent_of_data_range() {
        let domain = compute_domain(
            &[range(AxisId::Y, 10.0, 90.0)],
            AxisId::Y,
            DomainRules::numeric(),
        )
        .unwrap();
        assert_eq!(domain, Domain::new(6.0, 94.0));
    }

    #[test]
    fn ignores_ranges_bound_to_other_axis() {
        let ranges = [range(AxisId::Y, 0.0, 10.0), range(AxisId::Y2, -500.0, 500.0)];
        let domain = compute_domain(&ranges, AxisId::Y, DomainRules::numeric()).unwrap();
        assert_eq!(domain, Domain::new(-0.5, 10.5));
    }

    #[test]
    fn empty_axis_reports_no_content() {
        let err = compute_domain(&[], AxisId::Y, DomainRules::numeric()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoContentLoaded);
    }

    #[test]
    fn zero_baseline_pulls_domain_to_zero_without_padding_below() {
        let bars = range(AxisId::Y, 20.0, 80.0).with_zero_baseline(true);
        let domain = compute_domain(&[bars], AxisId::Y, DomainRules::numeric()).unwrap();
        assert_eq!(domain, Domain::new(0.0, 84.0));
    }

    #[test]
    fn single_value_stays_degenerate() {
        let domain = compute_domain(
            &[range(AxisId::Y, 7.0, 7.0)],
            AxisId::Y,
            DomainRules::numeric(),
        )
        .unwrap();
        assert!(domain.is_degenerate());
    }

    #[test]
    fn time_rules_keep_exact_bounds() {
        let domain = compute_domain(
            &[range(AxisId::Y, 0.001, 0.009)],
            AxisId::Y,
            DomainRules::time(),
        )
        .unwrap();
        assert_eq!(domain, Domain::new(0.001, 0.009));
    }

    #[test]
    fn pixel_padding_scales_with_extent() {
        let padded = pad_domain(
            Domain::new(0.0, 100.0),
            DomainPadding::Pixels {
                pixels: 10.0,
                extent_px: 120.0,
            },
            false,
        );
        assert_eq!(padded, Domain::new(-10.0, 110.0));
    }

    #[test]
    fn subset_range_is_not_a_modification() {
        let wide = compute_domain(
            &[range(AxisId::Y, 0.0, 100.0)],
            AxisId::Y,
            DomainRules::numeric(),
        )
        .unwrap();
        let with_subset = compute_domain(
            &[range(AxisId::Y, 0.0, 100.0), range(AxisId::Y, 20.0, 30.0)],
            AxisId::Y,
            DomainRules::numeric(),
        )
        .unwrap();
        assert!(!is_range_modified(wide, with_subset));
    }

    #[test]
    fn ordinal_domain_dedupes_in_order() {
        let keys = ordinal_domain(["b", "a", "b", "c"]).unwrap();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert!(ordinal_domain(Vec::<&str>::new()).is_err());
    }
}
