use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Domain;

pub(crate) const AXIS_X_TARGET_SPACING_PX: f64 = 72.0;
pub(crate) const AXIS_Y_TARGET_SPACING_PX: f64 = 40.0;
pub(crate) const AXIS_MIN_TICKS: usize = 2;
pub(crate) const AXIS_MAX_TICKS: usize = 12;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

/// Calendar step ladder for default time-series ticks.
const TIME_STEPS_MS: [f64; 18] = [
    SECOND_MS,
    5.0 * SECOND_MS,
    15.0 * SECOND_MS,
    30.0 * SECOND_MS,
    MINUTE_MS,
    5.0 * MINUTE_MS,
    15.0 * MINUTE_MS,
    30.0 * MINUTE_MS,
    HOUR_MS,
    3.0 * HOUR_MS,
    6.0 * HOUR_MS,
    12.0 * HOUR_MS,
    DAY_MS,
    2.0 * DAY_MS,
    7.0 * DAY_MS,
    30.0 * DAY_MS,
    90.0 * DAY_MS,
    365.0 * DAY_MS,
];

/// Three-tier x-axis tick scheme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickBucket {
    pub lower_step_tick_values: Vec<f64>,
    pub midpoint_tick_values: Vec<f64>,
    pub upper_step_tick_values: Vec<f64>,
}

/// How an axis picks its tick values. The modes are disjoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum TickMode {
    #[default]
    Auto,
    Explicit(Vec<f64>),
    Bucket(TickBucket),
}

/// Weight class of a tick, which drives grid styling and labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickWeight {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub weight: TickWeight,
}

/// Ticks resolved for one axis at one canvas size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickSet {
    pub ticks: SmallVec<[Tick; 16]>,
}

impl TickSet {
    /// Values drawn on the axis itself. Midpoint ticks are left to the grid.
    pub fn labelled(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks
            .iter()
            .filter(|tick| tick.weight == TickWeight::Major)
            .map(|tick| tick.value)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|tick| tick.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

pub(crate) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Step from the 1-2-5 ladder closest to `span / count`.
pub(crate) fn nice_step(span: f64, count: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 || count == 0 {
        return 0.0;
    }
    let raw = span / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual >= 7.07 {
        10.0
    } else if residual >= 3.16 {
        5.0
    } else if residual >= 1.41 {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Multiples of `step` inside `domain`.
fn stepped_ticks(domain: Domain, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() {
        return vec![domain.lower_limit];
    }
    let first = (domain.lower_limit / step).ceil() as i64;
    let last = (domain.upper_limit / step).floor() as i64;
    (first..=last)
        .map(|index| {
            let value = index as f64 * step;
            // Snap away representation error such as 0.30000000000000004.
            (value / step).round() * step
        })
        .collect()
}

/// Evenly spaced "nice" numeric ticks.
pub(crate) fn nice_ticks(domain: Domain, count: usize) -> Vec<f64> {
    if domain.is_degenerate() {
        return vec![domain.lower_limit];
    }
    stepped_ticks(domain, nice_step(domain.span(), count))
}

/// Evenly spaced ticks on the calendar step ladder.
pub(crate) fn time_ticks(domain: Domain, count: usize) -> Vec<f64> {
    if domain.is_degenerate() || count == 0 {
        return vec![domain.lower_limit];
    }
    let target = domain.span() / count as f64;
    let step = TIME_STEPS_MS
        .iter()
        .copied()
        .find(|step| *step >= target)
        .unwrap_or(TIME_STEPS_MS[TIME_STEPS_MS.len() - 1]);
    stepped_ticks(domain, step)
}

/// Resolves the ticks of one continuous axis for the given pixel extent.
pub(crate) fn resolve_ticks(
    mode: &TickMode,
    domain: Domain,
    is_time: bool,
    extent_px: f64,
    target_spacing_px: f64,
) -> TickSet {
    let in_domain = |value: &f64| domain.contains(*value);
    let major = |value: f64| Tick {
        value,
        weight: TickWeight::Major,
    };
    let ticks = match mode {
        TickMode::Auto => {
            let count = axis_tick_target_count(
                extent_px,
                target_spacing_px,
                AXIS_MIN_TICKS,
                AXIS_MAX_TICKS,
            );
            let values = if is_time {
                time_ticks(domain, count)
            } else {
                nice_ticks(domain, count)
            };
            values.into_iter().map(major).collect()
        }
        TickMode::Explicit(values) => values.iter().copied().filter(in_domain).map(major).collect(),
        TickMode::Bucket(bucket) => {
            let mut ticks: Vec<Tick> = bucket
                .lower_step_tick_values
                .iter()
                .chain(&bucket.upper_step_tick_values)
                .copied()
                .filter(in_domain)
                .map(major)
                .chain(
                    bucket
                        .midpoint_tick_values
                        .iter()
                        .copied()
                        .filter(in_domain)
                        .map(|value| Tick {
                            value,
                            weight: TickWeight::Minor,
                        }),
                )
                .collect();
            ticks.sort_by(|left, right| left.value.total_cmp(&right.value));
            // A value present in two tiers keeps the heavier weight.
            ticks.dedup_by(|next, kept| {
                if next.value == kept.value {
                    if next.weight == TickWeight::Major {
                        kept.weight = TickWeight::Major;
                    }
                    true
                } else {
                    false
                }
            });
            ticks.into_iter().collect()
        }
    };
    TickSet { ticks }
}
