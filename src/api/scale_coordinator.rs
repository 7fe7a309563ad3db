use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::round_to_hundredths;
use crate::core::{
    AxisId, AxisScale, BandScale, ContentRange, Domain, DomainPadding, DomainRules, LinearScale,
    ScaleSet, compute_domain, is_range_modified, pad_domain,
};
use crate::error::{ErrorKind, GraphError, GraphResult};

use super::canvas_layout::CanvasLayout;
use super::validation::{GraphSettings, ResolvedAxis};

pub(crate) const BAR_GROUP_MIN_WIDTH: f64 = 4.0;
pub(crate) const BAR_GROUP_MAX_WIDTH: f64 = 48.0;

/// Current domain of every axis. `x` is `None` for ordinal axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomains {
    pub x: Option<Domain>,
    pub y: Domain,
    pub y2: Option<Domain>,
}

impl AxisDomains {
    #[must_use]
    pub fn get(&self, axis: AxisId) -> Option<Domain> {
        match axis {
            AxisId::X => self.x,
            AxisId::Y => Some(self.y),
            AxisId::Y2 => self.y2,
        }
    }

    /// Axes whose domain differs between `self` and `candidate`.
    #[must_use]
    pub fn modified_axes(&self, candidate: &Self) -> Vec<AxisId> {
        [AxisId::X, AxisId::Y, AxisId::Y2]
            .into_iter()
            .filter(|axis| match (self.get(*axis), candidate.get(*axis)) {
                (Some(current), Some(next)) => is_range_modified(current, next),
                (None, None) => false,
                _ => true,
            })
            .collect()
    }
}

/// Horizontal slots shared by every loaded bar content.
///
/// Each bar content owns one slot inside a group centred on its x value,
/// in load order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BarLayout {
    pub group_width: f64,
    slots: Vec<String>,
}

impl BarLayout {
    pub(crate) fn compute(
        bar_keys: Vec<String>,
        max_points: usize,
        plot_width: f64,
        band_width: Option<f64>,
    ) -> Self {
        if bar_keys.is_empty() {
            return Self::default();
        }
        let group_width = band_width.unwrap_or_else(|| {
            (plot_width / (max_points as f64 + 1.0)).clamp(BAR_GROUP_MIN_WIDTH, BAR_GROUP_MAX_WIDTH)
        });
        Self {
            group_width,
            slots: bar_keys,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn bar_width(&self) -> f64 {
        self.group_width / self.slots.len().max(1) as f64
    }

    /// Offset of the slot's left edge from the group centre.
    #[must_use]
    pub fn slot_offset(&self, key: &str) -> Option<f64> {
        let index = self.slots.iter().position(|slot| slot == key)?;
        Some(-self.group_width / 2.0 + index as f64 * self.bar_width())
    }
}

/// Merges content ranges into the vertical axis domains.
///
/// The x domain is the configured one, widened by half a bar group when bars
/// are loaded. A vertical axis with no contributing content, or with
/// calibration disabled, keeps its configured domain.
pub(crate) fn resolve_domains(
    settings: &GraphSettings,
    ranges: &[ContentRange],
    bars: &BarLayout,
    layout: &CanvasLayout,
) -> GraphResult<AxisDomains> {
    let x = settings.x.configured.map(|configured| {
        if bars.is_empty() {
            return configured;
        }
        let padding = DomainPadding::Pixels {
            pixels: bars.group_width / 2.0,
            extent_px: layout.plot.width(),
        };
        let padded = pad_domain(configured, padding, false);
        if settings.x.is_time() {
            padded
        } else {
            Domain::new(
                round_to_hundredths(padded.lower_limit),
                round_to_hundredths(padded.upper_limit),
            )
        }
    });
    let y = resolve_axis(&settings.y, ranges, DomainRules::numeric())?.ok_or_else(|| {
        GraphError::config(ErrorKind::InvalidAxisType, "y axis must be continuous")
    })?;
    let y2 = match &settings.y2 {
        Some(axis) => resolve_axis(axis, ranges, DomainRules::numeric())?,
        None => None,
    };
    Ok(AxisDomains { x, y, y2 })
}

fn resolve_axis(
    axis: &ResolvedAxis,
    ranges: &[ContentRange],
    rules: DomainRules,
) -> GraphResult<Option<Domain>> {
    let Some(configured) = axis.configured else {
        return Ok(None);
    };
    if !axis.allow_calibration {
        return Ok(Some(configured));
    }
    match compute_domain(ranges, axis.id, rules) {
        Ok(domain) => Ok(Some(domain)),
        Err(err) if err.kind() == ErrorKind::NoContentLoaded => {
            debug!(axis = axis.id.as_str(), "no content on axis, using configured domain");
            Ok(Some(configured))
        }
        Err(err) => Err(err),
    }
}

/// Band width of an ordinal x axis for the given layout.
pub(crate) fn ordinal_band_width(settings: &GraphSettings, layout: &CanvasLayout) -> Option<f64> {
    settings
        .x
        .configured
        .is_none()
        .then(|| BandScale::new(settings.x.categories.clone(), layout.x_range()).bandwidth())
}

/// Builds the one `ScaleSet` of the graph from scratch.
pub(crate) fn build_scales(
    settings: &GraphSettings,
    domains: &AxisDomains,
    layout: &CanvasLayout,
) -> GraphResult<ScaleSet> {
    let x = match domains.x {
        Some(domain) => AxisScale::Linear(LinearScale::new(domain, layout.x_range())?),
        None => AxisScale::Band(BandScale::new(
            settings.x.categories.clone(),
            layout.x_range(),
        )),
    };
    Ok(ScaleSet {
        x,
        y: LinearScale::new(domains.y, layout.y_range())?,
        y2: domains
            .y2
            .map(|domain| LinearScale::new(domain, layout.y_range()))
            .transpose()?,
    })
}
