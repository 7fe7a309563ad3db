use serde::{Deserialize, Serialize};

use crate::core::{AxisId, Domain, XCoord};
use crate::error::{ErrorKind, GraphError, GraphResult};

/// Continuous domain → pixel mapping.
///
/// A degenerate domain (`lower == upper`) maps every value onto the middle
/// of the pixel range instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: Domain,
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Domain, range: (f64, f64)) -> GraphResult<Self> {
        if !domain.lower_limit.is_finite() || !domain.upper_limit.is_finite() {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                "scale domain must be finite",
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                "scale range must be finite",
            ));
        }
        Ok(Self { domain, range })
    }

    #[must_use]
    pub fn domain(self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain.span();
        if span == 0.0 {
            return (self.range.0 + self.range.1) / 2.0;
        }
        let normalized = (value - self.domain.lower_limit) / span;
        self.range.0 + normalized * (self.range.1 - self.range.0)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let extent = self.range.1 - self.range.0;
        if extent == 0.0 || self.domain.is_degenerate() {
            return self.domain.lower_limit;
        }
        let normalized = (pixel - self.range.0) / extent;
        self.domain.lower_limit + normalized * self.domain.span()
    }

    /// Pixel length of `units` domain units, always non-negative.
    #[must_use]
    pub fn magnitude(self, units: f64) -> f64 {
        let span = self.domain.span();
        if span == 0.0 {
            return 0.0;
        }
        (units / span * (self.range.1 - self.range.0)).abs()
    }
}

/// Ordinal keys → evenly sized bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    keys: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    pub const DEFAULT_PADDING: f64 = 0.2;

    #[must_use]
    pub fn new(keys: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            keys,
            range,
            padding_inner: Self::DEFAULT_PADDING,
            padding_outer: Self::DEFAULT_PADDING,
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        let slots =
            (self.keys.len() as f64 - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        (self.range.1 - self.range.0) / slots
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Leading edge of the band for `key`.
    #[must_use]
    pub fn band_start(&self, key: &str) -> Option<f64> {
        let index = self.keys.iter().position(|candidate| candidate == key)?;
        Some(self.range.0 + self.step() * (self.padding_outer + index as f64))
    }

    #[must_use]
    pub fn center(&self, key: &str) -> Option<f64> {
        self.band_start(key).map(|start| start + self.bandwidth() / 2.0)
    }
}

/// Scale used for the shared X axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisScale {
    Linear(LinearScale),
    Band(BandScale),
}

impl AxisScale {
    pub fn map(&self, coord: &XCoord) -> GraphResult<f64> {
        match (self, coord) {
            (Self::Linear(scale), XCoord::Continuous(value)) => Ok(scale.map(*value)),
            (Self::Band(scale), XCoord::Category(key)) => scale.center(key).ok_or_else(|| {
                GraphError::config(
                    ErrorKind::InvalidInput,
                    format!("category `{key}` is not part of the x axis domain"),
                )
            }),
            _ => Err(GraphError::config(
                ErrorKind::InvalidType,
                "x value does not match the x axis type",
            )),
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Band(scale) => scale.range(),
        }
    }

    #[must_use]
    pub fn as_linear(&self) -> Option<LinearScale> {
        match self {
            Self::Linear(scale) => Some(*scale),
            Self::Band(_) => None,
        }
    }
}

/// The one coordinate transform shared by every layer of a graph.
///
/// Rebuilt as a whole whenever a domain or the canvas geometry changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSet {
    pub x: AxisScale,
    pub y: LinearScale,
    pub y2: Option<LinearScale>,
}

impl ScaleSet {
    pub fn vertical(&self, axis: AxisId) -> GraphResult<LinearScale> {
        match axis {
            AxisId::Y => Ok(self.y),
            AxisId::Y2 => self.y2.ok_or_else(|| {
                GraphError::config(
                    ErrorKind::InvalidAxisReference,
                    "y2 axis is not enabled on this graph",
                )
            }),
            AxisId::X => Err(GraphError::config(
                ErrorKind::InvalidAxisReference,
                "x is not a vertical axis",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BandScale, LinearScale};
    use crate::core::Domain;

    #[test]
    fn degenerate_domain_maps_to_range_midpoint() {
        let scale = LinearScale::new(Domain::new(5.0, 5.0), (0.0, 200.0)).unwrap();
        assert_eq!(scale.map(5.0), 100.0);
        assert_eq!(scale.map(-40.0), 100.0);
        assert_eq!(scale.magnitude(3.0), 0.0);
    }

    #[test]
    fn inverted_range_maps_upper_limit_to_top() {
        let scale = LinearScale::new(Domain::new(0.0, 10.0), (300.0, 0.0)).unwrap();
        assert_eq!(scale.map(0.0), 300.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.invert(150.0), 5.0);
    }

    #[test]
    fn band_centers_are_evenly_spaced() {
        let scale = BandScale::new(vec!["a".into(), "b".into(), "c".into()], (0.0, 320.0));
        let a = scale.center("a").unwrap();
        let b = scale.center("b").unwrap();
        let c = scale.center("c").unwrap();
        assert!((b - a - (c - b)).abs() < 1e-9);
        assert!(a > 0.0 && c < 320.0);
        assert!(scale.center("missing").is_none());
    }
}
