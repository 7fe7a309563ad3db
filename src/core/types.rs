use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, GraphError, GraphResult};

/// Axis slot on the canvas. The X domain is shared by every content; each
/// content binds its values to exactly one of `Y` or `Y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    X,
    Y,
    Y2,
}

impl AxisId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Y2 => "y2",
        }
    }

    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Y | Self::Y2)
    }

    pub fn parse(value: &str) -> GraphResult<Self> {
        match value {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "y2" => Ok(Self::Y2),
            other => Err(GraphError::config(
                ErrorKind::InvalidAxisReference,
                format!("unknown axis `{other}`"),
            )),
        }
    }
}

/// Value space of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisType {
    /// Epoch milliseconds; inputs are RFC 3339 strings or numbers.
    TimeSeries,
    #[default]
    Numeric,
    /// Categorical; the domain is an explicit ordered key list.
    Ordinal,
}

/// Logical interval spanned by a continuous axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub lower_limit: f64,
    pub upper_limit: f64,
}

impl Domain {
    #[must_use]
    pub const fn new(lower_limit: f64, upper_limit: f64) -> Self {
        Self {
            lower_limit,
            upper_limit,
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.upper_limit - self.lower_limit
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.span() == 0.0
    }

    #[must_use]
    pub fn crosses_zero(self) -> bool {
        self.lower_limit < 0.0 && self.upper_limit > 0.0
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.lower_limit && value <= self.upper_limit
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            lower_limit: self.lower_limit.min(other.lower_limit),
            upper_limit: self.upper_limit.max(other.upper_limit),
        }
    }

    pub fn validate(self, axis: AxisId) -> GraphResult<Self> {
        if !self.lower_limit.is_finite() || !self.upper_limit.is_finite() {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                format!("axis `{}` domain must be finite", axis.as_str()),
            ));
        }
        if self.lower_limit > self.upper_limit {
            return Err(GraphError::config(
                ErrorKind::InvalidInput,
                format!(
                    "axis `{}` lower limit {} exceeds upper limit {}",
                    axis.as_str(),
                    self.lower_limit,
                    self.upper_limit
                ),
            ));
        }
        Ok(self)
    }
}

/// Typed visibility state, projected to `aria-hidden` at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    #[must_use]
    pub const fn from_hidden(hidden: bool) -> Self {
        if hidden { Self::Hidden } else { Self::Visible }
    }

    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    #[must_use]
    pub const fn aria_hidden(self) -> &'static str {
        if self.is_hidden() { "true" } else { "false" }
    }
}

/// Outer spacing between the container and the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 50.0,
            bottom: 5.0,
            left: 30.0,
        }
    }
}

impl Padding {
    pub fn validate(self) -> GraphResult<Self> {
        for (name, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::config(
                    ErrorKind::InvalidInput,
                    format!("padding `{name}` must be finite and >= 0"),
                ));
            }
        }
        Ok(self)
    }
}

/// Resolved X coordinate of one data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XCoord {
    /// Number or epoch milliseconds.
    Continuous(f64),
    Category(String),
}

impl XCoord {
    #[must_use]
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Self::Continuous(value) => Some(*value),
            Self::Category(_) => None,
        }
    }
}

/// Render-ready data point, resolved during content `load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub key: String,
    pub index: usize,
    pub x: XCoord,
    pub y: f64,
    pub color: String,
    pub shape: crate::core::Shape,
}
