use serde::{Deserialize, Serialize};

/// Marker glyph used for data points, legend swatches and label shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

impl Shape {
    /// Rotation used when a content does not pick a shape.
    pub const DEFAULT_ORDER: [Shape; 5] = [
        Shape::Circle,
        Shape::Triangle,
        Shape::Square,
        Shape::Diamond,
        Shape::Cross,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::Cross => "cross",
        }
    }

    #[must_use]
    pub fn nth_default(index: usize) -> Self {
        Self::DEFAULT_ORDER[index % Self::DEFAULT_ORDER.len()]
    }

    /// Closed polygon outline centred on the origin, `size` px across.
    ///
    /// `Circle` has no outline and is drawn as an SVG circle instead.
    #[must_use]
    pub fn outline(self, size: f64) -> Vec<(f64, f64)> {
        let h = size / 2.0;
        let t = size / 6.0;
        match self {
            Self::Circle => Vec::new(),
            Self::Square => vec![(-h, -h), (h, -h), (h, h), (-h, h)],
            Self::Triangle => vec![(0.0, -h), (h, h), (-h, h)],
            Self::Diamond => vec![(0.0, -h), (h, 0.0), (0.0, h), (-h, 0.0)],
            Self::Cross => vec![
                (-t, -h),
                (t, -h),
                (t, -t),
                (h, -t),
                (h, t),
                (t, t),
                (t, h),
                (-t, h),
                (-t, t),
                (-h, t),
                (-h, -t),
                (-t, -t),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Shape;

    #[test]
    fn default_rotation_wraps() {
        assert_eq!(Shape::nth_default(0), Shape::Circle);
        assert_eq!(Shape::nth_default(5), Shape::Circle);
        assert_eq!(Shape::nth_default(6), Shape::Triangle);
    }

    #[test]
    fn outlines_stay_inside_bounding_box() {
        for shape in Shape::DEFAULT_ORDER {
            for (x, y) in shape.outline(12.0) {
                assert!(x.abs() <= 6.0 && y.abs() <= 6.0, "{shape:?}");
            }
        }
    }
}
