//! Piecewise-linear keyframe curves.
//!
//! ## Usage
//!
//! Map a progress value onto a presentation value (opacity, slide offset,
//! line fill), or remap one progress value onto another.
//!
//! ```
//! use vitrine_components::keyframes::Keyframes;
//!
//! let fade = Keyframes::linear((0.1, 0.4), (0.0, 1.0)).unwrap();
//! assert_eq!(fade.sample(0.0), 0.0);
//! assert_eq!(fade.sample(0.4), 1.0);
//!
//! // Finish drawing a line slightly before the end of the scroll window.
//! let remap = Keyframes::new([(0.0, 0.0), (0.85, 0.85), (0.9, 1.0)]).unwrap();
//! assert!((remap.sample(0.875) - 0.925).abs() < 1e-5);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;

/// An ordered set of `(input, output)` breakpoints with linear segments in
/// between.
///
/// Inputs are strictly increasing. Sampling clamps the input to the first
/// and last breakpoint, so a curve never extrapolates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")]
pub struct Keyframes {
    points: SmallVec<[(f32, f32); 4]>,
}

impl Keyframes {
    /// Builds a curve from breakpoints.
    pub fn new(points: impl IntoIterator<Item = (f32, f32)>) -> Result<Self, ConfigError> {
        let points: SmallVec<[(f32, f32); 4]> = points.into_iter().collect();
        if points.len() < 2 {
            return Err(ConfigError::TooFewKeyframes {
                count: points.len(),
            });
        }
        for (index, &(input, output)) in points.iter().enumerate() {
            if !input.is_finite() || !output.is_finite() {
                return Err(ConfigError::NonFiniteKeyframe { index });
            }
        }
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(ConfigError::UnorderedKeyframes {
                    index: index + 1,
                    previous: pair[0].0,
                    current: pair[1].0,
                });
            }
        }
        Ok(Self { points })
    }

    /// A single segment from `input.0 → output.0` to `input.1 → output.1`.
    pub fn linear(input: (f32, f32), output: (f32, f32)) -> Result<Self, ConfigError> {
        Self::new([(input.0, output.0), (input.1, output.1)])
    }

    /// `0 → 0`, `1 → 1`.
    pub fn identity() -> Self {
        Self {
            points: SmallVec::from_slice(&[(0.0, 0.0), (1.0, 1.0)]),
        }
    }

    /// The breakpoints, in input order.
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Input range covered by the curve.
    pub fn input_range(&self) -> (f32, f32) {
        (self.first().0, self.last().0)
    }

    /// Output at the first and last breakpoint.
    pub fn output_bounds(&self) -> (f32, f32) {
        (self.first().1, self.last().1)
    }

    /// Whether no segment has a negative slope.
    pub fn is_monotonic_non_decreasing(&self) -> bool {
        self.points.windows(2).all(|pair| pair[1].1 >= pair[0].1)
    }

    /// Evaluates the curve at `x`.
    ///
    /// Values outside the input range take the output of the nearest end
    /// point; breakpoints are hit exactly.
    pub fn sample(&self, x: f32) -> f32 {
        let first = self.first();
        let last = self.last();
        if x.is_nan() || x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }

        // First breakpoint strictly greater than x; x lies in the segment
        // ending there.
        let upper = self.points.partition_point(|&(input, _)| input <= x);
        let (x0, y0) = self.points[upper - 1];
        let (x1, y1) = self.points[upper];
        if x == x0 {
            return y0;
        }
        let t = (x - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }

    fn first(&self) -> (f32, f32) {
        self.points[0]
    }

    fn last(&self) -> (f32, f32) {
        self.points[self.points.len() - 1]
    }
}

impl Default for Keyframes {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<Vec<(f32, f32)>> for Keyframes {
    type Error = ConfigError;

    fn try_from(points: Vec<(f32, f32)>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Keyframes> for Vec<(f32, f32)> {
    fn from(keyframes: Keyframes) -> Self {
        keyframes.points.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_points() {
        assert!(matches!(
            Keyframes::new([(0.0, 0.0)]),
            Err(ConfigError::TooFewKeyframes { count: 1 })
        ));
        assert!(matches!(
            Keyframes::new([(0.0, 0.0), (f32::NAN, 1.0)]),
            Err(ConfigError::NonFiniteKeyframe { index: 1 })
        ));
        assert!(matches!(
            Keyframes::new([(0.0, 0.0), (0.5, 1.0), (0.5, 2.0)]),
            Err(ConfigError::UnorderedKeyframes { index: 2, .. })
        ));
    }

    #[test]
    fn clamps_outside_input_range() {
        let offset = Keyframes::linear((0.1, 0.4), (100.0, 0.0)).unwrap();
        assert_eq!(offset.sample(-3.0), 100.0);
        assert_eq!(offset.sample(0.0), 100.0);
        assert_eq!(offset.sample(0.1), 100.0);
        assert_eq!(offset.sample(0.4), 0.0);
        assert_eq!(offset.sample(7.0), 0.0);
        assert_eq!(offset.sample(f32::NAN), 100.0);
    }

    #[test]
    fn interpolates_inside_segment() {
        let fade = Keyframes::linear((0.1, 0.4), (0.0, 1.0)).unwrap();
        assert!((fade.sample(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn breakpoints_are_exact() {
        let remap = Keyframes::new([(0.0, 0.0), (0.85, 0.85), (0.9, 1.0)]).unwrap();
        assert_eq!(remap.sample(0.85), 0.85);
        assert_eq!(remap.sample(0.9), 1.0);
        assert!((remap.sample(0.875) - 0.925).abs() < 1e-5);
        assert!((remap.sample(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(remap.sample(0.95), 1.0);
    }

    #[test]
    fn monotonic_segments_preserve_order() {
        let curves = [
            Keyframes::linear((0.1, 0.4), (0.0, 1.0)).unwrap(),
            Keyframes::new([(0.0, 0.0), (0.85, 0.85), (0.9, 1.0)]).unwrap(),
            Keyframes::identity(),
        ];
        for curve in &curves {
            assert!(curve.is_monotonic_non_decreasing());
            let mut previous = curve.sample(0.0);
            for step in 1..=1000 {
                let value = curve.sample(step as f32 / 1000.0);
                assert!(value >= previous, "{value} < {previous} at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn decreasing_curve_is_not_monotonic() {
        let offset = Keyframes::linear((0.1, 0.4), (100.0, 0.0)).unwrap();
        assert!(!offset.is_monotonic_non_decreasing());
        assert_eq!(offset.output_bounds(), (100.0, 0.0));
        assert_eq!(offset.input_range(), (0.1, 0.4));
    }

    #[test]
    fn deserializes_through_validation() {
        let curve: Keyframes = serde_json::from_str("[[0.0, 0.0], [0.9, 1.0]]").unwrap();
        assert_eq!(curve.points(), &[(0.0, 0.0), (0.9, 1.0)]);
        assert!(serde_json::from_str::<Keyframes>("[[0.5, 0.0], [0.1, 1.0]]").is_err());
        assert_eq!(serde_json::to_string(&curve).unwrap(), "[[0.0,0.0],[0.9,1.0]]");
    }
}
