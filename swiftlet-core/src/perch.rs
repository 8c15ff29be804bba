//! Landing-target discovery seam.
//!
//! The bird state machine never queries a page layout itself; it consumes
//! whatever candidate points a [`PerchSource`] reports at the time of the
//! tick. The web driver backs this with a DOM scan, tests and the headless
//! harness with a plain slice.

use crate::vec2::Vec2;

/// A provider of candidate landing points, valid as of the current tick.
pub trait PerchSource {
    fn candidates(&self) -> &[Vec2];

    /// The candidate nearest to `from` by Euclidean distance.
    fn nearest(&self, from: Vec2) -> Option<Vec2> {
        self.candidates()
            .iter()
            .copied()
            .min_by(|a, b| {
                from.distance_squared(a)
                    .partial_cmp(&from.distance_squared(b))
                    .unwrap_or(core::cmp::Ordering::Equal)
            })
    }
}

/// A perch source over a borrowed slice of points.
pub struct SlicePerchSource<'a>(pub &'a [Vec2]);

impl PerchSource for SlicePerchSource<'_> {
    fn candidates(&self) -> &[Vec2] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_picks_closest() {
        let points = [
            Vec2::new(100.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-50.0, 40.0),
        ];
        let source = SlicePerchSource(&points);
        assert_eq!(source.nearest(Vec2::zero()), Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_nearest_on_empty_source() {
        let source = SlicePerchSource(&[]);
        assert_eq!(source.nearest(Vec2::zero()), None);
    }
}
