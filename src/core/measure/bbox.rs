//! Pixel extents of a region.

use super::MeasuredView;

/// Reduces a point set to (shorter, longer) axis-aligned extents
pub struct BoundingBoxEstimator;

impl BoundingBoxEstimator {
    /// Fewer points than this cannot describe an outline
    pub const MIN_POINTS: usize = 3;

    /// Extents of `points` as `(min(dx, dy), max(dx, dy))`.
    ///
    /// Returns [`MeasuredView::NONE`] for fewer than three points.
    pub fn estimate(points: &[(u32, u32)]) -> MeasuredView {
        if points.len() < Self::MIN_POINTS {
            return MeasuredView::NONE;
        }

        let mut min_x = u32::MAX;
        let mut max_x = 0;
        let mut min_y = u32::MAX;
        let mut max_y = 0;
        for &(x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let dx = (max_x - min_x) as f64;
        let dy = (max_y - min_y) as f64;
        MeasuredView::new(dx.min(dy), dx.max(dy))
    }
}
