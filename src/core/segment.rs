use serde::{Deserialize, Serialize};

use crate::core::scale::LaneScale;
use crate::render::{Paint, PathPrimitive};

/// Absolute pixel geometry of one rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentGeometry {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub has_straight_run: bool,
    pub corner_radius: f64,
}

impl SegmentGeometry {
    /// Places a block of `duration` units in `lane`, starting at `start_x`.
    ///
    /// Blocks narrower than two corner radii drop their horizontal straight
    /// runs and shrink the radius to half their width, so the outline
    /// degenerates to a lens instead of self-intersecting. The radius also
    /// insets the block vertically inside its lane.
    #[must_use]
    pub fn place(start_x: f64, duration: f64, lane: usize, scale: LaneScale) -> Self {
        let width = duration * scale.x_scale;
        let end_x = start_x + width;
        let has_straight_run = width > 2.0 * scale.effective_corner_radius;
        let corner_radius = if has_straight_run {
            scale.effective_corner_radius
        } else {
            width / 2.0
        };
        let start_y = scale.lane_top(lane) + corner_radius;
        let end_y = start_y + scale.y_scale - 2.0 * corner_radius;

        Self {
            start_x,
            start_y,
            end_x,
            end_y,
            has_straight_run,
            corner_radius,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.end_x - self.start_x
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.end_y - self.start_y
    }

    /// Half-open containment: the right and bottom edges are outside.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.start_x
            && x < self.start_x + self.width()
            && y >= self.start_y
            && y < self.start_y + self.height()
    }

    /// Builds the rounded outline.
    ///
    /// Order: left edge, bottom-left corner, bottom run, bottom-right corner,
    /// right edge, top-right corner, top run, top-left corner. The horizontal
    /// runs are only emitted when `has_straight_run` holds.
    #[must_use]
    pub fn outline(self, paint: Paint, stroke_width: f64) -> PathPrimitive {
        let Self {
            start_x: left,
            start_y: top,
            end_x: right,
            end_y: bottom,
            corner_radius: radius,
            ..
        } = self;

        let mut path = PathPrimitive::new(paint, stroke_width);
        path.move_to(left, top + radius);
        path.line_to(left, bottom - radius);
        path.quad_to(left, bottom, left + radius, bottom);
        if self.has_straight_run {
            path.line_to(right - radius, bottom);
        }
        path.quad_to(right, bottom, right, bottom - radius);
        path.line_to(right, top + radius);
        path.quad_to(right, top, right - radius, top);
        if self.has_straight_run {
            path.line_to(left + radius, top);
        }
        path.quad_to(left, top, left, top + radius);
        path.close();
        path
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::SegmentGeometry;
    use crate::core::{LaneScale, Viewport};
    use crate::render::{Color, Paint};

    fn scale(corner_radius: f64) -> LaneScale {
        // x_scale = 1, y_scale = 60
        LaneScale::new(Viewport::new(100, 240), (0.0, 100.0), 4, 0.0, 0.0, corner_radius)
            .expect("valid scale")
    }

    #[test]
    fn wide_block_keeps_effective_radius() {
        let geometry = SegmentGeometry::place(10.0, 40.0, 1, scale(12.0));
        assert!(geometry.has_straight_run);
        assert_relative_eq!(geometry.corner_radius, 12.0);
        assert_relative_eq!(geometry.start_y, 72.0);
        assert_relative_eq!(geometry.end_y, 108.0);
        assert_relative_eq!(geometry.width(), 40.0);
    }

    #[test]
    fn narrow_block_shrinks_radius_to_half_width() {
        let geometry = SegmentGeometry::place(0.0, 6.0, 0, scale(12.0));
        assert!(!geometry.has_straight_run);
        assert_relative_eq!(geometry.corner_radius, 3.0);
        assert_relative_eq!(geometry.start_y, 3.0);
        assert_relative_eq!(geometry.end_y, 57.0);
    }

    #[test]
    fn block_exactly_two_radii_wide_has_no_straight_run() {
        let geometry = SegmentGeometry::place(0.0, 24.0, 0, scale(12.0));
        assert!(!geometry.has_straight_run);
        assert_relative_eq!(geometry.corner_radius, 12.0);
    }

    #[test]
    fn zero_duration_collapses_to_zero_area() {
        let geometry = SegmentGeometry::place(5.0, 0.0, 2, scale(12.0));
        assert_relative_eq!(geometry.width(), 0.0);
        assert_relative_eq!(geometry.corner_radius, 0.0);
        assert!(!geometry.contains(5.0, geometry.start_y + 1.0));
    }

    #[test]
    fn containment_excludes_right_and_bottom_edges() {
        let geometry = SegmentGeometry::place(10.0, 40.0, 1, scale(12.0));
        assert!(geometry.contains(10.0, 72.0));
        assert!(geometry.contains(49.999, 107.999));
        assert!(!geometry.contains(50.0, 80.0));
        assert!(!geometry.contains(20.0, 108.0));
        assert!(!geometry.contains(9.999, 80.0));
    }

    #[test]
    fn outline_omits_straight_runs_for_lens_blocks() {
        let paint = Paint::Solid(Color::rgb(0.2, 0.4, 0.6));
        let wide = SegmentGeometry::place(0.0, 40.0, 0, scale(12.0)).outline(paint, 1.0);
        let lens = SegmentGeometry::place(0.0, 6.0, 0, scale(12.0)).outline(paint, 1.0);

        assert_eq!(wide.quad_count(), 4);
        assert_eq!(lens.quad_count(), 4);
        assert_eq!(wide.line_count(), 4);
        assert_eq!(lens.line_count(), 2);
        assert!(wide.validate().is_ok());
        assert!(lens.validate().is_ok());
    }
}
