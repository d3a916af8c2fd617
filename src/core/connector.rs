use serde::{Deserialize, Serialize};

use crate::core::scale::LaneScale;
use crate::core::segment::SegmentGeometry;
use crate::render::{Color, Paint, PathPrimitive};

/// Gradient bridge between two adjacent blocks in different lanes.
///
/// The bridge is a vertical band of `band_width` centered on the shared
/// boundary `x`, running from the previous block's edge (`from_y`) to the
/// current block's edge (`to_y`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorGeometry {
    pub x: f64,
    pub from_y: f64,
    pub to_y: f64,
    pub from_radius: f64,
    pub to_radius: f64,
    pub band_width: f64,
    pub from_lane: usize,
    pub to_lane: usize,
}

impl ConnectorGeometry {
    /// Returns `None` when both blocks share a lane.
    #[must_use]
    pub fn between(
        previous_lane: usize,
        previous_radius: f64,
        current_lane: usize,
        current: SegmentGeometry,
        scale: LaneScale,
        band_width: f64,
    ) -> Option<Self> {
        if previous_lane == current_lane {
            return None;
        }

        // Moving to a smaller lane index goes up the surface.
        let upward = previous_lane > current_lane;
        let from_y = if upward {
            scale.lane_top(previous_lane) + previous_radius
        } else {
            scale.lane_top(previous_lane + 1) - previous_radius
        };
        let to_y = if upward {
            current.end_y
        } else {
            current.start_y
        };

        Some(Self {
            x: current.start_x,
            from_y,
            to_y,
            from_radius: previous_radius,
            to_radius: current.corner_radius,
            band_width,
            from_lane: previous_lane,
            to_lane: current_lane,
        })
    }

    #[must_use]
    pub fn is_upward(self) -> bool {
        self.from_lane > self.to_lane
    }

    /// Builds the bridge outline with two quadratic curves per end.
    ///
    /// At each end one curve flares out under the adjacent block's rounded
    /// corner and the other tucks back to the corner tip at `x`, so the
    /// bridge fills the notch left by the rounding instead of crossing it.
    #[must_use]
    pub fn outline(self, from_color: Color, to_color: Color, stroke_width: f64) -> PathPrimitive {
        let step = if self.is_upward() { -1.0 } else { 1.0 };
        let half = self.band_width / 2.0;
        let (band_left, band_right) = (self.x - half, self.x + half);
        let (from_y, to_y) = (self.from_y, self.to_y);
        let (from_r, to_r) = (self.from_radius, self.to_radius);

        let paint = Paint::LinearGradient {
            x0: self.x,
            y0: from_y,
            x1: self.x,
            y1: to_y,
            from: from_color,
            to: to_color,
        };

        let mut path = PathPrimitive::new(paint, stroke_width);
        path.move_to(self.x - from_r, from_y);
        path.quad_to(band_left, from_y, band_left, from_y + step * from_r);
        path.line_to(band_left, to_y - step * to_r);
        path.quad_to(band_left, to_y, self.x, to_y);
        path.line_to(self.x + to_r, to_y);
        path.quad_to(band_right, to_y, band_right, to_y - step * to_r);
        path.line_to(band_right, from_y + step * from_r);
        path.quad_to(band_right, from_y, self.x, from_y);
        path.close();
        path
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::ConnectorGeometry;
    use crate::core::{LaneScale, SegmentGeometry, Viewport};
    use crate::render::{Color, Paint};

    fn scale() -> LaneScale {
        // x_scale = 1, y_scale = 60, effective radius 10
        LaneScale::new(Viewport::new(100, 240), (0.0, 100.0), 4, 0.0, 0.0, 10.0)
            .expect("valid scale")
    }

    #[test]
    fn same_lane_has_no_connector() {
        let current = SegmentGeometry::place(40.0, 20.0, 2, scale());
        assert!(ConnectorGeometry::between(2, 10.0, 2, current, scale(), 2.0).is_none());
    }

    #[test]
    fn downward_connector_runs_from_bottom_edge_to_top_edge() {
        let current = SegmentGeometry::place(40.0, 20.0, 2, scale());
        let connector =
            ConnectorGeometry::between(0, 10.0, 2, current, scale(), 2.0).expect("connector");
        assert!(!connector.is_upward());
        assert_relative_eq!(connector.from_y, 50.0);
        assert_relative_eq!(connector.to_y, current.start_y);
        assert_relative_eq!(connector.to_y, 130.0);
        assert_relative_eq!(connector.x, 40.0);
    }

    #[test]
    fn upward_connector_runs_from_top_edge_to_bottom_edge() {
        let current = SegmentGeometry::place(40.0, 20.0, 1, scale());
        let connector =
            ConnectorGeometry::between(3, 4.0, 1, current, scale(), 2.0).expect("connector");
        assert!(connector.is_upward());
        assert_relative_eq!(connector.from_y, 184.0);
        assert_relative_eq!(connector.to_y, current.end_y);
        assert_relative_eq!(connector.to_y, 110.0);
    }

    #[test]
    fn outline_uses_gradient_between_lane_colors() {
        let current = SegmentGeometry::place(40.0, 20.0, 2, scale());
        let connector =
            ConnectorGeometry::between(0, 10.0, 2, current, scale(), 2.0).expect("connector");
        let from = Color::rgb(1.0, 0.0, 0.0);
        let to = Color::rgb(0.0, 0.0, 1.0);
        let path = connector.outline(from, to, 1.0);

        assert_eq!(path.quad_count(), 4);
        assert!(path.validate().is_ok());
        match path.paint {
            Paint::LinearGradient {
                y0,
                y1,
                from: start,
                to: end,
                ..
            } => {
                assert_relative_eq!(y0, 50.0);
                assert_relative_eq!(y1, 130.0);
                assert_eq!(start, from);
                assert_eq!(end, to);
            }
            Paint::Solid(_) => panic!("connector must use a gradient"),
        }
    }
}
