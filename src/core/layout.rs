use serde::{Deserialize, Serialize};

use crate::core::connector::ConnectorGeometry;
use crate::core::scale::LaneScale;
use crate::core::segment::SegmentGeometry;
use crate::core::types::Interval;

/// One block placed by the layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedSegment {
    pub interval_index: usize,
    pub lane: usize,
    pub value: f64,
    pub geometry: SegmentGeometry,
}

/// Paint-ordered output of the layout pass.
///
/// Each connector directly follows the segment it leads into, so it is
/// painted above both blocks it joins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LayoutStep {
    Segment(PlacedSegment),
    Connector(ConnectorGeometry),
}

#[derive(Debug, Clone, Copy)]
struct Carry {
    end_x: f64,
    lane: usize,
    radius: f64,
}

/// Folds the interval sequence into absolutely positioned blocks and the
/// connectors between lane changes.
///
/// Intervals are expected to be validated against the lane count already.
#[must_use]
pub fn layout_intervals(
    intervals: &[Interval],
    scale: LaneScale,
    axis_inset_left: f64,
    connector_width: f64,
) -> Vec<LayoutStep> {
    let mut steps = Vec::with_capacity(intervals.len() * 2);
    let mut carry: Option<Carry> = None;

    for (interval_index, interval) in intervals.iter().enumerate() {
        let start_x = carry.map_or(axis_inset_left, |previous| previous.end_x);
        let geometry = SegmentGeometry::place(start_x, interval.duration, interval.type_index, scale);

        steps.push(LayoutStep::Segment(PlacedSegment {
            interval_index,
            lane: interval.type_index,
            value: interval.duration,
            geometry,
        }));

        if let Some(previous) = carry {
            if let Some(connector) = ConnectorGeometry::between(
                previous.lane,
                previous.radius,
                interval.type_index,
                geometry,
                scale,
                connector_width,
            ) {
                steps.push(LayoutStep::Connector(connector));
            }
        }

        carry = Some(Carry {
            end_x: geometry.end_x,
            lane: interval.type_index,
            radius: geometry.corner_radius,
        });
    }

    steps
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{LayoutStep, layout_intervals};
    use crate::core::{Interval, LaneScale, Viewport};

    fn scale() -> LaneScale {
        LaneScale::new(Viewport::new(860, 220), (0.0, 800.0), 4, 60.0, 20.0, 10.0)
            .expect("valid scale")
    }

    fn counts(steps: &[LayoutStep]) -> (usize, usize) {
        steps.iter().fold((0, 0), |(segments, connectors), step| match step {
            LayoutStep::Segment(_) => (segments + 1, connectors),
            LayoutStep::Connector(_) => (segments, connectors + 1),
        })
    }

    #[test]
    fn empty_sequence_produces_no_steps() {
        assert!(layout_intervals(&[], scale(), 60.0, 2.0).is_empty());
    }

    #[test]
    fn single_interval_never_has_connector() {
        let steps = layout_intervals(&[Interval::new(100.0, 2)], scale(), 60.0, 2.0);
        assert_eq!(counts(&steps), (1, 0));
    }

    #[test]
    fn connectors_only_between_lane_changes() {
        let intervals = [
            Interval::new(10.0, 0),
            Interval::new(10.0, 0),
            Interval::new(10.0, 2),
            Interval::new(10.0, 1),
            Interval::new(10.0, 1),
        ];
        let steps = layout_intervals(&intervals, scale(), 60.0, 2.0);
        assert_eq!(counts(&steps), (5, 2));
        assert!(matches!(steps[3], LayoutStep::Connector(c) if c.from_lane == 0 && c.to_lane == 2));
        assert!(matches!(steps[5], LayoutStep::Connector(c) if c.from_lane == 2 && c.to_lane == 1));
    }

    #[test]
    fn blocks_are_contiguous_from_axis_inset() {
        let intervals = [Interval::new(120.0, 0), Interval::new(80.0, 1)];
        let steps = layout_intervals(&intervals, scale(), 60.0, 2.0);
        let segments: Vec<_> = steps
            .iter()
            .filter_map(|step| match step {
                LayoutStep::Segment(segment) => Some(segment.geometry),
                LayoutStep::Connector(_) => None,
            })
            .collect();
        assert_relative_eq!(segments[0].start_x, 60.0);
        assert_relative_eq!(segments[0].end_x, 180.0);
        assert_relative_eq!(segments[1].start_x, segments[0].end_x);
        assert_relative_eq!(segments[1].end_x, 260.0);
    }
}
