use proptest::prelude::*;
use stage_chart::core::{Interval, LaneScale, LayoutStep, Viewport, layout_intervals};
use stage_chart::interaction::{PointerEvent, PointerThrottle};

fn interval_strategy() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec((0.0f64..120.0, 0usize..4), 0..40)
        .prop_map(|raw| raw.into_iter().map(Interval::from).collect())
}

proptest! {
    #[test]
    fn layout_blocks_are_contiguous_and_span_total_duration(
        intervals in interval_strategy(),
        width in 200u32..2_000,
        height in 80u32..800,
        radius in 0.0f64..40.0
    ) {
        let total: f64 = intervals.iter().map(|interval| interval.duration).sum();
        let x_max = total.max(1.0);
        let scale = LaneScale::new(Viewport::new(width, height), (0.0, x_max), 4, 60.0, 20.0, radius)
            .expect("valid scale");

        let steps = layout_intervals(&intervals, scale, 60.0, 2.0);
        let segments: Vec<_> = steps
            .iter()
            .filter_map(|step| match step {
                LayoutStep::Segment(placed) => Some(*placed),
                LayoutStep::Connector(_) => None,
            })
            .collect();
        let connector_count = steps.len() - segments.len();

        prop_assert_eq!(segments.len(), intervals.len());
        let lane_changes = intervals
            .windows(2)
            .filter(|pair| pair[0].type_index != pair[1].type_index)
            .count();
        prop_assert_eq!(connector_count, lane_changes);

        let mut cursor = 60.0;
        for placed in &segments {
            let geometry = placed.geometry;
            prop_assert!((geometry.start_x - cursor).abs() <= 1e-9);
            prop_assert!(geometry.corner_radius <= scale.effective_corner_radius + 1e-12);
            prop_assert!(geometry.start_y >= scale.lane_top(placed.lane) - 1e-9);
            prop_assert!(geometry.end_y <= scale.lane_top(placed.lane + 1) + 1e-9);
            cursor = geometry.end_x;
        }
        prop_assert!((cursor - (60.0 + total * scale.x_scale)).abs() <= 1e-6);
    }

    #[test]
    fn throttle_leading_dispatches_respect_window(
        gaps in prop::collection::vec(0.0f64..80.0, 1..60),
        window in 1.0f64..100.0
    ) {
        let mut throttle = PointerThrottle::new(window);
        let mut now = 0.0;
        let mut dispatched = Vec::new();
        for gap in &gaps {
            now += gap;
            if let Some(event) = throttle.offer(PointerEvent::moved(0.0, 0.0, now)) {
                dispatched.push(event.timestamp_ms);
            }
        }

        prop_assert!(!dispatched.is_empty());
        prop_assert!(dispatched.len() <= gaps.len());
        for pair in dispatched.windows(2) {
            prop_assert!(pair[1] - pair[0] >= window);
        }

        let had_pending = throttle.deadline_ms().is_some();
        let flushed = throttle.poll(now + window);
        prop_assert_eq!(flushed.is_some(), had_pending);
        prop_assert!(throttle.deadline_ms().is_none());
    }
}
