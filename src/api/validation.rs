use crate::core::Interval;
use crate::error::{ChartError, ChartResult};

use super::ChartConfig;

pub(super) fn validate_chart_config(config: &ChartConfig) -> ChartResult<()> {
    if config.type_labels.is_empty() {
        return Err(ChartError::InvalidConfig(
            "at least one type label is required".to_owned(),
        ));
    }
    if config.type_labels.len() != config.type_colors.len() {
        return Err(ChartError::InvalidConfig(format!(
            "type labels ({}) and type colors ({}) must have the same length",
            config.type_labels.len(),
            config.type_colors.len()
        )));
    }
    if !config.x_min.is_finite() || !config.x_max.is_finite() || config.x_max <= config.x_min {
        return Err(ChartError::InvalidConfig(format!(
            "x domain must be finite with x_max > x_min, got [{}, {}]",
            config.x_min, config.x_max
        )));
    }

    for (name, value) in [
        ("axis_inset_left", config.axis_inset_left),
        ("axis_inset_bottom", config.axis_inset_bottom),
        ("corner_radius", config.corner_radius),
        ("connector_width", config.connector_width),
        ("throttle_ms", config.throttle_ms),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "`{name}` must be finite and >= 0"
            )));
        }
    }

    config.axis_color.validate()?;
    for color in &config.type_colors {
        color.validate()?;
    }
    Ok(())
}

pub(super) fn validate_intervals(intervals: &[Interval], lane_count: usize) -> ChartResult<()> {
    intervals
        .iter()
        .try_for_each(|interval| interval.validate(lane_count))
}

#[cfg(test)]
mod tests {
    use super::{validate_chart_config, validate_intervals};
    use crate::api::ChartConfig;
    use crate::core::Interval;

    #[test]
    fn mismatched_lane_arrays_fail_fast() {
        let mut config = ChartConfig::default();
        config.type_labels.pop();
        assert!(validate_chart_config(&config).is_err());
    }

    #[test]
    fn non_positive_domain_fails_fast() {
        let config = ChartConfig {
            x_min: 10.0,
            x_max: 10.0,
            ..ChartConfig::default()
        };
        assert!(validate_chart_config(&config).is_err());
    }

    #[test]
    fn negative_radius_fails_fast() {
        let config = ChartConfig {
            corner_radius: -1.0,
            ..ChartConfig::default()
        };
        assert!(validate_chart_config(&config).is_err());
    }

    #[test]
    fn intervals_are_checked_against_lane_count() {
        assert!(validate_intervals(&[Interval::new(1.0, 3)], 4).is_ok());
        assert!(validate_intervals(&[Interval::new(1.0, 4)], 4).is_err());
    }
}
