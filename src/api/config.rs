use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::Interval;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::validation::validate_chart_config;

pub const DEFAULT_TYPE_LABELS: [&str; 4] = ["Awake", "REM", "Light", "Deep"];
pub const DEFAULT_TYPE_COLORS: [&str; 4] = ["#ff8a65", "#ffd54f", "#64b5f6", "#5c6bc0"];

/// How a segment's value is rendered in the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueFormat {
    /// Value is a duration in minutes, rendered as `1h 20m`.
    #[default]
    Minutes,
    /// Value is rendered as a plain number.
    Raw,
}

impl ValueFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Raw => format!("{value}"),
            Self::Minutes => {
                let Some(delta) = TimeDelta::try_seconds((value * 60.0).round() as i64) else {
                    return format!("{value}m");
                };
                let hours = delta.num_hours();
                let minutes = delta.num_minutes() - hours * 60;
                if hours > 0 {
                    format!("{hours}h {minutes:02}m")
                } else {
                    format!("{minutes}m")
                }
            }
        }
    }
}

/// Resolved chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub type_labels: Vec<String>,
    pub type_colors: Vec<Color>,
    pub x_min: f64,
    pub x_max: f64,
    pub axis_color: Color,
    pub axis_inset_left: f64,
    pub axis_inset_bottom: f64,
    pub corner_radius: f64,
    pub connector_width: f64,
    pub throttle_ms: f64,
    pub value_format: ValueFormat,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            type_labels: DEFAULT_TYPE_LABELS.iter().map(|label| (*label).to_owned()).collect(),
            type_colors: DEFAULT_TYPE_COLORS
                .iter()
                .filter_map(|css| Color::from_css(css).ok())
                .collect(),
            x_min: 0.0,
            x_max: 800.0,
            axis_color: Color::from_rgb8(0x99, 0x99, 0x99),
            axis_inset_left: 60.0,
            axis_inset_bottom: 20.0,
            corner_radius: 10.0,
            connector_width: 2.0,
            throttle_ms: 50.0,
            value_format: ValueFormat::Minutes,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.type_labels.len()
    }

    /// Returns a copy with every field present in `options` applied.
    ///
    /// The result is validated; `self` is never modified.
    pub fn merged(&self, options: &ChartOptions) -> ChartResult<Self> {
        let mut next = self.clone();

        if let Some(labels) = &options.type_labels {
            next.type_labels = labels.clone();
        }
        if let Some(colors) = &options.type_colors {
            next.type_colors = colors
                .iter()
                .map(|css| Color::from_css(css))
                .collect::<ChartResult<_>>()?;
        }
        if let Some(x_min) = options.x_min {
            next.x_min = x_min;
        }
        if let Some(x_max) = options.x_max {
            next.x_max = x_max;
        }
        if let Some(axis_color) = &options.axis_color {
            next.axis_color = Color::from_css(axis_color)?;
        }
        if let Some(inset) = options.axis_inset_left {
            next.axis_inset_left = inset;
        }
        if let Some(inset) = options.axis_inset_bottom {
            next.axis_inset_bottom = inset;
        }
        if let Some(radius) = options.corner_radius {
            next.corner_radius = radius;
        }
        if let Some(width) = options.connector_width {
            next.connector_width = width;
        }
        if let Some(throttle_ms) = options.throttle_ms {
            next.throttle_ms = throttle_ms;
        }
        if let Some(value_format) = options.value_format {
            next.value_format = value_format;
        }

        validate_chart_config(&next)?;
        Ok(next)
    }
}

/// Partial update applied by `Chart::set_option`.
///
/// Every field is optional; omitted fields keep their previous value. Serde
/// names follow the host JSON contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    #[serde(rename = "sleepData", skip_serializing_if = "Option::is_none")]
    pub intervals: Option<Vec<Interval>>,
    #[serde(rename = "Xmin", skip_serializing_if = "Option::is_none")]
    pub x_min: Option<f64>,
    #[serde(rename = "Xmax", skip_serializing_if = "Option::is_none")]
    pub x_max: Option<f64>,
    #[serde(rename = "sleepType", skip_serializing_if = "Option::is_none")]
    pub type_labels: Option<Vec<String>>,
    #[serde(rename = "sleepColor", skip_serializing_if = "Option::is_none")]
    pub type_colors: Option<Vec<String>>,
    #[serde(rename = "axisColor", skip_serializing_if = "Option::is_none")]
    pub axis_color: Option<String>,
    #[serde(rename = "axisYwidth", skip_serializing_if = "Option::is_none")]
    pub axis_inset_left: Option<f64>,
    #[serde(rename = "axisXheight", skip_serializing_if = "Option::is_none")]
    pub axis_inset_bottom: Option<f64>,
    #[serde(rename = "borderRadius", skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(rename = "lineWidth", skip_serializing_if = "Option::is_none")]
    pub connector_width: Option<f64>,
    #[serde(rename = "throttleMs", skip_serializing_if = "Option::is_none")]
    pub throttle_ms: Option<f64>,
    #[serde(rename = "valueFormat", skip_serializing_if = "Option::is_none")]
    pub value_format: Option<ValueFormat>,
}

impl ChartOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart options: {e}")))
    }

    #[must_use]
    pub fn with_intervals(mut self, intervals: impl Into<Vec<Interval>>) -> Self {
        self.intervals = Some(intervals.into());
        self
    }

    #[must_use]
    pub fn with_x_domain(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = Some(x_min);
        self.x_max = Some(x_max);
        self
    }

    #[must_use]
    pub fn with_types<L, C>(mut self, labels: L, colors: C) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.type_labels = Some(labels.into_iter().map(Into::into).collect());
        self.type_colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_axis(mut self, color: impl Into<String>, inset_left: f64, inset_bottom: f64) -> Self {
        self.axis_color = Some(color.into());
        self.axis_inset_left = Some(inset_left);
        self.axis_inset_bottom = Some(inset_bottom);
        self
    }

    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_connector_width(mut self, width: f64) -> Self {
        self.connector_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_throttle_ms(mut self, throttle_ms: f64) -> Self {
        self.throttle_ms = Some(throttle_ms);
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, value_format: ValueFormat) -> Self {
        self.value_format = Some(value_format);
        self
    }
}
