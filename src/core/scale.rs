use serde::{Deserialize, Serialize};

use crate::core::types::Viewport;
use crate::error::{ChartError, ChartResult};

/// Pixel scaling derived from the surface size and chart config.
///
/// Recomputed on every layout pass; never cached across renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneScale {
    pub x_scale: f64,
    pub y_scale: f64,
    pub effective_corner_radius: f64,
}

impl LaneScale {
    pub fn new(
        viewport: Viewport,
        x_domain: (f64, f64),
        lane_count: usize,
        axis_inset_left: f64,
        axis_inset_bottom: f64,
        corner_radius: f64,
    ) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let (x_min, x_max) = x_domain;
        if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
            return Err(ChartError::InvalidConfig(
                "x domain must be finite with x_max > x_min".to_owned(),
            ));
        }
        if lane_count == 0 {
            return Err(ChartError::InvalidConfig(
                "at least one lane is required".to_owned(),
            ));
        }

        let plot_width = f64::from(viewport.width) - axis_inset_left;
        let plot_height = f64::from(viewport.height) - axis_inset_bottom;
        if plot_width <= 0.0 || plot_height <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "axis insets leave no drawable area on a {}x{} surface",
                viewport.width, viewport.height
            )));
        }

        let x_scale = plot_width / (x_max - x_min);
        let y_scale = plot_height / lane_count as f64;

        Ok(Self {
            x_scale,
            y_scale,
            effective_corner_radius: corner_radius.min(y_scale / 4.0),
        })
    }

    /// Top pixel of a lane band.
    #[must_use]
    pub fn lane_top(self, lane: usize) -> f64 {
        lane as f64 * self.y_scale
    }

    /// Vertical center of a lane band, used for axis labels.
    #[must_use]
    pub fn lane_center(self, lane: usize) -> f64 {
        self.lane_top(lane) + self.y_scale / 2.0
    }
}
