use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Box of a mount point in host (viewport) coordinates.
///
/// `left`/`top` are the offset of the drawing surface; pointer coordinates
/// arrive relative to the host viewport and are shifted by this offset before
/// hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: u32,
    pub height: u32,
}

impl SurfaceBounds {
    #[must_use]
    pub fn new(left: f64, top: f64, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn at_origin(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Converts a host-space coordinate into surface-local space.
    #[must_use]
    pub fn to_local(self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.left, client_y - self.top)
    }
}

/// One input record: a span of `duration` units in lane `type_index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, usize)", into = "(f64, usize)")]
pub struct Interval {
    pub duration: f64,
    pub type_index: usize,
}

impl Interval {
    #[must_use]
    pub const fn new(duration: f64, type_index: usize) -> Self {
        Self {
            duration,
            type_index,
        }
    }

    /// Validates the interval against a lane count.
    ///
    /// Zero durations are accepted and produce a zero-width segment.
    pub fn validate(self, lane_count: usize) -> ChartResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "interval duration must be finite and >= 0, got {}",
                self.duration
            )));
        }
        if self.type_index >= lane_count {
            return Err(ChartError::InvalidConfig(format!(
                "interval type index {} is out of range for {lane_count} lanes",
                self.type_index
            )));
        }
        Ok(())
    }
}

impl From<(f64, usize)> for Interval {
    fn from((duration, type_index): (f64, usize)) -> Self {
        Self::new(duration, type_index)
    }
}

impl From<Interval> for (f64, usize) {
    fn from(interval: Interval) -> Self {
        (interval.duration, interval.type_index)
    }
}
