//! stage-chart-rs: segmented timeline chart engine.
//!
//! Lays out a sequence of typed intervals (for example sleep stages) as
//! rounded blocks in horizontal lanes, joins lane changes with gradient
//! connectors, and drives a floating tooltip from throttled pointer
//! hit-testing. Drawing goes through a backend-agnostic `Renderer`.

pub mod api;
pub mod core;
pub mod error;
pub mod events;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{Chart, ChartConfig, ChartOptions};
pub use error::{ChartError, ChartResult};
