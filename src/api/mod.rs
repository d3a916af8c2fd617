mod chart;
mod config;
mod mount;
mod segment;
mod snapshot;
mod tooltip;
mod validation;

pub use chart::{Chart, ChartPhase};
pub use config::{
    ChartConfig, ChartOptions, DEFAULT_TYPE_COLORS, DEFAULT_TYPE_LABELS, ValueFormat,
};
pub use mount::MountPoint;
pub use segment::{PointerContext, SEGMENT_STROKE_WIDTH, Segment, SegmentHandler};
pub use snapshot::{
    CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1, SegmentSnapshot,
};
pub use tooltip::{
    DetachedTooltip, TOOLTIP_EDGE_MARGIN_PX, TOOLTIP_FADE_MS, TOOLTIP_TOP_INSET_PX, TooltipBinding,
    TooltipContent, TooltipPanel, TooltipPosition, TooltipSink, TooltipState, tooltip_anchor_x,
};
