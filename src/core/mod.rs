pub mod connector;
pub mod layout;
pub mod scale;
pub mod segment;
pub mod types;

pub use connector::ConnectorGeometry;
pub use layout::{LayoutStep, PlacedSegment, layout_intervals};
pub use scale::LaneScale;
pub use segment::SegmentGeometry;
pub use types::{Interval, SurfaceBounds, Viewport};
