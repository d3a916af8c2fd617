use std::fmt;
use std::rc::Rc;

use crate::core::{PlacedSegment, SegmentGeometry, SurfaceBounds};
use crate::error::ChartResult;
use crate::events::{EventHub, Handler};
use crate::interaction::{
    DeferredQueue, PointerAffordance, PointerAffordanceSink, PointerEvent, PointerKind,
};
use crate::render::{Color, Paint, RenderFrame};

use super::tooltip::{
    TOOLTIP_TOP_INSET_PX, TooltipBinding, TooltipContent, TooltipPosition, tooltip_anchor_x,
};

pub const SEGMENT_STROKE_WIDTH: f64 = 1.0;

/// Mutable interaction state handed to segment handlers.
pub struct PointerContext {
    pub bounds: SurfaceBounds,
    pub tooltip: TooltipBinding,
    pub affordance: Box<dyn PointerAffordanceSink>,
    pub deferred: DeferredQueue<TooltipBinding>,
}

impl fmt::Debug for PointerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerContext")
            .field("bounds", &self.bounds)
            .field("tooltip", &self.tooltip)
            .field("deferred", &self.deferred)
            .finish_non_exhaustive()
    }
}

impl PointerContext {
    #[must_use]
    pub fn new(affordance: Box<dyn PointerAffordanceSink>) -> Self {
        Self {
            bounds: SurfaceBounds::at_origin(0, 0),
            tooltip: TooltipBinding::default(),
            affordance,
            deferred: DeferredQueue::default(),
        }
    }
}

pub type SegmentHandler = Handler<PointerEvent, PointerContext>;

/// One rendered block: geometry, style, and its own event hub.
///
/// Segments are rebuilt on every layout pass and carry no identity across
/// renders.
pub struct Segment {
    placed: PlacedSegment,
    color: Color,
    label: String,
    value_text: String,
    hub: EventHub<PointerEvent, PointerContext>,
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("placed", &self.placed)
            .field("color", &self.color)
            .field("label", &self.label)
            .field("value_text", &self.value_text)
            .field("hub", &self.hub)
            .finish()
    }
}

impl Segment {
    /// Builds a segment with its click and move handlers registered.
    #[must_use]
    pub fn new(placed: PlacedSegment, color: Color, label: String, value_text: String) -> Self {
        let mut segment = Self {
            placed,
            color,
            label,
            value_text,
            hub: EventHub::new(),
        };
        segment.register_default_handlers();
        segment
    }

    fn register_default_handlers(&mut self) {
        self.hub.on(
            PointerKind::Click.event_name(),
            Rc::new(|_: &PointerEvent, context: &mut PointerContext| -> ChartResult<()> {
                context.affordance.set_affordance(PointerAffordance::Pointer);
                context.tooltip.set_visible(true);
                Ok(())
            }),
        );

        let content = self.tooltip_content();
        self.hub.on(
            PointerKind::Move.event_name(),
            Rc::new(
                move |event: &PointerEvent, context: &mut PointerContext| -> ChartResult<()> {
                    context.affordance.set_affordance(PointerAffordance::Pointer);
                    context.tooltip.set_content(content.clone());
                    context.tooltip.set_visible(true);

                    // The panel width is only valid once the host applied the
                    // content above, so positioning waits for the next turn.
                    let (pointer_x, _) = context.bounds.to_local(event.client_x, event.client_y);
                    let surface_width = f64::from(context.bounds.width);
                    context.deferred.schedule(Box::new(
                        move |tooltip: &mut TooltipBinding| -> ChartResult<()> {
                            let x = tooltip_anchor_x(pointer_x, tooltip.panel_width(), surface_width);
                            tooltip.set_position(TooltipPosition {
                                x,
                                y: TOOLTIP_TOP_INSET_PX,
                            });
                            Ok(())
                        },
                    ));
                    Ok(())
                },
            ),
        );
    }

    #[must_use]
    pub fn geometry(&self) -> SegmentGeometry {
        self.placed.geometry
    }

    #[must_use]
    pub fn placed(&self) -> PlacedSegment {
        self.placed
    }

    #[must_use]
    pub fn lane(&self) -> usize {
        self.placed.lane
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.placed.value
    }

    #[must_use]
    pub fn tooltip_content(&self) -> TooltipContent {
        TooltipContent {
            color: self.color,
            label: self.label.clone(),
            value: self.value_text.clone(),
        }
    }

    /// Strokes and fills the rounded block outline into `frame`.
    pub fn draw(&self, frame: &mut RenderFrame) {
        frame.push_path(
            self.placed
                .geometry
                .outline(Paint::Solid(self.color), SEGMENT_STROKE_WIDTH),
        );
    }

    /// Hit-tests a host-space coordinate against this block.
    ///
    /// A miss also clears hover state: the cursor cue is reset and the tooltip
    /// hidden. Callers rely on this to drop stale hover on every dispatch.
    pub fn is_event_in_region(
        &self,
        client_x: f64,
        client_y: f64,
        context: &mut PointerContext,
    ) -> bool {
        let (x, y) = context.bounds.to_local(client_x, client_y);
        let hit = self.placed.geometry.contains(x, y);
        if !hit {
            context.affordance.set_affordance(PointerAffordance::Default);
            context.tooltip.set_visible(false);
        }
        hit
    }

    pub fn on(&mut self, event_name: &str, handler: SegmentHandler) {
        self.hub.on(event_name, handler);
    }

    pub fn off(&mut self, event_name: &str, handler: Option<&SegmentHandler>) -> usize {
        self.hub.off(event_name, handler)
    }

    pub fn emit(
        &self,
        event_name: &str,
        event: Option<&PointerEvent>,
        context: &mut PointerContext,
    ) -> ChartResult<()> {
        self.hub.emit(event_name, event, context)
    }

    #[must_use]
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.hub.handler_count(event_name)
    }
}
