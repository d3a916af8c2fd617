use std::fmt;
use std::mem;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    ConnectorGeometry, Interval, LaneScale, LayoutStep, SurfaceBounds, layout_intervals,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PointerAffordanceSink, PointerEvent, PointerKind, PointerThrottle};
use crate::render::{LinePrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive};

use super::mount::MountPoint;
use super::segment::{PointerContext, SEGMENT_STROKE_WIDTH, Segment, SegmentHandler};
use super::tooltip::{TooltipSink, TooltipState};
use super::validation::validate_intervals;
use super::{ChartConfig, ChartOptions};

const AXIS_STROKE_WIDTH: f64 = 1.0;
const AXIS_LABEL_FONT_PX: f64 = 12.0;
const AXIS_LABEL_GAP_PX: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartPhase {
    Uninitialized,
    Initialized,
    Rendered,
}

#[derive(Debug, Clone)]
struct PointerThrottles {
    click: PointerThrottle,
    moved: PointerThrottle,
}

impl PointerThrottles {
    fn new(window_ms: f64) -> Self {
        Self {
            click: PointerThrottle::new(window_ms),
            moved: PointerThrottle::new(window_ms),
        }
    }

    fn get_mut(&mut self, kind: PointerKind) -> &mut PointerThrottle {
        match kind {
            PointerKind::Click => &mut self.click,
            PointerKind::Move => &mut self.moved,
        }
    }

    fn reinstall(&mut self, window_ms: f64) {
        for kind in PointerKind::ALL {
            let throttle = self.get_mut(kind);
            throttle.reset();
            throttle.set_window_ms(window_ms);
        }
    }

    fn next_deadline_ms(&self) -> Option<f64> {
        [self.click.deadline_ms(), self.moved.deadline_ms()]
            .into_iter()
            .flatten()
            .reduce(f64::min)
    }
}

/// Result of one layout pass, committed only after the frame rendered.
struct RenderPass {
    scale: LaneScale,
    segments: Vec<Segment>,
    connectors: Vec<ConnectorGeometry>,
    frame: RenderFrame,
}

/// Segmented timeline chart.
///
/// Lifecycle: `new` → `init` (surface attached) → `set_option` (segments
/// exist) → `set_option`/`resize` again, each pass fully replacing the segment
/// collection. Tooltip state survives across passes.
pub struct Chart<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    intervals: Vec<Interval>,
    surface: Option<SurfaceBounds>,
    scale: Option<LaneScale>,
    segments: Vec<Segment>,
    connectors: Vec<ConnectorGeometry>,
    frame: Option<RenderFrame>,
    context: PointerContext,
    throttles: PointerThrottles,
    listening: bool,
    segment_handlers: Vec<(String, SegmentHandler)>,
}

impl<R: Renderer> fmt::Debug for Chart<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("phase", &self.phase())
            .field("config", &self.config)
            .field("intervals", &self.intervals.len())
            .field("segments", &self.segments.len())
            .field("connectors", &self.connectors.len())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> Chart<R> {
    #[must_use]
    pub fn new(renderer: R, affordance: Box<dyn PointerAffordanceSink>) -> Self {
        let config = ChartConfig::default();
        let throttles = PointerThrottles::new(config.throttle_ms);
        Self {
            renderer,
            config,
            intervals: Vec::new(),
            surface: None,
            scale: None,
            segments: Vec::new(),
            connectors: Vec::new(),
            frame: None,
            context: PointerContext::new(affordance),
            throttles,
            listening: false,
            segment_handlers: Vec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> ChartPhase {
        match (self.surface, self.frame.is_some()) {
            (None, _) => ChartPhase::Uninitialized,
            (Some(_), false) => ChartPhase::Initialized,
            (Some(_), true) => ChartPhase::Rendered,
        }
    }

    /// Attaches the chart to `mount`, sizing the surface to its current box
    /// and binding `tooltip` as the panel sink.
    ///
    /// Re-initializing drops the rendered segments but keeps config, data and
    /// tooltip state.
    pub fn init(&mut self, mount: &dyn MountPoint, tooltip: Box<dyn TooltipSink>) -> ChartResult<()> {
        let bounds = mount.bounds();
        let viewport = bounds.viewport();
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        self.renderer.attach(viewport)?;
        self.context.bounds = bounds;
        self.context.tooltip.attach(tooltip);
        self.surface = Some(bounds);
        self.scale = None;
        self.segments.clear();
        self.connectors.clear();
        self.frame = None;
        self.listening = false;
        debug!(width = viewport.width, height = viewport.height, "chart surface attached");
        Ok(())
    }

    /// Merges `options` over the current config, lays out and draws the
    /// chart, and (re)installs the throttled pointer listeners.
    ///
    /// Invalid options leave the previous config and render untouched.
    pub fn set_option(&mut self, options: ChartOptions) -> ChartResult<()> {
        let bounds = self.surface.ok_or(ChartError::NotInitialized)?;

        let config = self.config.merged(&options)?;
        let intervals = options.intervals.unwrap_or_else(|| self.intervals.clone());
        validate_intervals(&intervals, config.lane_count())?;

        let pass = self.build_pass(bounds, &config, &intervals)?;
        self.renderer.render(&pass.frame)?;

        debug!(
            segments = pass.segments.len(),
            connectors = pass.connectors.len(),
            x_scale = pass.scale.x_scale,
            y_scale = pass.scale.y_scale,
            corner_radius = pass.scale.effective_corner_radius,
            "chart layout pass"
        );

        self.throttles.reinstall(config.throttle_ms);
        self.listening = true;
        self.config = config;
        self.intervals = intervals;
        self.commit_pass(pass);
        Ok(())
    }

    /// Re-measures `mount` and, when already rendered, lays out again with the
    /// current config.
    ///
    /// A failed relayout keeps the previous surface, renderer size and render.
    pub fn resize(&mut self, mount: &dyn MountPoint) -> ChartResult<()> {
        let previous = self.surface.ok_or(ChartError::NotInitialized)?;
        let bounds = mount.bounds();
        let viewport = bounds.viewport();
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let pass = if self.frame.is_some() {
            Some(self.build_pass(bounds, &self.config, &self.intervals)?)
        } else {
            None
        };

        self.renderer.attach(viewport)?;
        if let Some(pass) = &pass {
            if let Err(err) = self.renderer.render(&pass.frame) {
                if let Err(restore_err) = self.renderer.attach(previous.viewport()) {
                    warn!(error = %restore_err, "failed to restore renderer size");
                }
                return Err(err);
            }
        }

        self.surface = Some(bounds);
        self.context.bounds = bounds;
        if let Some(pass) = pass {
            debug!(
                width = viewport.width,
                height = viewport.height,
                segments = pass.segments.len(),
                "chart resized"
            );
            self.commit_pass(pass);
        }
        Ok(())
    }

    fn commit_pass(&mut self, pass: RenderPass) {
        self.scale = Some(pass.scale);
        self.segments = pass.segments;
        self.connectors = pass.connectors;
        self.frame = Some(pass.frame);
    }

    fn build_pass(
        &self,
        bounds: SurfaceBounds,
        config: &ChartConfig,
        intervals: &[Interval],
    ) -> ChartResult<RenderPass> {
        let viewport = bounds.viewport();
        let scale = LaneScale::new(
            viewport,
            (config.x_min, config.x_max),
            config.lane_count(),
            config.axis_inset_left,
            config.axis_inset_bottom,
            config.corner_radius,
        )?;

        let mut frame = RenderFrame::new(viewport);
        draw_axes(&mut frame, config, scale);

        let mut segments = Vec::with_capacity(intervals.len());
        let mut connectors = Vec::new();
        for step in layout_intervals(
            intervals,
            scale,
            config.axis_inset_left,
            config.connector_width,
        ) {
            match step {
                LayoutStep::Segment(placed) => {
                    let mut segment = Segment::new(
                        placed,
                        config.type_colors[placed.lane],
                        config.type_labels[placed.lane].clone(),
                        config.value_format.format(placed.value),
                    );
                    for (event_name, handler) in &self.segment_handlers {
                        segment.on(event_name, handler.clone());
                    }
                    segment.draw(&mut frame);
                    segments.push(segment);
                }
                LayoutStep::Connector(connector) => {
                    frame.push_path(connector.outline(
                        config.type_colors[connector.from_lane],
                        config.type_colors[connector.to_lane],
                        SEGMENT_STROKE_WIDTH,
                    ));
                    connectors.push(connector);
                }
            }
        }

        Ok(RenderPass {
            scale,
            segments,
            connectors,
            frame,
        })
    }

    /// Registers `handler` on every segment of this and all later layout
    /// passes, after the built-in tooltip handlers.
    pub fn on(&mut self, event_name: &str, handler: SegmentHandler) {
        for segment in &mut self.segments {
            segment.on(event_name, handler.clone());
        }
        self.segment_handlers.push((event_name.to_owned(), handler));
    }

    /// Removes handlers added through `on`: the first registration of
    /// `handler`, or all of them for `event_name` when `handler` is `None`.
    /// Built-in handlers are never removed.
    pub fn off(&mut self, event_name: &str, handler: Option<&SegmentHandler>) {
        let removed: Vec<SegmentHandler> = match handler {
            Some(handler) => {
                let position = self.segment_handlers.iter().position(|(name, entry)| {
                    name == event_name && Rc::ptr_eq(entry, handler)
                });
                position
                    .map(|index| self.segment_handlers.remove(index).1)
                    .into_iter()
                    .collect()
            }
            None => {
                let (removed, kept) = mem::take(&mut self.segment_handlers)
                    .into_iter()
                    .partition(|(name, _)| name == event_name);
                self.segment_handlers = kept;
                removed.into_iter().map(|(_, entry)| entry).collect::<Vec<_>>()
            }
        };
        for entry in &removed {
            for segment in &mut self.segments {
                segment.off(event_name, Some(entry));
            }
        }
    }

    /// Feeds one raw pointer event through its throttle.
    ///
    /// A trailing event of the same kind whose window already closed is
    /// dispatched first, so it is never replaced unseen. Before the first
    /// `set_option` no listener is installed and events are ignored.
    pub fn pointer_event(&mut self, event: PointerEvent) -> ChartResult<()> {
        if self.surface.is_none() {
            return Err(ChartError::NotInitialized);
        }
        if !self.listening {
            return Ok(());
        }

        let throttle = self.throttles.get_mut(event.kind);
        let overdue = throttle.poll(event.timestamp_ms);
        let leading = throttle.offer(event);

        let mut first_error = None;
        for event in overdue.into_iter().chain(leading) {
            if let Err(err) = self.dispatch(event) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Releases trailing throttled events whose window closed by `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> ChartResult<()> {
        if self.surface.is_none() {
            return Err(ChartError::NotInitialized);
        }
        let mut first_error = None;
        for kind in PointerKind::ALL {
            if let Some(event) = self.throttles.get_mut(kind).poll(now_ms) {
                if let Err(err) = self.dispatch(event) {
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Earliest time the host should call `advance`.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.throttles.next_deadline_ms()
    }

    /// Runs work deferred to the next host turn, such as tooltip positioning.
    pub fn run_deferred(&mut self) -> ChartResult<usize> {
        let context = &mut self.context;
        context.deferred.run_turn(&mut context.tooltip)
    }

    #[must_use]
    pub fn has_deferred(&self) -> bool {
        !self.context.deferred.is_empty()
    }

    /// Hit-tests every segment, then emits on each hit.
    ///
    /// A failing handler does not stop delivery to the other hit segments;
    /// the first failure is returned.
    fn dispatch(&mut self, event: PointerEvent) -> ChartResult<()> {
        let event_name = event.kind.event_name();
        let context = &mut self.context;
        let hits: Vec<&Segment> = self
            .segments
            .iter()
            .filter(|segment| segment.is_event_in_region(event.client_x, event.client_y, context))
            .collect();

        trace!(event = event_name, hits = hits.len(), "pointer dispatch");

        let mut first_error = None;
        for segment in hits {
            if let Err(err) = segment.emit(event_name, Some(&event), context) {
                warn!(
                    error = %err,
                    event = event_name,
                    lane = segment.lane(),
                    "segment handler failed"
                );
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    #[must_use]
    pub fn surface(&self) -> Option<SurfaceBounds> {
        self.surface
    }

    #[must_use]
    pub fn scale(&self) -> Option<LaneScale> {
        self.scale
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn connectors(&self) -> &[ConnectorGeometry] {
        &self.connectors
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    #[must_use]
    pub fn tooltip_state(&self) -> &TooltipState {
        self.context.tooltip.state()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

fn draw_axes(frame: &mut RenderFrame, config: &ChartConfig, scale: LaneScale) {
    let width = f64::from(frame.viewport.width);
    let plot_bottom = f64::from(frame.viewport.height) - config.axis_inset_bottom;
    let left = config.axis_inset_left;

    frame.push_line(LinePrimitive::new(
        left,
        0.0,
        left,
        plot_bottom,
        AXIS_STROKE_WIDTH,
        config.axis_color,
    ));
    frame.push_line(LinePrimitive::new(
        left,
        plot_bottom,
        width,
        plot_bottom,
        AXIS_STROKE_WIDTH,
        config.axis_color,
    ));

    for (lane, label) in config.type_labels.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        frame.push_text(TextPrimitive::new(
            label.clone(),
            left - AXIS_LABEL_GAP_PX,
            scale.lane_center(lane),
            AXIS_LABEL_FONT_PX,
            config.axis_color,
            TextHAlign::Right,
        ));
    }
}
