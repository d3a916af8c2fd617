use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Gap kept between the panel and the surface's right edge.
pub const TOOLTIP_EDGE_MARGIN_PX: f64 = 12.0;
/// Fixed distance of the panel from the surface top.
pub const TOOLTIP_TOP_INSET_PX: f64 = 10.0;
/// Fade duration hint forwarded to sinks on visibility changes.
pub const TOOLTIP_FADE_MS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub color: Color,
    pub label: String,
    pub value: String,
}

impl Default for TooltipContent {
    fn default() -> Self {
        Self {
            color: Color::rgba(0.0, 0.0, 0.0, 0.0),
            label: String::new(),
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub position: TooltipPosition,
    pub content: TooltipContent,
}

/// Floating panel driven by the chart.
///
/// Each method is called synchronously from the matching `TooltipBinding`
/// setter. `panel_width` is the only read and must reflect the latest content.
pub trait TooltipSink {
    fn apply_visible(&mut self, visible: bool, fade_ms: u32);
    fn apply_position(&mut self, position: TooltipPosition);
    fn apply_content(&mut self, content: &TooltipContent);
    fn panel_width(&self) -> f64;
}

impl<T: TooltipSink> TooltipSink for Rc<RefCell<T>> {
    fn apply_visible(&mut self, visible: bool, fade_ms: u32) {
        self.borrow_mut().apply_visible(visible, fade_ms);
    }

    fn apply_position(&mut self, position: TooltipPosition) {
        self.borrow_mut().apply_position(position);
    }

    fn apply_content(&mut self, content: &TooltipContent) {
        self.borrow_mut().apply_content(content);
    }

    fn panel_width(&self) -> f64 {
        self.borrow().panel_width()
    }
}

/// Sink used before a panel is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedTooltip;

impl TooltipSink for DetachedTooltip {
    fn apply_visible(&mut self, _visible: bool, _fade_ms: u32) {}
    fn apply_position(&mut self, _position: TooltipPosition) {}
    fn apply_content(&mut self, _content: &TooltipContent) {}
    fn panel_width(&self) -> f64 {
        0.0
    }
}

/// Headless panel model with a text-length width estimate.
///
/// Hosts without their own widget can render from its fields; tests use it to
/// observe what the chart wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipPanel {
    pub displayed: bool,
    pub left: f64,
    pub top: f64,
    pub swatch: Color,
    pub text: String,
    pub last_fade_ms: u32,
    pub char_width_px: f64,
    pub padding_px: f64,
    pub swatch_px: f64,
    pub updates: usize,
}

impl Default for TooltipPanel {
    fn default() -> Self {
        Self {
            displayed: false,
            left: 0.0,
            top: 0.0,
            swatch: Color::rgba(0.0, 0.0, 0.0, 0.0),
            text: String::new(),
            last_fade_ms: 0,
            char_width_px: 7.0,
            padding_px: 8.0,
            swatch_px: 16.0,
            updates: 0,
        }
    }
}

impl TooltipPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }
}

impl TooltipSink for TooltipPanel {
    fn apply_visible(&mut self, visible: bool, fade_ms: u32) {
        self.displayed = visible;
        self.last_fade_ms = fade_ms;
        self.updates += 1;
    }

    fn apply_position(&mut self, position: TooltipPosition) {
        self.left = position.x;
        self.top = position.y;
        self.updates += 1;
    }

    fn apply_content(&mut self, content: &TooltipContent) {
        self.swatch = content.color;
        self.text = format!("{}: {}", content.label, content.value);
        self.updates += 1;
    }

    fn panel_width(&self) -> f64 {
        if self.text.is_empty() {
            return 0.0;
        }
        self.padding_px * 2.0 + self.swatch_px + self.text.chars().count() as f64 * self.char_width_px
    }
}

/// Tooltip state plus the sink it is mirrored into.
///
/// Every setter writes the state and immediately pushes that field to the
/// sink. Nothing is read back from the sink except the panel width.
pub struct TooltipBinding {
    state: TooltipState,
    sink: Box<dyn TooltipSink>,
}

impl fmt::Debug for TooltipBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipBinding")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for TooltipBinding {
    fn default() -> Self {
        Self {
            state: TooltipState::default(),
            sink: Box::new(DetachedTooltip),
        }
    }
}

impl TooltipBinding {
    /// Replaces the sink and brings it up to date with the current state.
    pub fn attach(&mut self, sink: Box<dyn TooltipSink>) {
        self.sink = sink;
        self.sink.apply_content(&self.state.content);
        self.sink.apply_position(self.state.position);
        self.sink.apply_visible(self.state.visible, 0);
    }

    #[must_use]
    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state.visible = visible;
        self.sink.apply_visible(visible, TOOLTIP_FADE_MS);
    }

    pub fn set_position(&mut self, position: TooltipPosition) {
        self.state.position = position;
        self.sink.apply_position(position);
    }

    pub fn set_content(&mut self, content: TooltipContent) {
        self.sink.apply_content(&content);
        self.state.content = content;
    }

    #[must_use]
    pub fn panel_width(&self) -> f64 {
        self.sink.panel_width()
    }
}

/// Anchor x for a panel of `panel_width` so it never overflows the surface's
/// right edge.
#[must_use]
pub fn tooltip_anchor_x(pointer_x: f64, panel_width: f64, surface_width: f64) -> f64 {
    if pointer_x + panel_width + TOOLTIP_EDGE_MARGIN_PX >= surface_width {
        surface_width - panel_width - TOOLTIP_EDGE_MARGIN_PX
    } else {
        pointer_x
    }
}

#[cfg(test)]
mod tests {
    use super::{
        TOOLTIP_FADE_MS, TooltipBinding, TooltipContent, TooltipPanel, TooltipPosition,
        tooltip_anchor_x,
    };
    use crate::render::Color;

    #[test]
    fn anchor_is_clamped_near_right_edge() {
        assert_eq!(tooltip_anchor_x(100.0, 120.0, 800.0), 100.0);
        assert_eq!(tooltip_anchor_x(700.0, 120.0, 800.0), 668.0);
        assert_eq!(tooltip_anchor_x(668.0, 120.0, 800.0), 668.0);
    }

    #[test]
    fn setters_push_each_field_synchronously() {
        let panel = TooltipPanel::shared();
        let mut binding = TooltipBinding::default();
        binding.attach(Box::new(panel.clone()));

        binding.set_content(TooltipContent {
            color: Color::rgb(1.0, 0.0, 0.0),
            label: "REM".to_owned(),
            value: "20m".to_owned(),
        });
        assert_eq!(panel.borrow().text, "REM: 20m");

        binding.set_visible(true);
        assert!(panel.borrow().displayed);
        assert_eq!(panel.borrow().last_fade_ms, TOOLTIP_FADE_MS);

        binding.set_position(TooltipPosition { x: 30.0, y: 10.0 });
        assert_eq!(panel.borrow().left, 30.0);
        assert!(binding.state().visible);
    }

    #[test]
    fn attach_replays_current_state() {
        let mut binding = TooltipBinding::default();
        binding.set_visible(true);
        binding.set_position(TooltipPosition { x: 5.0, y: 10.0 });

        let panel = TooltipPanel::shared();
        binding.attach(Box::new(panel.clone()));
        assert!(panel.borrow().displayed);
        assert_eq!(panel.borrow().left, 5.0);
    }

    #[test]
    fn panel_width_tracks_text_length() {
        let mut panel = TooltipPanel::new();
        assert_eq!(super::TooltipSink::panel_width(&panel), 0.0);
        super::TooltipSink::apply_content(
            &mut panel,
            &TooltipContent {
                color: Color::rgb(0.0, 0.0, 0.0),
                label: "Deep".to_owned(),
                value: "1h 05m".to_owned(),
            },
        );
        // "Deep: 1h 05m" is 12 chars
        assert_eq!(super::TooltipSink::panel_width(&panel), 16.0 + 16.0 + 84.0);
    }
}
