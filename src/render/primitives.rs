use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses a CSS color string.
    ///
    /// Supported forms: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
    /// `rgba(r, g, b, a)` with 0..=255 channels and a 0..=1 alpha.
    pub fn from_css(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        let invalid = || ChartError::InvalidConfig(format!("unsupported color `{input}`"));

        if let Some(hex) = trimmed.strip_prefix('#') {
            let channel = |range: std::ops::Range<usize>| {
                hex.get(range)
                    .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                    .ok_or_else(invalid)
            };
            return match hex.len() {
                3 => {
                    let expand = |index: usize| channel(index..index + 1).map(|v| v * 17);
                    Ok(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
                }
                6 => Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
                8 => {
                    let base = Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?);
                    Ok(Self {
                        alpha: f64::from(channel(6..8)?) / 255.0,
                        ..base
                    })
                }
                _ => Err(invalid()),
            };
        }

        let (body, expected) = if let Some(body) = trimmed.strip_prefix("rgba(") {
            (body, 4)
        } else if let Some(body) = trimmed.strip_prefix("rgb(") {
            (body, 3)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<f64> = body
            .split(',')
            .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<ChartResult<_>>()?;
        if parts.len() != expected {
            return Err(invalid());
        }

        let color = Self::rgba(
            parts[0] / 255.0,
            parts[1] / 255.0,
            parts[2] / 255.0,
            parts.get(3).copied().unwrap_or(1.0),
        );
        color.validate().map_err(|_| invalid())?;
        Ok(color)
    }

    /// Formats the color as `#rrggbb` (or `#rrggbbaa` when translucent).
    #[must_use]
    pub fn to_css_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            format!(
                "#{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue)
            )
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.red),
                byte(self.green),
                byte(self.blue),
                byte(self.alpha)
            )
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Draw command for one straight line in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if ![self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
///
/// `y` is the vertical center of the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// One step of a path outline in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
    Close,
}

impl PathCommand {
    fn coordinates(self) -> [f64; 4] {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => [x, y, x, y],
            Self::QuadTo { cx, cy, x, y } => [cx, cy, x, y],
            Self::Close => [0.0; 4],
        }
    }
}

/// Fill source for a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Color),
    /// Linear gradient running from `(x0, y0)` in `from` to `(x1, y1)` in `to`.
    LinearGradient {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        from: Color,
        to: Color,
    },
}

impl Paint {
    pub fn validate(self) -> ChartResult<()> {
        match self {
            Self::Solid(color) => color.validate(),
            Self::LinearGradient {
                x0,
                y0,
                x1,
                y1,
                from,
                to,
            } => {
                if ![x0, y0, x1, y1].iter().all(|value| value.is_finite()) {
                    return Err(ChartError::InvalidData(
                        "gradient endpoints must be finite".to_owned(),
                    ));
                }
                from.validate()?;
                to.validate()
            }
        }
    }
}

/// Closed outline that is stroked first and then filled with the same paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub commands: Vec<PathCommand>,
    pub paint: Paint,
    pub stroke_width: f64,
}

impl PathPrimitive {
    #[must_use]
    pub fn new(paint: Paint, stroke_width: f64) -> Self {
        Self {
            commands: Vec::new(),
            paint,
            stroke_width,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo { x, y });
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::QuadTo { cx, cy, x, y });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, PathCommand::QuadTo { .. }))
            .count()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, PathCommand::LineTo { .. }))
            .count()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !matches!(self.commands.first(), Some(PathCommand::MoveTo { .. })) {
            return Err(ChartError::InvalidData(
                "path must start with a move command".to_owned(),
            ));
        }
        if self
            .commands
            .iter()
            .any(|command| !command.coordinates().iter().all(|value| value.is_finite()))
        {
            return Err(ChartError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "path stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.paint.validate()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{Color, Paint, PathPrimitive};

    #[test]
    fn css_hex_forms_parse() {
        let short = Color::from_css("#fff").expect("short hex");
        assert_eq!(short, Color::rgb(1.0, 1.0, 1.0));

        let long = Color::from_css("#336699").expect("long hex");
        assert_relative_eq!(long.red, 0.2);
        assert_relative_eq!(long.green, 0.4);
        assert_relative_eq!(long.blue, 0.6);

        let translucent = Color::from_css("#00000080").expect("hex with alpha");
        assert_relative_eq!(translucent.alpha, 128.0 / 255.0);
    }

    #[test]
    fn css_functional_forms_parse() {
        let rgb = Color::from_css("rgb(255, 0, 51)").expect("rgb");
        assert_relative_eq!(rgb.red, 1.0);
        assert_relative_eq!(rgb.blue, 0.2);

        let rgba = Color::from_css(" rgba(0,0,0,0.5) ").expect("rgba");
        assert_relative_eq!(rgba.alpha, 0.5);
    }

    #[test]
    fn malformed_colors_are_rejected() {
        for input in ["", "red", "#12", "#gggggg", "rgb(1,2)", "rgba(1,2,3,4)", "rgb(1,2,3"] {
            assert!(Color::from_css(input).is_err(), "`{input}` should fail");
        }
    }

    #[test]
    fn hex_output_matches_input() {
        let color = Color::from_css("#6b5bd4").expect("parse");
        assert_eq!(color.to_css_hex(), "#6b5bd4");
    }

    #[test]
    fn path_requires_leading_move() {
        let mut path = PathPrimitive::new(Paint::Solid(Color::rgb(0.0, 0.0, 0.0)), 1.0);
        path.line_to(1.0, 1.0);
        assert!(path.validate().is_err());
    }
}
