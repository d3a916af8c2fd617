use cairo::{Context, Format, ImageSurface, LinearGradient};
use pango::FontDescription;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Paint, PathCommand, PathPrimitive, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
}

/// Extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Renders offscreen into an image surface through `Renderer::render`, or
/// in place on an external context through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        Ok(Self {
            surface: create_surface(width, height)?,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for path in &frame.paths {
            append_path(context, path);
            apply_paint(context, path.paint)?;
            if path.stroke_width > 0.0 {
                context.set_line_width(path.stroke_width);
                context
                    .stroke_preserve()
                    .map_err(|err| map_backend_error("failed to stroke path", err))?;
            }
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill path", err))?;
            stats.paths_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description =
                FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y - f64::from(text_height) / 2.0);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn attach(&mut self, viewport: Viewport) -> ChartResult<()> {
        let width = i32::try_from(viewport.width).map_err(|_| ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })?;
        let height = i32::try_from(viewport.height).map_err(|_| ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })?;
        self.surface = create_surface(width, height)?;
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn create_surface(width: i32, height: i32) -> ChartResult<ImageSurface> {
    if width <= 0 || height <= 0 {
        return Err(ChartError::InvalidViewport {
            width: width.max(0).unsigned_abs(),
            height: height.max(0).unsigned_abs(),
        });
    }
    ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_paint(context: &Context, paint: Paint) -> ChartResult<()> {
    match paint {
        Paint::Solid(color) => apply_color(context, color),
        Paint::LinearGradient {
            x0,
            y0,
            x1,
            y1,
            from,
            to,
        } => {
            let gradient = LinearGradient::new(x0, y0, x1, y1);
            gradient.add_color_stop_rgba(0.0, from.red, from.green, from.blue, from.alpha);
            gradient.add_color_stop_rgba(1.0, to.red, to.green, to.blue, to.alpha);
            context
                .set_source(&gradient)
                .map_err(|err| map_backend_error("failed to set gradient source", err))?;
        }
    }
    Ok(())
}

/// Replays the outline; cairo has no quadratic primitive so each quad is
/// raised to the equivalent cubic.
fn append_path(context: &Context, path: &PathPrimitive) {
    context.new_path();
    let (mut cursor_x, mut cursor_y) = (0.0, 0.0);
    for command in &path.commands {
        match *command {
            PathCommand::MoveTo { x, y } => {
                context.move_to(x, y);
                (cursor_x, cursor_y) = (x, y);
            }
            PathCommand::LineTo { x, y } => {
                context.line_to(x, y);
                (cursor_x, cursor_y) = (x, y);
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                let c1x = cursor_x + 2.0 / 3.0 * (cx - cursor_x);
                let c1y = cursor_y + 2.0 / 3.0 * (cy - cursor_y);
                let c2x = x + 2.0 / 3.0 * (cx - x);
                let c2y = y + 2.0 / 3.0 * (cy - y);
                context.curve_to(c1x, c1y, c2x, c2y, x, y);
                (cursor_x, cursor_y) = (x, y);
            }
            PathCommand::Close => context.close_path(),
        }
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
