//! Drawing surface abstraction.
//!
//! All commands take logical coordinates on the fixed 400×600 play area.
//! Backends decide how those map to real output.

use ratatui::style::Color;

/// An RGB color with 8-bit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Same color with opacity `alpha` in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Source-over blend of `self` onto an opaque `dst`.
    pub fn over(self, dst: Rgba) -> Rgba {
        let alpha = self.a as f64 / 255.0;
        let mix = |src: u8, dst: u8| (src as f64 * alpha + dst as f64 * (1.0 - alpha)).round() as u8;
        Rgba::rgb(
            mix(self.r, dst.r),
            mix(self.g, dst.g),
            mix(self.b, dst.b),
        )
    }

    /// Linear interpolation between two colors, `t` in `0.0..=1.0`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Linear gradient between two points with sorted color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// `(offset, color)` pairs, offsets ascending in `0.0..=1.0`.
    pub stops: Vec<(f64, Rgba)>,
}

impl LinearGradient {
    pub fn new(start: (f64, f64), end: (f64, f64), stops: &[(f64, Rgba)]) -> Self {
        Self {
            start,
            end,
            stops: stops.to_vec(),
        }
    }

    /// Color at logical point `(x, y)`, projected onto the gradient axis and
    /// clamped to the end stops.
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq > 0.0 {
            (((x - self.start.0) * dx + (y - self.start.1) * dy) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let Some(&(first_offset, first_color)) = self.stops.first() else {
            return Rgba::BLACK;
        };
        if t <= first_offset {
            return first_color;
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                let local = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return c0.lerp(c1, local);
            }
        }
        self.stops.last().map(|&(_, c)| c).unwrap_or(first_color)
    }
}

/// Fill style for area commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

impl Paint {
    pub fn color_at(&self, x: f64, y: f64) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(gradient) => gradient.color_at(x, y),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

/// Axis-aligned rectangle in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogicalRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Ellipse, optionally rotated (radians, clockwise in screen space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

impl Ellipse {
    pub const fn new(cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64) -> Self {
        Self {
            cx,
            cy,
            rx,
            ry,
            rotation,
        }
    }

    pub const fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Self::new(cx, cy, r, r, 0.0)
    }

    /// Normalized distance from the center: `<= 1.0` inside the ellipse.
    pub fn norm_distance(&self, x: f64, y: f64) -> f64 {
        let (dx, dy) = (x - self.cx, y - self.cy);
        let (sin, cos) = self.rotation.sin_cos();
        // Undo the rotation to work in the ellipse's own axes
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return f64::INFINITY;
        }
        ((u / self.rx).powi(2) + (v / self.ry).powi(2)).sqrt()
    }

    /// Bounding square that contains the ellipse at any rotation.
    pub fn bounds(&self) -> LogicalRect {
        let r = self.rx.max(self.ry);
        LogicalRect::new(self.cx - r, self.cy - r, r * 2.0, r * 2.0)
    }
}

/// Text styling. `size` is the nominal font height in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    pub size: f64,
    pub bold: bool,
    pub outline: Option<Rgba>,
}

impl TextStyle {
    pub const fn new(color: Rgba, size: f64) -> Self {
        Self {
            color,
            size,
            bold: true,
            outline: None,
        }
    }

    pub const fn outlined(self, outline: Rgba) -> Self {
        Self {
            outline: Some(outline),
            ..self
        }
    }
}

/// A 2D drawing target in logical coordinates.
pub trait Surface {
    fn fill_rect(&mut self, rect: LogicalRect, paint: &Paint);

    fn stroke_rect(&mut self, rect: LogicalRect, color: Rgba, line_width: f64);

    fn fill_ellipse(&mut self, ellipse: Ellipse, color: Rgba);

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Rgba, line_width: f64);

    /// Filled closed polygon (even-odd rule).
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba);

    /// Text centered horizontally on `x` with its baseline at `y`.
    fn text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
}

/// One recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect(LogicalRect, Paint),
    StrokeRect(LogicalRect, Rgba, f64),
    FillEllipse(Ellipse, Rgba),
    StrokeEllipse(Ellipse, Rgba, f64),
    FillPolygon(Vec<(f64, f64)>, Rgba),
    Text {
        text: String,
        x: f64,
        y: f64,
        style: TextStyle,
    },
}

/// Surface that records commands instead of drawing them. Used for
/// headless runs and for inspecting what a frame drew.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: LogicalRect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect(rect, paint.clone()));
    }

    fn stroke_rect(&mut self, rect: LogicalRect, color: Rgba, line_width: f64) {
        self.commands
            .push(DrawCommand::StrokeRect(rect, color, line_width));
    }

    fn fill_ellipse(&mut self, ellipse: Ellipse, color: Rgba) {
        self.commands.push(DrawCommand::FillEllipse(ellipse, color));
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Rgba, line_width: f64) {
        self.commands
            .push(DrawCommand::StrokeEllipse(ellipse, color, line_width));
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba) {
        self.commands
            .push(DrawCommand::FillPolygon(points.to_vec(), color));
    }

    fn text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}
