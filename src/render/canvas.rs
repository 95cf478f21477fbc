//! Half-block pixel canvas for the terminal.
//!
//! Each terminal cell shows two vertically stacked pixels using `▀` with the
//! upper pixel as foreground and the lower as background, which makes pixels
//! roughly square. The logical 400×600 play area is scaled uniformly to fit
//! the cell grid and centered; the remaining margin is letterboxed.
//!
//! Text is not rasterized. It is kept as labels and written over the pixel
//! cells as real characters when the canvas is rendered as a widget.

use super::surface::{Ellipse, LogicalRect, Paint, Rgba, Surface, TextStyle};
use crate::core::constants::{GAME_HEIGHT, GAME_WIDTH};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use std::ops::Range;

const UPPER_HALF: char = '▀';

/// Color of the area outside the play field.
pub const LETTERBOX: Rgba = Rgba::rgb(0, 0, 0);

/// Text placed on the cell grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone)]
pub struct PixelCanvas {
    cols: u16,
    rows: u16,
    /// Pixel grid dimensions (`height = rows * 2`).
    width: usize,
    height: usize,
    /// Pixels per logical unit.
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    pixels: Vec<Rgba>,
    labels: Vec<Label>,
}

impl PixelCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            width: 0,
            height: 0,
            scale: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            pixels: Vec::new(),
            labels: Vec::new(),
        };
        canvas.reset(cols, rows);
        canvas
    }

    /// Clear to letterbox and refit the play area to `cols × rows` cells.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.width = cols as usize;
        self.height = rows as usize * 2;

        self.scale = (self.width as f64 / GAME_WIDTH).min(self.height as f64 / GAME_HEIGHT);
        self.offset_x = (self.width as f64 - GAME_WIDTH * self.scale) / 2.0;
        self.offset_y = (self.height as f64 - GAME_HEIGHT * self.scale) / 2.0;

        self.pixels.clear();
        self.pixels.resize(self.width * self.height, LETTERBOX);
        self.labels.clear();
    }

    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Pixel color, or letterbox when out of range.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            LETTERBOX
        }
    }

    /// Pixel that contains the logical point, if it is on the grid.
    pub fn pixel_at_logical(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let (px, py) = self.to_pixel(x, y);
        if px < 0.0 || py < 0.0 {
            return None;
        }
        let (px, py) = (px.floor() as usize, py.floor() as usize);
        (px < self.width && py < self.height).then_some((px, py))
    }

    fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }

    fn to_logical(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.offset_x) / self.scale, (py - self.offset_y) / self.scale)
    }

    /// Smallest logical length that still covers one pixel.
    fn min_line_width(&self) -> f64 {
        if self.scale > 0.0 {
            1.0 / self.scale
        } else {
            0.0
        }
    }

    /// Pixel ranges covering `bounds`, clipped to the play field.
    fn pixel_span(&self, bounds: LogicalRect) -> Option<(Range<usize>, Range<usize>)> {
        if self.scale <= 0.0 {
            return None;
        }
        let x0 = bounds.x.max(0.0);
        let y0 = bounds.y.max(0.0);
        let x1 = (bounds.x + bounds.width).min(GAME_WIDTH);
        let y1 = (bounds.y + bounds.height).min(GAME_HEIGHT);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let (px0, py0) = self.to_pixel(x0, y0);
        let (px1, py1) = self.to_pixel(x1, y1);
        let clamp_x = |v: f64| (v.max(0.0) as usize).min(self.width);
        let clamp_y = |v: f64| (v.max(0.0) as usize).min(self.height);
        Some((
            clamp_x(px0.floor())..clamp_x(px1.ceil()),
            clamp_y(py0.floor())..clamp_y(py1.ceil()),
        ))
    }

    /// Blend `shade(x, y)` into every pixel of `bounds` whose center it
    /// accepts. `shade` receives the logical coordinates of the center.
    fn fill_where(&mut self, bounds: LogicalRect, shade: impl Fn(f64, f64) -> Option<Rgba>) {
        let Some((xs, ys)) = self.pixel_span(bounds) else {
            return;
        };
        for py in ys {
            for px in xs.clone() {
                let (lx, ly) = self.to_logical(px as f64 + 0.5, py as f64 + 0.5);
                if !(0.0..GAME_WIDTH).contains(&lx) || !(0.0..GAME_HEIGHT).contains(&ly) {
                    continue;
                }
                if let Some(color) = shade(lx, ly) {
                    let idx = py * self.width + px;
                    self.pixels[idx] = if color.is_opaque() {
                        color
                    } else {
                        color.over(self.pixels[idx])
                    };
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn fill_rect(&mut self, rect: LogicalRect, paint: &Paint) {
        self.fill_where(rect, |x, y| rect.contains(x, y).then(|| paint.color_at(x, y)));
    }

    fn stroke_rect(&mut self, rect: LogicalRect, color: Rgba, line_width: f64) {
        let half = line_width.max(self.min_line_width()) / 2.0;
        let outer = LogicalRect::new(
            rect.x - half,
            rect.y - half,
            rect.width + half * 2.0,
            rect.height + half * 2.0,
        );
        let inner = LogicalRect::new(
            rect.x + half,
            rect.y + half,
            (rect.width - half * 2.0).max(0.0),
            (rect.height - half * 2.0).max(0.0),
        );
        self.fill_where(outer, |x, y| {
            (outer.contains(x, y) && !inner.contains(x, y)).then_some(color)
        });
    }

    fn fill_ellipse(&mut self, ellipse: Ellipse, color: Rgba) {
        self.fill_where(ellipse.bounds(), |x, y| {
            (ellipse.norm_distance(x, y) <= 1.0).then_some(color)
        });
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Rgba, line_width: f64) {
        let half = line_width.max(self.min_line_width()) / 2.0;
        let outer = Ellipse {
            rx: ellipse.rx + half,
            ry: ellipse.ry + half,
            ..ellipse
        };
        let inner = Ellipse {
            rx: (ellipse.rx - half).max(0.0),
            ry: (ellipse.ry - half).max(0.0),
            ..ellipse
        };
        self.fill_where(outer.bounds(), |x, y| {
            (outer.norm_distance(x, y) <= 1.0 && inner.norm_distance(x, y) > 1.0)
                .then_some(color)
        });
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let bounds = LogicalRect::new(min_x, min_y, max_x - min_x, max_y - min_y);
        self.fill_where(bounds, |x, y| point_in_polygon(points, x, y).then_some(color));
    }

    fn text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        if self.scale <= 0.0 || text.is_empty() {
            return;
        }
        // Baseline to visual middle of the glyphs
        let (px, py) = self.to_pixel(x, y - style.size * 0.35);
        if py < 0.0 {
            return;
        }
        let row = (py / 2.0).floor() as usize;
        if row >= self.rows as usize {
            return;
        }
        let len = text.chars().count() as f64;
        let col = (px - len / 2.0).round().max(0.0) as u16;
        self.labels.push(Label {
            col,
            row: row as u16,
            text: text.to_string(),
            style,
        });
    }
}

/// Even-odd point-in-polygon test. Fewer than three points enclose nothing.
pub fn point_in_polygon(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Widget for &PixelCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);

        for row in 0..rows {
            for col in 0..cols {
                let top = self.pixel(col as usize, row as usize * 2);
                let bottom = self.pixel(col as usize, row as usize * 2 + 1);
                buf.get_mut(area.x + col, area.y + row)
                    .set_char(UPPER_HALF)
                    .set_fg(top.into())
                    .set_bg(bottom.into());
            }
        }

        for label in &self.labels {
            if label.row >= rows {
                continue;
            }
            let mut style = Style::default().fg(label.style.color.into());
            if label.style.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            for (i, ch) in label.text.chars().enumerate() {
                let col = label.col as usize + i;
                if col >= cols as usize {
                    break;
                }
                // Outline color becomes a backing plate; otherwise show the scene
                let bg = label.style.outline.unwrap_or_else(|| {
                    let top = self.pixel(col, label.row as usize * 2);
                    let bottom = self.pixel(col, label.row as usize * 2 + 1);
                    top.lerp(bottom, 0.5)
                });
                buf.get_mut(area.x + col as u16, area.y + label.row)
                    .set_char(ch)
                    .set_style(style.bg(bg.into()));
            }
        }
    }
}
