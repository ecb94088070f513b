// Software rasterizer for scenes.
// Everything is drawn into a packed 0xRRGGBB buffer that minifb can present
// directly and `image` can write out as PNG.

use std::path::Path;

use crate::dataset::{Layer, Point3};
use crate::error::Result;
use crate::math::rotate_view;
use crate::scene::{Projection, SceneState, GRAY, WHITE};

const MARGIN_LEFT: usize = 60;
const MARGIN_RIGHT: usize = 20;
const MARGIN_TOP: usize = 40;
const MARGIN_BOTTOM: usize = 60;
const PANEL_COLOR: u32 = 0xC8C8C8;
const HIGHLIGHT: u32 = 0xFFD700;

pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub buffer: Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, buffer: vec![0; width * height] }
    }

    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
    }

    fn put(&mut self, x: i64, y: i64, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }

    /// Bresenham line. Endpoints may lie off-canvas; only visible pixels are
    /// written.
    pub fn line(&mut self, (x0, y0): (f64, f64), (x1, y1): (f64, f64), color: u32) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let limit = 4.0 * (self.width + self.height) as f64;
        if x0.abs().max(y0.abs()).max(x1.abs()).max(y1.abs()) > limit {
            return;
        }

        let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
        let (xe, ye) = (x1.round() as i64, y1.round() as i64);
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x, y, color);
            if x == xe && y == ye {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn disc(&mut self, (cx, cy): (f64, f64), radius: usize, color: u32) {
        if !(cx.is_finite() && cy.is_finite()) {
            return;
        }
        let (cx, cy) = (cx.round() as i64, cy.round() as i64);
        let r = radius as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: u32) {
        let (xa, xb) = (x0.min(x1).round() as i64, x0.max(x1).round() as i64);
        let (ya, yb) = (y0.min(y1).round() as i64, y0.max(y1).round() as i64);
        let xa = xa.max(0);
        let ya = ya.max(0);
        let xb = xb.min(self.width as i64 - 1);
        let yb = yb.min(self.height as i64 - 1);
        for y in ya..=yb {
            for x in xa..=xb {
                self.put(x, y, color);
            }
        }
    }

    // Simple 3x5 pixel font, drawn at `scale`
    pub fn text(&mut self, x: usize, y: usize, text: &str, color: u32, scale: usize) {
        let mut offset_x = x;
        for ch in text.chars() {
            if offset_x + 4 * scale >= self.width {
                break;
            }
            self.glyph(offset_x, y, ch, color, scale);
            offset_x += 4 * scale;
        }
    }

    fn glyph(&mut self, x: usize, y: usize, ch: char, color: u32, scale: usize) {
        let pattern = glyph_rows(ch.to_ascii_lowercase());
        for (dy, &row) in pattern.iter().enumerate() {
            for dx in 0..3 {
                if row & (1 << (2 - dx)) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        self.put(
                            (x + dx * scale + sx) as i64,
                            (y + dy * scale + sy) as i64,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Write the framebuffer as an RGB PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let img = image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.buffer[y as usize * self.width + x as usize];
            image::Rgb([(c >> 16) as u8, (c >> 8) as u8, c as u8])
        });
        img.save(path)?;
        Ok(())
    }
}

fn glyph_rows(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        'a' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'n' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'o' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'w' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'x' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        _ => [0b000, 0b000, 0b000, 0b000, 0b000],
    }
}

/// Overlay text owned by the harness rather than the dataset: the control
/// list and which entry has keyboard focus.
#[derive(Clone, Debug, Default)]
pub struct Overlay {
    pub controls: Vec<String>,
    pub focused: Option<usize>,
}

/// Maps world coordinates onto the plot rectangle for one frame.
struct Viewport {
    projection: Projection,
    lo: Point3,
    hi: Point3,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    fn new(scene: &SceneState, canvas: &Canvas) -> Self {
        let (mut lo, mut hi) = scene.bounds();
        if let Projection::Plane { log_x: true } = scene.style.projection {
            lo[0] = log_coord(lo[0]);
            hi[0] = log_coord(hi[0]);
        }
        for i in 0..3 {
            if hi[i] - lo[i] < 1e-12 {
                lo[i] -= 1.0;
                hi[i] += 1.0;
            }
        }
        Viewport {
            projection: scene.style.projection,
            lo,
            hi,
            left: MARGIN_LEFT as f64,
            top: MARGIN_TOP as f64,
            width: canvas.width.saturating_sub(MARGIN_LEFT + MARGIN_RIGHT).max(1) as f64,
            height: canvas.height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM).max(1) as f64,
        }
    }

    fn project(&self, p: Point3) -> (f64, f64) {
        match self.projection {
            Projection::Plane { log_x } => {
                let x = if log_x { log_coord(p[0]) } else { p[0] };
                let u = (x - self.lo[0]) / (self.hi[0] - self.lo[0]);
                let v = (p[1] - self.lo[1]) / (self.hi[1] - self.lo[1]);
                (self.left + u * self.width, self.top + (1.0 - v) * self.height)
            }
            Projection::Oblique { azimuth, elevation } => {
                let mut n = [0.0; 3];
                for i in 0..3 {
                    let mid = (self.hi[i] + self.lo[i]) / 2.0;
                    let half = (self.hi[i] - self.lo[i]) / 2.0;
                    n[i] = (p[i] - mid) / half;
                }
                let r = rotate_view(n, azimuth, elevation);
                let scale = self.width.min(self.height) / 2.0 / 1.8;
                let cx = self.left + self.width / 2.0;
                let cy = self.top + self.height / 2.0;
                (cx + r[0] * scale, cy - r[1] * scale)
            }
        }
    }

    fn frame(&self, canvas: &mut Canvas) {
        match self.projection {
            Projection::Plane { .. } => {
                let (l, t) = (self.left, self.top);
                let (r, b) = (l + self.width, t + self.height);
                canvas.line((l, t), (l, b), GRAY);
                canvas.line((l, b), (r, b), GRAY);
            }
            Projection::Oblique { .. } => {
                let (lo, hi) = (self.lo, self.hi);
                let corner = |i: usize| -> Point3 {
                    [
                        if i & 1 == 0 { lo[0] } else { hi[0] },
                        if i & 2 == 0 { lo[1] } else { hi[1] },
                        if i & 4 == 0 { lo[2] } else { hi[2] },
                    ]
                };
                for i in 0..8usize {
                    for bit in [1usize, 2, 4] {
                        let j = i | bit;
                        if j != i {
                            canvas.line(self.project(corner(i)), self.project(corner(j)), 0x303840);
                        }
                    }
                }
            }
        }
    }
}

fn log_coord(x: f64) -> f64 {
    x.max(1e-9).log10()
}

fn value_colors(values: &[f64], scene: &SceneState) -> Vec<u32> {
    let (lo, hi) = scene.style.value_range.unwrap_or_else(|| {
        values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    });
    let span = hi - lo;
    values
        .iter()
        .map(|&v| {
            let t = if span.abs() < 1e-12 { 0.5 } else { (v - lo) / span };
            scene.style.colormap.color(t)
        })
        .collect()
}

fn item_color(colors: &Option<Vec<u32>>, i: usize, fallback: u32) -> u32 {
    colors.as_ref().and_then(|c| c.get(i).copied()).unwrap_or(fallback)
}

/// Draw a scene plus its overlay into the canvas, replacing what was there.
pub fn render_scene(canvas: &mut Canvas, scene: &SceneState, overlay: &Overlay, background: u32, point_radius: usize) {
    canvas.clear(background);
    let view = Viewport::new(scene, canvas);
    view.frame(canvas);

    for layer in &scene.dataset.layers {
        draw_layer(canvas, &view, scene, layer, point_radius);
    }

    canvas.text(10, 10, &scene.style.title, WHITE, 2);
    let [xl, yl, zl] = &scene.style.axis_labels;
    let axes = match scene.style.projection {
        Projection::Plane { .. } => format!("x: {}   y: {}", xl, yl),
        Projection::Oblique { .. } => format!("x: {}   y: {}   z: {}", xl, yl, zl),
    };
    canvas.text(10, canvas.height.saturating_sub(20), &axes, GRAY, 1);

    let mut y = canvas.height.saturating_sub(20 + 10 * scene.status.len());
    for line in &scene.status {
        canvas.text(10, y, line, PANEL_COLOR, 1);
        y += 10;
    }

    let panel_x = canvas.width.saturating_sub(200);
    for (i, control) in overlay.controls.iter().enumerate() {
        let color = if overlay.focused == Some(i) { HIGHLIGHT } else { PANEL_COLOR };
        let marker = if overlay.focused == Some(i) { "> " } else { "  " };
        canvas.text(panel_x, 30 + i * 10, &format!("{}{}", marker, control), color, 1);
    }
}

fn draw_layer(canvas: &mut Canvas, view: &Viewport, scene: &SceneState, layer: &Layer, point_radius: usize) {
    match layer {
        Layer::Scatter { points, values, color, .. } => {
            let colors = values.as_deref().map(|v| value_colors(v, scene));
            for (i, p) in points.iter().enumerate() {
                canvas.disc(view.project(*p), point_radius, item_color(&colors, i, *color));
            }
        }
        Layer::Segments { segments, values, color, .. } => {
            let colors = values.as_deref().map(|v| value_colors(v, scene));
            for (i, (a, b)) in segments.iter().enumerate() {
                canvas.line(view.project(*a), view.project(*b), item_color(&colors, i, *color));
            }
        }
        Layer::Polyline { points, color, .. } => {
            for pair in points.windows(2) {
                canvas.line(view.project(pair[0]), view.project(pair[1]), *color);
            }
        }
        Layer::Surface { grid, rows, cols, color } => {
            if grid.len() < rows * cols || *rows == 0 || *cols == 0 {
                return;
            }
            let row_step = (rows / 25).max(1);
            let col_step = (cols / 25).max(1);
            for r in (0..*rows).step_by(row_step) {
                for c in 1..*cols {
                    let a = grid[r * cols + c - 1];
                    let b = grid[r * cols + c];
                    canvas.line(view.project(a), view.project(b), *color);
                }
            }
            for c in (0..*cols).step_by(col_step) {
                for r in 1..*rows {
                    let a = grid[(r - 1) * cols + c];
                    let b = grid[r * cols + c];
                    canvas.line(view.project(a), view.project(b), *color);
                }
            }
        }
        Layer::Bars { bars, color, .. } => {
            for &(x0, x1, h) in bars {
                let (sx0, sy0) = view.project([x0, 0.0, 0.0]);
                let (sx1, sy1) = view.project([x1, h, 0.0]);
                match view.projection {
                    Projection::Plane { .. } => canvas.fill_rect(sx0, sy0, sx1, sy1, *color),
                    Projection::Oblique { .. } => {
                        canvas.line((sx0, sy0), (sx0, sy1), *color);
                        canvas.line((sx0, sy1), (sx1, sy1), *color);
                        canvas.line((sx1, sy1), (sx1, sy0), *color);
                    }
                }
            }
        }
    }
}

/// Packed colors for the four-color palette, indexed by color number.
pub fn palette_color(index: usize) -> u32 {
    use crate::scene::{BLUE, GREEN, RED, YELLOW};
    [RED, BLUE, GREEN, YELLOW][index % 4]
}
