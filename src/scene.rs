//! Display state: what is on screen and how it is styled.
//!
//! Colors are packed `0xRRGGBB` so they drop straight into the minifb
//! framebuffer.

use crate::dataset::{Dataset, Point3};

pub const RED: u32 = 0xFF6347;
pub const BLUE: u32 = 0x4682B4;
pub const GREEN: u32 = 0x32CD32;
pub const YELLOW: u32 = 0xFFD700;
pub const GRAY: u32 = 0x808080;
pub const WHITE: u32 = 0xFFFFFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    Viridis,
    Plasma,
}

impl Colormap {
    fn stops(self) -> [(f64, f64, f64); 5] {
        match self {
            Colormap::Viridis => [
                (68.0, 1.0, 84.0),
                (59.0, 82.0, 139.0),
                (33.0, 145.0, 140.0),
                (94.0, 201.0, 98.0),
                (253.0, 231.0, 37.0),
            ],
            Colormap::Plasma => [
                (13.0, 8.0, 135.0),
                (126.0, 3.0, 168.0),
                (204.0, 71.0, 120.0),
                (248.0, 149.0, 64.0),
                (240.0, 249.0, 33.0),
            ],
        }
    }

    /// Map `t` in [0, 1] onto the ramp. Out-of-range input is clamped.
    pub fn color(self, t: f64) -> u32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let stops = self.stops();
        let scaled = t * 4.0;
        let i = (scaled.floor() as usize).min(3);
        let s = scaled - i as f64;
        let (r0, g0, b0) = stops[i];
        let (r1, g1, b1) = stops[i + 1];
        rgb(r0 + (r1 - r0) * s, g0 + (g1 - g0) * s, b0 + (b1 - b0) * s)
    }
}

pub fn rgb(r: f64, g: f64, b: f64) -> u32 {
    let c = |v: f64| v.round().clamp(0.0, 255.0) as u32;
    (c(r) << 16) | (c(g) << 8) | c(b)
}

/// How world coordinates reach the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// x/y plot; z ignored.
    Plane { log_x: bool },
    /// Oblique 3D view, angles in radians.
    Oblique { azimuth: f64, elevation: f64 },
}

impl Projection {
    pub fn default_3d() -> Self {
        Projection::Oblique { azimuth: -0.6, elevation: -1.1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Limits {
    Auto,
    Fixed { lo: Point3, hi: Point3 },
}

impl Limits {
    pub fn cube(half: f64) -> Self {
        Limits::Fixed { lo: [-half; 3], hi: [half; 3] }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub title: String,
    pub axis_labels: [String; 3],
    pub colormap: Colormap,
    pub projection: Projection,
    pub limits: Limits,
    /// Range fed to the colormap; `None` uses the min/max of each layer.
    pub value_range: Option<(f64, f64)>,
}

impl Style {
    pub fn new(title: impl Into<String>) -> Self {
        Style {
            title: title.into(),
            axis_labels: ["x".into(), "y".into(), "z".into()],
            colormap: Colormap::Viridis,
            projection: Projection::default_3d(),
            limits: Limits::Auto,
            value_range: None,
        }
    }

    pub fn labels(mut self, x: &str, y: &str, z: &str) -> Self {
        self.axis_labels = [x.to_string(), y.to_string(), z.to_string()];
        self
    }

    pub fn plane(mut self) -> Self {
        self.projection = Projection::Plane { log_x: false };
        self
    }

    pub fn log_x(mut self) -> Self {
        self.projection = Projection::Plane { log_x: true };
        self
    }

    pub fn colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn value_range(mut self, lo: f64, hi: f64) -> Self {
        self.value_range = Some((lo, hi));
        self
    }
}

/// The currently displayed dataset, its style, and the status lines shown in
/// the overlay. Replaced wholesale by every render.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub dataset: Dataset,
    pub style: Style,
    pub status: Vec<String>,
    pub revision: u64,
}

impl SceneState {
    /// Resolve the limits actually used for drawing.
    pub fn bounds(&self) -> (Point3, Point3) {
        match self.style.limits {
            Limits::Fixed { lo, hi } => (lo, hi),
            Limits::Auto => self
                .dataset
                .bounds()
                .unwrap_or(([-1.0; 3], [1.0; 3])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colormap_hits_its_stops() {
        assert_eq!(Colormap::Viridis.color(0.0), 0x440154);
        assert_eq!(Colormap::Viridis.color(1.0), 0xFDE725);
        assert_eq!(Colormap::Plasma.color(0.0), 0x0D0887);
    }

    #[test]
    fn colormap_clamps_and_survives_nan() {
        assert_eq!(Colormap::Plasma.color(-3.0), Colormap::Plasma.color(0.0));
        assert_eq!(Colormap::Plasma.color(7.0), Colormap::Plasma.color(1.0));
        assert_eq!(Colormap::Viridis.color(f64::NAN), Colormap::Viridis.color(0.0));
    }

    #[test]
    fn fixed_limits_override_data() {
        let scene = SceneState {
            dataset: Dataset::new(),
            style: Style::new("t").limits(Limits::cube(2.0)),
            status: vec![],
            revision: 0,
        };
        assert_eq!(scene.bounds(), ([-2.0; 3], [2.0; 3]));
    }
}
