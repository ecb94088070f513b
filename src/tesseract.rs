//! The 4D hypercube: vertices from bit patterns, edges from Hamming
//! distance, and three ways of looking at it in 3D.

use std::f64::consts::PI;

use crate::dataset::{Dataset, Layer, Point3};
use crate::harness::{Demo, ParameterSet};
use crate::scene::{Colormap, Limits, Style, BLUE};

pub type Vertex4 = [f64; 4];

pub const VERTEX_COUNT: usize = 16;
/// Frames in one full W-X rotation.
pub const ROTATION_FRAMES: u64 = 100;

/// Vertex `i` takes coordinate `j` from bit `j` of `i`, mapped 0 -> -1 and
/// 1 -> +1.
pub fn tesseract_vertices() -> [Vertex4; VERTEX_COUNT] {
    let mut vertices = [[0.0; 4]; VERTEX_COUNT];
    for (i, vertex) in vertices.iter_mut().enumerate() {
        for (j, coord) in vertex.iter_mut().enumerate() {
            *coord = if (i >> j) & 1 == 1 { 1.0 } else { -1.0 };
        }
    }
    vertices
}

/// Index pairs `(i, j)`, `i < j`, whose bit patterns differ in exactly one
/// position.
pub fn tesseract_edges() -> Vec<(usize, usize)> {
    let mut edges = Vec::with_capacity(32);
    for i in 0..VERTEX_COUNT {
        for j in (i + 1)..VERTEX_COUNT {
            if (i ^ j).count_ones() == 1 {
                edges.push((i, j));
            }
        }
    }
    edges
}

/// Rotate in the W-X plane, treating each vertex as a row vector: `v · R`.
pub fn rotate_wx(vertices: &[Vertex4], angle: f64) -> Vec<Vertex4> {
    let (s, c) = angle.sin_cos();
    vertices
        .iter()
        .map(|v| [c * v[0] - s * v[3], v[1], v[2], s * v[0] + c * v[3]])
        .collect()
}

/// Orthographic 4D -> 3D: drop W.
pub fn drop_w(v: &Vertex4) -> Point3 {
    [v[0], v[1], v[2]]
}

/// W in [-1, 1] normalized to [0, 1] for color mapping.
pub fn w_color(v: &Vertex4) -> f64 {
    (v[3] + 1.0) / 2.0
}

pub fn rotation_angle(frame: u64) -> f64 {
    frame as f64 * PI / 50.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TesseractView {
    /// Plain projection, uniform color.
    Projection,
    /// W mapped onto viridis for vertices and edge midpoints.
    WAsColor,
    /// Looping W-X rotation.
    Rotation,
}

pub struct TesseractDemo {
    view: TesseractView,
}

impl TesseractDemo {
    pub fn new(view: TesseractView) -> Self {
        TesseractDemo { view }
    }
}

impl Demo for TesseractDemo {
    fn title(&self) -> &str {
        match self.view {
            TesseractView::Projection => "3D Projection of a Tesseract (4D Hypercube)",
            TesseractView::WAsColor => "Tesseract with Color Representing the 4th Dimension (W)",
            TesseractView::Rotation => "Tesseract Rotating in the W-X Plane",
        }
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let base = tesseract_vertices();
        let vertices = match self.view {
            TesseractView::Rotation => rotate_wx(&base, rotation_angle(params.counter("frame"))),
            _ => base.to_vec(),
        };
        let edges = tesseract_edges();
        let points: Vec<Point3> = vertices.iter().map(drop_w).collect();
        let segments = edges.iter().map(|&(i, j)| (points[i], points[j])).collect();

        let (vertex_values, edge_values) = match self.view {
            TesseractView::WAsColor => {
                let colors: Vec<f64> = vertices.iter().map(w_color).collect();
                let edge_colors = edges.iter().map(|&(i, j)| (colors[i] + colors[j]) / 2.0).collect();
                (Some(colors), Some(edge_colors))
            }
            _ => (None, None),
        };

        Dataset::new()
            .with(Layer::Segments { segments, values: edge_values, color: BLUE, label: "edges".into() })
            .with(Layer::Scatter { points, values: vertex_values, color: BLUE, label: "vertices".into() })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        let style = Style::new(self.title()).labels("x", "y", "z");
        match self.view {
            TesseractView::Projection => style.limits(Limits::cube(1.5)),
            TesseractView::WAsColor => style
                .colormap(Colormap::Viridis)
                .value_range(0.0, 1.0)
                .limits(Limits::cube(1.5)),
            TesseractView::Rotation => style.limits(Limits::cube(2.0)),
        }
    }

    fn frames(&self) -> Option<u64> {
        (self.view == TesseractView::Rotation).then_some(ROTATION_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use crate::harness::{Event, Harness};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn sixteen_distinct_unit_vertices() {
        let vertices = tesseract_vertices();
        assert!(vertices.iter().flatten().all(|&c| c == 1.0 || c == -1.0));
        let distinct: HashSet<[i8; 4]> = vertices
            .iter()
            .map(|v| [v[0] as i8, v[1] as i8, v[2] as i8, v[3] as i8])
            .collect();
        assert_eq!(distinct.len(), 16);
    }

    #[test]
    fn thirty_two_unit_edges() {
        let vertices = tesseract_vertices();
        let edges = tesseract_edges();
        assert_eq!(edges.len(), 32);
        for (i, j) in edges {
            assert!(i < j);
            let differing = (0..4).filter(|&k| vertices[i][k] != vertices[j][k]).count();
            assert_eq!(differing, 1);
        }
    }

    #[test]
    fn every_vertex_has_degree_four() {
        let mut degree = [0; 16];
        for (i, j) in tesseract_edges() {
            degree[i] += 1;
            degree[j] += 1;
        }
        assert!(degree.iter().all(|&d| d == 4));
    }

    #[test]
    fn w_color_spans_unit_interval() {
        let vertices = tesseract_vertices();
        assert_eq!(w_color(&vertices[0]), 0.0);
        assert_eq!(w_color(&vertices[8]), 1.0);
    }

    #[test]
    fn half_turn_maps_x_to_minus_x() {
        let rotated = rotate_wx(&tesseract_vertices(), rotation_angle(50));
        let base = tesseract_vertices();
        for (r, b) in rotated.iter().zip(base.iter()) {
            assert!((r[0] + b[0]).abs() < 1e-12);
            assert!((r[3] + b[3]).abs() < 1e-12);
            assert_eq!(r[1], b[1]);
        }
    }

    #[test]
    fn rotation_demo_loops_over_frames() {
        let demo = TesseractDemo::new(TesseractView::Rotation);
        assert_eq!(demo.frames(), Some(ROTATION_FRAMES));
        assert_eq!(TesseractDemo::new(TesseractView::Projection).frames(), None);

        let ds = demo.generate(&ParameterSet::new().with_counter("frame", 0));
        let base = TesseractDemo::new(TesseractView::Projection).generate(&ParameterSet::new());
        assert_eq!(ds.layers[1], base.layers[1]);
    }

    #[test]
    fn ticks_wrap_after_a_full_turn() {
        let mut harness = Harness::new(Box::new(TesseractDemo::new(TesseractView::Rotation)));
        let first = harness.dataset().clone();

        harness.handle(Event::Tick).unwrap();
        assert_ne!(harness.dataset(), &first);
        for _ in 1..ROTATION_FRAMES {
            harness.handle(Event::Tick).unwrap();
        }
        assert_eq!(harness.params().counter("frame"), 0);
        assert_eq!(harness.dataset(), &first);
    }

    #[test]
    fn static_views_reject_ticks() {
        let mut harness = Harness::new(Box::new(TesseractDemo::new(TesseractView::Projection)));
        let before = harness.scene().clone();
        assert_eq!(harness.handle(Event::Tick), Err(HarnessError::Unsupported("animation")));
        assert_eq!(harness.scene(), &before);
    }

    #[test]
    fn color_view_attaches_values() {
        let ds = TesseractDemo::new(TesseractView::WAsColor).generate(&ParameterSet::new());
        match &ds.layers[0] {
            Layer::Segments { values: Some(v), .. } => assert_eq!(v.len(), 32),
            other => panic!("unexpected layer {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn rotation_preserves_norms(angle in -10.0f64..10.0) {
            for (r, b) in rotate_wx(&tesseract_vertices(), angle).iter().zip(tesseract_vertices().iter()) {
                let nr: f64 = r.iter().map(|c| c * c).sum();
                let nb: f64 = b.iter().map(|c| c * c).sum();
                prop_assert!((nr - nb).abs() < 1e-9);
            }
        }
    }
}
