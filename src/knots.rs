//! Parametric knots with a deformable parameter.

use std::f64::consts::PI;

use crate::dataset::{Dataset, Layer, Point3};
use crate::harness::{Control, Demo, ParameterSet};
use crate::math::linspace;
use crate::scene::{Style, BLUE, RED};

pub const SAMPLES: usize = 500;

pub fn trefoil(t: f64) -> Point3 {
    [
        t.sin() + 2.0 * (2.0 * t).sin(),
        t.cos() - 2.0 * (2.0 * t).cos(),
        -(3.0 * t).sin(),
    ]
}

pub fn figure_eight(t: f64) -> Point3 {
    let r = 2.0 + (2.0 * t).cos();
    [r * (3.0 * t).cos(), r * (3.0 * t).sin(), (4.0 * t).sin()]
}

/// `SAMPLES` points of `knot` over `[0, 2pi]`, with `t` stretched by
/// `transform`.
pub fn sample_knot(knot: fn(f64) -> Point3, transform: f64) -> Vec<Point3> {
    linspace(0.0, 2.0 * PI, SAMPLES)
        .into_iter()
        .map(|t| knot(t * transform))
        .collect()
}

pub struct KnotDemo;

impl KnotDemo {
    const KNOTS: [&'static str; 2] = ["trefoil", "figure-eight"];
}

impl Demo for KnotDemo {
    fn title(&self) -> &str {
        "Knot Transformations"
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::slider("transform", 0.1, 2.0, 0.05, 1.0),
            Control::radio("knot", &Self::KNOTS, "trefoil"),
            Control::button("reset"),
        ]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let transform = params.get("transform").unwrap_or(1.0);
        let (knot, color, label): (fn(f64) -> Point3, _, _) = match params.choice("knot") {
            Some("figure-eight") => (figure_eight, RED, "Figure-Eight Knot"),
            _ => (trefoil, BLUE, "Trefoil Knot"),
        };
        Dataset::new().with(Layer::Polyline { points: sample_knot(knot, transform), color, label: label.into() })
    }

    fn style(&self, params: &ParameterSet) -> Style {
        let title = match params.choice("knot") {
            Some("figure-eight") => "Figure-Eight Knot - Explore Knot Transformations",
            _ => "Trefoil Knot - Explore Knot Transformations",
        };
        Style::new(title).labels("X", "Y", "Z")
    }
}
