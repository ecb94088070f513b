//! Model geometries of 3-manifolds and a random census of geometry types.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{Dataset, Layer, Point3};
use crate::harness::{Control, Demo, ParameterSet};
use crate::math::linspace;
use crate::scene::{Limits, Style, BLUE, GREEN, RED};
use crate::stats::chi_square;

pub const GRID: usize = 100;

/// Row-major grid of `f(u_i, v_j)` over the two sample vectors.
fn surface(us: &[f64], vs: &[f64], f: impl Fn(f64, f64) -> Point3) -> (Vec<Point3>, usize, usize) {
    let grid = us.iter().flat_map(|&u| vs.iter().map(move |&v| (u, v))).map(|(u, v)| f(u, v)).collect();
    (grid, us.len(), vs.len())
}

/// Unit sphere as the outer product of `u in [0, 2pi]` and `v in [0, pi]`.
pub fn spherical() -> (Vec<Point3>, usize, usize) {
    surface(&linspace(0.0, 2.0 * PI, GRID), &linspace(0.0, PI, GRID), |u, v| {
        [u.cos() * v.sin(), u.sin() * v.sin(), v.cos()]
    })
}

/// Flat grid over `[-1, 1]^2`.
pub fn euclidean() -> (Vec<Point3>, usize, usize) {
    let axis = linspace(-1.0, 1.0, GRID);
    surface(&axis, &axis, |y, x| [x, y, 0.0])
}

/// Saddle `(sinh u, sinh v, cosh u - cosh v)` over `[-2, 2]^2`.
pub fn hyperbolic() -> (Vec<Point3>, usize, usize) {
    let axis = linspace(-2.0, 2.0, GRID);
    surface(&axis, &axis, |v, u| [u.sinh(), v.sinh(), u.cosh() - v.cosh()])
}

/// 10 x 10 x 10 lattice over `[-1, 1]^3`.
pub fn euclidean_lattice() -> Vec<Point3> {
    let axis = linspace(-1.0, 1.0, 10);
    let mut points = Vec::with_capacity(1000);
    for &x in &axis {
        for &y in &axis {
            for &z in &axis {
                points.push([x, y, z]);
            }
        }
    }
    points
}

/// Unit sphere from a polar grid, `phi in [0, pi]`, `theta in [0, 2pi]`.
pub fn polar_sphere() -> (Vec<Point3>, usize, usize) {
    surface(&linspace(0.0, PI, GRID), &linspace(0.0, 2.0 * PI, GRID), |phi, theta| {
        [phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()]
    })
}

/// `z = x^2 - y^2` over `[-1, 1]^2`.
pub fn hyperbolic_paraboloid() -> (Vec<Point3>, usize, usize) {
    let axis = linspace(-1.0, 1.0, GRID);
    surface(&axis, &axis, |y, x| [x, y, x * x - y * y])
}

fn surface_layer((grid, rows, cols): (Vec<Point3>, usize, usize), color: u32) -> Layer {
    Layer::Surface { grid, rows, cols, color }
}

const GEOMETRIES: [&str; 3] = ["Spherical", "Euclidean", "Hyperbolic"];

/// The three model geometries behind geometrization, one at a time.
pub struct ManifoldDemo;

impl Demo for ManifoldDemo {
    fn title(&self) -> &str {
        "Explore Geometries of 3-Manifolds"
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::radio("geometry", &GEOMETRIES, "Euclidean")]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let layer = match params.choice("geometry") {
            Some("Spherical") => surface_layer(spherical(), RED),
            Some("Hyperbolic") => surface_layer(hyperbolic(), GREEN),
            _ => surface_layer(euclidean(), BLUE),
        };
        Dataset::new().with(layer)
    }

    fn style(&self, params: &ParameterSet) -> Style {
        let title = match params.choice("geometry") {
            Some("Spherical") => "Spherical Geometry",
            Some("Hyperbolic") => "Hyperbolic Geometry",
            _ => "Euclidean Geometry",
        };
        Style::new(title).labels("X", "Y", "Z")
    }
}

/// Thurston's flat, spherical and saddle models.
pub struct ThurstonDemo;

impl Demo for ThurstonDemo {
    fn title(&self) -> &str {
        "Thurston Geometries"
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::radio("geometry", &GEOMETRIES, "Euclidean")]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let layer = match params.choice("geometry") {
            Some("Spherical") => surface_layer(polar_sphere(), RED),
            Some("Hyperbolic") => surface_layer(hyperbolic_paraboloid(), GREEN),
            _ => Layer::Scatter {
                points: euclidean_lattice(),
                values: None,
                color: BLUE,
                label: "lattice".into(),
            },
        };
        Dataset::new().with(layer)
    }

    fn style(&self, params: &ParameterSet) -> Style {
        match params.choice("geometry") {
            Some("Spherical") => Style::new("Spherical Geometry").limits(Limits::cube(1.2)),
            Some("Hyperbolic") => Style::new("Hyperbolic Geometry"),
            _ => Style::new("Euclidean Space (Flat)").limits(Limits::cube(1.2)),
        }
    }
}

pub const GEOMETRY_TYPES: usize = 8;

/// Assign each of `manifolds` to one of the eight geometry types.
pub fn classify_manifolds(manifolds: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..manifolds).map(|_| rng.gen_range(0..GEOMETRY_TYPES)).collect()
}

/// Counts per type, like `bincount` with a minimum length.
pub fn geometry_counts(classes: &[usize]) -> [u64; GEOMETRY_TYPES] {
    let mut counts = [0; GEOMETRY_TYPES];
    for &c in classes {
        if let Some(slot) = counts.get_mut(c) {
            *slot += 1;
        }
    }
    counts
}

/// Classifies a batch of manifolds once and tests the counts against a
/// uniform distribution.
pub struct CensusDemo {
    manifolds: usize,
    counts: [u64; GEOMETRY_TYPES],
}

impl CensusDemo {
    pub fn new(manifolds: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let counts = geometry_counts(&classify_manifolds(manifolds, &mut rng));
        CensusDemo { manifolds, counts }
    }
}

impl Demo for CensusDemo {
    fn title(&self) -> &str {
        "Counts of Manifolds per Geometry Type"
    }

    fn generate(&self, _params: &ParameterSet) -> Dataset {
        let bars = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f64 + 0.1, i as f64 + 0.9, c as f64))
            .collect();
        Dataset::new().with(Layer::Bars { bars, color: BLUE, label: "manifolds".into() })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title()).plane().labels("Geometry type", "Manifolds", "")
    }

    fn summary(&self, _params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let counts: Vec<String> = self.counts.iter().map(u64::to_string).collect();
        let mut lines = vec![format!("Counts of Manifolds per Geometry Type: [{}]", counts.join(" "))];

        let observed: Vec<f64> = self.counts.iter().map(|&c| c as f64).collect();
        let expected = vec![self.manifolds as f64 / GEOMETRY_TYPES as f64; GEOMETRY_TYPES];
        match chi_square(&observed, &expected) {
            Some(chi) => {
                lines.push(format!("Chi-squared Statistic: {}", chi.statistic));
                lines.push(format!("P-value: {}", chi.p_value));
                lines.push(if chi.p_value < 0.05 {
                    "Distribution differs from uniform at the 5% level.".to_string()
                } else {
                    "Distribution is consistent with uniform.".to_string()
                });
            }
            None => lines.push("Chi-squared test needs at least one manifold".to_string()),
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_points_are_unit() {
        let (grid, rows, cols) = spherical();
        assert_eq!((rows, cols), (GRID, GRID));
        assert_eq!(grid.len(), GRID * GRID);
        assert!(grid.iter().all(|p| ((p[0] * p[0] + p[1] * p[1] + p[2] * p[2]) - 1.0).abs() < 1e-12));
        let (polar, ..) = polar_sphere();
        assert!(polar.iter().all(|p| ((p[0] * p[0] + p[1] * p[1] + p[2] * p[2]) - 1.0).abs() < 1e-12));
    }

    #[test]
    fn flat_and_saddle_surfaces() {
        let (flat, ..) = euclidean();
        assert!(flat.iter().all(|p| p[2] == 0.0));
        assert_eq!(flat[1], [linspace(-1.0, 1.0, GRID)[1], -1.0, 0.0]);

        let (saddle, ..) = hyperbolic_paraboloid();
        assert!(saddle.iter().all(|p| (p[2] - (p[0] * p[0] - p[1] * p[1])).abs() < 1e-12));

        // u = v on the diagonal: z = cosh u - cosh u
        let (hyper, _, cols) = hyperbolic();
        assert!(hyper[5 * cols + 5][2].abs() < 1e-12);
    }

    #[test]
    fn lattice_has_a_thousand_points() {
        let lattice = euclidean_lattice();
        assert_eq!(lattice.len(), 1000);
        assert_eq!(lattice[0], [-1.0, -1.0, -1.0]);
        assert_eq!(lattice[999], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn radio_switches_geometry() {
        let demo = ManifoldDemo;
        let defaults = demo.defaults();
        assert_eq!(defaults.choice("geometry"), Some("Euclidean"));
        let sphere = demo.generate(&defaults.with_choice("geometry", "Spherical"));
        match &sphere.layers[0] {
            Layer::Surface { color, .. } => assert_eq!(*color, RED),
            other => panic!("unexpected layer {:?}", other),
        }
    }

    #[test]
    fn census_counts_every_manifold() {
        let demo = CensusDemo::new(1000, 42);
        assert_eq!(demo.counts.iter().sum::<u64>(), 1000);
        let lines = demo.summary(&ParameterSet::new(), &Dataset::new());
        assert!(lines[0].starts_with("Counts of Manifolds per Geometry Type: ["));
        assert!(lines[1].starts_with("Chi-squared Statistic: "));
        assert!(lines[2].starts_with("P-value: "));
        assert_eq!(CensusDemo::new(1000, 42).counts, demo.counts);
    }

    #[test]
    fn bincount_ignores_out_of_range() {
        assert_eq!(geometry_counts(&[0, 0, 7, 9]), [2, 0, 0, 0, 0, 0, 0, 1]);
    }
}
