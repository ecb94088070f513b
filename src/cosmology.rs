//! Friedmann expansion, an expanding point cloud, and relativistic
//! frequency shifts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{Dataset, Layer, Point3};
use crate::harness::{Control, Demo, ParameterSet};
use crate::math::linspace;
use crate::scene::{Colormap, Style, BLUE};

/// Speed of light, m/s.
pub const C_LIGHT: f64 = 3e8;
/// Gravitational constant, m^3 / (kg s^2).
pub const G: f64 = 6.67430e-11;
pub const EARTH_MASS: f64 = 5.972e24;
/// Vibrational frequency every object starts with, Hz.
pub const BASE_FREQUENCY: f64 = 1e14;

/// Density parameters; dark energy is whatever is left of 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Omegas {
    pub matter: f64,
    pub dark_matter: f64,
    pub curvature: f64,
}

impl Omegas {
    pub fn lambda(&self) -> f64 {
        1.0 - self.matter - self.dark_matter - self.curvature
    }
}

/// Scale factor at normalized time `t` (0 = Big Bang, 1 = now).
pub fn scale_factor(t: f64, omegas: Omegas) -> f64 {
    let z = 1.0 + t;
    (omegas.matter * z.powi(3) + omegas.dark_matter * z * z + omegas.lambda() + omegas.curvature / (z * z)).sqrt()
}

pub fn lorentz_gamma(v: f64) -> f64 {
    1.0 / (1.0 - (v * v) / (C_LIGHT * C_LIGHT)).sqrt()
}

/// Frequency seen by a distant observer from an object moving at `v` at
/// distance `r` from an Earth-mass body. Zero inside the horizon.
pub fn observed_frequency(f0: f64, v: f64, r: f64) -> f64 {
    let radicand = 1.0 - 2.0 * G * EARTH_MASS / (r * C_LIGHT * C_LIGHT);
    if radicand < 0.0 || !radicand.is_finite() {
        return 0.0;
    }
    f0 / lorentz_gamma(v) * radicand.sqrt()
}

pub struct UniverseDemo;

impl UniverseDemo {
    fn omegas(params: &ParameterSet) -> Omegas {
        Omegas {
            matter: params.get("omega_m").unwrap_or(0.3),
            dark_matter: params.get("omega_dm").unwrap_or(0.25),
            curvature: params.get("omega_k").unwrap_or(0.05),
        }
    }
}

impl Demo for UniverseDemo {
    fn title(&self) -> &str {
        "Universe Geometry Evolution - Post Big Bang"
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::slider("omega_m", 0.0, 1.0, 0.01, 0.3),
            Control::slider("omega_dm", 0.0, 1.0, 0.01, 0.25),
            Control::slider("omega_k", -1.0, 1.0, 0.01, 0.05),
        ]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let omegas = Self::omegas(params);
        let points = linspace(0.0, 1.0, 500)
            .into_iter()
            .map(|t| [t, scale_factor(t, omegas), 0.0])
            .collect();
        Dataset::new().with(Layer::Polyline { points, color: BLUE, label: "Universe Expansion".into() })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title()).labels("Time (normalized)", "Scale Factor (a(t))", "Expansion Geometry")
    }

    fn summary(&self, params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let omegas = Self::omegas(params);
        vec![
            format!("Omega_lambda (Dark Energy): {:.3}", omegas.lambda()),
            format!("Scale factor now: {:.4}", scale_factor(1.0, omegas)),
        ]
    }
}

/// A fixed random cloud whose coordinates are multiplied by the time slider.
pub struct ExpansionDemo {
    base: Vec<Point3>,
}

impl ExpansionDemo {
    pub const POINTS: usize = 1000;

    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let base = (0..Self::POINTS)
            .map(|_| [rng.r#gen::<f64>() * 100.0, rng.r#gen::<f64>() * 100.0, rng.r#gen::<f64>() * 100.0])
            .collect();
        ExpansionDemo { base }
    }
}

impl Demo for ExpansionDemo {
    fn title(&self) -> &str {
        "Expanding Universe"
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::slider("time", 0.1, 10.0, 0.1, 1.0)]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let factor = params.get("time").unwrap_or(1.0);
        let points = self
            .base
            .iter()
            .map(|p| [p[0] * factor, p[1] * factor, p[2] * factor])
            .collect();
        Dataset::new().with(Layer::Scatter {
            points,
            values: Some(vec![BASE_FREQUENCY; self.base.len()]),
            color: BLUE,
            label: "Vibrational Frequency (Hz)".into(),
        })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title()).colormap(Colormap::Plasma)
    }
}

/// Objects scattered around an Earth-mass body, colored by observed
/// frequency.
pub struct LorentzDemo {
    positions: Vec<Point3>,
    frequencies: Vec<f64>,
}

impl LorentzDemo {
    pub const OBJECTS: usize = 1000;

    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(Self::OBJECTS);
        let mut frequencies = Vec::with_capacity(Self::OBJECTS);
        for _ in 0..Self::OBJECTS {
            let distance = rng.r#gen::<f64>() * 1e7;
            let velocity = rng.r#gen::<f64>() * C_LIGHT;
            positions.push([rng.r#gen::<f64>() * 1e7, rng.r#gen::<f64>() * 1e7, rng.r#gen::<f64>() * 1e7]);
            frequencies.push(observed_frequency(BASE_FREQUENCY, velocity, distance));
        }
        LorentzDemo { positions, frequencies }
    }
}

impl Demo for LorentzDemo {
    fn title(&self) -> &str {
        "Vibrational Frequency under Lorentz and Gravitational Shifts"
    }

    fn generate(&self, _params: &ParameterSet) -> Dataset {
        Dataset::new().with(Layer::Scatter {
            points: self.positions.clone(),
            values: Some(self.frequencies.clone()),
            color: BLUE,
            label: "Observed Frequency (Hz)".into(),
        })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title())
            .colormap(Colormap::Plasma)
            .labels("X (m)", "Y (m)", "Z (m)")
    }

    fn summary(&self, _params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let n = self.frequencies.len().max(1) as f64;
        let mean = self.frequencies.iter().sum::<f64>() / n;
        let redshifted = self.frequencies.iter().filter(|&&f| f < BASE_FREQUENCY / 2.0).count();
        vec![
            format!("Mean observed frequency: {:.4e} Hz", mean),
            format!("Objects below half the base frequency: {}", redshifted),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn present_day_defaults() {
        let omegas = Omegas { matter: 0.3, dark_matter: 0.25, curvature: 0.05 };
        assert!((omegas.lambda() - 0.4).abs() < 1e-12);
        assert!((scale_factor(0.0, omegas) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lorentz_factor_grows_with_speed() {
        assert_eq!(lorentz_gamma(0.0), 1.0);
        assert!((lorentz_gamma(0.6 * C_LIGHT) - 1.25).abs() < 1e-12);
        assert!(observed_frequency(BASE_FREQUENCY, 0.6 * C_LIGHT, 1e7) < BASE_FREQUENCY / 1.25);
    }

    #[test]
    fn frequency_clamps_inside_horizon() {
        // Schwarzschild radius of the Earth is about 9 mm
        assert_eq!(observed_frequency(BASE_FREQUENCY, 0.0, 1e-3), 0.0);
        assert_eq!(observed_frequency(BASE_FREQUENCY, 0.0, 0.0), 0.0);
    }

    #[test]
    fn expansion_scales_the_same_cloud() {
        let demo = ExpansionDemo::new(7);
        let one = demo.generate(&ParameterSet::new().with("time", 1.0));
        let two = demo.generate(&ParameterSet::new().with("time", 2.0));
        let (a, b) = (one.layers[0].points(), two.layers[0].points());
        assert_eq!(a.len(), ExpansionDemo::POINTS);
        assert!(a.iter().flatten().all(|&c| (0.0..100.0).contains(&c)));
        for (p, q) in a.iter().zip(&b) {
            assert!((q[0] - 2.0 * p[0]).abs() < 1e-9);
        }
        assert_eq!(ExpansionDemo::new(7).generate(&ParameterSet::new()), demo.generate(&ParameterSet::new()));
    }

    #[test]
    fn lorentz_demo_frequencies_are_bounded() {
        let demo = LorentzDemo::new(1);
        assert_eq!(demo.frequencies.len(), LorentzDemo::OBJECTS);
        assert!(demo.frequencies.iter().all(|&f| (0.0..=BASE_FREQUENCY).contains(&f)));
    }

    proptest! {
        #[test]
        fn scale_factor_is_one_at_big_bang(
            matter in 0.0f64..1.0,
            dark_matter in 0.0f64..1.0,
            curvature in -1.0f64..1.0,
        ) {
            let omegas = Omegas { matter, dark_matter, curvature };
            let a = scale_factor(0.0, omegas);
            prop_assert!((a * a - 1.0).abs() < 1e-9);
        }
    }
}
