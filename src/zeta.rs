//! Riemann zeta on the critical line.
//!
//! `zeta` uses Euler–Maclaurin summation with ten Bernoulli correction
//! terms. The number of direct terms grows with `|Im s|`, which keeps the
//! tail ratio `|s| / (2 pi N)` below about 0.35.

use std::f64::consts::PI;

use crate::dataset::{Dataset, Layer};
use crate::harness::{Control, Demo, ParameterSet};
use crate::math::{linspace, C};
use crate::scene::{Style, RED, BLUE};

// B2, B4, ..., B20
const BERNOULLI: [f64; 10] = [
    1.0 / 6.0,
    -1.0 / 30.0,
    1.0 / 42.0,
    -1.0 / 30.0,
    5.0 / 66.0,
    -691.0 / 2730.0,
    7.0 / 6.0,
    -3617.0 / 510.0,
    43867.0 / 798.0,
    -174611.0 / 330.0,
];

/// Local minima of `|zeta|` below this count as zero estimates.
pub const ZERO_THRESHOLD: f64 = 0.25;

fn direct_terms(s: C) -> usize {
    20 + (s.im.abs() / 2.0).ceil() as usize
}

/// `zeta(s)` for any complex `s` other than the pole at 1.
pub fn zeta(s: C) -> C {
    let n = direct_terms(s);
    let nf = n as f64;

    let mut sum = C::real(0.0);
    for k in 1..n {
        sum = sum.add(s.real_pow_neg(k as f64));
    }

    let n_pow = s.real_pow_neg(nf);
    sum = sum.add(n_pow.scale(nf).div(s.sub(C::real(1.0))));
    sum = sum.add(n_pow.scale(0.5));

    // k-th correction: B_2k / (2k)! * s(s+1)...(s+2k-2) * N^(-s-2k+1)
    let mut rising = s;
    let mut power = n_pow.scale(1.0 / nf);
    let mut factorial = 2.0;
    for (i, b) in BERNOULLI.iter().enumerate() {
        sum = sum.add(rising.mul(power).scale(b / factorial));

        let k = (i + 1) as f64;
        rising = rising
            .mul(s.add(C::real(2.0 * k - 1.0)))
            .mul(s.add(C::real(2.0 * k)));
        power = power.scale(1.0 / (nf * nf));
        factorial *= (2.0 * k + 1.0) * (2.0 * k + 2.0);
    }

    sum
}

/// `(t, |zeta(1/2 + it)|)` for `samples` values of `t` over `[0, t_end]`.
pub fn critical_line(t_end: f64, samples: usize) -> Vec<(f64, f64)> {
    linspace(0.0, t_end, samples)
        .into_iter()
        .map(|t| (t, zeta(C::new(0.5, t)).abs()))
        .collect()
}

/// Interior local minima of the sampled magnitude that dip below
/// `threshold`.
pub fn zero_estimates(samples: &[(f64, f64)], threshold: f64) -> Vec<f64> {
    samples
        .windows(3)
        .filter(|w| w[1].1 < w[0].1 && w[1].1 <= w[2].1 && w[1].1 < threshold)
        .map(|w| w[1].0)
        .collect()
}

pub fn is_on_critical_line(s: C) -> bool {
    (s.re - 0.5).abs() < 1e-8
}

/// Evenly spaced stand-ins `(1/2, n pi)` for the first `count` zeros.
pub fn zero_markers(count: usize) -> Vec<(f64, f64)> {
    (1..=count).map(|n| (0.5, n as f64 * PI)).collect()
}

/// `Im zeta(1/2 + n i)` for `n = 1..=count`.
pub fn critical_line_imag(count: usize) -> Vec<f64> {
    (1..=count).map(|n| zeta(C::new(0.5, n as f64)).im).collect()
}

pub struct ZetaDemo;

impl Demo for ZetaDemo {
    fn title(&self) -> &str {
        "Magnitude of the Riemann Zeta Function on the Critical Line"
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::slider("t_max", 10.0, 100.0, 5.0, 50.0),
            Control::button("reset"),
        ]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let t_max = params.get("t_max").unwrap_or(50.0);
        let samples = critical_line(t_max, 1000);
        let zeros = zero_estimates(&samples, ZERO_THRESHOLD);

        Dataset::new()
            .with(Layer::Polyline {
                points: samples.iter().map(|&(t, m)| [t, m, 0.0]).collect(),
                color: BLUE,
                label: "|zeta(1/2 + it)|".into(),
            })
            .with(Layer::Scatter {
                points: zeros.iter().map(|&t| [t, 0.0, 0.0]).collect(),
                values: None,
                color: RED,
                label: "zeros".into(),
            })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title()).plane().labels("Imaginary part t", "|zeta(0.5 + it)|", "")
    }

    fn summary(&self, _params: &ParameterSet, dataset: &Dataset) -> Vec<String> {
        dataset
            .layers
            .iter()
            .find_map(|layer| match layer {
                Layer::Scatter { points, .. } => Some(
                    points
                        .iter()
                        .map(|p| format!("Zero near t = {:.3} (on critical line: {})", p[0], is_on_critical_line(C::new(0.5, p[0]))))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_default()
    }
}
