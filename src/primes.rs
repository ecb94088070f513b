//! Prime generation and the prime-distribution demos.

use crate::dataset::{Dataset, Layer, Point3};
use crate::harness::{Control, Demo, ParameterSet, Update};
use crate::error::HarnessError;
use crate::math::{linspace, logspace};
use crate::scene::{Colormap, Style, BLUE, GREEN, RED, YELLOW};
use crate::stats::{gap_stats, gaps, histogram};
use crate::zeta::{critical_line_imag, zero_markers};

/// Sieve of Eratosthenes: every prime `<= limit`, ascending.
pub fn sieve(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let n = limit as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut i = 2;
    while i * i <= n {
        if is_prime[i] {
            for multiple in (i * i..=n).step_by(i) {
                is_prime[multiple] = false;
            }
        }
        i += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter_map(|(k, &p)| p.then_some(k as u64))
        .collect()
}

/// Primes `p` with `lower <= p < upper`.
pub fn primes_in_range(lower: u64, upper: u64) -> Vec<u64> {
    if upper <= lower {
        return Vec::new();
    }
    sieve(upper - 1).into_iter().filter(|&p| p >= lower).collect()
}

/// One three-point arc per consecutive pair, peaking at `ln(gap / 2 + 1)`
/// above the midpoint.
pub fn gap_arcs(primes: &[u64]) -> Vec<[Point3; 3]> {
    primes
        .windows(2)
        .map(|w| {
            let (x0, x1) = (w[0] as f64, w[1] as f64);
            let curvature = ((x1 - x0) / 2.0 + 1.0).ln();
            [[x0, 0.0, 0.0], [(x0 + x1) / 2.0, curvature, 0.0], [x1, 0.0, 0.0]]
        })
        .collect()
}

fn arc_segments(primes: &[u64]) -> Vec<(Point3, Point3)> {
    gap_arcs(primes)
        .into_iter()
        .flat_map(|[a, m, b]| [(a, m), (m, b)])
        .collect()
}

fn number_line(primes: &[u64], scale: f64) -> Vec<Point3> {
    primes.iter().map(|&p| [p as f64 * scale, 0.0, 0.0]).collect()
}

fn bars(edges: &[f64], counts: &[u64]) -> Vec<(f64, f64, f64)> {
    edges
        .windows(2)
        .zip(counts)
        .map(|(e, &c)| (e[0], e[1], c as f64))
        .collect()
}

/// Five views of the primes up to a fixed limit.
pub struct PrimeDistributionDemo {
    limit: u64,
    primes: Vec<u64>,
}

impl PrimeDistributionDemo {
    pub const VIEWS: [&'static str; 5] = ["gaps", "density", "cumulative", "log-index", "log-histogram"];

    pub fn new(limit: u64) -> Self {
        PrimeDistributionDemo { limit, primes: sieve(limit) }
    }
}

impl Demo for PrimeDistributionDemo {
    fn title(&self) -> &str {
        "Prime Number Distribution"
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::radio("view", &Self::VIEWS, "gaps")]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let values: Vec<f64> = self.primes.iter().map(|&p| p as f64).collect();
        match params.choice("view").unwrap_or("gaps") {
            "density" => {
                let (first, last) = (values.first().copied().unwrap_or(0.0), values.last().copied().unwrap_or(0.0));
                let edges = linspace(first, last, 101);
                let counts = histogram(&values, &edges);
                Dataset::new().with(Layer::Bars { bars: bars(&edges, &counts), color: GREEN, label: "density".into() })
            }
            "cumulative" => Dataset::new().with(Layer::Polyline {
                points: values.iter().enumerate().map(|(i, &p)| [p, (i + 1) as f64, 0.0]).collect(),
                color: RED,
                label: "cumulative count".into(),
            }),
            "log-index" => Dataset::new().with(Layer::Polyline {
                points: values.iter().enumerate().map(|(i, &p)| [(i + 1) as f64, p, 0.0]).collect(),
                color: BLUE,
                label: "prime by index".into(),
            }),
            "log-histogram" => {
                // 100 edges, 99 bins
                let edges = logspace(1.0, self.limit as f64, 100);
                let counts = histogram(&values, &edges);
                Dataset::new().with(Layer::Bars { bars: bars(&edges, &counts), color: 0x800080, label: "log bins".into() })
            }
            _ => {
                let gaps = gaps(&self.primes);
                let points: Vec<Point3> = values.iter().zip(&gaps).map(|(&p, &g)| [p, g as f64, 0.0]).collect();
                Dataset::new()
                    .with(Layer::Polyline { points: points.clone(), color: BLUE, label: "gap".into() })
                    .with(Layer::Scatter { points, values: None, color: BLUE, label: "prime".into() })
            }
        }
    }

    fn style(&self, params: &ParameterSet) -> Style {
        let range = format!("(1 to {})", self.limit);
        match params.choice("view").unwrap_or("gaps") {
            "density" => Style::new(format!("Prime Number Density {}", range))
                .plane()
                .labels("Number", "Prime Count in Each Bin", ""),
            "cumulative" => Style::new(format!("Cumulative Prime Count {}", range))
                .plane()
                .labels("Prime Number", "Cumulative Count of Primes", ""),
            // indices count from 1 so the log axis is defined everywhere
            "log-index" => Style::new(format!("Prime Distribution on a Logarithmic Scale {}", range))
                .log_x()
                .labels("Index (log scale)", "Prime Number", ""),
            "log-histogram" => Style::new("Prime Number Distribution (Logarithmic Binning)")
                .log_x()
                .labels("Number (Log Scale)", "Prime Count", ""),
            _ => Style::new(format!("Prime Gaps Between Consecutive Primes {}", range))
                .plane()
                .labels("Prime Number", "Gap", ""),
        }
    }

    fn summary(&self, _params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let mut lines = vec![format!("Primes up to {}: {}", self.limit, self.primes.len())];
        if let Some(stats) = gap_stats(&self.primes) {
            lines.extend(stats.lines());
        }
        lines
    }
}

/// Steps through the number line one window at a time, plotting primes,
/// gap arcs and zeta zero markers for the current window.
pub struct PrimeExplorerDemo {
    pub lower: u64,
    pub upper: u64,
    pub step: u64,
    pub zeros: usize,
}

impl Default for PrimeExplorerDemo {
    fn default() -> Self {
        PrimeExplorerDemo { lower: 10_000, upper: 1_000_000, step: 10_000, zeros: 10 }
    }
}

impl PrimeExplorerDemo {
    /// `[start, end)` of the window after `steps` presses of `next`.
    pub fn window(&self, steps: u64) -> (u64, u64) {
        let start = self.lower + steps * self.step;
        (start, start + self.step)
    }

    fn last_step(&self) -> u64 {
        self.upper.saturating_sub(self.lower).div_ceil(self.step.max(1)).saturating_sub(1)
    }
}

impl Demo for PrimeExplorerDemo {
    fn title(&self) -> &str {
        "Prime Distribution and Zeta Function Zeros"
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::button("next"), Control::button("reset")]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let (start, end) = self.window(params.counter("range"));
        let primes = primes_in_range(start, end);
        if primes.is_empty() {
            return Dataset::new();
        }

        let markers = zero_markers(self.zeros);
        Dataset::new()
            .with(Layer::Scatter {
                values: Some(primes.iter().map(|&p| p as f64).collect()),
                points: number_line(&primes, 1.0),
                color: GREEN,
                label: "Prime Numbers".into(),
            })
            .with(Layer::Segments { segments: arc_segments(&primes), values: None, color: BLUE, label: "Prime Gaps".into() })
            .with(Layer::Scatter {
                points: markers.iter().map(|&(_, im)| [im, 2.0, 0.0]).collect(),
                values: None,
                color: RED,
                label: "Zeta Zeros".into(),
            })
    }

    fn style(&self, params: &ParameterSet) -> Style {
        let (start, end) = self.window(params.counter("range"));
        Style::new(format!("Prime Distribution and Zeta Function Zeros ({} to {})", start, end))
            .colormap(Colormap::Viridis)
            .labels("Number Line", "Curved Prime Gaps", "Z (Flat for simplicity)")
    }

    fn summary(&self, params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let (start, end) = self.window(params.counter("range"));
        let primes = primes_in_range(start, end);
        match gap_stats(&primes) {
            Some(stats) => vec![format!(
                "Prime Gap Stats: Mean={:.2}, Median={:.2}, Mode={}, Std Dev={:.2}",
                stats.mean, stats.median, stats.mode, stats.std_dev
            )],
            None if primes.len() == 1 => {
                vec![format!("Only one prime in the range {} to {}", start, end)]
            }
            None => vec![format!("No primes found in the range {} to {}", start, end)],
        }
    }

    fn press(&self, params: &ParameterSet, button: &str) -> Result<Update, HarnessError> {
        if button != "next" {
            return Err(HarnessError::Unsupported("this button"));
        }
        let step = params.counter("range");
        if step >= self.last_step() {
            return Ok(Update {
                params: params.clone(),
                messages: vec!["Exploration ended.".to_string()],
            });
        }
        let (start, end) = self.window(step + 1);
        Ok(Update {
            params: params.with_counter("range", step + 1),
            messages: vec![format!("Continuing to the next range {} to {}", start, end)],
        })
    }
}

/// Primes in a fixed window as "planets" with zeta values as "stars".
pub struct PrimeSolarSystemDemo {
    lower: u64,
    upper: u64,
    primes: Vec<u64>,
    zeta_imag: Vec<f64>,
}

impl PrimeSolarSystemDemo {
    pub fn new(lower: u64, upper: u64) -> Self {
        let primes = primes_in_range(lower, upper);
        let zeta_imag = critical_line_imag(primes.len());
        PrimeSolarSystemDemo { lower, upper, primes, zeta_imag }
    }
}

impl Demo for PrimeSolarSystemDemo {
    fn title(&self) -> &str {
        "Prime Number Solar System"
    }

    fn generate(&self, _params: &ParameterSet) -> Dataset {
        let xs = linspace(self.lower as f64, self.upper as f64, self.zeta_imag.len());
        Dataset::new()
            .with(Layer::Scatter {
                values: Some(self.primes.iter().map(|&p| p as f64).collect()),
                points: number_line(&self.primes, 1.0),
                color: GREEN,
                label: "Prime Numbers (Planets)".into(),
            })
            .with(Layer::Segments {
                segments: arc_segments(&self.primes),
                values: None,
                color: BLUE,
                label: "Prime Gaps (Orbits)".into(),
            })
            .with(Layer::Scatter {
                points: xs.iter().zip(&self.zeta_imag).map(|(&x, &y)| [x, y, 0.0]).collect(),
                values: None,
                color: YELLOW,
                label: "Zeta Zeros (Stars)".into(),
            })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(format!("Prime Number Solar System ({} to {})", self.lower, self.upper))
            .labels("Number Line", "Curved Prime Gaps", "Z (Flat for simplicity)")
    }

    fn summary(&self, _params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let mut lines = vec![format!("Prime Gap Analysis between {} and {}:", self.lower, self.upper)];
        match gap_stats(&self.primes) {
            Some(stats) => lines.extend([
                format!("Mean gap: {}", stats.mean),
                format!("Variance of gaps: {}", stats.variance),
                format!("Minimum gap: {}", stats.min),
                format!("Maximum gap: {}", stats.max),
            ]),
            None => lines.push(format!("No primes found in the range {} to {}", self.lower, self.upper)),
        }
        lines
    }
}

/// Primes up to an adjustable limit on a scaled number line, twin pairs
/// highlighted.
pub struct TwinPrimeDemo;

impl TwinPrimeDemo {
    const SCALE: f64 = 0.1;

    fn primes(params: &ParameterSet) -> Vec<u64> {
        sieve(params.get("limit").unwrap_or(1000.0).max(0.0) as u64)
    }
}

pub fn twin_pairs(primes: &[u64]) -> Vec<(u64, u64)> {
    primes
        .windows(2)
        .filter(|w| w[1] - w[0] == 2)
        .map(|w| (w[0], w[1]))
        .collect()
}

impl Demo for TwinPrimeDemo {
    fn title(&self) -> &str {
        "Prime Number Line and Gaps"
    }

    fn controls(&self) -> Vec<Control> {
        vec![
            Control::slider("limit", 100.0, 100_000.0, 100.0, 1000.0),
            Control::button("reset"),
        ]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let primes = Self::primes(params);
        let line = number_line(&primes, Self::SCALE);
        let segments = line.windows(2).map(|w| (w[0], w[1])).collect();
        let twins = twin_pairs(&primes)
            .into_iter()
            .map(|(a, b)| ([a as f64 * Self::SCALE, 0.5, 0.0], [b as f64 * Self::SCALE, 0.5, 0.0]))
            .collect();

        Dataset::new()
            .with(Layer::Segments { segments, values: None, color: GREEN, label: "Prime Gaps".into() })
            .with(Layer::Segments { segments: twins, values: None, color: RED, label: "Twin Primes".into() })
            .with(Layer::Scatter {
                values: Some(line.iter().map(|p| p[0]).collect()),
                points: line,
                color: GREEN,
                label: "Prime Numbers".into(),
            })
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title())
            .colormap(Colormap::Viridis)
            .labels("Number Line (Scaled)", "Y", "Z")
    }

    fn summary(&self, params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let primes = Self::primes(params);
        let mut lines = vec![
            format!("Primes found: {}", primes.len()),
            format!("Twin prime pairs: {}", twin_pairs(&primes).len()),
        ];
        if let Some(stats) = gap_stats(&primes) {
            lines.push(format!("Maximum gap: {}", stats.max));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{Event, Harness};
    use proptest::prelude::*;

    #[test]
    fn primes_up_to_thirty() {
        assert_eq!(sieve(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(sieve(0).is_empty());
        assert!(sieve(1).is_empty());
        assert_eq!(sieve(2), vec![2]);
    }

    #[test]
    fn range_excludes_upper_bound() {
        assert_eq!(primes_in_range(10, 23), vec![11, 13, 17, 19]);
        assert_eq!(primes_in_range(11, 24), vec![11, 13, 17, 19, 23]);
        assert!(primes_in_range(24, 29).is_empty());
        assert!(primes_in_range(50, 10).is_empty());
    }

    #[test]
    fn arcs_peak_at_log_half_gap() {
        let arcs = gap_arcs(&[7, 11]);
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0][1], [9.0, 3f64.ln(), 0.0]);
        assert_eq!(arcs[0][0], [7.0, 0.0, 0.0]);
    }

    #[test]
    fn twin_pairs_below_fifty() {
        assert_eq!(
            twin_pairs(&sieve(50)),
            vec![(3, 5), (5, 7), (11, 13), (17, 19), (29, 31), (41, 43)]
        );
    }

    #[test]
    fn explorer_steps_windows_and_stops() {
        let demo = PrimeExplorerDemo { lower: 0, upper: 30, step: 10, zeros: 3 };
        let mut harness = Harness::new(Box::new(demo));
        assert!(harness.summary()[0].starts_with("Prime Gap Stats: Mean="));

        let lines = harness.handle(Event::Button("next".into())).unwrap();
        assert_eq!(lines[0], "Continuing to the next range 10 to 20");
        assert_eq!(harness.params().counter("range"), 1);

        harness.handle(Event::Button("next".into())).unwrap();
        let lines = harness.handle(Event::Button("next".into())).unwrap();
        assert_eq!(lines[0], "Exploration ended.");
        assert_eq!(harness.params().counter("range"), 2);
    }

    #[test]
    fn explorer_reports_empty_window() {
        let demo = PrimeExplorerDemo { lower: 24, upper: 100, step: 5, zeros: 1 };
        let params = ParameterSet::new();
        let ds = demo.generate(&params);
        assert!(ds.is_empty());
        assert_eq!(demo.summary(&params, &ds), vec!["No primes found in the range 24 to 29".to_string()]);
    }

    #[test]
    fn solar_system_prints_gap_analysis() {
        let demo = PrimeSolarSystemDemo::new(2, 12);
        let lines = demo.summary(&ParameterSet::new(), &Dataset::new());
        assert_eq!(lines[0], "Prime Gap Analysis between 2 and 12:");
        assert_eq!(lines[1], "Mean gap: 2.25");
        assert_eq!(lines[3], "Minimum gap: 1");
        assert_eq!(lines[4], "Maximum gap: 4");
    }

    #[test]
    fn distribution_views_all_generate() {
        let demo = PrimeDistributionDemo::new(1000);
        for view in PrimeDistributionDemo::VIEWS {
            let ds = demo.generate(&ParameterSet::new().with_choice("view", view));
            assert!(!ds.is_empty(), "view {} is empty", view);
        }
        let density = demo.generate(&ParameterSet::new().with_choice("view", "density"));
        match &density.layers[0] {
            Layer::Bars { bars, .. } => {
                let total: f64 = bars.iter().map(|b| b.2).sum();
                assert_eq!(total as usize, 168);
            }
            other => panic!("unexpected layer {:?}", other),
        }
    }

    #[test]
    fn histogram_bins_follow_the_data() {
        let demo = PrimeDistributionDemo::new(1000);
        let density = demo.generate(&ParameterSet::new().with_choice("view", "density"));
        let Layer::Bars { bars, .. } = &density.layers[0] else { panic!("density is not bars") };
        assert_eq!(bars.len(), 100);
        assert_eq!(bars[0].0, 2.0);
        assert!((bars[99].1 - 997.0).abs() < 1e-9);

        let log = demo.generate(&ParameterSet::new().with_choice("view", "log-histogram"));
        let Layer::Bars { bars, .. } = &log.layers[0] else { panic!("log-histogram is not bars") };
        assert_eq!(bars.len(), 99);
        assert_eq!(bars.iter().map(|b| b.2).sum::<f64>() as usize, 168);
    }

    fn is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    proptest! {
        #[test]
        fn sieve_agrees_with_trial_division(limit in 0u64..2000) {
            let primes = sieve(limit);
            prop_assert!(primes.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(primes.iter().all(|&p| is_prime(p)));
            let expected: Vec<u64> = (0..=limit).filter(|&n| is_prime(n)).collect();
            prop_assert_eq!(primes, expected);
        }
    }
}
