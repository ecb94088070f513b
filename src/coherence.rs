use crate::dataset::{Dataset, Layer};
use crate::harness::{Demo, ParameterSet};
use crate::math::linspace;
use crate::scene::{Colormap, Style};
use crate::stats::t_test;

/// `P(t) = exp(-gamma t)`.
pub fn coherence_decay(t: f64, gamma: f64) -> f64 {
    (-gamma * t).exp()
}

/// 100 time samples over `[0, duration]` and one decay curve per rate.
pub fn generate_coherence_data(duration: f64, gammas: &[f64]) -> (Vec<f64>, Vec<Vec<f64>>) {
    let time = linspace(0.0, duration, 100);
    let curves = gammas
        .iter()
        .map(|&gamma| time.iter().map(|&t| coherence_decay(t, gamma)).collect())
        .collect();
    (time, curves)
}

/// Five environments from gamma = 0.01 to 0.2, each curve lifted to z = gamma.
pub struct CoherenceDemo {
    pub duration: f64,
    pub gammas: Vec<f64>,
}

impl Default for CoherenceDemo {
    fn default() -> Self {
        CoherenceDemo { duration: 10.0, gammas: linspace(0.01, 0.2, 5) }
    }
}

impl Demo for CoherenceDemo {
    fn title(&self) -> &str {
        "Quantum Coherence Decay in Biological Systems"
    }

    fn generate(&self, _params: &ParameterSet) -> Dataset {
        let (time, curves) = generate_coherence_data(self.duration, &self.gammas);
        let mut dataset = Dataset::new();
        for (i, (gamma, curve)) in self.gammas.iter().zip(&curves).enumerate() {
            let gradient = i as f64 / (self.gammas.len().max(2) - 1) as f64;
            dataset.push(Layer::Polyline {
                points: time.iter().zip(curve).map(|(&t, &p)| [t, p, *gamma]).collect(),
                color: Colormap::Viridis.color(gradient),
                label: format!("gamma={:.2}", gamma),
            });
        }
        dataset
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title()).labels("Time (t)", "Coherence P(t)", "Decoherence Rate (gamma)")
    }

    // compares the second and the last environment, as "quantum" vs "classical"
    fn summary(&self, _params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let (_, curves) = generate_coherence_data(self.duration, &self.gammas);
        match (curves.get(1), curves.last()) {
            (Some(quantum), Some(classical)) => match t_test(quantum, classical) {
                Some(t) => vec![format!("T-statistic: {:.4}, P-value: {:.4}", t.statistic, t.p_value)],
                None => vec!["T-test undefined for these curves".to_string()],
            },
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn five_curves_of_a_hundred_points() {
        let demo = CoherenceDemo::default();
        let ds = demo.generate(&ParameterSet::new());
        assert_eq!(ds.layers.len(), 5);
        assert!(ds.layers.iter().all(|l| l.len() == 100));
        match &ds.layers[4] {
            Layer::Polyline { points, label, .. } => {
                assert_eq!(label, "gamma=0.20");
                assert!((points[0][2] - 0.2).abs() < 1e-12);
                assert_eq!(points[0][1], 1.0);
            }
            other => panic!("unexpected layer {:?}", other),
        }
    }

    #[test]
    fn t_test_line_is_formatted() {
        let demo = CoherenceDemo::default();
        let lines = demo.summary(&ParameterSet::new(), &Dataset::new());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("T-statistic: "));
        assert!(lines[0].contains(", P-value: "));
    }

    proptest! {
        #[test]
        fn decay_starts_at_one_and_falls(gamma in 0.001f64..5.0, t in 0.0f64..10.0, dt in 0.01f64..1.0) {
            prop_assert_eq!(coherence_decay(0.0, gamma), 1.0);
            prop_assert!(coherence_decay(t + dt, gamma) < coherence_decay(t, gamma));
        }
    }
}
