// Post-processing: summary statistics and significance tests over generated
// data. Everything here is a pure function of its input slice.

use statrs::distribution::{ChiSquared, ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

#[derive(Clone, Debug, PartialEq)]
pub struct GapStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Smallest of the most frequent gaps.
    pub mode: u64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Sample variance (n - 1 denominator).
    pub variance: f64,
    pub min: u64,
    pub max: u64,
}

impl GapStats {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Mean gap: {}", self.mean),
            format!("Median gap: {}", self.median),
            format!("Mode gap: {}", self.mode),
            format!("Std dev of gaps: {}", self.std_dev),
            format!("Variance of gaps: {}", self.variance),
            format!("Minimum gap: {}", self.min),
            format!("Maximum gap: {}", self.max),
        ]
    }
}

pub fn gaps(values: &[u64]) -> Vec<u64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Statistics over consecutive differences; `None` with fewer than two
/// values.
pub fn gap_stats(values: &[u64]) -> Option<GapStats> {
    let gaps = gaps(values);
    if gaps.is_empty() {
        return None;
    }

    let as_f64: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();
    let mut sorted = gaps.clone();
    sorted.sort_unstable();

    let n = sorted.len();
    let median = if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    };

    // sorted ascending, so the first run of maximal length is the smallest mode
    let mut mode = sorted[0];
    let mut best = 0;
    let mut run_start = 0;
    for i in 1..=n {
        if i == n || sorted[i] != sorted[run_start] {
            if i - run_start > best {
                best = i - run_start;
                mode = sorted[run_start];
            }
            run_start = i;
        }
    }

    let variance = if n > 1 { as_f64.iter().variance() } else { 0.0 };

    Some(GapStats {
        count: n,
        mean: as_f64.iter().mean(),
        median,
        mode,
        std_dev: as_f64.iter().population_std_dev(),
        variance,
        min: sorted[0],
        max: sorted[n - 1],
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    pub p_value: f64,
    pub df: f64,
}

/// Two-sided Student's t-test for independent samples with pooled variance.
/// `None` when either sample has fewer than two values or both are constant.
pub fn t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    if a.len() < 2 || b.len() < 2 {
        return None;
    }

    let (m1, m2) = (a.iter().mean(), b.iter().mean());
    let (v1, v2) = (a.iter().variance(), b.iter().variance());
    let df = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
    let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    if se == 0.0 || !se.is_finite() {
        return None;
    }

    let statistic = (m1 - m2) / se;
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0);
    Some(TTest { statistic, p_value, df })
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChiSquare {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
}

/// Pearson goodness-of-fit against expected counts. `None` for mismatched
/// or too-short inputs, or a non-positive expected count.
pub fn chi_square(observed: &[f64], expected: &[f64]) -> Option<ChiSquare> {
    if observed.len() != expected.len() || observed.len() < 2 {
        return None;
    }
    if expected.iter().any(|&e| e <= 0.0) {
        return None;
    }

    let statistic: f64 = observed
        .iter()
        .zip(expected)
        .map(|(o, e)| (o - e) * (o - e) / e)
        .sum();
    let dof = observed.len() - 1;
    let dist = ChiSquared::new(dof as f64).ok()?;
    let p_value = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);
    Some(ChiSquare { statistic, p_value, dof })
}

/// Count values into bins delimited by ascending `edges`. Bin `i` covers
/// `[edges[i], edges[i + 1])`; the last bin also takes its right edge.
/// Values outside the edges are dropped.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<u64> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let bins = edges.len() - 1;
    let mut counts = vec![0u64; bins];
    let (first, last) = (edges[0], edges[bins]);

    for &v in values {
        if v < first || v > last || !v.is_finite() {
            continue;
        }
        let idx = if v == last {
            bins - 1
        } else {
            edges.partition_point(|&e| e <= v) - 1
        };
        counts[idx] += 1;
    }
    counts
}
