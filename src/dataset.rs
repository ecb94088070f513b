// Generated geometry handed to the renderer.
// A dataset is a plain value: rebuilt from parameters on every recompute,
// never patched in place.

use serde::Serialize;

pub type Point3 = [f64; 3];

/// One drawable layer. `values`, when present, holds one scalar per item and
/// is fed through the scene colormap; otherwise the layer's fixed color is
/// used.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Layer {
    Scatter {
        points: Vec<Point3>,
        values: Option<Vec<f64>>,
        color: u32,
        label: String,
    },
    Segments {
        segments: Vec<(Point3, Point3)>,
        values: Option<Vec<f64>>,
        color: u32,
        label: String,
    },
    Polyline {
        points: Vec<Point3>,
        color: u32,
        label: String,
    },
    /// Row-major grid of `rows * cols` points, drawn as a wire mesh.
    Surface {
        grid: Vec<Point3>,
        rows: usize,
        cols: usize,
        color: u32,
    },
    /// Bars standing on y = 0: `(x_start, x_end, height)`.
    Bars {
        bars: Vec<(f64, f64, f64)>,
        color: u32,
        label: String,
    },
}

impl Layer {
    /// Every coordinate this layer will put on screen.
    pub fn points(&self) -> Vec<Point3> {
        match self {
            Layer::Scatter { points, .. } | Layer::Polyline { points, .. } => points.clone(),
            Layer::Segments { segments, .. } => {
                segments.iter().flat_map(|(a, b)| [*a, *b]).collect()
            }
            Layer::Surface { grid, .. } => grid.clone(),
            Layer::Bars { bars, .. } => bars
                .iter()
                .flat_map(|&(x0, x1, h)| [[x0, 0.0, 0.0], [x1, h, 0.0]])
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Layer::Scatter { points, .. } | Layer::Polyline { points, .. } => points.len(),
            Layer::Segments { segments, .. } => segments.len(),
            Layer::Surface { grid, .. } => grid.len(),
            Layer::Bars { bars, .. } => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub layers: Vec<Layer>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn point_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty)
    }

    /// Axis-aligned bounds over all layers, `None` for an empty dataset.
    /// Non-finite coordinates are skipped.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        let mut any = false;

        for p in self.layers.iter().flat_map(Layer::points) {
            if !p.iter().all(|c| c.is_finite()) {
                continue;
            }
            any = true;
            for i in 0..3 {
                lo[i] = lo[i].min(p[i]);
                hi[i] = hi[i].max(p[i]);
            }
        }

        any.then_some((lo, hi))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter(points: Vec<Point3>) -> Layer {
        Layer::Scatter { points, values: None, color: 0xffffff, label: String::new() }
    }

    #[test]
    fn bounds_cover_every_layer() {
        let ds = Dataset::new()
            .with(scatter(vec![[0.0, 1.0, 2.0], [-1.0, 5.0, 0.0]]))
            .with(Layer::Bars { bars: vec![(10.0, 11.0, 3.0)], color: 0, label: String::new() });

        let (lo, hi) = ds.bounds().unwrap();
        assert_eq!(lo, [-1.0, 0.0, 0.0]);
        assert_eq!(hi, [11.0, 5.0, 2.0]);
        assert_eq!(ds.point_count(), 3);
    }

    #[test]
    fn bounds_skip_non_finite_points() {
        let ds = Dataset::new().with(scatter(vec![[f64::NAN, 0.0, 0.0], [1.0, 1.0, 1.0]]));
        assert_eq!(ds.bounds(), Some(([1.0; 3], [1.0; 3])));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        assert!(Dataset::new().bounds().is_none());
        assert!(Dataset::new().with(scatter(vec![])).is_empty());
    }

    #[test]
    fn serializes_to_json() {
        let ds = Dataset::new().with(scatter(vec![[1.0, 2.0, 3.0]]));
        let json = ds.to_json().unwrap();
        assert!(json.contains("Scatter"));
        assert!(json.contains("[1.0,2.0,3.0]"));
    }
}
