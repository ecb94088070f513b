//! Map coloring: region adjacency graphs, greedy coloring and manual
//! recoloring with neighbour checks.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::palette_color;
use crate::dataset::{Dataset, Layer, Point3};
use crate::error::HarnessError;
use crate::harness::{Control, Demo, ParameterSet, Update};
use crate::scene::{Limits, Style, GRAY};

pub const COLOR_NAMES: [&str; 4] = ["Red", "Blue", "Green", "Yellow"];

/// Region adjacency: one node per region, one edge per shared border.
pub type MapGraph = UnGraph<(), ()>;

fn with_regions(n: usize, edges: usize) -> (MapGraph, Vec<NodeIndex>) {
    let mut graph = MapGraph::with_capacity(n, edges);
    let nodes = (0..n).map(|_| graph.add_node(())).collect();
    (graph, nodes)
}

/// Eight regions with shared borders.
pub fn sample_map() -> MapGraph {
    const BORDERS: [(usize, usize); 14] = [
        (1, 2), (1, 3), (2, 3), (2, 4), (3, 4),
        (3, 5), (4, 5), (4, 6), (5, 6), (5, 7),
        (6, 7), (7, 8), (5, 8), (6, 8),
    ];
    let (mut graph, nodes) = with_regions(8, BORDERS.len());
    for (a, b) in BORDERS {
        graph.add_edge(nodes[a - 1], nodes[b - 1], ());
    }
    graph
}

/// Erdős–Rényi `G(n, p)`: every pair independently with probability `p`.
pub fn gnp_random_graph(n: usize, p: f64, rng: &mut impl Rng) -> MapGraph {
    let (mut graph, nodes) = with_regions(n, 0);
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.r#gen::<f64>() < p {
                graph.add_edge(nodes[a], nodes[b], ());
            }
        }
    }
    graph
}

/// Border list as region index pairs, in insertion order.
pub fn borders(graph: &MapGraph) -> Vec<(usize, usize)> {
    graph
        .edge_references()
        .map(|e| (e.source().index(), e.target().index()))
        .collect()
}

/// Neighbours of `node` in the order their borders were added.
pub fn neighbors(graph: &MapGraph, node: usize) -> Vec<usize> {
    let node = NodeIndex::new(node);
    let mut incident: Vec<_> = graph
        .edges(node)
        .map(|e| (e.id(), if e.source() == node { e.target() } else { e.source() }))
        .collect();
    incident.sort_by_key(|&(id, _)| id);
    incident.into_iter().map(|(_, n)| n.index()).collect()
}

pub fn degree(graph: &MapGraph, node: usize) -> usize {
    graph.edges(NodeIndex::new(node)).count()
}

/// Largest-first greedy coloring. Nodes are visited by degree, highest
/// first (ties by node id), and each takes the smallest color index not
/// held by an already-colored neighbour.
pub fn greedy_color(graph: &MapGraph) -> Vec<usize> {
    let n = graph.node_count();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&node| std::cmp::Reverse(degree(graph, node)));

    let mut colors: Vec<Option<usize>> = vec![None; n];
    for node in order {
        let taken: Vec<usize> = graph
            .neighbors(NodeIndex::new(node))
            .filter_map(|other| colors[other.index()])
            .collect();
        let color = (0..).find(|c| !taken.contains(c)).unwrap_or(0);
        colors[node] = Some(color);
    }
    colors.into_iter().map(|c| c.unwrap_or(0)).collect()
}

/// First neighbour of `node` (in border order) sharing its color.
pub fn conflict(graph: &MapGraph, colors: &[usize], node: usize) -> Option<usize> {
    neighbors(graph, node).into_iter().find(|&n| colors[n] == colors[node])
}

pub fn is_proper(graph: &MapGraph, colors: &[usize]) -> bool {
    graph
        .edge_references()
        .all(|e| colors[e.source().index()] != colors[e.target().index()])
}

/// Fruchterman–Reingold force-directed layout, rescaled into `[-1, 1]^2`.
/// Starts from seeded random positions, so equal seeds give equal layouts.
pub fn spring_layout(graph: &MapGraph, iterations: usize, seed: u64) -> Vec<[f64; 2]> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![[0.0, 0.0]];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.r#gen::<f64>(), rng.r#gen::<f64>()]).collect();
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (iterations + 1) as f64;

    for _ in 0..iterations {
        let mut shift = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                // repulsion k^2/d between every pair
                let force = k * k / dist;
                shift[i][0] += dx / dist * force;
                shift[i][1] += dy / dist * force;
            }
        }
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let dx = pos[a][0] - pos[b][0];
            let dy = pos[a][1] - pos[b][1];
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            // attraction d^2/k along edges
            let force = dist * dist / k;
            shift[a][0] -= dx / dist * force;
            shift[a][1] -= dy / dist * force;
            shift[b][0] += dx / dist * force;
            shift[b][1] += dy / dist * force;
        }
        for (p, s) in pos.iter_mut().zip(&shift) {
            let len = (s[0] * s[0] + s[1] * s[1]).sqrt().max(0.01);
            let step = len.min(temperature);
            p[0] += s[0] / len * step;
            p[1] += s[1] / len * step;
        }
        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

fn rescale(pos: &mut [[f64; 2]]) {
    let n = pos.len() as f64;
    let center = [
        pos.iter().map(|p| p[0]).sum::<f64>() / n,
        pos.iter().map(|p| p[1]).sum::<f64>() / n,
    ];
    let extent = pos
        .iter()
        .map(|p| (p[0] - center[0]).abs().max((p[1] - center[1]).abs()))
        .fold(0.0, f64::max);
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
    for p in pos.iter_mut() {
        p[0] = (p[0] - center[0]) * scale;
        p[1] = (p[1] - center[1]) * scale;
    }
}

/// A map graph colored greedily, with manual recoloring on top.
pub struct FourColorDemo {
    title: String,
    graph: MapGraph,
    greedy: Vec<usize>,
    layout: Vec<[f64; 2]>,
}

impl FourColorDemo {
    const LAYOUT_ITERATIONS: usize = 50;

    pub fn new(title: impl Into<String>, graph: MapGraph, seed: u64) -> Self {
        let greedy = greedy_color(&graph).into_iter().map(|c| c % COLOR_NAMES.len()).collect();
        let layout = spring_layout(&graph, Self::LAYOUT_ITERATIONS, seed);
        FourColorDemo { title: title.into(), graph, greedy, layout }
    }

    pub fn sample(seed: u64) -> Self {
        Self::new("Map Coloring - Four-Color Theorem", sample_map(), seed)
    }

    pub fn random(n: usize, p: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = gnp_random_graph(n, p, &mut rng);
        Self::new("Interactive Map Coloring - Four-Color Theorem", graph, seed)
    }

    /// Greedy colors with the manual assignments applied on top.
    pub fn colors(&self, params: &ParameterSet) -> Vec<usize> {
        let mut colors = self.greedy.clone();
        for (&node, &color) in params.assignments() {
            if let Some(slot) = colors.get_mut(node) {
                *slot = color;
            }
        }
        colors
    }

    fn point(&self, node: usize) -> Point3 {
        let [x, y] = self.layout[node];
        [x, y, 0.0]
    }
}

impl Demo for FourColorDemo {
    fn title(&self) -> &str {
        &self.title
    }

    fn controls(&self) -> Vec<Control> {
        vec![Control::button("recolor")]
    }

    fn generate(&self, params: &ParameterSet) -> Dataset {
        let colors = self.colors(params);
        let segments = borders(&self.graph).into_iter().map(|(a, b)| (self.point(a), self.point(b))).collect();
        let mut dataset = Dataset::new().with(Layer::Segments {
            segments,
            values: None,
            color: GRAY,
            label: "borders".into(),
        });

        for (index, name) in COLOR_NAMES.iter().enumerate() {
            let points: Vec<Point3> = (0..self.graph.node_count())
                .filter(|&n| colors[n] == index)
                .map(|n| self.point(n))
                .collect();
            if !points.is_empty() {
                dataset.push(Layer::Scatter { points, values: None, color: palette_color(index), label: name.to_string() });
            }
        }
        dataset
    }

    fn style(&self, _params: &ParameterSet) -> Style {
        Style::new(self.title.clone()).plane().limits(Limits::cube(1.2)).labels("", "", "")
    }

    fn summary(&self, params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        let colors = self.colors(params);
        let mut used = colors.clone();
        used.sort_unstable();
        used.dedup();
        let conflicts = borders(&self.graph).into_iter().filter(|&(a, b)| colors[a] == colors[b]).count();
        vec![
            format!(
                "Regions: {}, borders: {}, colors used: {}",
                self.graph.node_count(),
                self.graph.edge_count(),
                used.len()
            ),
            if conflicts == 0 {
                "No neighbouring regions share a color.".to_string()
            } else {
                format!("Conflicting borders: {}", conflicts)
            },
        ]
    }

    fn press(&self, params: &ParameterSet, button: &str) -> Result<Update, HarnessError> {
        match button {
            "recolor" => Ok(Update {
                params: params.without_assignments(),
                messages: vec!["Recolored with the greedy coloring.".to_string()],
            }),
            _ => Err(HarnessError::Unsupported("this button")),
        }
    }

    fn assign(&self, params: &ParameterSet, item: i64, value: i64) -> Result<Update, HarnessError> {
        if !(0..COLOR_NAMES.len() as i64).contains(&value) {
            return Err(HarnessError::InvalidColor(value));
        }
        let regions = self.graph.node_count();
        if item < 1 || item > regions as i64 {
            return Err(HarnessError::UnknownRegion { region: item, regions });
        }

        let node = (item - 1) as usize;
        let color = value as usize;
        let next = params.with_assignment(node, color);
        let message = match conflict(&self.graph, &self.colors(&next), node) {
            Some(neighbor) => format!(
                "Invalid! Region {} shares the same color with its neighbor Region {}.",
                item,
                neighbor + 1
            ),
            None => format!("Region {} is now {}.", item, COLOR_NAMES[color]),
        };
        Ok(Update { params: next, messages: vec![message] })
    }
}
