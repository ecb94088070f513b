//! The re-render loop every demo plugs into.
//!
//! A [`Harness`] owns exactly one [`ParameterSet`], the [`Dataset`] generated
//! from it, and the [`SceneState`] built for display. Input arrives as
//! [`Event`] values; each one is validated, turned into a fresh parameter
//! set, and followed by a full regenerate + render before the next event is
//! looked at. A rejected event leaves all three untouched.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::canvas::Overlay;
use crate::dataset::Dataset;
use crate::error::HarnessError;
use crate::scene::{SceneState, Style};

/// A user-facing input declared by a demo.
#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    Slider {
        name: &'static str,
        min: f64,
        max: f64,
        step: f64,
        init: f64,
    },
    Button {
        name: &'static str,
    },
    Radio {
        name: &'static str,
        options: Vec<&'static str>,
        init: &'static str,
    },
}

impl Control {
    pub fn slider(name: &'static str, min: f64, max: f64, step: f64, init: f64) -> Self {
        Control::Slider { name, min, max, step, init }
    }

    pub fn button(name: &'static str) -> Self {
        Control::Button { name }
    }

    pub fn radio(name: &'static str, options: &[&'static str], init: &'static str) -> Self {
        Control::Radio { name, options: options.to_vec(), init }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Control::Slider { name, .. } | Control::Button { name } | Control::Radio { name, .. } => *name,
        }
    }

    fn describe(&self, params: &ParameterSet) -> String {
        match self {
            Control::Slider { name, min, max, .. } => format!(
                "{}: {:.3} [{}..{}]",
                name,
                params.get(name).unwrap_or(*min),
                min,
                max
            ),
            Control::Button { name } => format!("[{}]", name),
            Control::Radio { name, init, .. } => {
                format!("{}: {}", name, params.choice(name).unwrap_or(*init))
            }
        }
    }
}

/// Named inputs for one render. Never mutated once built: every `with_*`
/// returns a new set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<String, f64>,
    choices: BTreeMap<String, String>,
    counters: BTreeMap<String, u64>,
    assignments: BTreeMap<usize, usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults taken from each control's initial value.
    pub fn from_controls(controls: &[Control]) -> Self {
        controls.iter().fold(Self::new(), |params, control| match control {
            Control::Slider { name, init, .. } => params.with(name, *init),
            Control::Radio { name, init, .. } => params.with_choice(name, init),
            Control::Button { .. } => params,
        })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        self.choices.get(name).map(String::as_str)
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Manual per-item overrides (region -> color for map coloring).
    pub fn assignments(&self) -> &BTreeMap<usize, usize> {
        &self.assignments
    }

    pub fn with(&self, name: &str, value: f64) -> Self {
        let mut next = self.clone();
        next.values.insert(name.to_string(), value);
        next
    }

    pub fn with_choice(&self, name: &str, option: &str) -> Self {
        let mut next = self.clone();
        next.choices.insert(name.to_string(), option.to_string());
        next
    }

    pub fn with_counter(&self, name: &str, value: u64) -> Self {
        let mut next = self.clone();
        next.counters.insert(name.to_string(), value);
        next
    }

    pub fn with_assignment(&self, item: usize, value: usize) -> Self {
        let mut next = self.clone();
        next.assignments.insert(item, value);
        next
    }

    pub fn without_assignments(&self) -> Self {
        let mut next = self.clone();
        next.assignments.clear();
        next
    }
}

/// One discrete input. Events carry the new value; the harness resolves it
/// against its own state.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Slider { name: String, value: f64 },
    /// Move a slider by whole steps, or cycle a radio selection.
    Nudge { name: String, steps: i32 },
    Button(String),
    Radio { name: String, option: String },
    /// Manual assignment, e.g. region -> color. Both are user-facing
    /// numbers: regions count from 1.
    Assign { item: i64, value: i64 },
    /// Advance an animation by one frame.
    Tick,
}

/// A demo's answer to an event it handles itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub params: ParameterSet,
    pub messages: Vec<String>,
}

impl Update {
    pub fn quiet(params: ParameterSet) -> Self {
        Update { params, messages: Vec::new() }
    }
}

/// A parametric demonstration: parameters in, dataset out.
///
/// `generate` must be a pure function of its parameters; anything random is
/// drawn once when the demo is constructed.
pub trait Demo {
    fn title(&self) -> &str;

    fn controls(&self) -> Vec<Control> {
        Vec::new()
    }

    fn defaults(&self) -> ParameterSet {
        ParameterSet::from_controls(&self.controls())
    }

    fn generate(&self, params: &ParameterSet) -> Dataset;

    fn style(&self, params: &ParameterSet) -> Style;

    /// Console lines describing the current dataset, one statistic each.
    fn summary(&self, _params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
        Vec::new()
    }

    /// Buttons other than `reset`.
    fn press(&self, _params: &ParameterSet, _button: &str) -> Result<Update, HarnessError> {
        Err(HarnessError::Unsupported("this button"))
    }

    fn assign(&self, _params: &ParameterSet, _item: i64, _value: i64) -> Result<Update, HarnessError> {
        Err(HarnessError::Unsupported("manual assignment"))
    }

    /// Number of frames in a looping animation; `None` for static demos.
    fn frames(&self) -> Option<u64> {
        None
    }
}

pub struct Harness {
    demo: Box<dyn Demo>,
    controls: Vec<Control>,
    params: ParameterSet,
    scene: SceneState,
}

impl Harness {
    pub fn new(demo: Box<dyn Demo>) -> Self {
        let controls = demo.controls();
        let params = demo.defaults();
        let scene = build_scene(demo.as_ref(), &params, 0);
        info!(demo = demo.title(), points = scene.dataset.point_count(), "initial render");
        Harness { demo, controls, params, scene }
    }

    pub fn title(&self) -> &str {
        self.demo.title()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn dataset(&self) -> &Dataset {
        &self.scene.dataset
    }

    pub fn is_animated(&self) -> bool {
        self.demo.frames().is_some()
    }

    /// Summary of what is on screen now.
    pub fn summary(&self) -> Vec<String> {
        self.scene.status.clone()
    }

    pub fn overlay(&self, focused: Option<usize>) -> Overlay {
        Overlay {
            controls: self.controls.iter().map(|c| c.describe(&self.params)).collect(),
            focused,
        }
    }

    /// Apply one event. On success the scene has been rebuilt and the
    /// returned lines are for the console. On error nothing changed.
    pub fn handle(&mut self, event: Event) -> Result<Vec<String>, HarnessError> {
        debug!(?event, "handling event");
        let update = match self.resolve(&event) {
            Ok(update) => update,
            Err(err) => {
                warn!(demo = self.demo.title(), %err, "event rejected");
                return Err(err);
            }
        };

        let revision = self.scene.revision + 1;
        self.scene = build_scene(self.demo.as_ref(), &update.params, revision);
        self.params = update.params;

        let mut messages = update.messages;
        if !matches!(event, Event::Tick) {
            messages.extend(self.scene.status.iter().cloned());
        }
        Ok(messages)
    }

    fn control(&self, name: &str) -> Result<&Control, HarnessError> {
        self.controls
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| HarnessError::UnknownControl(name.to_string()))
    }

    fn resolve(&self, event: &Event) -> Result<Update, HarnessError> {
        match event {
            Event::Slider { name, value } => match self.control(name)? {
                Control::Slider { min, max, .. } => {
                    if !value.is_finite() || *value < *min || *value > *max {
                        return Err(HarnessError::OutOfRange {
                            name: name.clone(),
                            value: *value,
                            min: *min,
                            max: *max,
                        });
                    }
                    Ok(Update::quiet(self.params.with(name, *value)))
                }
                _ => Err(HarnessError::UnknownControl(name.clone())),
            },
            Event::Nudge { name, steps } => match self.control(name)? {
                Control::Slider { min, max, step, init, .. } => {
                    let current = self.params.get(name).unwrap_or(*init);
                    let value = (current + *steps as f64 * step).clamp(*min, *max);
                    Ok(Update::quiet(self.params.with(name, value)))
                }
                Control::Radio { options, init, .. } => {
                    let current = self.params.choice(name).unwrap_or(*init);
                    let idx = options.iter().position(|o| *o == current).unwrap_or(0) as i64;
                    let next = (idx + *steps as i64).rem_euclid(options.len() as i64) as usize;
                    Ok(Update::quiet(self.params.with_choice(name, options[next])))
                }
                Control::Button { .. } => Err(HarnessError::UnknownControl(name.clone())),
            },
            Event::Radio { name, option } => match self.control(name)? {
                Control::Radio { options, .. } => {
                    if !options.iter().any(|o| *o == option.as_str()) {
                        return Err(HarnessError::UnknownOption {
                            name: name.clone(),
                            option: option.clone(),
                            expected: options.iter().map(|o| o.to_string()).collect(),
                        });
                    }
                    Ok(Update::quiet(self.params.with_choice(name, option)))
                }
                _ => Err(HarnessError::UnknownControl(name.clone())),
            },
            Event::Button(name) => match self.control(name)? {
                Control::Button { .. } if name == "reset" => {
                    Ok(Update::quiet(self.demo.defaults()))
                }
                Control::Button { .. } => self.demo.press(&self.params, name),
                _ => Err(HarnessError::UnknownControl(name.clone())),
            },
            Event::Assign { item, value } => self.demo.assign(&self.params, *item, *value),
            Event::Tick => {
                let frames = self
                    .demo
                    .frames()
                    .ok_or(HarnessError::Unsupported("animation"))?;
                let frame = (self.params.counter("frame") + 1) % frames.max(1);
                Ok(Update::quiet(self.params.with_counter("frame", frame)))
            }
        }
    }
}

fn build_scene(demo: &dyn Demo, params: &ParameterSet, revision: u64) -> SceneState {
    let dataset = demo.generate(params);
    let status = demo.summary(params, &dataset);
    SceneState {
        style: demo.style(params),
        dataset,
        status,
        revision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Layer;

    struct Line;

    impl Demo for Line {
        fn title(&self) -> &str {
            "line"
        }

        fn controls(&self) -> Vec<Control> {
            vec![
                Control::slider("slope", -2.0, 2.0, 0.5, 1.0),
                Control::radio("shape", &["line", "dots"], "line"),
                Control::button("reset"),
            ]
        }

        fn generate(&self, params: &ParameterSet) -> Dataset {
            let k = params.get("slope").unwrap_or(1.0);
            let points = (0..3).map(|i| [i as f64, k * i as f64, 0.0]).collect();
            Dataset::new().with(Layer::Polyline { points, color: 0, label: "y = kx".into() })
        }

        fn style(&self, _params: &ParameterSet) -> Style {
            Style::new("line").plane()
        }

        fn summary(&self, params: &ParameterSet, _dataset: &Dataset) -> Vec<String> {
            vec![format!("Slope: {}", params.get("slope").unwrap_or(1.0))]
        }
    }

    #[test]
    fn defaults_come_from_controls() {
        let harness = Harness::new(Box::new(Line));
        assert_eq!(harness.params().get("slope"), Some(1.0));
        assert_eq!(harness.params().choice("shape"), Some("line"));
        assert_eq!(harness.scene().revision, 0);
    }

    #[test]
    fn slider_event_rebuilds_scene() {
        let mut harness = Harness::new(Box::new(Line));
        let lines = harness
            .handle(Event::Slider { name: "slope".into(), value: -1.5 })
            .unwrap();
        assert_eq!(lines, vec!["Slope: -1.5".to_string()]);
        assert_eq!(harness.scene().revision, 1);
        match &harness.dataset().layers[0] {
            Layer::Polyline { points, .. } => assert_eq!(points[2], [2.0, -3.0, 0.0]),
            other => panic!("unexpected layer {:?}", other),
        }
    }

    #[test]
    fn rejected_events_leave_state_untouched() {
        let mut harness = Harness::new(Box::new(Line));
        let before = harness.scene().clone();
        let params = harness.params().clone();

        let bad = [
            Event::Slider { name: "slope".into(), value: 9.0 },
            Event::Slider { name: "slope".into(), value: f64::NAN },
            Event::Slider { name: "nope".into(), value: 0.0 },
            Event::Radio { name: "shape".into(), option: "cubes".into() },
            Event::Button("launch".into()),
            Event::Assign { item: 1, value: 2 },
            Event::Tick,
        ];
        for event in bad {
            assert!(harness.handle(event).is_err());
        }

        assert_eq!(harness.scene(), &before);
        assert_eq!(harness.params(), &params);
    }

    #[test]
    fn nudge_clamps_and_cycles() {
        let mut harness = Harness::new(Box::new(Line));
        harness.handle(Event::Nudge { name: "slope".into(), steps: 10 }).unwrap();
        assert_eq!(harness.params().get("slope"), Some(2.0));

        harness.handle(Event::Nudge { name: "shape".into(), steps: 1 }).unwrap();
        assert_eq!(harness.params().choice("shape"), Some("dots"));
        harness.handle(Event::Nudge { name: "shape".into(), steps: 1 }).unwrap();
        assert_eq!(harness.params().choice("shape"), Some("line"));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut harness = Harness::new(Box::new(Line));
        harness.handle(Event::Slider { name: "slope".into(), value: 0.0 }).unwrap();
        harness.handle(Event::Button("reset".into())).unwrap();
        assert_eq!(harness.params().get("slope"), Some(1.0));
    }

    #[test]
    fn overlay_lists_controls() {
        let harness = Harness::new(Box::new(Line));
        let overlay = harness.overlay(Some(1));
        assert_eq!(overlay.controls[1], "shape: line");
        assert_eq!(overlay.controls[2], "[reset]");
        assert!(overlay.controls[0].starts_with("slope: 1.000"));
    }

    #[test]
    fn parameter_sets_are_values() {
        let a = ParameterSet::new().with("x", 1.0);
        let b = a.with("x", 2.0);
        assert_eq!(a.get("x"), Some(1.0));
        assert_eq!(b.get("x"), Some(2.0));
        assert_eq!(b.with_assignment(3, 1).assignments().get(&3), Some(&1));
        assert!(a.assignments().is_empty());
    }
}
