pub mod math;
pub mod error;
pub mod config;
pub mod dataset;
pub mod scene;
pub mod canvas;
pub mod harness;
pub mod console;
pub mod stats;
pub mod tesseract;
pub mod primes;
pub mod zeta;
pub mod cosmology;
pub mod coherence;
pub mod knots;
pub mod geometry;
pub mod coloring;
pub mod demos;
pub mod visualizer;

pub use math::{C, linspace, logspace};
pub use error::{Error, Result, HarnessError, CommandError};
pub use config::VizConfig;
pub use dataset::{Dataset, Layer, Point3};
pub use scene::{SceneState, Style, Colormap, Projection, Limits};
pub use canvas::{Canvas, Overlay, render_scene};
pub use harness::{Control, Demo, Event, Harness, ParameterSet, Update};
pub use console::{Command, parse_command};
pub use demos::DemoKind;
pub use visualizer::{Reply, execute, render_frame, run_window, save_snapshot, export_dataset};
