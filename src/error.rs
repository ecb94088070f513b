//! Error types.

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure failures: anything outside the pure generate/render path.
#[derive(Debug, Error)]
pub enum Error {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("dataset export failed: {0}")]
    Export(#[source] serde_json::Error),
}

/// An event the harness refused. State is left untouched when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HarnessError {
    #[error("no control named '{0}'")]
    UnknownControl(String),

    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("'{option}' is not an option of {name} (expected one of: {})", .expected.join(", "))]
    UnknownOption {
        name: String,
        option: String,
        expected: Vec<String>,
    },

    #[error("color {0} is not valid, pick 0=Red, 1=Blue, 2=Green, 3=Yellow")]
    InvalidColor(i64),

    #[error("region {region} does not exist (1-{regions})")]
    UnknownRegion { region: i64, regions: usize },

    #[error("{0} is not supported by this demo")]
    Unsupported(&'static str),
}

/// Malformed console input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a number")]
    NotANumber(String),
}
