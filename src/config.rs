use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub width: usize,           // window / snapshot size in pixels
    pub height: usize,
    pub target_fps: usize,
    pub seed: u64,              // every random dataset is drawn from this
    pub animation_interval_ms: u64,
    pub point_radius: usize,
    pub background: u32,        // 0xRRGGBB
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            target_fps: 30,
            seed: 42,
            animation_interval_ms: 50,
            point_radius: 2,
            background: 0x101018,
        }
    }
}

impl VizConfig {
    /// Defaults when no path is given or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(Error::Config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        assert_eq!(VizConfig::load(None).unwrap(), VizConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(VizConfig::load(Some(&missing)).unwrap(), VizConfig::default());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 7, "width": 320 }}"#).unwrap();
        let config = VizConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 320);
        assert_eq!(config.height, VizConfig::default().height);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "seed = 7").unwrap();
        assert!(matches!(VizConfig::load(Some(file.path())), Err(Error::Config(_))));
    }
}
