// CLI configuration.
//
// `LifesongConfig` holds the few knobs the command-line tool exposes, loaded
// from an optional JSON file. Every field has a default, so a partial file
// (or none) is fine. Command-line flags override loaded values.
//
// The musical tables are compile-time constants, not config fields, so the
// same sequence and duration always give the same score.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifesongConfig {
    /// Piece length used when `--duration` is not given.
    pub default_duration_seconds: f64,
    /// Directory for output files given as bare names.
    pub output_dir: PathBuf,
    /// Shortest input (in cleaned symbols) the CLI accepts. The engine itself
    /// takes anything.
    pub min_sequence_length: usize,
}

impl Default for LifesongConfig {
    fn default() -> Self {
        LifesongConfig {
            default_duration_seconds: 45.0,
            output_dir: PathBuf::from("."),
            min_sequence_length: 3,
        }
    }
}

impl LifesongConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Resolve an output file name against `output_dir`. Absolute paths and
    /// paths with a directory component are used as given.
    pub fn output_path(&self, name: &Path) -> PathBuf {
        if name.is_absolute() || name.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
            name.to_path_buf()
        } else {
            self.output_dir.join(name)
        }
    }
}
