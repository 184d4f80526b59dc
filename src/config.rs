//! Game Specification - the caller's declarative description of the game
//! to generate. Immutable once constructed; the pipeline only reads it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::catalog::{GameGenre, TargetPlatform};

#[derive(Debug, Error)]
pub enum SpecLoadError {
    #[error("Failed to read specification file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse specification: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSpec {
    pub genre: GameGenre,
    /// Genre-specific payload. Keys beyond the genre schema are permitted
    /// and passed through untouched.
    #[serde(default)]
    pub details: HashMap<String, serde_json::Value>,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default)]
    pub platform: TargetPlatform,
}

fn default_engine() -> String {
    "sim".to_string()
}

fn default_target_fps() -> u32 {
    60
}

impl GameSpec {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, SpecLoadError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
