//! Agent configuration loaded from TOML. Every field has a default, so an empty file is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::neighborhood::in_bounds;
use crate::types::{Coord, DEFAULT_GRID_SIZE, MAX_GRID_SIZE};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub grid_size: usize,
    pub start: Coord,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { grid_size: DEFAULT_GRID_SIZE, start: Coord::new(0, 0) }
    }
}

impl AgentConfig {
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self { grid_size, ..Self::default() }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge { size: self.grid_size, max: MAX_GRID_SIZE });
        }
        if !in_bounds(self.grid_size, self.start) {
            return Err(ConfigError::StartOutOfBounds { start: self.start, size: self.grid_size });
        }
        Ok(())
    }
}
