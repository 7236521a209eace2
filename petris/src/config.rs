//! Configuration for a game session

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PetrisError, Result};

/// Gravity period in milliseconds for each level, the last entry applies to every level beyond
pub const DEFAULT_SPEED_TABLE_MS: [u64; 12] = [1000, 900, 800, 700, 600, 500, 400, 200, 100, 50, 25, 0];

/// Points for clearing 1, 2, 3, 4 and 5 lines at once
pub const DEFAULT_LINE_SCORES: [u64; 5] = [1, 5, 10, 50, 100];

/// Main configuration for a Session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub width: usize,

    /// Board height in cells
    pub height: usize,

    /// Scheduler period (in milliseconds)
    pub tick_ms: u64,

    /// Gravity period per level (in milliseconds)
    pub speed_table_ms: Vec<u64>,

    /// Reward per simultaneous line count, index 0 is one line
    pub line_scores: Vec<u64>,

    /// Points needed per level
    pub level_threshold: u64,

    /// Number of colors a piece can be drawn with
    pub palette_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 12,
            tick_ms: 80,
            speed_table_ms: DEFAULT_SPEED_TABLE_MS.to_vec(),
            line_scores: DEFAULT_LINE_SCORES.to_vec(),
            level_threshold: 1000,
            palette_size: 8,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file, missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the board size
    pub fn with_board_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the scheduler period in milliseconds
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Set the gravity period table
    pub fn with_speed_table_ms(mut self, table: Vec<u64>) -> Self {
        self.speed_table_ms = table;
        self
    }

    /// Set the line reward table
    pub fn with_line_scores(mut self, scores: Vec<u64>) -> Self {
        self.line_scores = scores;
        self
    }

    /// Set the number of points per level
    pub fn with_level_threshold(mut self, threshold: u64) -> Self {
        self.level_threshold = threshold;
        self
    }

    /// Set the palette size
    pub fn with_palette_size(mut self, palette_size: usize) -> Self {
        self.palette_size = palette_size;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Check that a session can be built from this configuration
    pub fn validate(&self) -> Result<()> {
        if self.width < 4 || self.height < 4 {
            return Err(PetrisError::InvalidConfig(format!(
                "board must be at least 4x4, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tick_ms == 0 {
            return Err(PetrisError::InvalidConfig(
                "tick period must be positive".to_string(),
            ));
        }
        if self.speed_table_ms.is_empty() {
            return Err(PetrisError::InvalidConfig(
                "speed table cannot be empty".to_string(),
            ));
        }
        if self.line_scores.is_empty() {
            return Err(PetrisError::InvalidConfig(
                "line score table cannot be empty".to_string(),
            ));
        }
        if self.level_threshold == 0 {
            return Err(PetrisError::InvalidConfig(
                "level threshold must be positive".to_string(),
            ));
        }
        if self.palette_size == 0 || self.palette_size > 256 {
            return Err(PetrisError::InvalidConfig(format!(
                "palette size must be within 1..=256, got {}",
                self.palette_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 12);
        assert_eq!(config.tick_interval(), Duration::from_millis(80));
    }

    #[test]
    fn test_rejects_small_board() {
        let config = GameConfig::new().with_board_size(3, 12);
        match config.validate() {
            Err(PetrisError::InvalidConfig(_)) => {}
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_tables() {
        assert!(GameConfig::new().with_speed_table_ms(vec![]).validate().is_err());
        assert!(GameConfig::new().with_line_scores(vec![]).validate().is_err());
        assert!(GameConfig::new().with_palette_size(0).validate().is_err());
        assert!(GameConfig::new().with_tick_ms(0).validate().is_err());
        assert!(GameConfig::new().with_level_threshold(0).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"width": 10, "tick_ms": 50}"#).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 12);
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.line_scores, DEFAULT_LINE_SCORES.to_vec());
    }

    #[test]
    fn test_from_file_missing() {
        let result = GameConfig::from_file("/nonexistent/petris.json");
        assert!(matches!(result, Err(PetrisError::Io(_))));
    }
}
