use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest width or height accepted for the grid
pub const MAX_GRID_SIDE: usize = 1000;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs the values it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Length of the snake after a reset
    pub initial_snake_length: usize,

    // Timing
    /// Tick interval at the start of a game, in milliseconds
    pub initial_speed_ms: u64,
    /// The tick interval never drops below this
    pub min_speed_ms: u64,
    /// How much the interval shrinks at each speed-up
    pub speed_step_ms: u64,
    /// Speed up whenever the score is a multiple of this
    pub speed_up_every: u32,

    /// Points awarded per food eaten
    pub food_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            initial_snake_length: 1,
            initial_speed_ms: 150,
            min_speed_ms: 60,
            speed_step_ms: 10,
            speed_up_every: 50,
            food_score: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width.saturating_mul(self.grid_height)
    }

    /// Validate configuration parameters
    ///
    /// The snake starts at the centre of the grid with its body trailing to
    /// the left, so the body has to fit between the centre and the left wall.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(format!(
                "grid sides must be at most {}, got {}x{}",
                MAX_GRID_SIDE, self.grid_width, self.grid_height
            ));
        }

        if self.cell_count() < 2 {
            return Err("grid must have room for the snake and one food".to_string());
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(format!(
                "initial_snake_length ({}) does not fit in a grid {} cells wide",
                self.initial_snake_length, self.grid_width
            ));
        }

        if self.initial_snake_length >= self.cell_count() {
            return Err(format!(
                "initial_snake_length ({}) leaves no room for food",
                self.initial_snake_length
            ));
        }

        if self.min_speed_ms == 0 {
            return Err("min_speed_ms must be positive".to_string());
        }

        if self.initial_speed_ms < self.min_speed_ms {
            return Err(format!(
                "initial_speed_ms ({}) cannot be below min_speed_ms ({})",
                self.initial_speed_ms, self.min_speed_ms
            ));
        }

        if self.speed_up_every == 0 {
            return Err("speed_up_every must be at least 1".to_string());
        }

        if self.food_score == 0 {
            return Err("food_score must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 1);
        assert_eq!(config.initial_speed_ms, 150);
        assert_eq!(config.min_speed_ms, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.food_score, 10);
    }

    #[test]
    fn test_validation_rejects_tiny_grid() {
        assert!(GameConfig::new(0, 5).validate().is_err());
        assert!(GameConfig::new(1, 1).validate().is_err());
        assert!(GameConfig::new(2, 1).validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_huge_grid() {
        assert!(GameConfig::new(usize::MAX, 2).validate().is_err());
        assert!(GameConfig::new(2, usize::MAX).validate().is_err());
        assert!(GameConfig::new(usize::MAX, usize::MAX).validate().is_err());
        assert!(GameConfig::new(100_000, 100_000).validate().is_err());
        assert!(GameConfig::new(MAX_GRID_SIDE + 1, 10).validate().is_err());
        assert!(GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE).validate().is_ok());
    }

    #[test]
    fn test_cell_count_saturates() {
        assert_eq!(GameConfig::new(usize::MAX, 2).cell_count(), usize::MAX);
    }

    #[test]
    fn test_validation_snake_must_fit() {
        let mut config = GameConfig::new(10, 10);
        config.initial_snake_length = 6;
        assert!(config.validate().is_ok());

        config.initial_snake_length = 7;
        assert!(config.validate().is_err());

        config.initial_snake_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_speeds() {
        let mut config = GameConfig::default();
        config.initial_speed_ms = 50;
        assert!(config.validate().is_err());

        config.initial_speed_ms = 60;
        assert!(config.validate().is_ok());

        config.min_speed_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_scoring() {
        let mut config = GameConfig::default();
        config.speed_up_every = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.food_score = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid_width": 12, "min_speed_ms": 80}}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.min_speed_ms, 80);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_speed_ms, 150);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = GameConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GameConfig::load(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
