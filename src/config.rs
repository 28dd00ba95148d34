//! Match configuration loaded from TOML.

use crate::games::blokus::{Difficulty, GameSetup, ScoringRule, SeatKind};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for one match.
///
/// ```toml
/// seats = ["human", { ai = "hard" }]
/// board_size = 14
/// powerups = true
/// scoring = "classic"
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seat controllers in turn order.
    #[serde(default = "default_seats")]
    seats: Vec<SeatKind>,

    /// Board edge length; defaults by seat count when absent.
    #[serde(default)]
    board_size: Option<usize>,

    /// Whether powerup cells are placed at setup.
    #[serde(default = "default_powerups")]
    powerups: bool,

    /// End-of-game scoring rule.
    #[serde(default)]
    scoring: ScoringRule,

    /// Seed for AI randomness.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_seats() -> Vec<SeatKind> {
    vec![SeatKind::Ai(Difficulty::Medium), SeatKind::Ai(Difficulty::Hard)]
}

fn default_powerups() -> bool {
    true
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seats: default_seats(),
            board_size: None,
            powerups: default_powerups(),
            scoring: ScoringRule::default(),
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Creates a configuration for the given seats with default rules.
    pub fn new(seats: Vec<SeatKind>) -> Self {
        Self {
            seats,
            ..Self::default()
        }
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(seats = config.seats.len(), scoring = %config.scoring, "Config loaded successfully");
        Ok(config)
    }

    /// Replaces the seat list.
    pub fn with_seats(mut self, seats: Vec<SeatKind>) -> Self {
        self.seats = seats;
        self
    }

    /// Replaces the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Game setup described by this configuration.
    pub fn to_setup(&self) -> GameSetup {
        let setup = GameSetup::new(self.seats.clone())
            .with_powerups(self.powerups)
            .with_scoring(self.scoring);
        match self.board_size {
            Some(size) => setup.with_board_size(size),
            None => setup,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = MatchConfig::from_toml_str("").unwrap();
        assert_eq!(config, MatchConfig::default());
        assert!(*config.powerups());
    }

    #[test]
    fn test_full_toml() {
        let config = MatchConfig::from_toml_str(
            r#"
            seats = ["human", { ai = "hard" }, { ai = "easy" }]
            board_size = 16
            powerups = false
            scoring = "classic"
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(
            config.seats(),
            &vec![
                SeatKind::Human,
                SeatKind::Ai(Difficulty::Hard),
                SeatKind::Ai(Difficulty::Easy)
            ]
        );
        assert_eq!(*config.board_size(), Some(16));
        assert_eq!(*config.scoring(), ScoringRule::Classic);
        assert_eq!(*config.seed(), Some(9));

        let game = config.to_setup().build().unwrap();
        assert_eq!(game.board().size(), 16);
        assert!(game.board().powerup_cells().is_empty());
        assert_eq!(game.scoring(), ScoringRule::Classic);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seats = [{{ ai = \"medium\" }}, {{ ai = \"medium\" }}]").unwrap();
        let config = MatchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seats().len(), 2);
    }

    #[test]
    fn test_bad_file_reports_error() {
        let err = MatchConfig::from_file("/nonexistent/match.toml").unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
        let err = MatchConfig::from_toml_str("seats = 3").unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }
}
