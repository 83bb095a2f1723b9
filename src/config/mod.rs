//! # Configuration Management Module
//!
//! Settings for the game engine and the terminal front end, loaded from TOML.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - engine tuning (seed, spawn odds, critical and special
//!   chances, mitigation policy, inventory capacity, message-log size) and the
//!   default character
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mystic_realms::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     println!("Spawn chance: {}", config.game.normal_spawn_chance);
//!
//!     Config::create_default("config.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! seed = 42
//! normal_spawn_chance = 0.3
//! combat_spawn_chance = 1.0
//! mitigation = "raw"
//! player_name = "Wanderer"
//! player_class = "knight"
//!
//! [logging]
//! level = "debug"
//! file = "mystic-realms.log"
//! ```
//!
//! Every field has a default, so a partial file (or an empty one) loads.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::game::types::{CharacterClass, MitigationPolicy};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed for reproducible sessions; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Pack size limit; unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_capacity: Option<usize>,
    pub normal_spawn_chance: f64,
    pub combat_spawn_chance: f64,
    /// Chance a spawned enemy carries an item.
    pub enemy_drop_chance: f64,
    pub crit_chance: f64,
    pub boss_special_chance: f64,
    pub mitigation: MitigationPolicy,
    pub message_log_limit: usize,
    pub player_name: String,
    pub player_class: CharacterClass,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            inventory_capacity: None,
            normal_spawn_chance: 0.3,
            combat_spawn_chance: 1.0,
            enemy_drop_chance: 0.3,
            crit_chance: 0.1,
            boss_special_chance: 0.3,
            mitigation: MitigationPolicy::Raw,
            message_log_limit: 50,
            player_name: "Wanderer".to_string(),
            player_class: CharacterClass::Knight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.normal_spawn_chance, 0.3);
        assert_eq!(config.combat_spawn_chance, 1.0);
        assert_eq!(config.crit_chance, 0.1);
        assert_eq!(config.boss_special_chance, 0.3);
        assert_eq!(config.mitigation, MitigationPolicy::Raw);
        assert_eq!(config.message_log_limit, 50);
        assert!(config.seed.is_none());
        assert!(config.inventory_capacity.is_none());
    }

    #[test]
    fn test_game_config_serde() {
        let config = GameConfig {
            seed: Some(9),
            mitigation: MitigationPolicy::EnemyDefense,
            player_class: CharacterClass::Archer,
            ..GameConfig::default()
        };

        let serialized = serde_json::to_string(&config).unwrap();
        assert!(serialized.contains("\"mitigation\":\"enemy_defense\""));
        assert!(serialized.contains("\"player_class\":\"archer\""));

        let deserialized: GameConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[game]\nseed = 7\n").unwrap();
        assert_eq!(config.game.seed, Some(7));
        assert_eq!(config.game.message_log_limit, 50);
        assert_eq!(config.logging.level, "warn");

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_create_default_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_string_lossy().to_string();

        Config::create_default(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Config::load("/nonexistent/mystic.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mystic.toml"));
    }
}
