//! Decision engine configuration with documented constants
//!
//! All tunable numbers are collected here. Values are loaded from TOML
//! (`data/ai_config.toml` for the CLI); any missing key falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::error::{AiError, Result};

/// How the diplomatic engine turns a war chance into a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarDecisionMode {
    /// `war_chance > 0.5`, reproducible
    Threshold,
    /// `random() < war_chance` from a seeded generator
    Sampled,
}

/// Configuration for the faction decision engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    // === FACTIONS ===
    /// Faction name the human player controls
    pub player_faction: String,

    // === PRIORITY ENGINE ===
    /// Resource whose shortage triggers EconomyGrowth
    pub primary_resource: String,
    /// Resource whose shortage triggers ResourceProduction
    pub secondary_resource: String,
    pub primary_resource_floor: i64,
    pub secondary_resource_floor: i64,
    /// Armies smaller than this trigger ArmyRecruitment
    pub min_unit_count: u64,

    // === SNAPSHOT ===
    /// Max per-axis offset between two cities for their factions to be neighbors
    ///
    /// Checked on x and y independently, not as a Euclidean radius.
    pub neighbor_axis_threshold: f64,
    /// Unit classes that count as heroes
    pub hero_classes: Vec<u32>,
    /// Army limit contributed by each owned city
    pub units_per_city: u64,
    /// Upkeep consumed per unit per turn
    pub upkeep_per_unit: u64,

    // === MEMORY ===
    /// Max interactions retained per faction (oldest evicted first)
    pub interaction_cap: usize,
    /// Interactions copied into each snapshot's memory context
    pub memory_context_window: usize,
    /// Interactions used to derive the player's behavior profile
    pub behavior_window: usize,

    // === GENERATORS ===
    /// Budget for one pluggable generator call before falling back to rules
    pub generator_timeout_ms: u64,
    /// Max characters of any generated response, truncation marker included
    pub response_max_chars: usize,

    // === DIPLOMACY ===
    /// Peaceful turns below this relation propose trade
    pub trade_relation_threshold: i32,
    /// Turns before another trade proposal may be issued
    pub trade_proposal_cooldown: u64,
    pub war_decision: WarDecisionMode,
    /// Seed for `WarDecisionMode::Sampled`
    pub war_seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            player_faction: "player".to_string(),

            primary_resource: "gold".to_string(),
            secondary_resource: "food".to_string(),
            primary_resource_floor: 1000,
            secondary_resource_floor: 500,
            min_unit_count: 100,

            neighbor_axis_threshold: 280.0,
            hero_classes: vec![7, 8, 9],
            units_per_city: 200,
            upkeep_per_unit: 1,

            interaction_cap: 200,
            memory_context_window: 5,
            behavior_window: 10,

            generator_timeout_ms: 3000,
            response_max_chars: 500,

            trade_relation_threshold: 30,
            trade_proposal_cooldown: 5,
            war_decision: WarDecisionMode::Threshold,
            war_seed: 42,
        }
    }
}

impl AiConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; absent keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AiConfig = toml::from_str(contents)
            .map_err(|e| AiError::Config(format!("Failed to parse config TOML: {}", e)))?;
        config.validate().map_err(AiError::Config)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn generator_timeout(&self) -> Duration {
        Duration::from_millis(self.generator_timeout_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.interaction_cap == 0 {
            return Err("interaction_cap must be at least 1".into());
        }

        if self.memory_context_window > self.interaction_cap
            || self.behavior_window > self.interaction_cap
        {
            return Err(format!(
                "memory windows ({}, {}) must not exceed interaction_cap ({})",
                self.memory_context_window, self.behavior_window, self.interaction_cap
            ));
        }

        if self.neighbor_axis_threshold < 0.0 {
            return Err("neighbor_axis_threshold must not be negative".into());
        }

        // The marker alone is three characters
        if self.response_max_chars < 4 {
            return Err("response_max_chars must be at least 4".into());
        }

        if self.generator_timeout_ms == 0 {
            return Err("generator_timeout_ms must be positive".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interaction_cap, 200);
        assert_eq!(config.neighbor_axis_threshold, 280.0);
        assert_eq!(config.generator_timeout(), Duration::from_secs(3));
        assert_eq!(config.war_decision, WarDecisionMode::Threshold);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AiConfig::from_toml_str(
            r#"
            player_faction = "Rome"
            interaction_cap = 50
            war_decision = "sampled"
            "#,
        )
        .unwrap();
        assert_eq!(config.player_faction, "Rome");
        assert_eq!(config.interaction_cap, 50);
        assert_eq!(config.war_decision, WarDecisionMode::Sampled);
        assert_eq!(config.primary_resource, "gold");
        assert_eq!(config.behavior_window, 10);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = AiConfig::from_toml_str("interaction_cap = \"lots\"");
        assert!(matches!(result, Err(AiError::Config(_))));
    }

    #[test]
    fn test_validation_catches_window_larger_than_cap() {
        let config = AiConfig {
            interaction_cap: 4,
            ..AiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_catches_zero_timeout() {
        let config = AiConfig {
            generator_timeout_ms: 0,
            ..AiConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
