//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Faction names are the key for every per-faction table
pub type FactionName = String;

/// Game turn counter
pub type Turn = u64;

/// Map position of a city
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both axes are independently within `threshold`
    pub fn within_axis_threshold(&self, other: &Self, threshold: f64) -> bool {
        (self.x - other.x).abs() <= threshold && (self.y - other.y).abs() <= threshold
    }

    /// Largest single-axis offset (Chebyshev distance)
    pub fn axis_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Diplomatic stance between two factions as stored by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiplomaticStatus {
    Peace,
    Trade,
    War,
}

impl std::fmt::Display for DiplomaticStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Peace => "peace",
            Self::Trade => "trade",
            Self::War => "war",
        };
        f.write_str(label)
    }
}

/// Building kinds the planner can ask the gateway for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingType {
    Factory,
    Mine,
    Hospital,
    Barracks,
}

impl std::fmt::Display for BuildingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Factory => "factory",
            Self::Mine => "mine",
            Self::Hospital => "hospital",
            Self::Barracks => "barracks",
        };
        f.write_str(label)
    }
}
