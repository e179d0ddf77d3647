//! Priority engine: ordered rules turning a snapshot into at most three focuses

use serde::{Deserialize, Serialize};

use crate::core::config::AiConfig;
use crate::personality::PersonalityLevel;
use crate::planning::snapshot::Snapshot;

/// Max priorities kept per turn
pub const MAX_PRIORITIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    EconomyGrowth,
    ResourceProduction,
    ArmyRecruitment,
    Defense,
    Expansion,
    Diplomacy,
    Conquest,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::EconomyGrowth => "economy growth",
            Self::ResourceProduction => "resource production",
            Self::ArmyRecruitment => "army recruitment",
            Self::Defense => "defense",
            Self::Expansion => "expansion",
            Self::Diplomacy => "diplomacy",
            Self::Conquest => "conquest",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Evaluate the rules in fixed precedence and keep the first three matches
pub fn prioritize(
    snapshot: &Snapshot,
    personality: PersonalityLevel,
    config: &AiConfig,
) -> Vec<Priority> {
    let rules = [
        (
            snapshot.resources.amount(&config.primary_resource) < config.primary_resource_floor,
            Priority::EconomyGrowth,
        ),
        (
            snapshot.resources.amount(&config.secondary_resource)
                < config.secondary_resource_floor,
            Priority::ResourceProduction,
        ),
        (
            snapshot.military.unit_count < config.min_unit_count,
            Priority::ArmyRecruitment,
        ),
        (snapshot.has_high_threat(), Priority::Defense),
        (snapshot.weak_neighbor().is_some(), Priority::Expansion),
        (personality == PersonalityLevel::Friendly, Priority::Diplomacy),
        (personality == PersonalityLevel::Enemy, Priority::Conquest),
    ];

    rules
        .into_iter()
        .filter(|(matched, _)| *matched)
        .map(|(_, priority)| priority)
        .take(MAX_PRIORITIES)
        .collect()
}
