//! Plans, the actions they contain, and the gateway commands actions become

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingType, DiplomaticStatus, FactionName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecruitPriority {
    High,
    Medium,
    Low,
}

/// One intended step of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Build {
        target: BuildingType,
        /// Share of budget in [0, 1]
        intensity: f64,
    },
    Recruit {
        unit_class: u32,
        priority: RecruitPriority,
    },
    Attack {
        target_faction: FactionName,
        target_city: String,
    },
    Diplomacy {
        action: DiplomaticStatus,
        with_faction: FactionName,
    },
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build { target, intensity } => {
                write!(f, "build {} ({:.0}% effort)", target, intensity * 100.0)
            }
            Self::Recruit { unit_class, priority } => {
                write!(f, "recruit class {} ({:?} priority)", unit_class, priority)
            }
            Self::Attack {
                target_faction,
                target_city,
            } => write!(f, "attack {} of {}", target_city, target_faction),
            Self::Diplomacy {
                action,
                with_faction,
            } => write!(f, "{} with {}", action, with_faction),
        }
    }
}

/// Ordered actions for one faction's turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub summary: String,
    pub actions: Vec<Action>,
    pub reasoning: String,
    pub expected_outcome: String,
}

/// Gateway-ready form of an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    BuildBuildings {
        building_type: BuildingType,
        budget_percentage: f64,
    },
    HireArmy {
        focus_class: u32,
        resource_percentage: f64,
    },
    AttackCity {
        city: String,
        faction: FactionName,
        force_percentage: f64,
    },
    DiplomaticAction {
        action: DiplomaticStatus,
        target_faction: FactionName,
    },
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuildBuildings {
                building_type,
                budget_percentage,
            } => write!(f, "BuildBuildings({}, {:.0}%)", building_type, budget_percentage),
            Self::HireArmy {
                focus_class,
                resource_percentage,
            } => write!(f, "HireArmy(class {}, {:.0}%)", focus_class, resource_percentage * 100.0),
            Self::AttackCity {
                city,
                faction,
                force_percentage,
            } => write!(f, "AttackCity({} of {}, {:.0}% force)", city, faction, force_percentage * 100.0),
            Self::DiplomaticAction {
                action,
                target_faction,
            } => write!(f, "DiplomaticAction({} with {})", action, target_faction),
        }
    }
}
