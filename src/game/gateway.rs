//! Executive action gateway: the only way a decision reaches the game

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{BuildingType, DiplomaticStatus};
use crate::game::provider::CityInfo;

/// Result of an attack as resolved by the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub victory: bool,
    pub detail: String,
}

/// Performs build, hire, attack and diplomacy operations on behalf of a faction
pub trait ExecutiveGateway: Send + Sync {
    fn build_in_city(&self, faction: &str, building: BuildingType, count: u32) -> Result<String>;

    fn hire_army(&self, faction: &str, focus_class: u32, resource_percentage: f64)
        -> Result<String>;

    fn attack_city(
        &self,
        faction: &str,
        city: &str,
        target_faction: &str,
        force_percentage: f64,
    ) -> Result<AttackOutcome>;

    fn set_diplomacy_status(
        &self,
        faction: &str,
        target_faction: &str,
        status: DiplomaticStatus,
    ) -> Result<()>;

    fn notify_war_declared(&self, faction: &str, target_faction: &str) -> Result<()>;

    fn propose_trade(&self, faction: &str, target_faction: &str) -> Result<()>;

    /// `target_faction`'s city closest to any of `faction`'s cities
    fn find_nearest_city(&self, faction: &str, target_faction: &str) -> Result<Option<CityInfo>>;

    /// Faction -> aggregate garrison strength
    fn calculate_army_strength(&self) -> Result<BTreeMap<String, u64>>;

    fn save_all_data(&self) -> Result<()>;
}
