//! Garrison rows and the military summary derived from them

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::FactionName;

/// Units of one class stationed in one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarrisonRow {
    pub faction: FactionName,
    pub city: String,
    pub unit_class: u32,
    #[serde(default)]
    pub unit_name: String,
    pub count: u64,
    pub attack: u64,
    pub defense: u64,
}

impl GarrisonRow {
    /// `count * (attack + defense)`
    pub fn strength(&self) -> u64 {
        self.count * (self.attack + self.defense)
    }
}

/// Sum of `count * (attack + defense)` over garrison rows
pub fn aggregate_strength<'a>(rows: impl IntoIterator<Item = &'a GarrisonRow>) -> u64 {
    rows.into_iter().map(GarrisonRow::strength).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub city: String,
    pub unit_class: u32,
}

/// Point-in-time military picture of one faction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MilitaryStatus {
    pub total_strength: u64,
    pub unit_count: u64,
    pub heroes: Vec<Hero>,
    /// City name -> units stationed there
    pub garrison_distribution: BTreeMap<String, u64>,
    pub attack_power: u64,
    pub defense_power: u64,
}

impl MilitaryStatus {
    /// Aggregate garrison rows
    ///
    /// Each row's strength counts toward attack power when its attack exceeds
    /// its defense, otherwise toward defense power.
    pub fn from_garrisons(rows: &[GarrisonRow], hero_classes: &[u32]) -> Self {
        let mut status = Self::default();

        for row in rows {
            let strength = row.strength();
            status.total_strength += strength;
            status.unit_count += row.count;
            *status
                .garrison_distribution
                .entry(row.city.clone())
                .or_insert(0) += row.count;

            if row.attack > row.defense {
                status.attack_power += strength;
            } else {
                status.defense_power += strength;
            }

            if hero_classes.contains(&row.unit_class) && row.count > 0 {
                let name = if row.unit_name.is_empty() {
                    format!("class {} hero", row.unit_class)
                } else {
                    row.unit_name.clone()
                };
                status.heroes.push(Hero {
                    name,
                    city: row.city.clone(),
                    unit_class: row.unit_class,
                });
            }
        }

        status
    }
}
