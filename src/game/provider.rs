//! Read-only view of the game simulation
//!
//! The decision engine never touches storage directly; everything it knows
//! about resources, armies, relations and the map comes through this trait.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Coordinates, FactionName, Turn};
use crate::game::military::{GarrisonRow, MilitaryStatus};

/// A city on the campaign map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub faction: FactionName,
    #[serde(flatten)]
    pub position: Coordinates,
}

/// Source of game state for the decision engine
pub trait GameStateProvider: Send + Sync {
    fn current_turn(&self) -> Result<Turn>;

    /// Resource name -> amount
    fn resources(&self, faction: &str) -> Result<BTreeMap<String, i64>>;

    fn garrisons(&self, faction: &str) -> Result<Vec<GarrisonRow>>;

    /// Relation score in [-100, 100]
    fn relation(&self, faction_a: &str, faction_b: &str) -> Result<i32>;

    fn cities(&self) -> Result<Vec<CityInfo>>;

    fn military_status(&self, faction: &str, hero_classes: &[u32]) -> Result<MilitaryStatus> {
        let rows = self.garrisons(faction)?;
        Ok(MilitaryStatus::from_garrisons(&rows, hero_classes))
    }

    /// Cities of other factions within `axis_threshold` of any of `faction`'s cities
    fn neighbors(&self, faction: &str, axis_threshold: f64) -> Result<Vec<CityInfo>> {
        let cities = self.cities()?;
        Ok(neighbor_cities(&cities, faction, axis_threshold))
    }
}

/// Foreign cities within `axis_threshold` on both axes of some city owned by `faction`
pub fn neighbor_cities(cities: &[CityInfo], faction: &str, axis_threshold: f64) -> Vec<CityInfo> {
    let own: Vec<&CityInfo> = cities.iter().filter(|c| c.faction == faction).collect();

    cities
        .iter()
        .filter(|c| c.faction != faction)
        .filter(|c| {
            own.iter()
                .any(|o| o.position.within_axis_threshold(&c.position, axis_threshold))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, faction: &str, x: f64, y: f64) -> CityInfo {
        CityInfo {
            name: name.into(),
            faction: faction.into(),
            position: Coordinates::new(x, y),
        }
    }

    #[test]
    fn test_neighbors_use_axis_threshold() {
        let cities = vec![
            city("Carthago", "Carthage", 0.0, 0.0),
            city("Utica", "Carthage", 1000.0, 0.0),
            city("Massilia", "Gaul", 270.0, 270.0),
            city("Roma", "Rome", 300.0, 0.0),
            city("Ostia", "Rome", 1200.0, 100.0),
        ];

        let neighbors = neighbor_cities(&cities, "Carthage", 280.0);
        let names: Vec<_> = neighbors.iter().map(|c| c.name.as_str()).collect();

        // Massilia is ~382 away in a straight line but within 280 on each axis
        assert!(names.contains(&"Massilia"));
        // Ostia is near Utica
        assert!(names.contains(&"Ostia"));
        assert!(!names.contains(&"Roma"));
        assert!(!names.contains(&"Utica"));
    }

    #[test]
    fn test_no_own_cities_means_no_neighbors() {
        let cities = vec![city("Roma", "Rome", 0.0, 0.0)];
        assert!(neighbor_cities(&cities, "Carthage", 280.0).is_empty());
    }
}
