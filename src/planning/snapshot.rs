//! Point-in-time view of a faction's situation
//!
//! Rebuilt every decision cycle and never persisted. Collection never fails:
//! a provider read that errors is logged and replaced by an empty value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::AiConfig;
use crate::core::types::{Coordinates, FactionName, Turn};
use crate::game::{aggregate_strength, neighbor_cities, CityInfo, GameStateProvider, MilitaryStatus};
use crate::memory::{FactionMemory, Grudge, Interaction};
use crate::personality::PersonalityLevel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub amounts: BTreeMap<String, i64>,
    pub army_limit: u64,
    pub consumption: u64,
    pub city_count: u64,
}

impl ResourceSnapshot {
    /// Amount of a named resource, zero when absent
    pub fn amount(&self, name: &str) -> i64 {
        self.amounts.get(name).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThreatKind {
    StrongerNeighbor { faction: FactionName },
    UndefendedCity { city: String },
    PlayerWar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    pub kind: ThreatKind,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityType {
    WeakNeighbor,
    TradePartner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub target_faction: FactionName,
    pub target_city: Option<String>,
}

/// A foreign city within reach of one of our cities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub faction: FactionName,
    pub city: String,
    pub position: Coordinates,
    /// Aggregate garrison strength of the owning faction
    pub strength: u64,
    /// Axis distance to our closest city
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub faction: FactionName,
    pub relation: i32,
    pub strength: u64,
    pub at_war: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryContext {
    pub recent_interactions: Vec<Interaction>,
    pub grudges: Vec<Grudge>,
    pub alliances: Vec<FactionName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub faction: FactionName,
    pub turn: Turn,
    pub personality: PersonalityLevel,
    pub resources: ResourceSnapshot,
    pub military: MilitaryStatus,
    pub own_cities: Vec<CityInfo>,
    /// Sorted by faction, then distance, then city name
    pub neighbors: Vec<Neighbor>,
    pub threats: Vec<Threat>,
    pub opportunities: Vec<Opportunity>,
    pub player: PlayerStatus,
    pub memory: MemoryContext,
}

impl Snapshot {
    pub fn has_high_threat(&self) -> bool {
        self.threats.iter().any(|t| t.severity == Severity::High)
    }

    pub fn weak_neighbor(&self) -> Option<&Opportunity> {
        self.opportunities
            .iter()
            .find(|o| o.kind == OpportunityType::WeakNeighbor)
    }
}

/// Builds snapshots from a game state provider
pub struct SnapshotCollector<'a> {
    provider: &'a dyn GameStateProvider,
    config: &'a AiConfig,
}

impl<'a> SnapshotCollector<'a> {
    pub fn new(provider: &'a dyn GameStateProvider, config: &'a AiConfig) -> Self {
        Self { provider, config }
    }

    pub fn collect(&self, faction: &str, memory: &FactionMemory) -> Snapshot {
        let config = self.config;
        let player_faction = config.player_faction.as_str();

        let turn = self.or_default(faction, "turn", self.provider.current_turn());
        let relation = self.or_default(faction, "relation", self.provider.relation(faction, player_faction));
        let amounts = self.or_default(faction, "resources", self.provider.resources(faction));
        let military = self.or_default(
            faction,
            "military status",
            self.provider.military_status(faction, &config.hero_classes),
        );
        let cities = self.or_default(faction, "cities", self.provider.cities());

        let own_cities: Vec<CityInfo> = cities.iter().filter(|c| c.faction == faction).cloned().collect();
        let city_count = own_cities.len() as u64;

        let resources = ResourceSnapshot {
            amounts,
            army_limit: city_count * config.units_per_city,
            consumption: military.unit_count * config.upkeep_per_unit,
            city_count,
        };

        let neighbors = self.reachable_neighbors(faction, &cities, &own_cities);

        let player_strength = if faction == player_faction {
            military.total_strength
        } else {
            let rows = self.or_default(faction, "player garrisons", self.provider.garrisons(player_faction));
            aggregate_strength(&rows)
        };
        let player = PlayerStatus {
            faction: player_faction.to_string(),
            relation,
            strength: player_strength,
            at_war: memory.at_war,
        };

        let threats = detect_threats(&military, &own_cities, &neighbors, &player);
        let opportunities = detect_opportunities(&military, &neighbors, &player);

        let memory_context = MemoryContext {
            recent_interactions: memory
                .recent_interactions(config.memory_context_window)
                .into_iter()
                .cloned()
                .collect(),
            grudges: memory.grudges.clone(),
            alliances: memory.alliances.clone(),
        };

        Snapshot {
            faction: faction.to_string(),
            turn,
            personality: PersonalityLevel::classify(relation),
            resources,
            military,
            own_cities,
            neighbors,
            threats,
            opportunities,
            player,
            memory: memory_context,
        }
    }

    fn reachable_neighbors(
        &self,
        faction: &str,
        cities: &[CityInfo],
        own_cities: &[CityInfo],
    ) -> Vec<Neighbor> {
        let mut strengths: BTreeMap<FactionName, Option<u64>> = BTreeMap::new();
        let mut neighbors = Vec::new();

        for city in neighbor_cities(cities, faction, self.config.neighbor_axis_threshold) {
            let strength = *strengths.entry(city.faction.clone()).or_insert_with(|| {
                match self.provider.garrisons(&city.faction) {
                    Ok(rows) => Some(aggregate_strength(&rows)),
                    Err(e) => {
                        warn!(faction, neighbor = %city.faction, error = %e, "skipping neighbor with unreadable garrisons");
                        None
                    }
                }
            });
            let Some(strength) = strength else {
                continue;
            };

            let distance = own_cities
                .iter()
                .map(|o| o.position.axis_distance(&city.position))
                .fold(f64::INFINITY, f64::min);

            neighbors.push(Neighbor {
                faction: city.faction,
                city: city.name,
                position: city.position,
                strength,
                distance,
            });
        }

        neighbors.sort_by(|a, b| {
            a.faction
                .cmp(&b.faction)
                .then_with(|| a.distance.total_cmp(&b.distance))
                .then_with(|| a.city.cmp(&b.city))
        });
        neighbors
    }

    fn or_default<T: Default>(&self, faction: &str, what: &str, result: crate::core::error::Result<T>) -> T {
        result.unwrap_or_else(|e| {
            warn!(faction, error = %e, "provider read failed for {}, using default", what);
            T::default()
        })
    }
}

/// First (closest) reachable city of each neighboring faction, in faction order
fn closest_per_faction(neighbors: &[Neighbor]) -> Vec<&Neighbor> {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for n in neighbors {
        if !seen.contains(&n.faction.as_str()) {
            seen.push(&n.faction);
            out.push(n);
        }
    }
    out
}

fn detect_threats(
    military: &MilitaryStatus,
    own_cities: &[CityInfo],
    neighbors: &[Neighbor],
    player: &PlayerStatus,
) -> Vec<Threat> {
    let mut threats = Vec::new();
    let own = military.total_strength as f64;

    if player.at_war {
        threats.push(Threat {
            kind: ThreatKind::PlayerWar,
            severity: Severity::High,
        });
    }

    for n in closest_per_faction(neighbors) {
        let strength = n.strength as f64;
        let severity = if strength > own * 1.5 {
            Severity::High
        } else if strength > own {
            Severity::Medium
        } else {
            continue;
        };
        threats.push(Threat {
            kind: ThreatKind::StrongerNeighbor {
                faction: n.faction.clone(),
            },
            severity,
        });
    }

    let mut undefended: Vec<&str> = own_cities
        .iter()
        .filter(|c| military.garrison_distribution.get(&c.name).copied().unwrap_or(0) == 0)
        .map(|c| c.name.as_str())
        .collect();
    undefended.sort();
    for city in undefended {
        threats.push(Threat {
            kind: ThreatKind::UndefendedCity {
                city: city.to_string(),
            },
            severity: Severity::Medium,
        });
    }

    threats
}

fn detect_opportunities(
    military: &MilitaryStatus,
    neighbors: &[Neighbor],
    player: &PlayerStatus,
) -> Vec<Opportunity> {
    let own = military.total_strength as f64;
    let mut opportunities: Vec<Opportunity> = closest_per_faction(neighbors)
        .into_iter()
        .filter(|n| (n.strength as f64) < own * 0.5)
        .map(|n| Opportunity {
            kind: OpportunityType::WeakNeighbor,
            target_faction: n.faction.clone(),
            target_city: Some(n.city.clone()),
        })
        .collect();

    if player.relation > 50 {
        opportunities.push(Opportunity {
            kind: OpportunityType::TradePartner,
            target_faction: player.faction.clone(),
            target_city: None,
        });
    }

    opportunities
}
