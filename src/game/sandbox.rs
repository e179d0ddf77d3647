//! In-memory game world implementing both the provider and the gateway
//!
//! Loaded from a TOML scenario. Used by the CLI and the test suite in place of
//! the real simulation; every gateway call is recorded for inspection.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;

use crate::core::error::{AiError, Result};
use crate::core::types::{BuildingType, DiplomaticStatus, FactionName, Turn};
use crate::game::gateway::{AttackOutcome, ExecutiveGateway};
use crate::game::military::{aggregate_strength, GarrisonRow};
use crate::game::provider::{CityInfo, GameStateProvider};

/// Gold spent per building
const BUILDING_COST: i64 = 50;
/// Gold spent per hired unit
const UNIT_COST: i64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFaction {
    pub name: FactionName,
    #[serde(default)]
    pub resources: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRelation {
    pub a: FactionName,
    pub b: FactionName,
    pub score: i32,
}

/// Scenario file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub turn: Turn,
    pub factions: Vec<ScenarioFaction>,
    pub cities: Vec<CityInfo>,
    pub garrisons: Vec<GarrisonRow>,
    pub relations: Vec<ScenarioRelation>,
}

/// A gateway operation as the sandbox received it
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Build { faction: String, building: BuildingType, count: u32 },
    Hire { faction: String, focus_class: u32, resource_percentage: f64 },
    Attack { faction: String, city: String, target_faction: String, force_percentage: f64 },
    SetStatus { faction: String, target_faction: String, status: DiplomaticStatus },
    NotifyWar { faction: String, target_faction: String },
    ProposeTrade { faction: String, target_faction: String },
    SaveAll,
}

#[derive(Debug, Default)]
struct SandboxState {
    turn: Turn,
    resources: BTreeMap<FactionName, BTreeMap<String, i64>>,
    cities: Vec<CityInfo>,
    garrisons: Vec<GarrisonRow>,
    relations: BTreeMap<(FactionName, FactionName), i32>,
    statuses: BTreeMap<(FactionName, FactionName), DiplomaticStatus>,
    calls: Vec<GatewayCall>,
}

fn pair_key(a: &str, b: &str) -> (FactionName, FactionName) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

pub struct SandboxWorld {
    state: Mutex<SandboxState>,
    offline: AtomicBool,
}

impl SandboxWorld {
    pub fn new(scenario: Scenario) -> Self {
        let mut state = SandboxState {
            turn: scenario.turn,
            cities: scenario.cities,
            garrisons: scenario.garrisons,
            ..SandboxState::default()
        };
        for faction in scenario.factions {
            state.resources.insert(faction.name, faction.resources);
        }
        for relation in scenario.relations {
            state
                .relations
                .insert(pair_key(&relation.a, &relation.b), relation.score.clamp(-100, 100));
        }

        Self {
            state: Mutex::new(state),
            offline: AtomicBool::new(false),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(contents)
            .map_err(|e| AiError::Config(format!("Failed to parse scenario TOML: {}", e)))?;
        Ok(Self::new(scenario))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn state(&self) -> MutexGuard<'_, SandboxState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AiError::Provider("game state store unavailable".into()));
        }
        Ok(())
    }

    /// Simulate the game-state store going away (provider reads fail)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Factions with resources or cities, sorted
    pub fn factions(&self) -> Vec<FactionName> {
        let state = self.state();
        let mut names: Vec<FactionName> = state.resources.keys().cloned().collect();
        for city in &state.cities {
            if !names.contains(&city.faction) {
                names.push(city.faction.clone());
            }
        }
        names.sort();
        names
    }

    pub fn advance_turn(&self) -> Turn {
        let mut state = self.state();
        state.turn += 1;
        state.turn
    }

    pub fn set_relation(&self, faction_a: &str, faction_b: &str, score: i32) {
        self.state()
            .relations
            .insert(pair_key(faction_a, faction_b), score.clamp(-100, 100));
    }

    pub fn diplomatic_status(&self, faction_a: &str, faction_b: &str) -> Option<DiplomaticStatus> {
        self.state().statuses.get(&pair_key(faction_a, faction_b)).copied()
    }

    /// Every gateway call received so far
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    pub fn city_owner(&self, city: &str) -> Option<FactionName> {
        self.state()
            .cities
            .iter()
            .find(|c| c.name == city)
            .map(|c| c.faction.clone())
    }

    pub fn gold(&self, faction: &str) -> i64 {
        self.state()
            .resources
            .get(faction)
            .and_then(|r| r.get("gold"))
            .copied()
            .unwrap_or(0)
    }
}

impl GameStateProvider for SandboxWorld {
    fn current_turn(&self) -> Result<Turn> {
        self.check_online()?;
        Ok(self.state().turn)
    }

    fn resources(&self, faction: &str) -> Result<BTreeMap<String, i64>> {
        self.check_online()?;
        Ok(self.state().resources.get(faction).cloned().unwrap_or_default())
    }

    fn garrisons(&self, faction: &str) -> Result<Vec<GarrisonRow>> {
        self.check_online()?;
        Ok(self
            .state()
            .garrisons
            .iter()
            .filter(|g| g.faction == faction)
            .cloned()
            .collect())
    }

    fn relation(&self, faction_a: &str, faction_b: &str) -> Result<i32> {
        self.check_online()?;
        Ok(self
            .state()
            .relations
            .get(&pair_key(faction_a, faction_b))
            .copied()
            .unwrap_or(0))
    }

    fn cities(&self) -> Result<Vec<CityInfo>> {
        self.check_online()?;
        Ok(self.state().cities.clone())
    }
}

impl ExecutiveGateway for SandboxWorld {
    fn build_in_city(&self, faction: &str, building: BuildingType, count: u32) -> Result<String> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Build {
            faction: faction.to_string(),
            building,
            count,
        });

        let city = state
            .cities
            .iter()
            .find(|c| c.faction == faction)
            .map(|c| c.name.clone())
            .ok_or_else(|| AiError::Gateway(format!("{} owns no city to build in", faction)))?;

        let gold = state
            .resources
            .entry(faction.to_string())
            .or_default()
            .entry("gold".to_string())
            .or_insert(0);
        let affordable = (*gold / BUILDING_COST).clamp(0, count as i64);
        if affordable == 0 {
            return Err(AiError::Gateway(format!(
                "{} cannot afford a {}",
                faction, building
            )));
        }
        *gold -= affordable * BUILDING_COST;

        Ok(format!("built {} {} in {}", affordable, building, city))
    }

    fn hire_army(
        &self,
        faction: &str,
        focus_class: u32,
        resource_percentage: f64,
    ) -> Result<String> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Hire {
            faction: faction.to_string(),
            focus_class,
            resource_percentage,
        });

        let city = state
            .cities
            .iter()
            .find(|c| c.faction == faction)
            .map(|c| c.name.clone())
            .ok_or_else(|| AiError::Gateway(format!("{} owns no city to recruit in", faction)))?;

        let gold = state
            .resources
            .get(faction)
            .and_then(|r| r.get("gold"))
            .copied()
            .unwrap_or(0);
        let budget = (gold as f64 * resource_percentage.clamp(0.0, 1.0)) as i64;
        let units = (budget / UNIT_COST) as u64;
        if units == 0 {
            return Err(AiError::Gateway(format!("{} cannot afford recruits", faction)));
        }

        if let Some(g) = state.resources.get_mut(faction).and_then(|r| r.get_mut("gold")) {
            *g -= units as i64 * UNIT_COST;
        }

        let existing = state
            .garrisons
            .iter()
            .position(|g| g.faction == faction && g.city == city && g.unit_class == focus_class);
        match existing {
            Some(idx) => state.garrisons[idx].count += units,
            None => state.garrisons.push(GarrisonRow {
                faction: faction.to_string(),
                city: city.clone(),
                unit_class: focus_class,
                unit_name: format!("class {} recruits", focus_class),
                count: units,
                attack: 3,
                defense: 3,
            }),
        }

        Ok(format!("hired {} class {} units in {}", units, focus_class, city))
    }

    fn attack_city(
        &self,
        faction: &str,
        city: &str,
        target_faction: &str,
        force_percentage: f64,
    ) -> Result<AttackOutcome> {
        let mut state = self.state();
        state.calls.push(GatewayCall::Attack {
            faction: faction.to_string(),
            city: city.to_string(),
            target_faction: target_faction.to_string(),
            force_percentage,
        });

        let owned_by_target = state
            .cities
            .iter()
            .any(|c| c.name == city && c.faction == target_faction);
        if !owned_by_target {
            return Err(AiError::Gateway(format!(
                "{} does not hold a city named {}",
                target_faction, city
            )));
        }

        let attacker = aggregate_strength(state.garrisons.iter().filter(|g| g.faction == faction));
        let force = attacker as f64 * force_percentage.clamp(0.0, 1.0);
        let defense = aggregate_strength(
            state
                .garrisons
                .iter()
                .filter(|g| g.faction == target_faction && g.city == city),
        );

        if force > defense as f64 {
            state
                .garrisons
                .retain(|g| !(g.faction == target_faction && g.city == city));
            if let Some(c) = state.cities.iter_mut().find(|c| c.name == city) {
                c.faction = faction.to_string();
            }
            Ok(AttackOutcome {
                victory: true,
                detail: format!("{} captured {} ({:.0} vs {})", faction, city, force, defense),
            })
        } else {
            for row in state.garrisons.iter_mut().filter(|g| g.faction == faction) {
                row.count -= row.count / 10;
            }
            Ok(AttackOutcome {
                victory: false,
                detail: format!("{} repelled at {} ({:.0} vs {})", faction, city, force, defense),
            })
        }
    }

    fn set_diplomacy_status(
        &self,
        faction: &str,
        target_faction: &str,
        status: DiplomaticStatus,
    ) -> Result<()> {
        let mut state = self.state();
        state.calls.push(GatewayCall::SetStatus {
            faction: faction.to_string(),
            target_faction: target_faction.to_string(),
            status,
        });
        state.statuses.insert(pair_key(faction, target_faction), status);
        Ok(())
    }

    fn notify_war_declared(&self, faction: &str, target_faction: &str) -> Result<()> {
        self.state().calls.push(GatewayCall::NotifyWar {
            faction: faction.to_string(),
            target_faction: target_faction.to_string(),
        });
        tracing::info!(faction, target = target_faction, "war declared");
        Ok(())
    }

    fn propose_trade(&self, faction: &str, target_faction: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(GatewayCall::ProposeTrade {
            faction: faction.to_string(),
            target_faction: target_faction.to_string(),
        });
        let relation = state
            .relations
            .entry(pair_key(faction, target_faction))
            .or_insert(0);
        *relation = (*relation + 5).min(100);
        Ok(())
    }

    fn find_nearest_city(&self, faction: &str, target_faction: &str) -> Result<Option<CityInfo>> {
        let state = self.state();
        let own: Vec<&CityInfo> = state.cities.iter().filter(|c| c.faction == faction).collect();

        let nearest = state
            .cities
            .iter()
            .filter(|c| c.faction == target_faction)
            .map(|target| {
                let distance = own
                    .iter()
                    .map(|o| {
                        let dx = o.position.x - target.position.x;
                        let dy = o.position.y - target.position.y;
                        dx.hypot(dy)
                    })
                    .fold(f64::INFINITY, f64::min);
                (distance, target)
            })
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.name.cmp(&b.name)))
            .map(|(_, city)| city.clone());

        Ok(nearest)
    }

    fn calculate_army_strength(&self) -> Result<BTreeMap<String, u64>> {
        let state = self.state();
        let mut strengths: BTreeMap<String, u64> = BTreeMap::new();
        for row in &state.garrisons {
            *strengths.entry(row.faction.clone()).or_insert(0) += row.strength();
        }
        Ok(strengths)
    }

    fn save_all_data(&self) -> Result<()> {
        self.state().calls.push(GatewayCall::SaveAll);
        Ok(())
    }
}
