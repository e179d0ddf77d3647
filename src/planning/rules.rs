//! Rule-based plan generation
//!
//! Always available and deterministic: the same snapshot and priorities give
//! a byte-identical plan. Every pluggable generator falls back to this.

use crate::core::types::{BuildingType, DiplomaticStatus};
use crate::personality::PersonalityLevel;
use crate::planning::plan::{Action, Plan, RecruitPriority};
use crate::planning::priority::Priority;
use crate::planning::snapshot::{Neighbor, Snapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct RulePlanner;

impl RulePlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, snapshot: &Snapshot, priorities: &[Priority]) -> Plan {
        let mut actions = Vec::new();
        let mut reasons = Vec::new();

        for priority in priorities {
            let (action, reason) = match priority {
                Priority::EconomyGrowth => (
                    Some(Action::Build {
                        target: BuildingType::Factory,
                        intensity: 0.7,
                    }),
                    "treasury is below its floor".to_string(),
                ),
                Priority::ResourceProduction => (
                    Some(Action::Build {
                        target: BuildingType::Mine,
                        intensity: 0.6,
                    }),
                    "secondary resource stocks are low".to_string(),
                ),
                Priority::ArmyRecruitment => (
                    Some(Action::Recruit {
                        unit_class: 1,
                        priority: RecruitPriority::High,
                    }),
                    format!("only {} units under arms", snapshot.military.unit_count),
                ),
                Priority::Defense => (
                    Some(Action::Build {
                        target: BuildingType::Hospital,
                        intensity: 0.5,
                    }),
                    "a high-severity threat is present".to_string(),
                ),
                Priority::Expansion => match snapshot.weak_neighbor() {
                    Some(opportunity) => (
                        opportunity.target_city.as_ref().map(|city| Action::Attack {
                            target_faction: opportunity.target_faction.clone(),
                            target_city: city.clone(),
                        }),
                        format!("{} is weak and within reach", opportunity.target_faction),
                    ),
                    None => (None, "no expansion target".to_string()),
                },
                Priority::Diplomacy => (
                    Some(Action::Diplomacy {
                        action: DiplomaticStatus::Trade,
                        with_faction: snapshot.player.faction.clone(),
                    }),
                    "relations with the player are warm".to_string(),
                ),
                Priority::Conquest => (
                    Some(Action::Recruit {
                        unit_class: 2,
                        priority: RecruitPriority::Medium,
                    }),
                    "we are preparing for conquest".to_string(),
                ),
            };

            if let Some(action) = action {
                actions.push(action);
            }
            reasons.push(format!("{}: {}", priority, reason));
        }

        if snapshot.personality == PersonalityLevel::Enemy {
            if let Some(target) = weakest_reachable_neighbor(&snapshot.neighbors) {
                let attack = Action::Attack {
                    target_faction: target.faction.clone(),
                    target_city: target.city.clone(),
                };
                if !actions.contains(&attack) {
                    actions.push(attack);
                }
                reasons.push(format!(
                    "hostility: {} is the weakest neighbor (strength {})",
                    target.faction, target.strength
                ));
            }
        }

        let summary = if priorities.is_empty() {
            format!("{} holds steady", snapshot.faction)
        } else {
            let labels: Vec<&str> = priorities.iter().map(|p| p.label()).collect();
            format!("{} focuses on {}", snapshot.faction, labels.join(", "))
        };

        let expected_outcome = if actions.is_empty() {
            "No change this turn".to_string()
        } else {
            let steps: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
            format!("After this turn: {}", steps.join("; "))
        };

        Plan {
            summary,
            actions,
            reasoning: reasons.join(". "),
            expected_outcome,
        }
    }
}

/// Neighboring faction with the lowest aggregate strength, at its closest city
///
/// Ties go to the faction name that sorts first. Neighbors are expected in
/// snapshot order (faction, distance, city), so the first entry of a faction
/// is its closest city.
pub fn weakest_reachable_neighbor(neighbors: &[Neighbor]) -> Option<&Neighbor> {
    let mut best: Option<&Neighbor> = None;
    for candidate in neighbors {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                let weaker = candidate.strength < current.strength
                    || (candidate.strength == current.strength
                        && candidate.faction < current.faction);
                if weaker {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Coordinates;
    use crate::planning::snapshot::{Opportunity, OpportunityType};

    fn neighbor(faction: &str, city: &str, strength: u64, distance: f64) -> Neighbor {
        Neighbor {
            faction: faction.into(),
            city: city.into(),
            position: Coordinates::default(),
            strength,
            distance,
        }
    }

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot {
            faction: "Carthage".into(),
            ..Snapshot::default()
        };
        snapshot.player.faction = "player".into();
        snapshot
    }

    #[test]
    fn test_templates_follow_priorities() {
        let plan = RulePlanner::new().plan(
            &snapshot(),
            &[
                Priority::EconomyGrowth,
                Priority::ArmyRecruitment,
                Priority::Defense,
            ],
        );
        assert_eq!(
            plan.actions,
            vec![
                Action::Build {
                    target: BuildingType::Factory,
                    intensity: 0.7
                },
                Action::Recruit {
                    unit_class: 1,
                    priority: RecruitPriority::High
                },
                Action::Build {
                    target: BuildingType::Hospital,
                    intensity: 0.5
                },
            ]
        );
        assert!(plan.summary.contains("economy growth"));
    }

    #[test]
    fn test_diplomacy_targets_player() {
        let plan = RulePlanner::new().plan(&snapshot(), &[Priority::Diplomacy]);
        assert_eq!(
            plan.actions,
            vec![Action::Diplomacy {
                action: DiplomaticStatus::Trade,
                with_faction: "player".into()
            }]
        );
    }

    #[test]
    fn test_enemy_attacks_weakest_neighbor() {
        let mut snapshot = snapshot();
        snapshot.personality = PersonalityLevel::Enemy;
        snapshot.neighbors = vec![
            neighbor("Gaul", "Massilia", 300, 100.0),
            neighbor("Numidia", "Cirta", 120, 50.0),
            neighbor("Numidia", "Hippo", 120, 200.0),
            neighbor("player", "Roma", 900, 10.0),
        ];

        let plan = RulePlanner::new().plan(&snapshot, &[Priority::Conquest]);
        assert_eq!(plan.actions.len(), 2);
        assert_eq!(
            plan.actions[1],
            Action::Attack {
                target_faction: "Numidia".into(),
                target_city: "Cirta".into()
            }
        );
    }

    #[test]
    fn test_non_enemy_does_not_attack_neighbors() {
        let mut snapshot = snapshot();
        snapshot.personality = PersonalityLevel::Hostile;
        snapshot.neighbors = vec![neighbor("Gaul", "Massilia", 10, 100.0)];
        let plan = RulePlanner::new().plan(&snapshot, &[]);
        assert!(plan.actions.is_empty());
        assert_eq!(plan.summary, "Carthage holds steady");
    }

    #[test]
    fn test_expansion_and_enemy_attack_deduplicated() {
        let mut snapshot = snapshot();
        snapshot.personality = PersonalityLevel::Enemy;
        snapshot.neighbors = vec![neighbor("Gaul", "Massilia", 10, 100.0)];
        snapshot.opportunities = vec![Opportunity {
            kind: OpportunityType::WeakNeighbor,
            target_faction: "Gaul".into(),
            target_city: Some("Massilia".into()),
        }];

        let plan = RulePlanner::new().plan(&snapshot, &[Priority::Expansion]);
        assert_eq!(plan.actions.len(), 1);
    }

    #[test]
    fn test_weakest_tie_breaks_by_name() {
        let neighbors = vec![neighbor("Numidia", "Cirta", 50, 1.0), neighbor("Gaul", "Massilia", 50, 9.0)];
        let weakest = weakest_reachable_neighbor(&neighbors).unwrap();
        assert_eq!(weakest.faction, "Gaul");
        assert!(weakest_reachable_neighbor(&[]).is_none());
    }

    #[test]
    fn test_plan_is_idempotent() {
        let mut snapshot = snapshot();
        snapshot.personality = PersonalityLevel::Enemy;
        snapshot.neighbors = vec![neighbor("Gaul", "Massilia", 10, 100.0)];
        let priorities = [Priority::EconomyGrowth, Priority::Conquest];

        let planner = RulePlanner::new();
        let first = serde_json::to_string(&planner.plan(&snapshot, &priorities)).unwrap();
        let second = serde_json::to_string(&planner.plan(&snapshot, &priorities)).unwrap();
        assert_eq!(first, second);
    }
}
