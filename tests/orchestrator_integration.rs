//! Integration tests for the faction decision cycle
//!
//! Every test drives `DecisionOrchestrator` against the border-war sandbox
//! scenario with an in-memory store:
//! - war declaration, follow-up attacks and the outcome ledger
//! - peaceful turns: alliances and rate-limited trade proposals
//! - generator fallback on timeout and error
//! - partial command failure and provider outage

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use faction_ai::core::config::AiConfig;
use faction_ai::core::error::{AiError, Result};
use faction_ai::core::types::BuildingType;
use faction_ai::game::{GatewayCall, SandboxWorld};
use faction_ai::memory::{InMemoryStore, MemoryStore};
use faction_ai::personality::PersonalityLevel;
use faction_ai::planning::{Action, Command, Plan, PlanGenerator, Priority, Snapshot};
use faction_ai::DecisionOrchestrator;

const SCENARIO: &str = include_str!("../data/scenarios/border_war.toml");

fn setup(config: AiConfig) -> (Arc<SandboxWorld>, Arc<InMemoryStore>, DecisionOrchestrator) {
    let world = Arc::new(SandboxWorld::from_toml_str(SCENARIO).unwrap());
    let store = Arc::new(InMemoryStore::new(config.interaction_cap));
    let orchestrator = DecisionOrchestrator::new(world.clone(), world.clone(), store.clone(), config);
    (world, store, orchestrator)
}

fn count_calls(world: &SandboxWorld, pred: impl Fn(&GatewayCall) -> bool) -> usize {
    world.calls().iter().filter(|c| pred(c)).count()
}

// ============================================================================
// Test generators
// ============================================================================

/// Never finishes within any reasonable budget
struct HangingGenerator;

#[async_trait]
impl PlanGenerator for HangingGenerator {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn generate(&self, _snapshot: &Snapshot, _priorities: &[Priority]) -> Result<Plan> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Plan::default())
    }
}

struct FailingGenerator;

#[async_trait]
impl PlanGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _snapshot: &Snapshot, _priorities: &[Priority]) -> Result<Plan> {
        Err(AiError::Generator("model refused".into()))
    }
}

/// Returns the same plan every turn
struct FixedGenerator(Plan);

#[async_trait]
impl PlanGenerator for FixedGenerator {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate(&self, _snapshot: &Snapshot, _priorities: &[Priority]) -> Result<Plan> {
        Ok(self.0.clone())
    }
}

// ============================================================================
// War and peace
// ============================================================================

#[tokio::test]
async fn test_enemy_faction_declares_war_once_and_keeps_attacking() {
    let (world, store, orchestrator) = setup(AiConfig::default());

    let first = orchestrator.decide_turn("Carthage").await;
    assert_eq!(first.personality, PersonalityLevel::Enemy);
    let diplomacy = first.diplomacy.as_ref().unwrap();
    assert!(diplomacy.decision.declare_war);
    assert!(diplomacy.war_declared);
    assert!(first.commands.iter().any(|c| matches!(
        c,
        Command::AttackCity { faction, .. } if faction == "player"
    )));
    assert_eq!(first.commands.len(), first.execution_results.len());

    let memory = store.load("Carthage").unwrap();
    assert!(memory.at_war);
    assert!(memory.grudges.iter().any(|g| g.against == "player"));
    assert!(memory.battles_won + memory.battles_lost >= 1);

    let second = orchestrator.decide_turn("Carthage").await;
    let diplomacy = second.diplomacy.as_ref().unwrap();
    assert!(diplomacy.decision.declare_war);
    assert!(!diplomacy.war_declared);

    let notifications = count_calls(&world, |c| matches!(c, GatewayCall::NotifyWar { .. }));
    assert_eq!(notifications, 1);
    assert!(second.commands.iter().any(|c| matches!(
        c,
        Command::AttackCity { faction, .. } if faction == "player"
    )));
}

#[tokio::test]
async fn test_enemy_expands_into_weak_neighbor() {
    let (world, _store, orchestrator) = setup(AiConfig::default());

    let report = orchestrator.decide_turn("Carthage").await;
    assert!(report.priorities.contains(&Priority::Expansion));
    assert!(report.plan.actions.contains(&Action::Attack {
        target_faction: "Numidia".into(),
        target_city: "Cirta".into(),
    }));
    assert_eq!(world.city_owner("Cirta").as_deref(), Some("Carthage"));
}

#[tokio::test]
async fn test_friendly_faction_keeps_peace_and_allies() {
    let (world, store, orchestrator) = setup(AiConfig::default());

    let report = orchestrator.decide_turn("Gaul").await;
    assert_eq!(report.personality, PersonalityLevel::Friendly);
    let diplomacy = report.diplomacy.as_ref().unwrap();
    assert!(!diplomacy.decision.declare_war);
    assert!(!diplomacy.trade_proposed);

    let memory = store.load("Gaul").unwrap();
    assert_eq!(memory.alliances, vec!["player".to_string()]);
    assert!(!memory.at_war);
    assert_eq!(count_calls(&world, |c| matches!(c, GatewayCall::NotifyWar { .. })), 0);
}

#[tokio::test]
async fn test_cold_peace_proposes_trade_once_per_cooldown() {
    let (world, store, orchestrator) = setup(AiConfig::default());
    let numidian_proposals = |world: &SandboxWorld| {
        count_calls(world, |c| {
            matches!(c, GatewayCall::ProposeTrade { faction, .. } if faction == "Numidia")
        })
    };

    let report = orchestrator.decide_turn("Numidia").await;
    assert!(report.diplomacy.as_ref().unwrap().trade_proposed);
    assert_eq!(numidian_proposals(&world), 1);

    // Same turn again: still inside the cooldown
    let report = orchestrator.decide_turn("Numidia").await;
    assert!(!report.diplomacy.as_ref().unwrap().trade_proposed);
    assert_eq!(numidian_proposals(&world), 1);

    for _ in 0..5 {
        world.advance_turn();
    }
    let report = orchestrator.decide_turn("Numidia").await;
    assert!(report.diplomacy.as_ref().unwrap().trade_proposed);
    assert_eq!(numidian_proposals(&world), 2);

    let memory = store.load("Numidia").unwrap();
    assert_eq!(memory.trade_deals.len(), 2);
    assert_eq!(memory.last_trade_proposal, Some(6));
}

#[tokio::test]
async fn test_friendly_plan_trade_respects_cooldown() {
    let (world, store, orchestrator) = setup(AiConfig::default());
    world.set_relation("Iberia", "player", 80);
    let iberian_proposals = |world: &SandboxWorld| {
        count_calls(world, |c| {
            matches!(c, GatewayCall::ProposeTrade { faction, .. } if faction == "Iberia")
        })
    };

    let first = orchestrator.decide_turn("Iberia").await;
    assert_eq!(first.priorities, vec![Priority::Diplomacy]);
    assert!(first.all_succeeded());
    assert_eq!(iberian_proposals(&world), 1);

    let second = orchestrator.decide_turn("Iberia").await;
    assert_eq!(second.priorities, vec![Priority::Diplomacy]);
    assert!(second.all_succeeded());
    assert!(second.execution_results[0]
        .detail
        .as_deref()
        .is_some_and(|d| d.contains("cooldown")));
    assert_eq!(iberian_proposals(&world), 1);
    assert_eq!(store.load("Iberia").unwrap().trade_deals.len(), 1);

    for _ in 0..5 {
        world.advance_turn();
    }
    orchestrator.decide_turn("Iberia").await;
    assert_eq!(iberian_proposals(&world), 2);
}

#[tokio::test]
async fn test_peace_restored_when_relations_recover() {
    let (world, store, orchestrator) = setup(AiConfig::default());

    orchestrator.decide_turn("Carthage").await;
    assert!(store.load("Carthage").unwrap().at_war);

    world.set_relation("Carthage", "player", 90);
    let report = orchestrator.decide_turn("Carthage").await;
    let diplomacy = report.diplomacy.as_ref().unwrap();
    assert!(!diplomacy.decision.declare_war);
    assert!(diplomacy.peace_restored);
    assert!(!store.load("Carthage").unwrap().at_war);
}

#[tokio::test]
async fn test_player_faction_skips_diplomacy() {
    let (_world, _store, orchestrator) = setup(AiConfig::default());
    let report = orchestrator.decide_turn("player").await;
    assert!(report.diplomacy.is_none());
}

// ============================================================================
// Generator fallback
// ============================================================================

#[tokio::test]
async fn test_hanging_generator_times_out_to_rules() {
    let config = AiConfig {
        generator_timeout_ms: 50,
        ..AiConfig::default()
    };
    let (_world, _store, orchestrator) = setup(config);
    let orchestrator = orchestrator.with_plan_generator(Arc::new(HangingGenerator));

    let report = tokio::time::timeout(Duration::from_secs(5), orchestrator.decide_turn("Gaul"))
        .await
        .expect("turn must not hang on the generator");
    assert_eq!(report.plan_source, "rules");
    assert!(!report.plan.actions.is_empty());
}

#[tokio::test]
async fn test_failing_generator_falls_back_to_rules() {
    let (_world, _store, orchestrator) = setup(AiConfig::default());
    let orchestrator = orchestrator.with_plan_generator(Arc::new(FailingGenerator));

    let report = orchestrator.decide_turn("Numidia").await;
    assert_eq!(report.plan_source, "rules");

    let (_world, _store, plain) = setup(AiConfig::default());
    let expected = plain.decide_turn("Numidia").await;
    assert_eq!(report.plan, expected.plan);
}

#[tokio::test]
async fn test_fast_generator_plan_is_used() {
    let plan = Plan {
        summary: "Build one mine".into(),
        actions: vec![Action::Build {
            target: BuildingType::Mine,
            intensity: 0.1,
        }],
        ..Plan::default()
    };
    let (world, store, orchestrator) = setup(AiConfig::default());
    let orchestrator = orchestrator.with_plan_generator(Arc::new(FixedGenerator(plan)));

    let report = orchestrator.decide_turn("Iberia").await;
    assert_eq!(report.plan_source, "fixed");
    assert!(report.execution_results[0].success);
    assert!(world.calls().contains(&GatewayCall::Build {
        faction: "Iberia".into(),
        building: BuildingType::Mine,
        count: 1,
    }));

    let memory = store.load("Iberia").unwrap();
    assert_eq!(memory.achieved_goals, vec!["Build one mine".to_string()]);
    assert_eq!(memory.last_plan_summary.as_deref(), Some("Build one mine"));
}

// ============================================================================
// Degraded continuation
// ============================================================================

#[tokio::test]
async fn test_failed_command_does_not_stop_the_batch() {
    let plan = Plan {
        summary: "Raid and build".into(),
        actions: vec![
            Action::Attack {
                target_faction: "Gaul".into(),
                target_city: "Atlantis".into(),
            },
            Action::Build {
                target: BuildingType::Factory,
                intensity: 0.5,
            },
        ],
        ..Plan::default()
    };
    let (world, store, orchestrator) = setup(AiConfig::default());
    let orchestrator = orchestrator.with_plan_generator(Arc::new(FixedGenerator(plan)));

    let report = orchestrator.decide_turn("Iberia").await;
    assert_eq!(report.execution_results.len(), 2);
    assert!(!report.execution_results[0].success);
    assert!(report.execution_results[0].error.is_some());
    assert!(report.execution_results[1].success);
    assert_eq!(report.failures().count(), 1);
    assert!(world.calls().iter().any(|c| matches!(c, GatewayCall::Build { count: 5, .. })));

    // Partial success is not an achieved goal
    assert!(store.load("Iberia").unwrap().achieved_goals.is_empty());
}

#[tokio::test]
async fn test_provider_outage_degrades_to_defaults() {
    let (world, store, orchestrator) = setup(AiConfig::default());
    world.set_offline(true);

    let report = orchestrator.decide_turn("Carthage").await;
    assert_eq!(report.turn, 0);
    assert_eq!(report.plan_source, "rules");
    assert_eq!(
        report.priorities,
        vec![
            Priority::EconomyGrowth,
            Priority::ResourceProduction,
            Priority::ArmyRecruitment
        ]
    );
    assert!(world.calls().contains(&GatewayCall::SaveAll));
    assert!(store.read_record("Carthage").unwrap().is_some());
}

#[tokio::test]
async fn test_every_turn_saves_game_data() {
    let (world, _store, orchestrator) = setup(AiConfig::default());
    orchestrator.decide_turn("Gaul").await;
    orchestrator.decide_turn("Numidia").await;
    assert_eq!(count_calls(&world, |c| *c == GatewayCall::SaveAll), 2);
}

// ============================================================================
// Batch turns
// ============================================================================

#[tokio::test]
async fn test_decide_all_reports_in_request_order() {
    let (world, store, orchestrator) = setup(AiConfig::default());
    let orchestrator = Arc::new(orchestrator);

    let factions: Vec<String> = world
        .factions()
        .into_iter()
        .filter(|f| f != "player")
        .collect();
    assert_eq!(factions, vec!["Carthage", "Gaul", "Iberia", "Numidia"]);

    let reports = orchestrator.decide_all(&factions).await;
    let reported: Vec<&str> = reports.iter().map(|r| r.faction.as_str()).collect();
    assert_eq!(reported, vec!["Carthage", "Gaul", "Iberia", "Numidia"]);
    assert_eq!(store.factions(), factions);
}

