//! One faction's decision cycle

use tracing::{debug, info, warn};

use crate::core::error::{AiError, Result};
use crate::core::types::{DiplomaticStatus, Turn};
use crate::diplomacy::{self, PolicyInputs};
use crate::memory::FactionMemory;
use crate::orchestrator::report::{DiplomacyReport, ExecutionResult, TurnReport};
use crate::orchestrator::DecisionOrchestrator;
use crate::planning::translator::ATTACK_FORCE_PERCENTAGE;
use crate::planning::{
    prioritize, translate_plan, Command, Plan, PlanGenerator, Priority, Snapshot, SnapshotCollector,
};

impl DecisionOrchestrator {
    /// Plan, execute and record one turn for `faction`
    pub async fn decide_turn(&self, faction: &str) -> TurnReport {
        let _guard = self.locks.acquire(faction).await;
        let mut memory = self.load_memory(faction);

        let snapshot = SnapshotCollector::new(self.provider.as_ref(), &self.config).collect(faction, &memory);
        let turn = snapshot.turn;
        let personality = snapshot.personality;
        if memory.personality != personality {
            debug!(faction, from = %memory.personality, to = %personality, "Personality recomputed from relation");
        }
        memory.personality = personality;

        let priorities = prioritize(&snapshot, personality, &self.config);
        let (plan, plan_source) = self.generate_plan(faction, &snapshot, &priorities).await;
        info!(faction, turn, source = %plan_source, "Plan: {}", plan.summary);

        let mut commands = translate_plan(&plan);
        let mut execution_results: Vec<ExecutionResult> = commands
            .iter()
            .map(|command| self.execute(faction, command, turn, &mut memory))
            .collect();
        let plan_succeeded = !plan.actions.is_empty() && execution_results.iter().all(|r| r.success);

        let diplomacy = if faction == self.config.player_faction {
            None
        } else {
            let (report, issued) = self.run_diplomacy(faction, &snapshot, &mut memory);
            for command in issued {
                execution_results.push(self.execute(faction, &command, turn, &mut memory));
                commands.push(command);
            }
            Some(report)
        };

        if plan_succeeded {
            memory.achieved_goals.push(plan.summary.clone());
        }
        memory.last_plan_summary = Some(plan.summary.clone());

        self.save_memory(faction, &memory);
        if let Err(e) = self.gateway.save_all_data() {
            warn!(faction, error = %e, "save_all_data failed");
        }

        TurnReport {
            faction: faction.to_string(),
            turn,
            personality,
            priorities,
            plan_source,
            plan,
            commands,
            execution_results,
            diplomacy,
        }
    }

    /// Pluggable generator under the timeout budget, else rules
    async fn generate_plan(
        &self,
        faction: &str,
        snapshot: &Snapshot,
        priorities: &[Priority],
    ) -> (Plan, String) {
        if let Some(generator) = &self.plan_generator {
            let budget = self.config.generator_timeout();
            match tokio::time::timeout(budget, generator.generate(snapshot, priorities)).await {
                Ok(Ok(plan)) => return (plan, generator.name().to_string()),
                Ok(Err(e)) => {
                    warn!(faction, generator = generator.name(), error = %e, "Plan generator failed, using rules")
                }
                Err(_) => {
                    let e = AiError::GeneratorTimeout(self.config.generator_timeout_ms);
                    warn!(faction, generator = generator.name(), error = %e, "Plan generator timed out, using rules")
                }
            }
        }
        (self.rules.plan(snapshot, priorities), self.rules.name().to_string())
    }

    /// Score war against the player and return the commands that follow
    fn run_diplomacy(
        &self,
        faction: &str,
        snapshot: &Snapshot,
        memory: &mut FactionMemory,
    ) -> (DiplomacyReport, Vec<Command>) {
        let player = self.config.player_faction.as_str();
        let relation = snapshot.player.relation;

        let (own_strength, opponent_strength) = match self.gateway.calculate_army_strength() {
            Ok(strengths) => (
                strengths.get(faction).copied().unwrap_or(0),
                strengths.get(player).copied().unwrap_or(0),
            ),
            Err(e) => {
                warn!(faction, error = %e, "Army strengths unavailable, using snapshot values");
                (snapshot.military.total_strength, snapshot.player.strength)
            }
        };

        let inputs = PolicyInputs::from_memory(
            snapshot.personality,
            relation,
            own_strength,
            opponent_strength,
            memory,
            self.config.behavior_window,
        );
        let decision = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            diplomacy::decide(&inputs, self.config.war_decision, &mut *rng)
        };
        info!(
            faction,
            war_chance = decision.factors.war_chance,
            declare_war = decision.declare_war,
            "Diplomatic evaluation"
        );

        let mut report = DiplomacyReport {
            decision,
            war_declared: false,
            peace_restored: false,
            trade_proposed: false,
        };
        let mut issued = Vec::new();

        if decision.declare_war {
            if !memory.at_war {
                report.war_declared = true;
                issued.push(Command::DiplomaticAction {
                    action: DiplomaticStatus::War,
                    target_faction: player.to_string(),
                });
            }
            match self.gateway.find_nearest_city(faction, player) {
                Ok(Some(city)) => issued.push(Command::AttackCity {
                    city: city.name,
                    faction: player.to_string(),
                    force_percentage: ATTACK_FORCE_PERCENTAGE,
                }),
                Ok(None) => info!(faction, "No {} city to attack", player),
                Err(e) => warn!(faction, error = %e, "Nearest city lookup failed, no attack this turn"),
            }
            return (report, issued);
        }

        if memory.at_war {
            report.peace_restored = true;
            issued.push(Command::DiplomaticAction {
                action: DiplomaticStatus::Peace,
                target_faction: player.to_string(),
            });
        }

        if relation > 50 {
            memory.add_alliance(player);
        }

        if relation < self.config.trade_relation_threshold && self.trade_cooldown_elapsed(memory, snapshot.turn) {
            report.trade_proposed = true;
            issued.push(Command::DiplomaticAction {
                action: DiplomaticStatus::Trade,
                target_faction: player.to_string(),
            });
        }

        (report, issued)
    }

    fn trade_cooldown_elapsed(&self, memory: &FactionMemory, turn: Turn) -> bool {
        memory
            .last_trade_proposal
            .map_or(true, |last| turn.saturating_sub(last) >= self.config.trade_proposal_cooldown)
    }

    /// Run one command against the gateway; failures are captured, not raised
    fn execute(
        &self,
        faction: &str,
        command: &Command,
        turn: Turn,
        memory: &mut FactionMemory,
    ) -> ExecutionResult {
        let outcome = match command {
            Command::BuildBuildings {
                building_type,
                budget_percentage,
            } => {
                let count = ((budget_percentage / 10.0).round() as u32).max(1);
                self.gateway.build_in_city(faction, *building_type, count)
            }
            Command::HireArmy {
                focus_class,
                resource_percentage,
            } => self
                .gateway
                .hire_army(faction, *focus_class, *resource_percentage),
            Command::AttackCity {
                city,
                faction: target,
                force_percentage,
            } => self
                .gateway
                .attack_city(faction, city, target, *force_percentage)
                .map(|outcome| {
                    memory.record_battle(outcome.victory);
                    outcome.detail
                }),
            Command::DiplomaticAction {
                action,
                target_faction,
            } => self.apply_diplomacy(faction, *action, target_faction, turn, memory),
        };

        match outcome {
            Ok(detail) => {
                debug!(faction, command = %command, "Command executed");
                ExecutionResult::ok(command.clone(), detail)
            }
            Err(e) => {
                warn!(faction, command = %command, error = %e, "Command failed");
                ExecutionResult::failed(command.clone(), e.to_string())
            }
        }
    }

    fn apply_diplomacy(
        &self,
        faction: &str,
        status: DiplomaticStatus,
        target: &str,
        turn: Turn,
        memory: &mut FactionMemory,
    ) -> Result<String> {
        let with_player = target == self.config.player_faction;

        match status {
            DiplomaticStatus::War => {
                if with_player && memory.at_war {
                    return Ok(format!("already at war with {}", target));
                }
                self.gateway
                    .set_diplomacy_status(faction, target, DiplomaticStatus::War)?;
                self.gateway.notify_war_declared(faction, target)?;
                if with_player {
                    memory.at_war = true;
                }
                memory.add_grudge(target, "war declared", turn);
                memory.record_event(turn, DiplomaticStatus::War, target, "war declared");
                Ok(format!("declared war on {}", target))
            }
            DiplomaticStatus::Peace => {
                self.gateway
                    .set_diplomacy_status(faction, target, DiplomaticStatus::Peace)?;
                if with_player {
                    memory.at_war = false;
                }
                memory.record_event(turn, DiplomaticStatus::Peace, target, "peace restored");
                Ok(format!("made peace with {}", target))
            }
            DiplomaticStatus::Trade => {
                if with_player && !self.trade_cooldown_elapsed(memory, turn) {
                    debug!(faction, turn, "Trade proposal to {} still on cooldown", target);
                    return Ok(format!("trade proposal to {} on cooldown", target));
                }
                self.gateway.propose_trade(faction, target)?;
                if with_player {
                    memory.last_trade_proposal = Some(turn);
                }
                memory.record_trade_deal(target, turn);
                memory.record_event(turn, DiplomaticStatus::Trade, target, "trade proposed");
                Ok(format!("proposed trade to {}", target))
            }
        }
    }
}
