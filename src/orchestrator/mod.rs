//! Decision orchestrator
//!
//! Owns the boundary traits and runs each faction's cycle:
//! load memory -> snapshot -> priorities -> plan -> commands -> execute ->
//! diplomacy -> save. Every failure along the way degrades to a defined
//! fallback; nothing here returns an error to the caller.

pub mod chat;
pub mod report;
pub mod turn;

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, warn};

use crate::core::config::AiConfig;
use crate::core::types::FactionName;
use crate::dialogue::{ResponseFilter, ResponseGenerator, RuleResponder};
use crate::game::{ExecutiveGateway, GameStateProvider};
use crate::memory::{FactionLocks, FactionMemory, MemoryStore};
use crate::planning::{PlanGenerator, RulePlanner};

pub use report::{render_status, DiplomacyReport, ExecutionResult, TurnReport};

pub struct DecisionOrchestrator {
    provider: Arc<dyn GameStateProvider>,
    gateway: Arc<dyn ExecutiveGateway>,
    store: Arc<dyn MemoryStore>,
    config: AiConfig,
    locks: FactionLocks,
    rules: RulePlanner,
    responder: RuleResponder,
    filter: ResponseFilter,
    plan_generator: Option<Arc<dyn PlanGenerator>>,
    response_generator: Option<Arc<dyn ResponseGenerator>>,
    /// Only drawn from in sampled war mode
    rng: Mutex<ChaCha8Rng>,
}

impl DecisionOrchestrator {
    pub fn new(
        provider: Arc<dyn GameStateProvider>,
        gateway: Arc<dyn ExecutiveGateway>,
        store: Arc<dyn MemoryStore>,
        config: AiConfig,
    ) -> Self {
        Self {
            provider,
            gateway,
            store,
            filter: ResponseFilter::new(config.response_max_chars),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(config.war_seed)),
            config,
            locks: FactionLocks::new(),
            rules: RulePlanner::new(),
            responder: RuleResponder::new(),
            plan_generator: None,
            response_generator: None,
        }
    }

    /// Try `generator` before the rule-based planner each turn
    pub fn with_plan_generator(mut self, generator: Arc<dyn PlanGenerator>) -> Self {
        self.plan_generator = Some(generator);
        self
    }

    /// Try `generator` before the canned response table
    pub fn with_response_generator(mut self, generator: Arc<dyn ResponseGenerator>) -> Self {
        self.response_generator = Some(generator);
        self
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Run one turn for every faction concurrently
    ///
    /// Reports come back in the order of `factions`. A task that panics is
    /// logged and left out.
    pub async fn decide_all(self: &Arc<Self>, factions: &[FactionName]) -> Vec<TurnReport> {
        let handles: Vec<_> = factions
            .iter()
            .cloned()
            .map(|faction| {
                let orchestrator = Arc::clone(self);
                tokio::spawn(async move { orchestrator.decide_turn(&faction).await })
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (faction, handle) in factions.iter().zip(handles) {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => error!(faction = %faction, error = %e, "Turn task failed"),
            }
        }
        reports
    }

    /// Human-readable summary of a faction's memory and standing
    pub fn status_report(&self, faction: &str) -> String {
        let memory = self.load_memory(faction);
        let relation = match self.provider.relation(faction, &self.config.player_faction) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(faction, error = %e, "Relation unavailable for status report");
                None
            }
        };
        render_status(faction, &self.config.player_faction, relation, &memory)
    }

    /// Stored memory, or an empty one if the store can't be read
    fn load_memory(&self, faction: &str) -> FactionMemory {
        self.store.load(faction).unwrap_or_else(|e| {
            warn!(faction, error = %e, "Memory load failed, starting from empty memory");
            FactionMemory::default()
        })
    }

    fn save_memory(&self, faction: &str, memory: &FactionMemory) {
        if let Err(e) = self.store.save(faction, memory) {
            warn!(faction, error = %e, "Memory save failed");
        }
    }
}
