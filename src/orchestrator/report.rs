//! Turn reports and the human-readable faction status

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionName, Turn};
use crate::diplomacy::DiplomaticDecision;
use crate::memory::FactionMemory;
use crate::personality::PersonalityLevel;
use crate::planning::{Command, Plan, Priority};

/// Goals shown in a status report
const RECENT_GOALS: usize = 3;

/// Outcome of executing one command against the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub command: Command,
    pub success: bool,
    pub error: Option<String>,
    pub detail: Option<String>,
}

impl ExecutionResult {
    pub fn ok(command: Command, detail: impl Into<String>) -> Self {
        Self {
            command,
            success: true,
            error: None,
            detail: Some(detail.into()),
        }
    }

    pub fn failed(command: Command, error: impl Into<String>) -> Self {
        Self {
            command,
            success: false,
            error: Some(error.into()),
            detail: None,
        }
    }
}

/// The diplomatic step of a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomacyReport {
    pub decision: DiplomaticDecision,
    /// War was declared this turn (not merely continued)
    pub war_declared: bool,
    pub peace_restored: bool,
    pub trade_proposed: bool,
}

/// Everything one faction did in one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub faction: FactionName,
    pub turn: Turn,
    pub personality: PersonalityLevel,
    pub priorities: Vec<Priority>,
    /// Name of the generator that produced the plan
    pub plan_source: String,
    pub plan: Plan,
    /// Plan commands followed by any the diplomatic step issued
    pub commands: Vec<Command>,
    /// One entry per command, same order
    pub execution_results: Vec<ExecutionResult>,
    /// None for the player's own faction
    pub diplomacy: Option<DiplomacyReport>,
}

impl TurnReport {
    pub fn failures(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.execution_results.iter().filter(|r| !r.success)
    }

    pub fn all_succeeded(&self) -> bool {
        self.execution_results.iter().all(|r| r.success)
    }
}

/// Render a faction's standing toward the player
pub fn render_status(
    faction: &str,
    player: &str,
    relation: Option<i32>,
    memory: &FactionMemory,
) -> String {
    let mut s = format!("=== {} ===\n", faction);

    match relation {
        Some(r) => s.push_str(&format!(
            "Personality: {} (relation with {}: {})\n",
            memory.personality, player, r
        )),
        None => s.push_str(&format!(
            "Personality: {} (relation with {} unavailable)\n",
            memory.personality, player
        )),
    }

    s.push_str(&format!(
        "At war with {}: {}\n",
        player,
        if memory.at_war { "yes" } else { "no" }
    ));
    s.push_str(&format!(
        "Battles: {} won, {} lost\n",
        memory.battles_won, memory.battles_lost
    ));
    s.push_str(&format!("Trade deals: {}\n", memory.trade_deals.len()));

    if memory.grudges.is_empty() {
        s.push_str("Grudges: none\n");
    } else {
        let grudges: Vec<String> = memory
            .grudges
            .iter()
            .map(|g| format!("{} ({}, turn {})", g.against, g.reason, g.turn))
            .collect();
        s.push_str(&format!("Grudges: {}\n", grudges.join("; ")));
    }

    if memory.alliances.is_empty() {
        s.push_str("Alliances: none\n");
    } else {
        s.push_str(&format!("Alliances: {}\n", memory.alliances.join(", ")));
    }

    let skip = memory.achieved_goals.len().saturating_sub(RECENT_GOALS);
    let goals: Vec<&str> = memory.achieved_goals.iter().skip(skip).map(|g| g.as_str()).collect();
    if !goals.is_empty() {
        s.push_str(&format!("Recent goals: {}\n", goals.join("; ")));
    }

    if let Some(summary) = &memory.last_plan_summary {
        s.push_str(&format!("Last plan: {}\n", summary));
    }

    match memory.interactions.back() {
        Some(last) => {
            s.push_str(&format!("Last message from {}: \"{}\"\n", player, last.player_message));
            s.push_str(&format!("Our reply: \"{}\"\n", last.ai_response));
        }
        None => s.push_str("No conversations yet\n"),
    }

    s
}
