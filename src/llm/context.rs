//! Build prompt context from a faction snapshot
//!
//! The LLM sees a compact text summary of the same snapshot the rule-based
//! planner uses, plus the priorities already chosen for this turn.

use crate::dialogue::ResponseContext;
use crate::planning::priority::Priority;
use crate::planning::snapshot::{Snapshot, ThreatKind};

/// Neighbor lines included in a prompt
const MAX_NEIGHBOR_LINES: usize = 10;

/// Prompt context for one faction's planning call
#[derive(Debug, Clone, Default)]
pub struct PlanContext {
    pub faction: String,
    pub turn: u64,
    pub personality: String,
    pub resources: Vec<String>,
    pub military: String,
    pub neighbors: Vec<String>,
    pub threats: Vec<String>,
    pub opportunities: Vec<String>,
    pub priorities: Vec<String>,
    pub player: String,
    pub recent_messages: Vec<String>,
    pub grudges: Vec<String>,
}

impl PlanContext {
    pub fn from_snapshot(snapshot: &Snapshot, priorities: &[Priority]) -> Self {
        let resources = snapshot
            .resources
            .amounts
            .iter()
            .map(|(name, amount)| format!("{}={}", name, amount))
            .collect();

        let military = format!(
            "strength {}, {} units (limit {}), attack {}, defense {}, {} heroes",
            snapshot.military.total_strength,
            snapshot.military.unit_count,
            snapshot.resources.army_limit,
            snapshot.military.attack_power,
            snapshot.military.defense_power,
            snapshot.military.heroes.len()
        );

        let neighbors = snapshot
            .neighbors
            .iter()
            .take(MAX_NEIGHBOR_LINES)
            .map(|n| {
                format!(
                    "{} ({}), strength {}, distance {:.0}",
                    n.city, n.faction, n.strength, n.distance
                )
            })
            .collect();

        let threats = snapshot
            .threats
            .iter()
            .map(|t| {
                let what = match &t.kind {
                    ThreatKind::StrongerNeighbor { faction } => format!("{} is stronger", faction),
                    ThreatKind::UndefendedCity { city } => format!("{} is undefended", city),
                    ThreatKind::PlayerWar => "at war with the player".to_string(),
                };
                format!("{} ({:?})", what, t.severity)
            })
            .collect();

        let opportunities = snapshot
            .opportunities
            .iter()
            .map(|o| match &o.target_city {
                Some(city) => format!("{:?}: {} at {}", o.kind, o.target_faction, city),
                None => format!("{:?}: {}", o.kind, o.target_faction),
            })
            .collect();

        let player = format!(
            "{} (relation {}, strength {}{})",
            snapshot.player.faction,
            snapshot.player.relation,
            snapshot.player.strength,
            if snapshot.player.at_war { ", at war" } else { "" }
        );

        Self {
            faction: snapshot.faction.clone(),
            turn: snapshot.turn,
            personality: snapshot.personality.to_string(),
            resources,
            military,
            neighbors,
            threats,
            opportunities,
            priorities: priorities.iter().map(|p| p.to_string()).collect(),
            player,
            recent_messages: snapshot
                .memory
                .recent_interactions
                .iter()
                .map(|i| i.player_message.clone())
                .collect(),
            grudges: snapshot
                .memory
                .grudges
                .iter()
                .map(|g| format!("{}: {}", g.against, g.reason))
                .collect(),
        }
    }

    /// Generate a text summary of the context for LLM prompts
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(&format!("Faction: {}\n", self.faction));
        s.push_str(&format!("Turn: {}\n", self.turn));
        s.push_str(&format!("Personality toward player: {}\n", self.personality));
        s.push_str(&format!("Player: {}\n", self.player));
        s.push_str(&format!("Military: {}\n", self.military));

        if !self.resources.is_empty() {
            s.push_str(&format!("Resources: {}\n", self.resources.join(", ")));
        }

        if !self.neighbors.is_empty() {
            s.push_str("\nNeighboring cities:\n");
            for neighbor in &self.neighbors {
                s.push_str(&format!("- {}\n", neighbor));
            }
        }

        if !self.threats.is_empty() {
            s.push_str(&format!("\nThreats: {}\n", self.threats.join("; ")));
        }

        if !self.opportunities.is_empty() {
            s.push_str(&format!("Opportunities: {}\n", self.opportunities.join("; ")));
        }

        if !self.grudges.is_empty() {
            s.push_str(&format!("Grudges: {}\n", self.grudges.join("; ")));
        }

        if !self.recent_messages.is_empty() {
            s.push_str("\nRecent player messages:\n");
            for message in &self.recent_messages {
                s.push_str(&format!("- {}\n", message));
            }
        }

        if self.priorities.is_empty() {
            s.push_str("\nPriorities: none\n");
        } else {
            s.push_str(&format!("\nPriorities: {}\n", self.priorities.join(", ")));
        }

        s
    }
}

/// Text summary of a chat context for the response prompt
pub fn chat_summary(context: &ResponseContext) -> String {
    let mut s = format!(
        "You are the ruler of {}. Your stance toward the player is {} (relation {}){}.\n",
        context.faction,
        context.personality,
        context.relation,
        if context.at_war { " and you are at war" } else { "" }
    );

    if !context.recent_interactions.is_empty() {
        s.push_str("\nRecent conversation:\n");
        for interaction in &context.recent_interactions {
            s.push_str(&format!("Player: {}\n", interaction.player_message));
            s.push_str(&format!("You: {}\n", interaction.ai_response));
        }
    }

    s
}
