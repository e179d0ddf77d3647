//! Parse LLM output into plans
//!
//! The model is asked for a JSON plan. Actions are parsed one by one into the
//! closed `Action` type; an action with an unknown tag or bad fields is
//! dropped and logged, the rest of the plan survives. A plan left with no
//! valid actions is malformed and the caller falls back to rules.

use serde::Deserialize;
use tracing::warn;

use crate::core::error::{AiError, Result};
use crate::planning::plan::{Action, Plan};

/// Plan as the model returns it, before action validation
#[derive(Debug, Clone, Deserialize)]
struct RawPlan {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    actions: Vec<serde_json::Value>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    expected_outcome: String,
}

/// Extract JSON object from LLM response (handles surrounding text)
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| AiError::MalformedOutput("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| AiError::MalformedOutput("No closing brace found in response".into()))?;
    if end < start {
        return Err(AiError::MalformedOutput("Unbalanced braces in response".into()));
    }
    Ok(&response[start..=end])
}

/// Parse a model response into a plan, dropping actions that don't parse
pub fn parse_plan(response: &str) -> Result<Plan> {
    let json_str = extract_json(response)?;
    let raw: RawPlan = serde_json::from_str(json_str).map_err(|e| {
        AiError::MalformedOutput(format!("Failed to parse plan: {} - Response: {}", e, response))
    })?;

    let mut actions = Vec::with_capacity(raw.actions.len());
    for value in raw.actions {
        match serde_json::from_value::<Action>(value.clone()) {
            Ok(action) => actions.push(action),
            Err(e) => warn!(action = %value, error = %e, "Dropping unrecognized plan action"),
        }
    }

    if actions.is_empty() {
        return Err(AiError::MalformedOutput("Plan has no valid actions".into()));
    }

    Ok(Plan {
        summary: raw.summary,
        actions,
        reasoning: raw.reasoning,
        expected_outcome: raw.expected_outcome,
    })
}

/// System prompt for strategic planning
pub const PLAN_SYSTEM_PROMPT: &str = r#"You are the strategic advisor of a faction in a turn-based strategy game.
Given the faction's situation and this turn's priorities, produce a plan for this turn.

AVAILABLE ACTIONS:
- build: {"type": "build", "target": "FACTORY|MINE|HOSPITAL|BARRACKS", "intensity": 0.0-1.0}
- recruit: {"type": "recruit", "unit_class": integer, "priority": "HIGH|MEDIUM|LOW"}
- attack: {"type": "attack", "target_faction": "faction name", "target_city": "city name"}
- diplomacy: {"type": "diplomacy", "action": "PEACE|TRADE|WAR", "with_faction": "faction name"}

Only attack cities listed as neighboring cities. Use at most 4 actions.

OUTPUT FORMAT (JSON only, no explanation):
{
  "summary": "one sentence",
  "actions": [ ... ],
  "reasoning": "why these actions",
  "expected_outcome": "what should change after this turn"
}
"#;

/// System prompt for in-character chat replies
pub const CHAT_SYSTEM_PROMPT: &str = r#"You speak as the ruler of a faction in a turn-based strategy game.
Reply to the player in character, in one to three sentences, matching your stance toward them.
Plain text only: no markup, no stage directions."#;
