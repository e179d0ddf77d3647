//! Player chat handling

use tracing::{debug, warn};

use crate::core::error::AiError;
use crate::dialogue::{ResponseContext, ResponseGenerator};
use crate::memory::{FactionMemory, Interaction};
use crate::orchestrator::DecisionOrchestrator;
use crate::personality::PersonalityLevel;

impl DecisionOrchestrator {
    /// Answer a player message in character and record the exchange
    ///
    /// The message may drift the faction's personality one notch; the drift
    /// lasts until the next `decide_turn` recomputes it from the relation.
    pub async fn process_player_message(&self, faction: &str, message: &str) -> String {
        let _guard = self.locks.acquire(faction).await;
        let player = self.config.player_faction.as_str();

        let relation = self.provider.relation(faction, player).unwrap_or_else(|e| {
            warn!(faction, error = %e, "Relation unavailable for chat, assuming 0");
            0
        });

        // A faction that has never been stored starts from its relation score
        let mut memory = match self.store.read_record(faction) {
            Ok(Some(record)) => record.memory,
            Ok(None) => FactionMemory {
                personality: PersonalityLevel::classify(relation),
                ..FactionMemory::default()
            },
            Err(e) => {
                warn!(faction, error = %e, "Memory load failed, starting from empty memory");
                FactionMemory {
                    personality: PersonalityLevel::classify(relation),
                    ..FactionMemory::default()
                }
            }
        };

        let personality = memory.personality.drift_on_message(message);
        if personality != memory.personality {
            debug!(faction, from = %memory.personality, to = %personality, "Personality drifted in chat");
        }

        let context = ResponseContext {
            faction: faction.to_string(),
            personality,
            relation,
            at_war: memory.at_war,
            recent_interactions: memory
                .recent_interactions(self.config.memory_context_window)
                .into_iter()
                .cloned()
                .collect(),
        };
        let response = self.generate_response(message, &context).await;

        memory.personality = personality;
        memory.push_interaction(
            Interaction::new(message, response.clone(), personality),
            self.config.interaction_cap,
        );
        self.save_memory(faction, &memory);

        response
    }

    /// Pluggable generator under the timeout budget, else the canned table;
    /// either way the text is filtered
    async fn generate_response(&self, message: &str, context: &ResponseContext) -> String {
        if let Some(generator) = &self.response_generator {
            let budget = self.config.generator_timeout();
            match tokio::time::timeout(budget, generator.respond(message, context)).await {
                Ok(Ok(text)) => {
                    let filtered = self.filter.apply(&text);
                    if !filtered.is_empty() {
                        return filtered;
                    }
                    warn!(faction = %context.faction, generator = generator.name(), "Response empty after filtering, using rules");
                }
                Ok(Err(e)) => {
                    warn!(faction = %context.faction, generator = generator.name(), error = %e, "Response generator failed, using rules")
                }
                Err(_) => {
                    let e = AiError::GeneratorTimeout(self.config.generator_timeout_ms);
                    warn!(faction = %context.faction, generator = generator.name(), error = %e, "Response generator timed out, using rules")
                }
            }
        }
        self.filter
            .apply(&self.responder.reply(message, context.personality))
    }
}
