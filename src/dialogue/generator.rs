//! Response generator contract and the rule-based implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::dialogue::responses::{canned_response, MessageBucket};
use crate::memory::Interaction;
use crate::personality::PersonalityLevel;

/// What a generator knows when answering the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseContext {
    pub faction: String,
    pub personality: PersonalityLevel,
    pub relation: i32,
    pub at_war: bool,
    /// Oldest first
    pub recent_interactions: Vec<Interaction>,
}

#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn respond(&self, message: &str, context: &ResponseContext) -> Result<String>;
}

/// Picks a canned line from the bucket x personality table
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleResponder;

impl RuleResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, message: &str, personality: PersonalityLevel) -> String {
        canned_response(MessageBucket::classify(message), personality).to_string()
    }
}

#[async_trait]
impl ResponseGenerator for RuleResponder {
    fn name(&self) -> &str {
        "rules"
    }

    async fn respond(&self, message: &str, context: &ResponseContext) -> Result<String> {
        Ok(self.reply(message, context.personality))
    }
}
