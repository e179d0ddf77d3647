//! LLM-backed plan and response generators
//!
//! Both are single-attempt: any client or parse error is returned as-is and
//! the orchestrator takes the rule-based path.

use async_trait::async_trait;

use crate::core::error::{AiError, Result};
use crate::dialogue::{ResponseContext, ResponseGenerator};
use crate::llm::client::Completion;
use crate::llm::context::{chat_summary, PlanContext};
use crate::llm::parser::{parse_plan, CHAT_SYSTEM_PROMPT, PLAN_SYSTEM_PROMPT};
use crate::planning::generator::PlanGenerator;
use crate::planning::plan::Plan;
use crate::planning::priority::Priority;
use crate::planning::snapshot::Snapshot;

pub struct LlmPlanGenerator<C: Completion> {
    client: C,
}

impl<C: Completion> LlmPlanGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: Completion> PlanGenerator for LlmPlanGenerator<C> {
    fn name(&self) -> &str {
        "llm"
    }

    async fn generate(&self, snapshot: &Snapshot, priorities: &[Priority]) -> Result<Plan> {
        let context = PlanContext::from_snapshot(snapshot, priorities);
        let user_prompt = format!(
            "SITUATION:\n{}\nProduce this turn's plan as JSON:",
            context.summary()
        );
        let response = self.client.complete(PLAN_SYSTEM_PROMPT, &user_prompt).await?;
        parse_plan(&response)
    }
}

pub struct LlmResponseGenerator<C: Completion> {
    client: C,
}

impl<C: Completion> LlmResponseGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: Completion> ResponseGenerator for LlmResponseGenerator<C> {
    fn name(&self) -> &str {
        "llm"
    }

    async fn respond(&self, message: &str, context: &ResponseContext) -> Result<String> {
        let user_prompt = format!(
            "{}\nPLAYER SAYS:\n{}\n\nYour reply:",
            chat_summary(context),
            message
        );
        let response = self.client.complete(CHAT_SYSTEM_PROMPT, &user_prompt).await?;
        let reply = response.trim();
        if reply.is_empty() {
            return Err(AiError::MalformedOutput("Empty chat reply".into()));
        }
        Ok(reply.to_string())
    }
}
