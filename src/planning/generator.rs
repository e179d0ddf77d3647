//! Plan generator contract
//!
//! The orchestrator always owns a `RulePlanner`; anything else implementing
//! `PlanGenerator` (e.g. `LlmPlanGenerator`) is tried first under a timeout.

use async_trait::async_trait;

use crate::core::error::Result;
use crate::planning::plan::Plan;
use crate::planning::priority::Priority;
use crate::planning::rules::RulePlanner;
use crate::planning::snapshot::Snapshot;

#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn generate(&self, snapshot: &Snapshot, priorities: &[Priority]) -> Result<Plan>;
}

#[async_trait]
impl PlanGenerator for RulePlanner {
    fn name(&self) -> &str {
        "rules"
    }

    async fn generate(&self, snapshot: &Snapshot, priorities: &[Priority]) -> Result<Plan> {
        Ok(self.plan(snapshot, priorities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rule_planner_behind_trait() {
        let generator: Box<dyn PlanGenerator> = Box::new(RulePlanner::new());
        let snapshot = Snapshot::default();
        let plan = generator
            .generate(&snapshot, &[Priority::EconomyGrowth])
            .await
            .unwrap();
        assert_eq!(generator.name(), "rules");
        assert_eq!(plan, RulePlanner::new().plan(&snapshot, &[Priority::EconomyGrowth]));
    }
}
