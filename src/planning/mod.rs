//! Strategic planning pipeline
//!
//! Snapshot -> priorities -> plan -> commands:
//! SnapshotCollector -> prioritize -> PlanGenerator -> translate

pub mod generator;
pub mod plan;
pub mod priority;
pub mod rules;
pub mod snapshot;
pub mod translator;

pub use generator::PlanGenerator;
pub use plan::{Action, Command, Plan, RecruitPriority};
pub use priority::{prioritize, Priority};
pub use rules::{weakest_reachable_neighbor, RulePlanner};
pub use snapshot::{Snapshot, SnapshotCollector};
pub use translator::{translate, translate_plan};
