//! LLM integration for pluggable plan and chat generation

pub mod client;
pub mod context;
pub mod generators;
pub mod parser;

pub use client::{Completion, LlmClient};
pub use context::{chat_summary, PlanContext};
pub use generators::{LlmPlanGenerator, LlmResponseGenerator};
pub use parser::{extract_json, parse_plan};
