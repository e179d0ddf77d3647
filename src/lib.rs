//! Faction AI - strategic planning and diplomacy for computer-controlled factions

pub mod core;
pub mod dialogue;
pub mod diplomacy;
pub mod game;
pub mod llm;
pub mod memory;
pub mod orchestrator;
pub mod personality;
pub mod planning;

pub use orchestrator::{DecisionOrchestrator, TurnReport};
