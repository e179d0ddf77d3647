//! Faction personality: relation-score stances and chat-driven drift

pub mod classifier;
pub mod keywords;

pub use classifier::PersonalityLevel;
