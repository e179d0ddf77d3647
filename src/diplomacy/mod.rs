//! Diplomatic policy: player behavior profile and war/peace scoring

pub mod policy;
pub mod profile;

pub use policy::{decide, war_factors, DiplomaticDecision, PolicyInputs, WarFactors};
pub use profile::{sentiment_balance, BehaviorProfile};
