//! Faction memory: interaction history, outcome ledger, persistence

pub mod faction_memory;
pub mod locks;
pub mod store;

pub use faction_memory::{DiplomaticEvent, FactionMemory, Grudge, Interaction, TradeDeal};
pub use locks::FactionLocks;
pub use store::{FactionRecord, InMemoryStore, JsonFileStore, MemoryStore};
