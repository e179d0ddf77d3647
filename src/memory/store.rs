//! Faction memory persistence
//!
//! One row per faction, upserted whole. Both stores enforce the interaction
//! retention cap on every write.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::FactionName;
use crate::memory::faction_memory::{FactionMemory, Interaction};
use crate::personality::PersonalityLevel;

/// Persisted row: `{faction, memory, personality, last_updated}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionRecord {
    pub faction: FactionName,
    pub memory: FactionMemory,
    pub personality: PersonalityLevel,
    pub last_updated: DateTime<Utc>,
}

impl FactionRecord {
    pub fn new(faction: &str, memory: FactionMemory) -> Self {
        Self {
            faction: faction.to_string(),
            personality: memory.personality,
            memory,
            last_updated: Utc::now(),
        }
    }
}

/// Faction-keyed storage for `FactionMemory`
pub trait MemoryStore: Send + Sync {
    /// Fetch the stored row for a faction, if any
    fn read_record(&self, faction: &str) -> Result<Option<FactionRecord>>;

    /// Insert or replace a faction's row
    fn write_record(&self, record: FactionRecord) -> Result<()>;

    /// Max interactions kept per faction
    fn retention_cap(&self) -> usize;

    /// Load a faction's memory, or an empty one on first access
    fn load(&self, faction: &str) -> Result<FactionMemory> {
        Ok(self
            .read_record(faction)?
            .map(|record| record.memory)
            .unwrap_or_default())
    }

    /// Full upsert of a faction's memory
    fn save(&self, faction: &str, memory: &FactionMemory) -> Result<()> {
        let mut memory = memory.clone();
        memory.enforce_cap(self.retention_cap());
        self.write_record(FactionRecord::new(faction, memory))
    }

    fn append_interaction(&self, faction: &str, interaction: Interaction) -> Result<()> {
        let mut memory = self.load(faction)?;
        memory.push_interaction(interaction, self.retention_cap());
        self.save(faction, &memory)
    }
}

/// Process-local store, used by tests and the sandbox CLI
pub struct InMemoryStore {
    rows: RwLock<AHashMap<FactionName, FactionRecord>>,
    cap: usize,
}

impl InMemoryStore {
    pub fn new(cap: usize) -> Self {
        Self {
            rows: RwLock::new(AHashMap::new()),
            cap,
        }
    }

    pub fn factions(&self) -> Vec<FactionName> {
        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<_> = rows.keys().cloned().collect();
        names.sort();
        names
    }
}

impl MemoryStore for InMemoryStore {
    fn read_record(&self, faction: &str) -> Result<Option<FactionRecord>> {
        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        Ok(rows.get(faction).cloned())
    }

    fn write_record(&self, record: FactionRecord) -> Result<()> {
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        rows.insert(record.faction.clone(), record);
        Ok(())
    }

    fn retention_cap(&self) -> usize {
        self.cap
    }
}

/// One JSON file per faction under a directory
pub struct JsonFileStore {
    dir: PathBuf,
    cap: usize,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            dir: dir.into(),
            cap,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, faction: &str) -> PathBuf {
        let file_stem: String = faction
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_stem))
    }
}

impl MemoryStore for JsonFileStore {
    fn read_record(&self, faction: &str) -> Result<Option<FactionRecord>> {
        let path = self.path_for(faction);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let record: FactionRecord = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    fn write_record(&self, record: FactionRecord) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&record.faction);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&record)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn retention_cap(&self) -> usize {
        self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(msg: &str) -> Interaction {
        Interaction::new(msg, "ok", PersonalityLevel::Neutral)
    }

    #[test]
    fn test_load_creates_default_on_first_access() {
        let store = InMemoryStore::new(200);
        let memory = store.load("Carthage").unwrap();
        assert!(memory.interactions.is_empty());
        assert_eq!(memory.battles_won, 0);
    }

    #[test]
    fn test_save_is_upsert() {
        let store = InMemoryStore::new(200);
        let mut memory = FactionMemory::new();
        memory.battles_won = 1;
        store.save("Carthage", &memory).unwrap();
        memory.battles_won = 2;
        store.save("Carthage", &memory).unwrap();

        assert_eq!(store.factions(), vec!["Carthage".to_string()]);
        assert_eq!(store.load("Carthage").unwrap().battles_won, 2);
    }

    #[test]
    fn test_append_respects_cap() {
        let store = InMemoryStore::new(3);
        for i in 0..7 {
            store.append_interaction("Carthage", chat(&format!("m{}", i))).unwrap();
        }
        let memory = store.load("Carthage").unwrap();
        assert_eq!(memory.interactions.len(), 3);
        assert_eq!(memory.interactions[0].player_message, "m4");
    }

    #[test]
    fn test_betrayal_survives_cap_in_store() {
        let store = InMemoryStore::new(200);
        store.append_interaction("Carthage", chat("you betrayed us")).unwrap();
        for _ in 0..200 {
            store.append_interaction("Carthage", chat("hello")).unwrap();
        }
        let memory = store.load("Carthage").unwrap();
        assert_eq!(memory.interactions.len(), 200);
        assert!(memory.betrayal_in_history());
    }

    #[test]
    fn test_save_trims_oversized_memory() {
        let store = InMemoryStore::new(2);
        let mut memory = FactionMemory::new();
        for i in 0..5 {
            memory.interactions.push_back(chat(&format!("m{}", i)));
        }
        store.save("Carthage", &memory).unwrap();
        assert_eq!(store.load("Carthage").unwrap().interactions.len(), 2);
    }

    #[test]
    fn test_record_mirrors_personality() {
        let store = InMemoryStore::new(10);
        let mut memory = FactionMemory::new();
        memory.personality = PersonalityLevel::Enemy;
        store.save("Carthage", &memory).unwrap();

        let record = store.read_record("Carthage").unwrap().unwrap();
        assert_eq!(record.personality, PersonalityLevel::Enemy);
        assert_eq!(record.faction, "Carthage");
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), 200);

        assert!(store.read_record("Gaul").unwrap().is_none());

        store.append_interaction("Gaul", chat("hello")).unwrap();
        let memory = store.load("Gaul").unwrap();
        assert_eq!(memory.interactions.len(), 1);
        assert_eq!(memory.interactions[0].player_message, "hello");
    }

    #[test]
    fn test_json_store_sanitizes_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), 200);
        store.save("../evil faction", &FactionMemory::new()).unwrap();

        assert!(dir.path().join("___evil_faction.json").exists());
        assert!(store.read_record("../evil faction").unwrap().is_some());
    }
}
