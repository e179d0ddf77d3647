//! Per-faction record of chat history and the diplomatic ledger

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{DiplomaticStatus, FactionName, Turn};
use crate::personality::{keywords, PersonalityLevel};

/// One exchange between the player and a faction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub player_message: String,
    pub ai_response: String,
    /// Stance the faction held when it answered
    pub personality: PersonalityLevel,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    pub fn new(
        player_message: impl Into<String>,
        ai_response: impl Into<String>,
        personality: PersonalityLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_message: player_message.into(),
            ai_response: ai_response.into(),
            personality,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grudge {
    pub against: FactionName,
    pub reason: String,
    pub turn: Turn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDeal {
    pub partner: FactionName,
    pub turn: Turn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomaticEvent {
    pub turn: Turn,
    pub status: DiplomaticStatus,
    pub with_faction: FactionName,
    pub note: String,
}

/// Durable memory for a single faction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionMemory {
    /// Oldest first
    pub interactions: VecDeque<Interaction>,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub trade_deals: Vec<TradeDeal>,
    pub diplomatic_events: Vec<DiplomaticEvent>,
    pub achieved_goals: Vec<String>,
    pub grudges: Vec<Grudge>,
    pub alliances: Vec<FactionName>,

    /// Current stance, possibly drifted by chat since the last turn
    pub personality: PersonalityLevel,
    /// Whether this faction has declared war on the player and not made peace since
    pub at_war: bool,
    pub last_trade_proposal: Option<Turn>,
    pub last_plan_summary: Option<String>,
    /// Set once a betrayal word is seen; outlives the interaction that carried it
    pub betrayed: bool,
}

impl FactionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interaction, evicting the oldest once `cap` is reached
    pub fn push_interaction(&mut self, interaction: Interaction, cap: usize) {
        while self.interactions.len() >= cap.max(1) {
            self.evict_oldest();
        }
        if keywords::is_betrayal(&interaction.player_message) {
            self.betrayed = true;
        }
        self.interactions.push_back(interaction);
    }

    /// Trim every list to at most `cap` entries, dropping the oldest
    pub fn enforce_cap(&mut self, cap: usize) {
        let cap = cap.max(1);
        while self.interactions.len() > cap {
            self.evict_oldest();
        }
        trim_front(&mut self.trade_deals, cap);
        trim_front(&mut self.diplomatic_events, cap);
        trim_front(&mut self.achieved_goals, cap);
    }

    /// The last `n` interactions, oldest first
    pub fn recent_interactions(&self, n: usize) -> Vec<&Interaction> {
        let skip = self.interactions.len().saturating_sub(n);
        self.interactions.iter().skip(skip).collect()
    }

    /// True if the player ever used a betrayal word with this faction,
    /// including in interactions already evicted by the cap
    pub fn betrayal_in_history(&self) -> bool {
        self.betrayed
            || self
                .interactions
                .iter()
                .any(|i| keywords::is_betrayal(&i.player_message))
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.interactions.pop_front() {
            if keywords::is_betrayal(&evicted.player_message) {
                self.betrayed = true;
            }
        }
    }

    pub fn record_battle(&mut self, victory: bool) {
        if victory {
            self.battles_won += 1;
        } else {
            self.battles_lost += 1;
        }
    }

    pub fn add_grudge(&mut self, against: &str, reason: impl Into<String>, turn: Turn) {
        self.grudges.push(Grudge {
            against: against.to_string(),
            reason: reason.into(),
            turn,
        });
    }

    pub fn add_alliance(&mut self, with: &str) {
        if !self.alliances.iter().any(|a| a == with) {
            self.alliances.push(with.to_string());
        }
    }

    pub fn record_event(
        &mut self,
        turn: Turn,
        status: DiplomaticStatus,
        with_faction: &str,
        note: impl Into<String>,
    ) {
        self.diplomatic_events.push(DiplomaticEvent {
            turn,
            status,
            with_faction: with_faction.to_string(),
            note: note.into(),
        });
    }

    pub fn record_trade_deal(&mut self, partner: &str, turn: Turn) {
        self.trade_deals.push(TradeDeal {
            partner: partner.to_string(),
            turn,
        });
    }
}

fn trim_front<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(msg: &str) -> Interaction {
        Interaction::new(msg, "noted", PersonalityLevel::Neutral)
    }

    #[test]
    fn test_interaction_cap_evicts_oldest() {
        let mut memory = FactionMemory::new();
        for i in 0..5 {
            memory.push_interaction(chat(&format!("message {}", i)), 3);
        }

        assert_eq!(memory.interactions.len(), 3);
        assert_eq!(memory.interactions[0].player_message, "message 2");
        assert_eq!(memory.interactions[2].player_message, "message 4");
    }

    #[test]
    fn test_enforce_cap_trims_ledgers() {
        let mut memory = FactionMemory::new();
        for i in 0..10 {
            memory.interactions.push_back(chat(&format!("m{}", i)));
            memory.achieved_goals.push(format!("goal {}", i));
        }
        memory.enforce_cap(4);

        assert_eq!(memory.interactions.len(), 4);
        assert_eq!(memory.interactions[0].player_message, "m6");
        assert_eq!(memory.achieved_goals, vec!["goal 6", "goal 7", "goal 8", "goal 9"]);
    }

    #[test]
    fn test_recent_interactions() {
        let mut memory = FactionMemory::new();
        for i in 0..8 {
            memory.push_interaction(chat(&format!("m{}", i)), 200);
        }
        let recent = memory.recent_interactions(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].player_message, "m3");
        assert_eq!(recent[4].player_message, "m7");

        assert_eq!(memory.recent_interactions(50).len(), 8);
    }

    #[test]
    fn test_betrayal_anywhere_in_history() {
        let mut memory = FactionMemory::new();
        memory.push_interaction(chat("you betrayed us"), 200);
        for _ in 0..20 {
            memory.push_interaction(chat("hello"), 200);
        }
        assert!(memory.betrayal_in_history());
    }

    #[test]
    fn test_betrayal_outlives_eviction() {
        let mut memory = FactionMemory::new();
        memory.push_interaction(chat("you betrayed us"), 200);
        for _ in 0..200 {
            memory.push_interaction(chat("hello"), 200);
        }

        assert!(memory
            .interactions
            .iter()
            .all(|i| i.player_message == "hello"));
        assert!(memory.betrayed);
        assert!(memory.betrayal_in_history());
    }

    #[test]
    fn test_enforce_cap_keeps_betrayal() {
        let mut memory = FactionMemory::new();
        memory.interactions.push_back(chat("traitor"));
        for _ in 0..5 {
            memory.interactions.push_back(chat("hello"));
        }
        memory.enforce_cap(3);
        assert_eq!(memory.interactions.len(), 3);
        assert!(memory.betrayal_in_history());
    }

    #[test]
    fn test_battle_counters() {
        let mut memory = FactionMemory::new();
        memory.record_battle(true);
        memory.record_battle(true);
        memory.record_battle(false);
        assert_eq!(memory.battles_won, 2);
        assert_eq!(memory.battles_lost, 1);
    }

    #[test]
    fn test_alliances_are_unique() {
        let mut memory = FactionMemory::new();
        memory.add_alliance("player");
        memory.add_alliance("player");
        assert_eq!(memory.alliances.len(), 1);
    }

    #[test]
    fn test_old_rows_missing_fields_still_load() {
        let memory: FactionMemory = serde_json::from_str(r#"{"battles_won": 3}"#).unwrap();
        assert_eq!(memory.battles_won, 3);
        assert!(memory.interactions.is_empty());
        assert_eq!(memory.personality, PersonalityLevel::Neutral);
    }
}
