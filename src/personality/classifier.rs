//! Personality classification from relation score and chat drift

use serde::{Deserialize, Serialize};

use crate::personality::keywords;

/// Discrete stance a faction holds toward the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityLevel {
    Friendly,
    Neutral,
    Hostile,
    Enemy,
}

impl Default for PersonalityLevel {
    fn default() -> Self {
        Self::Neutral
    }
}

impl PersonalityLevel {
    /// Map a relation score in [-100, 100] onto the four stances
    ///
    /// `>50` Friendly, `(0, 50]` Neutral, `(-50, 0]` Hostile, `<= -50` Enemy.
    /// Exactly -50 is Enemy: the half-open ranges win over any reading of -50
    /// as the last Hostile score.
    pub fn classify(relation: i32) -> Self {
        let relation = relation.clamp(-100, 100);
        if relation > 50 {
            Self::Friendly
        } else if relation > 0 {
            Self::Neutral
        } else if relation > -50 {
            Self::Hostile
        } else {
            Self::Enemy
        }
    }

    /// Nudge the stance one notch based on a single chat message
    ///
    /// Threat words take precedence over alliance words. Threats alone never
    /// produce Enemy, and nothing said in chat lifts a faction out of Enemy.
    pub fn drift_on_message(self, message: &str) -> Self {
        if keywords::is_threat(message) {
            match self {
                Self::Friendly => Self::Neutral,
                Self::Neutral => Self::Hostile,
                Self::Hostile => Self::Hostile,
                Self::Enemy => Self::Enemy,
            }
        } else if keywords::is_friendly(message) {
            match self {
                Self::Hostile => Self::Neutral,
                Self::Neutral => Self::Friendly,
                Self::Friendly => Self::Friendly,
                Self::Enemy => Self::Enemy,
            }
        } else {
            self
        }
    }

    /// Base war chance before any modifier is applied
    pub fn base_war_chance(self) -> f64 {
        match self {
            Self::Enemy => 0.8,
            Self::Hostile => 0.6,
            Self::Neutral => 0.3,
            Self::Friendly => 0.1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Neutral => "neutral",
            Self::Hostile => "hostile",
            Self::Enemy => "enemy",
        }
    }
}

impl std::fmt::Display for PersonalityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
