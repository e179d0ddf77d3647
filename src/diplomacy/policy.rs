//! War/peace scoring
//!
//! `war_chance = base * relation_mod * strength_mod * behavior_mod * history_mod`,
//! then dampened for very friendly players and boosted by any past betrayal.
//! The chance is not clamped; values above 1 are kept as-is.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::WarDecisionMode;
use crate::diplomacy::profile::{sentiment_balance, BehaviorProfile};
use crate::memory::FactionMemory;
use crate::personality::PersonalityLevel;

/// Interactions whose sentiment feeds `history_mod`
pub const HISTORY_WINDOW: usize = 5;

/// Threshold used by `WarDecisionMode::Threshold`
pub const WAR_THRESHOLD: f64 = 0.5;

/// Everything the policy needs to know about one faction/player pairing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyInputs {
    pub personality: PersonalityLevel,
    pub relation: i32,
    pub own_strength: u64,
    pub opponent_strength: u64,
    pub profile: BehaviorProfile,
    /// Sentiment balance of the last few interactions, in [-1, 1]
    pub history_balance: f64,
    /// A betrayal word appeared anywhere in the interaction history
    pub betrayal: bool,
}

impl PolicyInputs {
    /// Derive the chat-based inputs from a faction's memory
    pub fn from_memory(
        personality: PersonalityLevel,
        relation: i32,
        own_strength: u64,
        opponent_strength: u64,
        memory: &FactionMemory,
        behavior_window: usize,
    ) -> Self {
        let profile = BehaviorProfile::from_interactions(memory.recent_interactions(behavior_window));
        let history_balance = sentiment_balance(
            memory
                .recent_interactions(HISTORY_WINDOW)
                .into_iter()
                .map(|i| i.player_message.as_str()),
        );

        Self {
            personality,
            relation,
            own_strength,
            opponent_strength,
            profile,
            history_balance,
            betrayal: memory.betrayal_in_history(),
        }
    }
}

/// Every factor of the war chance, kept for logging and reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarFactors {
    pub base: f64,
    pub relation_mod: f64,
    pub strength_ratio: f64,
    pub strength_mod: f64,
    pub behavior_mod: f64,
    pub history_mod: f64,
    pub friendliness_dampened: bool,
    pub betrayal_boosted: bool,
    pub war_chance: f64,
}

/// Outcome of one diplomatic evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiplomaticDecision {
    pub declare_war: bool,
    pub factors: WarFactors,
}

/// Score the war chance for `inputs`
pub fn war_factors(inputs: &PolicyInputs) -> WarFactors {
    let base = inputs.personality.base_war_chance();

    let relation = inputs.relation.clamp(-100, 100);
    let relation_mod = 1.0 - relation as f64 / 100.0;

    let strength_ratio = if inputs.own_strength > 0 {
        inputs.opponent_strength as f64 / inputs.own_strength as f64
    } else {
        2.0
    };
    let strength_mod = if strength_ratio > 1.5 {
        0.3
    } else if strength_ratio < 0.7 {
        1.5
    } else {
        1.0
    };

    // Aggression is checked before friendliness
    let behavior_mod = if inputs.profile.aggression_pct > 50.0 {
        1.5
    } else if inputs.profile.friendliness_pct > 50.0 {
        0.5
    } else {
        1.0
    };

    let history_mod = if inputs.history_balance > 0.3 {
        0.7
    } else if inputs.history_balance < -0.3 {
        1.3
    } else {
        1.0
    };

    let mut war_chance = base * relation_mod * strength_mod * behavior_mod * history_mod;

    let friendliness_dampened = inputs.profile.friendliness_pct > 70.0;
    if friendliness_dampened {
        war_chance *= 0.3;
    }
    if inputs.betrayal {
        war_chance *= 1.8;
    }

    WarFactors {
        base,
        relation_mod,
        strength_ratio,
        strength_mod,
        behavior_mod,
        history_mod,
        friendliness_dampened,
        betrayal_boosted: inputs.betrayal,
        war_chance,
    }
}

/// Evaluate `inputs` and decide between war and peace
///
/// `rng` is only drawn from in `WarDecisionMode::Sampled`.
pub fn decide<R: Rng + ?Sized>(
    inputs: &PolicyInputs,
    mode: WarDecisionMode,
    rng: &mut R,
) -> DiplomaticDecision {
    let factors = war_factors(inputs);
    let declare_war = match mode {
        WarDecisionMode::Threshold => factors.war_chance > WAR_THRESHOLD,
        WarDecisionMode::Sampled => rng.gen::<f64>() < factors.war_chance,
    };
    DiplomaticDecision {
        declare_war,
        factors,
    }
}
