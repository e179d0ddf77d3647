//! Player behavior profile derived from recent chat

use serde::{Deserialize, Serialize};

use crate::memory::Interaction;
use crate::personality::keywords;

/// Share of recent player messages falling into each keyword bucket
///
/// Percentages are in [0, 100] relative to the number of messages examined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub aggression_pct: f64,
    pub friendliness_pct: f64,
    pub trade_frequency_pct: f64,
    /// Messages containing threat words
    pub threat_count: usize,
    pub messages: usize,
}

impl BehaviorProfile {
    /// Profile over the player side of `interactions` (oldest first)
    pub fn from_interactions<'a>(interactions: impl IntoIterator<Item = &'a Interaction>) -> Self {
        Self::from_messages(interactions.into_iter().map(|i| i.player_message.as_str()))
    }

    pub fn from_messages<'a>(messages: impl IntoIterator<Item = &'a str>) -> Self {
        let mut threats = 0usize;
        let mut friendly = 0usize;
        let mut trade = 0usize;
        let mut total = 0usize;

        for message in messages {
            total += 1;
            if keywords::is_threat(message) {
                threats += 1;
            }
            if keywords::is_friendly(message) {
                friendly += 1;
            }
            if keywords::is_trade(message) {
                trade += 1;
            }
        }

        if total == 0 {
            return Self::default();
        }

        let pct = |n: usize| n as f64 * 100.0 / total as f64;
        Self {
            aggression_pct: pct(threats),
            friendliness_pct: pct(friendly),
            trade_frequency_pct: pct(trade),
            threat_count: threats,
            messages: total,
        }
    }
}

/// Net tone of recent messages in [-1, 1]
///
/// Each message counts once as positive and/or once as negative; the balance
/// is `(positive - negative) / messages`. No messages gives 0.
pub fn sentiment_balance<'a>(messages: impl IntoIterator<Item = &'a str>) -> f64 {
    let mut positive = 0i64;
    let mut negative = 0i64;
    let mut count = 0i64;

    for message in messages {
        count += 1;
        if keywords::mentions_any(message, keywords::POSITIVE_WORDS) {
            positive += 1;
        }
        if keywords::mentions_any(message, keywords::NEGATIVE_WORDS) {
            negative += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        (positive - negative) as f64 / count as f64
    }
}
