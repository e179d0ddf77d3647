//! Canned responses keyed by message bucket and personality

use serde::{Deserialize, Serialize};

use crate::personality::{keywords, PersonalityLevel};

/// Coarse topic of a player message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageBucket {
    Greeting,
    Trade,
    Threat,
    Default,
}

impl MessageBucket {
    /// First matching bucket wins: greeting, then trade, then threat
    pub fn classify(message: &str) -> Self {
        if keywords::mentions_any(message, keywords::GREETING_WORDS) {
            Self::Greeting
        } else if keywords::is_trade(message) {
            Self::Trade
        } else if keywords::is_threat(message) {
            Self::Threat
        } else {
            Self::Default
        }
    }
}

pub fn canned_response(bucket: MessageBucket, personality: PersonalityLevel) -> &'static str {
    use MessageBucket as B;
    use PersonalityLevel as P;

    match (bucket, personality) {
        (B::Greeting, P::Friendly) => "Welcome, friend! Our halls are always open to you.",
        (B::Greeting, P::Neutral) => "Greetings. State your business.",
        (B::Greeting, P::Hostile) => "You again. Speak quickly.",
        (B::Greeting, P::Enemy) => "We have nothing to say to you.",

        (B::Trade, P::Friendly) => "Trade between our peoples has always prospered. Let us talk terms.",
        (B::Trade, P::Neutral) => "We may consider a fair exchange.",
        (B::Trade, P::Hostile) => "Any deal with you will cost a premium.",
        (B::Trade, P::Enemy) => "We do not trade with enemies.",

        (B::Threat, P::Friendly) => "Those are harsh words between friends. Reconsider them.",
        (B::Threat, P::Neutral) => "Threats will not serve you well here.",
        (B::Threat, P::Hostile) => "Try it, and see how our walls hold.",
        (B::Threat, P::Enemy) => "Then come. Our armies are ready.",

        (B::Default, P::Friendly) => "We hear you, friend.",
        (B::Default, P::Neutral) => "Noted.",
        (B::Default, P::Hostile) => "Your words mean little to us.",
        (B::Default, P::Enemy) => "Leave our lands.",
    }
}
