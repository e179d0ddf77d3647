//! Keyword buckets used to read the player's chat tone
//!
//! Matching is whole-word and case-insensitive: text is split on anything that
//! isn't alphanumeric, so "Hi!" matches `hi` but "this" does not.

pub const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greetings", "hail", "welcome"];

pub const THREAT_WORDS: &[&str] = &[
    "attack", "destroy", "war", "kill", "crush", "invade", "burn", "conquer", "threaten", "die",
];

pub const ALLIANCE_WORDS: &[&str] = &[
    "alliance",
    "ally",
    "allies",
    "friend",
    "friends",
    "friendship",
    "peace",
    "together",
    "cooperate",
];

pub const TRADE_WORDS: &[&str] = &[
    "trade", "trading", "deal", "exchange", "buy", "sell", "goods", "merchant", "commerce",
];

pub const BETRAYAL_WORDS: &[&str] = &[
    "betray", "betrayed", "betrayal", "traitor", "backstab", "treachery",
];

pub const POSITIVE_WORDS: &[&str] = &[
    "thank", "thanks", "friend", "peace", "ally", "alliance", "good", "great", "trade", "respect",
    "gift",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "war", "attack", "hate", "destroy", "kill", "threat", "crush", "insult", "die", "betray",
];

/// Lowercased alphanumeric tokens of `text`
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// True if any token of `text` is one of `words`
pub fn mentions_any(text: &str, words: &[&str]) -> bool {
    tokens(text).any(|t| words.contains(&t.as_str()))
}

pub fn is_threat(text: &str) -> bool {
    mentions_any(text, THREAT_WORDS)
}

pub fn is_friendly(text: &str) -> bool {
    mentions_any(text, ALLIANCE_WORDS)
}

pub fn is_trade(text: &str) -> bool {
    mentions_any(text, TRADE_WORDS)
}

pub fn is_betrayal(text: &str) -> bool {
    mentions_any(text, BETRAYAL_WORDS)
}
