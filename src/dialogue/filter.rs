//! Output filter applied to every generated response
//!
//! Order: strip markup tags, redact denylisted words, truncate. The cut can
//! leave a word prefix that is itself denylisted ("hello" -> "hell..."), so the
//! truncated text is redacted once more.

use regex::Regex;

/// Replacement for any denylisted word
pub const REDACTED_PLACEHOLDER: &str = "***";

/// Appended when a response is cut short; counts toward the length limit
pub const TRUNCATION_MARKER: &str = "...";

pub const DEFAULT_DENYLIST: &[&str] = &["damn", "hell", "bastard", "idiot", "stupid", "fool"];

#[derive(Debug, Clone)]
pub struct ResponseFilter {
    max_chars: usize,
    tags: Option<Regex>,
    denylist: Option<Regex>,
}

impl ResponseFilter {
    pub fn new(max_chars: usize) -> Self {
        Self::with_denylist(max_chars, DEFAULT_DENYLIST)
    }

    /// Filter with a custom denylist; words match whole and case-insensitively
    pub fn with_denylist(max_chars: usize, words: &[&str]) -> Self {
        let escaped: Vec<String> = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();
        let denylist = if escaped.is_empty() {
            None
        } else {
            Regex::new(&format!(r"(?i)\b(?:{})\b", escaped.join("|"))).ok()
        };

        Self {
            max_chars,
            tags: Regex::new(r"<[^<>]*>").ok(),
            denylist,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn apply(&self, text: &str) -> String {
        let stripped = match &self.tags {
            Some(tags) => tags.replace_all(text, "").into_owned(),
            None => text.to_string(),
        };
        let redacted = self.redact(&stripped);
        // Placeholder is never longer than a denylisted word, so the limit holds
        self.redact(&truncate(redacted.trim(), self.max_chars))
    }

    fn redact(&self, text: &str) -> String {
        match &self.denylist {
            Some(deny) => deny.replace_all(text, REDACTED_PLACEHOLDER).into_owned(),
            None => text.to_string(),
        }
    }
}

/// Cut `text` to at most `max_chars` characters, marker included
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_response_truncated_to_limit() {
        let filter = ResponseFilter::new(500);
        let out = filter.apply(&"a".repeat(600));
        assert_eq!(out.chars().count(), 500);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_short_response_untouched() {
        let filter = ResponseFilter::new(500);
        assert_eq!(filter.apply("Well met, traveller."), "Well met, traveller.");
    }

    #[test]
    fn test_tags_stripped() {
        let filter = ResponseFilter::new(500);
        assert_eq!(filter.apply("<b>Leave</b> our <i>lands</i>."), "Leave our lands.");
    }

    #[test]
    fn test_denylisted_words_redacted() {
        let filter = ResponseFilter::new(500);
        let out = filter.apply("You DAMN fool, what the hell?");
        assert_eq!(out, "You *** ***, what the ***?");
        assert!(!out.to_lowercase().contains("damn"));
        // Whole words only
        assert_eq!(filter.apply("Hello shellfish"), "Hello shellfish");
    }

    #[test]
    fn test_cut_word_that_becomes_denylisted_is_redacted() {
        let filter = ResponseFilter::new(500);
        let text = format!("{} hello there my friend", "a".repeat(492));
        let out = filter.apply(&text);

        assert!(out.chars().count() <= 500);
        assert!(out.ends_with("***..."));
        assert!(!out.to_lowercase().contains("hell"));
    }

    #[test]
    fn test_cut_inside_foolish_is_redacted() {
        let filter = ResponseFilter::new(12);
        assert_eq!(filter.apply("Such foolish talk"), "Such ***...");
    }

    #[test]
    fn test_multibyte_truncation() {
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
