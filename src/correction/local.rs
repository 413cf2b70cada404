//! Deterministic local corrector — the dependency-free fallback path.
//!
//! Applies a fixed spelling dictionary and (optionally) a marketing-tone
//! dictionary with word-boundary, case-insensitive matching, then
//! capitalizes the first character. Simulates 200–500 ms of latency so UI
//! loading states are exercised even offline.

use std::sync::LazyLock;
use std::time::Duration;

use rand::Rng;
use regex::Regex;

/// Common misspellings → corrections. Order matters: entries are applied
/// top to bottom, mirroring the reference dictionary.
const SPELLING: &[(&str, &str)] = &[
    ("teh", "the"),
    ("recieve", "receive"),
    ("occured", "occurred"),
    ("accomodate", "accommodate"),
    ("neccessary", "necessary"),
    ("seperate", "separate"),
    ("untill", "until"),
    ("its", "it's"), // context-dependent, but common error
    ("thier", "their"),
    ("wich", "which"),
    ("alot", "a lot"),
    ("becuase", "because"),
    ("definately", "definitely"),
    ("goverment", "government"),
    ("occassion", "occasion"),
    ("reccommend", "recommend"),
];

/// Plain/informal vocabulary → promotional phrasing.
const MARKETING: &[(&str, &str)] = &[
    ("buy", "purchase with confidence"),
    ("buy now", "get started today"),
    ("cheap", "affordable"),
    ("sale", "exclusive offer"),
    ("discount", "limited-time savings"),
    ("free shipping", "complimentary delivery"),
    ("limited", "exclusive access to"),
    ("offer", "special opportunity"),
    ("deal", "premium package"),
    ("product", "solution"),
];

static SPELLING_RULES: LazyLock<Vec<(Regex, &'static str)>> =
    LazyLock::new(|| compile_rules(SPELLING));
static MARKETING_RULES: LazyLock<Vec<(Regex, &'static str)>> =
    LazyLock::new(|| compile_rules(MARKETING));

fn compile_rules(table: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .map(|(token, replacement)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(token));
            (Regex::new(&pattern).expect("static dictionary pattern"), *replacement)
        })
        .collect()
}

fn apply_rules(text: &str, rules: &[(Regex, &'static str)]) -> String {
    let mut out = text.to_string();
    for (regex, replacement) in rules {
        out = regex.replace_all(&out, *replacement).into_owned();
    }
    out
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Options for the local corrector.
#[derive(Debug, Clone, Copy)]
pub struct LocalOptions {
    /// Additionally rewrite informal/promotional vocabulary.
    pub improve_marketing: bool,
    /// Simulate network-like latency. Disabled by synchronous callers
    /// (tests use tokio's paused clock instead).
    pub simulate_latency: bool,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            improve_marketing: true,
            simulate_latency: true,
        }
    }
}

/// Correct text locally. Deterministic for a given input and options.
pub async fn correct(text: &str, options: LocalOptions) -> String {
    if options.simulate_latency {
        let delay = rand::thread_rng().gen_range(200..=500);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    correct_sync(text, options.improve_marketing)
}

/// The pure correction transform, without the simulated delay.
pub fn correct_sync(text: &str, improve_marketing: bool) -> String {
    let mut corrected = apply_rules(text, &SPELLING_RULES);
    if improve_marketing {
        corrected = apply_rules(&corrected, &MARKETING_RULES);
    }
    capitalize_first(&corrected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spelling_corrections_applied() {
        let out = correct_sync("i recieve teh letter becuase of you", false);
        assert_eq!(out, "I receive the letter because of you");
    }

    #[test]
    fn matching_is_case_insensitive_and_word_bounded() {
        let out = correct_sync("TEH cat", false);
        assert!(out.to_lowercase().starts_with("the "));
        // "wich" inside "sandwich" must not match
        assert_eq!(correct_sync("sandwich", false), "Sandwich");
    }

    #[test]
    fn marketing_tone_applied_when_requested() {
        let out = correct_sync("this deal is cheap", true);
        assert_eq!(out, "This premium package is affordable");

        let plain = correct_sync("this deal is cheap", false);
        assert_eq!(plain, "This deal is cheap");
    }

    #[test]
    fn documented_example_scenario() {
        let out = correct_sync("I recieve your messsage and teh deal is great", true);
        assert!(out.contains("receive"));
        assert!(out.contains("the "));
        assert!(out.contains("premium package"));
        assert!(out.starts_with('I'));
        // unknown tokens pass through untouched
        assert!(out.contains("messsage"));
    }

    #[test]
    fn idempotent_on_corrected_text() {
        let once = correct_sync("i recieve alot of goverment mail untill now", true);
        let twice = correct_sync(&once, true);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(correct_sync("", true), "");
    }

    #[tokio::test(start_paused = true)]
    async fn async_path_matches_sync_transform() {
        let out = correct("teh offer", LocalOptions::default()).await;
        assert_eq!(out, correct_sync("teh offer", true));
    }
}
