//! Transcript normalization and command classification

use std::sync::LazyLock;

use regex::Regex;

use super::{Command, MAX_BRIGHTNESS, RelayId};

/// Spoken number words and their digit replacements, applied in order
///
/// "to" maps to "2" because STT engines routinely hear the spoken digit as
/// the preposition.
pub const NUMBER_WORDS: &[(&str, &str)] = &[
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("to", "2"),
];

/// Whole-word, case-insensitive matchers for [`NUMBER_WORDS`]
static NUMBER_WORD_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    NUMBER_WORDS
        .iter()
        .map(|(word, digit)| {
            let re = Regex::new(&format!(r"(?i)\b{word}\b")).expect("valid regex");
            (re, *digit)
        })
        .collect()
});

/// "relay 2 on", "relay3off"
static POWER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)relay\s*([1-4])\s*(on|off)").expect("valid regex"));

/// "relay 2 brightness 50"
static BRIGHTNESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)relay\s*([1-4])\s*brightness\s*([0-9]{1,3})").expect("valid regex")
});

/// Replace whole-word number words with digits
#[must_use]
pub fn normalize(text: &str) -> String {
    NUMBER_WORD_REGEXES
        .iter()
        .fold(text.to_string(), |acc, (re, digit)| {
            re.replace_all(&acc, *digit).into_owned()
        })
}

/// Classify a transcribed utterance
///
/// The text is lowercased and normalized first. Rules are tried in priority
/// order: any mention of "state", then power, then brightness. Anything else
/// is returned as [`Command::Unrecognized`] carrying the input unchanged.
#[must_use]
pub fn interpret(text: &str) -> Command {
    let normalized = normalize(&text.to_lowercase());

    if normalized.contains("state") {
        return Command::QueryState;
    }

    if let Some(caps) = POWER_REGEX.captures(&normalized)
        && let Some(relay) = relay_from(&caps[1])
    {
        let on = caps[2].eq_ignore_ascii_case("on");
        return Command::SetPower { relay, on };
    }

    if let Some(caps) = BRIGHTNESS_REGEX.captures(&normalized)
        && let Some(relay) = relay_from(&caps[1])
    {
        // At most three ASCII digits, so u16 cannot overflow
        let raw: u16 = caps[2].parse().unwrap_or(u16::MAX);
        let level = u8::try_from(raw.min(u16::from(MAX_BRIGHTNESS))).unwrap_or(MAX_BRIGHTNESS);
        return Command::SetBrightness { relay, level };
    }

    tracing::debug!(text, normalized = %normalized, "no command pattern matched");
    Command::Unrecognized(text.to_string())
}

fn relay_from(digit: &str) -> Option<RelayId> {
    digit.parse().ok().and_then(RelayId::new)
}
