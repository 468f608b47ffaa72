//! Normalizer: reduces a raw log line to its [`LogKey`] template.
//!
//! Substitutions run in a fixed order because each step can expose text for
//! the next one:
//!
//! 1. calendar timestamps (`YYYY-MM-DD HH:MM:SS`, space or `T`) → a space
//! 2. IPv4-shaped tokens → `<IP>`
//! 3. runs of five or more digits → `<NUM>`
//! 4. whitespace runs → one space, ends trimmed
//!
//! The function is total: any input, including the empty string, yields a key.

use crate::types::LogKey;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

pub const IP_TOKEN: &str = "<IP>";
pub const NUM_TOKEN: &str = "<NUM>";

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}\b").expect("timestamp pattern")
});

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("ipv4 pattern")
});

static LONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5,}\b").expect("long number pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Convert one raw line into its normalised key.
pub fn normalize(raw: &str) -> LogKey {
    let s = TIMESTAMP.replace_all(raw, " ");
    let s = replace_cow(s, &IPV4, IP_TOKEN);
    let s = replace_cow(s, &LONG_NUMBER, NUM_TOKEN);
    let s = replace_cow(s, &WHITESPACE, " ");
    LogKey::from(s.trim())
}

/// Normalise any displayable value by its textual form.
pub fn normalize_display(value: &impl std::fmt::Display) -> LogKey {
    normalize(&value.to_string())
}

// `replace_all` borrows its input, so chain substitutions without copying
// when nothing matched.
fn replace_cow<'a>(input: Cow<'a, str>, re: &Regex, with: &str) -> Cow<'a, str> {
    match input {
        Cow::Borrowed(s) => re.replace_all(s, with),
        Cow::Owned(s) => match re.replace_all(&s, with) {
            Cow::Borrowed(_) => Cow::Owned(s),
            Cow::Owned(replaced) => Cow::Owned(replaced),
        },
    }
}
