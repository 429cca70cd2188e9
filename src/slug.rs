// @file slug.rs
// @brief region name to lookup key normalization

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").unwrap());
static HYPHENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Turns a human-readable region name into the key its map element is tagged with.
///
/// "Cardiff Central", "cardiff-central" and "CARDIFF   CENTRAL" all become
/// `cardiff-central`. The result only contains `[a-z0-9_-]`, never starts or ends with
/// a hyphen and never holds two hyphens in a row, so `normalize` is idempotent.
pub fn normalize(name: &str) -> String {
    let key = name.to_lowercase();
    let key = WHITESPACE.replace_all(&key, "-");
    let key = NON_WORD.replace_all(&key, "");
    let key = HYPHENS.replace_all(&key, "-");
    key.trim_matches('-').to_string()
}
