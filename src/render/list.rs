//! English list grammar for list-valued answers.

use std::sync::LazyLock;

use regex::Regex;

/// Any run of commas and whole-word `and`s, wherever they sit
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\s*(?:,|\band\b))+\s*").unwrap());

/// Split free text like `"Paris, Lyon and Nice"` into items, dropping empties.
pub fn split_list(input: &str) -> Vec<String> {
    SEPARATOR_RE
        .split(input)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join items with English list grammar, Oxford comma always.
///
/// No items yields `fallback`.
pub fn format_list<S: AsRef<str>>(items: &[S], fallback: &str) -> String {
    match items {
        [] => fallback.to_string(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}
