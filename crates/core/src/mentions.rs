//! `@username` mention extraction and comment snippets.

use std::sync::LazyLock;

use regex::Regex;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("valid regex"));

/// Maximum characters of comment text carried in a push body.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// Extract mentioned usernames from comment text, in order of first
/// appearance and without duplicates. The leading `@` is stripped.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for capture in MENTION_RE.captures_iter(text) {
        let name = &capture[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Truncate comment text to [`SNIPPET_MAX_CHARS`] characters for use as a
/// push notification body. Cuts on character boundaries, so multi-byte
/// text is safe.
pub fn snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        text.to_string()
    } else {
        text.chars().take(SNIPPET_MAX_CHARS).collect()
    }
}
