//! Duplicate session name resolution.
//!
//! A name ending in `-<number>` gets its number bumped; anything else
//! gets `-1` appended.

use regex::Regex;
use std::sync::OnceLock;

/// Name of the session that always exists and is pinned first.
pub const DEFAULT_SESSION: &str = "Default";

fn numbered_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?s)(.*)-(\d+)$").unwrap())
}

/// Produce the next candidate for a name that collides with an existing entry.
pub fn disambiguate(name: &str) -> String {
    if let Some(caps) = numbered_suffix().captures(name) {
        let stem = &caps[1];
        // Digits that overflow u64 are treated as plain text
        if let Ok(n) = caps[2].parse::<u64>() {
            if let Some(next) = n.checked_add(1) {
                return format!("{}-{}", stem, next);
            }
        }
    }
    format!("{}-1", name)
}

/// Whether `name` is the pinned default session
pub fn is_default(name: &str) -> bool {
    name == DEFAULT_SESSION
}
