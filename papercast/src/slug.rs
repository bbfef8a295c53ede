use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

pub const MAX_SLUG_TITLE_LEN: usize = 80;

/// Filesystem-safe form of a title: lowercase ASCII alphanumerics separated
/// by single hyphens, at most `max_len` characters. Falls back to
/// `ep-<unix seconds>` when nothing survives.
pub fn clean_title(title: &str, max_len: usize, now: DateTime<Utc>) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        }
    }

    // ASCII only, so byte truncation is safe
    out.truncate(max_len);
    let trimmed = out.trim_matches('-');

    if trimmed.is_empty() {
        format!("ep-{}", now.timestamp())
    } else {
        trimmed.to_string()
    }
}

/// `<run date>-<clean title>`.
pub fn episode_slug(run_date: NaiveDate, title: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        run_date.format("%Y-%m-%d"),
        clean_title(title, MAX_SLUG_TITLE_LEN, now)
    )
}

/// `slug` unchanged unless this run already used it; otherwise suffixed
/// with the item's 1-based position until it is free.
pub fn unique_in_run(slug: String, taken: &HashSet<String>, index: usize) -> String {
    let mut candidate = slug;
    while taken.contains(&candidate) {
        candidate = format!("{}-{}", candidate, index);
    }
    candidate
}

/// Wall-clock seconds plus the 1-based position within the run. Unique
/// within one run only; the run id carries cross-run uniqueness.
pub fn build_id(now: DateTime<Utc>, index: usize) -> String {
    format!("{}-{}", now.timestamp(), index)
}
