use crate::types::CandidateItem;
use regex::Regex;
use std::sync::LazyLock;

const INTRO: &str = "Today’s deep dive. Here’s the short version first—then why it matters.";
const WHY: &str =
    "In plain language, this paper explores ideas that could affect how AI shows up in the real world.";
const OUTRO: &str = "Links are in the show notes. Thanks for listening.";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Assemble the narration text for one item. Deterministic; no
/// summarization beyond taking the first sentence of the summary.
pub fn compose(item: &CandidateItem) -> String {
    let title = item.title.trim();
    let first = first_sentence(&item.summary);
    format!("{INTRO} Title: {title}. {first} {WHY} {OUTRO}")
}

/// First sentence of `text` after collapsing whitespace runs. A sentence ends
/// at `.`, `!` or `?` followed by whitespace.
pub fn first_sentence(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    if collapsed.is_empty() {
        return String::new();
    }

    let mut chars = collapsed.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, ' ')) = chars.peek() {
                return collapsed[..idx + c.len_utf8()].to_string();
            }
        }
    }
    collapsed.into_owned()
}
