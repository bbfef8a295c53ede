use crate::profile::Profile;
use crate::types::CandidateItem;
use tracing::{debug, info};

/// Substring topic filter over the lowercased title and summary.
///
/// Rejects on any `exclude` hit. Otherwise accepts when an `include` keyword
/// matches (an empty `include` set matches everything) or when a
/// `conditional` keyword matches.
pub fn accepts(item: &CandidateItem, profile: &Profile) -> bool {
    let text = format!("{} {}", item.title, item.summary).to_lowercase();

    if profile.exclude.iter().any(|word| text.contains(word.as_str())) {
        return false;
    }

    let include_hit = profile.include.is_empty()
        || profile.include.iter().any(|word| text.contains(word.as_str()));
    let conditional_hit = profile
        .conditional
        .iter()
        .any(|word| text.contains(word.as_str()));

    include_hit || conditional_hit
}

/// Filter candidates in source order and truncate to the profile's per-run
/// cap. Nothing downstream sees more than the cap.
pub fn select(items: Vec<CandidateItem>, profile: &Profile) -> Vec<CandidateItem> {
    let fetched = items.len();
    let mut accepted: Vec<CandidateItem> = items
        .into_iter()
        .filter(|item| {
            let keep = accepts(item, profile);
            if !keep {
                debug!("Filtered out: {}", item.title.trim());
            }
            keep
        })
        .collect();

    let matched = accepted.len();
    accepted.truncate(profile.max_items_per_run);

    info!(
        "Selected {} of {} candidates ({} matched, cap {})",
        accepted.len(),
        fetched,
        matched,
        profile.max_items_per_run
    );
    accepted
}
