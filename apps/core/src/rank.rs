use std::cmp::Ordering;

use crate::model::{Locale, SearchResult};

pub const DEFAULT_RESULT_CAP: usize = 20;

/// Drops non-matches, orders the rest and keeps at most `cap`.
///
/// Order: score descending, popular entries first, then normalized title,
/// raw title and id ascending. The comparison is total, so ranking the same
/// input twice yields the same sequence.
pub fn rank(mut scored: Vec<SearchResult>, cap: usize, locale: Locale) -> Vec<SearchResult> {
    if cap == 0 {
        return Vec::new();
    }

    scored.retain(|result| result.score > 0);
    scored.sort_by(|a, b| compare(a, b, locale));
    scored.truncate(cap);
    scored
}

fn compare(a: &SearchResult, b: &SearchResult, locale: Locale) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.entry.popular.cmp(&a.entry.popular))
        .then_with(|| a.title_key().cmp(b.title_key()))
        .then_with(|| {
            a.entry
                .title
                .get_or_fallback(locale)
                .cmp(b.entry.title.get_or_fallback(locale))
        })
        .then_with(|| a.id().cmp(b.id()))
}
