//! Submission filter and sort pipeline
//!
//! Computes the visible, ordered subset of submissions for a given query,
//! active filter and sort order. An active filter narrows by exact field
//! equality first; free-text matching is a case-insensitive substring test.
//! Sorting is stable, so ties keep their input order.

use super::{ActiveFilter, FilterKind, SortOrder};
use crate::db::submissions::Submission;

/// Full pipeline: filter, then sort
pub fn visible_submissions(
    all: &[Submission],
    query: &str,
    active_filter: Option<&ActiveFilter>,
    sort: SortOrder,
) -> Vec<Submission> {
    let mut visible = filter_submissions(all, query, active_filter);
    sort_submissions(&mut visible, sort);
    visible
}

/// Filter stage
///
/// With an active filter: restrict to submissions whose targeted field
/// equals the filter value exactly, then apply any secondary query to the
/// story text and author only. Without one: an empty query passes everything
/// through unchanged, otherwise the query must appear in at least one of the
/// five text fields.
pub fn filter_submissions(
    all: &[Submission],
    query: &str,
    active_filter: Option<&ActiveFilter>,
) -> Vec<Submission> {
    let query = query.trim().to_lowercase();

    match active_filter {
        Some(filter) => all
            .iter()
            .filter(|submission| filter_field(submission, filter.kind) == filter.value)
            .filter(|submission| {
                query.is_empty()
                    || contains_query(&submission.user_text, &query)
                    || contains_query(&submission.submitted_by, &query)
            })
            .cloned()
            .collect(),
        None if query.is_empty() => all.to_vec(),
        None => all
            .iter()
            .filter(|submission| matches_query(submission, &query))
            .cloned()
            .collect(),
    }
}

/// Sort stage (stable)
pub fn sort_submissions(submissions: &mut [Submission], sort: SortOrder) {
    match sort {
        SortOrder::MostRecent => submissions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::MostOld => submissions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortOrder::MostLiked => submissions.sort_by(|a, b| b.likes.cmp(&a.likes)),
    }
}

/// The field an exact-match filter compares against
fn filter_field(submission: &Submission, kind: FilterKind) -> &str {
    match kind {
        FilterKind::Song => &submission.song_name,
        FilterKind::Artist => &submission.artist_name,
        FilterKind::Album => &submission.album_name,
    }
}

/// Case-insensitive substring test; `query` must already be lowercased
fn contains_query(field: &str, query: &str) -> bool {
    field.to_lowercase().contains(query)
}

/// Free-text match across all five text fields; `query` must already be
/// lowercased
fn matches_query(submission: &Submission, query: &str) -> bool {
    contains_query(&submission.song_name, query)
        || contains_query(&submission.artist_name, query)
        || contains_query(&submission.album_name, query)
        || contains_query(&submission.user_text, query)
        || contains_query(&submission.submitted_by, query)
}
