//! Deterministic ordering helpers.
//!
//! Report lists must come out identical for identical snapshots. Nothing
//! here depends on hashing or evaluation timing.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::report::model::CandidateScore;

/// Removes repeated entries, keeping the first occurrence of each.
pub fn dedup_stable(items: &mut Vec<String>) {
    let mut seen = BTreeSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

/// Candidates with a positive score, best first.
///
/// Equal confidences keep registration order, matching the classifier's
/// tie-break.
pub fn rank_candidates(candidates: &[CandidateScore]) -> Vec<&CandidateScore> {
    let mut ranked: Vec<&CandidateScore> = candidates
        .iter()
        .filter(|c| !c.confidence.is_zero())
        .collect();
    // `sort_by_key` is stable.
    ranked.sort_by_key(|c| Reverse(c.confidence));
    ranked
}
