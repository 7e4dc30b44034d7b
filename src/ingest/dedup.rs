// src/ingest/dedup.rs
//! Same-day duplicate suppression against already recorded titles.

use std::collections::HashSet;

use crate::ingest::types::{Candidate, SourceId};

/// Per-source candidate lists in registration order.
pub type PerSource = Vec<(SourceId, Vec<Candidate>)>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Candidates removed because their title was already recorded.
    pub removed: usize,
    /// Sources kept alive by retaining their first candidate.
    pub starvation_kept: usize,
}

/// Remove candidates whose title is in `history` (exact, case-sensitive).
///
/// A source whose every candidate is a known title keeps its first one.
/// Sources with no candidates are dropped from the output.
pub fn filter_against_history(
    per_source: PerSource,
    history: &HashSet<String>,
) -> (PerSource, DedupStats) {
    let mut stats = DedupStats::default();
    let mut out = Vec::with_capacity(per_source.len());

    for (source, candidates) in per_source {
        let Some(first) = candidates.first().cloned() else {
            continue;
        };
        let before = candidates.len();
        let fresh: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| !history.contains(&c.title))
            .collect();

        if fresh.is_empty() {
            stats.removed += before - 1;
            stats.starvation_kept += 1;
            tracing::debug!(source = %source, "all titles already recorded today; keeping first");
            out.push((source, vec![first]));
        } else {
            stats.removed += before - fresh.len();
            out.push((source, fresh));
        }
    }

    (out, stats)
}
