// src/ingest/merge.rs
//! Fair, capped interleaving of per-source candidate lists.
//!
//! Output = guaranteed prefix (first item of each source, in source order)
//! followed by a shuffled round-robin tail.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ingest::dedup::PerSource;
use crate::ingest::types::Candidate;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Merged {
    pub items: Vec<Candidate>,
    /// Length of the deterministic prefix in `items`.
    pub guaranteed_len: usize,
}

pub fn merge<R: Rng + ?Sized>(per_source: &PerSource, cap: usize, rng: &mut R) -> Merged {
    let mut items: Vec<Candidate> = Vec::new();
    if cap == 0 {
        return Merged::default();
    }

    // Guaranteed phase.
    for (_, list) in per_source {
        if items.len() >= cap {
            break;
        }
        if let Some(first) = list.first() {
            items.push(first.clone());
        }
    }
    let guaranteed_len = items.len();

    // Round-robin phase.
    let depth = per_source.iter().map(|(_, l)| l.len()).max().unwrap_or(0);
    'rounds: for i in 1..depth {
        for (_, list) in per_source {
            if items.len() >= cap {
                break 'rounds;
            }
            if let Some(c) = list.get(i) {
                items.push(c.clone());
            }
        }
    }

    // Shuffle phase: tail only.
    items[guaranteed_len..].shuffle(rng);

    Merged {
        items,
        guaranteed_len,
    }
}
