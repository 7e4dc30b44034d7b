// src/ingest/rotation.rs
//! Per-source cyclic category cursors.
//!
//! Each source owns one atomic cursor, so advancing different sources never
//! contends and advancing the same source is a single read-modify-write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ingest::types::SourceId;

#[derive(Debug)]
struct Cursor {
    categories: Vec<String>,
    index: AtomicUsize,
}

#[derive(Debug, Default)]
pub struct RotationState {
    cursors: HashMap<SourceId, Cursor>,
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the category list of a source, cursor at 0.
    pub fn register(&mut self, source: SourceId, categories: Vec<String>) {
        self.register_at(source, categories, 0);
    }

    /// Register with an explicit starting cursor (wrapped into range).
    pub fn register_at(&mut self, source: SourceId, categories: Vec<String>, start: usize) {
        let start = if categories.is_empty() {
            0
        } else {
            start % categories.len()
        };
        self.cursors.insert(
            source,
            Cursor {
                categories,
                index: AtomicUsize::new(start),
            },
        );
    }

    /// Category at the current cursor, then advance by one (mod len).
    /// `None` for unknown sources or sources without categories.
    pub fn next(&self, source: SourceId) -> Option<String> {
        let cur = self.cursors.get(&source)?;
        let len = cur.categories.len();
        if len == 0 {
            return None;
        }
        let prev = cur
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);
        cur.categories.get(prev).cloned()
    }

    /// Current cursor position without advancing.
    pub fn position(&self, source: SourceId) -> Option<usize> {
        self.cursors
            .get(&source)
            .map(|c| c.index.load(Ordering::Acquire))
    }
}
