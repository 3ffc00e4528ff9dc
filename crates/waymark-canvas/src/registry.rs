//! Drop registry
//!
//! Holds the classified drop set for one (host, centered entity) pair.
//! Every load is tagged with a generation; a position transition bumps the
//! generation and clears the set BEFORE the new load starts, so a slow
//! in-flight request that resolves after a newer transition is discarded on
//! arrival rather than applied.

use waymark_core::drop::{sort_by_layout_priority, Dropped};
use waymark_core::records::DropRecord;

/// Monotonic tag tying a load to the registry state it was issued against.
pub type Generation = u64;

/// Result of classifying a batch of raw records
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Records that classified into a drop variant.
    pub accepted: Vec<Dropped>,
    /// Count of records matching no variant, dropped without error.
    pub rejected: usize,
}

/// Classify raw records in Abstraction → Portal → Entity precedence
pub fn classify_records(records: &[DropRecord]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for record in records {
        match Dropped::classify(record) {
            Some(drop) => outcome.accepted.push(drop),
            None => outcome.rejected += 1,
        }
    }
    outcome
}

/// The drop set for the currently centered entity
#[derive(Debug, Default)]
pub struct DropRegistry {
    drops: Vec<Dropped>,
    generation: Generation,
}

impl DropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new load: clears the set and returns the generation the
    /// load must present to apply its result.
    pub fn begin_load(&mut self) -> Generation {
        self.generation += 1;
        self.drops.clear();
        self.generation
    }

    /// Clear the set and invalidate any outstanding load.
    pub fn clear(&mut self) {
        self.begin_load();
    }

    /// Apply a completed load if its generation still matches.
    ///
    /// Returns false (and changes nothing) when a newer transition has
    /// superseded the load.
    pub fn complete(&mut self, generation: Generation, drops: Vec<Dropped>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.drops = drops;
        true
    }

    /// Atomic swap of the whole drop set.
    pub fn replace(&mut self, drops: Vec<Dropped>) {
        self.drops = drops;
    }

    pub fn drops(&self) -> &[Dropped] {
        &self.drops
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Furthest-first ordering for rendering.
    pub fn paint_order(&self) -> Vec<Dropped> {
        let mut drops = self.drops.clone();
        sort_by_layout_priority(&mut drops, true);
        drops
    }

    /// Nearest-first ordering for hit testing.
    pub fn hit_order(&self) -> Vec<Dropped> {
        let mut drops = self.drops.clone();
        sort_by_layout_priority(&mut drops, false);
        drops
    }
}
