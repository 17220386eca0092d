//! In-memory registry of the current disruptions.
//!
//! The registry is rebuilt wholesale on every feed refresh: a source's pass
//! clears and then repopulates. That rebuild is not atomic with respect to
//! readers, so a reader interleaved with a refresh may see zero, one, or
//! both sources. [`DisruptionRegistry::generation`] is bumped on every
//! mutation; comparing it before and after a read detects a concurrent
//! rebuild.

use crate::identifiers::DisruptionIdentifier;
use crate::models::{Disruption, DisruptionError, FeedSource, Result};

#[derive(Clone, Debug, Default)]
pub struct DisruptionRegistry {
    disruptions: Vec<Disruption>,
    generation: u64,
}

impl DisruptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every disruption, from all sources.
    pub fn clear(&mut self) {
        self.disruptions.clear();
        self.generation += 1;
    }

    /// Remove only the disruptions contributed by `source`. Returns how many
    /// were removed.
    pub fn clear_source(&mut self, source: FeedSource) -> usize {
        let before = self.disruptions.len();
        self.disruptions.retain(|d| d.source != source);
        self.generation += 1;
        before - self.disruptions.len()
    }

    /// Append a disruption. Duplicates (even across sources) are kept.
    pub fn add(&mut self, disruption: Disruption) {
        self.disruptions.push(disruption);
        self.generation += 1;
    }

    pub fn extend(&mut self, disruptions: impl IntoIterator<Item = Disruption>) {
        self.disruptions.extend(disruptions);
        self.generation += 1;
    }

    /// Read-only view of the current disruptions, in insertion order.
    pub fn snapshot(&self) -> &[Disruption] {
        &self.disruptions
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.disruptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disruptions.is_empty()
    }

    pub fn by_source(&self, source: FeedSource) -> impl Iterator<Item = &Disruption> {
        self.disruptions.iter().filter(move |d| d.source == source)
    }

    /// First disruption with `id`.
    pub fn get(&self, id: &DisruptionIdentifier) -> Result<&Disruption> {
        self.disruptions
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| DisruptionError::DisruptionNotFound(id.clone()))
    }
}
