//! Feature store — the merge target for pulled trigger batches

use waymark_core::records::{FeatureCollection, GeoNodeRecord};

/// Accumulated feature collection for the current map position
///
/// An empty store adopts the first pulled collection wholesale. Later
/// merges keep the stored metadata (type and crs) and concatenate the
/// pulled features onto the stored list. Duplicate features from
/// overlapping pulls are kept as-is; the renderer keys annotations by id.
#[derive(Debug, Default)]
pub struct FeatureStore {
    collection: Option<FeatureCollection>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a pulled collection into the store
    pub fn merge(&mut self, pulled: FeatureCollection) {
        match &mut self.collection {
            Some(stored) => stored.features.extend(pulled.features),
            None => self.collection = Some(pulled),
        }
    }

    /// Drop everything (map position changed)
    pub fn clear(&mut self) {
        self.collection = None;
    }

    pub fn is_empty(&self) -> bool {
        self.collection
            .as_ref()
            .map_or(true, |c| c.features.is_empty())
    }

    pub fn features(&self) -> &[GeoNodeRecord] {
        self.collection
            .as_ref()
            .map_or(&[], |c| c.features.as_slice())
    }

    pub fn collection(&self) -> Option<&FeatureCollection> {
        self.collection.as_ref()
    }
}
