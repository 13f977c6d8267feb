//! Retreat catalog loaded from the CMS export
//!
//! The CMS owns content authoring and storage; this service consumes its
//! exported JSON catalog, loaded once at startup and immutable after.

use crate::domain::types::{Retreat, RoomTier};
use anyhow::Context;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub struct RetreatCatalog {
    by_slug: FxHashMap<String, Retreat>,
}

impl RetreatCatalog {
    /// Load the catalog from a CMS-exported JSON file (an array of retreats).
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;

        let retreats: Vec<Retreat> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;

        let catalog = Self::from_retreats(retreats);
        info!(path = %path.display(), retreats = catalog.len(), "catalog_loaded");
        Ok(catalog)
    }

    pub fn from_retreats(retreats: Vec<Retreat>) -> Self {
        let mut by_slug = FxHashMap::default();
        for retreat in retreats {
            by_slug.insert(retreat.slug.clone(), retreat);
        }
        Self { by_slug }
    }

    /// Look up a retreat by slug. Unknown slugs are `None`, not an error.
    pub fn retreat(&self, slug: &str) -> Option<&Retreat> {
        self.by_slug.get(slug)
    }

    /// Available room tiers for a retreat; empty for unknown slugs.
    pub fn available_tiers<'a>(&'a self, slug: &str) -> impl Iterator<Item = &'a RoomTier> + 'a {
        self.by_slug.get(slug).into_iter().flat_map(|r| r.available_tiers())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Retreat> {
        self.by_slug.values()
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}
