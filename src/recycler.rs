//! Recyclers and their qualities.
//!
//! A quality is authored once: an ordered list of expression trees
//! (`operations`, kept as raw JSON the way it arrives) plus the quorum
//! `min_count`. The engine reads it, never mutates it.

use std::collections::{HashMap, HashSet};

use serde_json::Value as Json;

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::store::{MaterialId, MaterialStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecyclerId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualityId(pub(crate) u32);

#[derive(Debug, Clone)]
pub struct Recycler {
    pub id: RecyclerId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct RecyclerQuality {
    pub id: QualityId,
    pub title: String,
    pub recycler: RecyclerId,
    pub material: MaterialId,
    /// Minimum number of expressions that must hold; -1 means all of them.
    pub min_count: i64,
    /// Ordered list of stored expression trees.
    pub operations: Json,
}

impl RecyclerQuality {
    /// Pass/fail verdict for this quality against its material.
    pub fn judge(&self, catalog: &Catalog, store: &MaterialStore) -> Result<bool, StoreError> {
        let view = store.snapshot(catalog, self.material);
        Ok(quality_core::judge(&self.operations, self.min_count, &view)?)
    }

    /// Per-expression booleans, stored order.
    pub fn results(
        &self,
        catalog: &Catalog,
        store: &MaterialStore,
    ) -> Result<Vec<bool>, StoreError> {
        let view = store.snapshot(catalog, self.material);
        Ok(quality_core::evaluate_all(&self.operations, &view)?)
    }

    /// Readable renderings of each expression, stored order.
    pub fn conditions(
        &self,
        catalog: &Catalog,
        store: &MaterialStore,
    ) -> Result<Vec<String>, StoreError> {
        let view = store.snapshot(catalog, self.material);
        Ok(quality_core::render_readable(&self.operations, &view)?)
    }
}

#[derive(Debug, Default)]
pub struct RecyclerRegistry {
    recyclers: Vec<Recycler>,
    qualities: Vec<RecyclerQuality>,
    names: HashMap<String, RecyclerId>,
    quality_keys: HashSet<(RecyclerId, String)>,
}

impl RecyclerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_recycler(&mut self, name: &str) -> Result<RecyclerId, StoreError> {
        if self.names.contains_key(name) {
            return Err(StoreError::DuplicateRecycler(name.to_string()));
        }
        let id = RecyclerId(self.recyclers.len() as u32);
        self.names.insert(name.to_string(), id);
        self.recyclers.push(Recycler {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Register a quality. `(title, recycler)` must be unique.
    pub fn add_quality(
        &mut self,
        recycler: RecyclerId,
        material: MaterialId,
        title: &str,
        min_count: i64,
        operations: Json,
    ) -> Result<QualityId, StoreError> {
        let recycler_name = self.recycler(recycler)?.name.clone();
        let key = (recycler, title.to_string());
        if self.quality_keys.contains(&key) {
            return Err(StoreError::DuplicateQuality {
                title: title.to_string(),
                recycler: recycler_name,
            });
        }
        self.quality_keys.insert(key);
        let id = QualityId(self.qualities.len() as u32);
        self.qualities.push(RecyclerQuality {
            id,
            title: title.to_string(),
            recycler,
            material,
            min_count,
            operations,
        });
        Ok(id)
    }

    pub fn recycler(&self, id: RecyclerId) -> Result<&Recycler, StoreError> {
        self.recyclers
            .get(id.0 as usize)
            .ok_or_else(|| StoreError::NotFound(format!("recycler id {}", id.0)))
    }

    pub fn quality(&self, id: QualityId) -> Result<&RecyclerQuality, StoreError> {
        self.qualities
            .get(id.0 as usize)
            .ok_or_else(|| StoreError::NotFound(format!("quality id {}", id.0)))
    }

    pub fn recyclers(&self) -> &[Recycler] {
        &self.recyclers
    }

    pub fn qualities_of(&self, recycler: RecyclerId) -> impl Iterator<Item = &RecyclerQuality> {
        self.qualities.iter().filter(move |q| q.recycler == recycler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recycler_names_are_unique() {
        let mut registry = RecyclerRegistry::new();
        registry.add_recycler("Recycler 1").unwrap();
        assert_eq!(
            registry.add_recycler("Recycler 1").unwrap_err(),
            StoreError::DuplicateRecycler("Recycler 1".into())
        );
    }

    #[test]
    fn quality_titles_are_unique_per_recycler() {
        let mut registry = RecyclerRegistry::new();
        let first = registry.add_recycler("Recycler 1").unwrap();
        let second = registry.add_recycler("Recycler 2").unwrap();
        let material = MaterialId(0);
        let operations = json!([{"operator": "eq", "operands": [1, 1]}]);
        registry
            .add_quality(first, material, "Quality Best", 1, operations.clone())
            .unwrap();
        let err = registry
            .add_quality(first, material, "Quality Best", 1, operations.clone())
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateQuality { .. }));
        // Same title under another recycler is fine.
        registry
            .add_quality(second, material, "Quality Best", 1, operations)
            .unwrap();
    }
}
