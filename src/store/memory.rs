use std::collections::BTreeMap;

use crate::entities::{Entity, EntityKind};
use crate::error::StoreResult;

use super::Store;

/// In-memory [`Store`] backed by an ordered map.
///
/// Also counts writes, which lets callers check how many saves an operation issued.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entities: BTreeMap<(EntityKind, String), Entity>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of stored entities of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter_kind(kind).count()
    }

    /// Number of `save` calls since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Entities of one kind, ordered by id.
    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |((k, _), _)| *k == kind)
            .map(|(_, entity)| entity)
    }
}

impl Store for MemoryStore {
    fn load(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Entity>> {
        Ok(self.entities.get(&(kind, id.to_string())).cloned())
    }

    fn save(&mut self, entity: Entity) -> StoreResult<()> {
        self.writes += 1;
        self.entities
            .insert((entity.kind(), entity.id().to_string()), entity);
        Ok(())
    }
}
