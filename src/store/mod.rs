//! Entity store abstraction.
//!
//! The indexing core only talks to [`Store`]: `load(kind, id)` and `save(entity)`. Saving is
//! an upsert keyed by `(kind, id)`. Because every id is derived deterministically, re-saving
//! an entity during a replay rewrites the same record instead of adding a new one.
//!
//! `save` takes `&mut self`: callers must serialize invocations, and the borrow checker
//! enforces it. Implementations do not lock.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::entities::{Entity, EntityKind, Record};
use crate::error::{StoreError, StoreResult};

/// Key/value persistence for indexed entities.
pub trait Store {
    /// Load an entity by kind and id, `None` if absent.
    fn load(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Entity>>;

    /// Insert or replace the entity stored under its kind and id.
    fn save(&mut self, entity: Entity) -> StoreResult<()>;
}

/// Typed helpers on top of [`Store`].
pub trait StoreExt: Store {
    /// Load an entity as its concrete type.
    fn get<R: Record>(&self, id: &str) -> StoreResult<Option<R>> {
        match self.load(R::KIND, id)? {
            None => Ok(None),
            Some(entity) => R::from_entity(entity)
                .map(Some)
                .map_err(|other| StoreError::KindMismatch {
                    expected: R::KIND,
                    found: other.kind(),
                    id: id.to_string(),
                }),
        }
    }

    /// Save a concrete entity.
    fn put<R: Record>(&mut self, record: R) -> StoreResult<()> {
        self.save(record.into())
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
