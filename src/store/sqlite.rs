//! SQLite-backed entity store.
//!
//! Entities are kept in a single key/value table: `(kind, id)` is the primary key and the
//! body is the entity's JSON document. Saves are upserts, so replaying a log rewrites the
//! same row with the same bytes.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::entities::{Entity, EntityKind};
use crate::error::StoreResult;

use super::Store;

/// [`Store`] persisting entities into a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create or open the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        // WAL mode, busy_timeout: 5s wait for locks held by query layers
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )?;

        tracing::info!(
            target: "torii_forwarder::store",
            path = %path.display(),
            "SQLite store opened"
        );

        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entities (
                kind TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (kind, id)
            )",
            [],
        )?;

        Ok(Self { conn })
    }

    /// Number of stored entities of one kind.
    pub fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entities WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of stored entities per kind, skipping kinds with no rows.
    ///
    /// Fails with [`StoreError::UnknownKind`](crate::error::StoreError::UnknownKind) if a row
    /// carries a kind this build does not know.
    pub fn kind_counts(&self) -> StoreResult<BTreeMap<EntityKind, usize>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, COUNT(*) FROM entities GROUP BY kind")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (kind, count) = row?;
            counts.insert(kind.parse::<EntityKind>()?, count as usize);
        }
        Ok(counts)
    }

    /// Stored JSON document for an entity, exactly as written.
    pub fn raw_body(&self, kind: EntityKind, id: &str) -> StoreResult<Option<String>> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM entities WHERE kind = ?1 AND id = ?2",
                params![kind.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }
}

impl Store for SqliteStore {
    fn load(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Entity>> {
        match self.raw_body(kind, id)? {
            Some(body) => Entity::from_json(kind, id, &body).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, entity: Entity) -> StoreResult<()> {
        let body = entity.to_json()?;
        self.conn.execute(
            "INSERT INTO entities (kind, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT(kind, id) DO UPDATE SET body = excluded.body",
            params![entity.kind().as_str(), entity.id(), body],
        )?;

        tracing::trace!(
            target: "torii_forwarder::store",
            kind = %entity.kind(),
            id = entity.id(),
            "Saved entity"
        );
        Ok(())
    }
}
