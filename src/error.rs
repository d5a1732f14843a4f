use crate::entities::EntityKind;

/// Failure of the backing store.
///
/// A missing entity is not an error (`load` returns `None`). Anything else is fatal for the
/// event being processed and is propagated to the caller, which owns the retry policy.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to encode or decode {kind} {id}: {source}")]
    Codec {
        kind: EntityKind,
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown entity kind {0}")]
    UnknownKind(String),
    #[error("Expected {expected} for id {id}, store returned {found}")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
        id: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
