//! Entities maintained by the forwarder indexer.
//!
//! Two families live in the store:
//! - reference entities ([`Account`], [`ForwarderContract`], [`Transaction`]) are created on
//!   first sighting and only ever gain back-references afterwards;
//! - event facts ([`ForwarderCreated`], [`MetaTransactionExecuted`]) are written once per log
//!   and never updated.
//!
//! Field names serialize in camelCase (`asForwarder`, `forwarderAddress`, ...) so stored
//! documents match the schema consumed by query layers.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ids::{address_id, hex_address};

/// Kind tag under which an entity is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Account,
    ForwarderContract,
    Transaction,
    ForwarderCreated,
    MetaTransactionExecuted,
}

impl EntityKind {
    pub const ALL: [Self; 5] = [
        Self::Account,
        Self::ForwarderContract,
        Self::Transaction,
        Self::ForwarderCreated,
        Self::MetaTransactionExecuted,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::ForwarderContract => "ForwarderContract",
            Self::Transaction => "Transaction",
            Self::ForwarderCreated => "ForwarderCreated",
            Self::MetaTransactionExecuted => "MetaTransactionExecuted",
        }
    }

    /// Whether entities of this kind are immutable event facts.
    pub const fn is_fact(&self) -> bool {
        matches!(self, Self::ForwarderCreated | Self::MetaTransactionExecuted)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| StoreError::UnknownKind(s.to_string()))
    }
}

/// Any address seen by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// Set once the same address is seen as a forwarder contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_forwarder: Option<String>,
}

impl Account {
    pub fn new(address: &Address) -> Self {
        Self {
            id: address_id(address),
            as_forwarder: None,
        }
    }
}

/// A deployed forwarder instance, sharing its id with the matching [`Account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwarderContract {
    pub id: String,
    pub as_account: String,
}

impl ForwarderContract {
    pub fn for_account(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            as_account: account.id.clone(),
        }
    }
}

/// Transaction referenced by one or more event facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub timestamp: u64,
    pub block_number: u64,
}

/// A forwarder announced the deployment of another forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwarderCreated {
    pub id: String,
    #[serde(with = "hex_address")]
    pub emitter: Address,
    pub transaction: String,
    pub timestamp: u64,
    pub contract: String,
    #[serde(with = "hex_address")]
    pub forwarder_address: Address,
}

/// A forwarder relayed a meta-transaction from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransactionExecuted {
    pub id: String,
    #[serde(with = "hex_address")]
    pub emitter: Address,
    pub transaction: String,
    pub timestamp: u64,
    pub contract: String,
    #[serde(with = "hex_address")]
    pub from: Address,
    #[serde(with = "hex_address")]
    pub to: Address,
}

/// Tagged union over every storable entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Account(Account),
    ForwarderContract(ForwarderContract),
    Transaction(Transaction),
    ForwarderCreated(ForwarderCreated),
    MetaTransactionExecuted(MetaTransactionExecuted),
}

impl Entity {
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Account(_) => EntityKind::Account,
            Self::ForwarderContract(_) => EntityKind::ForwarderContract,
            Self::Transaction(_) => EntityKind::Transaction,
            Self::ForwarderCreated(_) => EntityKind::ForwarderCreated,
            Self::MetaTransactionExecuted(_) => EntityKind::MetaTransactionExecuted,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Account(e) => &e.id,
            Self::ForwarderContract(e) => &e.id,
            Self::Transaction(e) => &e.id,
            Self::ForwarderCreated(e) => &e.id,
            Self::MetaTransactionExecuted(e) => &e.id,
        }
    }

    /// Serialize the entity body (without its kind tag).
    pub fn to_json(&self) -> Result<String, StoreError> {
        let encoded = match self {
            Self::Account(e) => serde_json::to_string(e),
            Self::ForwarderContract(e) => serde_json::to_string(e),
            Self::Transaction(e) => serde_json::to_string(e),
            Self::ForwarderCreated(e) => serde_json::to_string(e),
            Self::MetaTransactionExecuted(e) => serde_json::to_string(e),
        };
        encoded.map_err(|source| StoreError::Codec {
            kind: self.kind(),
            id: self.id().to_string(),
            source,
        })
    }

    /// Deserialize an entity body previously produced by [`Entity::to_json`].
    pub fn from_json(kind: EntityKind, id: &str, body: &str) -> Result<Self, StoreError> {
        let decoded = match kind {
            EntityKind::Account => serde_json::from_str(body).map(Self::Account),
            EntityKind::ForwarderContract => {
                serde_json::from_str(body).map(Self::ForwarderContract)
            }
            EntityKind::Transaction => serde_json::from_str(body).map(Self::Transaction),
            EntityKind::ForwarderCreated => serde_json::from_str(body).map(Self::ForwarderCreated),
            EntityKind::MetaTransactionExecuted => {
                serde_json::from_str(body).map(Self::MetaTransactionExecuted)
            }
        };
        decoded.map_err(|source| StoreError::Codec {
            kind,
            id: id.to_string(),
            source,
        })
    }
}

/// Binds a concrete entity type to its [`EntityKind`] for typed store access.
pub trait Record: Into<Entity> + Sized {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Unwraps the matching variant, handing the entity back otherwise.
    fn from_entity(entity: Entity) -> Result<Self, Entity>;
}

/// Implements [`Record`] and `From<T> for Entity` for an entity struct.
macro_rules! impl_record {
    ($t:ident) => {
        impl Record for $t {
            const KIND: EntityKind = EntityKind::$t;

            fn id(&self) -> &str {
                &self.id
            }

            fn from_entity(entity: Entity) -> Result<Self, Entity> {
                match entity {
                    Entity::$t(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }

        impl From<$t> for Entity {
            fn from(value: $t) -> Self {
                Entity::$t(value)
            }
        }
    };
}

impl_record!(Account);
impl_record!(ForwarderContract);
impl_record!(Transaction);
impl_record!(ForwarderCreated);
impl_record!(MetaTransactionExecuted);
