//! Embedded document store.
//!
//! A small document database emulation persisted through SeaORM. A [`DocumentClient`] owns
//! the connection pool, hands out named [`DocumentDatabase`] handles, and each database hands
//! out [`Collection`] handles which store JSON object documents keyed by `_id`.
//!
//! Every row lives in the single `document` table (see the `entity` crate), scoped by
//! database and collection name. Filters and updates are evaluated in memory against the
//! decoded documents of one collection.

pub mod client;
pub mod collection;
pub mod database;
pub mod filter;
pub mod object_id;
pub mod result;
pub mod update;

pub use client::DocumentClient;
pub use collection::Collection;
pub use database::DocumentDatabase;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Name of the identity field every stored document carries.
pub static ID_FIELD: &str = "_id";
