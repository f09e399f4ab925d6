//! Database model type aliases.
//!
//! This module provides convenient type aliases for SeaORM database entity models used
//! throughout the application, so signatures don't need to reach into the generated
//! `entity` crate directly.

/// Type alias for a stored document row.
///
/// One row holds one JSON document of a collection.
///
/// # Fields (from `entity::document::Model`)
/// - `id` - Primary key, also the insertion order of documents
/// - `database` - Logical database name the document belongs to
/// - `collection` - Collection name within the database
/// - `document_id` - Serialized `_id` of the document, unique per collection
/// - `body` - Serialized JSON document including its `_id`
/// - `created_at` - Timestamp when the document was inserted
/// - `updated_at` - Timestamp of the last update to the document
pub type DocumentModel = entity::document::Model;
