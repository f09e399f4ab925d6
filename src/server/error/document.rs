use thiserror::Error;

/// Errors raised by the embedded document store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// The owning client was released, handles derived from it no longer accept work.
    #[error("Document client has been closed")]
    ClientClosed,
    /// Only JSON objects can be stored as documents.
    #[error("Expected a JSON object as document but got {0}")]
    NotADocument(String),
    #[error("Duplicate key error in collection {collection}: _id {id} already exists")]
    DuplicateKey { collection: String, id: String },
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Unsupported query operator: {0}")]
    UnsupportedOperator(String),
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
    #[error("Performing an update on the path '_id' would modify the immutable field '_id'")]
    ImmutableId,
}
