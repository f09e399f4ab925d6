//! Outcomes of document store write operations.

use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct InsertOneResult {
    pub inserted_id: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InsertManyResult {
    pub inserted_ids: Vec<Value>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}
