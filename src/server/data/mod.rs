//! Data access layer.
//!
//! Repositories wrap a [`DocumentDatabase`](crate::server::db::DocumentDatabase) handle and
//! expose typed operations on one collection each.

pub mod user;
