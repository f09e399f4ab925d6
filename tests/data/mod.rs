//! Tests for the data layer running against fixture databases.

mod user;
