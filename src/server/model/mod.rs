//! Server application models and type definitions.
//!
//! This module contains database model type aliases shared by the document store and the
//! data layer.

pub mod db;
