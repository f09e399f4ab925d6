//! Server application core modules.
//!
//! This module contains the server-side data layer of the stc application: settings, the
//! embedded document store, repositories built on top of it, and startup helpers wiring them
//! together.

pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod model;
pub mod startup;
pub mod util;
