//! Utility functions and helpers for server operations.
