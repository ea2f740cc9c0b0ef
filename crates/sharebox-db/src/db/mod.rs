//! Repositories for the data access layer.
//!
//! `files` holds the `FileStore` contract and its PostgreSQL implementation;
//! `memory` holds the in-process implementation backing tests and local runs.

pub mod files;
pub mod memory;
