//! Eisen - an Eisenhower matrix task ledger
//!
//! This library provides the core functionality for Eisen, including:
//! - A self-migrating SQLite task table
//! - The task store and its statistics aggregation
//! - JSON and CSV import/export of the whole collection
//! - The persisted settings document
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use eisen::store::TaskStore;
//!
//! let store = TaskStore::open_default().unwrap();
//! store.add("a1", "Important & Urgent", "File taxes", false);
//! for item in store.get_by_quadrant("Important & Urgent") {
//!     println!("{} {}", item.id, item.description);
//! }
//! ```

pub mod db;
pub mod models;
pub mod repo;
pub mod store;
pub mod exchange;
pub mod settings;
pub mod cli;
pub mod utils;
