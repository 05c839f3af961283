//! `spindle_rust` — project-scoped issue tracker backend on `SQLite`.
//!
//! The crate is organized around the store:
//! - `model` - Projects, issues, history entries, principals
//! - `store` - `SQLite` persistence, sequence allocation, ordering
//! - `audit` - Pure field-level diff between issue snapshots
//! - `notify` - Assignment notification decision + notifier capability
//! - `access` - Project membership gate
//! - `cli` - The `spd` command-line surface

pub mod access;
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod store;
pub mod validation;

pub use error::{Result, SpindleError, StructuredError};
