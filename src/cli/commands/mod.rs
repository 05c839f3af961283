//! Command implementations.

pub mod comment;
pub mod create;
pub mod history;
pub mod init;
pub mod list;
pub mod project;
pub mod reorder;
pub mod show;
pub mod update;
pub mod user;
pub mod version;

use crate::config::{self, CliOverrides};
use crate::error::{Result, SpindleError};
use crate::model::Project;
use crate::store::SqliteStore;

/// Open the workspace store and resolve the acting principal.
pub(crate) fn open_workspace(cli: &CliOverrides) -> Result<(SqliteStore, String)> {
    let (store, spindle_dir) = config::open_store_with_cli(cli)?;
    let actor = config::resolve_actor(&spindle_dir, cli);
    Ok((store, actor))
}

/// Resolve a project by key, uppercased the way keys are stored.
pub(crate) fn require_project(store: &SqliteStore, key: &str) -> Result<Project> {
    let key = key.trim().to_uppercase();
    store
        .get_project_by_key(&key)?
        .ok_or(SpindleError::ProjectNotFound { project: key })
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
