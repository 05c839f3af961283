//! Configuration management for `spindle_rust`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`SPINDLE_ACTOR`, `SPINDLE_DB`)
//! 3. Workspace config (.spindle/config.yaml)
//! 4. Defaults

use crate::error::{Result, SpindleError};
use crate::store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace directory name.
const SPINDLE_DIR: &str = ".spindle";
/// Default database filename used when metadata is missing.
const DEFAULT_DB_FILENAME: &str = "spindle.db";

/// Startup metadata describing the database path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub database: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            database: DEFAULT_DB_FILENAME.to_string(),
        }
    }
}

impl Metadata {
    /// Load metadata.json from the spindle directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(spindle_dir: &Path) -> Result<Self> {
        let path = spindle_dir.join("metadata.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let mut metadata: Self = serde_json::from_str(&contents)?;

        if metadata.database.trim().is_empty() {
            metadata.database = DEFAULT_DB_FILENAME.to_string();
        }

        Ok(metadata)
    }

    /// Write metadata.json into the spindle directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, spindle_dir: &Path) -> Result<()> {
        let path = spindle_dir.join("metadata.json");
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Optional workspace config (.spindle/config.yaml).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

impl FileConfig {
    /// Load config.yaml from the spindle directory, defaulting when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(spindle_dir: &Path) -> Result<Self> {
        let path = spindle_dir.join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// CLI-level overrides, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub actor: Option<String>,
    pub json: Option<bool>,
    pub lock_timeout: Option<u64>,
}

/// Walk up from `start` looking for a `.spindle/` workspace directory.
///
/// # Errors
///
/// Returns `NotInitialized` if no workspace is found.
pub fn discover_spindle_dir(start: Option<&Path>) -> Result<PathBuf> {
    let start = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    let mut dir = start.as_path();
    loop {
        let candidate = dir.join(SPINDLE_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return Err(SpindleError::NotInitialized),
        }
    }
}

/// Create a `.spindle/` workspace at `root`.
///
/// # Errors
///
/// Returns `AlreadyInitialized` unless `force` is set.
pub fn init_workspace(root: &Path, force: bool) -> Result<PathBuf> {
    let spindle_dir = root.join(SPINDLE_DIR);
    if spindle_dir.exists() && !force {
        return Err(SpindleError::AlreadyInitialized { path: spindle_dir });
    }
    fs::create_dir_all(&spindle_dir)?;
    Metadata::default().save(&spindle_dir)?;
    Ok(spindle_dir)
}

/// Resolve the database path from overrides, env, and workspace metadata.
///
/// # Errors
///
/// Returns an error if metadata cannot be read.
pub fn resolve_db_path(spindle_dir: &Path, cli: &CliOverrides) -> Result<PathBuf> {
    if let Some(path) = &cli.db {
        return Ok(path.clone());
    }
    if let Ok(path) = env::var("SPINDLE_DB") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let config = FileConfig::load(spindle_dir)?;
    if let Some(database) = config.database.filter(|value| !value.trim().is_empty()) {
        return Ok(spindle_dir.join(database));
    }

    let metadata = Metadata::load(spindle_dir)?;
    Ok(spindle_dir.join(metadata.database))
}

/// Resolve the acting principal's username.
///
/// Precedence: CLI `--actor` > `SPINDLE_ACTOR` > config.yaml > `$USER` >
/// `"unknown"`.
#[must_use]
pub fn resolve_actor(spindle_dir: &Path, cli: &CliOverrides) -> String {
    cli.actor
        .clone()
        .or_else(|| env::var("SPINDLE_ACTOR").ok())
        .or_else(|| {
            FileConfig::load(spindle_dir)
                .ok()
                .and_then(|config| config.actor)
        })
        .or_else(|| env::var("USER").ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Discover the workspace and open its store with CLI overrides applied.
///
/// # Errors
///
/// Returns `NotInitialized` if there is no workspace, or any store open
/// error.
pub fn open_store_with_cli(cli: &CliOverrides) -> Result<(SqliteStore, PathBuf)> {
    let spindle_dir = discover_spindle_dir(None)?;
    let db_path = resolve_db_path(&spindle_dir, cli)?;
    let store = SqliteStore::open_with_timeout(&db_path, cli.lock_timeout)?;
    Ok((store, spindle_dir))
}
