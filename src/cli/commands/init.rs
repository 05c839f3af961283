use crate::config;
use crate::error::Result;
use crate::store::SqliteStore;
use std::fs;
use std::path::Path;

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` unless `force` is set, or an error if the
/// directory or database cannot be created.
pub fn execute(force: bool, root_dir: Option<&Path>) -> Result<()> {
    let base_dir = root_dir.unwrap_or_else(|| Path::new("."));
    let spindle_dir = config::init_workspace(base_dir, force)?;

    // Creates the file and applies the schema.
    let db_path = spindle_dir.join("spindle.db");
    let _store = SqliteStore::open(&db_path)?;

    let config_path = spindle_dir.join("config.yaml");
    if !config_path.exists() {
        let config = r"# Spindle Workspace Configuration
# actor: alice
# database: spindle.db
";
        fs::write(config_path, config)?;
    }

    let gitignore_path = spindle_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let gitignore = r"# Database
*.db
*.db-shm
*.db-wal
";
        fs::write(gitignore_path, gitignore)?;
    }

    println!("Initialized spindle workspace in .spindle/");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpindleError;
    use tempfile::TempDir;

    #[test]
    fn init_creates_workspace_files() {
        let temp_dir = TempDir::new().unwrap();
        execute(false, Some(temp_dir.path())).unwrap();

        assert!(temp_dir.path().join(".spindle").exists());
        assert!(temp_dir.path().join(".spindle/spindle.db").exists());
        assert!(temp_dir.path().join(".spindle/metadata.json").exists());
        assert!(temp_dir.path().join(".spindle/config.yaml").exists());
        assert!(temp_dir.path().join(".spindle/.gitignore").exists());
    }

    #[test]
    fn init_fails_if_already_initialized() {
        let temp_dir = TempDir::new().unwrap();
        execute(false, Some(temp_dir.path())).unwrap();

        let err = execute(false, Some(temp_dir.path())).unwrap_err();
        assert!(matches!(err, SpindleError::AlreadyInitialized { .. }));

        // --force succeeds
        execute(true, Some(temp_dir.path())).unwrap();
    }

    #[test]
    fn gitignore_excludes_db_files() {
        let temp_dir = TempDir::new().unwrap();
        execute(false, Some(temp_dir.path())).unwrap();

        let content = fs::read_to_string(temp_dir.path().join(".spindle/.gitignore")).unwrap();
        assert!(content.contains("*.db"));
        assert!(content.contains("*.db-wal"));
    }
}
