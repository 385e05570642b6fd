//! JSON file storage adapter for the task collection
//!
//! The whole collection is written on every save, wrapped in a versioned
//! envelope. Loading never fails visibly: missing or malformed data falls
//! back to the fixed seed collection.

use std::fs::File;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use taskmaster_core::{Task, TaskStore};

use crate::error::{CliError, Result};

/// Current on-disk schema version
const SCHEMA_VERSION: u32 = 1;

/// Versioned envelope around the persisted collection
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCollection {
    version: u32,
    tasks: Vec<Task>,
}

/// JSON storage adapter
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Create a new storage adapter for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted collection
    ///
    /// Missing or malformed data is logged and masked by the seed
    /// collection; this never surfaces an error to the caller.
    pub fn load(&self) -> TaskStore {
        if !self.path.exists() {
            log::debug!(
                "No task data at {:?}, starting from the seed collection",
                self.path
            );
            return TaskStore::seed();
        }

        match self.try_load() {
            Ok(store) => store,
            Err(err) => {
                log::warn!(
                    "Malformed task data in {:?} ({}), falling back to the seed collection",
                    self.path,
                    err
                );
                TaskStore::seed()
            }
        }
    }

    fn try_load(&self) -> Result<TaskStore> {
        let file = File::open(&self.path)
            .map_err(|e| CliError::io(format!("Unable to open {:?}", self.path), e))?;
        let persisted: PersistedCollection = serde_json::from_reader(file)?;

        if persisted.version != SCHEMA_VERSION {
            return Err(CliError::storage(format!(
                "Unsupported schema version {}",
                persisted.version
            )));
        }

        Ok(TaskStore::from_tasks(persisted.tasks))
    }

    /// Persist the full collection
    pub fn save(&self, store: &TaskStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CliError::io(format!("Unable to create {:?}", parent), e))?;
        }

        // Keep a backup of the previous state before truncating
        self.backup()?;

        let file = File::create(&self.path)
            .map_err(|e| CliError::io(format!("Unable to write {:?}", self.path), e))?;

        let persisted = PersistedCollection {
            version: SCHEMA_VERSION,
            tasks: store.tasks().to_vec(),
        };
        serde_json::to_writer_pretty(file, &persisted)?;

        Ok(())
    }

    /// Create a backup of the current data file
    pub fn backup(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let backup_path = self.path.with_extension("json.bak");
        std::fs::copy(&self.path, &backup_path)
            .map_err(|e| CliError::io(format!("Unable to back up to {:?}", backup_path), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};
    use taskmaster_core::TaskDraft;

    fn storage_in(dir: &tempfile::TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("tasks.json"))
    }

    #[test]
    fn test_missing_file_yields_seed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let store = storage.load();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let mut store = TaskStore::new();
        let created = store
            .add(
                TaskDraft::new("Persisted task", Local::now() + Duration::days(1))
                    .with_tags(vec!["kept".into()])
                    .with_reminder(true),
            )
            .unwrap();
        storage.save(&store).unwrap();

        let loaded = storage.load();
        assert_eq!(loaded.len(), 1);
        let task = loaded.get_by_id(&created.id).unwrap();
        assert_eq!(task.title, "Persisted task");
        assert_eq!(task.due_date, created.due_date);
        assert!(task.reminder_set);
    }

    #[test]
    fn test_malformed_data_yields_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        std::fs::write(&path, "{not json at all").unwrap();
        let store = JsonStorage::new(&path).load();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_version_mismatch_yields_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        std::fs::write(&path, r#"{"version": 99, "tasks": []}"#).unwrap();
        let store = JsonStorage::new(&path).load();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_envelope_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        JsonStorage::new(&path).save(&TaskStore::seed()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        assert!(raw.contains("\"version\": 1"));
        assert!(raw.contains("\"dueDate\""));
        assert!(raw.contains("\"reminderSet\""));
    }

    #[test]
    fn test_backup_written_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        storage.save(&TaskStore::seed()).unwrap();
        storage.save(&TaskStore::new()).unwrap();

        let backup = dir.path().join("tasks.json.bak");
        assert!(backup.exists());

        let backup_store = JsonStorage::new(backup).load();
        assert_eq!(backup_store.len(), 2);
    }
}
