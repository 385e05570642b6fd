//! Task service: the store plus its persistence and reminder side effects
//!
//! Owns the in-memory collection, the storage adapter and the reminder
//! synchronizer. Every successful mutation persists the full collection and
//! then runs a reminder synchronization pass; both are awaited before the
//! mutation call returns, so callers and tests can assert completion and
//! failure instead of relying on incidental timing.

use taskmaster_core::{Task, TaskDraft, TaskId, TaskStore};

use crate::error::Result;
use crate::notify::{NotificationGateway, ReminderSync};
use crate::storage::JsonStorage;

pub struct TaskService<G> {
    store: TaskStore,
    storage: JsonStorage,
    sync: ReminderSync<G>,
}

impl<G: NotificationGateway> TaskService<G> {
    /// Load the persisted collection (or the seed fallback) and wire the
    /// storage adapter and notification gateway
    pub fn load(storage: JsonStorage, gateway: G) -> Self {
        let store = storage.load();
        Self {
            store,
            storage,
            sync: ReminderSync::new(gateway),
        }
    }

    /// Create a task from a draft: assign an identifier, persist, sync
    pub async fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        let task = self.store.add(draft)?;
        self.storage.save(&self.store)?;
        self.sync.sync_all(self.store.tasks()).await?;
        Ok(task)
    }

    /// Replace a task wholesale, persist, sync
    ///
    /// An unknown identifier surfaces `TaskNotFound` before anything is
    /// persisted; the collection is left untouched.
    pub async fn update(&mut self, task: Task) -> Result<Task> {
        let task = self
            .store
            .update(task)
            .inspect_err(|err| log::warn!("Update failed: {}", err))?;
        self.storage.save(&self.store)?;
        self.sync.sync_all(self.store.tasks()).await?;
        Ok(task)
    }

    /// Remove a task, cancel its reminder, persist
    ///
    /// An absent identifier is a no-op with a logged warning.
    pub async fn remove(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let Some(removed) = self.store.remove(id) else {
            log::warn!("Task {} not found, nothing to delete", id);
            return Ok(None);
        };

        self.storage.save(&self.store)?;
        self.sync.cancel(&removed.id).await?;
        self.sync.sync_all(self.store.tasks()).await?;
        Ok(Some(removed))
    }

    /// Get a task by identifier
    pub fn get_by_id(&self, id: &TaskId) -> Option<&Task> {
        self.store.get_by_id(id)
    }

    /// Read-only access to the collection
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Run a reminder synchronization pass over the current collection
    pub async fn sync_reminders(&mut self) -> Result<()> {
        self.sync.sync_all(self.store.tasks()).await
    }

    /// The facility's current pending-reminder set
    pub async fn pending_reminders(&self) -> Result<Vec<crate::notify::PendingNotification>> {
        self.sync.gateway().list_pending().await
    }

    /// Resolve a (possibly shortened) identifier against the collection
    ///
    /// Accepts the full identifier or a unique prefix of one.
    pub fn resolve_id(&self, prefix: &str) -> Result<TaskId> {
        if let Some(task) = self.store.get_by_id(&TaskId::from(prefix)) {
            return Ok(task.id.clone());
        }

        let matches: Vec<&Task> = self
            .store
            .tasks()
            .iter()
            .filter(|t| t.id.as_str().starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [task] => Ok(task.id.clone()),
            [] => Err(crate::error::CliError::TaskNotFound(prefix.to_string())),
            _ => Err(crate::error::CliError::validation(
                "id",
                format!("'{}' matches more than one task", prefix),
            )),
        }
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        self.sync.gateway()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::mock::MockGateway;
    use chrono::{Duration, Local};
    use taskmaster_core::reminder;
    use taskmaster_core::Status;

    fn service(dir: &tempfile::TempDir) -> TaskService<MockGateway> {
        let storage = JsonStorage::new(dir.path().join("tasks.json"));
        TaskService::load(storage, MockGateway::granted())
    }

    #[tokio::test]
    async fn test_add_persists_and_schedules() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        // Starts from the two-task seed collection
        assert_eq!(service.store().len(), 2);

        let due = Local::now() + Duration::hours(2);
        let created = service
            .add(TaskDraft::new("X", due).with_reminder(true))
            .await
            .unwrap();

        assert_eq!(service.store().len(), 3);

        // The write is observable immediately after the call returns
        let persisted = JsonStorage::new(dir.path().join("tasks.json")).load();
        assert_eq!(persisted.len(), 3);
        assert!(persisted.get_by_id(&created.id).is_some());

        // And the reminder is pending, firing one hour before due
        let scheduled: Vec<_> = service
            .gateway()
            .pending
            .iter()
            .filter(|r| r.task_id == created.id)
            .collect();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].fire_at, due - Duration::hours(1));
    }

    #[tokio::test]
    async fn test_update_then_get_reflects_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        let created = service
            .add(TaskDraft::new("Before", Local::now() + Duration::days(1)))
            .await
            .unwrap();

        let mut edited = created.clone();
        edited.title = "After".to_string();
        edited.status = Status::InProgress;
        service.update(edited).await.unwrap();

        let fetched = service.get_by_id(&created.id).unwrap();
        assert_eq!(fetched.title, "After");
        assert_eq!(fetched.status, Status::InProgress);
    }

    #[tokio::test]
    async fn test_update_unknown_id_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        let seeded = service
            .add(TaskDraft::new("Kept", Local::now() + Duration::days(1)))
            .await
            .unwrap();
        let before = service.store().clone();

        let ghost = TaskDraft::new("Ghost", Local::now() + Duration::days(1))
            .into_task(TaskId::from("missing-id"));
        let result = service.update(ghost).await;

        assert!(matches!(
            result,
            Err(crate::error::CliError::TaskNotFound(_))
        ));
        assert_eq!(service.store(), &before);

        // Nothing was persisted either: the file still holds the pre-update state
        let persisted = JsonStorage::new(dir.path().join("tasks.json")).load();
        assert_eq!(&persisted, &before);
        assert!(persisted.get_by_id(&seeded.id).is_some());
    }

    #[tokio::test]
    async fn test_remove_cancels_reminder() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        let created = service
            .add(TaskDraft::new("Doomed", Local::now() + Duration::hours(3)).with_reminder(true))
            .await
            .unwrap();
        let slot = reminder::notification_id(&created.id);
        assert!(service.gateway().pending.iter().any(|r| r.id == slot));

        service.remove(&created.id).await.unwrap();

        assert!(service.get_by_id(&created.id).is_none());
        assert!(!service.gateway().pending.iter().any(|r| r.id == slot));
        assert!(service.gateway().canceled.contains(&slot));
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        let removed = service.remove(&TaskId::from("missing-id")).await.unwrap();
        assert!(removed.is_none());
        assert_eq!(service.store().len(), 2);
    }

    #[tokio::test]
    async fn test_flag_flip_cancels_via_sync_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        let created = service
            .add(TaskDraft::new("Flip", Local::now() + Duration::hours(3)).with_reminder(true))
            .await
            .unwrap();
        let slot = reminder::notification_id(&created.id);
        assert!(service.gateway().pending.iter().any(|r| r.id == slot));

        let mut edited = created.clone();
        edited.reminder_set = false;
        service.update(edited).await.unwrap();

        assert!(!service.gateway().pending.iter().any(|r| r.id == slot));
    }

    #[tokio::test]
    async fn test_resolve_id_by_unique_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(&dir);

        let created = service
            .add(TaskDraft::new("Addressed", Local::now() + Duration::days(1)))
            .await
            .unwrap();

        let prefix = &created.id.as_str()[..8];
        assert_eq!(service.resolve_id(prefix).unwrap(), created.id);

        assert!(service.resolve_id("zzzz").is_err());
    }
}
