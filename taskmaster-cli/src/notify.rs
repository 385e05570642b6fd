//! Reminder synchronization against a notification facility
//!
//! The gateway trait models the host notification facility; the desktop
//! implementation keeps the pending set in a JSON ledger and delivers due
//! entries through the OS notification service. The synchronizer owns the
//! rules: fire one hour before due, cancel-then-reschedule into the derived
//! slot, and degrade to a logged warning when permission is missing.

use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use taskmaster_core::reminder;
use taskmaster_core::{Task, TaskId};

use crate::error::Result;

/// A reminder as handed to the notification facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    /// Derived notification slot identifier
    pub id: u32,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Local>,
    /// Back reference to the originating task
    pub task_id: TaskId,
}

/// A pending notification as reported by the facility
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    pub id: u32,
    pub task_id: TaskId,
}

/// The host notification facility
#[async_trait]
pub trait NotificationGateway {
    async fn request_permission(&self) -> bool;
    async fn schedule(&mut self, request: ReminderRequest) -> Result<()>;
    async fn cancel(&mut self, id: u32) -> Result<()>;
    async fn list_pending(&self) -> Result<Vec<PendingNotification>>;
}

/// Keeps the facility's pending set consistent with the task collection
pub struct ReminderSync<G> {
    gateway: G,
}

impl<G: NotificationGateway> ReminderSync<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// (Re)schedule the reminder for one task
    ///
    /// The fire time is one hour before the due time; a fire time already in
    /// the past declines silently rather than firing immediately. Without
    /// permission this is a logged no-op.
    pub async fn schedule(&mut self, task: &Task) -> Result<()> {
        if !task.reminder_set {
            return Ok(());
        }

        if !self.gateway.request_permission().await {
            log::warn!(
                "Notification permission not granted, reminder for task {} not scheduled",
                task.id
            );
            return Ok(());
        }

        // The slot identifier is derived from the task identifier, so a
        // reschedule collides with the prior reminder; clear it first.
        self.cancel(&task.id).await?;

        let fire_at = reminder::fire_time(task.due_date);
        if fire_at <= Local::now() {
            log::debug!("Reminder time for task {} has already passed", task.id);
            return Ok(());
        }

        let request = ReminderRequest {
            id: reminder::notification_id(&task.id),
            title: "Task reminder".to_string(),
            body: format!(
                "\"{}\" is due at {}",
                task.title,
                task.due_date.format("%H:%M")
            ),
            fire_at,
            task_id: task.id.clone(),
        };

        self.gateway.schedule(request).await
    }

    /// Cancel the pending reminder for a task, if one exists
    pub async fn cancel(&mut self, task_id: &TaskId) -> Result<()> {
        let slot = reminder::notification_id(task_id);
        let pending = self.gateway.list_pending().await?;

        if pending.iter().any(|p| p.id == slot) {
            self.gateway.cancel(slot).await?;
        }
        Ok(())
    }

    /// Bring the whole pending set in line with the task collection
    ///
    /// Every task with the reminder flag set and a future due time gets
    /// (re)scheduled. Pending entries whose task no longer qualifies (flag
    /// off, deleted, or due time passed) are swept and canceled, so stale
    /// reminders do not linger.
    pub async fn sync_all(&mut self, tasks: &[Task]) -> Result<()> {
        let now = Local::now();
        let eligible: Vec<&Task> = tasks
            .iter()
            .filter(|t| reminder::wants_reminder(t, now))
            .collect();

        for task in &eligible {
            self.schedule(task).await?;
        }

        let keep: HashSet<u32> = eligible
            .iter()
            .map(|t| reminder::notification_id(&t.id))
            .collect();
        for entry in self.gateway.list_pending().await? {
            if !keep.contains(&entry.id) {
                self.gateway.cancel(entry.id).await?;
            }
        }

        log::info!("Synchronized reminders for {} task(s)", eligible.len());
        Ok(())
    }
}

/// Desktop notification facility backed by a JSON ledger
///
/// Scheduled reminders wait in the ledger until `deliver_due` hands the due
/// ones to the OS notification service. Permission maps to the persisted
/// notifications-enabled preference.
pub struct DesktopGateway {
    ledger_path: PathBuf,
    enabled: bool,
}

impl DesktopGateway {
    pub fn new(ledger_path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            ledger_path: ledger_path.into(),
            enabled,
        }
    }

    fn load_ledger(&self) -> Vec<ReminderRequest> {
        if !self.ledger_path.exists() {
            return Vec::new();
        }

        let file = match File::open(&self.ledger_path) {
            Ok(f) => f,
            Err(err) => {
                log::warn!("Unable to open {:?}: {}", self.ledger_path, err);
                return Vec::new();
            }
        };

        match serde_json::from_reader(file) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!(
                    "Malformed reminder ledger in {:?} ({}), starting empty",
                    self.ledger_path,
                    err
                );
                Vec::new()
            }
        }
    }

    fn save_ledger(&self, entries: &[ReminderRequest]) {
        if let Some(parent) = self.ledger_path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::warn!("Unable to create {:?}: {}", parent, err);
                return;
            }
        }

        let file = match File::create(&self.ledger_path) {
            Ok(f) => f,
            Err(err) => {
                log::warn!("Unable to save {:?}: {}", self.ledger_path, err);
                return;
            }
        };

        if let Err(err) = serde_json::to_writer_pretty(file, entries) {
            log::warn!("Unable to serialize reminder ledger: {}", err);
        }
    }

    /// Deliver every reminder whose fire time has arrived, removing it from
    /// the ledger. Returns the delivered entries.
    pub fn deliver_due(&self) -> Vec<ReminderRequest> {
        let now = Local::now();
        let (due, remaining): (Vec<ReminderRequest>, Vec<ReminderRequest>) = self
            .load_ledger()
            .into_iter()
            .partition(|r| r.fire_at <= now);

        if due.is_empty() {
            return due;
        }

        for entry in &due {
            if let Err(err) = notify_rust::Notification::new()
                .summary(&entry.title)
                .body(&entry.body)
                .show()
            {
                log::warn!(
                    "Unable to display reminder for task {}: {}",
                    entry.task_id,
                    err
                );
            }
        }

        self.save_ledger(&remaining);
        due
    }
}

#[async_trait]
impl NotificationGateway for DesktopGateway {
    async fn request_permission(&self) -> bool {
        self.enabled
    }

    async fn schedule(&mut self, request: ReminderRequest) -> Result<()> {
        let mut entries = self.load_ledger();
        entries.retain(|r| r.id != request.id);
        entries.push(request);
        self.save_ledger(&entries);
        Ok(())
    }

    async fn cancel(&mut self, id: u32) -> Result<()> {
        let mut entries = self.load_ledger();
        entries.retain(|r| r.id != id);
        self.save_ledger(&entries);
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<PendingNotification>> {
        Ok(self
            .load_ledger()
            .into_iter()
            .map(|r| PendingNotification {
                id: r.id,
                task_id: r.task_id,
            })
            .collect())
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockGateway;
    use super::*;
    use chrono::Duration;
    use taskmaster_core::TaskDraft;

    fn task_due_in(hours: i64, remind: bool) -> Task {
        TaskDraft::new(format!("Due in {}h", hours), Local::now() + Duration::hours(hours))
            .with_reminder(remind)
            .into_task(TaskId::generate())
    }

    #[tokio::test]
    async fn test_schedule_fires_one_hour_before_due() {
        let mut sync = ReminderSync::new(MockGateway::granted());
        let task = task_due_in(3, true);

        sync.schedule(&task).await.unwrap();

        let pending = &sync.gateway().pending;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, reminder::notification_id(&task.id));
        assert_eq!(pending[0].fire_at, task.due_date - Duration::hours(1));
        assert_eq!(pending[0].task_id, task.id);
    }

    #[tokio::test]
    async fn test_schedule_declines_when_fire_time_passed() {
        let mut sync = ReminderSync::new(MockGateway::granted());

        // Due in 30 minutes: the fire time (due - 1h) is already past
        let task = TaskDraft::new("Soon", Local::now() + Duration::minutes(30))
            .with_reminder(true)
            .into_task(TaskId::generate());
        sync.schedule(&task).await.unwrap();
        assert!(sync.gateway().pending.is_empty());

        // Exactly at the boundary: fire time == now also declines
        let task = TaskDraft::new("Boundary", Local::now() + Duration::hours(1))
            .with_reminder(true)
            .into_task(TaskId::generate());
        sync.schedule(&task).await.unwrap();
        assert!(sync.gateway().pending.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_is_idempotent() {
        let mut sync = ReminderSync::new(MockGateway::granted());
        let task = task_due_in(4, true);

        sync.schedule(&task).await.unwrap();
        sync.schedule(&task).await.unwrap();

        // The second call cancels then reschedules into the same slot
        assert_eq!(sync.gateway().pending.len(), 1);
        assert_eq!(
            sync.gateway().canceled,
            vec![reminder::notification_id(&task.id)]
        );
    }

    #[tokio::test]
    async fn test_schedule_without_permission_is_noop() {
        let mut sync = ReminderSync::new(MockGateway::denied());
        let task = task_due_in(4, true);

        sync.schedule(&task).await.unwrap();
        assert!(sync.gateway().pending.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_skips_unflagged_task() {
        let mut sync = ReminderSync::new(MockGateway::granted());
        let task = task_due_in(4, false);

        sync.schedule(&task).await.unwrap();
        assert!(sync.gateway().pending.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_absent_is_silent_noop() {
        let mut sync = ReminderSync::new(MockGateway::granted());

        sync.cancel(&TaskId::from("missing-id")).await.unwrap();
        assert!(sync.gateway().canceled.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_removes_pending_reminder() {
        let mut sync = ReminderSync::new(MockGateway::granted());
        let task = task_due_in(4, true);

        sync.schedule(&task).await.unwrap();
        sync.cancel(&task.id).await.unwrap();

        assert!(sync.gateway().pending.is_empty());
    }

    #[tokio::test]
    async fn test_sync_all_schedules_only_eligible_tasks() {
        let mut sync = ReminderSync::new(MockGateway::granted());
        let eligible = task_due_in(5, true);
        let unflagged = task_due_in(5, false);
        let past = TaskDraft::new("Past", Local::now() - Duration::hours(1))
            .with_reminder(true)
            .into_task(TaskId::generate());

        let tasks = vec![eligible.clone(), unflagged, past];
        sync.sync_all(&tasks).await.unwrap();

        let pending = &sync.gateway().pending;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].task_id, eligible.id);
    }

    #[tokio::test]
    async fn test_sync_all_sweeps_stale_entries() {
        let mut gateway = MockGateway::granted();
        let stale = task_due_in(5, true);
        gateway.pending.push(ReminderRequest {
            id: reminder::notification_id(&stale.id),
            title: "Task reminder".to_string(),
            body: "stale".to_string(),
            fire_at: Local::now() + Duration::hours(4),
            task_id: stale.id.clone(),
        });

        // The task's flag has since been turned off
        let mut flagged_off = stale.clone();
        flagged_off.reminder_set = false;

        let mut sync = ReminderSync::new(gateway);
        sync.sync_all(&[flagged_off]).await.unwrap();

        assert!(sync.gateway().pending.is_empty());
        assert_eq!(
            sync.gateway().canceled,
            vec![reminder::notification_id(&stale.id)]
        );
    }

    #[tokio::test]
    async fn test_desktop_gateway_ledger_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut gateway = DesktopGateway::new(dir.path().join("reminders.json"), true);

        let task = task_due_in(3, true);
        let request = ReminderRequest {
            id: reminder::notification_id(&task.id),
            title: "Task reminder".to_string(),
            body: "body".to_string(),
            fire_at: reminder::fire_time(task.due_date),
            task_id: task.id.clone(),
        };

        gateway.schedule(request.clone()).await.unwrap();
        let pending = gateway.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].task_id, task.id);

        gateway.cancel(request.id).await.unwrap();
        assert!(gateway.list_pending().await.unwrap().is_empty());
    }
}
