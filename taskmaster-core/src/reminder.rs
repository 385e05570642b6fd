//! Reminder derivation rules
//!
//! A reminder is not stored on its own: everything about it is derived from
//! the task. The notification slot identifier is a deterministic function of
//! the task identifier, so re-scheduling the same task always collides with
//! (and must first cancel) the prior slot.

use chrono::{DateTime, Duration, Local};

use crate::task::{Task, TaskId};

/// Offset added to the character-code sum when deriving a slot identifier
pub const NOTIFICATION_ID_OFFSET: u32 = 1000;

/// Derive the notification slot identifier for a task
///
/// Sum of the identifier's character codes plus a fixed offset.
pub fn notification_id(id: &TaskId) -> u32 {
    id.as_str()
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_add(c as u32))
        .wrapping_add(NOTIFICATION_ID_OFFSET)
}

/// The moment a task's reminder fires: one hour before it is due
pub fn fire_time(due: DateTime<Local>) -> DateTime<Local> {
    due - Duration::hours(1)
}

/// Whether a task should have a pending reminder at `now`
///
/// True when the reminder flag is set and the due time is strictly in the
/// future.
pub fn wants_reminder(task: &Task, now: DateTime<Local>) -> bool {
    task.reminder_set && task.due_date > now
}
