//! In-memory task collection
//!
//! The store owns the insertion-ordered collection and exposes the CRUD
//! contract. It performs no I/O; persistence adapters in consuming crates
//! serialize the full collection after every mutation.

use chrono::{Duration, Local};

use crate::error::{CoreError, Result};
use crate::task::{Location, Priority, Status, Task, TaskDraft, TaskId};

/// Insertion-ordered collection of tasks
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create a new empty store
    pub fn new() -> Self {
        TaskStore { tasks: Vec::new() }
    }

    /// Build a store from an already-identified set of tasks
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskStore { tasks }
    }

    /// The fixed fallback collection used when no valid persisted data exists
    pub fn seed() -> Self {
        let now = Local::now();
        TaskStore {
            tasks: vec![
                TaskDraft::new("Finish the portfolio project", now + Duration::days(7))
                    .with_description("Wrap up the task manager and add it to the portfolio")
                    .with_priority(Priority::High)
                    .with_status(Status::InProgress)
                    .with_tags(vec!["development".to_string(), "portfolio".to_string()])
                    .with_reminder(true)
                    .into_task(TaskId::from("1")),
                TaskDraft::new("Professional networking meetup", now + Duration::days(3))
                    .with_description("Attend the career development networking event")
                    .with_priority(Priority::Medium)
                    .with_location(Some(Location::new(
                        32.0853,
                        34.7818,
                        "Rothschild 22, Tel Aviv",
                    )))
                    .with_tags(vec!["career".to_string(), "networking".to_string()])
                    .into_task(TaskId::from("2")),
            ],
        }
    }

    /// Add a new task, assigning it a fresh unique identifier
    ///
    /// Returns a clone of the created task. The title must be non-empty;
    /// that is the only enforced validation.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        validate_title(&draft.title)?;

        let task = draft.into_task(TaskId::generate());
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Replace a task wholesale by its identifier
    ///
    /// Fails with `TaskNotFound` (leaving the collection untouched) when no
    /// task carries that identifier.
    pub fn update(&mut self, task: Task) -> Result<Task> {
        validate_title(&task.title)?;

        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| CoreError::not_found(task.id.as_str()))?;
        *slot = task.clone();
        Ok(task)
    }

    /// Remove a task by identifier, returning it if it was present
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| &t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    /// Get a task by identifier
    pub fn get_by_id(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Filter tasks by status, priority and tag; all provided predicates
    /// must hold (tag match is "task carries the tag")
    pub fn filter(
        &self,
        status: Option<Status>,
        priority: Option<Priority>,
        tag: Option<&str>,
    ) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| {
                status.is_none_or(|s| task.status == s)
                    && priority.is_none_or(|p| task.priority == p)
                    && tag.is_none_or(|t| task.has_tag(t))
            })
            .collect()
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Count total tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Count tasks in a given status
    pub fn count_with_status(&self, status: Status) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Count overdue tasks
    pub fn count_overdue(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_overdue()).count()
    }

    /// Get all unique tags sorted alphabetically
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .tasks
            .iter()
            .flat_map(|t| t.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Get or return an error if the task is not found
    pub fn get_or_err(&self, id: &TaskId) -> Result<&Task> {
        self.get_by_id(id)
            .ok_or_else(|| CoreError::not_found(id.as_str()))
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CoreError::validation("title", "title must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, Local::now() + Duration::days(1))
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut store = TaskStore::new();

        let a = store.add(draft("Task 1")).unwrap();
        let b = store.add(draft("Task 2")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let mut store = TaskStore::new();
        let result = store.add(draft("   "));

        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut store = TaskStore::new();
        store.add(draft("First")).unwrap();
        store.add(draft("Second")).unwrap();
        store.add(draft("Third")).unwrap();

        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_update_replaces_wholesale() {
        let mut store = TaskStore::new();
        let created = store.add(draft("Before")).unwrap();

        let mut edited = created.clone();
        edited.title = "After".to_string();
        edited.priority = Priority::High;
        store.update(edited).unwrap();

        let fetched = store.get_by_id(&created.id).unwrap();
        assert_eq!(fetched.title, "After");
        assert_eq!(fetched.priority, Priority::High);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_unknown_id_leaves_collection_unchanged() {
        let mut store = TaskStore::seed();
        let before = store.clone();

        let ghost = draft("Ghost").into_task(TaskId::from("missing-id"));
        let result = store.update(ghost);

        assert!(matches!(result, Err(CoreError::TaskNotFound(_))));
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_then_get_returns_none() {
        let mut store = TaskStore::new();
        let task = store.add(draft("Doomed")).unwrap();

        let removed = store.remove(&task.id).unwrap();
        assert_eq!(removed.id, task.id);
        assert!(store.get_by_id(&task.id).is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = TaskStore::seed();
        assert!(store.remove(&TaskId::from("missing-id")).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let mut store = TaskStore::new();
        store
            .add(draft("A").with_priority(Priority::High).with_tags(vec!["work".into()]))
            .unwrap();
        store
            .add(draft("B").with_priority(Priority::High).with_tags(vec!["home".into()]))
            .unwrap();
        store
            .add(draft("C").with_priority(Priority::Low).with_tags(vec!["work".into()]))
            .unwrap();

        let high_work = store.filter(None, Some(Priority::High), Some("work"));
        assert_eq!(high_work.len(), 1);
        assert_eq!(high_work[0].title, "A");

        let all = store.filter(None, None, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_seed_has_two_tasks() {
        let store = TaskStore::seed();
        assert_eq!(store.len(), 2);
        assert!(store.tasks()[0].reminder_set);
        assert!(store.tasks()[1].location.is_some());
    }

    #[test]
    fn test_all_tags_sorted_and_deduped() {
        let mut store = TaskStore::new();
        store
            .add(draft("A").with_tags(vec!["zeta".into(), "alpha".into()]))
            .unwrap();
        store.add(draft("B").with_tags(vec!["alpha".into()])).unwrap();

        assert_eq!(store.all_tags(), vec!["alpha", "zeta"]);
    }
}
