//! Task filtering and sorting logic
//!
//! Provides a builder-style API for filtering and sorting tasks.

use crate::store::TaskStore;
use crate::task::{Priority, Status, Task};

/// Sort order for tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Insertion order, the collection's natural order
    #[default]
    Added,
    Due,
    Title,
    Priority,
    Status,
}

/// Builder for filtering tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Filter by status
    pub status: Option<Status>,
    /// Filter by priority
    pub priority: Option<Priority>,
    /// Filter by tags (all must match)
    pub tags: Vec<String>,
    /// Filter to only show overdue tasks
    pub overdue: bool,
    /// Search term for title (case-insensitive)
    pub search: Option<String>,
    /// Sort order
    pub sort: TaskSort,
    /// Reverse sort order
    pub reverse: bool,
}

impl TaskFilter {
    /// Create a new filter with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set status filter
    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    /// Set priority filter
    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Filter by tag (must have this tag)
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set tags filter (all must match)
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Filter to only show overdue tasks
    pub fn overdue_only(mut self) -> Self {
        self.overdue = true;
        self
    }

    /// Set overdue filter
    pub fn with_overdue(mut self, overdue: bool) -> Self {
        self.overdue = overdue;
        self
    }

    /// Filter by search term
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Set search term
    pub fn with_search(mut self, term: Option<String>) -> Self {
        self.search = term;
        self
    }

    /// Sort by given field
    pub fn sort_by(mut self, sort: TaskSort) -> Self {
        self.sort = sort;
        self
    }

    /// Reverse sort order
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Set reverse flag
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Check if a task matches this filter
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        for tag in &self.tags {
            if !task.has_tag(tag) {
                return false;
            }
        }

        if self.overdue && !task.is_overdue() {
            return false;
        }

        if let Some(term) = &self.search {
            if !task.title.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Apply filter and sort to a collection of tasks
    pub fn apply<'a>(&self, tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a Task> {
        let mut filtered: Vec<&Task> = tasks.filter(|t| self.matches(t)).collect();

        match self.sort {
            TaskSort::Added => {}
            TaskSort::Due => filtered.sort_by_key(|t| t.due_date),
            TaskSort::Title => {
                filtered.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            }
            // high first
            TaskSort::Priority => filtered.sort_by(|a, b| b.priority.cmp(&a.priority)),
            TaskSort::Status => filtered.sort_by_key(|t| t.status),
        }

        if self.reverse {
            filtered.reverse();
        }

        filtered
    }
}

/// Extension trait for TaskStore to support filtering
pub trait FilterExt {
    /// Get tasks filtered and sorted according to the filter
    fn get_filtered(&self, filter: &TaskFilter) -> Vec<&Task>;
}

impl FilterExt for TaskStore {
    fn get_filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(self.tasks().iter())
    }
}
