//! Task display formatting module
//!
//! Handles colored output and different view modes for tasks

use colored::{Color, Colorize};

use taskmaster_core::date::format_due_human;
use taskmaster_core::{Priority, Status, Task};

/// Display mode for task list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    /// Minimal one-line format
    Compact,
    /// Full info with every field
    Detailed,
    /// Balanced view with clear status indicators (default)
    Default,
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn checkbox(status: Status) -> &'static str {
    match status {
        Status::Pending => "[ ]",
        Status::InProgress => "[~]",
        Status::Done => "[✓]",
    }
}

fn priority_marker(priority: Priority, use_color: bool) -> String {
    let label = match priority {
        Priority::Low => "low",
        Priority::Medium => "med",
        Priority::High => "high",
    };

    if !use_color {
        return format!("({})", label);
    }

    match priority {
        Priority::Low => format!("({})", label).green().to_string(),
        Priority::Medium => format!("({})", label).yellow().to_string(),
        Priority::High => format!("({})", label).red().bold().to_string(),
    }
}

/// Shortened identifier for list output
pub fn short_id(task: &Task) -> &str {
    let id = task.id.as_str();
    &id[..id.len().min(8)]
}

fn due_info(task: &Task, mode: DisplayMode, use_color: bool) -> String {
    let due_str = match mode {
        DisplayMode::Compact => format_due_human(task.due_date, false),
        _ => format_due_human(task.due_date, true),
    };

    if !use_color {
        return format!("({})", due_str);
    }

    if task.status.is_done() {
        format!("({})", due_str).green().to_string()
    } else if task.is_overdue() {
        format!("({})", due_str).red().bold().to_string()
    } else {
        format!("({})", due_str).normal().to_string()
    }
}

/// Format a task for display
pub fn format_task(task: &Task, mode: DisplayMode, use_color: bool, accent: Color) -> String {
    let checkbox = checkbox(task.status);

    let title = if use_color && task.status.is_done() {
        task.title.green().to_string()
    } else {
        task.title.clone()
    };

    let tags_str = if task.tags.is_empty() {
        String::new()
    } else if use_color {
        format!(
            " {}",
            task.tags
                .iter()
                .map(|t| format!("#{}", t).magenta().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )
    } else {
        format!(
            " {}",
            task.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        )
    };

    match mode {
        DisplayMode::Compact => {
            format!("{} [{}] {}{}", checkbox, short_id(task), title, tags_str)
        }
        DisplayMode::Detailed => {
            let mut parts = vec![
                format!("{} [ID: {}]", checkbox, task.id),
                format!("Title: {}{}", title, tags_str),
            ];

            if !task.description.is_empty() {
                parts.push(format!("Description: {}", task.description));
            }

            parts.push(format!(
                "Due: {} {}",
                task.due_date.format("%Y-%m-%d %H:%M"),
                due_info(task, mode, use_color)
            ));
            parts.push(format!("Priority: {}", task.priority));
            parts.push(format!("Status: {}", task.status));

            if let Some(location) = &task.location {
                parts.push(format!(
                    "Location: {} ({:.4}, {:.4})",
                    location.address, location.latitude, location.longitude
                ));
            }

            parts.push(format!(
                "Reminder: {}",
                if task.reminder_set { "on" } else { "off" }
            ));

            parts.join("\n  ")
        }
        DisplayMode::Default => {
            let id_str = if use_color {
                format!("[{}]", short_id(task)).color(accent).to_string()
            } else {
                format!("[{}]", short_id(task))
            };

            let location_str = if task.location.is_some() { " @" } else { "" };

            format!(
                "{} {} {} {}{}{} {}",
                checkbox,
                id_str,
                priority_marker(task.priority, use_color),
                title,
                tags_str,
                location_str,
                due_info(task, mode, use_color)
            )
        }
    }
}

/// Format a summary line for task list
pub fn format_summary(
    total: usize,
    pending: usize,
    in_progress: usize,
    done: usize,
    overdue: usize,
    use_color: bool,
) -> String {
    let parts = vec![
        format!("{} total", total),
        format!("{} pending", pending),
        format!("{} in progress", in_progress),
        if use_color {
            format!("{} done", done).green().to_string()
        } else {
            format!("{} done", done)
        },
        if overdue > 0 {
            if use_color {
                format!("{} overdue", overdue).red().to_string()
            } else {
                format!("{} overdue", overdue)
            }
        } else {
            String::new()
        },
    ];

    let summary: Vec<&str> = parts
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect();

    format!("[{}]", summary.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};
    use taskmaster_core::{TaskDraft, TaskId};

    fn sample() -> Task {
        TaskDraft::new("Test task", Local::now() + Duration::days(1))
            .with_tags(vec!["urgent".to_string()])
            .into_task(TaskId::from("abcdef12-3456"))
    }

    #[test]
    fn test_format_task_compact() {
        let output = format_task(&sample(), DisplayMode::Compact, false, Color::Cyan);
        assert!(output.contains("[ ]"));
        assert!(output.contains("[abcdef12]"));
        assert!(output.contains("Test task"));
        assert!(output.contains("#urgent"));
    }

    #[test]
    fn test_format_task_detailed_shows_fields() {
        let mut task = sample();
        task.description = "Some details".to_string();
        task.reminder_set = true;

        let output = format_task(&task, DisplayMode::Detailed, false, Color::Cyan);
        assert!(output.contains("[ID: abcdef12-3456]"));
        assert!(output.contains("Description: Some details"));
        assert!(output.contains("Priority: medium"));
        assert!(output.contains("Reminder: on"));
    }

    #[test]
    fn test_format_task_done_checkbox() {
        let mut task = sample();
        task.mark_complete();

        let output = format_task(&task, DisplayMode::Default, false, Color::Cyan);
        assert!(output.contains("[✓]"));
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(10, 4, 3, 3, 2, false);
        assert!(summary.contains("10 total"));
        assert!(summary.contains("4 pending"));
        assert!(summary.contains("3 in progress"));
        assert!(summary.contains("3 done"));
        assert!(summary.contains("2 overdue"));
    }

    #[test]
    fn test_format_summary_hides_zero_overdue() {
        let summary = format_summary(2, 1, 0, 1, 0, false);
        assert!(!summary.contains("overdue"));
    }
}
