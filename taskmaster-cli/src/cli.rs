use clap::{Parser, Subcommand, ValueEnum};

use taskmaster_core::{Priority, Status, TaskSort};

use crate::theme::{PrimaryColor, ThemeMode};

#[derive(Parser)]
#[command(name = "taskmaster")]
#[command(about = concat!(
    ">>===================================<<\n",
    "||  _____         _                  ||\n",
    "|| |_   _|_ _ ___| | __              ||\n",
    "||   | |/ _` / __| |/ /              ||\n",
    "||   | | (_| \\__ \\   <               ||\n",
    "||   |_|\\__,_|___/_|\\_\\ master       ||\n",
    ">>===================================<<\n",
    "~Tasks, reminders and places to be~"
))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(
    "v",
    env!("CARGO_PKG_VERSION"),
    "\nCodeName: ",
    env!("CODENAME")
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Pending,
    InProgress,
    Done,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Status::Pending,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Done => Status::Done,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortBy {
    Added,
    Due,
    Title,
    Priority,
    Status,
}

impl From<SortBy> for TaskSort {
    fn from(arg: SortBy) -> Self {
        match arg {
            SortBy::Added => TaskSort::Added,
            SortBy::Due => TaskSort::Due,
            SortBy::Title => TaskSort::Title,
            SortBy::Priority => TaskSort::Priority,
            SortBy::Status => TaskSort::Status,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task title; words starting with # become tags
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Due date/time, e.g. "tomorrow 14:00" (defaults to now)
        #[arg(long, short = 'd', value_name = "DATE")]
        due: Option<String>,
        /// Longer description
        #[arg(long, value_name = "TEXT")]
        desc: Option<String>,
        /// Task priority
        #[arg(long, short = 'p', value_enum, default_value = "medium")]
        priority: PriorityArg,
        /// Tags for the task (can be specified multiple times)
        #[arg(long, short = 't', value_name = "TAG")]
        tag: Vec<String>,
        /// Schedule a reminder one hour before the due time
        #[arg(long, short = 'r')]
        remind: bool,
        /// Attach a location by address (looked up online)
        #[arg(long, value_name = "ADDRESS")]
        at: Option<String>,
    },

    /// List tasks with filtering and sorting
    List {
        /// Show only tasks with this status
        #[arg(long, short = 's', value_enum)]
        status: Option<StatusArg>,
        /// Show only tasks with this priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
        /// Filter by tag (can be specified multiple times, all must match)
        #[arg(long, short = 't', value_name = "TAG")]
        tag: Vec<String>,
        /// Show only overdue tasks
        #[arg(long)]
        overdue: bool,
        /// Filter tasks containing text (case-insensitive)
        #[arg(long, value_name = "TERM")]
        search: Option<String>,
        /// Sort tasks by field
        #[arg(long, value_enum, default_value = "added")]
        sort: SortBy,
        /// Reverse sort order
        #[arg(long, short = 'r')]
        reverse: bool,
        /// Use compact one-line format
        #[arg(long, short = 'c')]
        compact: bool,
        /// Use detailed format with full info
        #[arg(long)]
        detailed: bool,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Show one task in full
    Show {
        /// Task identifier (or a unique prefix)
        id: String,
    },

    /// Edit a task's fields
    Edit {
        /// Task identifier (or a unique prefix)
        id: String,
        /// New title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
        /// New description
        #[arg(long, value_name = "TEXT")]
        desc: Option<String>,
        /// New due date/time
        #[arg(long, short = 'd', value_name = "DATE")]
        due: Option<String>,
        /// New priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
        /// New status
        #[arg(long, short = 's', value_enum)]
        status: Option<StatusArg>,
        /// Turn the reminder on or off
        #[arg(long, value_name = "BOOL")]
        remind: Option<bool>,
    },

    /// Mark a task as done
    Done {
        /// Task identifier (or a unique prefix)
        id: String,
    },

    /// Move a task into progress
    Start {
        /// Task identifier (or a unique prefix)
        id: String,
    },

    /// Reopen a finished task
    Reopen {
        /// Task identifier (or a unique prefix)
        id: String,
    },

    /// Remove a task
    Remove {
        /// Task identifier (or a unique prefix)
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Add or remove tags from a task
    Tag {
        /// Task identifier (or a unique prefix)
        id: String,
        #[command(subcommand)]
        action: TagAction,
    },

    /// List all tags
    Tags,

    /// Attach, look up or clear a task's location
    Locate {
        /// Task identifier (or a unique prefix)
        id: String,
        /// Address to look up
        #[arg(num_args = 0.., value_name = "ADDRESS")]
        address: Vec<String>,
        /// Coordinates "lat,lon" to reverse-look up instead
        #[arg(long, value_name = "COORDS", conflicts_with = "address")]
        at: Option<String>,
        /// Detach the task's location
        #[arg(long, conflicts_with_all = ["address", "at"])]
        clear: bool,
    },

    /// Manage scheduled reminders
    Remind {
        #[command(subcommand)]
        action: RemindAction,
    },

    /// Show or change application settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Tag subcommands
#[derive(Subcommand)]
pub enum TagAction {
    /// Add a tag to a task
    Add {
        /// Tag to add (without # prefix)
        tag: String,
    },
    /// Remove a tag from a task
    Remove {
        /// Tag to remove (without # prefix)
        tag: String,
    },
}

/// Reminder subcommands
#[derive(Subcommand)]
pub enum RemindAction {
    /// Re-synchronize scheduled reminders with the task collection
    Sync,
    /// List pending reminders
    List,
    /// Deliver reminders whose fire time has arrived
    Fire,
}

/// Settings subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current settings
    Show,
    /// Change settings
    Set {
        /// Light or dark theme
        #[arg(long, value_enum)]
        theme: Option<ThemeMode>,
        /// Primary color
        #[arg(long, value_enum)]
        color: Option<PrimaryColor>,
        /// Font family name ("default" for the stock font)
        #[arg(long, value_name = "FAMILY")]
        font_family: Option<String>,
        /// Font size in points (12-20)
        #[arg(long, value_name = "SIZE")]
        font_size: Option<u8>,
        /// Enable or disable reminder notifications
        #[arg(long, value_name = "BOOL")]
        notifications: Option<bool>,
    },
    /// Reset every setting to its default
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}
