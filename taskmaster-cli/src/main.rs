use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use colored::Colorize;

use taskmaster_core::date::{format_due_human, parse_due};
use taskmaster_core::{reminder, FilterExt, Location, Status, TaskDraft, TaskFilter, TaskId};

use crate::cli::{Cli, Commands, ConfigAction, RemindAction, TagAction};
use crate::display::{format_summary, format_task, short_id, supports_color, DisplayMode};
use crate::error::{CliError, Result};
use crate::geocode::Geocoder;
use crate::notify::DesktopGateway;
use crate::service::TaskService;
use crate::storage::JsonStorage;
use crate::theme::{Settings, FONT_SIZE_MAX, FONT_SIZE_MIN};

mod cli;
mod display;
mod error;
mod geocode;
mod notify;
mod service;
mod storage;
mod theme;

const APP_NAME: &str = "taskmaster";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut settings: Settings = confy::load(APP_NAME, None)?;
    let data_dir = PathBuf::from(&settings.data_directory);
    let reminder_path = data_dir.join(&settings.reminder_filename);

    let storage = JsonStorage::new(data_dir.join(&settings.task_filename));
    let gateway = DesktopGateway::new(&reminder_path, settings.notifications_enabled);
    let accent = settings.primary_color.accent();

    let mut service = TaskService::load(storage, gateway);

    match cli.command {
        Commands::Add {
            title,
            due,
            desc,
            priority,
            tag,
            remind,
            at,
        } => {
            let (title_str, mut tags) = split_inline_tags(&title);
            for t in tag {
                let t = t.trim_start_matches('#').to_string();
                if !t.is_empty() && !tags.contains(&t) {
                    tags.push(t);
                }
            }

            let due = match due {
                Some(input) => parse_due(&input)?,
                None => Local::now(),
            };

            let location = match at {
                Some(address) => lookup_address(&address).await?,
                None => None,
            };

            let draft = TaskDraft::new(title_str, due)
                .with_description(desc.unwrap_or_default())
                .with_priority(priority.into())
                .with_tags(tags)
                .with_location(location)
                .with_reminder(remind);

            let task = service.add(draft).await?;
            println!(
                "Task added: {} [{}] (due: {})",
                task.title,
                short_id(&task),
                format_due_human(task.due_date, true)
            );

            if task.reminder_set {
                let fire_at = reminder::fire_time(task.due_date);
                if fire_at > Local::now() {
                    println!("  Reminder will fire at {}", fire_at.format("%Y-%m-%d %H:%M"));
                } else {
                    println!("  Reminder time has already passed; none scheduled.");
                }
            }
        }

        Commands::List {
            status,
            priority,
            tag,
            overdue,
            search,
            sort,
            reverse,
            compact,
            detailed,
            no_color,
        } => {
            let filter = TaskFilter::new()
                .with_status(status.map(Into::into))
                .with_priority(priority.map(Into::into))
                .with_tags(tag)
                .with_overdue(overdue)
                .with_search(search)
                .sort_by(sort.into())
                .with_reverse(reverse);

            let tasks = service.store().get_filtered(&filter);

            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                let mode = if compact {
                    DisplayMode::Compact
                } else if detailed {
                    DisplayMode::Detailed
                } else {
                    DisplayMode::Default
                };

                let use_color = !no_color && supports_color();

                for task in &tasks {
                    println!("{}", format_task(task, mode, use_color, accent));
                }

                println!();
                let summary = format_summary(
                    tasks.len(),
                    tasks.iter().filter(|t| t.status == Status::Pending).count(),
                    tasks
                        .iter()
                        .filter(|t| t.status == Status::InProgress)
                        .count(),
                    tasks.iter().filter(|t| t.status.is_done()).count(),
                    tasks.iter().filter(|t| t.is_overdue()).count(),
                    use_color,
                );
                println!("{}", summary);
            }
        }

        Commands::Show { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.store().get_or_err(&id)?;
            let use_color = supports_color();
            println!("{}", format_task(task, DisplayMode::Detailed, use_color, accent));
        }

        Commands::Edit {
            id,
            title,
            desc,
            due,
            priority,
            status,
            remind,
        } => {
            if title.is_none()
                && desc.is_none()
                && due.is_none()
                && priority.is_none()
                && status.is_none()
                && remind.is_none()
            {
                return Err(CliError::validation(
                    "edit",
                    "At least one of --title, --desc, --due, --priority, --status or --remind must be provided",
                ));
            }

            let id = service.resolve_id(&id)?;
            let mut task = service.store().get_or_err(&id)?.clone();

            if let Some(new_title) = title {
                task.title = new_title;
            }
            if let Some(new_desc) = desc {
                task.description = new_desc;
            }
            if let Some(date_input) = due {
                task.due_date = parse_due(&date_input)?;
            }
            if let Some(new_priority) = priority {
                task.priority = new_priority.into();
            }
            if let Some(new_status) = status {
                task.status = new_status.into();
            }
            if let Some(remind_flag) = remind {
                task.reminder_set = remind_flag;
            }

            let task = service.update(task).await?;
            println!("Updated task: {} [{}]", task.title, short_id(&task));
        }

        Commands::Done { id } => {
            let id = service.resolve_id(&id)?;
            let mut task = service.store().get_or_err(&id)?.clone();
            task.mark_complete();
            let task = service.update(task).await?;
            println!("Marked done: {}", task.title);
        }

        Commands::Start { id } => {
            let id = service.resolve_id(&id)?;
            let mut task = service.store().get_or_err(&id)?.clone();
            task.start();
            let task = service.update(task).await?;
            println!("In progress: {}", task.title);
        }

        Commands::Reopen { id } => {
            let id = service.resolve_id(&id)?;
            let mut task = service.store().get_or_err(&id)?.clone();
            task.reopen();
            let task = service.update(task).await?;
            println!("Reopened: {}", task.title);
        }

        Commands::Remove { id, force } => {
            let resolved = match service.resolve_id(&id) {
                Ok(resolved) => resolved,
                Err(CliError::TaskNotFound(_)) => TaskId::from(id.as_str()),
                Err(err) => return Err(err),
            };

            if let Some(task) = service.get_by_id(&resolved) {
                if !force && !confirm(&format!("Remove '{}'?", task.title))? {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            match service.remove(&resolved).await? {
                Some(task) => println!("Removed: {}", task.title),
                None => println!("Task '{}' not found, nothing removed.", id),
            }
        }

        Commands::Tag { id, action } => {
            let id = service.resolve_id(&id)?;
            let mut task = service.store().get_or_err(&id)?.clone();

            match action {
                TagAction::Add { tag } => {
                    task.add_tag(&tag);
                    let task = service.update(task).await?;
                    println!("Tags for {}: {}", short_id(&task), join_tags(&task.tags));
                }
                TagAction::Remove { tag } => {
                    if !task.remove_tag(&tag) {
                        println!("Task has no tag '{}'.", tag.trim_start_matches('#'));
                        return Ok(());
                    }
                    let task = service.update(task).await?;
                    println!("Tags for {}: {}", short_id(&task), join_tags(&task.tags));
                }
            }
        }

        Commands::Tags => {
            let tags = service.store().all_tags();
            if tags.is_empty() {
                println!("No tags yet.");
            } else {
                for tag in tags {
                    println!("#{}", tag);
                }
            }
        }

        Commands::Locate {
            id,
            address,
            at,
            clear,
        } => {
            let id = service.resolve_id(&id)?;
            let mut task = service.store().get_or_err(&id)?.clone();

            if clear {
                task.location = None;
                service.update(task).await?;
                println!("Location cleared.");
            } else if let Some(coords) = at {
                let (latitude, longitude) = parse_coords(&coords)?;
                let geocoder = Geocoder::new()?;
                let address = geocoder.reverse(latitude, longitude).await;
                task.location = Some(Location::new(latitude, longitude, address.clone()));
                service.update(task).await?;
                println!("Location set: {}", address);
            } else if !address.is_empty() {
                let address = address.join(" ");
                match lookup_address(&address).await? {
                    Some(location) => {
                        task.location = Some(location);
                        service.update(task).await?;
                        println!("Location set: {}", address);
                    }
                    None => {}
                }
            } else {
                return Err(CliError::validation(
                    "locate",
                    "Provide an address, --at <lat,lon>, or --clear",
                ));
            }
        }

        Commands::Remind { action } => match action {
            RemindAction::Sync => {
                service.sync_reminders().await?;
                let pending = service.pending_reminders().await?;
                println!("Reminders synchronized: {} pending.", pending.len());
            }
            RemindAction::List => {
                let pending = service.pending_reminders().await?;
                if pending.is_empty() {
                    println!("No pending reminders.");
                } else {
                    for entry in pending {
                        match service.get_by_id(&entry.task_id) {
                            Some(task) => println!(
                                "{} {} fires at {}",
                                short_id(task),
                                task.title,
                                reminder::fire_time(task.due_date).format("%Y-%m-%d %H:%M")
                            ),
                            None => println!("(slot {}) task {} no longer exists", entry.id, entry.task_id),
                        }
                    }
                }
            }
            RemindAction::Fire => {
                let gateway = DesktopGateway::new(&reminder_path, settings.notifications_enabled);
                let delivered = gateway.deliver_due();
                if delivered.is_empty() {
                    println!("No reminders due.");
                } else {
                    for entry in &delivered {
                        println!("{}", entry.body);
                        println!("  (see: taskmaster show {})", entry.task_id);
                    }
                }
            }
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print_settings(&settings);
            }
            ConfigAction::Set {
                theme,
                color,
                font_family,
                font_size,
                notifications,
            } => {
                if let Some(theme) = theme {
                    settings.theme = theme;
                }
                if let Some(color) = color {
                    settings.primary_color = color;
                }
                if let Some(family) = font_family {
                    settings.font_family = family;
                }
                if let Some(size) = font_size {
                    if !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&size) {
                        return Err(CliError::validation(
                            "font-size",
                            format!("must be between {} and {}", FONT_SIZE_MIN, FONT_SIZE_MAX),
                        ));
                    }
                    settings.font_size = size;
                }
                if let Some(enabled) = notifications {
                    settings.notifications_enabled = enabled;
                }

                confy::store(APP_NAME, None, &settings)?;
                println!("Settings applied.");
            }
            ConfigAction::Reset { force } => {
                if !force && !confirm("Reset every setting to its default?")? {
                    println!("Cancelled.");
                    return Ok(());
                }

                confy::store(APP_NAME, None, Settings::default())?;
                println!("All settings restored to defaults.");
            }
        },
    }

    Ok(())
}

/// Pull `#word` tokens out of the title words
fn split_inline_tags(words: &[String]) -> (String, Vec<String>) {
    let mut tags = Vec::new();
    let mut title_words = Vec::new();

    for word in words {
        match word.strip_prefix('#') {
            Some(tag) if !tag.is_empty() => {
                if !tags.contains(&tag.to_string()) {
                    tags.push(tag.to_string());
                }
            }
            _ => title_words.push(word.as_str()),
        }
    }

    (title_words.join(" "), tags)
}

/// Parse a "lat,lon" coordinate pair
fn parse_coords(input: &str) -> Result<(f64, f64)> {
    let invalid = || CliError::parse(format!("Invalid coordinates '{}', expected 'lat,lon'", input));

    let (lat, lon) = input.split_once(',').ok_or_else(invalid)?;
    let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok((latitude, longitude))
}

/// Forward-geocode an address, degrading lookup failures to a printed notice
async fn lookup_address(address: &str) -> Result<Option<Location>> {
    let geocoder = Geocoder::new()?;

    match geocoder.forward(address).await {
        Ok(Some((latitude, longitude))) => {
            Ok(Some(Location::new(latitude, longitude, address)))
        }
        Ok(None) => {
            println!(
                "Could not find '{}'. Try again with a more precise address.",
                address
            );
            Ok(None)
        }
        Err(err) => {
            log::warn!("Address lookup failed: {}", err);
            println!("Address lookup is unavailable right now; no location attached.");
            Ok(None)
        }
    }
}

fn print_settings(settings: &Settings) {
    let use_color = supports_color();

    let color_line = match settings.primary_color.palette() {
        Some(palette) if use_color => format!(
            "{} {} ({})",
            settings.primary_color,
            "███".color(settings.primary_color.accent()),
            palette.base
        ),
        Some(palette) => format!("{} ({})", settings.primary_color, palette.base),
        None => settings.primary_color.to_string(),
    };

    println!("Theme:           {}", settings.theme);
    println!("Primary color:   {}", color_line);
    if let Some(palette) = settings.primary_color.palette() {
        println!(
            "                 shade {}  tint {}  contrast {} ({}, {}, {})",
            palette.shade,
            palette.tint,
            palette.contrast,
            palette.contrast_rgb.0,
            palette.contrast_rgb.1,
            palette.contrast_rgb.2
        );
    }
    println!("Font family:     {}", settings.font_family);
    println!("Font size:       {}", settings.font_size);
    println!(
        "Notifications:   {}",
        if settings.notifications_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("Data directory:  {}", settings.data_directory);
}

/// Ask user for confirmation
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}

fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "(none)".to_string()
    } else {
        tags.iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_inline_tags() {
        let words: Vec<String> = ["Buy", "milk", "#errand", "#errand", "today"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let (title, tags) = split_inline_tags(&words);
        assert_eq!(title, "Buy milk today");
        assert_eq!(tags, vec!["errand"]);
    }

    #[test]
    fn test_parse_coords() {
        assert_eq!(parse_coords("32.0853, 34.7818").unwrap(), (32.0853, 34.7818));
        assert!(parse_coords("garbage").is_err());
        assert!(parse_coords("1.0;2.0").is_err());
    }
}
