//! Theming preferences and the fixed primary-color palette
//!
//! Preferences persist through confy alongside the data-directory settings.
//! The palette carries each named color's full set of presentation values;
//! in the terminal the base value becomes the accent color of task output.

use clap::ValueEnum;
use colored::Color;
use serde::{Deserialize, Serialize};

/// Light/dark theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

/// Named primary color choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryColor {
    #[default]
    Default,
    Purple,
    Green,
    Pink,
    Orange,
}

impl std::fmt::Display for PrimaryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryColor::Default => write!(f, "default"),
            PrimaryColor::Purple => write!(f, "purple"),
            PrimaryColor::Green => write!(f, "green"),
            PrimaryColor::Pink => write!(f, "pink"),
            PrimaryColor::Orange => write!(f, "orange"),
        }
    }
}

/// Presentation values for one named primary color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: &'static str,
    pub rgb: (u8, u8, u8),
    pub contrast: &'static str,
    pub contrast_rgb: (u8, u8, u8),
    pub shade: &'static str,
    pub tint: &'static str,
}

impl PrimaryColor {
    /// The fixed palette for this color; `Default` keeps the stock palette
    pub fn palette(self) -> Option<Palette> {
        match self {
            PrimaryColor::Default => None,
            PrimaryColor::Purple => Some(Palette {
                base: "#8c54ff",
                rgb: (140, 84, 255),
                contrast: "#ffffff",
                contrast_rgb: (255, 255, 255),
                shade: "#7b4ae0",
                tint: "#9865ff",
            }),
            PrimaryColor::Green => Some(Palette {
                base: "#28ba62",
                rgb: (40, 186, 98),
                contrast: "#ffffff",
                contrast_rgb: (255, 255, 255),
                shade: "#23a356",
                tint: "#3ec172",
            }),
            PrimaryColor::Pink => Some(Palette {
                base: "#e92e7f",
                rgb: (233, 46, 127),
                contrast: "#ffffff",
                contrast_rgb: (255, 255, 255),
                shade: "#cd2870",
                tint: "#eb438b",
            }),
            PrimaryColor::Orange => Some(Palette {
                base: "#ff9f0a",
                rgb: (255, 159, 10),
                contrast: "#000000",
                contrast_rgb: (0, 0, 0),
                shade: "#e08c09",
                tint: "#ffa923",
            }),
        }
    }

    /// Accent color for terminal output
    pub fn accent(self) -> Color {
        match self.palette() {
            Some(palette) => {
                let (r, g, b) = palette.rgb;
                Color::TrueColor { r, g, b }
            }
            None => Color::Cyan,
        }
    }
}

/// Smallest selectable font size
pub const FONT_SIZE_MIN: u8 = 12;
/// Largest selectable font size
pub const FONT_SIZE_MAX: u8 = 20;

/// Persisted application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the task and reminder data files
    pub data_directory: String,
    pub task_filename: String,
    pub reminder_filename: String,
    pub theme: ThemeMode,
    pub primary_color: PrimaryColor,
    pub font_family: String,
    pub font_size: u8,
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            task_filename: "tasks.json".to_string(),
            reminder_filename: "reminders.json".to_string(),
            theme: ThemeMode::default(),
            primary_color: PrimaryColor::default(),
            font_family: "default".to_string(),
            font_size: 16,
            notifications_enabled: true,
        }
    }
}

fn default_data_directory() -> String {
    directories::ProjectDirs::from("", "", "taskmaster")
        .map(|dirs| dirs.data_dir().to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.primary_color, PrimaryColor::Default);
        assert_eq!(settings.font_size, 16);
        assert_eq!(settings.font_family, "default");
        assert!(settings.notifications_enabled);
        assert_eq!(settings.task_filename, "tasks.json");
    }

    #[test]
    fn test_palette_values() {
        let purple = PrimaryColor::Purple.palette().unwrap();
        assert_eq!(purple.base, "#8c54ff");
        assert_eq!(purple.rgb, (140, 84, 255));
        assert_eq!(purple.shade, "#7b4ae0");

        let orange = PrimaryColor::Orange.palette().unwrap();
        assert_eq!(orange.contrast, "#000000");

        assert!(PrimaryColor::Default.palette().is_none());
    }

    #[test]
    fn test_accent_color() {
        assert_eq!(
            PrimaryColor::Green.accent(),
            Color::TrueColor { r: 40, g: 186, b: 98 }
        );
        assert_eq!(PrimaryColor::Default.accent(), Color::Cyan);
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut settings = Settings::default();
        settings.theme = ThemeMode::Dark;
        settings.primary_color = PrimaryColor::Pink;

        let serialized = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, settings);
    }
}
