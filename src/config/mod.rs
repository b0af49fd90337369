use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration (stored in ~/.config/kancli/)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Board database location; defaults to the platform data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log filter used when KANCLI_LOG is not set (e.g. "info", "kancli=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// UI theme/colors
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: default_log_level(),
            theme: ThemeConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Theme configuration with hex colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Border color of the focused column (hex, e.g. "#7571F9")
    #[serde(default = "default_color_focused")]
    pub color_focused: String,

    /// Border color of unfocused columns
    #[serde(default = "default_color_normal")]
    pub color_normal: String,

    /// Text color for task titles
    #[serde(default = "default_color_text")]
    pub color_text: String,

    /// Color for task descriptions
    #[serde(default = "default_color_description")]
    pub color_description: String,

    /// Highlight for the selected task
    #[serde(default = "default_color_selected")]
    pub color_selected: String,

    /// Color for the help bar and notices
    #[serde(default = "default_color_help")]
    pub color_help: String,

    /// Border color of the new-task form
    #[serde(default = "default_color_popup_border")]
    pub color_popup_border: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_focused: default_color_focused(),
            color_normal: default_color_normal(),
            color_text: default_color_text(),
            color_description: default_color_description(),
            color_selected: default_color_selected(),
            color_help: default_color_help(),
            color_popup_border: default_color_popup_border(),
        }
    }
}

fn default_color_focused() -> String {
    "#5f5fd7".to_string() // Slate Blue
}

fn default_color_normal() -> String {
    "#3a3a3a".to_string() // Dark Gray
}

fn default_color_text() -> String {
    "#f2ece6".to_string() // Light Rose
}

fn default_color_description() -> String {
    "#9c9991".to_string()
}

fn default_color_selected() -> String {
    "#ee6ff8".to_string() // Pink
}

fn default_color_help() -> String {
    "#626262".to_string()
}

fn default_color_popup_border() -> String {
    "#ff75b7".to_string()
}

impl ThemeConfig {
    /// Parse a hex color string to RGB tuple
    pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

impl GlobalConfig {
    /// Load global config from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from an explicit file; a missing file yields defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            toml::from_str(&content).context("Failed to parse global config")
        } else {
            Ok(Self::default())
        }
    }

    /// Save global config to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the path to the global config file
    /// Always uses ~/.config/kancli/ on all platforms
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("kancli").join("config.toml"))
    }

    /// Get the path to the global data directory
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "kancli")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Directory receiving the log file
    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("logs"))
    }

    /// Pick the database file: command line first, then config, then the data directory
    pub fn resolve_database_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        Ok(Self::data_dir()?.join("kancli.db"))
    }
}
