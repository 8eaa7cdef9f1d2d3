// accentctl/src/config.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::paths::{app_root_dir, working_dir};

/// What palette slots 0..5 receive when the matching secondary color is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnsetPaletteEntry {
    /// `[0, 0, 0, 0]`
    #[default]
    Transparent,
    /// The primary color's palette entry.
    Primary,
}

/// Settings persisted in config.yaml next to the executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fourth byte of every AccentPalette entry. Builds have shipped both
    /// 0xFF and 0xAA; pending confirmation, 0xFF is the default.
    pub palette_alpha: u8,

    /// Maximum number of stored presets, `null` for no limit.
    pub preset_limit: Option<usize>,

    /// Where preset files live. Defaults to the working directory.
    pub presets_dir: Option<PathBuf>,

    /// Upper bound for each settings-change broadcast.
    pub broadcast_timeout_ms: u32,

    /// Process killed and relaunched to make registry changes visible.
    pub shell_process: String,

    pub restart_shell: bool,

    pub unset_palette_entry: UnsetPaletteEntry,

    pub log_file: Option<PathBuf>,

    pub debug: bool,
}

pub const DEFAULT_PRESET_LIMIT: usize = 12;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette_alpha: 0xFF,
            preset_limit: Some(DEFAULT_PRESET_LIMIT),
            presets_dir: None,
            broadcast_timeout_ms: 1000,
            shell_process: "explorer.exe".to_string(),
            restart_shell: true,
            unset_palette_entry: UnsetPaletteEntry::default(),
            log_file: None,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn presets_dir(&self) -> PathBuf {
        self.presets_dir.clone().unwrap_or_else(working_dir)
    }
}

pub fn config_path() -> PathBuf {
    app_root_dir().join("config.yaml")
}

/// Config plus anything that went wrong reading it. Loading runs before the
/// log sink exists, so problems are handed back for the caller to report.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warnings: Vec<String>,
}

/// Load config.yaml from disk (or create defaults). Call once at startup.
pub fn load_config() -> LoadedConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> LoadedConfig {
    let mut warnings = Vec::new();

    if !path.exists() {
        let defaults = AppConfig::default();
        if let Err(e) = save_config_to_disk(path, &defaults) {
            warnings.push(e);
        }
        return LoadedConfig { config: defaults, warnings };
    }

    let config = match std::fs::read_to_string(path) {
        Ok(text) => serde_yaml::from_str::<AppConfig>(&text).unwrap_or_else(|e| {
            warnings.push(format!("Failed to parse {}, using defaults: {e}", path.display()));
            AppConfig::default()
        }),
        Err(e) => {
            warnings.push(format!("Failed to read {}, using defaults: {e}", path.display()));
            AppConfig::default()
        }
    };
    LoadedConfig { config, warnings }
}

fn save_config_to_disk(path: &Path, cfg: &AppConfig) -> Result<(), String> {
    let text = serde_yaml::to_string(cfg).map_err(|e| format!("Failed to serialize config: {e}"))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let loaded = load_config_from(&path);
        assert_eq!(loaded.config, AppConfig::default());
        assert!(loaded.warnings.is_empty());
        assert!(path.exists());
        assert_eq!(load_config_from(&path).config, loaded.config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "palette_alpha: 170\npreset_limit: null\nunset_palette_entry: primary\n").unwrap();

        let cfg = load_config_from(&path).config;
        assert_eq!(cfg.palette_alpha, 0xAA);
        assert_eq!(cfg.preset_limit, None);
        assert_eq!(cfg.unset_palette_entry, UnsetPaletteEntry::Primary);
        assert_eq!(cfg.broadcast_timeout_ms, 1000);
        assert_eq!(cfg.shell_process, "explorer.exe");
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "palette_alpha: [not, a, byte]\n").unwrap();

        let loaded = load_config_from(&path);
        assert_eq!(loaded.config, AppConfig::default());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("Failed to parse"));
    }

    #[test]
    fn unwritable_location_reports_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.yaml");

        let loaded = load_config_from(&path);
        assert_eq!(loaded.config, AppConfig::default());
        assert!(loaded.warnings[0].starts_with("Failed to write"));
    }
}
