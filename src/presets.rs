// accentctl/src/presets.rs
// Named theme snapshots, one JSON file per preset.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
};

use crate::color::Color;
use crate::error::{Result, ThemeError};
use crate::session::Session;
use crate::theme::{ApplyReport, SecondaryColors, ThemeApplier, ThemePort, ThemeSelection, SECONDARY_SLOTS};
use crate::{info, warn, error};

const PRESET_EXT: &str = "json";

/// On-disk shape. The earliest files carry only the first two fields.
#[derive(Debug, Serialize, Deserialize)]
struct PresetRecord {
    accent_color: Option<String>,
    wallpaper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    optional_colors: Option<Vec<String>>,
}

impl PresetRecord {
    fn from_selection(primary: Color, selection: &ThemeSelection) -> Self {
        Self {
            accent_color: Some(primary.to_string()),
            wallpaper: Some(
                selection
                    .wallpaper
                    .as_deref()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default(),
            ),
            optional_colors: Some(
                selection
                    .secondary
                    .slots()
                    .iter()
                    .map(|c| c.map(|c| c.to_string()).unwrap_or_default())
                    .collect(),
            ),
        }
    }

    fn into_selection(self, name: &str) -> Result<ThemeSelection> {
        let corrupt = |reason: &str| ThemeError::CorruptPreset { name: name.to_string(), reason: reason.to_string() };
        let malformed = |value: &str| ThemeError::MalformedColor { name: name.to_string(), value: value.to_string() };

        let accent = self.accent_color.ok_or_else(|| corrupt("missing accent_color"))?;
        let wallpaper = self.wallpaper.ok_or_else(|| corrupt("missing wallpaper"))?;

        let accent = accent.trim();
        let primary = Color::parse(accent).map_err(|_| malformed(accent))?;

        let optional = self.optional_colors.unwrap_or_default();
        if optional.len() > SECONDARY_SLOTS {
            return Err(corrupt("more than five optional_colors"));
        }

        let slots = optional
            .iter()
            .map(|raw| {
                let raw = raw.trim();
                if raw.is_empty() {
                    Ok(None)
                } else {
                    Color::parse(raw).map(Some).map_err(|_| malformed(raw))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ThemeSelection::new(primary)
            .with_secondary(SecondaryColors::from_slots(slots)?)
            .with_wallpaper(wallpaper))
    }
}

/// Directory of `<name>.json` presets.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: PathBuf,
    limit: Option<usize>,
}

impl PresetStore {
    pub fn new(dir: impl Into<PathBuf>, limit: Option<usize>) -> Self {
        Self { dir: dir.into(), limit }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn preset_path(&self, name: &str) -> Result<PathBuf> {
        let name = validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{PRESET_EXT}")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.preset_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Write `selection` under `name`, replacing any preset of that name.
    pub fn save(&self, name: &str, selection: &ThemeSelection) -> Result<()> {
        let path = self.preset_path(name)?;
        let primary = selection.primary.ok_or(ThemeError::MissingAccentColor)?;

        if let Some(limit) = self.limit {
            if !path.is_file() && self.list()?.len() >= limit {
                warn!("[Presets] Refusing to save '{}': limit of {} reached", name, limit);
                return Err(ThemeError::PresetLimitReached { limit });
            }
        }

        let record = PresetRecord::from_selection(primary, selection);
        let text = serde_json::to_string_pretty(&record)
            .map_err(|e| ThemeError::CorruptPreset { name: name.to_string(), reason: e.to_string() })?;

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, text).inspect_err(|e| {
            error!("[Presets] Failed to write {}: {e}", path.display());
        })?;

        info!("[Presets] Saved preset '{}' to {}", name, path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<ThemeSelection> {
        let path = self.preset_path(name)?;
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(ThemeError::PresetNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let record: PresetRecord = serde_json::from_str(&text).map_err(|e| {
            warn!("[Presets] Failed to parse '{}': {e}", path.display());
            ThemeError::CorruptPreset { name: name.to_string(), reason: e.to_string() }
        })?;

        let selection = record.into_selection(name)?;
        info!("[Presets] Loaded preset '{}'", name);
        Ok(selection)
    }

    /// Names of every `*.json` file in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == PRESET_EXT))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.preset_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("[Presets] Deleted preset '{}'", name);
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Err(ThemeError::PresetNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Load `name`, push it through the applier, then mirror what was written
    /// into `session`. A preset that fails to load causes no OS writes; one
    /// that fails partway leaves the session showing the completed steps.
    pub fn apply<P: ThemePort>(
        &self,
        name: &str,
        applier: &mut ThemeApplier<P>,
        session: &mut Session,
    ) -> Result<ApplyReport> {
        let selection = self.load(name)?;
        let mut report = ApplyReport::default();
        let res = applier.apply_theme_into(&selection, &mut report);
        session.record_applied(&selection, &report);

        res.inspect_err(|e| warn!("[Presets] Preset '{}' only partly applied: {e}", name))?;
        info!("[Presets] Applied preset '{}'", name);
        Ok(report)
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed.contains("..")
        || trimmed.chars().any(|c| matches!(c, '/' | '\\' | ':') || c.is_control());
    if bad {
        return Err(ThemeError::InvalidPresetName(name.to_string()));
    }
    Ok(trimmed)
}
