// accentctl/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Every failure an operation can report back to the front end.
///
/// None of these are fatal to the process; the caller decides how to surface
/// them (stderr line, dialog, status bar).
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid color '{0}': expected '#' followed by 6 hex digits")]
    InvalidColorFormat(String),

    #[error("at most {max} secondary colors are supported, got {given}")]
    TooManySecondaryColors { given: usize, max: usize },

    #[error("failed to write {location}: {reason}")]
    ConfigWrite { location: String, reason: String },

    #[error("failed to set wallpaper '{}': {reason}", path.display())]
    WallpaperSet { path: PathBuf, reason: String },

    #[error("failed to restart shell process '{process}': {reason}")]
    ShellRestart { process: String, reason: String },

    #[error("preset '{name}' is corrupted: {reason}")]
    CorruptPreset { name: String, reason: String },

    #[error("select an accent color before saving a preset")]
    MissingAccentColor,

    #[error("preset '{name}' has an invalid color '{value}'")]
    MalformedColor { name: String, value: String },

    #[error("preset limit reached ({limit} presets); delete one before saving another")]
    PresetLimitReached { limit: usize },

    #[error("invalid preset name '{0}'")]
    InvalidPresetName(String),

    #[error("preset '{0}' not found")]
    PresetNotFound(String),

    #[cfg_attr(windows, allow(dead_code))]
    #[error("{0} is only supported on Windows")]
    Unsupported(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fieldless discriminant of [`ThemeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidColorFormat,
    TooManySecondaryColors,
    ConfigWrite,
    WallpaperSet,
    ShellRestart,
    CorruptPreset,
    MissingAccentColor,
    MalformedColor,
    PresetLimitReached,
    InvalidPresetName,
    PresetNotFound,
    Unsupported,
    Io,
}

impl ThemeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThemeError::InvalidColorFormat(_) => ErrorKind::InvalidColorFormat,
            ThemeError::TooManySecondaryColors { .. } => ErrorKind::TooManySecondaryColors,
            ThemeError::ConfigWrite { .. } => ErrorKind::ConfigWrite,
            ThemeError::WallpaperSet { .. } => ErrorKind::WallpaperSet,
            ThemeError::ShellRestart { .. } => ErrorKind::ShellRestart,
            ThemeError::CorruptPreset { .. } => ErrorKind::CorruptPreset,
            ThemeError::MissingAccentColor => ErrorKind::MissingAccentColor,
            ThemeError::MalformedColor { .. } => ErrorKind::MalformedColor,
            ThemeError::PresetLimitReached { .. } => ErrorKind::PresetLimitReached,
            ThemeError::InvalidPresetName(_) => ErrorKind::InvalidPresetName,
            ThemeError::PresetNotFound(_) => ErrorKind::PresetNotFound,
            ThemeError::Unsupported(_) => ErrorKind::Unsupported,
            ThemeError::Io(_) => ErrorKind::Io,
        }
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn config_write(location: impl Into<String>, reason: impl ToString) -> Self {
        ThemeError::ConfigWrite { location: location.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;
