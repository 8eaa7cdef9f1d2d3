// accentctl/src/paths.rs

use std::path::{Path, PathBuf};
use crate::{info, warn};

pub fn user_home_dir() -> Option<PathBuf> {
    // Primary (most reliable on Windows)
    if let Ok(profile) = std::env::var("USERPROFILE") {
        info!("USERPROFILE environment variable found: {}", profile);
        return Some(PathBuf::from(profile));
    }

    match dirs_next::home_dir() {
        Some(home) => {
            info!("Resolved home directory via platform lookup: {}", home.display());
            Some(home)
        }
        None => {
            warn!("Could not resolve home directory");
            None
        }
    }
}

/// Directory holding the executable; config and log live here.
pub fn app_root_dir() -> PathBuf {
    match std::env::current_exe() {
        Ok(path) => {
            if let Some(parent) = path.parent() {
                parent.to_path_buf()
            } else {
                warn!("Current executable has no parent, using current directory as app root");
                working_dir()
            }
        }
        Err(e) => {
            warn!("Failed to get current executable path: {e}, using current directory as app root");
            working_dir()
        }
    }
}

pub fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };

    match user_home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

/// Text shown for the selected wallpaper: its file name, or a placeholder.
pub fn display_name(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "No file selected".to_string())
}
