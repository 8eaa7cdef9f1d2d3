// accentctl/src/theme/unsupported.rs

use std::path::Path;
use std::time::Duration;

use super::{PaletteRecord, ThemePort};
use crate::error::{Result, ThemeError};

/// Stand-in for hosts without the Windows registry. Use `--dry-run` there.
#[derive(Debug, Default)]
pub struct UnsupportedPort;

impl ThemePort for UnsupportedPort {
    fn apply_primary_color(&mut self, _packed: u32) -> Result<()> {
        Err(ThemeError::Unsupported("writing the accent color"))
    }

    fn apply_palette(&mut self, _palette: &PaletteRecord) -> Result<()> {
        Err(ThemeError::Unsupported("writing the accent palette"))
    }

    fn apply_wallpaper(&mut self, _path: &Path) -> Result<()> {
        Err(ThemeError::Unsupported("setting the wallpaper"))
    }

    fn broadcast_settings_change(&mut self, _timeout: Duration) -> Result<()> {
        Err(ThemeError::Unsupported("broadcasting setting changes"))
    }

    fn refresh_shell(&mut self, _process: &str) -> Result<()> {
        Err(ThemeError::Unsupported("restarting the shell"))
    }
}
