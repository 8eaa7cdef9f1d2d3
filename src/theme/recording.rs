// accentctl/src/theme/recording.rs
// In-memory port: keeps what a real run would have written. Backs --dry-run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{PaletteRecord, ThemePort};
use crate::error::{Result, ThemeError};
use crate::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOp {
    PrimaryColor,
    Palette,
    Wallpaper,
    Broadcast,
    ShellRestart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    PrimaryColor(u32),
    Palette(PaletteRecord),
    Wallpaper(PathBuf),
    Broadcast(Duration),
    ShellRestart(String),
}

impl PortCall {
    pub fn op(&self) -> PortOp {
        match self {
            PortCall::PrimaryColor(_) => PortOp::PrimaryColor,
            PortCall::Palette(_) => PortOp::Palette,
            PortCall::Wallpaper(_) => PortOp::Wallpaper,
            PortCall::Broadcast(_) => PortOp::Broadcast,
            PortCall::ShellRestart(_) => PortOp::ShellRestart,
        }
    }
}

impl fmt::Display for PortCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortCall::PrimaryColor(packed) => write!(
                f,
                "set AccentColorMenu, ColorizationColor, ColorizationAfterglow, AccentColor = 0x{packed:08X}; ColorPrevalence = 1"
            ),
            PortCall::Palette(p) => {
                write!(f, "set AccentPalette =")?;
                for b in p.as_bytes() {
                    write!(f, " {b:02X}")?;
                }
                Ok(())
            }
            PortCall::Wallpaper(path) => write!(f, "set desktop wallpaper = {}", path.display()),
            PortCall::Broadcast(t) => write!(f, "broadcast settings change (timeout {}ms)", t.as_millis()),
            PortCall::ShellRestart(p) => write!(f, "restart {p}"),
        }
    }
}

/// Final values as they would sit in the registry / desktop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedState {
    pub accent_packed: Option<u32>,
    pub color_prevalence: bool,
    pub palette: Option<PaletteRecord>,
    pub wallpaper: Option<PathBuf>,
    pub shell_restarts: usize,
}

impl fmt::Display for RecordedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accent_packed {
            Some(packed) => write!(f, "accent 0x{packed:08X}")?,
            None => write!(f, "accent unchanged")?,
        }
        write!(f, ", prevalence {}", if self.color_prevalence { "on" } else { "unchanged" })?;
        write!(f, ", palette {}", if self.palette.is_some() { "written" } else { "unchanged" })?;
        match &self.wallpaper {
            Some(p) => write!(f, ", wallpaper {}", p.display())?,
            None => write!(f, ", wallpaper unchanged")?,
        }
        write!(f, ", shell restarts {}", self.shell_restarts)
    }
}

#[cfg(test)]
impl RecordedState {
    /// Persistent part only, without the restart counter.
    pub fn registry_view(&self) -> (Option<u32>, bool, Option<PaletteRecord>, Option<PathBuf>) {
        (self.accent_packed, self.color_prevalence, self.palette, self.wallpaper.clone())
    }
}

#[derive(Debug, Default)]
pub struct RecordingPort {
    state: RecordedState,
    calls: Vec<PortCall>,
    fail_on: Option<PortOp>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Every call of `op` fails the way the real port would.
    pub fn failing_on(op: PortOp) -> Self {
        Self { fail_on: Some(op), ..Self::default() }
    }

    pub fn state(&self) -> &RecordedState {
        &self.state
    }

    pub fn calls(&self) -> &[PortCall] {
        &self.calls
    }

    fn record(&mut self, call: PortCall) -> Result<()> {
        info!("[DryRun] {}", call);
        let op = call.op();
        self.calls.push(call);
        if self.fail_on == Some(op) {
            return Err(injected_failure(op));
        }
        Ok(())
    }
}

fn injected_failure(op: PortOp) -> ThemeError {
    let reason = "injected failure".to_string();
    match op {
        PortOp::PrimaryColor => ThemeError::ConfigWrite { location: "AccentColorMenu".into(), reason },
        PortOp::Palette => ThemeError::ConfigWrite { location: "AccentPalette".into(), reason },
        PortOp::Wallpaper => ThemeError::WallpaperSet { path: PathBuf::new(), reason },
        PortOp::Broadcast => ThemeError::ConfigWrite { location: "WM_SETTINGCHANGE".into(), reason },
        PortOp::ShellRestart => ThemeError::ShellRestart { process: String::new(), reason },
    }
}

impl ThemePort for RecordingPort {
    fn apply_primary_color(&mut self, packed: u32) -> Result<()> {
        self.record(PortCall::PrimaryColor(packed))?;
        self.state.accent_packed = Some(packed);
        self.state.color_prevalence = true;
        Ok(())
    }

    fn apply_palette(&mut self, palette: &PaletteRecord) -> Result<()> {
        self.record(PortCall::Palette(*palette))?;
        self.state.palette = Some(*palette);
        Ok(())
    }

    fn apply_wallpaper(&mut self, path: &Path) -> Result<()> {
        self.record(PortCall::Wallpaper(path.to_path_buf()))?;
        self.state.wallpaper = Some(path.to_path_buf());
        Ok(())
    }

    fn broadcast_settings_change(&mut self, timeout: Duration) -> Result<()> {
        self.record(PortCall::Broadcast(timeout))
    }

    fn refresh_shell(&mut self, process: &str) -> Result<()> {
        self.record(PortCall::ShellRestart(process.to_string()))?;
        self.state.shell_restarts += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn failed_call_is_logged_but_not_applied() {
        let mut port = RecordingPort::failing_on(PortOp::Wallpaper);
        let err = port.apply_wallpaper(Path::new("x.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WallpaperSet);
        assert_eq!(port.calls().len(), 1);
        assert_eq!(port.state().wallpaper, None);
    }

    #[test]
    fn display_describes_registry_writes() {
        let call = PortCall::PrimaryColor(0x00d7_7800);
        assert!(call.to_string().contains("0x00D77800"));
        assert_eq!(PortCall::ShellRestart("explorer.exe".into()).to_string(), "restart explorer.exe");
    }
}
