// accentctl/src/theme/mod.rs
// Accent color, palette and wallpaper application through a platform port.

pub mod recording;
#[cfg(windows)]
pub mod win32;
#[cfg(not(windows))]
pub mod unsupported;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::Color;
use crate::config::{AppConfig, UnsetPaletteEntry};
use crate::error::{Result, ThemeError};
use crate::{info, warn, error};

pub use recording::RecordingPort;

pub const SECONDARY_SLOTS: usize = 5;
pub const PALETTE_ENTRIES: usize = 8;
pub const TRANSPARENT_ENTRY: [u8; 4] = [0, 0, 0, 0];

/// Up to five optional secondary colors, always stored padded to five slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecondaryColors([Option<Color>; SECONDARY_SLOTS]);

impl SecondaryColors {
    /// Fill slots in order, leaving the rest unset.
    pub fn from_slots<I>(slots: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<Color>>,
    {
        let slots: Vec<Option<Color>> = slots.into_iter().collect();
        if slots.len() > SECONDARY_SLOTS {
            return Err(ThemeError::TooManySecondaryColors { given: slots.len(), max: SECONDARY_SLOTS });
        }

        let mut out = [None; SECONDARY_SLOTS];
        for (dst, src) in out.iter_mut().zip(slots) {
            *dst = src;
        }
        Ok(Self(out))
    }

    pub fn slots(&self) -> &[Option<Color>; SECONDARY_SLOTS] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// What the user currently has picked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeSelection {
    pub primary: Option<Color>,
    pub secondary: SecondaryColors,
    pub wallpaper: Option<PathBuf>,
}

impl ThemeSelection {
    pub fn new(primary: Color) -> Self {
        Self { primary: Some(primary), ..Self::default() }
    }

    pub fn with_secondary(mut self, secondary: SecondaryColors) -> Self {
        self.secondary = secondary;
        self
    }

    /// An empty path means no wallpaper.
    pub fn with_wallpaper(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.wallpaper = (!path.as_os_str().is_empty()).then_some(path);
        self
    }
}

/// The 32-byte `AccentPalette` blob: 8 entries of B, G, R, A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteRecord([u8; PALETTE_ENTRIES * 4]);

impl PaletteRecord {
    /// Entries 0..5 come from the secondary colors, 5..8 repeat the primary.
    pub fn build(primary: Color, secondary: &SecondaryColors, alpha: u8, unset: UnsetPaletteEntry) -> Self {
        let primary_entry = primary.to_palette_bytes(alpha);
        let unset_entry = match unset {
            UnsetPaletteEntry::Transparent => TRANSPARENT_ENTRY,
            UnsetPaletteEntry::Primary => primary_entry,
        };

        let mut bytes = [0u8; PALETTE_ENTRIES * 4];
        for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
            let entry = match secondary.slots().get(i) {
                Some(Some(color)) => color.to_palette_bytes(alpha),
                Some(None) => unset_entry,
                None => primary_entry,
            };
            chunk.copy_from_slice(&entry);
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[cfg(test)]
    pub fn entry(&self, index: usize) -> Option<[u8; 4]> {
        self.0.chunks_exact(4).nth(index).map(|c| [c[0], c[1], c[2], c[3]])
    }
}

/// Narrow boundary over the OS configuration surface.
pub trait ThemePort {
    /// Write the packed accent value to every single-color field.
    fn apply_primary_color(&mut self, packed: u32) -> Result<()>;

    /// One write of the whole palette blob.
    fn apply_palette(&mut self, palette: &PaletteRecord) -> Result<()>;

    fn apply_wallpaper(&mut self, path: &Path) -> Result<()>;

    /// Notify top-level windows that theme settings changed. Hung listeners
    /// are abandoned after `timeout`.
    fn broadcast_settings_change(&mut self, timeout: Duration) -> Result<()>;

    /// Kill and relaunch the desktop shell.
    fn refresh_shell(&mut self, process: &str) -> Result<()>;
}

impl<P: ThemePort + ?Sized> ThemePort for &mut P {
    fn apply_primary_color(&mut self, packed: u32) -> Result<()> {
        (**self).apply_primary_color(packed)
    }

    fn apply_palette(&mut self, palette: &PaletteRecord) -> Result<()> {
        (**self).apply_palette(palette)
    }

    fn apply_wallpaper(&mut self, path: &Path) -> Result<()> {
        (**self).apply_wallpaper(path)
    }

    fn broadcast_settings_change(&mut self, timeout: Duration) -> Result<()> {
        (**self).broadcast_settings_change(timeout)
    }

    fn refresh_shell(&mut self, process: &str) -> Result<()> {
        (**self).refresh_shell(process)
    }
}

impl ThemePort for Box<dyn ThemePort> {
    fn apply_primary_color(&mut self, packed: u32) -> Result<()> {
        (**self).apply_primary_color(packed)
    }

    fn apply_palette(&mut self, palette: &PaletteRecord) -> Result<()> {
        (**self).apply_palette(palette)
    }

    fn apply_wallpaper(&mut self, path: &Path) -> Result<()> {
        (**self).apply_wallpaper(path)
    }

    fn broadcast_settings_change(&mut self, timeout: Duration) -> Result<()> {
        (**self).broadcast_settings_change(timeout)
    }

    fn refresh_shell(&mut self, process: &str) -> Result<()> {
        (**self).refresh_shell(process)
    }
}

/// Port for the host the binary runs on.
pub fn native_port() -> Box<dyn ThemePort> {
    #[cfg(windows)]
    {
        Box::new(win32::WindowsThemePort::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(unsupported::UnsupportedPort)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    pub palette_alpha: u8,
    pub unset_palette_entry: UnsetPaletteEntry,
    pub broadcast_timeout: Duration,
    pub shell_process: String,
    pub restart_shell: bool,
}

impl From<&AppConfig> for ApplyOptions {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            palette_alpha: cfg.palette_alpha,
            unset_palette_entry: cfg.unset_palette_entry,
            broadcast_timeout: Duration::from_millis(u64::from(cfg.broadcast_timeout_ms)),
            shell_process: cfg.shell_process.clone(),
            restart_shell: cfg.restart_shell,
        }
    }
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyStep {
    PrimaryColor(Color),
    Palette,
    Wallpaper(PathBuf),
    ShellRestart,
}

/// Steps `apply_theme` completed, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub steps: Vec<ApplyStep>,
}

pub struct ThemeApplier<P: ThemePort> {
    port: P,
    options: ApplyOptions,
}

impl<P: ThemePort> ThemeApplier<P> {
    pub fn new(port: P, options: ApplyOptions) -> Self {
        Self { port, options }
    }

    pub fn options(&self) -> &ApplyOptions {
        &self.options
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn apply_primary_color(&mut self, color: Color) -> Result<()> {
        let packed = color.to_packed_value();
        info!("[Theme] Applying accent color {} (packed 0x{:08X})", color, packed);

        self.port.apply_primary_color(packed).inspect_err(|e| {
            error!("[Theme] Accent color write failed: {e}");
        })?;

        // Listeners that ignore the broadcast still pick the change up on shell restart.
        if let Err(e) = self.port.broadcast_settings_change(self.options.broadcast_timeout) {
            warn!("[Theme] Settings-change broadcast incomplete: {e}");
        }
        Ok(())
    }

    pub fn apply_palette(&mut self, primary: Color, secondary: &SecondaryColors) -> Result<()> {
        let palette = PaletteRecord::build(
            primary,
            secondary,
            self.options.palette_alpha,
            self.options.unset_palette_entry,
        );
        if secondary.is_empty() {
            info!("[Theme] Applying accent palette for {} (no secondary colors)", primary);
        } else {
            info!("[Theme] Applying accent palette for {} ({} secondary set)",
                primary,
                secondary.slots().iter().filter(|s| s.is_some()).count());
        }

        self.port.apply_palette(&palette).inspect_err(|e| {
            error!("[Theme] Accent palette write failed: {e}");
        })
    }

    pub fn apply_wallpaper(&mut self, path: &Path) -> Result<()> {
        info!("[Theme] Applying wallpaper {}", path.display());
        self.port.apply_wallpaper(path).inspect_err(|e| {
            error!("[Theme] Wallpaper failed: {e}");
        })
    }

    pub fn refresh_shell(&mut self) -> Result<()> {
        info!("[Theme] Restarting shell process {}", self.options.shell_process);
        self.port.refresh_shell(&self.options.shell_process).inspect_err(|e| {
            error!("[Theme] Shell restart failed: {e}");
        })
    }

    /// Primary color, palette, wallpaper (if any), then shell restart.
    /// Stops at the first failure; earlier writes stay in place.
    pub fn apply_theme(&mut self, selection: &ThemeSelection) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        self.apply_theme_into(selection, &mut report)?;
        Ok(report)
    }

    /// Same as [`apply_theme`](Self::apply_theme), but `report` keeps the
    /// completed steps when a later one fails.
    pub fn apply_theme_into(&mut self, selection: &ThemeSelection, report: &mut ApplyReport) -> Result<()> {
        let primary = selection.primary.ok_or(ThemeError::MissingAccentColor)?;

        self.apply_primary_color(primary)?;
        report.steps.push(ApplyStep::PrimaryColor(primary));

        self.apply_palette(primary, &selection.secondary)?;
        report.steps.push(ApplyStep::Palette);

        if let Some(path) = &selection.wallpaper {
            self.apply_wallpaper(path)?;
            report.steps.push(ApplyStep::Wallpaper(path.clone()));
        }

        if self.options.restart_shell {
            self.refresh_shell()?;
            report.steps.push(ApplyStep::ShellRestart);
        } else {
            info!("[Theme] Shell restart disabled, changes may need a sign-out to show");
        }

        info!("[Theme] Applied theme {} in {} steps", primary, report.steps.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::theme::recording::{PortCall, PortOp};

    fn color(s: &str) -> Color {
        Color::parse(s).unwrap()
    }

    fn applier() -> ThemeApplier<RecordingPort> {
        ThemeApplier::new(RecordingPort::default(), ApplyOptions::default())
    }

    #[test]
    fn secondary_colors_pad_to_five() {
        let s = SecondaryColors::from_slots([Some(color("#010203")), None]).unwrap();
        assert_eq!(s.slots(), &[Some(color("#010203")), None, None, None, None]);
        assert!(SecondaryColors::default().is_empty());

        let err = SecondaryColors::from_slots(vec![None; 6]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManySecondaryColors);
    }

    #[test]
    fn palette_layout_secondaries_then_primary() {
        let primary = color("#102030");
        let secondary = SecondaryColors::from_slots([Some(color("#aabbcc")), None, Some(color("#000001"))]).unwrap();
        let p = PaletteRecord::build(primary, &secondary, 0xFF, UnsetPaletteEntry::Transparent);

        assert_eq!(p.as_bytes().len(), 32);
        assert_eq!(p.entry(0), Some([0xcc, 0xbb, 0xaa, 0xFF]));
        assert_eq!(p.entry(1), Some(TRANSPARENT_ENTRY));
        assert_eq!(p.entry(2), Some([0x01, 0x00, 0x00, 0xFF]));
        assert_eq!(p.entry(4), Some(TRANSPARENT_ENTRY));
        for i in 5..8 {
            assert_eq!(p.entry(i), Some([0x30, 0x20, 0x10, 0xFF]));
        }
        assert_eq!(p.entry(8), None);
    }

    #[test]
    fn palette_primary_fill_repeats_primary_eight_times() {
        let primary = color("#102030");
        let p = PaletteRecord::build(primary, &SecondaryColors::default(), 0xAA, UnsetPaletteEntry::Primary);
        assert_eq!(p.as_bytes(), [0x30, 0x20, 0x10, 0xAA].repeat(8).as_slice());
    }

    #[test]
    fn apply_theme_runs_steps_in_order() {
        let mut a = applier();
        let sel = ThemeSelection::new(color("#0078d7")).with_wallpaper("C:/walls/a.png");

        let report = a.apply_theme(&sel).unwrap();
        assert_eq!(report.steps, vec![
            ApplyStep::PrimaryColor(color("#0078d7")),
            ApplyStep::Palette,
            ApplyStep::Wallpaper(PathBuf::from("C:/walls/a.png")),
            ApplyStep::ShellRestart,
        ]);

        let ops: Vec<PortOp> = a.port().calls().iter().map(PortCall::op).collect();
        assert_eq!(ops, vec![
            PortOp::PrimaryColor,
            PortOp::Broadcast,
            PortOp::Palette,
            PortOp::Wallpaper,
            PortOp::ShellRestart,
        ]);
        assert_eq!(a.port().state().accent_packed, Some(0x00d7_7800));
        assert!(matches!(a.port().calls()[1], PortCall::Broadcast(t) if t == Duration::from_millis(1000)));
    }

    #[test]
    fn apply_theme_without_wallpaper_skips_that_step() {
        let mut a = applier();
        let report = a.apply_theme(&ThemeSelection::new(color("#000000"))).unwrap();
        assert!(!report.steps.iter().any(|s| matches!(s, ApplyStep::Wallpaper(_))));
        assert_eq!(a.port().state().wallpaper, None);
    }

    #[test]
    fn apply_theme_requires_primary() {
        let mut a = applier();
        let err = a.apply_theme(&ThemeSelection::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAccentColor);
        assert!(a.port().calls().is_empty());
    }

    #[test]
    fn apply_theme_into_keeps_completed_steps() {
        let mut a = ThemeApplier::new(RecordingPort::failing_on(PortOp::Wallpaper), ApplyOptions::default());
        let sel = ThemeSelection::new(color("#123456")).with_wallpaper("w.jpg");

        let mut report = ApplyReport::default();
        let err = a.apply_theme_into(&sel, &mut report).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WallpaperSet);
        assert_eq!(report.steps, vec![ApplyStep::PrimaryColor(color("#123456")), ApplyStep::Palette]);
    }

    #[test]
    fn failure_aborts_remaining_steps_without_rollback() {
        let mut a = ThemeApplier::new(RecordingPort::failing_on(PortOp::Palette), ApplyOptions::default());
        let sel = ThemeSelection::new(color("#123456")).with_wallpaper("w.jpg");

        let err = a.apply_theme(&sel).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigWrite);
        // Primary color stays written.
        assert_eq!(a.port().state().accent_packed, Some(color("#123456").to_packed_value()));
        assert_eq!(a.port().state().palette, None);
        assert_eq!(a.port().state().wallpaper, None);
        assert_eq!(a.port().state().shell_restarts, 0);
    }

    #[test]
    fn broadcast_failure_is_not_fatal() {
        let mut a = ThemeApplier::new(RecordingPort::failing_on(PortOp::Broadcast), ApplyOptions::default());
        assert!(a.apply_theme(&ThemeSelection::new(color("#123456"))).is_ok());
    }

    #[test]
    fn shell_restart_failure_surfaces() {
        let mut a = ThemeApplier::new(RecordingPort::failing_on(PortOp::ShellRestart), ApplyOptions::default());
        let err = a.apply_theme(&ThemeSelection::new(color("#123456"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShellRestart);
    }

    #[test]
    fn restart_can_be_disabled() {
        let options = ApplyOptions { restart_shell: false, ..ApplyOptions::default() };
        let mut a = ThemeApplier::new(RecordingPort::default(), options);
        let report = a.apply_theme(&ThemeSelection::new(color("#123456"))).unwrap();
        assert!(!report.steps.contains(&ApplyStep::ShellRestart));
        assert_eq!(a.port().state().shell_restarts, 0);
    }

    #[test]
    fn apply_theme_is_idempotent() {
        let sel = ThemeSelection::new(color("#3a96dd"))
            .with_secondary(SecondaryColors::from_slots([Some(color("#ffffff"))]).unwrap())
            .with_wallpaper("walls/b.bmp");

        let mut a = applier();
        a.apply_theme(&sel).unwrap();
        let first = a.port().state().registry_view();
        a.apply_theme(&sel).unwrap();
        assert_eq!(a.port().state().registry_view(), first);
    }

    #[test]
    fn applier_works_through_a_borrowed_port() {
        let mut port = RecordingPort::default();
        {
            let mut a = ThemeApplier::new(&mut port, ApplyOptions::default());
            a.apply_primary_color(color("#010203")).unwrap();
        }
        assert_eq!(port.state().accent_packed, Some(0x0003_0201));
    }
}
