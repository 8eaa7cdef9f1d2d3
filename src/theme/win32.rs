// accentctl/src/theme/win32.rs
// Win32 port: HKCU registry writes, wallpaper, broadcasts, explorer restart.

use std::ffi::c_void;
use std::path::Path;
use std::time::Duration;

use sysinfo::System;
use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{ERROR_SUCCESS, LPARAM, WPARAM},
        System::Registry::*,
        UI::WindowsAndMessaging::*,
    },
};

use super::{PaletteRecord, ThemePort};
use crate::error::{Result, ThemeError};
use crate::{info, warn};

const ACCENT_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\Accent";
const PERSONALIZE_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";
const DWM_KEY: &str = r"Software\Microsoft\Windows\DWM";

const WM_DWMCOLORIZATIONCOLORCHANGED: u32 = 0x0320;

/// Time given to the old shell to exit before relaunching.
const SHELL_EXIT_GRACE: Duration = Duration::from_millis(750);

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}

fn set_reg_value(path: &str, name: &str, kind: REG_VALUE_TYPE, data: &[u8]) -> Result<()> {
    let location = format!(r"HKCU\{path}\{name}");
    unsafe {
        let mut key = HKEY::default();
        let path_w = to_wide(path);

        let status = RegCreateKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR(path_w.as_ptr()),
            None,
            PCWSTR::null(),
            REG_OPTION_NON_VOLATILE,
            KEY_SET_VALUE,
            None,
            &mut key,
            None,
        );

        if status != ERROR_SUCCESS {
            warn!("[Registry] Failed to create/open key '{}': {:#X}", path, status.0);
            return Err(ThemeError::config_write(location, windows::core::Error::from(status)));
        }

        let name_w = to_wide(name);
        let status = RegSetValueExW(key, PCWSTR(name_w.as_ptr()), None, kind, Some(data));

        let _ = RegCloseKey(key);

        if status != ERROR_SUCCESS {
            warn!("[Registry] Failed to set '{}' in key '{}': {:#X}", name, path, status.0);
            return Err(ThemeError::config_write(location, windows::core::Error::from(status)));
        }
    }

    info!("[Registry] Set '{}' ({} bytes) in key '{}'", name, data.len(), path);
    Ok(())
}

fn set_reg_dword(path: &str, name: &str, value: u32) -> Result<()> {
    set_reg_value(path, name, REG_DWORD, &value.to_le_bytes())
}

fn broadcast(msg: u32, lparam: LPARAM, timeout: Duration) -> bool {
    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let res = unsafe {
        SendMessageTimeoutW(
            HWND_BROADCAST,
            msg,
            WPARAM(0),
            lparam,
            SMTO_ABORTIFHUNG,
            millis,
            None,
        )
    };
    res.0 != 0
}

#[derive(Debug, Default)]
pub struct WindowsThemePort;

impl WindowsThemePort {
    pub fn new() -> Self {
        info!("[WindowsPort] Windows theme port initialized");
        Self
    }
}

impl ThemePort for WindowsThemePort {
    fn apply_primary_color(&mut self, packed: u32) -> Result<()> {
        set_reg_dword(ACCENT_KEY, "AccentColorMenu", packed)?;
        set_reg_dword(PERSONALIZE_KEY, "ColorPrevalence", 1)?;
        set_reg_dword(DWM_KEY, "ColorizationColor", packed)?;
        set_reg_dword(DWM_KEY, "ColorizationAfterglow", packed)?;
        set_reg_dword(DWM_KEY, "AccentColor", packed)
    }

    fn apply_palette(&mut self, palette: &PaletteRecord) -> Result<()> {
        set_reg_value(ACCENT_KEY, "AccentPalette", REG_BINARY, palette.as_bytes())
    }

    fn apply_wallpaper(&mut self, path: &Path) -> Result<()> {
        info!("[Wallpaper] Attempting to set wallpaper: {}", path.display());
        if !path.is_file() {
            return Err(ThemeError::WallpaperSet {
                path: path.to_path_buf(),
                reason: "file does not exist or is not readable".into(),
            });
        }

        let mut wide = to_wide(&path.to_string_lossy());
        let res = unsafe {
            SystemParametersInfoW(
                SPI_SETDESKWALLPAPER,
                0,
                Some(wide.as_mut_ptr() as *mut c_void),
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        };

        if let Err(e) = res {
            warn!("[Wallpaper] Failed to set wallpaper: {:?} (path: {})", e, path.display());
            return Err(ThemeError::WallpaperSet { path: path.to_path_buf(), reason: e.to_string() });
        }

        info!("[Wallpaper] Wallpaper set successfully");
        Ok(())
    }

    fn broadcast_settings_change(&mut self, timeout: Duration) -> Result<()> {
        // Repaint by message rather than re-setting the wallpaper with a NULL path.
        let area = to_wide("ImmersiveColorSet");
        let settings = broadcast(WM_SETTINGCHANGE, LPARAM(area.as_ptr() as isize), timeout);
        let dwm = broadcast(WM_DWMCOLORIZATIONCOLORCHANGED, LPARAM(0), timeout);

        if settings && dwm {
            info!("[WindowsPort] Settings change broadcast delivered");
            Ok(())
        } else {
            Err(ThemeError::config_write("HWND_BROADCAST", "a listener timed out or rejected the message"))
        }
    }

    fn refresh_shell(&mut self, process: &str) -> Result<()> {
        let sys = System::new_all();
        let mut failed = 0usize;

        for (pid, proc_) in sys.processes() {
            if !proc_.name().eq_ignore_ascii_case(process) {
                continue;
            }
            if proc_.kill() {
                info!("[Shell] Killed {} (pid {})", process, pid);
            } else {
                warn!("[Shell] Failed to kill {} (pid {})", process, pid);
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(ThemeError::ShellRestart {
                process: process.to_string(),
                reason: format!("{failed} process(es) could not be terminated"),
            });
        }

        std::thread::sleep(SHELL_EXIT_GRACE);

        std::process::Command::new(process).spawn().map_err(|e| ThemeError::ShellRestart {
            process: process.to_string(),
            reason: e.to_string(),
        })?;

        info!("[Shell] Relaunched {}", process);
        Ok(())
    }
}
