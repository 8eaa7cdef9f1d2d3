// accentctl/src/session.rs

use std::path::PathBuf;

use crate::color::Color;
use crate::paths::display_name;
use crate::theme::{ApplyReport, ApplyStep, SecondaryColors, ThemeSelection};

/// State the front end shows: the current selection and the wallpaper label.
/// Passed explicitly into the applier and preset store instead of living in globals.
#[derive(Debug, Clone, Default)]
pub struct Session {
    selection: ThemeSelection,
}

impl Session {
    pub fn selection(&self) -> &ThemeSelection {
        &self.selection
    }

    pub fn set_primary(&mut self, color: Color) {
        self.selection.primary = Some(color);
    }

    pub fn set_secondary(&mut self, secondary: SecondaryColors) {
        self.selection.secondary = secondary;
    }

    pub fn set_wallpaper(&mut self, path: Option<PathBuf>) {
        self.selection.wallpaper = path.filter(|p| !p.as_os_str().is_empty());
    }

    /// Mirror the parts of `selection` that `report` says reached the OS.
    pub fn record_applied(&mut self, selection: &ThemeSelection, report: &ApplyReport) {
        for step in &report.steps {
            match step {
                ApplyStep::PrimaryColor(color) => self.set_primary(*color),
                ApplyStep::Palette => {
                    self.set_secondary(selection.secondary);
                    // No wallpaper step will follow.
                    if selection.wallpaper.is_none() {
                        self.set_wallpaper(None);
                    }
                }
                ApplyStep::Wallpaper(path) => self.set_wallpaper(Some(path.clone())),
                ApplyStep::ShellRestart => {}
            }
        }
    }

    pub fn wallpaper_label(&self) -> String {
        display_name(self.selection.wallpaper.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_wallpaper_clears_label() {
        let mut s = Session::default();
        s.set_wallpaper(Some(PathBuf::from("d/pic.png")));
        assert_eq!(s.wallpaper_label(), "pic.png");

        s.set_wallpaper(Some(PathBuf::new()));
        assert_eq!(s.selection().wallpaper, None);
        assert_eq!(s.wallpaper_label(), "No file selected");
    }

    #[test]
    fn setters_build_up_selection() {
        let mut s = Session::default();
        let c = Color::new(1, 2, 3);
        s.set_primary(c);
        s.set_secondary(SecondaryColors::from_slots([Some(c)]).unwrap());
        assert_eq!(s.selection().primary, Some(c));
        assert_eq!(s.selection().secondary.slots()[0], Some(c));
    }

    #[test]
    fn record_applied_skips_missing_steps() {
        let mut s = Session::default();
        s.set_wallpaper(Some(PathBuf::from("old.png")));
        let c = Color::new(9, 8, 7);
        let sel = ThemeSelection::new(c).with_wallpaper("new.png");

        let report = ApplyReport { steps: vec![ApplyStep::PrimaryColor(c)] };
        s.record_applied(&sel, &report);
        assert_eq!(s.selection().primary, Some(c));
        assert_eq!(s.wallpaper_label(), "old.png");

        let report = ApplyReport { steps: vec![ApplyStep::Palette, ApplyStep::Wallpaper(PathBuf::from("new.png"))] };
        s.record_applied(&sel, &report);
        assert_eq!(s.selection(), &sel);
    }
}
