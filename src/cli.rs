// accentctl/src/cli.rs
// Command-line front end: parses user intent and routes it to the applier
// and preset store.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::color::{Color, HOVER_DARKEN_FACTOR};
use crate::config::AppConfig;
use crate::error::{Result, ThemeError};
use crate::paths::expand_home;
use crate::presets::PresetStore;
use crate::session::Session;
use crate::swatches;
use crate::theme::{native_port, ApplyOptions, ApplyReport, ApplyStep, RecordingPort, SecondaryColors, ThemeApplier, ThemePort};
use crate::{info, warn};

/// Extensions offered by the wallpaper picker. Advisory only.
pub const WALLPAPER_EXTENSIONS: [&str; 3] = ["jpg", "png", "bmp"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Apply and manage Windows accent color / wallpaper presets")]
pub struct Cli {
    /// Write INFO lines to the log file.
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Print what would be written instead of touching the system.
    #[arg(long = "dry-run", global = true, action = ArgAction::SetTrue)]
    pub dry_run: bool,
    #[arg(long = "presets-dir", value_name = "DIR", global = true)]
    pub presets_dir: Option<PathBuf>,
    /// Skip the shell restart after applying.
    #[arg(long = "no-restart", global = true, action = ArgAction::SetTrue)]
    pub no_restart: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a color (and optionally secondaries and a wallpaper) now.
    Apply(SelectionArgs),
    /// Save, apply, inspect or remove presets.
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Show the built-in swatch grid.
    Swatches,
    /// Print the hover variant of a color.
    Darken {
        #[arg(value_parser = parse_color)]
        color: Color,
        #[arg(long, default_value_t = HOVER_DARKEN_FACTOR)]
        factor: f32,
    },
    /// Print the registry encodings of a color.
    Encode {
        #[arg(value_parser = parse_color)]
        color: Color,
    },
}

#[derive(Subcommand, Debug)]
pub enum PresetAction {
    Save {
        name: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    Apply {
        name: String,
    },
    Show {
        name: String,
    },
    List,
    Delete {
        name: String,
    },
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    #[arg(long, value_name = "HEX", value_parser = parse_color,
          conflicts_with = "swatch", required_unless_present = "swatch")]
    pub color: Option<Color>,
    /// 1-based tile number from `swatches`.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=20))]
    pub swatch: Option<u8>,
    /// Secondary color, repeatable up to five times; `none` leaves a slot unset.
    #[arg(long = "secondary", value_name = "HEX", value_parser = parse_slot, action = ArgAction::Append)]
    pub secondary: Vec<Slot>,
    #[arg(long, value_name = "PATH")]
    pub wallpaper: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Slot(Option<Color>);

fn parse_color(s: &str) -> Result<Color> {
    Color::parse(s.trim())
}

fn parse_slot(s: &str) -> Result<Slot> {
    match s.trim() {
        "" | "none" | "-" => Ok(Slot(None)),
        other => Color::parse(other).map(|c| Slot(Some(c))),
    }
}

impl SelectionArgs {
    /// Collect the picked values into the session, as the picker widgets would.
    fn fill_session(&self, session: &mut Session) -> Result<()> {
        let primary = match (self.color, self.swatch) {
            (Some(c), _) => c,
            (None, Some(n)) => swatches::by_number(usize::from(n))
                .map(|s| s.apply_color())
                .ok_or_else(|| ThemeError::InvalidColorFormat(format!("swatch {n}")))?,
            (None, None) => return Err(ThemeError::MissingAccentColor),
        };

        let secondary = SecondaryColors::from_slots(self.secondary.iter().map(|s| s.0))?;
        session.set_primary(primary);
        session.set_secondary(secondary);

        if let Some(raw) = self.wallpaper.as_deref() {
            let path = expand_home(raw.trim());
            check_wallpaper_extension(&path);
            session.set_wallpaper(Some(path));
        }
        Ok(())
    }
}

pub fn is_supported_wallpaper(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WALLPAPER_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
}

fn check_wallpaper_extension(path: &Path) {
    if !path.as_os_str().is_empty() && !is_supported_wallpaper(path) {
        warn!("Wallpaper '{}' is not a .jpg/.png/.bmp file", path.display());
        eprintln!("warning: '{}' is not a .jpg, .png or .bmp file; applying anyway", path.display());
    }
}

pub fn run_cli(cli: Cli, cfg: &AppConfig) -> Result<()> {
    let mut options = ApplyOptions::from(cfg);
    if cli.no_restart {
        options.restart_shell = false;
    }

    let presets_dir = cli.presets_dir.clone().unwrap_or_else(|| cfg.presets_dir());
    let store = PresetStore::new(presets_dir, cfg.preset_limit);
    let mut session = Session::default();
    info!("CLI parsed: {:?}", cli);

    if cli.dry_run {
        let mut applier = ThemeApplier::new(RecordingPort::new(), options);
        let res = execute(&cli.command, &store, &mut applier, &mut session);
        for call in applier.port().calls() {
            println!("[dry-run] {call}");
        }
        if !applier.port().calls().is_empty() {
            println!("[dry-run] final state: {}", applier.port().state());
        }
        res
    } else {
        let mut applier = ThemeApplier::new(native_port(), options);
        execute(&cli.command, &store, &mut applier, &mut session)
    }
}

fn execute<P: ThemePort>(
    command: &Command,
    store: &PresetStore,
    applier: &mut ThemeApplier<P>,
    session: &mut Session,
) -> Result<()> {
    match command {
        Command::Apply(args) => {
            args.fill_session(session)?;
            let report = applier.apply_theme(session.selection())?;
            print_report(&report, session);
        }
        Command::Preset { action } => preset_command(action, store, applier, session)?,
        Command::Swatches => {
            for s in swatches::all() {
                let (row, col) = s.grid_position();
                println!(
                    "{:>2}  [{},{}]  {}  applies {}  hover {}",
                    s.index + 1, row, col, s.display, s.apply_color(), s.hover_color()
                );
            }
        }
        Command::Darken { color, factor } => println!("{}", color.darken(*factor)),
        Command::Encode { color } => {
            let palette = color.to_palette_bytes(applier.options().palette_alpha);
            println!("rgb:     0x{:08X}", color.to_rgb_value());
            println!("packed:  0x{:08X}", color.to_packed_value());
            println!("palette: {:02X} {:02X} {:02X} {:02X}", palette[0], palette[1], palette[2], palette[3]);
        }
    }
    Ok(())
}

fn preset_command<P: ThemePort>(
    action: &PresetAction,
    store: &PresetStore,
    applier: &mut ThemeApplier<P>,
    session: &mut Session,
) -> Result<()> {
    match action {
        PresetAction::Save { name, selection } => {
            selection.fill_session(session)?;
            let existed = store.contains(name);
            store.save(name, session.selection())?;
            let verb = if existed { "overwritten" } else { "saved" };
            println!("Preset '{}' {} in {}", name.trim(), verb, store.dir().display());
        }
        PresetAction::Apply { name } => {
            let report = store.apply(name, applier, session)?;
            println!("Applied preset '{}'", name.trim());
            print_report(&report, session);
        }
        PresetAction::Show { name } => {
            let sel = store.load(name)?;
            let primary = sel.primary.map(|c| c.to_string()).unwrap_or_default();
            println!("accent:    {primary}");
            for (i, slot) in sel.secondary.slots().iter().enumerate() {
                match slot {
                    Some(c) => println!("secondary {}: {c}", i + 1),
                    None => println!("secondary {}: -", i + 1),
                }
            }
            let wallpaper = sel.wallpaper.as_deref().map(|p| p.display().to_string()).unwrap_or_default();
            println!("wallpaper: {wallpaper}");
        }
        PresetAction::List => {
            let names = store.list()?;
            if names.is_empty() {
                info!("No presets found in {}", store.dir().display());
                println!("No presets in {}", store.dir().display());
            }
            for (idx, name) in names.iter().enumerate() {
                println!(" {}. {}", idx + 1, name);
            }
            if let Some(limit) = store.limit() {
                println!("({}/{} slots used)", names.len(), limit);
            }
        }
        PresetAction::Delete { name } => {
            store.delete(name)?;
            println!("Deleted preset '{}'", name.trim());
        }
    }
    Ok(())
}

fn print_report(report: &ApplyReport, session: &Session) {
    for step in &report.steps {
        match step {
            ApplyStep::PrimaryColor(c) => println!("Applied color: {}", c.to_string().to_uppercase()),
            ApplyStep::Palette => println!("Applied accent palette"),
            ApplyStep::Wallpaper(_) => println!("Applied wallpaper: {}", session.wallpaper_label()),
            ApplyStep::ShellRestart => println!("Restarted shell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::theme::ThemeSelection;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("accentctl").chain(args.iter().copied())).unwrap()
    }

    fn selection_of(cli: &Cli) -> Result<ThemeSelection> {
        let mut session = Session::default();
        match &cli.command {
            Command::Apply(args) | Command::Preset { action: PresetAction::Save { selection: args, .. } } => {
                args.fill_session(&mut session)?
            }
            other => panic!("unexpected command {other:?}"),
        }
        Ok(session.selection().clone())
    }

    #[test]
    fn apply_with_color_and_secondaries() {
        let cli = parse(&["apply", "--color", "#0078D7", "--secondary", "#ffffff", "--secondary", "none", "--secondary", "#000000"]);
        let sel = selection_of(&cli).unwrap();
        assert_eq!(sel.primary, Some(Color::new(0x00, 0x78, 0xd7)));
        assert_eq!(sel.secondary.slots(), &[Some(Color::new(255, 255, 255)), None, Some(Color::new(0, 0, 0)), None, None]);
        assert_eq!(sel.wallpaper, None);
    }

    #[test]
    fn swatch_applies_reversed_color() {
        let cli = parse(&["preset", "save", "mine", "--swatch", "1"]);
        assert_eq!(selection_of(&cli).unwrap().primary, Some(Color::new(0x50, 0x50, 0xf2)));
    }

    #[test]
    fn rejects_bad_input() {
        let argv = |a: &[&str]| Cli::try_parse_from(std::iter::once("accentctl").chain(a.iter().copied()));
        assert!(argv(&["apply", "--color", "123456"]).is_err());
        assert!(argv(&["apply"]).is_err());
        assert!(argv(&["apply", "--color", "#000000", "--swatch", "2"]).is_err());
        assert!(argv(&["apply", "--swatch", "21"]).is_err());
    }

    #[test]
    fn too_many_secondaries() {
        let mut args = vec!["apply", "--color", "#000000"];
        for _ in 0..6 {
            args.extend(["--secondary", "#111111"]);
        }
        let err = selection_of(&parse(&args)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooManySecondaryColors);
    }

    #[test]
    fn wallpaper_extension_check_is_case_insensitive() {
        assert!(is_supported_wallpaper(Path::new("a/b.JPG")));
        assert!(is_supported_wallpaper(Path::new("b.bmp")));
        assert!(!is_supported_wallpaper(Path::new("b.gif")));
        assert!(!is_supported_wallpaper(Path::new("noext")));
    }

    #[test]
    fn dry_run_save_and_apply_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig { presets_dir: Some(dir.path().to_path_buf()), ..AppConfig::default() };

        run_cli(parse(&["--dry-run", "preset", "save", "work", "--color", "#112233", "--wallpaper", "w.png"]), &cfg).unwrap();
        run_cli(parse(&["--dry-run", "preset", "apply", "work"]), &cfg).unwrap();

        let store = PresetStore::new(dir.path(), cfg.preset_limit);
        let sel = store.load("work").unwrap();
        assert_eq!(sel.primary, Some(Color::new(0x11, 0x22, 0x33)));
        assert_eq!(sel.wallpaper, Some(PathBuf::from("w.png")));
    }

    #[test]
    fn missing_preset_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig { presets_dir: Some(dir.path().to_path_buf()), ..AppConfig::default() };
        let err = run_cli(parse(&["--dry-run", "preset", "apply", "nope"]), &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PresetNotFound);
    }
}
