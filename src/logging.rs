// accentctl/src/logging.rs

use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender},
        Mutex,
    },
    thread::{self, JoinHandle},
};

/* =========================
   GLOBAL STATE
   ========================= */

static ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_TX: Mutex<Option<Sender<String>>> = Mutex::new(None);
static WRITER: Mutex<Option<JoinHandle<()>>> = Mutex::new(None);

/* =========================
   PUBLIC API
   ========================= */

/// Start the background writer. `debug` gates `info!`; warnings and errors
/// are always written once the sink exists.
pub fn init(debug: bool, path: PathBuf) {
    let Ok(mut sink) = LOG_TX.lock() else { return };
    if sink.is_some() {
        drop(sink);
        enqueue("WARN", "logging::init() called more than once, keeping first sink".into());
        return;
    }
    ENABLED.store(debug, Ordering::Relaxed);

    let (tx, rx) = mpsc::channel::<String>();
    *sink = Some(tx);

    let handle = thread::spawn(move || {
        let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("accentctl: cannot open log file {}: {e}", path.display());
                return;
            }
        };

        while let Ok(line) = rx.recv() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    });

    if let Ok(mut writer) = WRITER.lock() {
        *writer = Some(handle);
    }
}

/// Close the sink and wait until every queued line is on disk.
/// Must run before `process::exit`, which does not wait for the writer.
pub fn shutdown() {
    if let Ok(mut sink) = LOG_TX.lock() {
        sink.take();
    }
    let handle = WRITER.lock().ok().and_then(|mut w| w.take());
    if let Some(handle) = handle {
        let _ = handle.join();
    }
}

#[inline]
pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Default log location: next to the executable.
pub fn default_log_path() -> PathBuf {
    crate::paths::app_root_dir().join("accentctl.log")
}

/* =========================
   INTERNAL
   ========================= */

#[inline]
pub fn enqueue(level: &str, msg: String) {
    if let Ok(sink) = LOG_TX.lock() {
        if let Some(tx) = sink.as_ref() {
            let ts = timestamp();
            let _ = tx.send(format!("{ts} [{level}] {msg}"));
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/* =========================
   MACROS
   ========================= */

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::enabled() {
            $crate::logging::enqueue(
                "INFO",
                format!($($arg)*)
            );
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "WARN",
            format!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "ERROR",
            format!($($arg)*)
        );
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only test that installs the global sink.
    #[test]
    fn shutdown_flushes_queued_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accentctl.log");

        init(true, path.clone());
        crate::info!("writer up at {}", path.display());
        crate::warn!("last words before exit");
        shutdown();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[INFO] writer up at"));
        assert!(text.contains("[WARN] last words before exit"));

        // Sink is gone; later lines are dropped instead of blocking.
        crate::error!("after shutdown");
        shutdown();
        assert!(!std::fs::read_to_string(&path).unwrap().contains("after shutdown"));
    }
}
