//! Joule entrypoint.

use anyhow::{Context, Result};
use clap::Parser;
use core_buffer::TextBuffer;
use core_editor::{Editor, EditorOptions};
use core_terminal::TerminalDriver;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "joule", version, about = "Joule editor")]
struct Args {
    /// Optional path to open at startup.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of
    /// `joule.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Log to a fresh `joule.log`: stdout carries the frame stream, so the
/// terminal is off limits for diagnostics.
fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("joule.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "joule.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // A subscriber is already installed; drop the guard so the writer
        // shuts down.
        Err(_) => None,
    }
}

/// A panicking editor must not strand the terminal in raw mode: restore
/// cooked attributes before the default hook prints the backtrace.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            core_terminal::force_cooked_mode();
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;

    let mut driver = TerminalDriver::new().context("joule must be run on a terminal")?;
    let mut guard = driver
        .raw_guard()
        .context("failed to switch the terminal into raw mode")?;

    {
        let buffer = TextBuffer::new(config.tab_stop());
        let options = EditorOptions {
            quit_confirm_presses: config.quit_confirm_presses(),
            message_timeout: config.message_timeout(),
        };
        let mut editor = Editor::new(guard.driver(), buffer, options)
            .context("terminal geometry unavailable")?;

        if let Some(path) = args.path.as_deref() {
            editor.open(path);
        }
        editor.set_status_message("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");

        editor.run()?;
    }

    guard
        .release()
        .context("failed to restore the terminal mode")?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
