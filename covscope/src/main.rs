//! covscope: terminal explorer for coverage reports.
//!
//! Entry point for the `covscope` binary. Wires together the CLI and config
//! (`cli`, `config`), file logging (`logging`), the terminal lifecycle (`tui`),
//! the unified event bus (`event`) and the renderer (`ui`) around the
//! `covscope-core` view controller.
//!
//! # Startup sequence
//!
//! 1. Parse the CLI, install file logging, read the config file.
//! 2. Load the report. Failure here exits before the terminal is touched.
//! 3. Open the preference store, build the controller and run its first render.
//! 4. `install_panic_hook()`, `register_sigterm()`, then `init_tui()`.
//! 5. Spawn the event task and run the loop.
//!
//! `restore_tui()` runs once after the loop exits (quit key, SIGTERM or channel
//! close). Inside the loop only the Render arm can fail; its error is carried
//! out of the loop so restoration still happens.

mod app;
mod cli;
mod config;
mod event;
mod highlight;
mod logging;
mod surface;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use covscope_core::controller::{ViewController, ViewInput};
use covscope_core::db::SqlitePreferences;
use covscope_core::history::SessionHistory;
use covscope_core::prefs::{MemoryPreferences, PreferenceStore};
use covscope_core::report::load_report;

use crate::app::App;
use crate::cli::Cli;
use crate::config::Config;
use crate::event::AppEvent;
use crate::surface::TuiSurface;
use crate::ui::keybindings::{self, KeyAction};

type Controller = ViewController<TuiSurface, SessionHistory, Box<dyn PreferenceStore>>;

/// Heartbeat that bounds SIGTERM latency when no other events arrive.
const HEARTBEAT: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| config::state_dir().join("covscope.log"));
    logging::init_tracing(&log_path)?;

    let config = Config::load();
    let report = load_report(&cli.report)
        .with_context(|| format!("loading coverage report {}", cli.report.display()))?;
    let defaults = config.view_defaults(&report.config, cli.no_syntax);
    let prefs = open_prefs(&cli, &config);

    let mut controller: Controller = ViewController::new(
        report,
        defaults,
        TuiSurface::default(),
        SessionHistory::new(cli.location.clone()),
        prefs,
    );
    controller.start();

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initialising terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;
    let mut app = App::default();

    let outcome = run_loop(&mut terminal, &mut rx, &mut app, &mut controller, &term_flag).await;

    tui::restore_tui().context("restoring terminal")?;
    outcome?;

    if let Some(location) = controller.current_location() {
        println!("#{location}");
    }
    tracing::info!("covscope exiting");
    Ok(())
}

/// Picks the preference store: SQLite unless `--no-persist`, with an
/// in-memory fallback when the database cannot be opened.
fn open_prefs(cli: &Cli, config: &Config) -> Box<dyn PreferenceStore> {
    if cli.no_persist {
        return Box::new(MemoryPreferences::default());
    }
    let path: PathBuf = cli
        .prefs
        .clone()
        .or_else(|| config.prefs_path.clone())
        .unwrap_or_else(|| config::state_dir().join("prefs.db"));
    match SqlitePreferences::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "preferences not persisted");
            Box::new(MemoryPreferences::default())
        }
    }
}

async fn run_loop(
    terminal: &mut tui::Tui,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    app: &mut App,
    controller: &mut Controller,
    term_flag: &std::sync::atomic::AtomicBool,
) -> Result<()> {
    'event_loop: loop {
        tokio::select! {
            _ = tokio::time::sleep(HEARTBEAT) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal
                            .draw(|frame| ui::render(frame, app, controller.surface_mut()))
                            .context("drawing frame")?;
                        KeyAction::Continue
                    }
                    Some(AppEvent::Tick) => {
                        let now = Instant::now();
                        if controller.next_deadline().is_some_and(|d| d <= now) {
                            controller.handle(ViewInput::Tick(now));
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => {
                        keybindings::handle_key(key, app, controller.surface(), Instant::now())
                    }
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, app, controller.surface()),
                    // The next Render picks up the new size from frame.area().
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    None => break 'event_loop,
                };
                if !dispatch(action, controller) {
                    break 'event_loop;
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }
    Ok(())
}

/// Applies a key action to the controller. Returns `false` on quit.
fn dispatch(action: KeyAction, controller: &mut Controller) -> bool {
    match action {
        KeyAction::Continue => {}
        KeyAction::View(input) => controller.handle(input),
        KeyAction::HistoryBack => {
            if controller.location_mut().back() {
                controller.handle(ViewInput::LocationChanged);
            }
        }
        KeyAction::HistoryForward => {
            if controller.location_mut().forward() {
                controller.handle(ViewInput::LocationChanged);
            }
        }
        KeyAction::Quit => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use covscope_core::history::LocationHost;
    use covscope_core::state::ViewDefaults;
    use covscope_core::types::{FileEntry, LineCoverage, ReportData};

    fn controller() -> Controller {
        let files = vec![
            FileEntry::new("a.rs", vec!["fn a() {}".into()], vec![LineCoverage::Covered]),
            FileEntry::new("b.rs", vec!["fn b() {}".into()], vec![LineCoverage::Uncovered]),
        ];
        let mut c: Controller = ViewController::new(
            ReportData::from_files(files),
            ViewDefaults::default(),
            TuiSurface::default(),
            SessionHistory::default(),
            Box::new(MemoryPreferences::default()),
        );
        c.start();
        c
    }

    #[test]
    fn history_actions_follow_go_to_entries() {
        let mut c = controller();
        assert_eq!(c.current_location().as_deref(), Some("file-0"));

        assert!(dispatch(KeyAction::View(ViewInput::FollowLocation("file-1:line-1".into())), &mut c));
        assert_eq!(c.state().current_file, Some(1));

        assert!(dispatch(KeyAction::HistoryBack, &mut c));
        assert_eq!(c.state().current_file, Some(0));
        assert!(dispatch(KeyAction::HistoryForward, &mut c));
        assert_eq!(c.state().current_file, Some(1));
        assert_eq!(c.location().current().as_deref(), Some("file-1:line-1"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut c = controller();
        assert!(!dispatch(KeyAction::Quit, &mut c));
    }
}
