//! Terminal lifecycle management for covscope.
//!
//! The TUI renders to stderr so stdout stays free: on exit covscope prints the
//! final shareable location there, which keeps `covscope report.json | pbcopy`
//! and similar pipelines clean.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stderr, BufWriter, Stderr};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// CrosstermBackend over a buffered stderr writer, so each frame's escape
/// sequences go out in few write(2) calls.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Enables raw mode, enters the alternate screen and turns on mouse capture.
/// Call [`restore_tui`] at every exit path.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Restores the terminal to its pre-TUI state. Idempotent.
///
/// ratatui does not restore the terminal on `Drop`, so this runs after the
/// event loop and from the panic hook.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before the previous hook
/// prints the panic message. Must be called before [`init_tui`].
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Returns a flag that flips to `true` when the process receives SIGTERM.
/// The main loop polls it on every heartbeat.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
