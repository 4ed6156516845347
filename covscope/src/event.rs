//! Event bus for covscope.
//!
//! Terminal input and timer ticks are normalised into a single `AppEvent` enum
//! and sent over a tokio unbounded MPSC channel. The main loop receives from
//! this channel and dispatches accordingly.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms ≈ 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (50 ms) fires due debounce timers in the view controller.
//!   Debounced queries therefore run at most one tick after their deadline.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const RENDER_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug)]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release and repeat are
    /// dropped so Windows does not double-fire).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    Tick,
    Render,
}

/// Holds the sender and receiver ends of the unified event channel.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background tokio task that feeds the event channel.
///
/// `reader.next().fuse()` keeps `tokio::select!` from polling a finished
/// stream. The task exits once the receiver is gone.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(TICK_INTERVAL);
        let mut render_interval = interval(RENDER_INTERVAL);
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let event = tokio::select! {
                _ = tick_tick => Some(AppEvent::Tick),
                _ = render_tick => Some(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                    Some(Ok(Event::Resize(w, h))) => Some(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => Some(AppEvent::Mouse(mouse)),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "terminal event stream error");
                        None
                    }
                    _ => None,
                },
            };
            if let Some(event) = event {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });
}
