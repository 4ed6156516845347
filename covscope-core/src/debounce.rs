//! Cancellable deferred triggers for the two search inputs.
//!
//! Each input source owns at most one pending token. Scheduling again cancels
//! the previous token before recording the new one, so only the latest query
//! of a burst of keystrokes is ever acted upon.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a query runs.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Tree filter over file paths.
    FileFilter,
    /// Text search inside the open file.
    ContentSearch,
}

/// Identifies one scheduled trigger. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone)]
struct Pending {
    token: TimerToken,
    deadline: Instant,
    query: String,
}

/// A trigger whose quiet period has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub source: InputSource,
    pub token: TimerToken,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    next_token: u64,
    pending: HashMap<InputSource, Pending>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_INTERVAL)
    }
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_token: 0,
            pending: HashMap::new(),
        }
    }

    /// Schedules `query` for `source`, cancelling any token it already holds.
    pub fn schedule(&mut self, source: InputSource, query: impl Into<String>, now: Instant) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let previous = self.pending.insert(
            source,
            Pending {
                token,
                deadline: now + self.interval,
                query: query.into(),
            },
        );
        if let Some(old) = previous {
            tracing::trace!(?source, cancelled = old.token.0, "debounce superseded");
        }
        token
    }

    /// Drops the pending trigger of `source`. Returns whether one existed.
    pub fn cancel(&mut self, source: InputSource) -> bool {
        self.pending.remove(&source).is_some()
    }

    pub fn is_pending(&self, source: InputSource) -> bool {
        self.pending.contains_key(&source)
    }

    /// Removes and returns every trigger due at `now`, earliest deadline first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Trigger> {
        let due: Vec<InputSource> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(source, _)| *source)
            .collect();

        let mut fired: Vec<(Instant, Trigger)> = due
            .into_iter()
            .filter_map(|source| {
                self.pending.remove(&source).map(|p| {
                    (
                        p.deadline,
                        Trigger {
                            source,
                            token: p.token,
                            query: p.query,
                        },
                    )
                })
            })
            .collect();
        fired.sort_by_key(|(deadline, t)| (*deadline, t.token.0));
        fired.into_iter().map(|(_, t)| t).collect()
    }

    /// Earliest pending deadline, for hosts that sleep until the next trigger.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }
}
