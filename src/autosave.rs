use std::time::{Duration, Instant};

/// Quiet interval before a pending save fires
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(500);

/// What gets handed to the project store on save
#[derive(Debug, Clone, PartialEq)]
pub struct SavePayload {
    pub json: String,
    pub width: u32,
    pub height: u32,
}

/// Trailing-debounce scheduler turning the high-frequency stream of
/// committed mutations into a low-frequency stream of persistence
/// calls.
///
/// Each `mark` supersedes the previous pending save; only the last
/// state within a burst is persisted, and only after input has been
/// quiet for the full interval. The scheduler never blocks the editing
/// path and never retries: the next qualifying mutation schedules the
/// next attempt.
#[derive(Debug)]
pub struct AutosaveScheduler {
    quiet: Duration,
    pending: Option<(Instant, SavePayload)>,
}

impl AutosaveScheduler {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Schedule a save of `payload`, superseding any pending one
    pub fn mark(&mut self, payload: SavePayload, now: Instant) {
        self.pending = Some((now + self.quiet, payload));
    }

    /// Hand back the pending payload once the quiet interval has
    /// elapsed; otherwise nothing.
    pub fn poll(&mut self, now: Instant) -> Option<SavePayload> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => {
                self.pending.take().map(|(_, payload)| payload)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending save without firing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}
