//! Bookkeeping for [`WaitUntil::NetworkIdle`](super::WaitUntil::NetworkIdle).

use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Counts live requests and times how long the count has stayed low.
///
/// The page is idle once no more than `max_inflight` requests have been
/// pending for at least `quiet`. Going above the limit restarts the window.
#[derive(Debug)]
pub struct NetworkIdleTracker {
    max_inflight: usize,
    quiet: Duration,
    inflight: HashSet<String>,
    idle_since: Option<Instant>,
}

impl NetworkIdleTracker {
    pub fn new(max_inflight: usize, quiet: Duration, now: Instant) -> Self {
        Self { max_inflight, quiet, inflight: HashSet::new(), idle_since: Some(now) }
    }

    pub fn request_started(&mut self, id: impl Into<String>, now: Instant) {
        self.inflight.insert(id.into());
        self.update(now);
    }

    /// Finished and failed requests alike. Unknown ids are ignored.
    pub fn request_finished(&mut self, id: &str, now: Instant) {
        self.inflight.remove(id);
        self.update(now);
    }

    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_idle(&self, now: Instant) -> bool {
        self.idle_since.is_some_and(|since| now.saturating_duration_since(since) >= self.quiet)
    }

    fn update(&mut self, now: Instant) {
        if self.inflight.len() > self.max_inflight {
            self.idle_since = None;
        } else if self.idle_since.is_none() {
            self.idle_since = Some(now);
        }
    }
}
