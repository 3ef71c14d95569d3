use std::time::{Duration, Instant};

/// A single pause; `resumed_at` is `None` while the pause is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseSpan {
    pub paused_at: Instant,
    pub resumed_at: Option<Instant>,
}

impl PauseSpan {
    fn duration_until(&self, now: Instant) -> Duration {
        let end = self.resumed_at.unwrap_or(now).min(now);
        end.saturating_duration_since(self.paused_at)
    }
}

/// Active typing time for a session, excluding every paused interval.
///
/// The timer never rewrites its start instant; pauses are recorded as spans
/// and elapsed time is derived from them on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: Option<Instant>,
    pauses: Vec<PauseSpan>,
    stopped_at: Option<Instant>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.pauses.last().is_some_and(|p| p.resumed_at.is_none())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    pub fn pauses(&self) -> &[PauseSpan] {
        &self.pauses
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.has_started() && !self.is_paused() && !self.is_stopped() {
            self.pauses.push(PauseSpan {
                paused_at: now,
                resumed_at: None,
            });
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn resume_at(&mut self, now: Instant) {
        if self.is_stopped() {
            return;
        }
        if let Some(open) = self.pauses.last_mut().filter(|p| p.resumed_at.is_none()) {
            open.resumed_at = Some(now.max(open.paused_at));
        }
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    /// Freeze the timer. An open pause is closed at the stop instant so the
    /// paused stretch stays excluded.
    pub fn stop_at(&mut self, now: Instant) {
        if !self.has_started() || self.is_stopped() {
            return;
        }
        if let Some(open) = self.pauses.last_mut().filter(|p| p.resumed_at.is_none()) {
            open.resumed_at = Some(now.max(open.paused_at));
        }
        self.stopped_at = Some(now);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => {
                let now = self.stopped_at.map_or(now, |stop| stop.min(now));
                active_elapsed(start, &self.pauses, now)
            }
            None => Duration::ZERO,
        }
    }
}

/// Time between `start` and `now` minus the parts of `pauses` that fall in it.
pub fn active_elapsed(start: Instant, pauses: &[PauseSpan], now: Instant) -> Duration {
    let wall = now.saturating_duration_since(start);
    let paused: Duration = pauses.iter().map(|p| p.duration_until(now)).sum();
    wall.saturating_sub(paused)
}

/// `m:ss`, minutes unbounded.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
