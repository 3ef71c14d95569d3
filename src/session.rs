use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{TypingError, TypingResult};
use crate::source::{SourceProvider, SourceText};
use crate::stats::{Statistics, StatsSummary};
use crate::timer::SessionTimer;
use crate::typing_policy::{judge, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    #[strum(to_string = "not started")]
    NotStarted,
    #[strum(to_string = "running")]
    Running,
    #[strum(to_string = "paused")]
    Paused,
    #[strum(to_string = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Action {
    #[strum(to_string = "start")]
    Start,
    #[strum(to_string = "pause")]
    Pause,
    #[strum(to_string = "resume")]
    Resume,
    #[strum(to_string = "complete")]
    Complete,
}

/// What happened to a single keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Judged { expected: char, outcome: Outcome },
    /// Paused, completed, or nothing left to type.
    Ignored,
}

/// Immutable view of a session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub cursor: usize,
    pub text_len: usize,
    pub remaining: String,
    pub typed: String,
    pub source_name: Option<String>,
    pub stats: StatsSummary,
}

impl SessionSnapshot {
    pub fn is_text_finished(&self) -> bool {
        self.cursor >= self.text_len
    }
}

/// One attempt at one source text.
///
/// Owns the text, the cursor, the counters and the timer; a reload builds a
/// fresh `Session` rather than resetting this one.
#[derive(Debug)]
pub struct Session {
    source: SourceText,
    cursor: usize,
    stats: Statistics,
    timer: SessionTimer,
    phase: Phase,
    completed: Option<StatsSummary>,
}

impl Session {
    pub fn new(source: SourceText) -> Self {
        Self {
            source,
            cursor: 0,
            stats: Statistics::new(),
            timer: SessionTimer::new(),
            phase: Phase::NotStarted,
            completed: None,
        }
    }

    /// Discard this session and begin a new one on a freshly chosen text.
    pub fn reload<P: SourceProvider + ?Sized>(provider: &mut P) -> TypingResult<Self> {
        let source = provider.load_random()?;
        log::info!(
            "new session with {} characters from {}",
            source.len(),
            source
                .path()
                .map_or_else(|| "<inline>".to_string(), |p| p.display().to_string())
        );
        Ok(Self::new(source))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn expected_char(&self) -> Option<char> {
        self.source.get(self.cursor)
    }

    pub fn start(&mut self) -> TypingResult<()> {
        self.start_at(Instant::now())
    }

    /// Idempotent once the session is running.
    pub fn start_at(&mut self, now: Instant) -> TypingResult<()> {
        match self.phase {
            Phase::NotStarted => {
                self.timer.start_at(now);
                self.phase = Phase::Running;
                log::info!("session started");
                Ok(())
            }
            Phase::Running | Phase::Paused => Ok(()),
            Phase::Completed => Err(self.invalid(Action::Start)),
        }
    }

    pub fn pause(&mut self) -> TypingResult<()> {
        self.pause_at(Instant::now())
    }

    pub fn pause_at(&mut self, now: Instant) -> TypingResult<()> {
        match self.phase {
            Phase::Running => {
                self.timer.pause_at(now);
                self.phase = Phase::Paused;
                log::info!("session paused at {:?}", self.timer.elapsed_at(now));
                Ok(())
            }
            Phase::Paused => Ok(()),
            _ => Err(self.invalid(Action::Pause)),
        }
    }

    pub fn resume(&mut self) -> TypingResult<()> {
        self.resume_at(Instant::now())
    }

    pub fn resume_at(&mut self, now: Instant) -> TypingResult<()> {
        match self.phase {
            Phase::Paused => {
                self.timer.resume_at(now);
                self.phase = Phase::Running;
                log::info!("session resumed");
                Ok(())
            }
            Phase::Running => Ok(()),
            _ => Err(self.invalid(Action::Resume)),
        }
    }

    pub fn judge_keystroke(&mut self, typed: char) -> Keystroke {
        self.judge_keystroke_at(typed, Instant::now())
    }

    /// Judge `typed` against the character under the cursor.
    ///
    /// The first keystroke of a fresh session starts it.
    pub fn judge_keystroke_at(&mut self, typed: char, now: Instant) -> Keystroke {
        let Some(expected) = self.expected_char() else {
            return Keystroke::Ignored;
        };
        match self.phase {
            Phase::NotStarted => {
                self.timer.start_at(now);
                self.phase = Phase::Running;
                log::info!("session started by first keystroke");
            }
            Phase::Running => {}
            Phase::Paused | Phase::Completed => return Keystroke::Ignored,
        }

        let outcome = judge(expected, typed);
        self.stats.record(expected, outcome);
        if outcome == Outcome::Correct {
            self.cursor += 1;
        } else {
            log::debug!("expected {expected:?}, got {typed:?} at {}", self.cursor);
        }
        Keystroke::Judged { expected, outcome }
    }

    pub fn complete(&mut self, output: &Path) -> TypingResult<StatsSummary> {
        self.complete_at(output, Instant::now())
    }

    /// Finish the session and save its report to `output`.
    ///
    /// On a completed session this rewrites the frozen report, which lets a
    /// failed save be retried without losing the results.
    pub fn complete_at(&mut self, output: &Path, now: Instant) -> TypingResult<StatsSummary> {
        let summary = match self.phase {
            Phase::NotStarted => return Err(self.invalid(Action::Complete)),
            Phase::Running | Phase::Paused => {
                self.timer.stop_at(now);
                self.phase = Phase::Completed;
                let summary = self.stats.summary(self.timer.elapsed_at(now));
                log::info!(
                    "session completed: {} chars, {} errors, {:.2} keys/s",
                    summary.total_chars,
                    summary.errors,
                    summary.keystrokes_per_second
                );
                self.completed = Some(summary.clone());
                summary
            }
            Phase::Completed => match &self.completed {
                Some(summary) => summary.clone(),
                None => self.stats.summary(self.timer.elapsed_at(now)),
            },
        };

        if let Err(err) = summary.write_to(output) {
            log::error!("{err}");
            return Err(err);
        }
        Ok(summary)
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.timer.elapsed_at(now)
    }

    pub fn summary_at(&self, now: Instant) -> StatsSummary {
        match &self.completed {
            Some(summary) => summary.clone(),
            None => self.stats.summary(self.timer.elapsed_at(now)),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            cursor: self.cursor,
            text_len: self.source.len(),
            remaining: self.source.remaining(self.cursor),
            typed: self.source.typed(self.cursor),
            source_name: self
                .source
                .path()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
            stats: self.summary_at(now),
        }
    }

    fn invalid(&self, action: Action) -> TypingError {
        TypingError::InvalidTransition {
            from: self.phase,
            action,
        }
    }
}
