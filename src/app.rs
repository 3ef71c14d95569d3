use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::error::TypingError;
use crate::runtime::AppEvent;
use crate::session::{Keystroke, Phase, Session, SessionSnapshot};
use crate::source::SourceProvider;
use crate::stats::StatsSummary;
use crate::typing_policy::typed_char;

pub const RELOAD_KEY: KeyCode = KeyCode::F(2);
pub const PAUSE_KEY: KeyCode = KeyCode::F(3);
pub const RESUME_KEY: KeyCode = KeyCode::F(4);
pub const STATS_KEY: KeyCode = KeyCode::F(5);
pub const COMPLETE_KEY: KeyCode = KeyCode::F(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Start,
    Typing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Statistics(StatsSummary),
    Completed(StatsSummary),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Forwards terminal input to the current [`Session`] and keeps the bits of
/// state only the screen cares about (which screen, which popup).
pub struct App {
    pub config: Config,
    pub state: AppState,
    pub session: Option<Session>,
    pub modal: Option<Modal>,
    pub status: Option<String>,
    provider: Box<dyn SourceProvider>,
}

impl App {
    pub fn new(config: Config, provider: Box<dyn SourceProvider>) -> Self {
        Self {
            config,
            state: AppState::Start,
            session: None,
            modal: None,
            status: None,
            provider,
        }
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    /// Returns true when the screen needs redrawing.
    pub fn on_event(&mut self, event: AppEvent) -> (Control, bool) {
        match event {
            AppEvent::Tick => (Control::Continue, self.needs_tick_redraw()),
            AppEvent::Resize => (Control::Continue, true),
            AppEvent::Key(key) => (self.on_key(key), true),
        }
    }

    /// The clock only moves while a session is running.
    pub fn needs_tick_redraw(&self) -> bool {
        self.state == AppState::Typing
            && self.modal.is_none()
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.phase() == Phase::Running)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        if self.modal.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.modal = None;
            }
            return Control::Continue;
        }

        match self.state {
            AppState::Start => match key.code {
                KeyCode::Esc => Control::Quit,
                KeyCode::Enter => {
                    self.begin();
                    Control::Continue
                }
                _ => Control::Continue,
            },
            AppState::Typing => self.on_typing_key(key),
        }
    }

    fn on_typing_key(&mut self, key: KeyEvent) -> Control {
        self.status = None;
        match key.code {
            KeyCode::Esc => return Control::Quit,
            RELOAD_KEY => self.reload(),
            PAUSE_KEY => self.pause(),
            RESUME_KEY => self.resume(),
            STATS_KEY => self.show_statistics(),
            COMPLETE_KEY => self.complete(),
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.type_char(c);
                }
            }
        }
        Control::Continue
    }

    /// Load the first text and start timing right away.
    pub fn begin(&mut self) {
        match Session::reload(self.provider.as_mut()) {
            Ok(mut session) => {
                if let Err(e) = session.start() {
                    self.report(e);
                }
                self.session = Some(session);
                self.state = AppState::Typing;
            }
            Err(e) => self.report(e),
        }
    }

    /// Throw away the current attempt in favor of a new random text.
    ///
    /// When no text can be loaded the current session is kept as it was.
    pub fn reload(&mut self) {
        match Session::reload(self.provider.as_mut()) {
            Ok(session) => {
                self.session = Some(session);
                self.status = Some("new text loaded, start typing".to_string());
            }
            Err(e) => self.report(e),
        }
    }

    pub fn pause(&mut self) {
        if let Some(Err(e)) = self.session.as_mut().map(Session::pause) {
            self.report(e);
        }
    }

    pub fn resume(&mut self) {
        if let Some(Err(e)) = self.session.as_mut().map(Session::resume) {
            self.report(e);
        }
    }

    pub fn show_statistics(&mut self) {
        if let Some(snapshot) = self.snapshot() {
            self.modal = Some(Modal::Statistics(snapshot.stats));
        }
    }

    pub fn complete(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.complete(&self.config.output_file) {
            Ok(summary) => self.modal = Some(Modal::Completed(summary)),
            Err(e) => self.report(e),
        }
    }

    pub fn type_char(&mut self, c: char) -> Option<Keystroke> {
        let keystroke = self.session.as_mut().map(|s| s.judge_keystroke(c));
        if let (Some(Keystroke::Ignored), Some(session)) = (keystroke, self.session.as_ref()) {
            let hint = match session.phase() {
                Phase::Paused => format!("paused, press {} to resume", key_label(RESUME_KEY)),
                Phase::Completed => {
                    format!("completed, press {} for a new text", key_label(RELOAD_KEY))
                }
                Phase::NotStarted => {
                    format!("empty text, press {} for another", key_label(RELOAD_KEY))
                }
                Phase::Running => {
                    format!("text finished, press {} to save", key_label(COMPLETE_KEY))
                }
            };
            self.status = Some(hint);
        }
        keystroke
    }

    /// Errors that need acknowledging get a popup, the rest go to the status line.
    fn report(&mut self, err: TypingError) {
        log::warn!("{err}");
        match err {
            TypingError::InvalidTransition { .. } => self.status = Some(err.to_string()),
            _ => self.modal = Some(Modal::Error(err.to_string())),
        }
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        other => format!("{other:?}"),
    }
}
