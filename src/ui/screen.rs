use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};
use crate::ui::{render_start, render_typing};

/// A UI Screen boundary: responsible for rendering one application state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Start screen - a single prompt and the affirmative control
pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        render_start(area, buf);
    }
}

/// Typing screen - remaining text, echo panel, timer and controls
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        match app.snapshot() {
            Some(snapshot) => render_typing(app, &snapshot, area, buf),
            None => render_start(area, buf),
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Start => Box::new(StartScreen),
        AppState::Typing => Box::new(TypingScreen),
    }
}
