pub mod modal;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::{
    app::{key_label, App, COMPLETE_KEY, PAUSE_KEY, RELOAD_KEY, RESUME_KEY, STATS_KEY},
    session::{Phase, SessionSnapshot},
    timer::format_elapsed,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const ECHO_PANEL_PERCENT: u16 = 30;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);

        if let Some(modal) = &self.modal {
            modal::render_modal(modal, &self.config.output_file, area, buf);
        }
    }
}

pub(crate) fn render_start(area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("Are you ready to start?", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "[ Start ]",
        bold_style.fg(Color::Green).add_modifier(Modifier::REVERSED),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled("(enter) start / (esc)ape", italic_style))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}

pub(crate) fn render_typing(app: &App, snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header: source, phase, timer
            Constraint::Min(3),    // text + echo panel
            Constraint::Length(1), // status
            Constraint::Length(1), // legend
        ])
        .split(area);

    render_header(snapshot, chunks[0], buf);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100 - ECHO_PANEL_PERCENT),
            Constraint::Percentage(ECHO_PANEL_PERCENT),
        ])
        .split(chunks[1]);

    let text_block = Block::default()
        .borders(Borders::ALL)
        .title(snapshot.source_name.clone().unwrap_or_else(|| "text".to_string()));
    Paragraph::new(remaining_text(snapshot))
        .block(text_block)
        .wrap(Wrap { trim: false })
        .render(body[0], buf);

    let echo_block = Block::default().borders(Borders::ALL).title("typed");
    let inner = echo_block.inner(body[1]);
    let capacity = inner.width as usize * inner.height as usize;
    Paragraph::new(Span::styled(
        echo_tail(&snapshot.typed, capacity),
        Style::default().fg(Color::Green),
    ))
    .block(echo_block)
    .wrap(Wrap { trim: false })
    .render(body[1], buf);

    if let Some(status) = &app.status {
        Paragraph::new(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled(
        legend(),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_header(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let phase_style = match snapshot.phase {
        Phase::NotStarted => Style::default().fg(Color::Gray),
        Phase::Running => Style::default().fg(Color::Green),
        Phase::Paused => Style::default().fg(Color::Yellow),
        Phase::Completed => Style::default().fg(Color::Cyan),
    };

    let line = Line::from(vec![
        Span::styled(format_elapsed(snapshot.stats.elapsed), bold_style),
        Span::raw("   "),
        Span::styled(snapshot.phase.to_string().to_uppercase(), phase_style),
        Span::raw("   "),
        Span::raw(format!("{}/{}", snapshot.cursor, snapshot.text_len)),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Right)
        .render(area, buf);
}

/// The untyped part of the text with the next expected character marked.
fn remaining_text(snapshot: &SessionSnapshot) -> Text<'static> {
    let dim_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM);
    let cursor_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::UNDERLINED);

    let mut chars = snapshot.remaining.chars();
    let Some(next) = chars.next() else {
        return Text::from(Span::styled(
            format!(
                "done! press {} to save your statistics",
                key_label(COMPLETE_KEY)
            ),
            Style::default().fg(Color::Green),
        ));
    };
    let rest: String = chars.collect();

    let mut lines: Vec<Line> = Vec::new();
    let mut first: Vec<Span> = Vec::new();
    let mut rest_lines = rest.split('\n');
    match next {
        '\n' => {
            first.push(Span::styled("⏎", cursor_style));
            lines.push(Line::from(first));
            first = Vec::new();
        }
        '\t' => first.push(Span::styled("    ", cursor_style)),
        c => first.push(Span::styled(c.to_string(), cursor_style)),
    }
    if let Some(head) = rest_lines.next() {
        first.push(Span::styled(head.replace('\t', "    "), dim_bold_style));
    }
    lines.push(Line::from(first));
    lines.extend(
        rest_lines.map(|l| Line::from(Span::styled(l.replace('\t', "    "), dim_bold_style))),
    );

    Text::from(lines)
}

/// The end of `typed` that fits into `capacity` display cells.
fn echo_tail(typed: &str, capacity: usize) -> String {
    let mut used = 0;
    let mut tail: Vec<char> = typed
        .chars()
        .rev()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= capacity
        })
        .collect();
    tail.reverse();
    tail.into_iter().collect()
}

fn legend() -> String {
    format!(
        "({}) reload / ({}) pause / ({}) resume / ({}) stats / ({}) complete / (esc)ape",
        key_label(RELOAD_KEY),
        key_label(PAUSE_KEY),
        key_label(RESUME_KEY),
        key_label(STATS_KEY),
        key_label(COMPLETE_KEY)
    )
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &Buffer) -> String {
    buffer.content().iter().map(|c| c.symbol()).collect()
}
