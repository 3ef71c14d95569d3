use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget, Wrap},
};

use crate::app::Modal;
use crate::stats::{char_label, StatsSummary};
use crate::timer::format_elapsed;

const MODAL_WIDTH: u16 = 56;
const BREAKDOWN_ROWS: usize = 5;

pub fn render_modal(modal: &Modal, output_file: &Path, area: Rect, buf: &mut Buffer) {
    let (title, border, lines, breakdown) = match modal {
        Modal::Statistics(summary) => (
            "Statistics",
            Color::Cyan,
            summary_lines(summary),
            breakdown_rows(summary),
        ),
        Modal::Completed(summary) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Your attempt has been completed.",
                    Style::default().fg(Color::Green),
                )),
                Line::from(format!("Statistics saved to {}", output_file.display())),
                Line::from(""),
            ];
            lines.extend(summary_lines(summary));
            ("Complete", Color::Green, lines, Vec::new())
        }
        Modal::Error(message) => (
            "Error",
            Color::Red,
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))],
            Vec::new(),
        ),
    };

    let table_height = if breakdown.is_empty() {
        0
    } else {
        breakdown.len() as u16 + 1
    };
    // borders, text, blank line, table, hint
    let height = 2 + lines.len() as u16 + 1 + table_height + 1;
    let popup = centered_rect(MODAL_WIDTH, height, area);

    Clear.render(popup, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(popup);
    block.render(popup, buf);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(lines.len() as u16 + 1),
            Constraint::Length(table_height),
            Constraint::Min(1),
        ])
        .split(inner);

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

    if !breakdown.is_empty() {
        let header = Row::new(vec![Cell::from("Char"), Cell::from("Mistakes")]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        Widget::render(
            Table::new(breakdown, [Constraint::Length(10), Constraint::Length(10)]).header(header),
            chunks[1],
            buf,
        );
    }

    Paragraph::new(Span::styled(
        "(enter) close",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);
}

fn summary_lines(summary: &StatsSummary) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = summary
        .report_lines()
        .into_iter()
        .map(|(label, value)| Line::from(format!("{label}: {value}")))
        .collect();
    lines.push(Line::from(format!("Accuracy: {:.1}%", summary.accuracy)));
    lines.push(Line::from(format!(
        "Elapsed: {}",
        format_elapsed(summary.elapsed)
    )));
    lines
}

fn breakdown_rows(summary: &StatsSummary) -> Vec<Row<'static>> {
    summary
        .error_breakdown
        .iter()
        .take(BREAKDOWN_ROWS)
        .map(|(c, n)| {
            let miss_color = if *n >= 5 { Color::Red } else { Color::Yellow };
            Row::new(vec![
                Cell::from(char_label(*c)),
                Cell::from(n.to_string()).style(Style::default().fg(miss_color)),
            ])
        })
        .collect()
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Statistics;
    use crate::typing_policy::Outcome;
    use crate::ui::buffer_text;
    use std::time::Duration;

    fn summary() -> StatsSummary {
        let mut stats = Statistics::new();
        stats.record('a', Outcome::Correct);
        stats.record(' ', Outcome::Incorrect);
        stats.record(' ', Outcome::Incorrect);
        stats.record('q', Outcome::Incorrect);
        stats.summary(Duration::from_secs(65))
    }

    fn render(modal: &Modal) -> String {
        let area = Rect::new(0, 0, 80, 30);
        let mut buffer = Buffer::empty(area);
        render_modal(modal, Path::new("statistics.txt"), area, &mut buffer);
        buffer_text(&buffer)
    }

    #[test]
    fn statistics_modal_lists_summary_and_breakdown() {
        let rendered = render(&Modal::Statistics(summary()));
        assert!(rendered.contains("Total Chars: 4"));
        assert!(rendered.contains("Errors: 3"));
        assert!(rendered.contains("Most Common Error: SPACE"));
        assert!(rendered.contains("Keystrokes per Second: 0.06"));
        assert!(rendered.contains("Accuracy: 25.0%"));
        assert!(rendered.contains("Elapsed: 1:05"));
        assert!(rendered.contains("Mistakes"));
    }

    #[test]
    fn completed_modal_names_the_report() {
        let rendered = render(&Modal::Completed(summary()));
        assert!(rendered.contains("statistics.txt"));
        assert!(rendered.contains("Errors: 3"));
    }

    #[test]
    fn error_modal_shows_message() {
        let rendered = render(&Modal::Error("no .txt files found in .".to_string()));
        assert!(rendered.contains("no .txt files found in ."));
    }

    #[test]
    fn modal_fits_tiny_area() {
        let area = Rect::new(0, 0, 8, 3);
        let mut buffer = Buffer::empty(area);
        render_modal(
            &Modal::Statistics(summary()),
            Path::new("statistics.txt"),
            area,
            &mut buffer,
        );
        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(20, 10, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(40, 20, 20, 10));
        let r = centered_rect(200, 100, Rect::new(0, 0, 100, 50));
        assert_eq!(r, Rect::new(0, 0, 100, 50));
    }
}
