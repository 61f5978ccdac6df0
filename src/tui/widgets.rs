use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::messages::{Notice, NoticeKind};
use crate::theme::ThemeColors;

pub const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Apply a key press to a text input. Returns true when the key was consumed.
pub fn edit_text(value: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            value.push(c);
            true
        }
        KeyCode::Backspace => {
            value.pop();
            true
        }
        _ => false,
    }
}

pub fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Carve a `width_percent` by `height` box out of the middle of `area`.
pub fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area)[1];

    let side = 100u16.saturating_sub(width_percent) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(side),
        ])
        .split(vertical)[1]
}

pub fn render_input_field(
    frame: &mut Frame,
    area: Rect,
    theme: &ThemeColors,
    title: &str,
    value: &str,
    focused: bool,
) {
    let (text_style, border_style) = if focused {
        (
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            Style::default().fg(theme.primary),
        )
    } else {
        (
            Style::default().fg(theme.text),
            Style::default().fg(theme.border),
        )
    };

    let shown = if focused {
        format!("{}▏", value)
    } else {
        value.to_string()
    };

    let input = Paragraph::new(shown).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_type(BorderType::Rounded)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

pub fn render_controls_footer(
    frame: &mut Frame,
    area: Rect,
    theme: &ThemeColors,
    controls: &[(&str, &str)],
) {
    let footer_text: Vec<Span> = controls
        .iter()
        .enumerate()
        .flat_map(|(i, (key, desc))| {
            let mut spans = vec![
                Span::styled(
                    key.to_string(),
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {}", desc), Style::default().fg(theme.text_secondary)),
            ];

            if i < controls.len() - 1 {
                spans.push(Span::raw("  "));
            }

            spans
        })
        .collect();

    let footer = Paragraph::new(Line::from(footer_text))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border))
                .title("🔧 Controls")
                .title_style(Style::default().fg(theme.accent)),
        );

    frame.render_widget(footer, area);
}

pub fn render_loading_overlay(frame: &mut Frame, area: Rect, theme: &ThemeColors, message: &str) {
    let popup_area = centered_rect(50, 3, area);
    frame.render_widget(Clear, popup_area);

    let loading = Paragraph::new(format!("🔄 {}", message))
        .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.container)),
        );
    frame.render_widget(loading, popup_area);
}

pub fn render_notice(frame: &mut Frame, area: Rect, theme: &ThemeColors, notice: &Notice) {
    let (icon, color) = match notice.kind {
        NoticeKind::Info => ("ℹ️", theme.primary),
        NoticeKind::Success => ("✅", theme.success),
        NoticeKind::Error => ("❌", theme.error),
    };

    let popup_area = centered_rect(80, 8, area);
    frame.render_widget(Clear, popup_area);

    let message = Paragraph::new(format!("{} {}", icon, notice.text))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!("{} (Press any key to dismiss)", notice.title))
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.container)),
        );

    frame.render_widget(message, popup_area);
}

/// A yes/no box drawn over the current screen.
pub fn render_confirmation(frame: &mut Frame, area: Rect, theme: &ThemeColors, title: &str, question: &str) {
    let popup_area = centered_rect(60, 6, area);
    frame.render_widget(Clear, popup_area);

    let body = vec![
        Line::from(Span::styled(question.to_string(), Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
            Span::styled(" Yes   ", Style::default().fg(theme.text_secondary)),
            Span::styled("n/Esc", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
            Span::styled(" Cancel", Style::default().fg(theme.text_secondary)),
        ]),
    ];

    let confirm = Paragraph::new(body).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title.to_string())
            .title_style(Style::default().fg(theme.warning).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(theme.warning))
            .style(Style::default().bg(theme.container)),
    );
    frame.render_widget(confirm, popup_area);
}
