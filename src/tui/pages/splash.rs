use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::theme::ThemeColors;
use crate::tui::widgets::{centered_rect, SPINNER_FRAMES};

/// Shown while the start-up session check is still running.
pub fn render_splash(frame: &mut Frame, area: Rect, theme: &ThemeColors, animation_frame: usize) {
    let spinner = SPINNER_FRAMES[animation_frame % SPINNER_FRAMES.len()];

    let body = vec![
        Line::from(Span::styled(
            "⚡ Plug And Test",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(spinner, Style::default().fg(theme.accent)),
            Span::raw(" "),
            Span::styled(
                "Loading Plug And Test Portal...",
                Style::default().fg(theme.text_secondary),
            ),
        ]),
    ];

    let splash = Paragraph::new(body).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border)),
    );

    frame.render_widget(splash, centered_rect(60, 5, area));
}
