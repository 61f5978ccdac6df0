use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::PageAction;
use crate::auth::User;
use crate::portal::PortalSummary;
use crate::theme::ThemeManager;
use crate::tui::messages::Notice;
use crate::tui::widgets::render_controls_footer;

const ADMIN_ACTIONS: [(&str, &str, &str); 5] = [
    ("👤", "Add New Client", "Create a new client account and send setup link"),
    ("📅", "Manage Appointments", "Schedule and edit client appointments"),
    ("📄", "Upload Documents", "Upload certificates and invoices"),
    ("👥", "View All Clients", "Access all customer accounts"),
    ("🔧", "Equipment Management", "Manage equipment testing lists"),
];

pub struct AdminPage {
    user: User,
    summary: PortalSummary,
    list_state: ListState,
    theme_manager: ThemeManager,
}

impl AdminPage {
    pub fn new(user: User, summary: PortalSummary) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            user,
            summary,
            list_state,
            theme_manager: ThemeManager::new(),
        }
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let selected = self.list_state.selected().unwrap_or(0);
                if selected + 1 < ADMIN_ACTIONS.len() {
                    self.list_state.select(Some(selected + 1));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let selected = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Enter => {
                if let Some((_, title, _)) = self.list_state.selected().and_then(|i| ADMIN_ACTIONS.get(i)) {
                    log::debug!("Admin action requested: {}", title);
                    return Ok(PageAction::Notify(Notice::coming_soon()));
                }
            }
            KeyCode::Char('l') => return Ok(PageAction::Logout),
            _ => {}
        }

        Ok(PageAction::None)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme_colors = self.theme_manager.get_colors().clone();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Stats
                Constraint::Min(7),    // Actions
                Constraint::Length(4), // Access info
                Constraint::Length(3), // Controls
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "⚡ Admin Dashboard  ",
                Style::default().fg(theme_colors.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Welcome, {}", self.user.name),
                Style::default().fg(theme_colors.text_secondary),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme_colors.accent)),
        );
        frame.render_widget(header, chunks[0]);

        let stat_columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        let stats = [
            (self.summary.clients, "Total Clients", theme_colors.primary),
            (self.summary.upcoming_appointments, "Upcoming Appointments", theme_colors.accent),
        ];
        for ((value, label, color), column) in stats.into_iter().zip(stat_columns.iter()) {
            let tile = Paragraph::new(vec![
                Line::from(Span::styled(
                    value.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(label, Style::default().fg(theme_colors.text_secondary))),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme_colors.border)),
            );
            frame.render_widget(tile, *column);
        }

        let items: Vec<ListItem> = ADMIN_ACTIONS
            .iter()
            .map(|(icon, title, description)| {
                ListItem::new(Text::from(vec![
                    Line::from(vec![
                        Span::styled(format!("{} ", icon), Style::default().fg(theme_colors.accent)),
                        Span::styled(
                            title.to_string(),
                            Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("   {}", description),
                        Style::default().fg(theme_colors.text_secondary),
                    )),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("Quick Actions")
                    .title_style(Style::default().fg(theme_colors.accent))
                    .border_style(Style::default().fg(theme_colors.border)),
            )
            .highlight_style(Style::default().bg(theme_colors.container).add_modifier(Modifier::BOLD))
            .highlight_symbol("► ");
        frame.render_stateful_widget(list, chunks[2], &mut self.list_state);

        let info = Paragraph::new(
            "You have full access to all client accounts and can manage all aspects of the portal.",
        )
        .style(Style::default().fg(theme_colors.text))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("ℹ️ Admin Access")
                .title_style(Style::default().fg(theme_colors.primary))
                .border_style(Style::default().fg(theme_colors.primary)),
        );
        frame.render_widget(info, chunks[3]);

        render_controls_footer(
            frame,
            chunks[4],
            &theme_colors,
            &[("↑↓/jk", "Navigate"), ("Enter", "Open"), ("l", "Logout"), ("q", "Quit")],
        );
    }
}
