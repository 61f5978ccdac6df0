use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{DocumentTab, PageAction};
use crate::auth::User;
use crate::portal::{
    format_date, notes_or_default, recent_appointments, upcoming_appointments, Appointment,
    AppointmentStatus, ClientRecords, RECENT_APPOINTMENT_LIMIT,
};
use crate::theme::{ThemeColors, ThemeManager};
use crate::tui::messages::Notice;
use crate::tui::widgets::render_controls_footer;

pub struct HomePage {
    // Data
    name: String,
    company: Option<String>,
    upcoming: Vec<Appointment>,
    recent: Vec<Appointment>,
    equipment_count: usize,

    // UI State
    // Index runs over upcoming first, then recent
    selected: usize,

    theme_manager: ThemeManager,
}

impl HomePage {
    pub fn new(user: &User, records: &ClientRecords) -> Self {
        Self {
            name: user.name.clone(),
            company: user.company.clone(),
            upcoming: upcoming_appointments(&records.appointments)
                .into_iter()
                .cloned()
                .collect(),
            recent: recent_appointments(&records.appointments, RECENT_APPOINTMENT_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
            equipment_count: records.equipment.len(),
            selected: 0,
            theme_manager: ThemeManager::new(),
        }
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }

    fn item_count(&self) -> usize {
        self.upcoming.len() + self.recent.len()
    }

    fn selected_appointment(&self) -> Option<&Appointment> {
        self.upcoming.iter().chain(self.recent.iter()).nth(self.selected)
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.item_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(appointment) = self.selected_appointment() {
                    return Ok(PageAction::Notify(Notice::info(
                        "Appointment Details",
                        notes_or_default(appointment),
                    )));
                }
            }
            KeyCode::Char('c') => return Ok(PageAction::OpenDocuments(DocumentTab::Certificates)),
            KeyCode::Char('i') => return Ok(PageAction::OpenDocuments(DocumentTab::Invoices)),
            _ => {}
        }

        Ok(PageAction::None)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme_colors = self.theme_manager.get_colors().clone();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),  // Welcome + stats
                Constraint::Min(6),     // Upcoming
                Constraint::Length(8),  // Recent history
                Constraint::Length(3),  // Controls
            ])
            .split(area);

        self.render_welcome(frame, chunks[0], &theme_colors);
        self.render_upcoming(frame, chunks[1], &theme_colors);
        self.render_recent(frame, chunks[2], &theme_colors);
        render_controls_footer(
            frame,
            chunks[3],
            &theme_colors,
            &[
                ("↑↓/jk", "Navigate"),
                ("Enter", "Details"),
                ("c", "Certificates"),
                ("i", "Invoices"),
            ],
        );
    }

    fn render_welcome(&self, frame: &mut Frame, area: Rect, theme_colors: &ThemeColors) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let welcome = Paragraph::new(vec![
            Line::from(Span::styled("Welcome back,", Style::default().fg(theme_colors.text_secondary))),
            Line::from(Span::styled(
                self.name.clone(),
                Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.company.clone().unwrap_or_default(),
                Style::default().fg(theme_colors.primary),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme_colors.border)),
        );
        frame.render_widget(welcome, columns[0]);

        let stat = |icon: &str, value: usize, label: &str, color| {
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("{} {}", icon, value),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(label.to_string(), Style::default().fg(theme_colors.text_secondary))),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme_colors.border)),
            )
        };
        frame.render_widget(stat("📅", self.upcoming.len(), "Upcoming", theme_colors.primary), columns[1]);
        frame.render_widget(stat("🔧", self.equipment_count, "Equipment", theme_colors.accent), columns[2]);
    }

    fn appointment_item(appointment: &Appointment, theme_colors: &ThemeColors) -> ListItem<'static> {
        let status_color = match appointment.status {
            AppointmentStatus::Upcoming => theme_colors.primary,
            AppointmentStatus::Completed => theme_colors.accent,
            AppointmentStatus::Cancelled => theme_colors.error,
        };

        let line1 = Line::from(vec![
            Span::styled(
                format_date(appointment.date),
                Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{}]", appointment.status.label()),
                Style::default().fg(status_color).add_modifier(Modifier::BOLD),
            ),
        ]);

        let mut details = vec![
            Span::styled(format!("🕐 {}", appointment.time), Style::default().fg(theme_colors.text_secondary)),
            Span::styled(format!("  📍 {}", appointment.location), Style::default().fg(theme_colors.text_secondary)),
        ];
        if let Some(count) = appointment.equipment_count {
            details.push(Span::styled(
                format!("  🔧 {} items to test", count),
                Style::default().fg(theme_colors.text_secondary),
            ));
        }

        ListItem::new(Text::from(vec![line1, Line::from(details)]))
    }

    fn render_upcoming(&self, frame: &mut Frame, area: Rect, theme_colors: &ThemeColors) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("📅 Upcoming Appointments")
            .title_style(Style::default().fg(theme_colors.primary))
            .border_style(Style::default().fg(theme_colors.primary));

        if self.upcoming.is_empty() {
            let empty = Paragraph::new("No upcoming appointments")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme_colors.text_secondary))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .upcoming
            .iter()
            .map(|a| Self::appointment_item(a, theme_colors))
            .collect();

        let mut state = ListState::default();
        if self.selected < self.upcoming.len() {
            state.select(Some(self.selected));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(theme_colors.highlight)
                    .fg(theme_colors.background)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect, theme_colors: &ThemeColors) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("✅ Recent History")
            .title_style(Style::default().fg(theme_colors.accent))
            .border_style(Style::default().fg(theme_colors.border));

        if self.recent.is_empty() {
            let empty = Paragraph::new("No completed visits yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme_colors.text_secondary))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .recent
            .iter()
            .map(|a| Self::appointment_item(a, theme_colors))
            .collect();

        let mut state = ListState::default();
        if self.selected >= self.upcoming.len() {
            state.select(Some(self.selected - self.upcoming.len()));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(theme_colors.highlight)
                    .fg(theme_colors.background)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::portal::{FixtureDataSource, PortalDataSource};
    use chrono::Utc;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn user() -> User {
        User {
            id: "client-001".to_string(),
            email: "client@plugandtest.com".to_string(),
            role: Role::Client,
            name: "Demo User".to_string(),
            company: Some("Demo Company Ltd".to_string()),
            phone: None,
            created_at: Utc::now(),
        }
    }

    async fn page() -> HomePage {
        let records = FixtureDataSource::bundled()
            .unwrap()
            .records_for("client-001")
            .await
            .unwrap();
        HomePage::new(&user(), &records)
    }

    #[tokio::test]
    async fn splits_fixture_appointments() {
        let page = page().await;
        assert_eq!(page.upcoming_count(), 2);
        assert_eq!(page.recent.len(), RECENT_APPOINTMENT_LIMIT);
        assert_eq!(page.equipment_count, 8);
    }

    #[tokio::test]
    async fn enter_shows_appointment_notes() {
        let mut page = page().await;
        match page.handle_input(key(KeyCode::Enter)).await.unwrap() {
            PageAction::Notify(notice) => {
                assert_eq!(notice.title, "Appointment Details");
                assert!(!notice.text.is_empty());
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[tokio::test]
    async fn selection_stops_at_the_last_item() {
        let mut page = page().await;
        for _ in 0..20 {
            page.handle_input(key(KeyCode::Down)).await.unwrap();
        }
        assert_eq!(page.selected, page.item_count() - 1);
    }

    #[tokio::test]
    async fn empty_records_render_placeholders() {
        let mut page = HomePage::new(&user(), &ClientRecords::default());
        let mut terminal = ratatui::Terminal::new(ratatui::backend::TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("No upcoming appointments"));
        assert_eq!(page.handle_input(key(KeyCode::Enter)).await.unwrap(), PageAction::None);
    }
}
