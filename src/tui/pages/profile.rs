use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::PageAction;
use crate::auth::User;
use crate::theme::ThemeManager;
use crate::tui::messages::Notice;
use crate::tui::widgets::{render_confirmation, render_controls_footer};

const SUPPORT_EMAIL: &str = "support@plugandtest.com";

#[derive(Debug, Clone, Copy, PartialEq)]
enum ProfileEntry {
    Social(&'static str, &'static str, &'static str),
    Help,
    ContactSupport,
    Logout,
}

const ENTRIES: [ProfileEntry; 7] = [
    ProfileEntry::Social("🌐", "Website", "https://plugandtest.com"),
    ProfileEntry::Social("📘", "Facebook", "https://facebook.com/plugandtest"),
    ProfileEntry::Social("🐦", "Twitter", "https://twitter.com/plugandtest"),
    ProfileEntry::Social("💼", "LinkedIn", "https://linkedin.com/company/plugandtest"),
    ProfileEntry::Help,
    ProfileEntry::ContactSupport,
    ProfileEntry::Logout,
];

impl ProfileEntry {
    fn label(self) -> String {
        match self {
            Self::Social(icon, name, url) => format!("{} {}  {}", icon, name, url),
            Self::Help => "❓ Help & FAQ".to_string(),
            Self::ContactSupport => "📧 Contact Support".to_string(),
            Self::Logout => "🚪 Logout".to_string(),
        }
    }
}

pub struct ProfilePage {
    user: User,
    list_state: ListState,
    confirming_logout: bool,
    theme_manager: ThemeManager,
}

impl ProfilePage {
    pub fn new(user: User) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            user,
            list_state,
            confirming_logout: false,
            theme_manager: ThemeManager::new(),
        }
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    pub fn is_confirming_logout(&self) -> bool {
        self.confirming_logout
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        if self.confirming_logout {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirming_logout = false;
                    Ok(PageAction::Logout)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirming_logout = false;
                    Ok(PageAction::None)
                }
                _ => Ok(PageAction::None),
            };
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let selected = self.list_state.selected().unwrap_or(0);
                if selected + 1 < ENTRIES.len() {
                    self.list_state.select(Some(selected + 1));
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let selected = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Char('l') => self.confirming_logout = true,
            KeyCode::Enter => {
                let entry = ENTRIES[self.list_state.selected().unwrap_or(0).min(ENTRIES.len() - 1)];
                return Ok(self.activate(entry));
            }
            _ => {}
        }

        Ok(PageAction::None)
    }

    fn activate(&mut self, entry: ProfileEntry) -> PageAction {
        match entry {
            ProfileEntry::Social(_, name, url) => PageAction::Notify(Notice::info(name, url)),
            ProfileEntry::Help => PageAction::Notify(Notice::info("Help", "Help documentation coming soon")),
            ProfileEntry::ContactSupport => PageAction::Notify(Notice::info(
                "Contact Support",
                format!("Email us at {}", SUPPORT_EMAIL),
            )),
            ProfileEntry::Logout => {
                self.confirming_logout = true;
                PageAction::None
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme_colors = self.theme_manager.get_colors().clone();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // Account information
                Constraint::Min(5),    // Links and support
                Constraint::Length(3), // Controls
            ])
            .split(area);

        let label_style = Style::default().fg(theme_colors.text_secondary);
        let value_style = Style::default().fg(theme_colors.text);
        let info_row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<14}", label), label_style),
                Span::styled(value, value_style),
            ])
        };

        let account = Paragraph::new(vec![
            Line::from(Span::styled(
                self.user.name.clone(),
                Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(self.user.email.clone(), Style::default().fg(theme_colors.primary))),
            Line::from(""),
            info_row("Company:", self.user.company.clone().unwrap_or_else(|| "N/A".to_string())),
            info_row("Phone:", self.user.phone.clone().unwrap_or_else(|| "N/A".to_string())),
            info_row("Account Type:", self.user.role.label().to_string()),
            Line::from(Span::styled(
                format!("Version {}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(theme_colors.text_secondary).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Right),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("👤 Account Information")
                .title_style(Style::default().fg(theme_colors.accent))
                .border_style(Style::default().fg(theme_colors.border)),
        );
        frame.render_widget(account, chunks[0]);

        let items: Vec<ListItem> = ENTRIES
            .iter()
            .map(|entry| {
                let color = match entry {
                    ProfileEntry::Logout => theme_colors.error,
                    ProfileEntry::Social(..) => theme_colors.primary,
                    _ => theme_colors.text,
                };
                ListItem::new(Line::from(Span::styled(entry.label(), Style::default().fg(color))))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("🔗 Follow Us & Support")
                    .title_style(Style::default().fg(theme_colors.accent))
                    .border_style(Style::default().fg(theme_colors.border)),
            )
            .highlight_style(Style::default().bg(theme_colors.container).add_modifier(Modifier::BOLD))
            .highlight_symbol("► ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        render_controls_footer(
            frame,
            chunks[2],
            &theme_colors,
            &[("↑↓/jk", "Navigate"), ("Enter", "Open"), ("l", "Logout")],
        );

        if self.confirming_logout {
            render_confirmation(frame, area, &theme_colors, "Logout", "Are you sure you want to logout?");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DemoIdentityProvider, DemoProviderConfig, SessionConfig, SessionManager};
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn signed_in_page(email: &str) -> ProfilePage {
        let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig::instant()));
        let session = SessionManager::new(provider, SessionConfig::default());
        session.login(email, "password1").await.unwrap();
        ProfilePage::new(session.current_user().unwrap())
    }

    #[tokio::test]
    async fn logout_needs_confirmation() {
        let mut page = signed_in_page("client@plugandtest.com").await;

        page.handle_input(key(KeyCode::Char('l'))).await.unwrap();
        assert!(page.is_confirming_logout());
        assert_eq!(page.handle_input(key(KeyCode::Esc)).await.unwrap(), PageAction::None);
        assert!(!page.is_confirming_logout());

        page.handle_input(key(KeyCode::Char('l'))).await.unwrap();
        assert_eq!(page.handle_input(key(KeyCode::Char('y'))).await.unwrap(), PageAction::Logout);
        assert!(!page.is_confirming_logout());
    }

    #[tokio::test]
    async fn shows_role_label_and_fallbacks() {
        let mut page = signed_in_page("ops-admin@plugandtest.com").await;
        page.user.company = None;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("Administrator"));
        assert!(screen.contains("N/A"));
    }

    #[tokio::test]
    async fn help_entry_reports_coming_soon() {
        let mut page = signed_in_page("client@plugandtest.com").await;
        for _ in 0..4 {
            page.handle_input(key(KeyCode::Down)).await.unwrap();
        }
        match page.handle_input(key(KeyCode::Enter)).await.unwrap() {
            PageAction::Notify(notice) => assert_eq!(notice.text, "Help documentation coming soon"),
            other => panic!("unexpected action {:?}", other),
        }
    }
}
