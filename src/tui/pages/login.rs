use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;

use super::PageAction;
use crate::auth::{LoginForm, SessionManager};
use crate::theme::ThemeManager;
use crate::tui::background::BackgroundCall;
use crate::tui::messages::{self, Notice};
use crate::tui::widgets::{edit_text, masked, render_input_field, render_loading_overlay};

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoginField {
    Email,
    Password,
}

impl LoginField {
    fn toggle(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

pub struct LoginPage {
    session: Arc<SessionManager>,
    form: LoginForm,
    field: LoginField,
    show_password: bool,
    signing_in: BackgroundCall,
    theme_manager: ThemeManager,
}

impl LoginPage {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            form: LoginForm::default(),
            field: LoginField::Email,
            show_password: false,
            signing_in: BackgroundCall::default(),
            theme_manager: ThemeManager::new(),
        }
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    pub fn is_signing_in(&self) -> bool {
        self.signing_in.is_running()
    }

    pub fn reset(&mut self) {
        self.form.clear();
        self.field = LoginField::Email;
        self.show_password = false;
        self.signing_in.detach();
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        if self.is_signing_in() {
            return Ok(PageAction::None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = self.field.toggle();
            }
            KeyCode::F(1) => {
                self.show_password = !self.show_password;
            }
            KeyCode::F(2) => {
                return Ok(PageAction::OpenCreatePassword);
            }
            KeyCode::Enter => {
                if self.field == LoginField::Email && self.form.password.is_empty() {
                    self.field = LoginField::Password;
                    return Ok(PageAction::None);
                }
                let (email, password) = match self.form.validate() {
                    Ok((email, password)) => (email.to_string(), password.to_string()),
                    Err(e) => return Ok(PageAction::Notify(Notice::from(&e))),
                };
                let session = Arc::clone(&self.session);
                self.signing_in
                    .start(async move { session.login(&email, &password).await });
            }
            code => {
                let value = match self.field {
                    LoginField::Email => &mut self.form.email,
                    LoginField::Password => &mut self.form.password,
                };
                edit_text(value, code);
            }
        }

        Ok(PageAction::None)
    }

    pub async fn update(&mut self) -> Result<PageAction> {
        let Some(result) = self.signing_in.finished().await? else {
            return Ok(PageAction::None);
        };

        match result {
            Ok(()) => {
                self.reset();
                Ok(PageAction::None)
            }
            Err(e) => {
                self.form.password.clear();
                self.field = LoginField::Password;
                Ok(PageAction::Notify(messages::login_failure(&e)))
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme_colors = self.theme_manager.get_colors().clone();

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" ⚡ Plug And Test - Client Portal ")
            .title_style(Style::default().fg(theme_colors.primary).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(theme_colors.accent));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3), // Heading
                Constraint::Length(3), // Email
                Constraint::Length(3), // Password
                Constraint::Length(3), // Sign in button
                Constraint::Min(4),    // Help
            ])
            .split(inner);

        let heading = Paragraph::new(vec![
            Line::from(Span::styled(
                "Welcome Back",
                Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Sign in to view your appointments, equipment and documents",
                Style::default().fg(theme_colors.text_secondary),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(heading, chunks[0]);

        render_input_field(
            frame,
            chunks[1],
            &theme_colors,
            "Email",
            &self.form.email,
            self.field == LoginField::Email,
        );

        let password_display = if self.show_password {
            self.form.password.clone()
        } else {
            masked(&self.form.password)
        };
        render_input_field(
            frame,
            chunks[2],
            &theme_colors,
            "Password",
            &password_display,
            self.field == LoginField::Password,
        );

        let button_label = if self.is_signing_in() { "Signing In..." } else { "Sign In" };
        let button = Paragraph::new(button_label)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme_colors.background)
                    .bg(theme_colors.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme_colors.primary)),
            );
        frame.render_widget(button, chunks[3]);

        let key_style = Style::default().fg(theme_colors.accent).add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme_colors.text_secondary);
        let help = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Tab", key_style),
                Span::styled(" - Switch fields", desc_style),
            ]),
            Line::from(vec![
                Span::styled("F1", key_style),
                Span::styled(" - Toggle password visibility", desc_style),
            ]),
            Line::from(vec![
                Span::styled("F2", key_style),
                Span::styled(" - First time? Use the secure link sent to your email to create your password", desc_style),
            ]),
            Line::from(vec![
                Span::styled("Enter", key_style),
                Span::styled(" - Sign in   ", desc_style),
                Span::styled("Ctrl+C", key_style),
                Span::styled(" - Quit", desc_style),
            ]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Controls")
                .border_style(Style::default().fg(theme_colors.border)),
        );
        frame.render_widget(help, chunks[4]);

        if self.is_signing_in() {
            render_loading_overlay(frame, area, &theme_colors, "Signing In...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DemoIdentityProvider, DemoProviderConfig, SessionConfig};
    use crate::tui::messages::NoticeKind;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(page: &mut LoginPage, text: &str) {
        for c in text.chars() {
            page.handle_input(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    fn page() -> (LoginPage, Arc<SessionManager>) {
        let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig::instant()));
        let session = SessionManager::new(provider, SessionConfig::default());
        (LoginPage::new(session.clone()), session)
    }

    #[tokio::test]
    async fn empty_form_is_rejected_without_calling_the_provider() {
        let (mut page, session) = page();
        page.handle_input(key(KeyCode::Tab)).await.unwrap();
        let action = page.handle_input(key(KeyCode::Enter)).await.unwrap();

        match action {
            PageAction::Notify(notice) => {
                assert_eq!(notice.kind, NoticeKind::Error);
                assert_eq!(notice.text, "Please enter both email and password");
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert!(!page.is_signing_in());
        assert!(!session.is_authenticated());
    }

    async fn settle(page: &mut LoginPage) -> PageAction {
        for _ in 0..200 {
            let action = page.update().await.unwrap();
            if !page.is_signing_in() {
                return action;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("sign in never finished");
    }

    #[tokio::test]
    async fn submit_signs_in_in_the_background() {
        let (mut page, session) = page();
        type_text(&mut page, "client@plugandtest.com").await;
        page.handle_input(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut page, "hunter22").await;

        assert_eq!(page.handle_input(key(KeyCode::Enter)).await.unwrap(), PageAction::None);
        assert!(page.is_signing_in());

        assert_eq!(settle(&mut page).await, PageAction::None);
        assert_eq!(session.current_user().unwrap().id, "client-001");
    }

    #[tokio::test]
    async fn slow_provider_does_not_hold_up_the_tick() {
        let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig {
            restore_delay: Duration::ZERO,
            latency: Duration::from_secs(2),
        }));
        let session = SessionManager::new(provider, SessionConfig::default());
        let mut page = LoginPage::new(session.clone());
        type_text(&mut page, "client@plugandtest.com").await;
        page.handle_input(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut page, "hunter22").await;
        page.handle_input(key(KeyCode::Enter)).await.unwrap();

        let started = Instant::now();
        assert_eq!(page.update().await.unwrap(), PageAction::None);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(page.is_signing_in());
        assert!(!session.is_authenticated());

        // Keys are ignored while the call is in flight
        page.handle_input(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(page.form.password, "hunter22");

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        assert!(format!("{:?}", terminal.backend().buffer()).contains("Signing In..."));
    }

    #[tokio::test]
    async fn timed_out_login_clears_the_password() {
        let provider = Arc::new(DemoIdentityProvider::new(DemoProviderConfig {
            restore_delay: Duration::ZERO,
            latency: Duration::from_secs(2),
        }));
        let session = SessionManager::new(
            provider,
            SessionConfig {
                provider_timeout: Duration::from_millis(20),
            },
        );
        let mut page = LoginPage::new(session.clone());
        type_text(&mut page, "client@plugandtest.com").await;
        page.handle_input(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut page, "hunter22").await;
        page.handle_input(key(KeyCode::Enter)).await.unwrap();

        match settle(&mut page).await {
            PageAction::Notify(notice) => assert_eq!(notice.title, "Connection Problem"),
            other => panic!("unexpected action {:?}", other),
        }
        assert!(page.form.password.is_empty());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn f2_opens_password_setup() {
        let (mut page, _) = page();
        assert_eq!(
            page.handle_input(key(KeyCode::F(2))).await.unwrap(),
            PageAction::OpenCreatePassword
        );
    }

    #[tokio::test]
    async fn password_is_masked_until_toggled() {
        let (mut page, _) = page();
        page.handle_input(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut page, "secret99").await;

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("********"));
        assert!(!screen.contains("secret99"));

        page.handle_input(key(KeyCode::F(1))).await.unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("secret99"));
    }
}
