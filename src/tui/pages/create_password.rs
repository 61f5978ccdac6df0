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
use crate::auth::{PasswordForm, SessionManager, MIN_PASSWORD_LENGTH};
use crate::theme::ThemeManager;
use crate::tui::background::BackgroundCall;
use crate::tui::messages::{self, Notice};
use crate::tui::widgets::{
    edit_text, masked, render_controls_footer, render_input_field, render_loading_overlay,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum PasswordField {
    Token,
    Password,
    Confirmation,
}

impl PasswordField {
    fn next(self) -> Self {
        match self {
            Self::Token => Self::Password,
            Self::Password => Self::Confirmation,
            Self::Confirmation => Self::Token,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Token => Self::Confirmation,
            Self::Password => Self::Token,
            Self::Confirmation => Self::Password,
        }
    }
}

/// First-time password setup from an invitation token.
pub struct CreatePasswordPage {
    session: Arc<SessionManager>,
    form: PasswordForm,
    field: PasswordField,
    show_password: bool,
    submitting: BackgroundCall,
    theme_manager: ThemeManager,
}

impl CreatePasswordPage {
    pub fn new(session: Arc<SessionManager>, token: Option<String>) -> Self {
        let (form, field) = match token {
            Some(token) => (PasswordForm::with_token(token), PasswordField::Password),
            None => (PasswordForm::default(), PasswordField::Token),
        };

        Self {
            session,
            form,
            field,
            show_password: false,
            submitting: BackgroundCall::default(),
            theme_manager: ThemeManager::new(),
        }
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_running()
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        if self.is_submitting() {
            return Ok(PageAction::None);
        }

        match key.code {
            KeyCode::Esc => return Ok(PageAction::ShowLogin(None)),
            KeyCode::Tab | KeyCode::Down => self.field = self.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.previous(),
            KeyCode::F(1) => self.show_password = !self.show_password,
            KeyCode::Enter => {
                let (token, password) = match self.form.validate() {
                    Ok((token, password)) => (token.to_string(), password.to_string()),
                    Err(e) => return Ok(PageAction::Notify(Notice::from(&e))),
                };
                let session = Arc::clone(&self.session);
                self.submitting
                    .start(async move { session.create_password(&token, &password).await });
            }
            code => {
                let value = match self.field {
                    PasswordField::Token => &mut self.form.token,
                    PasswordField::Password => &mut self.form.password,
                    PasswordField::Confirmation => &mut self.form.confirmation,
                };
                edit_text(value, code);
            }
        }

        Ok(PageAction::None)
    }

    pub async fn update(&mut self) -> Result<PageAction> {
        let Some(result) = self.submitting.finished().await? else {
            return Ok(PageAction::None);
        };

        match result {
            Ok(()) => Ok(PageAction::ShowLogin(Some(Notice::success(
                "Success",
                "Your password has been created. You can now log in.",
            )))),
            Err(e) => Ok(PageAction::Notify(messages::create_password_failure(&e))),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme_colors = self.theme_manager.get_colors().clone();

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" 🔑 Create Your Password ")
            .title_style(Style::default().fg(theme_colors.primary).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(theme_colors.accent));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Intro
                Constraint::Length(3), // Token
                Constraint::Length(3), // Password
                Constraint::Length(3), // Confirmation
                Constraint::Length(4), // Requirements
                Constraint::Min(0),
                Constraint::Length(3), // Footer
            ])
            .split(inner);

        let intro = Paragraph::new(Line::from(Span::styled(
            "Set a password for your account using the token from your invitation email.",
            Style::default().fg(theme_colors.text_secondary),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(intro, chunks[0]);

        render_input_field(
            frame,
            chunks[1],
            &theme_colors,
            "Invitation Token",
            &self.form.token,
            self.field == PasswordField::Token,
        );

        let (password, confirmation) = if self.show_password {
            (self.form.password.clone(), self.form.confirmation.clone())
        } else {
            (masked(&self.form.password), masked(&self.form.confirmation))
        };
        render_input_field(
            frame,
            chunks[2],
            &theme_colors,
            "New Password",
            &password,
            self.field == PasswordField::Password,
        );
        render_input_field(
            frame,
            chunks[3],
            &theme_colors,
            "Confirm Password",
            &confirmation,
            self.field == PasswordField::Confirmation,
        );

        let requirement = |met: bool, text: String| {
            let (mark, color) = if met {
                ("✓", theme_colors.success)
            } else {
                ("○", theme_colors.text_secondary)
            };
            Line::from(vec![
                Span::styled(format!("{} ", mark), Style::default().fg(color)),
                Span::styled(text, Style::default().fg(color)),
            ])
        };
        let requirements = Paragraph::new(vec![
            requirement(
                self.form.is_long_enough(),
                format!("At least {} characters", MIN_PASSWORD_LENGTH),
            ),
            requirement(self.form.passwords_match(), "Passwords match".to_string()),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Password Requirements")
                .border_style(Style::default().fg(theme_colors.border)),
        );
        frame.render_widget(requirements, chunks[4]);

        render_controls_footer(
            frame,
            chunks[6],
            &theme_colors,
            &[
                ("Tab", "Next field"),
                ("F1", "Show/Hide"),
                ("Enter", "Create Password"),
                ("Esc", "Back to Login"),
            ],
        );

        if self.is_submitting() {
            render_loading_overlay(frame, area, &theme_colors, "Creating Password...");
        }
    }
}
