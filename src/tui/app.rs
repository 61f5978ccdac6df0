use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Tabs},
    Frame,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::background::BackgroundCall;
use super::messages::{self, Notice};
use super::pages::*;
use super::widgets::{render_controls_footer, render_loading_overlay, render_notice};
use crate::auth::{SessionManager, SessionSnapshot, User};
use crate::portal::{ClientRecords, PortalDataSource, PortalSummary};
use crate::routing::{route_for, Destination};
use crate::theme::{ThemeColors, ThemeManager};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientTab {
    Home = 0,
    Equipment = 1,
    Documents = 2,
    Profile = 3,
}

impl ClientTab {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Home,
            1 => Self::Equipment,
            2 => Self::Documents,
            3 => Self::Profile,
            _ => Self::Home,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Equipment => "Equipment",
            Self::Documents => "Documents",
            Self::Profile => "Profile",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Home => "🏠",
            Self::Equipment => "🔧",
            Self::Documents => "📄",
            Self::Profile => "👤",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::Equipment,
            Self::Equipment => Self::Documents,
            Self::Documents => Self::Profile,
            Self::Profile => Self::Home,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Home => Self::Profile,
            Self::Equipment => Self::Home,
            Self::Documents => Self::Equipment,
            Self::Profile => Self::Documents,
        }
    }

    pub fn all_tabs() -> [Self; 4] {
        [Self::Home, Self::Equipment, Self::Documents, Self::Profile]
    }
}

/// The tabbed screens of a signed-in client, built for one identity.
struct ClientView {
    user: User,
    active_tab: ClientTab,
    home_page: HomePage,
    equipment_page: EquipmentPage,
    documents_page: DocumentsPage,
    profile_page: ProfilePage,
}

impl ClientView {
    fn new(user: User, records: ClientRecords, theme_name: &str) -> Self {
        let mut view = Self {
            home_page: HomePage::new(&user, &records),
            equipment_page: EquipmentPage::new(records.equipment),
            documents_page: DocumentsPage::new(records.certificates, records.invoices),
            profile_page: ProfilePage::new(user.clone()),
            user,
            active_tab: ClientTab::Home,
        };
        view.home_page.update_theme(theme_name);
        view.equipment_page.update_theme(theme_name);
        view.documents_page.update_theme(theme_name);
        view.profile_page.update_theme(theme_name);
        view
    }

    /// Whether the active page wants raw keystrokes (search box, confirmation).
    fn captures_input(&self) -> bool {
        match self.active_tab {
            ClientTab::Equipment => self.equipment_page.captures_text(),
            ClientTab::Profile => self.profile_page.is_confirming_logout(),
            _ => false,
        }
    }

    async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        match self.active_tab {
            ClientTab::Home => self.home_page.handle_input(key).await,
            ClientTab::Equipment => self.equipment_page.handle_input(key).await,
            ClientTab::Documents => self.documents_page.handle_input(key).await,
            ClientTab::Profile => self.profile_page.handle_input(key).await,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.active_tab {
            ClientTab::Home => self.home_page.render(frame, area),
            ClientTab::Equipment => self.equipment_page.render(frame, area),
            ClientTab::Documents => self.documents_page.render(frame, area),
            ClientTab::Profile => self.profile_page.render(frame, area),
        }
    }
}

pub struct PortalApp {
    session: Arc<SessionManager>,
    session_rx: watch::Receiver<SessionSnapshot>,
    data: Arc<dyn PortalDataSource>,

    destination: Destination,
    // Identity the current views were built for
    routed_user: Option<String>,

    login_page: LoginPage,
    create_password_page: Option<CreatePasswordPage>,
    client_view: Option<ClientView>,
    admin_page: Option<AdminPage>,
    signing_out: BackgroundCall,

    notice: Option<Notice>,
    should_quit: bool,

    theme_manager: ThemeManager,

    // Animation
    animation_frame: usize,
    last_animation_update: Instant,
}

impl PortalApp {
    pub fn new(
        session: Arc<SessionManager>,
        data: Arc<dyn PortalDataSource>,
        theme_name: &str,
        invite_token: Option<String>,
    ) -> Self {
        let theme_manager = ThemeManager::named(theme_name);

        let mut login_page = LoginPage::new(session.clone());
        login_page.update_theme(theme_name);

        let create_password_page = invite_token.map(|token| {
            let mut page = CreatePasswordPage::new(session.clone(), Some(token));
            page.update_theme(theme_name);
            page
        });

        Self {
            session_rx: session.subscribe(),
            session,
            data,
            destination: Destination::Splash,
            routed_user: None,
            login_page,
            create_password_page,
            client_view: None,
            admin_page: None,
            signing_out: BackgroundCall::default(),
            notice: None,
            should_quit: false,
            theme_manager,
            animation_frame: 0,
            last_animation_update: Instant::now(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn client_tab(&self) -> Option<ClientTab> {
        self.client_view.as_ref().map(|view| view.active_tab)
    }

    pub fn is_creating_password(&self) -> bool {
        self.create_password_page.is_some()
    }

    /// Route to whatever the session currently holds.
    pub async fn initialize(&mut self) -> Result<()> {
        let snapshot = self.session_rx.borrow_and_update().clone();
        self.apply_snapshot(snapshot).await
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.notice.take().is_some() || self.signing_out.is_running() {
            return Ok(());
        }

        let action = match self.destination {
            Destination::Splash => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
                PageAction::None
            }
            Destination::Login => match self.create_password_page.as_mut() {
                Some(page) => page.handle_input(key).await?,
                None => self.login_page.handle_input(key).await?,
            },
            Destination::ClientTabs => self.handle_client_input(key).await?,
            Destination::AdminDashboard => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                    PageAction::None
                } else if let Some(page) = self.admin_page.as_mut() {
                    page.handle_input(key).await?
                } else {
                    PageAction::None
                }
            }
        };

        self.apply_action(action);
        self.sync_route().await
    }

    async fn handle_client_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        let Some(view) = self.client_view.as_mut() else {
            return Ok(PageAction::None);
        };

        if !view.captures_input() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(PageAction::None);
                }
                KeyCode::Tab => {
                    view.active_tab = view.active_tab.next();
                    return Ok(PageAction::None);
                }
                KeyCode::BackTab => {
                    view.active_tab = view.active_tab.previous();
                    return Ok(PageAction::None);
                }
                KeyCode::Char(c) => {
                    if let Some(digit) = c.to_digit(10) {
                        if (1..=4).contains(&digit) {
                            view.active_tab = ClientTab::from_index((digit - 1) as usize);
                            return Ok(PageAction::None);
                        }
                    }
                }
                _ => {}
            }
        }

        view.handle_input(key).await
    }

    pub async fn update(&mut self) -> Result<()> {
        if self.last_animation_update.elapsed() >= Duration::from_millis(100) {
            self.animation_frame = (self.animation_frame + 1) % 8;
            self.last_animation_update = Instant::now();
        }

        // A sign-in that succeeded has already moved the route off Login
        let action = self.login_page.update().await?;
        self.apply_action(action);
        if let Some(page) = self.create_password_page.as_mut() {
            let action = page.update().await?;
            self.apply_action(action);
        }

        if let Some(Err(e)) = self.signing_out.finished().await? {
            self.notice = Some(messages::logout_failure(&e));
        }

        self.sync_route().await
    }

    fn apply_action(&mut self, action: PageAction) {
        match action {
            PageAction::None => {}
            PageAction::Notify(notice) => self.notice = Some(notice),
            PageAction::OpenCreatePassword => {
                let mut page = CreatePasswordPage::new(self.session.clone(), None);
                page.update_theme(self.theme_manager.get_theme_name());
                self.create_password_page = Some(page);
            }
            PageAction::ShowLogin(notice) => {
                self.create_password_page = None;
                self.notice = notice;
            }
            PageAction::OpenDocuments(tab) => {
                if let Some(view) = self.client_view.as_mut() {
                    view.documents_page.show_tab(tab);
                    view.active_tab = ClientTab::Documents;
                }
            }
            PageAction::Logout => {
                if !self.signing_out.is_running() {
                    let session = Arc::clone(&self.session);
                    self.signing_out.start(async move { session.logout().await });
                }
            }
        }
    }

    /// Pick up session changes published since the last look.
    async fn sync_route(&mut self) -> Result<()> {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let snapshot = self.session_rx.borrow_and_update().clone();
        self.apply_snapshot(snapshot).await
    }

    async fn apply_snapshot(&mut self, snapshot: SessionSnapshot) -> Result<()> {
        let destination = route_for(&snapshot);
        let user_id = snapshot.user().map(|user| user.id.clone());
        if destination == self.destination && user_id == self.routed_user {
            return Ok(());
        }

        log::info!("Routing {:?} -> {:?}", self.destination, destination);
        self.client_view = None;
        self.admin_page = None;
        let theme_name = self.theme_manager.get_theme_name().to_string();

        match (destination, snapshot.identity) {
            (Destination::ClientTabs, Some(user)) => {
                let records = match self.data.records_for(&user.id).await {
                    Ok(records) => records,
                    Err(e) => {
                        log::error!("Failed to load records for {}: {:#}", user.id, e);
                        self.notice = Some(Notice::error("Error", "Could not load your records."));
                        ClientRecords::default()
                    }
                };
                self.client_view = Some(ClientView::new(user, records, &theme_name));
            }
            (Destination::AdminDashboard, Some(user)) => {
                let summary = self.data.summary().await.unwrap_or_else(|e| {
                    log::error!("Failed to load portal summary: {:#}", e);
                    PortalSummary::default()
                });
                let mut page = AdminPage::new(user, summary);
                page.update_theme(&theme_name);
                self.admin_page = Some(page);
            }
            (Destination::Login, _) => self.login_page.reset(),
            _ => {}
        }

        self.destination = destination;
        self.routed_user = user_id;
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let theme_colors = self.theme_manager.get_colors().clone();

        match self.destination {
            Destination::Splash => render_splash(frame, area, &theme_colors, self.animation_frame),
            Destination::Login => match self.create_password_page.as_mut() {
                Some(page) => page.render(frame, area),
                None => self.login_page.render(frame, area),
            },
            Destination::ClientTabs => self.render_client(frame, area, &theme_colors),
            Destination::AdminDashboard => {
                if let Some(page) = self.admin_page.as_mut() {
                    page.render(frame, area);
                }
            }
        }

        if self.signing_out.is_running() {
            render_loading_overlay(frame, area, &theme_colors, "Signing Out...");
        }

        if let Some(notice) = &self.notice {
            render_notice(frame, area, &theme_colors, notice);
        }
    }

    fn render_client(&mut self, frame: &mut Frame, area: Rect, theme_colors: &ThemeColors) {
        let Some(view) = self.client_view.as_mut() else {
            return;
        };

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header with tabs
                Constraint::Min(5),    // Content
                Constraint::Length(3), // Footer with shortcuts
            ])
            .split(area);

        let titles: Vec<Line> = ClientTab::all_tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                Line::from(vec![
                    Span::styled(tab.icon(), Style::default().fg(theme_colors.accent)),
                    Span::raw(" "),
                    Span::styled(tab.title(), Style::default().fg(theme_colors.text)),
                    Span::styled(format!(" {}", index + 1), Style::default().fg(theme_colors.text_secondary)),
                ])
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme_colors.accent))
                    .title(format!(" ⚡ Plug And Test - {} ", view.user.name))
                    .title_style(Style::default().fg(theme_colors.text)),
            )
            .select(view.active_tab as usize)
            .style(Style::default().fg(theme_colors.text_secondary))
            .highlight_style(
                Style::default()
                    .fg(theme_colors.primary)
                    .bg(theme_colors.container)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, main_layout[0]);

        view.render(frame, main_layout[1]);

        render_controls_footer(
            frame,
            main_layout[2],
            theme_colors,
            &[("Tab", "Switch tabs"), ("1-4", "Quick tab"), ("Ctrl+C/Q", "Quit")],
        );
    }
}
