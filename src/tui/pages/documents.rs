use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use super::PageAction;
use crate::portal::{format_amount, format_date, Certificate, Invoice, InvoiceStatus};
use crate::theme::{ThemeColors, ThemeManager};
use crate::tui::messages::Notice;
use crate::tui::widgets::render_controls_footer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTab {
    Certificates,
    Invoices,
}

impl DocumentTab {
    pub fn title(self) -> &'static str {
        match self {
            Self::Certificates => "Certificates",
            Self::Invoices => "Invoices",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Certificates => Self::Invoices,
            Self::Invoices => Self::Certificates,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Certificates => 0,
            Self::Invoices => 1,
        }
    }
}

pub struct DocumentsPage {
    certificates: Vec<Certificate>,
    invoices: Vec<Invoice>,
    active_tab: DocumentTab,
    list_state: ListState,
    theme_manager: ThemeManager,
}

impl DocumentsPage {
    pub fn new(certificates: Vec<Certificate>, invoices: Vec<Invoice>) -> Self {
        let mut page = Self {
            certificates,
            invoices,
            active_tab: DocumentTab::Certificates,
            list_state: ListState::default(),
            theme_manager: ThemeManager::new(),
        };
        page.reset_selection();
        page
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    pub fn active_tab(&self) -> DocumentTab {
        self.active_tab
    }

    pub fn show_tab(&mut self, tab: DocumentTab) {
        self.active_tab = tab;
        self.reset_selection();
    }

    fn len(&self) -> usize {
        match self.active_tab {
            DocumentTab::Certificates => self.certificates.len(),
            DocumentTab::Invoices => self.invoices.len(),
        }
    }

    fn reset_selection(&mut self) {
        let selection = if self.len() == 0 { None } else { Some(0) };
        self.list_state.select(selection);
    }

    fn selected_file_name(&self) -> Option<&str> {
        let index = self.list_state.selected()?;
        match self.active_tab {
            DocumentTab::Certificates => self.certificates.get(index).map(|c| c.file_name.as_str()),
            DocumentTab::Invoices => self.invoices.get(index).map(|i| i.file_name.as_str()),
        }
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.show_tab(self.active_tab.toggle());
            }
            KeyCode::Char('c') => self.show_tab(DocumentTab::Certificates),
            KeyCode::Char('i') => self.show_tab(DocumentTab::Invoices),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.list_state.selected() {
                    if selected + 1 < self.len() {
                        self.list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.list_state.selected() {
                    self.list_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(file_name) = self.selected_file_name() {
                    log::info!("Download requested: {}", file_name);
                    return Ok(PageAction::Notify(Notice::info(
                        "Download",
                        format!("Downloading {}...", file_name),
                    )));
                }
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                if let Some(file_name) = self.selected_file_name() {
                    return Ok(PageAction::Notify(Notice::info(
                        "View",
                        format!("Opening {}...", file_name),
                    )));
                }
            }
            _ => {}
        }

        Ok(PageAction::None)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let theme_colors = self.theme_manager.get_colors().clone();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Sub tabs
                Constraint::Min(5),    // Documents
                Constraint::Length(3), // Controls
            ])
            .split(area);

        let titles: Vec<Line> = [DocumentTab::Certificates, DocumentTab::Invoices]
            .iter()
            .map(|tab| {
                let count = match tab {
                    DocumentTab::Certificates => self.certificates.len(),
                    DocumentTab::Invoices => self.invoices.len(),
                };
                Line::from(format!("{} ({})", tab.title(), count))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("📄 Documents")
                    .title_style(Style::default().fg(theme_colors.accent))
                    .border_style(Style::default().fg(theme_colors.border)),
            )
            .select(self.active_tab.index())
            .style(Style::default().fg(theme_colors.text_secondary))
            .highlight_style(
                Style::default()
                    .fg(theme_colors.primary)
                    .bg(theme_colors.container)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        let items = match self.active_tab {
            DocumentTab::Certificates => self.certificate_items(&theme_colors),
            DocumentTab::Invoices => self.invoice_items(&theme_colors),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.active_tab.title())
            .border_style(Style::default().fg(theme_colors.border));

        if items.is_empty() {
            let empty = Paragraph::new(format!("No {} available", self.active_tab.title().to_lowercase()))
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme_colors.text_secondary))
                .block(block);
            frame.render_widget(empty, chunks[1]);
        } else {
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(theme_colors.container).add_modifier(Modifier::BOLD))
                .highlight_symbol("► ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        render_controls_footer(
            frame,
            chunks[2],
            &theme_colors,
            &[
                ("←→", "Certificates/Invoices"),
                ("↑↓/jk", "Navigate"),
                ("d", "Download"),
                ("Enter/v", "View"),
            ],
        );
    }

    fn certificate_items(&self, theme_colors: &ThemeColors) -> Vec<ListItem<'static>> {
        self.certificates
            .iter()
            .map(|cert| {
                ListItem::new(Text::from(vec![
                    Line::from(Span::styled(
                        format!("📜 {}", cert.file_name),
                        Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!(
                            "Issued: {}  Expires: {}",
                            format_date(cert.issue_date),
                            format_date(cert.expiry_date)
                        ),
                        Style::default().fg(theme_colors.text_secondary),
                    )),
                    Line::from(Span::styled(
                        format!("🔧 {} items tested", cert.equipment_tested),
                        Style::default().fg(theme_colors.accent),
                    )),
                ]))
            })
            .collect()
    }

    fn invoice_items(&self, theme_colors: &ThemeColors) -> Vec<ListItem<'static>> {
        self.invoices
            .iter()
            .map(|invoice| {
                let status_color = match invoice.status {
                    InvoiceStatus::Paid => theme_colors.success,
                    InvoiceStatus::Pending => theme_colors.warning,
                    InvoiceStatus::Overdue => theme_colors.error,
                };

                ListItem::new(Text::from(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("🧾 {}", invoice.invoice_number),
                            Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {}", invoice.file_name),
                            Style::default().fg(theme_colors.text_secondary),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "Issued: {}  Due: {}",
                            format_date(invoice.issue_date),
                            format_date(invoice.due_date)
                        ),
                        Style::default().fg(theme_colors.text_secondary),
                    )),
                    Line::from(vec![
                        Span::styled("Amount: ", Style::default().fg(theme_colors.text_secondary)),
                        Span::styled(
                            format_amount(invoice.amount),
                            Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  [{}]", invoice.status.label()),
                            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                ]))
            })
            .collect()
    }
}
