use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::PageAction;
use crate::portal::{format_date, search_equipment, Equipment, TestStatus};
use crate::theme::ThemeManager;
use crate::tui::widgets::{edit_text, render_controls_footer, render_input_field};

pub struct EquipmentPage {
    equipment: Vec<Equipment>,
    query: String,
    searching: bool,
    list_state: ListState,
    theme_manager: ThemeManager,
}

impl EquipmentPage {
    pub fn new(equipment: Vec<Equipment>) -> Self {
        let mut list_state = ListState::default();
        if !equipment.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            equipment,
            query: String::new(),
            searching: false,
            list_state,
            theme_manager: ThemeManager::new(),
        }
    }

    pub fn update_theme(&mut self, theme_name: &str) {
        self.theme_manager.set_theme(theme_name);
    }

    /// True while keystrokes go to the search box.
    pub fn captures_text(&self) -> bool {
        self.searching
    }

    pub fn visible(&self) -> Vec<&Equipment> {
        search_equipment(&self.equipment, &self.query)
    }

    fn reset_selection(&mut self) {
        let count = self.visible().len();
        self.list_state.select(if count == 0 { None } else { Some(0) });
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> Result<PageAction> {
        if self.searching {
            match key.code {
                KeyCode::Enter => self.searching = false,
                KeyCode::Esc => {
                    self.searching = false;
                    self.query.clear();
                    self.reset_selection();
                }
                code => {
                    if edit_text(&mut self.query, code) {
                        self.reset_selection();
                    }
                }
            }
            return Ok(PageAction::None);
        }

        let count = self.visible().len();
        match key.code {
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Esc => {
                self.query.clear();
                self.reset_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.list_state.selected() {
                    if selected + 1 < count {
                        self.list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.list_state.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
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
                Constraint::Length(3), // Search
                Constraint::Min(5),    // List
                Constraint::Length(3), // Controls
            ])
            .split(area);

        let search_title = format!("🔍 Search equipment ({} items registered)", self.equipment.len());
        render_input_field(
            frame,
            chunks[0],
            &theme_colors,
            &search_title,
            &self.query,
            self.searching,
        );

        let items: Vec<ListItem> = self
            .visible()
            .into_iter()
            .map(|item| {
                let (icon, color) = match item.status {
                    TestStatus::Pass => ("✅", theme_colors.success),
                    TestStatus::Fail => ("❌", theme_colors.error),
                    TestStatus::Pending => ("⏳", theme_colors.warning),
                };

                let line1 = Line::from(vec![
                    Span::styled(format!("{} ", icon), Style::default().fg(color)),
                    Span::styled(
                        item.name.clone(),
                        Style::default().fg(theme_colors.text).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  [{}]", item.status.label()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ]);
                let line2 = Line::from(vec![
                    Span::styled(item.kind.clone(), Style::default().fg(theme_colors.accent)),
                    Span::styled(
                        format!(" • {} • {}", item.serial_number, item.location),
                        Style::default().fg(theme_colors.text_secondary),
                    ),
                ]);
                let line3 = Line::from(vec![
                    Span::styled(
                        format!("Last tested: {}", format_date(item.last_test_date)),
                        Style::default().fg(theme_colors.text_secondary),
                    ),
                    Span::styled(
                        format!("  Next test due: {}", format_date(item.next_test_date)),
                        Style::default().fg(theme_colors.primary),
                    ),
                ]);

                ListItem::new(Text::from(vec![line1, line2, line3]))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title("🔧 Equipment List")
            .title_style(Style::default().fg(theme_colors.accent))
            .border_style(Style::default().fg(theme_colors.border));

        if items.is_empty() {
            let empty = Paragraph::new("No equipment found")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme_colors.text_secondary))
                .block(block);
            frame.render_widget(empty, chunks[1]);
        } else {
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(theme_colors.container)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("► ");
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let controls: &[(&str, &str)] = if self.searching {
            &[("Type", "Filter"), ("Enter", "Done"), ("Esc", "Clear")]
        } else {
            &[("/", "Search"), ("↑↓/jk", "Navigate"), ("Esc", "Clear search")]
        };
        render_controls_footer(frame, chunks[2], &theme_colors, controls);
    }
}
