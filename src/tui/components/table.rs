//! Paged data table used by the list pages

use crate::tui::{
    styles::{Severity, Theme},
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

#[derive(Debug, Clone)]
pub struct Column {
    pub title: &'static str,
    pub width: Constraint,
}

impl Column {
    pub fn new(title: &'static str, width: Constraint) -> Self {
        Self { title, width }
    }
}

/// What a key did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    None,
    Moved,
    NextPage,
    PreviousPage,
    Activate(usize),
}

/// Rows of the current page plus paging and loading state
#[derive(Debug)]
pub struct DataTable {
    title: String,
    subtitle: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    state: TableState,
    page: u32,
    page_size: u32,
    total: u64,
    loading: bool,
    error: Option<String>,
}

impl DataTable {
    pub fn new(title: impl Into<String>, columns: Vec<Column>, page_size: u32) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            columns,
            rows: Vec::new(),
            state: TableState::default(),
            page: 0,
            page_size: page_size.max(1),
            total: 0,
            loading: false,
            error: None,
        }
    }

    /// Replace the rows after a load. `total` counts rows across all pages.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>, total: u64) {
        let selected = self.state.selected().unwrap_or(0);
        self.state
            .select((!rows.is_empty()).then(|| selected.min(rows.len() - 1)));
        self.rows = rows;
        self.total = total;
        self.loading = false;
        self.error = None;
    }

    /// Extra text shown after the title, such as the active sort
    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.subtitle = Some(subtitle.into());
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Current 0-based page
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.min(self.page_count().saturating_sub(1));
        self.state.select(None);
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn page_label(&self) -> String {
        format!("Sayfa {}/{} ({} kayıt)", self.page + 1, self.page_count(), self.total)
    }

    fn select_offset(&mut self, delta: isize) -> TableAction {
        if self.rows.is_empty() {
            return TableAction::None;
        }
        let last = self.rows.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.state.select(Some(next));
        TableAction::Moved
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TableAction {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select_offset(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_offset(-1),
            KeyCode::Home => self.select_offset(isize::MIN),
            KeyCode::End => self.select_offset(isize::MAX),
            KeyCode::PageDown | KeyCode::Char(']') if self.page + 1 < self.page_count() => {
                self.page += 1;
                self.state.select(None);
                TableAction::NextPage
            }
            KeyCode::PageUp | KeyCode::Char('[') if self.page > 0 => {
                self.page -= 1;
                self.state.select(None);
                TableAction::PreviousPage
            }
            KeyCode::Enter => self
                .state
                .selected()
                .map_or(TableAction::None, TableAction::Activate),
            _ => TableAction::None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let title = match &self.subtitle {
            Some(subtitle) => format!(" {} · {} ", self.title, subtitle),
            None => format!(" {} ", self.title),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme.border_style())
            .style(theme.base_style());

        if self.rows.is_empty() {
            let text = match (&self.error, self.loading) {
                (Some(error), _) => {
                    Line::styled(error.clone(), theme.severity_style(Severity::Error))
                }
                (None, true) => Line::styled("Yükleniyor…", theme.dim_style()),
                (None, false) => Line::styled("Kayıt bulunamadı", theme.dim_style()),
            };
            frame.render_widget(Paragraph::new(text).block(block), chunks[0]);
        } else {
            let header = Row::new(self.columns.iter().map(|column| Cell::from(column.title)))
                .style(theme.focused_border_style());
            let rows = self
                .rows
                .iter()
                .map(|row| Row::new(row.iter().map(|value| Cell::from(value.as_str()))));
            let widths: Vec<Constraint> = self.columns.iter().map(|column| column.width).collect();

            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .highlight_style(theme.selection_style())
                .highlight_symbol("> ");
            frame.render_stateful_widget(table, chunks[0], &mut self.state);
        }

        let footer = if self.loading && !self.rows.is_empty() {
            format!("{}  Yükleniyor…", self.page_label())
        } else {
            self.page_label()
        };
        frame.render_widget(Paragraph::new(footer).style(theme.dim_style()), chunks[1]);
    }
}
