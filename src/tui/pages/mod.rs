pub mod shipments;
pub mod volunteers;

use crate::api::ApiClient;
use crate::tui::{
    components::{dialogs::Dialogs, notifications::Notifications},
    events::{Event, PageMessage},
    styles::Theme,
    Frame,
};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Page identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Volunteers,
    Shipments,
}

/// Everything a page needs to start work and report back
#[derive(Clone)]
pub struct PageContext {
    pub api: ApiClient,
    pub dialogs: Dialogs,
    pub notifications: Notifications,
    pub events: mpsc::UnboundedSender<Event>,
    pub page_size: u32,
}

impl PageContext {
    /// Deliver a background result to the pages
    pub fn send(&self, message: PageMessage) {
        if self.events.send(Event::Page(message)).is_err() {
            debug!("Event loop is gone, dropping page message");
        }
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        if let Err(err) = self.notifications.success(message) {
            warn!(error = %err, "Could not show notification");
        }
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        if let Err(err) = self.notifications.error(message) {
            warn!(error = %err, "Could not show notification");
        }
    }
}

/// Base trait for all pages
///
/// Handlers never block: network calls and dialog results run in spawned
/// tasks that report back through [`PageMessage`]s.
pub trait Page: Send {
    fn id(&self) -> PageId;

    fn title(&self) -> &str;

    /// Called when the page becomes active
    fn on_enter(&mut self, ctx: &PageContext) {
        let _ = ctx;
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &PageContext) -> Result<()>;

    fn handle_message(&mut self, message: PageMessage, ctx: &PageContext);

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Page-specific key help
    fn help_text(&self) -> Vec<(&'static str, &'static str)> {
        vec![]
    }
}

/// Pages in tab order with the active one
pub struct PageManager {
    pages: Vec<Box<dyn Page>>,
    current: usize,
}

impl PageManager {
    pub fn new(pages: Vec<Box<dyn Page>>) -> Self {
        Self { pages, current: 0 }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.pages.iter().map(|page| page.title()).collect()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page_id(&self) -> Option<PageId> {
        self.pages.get(self.current).map(|page| page.id())
    }

    pub fn current_page(&self) -> Option<&dyn Page> {
        self.pages.get(self.current).map(|page| page.as_ref())
    }

    pub fn current_page_mut(&mut self) -> Option<&mut (dyn Page + 'static)> {
        self.pages.get_mut(self.current).map(|page| page.as_mut())
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut (dyn Page + 'static)> {
        self.pages
            .iter_mut()
            .find(|page| page.id() == id)
            .map(|page| page.as_mut())
    }

    /// Move `step` tabs forward (negative for backwards), wrapping around
    pub fn cycle(&mut self, step: isize, ctx: &PageContext) {
        if self.pages.is_empty() {
            return;
        }
        let len = self.pages.len() as isize;
        self.current = (self.current as isize + step).rem_euclid(len) as usize;
        self.pages[self.current].on_enter(ctx);
    }

    /// Enter the current page; used once at startup
    pub fn enter_current(&mut self, ctx: &PageContext) {
        if let Some(page) = self.pages.get_mut(self.current) {
            page.on_enter(ctx);
        }
    }
}
