//! Volunteer list: paged from the backend, with search, sorting and
//! activation

use super::{Page, PageContext, PageId};
use crate::api::{FilterItem, GridQuery, SortDirection, Volunteer};
use crate::tui::{
    components::{
        dialogs::{AlertOptions, ConfirmOptions, PromptOptions},
        table::{Column, DataTable, TableAction},
    },
    events::PageMessage,
    styles::{Severity, Theme},
    Frame,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Rect};
use tracing::{debug, info};

/// Sort orders cycled with `s`
const SORT_ORDERS: [(&str, SortDirection, &str); 4] = [
    ("created_at", SortDirection::Desc, "en yeni"),
    ("created_at", SortDirection::Asc, "en eski"),
    ("ad", SortDirection::Asc, "ad"),
    ("soyad", SortDirection::Asc, "soyad"),
];

pub struct VolunteersPage {
    table: DataTable,
    volunteers: Vec<Volunteer>,
    sort: usize,
    search: Option<String>,
    loaded: bool,
}

impl VolunteersPage {
    pub fn new(page_size: u32) -> Self {
        Self {
            table: DataTable::new(
                "Gönüllüler",
                vec![
                    Column::new("No", Constraint::Length(12)),
                    Column::new("Ad Soyad", Constraint::Min(16)),
                    Column::new("Şehir", Constraint::Length(14)),
                    Column::new("Tip", Constraint::Length(10)),
                    Column::new("Durum", Constraint::Length(6)),
                    Column::new("Kayıt", Constraint::Length(10)),
                ],
                page_size,
            ),
            volunteers: Vec::new(),
            sort: 0,
            search: None,
            loaded: false,
        }
    }

    /// Table state as a backend query
    pub fn query(&self) -> GridQuery {
        let (field, direction, _) = SORT_ORDERS[self.sort];
        let mut query =
            GridQuery::new(self.table.page(), self.table.page_size()).sort_by(field, direction);
        if let Some(search) = &self.search {
            query = query.filter(FilterItem::new("ad", "contains", search.as_str()));
        }
        query
    }

    fn load(&mut self, ctx: &PageContext) {
        self.table.set_loading();
        let query = self.query();
        let ctx = ctx.clone();
        debug!(page = query.page, "Loading volunteers");
        tokio::spawn(async move {
            let result = ctx.api.volunteers().get_many(&query).await;
            ctx.send(PageMessage::VolunteersLoaded(result.map_err(|err| err.to_string())));
        });
    }

    fn selected(&self) -> Option<&Volunteer> {
        self.table.selected().and_then(|index| self.volunteers.get(index))
    }

    fn row(volunteer: &Volunteer) -> Vec<String> {
        vec![
            volunteer.gonulluluk_no.clone(),
            volunteer.display_name(),
            volunteer.city_name().to_string(),
            volunteer.gonullu_tipi.to_string(),
            if volunteer.is_active { "Aktif" } else { "Pasif" }.to_string(),
            volunteer
                .created()
                .map(|created| created.format("%d.%m.%Y").to_string())
                .unwrap_or_default(),
        ]
    }

    fn open_search(&self, ctx: &PageContext) -> Result<()> {
        let handle = ctx.dialogs.prompt(
            "Ad, soyad veya gönüllülük numarası",
            PromptOptions::new().title("Gönüllü ara").ok_text("Ara").cancel_text("Vazgeç"),
        )?;
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Ok(Some(search)) = handle.await {
                ctx.send(PageMessage::SearchVolunteers(search));
            }
        });
        Ok(())
    }

    /// Ask before flipping `is_active`; the PATCH runs while the dialog shows
    /// its busy state and a failure keeps the dialog open
    fn confirm_toggle(&self, ctx: &PageContext) -> Result<()> {
        let Some(volunteer) = self.selected() else {
            return Ok(());
        };
        let id = volunteer.id;
        let activate = !volunteer.is_active;
        let name = volunteer.display_name();

        let (question, ok_text, severity) = if activate {
            (format!("{} aktif hale getirilsin mi?", name), "Aktifleştir", Severity::Success)
        } else {
            (format!("{} pasif hale getirilsin mi?", name), "Pasifleştir", Severity::Warning)
        };

        let api = ctx.api.clone();
        let handle = ctx.dialogs.confirm(
            question,
            ConfirmOptions::new()
                .title("Gönüllü durumu")
                .ok_text(ok_text)
                .cancel_text("Vazgeç")
                .severity(severity)
                .on_close(move |confirmed| {
                    let api = api.clone();
                    async move {
                        if confirmed {
                            api.volunteers().update_active(id, activate).await?;
                        }
                        Ok::<_, anyhow::Error>(())
                    }
                }),
        )?;

        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Ok(true) = handle.await {
                info!(volunteer = id, active = activate, "Volunteer status changed");
                ctx.notify_success(format!("{} güncellendi", name));
                ctx.send(PageMessage::RefreshVolunteers);
            }
        });
        Ok(())
    }

    fn show_details(&self, index: usize, ctx: &PageContext) -> Result<()> {
        let Some(volunteer) = self.volunteers.get(index) else {
            return Ok(());
        };
        let details = [
            format!("Gönüllülük No: {}", volunteer.gonulluluk_no),
            format!("E-posta: {}", volunteer.email),
            format!("Telefon: {}", volunteer.telefon),
            format!("Şehir: {}", volunteer.city_name()),
            format!("Tip: {}", volunteer.gonullu_tipi.label()),
            format!("Durum: {}", if volunteer.is_active { "Aktif" } else { "Pasif" }),
        ]
        .join("\n");

        // Result is only an acknowledgement
        let _ = ctx.dialogs.alert(
            details,
            AlertOptions::new().title(volunteer.display_name()).ok_text("Kapat"),
        )?;
        Ok(())
    }

    fn title_suffix(&self) -> String {
        let (_, _, label) = SORT_ORDERS[self.sort];
        match &self.search {
            Some(search) => format!("sıralama: {}, arama: \"{}\"", label, search),
            None => format!("sıralama: {}", label),
        }
    }
}

impl Page for VolunteersPage {
    fn id(&self) -> PageId {
        PageId::Volunteers
    }

    fn title(&self) -> &str {
        "Gönüllüler"
    }

    fn on_enter(&mut self, ctx: &PageContext) {
        if !self.loaded {
            self.loaded = true;
            self.load(ctx);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &PageContext) -> Result<()> {
        match key.code {
            KeyCode::Char('r') => self.load(ctx),
            KeyCode::Char('s') => {
                self.sort = (self.sort + 1) % SORT_ORDERS.len();
                self.table.set_page(0);
                self.load(ctx);
            }
            KeyCode::Char('/') => self.open_search(ctx)?,
            KeyCode::Char('c') if self.search.is_some() => {
                self.search = None;
                self.table.set_page(0);
                self.load(ctx);
            }
            KeyCode::Char('a') => self.confirm_toggle(ctx)?,
            _ => match self.table.handle_key(key) {
                TableAction::NextPage | TableAction::PreviousPage => self.load(ctx),
                TableAction::Activate(index) => self.show_details(index, ctx)?,
                TableAction::Moved | TableAction::None => {}
            },
        }
        Ok(())
    }

    fn handle_message(&mut self, message: PageMessage, ctx: &PageContext) {
        match message {
            PageMessage::VolunteersLoaded(Ok(page)) => {
                let rows = page.items.iter().map(Self::row).collect();
                self.table.set_rows(rows, page.item_count);
                self.volunteers = page.items;
            }
            PageMessage::VolunteersLoaded(Err(error)) => {
                self.table.set_error(error.clone());
                ctx.notify_error(error);
            }
            PageMessage::SearchVolunteers(search) => {
                self.search = Some(search);
                self.table.set_page(0);
                self.load(ctx);
            }
            PageMessage::RefreshVolunteers => self.load(ctx),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.table.set_subtitle(self.title_suffix());
        self.table.render(frame, area, theme);
    }

    fn help_text(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("↑/↓", "Seç"),
            ("Enter", "Ayrıntılar"),
            ("[ / ]", "Önceki / sonraki sayfa"),
            ("s", "Sıralamayı değiştir"),
            ("/", "Ara"),
            ("c", "Aramayı temizle"),
            ("a", "Aktif / pasif yap"),
            ("r", "Yenile"),
        ]
    }
}
