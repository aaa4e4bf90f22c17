//! Shipment list with status filter, status changes, deletion and tracking

use super::{Page, PageContext, PageId};
use crate::api::{Shipment, ShipmentSearchParams, ShipmentStatus};
use crate::tui::{
    components::{
        dialogs::{AlertOptions, ConfirmOptions, Dialogs, PromptOptions},
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

pub struct ShipmentsPage {
    table: DataTable,
    shipments: Vec<Shipment>,
    status_filter: Option<ShipmentStatus>,
    loaded: bool,
}

impl ShipmentsPage {
    pub fn new(page_size: u32) -> Self {
        Self {
            table: DataTable::new(
                "Kargolar",
                vec![
                    Column::new("Kargo No", Constraint::Length(12)),
                    Column::new("Gönderici", Constraint::Min(14)),
                    Column::new("Çıkış", Constraint::Length(12)),
                    Column::new("Varış", Constraint::Length(12)),
                    Column::new("Tip", Constraint::Length(8)),
                    Column::new("Durum", Constraint::Length(14)),
                ],
                page_size,
            ),
            shipments: Vec::new(),
            status_filter: None,
            loaded: false,
        }
    }

    fn load(&mut self, ctx: &PageContext) {
        self.table.set_loading();
        let filter = self.status_filter;
        let ctx = ctx.clone();
        debug!(?filter, "Loading shipments");
        tokio::spawn(async move {
            let result = match filter {
                Some(durum) => {
                    let params = ShipmentSearchParams {
                        durum: Some(durum),
                        ..Default::default()
                    };
                    ctx.api.shipments().search(&params).await
                }
                None => ctx.api.shipments().list().await,
            };
            ctx.send(PageMessage::ShipmentsLoaded(result.map_err(|err| err.to_string())));
        });
    }

    /// Shipments are fetched at once; the table pages through them locally
    fn refresh_rows(&mut self) {
        let size = self.table.page_size() as usize;
        let start = self.table.page() as usize * size;
        let rows = self
            .shipments
            .iter()
            .skip(start)
            .take(size)
            .map(Self::row)
            .collect();
        self.table.set_rows(rows, self.shipments.len() as u64);
    }

    fn row(shipment: &Shipment) -> Vec<String> {
        vec![
            shipment.kargo_no.clone(),
            shipment.sender_name(),
            shipment.origin_name().to_string(),
            shipment.destination_name().to_string(),
            shipment.kargo_tipi.label().to_string(),
            shipment.durum.label().to_string(),
        ]
    }

    fn selected(&self) -> Option<&Shipment> {
        let offset = self.table.page() as usize * self.table.page_size() as usize;
        self.table
            .selected()
            .and_then(|index| self.shipments.get(offset + index))
    }

    fn cycle_filter(&mut self) {
        let statuses = ShipmentStatus::ALL;
        self.status_filter = match self.status_filter {
            None => statuses.first().copied(),
            Some(current) => statuses
                .iter()
                .position(|status| *status == current)
                .and_then(|index| statuses.get(index + 1))
                .copied(),
        };
    }

    /// Prompt for the new status; the PATCH runs before the prompt closes and
    /// an unknown status or rejected update keeps it open with the error
    fn prompt_status(&self, ctx: &PageContext) -> Result<()> {
        let Some(shipment) = self.selected() else {
            return Ok(());
        };
        let id = shipment.id;
        let kargo_no = shipment.kargo_no.clone();
        let choices = ShipmentStatus::ALL
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let api = ctx.api.clone();
        let handle = ctx.dialogs.prompt(
            format!("{} için yeni durum ({})", kargo_no, choices),
            PromptOptions::new()
                .title("Kargo durumu")
                .ok_text("Güncelle")
                .cancel_text("Vazgeç")
                .on_close(move |answer| {
                    let api = api.clone();
                    async move {
                        if let Some(answer) = answer {
                            let status: ShipmentStatus = answer.trim().parse()?;
                            api.shipments().update_status(id, status).await?;
                        }
                        Ok::<_, anyhow::Error>(())
                    }
                }),
        )?;

        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Ok(Some(status)) = handle.await {
                info!(shipment = id, status = status.trim(), "Shipment status changed");
                ctx.notify_success(format!("{} durumu güncellendi", kargo_no));
                ctx.send(PageMessage::RefreshShipments);
            }
        });
        Ok(())
    }

    fn confirm_delete(&self, ctx: &PageContext) -> Result<()> {
        let Some(shipment) = self.selected() else {
            return Ok(());
        };
        let id = shipment.id;
        let kargo_no = shipment.kargo_no.clone();

        let api = ctx.api.clone();
        let handle = ctx.dialogs.confirm(
            format!("{} numaralı kargo silinsin mi? Bu işlem geri alınamaz.", kargo_no),
            ConfirmOptions::new()
                .title("Kargoyu sil")
                .ok_text("Sil")
                .cancel_text("Vazgeç")
                .severity(Severity::Error)
                .on_close(move |confirmed| {
                    let api = api.clone();
                    async move {
                        if confirmed {
                            api.shipments().delete(id).await?;
                        }
                        Ok::<_, anyhow::Error>(())
                    }
                }),
        )?;

        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Ok(true) = handle.await {
                info!(shipment = id, "Shipment deleted");
                ctx.notify_success(format!("{} silindi", kargo_no));
                ctx.send(PageMessage::RefreshShipments);
            }
        });
        Ok(())
    }

    fn prompt_track(&self, ctx: &PageContext) -> Result<()> {
        let handle = ctx.dialogs.prompt(
            "Kargo numarası",
            PromptOptions::new().title("Kargo takip").ok_text("Sorgula").cancel_text("Vazgeç"),
        )?;
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let Ok(Some(kargo_no)) = handle.await else {
                return;
            };
            match ctx.api.shipments().track(kargo_no.trim()).await {
                Ok(shipment) => {
                    if let Err(err) = show_details(&ctx.dialogs, &shipment) {
                        debug!(error = %err, "Could not show tracking result");
                    }
                }
                Err(err) => ctx.notify_error(err.to_string()),
            }
        });
        Ok(())
    }
}

fn show_details(dialogs: &Dialogs, shipment: &Shipment) -> Result<()> {
    let mut lines = vec![
        format!("Gönderici: {}", shipment.sender_name()),
        format!("Güzergah: {} → {}", shipment.origin_name(), shipment.destination_name()),
        format!("İçerik: {} ({})", shipment.icerik, shipment.kargo_tipi.label()),
        format!(
            "Ağırlık: {} kg, Hacim: {} m³, Adet: {}",
            shipment.agirlik, shipment.hacim, shipment.miktar
        ),
        format!("Durum: {}", shipment.durum.label()),
    ];
    let assigned = [
        ("Toplama", &shipment.toplama_gonullusu_detail),
        ("Taşıma", &shipment.tasima_gonullusu_detail),
        ("Dağıtım", &shipment.dagitim_gonullusu_detail),
    ];
    for (role, detail) in assigned {
        if let Some(detail) = detail {
            lines.push(format!("{}: {} ({})", role, detail.full_name, detail.gonulluluk_no));
        }
    }
    if let Some(note) = shipment.ozel_not.as_deref().filter(|note| !note.is_empty()) {
        lines.push(format!("Not: {}", note));
    }

    // Result is only an acknowledgement
    let _ = dialogs.alert(
        lines.join("\n"),
        AlertOptions::new().title(shipment.kargo_no.clone()).ok_text("Kapat"),
    )?;
    Ok(())
}

impl Page for ShipmentsPage {
    fn id(&self) -> PageId {
        PageId::Shipments
    }

    fn title(&self) -> &str {
        "Kargolar"
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
            KeyCode::Char('f') => {
                self.cycle_filter();
                self.table.set_page(0);
                self.load(ctx);
            }
            KeyCode::Char('u') => self.prompt_status(ctx)?,
            KeyCode::Char('d') | KeyCode::Delete => self.confirm_delete(ctx)?,
            KeyCode::Char('t') => self.prompt_track(ctx)?,
            _ => match self.table.handle_key(key) {
                TableAction::NextPage | TableAction::PreviousPage => self.refresh_rows(),
                TableAction::Activate(_) => {
                    if let Some(shipment) = self.selected() {
                        show_details(&ctx.dialogs, shipment)?;
                    }
                }
                TableAction::Moved | TableAction::None => {}
            },
        }
        Ok(())
    }

    fn handle_message(&mut self, message: PageMessage, ctx: &PageContext) {
        match message {
            PageMessage::ShipmentsLoaded(Ok(shipments)) => {
                self.shipments = shipments;
                // Stay in range when the list shrank
                let last_page =
                    self.shipments.len().saturating_sub(1) / self.table.page_size() as usize;
                if self.table.page() as usize > last_page {
                    self.table.set_rows(Vec::new(), self.shipments.len() as u64);
                    self.table.set_page(last_page as u32);
                }
                self.refresh_rows();
            }
            PageMessage::ShipmentsLoaded(Err(error)) => {
                self.table.set_error(error.clone());
                ctx.notify_error(error);
            }
            PageMessage::RefreshShipments => self.load(ctx),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let filter = self
            .status_filter
            .map(|status| status.label())
            .unwrap_or("tümü");
        self.table.set_subtitle(format!("durum: {}", filter));
        self.table.render(frame, area, theme);
    }

    fn help_text(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("↑/↓", "Seç"),
            ("Enter", "Ayrıntılar"),
            ("[ / ]", "Önceki / sonraki sayfa"),
            ("f", "Durum filtresi"),
            ("u", "Durumu güncelle"),
            ("d", "Sil"),
            ("t", "Kargo takip"),
            ("r", "Yenile"),
        ]
    }
}
