use super::input::ensure_valid;
use super::volunteers::to_json;
use crate::api::{
    self, ApiClient, CargoType, Shipment, ShipmentForm, ShipmentSearchParams, ShipmentStatus,
};
use crate::config::Config;
use crate::forms::validate_shipment;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value};
use tracing::info;

/// Query and update cargo shipments
#[derive(Debug, Args)]
pub struct ShipmentsCommand {
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: ShipmentsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ShipmentsSubcommand {
    /// List shipments, optionally filtered
    List(ListArgs),
    /// Show a single shipment
    Show {
        id: u64,
    },
    /// Look a shipment up by its tracking number
    Track {
        kargo_no: String,
    },
    /// Change the status of a shipment
    SetStatus {
        id: u64,
        status: ShipmentStatus,
    },
    /// Register a shipment
    Create(ShipmentArgs),
    /// Change the given fields of a shipment
    Update {
        id: u64,
        #[command(flatten)]
        fields: ShipmentArgs,
    },
    /// Dashboard counters
    Stats,
    /// Delete a shipment
    Delete {
        id: u64,
        /// Required; deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Only this status
    #[arg(long)]
    pub status: Option<ShipmentStatus>,

    /// Only this cargo type
    #[arg(long = "type")]
    pub kind: Option<CargoType>,

    /// Only shipments leaving this city key
    #[arg(long)]
    pub from: Option<String>,

    /// Only shipments going to this city key
    #[arg(long)]
    pub to: Option<String>,

    /// Only shipments assigned to this volunteer id
    #[arg(long, conflicts_with_all = ["status", "kind", "from", "to", "search"])]
    pub volunteer: Option<u64>,

    /// Free text search
    #[arg(short, long)]
    pub search: Option<String>,
}

impl ListArgs {
    fn search_params(&self) -> Option<ShipmentSearchParams> {
        let params = ShipmentSearchParams {
            search: self.search.clone(),
            durum: self.status,
            kargo_tipi: self.kind,
            cikis_yeri: self.from.clone(),
            ulasacagi_yer: self.to.clone(),
            ..Default::default()
        };
        (params != ShipmentSearchParams::default()).then_some(params)
    }
}

/// Shipment fields; on update only the given ones change
#[derive(Debug, Default, Args)]
pub struct ShipmentArgs {
    /// Anonymous sender; no sender name needed
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub anonymous: Option<bool>,

    #[arg(long)]
    pub sender_first_name: Option<String>,

    #[arg(long)]
    pub sender_last_name: Option<String>,

    #[arg(long)]
    pub sender_phone: Option<String>,

    #[arg(long)]
    pub sender_email: Option<String>,

    /// Origin city key
    #[arg(long)]
    pub from: Option<String>,

    /// Destination city key
    #[arg(long)]
    pub to: Option<String>,

    /// Weight in kg
    #[arg(long)]
    pub weight: Option<String>,

    /// Volume in m³
    #[arg(long)]
    pub volume: Option<String>,

    /// Number of parcels (1 on create)
    #[arg(long)]
    pub quantity: Option<u32>,

    #[arg(long)]
    pub status: Option<ShipmentStatus>,

    #[arg(long = "type")]
    pub kind: Option<CargoType>,

    /// What the parcels hold
    #[arg(long)]
    pub contents: Option<String>,

    /// Volunteer id of the collector
    #[arg(long)]
    pub collector: Option<u64>,

    /// Volunteer id of the carrier
    #[arg(long)]
    pub carrier: Option<u64>,

    /// Volunteer id of the distributor
    #[arg(long)]
    pub distributor: Option<u64>,

    #[arg(long)]
    pub note: Option<String>,
}

impl ShipmentArgs {
    /// Overwrite the fields given on the command line
    fn apply(&self, form: &mut ShipmentForm) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_some<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set(&mut form.anonim_gonderici, &self.anonymous);
        set_some(&mut form.gonderici_ad, &self.sender_first_name);
        set_some(&mut form.gonderici_soyad, &self.sender_last_name);
        set_some(&mut form.gonderici_telefon, &self.sender_phone);
        set_some(&mut form.gonderici_email, &self.sender_email);
        set(&mut form.cikis_yeri, &self.from);
        set(&mut form.ulasacagi_yer, &self.to);
        set(&mut form.agirlik, &self.weight);
        set(&mut form.hacim, &self.volume);
        set(&mut form.miktar, &self.quantity);
        set(&mut form.durum, &self.status);
        set_some(&mut form.kargo_tipi, &self.kind);
        set(&mut form.icerik, &self.contents);
        set_some(&mut form.toplama_gonullusu, &self.collector);
        set_some(&mut form.tasima_gonullusu, &self.carrier);
        set_some(&mut form.dagitim_gonullusu, &self.distributor);
        set_some(&mut form.ozel_not, &self.note);
    }

    fn to_form(&self) -> ShipmentForm {
        let mut form = ShipmentForm {
            miktar: 1,
            ..Default::default()
        };
        self.apply(&mut form);
        form
    }
}

impl ShipmentsCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let api = api::connect(config)?;
        print!("{}", self.run(&api).await?);
        Ok(())
    }

    /// Run the command and return its output
    pub async fn run(&self, api: &ApiClient) -> Result<String> {
        let shipments = api.shipments();
        let output = match &self.command {
            ShipmentsSubcommand::List(args) => {
                let items = match (args.volunteer, args.search_params()) {
                    (Some(volunteer), _) => shipments.by_volunteer(volunteer).await?,
                    (None, Some(params)) => shipments.search(&params).await?,
                    (None, None) => shipments.list().await?,
                };
                if self.json {
                    to_json(&items)?
                } else {
                    format!("{}{} kargo\n", format_table(&items), items.len())
                }
            }
            ShipmentsSubcommand::Show { id } => self.single(shipments.get(*id).await?)?,
            ShipmentsSubcommand::Track { kargo_no } => {
                self.single(shipments.track(kargo_no).await?)?
            }
            ShipmentsSubcommand::Create(fields) => {
                let form = fields.to_form();
                ensure_valid(&validate_shipment(&form))?;
                let shipment = shipments.create(&form).await?;
                info!(shipment = shipment.id, kargo_no = %shipment.kargo_no, "Shipment created");
                self.saved("Kargo kaydedildi", shipment)?
            }
            ShipmentsSubcommand::Update { id, fields } => {
                let mut form = ShipmentForm::from(&shipments.get(*id).await?);
                fields.apply(&mut form);
                ensure_valid(&validate_shipment(&form))?;
                let shipment = shipments.update(*id, &form).await?;
                info!(shipment = id, "Shipment updated");
                self.saved("Kargo güncellendi", shipment)?
            }
            ShipmentsSubcommand::Stats => {
                let stats = shipments.statistics().await?;
                if self.json {
                    to_json(&stats)?
                } else {
                    format_stats(&stats)
                }
            }
            ShipmentsSubcommand::SetStatus { id, status } => {
                let shipment = shipments.update_status(*id, *status).await?;
                info!(shipment = id, status = %status, "Shipment status changed");
                if self.json {
                    to_json(&shipment)?
                } else {
                    format!("{} durumu: {}\n", shipment.kargo_no, shipment.durum.label())
                }
            }
            ShipmentsSubcommand::Delete { id, yes } => {
                if !yes {
                    bail!("Refusing to delete shipment {} without --yes", id);
                }
                shipments.delete(*id).await?;
                info!(shipment = id, "Shipment deleted");
                format!("Kargo {} silindi\n", id)
            }
        };
        Ok(output)
    }

    fn single(&self, shipment: Shipment) -> Result<String> {
        if self.json {
            to_json(&shipment)
        } else {
            Ok(format_details(&shipment))
        }
    }

    fn saved(&self, headline: &str, shipment: Shipment) -> Result<String> {
        if self.json {
            to_json(&shipment)
        } else {
            Ok(format!("{}\n{}", headline, format_details(&shipment)))
        }
    }
}

/// One `key: value` line per counter; nested objects are indented
fn format_stats(stats: &Map<String, Value>) -> String {
    fn write_map(out: &mut String, map: &Map<String, Value>, depth: usize) {
        for (key, value) in map {
            let indent = "  ".repeat(depth);
            match value {
                Value::Object(inner) => {
                    out.push_str(&format!("{}{}:\n", indent, key));
                    write_map(out, inner, depth + 1);
                }
                Value::String(text) => out.push_str(&format!("{}{}: {}\n", indent, key, text)),
                other => out.push_str(&format!("{}{}: {}\n", indent, key, other)),
            }
        }
    }

    if stats.is_empty() {
        return "İstatistik bulunamadı\n".to_string();
    }
    let mut out = String::new();
    write_map(&mut out, stats, 0);
    out
}

fn format_table(shipments: &[Shipment]) -> String {
    let mut out = format!(
        "{:<6} {:<12} {:<20} {:<14} {:<14} {:<10} {}\n",
        "ID", "KARGO NO", "GÖNDERİCİ", "ÇIKIŞ", "VARIŞ", "TİP", "DURUM"
    );
    for shipment in shipments {
        out.push_str(&format!(
            "{:<6} {:<12} {:<20} {:<14} {:<14} {:<10} {}\n",
            shipment.id,
            shipment.kargo_no,
            shipment.sender_name(),
            shipment.origin_name(),
            shipment.destination_name(),
            shipment.kargo_tipi.label(),
            shipment.durum.label()
        ));
    }
    out
}

fn format_details(shipment: &Shipment) -> String {
    let mut lines = vec![
        format!("Kargo No: {}", shipment.kargo_no),
        format!("Gönderici: {}", shipment.sender_name()),
        format!("Çıkış: {}", shipment.origin_name()),
        format!("Varış: {}", shipment.destination_name()),
        format!("İçerik: {} ({})", shipment.icerik, shipment.kargo_tipi.label()),
        format!(
            "Ağırlık: {} kg, Hacim: {} m³, Adet: {}",
            shipment.agirlik, shipment.hacim, shipment.miktar
        ),
        format!("Durum: {}", shipment.durum.label()),
    ];
    let volunteers = [
        ("Toplama", &shipment.toplama_gonullusu_detail),
        ("Taşıma", &shipment.tasima_gonullusu_detail),
        ("Dağıtım", &shipment.dagitim_gonullusu_detail),
    ];
    for (role, detail) in volunteers {
        if let Some(detail) = detail {
            lines.push(format!("{}: {} ({})", role, detail.full_name, detail.gonulluluk_no));
        }
    }
    if let Some(created) = shipment.created() {
        lines.push(format!("Oluşturulma: {}", created.format("%d.%m.%Y %H:%M")));
    }
    lines.join("\n") + "\n"
}
