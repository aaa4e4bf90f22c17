use super::input::{ensure_valid, read_secrets};
use crate::api::{
    self, ApiClient, FilterItem, GridQuery, NewVolunteer, SortDirection, Volunteer,
    VolunteerStats, VolunteerType,
};
use crate::config::Config;
use crate::forms::validate_volunteer;
use anyhow::Result;
use clap::{ArgAction, Args, Subcommand};
use std::fmt::Write;
use tracing::info;

/// Query and update volunteers
#[derive(Debug, Args)]
pub struct VolunteersCommand {
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: VolunteersSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum VolunteersSubcommand {
    /// List one page of volunteers
    List(ListArgs),
    /// Show a single volunteer
    Show {
        id: u64,
    },
    /// Search by volunteer number or name
    Search {
        query: String,
    },
    /// Active volunteers, e.g. to pick one for a shipment
    Active {
        /// Only this volunteer type
        #[arg(long = "type")]
        kind: Option<VolunteerType>,
    },
    /// Register a volunteer with a login account
    Create(CreateArgs),
    /// Activate or deactivate a volunteer
    SetActive {
        id: u64,
        #[arg(action = ArgAction::Set)]
        active: bool,
    },
    /// Registration statistics
    Stats,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Only this volunteer type
    #[arg(long = "type")]
    pub kind: Option<VolunteerType>,

    /// Only this city key, e.g. `hatay`
    #[arg(long)]
    pub city: Option<String>,

    /// Only active (true) or inactive (false) volunteers
    #[arg(long)]
    pub active: Option<bool>,

    /// Free text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort field, prefix with `-` for descending
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,
}

impl ListArgs {
    fn to_query(&self, default_page_size: u32) -> GridQuery {
        let mut query = GridQuery::new(
            self.page.saturating_sub(1),
            self.page_size.unwrap_or(default_page_size),
        );
        if let Some(sort) = &self.sort {
            query = match sort.strip_prefix('-') {
                Some(field) => query.sort_by(field, SortDirection::Desc),
                None => query.sort_by(sort.as_str(), SortDirection::Asc),
            };
        }
        if let Some(kind) = self.kind {
            query = query.filter(FilterItem::new("gonullu_tipi", "equals", kind.as_str()));
        }
        if let Some(city) = &self.city {
            query = query.filter(FilterItem::new("sehir", "equals", city.as_str()));
        }
        if let Some(active) = self.active {
            query = query.filter(FilterItem::new("is_active", "is", active));
        }
        if let Some(search) = &self.search {
            query = query.filter(FilterItem::new("ad", "contains", search.as_str()));
        }
        query
    }
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Ten digits without the leading zero, e.g. 5321234567
    #[arg(long)]
    pub phone: Option<String>,

    /// City key, e.g. `hatay`
    #[arg(long)]
    pub city: Option<String>,

    #[arg(long = "type")]
    pub kind: Option<VolunteerType>,

    /// Volunteer number; assigned by the backend when omitted
    #[arg(long)]
    pub number: Option<String>,

    /// Register as inactive
    #[arg(long)]
    pub inactive: bool,

    /// Read the password and its repetition from two lines of standard input
    #[arg(long)]
    pub password_stdin: bool,
}

impl CreateArgs {
    fn to_form(&self, password: &str, repeated: &str) -> NewVolunteer {
        let text = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_string();
        NewVolunteer {
            gonulluluk_no: self.number.as_ref().map(|number| number.trim().to_string()),
            ad: text(&self.first_name),
            soyad: text(&self.last_name),
            email: text(&self.email),
            telefon: text(&self.phone),
            sehir: text(&self.city),
            gonullu_tipi: self.kind,
            is_active: !self.inactive,
            password: Some(password.to_string()),
            password_confirm: Some(repeated.to_string()),
        }
    }
}

impl VolunteersCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let api = api::connect(config)?;
        print!("{}", self.run(&api, config.page_size).await?);
        Ok(())
    }

    /// Run the command and return its output
    pub async fn run(&self, api: &ApiClient, page_size: u32) -> Result<String> {
        let volunteers = api.volunteers();
        let output = match &self.command {
            VolunteersSubcommand::List(args) => {
                let query = args.to_query(page_size);
                let page = volunteers.get_many(&query).await?;
                if self.json {
                    to_json(&page.items)?
                } else {
                    let mut out = format_table(&page.items);
                    writeln!(
                        out,
                        "Sayfa {} ({} / {} kayıt)",
                        args.page.max(1),
                        page.items.len(),
                        page.item_count
                    )?;
                    out
                }
            }
            VolunteersSubcommand::Show { id } => {
                let volunteer = volunteers.get_one(*id).await?;
                if self.json {
                    to_json(&volunteer)?
                } else {
                    format_details(&volunteer)
                }
            }
            VolunteersSubcommand::Search { query } => {
                self.listing(&volunteers.search(query).await, "gönüllü bulundu")?
            }
            VolunteersSubcommand::Active { kind } => {
                let items = match kind {
                    Some(kind) => volunteers.by_type(*kind).await?,
                    None => volunteers.active().await?,
                };
                self.listing(&items, "aktif gönüllü")?
            }
            VolunteersSubcommand::Create(args) => {
                let secrets =
                    read_secrets(args.password_stdin, &["Şifre: ", "Şifre (tekrar): "])?;
                self.create(api, &args.to_form(&secrets[0], &secrets[1])).await?
            }
            VolunteersSubcommand::SetActive { id, active } => {
                let volunteer = volunteers.update_active(*id, *active).await?;
                info!(volunteer = id, active, "Volunteer status changed");
                if self.json {
                    to_json(&volunteer)?
                } else {
                    let state = if volunteer.is_active { "aktif" } else { "pasif" };
                    format!("{} artık {}\n", volunteer.display_name(), state)
                }
            }
            VolunteersSubcommand::Stats => {
                let stats = volunteers.stats().await?;
                if self.json {
                    to_json(&stats)?
                } else {
                    format_stats(&stats)
                }
            }
        };
        Ok(output)
    }

    fn listing(&self, volunteers: &[Volunteer], noun: &str) -> Result<String> {
        if self.json {
            to_json(&volunteers)
        } else {
            Ok(format!("{}{} {}\n", format_table(volunteers), volunteers.len(), noun))
        }
    }

    /// Validate the form, then register it
    async fn create(&self, api: &ApiClient, form: &NewVolunteer) -> Result<String> {
        ensure_valid(&validate_volunteer(form))?;

        let volunteer = api.volunteers().create_one(form).await?;
        info!(volunteer = volunteer.id, "Volunteer registered");
        if self.json {
            to_json(&volunteer)
        } else {
            Ok(format!("Gönüllü kaydedildi\n{}", format_details(&volunteer)))
        }
    }
}

pub(super) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

fn format_table(volunteers: &[Volunteer]) -> String {
    let mut out = format!(
        "{:<6} {:<12} {:<24} {:<16} {:<20} {}\n",
        "ID", "NO", "AD SOYAD", "ŞEHİR", "TİP", "DURUM"
    );
    for volunteer in volunteers {
        out.push_str(&format!(
            "{:<6} {:<12} {:<24} {:<16} {:<20} {}\n",
            volunteer.id,
            volunteer.gonulluluk_no,
            volunteer.display_name(),
            volunteer.city_name(),
            volunteer.gonullu_tipi.label(),
            if volunteer.is_active { "Aktif" } else { "Pasif" }
        ));
    }
    out
}

fn format_details(volunteer: &Volunteer) -> String {
    let mut lines = vec![
        format!("Gönüllülük No: {}", volunteer.gonulluluk_no),
        format!("Ad Soyad: {}", volunteer.display_name()),
        format!("E-posta: {}", volunteer.email),
        format!("Telefon: {}", volunteer.telefon),
        format!("Şehir: {}", volunteer.city_name()),
        format!("Tip: {}", volunteer.gonullu_tipi.label()),
        format!("Durum: {}", if volunteer.is_active { "Aktif" } else { "Pasif" }),
    ];
    if let Some(created) = volunteer.created() {
        lines.push(format!("Kayıt: {}", created.format("%d.%m.%Y %H:%M")));
    }
    lines.join("\n") + "\n"
}

fn format_stats(stats: &VolunteerStats) -> String {
    let mut out = format!(
        "Toplam: {}\nAktif: {}\nPasif: {}\n\nTiplere göre:\n",
        stats.total, stats.active, stats.inactive
    );
    let by_type = [
        (VolunteerType::Toplama, stats.by_type.toplama),
        (VolunteerType::Tasima, stats.by_type.tasima),
        (VolunteerType::Dagitim, stats.by_type.dagitim),
        (VolunteerType::Karma, stats.by_type.karma),
    ];
    for (kind, count) in by_type {
        out.push_str(&format!("  {:<30} {}\n", kind.label(), count));
    }
    if !stats.by_city.is_empty() {
        out.push_str("\nŞehirlere göre:\n");
        for city in &stats.by_city {
            out.push_str(&format!("  {:<30} {}\n", city.city, city.count));
        }
    }
    out
}
