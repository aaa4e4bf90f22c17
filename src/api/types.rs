//! Request and response types of the relief backend

use super::reference::{city_display_name, CargoType, ShipmentStatus, VolunteerType};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ success, message, data, error, errors }` wrapper used by most endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

/// Paginated list body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A list body in any of the shapes the backend returns: a bare array, or an
/// object carrying the items under `data` or `results`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Wrapped {
        #[serde(default = "Option::default")]
        data: Option<Vec<T>>,
        #[serde(default = "Option::default")]
        results: Option<Vec<T>>,
    },
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Items(items) => items,
            Self::Wrapped { data, results } => data.or(results).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Volunteer {
    pub id: u64,
    #[serde(default)]
    pub user: Option<User>,
    /// `G` followed by 10 digits, assigned by the backend
    #[serde(default)]
    pub gonulluluk_no: String,
    pub ad: String,
    pub soyad: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: String,
    /// 10 digits without the leading zero
    #[serde(default)]
    pub telefon: String,
    pub sehir: String,
    #[serde(default)]
    pub sehir_display: Option<String>,
    pub gonullu_tipi: VolunteerType,
    #[serde(default)]
    pub gonullu_tipi_display: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Volunteer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.ad, self.soyad)
    }

    pub fn city_name(&self) -> &str {
        self.sehir_display
            .as_deref()
            .unwrap_or_else(|| city_display_name(&self.sehir))
    }

    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.created_at)
    }
}

/// Body of `POST /volunteers/`. The backend creates a login account for
/// the volunteer, so new registrations carry a password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewVolunteer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gonulluluk_no: Option<String>,
    pub ad: String,
    pub soyad: String,
    pub email: String,
    pub telefon: String,
    pub sehir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gonullu_tipi: Option<VolunteerType>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirm: Option<String>,
}

/// One page of volunteers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerPage {
    pub items: Vec<Volunteer>,
    pub item_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolunteerTypeCounts {
    #[serde(default)]
    pub toplama: u64,
    #[serde(default)]
    pub tasima: u64,
    #[serde(default)]
    pub dagitim: u64,
    #[serde(default)]
    pub karma: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolunteerStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    #[serde(default)]
    pub by_type: VolunteerTypeCounts,
    #[serde(default)]
    pub by_city: Vec<CityCount>,
    #[serde(default)]
    pub monthly_registrations: Vec<MonthCount>,
}

/// Volunteer summary embedded in a shipment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolunteerDetail {
    pub id: u64,
    #[serde(default)]
    pub gonulluluk_no: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub telefon: String,
    #[serde(default)]
    pub sehir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Shipment {
    pub id: u64,
    pub kargo_no: String,

    #[serde(default)]
    pub anonim_gonderici: bool,
    #[serde(default)]
    pub gonderici_ad: Option<String>,
    #[serde(default)]
    pub gonderici_soyad: Option<String>,
    #[serde(default)]
    pub gonderici_telefon: Option<String>,
    #[serde(default)]
    pub gonderici_email: Option<String>,

    pub cikis_yeri: String,
    #[serde(default)]
    pub cikis_yeri_display: String,
    pub ulasacagi_yer: String,
    #[serde(default)]
    pub ulasacagi_yer_display: String,

    /// Decimal fields arrive as strings
    #[serde(default)]
    pub agirlik: String,
    #[serde(default)]
    pub hacim: String,
    #[serde(default)]
    pub miktar: u32,

    pub durum: ShipmentStatus,
    #[serde(default)]
    pub durum_display: String,
    pub kargo_tipi: CargoType,
    #[serde(default)]
    pub kargo_tipi_display: String,
    #[serde(default)]
    pub icerik: String,

    #[serde(default)]
    pub toplama_gonullusu: Option<u64>,
    #[serde(default)]
    pub toplama_gonullusu_detail: Option<VolunteerDetail>,
    #[serde(default)]
    pub tasima_gonullusu: Option<u64>,
    #[serde(default)]
    pub tasima_gonullusu_detail: Option<VolunteerDetail>,
    #[serde(default)]
    pub dagitim_gonullusu: Option<u64>,
    #[serde(default)]
    pub dagitim_gonullusu_detail: Option<VolunteerDetail>,

    #[serde(default)]
    pub ozel_not: Option<String>,

    #[serde(default)]
    pub olusturulma_tarihi: String,
    #[serde(default)]
    pub son_degisiklik: String,
}

impl Shipment {
    pub fn sender_name(&self) -> String {
        if self.anonim_gonderici {
            return "Anonim".to_string();
        }
        let parts: Vec<&str> = [&self.gonderici_ad, &self.gonderici_soyad]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" ")
        }
    }

    pub fn origin_name(&self) -> &str {
        if self.cikis_yeri_display.is_empty() {
            city_display_name(&self.cikis_yeri)
        } else {
            &self.cikis_yeri_display
        }
    }

    pub fn destination_name(&self) -> &str {
        if self.ulasacagi_yer_display.is_empty() {
            city_display_name(&self.ulasacagi_yer)
        } else {
            &self.ulasacagi_yer_display
        }
    }

    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.olusturulma_tarihi)
    }
}

/// Body of shipment create and update requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShipmentForm {
    pub anonim_gonderici: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gonderici_ad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gonderici_soyad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gonderici_telefon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gonderici_email: Option<String>,

    pub cikis_yeri: String,
    pub ulasacagi_yer: String,

    pub agirlik: String,
    pub hacim: String,
    pub miktar: u32,

    pub durum: ShipmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kargo_tipi: Option<CargoType>,
    pub icerik: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub toplama_gonullusu: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasima_gonullusu: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dagitim_gonullusu: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ozel_not: Option<String>,
}

impl From<&Shipment> for ShipmentForm {
    /// The editable fields of a stored shipment, as the base of an update
    fn from(shipment: &Shipment) -> Self {
        Self {
            anonim_gonderici: shipment.anonim_gonderici,
            gonderici_ad: shipment.gonderici_ad.clone(),
            gonderici_soyad: shipment.gonderici_soyad.clone(),
            gonderici_telefon: shipment.gonderici_telefon.clone(),
            gonderici_email: shipment.gonderici_email.clone(),
            cikis_yeri: shipment.cikis_yeri.clone(),
            ulasacagi_yer: shipment.ulasacagi_yer.clone(),
            agirlik: shipment.agirlik.clone(),
            hacim: shipment.hacim.clone(),
            miktar: shipment.miktar,
            durum: shipment.durum,
            kargo_tipi: Some(shipment.kargo_tipi),
            icerik: shipment.icerik.clone(),
            toplama_gonullusu: shipment.toplama_gonullusu,
            tasima_gonullusu: shipment.tasima_gonullusu,
            dagitim_gonullusu: shipment.dagitim_gonullusu,
            ozel_not: shipment.ozel_not.clone(),
        }
    }
}

/// Filters of `GET /kargo/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentSearchParams {
    pub search: Option<String>,
    pub durum: Option<ShipmentStatus>,
    pub kargo_tipi: Option<CargoType>,
    pub cikis_yeri: Option<String>,
    pub ulasacagi_yer: Option<String>,
    pub anonim_gonderici: Option<bool>,
    pub ordering: Option<String>,
}

impl ShipmentSearchParams {
    /// Query pairs, leaving out unset and blank values
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let pairs = [
            ("search", self.search.clone()),
            ("durum", self.durum.map(|status| status.to_string())),
            ("kargo_tipi", self.kargo_tipi.map(|kind| kind.to_string())),
            ("cikis_yeri", self.cikis_yeri.clone()),
            ("ulasacagi_yer", self.ulasacagi_yer.clone()),
            ("anonim_gonderici", self.anonim_gonderici.map(|flag| flag.to_string())),
            ("ordering", self.ordering.clone()),
        ];

        pairs
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .filter(|value| !value.is_empty())
                    .map(|value| (key, value))
            })
            .collect()
    }
}

/// Backend timestamps are RFC 3339
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_payload_shapes() {
        let bare: ListPayload<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(bare.into_items(), vec![1, 2]);

        let wrapped: ListPayload<u32> =
            serde_json::from_value(json!({"success": true, "data": [3]})).unwrap();
        assert_eq!(wrapped.into_items(), vec![3]);

        let paginated: ListPayload<u32> =
            serde_json::from_value(json!({"count": 1, "next": null, "results": [4]})).unwrap();
        assert_eq!(paginated.into_items(), vec![4]);

        let empty: ListPayload<u32> = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(empty.into_items().is_empty());
    }

    #[test]
    fn test_volunteer_from_backend() {
        let volunteer: Volunteer = serde_json::from_value(json!({
            "id": 7,
            "gonulluluk_no": "G0123456789",
            "ad": "Ayşe",
            "soyad": "Yılmaz",
            "email": "ayse@example.org",
            "telefon": "5321234567",
            "sehir": "izmir",
            "gonullu_tipi": "dagitim",
            "is_active": true,
            "created_at": "2024-02-06T09:30:00+03:00"
        }))
        .unwrap();

        assert_eq!(volunteer.display_name(), "Ayşe Yılmaz");
        assert_eq!(volunteer.city_name(), "İzmir");
        assert_eq!(volunteer.gonullu_tipi, VolunteerType::Dagitim);
        assert_eq!(volunteer.created().unwrap().to_rfc3339(), "2024-02-06T09:30:00+03:00");
    }

    #[test]
    fn test_shipment_form_skips_unset_fields() {
        let form = ShipmentForm {
            anonim_gonderici: true,
            cikis_yeri: "hatay".to_string(),
            ulasacagi_yer: "adana".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&form).unwrap();

        assert_eq!(body["durum"], "hazirlaniyor");
        assert!(body.get("gonderici_ad").is_none());
        assert!(body.get("kargo_tipi").is_none());
    }

    #[test]
    fn test_search_params_skip_blank_values() {
        let params = ShipmentSearchParams {
            search: Some(String::new()),
            durum: Some(ShipmentStatus::Yolda),
            anonim_gonderici: Some(false),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("durum", "yolda".to_string()),
                ("anonim_gonderici", "false".to_string())
            ]
        );
    }

    #[test]
    fn test_sender_name() {
        let mut shipment: Shipment = serde_json::from_value(json!({
            "id": 1,
            "kargo_no": "KRG-1",
            "gonderici_ad": "Ali",
            "gonderici_soyad": "Demir",
            "cikis_yeri": "hatay",
            "ulasacagi_yer": "adana",
            "durum": "yolda",
            "kargo_tipi": "gida"
        }))
        .unwrap();

        assert_eq!(shipment.sender_name(), "Ali Demir");
        assert_eq!(shipment.origin_name(), "Hatay");
        shipment.anonim_gonderici = true;
        assert_eq!(shipment.sender_name(), "Anonim");
    }
}
