//! Reference data shared with the backend's choice fields

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// City keys accepted by the backend with their Turkish display names
pub const CITIES: [(&str, &str); 81] = [
    ("adana", "Adana"),
    ("adiyaman", "Adıyaman"),
    ("afyonkarahisar", "Afyonkarahisar"),
    ("agri", "Ağrı"),
    ("aksaray", "Aksaray"),
    ("amasya", "Amasya"),
    ("ankara", "Ankara"),
    ("antalya", "Antalya"),
    ("ardahan", "Ardahan"),
    ("artvin", "Artvin"),
    ("aydin", "Aydın"),
    ("balikesir", "Balıkesir"),
    ("bartin", "Bartın"),
    ("batman", "Batman"),
    ("bayburt", "Bayburt"),
    ("bilecik", "Bilecik"),
    ("bingol", "Bingöl"),
    ("bitlis", "Bitlis"),
    ("bolu", "Bolu"),
    ("burdur", "Burdur"),
    ("bursa", "Bursa"),
    ("canakkale", "Çanakkale"),
    ("cankiri", "Çankırı"),
    ("corum", "Çorum"),
    ("denizli", "Denizli"),
    ("diyarbakir", "Diyarbakır"),
    ("duzce", "Düzce"),
    ("edirne", "Edirne"),
    ("elazig", "Elazığ"),
    ("erzincan", "Erzincan"),
    ("erzurum", "Erzurum"),
    ("eskisehir", "Eskişehir"),
    ("gaziantep", "Gaziantep"),
    ("giresun", "Giresun"),
    ("gumushane", "Gümüşhane"),
    ("hakkari", "Hakkâri"),
    ("hatay", "Hatay"),
    ("igdir", "Iğdır"),
    ("isparta", "Isparta"),
    ("istanbul", "İstanbul"),
    ("izmir", "İzmir"),
    ("kahramanmaras", "Kahramanmaraş"),
    ("karabuk", "Karabük"),
    ("karaman", "Karaman"),
    ("kars", "Kars"),
    ("kastamonu", "Kastamonu"),
    ("kayseri", "Kayseri"),
    ("kilis", "Kilis"),
    ("kirikkale", "Kırıkkale"),
    ("kirklareli", "Kırklareli"),
    ("kirsehir", "Kırşehir"),
    ("kocaeli", "Kocaeli"),
    ("konya", "Konya"),
    ("kutahya", "Kütahya"),
    ("malatya", "Malatya"),
    ("manisa", "Manisa"),
    ("mardin", "Mardin"),
    ("mersin", "Mersin"),
    ("mugla", "Muğla"),
    ("mus", "Muş"),
    ("nevsehir", "Nevşehir"),
    ("nigde", "Niğde"),
    ("ordu", "Ordu"),
    ("osmaniye", "Osmaniye"),
    ("rize", "Rize"),
    ("sakarya", "Sakarya"),
    ("samsun", "Samsun"),
    ("sanliurfa", "Şanlıurfa"),
    ("siirt", "Siirt"),
    ("sinop", "Sinop"),
    ("sirnak", "Şırnak"),
    ("sivas", "Sivas"),
    ("tekirdag", "Tekirdağ"),
    ("tokat", "Tokat"),
    ("trabzon", "Trabzon"),
    ("tunceli", "Tunceli"),
    ("usak", "Uşak"),
    ("van", "Van"),
    ("yalova", "Yalova"),
    ("yozgat", "Yozgat"),
    ("zonguldak", "Zonguldak"),
];

/// Display name of a city key, or the key itself when unknown
pub fn city_display_name(key: &str) -> &str {
    CITIES
        .iter()
        .find(|(city, _)| *city == key)
        .map(|(_, name)| *name)
        .unwrap_or(key)
}

pub fn is_known_city(key: &str) -> bool {
    CITIES.iter().any(|(city, _)| *city == key)
}

/// Error for a value outside a choice list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownChoice {
    kind: &'static str,
    value: String,
    expected: String,
}

/// Declares a backend choice enum with its wire key and display label
macro_rules! choices {
    (
        $(#[$meta:meta])* $name:ident, $kind:literal,
        { $($variant:ident => $key:literal, $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Key used on the wire
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($key => Ok(Self::$variant),)+
                    _ => Err(UnknownChoice {
                        kind: $kind,
                        value: value.to_string(),
                        expected: [$($key),+].join(", "),
                    }),
                }
            }
        }
    };
}

choices!(
    /// Role a volunteer takes in the shipment chain
    VolunteerType, "volunteer type", {
        Toplama => "toplama", "Toplama Gönüllüsü",
        Tasima => "tasima", "Taşıma Gönüllüsü",
        Dagitim => "dagitim", "Dağıtım Gönüllüsü",
        Karma => "karma", "Karma Gönüllü (Tüm Görevler)",
    }
);

choices!(
    ShipmentStatus, "shipment status", {
        Hazirlaniyor => "hazirlaniyor", "Hazırlanıyor",
        Yolda => "yolda", "Yolda",
        TeslimEdildi => "teslim_edildi", "Teslim Edildi",
        IptalEdildi => "iptal_edildi", "İptal Edildi",
    }
);

choices!(
    CargoType, "cargo type", {
        Gida => "gida", "Gıda",
        Ilac => "ilac", "İlaç",
        Giyim => "giyim", "Giyim",
        Karisik => "karisik", "Karışık",
        Diger => "diger", "Diğer",
    }
);

impl Default for ShipmentStatus {
    fn default() -> Self {
        Self::Hazirlaniyor
    }
}
