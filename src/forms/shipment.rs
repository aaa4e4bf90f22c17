use super::{is_valid_email, Validation};
use crate::api::ShipmentForm;

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |value| value.trim().is_empty())
}

/// Check a shipment form before create or update
pub fn validate_shipment(form: &ShipmentForm) -> Validation {
    let mut validation = Validation::new();

    if !form.anonim_gonderici {
        if is_blank(&form.gonderici_ad) {
            validation.push("gonderici_ad", "Gönderici adı gereklidir");
        }
        if is_blank(&form.gonderici_soyad) {
            validation.push("gonderici_soyad", "Gönderici soyadı gereklidir");
        }
    }

    let required = [
        ("cikis_yeri", &form.cikis_yeri, "Çıkış yeri seçilmelidir"),
        ("ulasacagi_yer", &form.ulasacagi_yer, "Varış yeri seçilmelidir"),
        ("icerik", &form.icerik, "İçerik açıklaması gereklidir"),
        ("agirlik", &form.agirlik, "Ağırlık gereklidir"),
        ("hacim", &form.hacim, "Hacim gereklidir"),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            validation.push(field, message);
        }
    }

    if form.kargo_tipi.is_none() {
        validation.push("kargo_tipi", "Kargo tipi seçilmelidir");
    }
    if form.toplama_gonullusu.is_none() {
        validation.push("toplama_gonullusu", "Toplama gönüllüsü seçilmelidir");
    }

    if let Some(email) = form.gonderici_email.as_deref() {
        if !email.trim().is_empty() && !is_valid_email(email) {
            validation.push("gonderici_email", "Geçerli bir e-posta adresi giriniz");
        }
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CargoType;

    fn complete() -> ShipmentForm {
        ShipmentForm {
            gonderici_ad: Some("Ali".into()),
            gonderici_soyad: Some("Demir".into()),
            cikis_yeri: "istanbul".into(),
            ulasacagi_yer: "hatay".into(),
            agirlik: "10".into(),
            hacim: "0.5".into(),
            miktar: 1,
            kargo_tipi: Some(CargoType::Giyim),
            icerik: "Mont".into(),
            toplama_gonullusu: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        assert!(validate_shipment(&complete()).is_valid());
    }

    #[test]
    fn test_anonymous_sender_needs_no_name() {
        let mut form = complete();
        form.gonderici_ad = None;
        form.gonderici_soyad = Some("   ".into());
        let validation = validate_shipment(&form);
        assert_eq!(validation.message_for("gonderici_ad"), Some("Gönderici adı gereklidir"));
        assert_eq!(validation.message_for("gonderici_soyad"), Some("Gönderici soyadı gereklidir"));

        form.anonim_gonderici = true;
        assert!(validate_shipment(&form).is_valid());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut form = complete();
        form.icerik = "  ".into();
        form.kargo_tipi = None;
        form.toplama_gonullusu = None;

        let fields: Vec<_> = validate_shipment(&form)
            .issues()
            .iter()
            .map(|issue| issue.field)
            .collect();
        assert_eq!(fields, vec!["icerik", "kargo_tipi", "toplama_gonullusu"]);
    }

    #[test]
    fn test_optional_email_checked_when_given() {
        let mut form = complete();
        form.gonderici_email = Some(" ".into());
        assert!(validate_shipment(&form).is_valid());

        form.gonderici_email = Some("ali@".into());
        assert_eq!(
            validate_shipment(&form).message_for("gonderici_email"),
            Some("Geçerli bir e-posta adresi giriniz")
        );
    }
}
