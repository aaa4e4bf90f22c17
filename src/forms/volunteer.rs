use super::{is_valid_email, validate_password_change, Validation};
use crate::api::NewVolunteer;
use regex::Regex;
use std::sync::OnceLock;

fn volunteer_number() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"^G\d{10}$").expect("volunteer number pattern is valid"))
}

fn phone_number() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[1-9][0-9]{9}$").expect("phone pattern is valid"))
}

/// Check a volunteer form. `gonulluluk_no` is assigned by the backend, so it
/// is only checked when the form carries one; the password likewise.
pub fn validate_volunteer(volunteer: &NewVolunteer) -> Validation {
    let mut validation = Validation::new();

    if let Some(number) = &volunteer.gonulluluk_no {
        if number.is_empty() {
            validation.push("gonulluluk_no", "Gönüllülük numarası zorunludur");
        } else if !volunteer_number().is_match(number) {
            validation.push(
                "gonulluluk_no",
                "Gönüllülük numarası G ile başlamalı ve 10 haneli olmalıdır (örn: G0123456789)",
            );
        }
    }

    if volunteer.ad.is_empty() {
        validation.push("ad", "Ad alanı zorunludur");
    }
    if volunteer.soyad.is_empty() {
        validation.push("soyad", "Soyad alanı zorunludur");
    }

    if volunteer.email.is_empty() {
        validation.push("email", "E-posta adresi zorunludur");
    } else if !is_valid_email(&volunteer.email) {
        validation.push("email", "Geçerli bir e-posta adresi giriniz");
    }

    if volunteer.telefon.is_empty() {
        validation.push("telefon", "Telefon alanı zorunludur");
    } else if !phone_number().is_match(&volunteer.telefon) {
        validation.push(
            "telefon",
            "Telefon numarası 10 haneli olmalı ve 0 ile başlamamalı (5XXXXXXXXX)",
        );
    }

    if volunteer.sehir.is_empty() {
        validation.push("sehir", "Şehir alanı zorunludur");
    }
    if volunteer.gonullu_tipi.is_none() {
        validation.push("gonullu_tipi", "Gönüllü tipi zorunludur");
    }

    if let Some(password) = &volunteer.password {
        let confirmation = volunteer.password_confirm.as_deref().unwrap_or_default();
        validation.extend(validate_password_change(password, confirmation));
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VolunteerType;

    fn complete() -> NewVolunteer {
        NewVolunteer {
            gonulluluk_no: None,
            ad: "Ayşe".into(),
            soyad: "Yılmaz".into(),
            email: "ayse@example.org".into(),
            telefon: "5321234567".into(),
            sehir: "izmir".into(),
            gonullu_tipi: Some(VolunteerType::Dagitim),
            is_active: true,
            password: None,
            password_confirm: None,
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        assert!(validate_volunteer(&complete()).is_valid());
    }

    #[test]
    fn test_empty_form_reports_every_field_in_order() {
        let validation = validate_volunteer(&NewVolunteer::default());
        let fields: Vec<_> = validation.issues().iter().map(|issue| issue.field).collect();
        assert_eq!(
            fields,
            vec!["ad", "soyad", "email", "telefon", "sehir", "gonullu_tipi"]
        );
    }

    #[test]
    fn test_volunteer_number_checked_only_when_present() {
        let mut form = complete();
        form.gonulluluk_no = Some(String::new());
        assert_eq!(
            validate_volunteer(&form).message_for("gonulluluk_no"),
            Some("Gönüllülük numarası zorunludur")
        );

        form.gonulluluk_no = Some("G12345".into());
        assert!(validate_volunteer(&form)
            .message_for("gonulluluk_no")
            .unwrap()
            .starts_with("Gönüllülük numarası G ile başlamalı"));

        form.gonulluluk_no = Some("G0123456789".into());
        assert!(validate_volunteer(&form).is_valid());
    }

    #[test]
    fn test_phone_without_leading_zero() {
        let mut form = complete();
        form.telefon = "05321234567".into();
        assert_eq!(
            validate_volunteer(&form).message_for("telefon"),
            Some("Telefon numarası 10 haneli olmalı ve 0 ile başlamamalı (5XXXXXXXXX)")
        );

        form.telefon = "532123456".into();
        assert!(!validate_volunteer(&form).is_valid());
    }

    #[test]
    fn test_password_checked_only_when_present() {
        let mut form = complete();
        form.password = Some("Gizli123!".into());
        form.password_confirm = Some("Gizli123?".into());
        let validation = validate_volunteer(&form);
        assert_eq!(validation.message_for("password"), None);
        assert_eq!(validation.message_for("password_confirm"), Some("Şifreler eşleşmiyor."));

        form.password = Some("gizli".into());
        form.password_confirm = Some("gizli".into());
        assert_eq!(
            validate_volunteer(&form).message_for("password"),
            Some("Şifre en az 8 karakter olmalıdır")
        );
    }

    #[test]
    fn test_invalid_email() {
        let mut form = complete();
        form.email = "ayse.example.org".into();
        assert_eq!(
            validate_volunteer(&form).message_for("email"),
            Some("Geçerli bir e-posta adresi giriniz")
        );
    }
}
