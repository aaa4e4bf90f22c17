use super::Validation;

const SPECIAL_CHARACTERS: &str = "@$!%*?&";

/// First rule `password` breaks, if any
pub fn password_issue(password: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        return Some("Şifre en az 8 karakter olmalıdır");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Şifre en az bir küçük harf içermelidir");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Şifre en az bir büyük harf içermelidir");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Şifre en az bir rakam içermelidir");
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Some("Şifre en az bir özel karakter içermelidir (@$!%*?&)");
    }
    None
}

/// Check a new password and its confirmation
pub fn validate_password_change(password: &str, confirmation: &str) -> Validation {
    let mut validation = Validation::new();

    if let Some(message) = password_issue(password) {
        validation.push("password", message);
    }
    if password != confirmation {
        validation.push("password_confirm", "Şifreler eşleşmiyor.");
    }

    validation
}
