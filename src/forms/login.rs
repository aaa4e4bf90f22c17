use super::{is_valid_email, Validation};

pub const EMAIL_MESSAGE: &str = "Lütfen geçerli bir e-posta adresi giriniz.";
pub const PASSWORD_LENGTH_MESSAGE: &str = "Şifre en az 8 karakter olmalıdır.";

/// E-mail part of the sign-in form
pub fn email_issue(email: &str) -> Option<&'static str> {
    (!is_valid_email(email.trim())).then_some(EMAIL_MESSAGE)
}

/// Check sign-in credentials before they are sent. Only the length of the
/// password is known to the sign-in form; strength rules apply on change.
pub fn validate_login(email: &str, password: &str) -> Validation {
    let mut validation = Validation::new();

    if let Some(message) = email_issue(email) {
        validation.push("email", message);
    }
    if password.chars().count() < 8 {
        validation.push("password", PASSWORD_LENGTH_MESSAGE);
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credentials() {
        assert!(validate_login("ayse@example.org", "herhangi1").is_valid());
        assert!(validate_login("  ayse@example.org ", "herhangi1").is_valid());
    }

    #[test]
    fn test_both_fields_reported() {
        let validation = validate_login("ayse", "kısa");
        assert_eq!(validation.message_for("email"), Some(EMAIL_MESSAGE));
        assert_eq!(validation.message_for("password"), Some(PASSWORD_LENGTH_MESSAGE));
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Eight characters, more than eight bytes
        assert!(validate_login("ayse@example.org", "şşşşşşşş").is_valid());
        assert!(!validate_login("", "şşşşşşşş").is_valid());
    }
}
