//! Error types for the relief backend client
//!
//! Every variant displays as a message that can be shown to the user as-is.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const FORBIDDEN_MESSAGE: &str = "Bu işlem için yönetici yetkilerine sahip olmanız gerekiyor.";
pub const UNAUTHORIZED_MESSAGE: &str = "Giriş yapmanız gerekiyor.";
pub const NETWORK_MESSAGE: &str =
    "Backend sunucusuna bağlanılamıyor. Sunucu çalışıyor mu kontrol edin.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("{}", NETWORK_MESSAGE)]
    Network(#[source] reqwest::Error),

    /// Any other non-success status, with the detail the server sent
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Sunucu yanıtı okunamadı: {0}")]
    Decode(String),

    #[error("İstek gövdesi oluşturulamadı: {0}")]
    Encode(#[from] serde_json::Error),

    /// Request succeeded but the expected data was missing
    #[error("{0}")]
    Missing(String),

    /// Message rewritten for a specific call site
    #[error("{0}")]
    Message(String),

    #[error("Geçersiz yapılandırma: {0}")]
    Config(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map a failed response to an error, reading the detail from its body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::FORBIDDEN => return Self::Forbidden,
            StatusCode::UNAUTHORIZED => return Self::Unauthorized,
            _ => {}
        }

        let mut message = format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| error_detail(&value));
        if let Some(detail) = detail {
            message.push_str(" - ");
            message.push_str(&detail);
        }

        Self::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// Map a transport-level failure
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }

    /// HTTP status of the failed response, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Forbidden => Some(403),
            Self::Unauthorized => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Detail text of an error body: a bare string, the `detail`, `error` or
/// `message` key, or the field errors joined as `field: a, b; other: c`
fn error_detail(body: &Value) -> Option<String> {
    if let Value::String(text) = body {
        return Some(text.clone()).filter(|text| !text.is_empty());
    }

    let object = body.as_object()?;
    for key in ["detail", "error", "message"] {
        if let Some(value) = object.get(key).filter(|value| is_truthy(value)) {
            return Some(value_text(value));
        }
    }

    let fields: Vec<String> = object
        .iter()
        .filter_map(|(field, errors)| match errors {
            Value::Array(items) => Some(format!(
                "{field}: {}",
                items.iter().map(value_text).collect::<Vec<_>>().join(", ")
            )),
            Value::String(text) => Some(format!("{field}: {text}")),
            _ => None,
        })
        .collect();

    (!fields.is_empty()).then(|| fields.join("; "))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_have_fixed_messages() {
        assert_eq!(
            ApiError::from_status(StatusCode::FORBIDDEN, r#"{"detail":"x"}"#).to_string(),
            FORBIDDEN_MESSAGE
        );
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "").to_string(),
            UNAUTHORIZED_MESSAGE
        );
    }

    #[test]
    fn test_detail_keys_in_order() {
        let err = ApiError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"message":"m","detail":"Bulunamadı."}"#,
        );
        assert_eq!(err.to_string(), "HTTP 404: Not Found - Bulunamadı.");
        assert_eq!(err.status(), Some(404));

        let err = ApiError::from_status(StatusCode::CONFLICT, r#"{"detail":"","error":"Çakışma"}"#);
        assert_eq!(err.to_string(), "HTTP 409: Conflict - Çakışma");
    }

    #[test]
    fn test_string_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, r#""boom""#);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error - boom");
    }

    #[test]
    fn test_field_errors_are_joined() {
        let body =
            r#"{"email":["Bu e-posta zaten kayıtlı.","Geçersiz."],"telefon":"Hatalı","count":3}"#;
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "HTTP 400: Bad Request - email: Bu e-posta zaten kayıtlı., Geçersiz.; telefon: Hatalı"
        );
    }

    #[test]
    fn test_unparseable_body_keeps_status_line() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
