//! Session endpoints of the volunteers service
//!
//! The backend answers auth failures with the same `{success, message}` body
//! it uses for successes, so these calls read the body before the status.

use super::{
    client::ApiClient,
    errors::{ApiError, ApiResult},
    types::Volunteer,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const LOGIN_FAILED_MESSAGE: &str = "Giriş başarısız.";
pub const LOGGED_OUT_MESSAGE: &str = "Çıkış yapıldı.";
pub const LOGOUT_FAILED_MESSAGE: &str = "Çıkış sırasında bir hata oluştu.";
pub const PASSWORD_CHANGED_MESSAGE: &str = "Şifre başarıyla değiştirildi.";
pub const PASSWORD_CHANGE_FAILED_MESSAGE: &str = "Şifre değiştirme sırasında bir hata oluştu.";
pub const NOT_ADMIN_MESSAGE: &str =
    "Bu hesabın yönetici yetkisi yok; gönüllü listesi görüntülenemez.";

const LOGIN_ENDPOINT: &str = "/volunteers/auth/login/";
const LOGOUT_ENDPOINT: &str = "/volunteers/auth/logout/";
const STATUS_ENDPOINT: &str = "/volunteers/auth/status/";
const CHANGE_PASSWORD_ENDPOINT: &str = "/volunteers/auth/change-password/";

/// Account behind a session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthUser {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// Staff or superuser; only admins may read volunteer data
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub volunteer_profile: Option<Volunteer>,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        if let Some(profile) = &self.volunteer_profile {
            return profile.display_name();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        match full.trim() {
            "" if !self.email.is_empty() => self.email.clone(),
            "" => self.username.clone(),
            name => name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Body of the login, logout and change-password endpoints
#[derive(Debug, Clone, Default, Deserialize)]
struct AuthReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    errors: BTreeMap<String, Value>,
}

impl AuthReply {
    /// The server message, then one `field: message` line per field error
    fn into_error(self, fallback: &str) -> ApiError {
        let mut message = self
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        for (field, errors) in &self.errors {
            let texts: Vec<&str> = match errors {
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                Value::String(text) => vec![text.as_str()],
                _ => Vec::new(),
            };
            for text in texts {
                message.push_str(&format!("\n{}: {}", field, text));
            }
        }
        ApiError::Message(message)
    }
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in with e-mail and password. The session cookie lands in the
    /// client's jar.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthUser> {
        let body = json!({ "email": email, "password": password });
        let (status, reply) = self.post(LOGIN_ENDPOINT, Some(body)).await?;
        match reply {
            AuthReply {
                success: true,
                user: Some(user),
                ..
            } if status.is_success() => {
                info!(user = %user.email, admin = user.is_admin, "Logged in");
                Ok(user)
            }
            reply => Err(reply.into_error(LOGIN_FAILED_MESSAGE)),
        }
    }

    /// End the session on the server
    pub async fn logout(&self) -> ApiResult<String> {
        let (status, reply) = self.post(LOGOUT_ENDPOINT, None).await?;
        if reply.success && status.is_success() {
            info!("Logged out");
            Ok(reply
                .message
                .unwrap_or_else(|| LOGGED_OUT_MESSAGE.to_string()))
        } else {
            Err(reply.into_error(LOGOUT_FAILED_MESSAGE))
        }
    }

    /// Whether the jar holds a live session, and for whom
    pub async fn status(&self) -> ApiResult<AuthStatus> {
        self.client.get(STATUS_ENDPOINT).await
    }

    /// Change the password of the logged in account. Callers validate
    /// `new_password` first; the server only checks `current_password`.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ApiResult<String> {
        let body = json!({
            "current_password": current_password,
            "new_password": new_password,
        });
        let (status, reply) = self.post(CHANGE_PASSWORD_ENDPOINT, Some(body)).await?;
        if reply.success && status.is_success() {
            info!("Password changed");
            Ok(reply
                .message
                .unwrap_or_else(|| PASSWORD_CHANGED_MESSAGE.to_string()))
        } else {
            Err(reply.into_error(PASSWORD_CHANGE_FAILED_MESSAGE))
        }
    }

    /// POST and decode the reply. Bodies without `success` or `message`
    /// (CSRF rejections, proxies) fall back to the usual status mapping.
    async fn post(
        &self,
        endpoint: &str,
        body: Option<Value>,
    ) -> ApiResult<(StatusCode, AuthReply)> {
        let (status, text) = self.client.post_raw(endpoint, body).await?;
        let reply = serde_json::from_str::<AuthReply>(&text)
            .ok()
            .filter(|reply| reply.success || reply.message.is_some());
        match reply {
            Some(reply) => Ok((status, reply)),
            None if status.is_success() => Err(ApiError::Decode(format!(
                "unexpected reply from {}",
                endpoint
            ))),
            None => {
                let err = ApiError::from_status(status, &text);
                warn!(
                    endpoint,
                    status = status.as_u16(),
                    error = %err,
                    "Auth request rejected"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{client::tests::client_for, errors::FORBIDDEN_MESSAGE};
    use httpmock::prelude::*;

    fn user_json(admin: bool) -> Value {
        json!({
            "id": 7,
            "username": "ayse",
            "email": "ayse@example.org",
            "first_name": "Ayşe",
            "last_name": "Yılmaz",
            "is_active": true,
            "is_staff": admin,
            "is_superuser": false,
            "is_admin": admin,
            "volunteer_profile": null
        })
    }

    #[tokio::test]
    async fn test_login_returns_user_and_keeps_session() {
        let server = MockServer::start_async().await;
        let login = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/volunteers/auth/login/")
                    .json_body(json!({"email": "ayse@example.org", "password": "Gizli123!"}));
                then.status(200)
                    .header("Set-Cookie", "sessionid=abc; Path=/")
                    .json_body(json!({
                        "success": true,
                        "message": "Giriş başarılı.",
                        "user": user_json(true)
                    }));
            })
            .await;

        let client = client_for(&server);
        let user = client
            .auth()
            .login("ayse@example.org", "Gizli123!")
            .await
            .unwrap();

        login.assert_async().await;
        assert!(user.is_admin);
        assert_eq!(user.display_name(), "Ayşe Yılmaz");
        assert!(client.session_cookies().unwrap().contains("sessionid=abc"));
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/login/");
                then.status(401).json_body(json!({
                    "success": false,
                    "message": "E-posta veya şifre hatalı."
                }));
            })
            .await;

        let err = client_for(&server)
            .auth()
            .login("ayse@example.org", "yanlis-sifre")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "E-posta veya şifre hatalı.");
    }

    #[tokio::test]
    async fn test_field_errors_follow_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/change-password/");
                then.status(400).json_body(json!({
                    "success": false,
                    "message": "Mevcut şifre yanlış.",
                    "errors": {"current_password": ["Mevcut şifre yanlış."], "new_password": []}
                }));
            })
            .await;

        let err = client_for(&server)
            .auth()
            .change_password("eski", "Yeni1234!")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Mevcut şifre yanlış.\ncurrent_password: Mevcut şifre yanlış."
        );
    }

    #[tokio::test]
    async fn test_csrf_rejection_uses_status_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/logout/");
                then.status(403)
                    .json_body(json!({"detail": "CSRF Failed: CSRF token missing."}));
            })
            .await;

        let err = client_for(&server).auth().logout().await.unwrap_err();
        assert_eq!(err.to_string(), FORBIDDEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_status_and_password_change() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/volunteers/auth/status/");
                then.status(200)
                    .header("Set-Cookie", "csrftoken=tok; Path=/")
                    .json_body(json!({"authenticated": true, "user": user_json(false)}));
            })
            .await;
        let change = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/volunteers/auth/change-password/")
                    .header("X-CSRFToken", "tok")
                    .json_body(json!({
                        "current_password": "Eski1234!",
                        "new_password": "Yeni1234!"
                    }));
                then.status(200).json_body(json!({
                    "success": true,
                    "message": "Şifre başarıyla değiştirildi."
                }));
            })
            .await;

        let client = client_for(&server);
        let status = client.auth().status().await.unwrap();
        assert!(status.authenticated);
        assert!(!status.user.unwrap().is_admin);

        let message = client
            .auth()
            .change_password("Eski1234!", "Yeni1234!")
            .await
            .unwrap();
        assert_eq!(message, PASSWORD_CHANGED_MESSAGE);
        change.assert_async().await;
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user: AuthUser = serde_json::from_value(user_json(false)).unwrap();
        user.first_name.clear();
        user.last_name.clear();
        assert_eq!(user.display_name(), "ayse@example.org");
    }
}
