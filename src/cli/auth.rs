//! Signing in and out, and account commands

use super::input::{ensure_valid, read_secrets};
use super::volunteers::to_json;
use crate::api::{
    self,
    auth::{LOGGED_OUT_MESSAGE, NOT_ADMIN_MESSAGE},
    ApiClient, AuthStatus, SessionStore,
};
use crate::config::Config;
use crate::forms::{validate_login, validate_password_change};
use anyhow::Result;
use clap::Args;
use tracing::{debug, warn};

/// Log in and keep the session for later commands and the console
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account e-mail address
    #[arg(short, long)]
    pub email: String,

    /// Read the password from the first line of standard input
    #[arg(long)]
    pub password_stdin: bool,
}

/// End the saved session
#[derive(Debug, Args)]
pub struct LogoutCommand {}

/// Show the account of the saved session
#[derive(Debug, Args)]
pub struct WhoamiCommand {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Change the password of the logged in account
#[derive(Debug, Args)]
pub struct PasswordCommand {
    /// Read the current, new and repeated password from three lines of
    /// standard input
    #[arg(long)]
    pub password_stdin: bool,
}

impl LoginCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let mut secrets = read_secrets(self.password_stdin, &["Şifre: "])?;
        let password = secrets.remove(0);

        // A fresh jar; an old session must not ride along
        let api = ApiClient::new(&config.api_url, config.timeout())?;
        let store = SessionStore::new(config.session_file());
        print!("{}", login(&api, &store, &self.email, &password).await?);
        Ok(())
    }
}

impl LogoutCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let api = api::connect(config)?;
        let store = SessionStore::new(config.session_file());
        print!("{}", logout(&api, &store).await?);
        Ok(())
    }
}

impl WhoamiCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let api = api::connect(config)?;
        print!("{}", whoami(&api, self.json).await?);
        Ok(())
    }
}

impl PasswordCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let secrets = read_secrets(
            self.password_stdin,
            &["Mevcut şifre: ", "Yeni şifre: ", "Yeni şifre (tekrar): "],
        )?;
        let api = api::connect(config)?;
        print!(
            "{}",
            change_password(&api, &secrets[0], &secrets[1], &secrets[2]).await?
        );
        Ok(())
    }
}

pub async fn login(
    api: &ApiClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<String> {
    ensure_valid(&validate_login(email, password))?;

    let user = api.auth().login(email.trim(), password).await?;
    store.save(api)?;

    let mut out = format!("Giriş başarılı. Hoş geldiniz, {}.\n", user.display_name());
    if !user.is_admin {
        out.push_str(NOT_ADMIN_MESSAGE);
        out.push('\n');
    }
    Ok(out)
}

/// Log out on the server and forget the saved session. The local session
/// is dropped even when the server cannot be reached.
pub async fn logout(api: &ApiClient, store: &SessionStore) -> Result<String> {
    let message = match api.auth().logout().await {
        Ok(message) => message,
        Err(err) => {
            warn!(error = %err, "Server side logout failed");
            LOGGED_OUT_MESSAGE.to_string()
        }
    };
    if store.clear()? {
        debug!(path = %store.path().display(), "Saved session removed");
    }
    Ok(format!("{}\n", message))
}

pub async fn whoami(api: &ApiClient, json: bool) -> Result<String> {
    let status = api.auth().status().await?;
    if json {
        return to_json(&status);
    }
    Ok(match status {
        AuthStatus {
            authenticated: true,
            user: Some(user),
        } => format!(
            "{} <{}>\nYetki: {}\n",
            user.display_name(),
            user.email,
            if user.is_admin { "yönetici" } else { "gönüllü" }
        ),
        _ => "Giriş yapılmamış. `ayika login --email <adres>` ile giriş yapın.\n".to_string(),
    })
}

/// Validate the new password locally, then let the server check the current one
pub async fn change_password(
    api: &ApiClient,
    current: &str,
    new: &str,
    repeated: &str,
) -> Result<String> {
    let mut validation = validate_password_change(new, repeated);
    if current.is_empty() {
        validation.push("current_password", "Mevcut şifre gereklidir.");
    }
    ensure_valid(&validation)?;

    Ok(format!("{}\n", api.auth().change_password(current, new).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn user_json(admin: bool) -> serde_json::Value {
        json!({
            "id": 3,
            "username": "mehmet",
            "email": "mehmet@example.org",
            "first_name": "Mehmet",
            "last_name": "Kaya",
            "is_admin": admin
        })
    }

    #[tokio::test]
    async fn test_login_saves_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/login/");
                then.status(200)
                    .header("Set-Cookie", "sessionid=abc; Path=/")
                    .json_body(json!({"success": true, "user": user_json(false)}));
            })
            .await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let api = client_for(&server);
        let out = login(&api, &store, " mehmet@example.org ", "Gizli123!")
            .await
            .unwrap();
        assert!(out.starts_with("Giriş başarılı. Hoş geldiniz, Mehmet Kaya."));
        assert!(out.contains("yönetici yetkisi yok"));

        let restored = client_for(&server);
        assert!(store.restore(&restored).unwrap());
        assert!(restored.session_cookies().unwrap().contains("sessionid=abc"));
    }

    #[tokio::test]
    async fn test_invalid_credentials_never_reach_server() {
        let server = MockServer::start_async().await;
        let login_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/login/");
                then.status(200);
            })
            .await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let err = login(&client_for(&server), &store, "mehmet", "kısa")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("email: Lütfen geçerli bir e-posta adresi giriniz."));
        assert!(message.contains("password: Şifre en az 8 karakter olmalıdır."));
        login_mock.assert_calls_async(0).await;
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_when_server_refuses() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/logout/");
                then.status(403).json_body(json!({"detail": "Kimlik bilgileri verilmedi."}));
            })
            .await;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let api = client_for(&server);
        store.save(&api).unwrap();

        let out = logout(&api, &store).await.unwrap();
        assert_eq!(out, "Çıkış yapıldı.\n");
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_whoami() {
        let admin = MockServer::start_async().await;
        admin
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/volunteers/auth/status/");
                then.status(200)
                    .json_body(json!({"authenticated": true, "user": user_json(true)}));
            })
            .await;
        let out = whoami(&client_for(&admin), false).await.unwrap();
        assert_eq!(out, "Mehmet Kaya <mehmet@example.org>\nYetki: yönetici\n");

        let anonymous = MockServer::start_async().await;
        anonymous
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/volunteers/auth/status/");
                then.status(200)
                    .json_body(json!({"authenticated": false, "user": null}));
            })
            .await;
        let out = whoami(&client_for(&anonymous), false).await.unwrap();
        assert!(out.starts_with("Giriş yapılmamış."));
    }

    #[tokio::test]
    async fn test_weak_new_password_is_rejected_locally() {
        let server = MockServer::start_async().await;
        let change = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/volunteers/auth/change-password/");
                then.status(200).json_body(json!({"success": true}));
            })
            .await;
        let api = client_for(&server);

        let err = change_password(&api, "", "yenisifre", "yenisifre2")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Form geçersiz:\n  password: Şifre en az bir büyük harf içermelidir\n  \
             password_confirm: Şifreler eşleşmiyor.\n  current_password: Mevcut şifre gereklidir."
        );
        change.assert_calls_async(0).await;

        let out = change_password(&api, "Eski1234!", "Yeni1234!", "Yeni1234!")
            .await
            .unwrap();
        assert_eq!(out, "Şifre başarıyla değiştirildi.\n");
        change.assert_async().await;
    }
}
