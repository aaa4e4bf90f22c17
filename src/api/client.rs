//! HTTP client for the relief backend
//!
//! Sessions live in a cookie jar. Mutating requests carry the Django CSRF
//! token from the `csrftoken` cookie; when the jar has none yet, the client
//! asks the auth status endpoint to set one first. The jar's cookies can be
//! exported and restored so a login outlives the process.

use super::{
    auth::AuthApi,
    errors::{ApiError, ApiResult},
    shipments::ShipmentsApi,
    volunteers::VolunteersApi,
};
use reqwest::{
    cookie::{CookieStore, Jar},
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Method, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Endpoint that sets the CSRF cookie
const CSRF_BOOTSTRAP_ENDPOINT: &str = "/volunteers/auth/status/";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    base: Url,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url` (e.g. `http://localhost:8000/api/v1`)
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .user_agent(concat!("ayika/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            jar,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn volunteers(&self) -> VolunteersApi<'_> {
        VolunteersApi::new(self)
    }

    pub fn shipments(&self) -> ShipmentsApi<'_> {
        ShipmentsApi::new(self)
    }

    fn url(&self, endpoint: &str) -> ApiResult<Url> {
        let url = format!("{}{}", self.base_url, endpoint);
        Url::parse(&url)
            .map_err(|e| ApiError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))
    }

    /// Cookies the jar would send to the API, as a `Cookie` header value
    pub fn session_cookies(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        header.to_str().ok().map(str::to_string)
    }

    /// Put `name=value` pairs exported by [`Self::session_cookies`] back into the jar
    pub fn restore_session_cookies(&self, cookies: &str) {
        for pair in cookies.split(';').map(str::trim).filter(|pair| pair.contains('=')) {
            self.jar.add_cookie_str(&format!("{}; Path=/", pair), &self.base);
        }
    }

    /// CSRF token currently in the jar for `url`
    pub fn csrf_token(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let cookies = header.to_str().ok()?;
        cookies
            .split(';')
            .map(str::trim)
            .find_map(|cookie| cookie.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
            .map(str::to_string)
    }

    async fn ensure_csrf_token(&self, url: &Url) -> Option<String> {
        if let Some(token) = self.csrf_token(url) {
            return Some(token);
        }

        debug!("No CSRF token yet, asking the auth status endpoint");
        match self.url(CSRF_BOOTSTRAP_ENDPOINT) {
            Ok(bootstrap) => {
                if let Err(err) = self.http.get(bootstrap).send().await {
                    warn!(error = %err, "Failed to fetch CSRF token");
                }
            }
            Err(err) => warn!(error = %err, "Failed to fetch CSRF token"),
        }

        self.csrf_token(url)
    }

    /// Send a request, failing only on transport errors
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<(Url, Response)> {
        let url = self.url(endpoint)?;
        let mut request = self.http.request(method.clone(), url.clone());

        if !query.is_empty() {
            request = request.query(query);
        }
        if is_mutating(&method) {
            if let Some(token) = self.ensure_csrf_token(&url).await {
                request = request.header(CSRF_HEADER, token);
            }
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!(%method, %url, "API request");
        let response = request.send().await.map_err(|err| {
            warn!(%method, %url, error = %err, "API request failed");
            ApiError::from_transport(err)
        })?;
        Ok((url, response))
    }

    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<Response> {
        let (url, response) = self.send(method.clone(), endpoint, query, body).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &text);
        warn!(%method, %url, status = status.as_u16(), error = %err, "API request rejected");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<T> {
        let response = self.execute(method, endpoint, query, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send_json(Method::GET, endpoint, &[], None).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.send_json(Method::GET, endpoint, query, None).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::POST, endpoint, &[], Some(body)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::PUT, endpoint, &[], Some(body)).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.send_json(Method::PATCH, endpoint, &[], Some(body)).await
    }

    /// POST and return the status with the raw body, whatever the status.
    /// The auth endpoints answer failures in the same shape as successes.
    pub async fn post_raw(
        &self,
        endpoint: &str,
        body: Option<Value>,
    ) -> ApiResult<(StatusCode, String)> {
        let (_, response) = self.send(Method::POST, endpoint, &[], body).await?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;
        Ok((status, text))
    }

    /// DELETE, ignoring whatever body comes back
    pub async fn delete(&self, endpoint: &str) -> ApiResult<()> {
        self.execute(Method::DELETE, endpoint, &[], None).await?;
        Ok(())
    }
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}
