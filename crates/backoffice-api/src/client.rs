// Admin REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// status mapping, and JSON decoding. Endpoint groups (auth, lists) are
// inherent methods in sibling modules so this file stays focused on
// transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{ErrorBody, Page};
use crate::transport::TransportConfig;

/// Raw HTTP client for the admin API.
///
/// Every request carries `Authorization: Bearer <token>` once a token has
/// been set. Paths are resolved relative to the base URL, so a base of
/// `https://host/api` and a path of `admin/users` yields
/// `https://host/api/admin/users`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            token: RwLock::new(None),
        }
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Bearer token ─────────────────────────────────────────────────

    /// Attach a bearer token to all subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        trace!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Stop sending a bearer token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an API path against the base URL.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Fetch one page of a list endpoint. `page` is 1-based.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>, Error> {
        let url = self.endpoint_url(path)?;
        debug!(%url, page, per_page, "GET page");

        let builder = self
            .http
            .get(url)
            .query(&[("page", page), ("per_page", per_page)]);
        let resp = self.apply_token(builder).send().await?;

        let resp = check_status(resp).await?;
        decode(resp).await
    }

    /// Send a DELETE request; any 2xx counts as success and the body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.endpoint_url(path)?;
        debug!(%url, "DELETE");

        let resp = self.apply_token(self.http.delete(url)).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        debug!(%url, "POST");
        let resp = self.apply_token(self.http.post(url).json(body)).send().await?;
        let resp = check_status(resp).await?;
        decode(resp).await
    }
}

/// Ensure the base path ends in `/` so `Url::join` appends instead of replacing.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Map non-2xx statuses into typed errors, carrying the server's message.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message);

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::SessionExpired { message });
    }

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_url_appends_to_base_path() {
        let c = client("https://console.example.com/api");
        assert_eq!(
            c.endpoint_url("admin/users").unwrap().as_str(),
            "https://console.example.com/api/admin/users"
        );
        assert_eq!(
            c.endpoint_url("/admin/products/4").unwrap().as_str(),
            "https://console.example.com/api/admin/products/4"
        );
    }

    #[test]
    fn token_lifecycle() {
        let c = client("http://localhost:8080/");
        assert!(!c.has_token());
        c.set_token(SecretString::from("abc".to_string()));
        assert!(c.has_token());
        c.clear_token();
        assert!(!c.has_token());
    }
}
