// ── HTTP backend ──
//
// Adapts `backoffice_api::ApiClient` to the core's `Authenticator` and
// `ResourceFetcher` seams. The bearer token is taken from the session
// store before every request, so a login or logout is picked up by the
// next call without any explicit hand-off.

use std::sync::Arc;

use backoffice_api::{ApiClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use serde::de::DeserializeOwned;

use crate::config::{ConsoleConfig, TlsVerification};
use crate::convert;
use crate::error::{AuthError, CoreError, TransportError};
use crate::gateway::{Authenticator, LoginGrant};
use crate::list::{PagedResponse, ResourceFetcher};
use crate::model::Credentials;
use crate::session::SessionStore;

/// Talks to the admin API on behalf of one session.
#[derive(Clone)]
pub struct HttpBackend {
    client: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl HttpBackend {
    pub fn new(client: ApiClient, session: Arc<SessionStore>) -> Self {
        Self {
            client: Arc::new(client),
            session,
        }
    }

    pub fn from_config(config: &ConsoleConfig, session: Arc<SessionStore>) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
        };
        let client = ApiClient::new(config.api_url.clone(), &transport).map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;
        Ok(Self::new(client, session))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn sync_token(&self) {
        match self.session.token() {
            Some(token) => self
                .client
                .set_token(SecretString::from(token.expose().to_owned())),
            None => self.client.clear_token(),
        }
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

impl Authenticator for HttpBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let resp = self
            .client
            .login(&credentials.email, &credentials.password)
            .await
            .map_err(convert::auth_error)?;
        Ok(resp.into())
    }
}

impl ResourceFetcher for HttpBackend {
    async fn get<T>(&self, path: &str, page: u32, per_page: u32) -> Result<PagedResponse<T>, TransportError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.sync_token();
        let page = self.client.get_page::<T>(path, page, per_page).await?;
        Ok(page.into())
    }

    async fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.sync_token();
        self.client.delete(path).await?;
        Ok(())
    }
}
