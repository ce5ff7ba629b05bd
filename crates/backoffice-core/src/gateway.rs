// ── Authentication gateway ──
//
// The only writer of the session store. Turns credentials into a session
// via an `Authenticator`, and tears sessions down on logout or when the
// server stops honoring the token.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RouteConfig;
use crate::error::AuthError;
use crate::guard::{Navigator, return_destination};
use crate::model::{AccessToken, Credentials, Identity};
use crate::session::SessionStore;

/// What a successful credential exchange yields.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub identity: Identity,
}

/// Exchanges credentials for a token and identity.
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginGrant, AuthError>> + Send;
}

/// Login/logout orchestration over a shared [`SessionStore`].
pub struct AuthGateway<A> {
    authenticator: A,
    session: Arc<SessionStore>,
    routes: RouteConfig,
}

impl<A: Authenticator> AuthGateway<A> {
    pub fn new(authenticator: A, session: Arc<SessionStore>) -> Self {
        Self {
            authenticator,
            session,
            routes: RouteConfig::default(),
        }
    }

    #[must_use]
    pub fn with_routes(mut self, routes: RouteConfig) -> Self {
        self.routes = routes;
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn routes(&self) -> &RouteConfig {
        &self.routes
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Authenticate and, on success, persist and publish the new session.
    ///
    /// On any failure the current session is left exactly as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        debug!(email = %credentials.email, "attempting login");
        let grant = self.authenticator.authenticate(credentials).await?;

        let Some(token) = AccessToken::new(grant.token) else {
            warn!("login response carried no token");
            return Err(AuthError::Unknown {
                message: "server returned an empty token".into(),
            });
        };

        let identity = self.session.establish(grant.identity, token);
        Ok(identity.as_ref().clone())
    }

    /// Sign out. Safe to call when already signed out.
    pub fn logout(&self) {
        if self.session.clear() {
            debug!("logged out");
        }
    }

    /// The sign-out action: drop the session, then navigate to the login
    /// path. Navigates even when no session was active.
    pub fn logout_and_redirect(&self, navigator: &impl Navigator) {
        self.logout();
        navigator.navigate(&self.routes.login_path, &[]);
    }

    /// Drop the session because the server rejected the token.
    pub fn invalidate(&self, reason: &str) {
        if self.session.clear() {
            warn!(reason, "session invalidated");
        }
    }

    /// The login screen flow: authenticate, then navigate to the sanitized
    /// return destination (or the landing path).
    pub async fn login_and_resume(
        &self,
        credentials: &Credentials,
        return_to: Option<&str>,
        navigator: &impl Navigator,
    ) -> Result<Identity, AuthError> {
        let identity = self.login(credentials).await?;

        let query = return_to
            .map(|r| vec![(self.routes.return_param.clone(), r.to_owned())])
            .unwrap_or_default();
        let target = return_destination(&query, &self.routes);
        navigator.navigate(&target, &[]);

        Ok(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use secrecy::SecretString;

    use super::*;
    use crate::storage::{DurableStorage, MemoryStorage, TOKEN_KEY};

    struct FixedAuthenticator(Result<LoginGrant, AuthError>);

    impl Authenticator for FixedAuthenticator {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<LoginGrant, AuthError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator(Mutex<Vec<String>>);

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str, _query: &[(String, String)]) {
            self.0.lock().unwrap().push(path.to_owned());
        }
    }

    fn grant(token: &str) -> LoginGrant {
        LoginGrant {
            token: token.into(),
            identity: Identity {
                id: 4,
                username: "ops".into(),
                email: "ops@example.com".into(),
                role: Some("admin".into()),
            },
        }
    }

    fn creds() -> Credentials {
        Credentials::new("ops@example.com", SecretString::from("pw".to_string()))
    }

    fn gateway(result: Result<LoginGrant, AuthError>) -> (AuthGateway<FixedAuthenticator>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(SessionStore::restore(storage.clone()));
        (AuthGateway::new(FixedAuthenticator(result), session), storage)
    }

    #[tokio::test]
    async fn login_then_logout() {
        let (gw, storage) = gateway(Ok(grant("tok")));

        let who = gw.login(&creds()).await.unwrap();
        assert_eq!(who.username, "ops");
        assert!(gw.is_authenticated());
        assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("tok"));

        gw.logout();
        gw.logout();
        assert!(!gw.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let (gw, _) = gateway(Err(AuthError::InvalidCredentials {
            message: "nope".into(),
        }));
        let err = gw.login(&creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
        assert!(!gw.is_authenticated());
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let (gw, storage) = gateway(Ok(grant("")));
        let err = gw.login(&creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::Unknown { .. }));
        assert!(!gw.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn login_and_resume_navigates_to_return_url() {
        let (gw, _) = gateway(Ok(grant("tok")));
        let nav = RecordingNavigator::default();

        gw.login_and_resume(&creds(), Some("/products"), &nav).await.unwrap();
        gw.login_and_resume(&creds(), Some("//evil.example"), &nav).await.unwrap();
        gw.login_and_resume(&creds(), None, &nav).await.unwrap();

        assert_eq!(
            *nav.0.lock().unwrap(),
            vec!["/products".to_string(), "/dashboard".into(), "/dashboard".into()]
        );
    }

    #[tokio::test]
    async fn logout_and_redirect_lands_on_login() {
        let (gw, storage) = gateway(Ok(grant("tok")));
        let nav = RecordingNavigator::default();
        gw.login(&creds()).await.unwrap();

        gw.logout_and_redirect(&nav);
        assert!(!gw.is_authenticated());
        assert!(storage.is_empty());

        gw.logout_and_redirect(&nav);
        assert_eq!(*nav.0.lock().unwrap(), vec!["/login".to_string(), "/login".into()]);
    }

    #[tokio::test]
    async fn invalidate_clears_session() {
        let (gw, _) = gateway(Ok(grant("tok")));
        gw.login(&creds()).await.unwrap();
        gw.invalidate("HTTP 401");
        assert!(!gw.is_authenticated());
    }
}
