// ── Console facade ──
//
// Wires one session store, one HTTP backend, the auth gateway, and the
// route guards together for a single admin API.

use std::sync::Arc;

use tracing::debug;

use crate::config::ConsoleConfig;
use crate::error::{CoreError, ListError};
use crate::gateway::AuthGateway;
use crate::guard::{AuthGuard, LoginGuard};
use crate::list::RemoteListController;
use crate::remote::HttpBackend;
use crate::resource::{Products, Resource, Users};
use crate::session::SessionStore;
use crate::storage::DurableStorage;

/// Entry point for consumers that drive the whole console.
///
/// Cheaply cloneable.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    session: Arc<SessionStore>,
    backend: HttpBackend,
    gateway: AuthGateway<HttpBackend>,
}

impl Console {
    /// Restore the session from `storage` and build the HTTP backend.
    pub fn new(config: ConsoleConfig, storage: Arc<dyn DurableStorage>) -> Result<Self, CoreError> {
        let session = Arc::new(SessionStore::restore(storage));
        let backend = HttpBackend::from_config(&config, Arc::clone(&session))?;
        let gateway = AuthGateway::new(backend.clone(), Arc::clone(&session)).with_routes(config.routes.clone());

        debug!(
            api_url = %config.api_url,
            authenticated = session.is_authenticated(),
            "console ready"
        );

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                session,
                backend,
                gateway,
            }),
        })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    pub fn gateway(&self) -> &AuthGateway<HttpBackend> {
        &self.inner.gateway
    }

    pub fn backend(&self) -> &HttpBackend {
        &self.inner.backend
    }

    // ── Guards ───────────────────────────────────────────────────────

    pub fn auth_guard(&self) -> AuthGuard<'_> {
        AuthGuard::new(&self.inner.session, &self.inner.config.routes)
    }

    pub fn login_guard(&self) -> LoginGuard<'_> {
        LoginGuard::new(&self.inner.session, &self.inner.config.routes)
    }

    // ── Lists ────────────────────────────────────────────────────────

    pub fn list<R: Resource>(&self) -> RemoteListController<R, HttpBackend> {
        RemoteListController::new(self.inner.backend.clone(), self.inner.config.page_size)
    }

    pub fn users(&self) -> RemoteListController<Users, HttpBackend> {
        self.list()
    }

    pub fn products(&self) -> RemoteListController<Products, HttpBackend> {
        self.list()
    }

    /// Drop the session when the server has stopped honoring its token.
    /// Returns whether the error was an authorization failure.
    pub fn handle_list_error(&self, err: &ListError) -> bool {
        if err.is_unauthorized() {
            self.inner.gateway.invalidate("token rejected by server");
            true
        } else {
            false
        }
    }
}
