// ── Route guards ──
//
// Pure predicates over the session that decide whether navigation to a
// path may proceed. Redirecting is a separate, explicit step through a
// `Navigator`; guards never modify the session.

use url::form_urlencoded;

use crate::config::RouteConfig;
use crate::session::SessionStore;

/// Something that can move the user to another location.
pub trait Navigator {
    fn navigate(&self, path: &str, query: &[(String, String)]);
}

/// Where a denied navigation should go instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    /// `target?k=v&...`, percent-encoded.
    pub fn to_location(&self) -> String {
        if self.query.is_empty() {
            return self.target.clone();
        }
        let qs = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{qs}", self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Shared guard behavior: a pure `check` plus a side-effecting `activate`.
pub trait RouteGuard {
    fn check(&self, requested: &str) -> GuardDecision;

    /// Evaluate the guard and perform the redirect if denied. Returns
    /// whether navigation to `requested` may proceed.
    fn activate(&self, requested: &str, navigator: &impl Navigator) -> bool {
        match self.check(requested) {
            GuardDecision::Proceed => true,
            GuardDecision::Redirect(r) => {
                tracing::debug!(requested, target = %r.target, "navigation redirected");
                navigator.navigate(&r.target, &r.query);
                false
            }
        }
    }
}

/// Admits only authenticated users; everyone else goes to the login page
/// with the requested path attached.
pub struct AuthGuard<'a> {
    session: &'a SessionStore,
    routes: &'a RouteConfig,
}

impl<'a> AuthGuard<'a> {
    pub fn new(session: &'a SessionStore, routes: &'a RouteConfig) -> Self {
        Self { session, routes }
    }
}

impl RouteGuard for AuthGuard<'_> {
    fn check(&self, requested: &str) -> GuardDecision {
        if self.session.is_authenticated() {
            return GuardDecision::Proceed;
        }
        GuardDecision::Redirect(Redirect {
            target: self.routes.login_path.clone(),
            query: vec![(self.routes.return_param.clone(), requested.to_owned())],
        })
    }
}

/// Admits only signed-out users; authenticated users are sent to the
/// landing page.
pub struct LoginGuard<'a> {
    session: &'a SessionStore,
    routes: &'a RouteConfig,
}

impl<'a> LoginGuard<'a> {
    pub fn new(session: &'a SessionStore, routes: &'a RouteConfig) -> Self {
        Self { session, routes }
    }
}

impl RouteGuard for LoginGuard<'_> {
    fn check(&self, _requested: &str) -> GuardDecision {
        if !self.session.is_authenticated() {
            return GuardDecision::Proceed;
        }
        GuardDecision::Redirect(Redirect {
            target: self.routes.landing_path.clone(),
            query: Vec::new(),
        })
    }
}

/// Pick the post-login destination from a query map.
///
/// Only app-relative paths (leading `/`, not `//`) are honored; anything
/// else falls back to the landing path.
pub fn return_destination(query: &[(String, String)], routes: &RouteConfig) -> String {
    query
        .iter()
        .find(|(k, _)| *k == routes.return_param)
        .map(|(_, v)| v.trim())
        .filter(|v| is_app_relative(v))
        .map_or_else(|| routes.landing_path.clone(), str::to_owned)
}

fn is_app_relative(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AccessToken, Identity};

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(String, Vec<(String, String)>)>>);

    impl Navigator for Recorder {
        fn navigate(&self, path: &str, query: &[(String, String)]) {
            self.0.borrow_mut().push((path.to_owned(), query.to_vec()));
        }
    }

    fn signed_in() -> SessionStore {
        let store = SessionStore::detached();
        store.establish(
            Identity {
                id: 1,
                username: "ops".into(),
                email: "ops@example.com".into(),
                role: None,
            },
            AccessToken::new("tok").unwrap(),
        );
        store
    }

    #[test]
    fn auth_guard_redirects_anonymous_to_login() {
        let session = SessionStore::detached();
        let routes = RouteConfig::default();
        let guard = AuthGuard::new(&session, &routes);

        let decision = guard.check("/dashboard");
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert_eq!(redirect.query, vec![("returnUrl".to_string(), "/dashboard".to_string())]);
        assert_eq!(redirect.to_location(), "/login?returnUrl=%2Fdashboard");
    }

    #[test]
    fn auth_guard_admits_authenticated() {
        let session = signed_in();
        let routes = RouteConfig::default();
        let nav = Recorder::default();
        assert!(AuthGuard::new(&session, &routes).activate("/users", &nav));
        assert!(nav.0.borrow().is_empty());
    }

    #[test]
    fn login_guard_sends_authenticated_to_landing() {
        let session = signed_in();
        let routes = RouteConfig::default();
        let nav = Recorder::default();

        assert!(!LoginGuard::new(&session, &routes).activate("/login", &nav));
        assert_eq!(nav.0.borrow()[0].0, "/dashboard");
        assert!(session.is_authenticated());
    }

    #[test]
    fn login_guard_admits_anonymous() {
        let session = SessionStore::detached();
        let routes = RouteConfig::default();
        assert!(LoginGuard::new(&session, &routes).check("/login").is_proceed());
    }

    #[test]
    fn return_destination_rejects_external_targets() {
        let routes = RouteConfig::default();
        let q = |v: &str| vec![("returnUrl".to_string(), v.to_string())];

        assert_eq!(return_destination(&q("/products?page=2"), &routes), "/products?page=2");
        assert_eq!(return_destination(&q("//evil.example"), &routes), "/dashboard");
        assert_eq!(return_destination(&q("https://evil.example"), &routes), "/dashboard");
        assert_eq!(return_destination(&q("/\\evil.example"), &routes), "/dashboard");
        assert_eq!(return_destination(&[], &routes), "/dashboard");
    }
}
