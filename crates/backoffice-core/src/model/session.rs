use std::fmt;
use std::sync::Arc;

use super::Identity;

/// Bearer token issued at login. Never empty; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token. Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The raw token, for placing in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Current authentication state.
///
/// A token and an identity are either both present or both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        identity: Arc<Identity>,
        token: AccessToken,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&Arc<Identity>> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            Self::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            Self::Anonymous => None,
        }
    }
}
