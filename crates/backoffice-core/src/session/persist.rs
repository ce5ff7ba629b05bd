// Mapping between `Session` and its two storage keys.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{AccessToken, Identity, Session};
use crate::storage::{DurableStorage, IDENTITY_KEY, StorageBatch, TOKEN_KEY};

/// Rebuild a session from storage.
///
/// Anything short of a non-empty token plus a parseable identity yields
/// `Session::Anonymous`.
pub(crate) fn restore(storage: &dyn DurableStorage) -> Session {
    let mut values = storage.get_items(&[TOKEN_KEY, IDENTITY_KEY]).into_iter();
    let token = values.next().flatten();
    let identity = values.next().flatten();

    match (token, identity) {
        (None, None) => Session::Anonymous,
        (Some(token), Some(raw_identity)) => {
            let Some(token) = AccessToken::new(token) else {
                warn!("persisted token is empty, starting signed out");
                return Session::Anonymous;
            };
            match serde_json::from_str::<Identity>(&raw_identity) {
                Ok(identity) => {
                    debug!(user_id = identity.id, "restored persisted session");
                    Session::Authenticated {
                        identity: Arc::new(identity),
                        token,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "persisted identity is corrupt, starting signed out");
                    Session::Anonymous
                }
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("persisted session is incomplete, starting signed out");
            Session::Anonymous
        }
    }
}

/// The batch that persists an authenticated session. `None` when the
/// identity cannot be serialized, in which case nothing should be written.
pub(crate) fn save_batch(identity: &Identity, token: &AccessToken) -> Option<StorageBatch> {
    match serde_json::to_string(identity) {
        Ok(json) => Some(
            StorageBatch::new()
                .set(TOKEN_KEY, token.expose())
                .set(IDENTITY_KEY, json),
        ),
        Err(e) => {
            warn!(error = %e, "cannot serialize identity, session will not persist");
            None
        }
    }
}

pub(crate) fn clear_batch() -> StorageBatch {
    StorageBatch::new().remove(TOKEN_KEY).remove(IDENTITY_KEY)
}
