// ── Session store ──
//
// The single source of truth for "who is signed in". Reads are open to
// everyone; writes go through `AuthGateway`, the only caller of the
// crate-private mutators below.

mod persist;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::model::{AccessToken, Identity, Session};
use crate::storage::{DetachedStorage, DurableStorage};
use crate::stream::SequenceStream;

/// Session changes buffered per subscriber before it reports `Lagged`.
const EVENT_CAPACITY: usize = 64;

/// Holds the current [`Session`], mirrors it to durable storage, and
/// publishes every change to subscribers.
///
/// The in-memory session is authoritative: when storage is unavailable a
/// login still lasts for the life of the process. `state` answers reads;
/// `events` carries each transition so all subscribers see the same order.
pub struct SessionStore {
    storage: Arc<dyn DurableStorage>,
    state: watch::Sender<Session>,
    events: broadcast::Sender<Session>,
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Load the persisted session (if any) from `storage`.
    pub fn restore(storage: Arc<dyn DurableStorage>) -> Self {
        let session = persist::restore(storage.as_ref());
        let (state, _) = watch::channel(session);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            state,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// A store with no durable backend.
    pub fn detached() -> Self {
        Self::restore(Arc::new(DetachedStorage))
    }

    pub fn storage_available(&self) -> bool {
        self.storage.is_available()
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.state.borrow().identity().cloned()
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.state.borrow().token().cloned()
    }

    /// Subscribe to session changes from this point on.
    ///
    /// Every transition is delivered in order. A subscriber that falls more
    /// than a buffer's worth behind gets an explicit `Lagged` error.
    pub fn subscribe(&self) -> SequenceStream<Session> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        SequenceStream::new(self.current(), self.events.subscribe())
    }

    fn publish(&self, session: &Session) {
        // No receivers is not an error.
        let _ = self.events.send(session.clone());
    }

    // ── Writes (gateway only) ────────────────────────────────────────

    /// Persist and publish an authenticated session.
    pub(crate) fn establish(&self, identity: Identity, token: AccessToken) -> Arc<Identity> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(batch) = persist::save_batch(&identity, &token) {
            self.storage.apply(batch);
        }

        let identity = Arc::new(identity);
        info!(user_id = identity.id, username = %identity.username, "signed in");
        let session = Session::Authenticated {
            identity: Arc::clone(&identity),
            token,
        };
        self.publish(&session);
        self.state.send_replace(session);
        identity
    }

    /// Drop the session from storage and memory. Returns whether a session
    /// was actually active; subscribers are only notified in that case.
    pub(crate) fn clear(&self) -> bool {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.storage.apply(persist::clear_batch());

        let cleared = self.state.send_if_modified(|session| {
            if session.is_authenticated() {
                *session = Session::Anonymous;
                true
            } else {
                false
            }
        });
        if cleared {
            debug!("session cleared");
            self.publish(&Session::Anonymous);
        }
        cleared
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.state.borrow())
            .field("storage_available", &self.storage.is_available())
            .finish_non_exhaustive()
    }
}
