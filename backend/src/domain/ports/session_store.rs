//! Session Store port: who is calling, and with which token.
//!
//! A store represents one caller's persisted session (in production, a pair
//! of cookies). Actions receive it explicitly rather than reaching for global
//! request state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::domain::{AuthSession, SessionToken, User};

/// Persisted session state for a single caller.
///
/// ## Invariants
/// - `create` and `destroy` always touch the token and the user together.
/// - Reads never fail: missing, expired, or corrupt state reads as `None`.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Persist `session`, replacing any previous one.
    fn create(&self, session: &AuthSession);

    /// Token of the current session, if any.
    fn read_token(&self) -> Option<SessionToken>;

    /// Profile of the current session, if present and well formed.
    fn read_user(&self) -> Option<User>;

    /// Remove the session. Safe to call when no session exists.
    fn destroy(&self);

    /// Whether a session token is present.
    fn is_authenticated(&self) -> bool {
        self.read_token().is_some()
    }
}

/// Decode a serialised user entry, treating malformed data as absent.
pub(crate) fn decode_user(raw: &str) -> Option<User> {
    match serde_json::from_str::<User>(raw) {
        Ok(user) => Some(user),
        Err(error) => {
            warn!(%error, "discarding malformed session user entry");
            None
        }
    }
}

#[derive(Default)]
struct RawEntries {
    token: Option<String>,
    user: Option<String>,
}

/// Process-local store holding the same raw entries a cookie jar would.
///
/// Used where no HTTP request exists (tests, scripts).
///
/// # Examples
/// ```
/// use department_portal::domain::ports::{InMemorySessionStore, SessionStore};
///
/// let store = InMemorySessionStore::with_raw_entries(Some("t1"), Some("not json"));
/// assert!(store.is_authenticated());
/// assert!(store.read_user().is_none());
/// ```
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<RawEntries>,
}

impl InMemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw token and user entries.
    #[must_use]
    pub fn with_raw_entries(token: Option<&str>, user: Option<&str>) -> Self {
        Self {
            entries: Mutex::new(RawEntries {
                token: token.map(str::to_owned),
                user: user.map(str::to_owned),
            }),
        }
    }

    fn entries(&self) -> MutexGuard<'_, RawEntries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: &AuthSession) {
        let user = match serde_json::to_string(&session.user) {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "failed to serialise session user; session not stored");
                return;
            }
        };
        let mut entries = self.entries();
        entries.token = Some(session.token.as_str().to_owned());
        entries.user = Some(user);
    }

    fn read_token(&self) -> Option<SessionToken> {
        self.entries().token.clone().and_then(SessionToken::new)
    }

    fn read_user(&self) -> Option<User> {
        self.entries().user.as_deref().and_then(decode_user)
    }

    fn destroy(&self) {
        let mut entries = self.entries();
        entries.token = None;
        entries.user = None;
    }
}
