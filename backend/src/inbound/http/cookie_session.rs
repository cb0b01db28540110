//! Cookie-backed session store for HTTP requests.
//!
//! The store is built from the request's `auth_token` and `user_data`
//! cookies. `create` and `destroy` stage a cookie pair; handlers flush the
//! staged pair onto their response with [`CookieSessionStore::apply_to`].

use std::future::{Ready, ready};
use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::cookie::Cookie;
use actix_web::http::header::{HeaderValue, SET_COOKIE};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use tracing::{error, warn};

use super::cookie_config::CookiePolicy;
use super::state::HttpState;
use crate::domain::ports::{SessionStore, decode_user};
use crate::domain::{AuthSession, Error, SessionToken, User};

/// Cookie holding the raw upstream token.
pub const TOKEN_COOKIE: &str = "auth_token";
/// Cookie holding the JSON-serialised user.
pub const USER_COOKIE: &str = "user_data";

#[derive(Debug, Default)]
struct Entries {
    token: Option<String>,
    user: Option<String>,
    dirty: bool,
}

/// Session store over one request's cookies.
#[derive(Debug)]
pub struct CookieSessionStore {
    policy: CookiePolicy,
    entries: Mutex<Entries>,
}

impl CookieSessionStore {
    /// Read the session cookies from `req`.
    pub fn from_http_request(req: &HttpRequest, policy: CookiePolicy) -> Self {
        let value = |name: &str| req.cookie(name).map(|cookie| cookie.value().to_owned());
        Self {
            policy,
            entries: Mutex::new(Entries {
                token: value(TOKEN_COOKIE),
                user: value(USER_COOKIE),
                dirty: false,
            }),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `create` or `destroy` ran during this request.
    pub fn has_pending_changes(&self) -> bool {
        self.entries().dirty
    }

    /// `Set-Cookie` values for the staged change, token first.
    pub fn pending_cookies(&self) -> Vec<Cookie<'static>> {
        let entries = self.entries();
        if !entries.dirty {
            return Vec::new();
        }
        match (&entries.token, &entries.user) {
            (Some(token), Some(user)) => vec![
                self.policy.issue(TOKEN_COOKIE, token.clone()),
                self.policy.issue(USER_COOKIE, user.clone()),
            ],
            _ => vec![
                self.policy.expire(TOKEN_COOKIE),
                self.policy.expire(USER_COOKIE),
            ],
        }
    }

    /// Append the staged cookie pair to `response`.
    pub fn apply_to(&self, response: &mut HttpResponse) {
        for cookie in self.pending_cookies() {
            match HeaderValue::from_str(&cookie.encoded().to_string()) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(err) => error!(
                    cookie = cookie.name(),
                    error = %err,
                    "failed to encode session cookie"
                ),
            }
        }
    }
}

impl SessionStore for CookieSessionStore {
    fn create(&self, session: &AuthSession) {
        let user = match serde_json::to_string(&session.user) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "failed to serialise session user; session not stored");
                return;
            }
        };
        let mut entries = self.entries();
        entries.token = Some(session.token.as_str().to_owned());
        entries.user = Some(user);
        entries.dirty = true;
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
        entries.dirty = true;
    }
}

impl FromRequest for CookieSessionStore {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<HttpState>>() {
            Some(state) => Ok(Self::from_http_request(req, state.cookies.clone())),
            None => {
                error!("HttpState missing from app data; cannot read session cookies");
                Err(Error::internal("Session state unavailable"))
            }
        };
        ready(result)
    }
}
