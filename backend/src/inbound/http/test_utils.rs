//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;

use super::cookie_config::CookiePolicy;
use super::cookie_session::{TOKEN_COOKIE, USER_COOKIE};
use super::origin::OriginPolicy;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::ports::{CollectionRefresh, DepartmentApi};

/// Serialised user matching the fixtures used across handler tests.
pub const USER_JSON: &str = r#"{"id":"1","name":"A","email":"a@b.com"}"#;

/// Build handler state around the given ports with permissive test policies.
///
/// Cookies are not marked `Secure` so they round-trip over plain HTTP, and
/// `portal.example.com` is the only extra allowed origin.
pub fn http_state(api: Arc<dyn DepartmentApi>, refresh: Arc<dyn CollectionRefresh>) -> HttpState {
    HttpState::new(
        HttpStatePorts { api, refresh },
        CookiePolicy::with_secure(false),
        OriginPolicy::new(["portal.example.com"]),
    )
}

/// The cookie pair of a signed-in caller.
pub fn session_cookies(token: &str) -> [Cookie<'static>; 2] {
    [
        Cookie::new(TOKEN_COOKIE, token.to_owned()),
        Cookie::new(USER_COOKIE, USER_JSON),
    ]
}
