//! Per-request navigation gate.
//!
//! Department pages need a session; login and registration pages are pointless
//! once one exists. The decision depends only on the request path and whether
//! a session token is present, so it is a pure function.

/// Prefix of the pages that require a session.
pub const PROTECTED_PREFIX: &str = "/departments";
/// Prefixes of the sign-in pages.
pub const AUTH_PREFIXES: [&str; 2] = ["/login", "/register"];
/// Where unauthenticated visitors are sent.
pub const LOGIN_PAGE: &str = "/login";
/// Where authenticated visitors land.
pub const LANDING_PAGE: &str = PROTECTED_PREFIX;

/// Paths never subject to the gate: API routes, static assets, image
/// optimisation, probes, and API docs.
const EXCLUDED_PREFIXES: [&str; 7] = [
    "/api",
    "/static",
    "/_image",
    "/favicon.ico",
    "/health",
    "/docs",
    "/api-docs",
];

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through untouched.
    Allow,
    /// Answer with a redirect to the given path.
    Redirect(&'static str),
}

/// Whether `path` bypasses the gate entirely.
///
/// # Examples
/// ```
/// use department_portal::domain::route_guard::is_excluded;
///
/// assert!(is_excluded("/api/actions/login"));
/// assert!(!is_excluded("/departments"));
/// ```
#[must_use]
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Decide what to do with a request for `path`.
///
/// # Examples
/// ```
/// use department_portal::domain::route_guard::{evaluate, GuardDecision};
///
/// assert_eq!(evaluate("/departments/d1", false), GuardDecision::Redirect("/login"));
/// assert_eq!(evaluate("/login", true), GuardDecision::Redirect("/departments"));
/// assert_eq!(evaluate("/about", false), GuardDecision::Allow);
/// ```
#[must_use]
pub fn evaluate(path: &str, has_token: bool) -> GuardDecision {
    if is_excluded(path) {
        return GuardDecision::Allow;
    }
    if !has_token && path.starts_with(PROTECTED_PREFIX) {
        return GuardDecision::Redirect(LOGIN_PAGE);
    }
    if has_token && AUTH_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return GuardDecision::Redirect(LANDING_PAGE);
    }
    GuardDecision::Allow
}
