//! Session cookie policy parsing and validation.
//!
//! This module centralises the environment-driven cookie attributes so they
//! are validated consistently and can be tested in isolation.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use mockable::Env;
use tracing::warn;

const DEPLOYMENT_ENV: &str = "PORTAL_ENV";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const PRODUCTION: &str = "production";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Lifetime of both session cookies: seven days.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Path scope of the session cookies.
pub const SESSION_COOKIE_PATH: &str = "/";

/// Deployment mode, read from `PORTAL_ENV`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeploymentMode {
    /// Anything other than a production deployment.
    Development,
    /// `PORTAL_ENV=production`.
    Production,
}

impl DeploymentMode {
    /// Determine the deployment mode from the environment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use department_portal::inbound::http::cookie_config::DeploymentMode;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string()
    ///     .returning(|name| (name == "PORTAL_ENV").then(|| "Production".to_owned()));
    /// assert_eq!(DeploymentMode::from_env(&env), DeploymentMode::Production);
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Self {
        match env.string(DEPLOYMENT_ENV) {
            Some(value) if value.trim().eq_ignore_ascii_case(PRODUCTION) => Self::Production,
            _ => Self::Development,
        }
    }

    fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Attributes applied to the `auth_token` and `user_data` cookies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Whether cookies are marked `Secure`.
    pub secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
    /// Lifetime of a freshly issued cookie.
    pub max_age: Duration,
}

impl CookiePolicy {
    /// Policy with the standard attributes and the given `Secure` flag.
    #[must_use]
    pub fn with_secure(secure: bool) -> Self {
        Self {
            secure,
            same_site: SameSite::Lax,
            max_age: Duration::seconds(SESSION_MAX_AGE_SECS),
        }
    }

    /// Build a session cookie carrying `value`.
    pub fn issue(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build(name, value)
            .path(SESSION_COOKIE_PATH)
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(self.max_age)
            .finish()
    }

    /// Build a cookie that removes `name` from the client.
    pub fn expire(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.issue(name, String::new());
        cookie.make_removal();
        cookie
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::with_secure(false)
    }
}

/// Errors raised while validating the cookie policy.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CookieConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Production deployments must not disable `Secure`.
    #[error("SESSION_COOKIE_SECURE must not be disabled when PORTAL_ENV=production")]
    InsecureInProduction,
}

/// Build the cookie policy from environment variables.
///
/// `Secure` follows the deployment mode unless `SESSION_COOKIE_SECURE`
/// overrides it.
///
/// # Examples
///
/// ```rust
/// use department_portal::inbound::http::cookie_config::cookie_policy_from_env;
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "PORTAL_ENV" => Some("production".to_owned()),
///     _ => None,
/// });
///
/// let policy = cookie_policy_from_env(&env)?;
/// assert!(policy.secure);
/// # Ok(())
/// # }
/// ```
pub fn cookie_policy_from_env<E: Env>(env: &E) -> Result<CookiePolicy, CookieConfigError> {
    let mode = DeploymentMode::from_env(env);
    let secure = cookie_secure_from_env(env, mode)?;
    Ok(CookiePolicy::with_secure(secure))
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: DeploymentMode) -> Result<bool, CookieConfigError> {
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        return Ok(mode.is_production());
    };
    match parse_bool(&value) {
        Some(true) => Ok(true),
        Some(false) if mode.is_production() => Err(CookieConfigError::InsecureInProduction),
        Some(false) => Ok(false),
        None if mode.is_production() => Err(CookieConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
        None => {
            warn!(
                value = %value,
                "invalid SESSION_COOKIE_SECURE; using deployment default"
            );
            Ok(false)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
